mod common;
use crate::common::*;

use std::path::Path;

use casexport::*;

fn read_output(dir: &Path, filename: &str) -> Result<String, CasError> {
    let path = dir.join(filename);
    std::fs::read_to_string(&path).map_err(|e| {
        CasError::IOError(e, path.to_string_lossy().into_owned(), "reading test output")
    })
}

fn tempdir() -> Result<tempfile::TempDir, CasError> {
    tempfile::tempdir()
        .map_err(|e| CasError::IOError(e, "(tempdir)".to_string(), "creating temporary directory"))
}

fn config_for(workdir: &Path) -> Config {
    Config::default()
        .with_workdir(workdir)
        .with_typesystem(datafile("typesystem.xml"))
        .with_document(datafile("admin.xmi"))
}

#[test]
fn run_writes_all_outputs() -> Result<(), CasError> {
    let dir = tempdir()?;
    let summary = run(config_for(dir.path()))?;
    assert_eq!(
        summary,
        ExportSummary {
            tokens: 6,
            records: 14
        }
    );

    let cas = setup_example_3()?;
    assert_eq!(
        read_output(dir.path(), "annotations_with_named_entities.conllu")?,
        cas.to_conllu_string()?
    );
    assert_eq!(
        read_output(dir.path(), "annotations_with_named_entities.json")?,
        cas.to_json_string()?
    );
    assert_eq!(
        read_output(dir.path(), "annotations_with_named_entities.tsv")?,
        cas.to_tsv_string()?
    );
    Ok(())
}

#[test]
fn run_is_idempotent() -> Result<(), CasError> {
    let dir = tempdir()?;
    run(config_for(dir.path()))?;
    let first = read_output(dir.path(), "annotations_with_named_entities.json")?;
    run(config_for(dir.path()))?;
    let second = read_output(dir.path(), "annotations_with_named_entities.json")?;
    assert_eq!(first, second);
    Ok(())
}

#[test]
fn relative_inputs_resolve_against_workdir() -> Result<(), CasError> {
    //the workdir holds the inputs, outputs are written next to them
    let dir = tempdir()?;
    for filename in ["typesystem.xml", "admin.xmi"] {
        std::fs::copy(datadir().join(filename), dir.path().join(filename)).map_err(|e| {
            CasError::IOError(e, filename.to_string(), "copying fixture")
        })?;
    }
    let config = Config::default().with_workdir(dir.path());
    let cas = Cas::from_config(config)?;
    let summary = export(&cas)?;
    assert_eq!(summary.tokens, 6);
    assert!(dir.path().join("annotations_with_named_entities.tsv").is_file());
    Ok(())
}

#[test]
fn custom_output_names() -> Result<(), CasError> {
    let dir = tempdir()?;
    let config = config_for(dir.path())
        .with_conllu_output("out.conllu")
        .with_json_output("out.json")
        .with_tsv_output("out.tsv")
        .with_json_compact(true);
    run(config)?;
    let json = read_output(dir.path(), "out.json")?;
    assert!(json.starts_with(r#"[{"type":"Token","begin":0,"end":5,"text":"Hello""#));
    assert!(dir.path().join("out.conllu").is_file());
    assert!(dir.path().join("out.tsv").is_file());
    Ok(())
}

#[test]
fn missing_document_writes_nothing() -> Result<(), CasError> {
    let dir = tempdir()?;
    let config = config_for(dir.path()).with_document(datafile("missing.xmi"));
    let result = run(config);
    assert!(matches!(result, Err(CasError::IOError(..))));
    assert!(!dir
        .path()
        .join("annotations_with_named_entities.conllu")
        .exists());
    Ok(())
}

#[test]
fn config_from_file() -> Result<(), CasError> {
    let dir = tempdir()?;
    let path = dir.path().join("config.json");
    std::fs::write(&path, r#"{ "view": "gold", "json_compact": true }"#)
        .map_err(|e| CasError::IOError(e, "config.json".to_string(), "writing config"))?;
    let config = Config::from_file(&path.to_string_lossy())?;
    assert_eq!(config.view(), "gold");
    assert_eq!(config.json_format(), DataFormat::Json { compact: true });
    //unspecified fields keep their defaults
    assert_eq!(config.document(), "admin.xmi");
    Ok(())
}
