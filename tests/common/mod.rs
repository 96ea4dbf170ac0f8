#![allow(dead_code)]
use casexport::*;
use std::path::PathBuf;

pub const TYPESYSTEM: &str = include_str!("../data/typesystem.xml");
pub const DOCUMENT: &str = include_str!("../data/admin.xmi");

/// Directory holding the fixture files
pub fn datadir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
}

pub fn datafile(filename: &str) -> String {
    datadir().join(filename).to_string_lossy().into_owned()
}

pub fn typesystem() -> Result<TypeSystem, CasError> {
    TypeSystem::from_xml_str(TYPESYSTEM)
}

/// Wraps feature structure elements in an XMI document with the namespaces INCEpTION uses and
/// a single initial view on the given text. There is no `cas:View`, so every annotation in the
/// sofa is indexed.
pub fn xmi(text: &str, body: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<xmi:XMI xmlns:pos="http:///de/tudarmstadt/ukp/dkpro/core/api/lexmorph/type/pos.ecore" xmlns:tcas="http:///uima/tcas.ecore" xmlns:xmi="http://www.omg.org/XMI" xmlns:cas="http:///uima/cas.ecore" xmlns:type="http:///de/tudarmstadt/ukp/dkpro/core/api/segmentation/type.ecore" xmlns:ner="http:///de/tudarmstadt/ukp/dkpro/core/api/ner/type.ecore" xmlns:custom="http:///webanno/custom.ecore" xmi:version="2.0">
  <cas:NULL xmi:id="0"/>
  <cas:Sofa xmi:id="1" sofaNum="1" sofaID="_InitialView" mimeType="text" sofaString="{}"/>
{}
</xmi:XMI>"#,
        text, body
    )
}

pub fn load(text: &str, body: &str) -> Result<Cas, CasError> {
    Cas::from_xmi_str(&xmi(text, body), typesystem()?, Config::default())
}

/// A single token "Hello" with lemma, part-of-speech and a DEAF definition on exactly the same span
pub fn setup_example_1() -> Result<Cas, CasError> {
    load(
        "Hello",
        r#"  <type:Lemma xmi:id="2" sofa="1" begin="0" end="5" value="hello"/>
  <pos:POS xmi:id="3" sofa="1" begin="0" end="5" PosValue="UH" coarseValue="INTJ"/>
  <type:Token xmi:id="4" sofa="1" begin="0" end="5" lemma="2" pos="3"/>
  <custom:DictDEAF xmi:id="5" sofa="1" begin="0" end="5">
    <DictionaryDefinitionDEAF>greeting</DictionaryDefinitionDEAF>
  </custom:DictDEAF>"#,
    )
}

/// Two bare tokens and a Hindley definition that straddles both of them
pub fn setup_example_2() -> Result<Cas, CasError> {
    load(
        "Hello world",
        r#"  <type:Token xmi:id="2" sofa="1" begin="0" end="5"/>
  <type:Token xmi:id="3" sofa="1" begin="6" end="11"/>
  <custom:DictHindley xmi:id="4" sofa="1" begin="2" end="8">
    <DictionaryDefinition>partial</DictionaryDefinition>
  </custom:DictHindley>"#,
    )
}

/// The fixture document in `tests/data`, with an explicit view
pub fn setup_example_3() -> Result<Cas, CasError> {
    Cas::from_xmi_str(DOCUMENT, typesystem()?, Config::default())
}
