/*
    casexport: token-aligned export of INCEpTION CAS XMI annotations
        by Maarten van Gompel <proycon@anaproy.nl>
        Digital Infrastucture, KNAW Humanities Cluster

        Licensed under the GNU General Public License v3
*/

use crate::cas::Cas;
use crate::config::{Config, Configurable};
use crate::conllu::ToConllu;
use crate::error::CasError;
use crate::file::*;
use crate::json::ToJson;
use crate::tsv::ToTsv;

/// What one export run wrote
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportSummary {
    /// Number of tokens (lines in the tabular export, rows in the TSV export)
    pub tokens: usize,
    /// Number of records in the JSON export
    pub records: usize,
}

/// Writes all three exports of a loaded document, to the output files named in its
/// configuration, in order: CoNLL-U, JSON, TSV. The first failure aborts; outputs written before
/// it are left in place.
pub fn export(cas: &Cas) -> Result<ExportSummary, CasError> {
    let config = cas.config();
    let tokens = cas.to_conllu_file(config.conllu_output())?;
    let records = cas.to_json_file(config.json_output())?;
    let rows = cas.to_tsv_file(config.tsv_output())?;
    debug(config, || {
        format!(
            "export: {} tokens, {} json records, {} tsv rows",
            tokens, records, rows
        )
    });
    Ok(ExportSummary { tokens, records })
}

/// Loads the type system and document named in the configuration and exports them
pub fn run(config: Config) -> Result<ExportSummary, CasError> {
    let cas = Cas::from_config(config)?;
    export(&cas)
}
