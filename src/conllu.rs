/*
    casexport: token-aligned export of INCEpTION CAS XMI annotations
        by Maarten van Gompel <proycon@anaproy.nl>
        Digital Infrastucture, KNAW Humanities Cluster

        Licensed under the GNU General Public License v3
*/

//! This module contains the [`ToConllu`] trait for the CoNLL-U-like tabular export. Each token
//! becomes one line of 13 tab-separated columns: the ten CoNLL-U columns (with dependency columns
//! filled by placeholders) followed by the DEAF, Hindley, Trotter and named entity values aligned
//! to the token.

use sealed::sealed;
use std::io::Write;

use crate::align::TokenAligner;
use crate::cas::Cas;
use crate::config::Configurable;
use crate::error::CasError;
use crate::file::*;
use crate::types::*;

/// Value of the sentence column. The document is exported as one unsegmented block, so every
/// line carries the same sentence identifier.
pub const SENTENCE_ID: &str = "1";

/// Number of columns in every record line
pub const CONLLU_COLUMNS: usize = 13;

#[sealed]
pub trait ToConllu: Configurable {
    /// Writes the tabular export to any writer, returns the number of record lines.
    /// Every line, including the last, is newline-terminated, so the block ends in an empty line.
    fn to_conllu_writer<W>(&self, writer: W) -> Result<usize, CasError>
    where
        W: Write;

    /// Serializes the tabular export to one string
    fn to_conllu_string(&self) -> Result<String, CasError> {
        let mut buffer: Vec<u8> = Vec::new();
        self.to_conllu_writer(&mut buffer)?;
        String::from_utf8(buffer).map_err(|e| {
            CasError::SerializationError(format!("CoNLL-U output is not valid UTF-8: {}", e))
        })
    }

    /// Writes the tabular export to a file
    fn to_conllu_file(&self, filename: &str) -> Result<usize, CasError> {
        debug(self.config(), || {
            format!("{}.to_conllu_file: filename={:?}", DataFormat::Conllu, filename)
        });
        let mut count = 0;
        write_file(filename, self.config(), |writer| {
            count = self.to_conllu_writer(writer)?;
            Ok(())
        })?;
        tracing::info!(filename, tokens = count, "wrote {}", DataFormat::Conllu);
        Ok(count)
    }
}

#[sealed]
impl ToConllu for Cas {
    fn to_conllu_writer<W>(&self, writer: W) -> Result<usize, CasError>
    where
        W: Write,
    {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .quote_style(csv::QuoteStyle::Never)
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(writer);
        let aligner = TokenAligner::new(self);
        let mut count = 0;
        for token in aligner.tokens() {
            let [deaf, hindley, trotter, entity] = token.layer_values();
            let record: [&str; CONLLU_COLUMNS] = [
                SENTENCE_ID,
                token.text,
                token.lemma_or_default(),
                token.upos_or_default(),
                token.xpos_or_default(),
                EMPTY,  //FEATS
                "0",    //HEAD
                "root", //DEPREL
                EMPTY,  //DEPS
                deaf,
                hindley,
                trotter,
                entity,
            ];
            writer.write_record(&record).map_err(|e| {
                CasError::SerializationError(format!("Failure serializing CoNLL-U: {:?}", e))
            })?;
            count += 1;
        }
        writer.flush().map_err(|e| {
            CasError::SerializationError(format!("Failure writing CoNLL-U: {:?}", e))
        })?;
        Ok(count)
    }
}
