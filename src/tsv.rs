/*
    casexport: token-aligned export of INCEpTION CAS XMI annotations
        by Maarten van Gompel <proycon@anaproy.nl>
        Digital Infrastucture, KNAW Humanities Cluster

        Licensed under the GNU General Public License v3
*/

use sealed::sealed;
use serde::Serialize;
use std::io::Write;

use crate::align::{AlignedToken, TokenAligner};
use crate::cas::Cas;
use crate::config::Configurable;
use crate::error::CasError;
use crate::file::*;
use crate::types::*;

pub const TSV_HEADER: [&str; 11] = [
    "Type",
    "Begin",
    "End",
    "Text",
    "Lemma",
    "UPOS",
    "XPOS",
    "DictDEAF",
    "DictHindley",
    "TrotterGlossary",
    "NamedEntity",
];

/// A row in the TSV export, fields in the order of [`TSV_HEADER`]
#[derive(Serialize)]
struct TokenTsv<'a> {
    tp: &'a str,
    begin: usize,
    end: usize,
    text: &'a str,
    lemma: &'a str,
    upos: &'a str,
    xpos: &'a str,
    deaf: &'a str,
    hindley: &'a str,
    trotter: &'a str,
    entity: &'a str,
}

impl<'a> From<&AlignedToken<'a>> for TokenTsv<'a> {
    fn from(token: &AlignedToken<'a>) -> Self {
        let [deaf, hindley, trotter, entity] = token.layer_values();
        Self {
            tp: Layer::Token.label(),
            begin: token.offset.begin,
            end: token.offset.end,
            text: token.text,
            lemma: token.lemma_or_default(),
            upos: token.upos_or_default(),
            xpos: token.xpos_or_default(),
            deaf,
            hindley,
            trotter,
            entity,
        }
    }
}

#[sealed]
pub trait ToTsv: Configurable {
    /// Writes the TSV export (header plus one row per token) to any writer, returns the number of
    /// token rows. The header is written even if there are no tokens.
    fn to_tsv_writer<W>(&self, writer: W) -> Result<usize, CasError>
    where
        W: Write;

    /// Serializes the TSV export to one string
    fn to_tsv_string(&self) -> Result<String, CasError> {
        let mut buffer: Vec<u8> = Vec::new();
        self.to_tsv_writer(&mut buffer)?;
        String::from_utf8(buffer).map_err(|e| {
            CasError::SerializationError(format!("TSV output is not valid UTF-8: {}", e))
        })
    }

    /// Writes the TSV export to a file
    fn to_tsv_file(&self, filename: &str) -> Result<usize, CasError> {
        debug(self.config(), || {
            format!("{}.to_tsv_file: filename={:?}", DataFormat::Tsv, filename)
        });
        let mut count = 0;
        write_file(filename, self.config(), |writer| {
            count = self.to_tsv_writer(writer)?;
            Ok(())
        })?;
        tracing::info!(filename, tokens = count, "wrote {}", DataFormat::Tsv);
        Ok(count)
    }
}

#[sealed]
impl ToTsv for Cas {
    fn to_tsv_writer<W>(&self, writer: W) -> Result<usize, CasError>
    where
        W: Write,
    {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .quote_style(csv::QuoteStyle::Never)
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(writer);
        writer.write_record(TSV_HEADER).map_err(|e| {
            CasError::SerializationError(format!("Failure serializing TSV: {:?}", e))
        })?;
        let aligner = TokenAligner::new(self);
        let mut count = 0;
        for token in aligner.tokens() {
            writer.serialize(TokenTsv::from(&token)).map_err(|e| {
                CasError::SerializationError(format!("Failure serializing TSV: {:?}", e))
            })?;
            count += 1;
        }
        writer
            .flush()
            .map_err(|e| CasError::SerializationError(format!("Failure writing TSV: {:?}", e)))?;
        Ok(count)
    }
}
