/*
    casexport: token-aligned export of INCEpTION CAS XMI annotations
        by Maarten van Gompel <proycon@anaproy.nl>
        Digital Infrastucture, KNAW Humanities Cluster

        Licensed under the GNU General Public License v3
*/

//! This module contains the [`ToJson`] trait for the JSON export. Unlike the tabular exports, the
//! JSON export is not aligned to tokens: it is a flat list of every annotation in each exported
//! layer, grouped per layer, each tagged with its `type`.

use sealed::sealed;
use serde::Serialize;
use std::io::Write;

use crate::align::{lemma_of, pos_of};
use crate::cas::{AnnotationSpan, Cas};
use crate::config::Configurable;
use crate::error::CasError;
use crate::file::*;
use crate::index::definition_string;
use crate::types::*;

/// One annotation in the JSON export. Absent values serialise as `null`.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "type")]
pub enum AnnotationRecord<'a> {
    Token {
        begin: usize,
        end: usize,
        text: &'a str,
        lemma: Option<&'a str>,
        upos: Option<&'a str>,
        xpos: Option<&'a str>,
    },
    #[serde(rename = "DictDEAF")]
    DictDeaf {
        begin: usize,
        end: usize,
        text: &'a str,
        #[serde(rename = "DictionaryDefinitionDEAF")]
        definition: Option<String>,
    },
    DictHindley {
        begin: usize,
        end: usize,
        text: &'a str,
        #[serde(rename = "DictionaryDefinition")]
        definition: Option<String>,
    },
    TrotterGlossary {
        begin: usize,
        end: usize,
        text: &'a str,
        #[serde(rename = "TrotterDefinition")]
        definition: Option<String>,
    },
    NamedEntity {
        begin: usize,
        end: usize,
        text: &'a str,
        /// The raw entity value, an empty value is kept as is
        value: Option<&'a str>,
    },
}

impl<'a> AnnotationRecord<'a> {
    /// Builds the record for an annotation of the given layer
    pub fn new(layer: Layer, span: &AnnotationSpan<'a>) -> Self {
        let Offset { begin, end } = span.offset();
        let text = span.covered_text();
        match layer {
            Layer::Token => {
                let (upos, xpos) = pos_of(span);
                Self::Token {
                    begin,
                    end,
                    text,
                    lemma: lemma_of(span),
                    upos,
                    xpos,
                }
            }
            Layer::DictDeaf => Self::DictDeaf {
                begin,
                end,
                text,
                definition: Self::definition(layer, span),
            },
            Layer::DictHindley => Self::DictHindley {
                begin,
                end,
                text,
                definition: Self::definition(layer, span),
            },
            Layer::TrotterGlossary => Self::TrotterGlossary {
                begin,
                end,
                text,
                definition: Self::definition(layer, span),
            },
            Layer::NamedEntity => Self::NamedEntity {
                begin,
                end,
                text,
                value: span.string(VALUE_FEATURE),
            },
        }
    }

    fn definition(layer: Layer, span: &AnnotationSpan<'a>) -> Option<String> {
        layer
            .definition_feature()
            .and_then(|feature| definition_string(span, feature))
    }

    pub fn layer(&self) -> Layer {
        match self {
            Self::Token { .. } => Layer::Token,
            Self::DictDeaf { .. } => Layer::DictDeaf,
            Self::DictHindley { .. } => Layer::DictHindley,
            Self::TrotterGlossary { .. } => Layer::TrotterGlossary,
            Self::NamedEntity { .. } => Layer::NamedEntity,
        }
    }

    pub fn offset(&self) -> Offset {
        match self {
            Self::Token { begin, end, .. }
            | Self::DictDeaf { begin, end, .. }
            | Self::DictHindley { begin, end, .. }
            | Self::TrotterGlossary { begin, end, .. }
            | Self::NamedEntity { begin, end, .. } => Offset::new(*begin, *end),
        }
    }
}

#[sealed]
pub trait ToJson: Configurable {
    /// Collects the records of all exported layers: all tokens first, then each other layer in turn
    fn annotation_records(&self) -> Vec<AnnotationRecord<'_>>;

    /// Writes the JSON export to any writer, returns the number of records.
    /// Pretty output is indented with four spaces; non-ASCII characters are written as is.
    fn to_json_writer<W>(&self, writer: W, compact: bool) -> Result<usize, CasError>
    where
        W: Write,
    {
        let records = self.annotation_records();
        let result = if compact {
            serde_json::to_writer(writer, &records)
        } else {
            let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
            let mut serializer = serde_json::Serializer::with_formatter(writer, formatter);
            records.serialize(&mut serializer)
        };
        result.map_err(|e| {
            CasError::SerializationError(format!("Writing {} records: {}", records.len(), e))
        })?;
        Ok(records.len())
    }

    /// Serializes the JSON export to one string, in the dataformat set in the configuration
    fn to_json_string(&self) -> Result<String, CasError> {
        let mut buffer: Vec<u8> = Vec::new();
        self.to_json_writer(&mut buffer, self.compact())?;
        String::from_utf8(buffer).map_err(|e| {
            CasError::SerializationError(format!("JSON output is not valid UTF-8: {}", e))
        })
    }

    /// Writes the JSON export to a file, in the dataformat set in the configuration
    fn to_json_file(&self, filename: &str) -> Result<usize, CasError> {
        let dataformat = self.config().json_format();
        debug(self.config(), || {
            format!("{}.to_json_file: filename={:?}", dataformat, filename)
        });
        let mut count = 0;
        write_file(filename, self.config(), |writer| {
            count = self.to_json_writer(writer, self.compact())?;
            Ok(())
        })?;
        tracing::info!(filename, records = count, "wrote {}", dataformat);
        Ok(count)
    }

    fn compact(&self) -> bool {
        matches!(
            self.config().json_format(),
            DataFormat::Json { compact: true }
        )
    }
}

#[sealed]
impl ToJson for Cas {
    fn annotation_records(&self) -> Vec<AnnotationRecord<'_>> {
        Layer::ALL
            .iter()
            .flat_map(|layer| {
                self.select_layer(*layer)
                    .map(move |span| AnnotationRecord::new(*layer, &span))
            })
            .collect()
    }
}
