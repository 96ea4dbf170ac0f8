/*
    casexport: token-aligned export of INCEpTION CAS XMI annotations
        by Maarten van Gompel <proycon@anaproy.nl>
        Digital Infrastucture, KNAW Humanities Cluster

        Licensed under the GNU General Public License v3
*/

//! ## Introduction
//!
//! This library converts an annotated document as exported by the annotation tool INCEpTION
//! (a UIMA CAS in the XMI interchange format, accompanied by its type system) into three flat
//! formats:
//!
//! * a CoNLL-U-like tabular format, one line per token,
//! * JSON, a flat list of all annotations,
//! * TSV with a header, one row per token.
//!
//! Token-level annotations (lemma, part-of-speech) are combined with the annotations of several
//! custom layers (the DEAF and Hindley dictionaries, the Trotter glossary and named entities).
//! Annotations of those layers are attached to a token only if their begin *and* end offsets are
//! identical to those of the token.
//!
//! The library carries a minimal CAS loader: enough of the UIMA type system and XMI to query the
//! annotations per layer. It is not a general CAS implementation.
//!
//! ```no_run
//! use casexport::*;
//!
//! let cas = Cas::from_config(Config::default())?;
//! let conllu = cas.to_conllu_string()?;
//! # Ok::<(), CasError>(())
//! ```
//!
//! Main entry points:
//! * [`Cas`] - the loaded document
//! * [`AnnotationSpan`] - a single annotation
//! * [`TypeSystem`]
//! * [`TokenAligner`] and [`ExactSpanIndex`]
//! * [`ToConllu`], [`ToJson`], [`ToTsv`] - the exporters
//! * [`export()`] and [`run()`] - the full pipeline
//! * [`Config`]

mod align;
mod cas;
mod config;
mod conllu;
mod error;
mod export;
mod file;
mod index;
mod json;
mod tsv;
mod types;
mod typesystem;
mod xmi;

// Our internal crate structure is not very relevant to the outside world,
// expose all structs and traits in the root namespace, and be explicit about it:

pub use align::{lemma_of, pos_of, AlignedToken, TokenAligner};
pub use cas::{AnnotationSpan, Cas, FeatureStructure, FeatureValue, Sofa};
pub use config::{Config, Configurable};
pub use conllu::{ToConllu, CONLLU_COLUMNS, SENTENCE_ID};
pub use error::CasError;
pub use export::{export, run, ExportSummary};
pub use index::{definition_string, ExactSpanIndex};
pub use json::{AnnotationRecord, ToJson};
pub use tsv::{ToTsv, TSV_HEADER};
pub use types::*;
pub use typesystem::{FeatureDescription, FeatureKind, TypeDescription, TypeSystem};

mod tests;
