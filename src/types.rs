/*
    casexport: token-aligned export of INCEpTION CAS XMI annotations
        by Maarten van Gompel <proycon@anaproy.nl>
        Digital Infrastucture, KNAW Humanities Cluster

        Licensed under the GNU General Public License v3
*/

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

/// Numeric identifier of a feature structure in an XMI document (`xmi:id`)
pub type XmiId = usize;

/// Values of a string array feature. Definition lists rarely hold more than a couple of entries.
pub type Strings = SmallVec<[String; 2]>;

/// Placeholder emitted in tabular and TSV output for absent values
pub const EMPTY: &str = "_";

/// Separator used when joining multi-valued definition features into one string
pub const DEFINITION_SEPARATOR: &str = ";";

pub const TOKEN_TYPE: &str = "de.tudarmstadt.ukp.dkpro.core.api.segmentation.type.Token";
pub const DICT_DEAF_TYPE: &str = "webanno.custom.DictDEAF";
pub const DICT_HINDLEY_TYPE: &str = "webanno.custom.DictHindley";
pub const TROTTER_GLOSSARY_TYPE: &str = "webanno.custom.TrotterGlossary";
pub const NAMED_ENTITY_TYPE: &str = "de.tudarmstadt.ukp.dkpro.core.api.ner.type.NamedEntity";

pub const LEMMA_FEATURE: &str = "lemma";
pub const POS_FEATURE: &str = "pos";
pub const VALUE_FEATURE: &str = "value";
pub const COARSE_POS_FEATURE: &str = "coarseValue";
pub const FINE_POS_FEATURE: &str = "PosValue";

/// Text selection offset in unicode codepoints. The end-point is non-inclusive.
/// Two spans are aligned only if their offsets are equal.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize,
)]
pub struct Offset {
    pub begin: usize,
    pub end: usize,
}

impl Offset {
    pub fn new(begin: usize, end: usize) -> Self {
        Offset { begin, end }
    }

    /// Shortcut constructor, identical to [`Offset::new()`], for symmetry with other offset types
    pub fn simple(begin: usize, end: usize) -> Self {
        Self::new(begin, end)
    }

    /// Length of the selection in unicode points
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.begin)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for Offset {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}-{}", self.begin, self.end)
    }
}

/// The annotation layers this crate exports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layer {
    Token,
    DictDeaf,
    DictHindley,
    TrotterGlossary,
    NamedEntity,
}

impl Layer {
    /// All layers, in the order their records appear in JSON output
    pub const ALL: [Layer; 5] = [
        Layer::Token,
        Layer::DictDeaf,
        Layer::DictHindley,
        Layer::TrotterGlossary,
        Layer::NamedEntity,
    ];

    /// The dictionary-style layers, carrying a multi-valued definition feature
    pub const DICTIONARIES: [Layer; 3] =
        [Layer::DictDeaf, Layer::DictHindley, Layer::TrotterGlossary];

    /// Fully qualified UIMA type name of the layer
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Token => TOKEN_TYPE,
            Self::DictDeaf => DICT_DEAF_TYPE,
            Self::DictHindley => DICT_HINDLEY_TYPE,
            Self::TrotterGlossary => TROTTER_GLOSSARY_TYPE,
            Self::NamedEntity => NAMED_ENTITY_TYPE,
        }
    }

    /// Short label, used as record type in JSON and TSV output
    pub fn label(&self) -> &'static str {
        match self {
            Self::Token => "Token",
            Self::DictDeaf => "DictDEAF",
            Self::DictHindley => "DictHindley",
            Self::TrotterGlossary => "TrotterGlossary",
            Self::NamedEntity => "NamedEntity",
        }
    }

    /// Name of the string array feature holding the definitions, for dictionary layers
    pub fn definition_feature(&self) -> Option<&'static str> {
        match self {
            Self::DictDeaf => Some("DictionaryDefinitionDEAF"),
            Self::DictHindley => Some("DictionaryDefinition"),
            Self::TrotterGlossary => Some("TrotterDefinition"),
            Self::Token | Self::NamedEntity => None,
        }
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum DataFormat {
    /// CoNLL-U-like tabular format, one aligned line per token
    Conllu,
    /// Flat list of all annotations of all exported layers
    Json { compact: bool },
    /// Tab separated values with a header, one aligned row per token
    Tsv,
}

impl fmt::Display for DataFormat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Conllu => write!(f, "CoNLL-U"),
            Self::Json { compact: false } => write!(f, "JSON"),
            Self::Json { compact: true } => write!(f, "JSON (compact)"),
            Self::Tsv => write!(f, "TSV"),
        }
    }
}
