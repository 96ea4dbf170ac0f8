/*
    casexport: token-aligned export of INCEpTION CAS XMI annotations
        by Maarten van Gompel <proycon@anaproy.nl>
        Digital Infrastucture, KNAW Humanities Cluster

        Licensed under the GNU General Public License v3
*/

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::CasError;
use crate::file::*;
use crate::types::*;

pub trait Configurable: Sized {
    //// Obtain the configuration
    fn config(&self) -> &Config;

    //// Obtain the configuration mutably
    fn config_mut(&mut self) -> &mut Config;

    ///Builder pattern to associate a configuration
    fn with_config(mut self, config: Config) -> Self {
        self.set_config(config);
        self
    }

    ///Setter to associate a configuration
    fn set_config(&mut self, config: Config) -> &mut Self;
}

/// This holds the configuration for loading and exporting. The defaults reproduce the fixed
/// filenames of an INCEpTION export directory.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Debug mode
    pub(crate) debug: bool,

    /// The working directory
    pub(crate) workdir: Option<PathBuf>,

    /// The UIMA type system description
    pub(crate) typesystem: String,

    /// The annotated document in XMI
    pub(crate) document: String,

    pub(crate) conllu_output: String,

    pub(crate) json_output: String,

    pub(crate) tsv_output: String,

    /// Sofa ID of the view to export
    pub(crate) view: String,

    /// Write JSON without indentation
    pub(crate) json_compact: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            debug: false,
            workdir: None,
            typesystem: "typesystem.xml".to_string(),
            document: "admin.xmi".to_string(),
            conllu_output: "annotations_with_named_entities.conllu".to_string(),
            json_output: "annotations_with_named_entities.json".to_string(),
            tsv_output: "annotations_with_named_entities.tsv".to_string(),
            view: "_InitialView".to_string(),
            json_compact: false,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable debug mode. In debug mode, verbose output will be logged
    pub fn with_debug(mut self, value: bool) -> Self {
        self.debug = value;
        self
    }

    /// Is debug mode enabled or not?
    pub fn debug(&self) -> bool {
        self.debug
    }

    /// Set the working directory, relative filenames are resolved against it
    pub fn with_workdir(mut self, workdir: impl Into<PathBuf>) -> Self {
        self.workdir = Some(workdir.into());
        self
    }

    ///  Return the working directory, if set
    pub fn workdir(&self) -> Option<&Path> {
        self.workdir.as_ref().map(|x| x.as_path())
    }

    pub fn with_typesystem(mut self, filename: impl Into<String>) -> Self {
        self.typesystem = filename.into();
        self
    }

    /// Filename of the type system description
    pub fn typesystem(&self) -> &str {
        self.typesystem.as_str()
    }

    pub fn with_document(mut self, filename: impl Into<String>) -> Self {
        self.document = filename.into();
        self
    }

    /// Filename of the XMI document
    pub fn document(&self) -> &str {
        self.document.as_str()
    }

    pub fn with_conllu_output(mut self, filename: impl Into<String>) -> Self {
        self.conllu_output = filename.into();
        self
    }

    pub fn conllu_output(&self) -> &str {
        self.conllu_output.as_str()
    }

    pub fn with_json_output(mut self, filename: impl Into<String>) -> Self {
        self.json_output = filename.into();
        self
    }

    pub fn json_output(&self) -> &str {
        self.json_output.as_str()
    }

    pub fn with_tsv_output(mut self, filename: impl Into<String>) -> Self {
        self.tsv_output = filename.into();
        self
    }

    pub fn tsv_output(&self) -> &str {
        self.tsv_output.as_str()
    }

    /// Select the view (by sofa ID) to export. Defaults to `_InitialView`.
    pub fn with_view(mut self, view: impl Into<String>) -> Self {
        self.view = view.into();
        self
    }

    pub fn view(&self) -> &str {
        self.view.as_str()
    }

    /// Write JSON output without indentation?
    pub fn with_json_compact(mut self, value: bool) -> Self {
        self.json_compact = value;
        self
    }

    /// Returns the configured JSON dataformat
    pub fn json_format(&self) -> DataFormat {
        DataFormat::Json {
            compact: self.json_compact,
        }
    }

    /// Loads configuration from a JSON file, missing fields take their default values
    pub fn from_file(filename: &str) -> Result<Self, CasError> {
        let reader = open_file_reader(filename, &Config::default())?;
        let deserializer = &mut serde_json::Deserializer::from_reader(reader);
        let result: Result<Self, _> = serde_path_to_error::deserialize(deserializer);
        result
            .map_err(|e| CasError::JsonError(e, filename.to_string(), "Reading config from file"))
    }

    /// Loads configuration from a JSON string, missing fields take their default values
    pub fn from_json_str(string: &str) -> Result<Self, CasError> {
        let deserializer = &mut serde_json::Deserializer::from_str(string);
        let result: Result<Self, _> = serde_path_to_error::deserialize(deserializer);
        result.map_err(|e| CasError::JsonError(e, "(string)".to_string(), "Reading config"))
    }
}
