/*
    casexport: token-aligned export of INCEpTION CAS XMI annotations
        by Maarten van Gompel <proycon@anaproy.nl>
        Digital Infrastucture, KNAW Humanities Cluster

        Licensed under the GNU General Public License v3
*/

//! This module defines the [`CasError`] type that all fallible operations in this crate return.

use std::error::Error;
use std::fmt;

use crate::types::Offset;

// ------------------------------ ERROR DEFINITIONS & IMPLEMENTATIONS -------------------------------------------------------------

#[derive(Debug)]
pub enum CasError {
    /// I/O error, with the filename and a context message
    IOError(std::io::Error, String, &'static str),

    /// The XML (type system or XMI) could not be parsed
    XmlError(String, &'static str),

    /// Error deserialising JSON (configuration)
    JsonError(
        serde_path_to_error::Error<serde_json::Error>,
        String,
        &'static str,
    ),

    /// The type system description is invalid
    TypeSystemError(String, &'static str),

    /// A feature structure uses a type that the type system does not define
    UnknownType(String, &'static str),

    /// A feature structure uses a feature its type does not define (type, feature)
    UnknownFeature(String, String, &'static str),

    /// The XMI document is structurally invalid
    XmiError(String, &'static str),

    /// An annotation offset does not fit the text (offset, text length in unicode points)
    OffsetOutOfBounds(Offset, usize, &'static str),

    /// The requested view (sofa ID) does not exist in the document
    NoSuchView(String),

    SerializationError(String),

    OtherError(&'static str),
}

impl From<&CasError> for String {
    /// Returns the error message as a String
    fn from(error: &CasError) -> String {
        match error {
            CasError::IOError(err, filename, msg) => {
                format!("IOError: {} ({}): {}", filename, msg, err)
            }
            CasError::XmlError(err, msg) => format!("XmlError: {} ({})", err, msg),
            CasError::JsonError(err, filename, msg) => {
                format!("JsonError: {} ({}): {}", filename, msg, err)
            }
            CasError::TypeSystemError(err, msg) => format!("TypeSystemError: {} ({})", err, msg),
            CasError::UnknownType(name, msg) => {
                format!("UnknownType: Type is not defined in the type system: {} ({})", name, msg)
            }
            CasError::UnknownFeature(typename, feature, msg) => format!(
                "UnknownFeature: Type {} has no feature {} ({})",
                typename, feature, msg
            ),
            CasError::XmiError(err, msg) => format!("XmiError: {} ({})", err, msg),
            CasError::OffsetOutOfBounds(offset, textlen, msg) => format!(
                "OffsetOutOfBounds: Offset {} does not fit a text of length {} ({})",
                offset, textlen, msg
            ),
            CasError::NoSuchView(name) => format!("NoSuchView: No view named {}", name),
            CasError::SerializationError(err) => format!("SerializationError: {}", err),
            CasError::OtherError(err) => format!("OtherError: {}", err),
        }
    }
}

impl fmt::Display for CasError {
    /// Formats the error message for printing
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let errmsg: String = String::from(self);
        write!(f, "[CasError] {}", errmsg)
    }
}

impl Error for CasError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            CasError::IOError(err, ..) => Some(err),
            CasError::JsonError(err, ..) => Some(err),
            _ => None,
        }
    }
}

impl From<quick_xml::Error> for CasError {
    fn from(error: quick_xml::Error) -> Self {
        CasError::XmlError(error.to_string(), "parsing XML")
    }
}

impl From<quick_xml::events::attributes::AttrError> for CasError {
    fn from(error: quick_xml::events::attributes::AttrError) -> Self {
        CasError::XmlError(error.to_string(), "parsing XML attribute")
    }
}
