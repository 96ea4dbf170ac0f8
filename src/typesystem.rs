/*
    casexport: token-aligned export of INCEpTION CAS XMI annotations
        by Maarten van Gompel <proycon@anaproy.nl>
        Digital Infrastucture, KNAW Humanities Cluster

        Licensed under the GNU General Public License v3
*/

//! This module contains the [`TypeSystem`], a parsed UIMA type system description. It tells the
//! XMI loader which types exist, how they inherit from each other, and how each feature is encoded.
//! Only the information needed for decoding is retained; allowed values, descriptions and
//! imports are ignored.

use quick_xml::events::Event;
use quick_xml::Reader;
use std::collections::HashMap;

use crate::config::Config;
use crate::error::CasError;
use crate::file::*;

pub const TOP: &str = "uima.cas.TOP";
pub const STRING: &str = "uima.cas.String";
pub const INTEGER: &str = "uima.cas.Integer";
pub const ARRAY_BASE: &str = "uima.cas.ArrayBase";
pub const FS_ARRAY: &str = "uima.cas.FSArray";
pub const STRING_ARRAY: &str = "uima.cas.StringArray";
pub const SOFA: &str = "uima.cas.Sofa";
pub const ANNOTATION_BASE: &str = "uima.cas.AnnotationBase";
pub const ANNOTATION: &str = "uima.tcas.Annotation";
pub const DOCUMENT_ANNOTATION: &str = "uima.tcas.DocumentAnnotation";

/// Name of the feature holding the values of an array type
pub const ELEMENTS_FEATURE: &str = "elements";

const PRIMITIVES: &[&str] = &[
    "uima.cas.Boolean",
    "uima.cas.Byte",
    "uima.cas.Short",
    INTEGER,
    "uima.cas.Long",
    "uima.cas.Float",
    "uima.cas.Double",
    STRING,
];

const PRIMITIVE_ARRAYS: &[&str] = &[
    "uima.cas.BooleanArray",
    "uima.cas.ByteArray",
    "uima.cas.ShortArray",
    "uima.cas.IntegerArray",
    "uima.cas.LongArray",
    "uima.cas.FloatArray",
    "uima.cas.DoubleArray",
    STRING_ARRAY,
];

#[derive(Debug, Clone, PartialEq)]
pub struct FeatureDescription {
    pub name: String,
    /// The range type name
    pub range: String,
    /// Element type for array and list features
    pub element_type: Option<String>,
    /// If false, arrays are serialised inline in the owning feature structure rather than as a separate one
    pub multiple_references_allowed: bool,
}

impl FeatureDescription {
    pub fn new(name: impl Into<String>, range: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            range: range.into(),
            element_type: None,
            multiple_references_allowed: false,
        }
    }

    pub fn with_element_type(mut self, element_type: impl Into<String>) -> Self {
        self.element_type = Some(element_type.into());
        self
    }

    pub fn with_multiple_references_allowed(mut self, value: bool) -> Self {
        self.multiple_references_allowed = value;
        self
    }
}

/// How a feature is encoded in XMI, derived from its range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureKind {
    /// A primitive value in an attribute
    Primitive,
    /// An array of primitives, either inline or referenced
    PrimitiveArray,
    /// An array of feature structures
    FsArray,
    /// A reference to another feature structure, by XMI ID
    Reference,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeDescription {
    pub name: String,
    pub supertype: Option<String>,
    pub features: Vec<FeatureDescription>,
}

impl TypeDescription {
    pub fn new(name: impl Into<String>, supertype: Option<&str>) -> Self {
        Self {
            name: name.into(),
            supertype: supertype.map(|s| s.to_string()),
            features: Vec::new(),
        }
    }

    pub fn with_feature(mut self, feature: FeatureDescription) -> Self {
        self.features.push(feature);
        self
    }

    /// Returns a feature declared directly on this type (not inherited ones)
    pub fn feature(&self, name: &str) -> Option<&FeatureDescription> {
        self.features.iter().find(|f| f.name == name)
    }
}

#[derive(Debug, Clone)]
pub struct TypeSystem {
    types: HashMap<String, TypeDescription>,
}

impl Default for TypeSystem {
    /// Returns a type system with only the built-in UIMA types
    fn default() -> Self {
        let mut typesystem = Self {
            types: HashMap::new(),
        };
        typesystem.add(TypeDescription::new(TOP, None));
        for primitive in PRIMITIVES {
            typesystem.add(TypeDescription::new(*primitive, Some(TOP)));
        }
        typesystem.add(TypeDescription::new(ARRAY_BASE, Some(TOP)));
        typesystem.add(TypeDescription::new(FS_ARRAY, Some(ARRAY_BASE)));
        for array in PRIMITIVE_ARRAYS {
            typesystem.add(TypeDescription::new(*array, Some(ARRAY_BASE)));
        }
        typesystem.add(
            TypeDescription::new(SOFA, Some(TOP))
                .with_feature(FeatureDescription::new("sofaNum", INTEGER))
                .with_feature(FeatureDescription::new("sofaID", STRING))
                .with_feature(FeatureDescription::new("mimeType", STRING))
                .with_feature(FeatureDescription::new("sofaString", STRING))
                .with_feature(FeatureDescription::new("sofaURI", STRING)),
        );
        typesystem.add(
            TypeDescription::new(ANNOTATION_BASE, Some(TOP))
                .with_feature(FeatureDescription::new("sofa", SOFA)),
        );
        typesystem.add(
            TypeDescription::new(ANNOTATION, Some(ANNOTATION_BASE))
                .with_feature(FeatureDescription::new("begin", INTEGER))
                .with_feature(FeatureDescription::new("end", INTEGER)),
        );
        typesystem.add(
            TypeDescription::new(DOCUMENT_ANNOTATION, Some(ANNOTATION))
                .with_feature(FeatureDescription::new("language", STRING)),
        );
        typesystem
    }
}

impl TypeSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a type system description from file
    pub fn from_file(filename: &str, config: &Config) -> Result<Self, CasError> {
        debug(config, || format!("TypeSystem::from_file: {}", filename));
        let xml = read_to_string(filename, config)?;
        Self::from_xml_str(&xml)
    }

    /// Parses a UIMA type system description (`<typeSystemDescription>`). Types declared in it
    /// are added to the built-in ones and override built-ins with the same name.
    pub fn from_xml_str(xml: &str) -> Result<Self, CasError> {
        let mut typesystem = Self::new();
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut path: Vec<String> = Vec::new();
        let mut current_type: Option<TypeDescription> = None;
        let mut current_feature: Option<FeatureDescription> = None;
        let mut text = String::new();
        loop {
            match reader.read_event()? {
                Event::Start(e) => {
                    let name = utf8(e.local_name().as_ref())?;
                    match name.as_str() {
                        "typeDescription" => current_type = Some(TypeDescription::new("", None)),
                        "featureDescription" => {
                            current_feature = Some(FeatureDescription::new("", ""))
                        }
                        _ => {}
                    }
                    path.push(name);
                    text.clear();
                }
                Event::Empty(e) => {
                    if e.local_name().as_ref() == b"import" {
                        tracing::warn!("type system imports are not supported, ignoring import");
                    }
                }
                Event::Text(e) => text.push_str(&e.unescape()?),
                Event::CData(e) => text.push_str(&String::from_utf8_lossy(&e.into_inner())),
                Event::End(_) => {
                    let name = path.pop().unwrap_or_default();
                    let value = text.trim();
                    match (path.last().map(|s| s.as_str()), name.as_str()) {
                        (Some("typeDescription"), "name") => {
                            if let Some(typedesc) = current_type.as_mut() {
                                typedesc.name = value.to_string();
                            }
                        }
                        (Some("typeDescription"), "supertypeName") => {
                            if let Some(typedesc) = current_type.as_mut() {
                                typedesc.supertype = Some(value.to_string());
                            }
                        }
                        (Some("featureDescription"), "name") => {
                            if let Some(feature) = current_feature.as_mut() {
                                feature.name = value.to_string();
                            }
                        }
                        (Some("featureDescription"), "rangeTypeName") => {
                            if let Some(feature) = current_feature.as_mut() {
                                feature.range = value.to_string();
                            }
                        }
                        (Some("featureDescription"), "elementType") => {
                            if let Some(feature) = current_feature.as_mut() {
                                feature.element_type = Some(value.to_string());
                            }
                        }
                        (Some("featureDescription"), "multipleReferencesAllowed") => {
                            if let Some(feature) = current_feature.as_mut() {
                                feature.multiple_references_allowed = value == "true";
                            }
                        }
                        (_, "featureDescription") => {
                            if let (Some(feature), Some(typedesc)) =
                                (current_feature.take(), current_type.as_mut())
                            {
                                if feature.name.is_empty() || feature.range.is_empty() {
                                    return Err(CasError::TypeSystemError(
                                        format!("incomplete feature on type {}", typedesc.name),
                                        "featureDescription requires a name and a rangeTypeName",
                                    ));
                                }
                                typedesc.features.push(feature);
                            }
                        }
                        (_, "typeDescription") => {
                            if let Some(typedesc) = current_type.take() {
                                if typedesc.name.is_empty() {
                                    return Err(CasError::TypeSystemError(
                                        "type without a name".to_string(),
                                        "typeDescription requires a name",
                                    ));
                                }
                                typesystem.add(typedesc);
                            }
                        }
                        _ => {}
                    }
                    text.clear();
                }
                Event::Eof => break,
                _ => {}
            }
        }
        Ok(typesystem)
    }

    /// Adds a type, replacing any existing type with the same name
    pub fn add(&mut self, typedesc: TypeDescription) -> &mut Self {
        self.types.insert(typedesc.name.clone(), typedesc);
        self
    }

    /// Builder pattern to add a type
    pub fn with_type(mut self, typedesc: TypeDescription) -> Self {
        self.add(typedesc);
        self
    }

    pub fn get(&self, name: &str) -> Option<&TypeDescription> {
        self.types.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// Returns the number of types, including built-in ones
    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Iterates over a type and all of its ancestors, nearest first
    pub fn ancestry<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        let mut current = Some(name);
        //bounded so a cyclic supertype declaration cannot loop forever
        let mut remaining = self.types.len() + 1;
        std::iter::from_fn(move || {
            let name = current.filter(|_| remaining > 0)?;
            remaining -= 1;
            current = self.types.get(name).and_then(|t| t.supertype.as_deref());
            Some(name)
        })
    }

    /// Is `name` the type `ancestor` or one of its subtypes?
    pub fn is_subtype(&self, name: &str, ancestor: &str) -> bool {
        self.ancestry(name).any(|t| t == ancestor)
    }

    /// Looks up a feature on a type, including inherited features
    pub fn feature(&self, typename: &str, feature: &str) -> Option<&FeatureDescription> {
        self.ancestry(typename)
            .filter_map(|t| self.types.get(t))
            .find_map(|t| t.feature(feature))
    }

    pub fn is_primitive(&self, name: &str) -> bool {
        PRIMITIVES.contains(&name) || self.is_subtype(name, STRING)
    }

    /// Is this an array type (primitive or feature structure arrays)?
    pub fn is_array(&self, name: &str) -> bool {
        self.is_subtype(name, ARRAY_BASE)
    }

    pub fn is_annotation(&self, name: &str) -> bool {
        self.is_subtype(name, ANNOTATION)
    }

    /// Determines how a feature is encoded, from its range type
    pub fn feature_kind(&self, feature: &FeatureDescription) -> FeatureKind {
        let range = feature.range.as_str();
        if PRIMITIVE_ARRAYS.contains(&range) {
            FeatureKind::PrimitiveArray
        } else if self.is_subtype(range, FS_ARRAY) {
            FeatureKind::FsArray
        } else if self.is_primitive(range) {
            FeatureKind::Primitive
        } else {
            FeatureKind::Reference
        }
    }
}

fn utf8(bytes: &[u8]) -> Result<String, CasError> {
    std::str::from_utf8(bytes)
        .map(|s| s.to_string())
        .map_err(|e| CasError::XmlError(e.to_string(), "element name is not valid UTF-8"))
}
