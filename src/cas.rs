/*
    casexport: token-aligned export of INCEpTION CAS XMI annotations
        by Maarten van Gompel <proycon@anaproy.nl>
        Digital Infrastucture, KNAW Humanities Cluster

        Licensed under the GNU General Public License v3
*/

//! This module contains the in-memory document model: the [`Cas`] holding the base text ([`Sofa`]) and
//! all [`FeatureStructure`]s of a loaded document, and [`AnnotationSpan`], a borrowed view on one
//! indexed feature structure as returned by [`Cas::select()`].

use std::collections::HashMap;
use std::fmt;

use crate::config::{Config, Configurable};
use crate::error::CasError;
use crate::typesystem::{TypeSystem, ELEMENTS_FEATURE};
use crate::types::*;

/// A subject of analysis: the base text that annotations of a view point into.
#[derive(Debug, Clone, PartialEq)]
pub struct Sofa {
    pub(crate) xmi_id: XmiId,

    /// The sofa ID, which is also the name of the view (e.g. `_InitialView`)
    pub(crate) id: String,

    pub(crate) text: String,

    pub(crate) mimetype: Option<String>,

    /// Byte position of each unicode point in the text, plus one for the end of the text
    positions: Vec<usize>,

    /// UTF-16 position of each unicode point, plus the end. Only populated when the text contains characters outside the BMP,
    /// otherwise both units coincide
    utf16_positions: Option<Vec<usize>>,
}

impl Sofa {
    pub fn new(xmi_id: XmiId, id: impl Into<String>, text: impl Into<String>) -> Self {
        let text: String = text.into();
        let mut positions: Vec<usize> = text.char_indices().map(|(pos, _)| pos).collect();
        positions.push(text.len());
        let utf16_positions = if text.chars().any(|c| c.len_utf16() > 1) {
            let mut utf16_positions = Vec::with_capacity(positions.len());
            let mut cursor = 0;
            for c in text.chars() {
                utf16_positions.push(cursor);
                cursor += c.len_utf16();
            }
            utf16_positions.push(cursor);
            Some(utf16_positions)
        } else {
            None
        };
        Self {
            xmi_id,
            id: id.into(),
            text,
            mimetype: None,
            positions,
            utf16_positions,
        }
    }

    pub fn with_mimetype(mut self, mimetype: impl Into<String>) -> Self {
        self.mimetype = Some(mimetype.into());
        self
    }

    pub fn xmi_id(&self) -> XmiId {
        self.xmi_id
    }

    /// Returns the sofa ID (i.e. the view name)
    pub fn id(&self) -> &str {
        self.id.as_str()
    }

    pub fn text(&self) -> &str {
        self.text.as_str()
    }

    pub fn mimetype(&self) -> Option<&str> {
        self.mimetype.as_deref()
    }

    /// Returns the length of the text in unicode points
    /// For bytes, use `Self::text().len()` instead.
    pub fn textlen(&self) -> usize {
        self.positions.len() - 1
    }

    /// Returns a string reference to a slice of text as specified by the offset (in unicode points)
    pub fn text_by_offset(&self, offset: &Offset) -> Result<&str, CasError> {
        if offset.begin > offset.end {
            return Err(CasError::OffsetOutOfBounds(
                *offset,
                self.textlen(),
                "begin must not exceed end",
            ));
        }
        match (
            self.positions.get(offset.begin),
            self.positions.get(offset.end),
        ) {
            (Some(begin), Some(end)) => Ok(&self.text[*begin..*end]),
            _ => Err(CasError::OffsetOutOfBounds(
                *offset,
                self.textlen(),
                "Sofa::text_by_offset()",
            )),
        }
    }

    /// Converts a UTF-16 code unit position (as used in XMI) into a unicode point position.
    /// Returns None if the position lies beyond the text or inside a surrogate pair.
    pub fn utf16_to_charpos(&self, utf16pos: usize) -> Option<usize> {
        match &self.utf16_positions {
            Some(utf16_positions) => utf16_positions.binary_search(&utf16pos).ok(),
            None if utf16pos <= self.textlen() => Some(utf16pos),
            None => None,
        }
    }
}

/// A decoded feature value
#[derive(Debug, Clone, PartialEq)]
pub enum FeatureValue {
    /// Primitive value (string, number or boolean), kept in its serialised string form
    Primitive(String),
    /// Array of primitive values, stored inline
    Array(Strings),
    /// Reference to another feature structure
    Reference(XmiId),
    /// References to several feature structures (an inline FS array)
    References(Vec<XmiId>),
}

impl FeatureValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Primitive(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[String]> {
        match self {
            Self::Array(values) => Some(values.as_slice()),
            _ => None,
        }
    }

    pub fn as_reference(&self) -> Option<XmiId> {
        match self {
            Self::Reference(id) => Some(*id),
            _ => None,
        }
    }
}

impl From<&str> for FeatureValue {
    fn from(item: &str) -> Self {
        Self::Primitive(item.to_string())
    }
}

impl From<String> for FeatureValue {
    fn from(item: String) -> Self {
        Self::Primitive(item)
    }
}

impl From<Vec<&str>> for FeatureValue {
    fn from(items: Vec<&str>) -> Self {
        Self::Array(items.into_iter().map(|s| s.to_string()).collect())
    }
}

/// A typed record in the document; annotations are feature structures with a sofa and an offset
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureStructure {
    pub(crate) xmi_id: XmiId,
    pub(crate) typename: String,
    /// Index of the sofa in [`Cas::sofas()`], for annotations
    pub(crate) sofa: Option<usize>,
    /// Offset in unicode points, for annotations
    pub(crate) offset: Option<Offset>,
    pub(crate) features: Vec<(String, FeatureValue)>,
}

impl FeatureStructure {
    pub fn new(xmi_id: XmiId, typename: impl Into<String>) -> Self {
        Self {
            xmi_id,
            typename: typename.into(),
            sofa: None,
            offset: None,
            features: Vec::new(),
        }
    }

    pub fn xmi_id(&self) -> XmiId {
        self.xmi_id
    }

    pub fn typename(&self) -> &str {
        self.typename.as_str()
    }

    pub fn offset(&self) -> Option<Offset> {
        self.offset
    }

    pub fn feature(&self, name: &str) -> Option<&FeatureValue> {
        self.features
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    /// Iterates over all features that have a value
    pub fn features(&self) -> impl Iterator<Item = (&str, &FeatureValue)> {
        self.features
            .iter()
            .map(|(key, value)| (key.as_str(), value))
    }

    /// Sets a feature value, replacing any previous value
    pub(crate) fn set_feature(&mut self, name: String, value: FeatureValue) {
        if let Some(slot) = self.features.iter_mut().find(|(key, _)| *key == name) {
            slot.1 = value;
        } else {
            self.features.push((name, value));
        }
    }
}

/// The annotated document: a Common Analysis Structure as loaded from XMI.
/// It is immutable once loaded; queries return borrowed [`AnnotationSpan`]s.
#[derive(Debug)]
pub struct Cas {
    pub(crate) config: Config,
    pub(crate) typesystem: TypeSystem,
    pub(crate) sofas: Vec<Sofa>,
    /// Index of the sofa of the selected view
    pub(crate) view: Option<usize>,
    /// All feature structures, in document order
    pub(crate) structures: Vec<FeatureStructure>,
    pub(crate) idmap: HashMap<XmiId, usize>,
    /// Feature structures of the selected view, sorted by offset
    pub(crate) index: Vec<usize>,
}

impl Configurable for Cas {
    fn config(&self) -> &Config {
        &self.config
    }

    fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    fn set_config(&mut self, config: Config) -> &mut Self {
        self.config = config;
        self
    }
}

impl Cas {
    pub fn typesystem(&self) -> &TypeSystem {
        &self.typesystem
    }

    pub fn sofas(&self) -> &[Sofa] {
        self.sofas.as_slice()
    }

    /// Returns the sofa of the selected view, if the document has one
    pub fn sofa(&self) -> Option<&Sofa> {
        self.view.and_then(|index| self.sofas.get(index))
    }

    /// Returns the base text of the selected view (empty if the document has no sofa)
    pub fn text(&self) -> &str {
        self.sofa().map(|sofa| sofa.text()).unwrap_or("")
    }

    /// Returns a feature structure by its XMI ID
    pub fn get(&self, xmi_id: XmiId) -> Option<&FeatureStructure> {
        self.idmap
            .get(&xmi_id)
            .and_then(|index| self.structures.get(*index))
    }

    /// Returns the number of feature structures in the document (indexed or not)
    pub fn len(&self) -> usize {
        self.structures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.structures.is_empty()
    }

    /// Returns a span for any feature structure by XMI ID, indexed or not
    pub fn span(&self, xmi_id: XmiId) -> Option<AnnotationSpan<'_>> {
        self.get(xmi_id).map(|fs| AnnotationSpan { cas: self, fs })
    }

    /// Iterates over all feature structures in the selected view, ordered by begin and end offset,
    /// ties in document order
    pub fn annotations(&self) -> impl Iterator<Item = AnnotationSpan<'_>> {
        self.index.iter().map(move |index| AnnotationSpan {
            cas: self,
            fs: &self.structures[*index],
        })
    }

    /// Returns the spans of the given type (or its subtypes) in the selected view, in index order.
    /// A type without any annotations in the document simply yields nothing.
    pub fn select<'a>(&'a self, typename: &'a str) -> impl Iterator<Item = AnnotationSpan<'a>> + 'a {
        self.annotations()
            .filter(move |span| self.typesystem.is_subtype(span.typename(), typename))
    }

    /// Returns the spans of one of the exported layers
    pub fn select_layer(&self, layer: Layer) -> impl Iterator<Item = AnnotationSpan<'_>> {
        self.select(layer.type_name())
    }
}

/// A borrowed view on a feature structure in a [`Cas`], typically an annotation span with offsets
/// and covered text. References to other feature structures are resolved through the owning [`Cas`].
#[derive(Clone, Copy)]
pub struct AnnotationSpan<'cas> {
    cas: &'cas Cas,
    fs: &'cas FeatureStructure,
}

impl<'cas> fmt::Debug for AnnotationSpan<'cas> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("AnnotationSpan")
            .field("xmi_id", &self.fs.xmi_id)
            .field("typename", &self.fs.typename)
            .field("offset", &self.fs.offset)
            .finish()
    }
}

impl<'cas> PartialEq for AnnotationSpan<'cas> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.cas, other.cas) && self.fs.xmi_id == other.fs.xmi_id
    }
}

impl<'cas> AnnotationSpan<'cas> {
    pub fn xmi_id(&self) -> XmiId {
        self.fs.xmi_id
    }

    pub fn typename(&self) -> &'cas str {
        self.fs.typename.as_str()
    }

    /// Returns the underlying feature structure
    pub fn as_fs(&self) -> &'cas FeatureStructure {
        self.fs
    }

    /// Returns the offset in unicode points; feature structures that are not annotations report an empty offset at 0
    pub fn offset(&self) -> Offset {
        self.fs.offset.unwrap_or_default()
    }

    pub fn begin(&self) -> usize {
        self.offset().begin
    }

    pub fn end(&self) -> usize {
        self.offset().end
    }

    /// Returns the text covered by this annotation. Offsets are validated upon loading, so this
    /// is only empty for empty spans or feature structures that are not annotations.
    pub fn covered_text(&self) -> &'cas str {
        match (self.fs.sofa.and_then(|i| self.cas.sofas.get(i)), self.fs.offset) {
            (Some(sofa), Some(offset)) => sofa.text_by_offset(&offset).unwrap_or(""),
            _ => "",
        }
    }

    /// Returns the raw feature value, if the feature is set
    pub fn feature(&self, name: &str) -> Option<&'cas FeatureValue> {
        self.fs.feature(name)
    }

    /// Does the type system declare this feature for the span's type (set or not)?
    pub fn has_feature(&self, name: &str) -> bool {
        self.cas.typesystem.feature(self.typename(), name).is_some()
    }

    /// Returns a primitive feature value as a string
    pub fn string(&self, name: &str) -> Option<&'cas str> {
        self.feature(name).and_then(|value| value.as_str())
    }

    /// Resolves a feature referencing another feature structure
    pub fn reference(&self, name: &str) -> Option<AnnotationSpan<'cas>> {
        let xmi_id = self.feature(name)?.as_reference()?;
        self.cas.span(xmi_id)
    }

    /// Returns the values of a string array feature, whether it was serialised inline or as a
    /// separate array feature structure
    pub fn strings(&self, name: &str) -> Option<&'cas [String]> {
        match self.feature(name)? {
            FeatureValue::Array(values) => Some(values.as_slice()),
            FeatureValue::Reference(xmi_id) => self
                .cas
                .get(*xmi_id)?
                .feature(ELEMENTS_FEATURE)?
                .as_array(),
            _ => None,
        }
    }
}
