/*
    casexport: token-aligned export of INCEpTION CAS XMI annotations
        by Maarten van Gompel <proycon@anaproy.nl>
        Digital Infrastucture, KNAW Humanities Cluster

        Licensed under the GNU General Public License v3
*/

//! This module contains the [`ExactSpanIndex`], which maps the exact offsets of the annotations in
//! one layer to a display string. Tokens are aligned with a layer by looking up their own offset:
//! an annotation is only attached to a token whose begin *and* end coincide with its own.
//! Annotations spanning several tokens, or only part of one, are never attached.

use std::collections::HashMap;

use crate::cas::{AnnotationSpan, Cas};
use crate::types::*;

/// Joins the values of a definition feature with `;`. Returns None if the feature is unset or
/// holds no values.
pub fn definition_string(span: &AnnotationSpan, feature: &str) -> Option<String> {
    span.strings(feature)
        .filter(|definitions| !definitions.is_empty())
        .map(|definitions| definitions.join(DEFINITION_SEPARATOR))
}

/// Maps exact `(begin, end)` offsets to a derived string. If several annotations in a layer
/// share the same offset, the last one in index order wins.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExactSpanIndex {
    map: HashMap<Offset, String>,
}

impl ExactSpanIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the index for a dictionary layer. Annotations without definitions are left out of
    /// the index entirely, so the `_` default applies at lookup time.
    pub fn dictionary(cas: &Cas, layer: Layer) -> Self {
        let mut index = Self::new();
        if let Some(feature) = layer.definition_feature() {
            for span in cas.select_layer(layer) {
                if let Some(definitions) = definition_string(&span, feature) {
                    index.insert(span.offset(), definitions);
                }
            }
        }
        index
    }

    /// Builds the index for the named entity layer. Unlike dictionary layers, every entity gets an
    /// entry: entities without a value are stored as `_` directly.
    /// Lookups behave the same either way.
    pub fn named_entities(cas: &Cas) -> Self {
        let mut index = Self::new();
        for span in cas.select_layer(Layer::NamedEntity) {
            let value = span
                .string(VALUE_FEATURE)
                .filter(|value| !value.is_empty())
                .unwrap_or(EMPTY);
            index.insert(span.offset(), value.to_string());
        }
        index
    }

    /// Builds the index appropriate for a layer (empty for the token layer itself)
    pub fn for_layer(cas: &Cas, layer: Layer) -> Self {
        match layer {
            Layer::NamedEntity => Self::named_entities(cas),
            Layer::Token => Self::new(),
            _ => Self::dictionary(cas, layer),
        }
    }

    pub fn insert(&mut self, offset: Offset, value: String) {
        self.map.insert(offset, value);
    }

    /// Returns the value for exactly this offset
    pub fn get(&self, offset: &Offset) -> Option<&str> {
        self.map.get(offset).map(|value| value.as_str())
    }

    /// Returns the value for exactly this offset, or `_`
    pub fn get_or_default(&self, offset: &Offset) -> &str {
        self.get(offset).unwrap_or(EMPTY)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
