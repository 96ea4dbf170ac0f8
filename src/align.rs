/*
    casexport: token-aligned export of INCEpTION CAS XMI annotations
        by Maarten van Gompel <proycon@anaproy.nl>
        Digital Infrastucture, KNAW Humanities Cluster

        Licensed under the GNU General Public License v3
*/

use crate::cas::{AnnotationSpan, Cas};
use crate::index::ExactSpanIndex;
use crate::types::*;

/// Returns the lemma of a token, via its referenced lemma annotation
pub fn lemma_of<'a>(token: &AnnotationSpan<'a>) -> Option<&'a str> {
    token
        .reference(LEMMA_FEATURE)
        .and_then(|lemma| lemma.string(VALUE_FEATURE))
}

/// Returns the coarse and fine part-of-speech tags of a token, via its referenced POS annotation
pub fn pos_of<'a>(token: &AnnotationSpan<'a>) -> (Option<&'a str>, Option<&'a str>) {
    match token.reference(POS_FEATURE) {
        Some(pos) => (pos.string(COARSE_POS_FEATURE), pos.string(FINE_POS_FEATURE)),
        None => (None, None),
    }
}

/// One token with the values of all other layers aligned to it. Absent values are None; the
/// tabular exporters render them as `_`.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedToken<'a> {
    pub offset: Offset,
    pub text: &'a str,
    pub lemma: Option<&'a str>,
    /// Coarse part-of-speech tag
    pub upos: Option<&'a str>,
    /// Fine-grained part-of-speech tag
    pub xpos: Option<&'a str>,
    pub deaf: Option<&'a str>,
    pub hindley: Option<&'a str>,
    pub trotter: Option<&'a str>,
    pub entity: Option<&'a str>,
}

impl<'a> AlignedToken<'a> {
    pub fn lemma_or_default(&self) -> &'a str {
        self.lemma.unwrap_or(EMPTY)
    }

    pub fn upos_or_default(&self) -> &'a str {
        self.upos.unwrap_or(EMPTY)
    }

    pub fn xpos_or_default(&self) -> &'a str {
        self.xpos.unwrap_or(EMPTY)
    }

    /// The four aligned layer values (DEAF, Hindley, Trotter, named entity), `_` when absent
    pub fn layer_values(&self) -> [&'a str; 4] {
        [
            self.deaf.unwrap_or(EMPTY),
            self.hindley.unwrap_or(EMPTY),
            self.trotter.unwrap_or(EMPTY),
            self.entity.unwrap_or(EMPTY),
        ]
    }
}

/// Holds the offset indices of all non-token layers for one export run and aligns tokens with them.
/// Build one per export; it borrows the document and is discarded afterwards.
#[derive(Debug)]
pub struct TokenAligner<'cas> {
    cas: &'cas Cas,
    deaf: ExactSpanIndex,
    hindley: ExactSpanIndex,
    trotter: ExactSpanIndex,
    entities: ExactSpanIndex,
}

impl<'cas> TokenAligner<'cas> {
    pub fn new(cas: &'cas Cas) -> Self {
        Self {
            cas,
            deaf: ExactSpanIndex::for_layer(cas, Layer::DictDeaf),
            hindley: ExactSpanIndex::for_layer(cas, Layer::DictHindley),
            trotter: ExactSpanIndex::for_layer(cas, Layer::TrotterGlossary),
            entities: ExactSpanIndex::for_layer(cas, Layer::NamedEntity),
        }
    }

    /// Returns the index for a layer
    pub fn index(&self, layer: Layer) -> Option<&ExactSpanIndex> {
        match layer {
            Layer::DictDeaf => Some(&self.deaf),
            Layer::DictHindley => Some(&self.hindley),
            Layer::TrotterGlossary => Some(&self.trotter),
            Layer::NamedEntity => Some(&self.entities),
            Layer::Token => None,
        }
    }

    /// Aligns a single token
    pub fn align<'a>(&'a self, token: &AnnotationSpan<'a>) -> AlignedToken<'a> {
        let offset = token.offset();
        let (upos, xpos) = pos_of(token);
        AlignedToken {
            offset,
            text: token.covered_text(),
            lemma: lemma_of(token),
            upos,
            xpos,
            deaf: self.deaf.get(&offset),
            hindley: self.hindley.get(&offset),
            trotter: self.trotter.get(&offset),
            entity: self.entities.get(&offset),
        }
    }

    /// Iterates over all tokens, in document index order, aligned with the other layers
    pub fn tokens<'a>(&'a self) -> impl Iterator<Item = AlignedToken<'a>> + 'a {
        let aligner: &'a TokenAligner<'a> = self;
        aligner
            .cas
            .select_layer(Layer::Token)
            .map(move |token| aligner.align(&token))
    }
}
