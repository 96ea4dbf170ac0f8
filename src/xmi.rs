/*
    casexport: token-aligned export of INCEpTION CAS XMI annotations
        by Maarten van Gompel <proycon@anaproy.nl>
        Digital Infrastucture, KNAW Humanities Cluster

        Licensed under the GNU General Public License v3
*/

//! This module implements loading a [`Cas`] from UIMA XMI, the interchange format INCEpTION exports.
//!
//! Parsing happens in two passes: the XML is first read into flat raw elements (one per feature
//! structure, with its attributes and inline child elements), which are then decoded against the
//! [`TypeSystem`] into [`FeatureStructure`]s. Offsets are converted from UTF-16 code units to
//! unicode points on the way.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::HashMap;

use crate::cas::{Cas, FeatureStructure, FeatureValue, Sofa};
use crate::config::Config;
use crate::error::CasError;
use crate::file::*;
use crate::typesystem::*;
use crate::types::*;

const XMI_NAMESPACE: &str = "http://www.omg.org/XMI";
const NO_NAMESPACE: &str = "http:///uima/noNamespace.ecore";
const CAS_VIEW: &str = "uima.cas.View";
const CAS_NULL: &str = "uima.cas.NULL";

/// A feature structure element as it appears in the XMI, not yet decoded
#[derive(Debug, Default)]
struct RawElement {
    typename: String,
    xmi_id: Option<XmiId>,
    attributes: Vec<(String, String)>,
    /// Inline child elements (feature name, text), used for multi-valued string features
    children: Vec<(String, String)>,
}

impl RawElement {
    fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Converts an ecore namespace URI into a UIMA package name, e.g. `http:///webanno/custom.ecore` becomes `webanno.custom`
pub(crate) fn namespace_to_package(uri: &str) -> Option<String> {
    if uri == NO_NAMESPACE {
        return None;
    }
    let path = uri.strip_prefix("http:///").unwrap_or(uri);
    let path = path.strip_suffix(".ecore").unwrap_or(path);
    Some(path.replace('/', "."))
}

fn utf8(bytes: &[u8]) -> Result<&str, CasError> {
    std::str::from_utf8(bytes)
        .map_err(|e| CasError::XmlError(e.to_string(), "XMI name is not valid UTF-8"))
}

fn parse_id(value: &str) -> Result<XmiId, CasError> {
    value.trim().parse().map_err(|_| {
        CasError::XmiError(
            format!("invalid xmi:id reference: {:?}", value),
            "expected a numeric identifier",
        )
    })
}

fn parse_ids(value: &str) -> Result<Vec<XmiId>, CasError> {
    value.split_whitespace().map(parse_id).collect()
}

fn parse_offset(value: &str) -> Result<usize, CasError> {
    value.trim().parse().map_err(|_| {
        CasError::XmiError(
            format!("invalid offset: {:?}", value),
            "expected a non-negative integer",
        )
    })
}

/// First pass: collects the raw elements directly under the XMI root
#[derive(Default)]
struct XmiReader {
    namespaces: HashMap<String, String>,
    elements: Vec<RawElement>,
    depth: usize,
    current: Option<RawElement>,
    child: Option<(String, String)>,
}

impl XmiReader {
    fn read(mut self, xml: &str) -> Result<Vec<RawElement>, CasError> {
        let mut reader = Reader::from_str(xml);
        loop {
            match reader.read_event()? {
                Event::Start(e) => self.start(&e)?,
                Event::Empty(e) => {
                    self.start(&e)?;
                    self.end();
                }
                Event::End(_) => self.end(),
                Event::Text(e) => self.text(&e.unescape()?),
                Event::CData(e) => self.text(&String::from_utf8_lossy(&e.into_inner())),
                Event::Eof => break,
                _ => {}
            }
        }
        if self.depth != 0 {
            return Err(CasError::XmlError(
                "unexpected end of document".to_string(),
                "unclosed elements",
            ));
        }
        Ok(self.elements)
    }

    fn declare_namespaces(&mut self, e: &BytesStart) -> Result<(), CasError> {
        for attrib in e.attributes() {
            let attrib = attrib?;
            let key = utf8(attrib.key.as_ref())?;
            if key == "xmlns" {
                self.namespaces
                    .insert(String::new(), attrib.unescape_value()?.into_owned());
            } else if let Some(prefix) = key.strip_prefix("xmlns:") {
                self.namespaces
                    .insert(prefix.to_string(), attrib.unescape_value()?.into_owned());
            }
        }
        Ok(())
    }

    /// Resolves a qualified element name to its namespace URI and local name
    fn resolve<'a>(&self, qname: &'a str) -> Result<(&str, &'a str), CasError> {
        let (prefix, local) = qname.split_once(':').unwrap_or(("", qname));
        match self.namespaces.get(prefix) {
            Some(uri) => Ok((uri.as_str(), local)),
            None => Err(CasError::XmiError(
                format!("undeclared namespace prefix in element {}", qname),
                "resolving element name",
            )),
        }
    }

    fn start(&mut self, e: &BytesStart) -> Result<(), CasError> {
        self.depth += 1;
        match self.depth {
            1 => {
                self.declare_namespaces(e)?;
                let name = e.name();
                let (uri, local) = self.resolve(utf8(name.as_ref())?)?;
                if uri != XMI_NAMESPACE || local != "XMI" {
                    return Err(CasError::XmiError(
                        format!("root element is {}", local),
                        "not an XMI document",
                    ));
                }
            }
            2 => {
                self.declare_namespaces(e)?;
                let name = e.name();
                let (uri, local) = self.resolve(utf8(name.as_ref())?)?;
                if uri == XMI_NAMESPACE {
                    //xmi:Extension, xmi:Documentation and the like carry no feature structures
                    return Ok(());
                }
                let typename = match namespace_to_package(uri) {
                    Some(package) => format!("{}.{}", package, local),
                    None => local.to_string(),
                };
                let mut element = RawElement {
                    typename,
                    ..Default::default()
                };
                for attrib in e.attributes() {
                    let attrib = attrib?;
                    let key = utf8(attrib.key.as_ref())?;
                    if key == "xmlns" || key.starts_with("xmlns:") {
                        continue;
                    }
                    if let Some((prefix, local)) = key.split_once(':') {
                        if local == "id"
                            && self.namespaces.get(prefix).map(|s| s.as_str()) == Some(XMI_NAMESPACE)
                        {
                            element.xmi_id = Some(parse_id(&attrib.unescape_value()?)?);
                        }
                        continue;
                    }
                    element
                        .attributes
                        .push((key.to_string(), attrib.unescape_value()?.into_owned()));
                }
                self.current = Some(element);
            }
            3 => {
                if self.current.is_some() {
                    self.child = Some((utf8(e.local_name().as_ref())?.to_string(), String::new()));
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn end(&mut self) {
        match self.depth {
            3 => {
                if let (Some(child), Some(current)) = (self.child.take(), self.current.as_mut()) {
                    current.children.push(child);
                }
            }
            2 => {
                if let Some(element) = self.current.take() {
                    self.elements.push(element);
                }
            }
            _ => {}
        }
        self.depth = self.depth.saturating_sub(1);
    }

    fn text(&mut self, text: &str) {
        if self.depth == 3 {
            if let Some((_, buffer)) = self.child.as_mut() {
                buffer.push_str(text);
            }
        }
    }
}

/// Second pass: decodes raw elements against the type system
struct CasBuilder<'a> {
    typesystem: &'a TypeSystem,
    sofas: Vec<Sofa>,
    /// Maps sofa XMI IDs to indices in `sofas`
    sofamap: HashMap<XmiId, usize>,
    /// View members per sofa XMI ID
    views: HashMap<XmiId, Vec<XmiId>>,
}

impl<'a> CasBuilder<'a> {
    fn add_sofa(&mut self, element: &RawElement) -> Result<(), CasError> {
        let xmi_id = element.xmi_id.ok_or_else(|| {
            CasError::XmiError("sofa without xmi:id".to_string(), "reading sofa")
        })?;
        let id = element.attribute("sofaID").unwrap_or("_InitialView");
        let text = match element.attribute("sofaString") {
            Some(text) => text,
            None => {
                tracing::warn!(sofa = id, "sofa has no inline sofaString, treating as empty text");
                ""
            }
        };
        let mut sofa = Sofa::new(xmi_id, id, text);
        if let Some(mimetype) = element.attribute("mimeType") {
            sofa = sofa.with_mimetype(mimetype);
        }
        self.sofamap.insert(xmi_id, self.sofas.len());
        self.sofas.push(sofa);
        Ok(())
    }

    fn add_view(&mut self, element: &RawElement) -> Result<(), CasError> {
        let sofa = parse_id(element.attribute("sofa").ok_or_else(|| {
            CasError::XmiError("view without sofa".to_string(), "reading view")
        })?)?;
        let members = parse_ids(element.attribute("members").unwrap_or(""))?;
        self.views.entry(sofa).or_default().extend(members);
        Ok(())
    }

    /// Decodes a feature structure
    fn build(&self, element: RawElement) -> Result<FeatureStructure, CasError> {
        let RawElement {
            typename,
            xmi_id,
            attributes,
            children,
        } = element;
        let xmi_id = xmi_id.ok_or_else(|| {
            CasError::XmiError(
                format!("feature structure of type {} has no xmi:id", typename),
                "reading feature structure",
            )
        })?;
        if !self.typesystem.contains(&typename) {
            return Err(CasError::UnknownType(typename, "reading XMI"));
        }
        let mut fs = FeatureStructure::new(xmi_id, typename.as_str());
        let is_array = self.typesystem.is_array(&typename);
        let is_annotation = self.typesystem.is_annotation(&typename);
        let mut begin = 0;
        let mut end = 0;

        for (key, value) in attributes {
            if is_array && key == ELEMENTS_FEATURE {
                let value = if self.typesystem.is_subtype(&typename, FS_ARRAY) {
                    FeatureValue::References(parse_ids(&value)?)
                } else {
                    FeatureValue::Array(value.split_whitespace().map(|s| s.to_string()).collect())
                };
                fs.set_feature(key, value);
                continue;
            }
            let feature = self
                .typesystem
                .feature(&typename, &key)
                .ok_or_else(|| {
                    CasError::UnknownFeature(typename.clone(), key.clone(), "reading XMI")
                })?;
            match key.as_str() {
                "begin" if is_annotation => begin = parse_offset(&value)?,
                "end" if is_annotation => end = parse_offset(&value)?,
                "sofa" if self.typesystem.is_subtype(&typename, ANNOTATION_BASE) => {
                    let sofa_id = parse_id(&value)?;
                    fs.sofa = Some(*self.sofamap.get(&sofa_id).ok_or_else(|| {
                        CasError::XmiError(
                            format!("feature structure {} refers to unknown sofa {}", xmi_id, sofa_id),
                            "resolving sofa",
                        )
                    })?);
                }
                _ => {
                    if let Some(value) = self.decode(feature, value)? {
                        fs.set_feature(key, value);
                    }
                }
            }
        }

        //inline multi-valued features, one child element per value
        let mut arrays: Vec<(String, Strings)> = Vec::new();
        for (key, value) in children {
            if !(is_array && key == ELEMENTS_FEATURE) {
                let feature = self.typesystem.feature(&typename, &key).ok_or_else(|| {
                    CasError::UnknownFeature(typename.clone(), key.clone(), "reading XMI")
                })?;
                match self.typesystem.feature_kind(feature) {
                    FeatureKind::PrimitiveArray => {}
                    FeatureKind::Primitive => {
                        fs.set_feature(key, FeatureValue::Primitive(value));
                        continue;
                    }
                    FeatureKind::FsArray | FeatureKind::Reference => {
                        return Err(CasError::XmiError(
                            format!(
                                "feature {} of type {} can not be serialised as child element",
                                key, typename
                            ),
                            "reading XMI",
                        ))
                    }
                }
            }
            match arrays.iter_mut().find(|(name, _)| *name == key) {
                Some((_, values)) => values.push(value),
                None => {
                    let mut values = Strings::new();
                    values.push(value);
                    arrays.push((key, values));
                }
            }
        }
        for (key, values) in arrays {
            fs.set_feature(key, FeatureValue::Array(values));
        }

        if is_annotation {
            fs.offset = Some(self.convert_offset(fs.sofa, begin, end)?);
        }
        Ok(fs)
    }

    /// Decodes an attribute value; returns None for null references
    fn decode(
        &self,
        feature: &FeatureDescription,
        value: String,
    ) -> Result<Option<FeatureValue>, CasError> {
        Ok(match self.typesystem.feature_kind(feature) {
            FeatureKind::Primitive => Some(FeatureValue::Primitive(value)),
            FeatureKind::PrimitiveArray if !feature.multiple_references_allowed => Some(
                FeatureValue::Array(value.split_whitespace().map(|s| s.to_string()).collect()),
            ),
            FeatureKind::FsArray if !feature.multiple_references_allowed => {
                Some(FeatureValue::References(parse_ids(&value)?))
            }
            _ => match parse_id(&value)? {
                0 => None, //cas:NULL
                xmi_id => Some(FeatureValue::Reference(xmi_id)),
            },
        })
    }

    /// Converts an offset in UTF-16 code units to unicode points and validates it against the sofa text
    fn convert_offset(
        &self,
        sofa: Option<usize>,
        begin: usize,
        end: usize,
    ) -> Result<Offset, CasError> {
        let raw = Offset::new(begin, end);
        let sofa = match sofa.and_then(|index| self.sofas.get(index)) {
            Some(sofa) => sofa,
            None => return Ok(raw),
        };
        if begin > end {
            return Err(CasError::OffsetOutOfBounds(
                raw,
                sofa.textlen(),
                "begin must not exceed end",
            ));
        }
        match (sofa.utf16_to_charpos(begin), sofa.utf16_to_charpos(end)) {
            (Some(begin), Some(end)) => Ok(Offset::new(begin, end)),
            _ => Err(CasError::OffsetOutOfBounds(
                raw,
                sofa.textlen(),
                "converting UTF-16 offset",
            )),
        }
    }
}

impl Cas {
    /// Loads a document from an XMI string, decoding it with the given type system.
    /// The view to index is taken from the configuration.
    pub fn from_xmi_str(xml: &str, typesystem: TypeSystem, config: Config) -> Result<Self, CasError> {
        let elements = XmiReader::default().read(xml)?;
        debug(&config, || {
            format!("Cas::from_xmi_str: read {} elements", elements.len())
        });

        let mut builder = CasBuilder {
            typesystem: &typesystem,
            sofas: Vec::new(),
            sofamap: HashMap::new(),
            views: HashMap::new(),
        };
        let mut pending = Vec::with_capacity(elements.len());
        for element in elements {
            match element.typename.as_str() {
                CAS_NULL => {}
                SOFA => builder.add_sofa(&element)?,
                CAS_VIEW => builder.add_view(&element)?,
                _ => pending.push(element),
            }
        }

        let mut structures = Vec::with_capacity(pending.len());
        let mut idmap = HashMap::with_capacity(pending.len());
        for element in pending {
            let fs = builder.build(element)?;
            if idmap.insert(fs.xmi_id(), structures.len()).is_some() {
                return Err(CasError::XmiError(
                    format!("duplicate xmi:id {}", fs.xmi_id()),
                    "reading XMI",
                ));
            }
            structures.push(fs);
        }

        let view = if builder.sofas.is_empty() {
            if structures.iter().any(|fs| fs.offset().is_some()) {
                tracing::warn!("document has annotations but no sofa, nothing will be indexed");
            }
            None
        } else {
            Some(
                builder
                    .sofas
                    .iter()
                    .position(|sofa| sofa.id() == config.view())
                    .ok_or_else(|| CasError::NoSuchView(config.view().to_string()))?,
            )
        };

        let mut index: Vec<usize> = Vec::new();
        if let Some(view) = view {
            let sofa_xmi_id = builder.sofas[view].xmi_id();
            match builder.views.get(&sofa_xmi_id) {
                Some(members) => {
                    for member in members {
                        match idmap.get(member) {
                            Some(position) => index.push(*position),
                            None => {
                                tracing::warn!(member, "view member refers to no feature structure")
                            }
                        }
                    }
                }
                None => {
                    //no explicit view: index everything anchored in this sofa
                    index.extend(
                        structures
                            .iter()
                            .enumerate()
                            .filter(|(_, fs)| fs.sofa == Some(view))
                            .map(|(position, _)| position),
                    );
                }
            }
        }
        //stable sort: identical offsets stay in document order, non-annotations go last
        index.sort_by_key(|position| match structures[*position].offset() {
            Some(offset) => (0, offset.begin, offset.end),
            None => (1, 0, 0),
        });

        debug(&config, || {
            format!(
                "Cas::from_xmi_str: {} feature structures, {} indexed in view {}",
                structures.len(),
                index.len(),
                config.view()
            )
        });

        let sofas = builder.sofas;
        Ok(Cas {
            config,
            typesystem,
            sofas,
            view,
            structures,
            idmap,
            index,
        })
    }

    /// Loads a document from an XMI file
    pub fn from_xmi_file(
        filename: &str,
        typesystem: TypeSystem,
        config: Config,
    ) -> Result<Self, CasError> {
        debug(&config, || format!("Cas::from_xmi_file: {}", filename));
        let xml = read_to_string(filename, &config)?;
        Self::from_xmi_str(&xml, typesystem, config)
    }

    /// Loads a type system file and then the document file it describes
    pub fn from_files(
        typesystem_file: &str,
        document_file: &str,
        config: Config,
    ) -> Result<Self, CasError> {
        let typesystem = TypeSystem::from_file(typesystem_file, &config)?;
        Self::from_xmi_file(document_file, typesystem, config)
    }

    /// Loads the type system and then the document, as named in the configuration
    pub fn from_config(config: Config) -> Result<Self, CasError> {
        let typesystem_file = config.typesystem().to_string();
        let document_file = config.document().to_string();
        Self::from_files(&typesystem_file, &document_file, config)
    }
}
