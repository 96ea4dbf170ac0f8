#[cfg(test)]
use crate::*;

#[cfg(test)]
use crate::xmi::namespace_to_package;

#[test]
fn offset_basics() {
    let offset = Offset::simple(2, 8);
    assert_eq!(offset.len(), 6);
    assert!(!offset.is_empty());
    assert_eq!(offset.to_string(), "2-8");
    assert!(Offset::new(0, 5) < Offset::new(0, 7));
    assert!(Offset::new(0, 7) < Offset::new(1, 2));
}

#[test]
fn layer_names() {
    assert_eq!(Layer::DictDeaf.label(), "DictDEAF");
    assert_eq!(Layer::DictDeaf.type_name(), "webanno.custom.DictDEAF");
    assert_eq!(
        Layer::DictDeaf.definition_feature(),
        Some("DictionaryDefinitionDEAF")
    );
    assert_eq!(Layer::NamedEntity.definition_feature(), None);
    assert_eq!(Layer::ALL[0], Layer::Token);
    for layer in Layer::DICTIONARIES {
        assert!(layer.definition_feature().is_some());
    }
}

#[test]
fn namespaces() {
    assert_eq!(
        namespace_to_package("http:///webanno/custom.ecore"),
        Some("webanno.custom".to_string())
    );
    assert_eq!(
        namespace_to_package("http:///de/tudarmstadt/ukp/dkpro/core/api/segmentation/type.ecore"),
        Some("de.tudarmstadt.ukp.dkpro.core.api.segmentation.type".to_string())
    );
    assert_eq!(namespace_to_package("http:///uima/noNamespace.ecore"), None);
}

#[test]
fn builtin_typesystem() {
    let typesystem = TypeSystem::new();
    assert!(typesystem.contains("uima.tcas.Annotation"));
    assert!(typesystem.is_subtype("uima.tcas.DocumentAnnotation", "uima.cas.TOP"));
    assert!(typesystem.is_subtype("uima.cas.StringArray", "uima.cas.ArrayBase"));
    assert!(!typesystem.is_subtype("uima.cas.TOP", "uima.tcas.Annotation"));
    assert!(typesystem.is_annotation("uima.tcas.DocumentAnnotation"));
    //inherited from uima.cas.AnnotationBase
    assert!(typesystem
        .feature("uima.tcas.DocumentAnnotation", "sofa")
        .is_some());
}

#[test]
fn parse_typesystem() -> Result<(), CasError> {
    let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<typeSystemDescription xmlns="http://uima.apache.org/resourceSpecifier">
  <types>
    <typeDescription>
      <name>webanno.custom.Gloss</name>
      <description/>
      <supertypeName>uima.tcas.Annotation</supertypeName>
      <features>
        <featureDescription>
          <name>Definition</name>
          <description>Glossary definitions</description>
          <rangeTypeName>uima.cas.StringArray</rangeTypeName>
          <elementType>uima.cas.String</elementType>
          <multipleReferencesAllowed>true</multipleReferencesAllowed>
        </featureDescription>
        <featureDescription>
          <name>Source</name>
          <rangeTypeName>uima.cas.String</rangeTypeName>
        </featureDescription>
        <featureDescription>
          <name>Head</name>
          <rangeTypeName>uima.tcas.Annotation</rangeTypeName>
        </featureDescription>
      </features>
    </typeDescription>
    <typeDescription>
      <name>webanno.custom.SubGloss</name>
      <supertypeName>webanno.custom.Gloss</supertypeName>
    </typeDescription>
  </types>
</typeSystemDescription>"#;
    let typesystem = TypeSystem::from_xml_str(xml)?;
    let gloss = typesystem
        .get("webanno.custom.Gloss")
        .ok_or(CasError::OtherError("type not found"))?;
    assert_eq!(gloss.supertype.as_deref(), Some("uima.tcas.Annotation"));
    assert_eq!(gloss.features.len(), 3);

    let definition = typesystem
        .feature("webanno.custom.SubGloss", "Definition")
        .ok_or(CasError::OtherError("feature not found"))?;
    assert_eq!(definition.range, "uima.cas.StringArray");
    assert_eq!(definition.element_type.as_deref(), Some("uima.cas.String"));
    assert!(definition.multiple_references_allowed);
    assert_eq!(typesystem.feature_kind(definition), FeatureKind::PrimitiveArray);

    let source = typesystem
        .feature("webanno.custom.Gloss", "Source")
        .ok_or(CasError::OtherError("feature not found"))?;
    assert_eq!(typesystem.feature_kind(source), FeatureKind::Primitive);
    let head = typesystem
        .feature("webanno.custom.Gloss", "Head")
        .ok_or(CasError::OtherError("feature not found"))?;
    assert_eq!(typesystem.feature_kind(head), FeatureKind::Reference);

    assert!(typesystem.is_annotation("webanno.custom.SubGloss"));
    assert!(typesystem.feature("webanno.custom.Gloss", "Missing").is_none());
    Ok(())
}

#[test]
fn parse_typesystem_incomplete_feature() {
    let xml = r#"<typeSystemDescription><types><typeDescription>
        <name>webanno.custom.Broken</name>
        <supertypeName>uima.tcas.Annotation</supertypeName>
        <features><featureDescription><name>x</name></featureDescription></features>
    </typeDescription></types></typeSystemDescription>"#;
    assert!(matches!(
        TypeSystem::from_xml_str(xml),
        Err(CasError::TypeSystemError(..))
    ));
}

#[test]
fn typesystem_builder() {
    let typesystem = TypeSystem::new().with_type(
        TypeDescription::new("webanno.custom.Note", Some("uima.tcas.Annotation"))
            .with_feature(FeatureDescription::new("text", "uima.cas.String")),
    );
    assert!(typesystem.is_annotation("webanno.custom.Note"));
    let ancestry: Vec<&str> = typesystem.ancestry("webanno.custom.Note").collect();
    assert_eq!(
        ancestry,
        [
            "webanno.custom.Note",
            "uima.tcas.Annotation",
            "uima.cas.AnnotationBase",
            "uima.cas.TOP"
        ]
    );
}

#[test]
fn sofa_utf16() {
    let sofa = Sofa::new(1, "_InitialView", "a😀b");
    assert_eq!(sofa.textlen(), 3);
    assert_eq!(sofa.utf16_to_charpos(0), Some(0));
    assert_eq!(sofa.utf16_to_charpos(1), Some(1));
    assert_eq!(sofa.utf16_to_charpos(2), None); //inside the surrogate pair
    assert_eq!(sofa.utf16_to_charpos(3), Some(2));
    assert_eq!(sofa.utf16_to_charpos(4), Some(3));
    assert_eq!(sofa.utf16_to_charpos(5), None);
}

#[test]
fn sofa_bmp_only() {
    let sofa = Sofa::new(1, "_InitialView", "Ünïcode");
    assert_eq!(sofa.utf16_to_charpos(7), Some(7));
    assert_eq!(sofa.utf16_to_charpos(8), None);
}

#[test]
fn sofa_text_by_offset() -> Result<(), CasError> {
    let sofa = Sofa::new(1, "_InitialView", "Hallå värld");
    assert_eq!(sofa.text_by_offset(&Offset::new(0, 5))?, "Hallå");
    assert_eq!(sofa.text_by_offset(&Offset::new(6, 11))?, "värld");
    assert!(sofa.text_by_offset(&Offset::new(6, 12)).is_err());
    assert!(sofa.text_by_offset(&Offset::new(5, 2)).is_err());
    Ok(())
}

#[test]
fn exact_span_index() {
    let mut index = ExactSpanIndex::new();
    assert!(index.is_empty());
    index.insert(Offset::new(0, 5), "greeting".to_string());
    index.insert(Offset::new(0, 5), "salutation".to_string());
    assert_eq!(index.len(), 1);
    assert_eq!(index.get(&Offset::new(0, 5)), Some("salutation"));
    assert_eq!(index.get(&Offset::new(0, 4)), None);
    assert_eq!(index.get_or_default(&Offset::new(0, 4)), "_");
}

#[test]
fn aligned_token_defaults() {
    let token = AlignedToken {
        offset: Offset::new(0, 3),
        text: "abc",
        lemma: None,
        upos: Some("NOUN"),
        xpos: None,
        deaf: None,
        hindley: Some("x;y"),
        trotter: None,
        entity: None,
    };
    assert_eq!(token.lemma_or_default(), "_");
    assert_eq!(token.upos_or_default(), "NOUN");
    assert_eq!(token.xpos_or_default(), "_");
    assert_eq!(token.layer_values(), ["_", "x;y", "_", "_"]);
}

#[test]
fn config_defaults() {
    let config = Config::default();
    assert!(!config.debug());
    assert_eq!(config.typesystem(), "typesystem.xml");
    assert_eq!(config.document(), "admin.xmi");
    assert_eq!(config.conllu_output(), "annotations_with_named_entities.conllu");
    assert_eq!(config.json_output(), "annotations_with_named_entities.json");
    assert_eq!(config.tsv_output(), "annotations_with_named_entities.tsv");
    assert_eq!(config.view(), "_InitialView");
    assert_eq!(config.json_format(), DataFormat::Json { compact: false });
    assert!(config.workdir().is_none());
}

#[test]
fn config_from_json() -> Result<(), CasError> {
    let config = Config::from_json_str(r#"{ "debug": true, "document": "other.xmi" }"#)?;
    assert!(config.debug());
    assert_eq!(config.document(), "other.xmi");
    assert_eq!(config.typesystem(), "typesystem.xml");
    Ok(())
}

#[test]
fn config_from_json_invalid() {
    let result = Config::from_json_str(r#"{ "debug": "yes" }"#);
    match result {
        Err(err @ CasError::JsonError(..)) => {
            //the error names the offending field
            assert!(err.to_string().contains("debug"), "{}", err);
        }
        other => panic!("expected JsonError, got {:?}", other),
    }
}

#[test]
fn error_display() {
    let err = CasError::NoSuchView("gold".to_string());
    assert_eq!(err.to_string(), "[CasError] NoSuchView: No view named gold");
    let message: String = (&err).into();
    assert_eq!(message, "NoSuchView: No view named gold");
}

#[test]
fn feature_values() {
    let value = FeatureValue::from("hello");
    assert_eq!(value.as_str(), Some("hello"));
    assert_eq!(value.as_array(), None);
    let value = FeatureValue::from(vec!["a", "b"]);
    assert_eq!(value.as_array().map(|a| a.len()), Some(2));
    assert_eq!(FeatureValue::Reference(5).as_reference(), Some(5));
}
