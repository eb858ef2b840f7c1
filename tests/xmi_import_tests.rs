//! XMI validation and import tests

use xmi_schema::import::{ImportError, XMIImporter, decode_xmi_bytes};
use xmi_schema::models::TypeRef;
use xmi_schema::validation::xmi::{XmiValidation, XmiValidationError, validate_xmi};

const EA_HEADER: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<xmi:XMI xmi:version="2.1" xmlns:uml="http://schema.omg.org/spec/UML/2.1" xmlns:xmi="http://schema.omg.org/spec/XMI/2.1">"#;

fn ea_document(body: &str) -> String {
    format!(
        "{}\n<uml:Model xmi:type=\"uml:Model\" name=\"EA_Model\">\n{}\n</uml:Model>\n</xmi:XMI>",
        EA_HEADER, body
    )
}

#[test]
fn test_validator_accepts_complete_document() {
    assert!(validate_xmi(&ea_document("")).is_valid());
}

#[test]
fn test_validator_requires_uml_namespace() {
    let xmi = r#"<xmi:XMI xmlns:xmi="http://schema.omg.org/spec/XMI/2.1">
  <uml:Model name="M"/>
</xmi:XMI>"#;
    assert_eq!(
        validate_xmi(xmi),
        XmiValidation::Invalid(XmiValidationError::MissingNamespace("uml".to_string()))
    );
}

#[test]
fn test_validator_does_not_accept_uppercase_uml_declaration() {
    let xmi = r#"<xmi:XMI xmlns:xmi="http://schema.omg.org/spec/XMI/2.1" xmlns:UML="omg.org/UML1.3">
  <uml:Model name="M"/>
</xmi:XMI>"#;
    assert_eq!(
        validate_xmi(xmi),
        XmiValidation::Invalid(XmiValidationError::MissingNamespace("uml".to_string()))
    );
    assert!(matches!(
        XMIImporter::new().import(xmi),
        Err(ImportError::XMIValidationError(XmiValidationError::MissingNamespace(_)))
    ));
}

#[test]
fn test_validator_requires_xmi_root() {
    let xmi = r#"<uml:Model xmlns:xmi="x" xmlns:uml="u" name="M"/>"#;
    assert!(matches!(
        validate_xmi(xmi),
        XmiValidation::Invalid(XmiValidationError::WrongRoot(_))
    ));
}

#[test]
fn test_validator_requires_model() {
    let xmi = r#"<xmi:XMI xmlns:xmi="x" xmlns:uml="u"><xmi:Documentation/></xmi:XMI>"#;
    assert_eq!(
        validate_xmi(xmi),
        XmiValidation::Invalid(XmiValidationError::MissingModel)
    );
}

#[test]
fn test_validator_reports_malformed_content() {
    for content in ["", "not xml at all", "<xmi:XMI xmlns:xmi=\"x\"><uml:Model></xmi:XMI>"] {
        let verdict = validate_xmi(content);
        assert!(
            verdict.error().is_some_and(XmiValidationError::is_malformed),
            "{:?} gave {:?}",
            content,
            verdict
        );
    }
}

#[test]
fn test_import_ea_class_with_tagged_values() {
    let xmi = ea_document(
        r#"<UML:Class name="Person" xmi.id="EAID_1">
  <UML:ModelElement.taggedValue>
    <UML:TaggedValue tag="documentation" value="Een natuurlijk persoon"/>
    <UML:TaggedValue tag="stereotype" value="Objecttype"/>
  </UML:ModelElement.taggedValue>
  <UML:Classifier.feature>
    <UML:Attribute name="bsn">
      <UML:ModelElement.taggedValue>
        <UML:TaggedValue tag="type" value="AN9"/>
        <UML:TaggedValue tag="lowerBound" value="1"/>
        <UML:TaggedValue tag="upperBound" value="1"/>
      </UML:ModelElement.taggedValue>
    </UML:Attribute>
    <UML:Attribute name="geboortedatum">
      <UML:StructuralFeature.type>
        <UML:Classifier name="Date"/>
      </UML:StructuralFeature.type>
      <UML:ModelElement.taggedValue>
        <UML:TaggedValue tag="lowerBound" value="0"/>
      </UML:ModelElement.taggedValue>
    </UML:Attribute>
    <UML:Attribute name="opmerking"/>
  </UML:Classifier.feature>
</UML:Class>"#,
    );

    let result = XMIImporter::new().import(&xmi).unwrap();
    assert_eq!(result.classes.len(), 1);

    let person = &result.classes[0];
    assert_eq!(person.name, "Person");
    assert_eq!(person.documentation.as_deref(), Some("Een natuurlijk persoon"));
    assert_eq!(person.tagged_values["stereotype"], "Objecttype");

    let names: Vec<&str> = person.attributes.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, vec!["bsn", "geboortedatum", "opmerking"]);

    assert_eq!(person.attributes[0].type_ref, TypeRef::Named("AN9".to_string()));
    assert!(person.attributes[0].is_required());
    assert_eq!(person.attributes[1].type_ref, TypeRef::Named("Date".to_string()));
    assert!(!person.attributes[1].is_required());
    assert_eq!(person.attributes[2].type_ref, TypeRef::Unresolved);
    assert_eq!(person.required_attributes(), vec!["bsn"]);

    assert!(
        result
            .warnings
            .iter()
            .any(|w| w.contains("Person.opmerking")),
        "unresolved type should be reported: {:?}",
        result.warnings
    );
}

#[test]
fn test_malformed_sub_elements_do_not_drop_the_class() {
    let xmi = ea_document(
        r#"<UML:Class name="Adres">
  <UML:ModelElement.taggedValue>
    <UML:TaggedValue value="no key"/>
  </UML:ModelElement.taggedValue>
  <UML:Classifier.feature>
    <UML:Attribute/>
    <UML:Attribute name="straat"/>
    <UML:Attribute name="straat"/>
    <UML:Operation name="valideer"/>
  </UML:Classifier.feature>
</UML:Class>"#,
    );

    let result = XMIImporter::new().import(&xmi).unwrap();
    let adres = &result.classes[0];
    assert_eq!(adres.name, "Adres");
    assert!(adres.tagged_values.is_empty());
    assert_eq!(adres.attributes.len(), 1);
    assert_eq!(adres.attributes[0].name, "straat");
    // tag without a key, attribute without a name, the duplicate, and the
    // unresolved type of each `straat`
    assert_eq!(result.warnings.len(), 5, "{:?}", result.warnings);
}

#[test]
fn test_import_uml2_packaged_elements() {
    let xmi = ea_document(
        r#"<packagedElement xmi:type="uml:Package" name="Kern">
  <packagedElement xmi:type="uml:PrimitiveType" xmi:id="T1" name="Integer"/>
  <packagedElement xmi:type="uml:Class" xmi:id="C1" name="Perceel">
    <ownedComment xmi:type="uml:Comment" body="Kadastraal perceel"/>
    <ownedAttribute xmi:id="A1" name="oppervlakte" type="T1">
      <lowerValue xmi:type="uml:LiteralInteger" value="1"/>
      <upperValue xmi:type="uml:LiteralUnlimitedNatural" value="1"/>
    </ownedAttribute>
    <ownedAttribute xmi:id="A2" name="eigenaren" association="AS1">
      <type xmi:idref="C2"/>
    </ownedAttribute>
    <ownedAttribute xmi:id="A3" name="codes">
      <type href="http://schema.omg.org/spec/UML/2.1/uml.xml#String"/>
      <upperValue xmi:type="uml:LiteralUnlimitedNatural" value="*"/>
    </ownedAttribute>
  </packagedElement>
</packagedElement>"#,
    );

    let result = XMIImporter::new().import(&xmi).unwrap();
    assert_eq!(result.classes.len(), 1);

    let perceel = &result.classes[0];
    assert_eq!(perceel.name, "Perceel");
    assert_eq!(perceel.documentation.as_deref(), Some("Kadastraal perceel"));
    assert_eq!(perceel.attributes.len(), 2);
    assert_eq!(
        perceel.attributes[0].type_ref,
        TypeRef::Named("Integer".to_string())
    );
    assert!(perceel.attributes[0].is_required());
    assert_eq!(
        perceel.attributes[1].type_ref,
        TypeRef::Named("String".to_string())
    );
    assert!(perceel.attributes[1].is_multi_valued());
}

#[test]
fn test_import_errors_distinguish_malformed_from_invalid() {
    let importer = XMIImporter::new();

    let malformed = importer.import("<xmi:XMI").unwrap_err();
    assert!(malformed.is_malformed());

    let invalid = importer
        .import(r#"<root xmlns:xmi="x" xmlns:uml="u"/>"#)
        .unwrap_err();
    assert!(!invalid.is_malformed());
    assert!(matches!(invalid, ImportError::XMIValidationError(_)));
}

#[test]
fn test_windows_1252_document() {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(
        br#"<xmi:XMI xmlns:xmi="x" xmlns:uml="u"><uml:Model name="M"><UML:Class name="Co"#,
    );
    bytes.push(0xF6); // o with diaeresis in Windows-1252
    bytes.extend_from_slice(br#"rdinatie"/></uml:Model></xmi:XMI>"#);

    let decoded = decode_xmi_bytes(&bytes);
    let result = XMIImporter::new().import(&decoded.text).unwrap();
    assert_eq!(result.classes[0].name, "Co\u{f6}rdinatie");
}
