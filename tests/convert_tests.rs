//! Version folder conversion tests

use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::tempdir;
use xmi_schema::config::ConverterConfig;
use xmi_schema::convert::{ConvertError, Converter, FileStatus};
use xmi_schema::export::openapi::OpenAPIExporter;
use xmi_schema::models::OpenAPIFormat;

fn xmi(classes: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<xmi:XMI xmi:version="2.1" xmlns:uml="http://schema.omg.org/spec/UML/2.1" xmlns:xmi="http://schema.omg.org/spec/XMI/2.1">
  <uml:Model xmi:type="uml:Model" name="EA_Model">
    {}
  </uml:Model>
</xmi:XMI>"#,
        classes
    )
}

const PERSON: &str = r#"<UML:Class name="Person">
  <UML:Classifier.feature>
    <UML:Attribute name="bsn">
      <UML:ModelElement.taggedValue>
        <UML:TaggedValue tag="lowerBound" value="1"/>
      </UML:ModelElement.taggedValue>
    </UML:Attribute>
  </UML:Classifier.feature>
</UML:Class>"#;

fn read_json(path: &Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

fn sequential() -> ConverterConfig {
    let mut config = ConverterConfig::default();
    config.run.parallel = false;
    config
}

#[test]
fn test_end_to_end_person() {
    let root = tempdir().unwrap();
    let folder = root.path().join("v2.1.0");
    fs::create_dir(&folder).unwrap();
    fs::write(folder.join("model.xml"), xmi(PERSON)).unwrap();

    let report = Converter::new(root.path(), ConverterConfig::default())
        .convert(Some("v2.1.0"))
        .unwrap();

    assert_eq!(report.folders.len(), 1);
    assert_eq!(report.error_count(), 0);
    let folder_report = &report.folders[0];
    assert_eq!(folder_report.processed, 1);
    assert_eq!(folder_report.schemas, 1);

    let person = read_json(&folder.join("schemas/person.json"));
    assert_eq!(person["title"], "Person");
    assert_eq!(person["required"], serde_json::json!(["bsn"]));
    assert_eq!(person["properties"]["bsn"]["type"], "string");

    let openapi = read_json(&folder.join("schemas/openapi.json"));
    assert_eq!(
        openapi["components"]["schemas"]["Person"]["$ref"],
        "schemas/person.json"
    );
    assert_eq!(openapi["info"]["version"], "2.1.0");
    assert!(openapi["components"]["schemas"]["Person"].get("properties").is_none());
}

#[test]
fn test_colliding_names_yield_distinct_files() {
    let root = tempdir().unwrap();
    let folder = root.path().join("v1");
    fs::create_dir(&folder).unwrap();
    fs::write(
        folder.join("a.xml"),
        xmi(r#"<UML:Class name="A/B"/><UML:Class name="openapi"/>"#),
    )
    .unwrap();
    fs::write(folder.join("b.xmi"), xmi(r#"<UML:Class name="A B"/>"#)).unwrap();

    let report = Converter::new(root.path(), sequential())
        .convert(Some("v1"))
        .unwrap();
    let folder_report = &report.folders[0];

    assert_eq!(folder_report.schemas, 3);
    assert_eq!(
        folder_report.record("a.xml").unwrap().schemas,
        vec!["a_b.json", "openapi_2.json"]
    );
    assert_eq!(folder_report.record("b.xmi").unwrap().schemas, vec!["a_b_2.json"]);

    let schemas = folder.join("schemas");
    assert_eq!(read_json(&schemas.join("a_b.json"))["title"], "A/B");
    assert_eq!(read_json(&schemas.join("a_b_2.json"))["title"], "A B");

    let openapi = read_json(&schemas.join("openapi.json"));
    assert_eq!(openapi["openapi"], "3.0.0");
    assert_eq!(
        openapi["components"]["schemas"]["A B"]["$ref"],
        "schemas/a_b_2.json"
    );
    assert_eq!(
        openapi["components"]["schemas"]["openapi"]["$ref"],
        "schemas/openapi_2.json"
    );
}

#[test]
fn test_reference_count_matches_schema_files() {
    let root = tempdir().unwrap();
    let folder = root.path().join("v3");
    fs::create_dir(&folder).unwrap();
    fs::write(
        folder.join("one.xml"),
        xmi(r#"<UML:Class name="Same"/><UML:Class name="Same"/><UML:Class name=""/>"#),
    )
    .unwrap();
    fs::write(folder.join("two.xml"), xmi(PERSON)).unwrap();

    let report = Converter::new(root.path(), ConverterConfig::default())
        .convert(Some("v3"))
        .unwrap();

    let schema_dir = folder.join("schemas");
    let files: Vec<_> = fs::read_dir(&schema_dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().into_string().unwrap())
        .filter(|name| name != "openapi.json")
        .collect();
    let openapi = read_json(&schema_dir.join("openapi.json"));

    assert_eq!(files.len(), 4);
    assert_eq!(report.folders[0].schemas, 4);
    assert_eq!(OpenAPIExporter::reference_count(&openapi), files.len());
    assert_eq!(
        openapi["components"]["schemas"]["Same_2"]["$ref"],
        "schemas/same_2.json"
    );
    assert_eq!(
        openapi["components"]["schemas"]["unnamed"]["$ref"],
        "schemas/unnamed.json"
    );
}

#[test]
fn test_invalid_and_malformed_files_are_skipped() {
    let root = tempdir().unwrap();
    let folder = root.path().join("v1");
    fs::create_dir(&folder).unwrap();
    fs::write(folder.join("broken.xml"), "<xmi:XMI><unclosed>").unwrap();
    fs::write(folder.join("other.xml"), "<catalog><item/></catalog>").unwrap();
    fs::write(folder.join("readme.txt"), "not an input").unwrap();

    let report = Converter::new(root.path(), ConverterConfig::default())
        .convert(Some("v1"))
        .unwrap();
    let folder_report = &report.folders[0];

    assert!(!folder_report.is_fatal());
    assert_eq!(folder_report.processed, 0);
    assert_eq!(folder_report.skipped, 2);
    assert_eq!(folder_report.schemas, 0);
    assert_eq!(
        folder_report.record("broken.xml").unwrap().status,
        FileStatus::SkippedMalformed
    );
    assert_eq!(
        folder_report.record("other.xml").unwrap().status,
        FileStatus::SkippedInvalid
    );
    assert_eq!(report.error_count(), 2);

    let openapi = read_json(&folder.join("schemas/openapi.json"));
    assert_eq!(OpenAPIExporter::reference_count(&openapi), 0);
}

#[test]
fn test_folder_without_inputs_is_fatal_for_that_folder() {
    let root = tempdir().unwrap();
    fs::create_dir(root.path().join("v1")).unwrap();
    fs::write(root.path().join("v1/notes.txt"), "nothing here").unwrap();
    fs::create_dir(root.path().join("v2")).unwrap();
    fs::write(root.path().join("v2/model.xml"), xmi(PERSON)).unwrap();

    let report = Converter::new(root.path(), ConverterConfig::default())
        .convert(None)
        .unwrap();

    assert_eq!(report.folders.len(), 2);
    assert!(matches!(
        report.folders[0].fatal,
        Some(ConvertError::NoEligibleFiles(_))
    ));
    assert!(!root.path().join("v1/schemas").exists());
    assert!(!report.folders[1].is_fatal());
    assert_eq!(report.folders[1].schemas, 1);
    assert!(report.has_fatal());
}

#[test]
fn test_missing_folder_fails_the_run() {
    let root = tempdir().unwrap();
    let converter = Converter::new(root.path(), ConverterConfig::default());

    assert!(matches!(
        converter.convert(Some("v9")),
        Err(ConvertError::FolderNotFound(_))
    ));
    assert!(matches!(
        converter.convert(Some("../v9")),
        Err(ConvertError::InvalidVersion(_))
    ));
    assert!(matches!(
        Converter::new(root.path().join("missing"), ConverterConfig::default()).convert(None),
        Err(ConvertError::FolderNotFound(_))
    ));
}

#[test]
fn test_elapsed_timeout_preserves_report() {
    let root = tempdir().unwrap();
    let folder = root.path().join("v1");
    fs::create_dir(&folder).unwrap();
    fs::write(folder.join("a.xml"), xmi(PERSON)).unwrap();
    fs::write(folder.join("b.xml"), xmi(PERSON)).unwrap();

    let mut config = sequential();
    config.run.timeout_secs = Some(0);
    let report = Converter::new(root.path(), config)
        .convert(Some("v1"))
        .unwrap();
    let folder_report = &report.folders[0];

    assert!(!folder_report.is_fatal());
    assert!(
        folder_report
            .files
            .iter()
            .all(|f| f.status == FileStatus::SkippedTimeout)
    );
    let openapi = read_json(&folder.join("schemas/openapi.json"));
    assert_eq!(OpenAPIExporter::reference_count(&openapi), 0);
}

#[test]
fn test_yaml_openapi_and_custom_prefix() {
    let root = tempdir().unwrap();
    let folder = root.path().join("v1");
    fs::create_dir(&folder).unwrap();
    fs::write(folder.join("model.xml"), xmi(PERSON)).unwrap();

    let mut config = ConverterConfig::default();
    config.output.openapi_format = OpenAPIFormat::Yaml;
    config.output.ref_prefix = "./".to_string();
    let report = Converter::new(root.path(), config)
        .convert(Some("v1"))
        .unwrap();

    let openapi_path = folder.join("schemas/openapi.yaml");
    assert_eq!(report.folders[0].openapi.as_deref(), Some(openapi_path.as_path()));
    let openapi: Value =
        serde_yaml::from_str(&fs::read_to_string(&openapi_path).unwrap()).unwrap();
    assert_eq!(
        openapi["components"]["schemas"]["Person"]["$ref"],
        "./person.json"
    );
}

#[test]
fn test_regenerate_openapi_from_schema_dir() {
    let root = tempdir().unwrap();
    let folder = root.path().join("v2.0");
    fs::create_dir(&folder).unwrap();
    fs::write(folder.join("model.xml"), xmi(PERSON)).unwrap();

    let converter = Converter::new(root.path(), ConverterConfig::default());
    converter.convert(Some("v2.0")).unwrap();

    let openapi_path = folder.join("schemas/openapi.json");
    fs::remove_file(&openapi_path).unwrap();
    fs::write(
        folder.join("schemas/extra.json"),
        r#"{"title": "Extra", "type": "object"}"#,
    )
    .unwrap();

    assert_eq!(converter.regenerate_openapi(&folder).unwrap(), openapi_path);
    let openapi = read_json(&openapi_path);
    assert_eq!(OpenAPIExporter::reference_count(&openapi), 2);
    assert_eq!(
        openapi["components"]["schemas"]["Extra"]["$ref"],
        "schemas/extra.json"
    );
    assert_eq!(openapi["info"]["version"], "2.0");
}

#[test]
fn test_windows_1252_input_is_recorded() {
    let root = tempdir().unwrap();
    let folder = root.path().join("v1");
    fs::create_dir(&folder).unwrap();
    let mut bytes = xmi(r#"<UML:Class name="Caf"#).into_bytes();
    // splice an 0xE9 byte (e acute in Windows-1252) into the class name
    let at = bytes
        .windows(3)
        .position(|w| w == b"Caf")
        .unwrap()
        + 3;
    bytes.splice(at..at, [0xE9, b'"', b'/', b'>']);
    fs::write(folder.join("cafe.xml"), bytes).unwrap();

    let report = Converter::new(root.path(), ConverterConfig::default())
        .convert(Some("v1"))
        .unwrap();
    let record = report.folders[0].record("cafe.xml").unwrap();

    assert_eq!(record.status, FileStatus::Converted);
    assert_eq!(
        record.encoding,
        Some(xmi_schema::import::SourceEncoding::Windows1252)
    );
    assert_eq!(record.schemas, vec!["caf.json"]);
    assert_eq!(read_json(&folder.join("schemas/caf.json"))["title"], "Caf\u{e9}");
}
