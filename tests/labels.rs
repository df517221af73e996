use assert_matches::assert_matches;

use tcia_dash::error::DashError;
use tcia_dash::labels::Labels;

#[test]
fn explicit_config_overrides_the_built_in_tables() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("labels.json");
    std::fs::write(
        &path,
        r#"{
            "schema_version": 1,
            "catalog_marker": "CPTAC",
            "collections": { "GBM": "Glioblastoma" },
            "modalities": { "CT": "Computed Tomography" }
        }"#,
    )
    .unwrap();

    let labels = Labels::resolve(path.to_str()).unwrap();
    assert_eq!(labels.catalog_marker, "CPTAC");
    assert_eq!(labels.collection_label("CPTAC-GBM"), "Glioblastoma");
    assert_eq!(labels.modality_label("CT"), "Computed Tomography");
    assert_eq!(labels.modality_label("MR"), "Unknown Modality");
}

#[test]
fn missing_explicit_config_is_an_error() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("absent.json");
    let err = Labels::resolve(path.to_str()).unwrap_err();
    assert_matches!(err, DashError::LabelsRead(_));
}

#[test]
fn malformed_config_is_an_error() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("labels.json");
    std::fs::write(&path, "{ not json").unwrap();
    let err = Labels::resolve(path.to_str()).unwrap_err();
    assert_matches!(err, DashError::LabelsParse(_));
}

#[test]
fn partial_config_fills_missing_fields_with_defaults() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("labels.json");
    std::fs::write(&path, r#"{ "collections": { "BRCA": "Breast" } }"#).unwrap();

    let labels = Labels::resolve(path.to_str()).unwrap();
    assert_eq!(labels.catalog_marker, "TCGA");
    assert_eq!(labels.collection_label("TCGA-BRCA"), "Breast");
    // tables not present in the file are empty, not merged
    assert_eq!(labels.collection_label("TCGA-LUAD"), "TCGA-LUAD");
}
