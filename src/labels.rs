use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::DashError;

pub const DEFAULT_LABELS_FILE: &str = "tcia-dash.json";

/// Label tables are versioned configuration data, not logic: the dashboard
/// ships the dictionaries it was built against and an operator can override
/// them with a `tcia-dash.json` next to the binary.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Labels {
    #[serde(default)]
    pub schema_version: Option<u32>,
    /// Substring a catalog code must contain to appear in the dashboard.
    #[serde(default = "default_catalog_marker")]
    pub catalog_marker: String,
    #[serde(default)]
    pub collections: BTreeMap<String, String>,
    #[serde(default)]
    pub modalities: BTreeMap<String, String>,
}

fn default_catalog_marker() -> String {
    "TCGA".to_string()
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            schema_version: Some(1),
            catalog_marker: default_catalog_marker(),
            collections: default_collection_labels(),
            modalities: default_modality_labels(),
        }
    }
}

impl Labels {
    /// Resolve label config. An explicit path must exist; the implicit
    /// `tcia-dash.json` is optional and its absence yields the built-in
    /// tables.
    pub fn resolve(path: Option<&str>) -> Result<Self, DashError> {
        let labels_path = match path {
            Some(path) => PathBuf::from(path),
            None => PathBuf::from(DEFAULT_LABELS_FILE),
        };

        if path.is_none() && !labels_path.exists() {
            return Ok(Self::default());
        }

        let content =
            fs::read_to_string(&labels_path).map_err(|_| DashError::LabelsRead(labels_path))?;
        let labels: Labels =
            serde_json::from_str(&content).map_err(|err| DashError::LabelsParse(err.to_string()))?;
        Ok(labels)
    }

    /// Display name for a collection code. Mappings are keyed by the code
    /// with the marker prefix stripped (`TCGA-BRCA` -> `BRCA`), matching
    /// the upstream dictionary; unmapped codes fall back to the raw code.
    pub fn collection_label(&self, code: &str) -> String {
        let key = code
            .strip_prefix(&format!("{}-", self.catalog_marker))
            .unwrap_or(code);
        self.collections
            .get(key)
            .cloned()
            .unwrap_or_else(|| code.to_string())
    }

    pub fn modality_label(&self, code: &str) -> String {
        self.modalities
            .get(code)
            .cloned()
            .unwrap_or_else(|| "Unknown Modality".to_string())
    }
}

fn default_collection_labels() -> BTreeMap<String, String> {
    [
        ("BLCA", "Bladder Carcinoma"),
        ("BRCA", "Breast Carcinoma"),
        (
            "CESC",
            "Cervical Squamous Cell Carcinoma and Endocervical Adenocarcinoma",
        ),
        ("COAD", "Colon Adenocarcinoma"),
        ("ESCA", "Esophageal Carcinoma"),
        ("KICH", "Kidney Chromophobe"),
        ("KIRC", "Kidney Renal Clear Cell Carcinoma"),
        ("KIRP", "Kidney Renal Papillary Cell Carcinoma"),
        ("LIHC", "Liver Hepatocellular Carcinoma"),
        ("LUAD", "Lung Adenocarcinoma"),
        ("LUSC", "Lung Squamous Cell Carcinoma"),
        ("OV", "Ovarian Serous Cystadenocarcinoma"),
        ("PRAD", "Prostate Adenocarcinoma"),
        ("READ", "Rectum Adenocarcinoma"),
        ("SARC", "Sarcoma"),
        ("STAD", "Stomach Adenocarcinoma"),
        ("THCA", "Thyroid Carcinoma"),
        ("UCEC", "Uterine Corpus Endometrial Carcinoma"),
    ]
    .into_iter()
    .map(|(code, label)| (code.to_string(), label.to_string()))
    .collect()
}

fn default_modality_labels() -> BTreeMap<String, String> {
    [
        ("CR", "Computed Radiography"),
        ("CT", "Computed Tomography"),
        ("DX", "Digital Radiography"),
        ("KO", "Unknown Modality"),
        ("MG", "Mammography"),
        ("MR", "Magnetic Resonance Imaging"),
        ("NM", "Nuclear Medicine"),
        ("OT", "Other Modality"),
        ("PT", "Positron Emission Tomography"),
        ("SR", "Structured Report"),
        ("US", "Ultrasound"),
    ]
    .into_iter()
    .map(|(code, label)| (code.to_string(), label.to_string()))
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_tables_cover_known_codes() {
        let labels = Labels::default();
        assert_eq!(labels.collection_label("TCGA-BRCA"), "Breast Carcinoma");
        assert_eq!(labels.modality_label("MR"), "Magnetic Resonance Imaging");
    }

    #[test]
    fn unmapped_codes_fall_back() {
        let labels = Labels::default();
        assert_eq!(labels.collection_label("TCGA-XXXX"), "TCGA-XXXX");
        assert_eq!(labels.modality_label("ZZ"), "Unknown Modality");
    }
}
