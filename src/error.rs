use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum DashError {
    #[error("invalid collection id: {0}")]
    InvalidCollectionId(String),

    #[error("failed to read label config at {0}")]
    LabelsRead(PathBuf),

    #[error("failed to parse label config: {0}")]
    LabelsParse(String),

    #[error("catalog request failed: {0}")]
    CatalogHttp(String),

    #[error("catalog returned status {status}: {message}")]
    CatalogStatus { status: u16, message: String },

    #[error("series request for {collection} failed: {message}")]
    SeriesHttp { collection: String, message: String },

    #[error("series request for {collection} returned status {status}: {message}")]
    SeriesStatus {
        collection: String,
        status: u16,
        message: String,
    },

    #[error("failed to parse series response for {collection}: {message}")]
    SeriesParse { collection: String, message: String },

    #[error("terminal error: {0}")]
    Terminal(String),
}

impl DashError {
    /// Single-line text shown in the dashboard error slot. The most recent
    /// message overwrites any prior one.
    pub fn user_message(&self) -> String {
        match self {
            DashError::CatalogHttp(_) | DashError::CatalogStatus { .. } => {
                "Failed to fetch collections".to_string()
            }
            DashError::SeriesHttp { collection, .. }
            | DashError::SeriesStatus { collection, .. }
            | DashError::SeriesParse { collection, .. } => {
                format!("Failed to fetch series data for {collection}")
            }
            other => other.to_string(),
        }
    }
}
