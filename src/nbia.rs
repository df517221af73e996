use std::thread;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde::Deserialize;

use crate::domain::{CollectionId, SeriesBatch, SeriesRecord};
use crate::error::DashError;

pub const DEFAULT_BASE_URL: &str =
    "https://services.cancerimagingarchive.net/nbia-api/services/v1";

/// Catalog entry as returned by `getCollectionValues`.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogEntry {
    #[serde(rename = "Collection")]
    pub collection: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct SeriesEntry {
    #[serde(rename = "Modality")]
    modality: Option<String>,
    #[serde(rename = "SeriesDate")]
    series_date: Option<String>,
}

pub trait NbiaClient: Send + Sync {
    fn fetch_collections(&self) -> Result<Vec<CatalogEntry>, DashError>;
    fn fetch_series(&self, collection: &CollectionId) -> Result<Vec<SeriesRecord>, DashError>;
}

#[derive(Clone)]
pub struct NbiaHttpClient {
    client: Client,
    base_url: String,
}

impl NbiaHttpClient {
    pub fn new() -> Result<Self, DashError> {
        Self::with_base_url(DEFAULT_BASE_URL.to_string())
    }

    pub fn with_base_url(base_url: String) -> Result<Self, DashError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&format!("tcia-dash/{}", env!("CARGO_PKG_VERSION")))
                .map_err(|err| DashError::CatalogHttp(err.to_string()))?,
        );
        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|err| DashError::CatalogHttp(err.to_string()))?;
        Ok(Self { client, base_url })
    }
}

impl NbiaClient for NbiaHttpClient {
    fn fetch_collections(&self) -> Result<Vec<CatalogEntry>, DashError> {
        let url = format!("{}/getCollectionValues", self.base_url);
        tracing::debug!(%url, "nbia.request catalog");
        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|err| DashError::CatalogHttp(err.to_string()))?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response
                .text()
                .unwrap_or_else(|_| "catalog request failed".to_string());
            return Err(DashError::CatalogStatus { status, message });
        }
        let body = response
            .text()
            .map_err(|err| DashError::CatalogHttp(err.to_string()))?;
        serde_json::from_str(&body).map_err(|err| DashError::CatalogHttp(err.to_string()))
    }

    fn fetch_series(&self, collection: &CollectionId) -> Result<Vec<SeriesRecord>, DashError> {
        let url = format!("{}/getSeries", self.base_url);
        tracing::debug!(%url, collection = %collection, "nbia.request series");
        let response = self
            .client
            .get(&url)
            .query(&[("Collection", collection.as_str())])
            .send()
            .map_err(|err| DashError::SeriesHttp {
                collection: collection.to_string(),
                message: err.to_string(),
            })?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response
                .text()
                .unwrap_or_else(|_| "series request failed".to_string());
            return Err(DashError::SeriesStatus {
                collection: collection.to_string(),
                status,
                message,
            });
        }
        let body = response.text().map_err(|err| DashError::SeriesHttp {
            collection: collection.to_string(),
            message: err.to_string(),
        })?;
        let entries: Vec<SeriesEntry> =
            serde_json::from_str(&body).map_err(|err| DashError::SeriesParse {
                collection: collection.to_string(),
                message: err.to_string(),
            })?;

        let total = entries.len();
        let records: Vec<SeriesRecord> = entries
            .into_iter()
            .filter_map(|entry| {
                entry.modality.map(|modality| SeriesRecord {
                    modality,
                    series_date: entry.series_date,
                })
            })
            .collect();
        if records.len() < total {
            tracing::warn!(
                collection = %collection,
                dropped = total - records.len(),
                "series entries without a modality were dropped"
            );
        }
        Ok(records)
    }
}

/// One fetch cycle: one request per collection, issued concurrently.
/// The first failing request fails the whole cycle; there is no
/// partial-success merge and no retry; the caller re-selects to try again.
pub fn fetch_series_set<C: NbiaClient>(
    client: &C,
    collections: &[CollectionId],
) -> Result<SeriesBatch, DashError> {
    if collections.is_empty() {
        return Ok(Vec::new());
    }

    let results: Vec<Result<Vec<SeriesRecord>, DashError>> = thread::scope(|scope| {
        let handles: Vec<_> = collections
            .iter()
            .map(|collection| scope.spawn(move || client.fetch_series(collection)))
            .collect();
        handles
            .into_iter()
            .zip(collections)
            .map(|(handle, collection)| {
                handle.join().unwrap_or_else(|_| {
                    Err(DashError::SeriesHttp {
                        collection: collection.to_string(),
                        message: "fetch worker panicked".to_string(),
                    })
                })
            })
            .collect()
    });

    collections
        .iter()
        .cloned()
        .zip(results)
        .map(|(collection, result)| result.map(|records| (collection, records)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn series_entry_field_names_match_wire() {
        let entries: Vec<SeriesEntry> = serde_json::from_str(
            r#"[{"Modality":"CT","SeriesDate":"2010-01-02"},{"SeriesDate":"2011-05-06"}]"#,
        )
        .unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].modality.as_deref(), Some("CT"));
        assert_eq!(entries[0].series_date.as_deref(), Some("2010-01-02"));
        assert!(entries[1].modality.is_none());
    }

    #[test]
    fn empty_selection_fetches_nothing() {
        struct Panicking;
        impl NbiaClient for Panicking {
            fn fetch_collections(&self) -> Result<Vec<CatalogEntry>, DashError> {
                unreachable!("no catalog fetch expected")
            }
            fn fetch_series(
                &self,
                _collection: &CollectionId,
            ) -> Result<Vec<SeriesRecord>, DashError> {
                unreachable!("no series fetch expected")
            }
        }

        let batch = fetch_series_set(&Panicking, &[]).unwrap();
        assert!(batch.is_empty());
    }
}
