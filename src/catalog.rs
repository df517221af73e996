use crate::domain::Collection;
use crate::error::DashError;
use crate::labels::Labels;
use crate::nbia::NbiaClient;

/// Fetch the catalog once at startup, keep entries whose code contains the
/// configured marker, and attach display labels. Order is the API's order.
pub fn load_catalog<C: NbiaClient>(
    client: &C,
    labels: &Labels,
) -> Result<Vec<Collection>, DashError> {
    let entries = client.fetch_collections()?;
    let mut collections = Vec::new();
    for entry in entries {
        let Some(code) = entry.collection else {
            continue;
        };
        if !code.contains(&labels.catalog_marker) {
            continue;
        }
        // Codes arriving from the catalog are trusted less than user input;
        // a malformed one is skipped rather than failing the whole load.
        let Ok(id) = code.parse() else {
            tracing::warn!(code, "skipping malformed catalog entry");
            continue;
        };
        collections.push(Collection {
            display_label: labels.collection_label(&code),
            id,
        });
    }
    Ok(collections)
}
