//! Loading the canonical catalog from disk.

use std::path::Path;

use parisa_core::Catalog;
use thiserror::Error;

/// Errors loading the catalog file.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse catalog {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode catalog: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Read a grouped catalog file (`{"<collection>": [products...]}`).
///
/// # Errors
///
/// Returns `CatalogError` if the file cannot be read or is not a grouped catalog.
pub async fn load_catalog(path: &Path) -> Result<Catalog, CatalogError> {
    let path_str = path.display().to_string();

    let json = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| CatalogError::Io {
            path: path_str.clone(),
            source,
        })?;

    let catalog = Catalog::from_grouped_json(&json).map_err(|source| CatalogError::Parse {
        path: path_str.clone(),
        source,
    })?;

    tracing::info!(path = %path_str, products = catalog.len(), "Catalog loaded");
    Ok(catalog)
}
