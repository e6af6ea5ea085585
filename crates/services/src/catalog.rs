use reqwest::Client;
use serde::Deserialize;
use url::Url;

use drill_core::model::{CatalogEntry, CatalogItem};

use crate::error::CatalogError;

/// Wire shape of the catalog endpoint: a JSON object whose `images` field
/// holds the ordered entries. The field defaults so a missing array decodes
/// as an empty catalog, which the quiz loop then refuses to start on.
#[derive(Debug, Deserialize)]
struct CatalogDocument {
    #[serde(default)]
    images: Vec<CatalogEntry>,
}

/// Fetches and normalizes the remote reference catalog.
///
/// One GET, no retry: a failed or malformed response is a terminal load
/// error for the caller to display.
#[derive(Clone)]
pub struct CatalogService {
    client: Client,
    catalog_url: Url,
}

impl CatalogService {
    #[must_use]
    pub fn new(catalog_url: Url) -> Self {
        Self {
            client: Client::new(),
            catalog_url,
        }
    }

    #[must_use]
    pub fn catalog_url(&self) -> &Url {
        &self.catalog_url
    }

    /// Fetch the catalog and normalize every entry.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::HttpStatus` for a non-success status,
    /// `CatalogError::Http` for transport failures, and
    /// `CatalogError::Decode` for malformed JSON. No partial dataset is ever
    /// returned.
    pub async fn fetch(&self) -> Result<Vec<CatalogItem>, CatalogError> {
        let response = self.client.get(self.catalog_url.clone()).send().await?;

        if !response.status().is_success() {
            return Err(CatalogError::HttpStatus(response.status()));
        }

        let body = response.text().await?;
        let document: CatalogDocument = serde_json::from_str(&body)?;

        let items: Vec<CatalogItem> = document
            .images
            .into_iter()
            .map(CatalogItem::from_entry)
            .collect();
        tracing::info!(count = items.len(), "catalog loaded");
        Ok(items)
    }
}

// ─── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use drill_core::model::Category;

    #[test]
    fn document_decodes_entries_in_order() {
        let json = r#"{
            "images": [
                {"folder": "Se4w5", "file": "a.jpg", "title": "First"},
                {"folder": "So9", "file": "b.jpg", "title": "Second"}
            ]
        }"#;
        let document: CatalogDocument = serde_json::from_str(json).unwrap();
        let items: Vec<CatalogItem> = document
            .images
            .into_iter()
            .map(CatalogItem::from_entry)
            .collect();

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].category, Category::new(4));
        assert_eq!(items[0].title, "First");
        assert_eq!(items[1].wing, None);
    }

    #[test]
    fn missing_images_field_decodes_as_empty_catalog() {
        let document: CatalogDocument = serde_json::from_str(r#"{"version": 3}"#).unwrap();
        assert!(document.images.is_empty());
    }

    #[test]
    fn malformed_json_is_a_decode_error() {
        let err = serde_json::from_str::<CatalogDocument>("{not json").unwrap_err();
        let err = CatalogError::from(err);
        assert!(matches!(err, CatalogError::Decode(_)));
    }
}
