use std::time::Duration;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::{
    errors::{CatalogError, CatalogResult},
    fetcher::PageFetcher,
    types::{CatalogItem, CatalogPage},
};

/// Default API root of the Art Institute of Chicago public API
pub const DEFAULT_API_URL: &str = "https://api.artic.edu/api/v1";

/// Fields requested for every artwork; keeps payloads small
const ARTWORK_FIELDS: &str = "id,title,artist_display,place_of_origin,date_start,image_id";

/// Options for building an [`ArticClient`]
#[derive(Debug, Clone)]
pub struct ArticClientOptions {
    pub base_url: String,
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for ArticClientOptions {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(15),
            user_agent: concat!("catpick/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// HTTP client for the `/artworks` listing endpoint
#[derive(Debug, Clone)]
pub struct ArticClient {
    client: Client,
    base_url: String,
}

/// Listing response envelope
#[derive(Debug, Deserialize)]
struct ArticListResponse {
    pagination: ArticPagination,
    #[serde(default)]
    data: Vec<CatalogItem>,
    #[serde(default)]
    config: Option<ArticConfig>,
}

#[derive(Debug, Deserialize)]
struct ArticPagination {
    #[serde(default)]
    total: u64,
}

#[derive(Debug, Deserialize)]
struct ArticConfig {
    #[serde(default)]
    iiif_url: Option<String>,
}

impl ArticClient {
    /// Create a new client
    pub fn new(options: ArticClientOptions) -> CatalogResult<Self> {
        if options.base_url.trim().is_empty() {
            return Err(CatalogError::Config("catalog base URL is empty".to_string()));
        }
        
        let client = Client::builder()
            .timeout(options.timeout)
            .user_agent(options.user_agent)
            .build()?;
        
        Ok(Self {
            client,
            base_url: options.base_url.trim_end_matches('/').to_string(),
        })
    }
    
    /// URL of the artworks listing
    pub fn artworks_url(&self) -> String {
        format!("{}/artworks", self.base_url)
    }
    
    /// Decode a listing response body into a page
    fn decode_page(body: &str) -> CatalogResult<CatalogPage> {
        let response: ArticListResponse = serde_json::from_str(body)?;
        Ok(CatalogPage {
            items: response.data,
            total_records: response.pagination.total,
            iiif_url: response.config.and_then(|config| config.iiif_url),
        })
    }
}

#[async_trait]
impl PageFetcher for ArticClient {
    async fn fetch_page(&self, page: u32, limit: u32) -> CatalogResult<CatalogPage> {
        if page == 0 {
            return Err(CatalogError::InvalidPage(page));
        }
        
        let url = self.artworks_url();
        debug!("Fetching catalog page {} (limit {}) from {}", page, limit, url);
        
        let response = self
            .client
            .get(&url)
            .query(&[
                ("page", page.to_string()),
                ("limit", limit.to_string()),
                ("fields", ARTWORK_FIELDS.to_string()),
            ])
            .send()
            .await?;
        
        let status = response.status();
        let body = response.text().await?;
        
        if !status.is_success() {
            return Err(CatalogError::Status {
                status: status.as_u16(),
                body,
            });
        }
        
        let page = Self::decode_page(&body)?;
        debug!("Catalog returned {} items, {} total", page.items.len(), page.total_records);
        Ok(page)
    }
    
    fn name(&self) -> &str {
        "artic"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    
    #[test]
    fn test_decode_listing() {
        let body = json!({
            "pagination": {"total": 125, "limit": 2, "offset": 0, "total_pages": 63, "current_page": 1},
            "data": [
                {
                    "id": 111628,
                    "title": "Nighthawks",
                    "artist_display": "Edward Hopper\nAmerican, 1882–1967",
                    "place_of_origin": "United States",
                    "date_start": 1942,
                    "image_id": "831a05de-d3f6-f4fa-a460-23008dd58dda"
                },
                {"id": 16568, "title": "Water Lilies", "artist_display": null, "image_id": null}
            ],
            "config": {"iiif_url": "https://www.artic.edu/iiif/2", "website_url": "http://www.artic.edu"}
        })
        .to_string();
        
        let page = ArticClient::decode_page(&body).unwrap();
        assert_eq!(page.total_records, 125);
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[0].display_artist(), "Edward Hopper");
        assert_eq!(page.items[0].date_start, Some(1942));
        assert_eq!(page.items[1].artist_display, None);
        assert_eq!(page.iiif_url.as_deref(), Some("https://www.artic.edu/iiif/2"));
    }
    
    #[test]
    fn test_decode_listing_without_config() {
        let body = json!({"pagination": {"total": 0}, "data": []}).to_string();
        let page = ArticClient::decode_page(&body).unwrap();
        assert!(page.is_empty());
        assert_eq!(page.iiif_url, None);
    }
    
    #[test]
    fn test_decode_rejects_garbage() {
        let result = ArticClient::decode_page("<html>Bad Gateway</html>");
        assert!(matches!(result, Err(CatalogError::Json(_))));
    }
    
    #[test]
    fn test_new_rejects_empty_base_url() {
        let options = ArticClientOptions {
            base_url: "  ".to_string(),
            ..ArticClientOptions::default()
        };
        assert!(matches!(ArticClient::new(options), Err(CatalogError::Config(_))));
    }
    
    #[test]
    fn test_artworks_url_trims_trailing_slash() {
        let options = ArticClientOptions {
            base_url: "https://example.test/api/v1/".to_string(),
            ..ArticClientOptions::default()
        };
        let client = ArticClient::new(options).unwrap();
        assert_eq!(client.artworks_url(), "https://example.test/api/v1/artworks");
    }
    
    #[tokio::test]
    async fn test_page_zero_is_rejected_without_request() {
        let client = ArticClient::new(ArticClientOptions::default()).unwrap();
        let result = client.fetch_page(0, 12).await;
        assert!(matches!(result, Err(CatalogError::InvalidPage(0))));
    }
}
