//! Catalog data model

use serde::{Deserialize, Serialize};

/// Fallback IIIF image service used when a response carries no `config` block
pub const DEFAULT_IIIF_URL: &str = "https://www.artic.edu/iiif/2";

/// One artwork as returned by the remote catalog.
///
/// This is a read-only projection of remote state: the application never
/// edits an item, it only snapshots parts of it into a selection record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: u64,
    
    #[serde(default)]
    pub title: Option<String>,
    
    /// Creator line as the catalog formats it, possibly multi-line
    #[serde(default)]
    pub artist_display: Option<String>,
    
    #[serde(default)]
    pub place_of_origin: Option<String>,
    
    #[serde(default)]
    pub date_start: Option<i32>,
    
    /// IIIF image identifier
    #[serde(default)]
    pub image_id: Option<String>,
}

impl CatalogItem {
    /// Create an item with only an identifier and a title
    #[cfg(test)]
    pub fn new(id: u64, title: impl Into<String>) -> Self {
        Self {
            id,
            title: Some(title.into()),
            artist_display: None,
            place_of_origin: None,
            date_start: None,
            image_id: None,
        }
    }
    
    /// Set the artist display string
    #[cfg(test)]
    pub fn with_artist(mut self, artist: impl Into<String>) -> Self {
        self.artist_display = Some(artist.into());
        self
    }
    
    /// Title for display, never empty
    pub fn display_title(&self) -> &str {
        match self.title.as_deref() {
            Some(title) if !title.trim().is_empty() => title,
            _ => "Untitled",
        }
    }
    
    /// First line of the artist display string
    pub fn display_artist(&self) -> &str {
        self.artist_display
            .as_deref()
            .and_then(|artist| artist.lines().next())
            .filter(|line| !line.trim().is_empty())
            .unwrap_or("Unknown artist")
    }
    
    /// Build the thumbnail URL for this item's image, if it has one
    pub fn image_url(&self, iiif_base: &str) -> Option<String> {
        let image_id = self.image_id.as_deref().filter(|id| !id.is_empty())?;
        Some(format!(
            "{}/{}/full/843,/0/default.jpg",
            iiif_base.trim_end_matches('/'),
            image_id
        ))
    }
}

/// A single page of catalog results
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogPage {
    /// Items in the order the catalog returned them
    pub items: Vec<CatalogItem>,
    
    /// Total number of records the catalog reports for the whole listing.
    /// Live data: this may change between two requests.
    pub total_records: u64,
    
    /// IIIF base URL advertised by the response
    pub iiif_url: Option<String>,
}

impl CatalogPage {
    /// Create a page from items and a total count
    #[cfg(test)]
    pub fn new(items: Vec<CatalogItem>, total_records: u64) -> Self {
        Self {
            items,
            total_records,
            iiif_url: None,
        }
    }
    
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Number of pages needed to show `total_records` items, never less than one
pub fn total_pages(total_records: u64, page_size: u32) -> u32 {
    if page_size == 0 || total_records == 0 {
        return 1;
    }
    let pages = total_records.div_ceil(u64::from(page_size));
    u32::try_from(pages).unwrap_or(u32::MAX).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    
    #[test]
    fn test_total_pages_rounds_up() {
        assert_eq!(total_pages(10, 12), 1);
        assert_eq!(total_pages(12, 12), 1);
        assert_eq!(total_pages(13, 12), 2);
        assert_eq!(total_pages(100, 20), 5);
    }
    
    #[test]
    fn test_total_pages_minimum_one() {
        assert_eq!(total_pages(0, 12), 1);
        assert_eq!(total_pages(50, 0), 1);
    }
    
    #[test]
    fn test_item_decodes_with_missing_and_null_fields() {
        let item: CatalogItem = serde_json::from_value(serde_json::json!({
            "id": 27992,
            "title": "A Sunday on La Grande Jatte",
            "artist_display": null,
        }))
        .unwrap();
        
        assert_eq!(item.id, 27992);
        assert_eq!(item.display_title(), "A Sunday on La Grande Jatte");
        assert_eq!(item.display_artist(), "Unknown artist");
        assert!(item.date_start.is_none());
        assert!(item.image_id.is_none());
    }
    
    #[test]
    fn test_display_artist_uses_first_line() {
        let item = CatalogItem::new(1, "Nighthawks")
            .with_artist("Edward Hopper\nAmerican, 1882-1967");
        assert_eq!(item.display_artist(), "Edward Hopper");
    }
    
    #[test]
    fn test_image_url() {
        let mut item = CatalogItem::new(1, "The Bedroom");
        assert_eq!(item.image_url(DEFAULT_IIIF_URL), None);
        
        item.image_id = Some("abc-123".to_string());
        assert_eq!(
            item.image_url("https://www.artic.edu/iiif/2/").as_deref(),
            Some("https://www.artic.edu/iiif/2/abc-123/full/843,/0/default.jpg")
        );
        
        item.image_id = Some(String::new());
        assert_eq!(item.image_url(DEFAULT_IIIF_URL), None);
    }
}
