//! Error types for the remote catalog

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    
    #[error("Catalog request failed with status {status}: {body}")]
    Status {
        status: u16,
        body: String,
    },
    
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
    
    #[error("Invalid page number: {0} (pages are 1-based)")]
    InvalidPage(u32),
    
    #[error("Invalid configuration: {0}")]
    Config(String),
}

pub type CatalogResult<T> = Result<T, CatalogError>;
