use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use crate::catalog::{ArticClientOptions, DEFAULT_API_URL, DEFAULT_IIIF_URL};
use crate::pagination::DEFAULT_PAGE_SIZE;
use crate::selection::DEFAULT_STORAGE_KEY;

/// Largest page the catalog API serves
pub const MAX_PAGE_SIZE: u32 = 100;

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Root of the catalog API
    pub api_base_url: String,
    
    /// Items per page
    pub page_size: u32,
    
    /// Directory holding the persisted selection and log files
    pub data_dir: PathBuf,
    
    /// Blob slot the selection is stored under
    pub storage_key: String,
    
    /// Timeout for a single catalog request
    pub request_timeout_secs: u64,
    
    /// User agent sent to the catalog
    pub user_agent: String,
    
    /// IIIF image service used when a response does not name one
    pub iiif_base_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            data_dir: default_data_dir(),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            request_timeout_secs: 15,
            user_agent: concat!("catpick/", env!("CARGO_PKG_VERSION")).to_string(),
            iiif_base_url: DEFAULT_IIIF_URL.to_string(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("catpick"))
        .unwrap_or_else(|| PathBuf::from("./data"))
}

impl Config {
    /// Data directory as known before any configuration file is read
    pub fn resolve_data_dir() -> PathBuf {
        std::env::var("CATPICK_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_data_dir())
    }
    
    /// Initialize configuration from file and environment.
    ///
    /// An explicit `path` must exist; otherwise the first of the default
    /// locations that exists is used, if any. Environment variables win.
    pub async fn init(path: Option<&Path>) -> Result<Self> {
        debug!("Initializing configuration");
        
        let mut config = match path {
            Some(path) => Self::load_from_path(path).await?,
            None => Self::load_from_file().await.unwrap_or_default(),
        };
        
        config.load_from_env();
        
        if !config.data_dir.exists() {
            std::fs::create_dir_all(&config.data_dir)?;
        }
        
        Ok(config)
    }
    
    /// Apply `CATPICK_*` environment variables
    pub fn load_from_env(&mut self) {
        if let Ok(url) = std::env::var("CATPICK_API_URL") {
            self.api_base_url = url;
        }
        
        if let Ok(page_size) = std::env::var("CATPICK_PAGE_SIZE") {
            if let Ok(page_size) = page_size.parse() {
                self.page_size = page_size;
            }
        }
        
        if let Ok(data_dir) = std::env::var("CATPICK_DATA_DIR") {
            self.data_dir = PathBuf::from(data_dir);
        }
        
        if let Ok(key) = std::env::var("CATPICK_STORAGE_KEY") {
            self.storage_key = key;
        }
        
        if let Ok(timeout) = std::env::var("CATPICK_TIMEOUT_SECS") {
            if let Ok(timeout) = timeout.parse() {
                self.request_timeout_secs = timeout;
            }
        }
        
        if let Ok(user_agent) = std::env::var("CATPICK_USER_AGENT") {
            self.user_agent = user_agent;
        }
    }
    
    /// Load configuration from the first catpick.json found
    pub async fn load_from_file() -> Result<Self> {
        // Priority:
        // 1. ./.catpick.json
        // 2. ./catpick.json
        // 3. $CONFIG_DIR/catpick/catpick.json
        let mut config_paths = vec![
            PathBuf::from("./.catpick.json"),
            PathBuf::from("./catpick.json"),
        ];
        
        if let Some(config_dir) = dirs::config_dir() {
            config_paths.push(config_dir.join("catpick").join("catpick.json"));
        }
        
        for path in config_paths {
            if path.exists() {
                return Self::load_from_path(&path).await;
            }
        }
        
        Err(anyhow::anyhow!("No configuration file found"))
    }
    
    /// Load configuration from a specific file
    pub async fn load_from_path(path: &Path) -> Result<Self> {
        debug!("Loading configuration from: {}", path.display());
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path.display(), e))?;
        let config: Self = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Invalid configuration in {}: {}", path.display(), e))?;
        Ok(config)
    }
    
    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.api_base_url.trim().is_empty() {
            return Err(anyhow::anyhow!("api_base_url must not be empty"));
        }
        
        if !self.api_base_url.starts_with("http://") && !self.api_base_url.starts_with("https://") {
            return Err(anyhow::anyhow!("api_base_url must be an http(s) URL, got {}", self.api_base_url));
        }
        
        if self.page_size == 0 || self.page_size > MAX_PAGE_SIZE {
            return Err(anyhow::anyhow!("page_size must be between 1 and {}", MAX_PAGE_SIZE));
        }
        
        if self.storage_key.trim().is_empty() {
            return Err(anyhow::anyhow!("storage_key must not be empty"));
        }
        
        if self.request_timeout_secs == 0 {
            return Err(anyhow::anyhow!("request_timeout_secs must be greater than 0"));
        }
        
        Ok(())
    }
    
    /// Options for the catalog HTTP client
    pub fn client_options(&self) -> ArticClientOptions {
        ArticClientOptions {
            base_url: self.api_base_url.clone(),
            timeout: Duration::from_secs(self.request_timeout_secs),
            user_agent: self.user_agent.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    
    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert_eq!(config.page_size, 12);
        assert_eq!(config.storage_key, "selected_artworks");
        assert!(config.validate().is_ok());
    }
    
    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.page_size = 0;
        assert!(config.validate().is_err());
        
        config.page_size = 101;
        assert!(config.validate().is_err());
        
        let mut config = Config::default();
        config.api_base_url = "ftp://example".to_string();
        assert!(config.validate().is_err());
        
        let mut config = Config::default();
        config.storage_key = " ".to_string();
        assert!(config.validate().is_err());
    }
    
    #[tokio::test]
    async fn test_partial_file_keeps_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("catpick.json");
        std::fs::write(&path, r#"{"page_size": 24, "storage_key": "picks"}"#).unwrap();
        
        let config = Config::load_from_path(&path).await.unwrap();
        assert_eq!(config.page_size, 24);
        assert_eq!(config.storage_key, "picks");
        assert_eq!(config.api_base_url, DEFAULT_API_URL);
    }
    
    #[tokio::test]
    async fn test_malformed_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("catpick.json");
        std::fs::write(&path, "page_size = 24").unwrap();
        
        assert!(Config::load_from_path(&path).await.is_err());
    }
    
    #[test]
    fn test_client_options() {
        let mut config = Config::default();
        config.request_timeout_secs = 3;
        let options = config.client_options();
        assert_eq!(options.timeout, Duration::from_secs(3));
        assert_eq!(options.base_url, DEFAULT_API_URL);
    }
}
