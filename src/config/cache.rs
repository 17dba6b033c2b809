//! Local cache configuration

use serde::Deserialize;
use std::path::PathBuf;

use super::error::ValidationError;

#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// JSON file holding the theme, profile and last saved selections
    #[serde(default = "default_path")]
    pub path: PathBuf,
}

impl CacheConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.path.as_os_str().is_empty() {
            return Err(ValidationError::MissingRequired("CACHE__PATH"));
        }
        Ok(())
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
        }
    }
}

fn default_path() -> PathBuf {
    PathBuf::from(".auto-compass/cache.json")
}
