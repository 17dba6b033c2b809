//! Local cache port - non-authoritative key/value storage on the client.
//!
//! Holds the theme preference, the demographic profile and the last saved
//! step selections. The remote store stays authoritative; anything read from
//! here is reconciled against it on load.

use thiserror::Error;

/// Well-known cache keys.
pub mod keys {
    pub const THEME: &str = "theme-preference";
    pub const USER_PROFILE: &str = "userProfile";

    /// Key of the last acknowledged selection of a step.
    pub fn selection(step: crate::domain::foundation::StepName) -> String {
        format!("selection:{}", step)
    }
}

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("cache content is not valid JSON: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// String key/value store that survives page views.
pub trait LocalCache: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    fn set(&self, key: &str, value: &str) -> Result<(), CacheError>;

    fn remove(&self, key: &str) -> Result<(), CacheError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::StepName;

    #[test]
    fn local_cache_is_object_safe() {
        fn _accepts_dyn(_cache: &dyn LocalCache) {}
    }

    #[test]
    fn selection_key_names_the_step() {
        assert_eq!(keys::selection(StepName::Type), "selection:type");
    }
}
