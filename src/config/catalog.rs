//! Step catalog configuration

use serde::Deserialize;
use std::path::PathBuf;

use crate::domain::catalog::{CatalogError, StepCatalog};

/// Which option catalog the wizard renders
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogConfig {
    /// YAML catalog to use instead of the built-in one
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl CatalogConfig {
    /// Loads the configured catalog, or the built-in one when no path is set.
    pub fn load(&self) -> Result<StepCatalog, CatalogError> {
        match &self.path {
            Some(path) => StepCatalog::from_path(path),
            None => StepCatalog::embedded(),
        }
    }
}
