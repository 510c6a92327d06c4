//! Hardware template catalog.
//!
//! The catalog is an external read-only JSON object mapping template names
//! to [`HardwareTemplate`] bundles. Names are kept sorted so that the index
//! a profile hashes to never depends on document order.

use crate::template::HardwareTemplate;
use mirage_identity::rolling_hash;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

pub const FALLBACK_TEMPLATE: &str = "fallback";

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Hardware catalog not found at {0}")]
    Missing(PathBuf),

    #[error("Failed to read hardware catalog: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse hardware catalog: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Hardware catalog contains no templates")]
    Empty,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HardwareCatalog {
    templates: BTreeMap<String, HardwareTemplate>,
}

impl HardwareCatalog {
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let templates: BTreeMap<String, HardwareTemplate> = serde_json::from_str(json)?;
        if templates.is_empty() {
            return Err(CatalogError::Empty);
        }
        Ok(Self { templates })
    }

    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        if !path.exists() {
            return Err(CatalogError::Missing(path.to_path_buf()));
        }
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    /// Load the catalog, degrading to the single built-in template on any failure.
    pub fn load_or_fallback(path: &Path) -> Self {
        match Self::load(path) {
            Ok(catalog) => {
                info!(
                    path = %path.display(),
                    templates = catalog.len(),
                    "Hardware catalog loaded"
                );
                catalog
            }
            Err(e) => {
                warn!(
                    path = %path.display(),
                    error = %e,
                    "Hardware catalog unavailable, using built-in fallback template"
                );
                Self::fallback()
            }
        }
    }

    pub fn fallback() -> Self {
        let mut templates = BTreeMap::new();
        templates.insert(FALLBACK_TEMPLATE.to_string(), HardwareTemplate::fallback());
        Self { templates }
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(String::as_str)
    }

    pub fn get(&self, name: &str) -> Option<&HardwareTemplate> {
        self.templates.get(name)
    }

    /// Pick the template a key hashes to: `|rolling_hash(key)| mod len`.
    pub fn select(&self, key: &str) -> (&str, &HardwareTemplate) {
        let index = rolling_hash(key).unsigned_abs() as usize % self.templates.len().max(1);
        match self.templates.iter().nth(index) {
            Some((name, template)) => (name.as_str(), template),
            // Unreachable for catalogs built through the constructors above.
            None => (FALLBACK_TEMPLATE, fallback_template()),
        }
    }
}

fn fallback_template() -> &'static HardwareTemplate {
    use std::sync::OnceLock;
    static FALLBACK: OnceLock<HardwareTemplate> = OnceLock::new();
    FALLBACK.get_or_init(HardwareTemplate::fallback)
}
