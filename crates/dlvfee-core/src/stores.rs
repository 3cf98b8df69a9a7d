use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::fee::DeliveryFeePolicy;
use crate::geo::Coordinate;
use crate::settings::DeliverySettings;
use crate::ConfigError;

/// One store and the delivery policy its merchant configured.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub name: String,
    pub location: Coordinate,
    pub delivery: DeliverySettings,
    #[serde(default)]
    pub notes: Option<String>,
}

impl StoreConfig {
    /// Generate a URL-safe slug from the store name.
    #[must_use]
    pub fn slug(&self) -> String {
        self.name
            .to_lowercase()
            .chars()
            .filter_map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' {
                    Some(c)
                } else if c.is_whitespace() {
                    Some('-')
                } else {
                    None
                }
            })
            .collect::<String>()
            .split('-')
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("-")
    }

    #[must_use]
    pub fn policy(&self) -> DeliveryFeePolicy {
        DeliveryFeePolicy::new(self.delivery.clone())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoresFile {
    pub stores: Vec<StoreConfig>,
}

impl StoresFile {
    /// Look up a store by its slug.
    #[must_use]
    pub fn find(&self, slug: &str) -> Option<&StoreConfig> {
        self.stores.iter().find(|s| s.slug() == slug)
    }
}

/// Load and validate the store registry from a YAML file.
///
/// Coordinates and delivery settings are validated while parsing, so a
/// malformed tier list or an out-of-range location surfaces as
/// [`ConfigError::StoresFileParse`].
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_stores(path: &Path) -> Result<StoresFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::StoresFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let stores_file: StoresFile = serde_yaml::from_str(&content)?;

    validate_stores(&stores_file)?;

    tracing::info!(
        path = %path.display(),
        count = stores_file.stores.len(),
        "loaded store registry"
    );
    Ok(stores_file)
}

fn validate_stores(stores_file: &StoresFile) -> Result<(), ConfigError> {
    let mut seen_names = HashSet::new();
    let mut seen_slugs = HashSet::new();

    for store in &stores_file.stores {
        if store.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "store name must be non-empty".to_string(),
            ));
        }

        if !seen_names.insert(store.name.trim().to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate store name: '{}'",
                store.name
            )));
        }

        let slug = store.slug();
        if slug.is_empty() {
            return Err(ConfigError::Validation(format!(
                "store '{}' has no ASCII letters or digits to build a slug from",
                store.name
            )));
        }
        if !seen_slugs.insert(slug.clone()) {
            return Err(ConfigError::Validation(format!(
                "duplicate store slug: '{}' (from store '{}')",
                slug, store.name
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "stores_test.rs"]
mod tests;
