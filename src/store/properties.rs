use std::path::PathBuf;

use crate::config::Config;
use crate::error::AppResult;
use crate::models::Property;

use super::{read_json_array, write_json_array, PropertySource};

/// JSON-backed property catalog
pub struct JsonPropertyStore {
    path: PathBuf,
}

impl JsonPropertyStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.properties_path())
    }

    /// Loads all listings; a missing or empty file reads as `[]`
    pub fn load(&self) -> AppResult<Vec<Property>> {
        let properties = read_json_array(&self.path)?;
        tracing::debug!(count = properties.len(), "Loaded property catalog");
        Ok(properties)
    }

    /// Replaces the stored catalog
    pub fn save(&self, properties: &[Property]) -> AppResult<()> {
        write_json_array(&self.path, properties)?;
        tracing::info!(count = properties.len(), "Saved property catalog");
        Ok(())
    }
}

impl PropertySource for JsonPropertyStore {
    fn load_properties(&self) -> AppResult<Vec<Property>> {
        self.load()
    }
}
