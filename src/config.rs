use serde::Deserialize;
use std::path::PathBuf;

/// Application configuration loaded from environment variables
///
/// Created once at process start and treated as immutable thereafter; the
/// stores and the scoring engine take their file locations from it instead
/// of reaching for ambient globals.
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Directory holding the flat-file data stores
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Default number of properties returned per top-matches call
    #[serde(default = "default_top_n")]
    pub top_n: usize,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_top_n() -> usize {
    5
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            top_n: default_top_n(),
        }
    }
}

impl Config {
    /// Load configuration from `STAYMATCH_`-prefixed environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::prefixed("STAYMATCH_")
            .from_env::<Config>()
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// Configuration rooted at an explicit data directory
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Self::default()
        }
    }

    pub fn properties_path(&self) -> PathBuf {
        self.data_dir.join("properties.json")
    }

    pub fn interactions_path(&self) -> PathBuf {
        self.data_dir.join("interactions.json")
    }

    pub fn users_path(&self) -> PathBuf {
        self.data_dir.join("users.json")
    }

    pub fn records_path(&self) -> PathBuf {
        self.data_dir.join("records.json")
    }
}
