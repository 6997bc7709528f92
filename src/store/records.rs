use std::path::PathBuf;

use crate::config::Config;
use crate::error::AppResult;
use crate::models::SnapshotRecord;

use super::{read_json_array, write_json_array, SnapshotSink};

/// Persisted top-N result snapshot
///
/// Holds the most recently computed, already truncated result list for the
/// front end. Overwritten wholesale on every scoring call.
pub struct JsonSnapshotStore {
    path: PathBuf,
}

impl JsonSnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.records_path())
    }

    /// The last persisted result list; `[]` when nothing has been written
    pub fn load(&self) -> AppResult<Vec<SnapshotRecord>> {
        read_json_array(&self.path)
    }
}

impl SnapshotSink for JsonSnapshotStore {
    fn save(&self, records: &[SnapshotRecord]) -> AppResult<()> {
        write_json_array(&self.path, records)?;
        tracing::info!(count = records.len(), "Saved top-matches snapshot");
        Ok(())
    }
}
