//! Flat-file data stores and the collaborator seams the scoring engine
//! depends on.
//!
//! Each store owns a single JSON array file. Loads follow an
//! empty-on-missing contract: an absent or empty file reads as `[]` and is
//! never an error, while malformed JSON surfaces as a serialization error.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io;
use std::path::Path;

use crate::error::AppResult;
use crate::models::{InteractionEvent, Property, SnapshotRecord};

pub mod interactions;
pub mod properties;
pub mod records;
pub mod users;

pub use interactions::JsonInteractionStore;
pub use properties::JsonPropertyStore;
pub use records::JsonSnapshotStore;
pub use users::JsonUserStore;

#[cfg(test)]
use mockall::automock;

/// Read-only provider of the property catalog
#[cfg_attr(test, automock)]
pub trait PropertySource: Send + Sync {
    /// Loads every listing; idempotent, `[]` when no data exists
    fn load_properties(&self) -> AppResult<Vec<Property>>;
}

/// Read-only provider of the interaction history
#[cfg_attr(test, automock)]
pub trait InteractionSource: Send + Sync {
    /// Loads every recorded event; idempotent, `[]` when no data exists
    fn load_interactions(&self) -> AppResult<Vec<InteractionEvent>>;
}

/// Writer for the persisted top-N result snapshot
#[cfg_attr(test, automock)]
pub trait SnapshotSink: Send + Sync {
    /// Overwrites the snapshot wholesale with the given ordered records.
    ///
    /// The snapshot is not keyed by user: concurrent callers targeting the
    /// same sink get last-writer-wins with no ordering guarantee. Callers
    /// needing per-user isolation must key sinks by user or serialize calls.
    fn save(&self, records: &[SnapshotRecord]) -> AppResult<()>;
}

/// Reads a JSON array file, treating a missing or empty file as `[]`
fn read_json_array<T: DeserializeOwned>(path: &Path) -> AppResult<Vec<T>> {
    match fs::read_to_string(path) {
        Ok(contents) if contents.trim().is_empty() => Ok(Vec::new()),
        Ok(contents) => Ok(serde_json::from_str(&contents)?),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Vec::new()),
        Err(e) => Err(e.into()),
    }
}

/// Writes a JSON array file in place, creating parent directories
fn write_json_array<T: Serialize>(path: &Path, rows: &[T]) -> AppResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, serde_json::to_string_pretty(rows)?)?;
    Ok(())
}
