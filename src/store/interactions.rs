use std::path::PathBuf;

use crate::config::Config;
use crate::error::AppResult;
use crate::models::{EventKind, InteractionEvent};

use super::{read_json_array, write_json_array, InteractionSource};

/// Append-only JSON log of user/property engagement events
pub struct JsonInteractionStore {
    path: PathBuf,
}

impl JsonInteractionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.interactions_path())
    }

    /// Loads all recorded events; a missing or empty file reads as `[]`
    pub fn load(&self) -> AppResult<Vec<InteractionEvent>> {
        read_json_array(&self.path)
    }

    /// Appends a single event stamped with the current time and the kind's
    /// fixed weight, returning the stored record
    pub fn log(
        &self,
        user_id: &str,
        property_id: &str,
        event: EventKind,
    ) -> AppResult<InteractionEvent> {
        let mut rows = self.load()?;
        let record = InteractionEvent::new(user_id, property_id, event);
        rows.push(record.clone());
        write_json_array(&self.path, &rows)?;
        tracing::debug!(
            user_id = %user_id,
            property_id = %property_id,
            event = ?event,
            "Interaction logged"
        );
        Ok(record)
    }

    /// Records a view event
    pub fn log_view(&self, user_id: &str, property_id: &str) -> AppResult<InteractionEvent> {
        self.log(user_id, property_id, EventKind::View)
    }

    /// Records a save event
    pub fn log_save(&self, user_id: &str, property_id: &str) -> AppResult<InteractionEvent> {
        self.log(user_id, property_id, EventKind::Save)
    }

    /// All events recorded for one user, in insertion order
    pub fn for_user(&self, user_id: &str) -> AppResult<Vec<InteractionEvent>> {
        let rows = self.load()?;
        Ok(rows.into_iter().filter(|r| r.user_id == user_id).collect())
    }

    /// Clears all interaction data
    pub fn reset(&self) -> AppResult<()> {
        write_json_array::<InteractionEvent>(&self.path, &[])?;
        tracing::info!("Interaction log reset");
        Ok(())
    }
}

impl InteractionSource for JsonInteractionStore {
    fn load_interactions(&self) -> AppResult<Vec<InteractionEvent>> {
        self.load()
    }
}
