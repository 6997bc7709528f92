use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The kind of engagement a user had with a property
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    View,
    Save,
}

impl EventKind {
    /// The fixed contribution weight for this kind of event
    pub fn default_weight(self) -> f64 {
        match self {
            EventKind::View => 1.0,
            EventKind::Save => 3.0,
        }
    }
}

/// A single user/property engagement event
///
/// Append-only: events are never mutated or deleted except by a bulk reset.
/// `weight` is stamped from the event kind at creation time; it stays
/// optional so legacy records written without the field still load, falling
/// back to the kind-derived weight.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InteractionEvent {
    pub ts: DateTime<Utc>,
    pub user_id: String,
    pub property_id: String,
    pub event: EventKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
}

impl InteractionEvent {
    /// Creates an event stamped with the current time and the kind's weight
    pub fn new(user_id: impl Into<String>, property_id: impl Into<String>, event: EventKind) -> Self {
        Self {
            ts: Utc::now(),
            user_id: user_id.into(),
            property_id: property_id.into(),
            event,
            weight: Some(event.default_weight()),
        }
    }

    /// The stored weight, or the kind-derived fallback for legacy records
    pub fn effective_weight(&self) -> f64 {
        self.weight.unwrap_or_else(|| self.event.default_weight())
    }
}
