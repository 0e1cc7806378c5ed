//! Event types: asynchronous operation records (PENDING -> RUNNING -> SUCCEEDED | FAILED).

use crate::dto::null_as_default;
use crate::JsonMap;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Status of an asynchronous operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventStatus {
    Pending,
    Running,
    Succeeded,
    Failed,
}

impl EventStatus {
    /// True once the event has succeeded or failed.
    pub fn is_terminal(self) -> bool {
        matches!(self, EventStatus::Succeeded | EventStatus::Failed)
    }
}

/// Kind of operation an event (or a memory change) records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    GetAll,
    Search,
    Add,
    Update,
    Delete,
    #[serde(other)]
    Other,
}

/// One asynchronous operation record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub event_type: EventType,
    pub status: EventStatus,
    #[serde(default, deserialize_with = "null_as_default")]
    pub payload: JsonMap,
    #[serde(default, deserialize_with = "null_as_default")]
    pub metadata: JsonMap,
    #[serde(default, deserialize_with = "null_as_default")]
    pub results: Vec<serde_json::Value>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub latency: f64,
}

/// Page of events. `next` / `previous` are cursors to pass back to the events listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventPage {
    #[serde(default)]
    pub count: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub results: Vec<Event>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub next: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub previous: String,
}
