//! Request and response DTOs of the Mem0 platform API.

use crate::event::EventType;
use crate::JsonMap;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Treat JSON `null` as the type's default. The service sends `null` for empty lists and maps.
pub(crate) fn null_as_default<'de, D, T>(de: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(de)?.unwrap_or_default())
}

/// Single chat message (user/assistant).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: String,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }
}

/// Messages accepted by add: bare strings become user messages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Messages(pub Vec<Message>);

impl Messages {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_vec(self) -> Vec<Message> {
        self.0
    }
}

impl From<&str> for Messages {
    fn from(text: &str) -> Self {
        Self(vec![Message::user(text)])
    }
}

impl From<String> for Messages {
    fn from(text: String) -> Self {
        Self(vec![Message::user(text)])
    }
}

impl From<Vec<String>> for Messages {
    fn from(texts: Vec<String>) -> Self {
        Self(texts.into_iter().map(Message::user).collect())
    }
}

impl From<Vec<&str>> for Messages {
    fn from(texts: Vec<&str>) -> Self {
        Self(texts.into_iter().map(Message::user).collect())
    }
}

impl From<Message> for Messages {
    fn from(message: Message) -> Self {
        Self(vec![message])
    }
}

impl From<Vec<Message>> for Messages {
    fn from(messages: Vec<Message>) -> Self {
        Self(messages)
    }
}

/// Text payload nested under `data` in add/update results.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryData {
    #[serde(default, deserialize_with = "null_as_default")]
    pub memory: String,
}

/// A stored memory as returned by add, get, list and search.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Memory {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub messages: Vec<Message>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event: Option<EventType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<MemoryData>,
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
    pub memory: String,
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
    pub user_id: String,
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
    pub hash: String,
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
    pub memory_type: String,
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "crate::is_zero")]
    pub score: f64,
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "JsonMap::is_empty")]
    pub metadata: JsonMap,
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
    pub owner: String,
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
    pub agent_id: String,
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
    pub app_id: String,
    #[serde(
        rename = "session_id",
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub run_id: String,
}

impl Memory {
    /// Memory text: top-level `memory`, falling back to `data.memory` (add/update results).
    pub fn text(&self) -> &str {
        if !self.memory.is_empty() {
            return &self.memory;
        }
        self.data.as_ref().map(|d| d.memory.as_str()).unwrap_or("")
    }
}

/// Queued add, returned by async add.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryAddEvent {
    #[serde(default, deserialize_with = "null_as_default")]
    pub message: String,
    pub status: crate::EventStatus,
    pub event_id: String,
}

/// One change in a memory's history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryHistory {
    pub id: String,
    pub memory_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub input: Vec<Message>,
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
    pub old_memory: String,
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
    pub new_memory: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub user_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub categories: Vec<String>,
    pub event: EventType,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Entry of a batch update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryUpdateBody {
    #[serde(rename = "memoryId")]
    pub memory_id: String,
    pub text: String,
}

/// An entity (user, agent, app or run) known to the project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub total_memories: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub owner: String,
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub kind: String,
}

/// Page of users. `next` and `previous` are opaque cursors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserPage {
    #[serde(default)]
    pub count: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub results: Vec<User>,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
}

/// Project settings. Fields not modelled here end up in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectResponse {
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
    pub custom_instructions: String,
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub custom_categories: Vec<serde_json::Value>,
    #[serde(flatten)]
    pub extra: JsonMap,
}

/// Body of a project update.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PromptUpdatePayload {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub custom_instructions: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub custom_categories: Vec<crate::CustomCategory>,
}

/// Webhook trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WebhookEvent {
    #[serde(rename = "memory_add")]
    MemoryAdded,
    #[serde(rename = "memory_update")]
    MemoryUpdated,
    #[serde(rename = "memory_delete")]
    MemoryDeleted,
}

/// Registered webhook.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Webhook {
    #[serde(default, deserialize_with = "null_as_default")]
    pub webhook_id: String,
    pub name: String,
    pub url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub project: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub event_types: Vec<WebhookEvent>,
}

/// Body of webhook create/update.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WebhookPayload {
    #[serde(rename = "eventTypes")]
    pub event_types: Vec<WebhookEvent>,
    #[serde(rename = "projectId", skip_serializing_if = "String::is_empty")]
    pub project_id: String,
    #[serde(rename = "webhookId", skip_serializing_if = "String::is_empty")]
    pub webhook_id: String,
    pub name: String,
    pub url: String,
}

/// Feedback rating for a memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Feedback {
    Positive,
    Negative,
    VeryNegative,
}

/// Body of a feedback submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedbackPayload {
    pub memory_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback: Option<Feedback>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub feedback_reason: String,
}
