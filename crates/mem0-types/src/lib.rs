//! Types for the Mem0 platform API.
//!
//! DTOs mirror the service's JSON. Option bags encode to request bodies and query strings
//! with zero-valued fields left out, and [`normalize_filters`] applies the v2 filter defaults.

mod dto;
mod event;
mod filters;
mod options;
pub mod query;

pub use dto::*;
pub use event::*;
pub use filters::{normalize_filters, SEARCH_WILDCARD};
pub use options::*;
pub use query::{path_segment, with_query, QueryParams, QueryValue, ToQuery};

/// Open JSON object used for metadata, filters and free-form payloads.
pub type JsonMap = serde_json::Map<String, serde_json::Value>;

/// True when `value` equals its type's default (its "unset" value).
pub fn is_zero<T: Default + PartialEq>(value: &T) -> bool {
    *value == T::default()
}
