//! Filter defaults for the v2 search and list endpoints.

use crate::JsonMap;
use serde_json::Value;

/// Filter value meaning "match any".
pub const SEARCH_WILDCARD: &str = "*";

/// Scope keys that v2 filters must always carry.
const WILDCARD_KEYS: [&str; 3] = ["user_id", "app_id", "run_id"];

/// Normalize a filter map for the v2 endpoints.
///
/// `agent_id` is dropped: memories can be created with it, but it is not stored on the memory
/// and filtering by it matches nothing. Missing `user_id`, `app_id` and `run_id` become
/// [`SEARCH_WILDCARD`]. Every other key is left untouched.
pub fn normalize_filters(filters: Option<JsonMap>) -> JsonMap {
    let mut filters = filters.unwrap_or_default();
    filters.remove("agent_id");
    for key in WILDCARD_KEYS {
        filters
            .entry(key)
            .or_insert_with(|| Value::String(SEARCH_WILDCARD.to_string()));
    }
    filters
}
