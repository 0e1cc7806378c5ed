//! Option bags for add, search, list, delete-all and project calls.
//!
//! Unset fields hold their type's zero value and are left out of both the JSON body
//! (`skip_serializing_if = "is_zero"`) and the query string ([`ToQuery`]). An explicit
//! zero, `false` or empty value therefore cannot be sent through these types.

use crate::query::{QueryParams, QueryValue, ToQuery};
use crate::{is_zero, JsonMap, Message};
use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Protocol version of the memory endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiVersion {
    V1,
    #[default]
    V2,
}

impl ApiVersion {
    pub fn as_str(self) -> &'static str {
        match self {
            ApiVersion::V1 => "v1",
            ApiVersion::V2 => "v2",
        }
    }

    /// Unset counts as the default version.
    pub fn is_default(version: Option<ApiVersion>) -> bool {
        version.map_or(true, |v| v == ApiVersion::default())
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl QueryValue for ApiVersion {
    fn query_value(&self) -> Option<String> {
        Some(self.as_str().to_string())
    }
}

/// User-defined memory category. On the wire it is a single-entry object `{name: description}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomCategory {
    pub name: String,
    pub description: String,
}

impl CustomCategory {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

impl Serialize for CustomCategory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.name, &self.description)?;
        map.end()
    }
}

impl<'de> Deserialize<'de> for CustomCategory {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct CategoryVisitor;

        impl<'de> Visitor<'de> for CategoryVisitor {
            type Value = CustomCategory;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a single-entry object {name: description}")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let (name, description): (String, String) = map
                    .next_entry()?
                    .ok_or_else(|| de::Error::invalid_length(0, &self))?;
                if map.next_key::<de::IgnoredAny>()?.is_some() {
                    return Err(de::Error::invalid_length(2, &self));
                }
                Ok(CustomCategory { name, description })
            }
        }

        deserializer.deserialize_map(CategoryVisitor)
    }
}

/// Options for add and delete-all, and the shared part of [`SearchOptions`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MemoryOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_version: Option<ApiVersion>,
    /// Pinning [`ApiVersion::V1`] disables the v2 filter defaults.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<ApiVersion>,
    #[serde(skip_serializing_if = "is_zero")]
    pub user_id: String,
    #[serde(skip_serializing_if = "is_zero")]
    pub agent_id: String,
    #[serde(skip_serializing_if = "is_zero")]
    pub app_id: String,
    #[serde(skip_serializing_if = "is_zero")]
    pub run_id: String,
    #[serde(skip_serializing_if = "is_zero")]
    pub timestamp: i64,
    #[serde(skip_serializing_if = "is_zero")]
    pub metadata: JsonMap,
    /// Filters for list and search. `agent_id` and `user_id` address different scopes;
    /// do not combine them.
    #[serde(skip_serializing_if = "is_zero")]
    pub filters: JsonMap,
    #[serde(skip_serializing_if = "is_zero")]
    pub org_id: String,
    #[serde(skip_serializing_if = "is_zero")]
    pub project_id: String,
    #[serde(skip_serializing_if = "is_zero")]
    pub org_name: String,
    #[serde(skip_serializing_if = "is_zero")]
    pub project_name: String,
    #[serde(skip_serializing_if = "is_zero")]
    pub infer: bool,
    #[serde(skip_serializing_if = "is_zero")]
    pub page: u32,
    #[serde(skip_serializing_if = "is_zero")]
    pub page_size: u32,
    #[serde(skip_serializing_if = "is_zero")]
    pub includes: String,
    #[serde(skip_serializing_if = "is_zero")]
    pub excludes: String,
    #[serde(skip_serializing_if = "is_zero")]
    pub enable_graph: bool,
    #[serde(skip_serializing_if = "is_zero")]
    pub start_date: String,
    #[serde(skip_serializing_if = "is_zero")]
    pub end_date: String,
    #[serde(skip_serializing_if = "is_zero")]
    pub custom_categories: Vec<CustomCategory>,
    #[serde(skip_serializing_if = "is_zero")]
    pub custom_instructions: String,
    #[serde(skip_serializing_if = "is_zero")]
    pub messages: Vec<Message>,
}

impl MemoryOptions {
    /// Whether the v2 request conventions (filter defaults, `version: v2`) apply.
    pub fn uses_default_version(&self) -> bool {
        ApiVersion::is_default(self.version)
    }
}

impl ToQuery for MemoryOptions {
    fn query_params(&self) -> Result<QueryParams, serde_json::Error> {
        let mut q = QueryParams::new();
        q.push("api_version", &self.api_version)
            .push("version", &self.version)
            .push("user_id", &self.user_id)
            .push("agent_id", &self.agent_id)
            .push("app_id", &self.app_id)
            .push("run_id", &self.run_id)
            .push("timestamp", &self.timestamp);
        q.push_json("metadata", &self.metadata)?
            .push_json("filters", &self.filters)?
            .push("org_id", &self.org_id)
            .push("project_id", &self.project_id)
            .push("org_name", &self.org_name)
            .push("project_name", &self.project_name)
            .push("infer", &self.infer)
            .push("page", &self.page)
            .push("page_size", &self.page_size)
            .push("includes", &self.includes)
            .push("excludes", &self.excludes)
            .push("enable_graph", &self.enable_graph)
            .push("start_date", &self.start_date)
            .push("end_date", &self.end_date)
            .push_json("custom_categories", &self.custom_categories)?
            .push("custom_instructions", &self.custom_instructions)
            .push_json("messages", &self.messages)?;
        Ok(q)
    }
}

/// Options for search and list. Shared fields live in `base`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchOptions {
    #[serde(flatten)]
    pub base: MemoryOptions,
    #[serde(skip_serializing_if = "is_zero")]
    pub threshold: f64,
    #[serde(skip_serializing_if = "is_zero")]
    pub top_k: u32,
    #[serde(skip_serializing_if = "is_zero")]
    pub only_metadata_based_search: bool,
    #[serde(skip_serializing_if = "is_zero")]
    pub keyword_search: bool,
    #[serde(skip_serializing_if = "is_zero")]
    pub fields: Vec<String>,
    #[serde(skip_serializing_if = "is_zero")]
    pub categories: Vec<String>,
    #[serde(skip_serializing_if = "is_zero")]
    pub rerank: bool,
}

impl SearchOptions {
    pub fn uses_default_version(&self) -> bool {
        self.base.uses_default_version()
    }
}

impl From<MemoryOptions> for SearchOptions {
    fn from(base: MemoryOptions) -> Self {
        Self {
            base,
            ..Default::default()
        }
    }
}

impl ToQuery for SearchOptions {
    fn query_params(&self) -> Result<QueryParams, serde_json::Error> {
        let mut q = self.base.query_params()?;
        q.push("threshold", &self.threshold)
            .push("top_k", &self.top_k)
            .push("only_metadata_based_search", &self.only_metadata_based_search)
            .push("keyword_search", &self.keyword_search)
            .push("fields", &self.fields)
            .push("categories", &self.categories)
            .push("rerank", &self.rerank);
        Ok(q)
    }
}

/// Which project fields to fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProjectOptions {
    #[serde(skip_serializing_if = "is_zero")]
    pub fields: Vec<String>,
}

impl ToQuery for ProjectOptions {
    fn query_params(&self) -> Result<QueryParams, serde_json::Error> {
        let mut q = QueryParams::new();
        q.push("fields", &self.fields);
        Ok(q)
    }
}

/// Merge the non-null fields of `options` into `body`. Existing keys are overwritten.
pub fn merge_into<T: Serialize + ?Sized>(
    body: &mut JsonMap,
    options: &T,
) -> Result<(), serde_json::Error> {
    match serde_json::to_value(options)? {
        serde_json::Value::Object(fields) => {
            for (k, v) in fields {
                if !v.is_null() {
                    body.insert(k, v);
                }
            }
            Ok(())
        }
        serde_json::Value::Null => Ok(()),
        _ => Err(<serde_json::Error as serde::ser::Error>::custom(
            "options must serialize to a JSON object",
        )),
    }
}
