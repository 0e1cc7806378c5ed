//! HTTP client for the Mem0 platform API.

use crate::{ClientError, ClientOptions};
use mem0_types::{
    is_zero, merge_into, normalize_filters, path_segment, with_query, Event, EventPage,
    FeedbackPayload, JsonMap, Memory, MemoryAddEvent, MemoryHistory, MemoryOptions,
    MemoryUpdateBody, Messages, ProjectOptions, ProjectResponse, PromptUpdatePayload, QueryParams,
    SearchOptions, UserPage, Webhook, WebhookPayload,
};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Caller identity header, set once the ping handshake has supplied one.
const USER_ID_HEADER: &str = "Mem0-User-ID";

#[derive(Debug, Deserialize)]
struct PingResponse {
    #[serde(default)]
    status: String,
    #[serde(default)]
    org_id: Option<String>,
    #[serde(default)]
    project_id: Option<String>,
    #[serde(default)]
    user_email: Option<String>,
}

/// Body of the v2 list endpoint.
#[derive(Debug, Serialize)]
struct ListRequest<'a> {
    #[serde(skip_serializing_if = "is_zero")]
    page: u32,
    #[serde(skip_serializing_if = "is_zero")]
    page_size: u32,
    #[serde(skip_serializing_if = "is_zero")]
    org_id: &'a str,
    #[serde(skip_serializing_if = "is_zero")]
    project_id: &'a str,
    #[serde(skip_serializing_if = "is_zero")]
    fields: &'a [String],
    #[serde(skip_serializing_if = "is_zero")]
    filters: JsonMap,
}

/// Client for the Mem0 platform API.
///
/// Configuration is fixed at construction. Each method performs exactly one HTTP round trip
/// and nothing is retried. The client is cheap to clone and can be shared between tasks.
#[derive(Clone)]
pub struct MemoryClient {
    http: reqwest::Client,
    api_key: String,
    host: String,
    organization_name: String,
    project_name: String,
    organization_id: String,
    project_id: String,
    telemetry_id: Option<String>,
}

impl MemoryClient {
    /// Validate `options`, then ping the service. The ping supplies the effective organization
    /// and project ids and the caller identity sent on later requests.
    pub async fn new(options: ClientOptions) -> Result<Self, ClientError> {
        options.validate()?;
        let http = reqwest::Client::builder().timeout(options.timeout).build()?;
        let mut client = Self {
            http,
            host: options.resolved_host(),
            api_key: options.api_key,
            organization_name: options.organization_name,
            project_name: options.project_name,
            organization_id: options.organization_id,
            project_id: options.project_id,
            telemetry_id: None,
        };
        client.ping().await?;
        Ok(client)
    }

    /// [`ClientOptions::from_env`] followed by [`MemoryClient::new`].
    pub async fn from_env() -> Result<Self, ClientError> {
        Self::new(ClientOptions::from_env()?).await
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn organization_id(&self) -> &str {
        &self.organization_id
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    /// Identity echoed in the `Mem0-User-ID` header.
    pub fn telemetry_id(&self) -> Option<&str> {
        self.telemetry_id.as_deref()
    }

    async fn ping(&mut self) -> Result<(), ClientError> {
        let body = self.send(self.request(Method::GET, "/v1/ping/")).await?;
        let ping: PingResponse = decode(&body, "ping")?;
        if ping.status != "ok" {
            return Err(ClientError::InvalidApiKey(ping.status));
        }
        if let Some(org_id) = ping.org_id.filter(|s| !s.is_empty()) {
            self.organization_id = org_id;
        }
        if let Some(project_id) = ping.project_id.filter(|s| !s.is_empty()) {
            self.project_id = project_id;
        }
        self.telemetry_id = ping.user_email.filter(|s| !s.is_empty());
        tracing::info!(
            host = %self.host,
            org_id = %self.organization_id,
            project_id = %self.project_id,
            "connected to Mem0"
        );
        Ok(())
    }

    /// Add memories and wait for extraction. Returns the created or changed memories.
    pub async fn add(
        &self,
        messages: impl Into<Messages>,
        options: &MemoryOptions,
    ) -> Result<Vec<Memory>, ClientError> {
        let mut payload = self.prepare_payload(messages.into(), options)?;
        payload.insert("async_mode".to_string(), Value::Bool(false));
        let body = self
            .send(self.request(Method::POST, "/v1/memories/").json(&payload))
            .await?;
        decode(&body, "memories")
    }

    /// Queue memories for background extraction. Poll the returned events with
    /// [`MemoryClient::event`].
    pub async fn add_async(
        &self,
        messages: impl Into<Messages>,
        options: &MemoryOptions,
    ) -> Result<Vec<MemoryAddEvent>, ClientError> {
        let payload = self.prepare_payload(messages.into(), options)?;
        let body = self
            .send(self.request(Method::POST, "/v1/memories/").json(&payload))
            .await?;
        decode(&body, "add events")
    }

    pub async fn update(&self, memory_id: &str, text: &str) -> Result<Vec<Memory>, ClientError> {
        require(memory_id, "memory_id")?;
        let payload = serde_json::json!({ "text": text });
        let path = format!("/v1/memories/{}/", path_segment(memory_id));
        let body = self
            .send(self.request(Method::PUT, &path).json(&payload))
            .await?;
        decode(&body, "memories")
    }

    pub async fn get(&self, memory_id: &str) -> Result<Memory, ClientError> {
        require(memory_id, "memory_id")?;
        let path = format!("/v1/memories/{}/", path_segment(memory_id));
        let body = self.send(self.request(Method::GET, &path)).await?;
        decode(&body, "memory")
    }

    /// List memories. On the default version the filters get the v2 wildcard defaults.
    pub async fn get_all(&self, options: &SearchOptions) -> Result<Vec<Memory>, ClientError> {
        let base = &options.base;
        let filters = if options.uses_default_version() {
            normalize_filters(Some(base.filters.clone()))
        } else {
            base.filters.clone()
        };
        let req = ListRequest {
            page: base.page,
            page_size: base.page_size,
            org_id: non_empty_or(&base.org_id, &self.organization_id),
            project_id: non_empty_or(&base.project_id, &self.project_id),
            fields: &options.fields,
            filters,
        };
        let body = self
            .send(self.request(Method::POST, "/v2/memories/").json(&req))
            .await?;
        decode(&body, "memories")
    }

    /// Semantic search. Filters, when given on the default version, are normalized and
    /// `filter_memories` is switched on.
    pub async fn search(
        &self,
        query: &str,
        options: &SearchOptions,
    ) -> Result<Vec<Memory>, ClientError> {
        require(query, "query")?;
        let mut options = options.clone();
        self.apply_scope(&mut options.base);

        let mut payload = JsonMap::new();
        payload.insert("query".to_string(), Value::String(query.to_string()));
        merge_into(&mut payload, &options).map_err(ClientError::Encode)?;
        if options.uses_default_version() && !options.base.filters.is_empty() {
            let filters = normalize_filters(Some(options.base.filters));
            payload.insert("filters".to_string(), Value::Object(filters));
            payload.insert("filter_memories".to_string(), Value::Bool(true));
        }

        let body = self
            .send(self.request(Method::POST, "/v2/memories/search/").json(&payload))
            .await?;
        decode(&body, "memories")
    }

    pub async fn delete(&self, memory_id: &str) -> Result<(), ClientError> {
        require(memory_id, "memory_id")?;
        let path = format!("/v1/memories/{}/", path_segment(memory_id));
        self.send(self.request(Method::DELETE, &path)).await?;
        Ok(())
    }

    /// Delete every memory matching the scope in `options`, sent as query parameters.
    pub async fn delete_all(&self, options: &MemoryOptions) -> Result<(), ClientError> {
        let path = with_query("/v1/memories/", options).map_err(ClientError::Encode)?;
        self.send(self.request(Method::DELETE, &path)).await?;
        Ok(())
    }

    pub async fn history(&self, memory_id: &str) -> Result<Vec<MemoryHistory>, ClientError> {
        require(memory_id, "memory_id")?;
        let path = format!("/v1/memories/{}/history/", path_segment(memory_id));
        let body = self.send(self.request(Method::GET, &path)).await?;
        decode(&body, "history")
    }

    pub async fn users(&self) -> Result<UserPage, ClientError> {
        let body = self.send(self.request(Method::GET, "/v1/users/")).await?;
        decode(&body, "users")
    }

    pub async fn delete_user(&self, entity_id: &str) -> Result<(), ClientError> {
        require(entity_id, "entity_id")?;
        let path = format!("/v1/users/{}/", path_segment(entity_id));
        self.send(self.request(Method::DELETE, &path)).await?;
        Ok(())
    }

    pub async fn delete_users(&self) -> Result<(), ClientError> {
        self.send(self.request(Method::DELETE, "/v1/users/")).await?;
        Ok(())
    }

    pub async fn batch_update(&self, memories: &[MemoryUpdateBody]) -> Result<(), ClientError> {
        if memories.is_empty() {
            return Err(ClientError::InvalidArgument(
                "memories are required".to_string(),
            ));
        }
        self.send(
            self.request(Method::PUT, "/v1/memories/batch/")
                .json(memories),
        )
        .await?;
        Ok(())
    }

    pub async fn batch_delete(&self, memory_ids: &[String]) -> Result<(), ClientError> {
        if memory_ids.is_empty() {
            return Err(ClientError::InvalidArgument(
                "memory_ids are required".to_string(),
            ));
        }
        self.send(
            self.request(Method::DELETE, "/v1/memories/batch/")
                .json(memory_ids),
        )
        .await?;
        Ok(())
    }

    pub async fn get_project(&self, options: &ProjectOptions) -> Result<ProjectResponse, ClientError> {
        let path = with_query("/v1/project/", options).map_err(ClientError::Encode)?;
        let body = self.send(self.request(Method::GET, &path)).await?;
        decode(&body, "project")
    }

    pub async fn update_project(&self, payload: &PromptUpdatePayload) -> Result<(), ClientError> {
        self.send(self.request(Method::PUT, "/v1/project/").json(payload))
            .await?;
        Ok(())
    }

    /// Webhooks of `project_id`, or of the default project when empty.
    pub async fn webhooks(&self, project_id: &str) -> Result<Vec<Webhook>, ClientError> {
        let mut query = QueryParams::new();
        query.push("project_id", project_id);
        let path = if query.is_empty() {
            "/v1/webhooks/".to_string()
        } else {
            format!("/v1/webhooks/?{}", query.encode())
        };
        let body = self.send(self.request(Method::GET, &path)).await?;
        decode(&body, "webhooks")
    }

    pub async fn create_webhook(&self, webhook: &WebhookPayload) -> Result<Webhook, ClientError> {
        require(&webhook.url, "url")?;
        let body = self
            .send(self.request(Method::POST, "/v1/webhooks/").json(webhook))
            .await?;
        decode(&body, "webhook")
    }

    pub async fn update_webhook(&self, webhook: &WebhookPayload) -> Result<(), ClientError> {
        require(&webhook.webhook_id, "webhook_id")?;
        self.send(self.request(Method::PUT, "/v1/webhooks/").json(webhook))
            .await?;
        Ok(())
    }

    pub async fn delete_webhook(&self, webhook_id: &str) -> Result<(), ClientError> {
        require(webhook_id, "webhook_id")?;
        let path = format!("/v1/webhooks/{}/", path_segment(webhook_id));
        self.send(self.request(Method::DELETE, &path)).await?;
        Ok(())
    }

    pub async fn feedback(&self, payload: &FeedbackPayload) -> Result<(), ClientError> {
        require(&payload.memory_id, "memory_id")?;
        self.send(self.request(Method::POST, "/v1/feedback/").json(payload))
            .await?;
        Ok(())
    }

    pub async fn event(&self, event_id: &str) -> Result<Event, ClientError> {
        require(event_id, "event_id")?;
        let path = format!("/v1/event/{}/", path_segment(event_id));
        let body = self.send(self.request(Method::GET, &path)).await?;
        decode(&body, "event")
    }

    /// One page of events. Pass `""` for the first page, then the `next` or `previous` cursor
    /// of a previous page. An empty `next` means there are no more pages.
    ///
    /// Absolute cursors must point at the client's own host, since they carry the API key.
    pub async fn events(&self, cursor: &str) -> Result<EventPage, ClientError> {
        let path = self.cursor_path(cursor)?;
        let body = self.send(self.request(Method::GET, &path)).await?;
        decode(&body, "events")
    }

    /// Request body for add: messages, then the options with the client's scope applied.
    fn prepare_payload(
        &self,
        messages: Messages,
        options: &MemoryOptions,
    ) -> Result<JsonMap, ClientError> {
        if messages.is_empty() {
            return Err(ClientError::InvalidArgument(
                "messages are required".to_string(),
            ));
        }
        let mut options = options.clone();
        self.apply_scope(&mut options);

        let mut payload = JsonMap::new();
        let messages = serde_json::to_value(messages.into_vec()).map_err(ClientError::Encode)?;
        payload.insert("messages".to_string(), messages);
        merge_into(&mut payload, &options).map_err(ClientError::Encode)?;
        if options.uses_default_version() {
            payload.insert(
                "version".to_string(),
                Value::String(mem0_types::ApiVersion::default().to_string()),
            );
        }
        Ok(payload)
    }

    /// Stamp the client's organization/project on `options`, per pair, when fully configured.
    fn apply_scope(&self, options: &mut MemoryOptions) {
        if !self.organization_name.is_empty() && !self.project_name.is_empty() {
            options.org_name = self.organization_name.clone();
            options.project_name = self.project_name.clone();
        }
        if !self.organization_id.is_empty() && !self.project_id.is_empty() {
            options.org_id = self.organization_id.clone();
            options.project_id = self.project_id.clone();
        }
    }

    fn cursor_path(&self, cursor: &str) -> Result<String, ClientError> {
        let cursor = cursor.trim();
        if cursor.is_empty() {
            return Ok("/v1/events/".to_string());
        }
        if !is_absolute(cursor) {
            return Ok(if cursor.starts_with('/') {
                cursor.to_string()
            } else {
                format!("/{}", cursor)
            });
        }
        let target = url::Url::parse(cursor)
            .map_err(|e| ClientError::InvalidArgument(format!("cursor: {}", e)))?;
        let host = url::Url::parse(&self.host)
            .map_err(|e| ClientError::Config(format!("host: {}", e)))?;
        if target.origin() != host.origin() {
            return Err(ClientError::InvalidArgument(format!(
                "cursor origin {} does not match host {}",
                target.origin().ascii_serialization(),
                host.origin().ascii_serialization()
            )));
        }
        Ok(cursor.to_string())
    }

    fn url(&self, path: &str) -> String {
        if is_absolute(path) {
            path.to_string()
        } else {
            format!("{}{}", self.host, path)
        }
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let mut req = self
            .http
            .request(method, self.url(path))
            .header(AUTHORIZATION, format!("Token {}", self.api_key))
            .header(CONTENT_TYPE, "application/json");
        if let Some(ref id) = self.telemetry_id {
            req = req.header(USER_ID_HEADER, id);
        }
        req
    }

    /// Send the request and return the body text of a successful response.
    async fn send(&self, req: RequestBuilder) -> Result<String, ClientError> {
        let req = req.build()?;
        let method = req.method().clone();
        let path = req.url().path().to_string();
        let res = self.http.execute(req).await?;
        let status = res.status();
        let body = res.text().await?;
        if !status.is_success() {
            tracing::warn!(%method, %path, status = status.as_u16(), "Mem0 request failed");
            return Err(ClientError::Api {
                status: status.as_u16(),
                body,
            });
        }
        tracing::debug!(%method, %path, status = status.as_u16(), "Mem0 request");
        Ok(body)
    }
}

impl fmt::Debug for MemoryClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryClient")
            .field("host", &self.host)
            .field("organization_name", &self.organization_name)
            .field("project_name", &self.project_name)
            .field("organization_id", &self.organization_id)
            .field("project_id", &self.project_id)
            .finish_non_exhaustive()
    }
}

fn decode<T: DeserializeOwned>(body: &str, context: &'static str) -> Result<T, ClientError> {
    serde_json::from_str(body).map_err(|source| ClientError::Decode { context, source })
}

fn is_absolute(path: &str) -> bool {
    path.starts_with("http://") || path.starts_with("https://")
}

fn require(value: &str, name: &str) -> Result<(), ClientError> {
    if value.trim().is_empty() {
        return Err(ClientError::InvalidArgument(format!("{} is required", name)));
    }
    Ok(())
}

fn non_empty_or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.is_empty() {
        fallback
    } else {
        value
    }
}
