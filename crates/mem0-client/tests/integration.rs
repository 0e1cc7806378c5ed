//! Integration tests against an in-process mock of the Mem0 API.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::Router;
use mem0_client::types::{
    ApiVersion, CustomCategory, EventStatus, EventType, Feedback, FeedbackPayload,
    MemoryOptions, MemoryUpdateBody, Message, ProjectOptions, PromptUpdatePayload, SearchOptions,
    WebhookEvent, WebhookPayload,
};
use mem0_client::{ClientError, ClientOptions, MemoryClient};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone)]
struct Recorded {
    method: String,
    path: String,
    query: Option<String>,
    headers: HeaderMap,
    body: Value,
}

#[derive(Default)]
struct Mock {
    /// "METHOD path" or "METHOD path?query" -> (status, body)
    routes: Mutex<HashMap<String, (u16, String)>>,
    requests: Mutex<Vec<Recorded>>,
}

impl Mock {
    fn on(&self, method: &str, path: &str, status: u16, body: impl Into<String>) {
        self.routes
            .lock()
            .unwrap()
            .insert(format!("{} {}", method, path), (status, body.into()));
    }

    fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    fn last(&self, method: &str, path: &str) -> Recorded {
        self.requests()
            .into_iter()
            .rev()
            .find(|r| r.method == method && r.path == path)
            .unwrap_or_else(|| panic!("no {} {} recorded", method, path))
    }
}

async fn handle(
    State(mock): State<Arc<Mock>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, String) {
    let path = uri.path().to_string();
    let query = uri.query().map(String::from);
    mock.requests.lock().unwrap().push(Recorded {
        method: method.to_string(),
        path: path.clone(),
        query: query.clone(),
        headers,
        body: serde_json::from_slice(&body).unwrap_or(Value::Null),
    });

    let routes = mock.routes.lock().unwrap();
    let with_query = query.map(|q| format!("{} {}?{}", method, path, q));
    let found = with_query
        .and_then(|k| routes.get(&k).cloned())
        .or_else(|| routes.get(&format!("{} {}", method, path)).cloned());
    match found {
        Some((status, body)) => (StatusCode::from_u16(status).unwrap(), body),
        None if path == "/v1/ping/" => (
            StatusCode::OK,
            json!({
                "status": "ok",
                "org_id": "org-1",
                "project_id": "proj-1",
                "user_email": "tester@example.com"
            })
            .to_string(),
        ),
        None => (StatusCode::NOT_FOUND, "not found".to_string()),
    }
}

async fn start(mock: Arc<Mock>) -> String {
    let app = Router::new().fallback(handle).with_state(mock);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app.into_make_service()).await.unwrap();
    });
    format!("http://{}", addr)
}

async fn connected() -> (Arc<Mock>, MemoryClient, String) {
    let mock = Arc::new(Mock::default());
    let host = start(Arc::clone(&mock)).await;
    let client = MemoryClient::new(ClientOptions::new("test-key").with_host(host.clone()))
        .await
        .unwrap();
    (mock, client, host)
}

#[tokio::test]
async fn empty_api_key_fails_without_network() {
    let mock = Arc::new(Mock::default());
    let host = start(Arc::clone(&mock)).await;
    let err = MemoryClient::new(ClientOptions::new("").with_host(host))
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Config(_)));
    assert!(mock.requests().is_empty());
}

#[tokio::test]
async fn partial_org_project_pair_fails_without_network() {
    let mock = Arc::new(Mock::default());
    let host = start(Arc::clone(&mock)).await;

    let mut opts = ClientOptions::new("test-key").with_host(host.clone());
    opts.organization_name = "acme".to_string();
    let err = MemoryClient::new(opts).await.unwrap_err();
    assert!(matches!(err, ClientError::Config(_)));

    let mut opts = ClientOptions::new("test-key").with_host(host);
    opts.project_name = "default".to_string();
    let err = MemoryClient::new(opts).await.unwrap_err();
    assert!(matches!(err, ClientError::Config(_)));

    assert!(mock.requests().is_empty());
}

#[tokio::test]
async fn ping_status_other_than_ok_aborts_construction() {
    let mock = Arc::new(Mock::default());
    mock.on("GET", "/v1/ping/", 200, json!({ "status": "error" }).to_string());
    let host = start(Arc::clone(&mock)).await;
    let err = MemoryClient::new(ClientOptions::new("bad-key").with_host(host))
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::InvalidApiKey(ref s) if s == "error"));
}

#[tokio::test]
async fn ping_http_error_aborts_construction() {
    let mock = Arc::new(Mock::default());
    mock.on("GET", "/v1/ping/", 401, r#"{"detail":"Invalid API key"}"#);
    let host = start(Arc::clone(&mock)).await;
    let err = MemoryClient::new(ClientOptions::new("bad-key").with_host(host))
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(401));
    assert!(err.to_string().contains("Invalid API key"));
}

#[tokio::test]
async fn ping_supplies_scope_and_identity_header() {
    let (mock, client, _) = connected().await;
    assert_eq!(client.organization_id(), "org-1");
    assert_eq!(client.project_id(), "proj-1");
    assert_eq!(client.telemetry_id(), Some("tester@example.com"));

    let ping = mock.last("GET", "/v1/ping/");
    assert_eq!(ping.headers["authorization"], "Token test-key");
    assert!(ping.headers.get("mem0-user-id").is_none());

    mock.on("GET", "/v1/users/", 200, r#"{"count":0,"results":[],"next":null,"previous":null}"#);
    client.users().await.unwrap();
    let users = mock.last("GET", "/v1/users/");
    assert_eq!(users.headers["mem0-user-id"], "tester@example.com");
    assert_eq!(users.headers["authorization"], "Token test-key");
}

#[tokio::test]
async fn add_returns_created_memory() {
    let (mock, client, _) = connected().await;
    mock.on(
        "POST",
        "/v1/memories/",
        200,
        json!([{ "id": "mem-1", "memory": "Hello", "event": "ADD" }]).to_string(),
    );

    let memories = client
        .add(vec![Message::user("Hello")], &MemoryOptions::default())
        .await
        .unwrap();
    assert_eq!(memories.len(), 1);
    assert_eq!(memories[0].id, "mem-1");
    assert_eq!(memories[0].text(), "Hello");

    let req = mock.last("POST", "/v1/memories/");
    assert_eq!(req.body["messages"], json!([{ "role": "user", "content": "Hello" }]));
    assert_eq!(req.body["async_mode"], false);
    assert_eq!(req.body["version"], "v2");
    assert_eq!(req.body["org_id"], "org-1");
    assert_eq!(req.body["project_id"], "proj-1");
    assert!(req.body.get("user_id").is_none());
}

#[tokio::test]
async fn add_async_then_poll_event() {
    let (mock, client, _) = connected().await;
    mock.on(
        "POST",
        "/v1/memories/",
        200,
        json!([{ "message": "queued", "status": "PENDING", "event_id": "ev-1" }]).to_string(),
    );
    mock.on(
        "GET",
        "/v1/event/ev-1/",
        200,
        json!({
            "id": "ev-1",
            "event_type": "ADD",
            "status": "SUCCEEDED",
            "payload": {},
            "metadata": null,
            "results": [{ "id": "mem-9" }],
            "created_at": "2025-02-03T10:00:00Z",
            "updated_at": "2025-02-03T10:00:02Z",
            "latency": 1.9
        })
        .to_string(),
    );

    let options = MemoryOptions {
        user_id: "alice".to_string(),
        ..Default::default()
    };
    let events = client.add_async("I like churros", &options).await.unwrap();
    assert_eq!(events[0].status, EventStatus::Pending);
    let req = mock.last("POST", "/v1/memories/");
    assert!(req.body.get("async_mode").is_none());
    assert_eq!(req.body["user_id"], "alice");

    let event = client.event(&events[0].event_id).await.unwrap();
    assert!(event.status.is_terminal());
    assert_eq!(event.results.len(), 1);
}

#[tokio::test]
async fn rate_limited_response_is_api_error() {
    let (mock, client, _) = connected().await;
    mock.on("GET", "/v1/memories/mem-1/", 429, "\"rate limited\"");
    let err = client.get("mem-1").await.unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("429"), "{}", msg);
    assert!(msg.contains("rate limited"), "{}", msg);
    match err {
        ClientError::Api { status, body } => {
            assert_eq!(status, 429);
            assert_eq!(body, "\"rate limited\"");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn delete_with_empty_body_succeeds() {
    let (mock, client, _) = connected().await;
    mock.on("DELETE", "/v1/memories/mem-1/", 200, "");
    client.delete("mem-1").await.unwrap();
    assert_eq!(mock.last("DELETE", "/v1/memories/mem-1/").method, "DELETE");
}

#[tokio::test]
async fn malformed_body_is_decode_error() {
    let (mock, client, _) = connected().await;
    mock.on("GET", "/v1/memories/mem-1/", 200, "<html>oops</html>");
    let err = client.get("mem-1").await.unwrap_err();
    assert!(matches!(err, ClientError::Decode { context: "memory", .. }));
}

#[tokio::test]
async fn empty_ids_are_rejected_before_sending() {
    let (mock, client, _) = connected().await;
    let before = mock.requests().len();
    assert!(matches!(client.get("").await, Err(ClientError::InvalidArgument(_))));
    assert!(matches!(client.delete(" ").await, Err(ClientError::InvalidArgument(_))));
    assert!(matches!(client.history("").await, Err(ClientError::InvalidArgument(_))));
    assert!(matches!(
        client.search("", &SearchOptions::default()).await,
        Err(ClientError::InvalidArgument(_))
    ));
    assert!(matches!(
        client.batch_delete(&[]).await,
        Err(ClientError::InvalidArgument(_))
    ));
    assert_eq!(mock.requests().len(), before);
}

#[tokio::test]
async fn search_normalizes_filters_on_default_version() {
    let (mock, client, _) = connected().await;
    mock.on("POST", "/v2/memories/search/", 200, "[]");

    let mut options = SearchOptions {
        top_k: 3,
        ..Default::default()
    };
    options.base.filters.insert("agent_id".to_string(), json!("bot"));
    options.base.filters.insert("user_id".to_string(), json!("alice"));
    options
        .base
        .filters
        .insert("categories".to_string(), json!({ "contains": "food" }));

    let hits = client.search("what does alice eat?", &options).await.unwrap();
    assert!(hits.is_empty());

    let req = mock.last("POST", "/v2/memories/search/");
    assert_eq!(req.body["query"], "what does alice eat?");
    assert_eq!(req.body["top_k"], 3);
    assert_eq!(req.body["filter_memories"], true);
    assert_eq!(
        req.body["filters"],
        json!({
            "user_id": "alice",
            "app_id": "*",
            "run_id": "*",
            "categories": { "contains": "food" }
        })
    );
    assert!(req.body.get("threshold").is_none());
}

#[tokio::test]
async fn search_without_filters_sends_none() {
    let (mock, client, _) = connected().await;
    mock.on("POST", "/v2/memories/search/", 200, "[]");
    client.search("pizza", &SearchOptions::default()).await.unwrap();
    let req = mock.last("POST", "/v2/memories/search/");
    assert!(req.body.get("filters").is_none());
    assert!(req.body.get("filter_memories").is_none());
}

#[tokio::test]
async fn search_on_v1_bypasses_normalization() {
    let (mock, client, _) = connected().await;
    mock.on(
        "POST",
        "/v2/memories/search/",
        200,
        json!([{ "id": "m1", "memory": "Likes pizza", "score": 0.91 }]).to_string(),
    );
    let mut options = SearchOptions::default();
    options.base.version = Some(ApiVersion::V1);
    options.base.filters.insert("agent_id".to_string(), json!("bot"));

    let hits = client.search("pizza", &options).await.unwrap();
    assert_eq!(hits[0].score, 0.91);

    let req = mock.last("POST", "/v2/memories/search/");
    assert_eq!(req.body["filters"], json!({ "agent_id": "bot" }));
    assert_eq!(req.body["version"], "v1");
    assert!(req.body.get("filter_memories").is_none());
}

#[tokio::test]
async fn get_all_applies_defaults_and_client_scope() {
    let (mock, client, _) = connected().await;
    mock.on("POST", "/v2/memories/", 200, "[]");
    let options = SearchOptions {
        base: MemoryOptions {
            page: 2,
            page_size: 25,
            ..Default::default()
        },
        fields: vec!["memory".to_string()],
        ..Default::default()
    };
    client.get_all(&options).await.unwrap();

    let req = mock.last("POST", "/v2/memories/");
    assert_eq!(
        req.body,
        json!({
            "page": 2,
            "page_size": 25,
            "org_id": "org-1",
            "project_id": "proj-1",
            "fields": ["memory"],
            "filters": { "user_id": "*", "app_id": "*", "run_id": "*" }
        })
    );
}

#[tokio::test]
async fn delete_all_sends_scope_as_query() {
    let (mock, client, _) = connected().await;
    mock.on("DELETE", "/v1/memories/", 200, "");
    let options = MemoryOptions {
        user_id: "alice".to_string(),
        run_id: "run 1".to_string(),
        ..Default::default()
    };
    client.delete_all(&options).await.unwrap();
    let req = mock.last("DELETE", "/v1/memories/");
    assert_eq!(req.query.as_deref(), Some("run_id=run+1&user_id=alice"));
}

#[tokio::test]
async fn project_fields_go_in_the_query() {
    let (mock, client, _) = connected().await;
    mock.on(
        "GET",
        "/v1/project/",
        200,
        json!({ "custom_instructions": "be brief" }).to_string(),
    );
    let project = client
        .get_project(&ProjectOptions {
            fields: vec!["custom_instructions".to_string()],
        })
        .await
        .unwrap();
    assert_eq!(project.custom_instructions, "be brief");
    let req = mock.last("GET", "/v1/project/");
    assert_eq!(req.query.as_deref(), Some("fields=custom_instructions"));
}

#[tokio::test]
async fn events_follow_the_next_cursor() {
    let (mock, client, host) = connected().await;
    let next = format!("{}/v1/events/?page=2", host);
    mock.on(
        "GET",
        "/v1/events/",
        200,
        json!({ "count": 2, "next": next, "previous": null, "results": [] }).to_string(),
    );
    mock.on(
        "GET",
        "/v1/events/?page=2",
        200,
        json!({
            "count": 2,
            "next": null,
            "previous": format!("{}/v1/events/", host),
            "results": [{ "id": "ev-2", "event_type": "SEARCH", "status": "RUNNING" }]
        })
        .to_string(),
    );

    let first = client.events("").await.unwrap();
    assert_eq!(first.next, next);
    let second = client.events(&first.next).await.unwrap();
    assert!(second.next.is_empty());
    assert_eq!(second.results[0].id, "ev-2");
    assert_eq!(
        mock.last("GET", "/v1/events/").query.as_deref(),
        Some("page=2")
    );
}

#[tokio::test]
async fn webhooks_and_feedback_round_trip() {
    let (mock, client, _) = connected().await;
    mock.on(
        "GET",
        "/v1/webhooks/",
        200,
        json!([{
            "webhook_id": "wh-1",
            "name": "hook",
            "url": "https://example.com/hook",
            "is_active": true,
            "event_types": ["memory_add", "memory_delete"]
        }])
        .to_string(),
    );
    mock.on("POST", "/v1/feedback/", 200, "{}");

    let hooks = client.webhooks("proj-9").await.unwrap();
    assert_eq!(hooks[0].webhook_id, "wh-1");
    assert_eq!(hooks[0].event_types.len(), 2);
    assert_eq!(
        mock.last("GET", "/v1/webhooks/").query.as_deref(),
        Some("project_id=proj-9")
    );

    client
        .feedback(&FeedbackPayload {
            memory_id: "mem-1".to_string(),
            feedback: Some(Feedback::Positive),
            feedback_reason: String::new(),
        })
        .await
        .unwrap();
    let req = mock.last("POST", "/v1/feedback/");
    assert_eq!(req.body, json!({ "memory_id": "mem-1", "feedback": "POSITIVE" }));
}

#[tokio::test]
async fn ids_with_separators_stay_in_one_path_segment() {
    let (mock, client, _) = connected().await;
    mock.on("GET", "/v1/memories/a/", 200, json!({ "id": "a", "memory": "wrong" }).to_string());
    mock.on(
        "GET",
        "/v1/memories/a%3Fb%2Fc/",
        200,
        json!({ "id": "a?b/c", "memory": "right" }).to_string(),
    );
    mock.on("DELETE", "/v1/users/team%2F1%23x/", 204, "");

    let memory = client.get("a?b/c").await.unwrap();
    assert_eq!(memory.id, "a?b/c");
    assert_eq!(memory.text(), "right");
    let req = mock.last("GET", "/v1/memories/a%3Fb%2Fc/");
    assert!(req.query.is_none());

    client.delete_user("team/1#x").await.unwrap();
    mock.last("DELETE", "/v1/users/team%2F1%23x/");
}

#[tokio::test]
async fn update_sends_text_and_returns_memories() {
    let (mock, client, _) = connected().await;
    mock.on(
        "PUT",
        "/v1/memories/mem-1/",
        200,
        json!([{ "id": "mem-1", "memory": "Likes tea", "event": "UPDATE" }]).to_string(),
    );

    let updated = client.update("mem-1", "Likes tea").await.unwrap();
    assert_eq!(updated[0].id, "mem-1");
    assert_eq!(updated[0].event, Some(EventType::Update));

    let req = mock.last("PUT", "/v1/memories/mem-1/");
    assert_eq!(req.body, json!({ "text": "Likes tea" }));
}

#[tokio::test]
async fn history_lists_changes() {
    let (mock, client, _) = connected().await;
    mock.on(
        "GET",
        "/v1/memories/mem-1/history/",
        200,
        json!([{
            "id": "h-1",
            "memory_id": "mem-1",
            "input": [{ "role": "user", "content": "I switched to tea" }],
            "old_memory": "Likes coffee",
            "new_memory": "Likes tea",
            "user_id": "alice",
            "categories": null,
            "event": "UPDATE",
            "created_at": "2025-02-03T10:00:00Z"
        }])
        .to_string(),
    );

    let history = client.history("mem-1").await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].memory_id, "mem-1");
    assert_eq!(history[0].old_memory, "Likes coffee");
    assert_eq!(history[0].new_memory, "Likes tea");
    assert_eq!(history[0].event, EventType::Update);
    assert!(history[0].categories.is_empty());
    assert_eq!(mock.last("GET", "/v1/memories/mem-1/history/").method, "GET");
}

#[tokio::test]
async fn user_deletion_targets_one_or_all() {
    let (mock, client, _) = connected().await;
    mock.on("DELETE", "/v1/users/alice/", 204, "");
    mock.on("DELETE", "/v1/users/", 200, r#"{"message":"deleted"}"#);

    client.delete_user("alice").await.unwrap();
    client.delete_users().await.unwrap();

    let one = mock.last("DELETE", "/v1/users/alice/");
    assert_eq!(one.body, Value::Null);
    let all = mock.last("DELETE", "/v1/users/");
    assert!(all.query.is_none());
    assert!(matches!(
        client.delete_user("").await,
        Err(ClientError::InvalidArgument(_))
    ));
}

#[tokio::test]
async fn batch_update_sends_memory_id_keys() {
    let (mock, client, _) = connected().await;
    mock.on("PUT", "/v1/memories/batch/", 200, r#"{"message":"ok"}"#);

    client
        .batch_update(&[
            MemoryUpdateBody {
                memory_id: "mem-1".to_string(),
                text: "one".to_string(),
            },
            MemoryUpdateBody {
                memory_id: "mem-2".to_string(),
                text: "two".to_string(),
            },
        ])
        .await
        .unwrap();

    let req = mock.last("PUT", "/v1/memories/batch/");
    assert_eq!(
        req.body,
        json!([
            { "memoryId": "mem-1", "text": "one" },
            { "memoryId": "mem-2", "text": "two" }
        ])
    );
    assert!(matches!(
        client.batch_update(&[]).await,
        Err(ClientError::InvalidArgument(_))
    ));
}

#[tokio::test]
async fn batch_delete_sends_id_array() {
    let (mock, client, _) = connected().await;
    mock.on("DELETE", "/v1/memories/batch/", 200, r#"{"message":"ok"}"#);

    client
        .batch_delete(&["mem-1".to_string(), "mem-2".to_string()])
        .await
        .unwrap();

    let req = mock.last("DELETE", "/v1/memories/batch/");
    assert_eq!(req.body, json!(["mem-1", "mem-2"]));
}

#[tokio::test]
async fn update_project_sends_categories_as_name_description_pairs() {
    let (mock, client, _) = connected().await;
    mock.on("PUT", "/v1/project/", 200, r#"{"message":"updated"}"#);

    client
        .update_project(&PromptUpdatePayload {
            custom_instructions: "Only keep food preferences".to_string(),
            custom_categories: vec![
                CustomCategory::new("food", "What the user eats"),
                CustomCategory::new("drinks", "What the user drinks"),
            ],
        })
        .await
        .unwrap();

    let req = mock.last("PUT", "/v1/project/");
    assert_eq!(
        req.body,
        json!({
            "custom_instructions": "Only keep food preferences",
            "custom_categories": [
                { "food": "What the user eats" },
                { "drinks": "What the user drinks" }
            ]
        })
    );
}

#[tokio::test]
async fn webhook_lifecycle_uses_camel_case_payloads() {
    let (mock, client, _) = connected().await;
    mock.on(
        "POST",
        "/v1/webhooks/",
        200,
        json!({
            "webhook_id": "wh-7",
            "name": "hook",
            "url": "https://example.com/hook",
            "project": "proj-9",
            "is_active": true,
            "event_types": ["memory_add"]
        })
        .to_string(),
    );
    mock.on("PUT", "/v1/webhooks/", 200, r#"{"message":"updated"}"#);
    mock.on("DELETE", "/v1/webhooks/wh-7/", 204, "");

    let mut payload = WebhookPayload {
        event_types: vec![WebhookEvent::MemoryAdded],
        project_id: "proj-9".to_string(),
        webhook_id: String::new(),
        name: "hook".to_string(),
        url: "https://example.com/hook".to_string(),
    };
    let created = client.create_webhook(&payload).await.unwrap();
    assert_eq!(created.webhook_id, "wh-7");
    assert!(created.is_active);
    assert_eq!(created.event_types, vec![WebhookEvent::MemoryAdded]);
    assert_eq!(
        mock.last("POST", "/v1/webhooks/").body,
        json!({
            "eventTypes": ["memory_add"],
            "projectId": "proj-9",
            "name": "hook",
            "url": "https://example.com/hook"
        })
    );

    payload.webhook_id = created.webhook_id.clone();
    payload.project_id.clear();
    payload.event_types.push(WebhookEvent::MemoryDeleted);
    client.update_webhook(&payload).await.unwrap();
    assert_eq!(
        mock.last("PUT", "/v1/webhooks/").body,
        json!({
            "eventTypes": ["memory_add", "memory_delete"],
            "webhookId": "wh-7",
            "name": "hook",
            "url": "https://example.com/hook"
        })
    );

    client.delete_webhook(&created.webhook_id).await.unwrap();
    assert_eq!(mock.last("DELETE", "/v1/webhooks/wh-7/").body, Value::Null);
}

#[tokio::test]
async fn webhook_payload_requirements_are_checked_locally() {
    let (mock, client, _) = connected().await;
    let before = mock.requests().len();
    let payload = WebhookPayload {
        event_types: vec![WebhookEvent::MemoryAdded],
        project_id: String::new(),
        webhook_id: String::new(),
        name: "hook".to_string(),
        url: String::new(),
    };
    assert!(matches!(
        client.create_webhook(&payload).await,
        Err(ClientError::InvalidArgument(_))
    ));
    assert!(matches!(
        client.update_webhook(&payload).await,
        Err(ClientError::InvalidArgument(_))
    ));
    assert!(matches!(
        client.delete_webhook("").await,
        Err(ClientError::InvalidArgument(_))
    ));
    assert_eq!(mock.requests().len(), before);
}

#[tokio::test]
async fn relative_cursor_without_leading_slash_is_joined_to_host() {
    let (mock, client, _) = connected().await;
    mock.on(
        "GET",
        "/v1/events/?page=2",
        200,
        json!({ "count": 1, "next": null, "previous": null, "results": [] }).to_string(),
    );

    let page = client.events("v1/events/?page=2").await.unwrap();
    assert_eq!(page.count, 1);
    assert_eq!(
        mock.last("GET", "/v1/events/").query.as_deref(),
        Some("page=2")
    );
}

#[tokio::test]
async fn cursor_on_another_origin_is_not_followed() {
    let (mock, client, _) = connected().await;
    let before = mock.requests().len();
    let err = client
        .events("https://elsewhere.example/v1/events/?page=2")
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::InvalidArgument(_)));
    assert_eq!(mock.requests().len(), before);
}
