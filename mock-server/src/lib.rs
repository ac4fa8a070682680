use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicU32, AtomicU64, Ordering},
        Arc,
    },
};

use axum::{
    body::{to_bytes, Body, Bytes},
    extract::{Path, Query, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{debug, warn};
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    pub id: String,
    pub name: String,
    pub desc: String,
    pub id_organization: Option<String>,
    pub closed: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct List {
    pub id: String,
    pub name: String,
    pub id_board: String,
    pub closed: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: String,
    pub name: String,
    pub desc: String,
    pub id_list: String,
    pub id_board: String,
    pub closed: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Webhook {
    pub id: String,
    pub description: String,
    #[serde(rename = "callbackURL")]
    pub callback_url: String,
    pub id_model: String,
    pub active: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBoard {
    pub name: String,
    #[serde(default)]
    pub desc: String,
    pub id_organization: Option<String>,
}

#[derive(Deserialize, Default)]
pub struct UpdateBoard {
    pub name: Option<String>,
    pub desc: Option<String>,
    pub closed: Option<bool>,
}

#[derive(Deserialize)]
pub struct CreateList {
    pub name: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCard {
    pub name: String,
    pub id_list: String,
    #[serde(default)]
    pub desc: String,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCard {
    pub name: Option<String>,
    pub desc: Option<String>,
    pub id_list: Option<String>,
    pub closed: Option<bool>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateWebhook {
    #[serde(default)]
    pub description: String,
    #[serde(rename = "callbackURL")]
    pub callback_url: String,
    pub id_model: String,
}

#[derive(Default)]
pub struct Db {
    pub boards: HashMap<String, Board>,
    pub lists: HashMap<String, List>,
    pub cards: HashMap<String, Card>,
    pub webhooks: HashMap<String, Webhook>,
}

/// Credentials the server accepts and how many requests to throttle.
#[derive(Clone, Debug)]
pub struct MockConfig {
    pub key: String,
    pub token: String,
    /// The first `throttle_first` requests are answered with 429.
    pub throttle_first: u32,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            key: "key".to_string(),
            token: "token".to_string(),
            throttle_first: 0,
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    db: Arc<RwLock<Db>>,
    key: Arc<str>,
    token: Arc<str>,
    throttle_remaining: Arc<AtomicU32>,
    hits: Arc<AtomicU64>,
}

impl AppState {
    pub fn new(config: MockConfig) -> Self {
        Self {
            db: Arc::new(RwLock::new(Db::default())),
            key: config.key.into(),
            token: config.token.into(),
            throttle_remaining: Arc::new(AtomicU32::new(config.throttle_first)),
            hits: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Requests received so far, throttled ones included.
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::SeqCst)
    }

    /// Answer the next `n` requests with 429.
    pub fn throttle_next(&self, n: u32) {
        self.throttle_remaining.store(n, Ordering::SeqCst);
    }
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/1/boards", post(create_board))
        .route("/1/boards/{id}", get(get_board).put(update_board))
        .route("/1/boards/{id}/lists", get(lists_on_board).post(create_list))
        .route("/1/boards/{id}/cards", get(cards_on_board))
        .route("/1/lists/{id}", get(get_list))
        .route("/1/lists/{id}/name", put(rename_list))
        .route("/1/lists/{id}/cards", get(cards_on_list))
        .route("/1/cards", post(create_card))
        .route("/1/cards/{id}", get(get_card).put(update_card).delete(delete_card))
        .route("/1/tokens/{token}/webhooks", get(list_webhooks).post(create_webhook))
        .route("/1/tokens/{token}/webhooks/{id}", axum::routing::delete(delete_webhook))
        .layer(middleware::from_fn_with_state(state.clone(), gatekeeper))
        .with_state(state)
}

pub async fn run(listener: TcpListener, state: AppState) -> Result<(), std::io::Error> {
    axum::serve(listener, app(state)).await
}

fn new_id() -> String {
    Uuid::new_v4().simple().to_string()[..24].to_string()
}

type ApiResult<T> = Result<T, (StatusCode, String)>;

fn not_found(what: &str) -> (StatusCode, String) {
    (StatusCode::NOT_FOUND, format!("The requested {what} was not found."))
}

fn bad_request(msg: impl Into<String>) -> (StatusCode, String) {
    (StatusCode::BAD_REQUEST, msg.into())
}

/// Throttling and authentication, applied to every route.
///
/// Credentials may arrive in the query string, in a JSON body, or (for the
/// token) as the `/1/tokens/{token}/` path prefix.
async fn gatekeeper(State(state): State<AppState>, request: Request, next: Next) -> Response {
    state.hits.fetch_add(1, Ordering::SeqCst);

    let throttled = state
        .throttle_remaining
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
        .is_ok();
    if throttled {
        debug!(uri = %request.uri().path(), "Throttling request");
        return (StatusCode::TOO_MANY_REQUESTS, "API_TOO_MANY_REQUESTS").into_response();
    }

    let (parts, body) = request.into_parts();
    let bytes = match to_bytes(body, 1024 * 1024).await {
        Ok(bytes) => bytes,
        Err(_) => return bad_request("unreadable body").into_response(),
    };

    let query: HashMap<String, String> = Query::try_from_uri(&parts.uri)
        .map(|Query(q)| q)
        .unwrap_or_default();
    let json: Value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

    let from_body = |name: &str| json.get(name).and_then(Value::as_str).map(str::to_string);
    let key = query.get("key").cloned().or_else(|| from_body("key"));
    let token = query
        .get("token")
        .cloned()
        .or_else(|| from_body("token"))
        .or_else(|| path_token(parts.uri.path()));

    if key.as_deref() != Some(&*state.key) {
        warn!(uri = %parts.uri.path(), "Rejecting request with invalid key");
        return (StatusCode::UNAUTHORIZED, "invalid key").into_response();
    }
    if token.as_deref() != Some(&*state.token) {
        warn!(uri = %parts.uri.path(), "Rejecting request with invalid token");
        return (StatusCode::UNAUTHORIZED, "invalid token").into_response();
    }

    next.run(Request::from_parts(parts, Body::from(bytes))).await
}

fn path_token(path: &str) -> Option<String> {
    let rest = path.strip_prefix("/1/tokens/")?;
    rest.split('/').next().map(str::to_string)
}

/// Parse an optional JSON body; an empty body yields `T::default()`.
fn optional_json<T: for<'de> Deserialize<'de> + Default>(bytes: &Bytes) -> ApiResult<T> {
    if bytes.is_empty() {
        return Ok(T::default());
    }
    serde_json::from_slice(bytes).map_err(|e| bad_request(e.to_string()))
}

fn required_json<T: for<'de> Deserialize<'de>>(bytes: &Bytes) -> ApiResult<T> {
    serde_json::from_slice(bytes).map_err(|e| bad_request(e.to_string()))
}

// --- boards ---

async fn create_board(State(state): State<AppState>, body: Bytes) -> ApiResult<Json<Board>> {
    let input: CreateBoard = required_json(&body)?;
    let board = Board {
        id: new_id(),
        name: input.name,
        desc: input.desc,
        id_organization: input.id_organization,
        closed: false,
    };
    state.db.write().await.boards.insert(board.id.clone(), board.clone());
    Ok(Json(board))
}

async fn get_board(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<Board>> {
    let db = state.db.read().await;
    db.boards.get(&id).cloned().map(Json).ok_or_else(|| not_found("board"))
}

async fn update_board(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> ApiResult<Json<Board>> {
    let input: UpdateBoard = optional_json(&body)?;
    let mut db = state.db.write().await;
    let board = db.boards.get_mut(&id).ok_or_else(|| not_found("board"))?;
    if let Some(name) = input.name {
        board.name = name;
    }
    if let Some(desc) = input.desc {
        board.desc = desc;
    }
    if let Some(closed) = input.closed {
        board.closed = closed;
    }
    Ok(Json(board.clone()))
}

// --- lists ---

async fn create_list(
    State(state): State<AppState>,
    Path(board_id): Path<String>,
    body: Bytes,
) -> ApiResult<Json<List>> {
    let input: CreateList = required_json(&body)?;
    let mut db = state.db.write().await;
    if !db.boards.contains_key(&board_id) {
        return Err(not_found("board"));
    }
    let list = List {
        id: new_id(),
        name: input.name,
        id_board: board_id,
        closed: false,
    };
    db.lists.insert(list.id.clone(), list.clone());
    Ok(Json(list))
}

async fn lists_on_board(
    State(state): State<AppState>,
    Path(board_id): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> ApiResult<Json<Vec<List>>> {
    let db = state.db.read().await;
    if !db.boards.contains_key(&board_id) {
        return Err(not_found("board"));
    }
    let filter = query.get("filter").map(String::as_str).unwrap_or("all");
    let lists = db
        .lists
        .values()
        .filter(|l| l.id_board == board_id)
        .filter(|l| match filter {
            "open" => !l.closed,
            "closed" => l.closed,
            _ => true,
        })
        .cloned()
        .collect();
    Ok(Json(lists))
}

async fn get_list(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<List>> {
    let db = state.db.read().await;
    db.lists.get(&id).cloned().map(Json).ok_or_else(|| not_found("list"))
}

async fn rename_list(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> ApiResult<Json<List>> {
    let input: Value = required_json(&body)?;
    let name = input
        .get("value")
        .and_then(Value::as_str)
        .ok_or_else(|| bad_request("invalid value for value"))?;
    let mut db = state.db.write().await;
    let list = db.lists.get_mut(&id).ok_or_else(|| not_found("list"))?;
    list.name = name.to_string();
    Ok(Json(list.clone()))
}

async fn cards_on_list(
    State(state): State<AppState>,
    Path(list_id): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> ApiResult<Json<Vec<Value>>> {
    let db = state.db.read().await;
    if !db.lists.contains_key(&list_id) {
        return Err(not_found("list"));
    }
    let fields: Option<Vec<&str>> = query.get("fields").map(|f| f.split(',').collect());
    let cards = db
        .cards
        .values()
        .filter(|c| c.id_list == list_id)
        .map(|c| project(c, fields.as_deref()))
        .collect();
    Ok(Json(cards))
}

/// Keep only `fields` (plus `id`) of a card.
fn project(card: &Card, fields: Option<&[&str]>) -> Value {
    let mut value = serde_json::to_value(card).unwrap_or(Value::Null);
    if let (Some(fields), Value::Object(map)) = (fields, &mut value) {
        map.retain(|k, _| k == "id" || fields.contains(&k.as_str()));
    }
    value
}

async fn cards_on_board(
    State(state): State<AppState>,
    Path(board_id): Path<String>,
) -> ApiResult<Json<Vec<Card>>> {
    let db = state.db.read().await;
    if !db.boards.contains_key(&board_id) {
        return Err(not_found("board"));
    }
    Ok(Json(db.cards.values().filter(|c| c.id_board == board_id).cloned().collect()))
}

// --- cards ---

async fn create_card(State(state): State<AppState>, body: Bytes) -> ApiResult<Json<Card>> {
    let input: CreateCard = required_json(&body)?;
    let mut db = state.db.write().await;
    let id_board = db
        .lists
        .get(&input.id_list)
        .map(|l| l.id_board.clone())
        .ok_or_else(|| bad_request("invalid value for idList"))?;
    let card = Card {
        id: new_id(),
        name: input.name,
        desc: input.desc,
        id_list: input.id_list,
        id_board,
        closed: false,
    };
    db.cards.insert(card.id.clone(), card.clone());
    Ok(Json(card))
}

async fn get_card(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<Card>> {
    let db = state.db.read().await;
    db.cards.get(&id).cloned().map(Json).ok_or_else(|| not_found("card"))
}

async fn update_card(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> ApiResult<Json<Card>> {
    let input: UpdateCard = optional_json(&body)?;
    let mut db = state.db.write().await;
    if let Some(id_list) = &input.id_list {
        if !db.lists.contains_key(id_list) {
            return Err(bad_request("invalid value for idList"));
        }
    }
    let card = db.cards.get_mut(&id).ok_or_else(|| not_found("card"))?;
    if let Some(name) = input.name {
        card.name = name;
    }
    if let Some(desc) = input.desc {
        card.desc = desc;
    }
    if let Some(id_list) = input.id_list {
        card.id_list = id_list;
    }
    if let Some(closed) = input.closed {
        card.closed = closed;
    }
    Ok(Json(card.clone()))
}

async fn delete_card(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<Value>> {
    let mut db = state.db.write().await;
    db.cards
        .remove(&id)
        .map(|_| Json(serde_json::json!({ "_value": null })))
        .ok_or_else(|| not_found("card"))
}

// --- webhooks ---

async fn create_webhook(State(state): State<AppState>, body: Bytes) -> ApiResult<Json<Webhook>> {
    let input: CreateWebhook = required_json(&body)?;
    let webhook = Webhook {
        id: new_id(),
        description: input.description,
        callback_url: input.callback_url,
        id_model: input.id_model,
        active: true,
    };
    state.db.write().await.webhooks.insert(webhook.id.clone(), webhook.clone());
    Ok(Json(webhook))
}

async fn list_webhooks(State(state): State<AppState>) -> Json<Vec<Webhook>> {
    let db = state.db.read().await;
    Json(db.webhooks.values().cloned().collect())
}

async fn delete_webhook(
    State(state): State<AppState>,
    Path((_token, id)): Path<(String, String)>,
) -> ApiResult<Json<Value>> {
    let mut db = state.db.write().await;
    db.webhooks
        .remove(&id)
        .map(|_| Json(serde_json::json!({ "_value": null })))
        .ok_or_else(|| not_found("webhook"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn board_serializes_camel_case() {
        let board = Board {
            id: "b1".to_string(),
            name: "Test".to_string(),
            desc: String::new(),
            id_organization: Some("org".to_string()),
            closed: false,
        };
        let json = serde_json::to_value(&board).unwrap();
        assert_eq!(json["idOrganization"], "org");
        assert_eq!(json["closed"], false);
    }

    #[test]
    fn webhook_uses_upstream_callback_field() {
        let input: CreateWebhook = serde_json::from_str(
            r#"{"callbackURL":"https://example.com","idModel":"b1","key":"k"}"#,
        )
        .unwrap();
        assert_eq!(input.callback_url, "https://example.com");
        assert!(input.description.is_empty());
    }

    #[test]
    fn create_card_ignores_credentials_in_body() {
        let input: CreateCard =
            serde_json::from_str(r#"{"name":"c","idList":"l1","key":"k","token":"t"}"#).unwrap();
        assert_eq!(input.name, "c");
        assert!(input.desc.is_empty());
    }

    #[test]
    fn create_board_rejects_missing_name() {
        let result: Result<CreateBoard, _> = serde_json::from_str(r#"{"desc":"x"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn update_card_all_fields_optional() {
        let input: UpdateCard = serde_json::from_str("{}").unwrap();
        assert!(input.name.is_none() && input.id_list.is_none());
    }

    #[test]
    fn path_token_reads_prefix() {
        assert_eq!(path_token("/1/tokens/abc/webhooks/w1").as_deref(), Some("abc"));
        assert_eq!(path_token("/1/cards/c1"), None);
    }

    #[test]
    fn project_keeps_requested_fields_and_id() {
        let card = Card {
            id: "c1".into(),
            name: "n".into(),
            desc: "d".into(),
            id_list: "l1".into(),
            id_board: "b1".into(),
            closed: false,
        };
        let value = project(&card, Some(&["name"]));
        assert_eq!(value, serde_json::json!({"id": "c1", "name": "n"}));
    }

    #[test]
    fn ids_look_like_upstream_ids() {
        let id = new_id();
        assert_eq!(id.len(), 24);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
