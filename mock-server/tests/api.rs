use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, AppState, Board, Card, List, MockConfig, Webhook};
use serde_json::Value;
use tower::ServiceExt;

const AUTH: &str = "key=key&token=token";

fn state() -> AppState {
    AppState::new(MockConfig::default())
}

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

fn bare_request(method: &str, uri: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(String::new())
        .unwrap()
}

async fn send(state: &AppState, request: Request<String>) -> axum::response::Response {
    app(state.clone()).oneshot(request).await.unwrap()
}

async fn create_board(state: &AppState, name: &str) -> Board {
    let body = format!(r#"{{"name":"{name}","key":"key","token":"token"}}"#);
    let resp = send(state, json_request("POST", "/1/boards", &body)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    body_json(resp).await
}

async fn create_list(state: &AppState, board: &str, name: &str) -> List {
    let body = format!(r#"{{"name":"{name}","key":"key","token":"token"}}"#);
    let resp = send(state, json_request("POST", &format!("/1/boards/{board}/lists"), &body)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    body_json(resp).await
}

// --- auth ---

#[tokio::test]
async fn missing_credentials_returns_401() {
    let resp = send(&state(), bare_request("GET", "/1/boards/b1")).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_bytes(resp).await, "invalid key");
}

#[tokio::test]
async fn wrong_token_returns_401() {
    let resp = send(&state(), bare_request("GET", "/1/boards/b1?key=key&token=nope")).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_bytes(resp).await, "invalid token");
}

#[tokio::test]
async fn credentials_accepted_in_body() {
    let state = state();
    let board = create_board(&state, "Body auth").await;
    assert_eq!(board.name, "Body auth");
    assert!(!board.closed);
}

#[tokio::test]
async fn token_accepted_from_webhook_path() {
    let resp = send(&state(), bare_request("GET", "/1/tokens/token/webhooks?key=key")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let hooks: Vec<Webhook> = body_json(resp).await;
    assert!(hooks.is_empty());
}

// --- throttle ---

#[tokio::test]
async fn throttle_answers_first_requests_with_429() {
    let state = AppState::new(MockConfig {
        throttle_first: 2,
        ..MockConfig::default()
    });
    let uri = "/1/tokens/token/webhooks?key=key";

    for _ in 0..2 {
        let resp = send(&state, bare_request("GET", uri)).await;
        assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
    }
    let resp = send(&state, bare_request("GET", uri)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(state.hits(), 3);
}

#[tokio::test]
async fn throttle_runs_before_auth() {
    let state = state();
    state.throttle_next(1);
    let resp = send(&state, bare_request("GET", "/1/boards/b1")).await;
    assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
}

// --- boards ---

#[tokio::test]
async fn create_board_missing_name_returns_400() {
    let resp = send(
        &state(),
        json_request("POST", "/1/boards", r#"{"desc":"x","key":"key","token":"token"}"#),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn get_board_not_found() {
    let resp = send(&state(), bare_request("GET", &format!("/1/boards/missing?{AUTH}"))).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_board_with_credentials_only() {
    let state = state();
    let board = create_board(&state, "Unchanged").await;

    let resp = send(&state, bare_request("PUT", &format!("/1/boards/{}?{AUTH}", board.id))).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Board = body_json(resp).await;
    assert_eq!(updated, board);
}

#[tokio::test]
async fn lists_on_board_filter() {
    let state = state();
    let board = create_board(&state, "Filtered").await;
    create_list(&state, &board.id, "Todo").await;

    let resp = send(
        &state,
        bare_request("GET", &format!("/1/boards/{}/lists?{AUTH}&filter=open", board.id)),
    )
    .await;
    let lists: Vec<List> = body_json(resp).await;
    assert_eq!(lists.len(), 1);

    let resp = send(
        &state,
        bare_request("GET", &format!("/1/boards/{}/lists?{AUTH}&filter=closed", board.id)),
    )
    .await;
    let lists: Vec<List> = body_json(resp).await;
    assert!(lists.is_empty());
}

// --- cards ---

#[tokio::test]
async fn create_card_unknown_list_returns_400() {
    let resp = send(
        &state(),
        json_request(
            "POST",
            "/1/cards",
            r#"{"name":"c","idList":"nope","key":"key","token":"token"}"#,
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn cards_on_list_projects_fields() {
    let state = state();
    let board = create_board(&state, "Fields").await;
    let list = create_list(&state, &board.id, "Todo").await;
    let body = format!(
        r#"{{"name":"Card","desc":"long","idList":"{}","key":"key","token":"token"}}"#,
        list.id
    );
    let resp = send(&state, json_request("POST", "/1/cards", &body)).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = send(
        &state,
        bare_request("GET", &format!("/1/lists/{}/cards?{AUTH}&fields=name%2Cdesc", list.id)),
    )
    .await;
    let cards: Vec<Value> = body_json(resp).await;
    assert_eq!(cards.len(), 1);
    let card = cards[0].as_object().unwrap();
    assert_eq!(card.len(), 3);
    assert_eq!(card["desc"], "long");
    assert!(!card.contains_key("idList"));
}

// --- full lifecycle ---

#[tokio::test]
async fn board_list_card_lifecycle() {
    let state = state();

    let board = create_board(&state, "Lifecycle").await;
    let todo = create_list(&state, &board.id, "Todo").await;
    let done = create_list(&state, &board.id, "Done").await;
    assert_eq!(todo.id_board, board.id);

    // create card
    let body = format!(
        r#"{{"name":"Walk dog","idList":"{}","key":"key","token":"token"}}"#,
        todo.id
    );
    let resp = send(&state, json_request("POST", "/1/cards", &body)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let card: Card = body_json(resp).await;
    assert_eq!(card.id_board, board.id);

    // move it
    let body = format!(r#"{{"idList":"{}","key":"key","token":"token"}}"#, done.id);
    let resp = send(&state, json_request("PUT", &format!("/1/cards/{}", card.id), &body)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let moved: Card = body_json(resp).await;
    assert_eq!(moved.id_list, done.id);
    assert_eq!(moved.name, "Walk dog"); // unchanged

    // board sees it
    let resp = send(
        &state,
        bare_request("GET", &format!("/1/boards/{}/cards?{AUTH}", board.id)),
    )
    .await;
    let cards: Vec<Card> = body_json(resp).await;
    assert_eq!(cards, vec![moved.clone()]);

    // delete
    let resp = send(&state, bare_request("DELETE", &format!("/1/cards/{}?{AUTH}", card.id))).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let value: Value = body_json(resp).await;
    assert_eq!(value, serde_json::json!({"_value": null}));

    // gone
    let resp = send(&state, bare_request("GET", &format!("/1/cards/{}?{AUTH}", card.id))).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn webhook_lifecycle() {
    let state = state();
    let board = create_board(&state, "Hooked").await;

    let body = format!(
        r#"{{"description":"d","callbackURL":"https://example.com/hook","idModel":"{}","key":"key"}}"#,
        board.id
    );
    let resp = send(&state, json_request("POST", "/1/tokens/token/webhooks", &body)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let hook: Webhook = body_json(resp).await;
    assert!(hook.active);
    assert_eq!(hook.id_model, board.id);

    let resp = send(
        &state,
        bare_request("DELETE", &format!("/1/tokens/token/webhooks/{}?key=key", hook.id)),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = send(
        &state,
        bare_request("DELETE", &format!("/1/tokens/token/webhooks/{}?key=key", hook.id)),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
