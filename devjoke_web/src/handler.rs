//! Request handlers: one call per client action.

use crate::{AppState, Result};
use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    response::Html,
};
use devjoke_conversation::{ConversationSession, TurnInput, TurnResult};
use devjoke_core::{
    ChatMessage, JokeStyle, SUGGESTIONS, StyleOptions,
    prompt::{MAX_JOKES, MIN_JOKES},
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::info;
use uuid::Uuid;

const INDEX_HTML: &str = include_str!("../assets/index.html");

// Extractor results, so malformed requests answer with the JSON error body.
type PathParams<T> = std::result::Result<Path<T>, PathRejection>;
type JsonBody<T> = std::result::Result<Json<T>, JsonRejection>;

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionView {
    pub id: Uuid,
    pub messages: Vec<ChatMessage>,
}

impl From<&ConversationSession> for SessionView {
    fn from(session: &ConversationSession) -> Self {
        Self {
            id: session.id,
            messages: session.messages.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct MessageRequest {
    pub input: String,
    #[serde(default)]
    pub options: StyleOptions,
}

#[derive(Debug, Default, Deserialize)]
pub struct SuggestionRequest {
    #[serde(default)]
    pub options: StyleOptions,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TurnResponse {
    pub reply: String,
    pub turn_number: usize,
    pub messages: Vec<ChatMessage>,
}

impl TurnResponse {
    fn new(result: TurnResult, session: &ConversationSession) -> Self {
        Self {
            reply: result.response,
            turn_number: result.turn_number,
            messages: session.messages.clone(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct JokeRange {
    pub min: u32,
    pub max: u32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OptionsView {
    pub styles: Vec<String>,
    pub suggestions: Vec<String>,
    pub joke_range: JokeRange,
    pub defaults: StyleOptions,
    pub model: String,
}

pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Widget choices and defaults for the page.
pub async fn options(State(state): State<AppState>) -> Json<OptionsView> {
    Json(OptionsView {
        styles: JokeStyle::ALL
            .iter()
            .map(|style| style.label().to_string())
            .collect(),
        suggestions: SUGGESTIONS.iter().map(ToString::to_string).collect(),
        joke_range: JokeRange {
            min: MIN_JOKES,
            max: MAX_JOKES,
        },
        defaults: StyleOptions::default(),
        model: state.manager.model().to_string(),
    })
}

pub async fn create_session(State(state): State<AppState>) -> (StatusCode, Json<SessionView>) {
    let id = state.sessions.create().await;
    (
        StatusCode::CREATED,
        Json(SessionView {
            id,
            messages: Vec::new(),
        }),
    )
}

pub async fn get_session(
    State(state): State<AppState>,
    path: PathParams<Uuid>,
) -> Result<Json<SessionView>> {
    let Path(id) = path?;
    let session = state.sessions.get(id).await?;
    let session = session.lock().await;
    Ok(Json(SessionView::from(&*session)))
}

pub async fn delete_session(
    State(state): State<AppState>,
    path: PathParams<Uuid>,
) -> Result<StatusCode> {
    let Path(id) = path?;
    state.sessions.remove(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Handle a chat submission.
pub async fn post_message(
    State(state): State<AppState>,
    path: PathParams<Uuid>,
    body: JsonBody<MessageRequest>,
) -> Result<Json<TurnResponse>> {
    let Path(id) = path?;
    let Json(request) = body?;
    let session = state.sessions.get(id).await?;
    let mut session = session.lock().await;

    info!("[{id}] Message: {}", request.input);
    let result = state
        .manager
        .process_turn(&mut session, TurnInput::new(request.input, request.options))
        .await?;
    info!("[{id}] Turn {} answered", result.turn_number);

    Ok(Json(TurnResponse::new(result, &session)))
}

/// Handle a press on one of the suggested prompts.
pub async fn post_suggestion(
    State(state): State<AppState>,
    path: PathParams<(Uuid, usize)>,
    body: JsonBody<SuggestionRequest>,
) -> Result<Json<TurnResponse>> {
    let Path((id, index)) = path?;
    let Json(request) = body?;
    let session = state.sessions.get(id).await?;
    let mut session = session.lock().await;

    let result = state
        .manager
        .process_suggestion(&mut session, index, request.options)
        .await?;

    Ok(Json(TurnResponse::new(result, &session)))
}

pub async fn clear_session(
    State(state): State<AppState>,
    path: PathParams<Uuid>,
) -> Result<Json<SessionView>> {
    let Path(id) = path?;
    let session = state.sessions.get(id).await?;
    let mut session = session.lock().await;

    session.clear();
    info!("[{id}] Chat cleared");

    Ok(Json(SessionView::from(&*session)))
}
