//! JSON API over the training session

mod error;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use chess_trainer_core::engine::EngineGateway;
use chess_trainer_core::game::{result_text, to_fen};
use chess_trainer_core::{
    parse_fen, play_move, AnalysisResult, EloRating, PersonalityProfile, PersonalityUpdate,
};
use serde::{Deserialize, Serialize};
use shakmaty::Position;
use tower_http::trace::TraceLayer;

use crate::AppState;
pub use error::ApiError;

pub fn router<G>(state: Arc<AppState<G>>) -> Router
where
    G: EngineGateway + 'static,
{
    Router::new()
        .route("/analyze", post(analyze::<G>))
        .route("/hints", post(hints::<G>))
        .route("/personality", get(get_personality::<G>).post(set_personality::<G>))
        .route("/move", post(make_move))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub fen: String,
    pub elo: Option<i32>,
    pub time_ms: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct PositionRequest {
    pub fen: String,
}

#[derive(Debug, Deserialize)]
pub struct MoveRequest {
    pub fen: String,
    pub uci: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MoveResponse {
    pub fen: String,
    pub game_over: bool,
    pub result: String,
}

/// POST /analyze
///
/// Runs one selection cycle. A request arriving while another analysis is
/// running gets 409.
pub async fn analyze<G>(
    State(state): State<Arc<AppState<G>>>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<AnalysisResult>, ApiError>
where
    G: EngineGateway + 'static,
{
    let position = parse_fen(&request.fen)?;
    let elo = match request.elo {
        Some(elo) => EloRating::new(elo)?,
        None => state.session.default_elo(),
    };
    let time_limit = request
        .time_ms
        .map(Duration::from_millis)
        .unwrap_or_else(|| state.session.config().analysis_time());

    let result = state.session.try_analyze(&position, elo, time_limit).await?;
    Ok(Json(result))
}

/// POST /hints
pub async fn hints<G>(
    State(state): State<Arc<AppState<G>>>,
    Json(request): Json<PositionRequest>,
) -> Result<Json<Vec<String>>, ApiError>
where
    G: EngineGateway + 'static,
{
    let position = parse_fen(&request.fen)?;
    Ok(Json(state.session.hints(&position)))
}

pub async fn get_personality<G>(State(state): State<Arc<AppState<G>>>) -> Json<PersonalityProfile>
where
    G: EngineGateway + 'static,
{
    Json(state.session.personality())
}

/// POST /personality with any subset of the five traits
pub async fn set_personality<G>(
    State(state): State<Arc<AppState<G>>>,
    Json(update): Json<PersonalityUpdate>,
) -> Json<PersonalityProfile>
where
    G: EngineGateway + 'static,
{
    Json(state.session.set_personality(&update))
}

/// POST /move
///
/// Validates and applies a move without touching the engine.
pub async fn make_move(Json(request): Json<MoveRequest>) -> Result<Json<MoveResponse>, ApiError> {
    let position = parse_fen(&request.fen)?;
    let next = play_move(&position, &request.uci)?;
    Ok(Json(MoveResponse {
        fen: to_fen(&next),
        game_over: next.is_game_over(),
        result: result_text(&next).to_string(),
    }))
}

pub async fn health() -> &'static str {
    "OK"
}
