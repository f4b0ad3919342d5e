use axum::http::StatusCode;
use axum::{Json, Router, routing::post};
use log::{error, info};

use crate::config::{ServerConfig, SolveSettings};
use crate::data::{SolveRequest, TournamentOutcome};
use crate::error::TournamentError;
use crate::study::{StudyRequest, StudyRow, run_study};
use crate::tournament::solve_tournament;

type ApiError = (StatusCode, String);

fn reject(e: TournamentError) -> ApiError {
    let status = if e.is_configuration() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    (status, e.to_string())
}

fn join_failed(e: tokio::task::JoinError) -> ApiError {
    error!("solve task failed: {}", e);
    (StatusCode::INTERNAL_SERVER_ERROR, "solve task failed".to_string())
}

async fn solve_handler(Json(input): Json<SolveRequest>) -> Result<Json<TournamentOutcome>, ApiError> {
    let settings = SolveSettings::try_from(&input).map_err(reject)?;
    let outcome = tokio::task::spawn_blocking(move || solve_tournament(&settings))
        .await
        .map_err(join_failed)?
        .map_err(reject)?;
    Ok(Json(outcome))
}

async fn study_handler(Json(input): Json<StudyRequest>) -> Result<Json<Vec<StudyRow>>, ApiError> {
    let rows = tokio::task::spawn_blocking(move || run_study(&input))
        .await
        .map_err(join_failed)?
        .map_err(reject)?;
    Ok(Json(rows))
}

pub fn router() -> Router {
    Router::new()
        .route("/v1/tournament/solve", post(solve_handler))
        .route("/v1/tournament/study", post(study_handler))
}

pub async fn run_server(config: ServerConfig) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;

    info!("Server running at http://{}", listener.local_addr()?);

    axum::serve(listener, router()).await
}
