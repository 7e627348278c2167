use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;

use super::domain::ClientId;
use super::repository::{CommunicationLog, InteractionLog, ScoreQuery, ScoreStore};
use super::service::{LeadScoringService, NewInteraction, ScoringServiceError};

/// Router builder exposing HTTP endpoints for interaction intake, score
/// reads, and insights.
pub fn scoring_router<I, C, S>(service: Arc<LeadScoringService<I, C, S>>) -> Router
where
    I: InteractionLog + 'static,
    C: CommunicationLog + 'static,
    S: ScoreStore + 'static,
{
    Router::new()
        .route("/api/v1/leads/scores", get(list_scores_handler::<I, C, S>))
        .route(
            "/api/v1/leads/scores/distribution",
            get(distribution_handler::<I, C, S>),
        )
        .route(
            "/api/v1/leads/:client_id/interactions",
            post(record_interaction_handler::<I, C, S>),
        )
        .route(
            "/api/v1/leads/:client_id/score",
            get(score_handler::<I, C, S>),
        )
        .route(
            "/api/v1/leads/:client_id/score/recalculate",
            post(recalculate_handler::<I, C, S>),
        )
        .route(
            "/api/v1/leads/:client_id/insights",
            get(insights_handler::<I, C, S>),
        )
        .with_state(service)
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ScoreListParams {
    #[serde(default)]
    min_score: Option<u8>,
    #[serde(default)]
    max_score: Option<u8>,
    #[serde(default)]
    date_from: Option<DateTime<Utc>>,
    #[serde(default)]
    date_to: Option<DateTime<Utc>>,
    #[serde(default = "default_limit")]
    limit: usize,
    #[serde(default)]
    offset: usize,
}

fn default_limit() -> usize {
    50
}

pub(crate) async fn record_interaction_handler<I, C, S>(
    State(service): State<Arc<LeadScoringService<I, C, S>>>,
    Path(client_id): Path<String>,
    axum::Json(interaction): axum::Json<NewInteraction>,
) -> Response
where
    I: InteractionLog + 'static,
    C: CommunicationLog + 'static,
    S: ScoreStore + 'static,
{
    let id = ClientId(client_id);
    let stored = match service.record_interaction(&id, interaction) {
        Ok(stored) => stored,
        Err(err) => return error_response(err),
    };

    match service.get_lead_score(&id) {
        Ok(Some(record)) => {
            let payload = json!({
                "interaction": stored,
                "score": record.status_view(),
            });
            (StatusCode::ACCEPTED, axum::Json(payload)).into_response()
        }
        Ok(None) => {
            let payload = json!({ "interaction": stored });
            (StatusCode::ACCEPTED, axum::Json(payload)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn score_handler<I, C, S>(
    State(service): State<Arc<LeadScoringService<I, C, S>>>,
    Path(client_id): Path<String>,
) -> Response
where
    I: InteractionLog + 'static,
    C: CommunicationLog + 'static,
    S: ScoreStore + 'static,
{
    let id = ClientId(client_id);
    match service.get_lead_score(&id) {
        Ok(Some(record)) => (StatusCode::OK, axum::Json(record.status_view())).into_response(),
        Ok(None) => unscored_response(&id),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn recalculate_handler<I, C, S>(
    State(service): State<Arc<LeadScoringService<I, C, S>>>,
    Path(client_id): Path<String>,
) -> Response
where
    I: InteractionLog + 'static,
    C: CommunicationLog + 'static,
    S: ScoreStore + 'static,
{
    let id = ClientId(client_id);
    match service.recalculate_score(&id) {
        Ok(record) => (StatusCode::OK, axum::Json(record.status_view())).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn insights_handler<I, C, S>(
    State(service): State<Arc<LeadScoringService<I, C, S>>>,
    Path(client_id): Path<String>,
) -> Response
where
    I: InteractionLog + 'static,
    C: CommunicationLog + 'static,
    S: ScoreStore + 'static,
{
    let id = ClientId(client_id);
    match service.get_scoring_insights(&id) {
        Ok(Some(insights)) => (StatusCode::OK, axum::Json(insights)).into_response(),
        Ok(None) => unscored_response(&id),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn list_scores_handler<I, C, S>(
    State(service): State<Arc<LeadScoringService<I, C, S>>>,
    Query(params): Query<ScoreListParams>,
) -> Response
where
    I: InteractionLog + 'static,
    C: CommunicationLog + 'static,
    S: ScoreStore + 'static,
{
    let filter = ScoreQuery {
        min_score: params.min_score,
        max_score: params.max_score,
        date_from: params.date_from,
        date_to: params.date_to,
    };

    match service.get_all_lead_scores(&filter, params.limit, params.offset) {
        Ok(records) => {
            let views: Vec<_> = records.iter().map(|record| record.status_view()).collect();
            (StatusCode::OK, axum::Json(views)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn distribution_handler<I, C, S>(
    State(service): State<Arc<LeadScoringService<I, C, S>>>,
) -> Response
where
    I: InteractionLog + 'static,
    C: CommunicationLog + 'static,
    S: ScoreStore + 'static,
{
    match service.get_lead_score_distribution() {
        Ok(distribution) => (StatusCode::OK, axum::Json(distribution)).into_response(),
        Err(err) => error_response(err),
    }
}

/// Clients without score history are an expected steady state, so the API
/// answers with a placeholder view rather than an error.
fn unscored_response(client_id: &ClientId) -> Response {
    let payload = json!({
        "client_id": client_id.0,
        "status": "unscored",
        "score": serde_json::Value::Null,
    });
    (StatusCode::OK, axum::Json(payload)).into_response()
}

fn error_response(err: ScoringServiceError) -> Response {
    let status = match err {
        ScoringServiceError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        ScoringServiceError::DataAccess(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let payload = json!({ "error": err.to_string() });
    (status, axum::Json(payload)).into_response()
}
