use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;

use leadscore::workflows::leads::scoring::repository::{
    CommunicationLog, InteractionLog, ScoreStore,
};
use leadscore::workflows::leads::scoring::{scoring_router, scoring_rules, LeadScoringService};

pub(crate) fn with_scoring_routes<I, C, S>(
    service: Arc<LeadScoringService<I, C, S>>,
) -> axum::Router
where
    I: InteractionLog + 'static,
    C: CommunicationLog + 'static,
    S: ScoreStore + 'static,
{
    scoring_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/scoring/rules",
            axum::routing::get(scoring_rules_endpoint),
        )
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct ScoringRuleView {
    pub(crate) factor: &'static str,
    pub(crate) condition: &'static str,
    pub(crate) points: u8,
    pub(crate) description: &'static str,
}

/// Read-only dump of the rubric so sales ops can audit how points accrue.
pub(crate) async fn scoring_rules_endpoint() -> Json<Vec<ScoringRuleView>> {
    let views = scoring_rules()
        .iter()
        .map(|rule| ScoringRuleView {
            factor: rule.factor.label(),
            condition: rule.trigger.key(),
            points: rule.points,
            description: rule.description,
        })
        .collect();
    Json(views)
}
