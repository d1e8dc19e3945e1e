use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde_json::json;

use super::repository::MetricsRepository;
use super::service::{StatsParams, StatsService};
use crate::access::{AccessContextResolver, CallerIdentity};

/// Router builder exposing the scoped metrics endpoint.
pub fn stats_router<A, R>(service: Arc<StatsService<A, R>>) -> Router
where
    A: AccessContextResolver + 'static,
    R: MetricsRepository + 'static,
{
    Router::new()
        .route("/api/v1/stats", get(stats_handler::<A, R>))
        .with_state(service)
}

pub(crate) async fn stats_handler<A, R>(
    State(service): State<Arc<StatsService<A, R>>>,
    headers: HeaderMap,
    Query(params): Query<StatsParams>,
) -> Response
where
    A: AccessContextResolver + 'static,
    R: MetricsRepository + 'static,
{
    let Some(identity) = bearer_identity(&headers) else {
        let payload = json!({
            "error": "missing bearer token",
        });
        return (StatusCode::UNAUTHORIZED, axum::Json(payload)).into_response();
    };

    match service.get_stats(&identity, &params).await {
        Ok(response) => (StatusCode::OK, axum::Json(response)).into_response(),
        Err(error) => {
            if error.status_code().is_server_error() {
                tracing::error!(%error, "stats request failed");
            }
            let payload = json!({
                "error": error.public_message(),
            });
            (error.status_code(), axum::Json(payload)).into_response()
        }
    }
}

fn bearer_identity(headers: &HeaderMap) -> Option<CallerIdentity> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?.trim();
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    if token.is_empty() {
        return None;
    }
    Some(CallerIdentity::new(token))
}
