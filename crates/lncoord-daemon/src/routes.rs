//! The JSON gateway surface.
//!
//! Two routes, mirroring the RPC operations:
//!
//! - `POST /v1/register_mission_control`
//! - `GET  /v1/query_aggregated_mission_control`
//!
//! The query is served unary: one response carrying every stored pair.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};

use lncoord_ops::Coordinator;
use lncoord_wire::{
    PairHistory, QueryAggregatedMissionControlResponse, RegisterMissionControlRequest,
    RegisterMissionControlResponse,
};

use crate::error::ApiError;

/// Build the gateway router around a coordinator.
pub fn router(coordinator: Arc<Coordinator>) -> Router {
    Router::new()
        .route("/v1/register_mission_control", post(register_mission_control))
        .route(
            "/v1/query_aggregated_mission_control",
            get(query_aggregated_mission_control),
        )
        .with_state(coordinator)
}

async fn register_mission_control(
    State(coordinator): State<Arc<Coordinator>>,
    Json(req): Json<RegisterMissionControlRequest>,
) -> Result<Json<RegisterMissionControlResponse>, ApiError> {
    let outcome = coordinator.register_mission_control(req).await?;
    Ok(Json(RegisterMissionControlResponse {
        success_message: outcome.success_message(),
    }))
}

async fn query_aggregated_mission_control(
    State(coordinator): State<Arc<Coordinator>>,
) -> Result<Json<QueryAggregatedMissionControlResponse>, ApiError> {
    let pairs = coordinator.query_aggregated_mission_control()?;
    Ok(Json(QueryAggregatedMissionControlResponse {
        pairs: pairs
            .into_iter()
            .map(|(key, history)| PairHistory::from_record(key, history))
            .collect(),
    }))
}
