//! Dashboard route handlers.
//!
//! Each handler reads the current topology, runs the layout heuristics
//! it needs, builds view types, and returns a JSON envelope. Handlers
//! never rebuild the topology; block layout is recomputed per request
//! because it depends only on the requested width.

use axum::Json;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::{Deserialize, Serialize};
use tracing::debug;

use warpgrid_topology::{
    BlockGrouper, GroupKey, GroupSummary, HeightScale, bucket_by_status, compute_column_strategy,
};

use crate::DashboardState;
use crate::views::*;

/// Response wrapper for consistent API format.
#[derive(Serialize)]
struct ApiResponse<T: Serialize> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    fn ok(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            data: Some(data),
            error: None,
        })
    }
}

fn error_response(msg: &str, status: StatusCode) -> impl IntoResponse {
    (
        status,
        Json(ApiResponse::<()> {
            success: false,
            data: None,
            error: Some(msg.to_string()),
        }),
    )
}

// ── Topology ────────────────────────────────────────────────────

/// GET /topology
pub async fn topology(State(state): State<DashboardState>) -> impl IntoResponse {
    let topology = state.current().await;
    let columns = compute_column_strategy(&topology, &state.config.columns);
    let scale = HeightScale::for_topology(&topology, &state.config.scale);

    ApiResponse::ok(TopologyView::build(&topology, columns, &scale)).into_response()
}

/// GET /topology/groups/{job}/{group}
pub async fn task_group(
    State(state): State<DashboardState>,
    Path((job, group)): Path<(String, String)>,
) -> impl IntoResponse {
    let topology = state.current().await;
    let key = GroupKey::new(job, group);

    match GroupSummary::for_group(&topology, &key) {
        Some(summary) => {
            let view = GroupView::build(summary, topology.siblings(&key));
            ApiResponse::ok(view).into_response()
        }
        None => error_response(
            &format!("task group {key} has no placed allocations"),
            StatusCode::NOT_FOUND,
        )
        .into_response(),
    }
}

// ── Allocation Blocks ───────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct BlocksQuery {
    /// Available row width in pixels.
    pub width: f64,
}

/// GET /topology/blocks?width=<px>
pub async fn allocation_blocks(
    State(state): State<DashboardState>,
    query: Result<Query<BlocksQuery>, QueryRejection>,
) -> impl IntoResponse {
    let query = match query {
        Ok(Query(query)) => query,
        Err(rejection) => {
            return error_response(&rejection.body_text(), StatusCode::BAD_REQUEST)
                .into_response();
        }
    };
    if !query.width.is_finite() || query.width < 0.0 {
        return error_response(
            "width must be a finite non-negative number",
            StatusCode::BAD_REQUEST,
        )
        .into_response();
    }

    let topology = state.current().await;
    let buckets = bucket_by_status(topology.allocations());
    let grouper = BlockGrouper::new(state.config.blocks.clone());
    let layout = grouper.layout(&buckets, query.width);
    debug!(width = query.width, buckets = layout.len(), "block row computed");

    ApiResponse::ok(BlockRowView::build(query.width, &layout)).into_response()
}
