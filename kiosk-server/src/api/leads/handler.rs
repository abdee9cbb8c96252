//! Lead API Handlers

use axum::{Json, extract::State, http::StatusCode};

use crate::core::ServerState;
use crate::db::repository::{lead, tenant};
use crate::utils::{AppError, AppResult};
use shared::models::{LeadCreate, LeadRecord, LeadStats};

/// POST /api/leads - 采集一条线索
///
/// 写入本地存储即返回 201，不等待上行同步。线索归属于当前
/// 选定的租户；未选定租户时拒绝采集。
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<LeadCreate>,
) -> AppResult<(StatusCode, Json<LeadRecord>)> {
    let slug = tenant::get_current_slug(&state.pool)
        .await?
        .ok_or_else(|| AppError::validation("No tenant selected, cannot capture leads"))?;

    let record = lead::insert(&state.pool, payload, &slug).await?;
    tracing::info!(id = record.id, tenant = %slug, "Lead captured");

    Ok((StatusCode::CREATED, Json(record)))
}

/// GET /api/leads/stats - 本地线索统计
pub async fn stats(State(state): State<ServerState>) -> AppResult<Json<LeadStats>> {
    let stats = lead::stats(&state.pool).await?;
    Ok(Json(stats))
}
