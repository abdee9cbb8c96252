//! Sync API Handlers

use axum::{Json, extract::State};
use serde::Serialize;

use crate::core::ServerState;
use shared::models::SyncStats;

/// GET /api/sync/stats - 同步统计快照
pub async fn stats(State(state): State<ServerState>) -> Json<SyncStats> {
    Json(state.sync_service.stats_snapshot().await)
}

#[derive(Serialize)]
pub struct TriggerResponse {
    triggered: bool,
}

/// POST /api/sync/trigger - 手动触发一轮同步
///
/// 排空在后台进行，立即返回。若已有排空在执行，本次触发
/// 会被单飞守卫合并掉，同样返回 200。
pub async fn trigger(State(state): State<ServerState>) -> Json<TriggerResponse> {
    let service = state.sync_service.clone();
    tokio::spawn(async move {
        let outcome = service.run_once().await;
        tracing::debug!(?outcome, "Manual sync trigger finished");
    });
    Json(TriggerResponse { triggered: true })
}
