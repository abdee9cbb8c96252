//! Tenant API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};

use crate::core::ServerState;
use crate::db::repository::tenant;
use crate::utils::validation::validate_slug;
use crate::utils::{AppError, AppResult};
use shared::models::TenantConfig;

/// GET /api/tenants/:slug - 按 slug 解析租户配置
///
/// 解析顺序：本地缓存 → 远端 → 内置默认。
pub async fn get_by_slug(
    State(state): State<ServerState>,
    Path(slug): Path<String>,
) -> AppResult<Json<TenantConfig>> {
    validate_slug(&slug)?;
    let config = state.resolver.resolve(&slug).await?;
    Ok(Json(config))
}

#[derive(Serialize)]
pub struct CurrentTenantResponse {
    pub slug: String,
    pub config: TenantConfig,
}

/// GET /api/tenants/current - 当前选定租户及其配置
pub async fn get_current(
    State(state): State<ServerState>,
) -> AppResult<Json<CurrentTenantResponse>> {
    let slug = tenant::get_current_slug(&state.pool)
        .await?
        .ok_or_else(|| AppError::not_found("No tenant selected"))?;

    let config = state.resolver.resolve(&slug).await?;
    Ok(Json(CurrentTenantResponse { slug, config }))
}

#[derive(Deserialize)]
pub struct SetCurrentRequest {
    pub slug: String,
}

/// POST /api/tenants/current - 切换当前租户
///
/// 先解析成功才落盘指针，避免指向一个任何层级都解析不到的租户。
pub async fn set_current(
    State(state): State<ServerState>,
    Json(payload): Json<SetCurrentRequest>,
) -> AppResult<Json<CurrentTenantResponse>> {
    validate_slug(&payload.slug)?;

    let config = state.resolver.resolve(&payload.slug).await?;
    tenant::set_current_slug(&state.pool, &payload.slug).await?;
    tracing::info!(slug = %payload.slug, "Current tenant switched");

    Ok(Json(CurrentTenantResponse {
        slug: payload.slug,
        config,
    }))
}
