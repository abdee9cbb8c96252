//! HTTP API 模块
//!
//! # 路由分组
//!
//! | 前缀 | 说明 |
//! |------|------|
//! | /api/health | 健康检查 |
//! | /api/leads | 线索采集与统计 |
//! | /api/sync | 同步状态与手动触发 |
//! | /api/licenses | 许可证验证 |
//! | /api/tenants | 租户解析与当前租户 |

pub mod health;
pub mod leads;
pub mod licenses;
pub mod sync;
pub mod tenants;

use axum::Router;
use tower_http::trace::TraceLayer;

use crate::core::ServerState;

/// 组装完整路由
pub fn create_router(state: ServerState) -> Router {
    Router::new()
        .merge(health::router())
        .merge(leads::router())
        .merge(sync::router())
        .merge(licenses::router())
        .merge(tenants::router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
