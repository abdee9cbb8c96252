//! 健康检查路由
//!
//! # 路由列表
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /api/health | GET | 简单健康检查 |
//!
//! # 响应示例
//!
//! ```json
//! {
//!   "status": "ok",
//!   "version": "0.1.0",
//!   "license_usable": true,
//!   "device_id": "a2f1..."
//! }
//! ```

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/health", get(health))
}

/// 健康检查响应
#[derive(Serialize)]
pub struct HealthResponse {
    /// 状态 (ok | error)
    status: &'static str,
    /// 版本号
    version: &'static str,
    /// 本机设备标识
    device_id: String,
    /// 许可证当前是否可用
    license_usable: bool,
}

/// GET /api/health - 健康检查
async fn health(State(state): State<ServerState>) -> Json<HealthResponse> {
    let license_usable = state.license.state().await.is_usable();
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        device_id: state.license.device_id().to_string(),
        license_usable,
    })
}
