//! License API Handlers

use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};

use crate::core::ServerState;
use crate::license::LicenseState;
use crate::utils::{AppError, AppResult};
use shared::models::{CachedLicense, LicenseRecord};

#[derive(Deserialize)]
pub struct ValidateRequest {
    pub license_key: String,
    /// 可选的设备标识；缺省使用本机标识。传入不同值视为配置错误。
    pub device_id: Option<String>,
}

#[derive(Serialize)]
pub struct ValidateResponse {
    pub valid: bool,
    /// VALID | VALID_OFFLINE | INVALID
    pub state: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license: Option<LicenseRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cached: Option<CachedLicense>,
}

/// POST /api/licenses/validate - 执行一次许可证验证
///
/// 可用 (在线或离线宽限内) 返回 200 `valid: true`；被拒返回 403
/// `valid: false` 并携带具名原因。
pub async fn validate(
    State(state): State<ServerState>,
    Json(payload): Json<ValidateRequest>,
) -> AppResult<(StatusCode, Json<ValidateResponse>)> {
    if payload.license_key.trim().is_empty() {
        return Err(AppError::validation("license_key must not be empty"));
    }
    if let Some(device_id) = &payload.device_id {
        if device_id != state.license.device_id() {
            return Err(AppError::validation(
                "device_id does not match this kiosk's device identity",
            ));
        }
    }

    let response = match state.license.validate(payload.license_key.trim()).await {
        LicenseState::Valid(license) => (
            StatusCode::OK,
            Json(ValidateResponse {
                valid: true,
                state: "VALID",
                message: None,
                license: Some(license),
                cached: None,
            }),
        ),
        LicenseState::ValidOffline(cached) => (
            StatusCode::OK,
            Json(ValidateResponse {
                valid: true,
                state: "VALID_OFFLINE",
                message: None,
                license: None,
                cached: Some(cached),
            }),
        ),
        LicenseState::Invalid(reason) => (
            StatusCode::FORBIDDEN,
            Json(ValidateResponse {
                valid: false,
                state: "INVALID",
                message: Some(reason.message()),
                license: None,
                cached: None,
            }),
        ),
        // validate() 总是落在终态，这两个分支不可达
        LicenseState::Unvalidated | LicenseState::Validating => {
            return Err(AppError::internal("License validation did not complete"));
        }
    };

    Ok(response)
}

#[derive(Serialize)]
pub struct StateResponse {
    pub usable: bool,
    pub state: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<String>,
}

/// GET /api/licenses/state - 当前验证状态快照 (不触发验证)
pub async fn state(State(state): State<ServerState>) -> Json<StateResponse> {
    let current = state.license.state().await;
    Json(StateResponse {
        usable: current.is_usable(),
        tenant_id: current.tenant_id().map(str::to_string),
        state: state_name(&current),
    })
}

fn state_name(state: &LicenseState) -> &'static str {
    match state {
        LicenseState::Unvalidated => "UNVALIDATED",
        LicenseState::Validating => "VALIDATING",
        LicenseState::Valid(_) => "VALID",
        LicenseState::ValidOffline(_) => "VALID_OFFLINE",
        LicenseState::Invalid(_) => "INVALID",
    }
}
