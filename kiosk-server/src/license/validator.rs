//! 许可证验证器 - 管理 kiosk 的授权状态
//!
//! # 验证流程
//!
//! ```text
//! UNVALIDATED → VALIDATING → { VALID, INVALID, VALID_OFFLINE }
//! ```
//!
//! 1. 在线验证：从远端获取许可证记录
//!    - 网络失败：缓存在宽限期内 → VALID_OFFLINE，否则 INVALID
//!    - 远端说不可用（非 ACTIVE / 已过期 / 已暂停）→ INVALID（缓存保留）
//! 2. 设备绑定：设备已在 `device_ids` 中，或还有配额则远端追加；
//!    配额已满 → INVALID（device limit reached）
//! 3. 成功后整体刷新本地缓存
//!
//! VALID_OFFLINE 是有意的可用性优先策略，以 7 天缓存窗口为界；
//! 窗口过期后必须重新在线验证。

use std::sync::Arc;
use tokio::sync::RwLock;

use super::{DeviceIdentity, LicenseCache};
use crate::cloud::{RemoteError, RemoteStore};
use shared::models::{CachedLicense, LicenseRecord, LicenseStatus};
use shared::util::{DAY_MS, now_millis};

/// Fallback validity for licenses with no expiry: one year from the check.
const NO_EXPIRY_VALID_MS: i64 = 365 * DAY_MS;

/// 拒绝原因分类
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidReason {
    /// 许可证密钥不存在
    NotFound,
    /// 状态不可用或已过期
    NotUsable(String),
    /// 设备配额已满（Conflict 类，提示用户可操作）
    DeviceLimit(String),
    /// 离线且无可用缓存
    Offline(String),
}

impl InvalidReason {
    pub fn message(&self) -> String {
        match self {
            InvalidReason::NotFound => "License key not found".to_string(),
            InvalidReason::NotUsable(msg)
            | InvalidReason::DeviceLimit(msg)
            | InvalidReason::Offline(msg) => msg.clone(),
        }
    }
}

/// 验证状态机
#[derive(Debug, Clone, PartialEq)]
pub enum LicenseState {
    Unvalidated,
    Validating,
    /// 在线验证通过
    Valid(LicenseRecord),
    /// 离线但缓存在宽限期内
    ValidOffline(CachedLicense),
    Invalid(InvalidReason),
}

impl LicenseState {
    /// kiosk 是否可以继续运行
    pub fn is_usable(&self) -> bool {
        matches!(self, LicenseState::Valid(_) | LicenseState::ValidOffline(_))
    }

    /// 当前生效的租户 ID（VALID / VALID_OFFLINE 时存在）
    pub fn tenant_id(&self) -> Option<&str> {
        match self {
            LicenseState::Valid(lic) => Some(&lic.tenant_id),
            LicenseState::ValidOffline(cached) => Some(&cached.tenant_id),
            _ => None,
        }
    }
}

pub struct LicenseValidator {
    remote: Arc<dyn RemoteStore>,
    cache: LicenseCache,
    device: DeviceIdentity,
    cache_max_age_ms: i64,
    state: RwLock<LicenseState>,
}

impl LicenseValidator {
    pub fn new(
        remote: Arc<dyn RemoteStore>,
        cache: LicenseCache,
        device: DeviceIdentity,
        cache_max_age_ms: i64,
    ) -> Self {
        Self {
            remote,
            cache,
            device,
            cache_max_age_ms,
            state: RwLock::new(LicenseState::Unvalidated),
        }
    }

    /// 本机设备标识
    pub fn device_id(&self) -> &str {
        self.device.id()
    }

    /// 当前状态快照
    pub async fn state(&self) -> LicenseState {
        self.state.read().await.clone()
    }

    /// 执行一次完整验证并更新状态
    pub async fn validate(&self, license_key: &str) -> LicenseState {
        {
            let mut state = self.state.write().await;
            *state = LicenseState::Validating;
        }

        let result = self.validate_inner(license_key, self.device.id()).await;

        match &result {
            LicenseState::Valid(lic) => {
                tracing::info!(tenant = %lic.tenant_id, "License validated online");
            }
            LicenseState::ValidOffline(cached) => {
                let age_days = (now_millis() - cached.last_check) / DAY_MS;
                tracing::warn!(
                    tenant = %cached.tenant_id,
                    age_days,
                    "Remote unreachable, proceeding on cached license"
                );
            }
            LicenseState::Invalid(reason) => {
                tracing::warn!("License validation failed: {}", reason.message());
            }
            _ => {}
        }

        let mut state = self.state.write().await;
        *state = result.clone();
        result
    }

    async fn validate_inner(&self, license_key: &str, device_id: &str) -> LicenseState {
        let license = match self.remote.fetch_license(license_key).await {
            Ok(Some(lic)) => lic,
            Ok(None) => return LicenseState::Invalid(InvalidReason::NotFound),
            Err(e) if e.is_network() => return self.offline_fallback(license_key, &e),
            Err(e) => {
                return LicenseState::Invalid(InvalidReason::NotUsable(e.to_string()));
            }
        };

        let now = now_millis();
        if !license.is_usable(now) {
            // 缓存不清除：之后的重试可能再次成功
            let reason = match license.status {
                LicenseStatus::Active => "License expired".to_string(),
                status => format!("License is {}", status.as_str()),
            };
            return LicenseState::Invalid(InvalidReason::NotUsable(reason));
        }

        // 设备绑定检查
        let mut license = license;
        if !license.has_device(device_id) {
            if !license.has_device_capacity() {
                return LicenseState::Invalid(InvalidReason::DeviceLimit(format!(
                    "Device limit reached ({} of {} devices bound)",
                    license.device_ids.len(),
                    license.max_devices
                )));
            }
            match self.remote.bind_device(license_key, device_id).await {
                Ok(()) => {
                    license.device_ids.push(device_id.to_string());
                    license.last_validated_at = Some(now);
                }
                // 绑定写入遇到网络故障：等同于整次在线验证失败
                Err(e) if e.is_network() => return self.offline_fallback(license_key, &e),
                Err(e) => {
                    return LicenseState::Invalid(InvalidReason::NotUsable(e.to_string()));
                }
            }
        }

        // 成功路径上总是整体刷新缓存
        let cached = CachedLicense {
            license_key: license.license_key.clone(),
            tenant_id: license.tenant_id.clone(),
            valid_until: license.expires_at.unwrap_or(now + NO_EXPIRY_VALID_MS),
            last_check: now,
        };
        if let Err(e) = self.cache.save(&cached) {
            // 缓存写失败不影响本次在线验证结果，只影响之后的离线宽限
            tracing::warn!("Failed to persist license cache: {e}");
        }

        LicenseState::Valid(license)
    }

    fn offline_fallback(&self, license_key: &str, cause: &RemoteError) -> LicenseState {
        match self.cache.get_valid(license_key, self.cache_max_age_ms) {
            Some(cached) => LicenseState::ValidOffline(cached),
            None => LicenseState::Invalid(InvalidReason::Offline(format!(
                "Remote store unreachable and no valid cached license: {cause}"
            ))),
        }
    }
}
