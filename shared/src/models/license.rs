// shared/src/models/license.rs
use serde::{Deserialize, Serialize};

use crate::util::now_millis;

/// 许可证状态（中心库权威）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LicenseStatus {
    Active,
    Inactive,
    Suspended,
    Expired,
}

impl LicenseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LicenseStatus::Active => "ACTIVE",
            LicenseStatus::Inactive => "INACTIVE",
            LicenseStatus::Suspended => "SUSPENDED",
            LicenseStatus::Expired => "EXPIRED",
        }
    }
}

/// 许可证记录（中心库权威数据）
///
/// 不变式：`device_ids.len() <= max_devices`。
/// 可用判定见 [`LicenseRecord::is_usable`]。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LicenseRecord {
    pub id: String,
    /// 许可证密钥（全局唯一）
    pub license_key: String,
    pub tenant_id: String,
    pub status: LicenseStatus,
    pub license_type: String,
    /// 过期时间 (Unix millis)，None = 永不过期
    pub expires_at: Option<i64>,
    /// 允许绑定的设备数上限
    pub max_devices: u32,
    /// 已绑定的设备标识
    #[serde(default)]
    pub device_ids: Vec<String>,
    /// 上次在线验证时间 (Unix millis)
    pub last_validated_at: Option<i64>,
}

impl LicenseRecord {
    /// 许可证是否可用：`status == ACTIVE` 且未过期
    pub fn is_usable(&self, now: i64) -> bool {
        self.status == LicenseStatus::Active && self.expires_at.is_none_or(|exp| now < exp)
    }

    /// 指定设备是否已绑定
    pub fn has_device(&self, device_id: &str) -> bool {
        self.device_ids.iter().any(|d| d == device_id)
    }

    /// 是否还有设备配额
    pub fn has_device_capacity(&self) -> bool {
        (self.device_ids.len() as u32) < self.max_devices
    }
}

/// 本地缓存的许可证验证结果
///
/// 仅在一次成功的在线验证后整体写入，从不部分更新。
/// 离线可用判定见 [`CachedLicense::is_usable_offline`]。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedLicense {
    pub license_key: String,
    pub tenant_id: String,
    /// 许可证有效期 (Unix millis)
    pub valid_until: i64,
    /// 上次成功在线验证的时间 (Unix millis)
    pub last_check: i64,
}

impl CachedLicense {
    /// 离线可用：上次验证在宽限期内，且许可证本身未过期
    pub fn is_usable_offline(&self, max_age_ms: i64) -> bool {
        let now = now_millis();
        now - self.last_check < max_age_ms && now < self.valid_until
    }
}
