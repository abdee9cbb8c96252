// shared/src/models/lead.rs
use serde::{Deserialize, Serialize};
use validator::Validate;

/// 线索同步状态
///
/// 状态机：`PENDING → SYNCED` 或 `PENDING → ERROR`。
/// `ERROR` 记录在下次同步时仍然可重试。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[serde(rename_all = "UPPERCASE")]
#[cfg_attr(feature = "db", sqlx(rename_all = "UPPERCASE"))]
pub enum SyncStatus {
    /// 已本地落盘，等待上传
    Pending,
    /// 已成功上传到中心库
    Synced,
    /// 上次上传失败（保留错误信息，仍可重试）
    Error,
}

impl SyncStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncStatus::Pending => "PENDING",
            SyncStatus::Synced => "SYNCED",
            SyncStatus::Error => "ERROR",
        }
    }
}

/// 本地持久化的访客线索记录
///
/// 由 kiosk 采集时写入本地库，仅由 Sync Worker 修改同步状态，
/// 核心逻辑从不删除（数据保留策略是外部关注点）。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct LeadRecord {
    /// 本地自增 ID
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    /// 采集时的租户 slug
    pub tenant_slug: String,
    /// 采集时间 (Unix millis)
    pub created_at: i64,
    pub sync_status: SyncStatus,
    /// 同步成功时间 (Unix millis)
    pub synced_at: Option<i64>,
    /// 上次同步失败原因
    pub error_message: Option<String>,
}

/// 创建线索的请求体
///
/// 校验失败（缺少姓名/邮箱、邮箱格式非法）立即返回 400，
/// 校验通过后写入本地库必定成功——不依赖网络。
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LeadCreate {
    #[validate(length(min = 1, max = 200, message = "name must be 1-200 characters"))]
    pub name: String,
    #[validate(email(message = "invalid email format"))]
    pub email: String,
    #[validate(length(max = 100, message = "phone is too long"))]
    pub phone: Option<String>,
}

/// 线索统计（按同步状态分组）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LeadStats {
    pub total: i64,
    pub pending: i64,
    pub synced: i64,
    pub error: i64,
}
