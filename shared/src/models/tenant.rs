// shared/src/models/tenant.rs
use serde::{Deserialize, Serialize};

/// 租户主题（品牌化外观，由 UI 层消费）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantTheme {
    pub primary_color: String,
    pub secondary_color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
}

impl Default for TenantTheme {
    fn default() -> Self {
        Self {
            primary_color: "#1a1a2e".to_string(),
            secondary_color: "#e94560".to_string(),
            logo_url: None,
        }
    }
}

/// 租户配置快照
///
/// 每次解析（本地缓存 / 远端 / 内置默认）产生一个不可变快照，
/// 本地缓存中一个 slug 至多对应一份。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TenantConfig {
    /// URL 友好的租户标识
    pub slug: String,
    /// 展示名称
    pub name: String,
    #[serde(default)]
    pub theme: TenantTheme,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub welcome_message: Option<String>,
}
