use std::path::PathBuf;

use shared::util::DAY_MS;

/// 服务器配置 - kiosk 节点的所有配置项
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | /var/lib/kiosk | 工作目录 |
/// | HTTP_PORT | 3000 | HTTP 服务端口 |
/// | REMOTE_API_URL | http://localhost:4000 | 中心库地址 |
/// | REMOTE_API_KEY | (无) | 中心库凭证 |
/// | LICENSE_KEY | (无) | 本机许可证密钥 |
/// | SYNC_INTERVAL_SECS | 30 | 同步轮询间隔(秒) |
/// | REQUEST_TIMEOUT_MS | 10000 | 远端请求超时(毫秒) |
/// | LICENSE_CACHE_MAX_AGE_DAYS | 7 | 离线许可证宽限期(天) |
/// | ENVIRONMENT | development | 运行环境 |
///
/// # 示例
///
/// ```ignore
/// WORK_DIR=/data/kiosk HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录，存储数据库、设备标识、许可证缓存、日志
    pub work_dir: String,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// 运行环境: development | staging | production
    pub environment: String,

    // === 远端中心库 ===
    /// 中心库 URL
    pub remote_api_url: String,
    /// 中心库凭证 (Bearer)
    pub remote_api_key: Option<String>,
    /// 远端请求超时 (毫秒)，所有远端调用共用
    pub request_timeout_ms: u64,

    // === 许可证 ===
    /// 本机许可证密钥
    pub license_key: Option<String>,
    /// 离线许可证宽限期 (天)
    pub license_cache_max_age_days: i64,

    // === 同步 ===
    /// Sync Worker 轮询间隔 (秒)
    pub sync_interval_secs: u64,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/kiosk".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),

            remote_api_url: std::env::var("REMOTE_API_URL")
                .unwrap_or_else(|_| "http://localhost:4000".into()),
            remote_api_key: std::env::var("REMOTE_API_KEY").ok(),
            request_timeout_ms: std::env::var("REQUEST_TIMEOUT_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(10_000),

            license_key: std::env::var("LICENSE_KEY").ok(),
            license_cache_max_age_days: std::env::var("LICENSE_CACHE_MAX_AGE_DAYS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(7),

            sync_interval_secs: std::env::var("SYNC_INTERVAL_SECS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(30),
        }
    }

    /// 使用自定义值覆盖部分配置
    ///
    /// 常用于测试场景
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.http_port = http_port;
        config
    }

    /// 数据库目录: `work_dir/database`
    pub fn database_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("database")
    }

    /// 认证目录 (设备标识、许可证缓存): `work_dir/auth`
    pub fn auth_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("auth")
    }

    /// 日志目录: `work_dir/logs`
    pub fn logs_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("logs")
    }

    /// 确保工作目录结构存在
    pub fn ensure_work_dir_structure(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(self.database_dir())?;
        std::fs::create_dir_all(self.auth_dir())?;
        std::fs::create_dir_all(self.logs_dir())?;
        Ok(())
    }

    /// 离线许可证宽限期 (毫秒)
    pub fn license_cache_max_age_ms(&self) -> i64 {
        self.license_cache_max_age_days * DAY_MS
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
