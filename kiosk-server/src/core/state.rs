use sqlx::SqlitePool;
use std::sync::Arc;
use std::time::Duration;

use crate::cloud::{CloudClient, RemoteStore};
use crate::core::Config;
use crate::core::tasks::{BackgroundTasks, TaskKind};
use crate::db::DbService;
use crate::license::{DeviceIdentity, LicenseCache, LicenseValidator};
use crate::sync::{SyncService, SyncWorker};
use crate::tenant::TenantResolver;
use crate::utils::AppError;

/// 服务器状态 - 持有所有服务的单例引用
///
/// ServerState 是 kiosk 节点的核心数据结构，使用 Arc 实现浅拷贝。
///
/// # 服务组件
///
/// | 字段 | 说明 |
/// |------|------|
/// | config | 配置项 (不可变) |
/// | pool | 嵌入式 SQLite (本地持久存储) |
/// | remote | 中心库客户端 |
/// | sync_service | 线索同步 (单飞排空) |
/// | license | 许可证验证器 |
/// | resolver | 租户解析器 |
#[derive(Clone)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// 本地持久存储
    pub pool: SqlitePool,
    /// 中心库客户端
    pub remote: Arc<dyn RemoteStore>,
    /// 线索同步服务
    pub sync_service: Arc<SyncService>,
    /// 许可证验证器
    pub license: Arc<LicenseValidator>,
    /// 租户解析器
    pub resolver: Arc<TenantResolver>,
}

impl ServerState {
    /// 初始化服务器状态
    ///
    /// 按顺序初始化：
    /// 1. 工作目录结构
    /// 2. 数据库 (work_dir/database/kiosk.db)
    /// 3. 远端客户端、设备标识、许可证验证器、同步服务、租户解析器
    pub async fn initialize(config: &Config) -> Result<Self, AppError> {
        // 0. Ensure work_dir structure exists
        config
            .ensure_work_dir_structure()
            .map_err(|e| AppError::internal(format!("Failed to create work directory: {e}")))?;

        // 1. Initialize DB
        let db_path = config.database_dir().join("kiosk.db");
        let db_service = DbService::new(&db_path.to_string_lossy()).await?;
        let pool = db_service.pool;

        // 2. Remote store client (bounded timeout on every call)
        let client = CloudClient::new(
            config.remote_api_url.clone(),
            config.remote_api_key.clone(),
            config.request_timeout_ms,
        )
        .map_err(|e| AppError::internal(format!("Failed to build remote client: {e}")))?;
        let remote: Arc<dyn RemoteStore> = Arc::new(client);

        // 3. License stack
        let auth_dir = config.auth_dir();
        let device = DeviceIdentity::load_or_generate(&auth_dir)
            .map_err(|e| AppError::internal(format!("Failed to load device identity: {e}")))?;
        let license = Arc::new(LicenseValidator::new(
            remote.clone(),
            LicenseCache::new(&auth_dir),
            device,
            config.license_cache_max_age_ms(),
        ));

        // 4. Sync + tenant resolution
        let sync_service = Arc::new(SyncService::new(pool.clone(), remote.clone()));
        let resolver = Arc::new(TenantResolver::new(pool.clone(), remote.clone()));

        Ok(Self {
            config: config.clone(),
            pool,
            remote,
            sync_service,
            license,
            resolver,
        })
    }

    /// 注册后台任务
    ///
    /// 必须在 `Server::run()` 内、开始服务前调用
    pub fn start_background_tasks(&self, tasks: &mut BackgroundTasks) {
        let worker = SyncWorker::new(
            self.sync_service.clone(),
            Duration::from_secs(self.config.sync_interval_secs),
            tasks.shutdown_token(),
        );
        tasks.spawn("sync_worker", TaskKind::Periodic, worker.run());
    }
}
