//! Kiosk Server - 线下活动自助终端边缘节点
//!
//! # 架构概述
//!
//! 本模块是 Kiosk Server 的主入口，提供以下核心功能：
//!
//! - **线索采集** (`db`): 嵌入式 SQLite 本地落盘，离线优先
//! - **上行同步** (`sync`): 单飞排空 + 幂等键，断网自动补传
//! - **许可证** (`license`): 在线验证 + 设备绑定 + 离线宽限
//! - **租户解析** (`tenant`): 本地缓存 → 远端 → 内置默认三级回退
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! kiosk-server/src/
//! ├── core/          # 配置、状态、服务器生命周期
//! ├── api/           # HTTP 路由和处理器
//! ├── cloud/         # 远端中心库客户端
//! ├── sync/          # 同步服务与后台工作者
//! ├── license/       # 许可证验证、设备标识、本地缓存
//! ├── tenant/        # 租户解析
//! ├── db/            # 数据库层
//! └── utils/         # 错误、日志、校验
//! ```

pub mod api;
pub mod cloud;
pub mod core;
pub mod db;
pub mod license;
pub mod sync;
pub mod tenant;
pub mod utils;

// Re-export 公共类型
pub use cloud::{CloudClient, RemoteError, RemoteStore};
pub use crate::core::{Config, Server, ServerState};
pub use license::{LicenseState, LicenseValidator};
pub use sync::{SyncOutcome, SyncService};
pub use tenant::TenantResolver;
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// 设置运行环境：加载 .env 并初始化日志
///
/// 日志级别读 `LOG_LEVEL`；`LOG_DIR` 指向已存在的目录时同时写入
/// 按天滚动的日志文件。
pub fn setup_environment() -> std::io::Result<()> {
    dotenv::dotenv().ok();

    let log_level = std::env::var("LOG_LEVEL").ok();
    let log_dir = std::env::var("LOG_DIR").ok();
    init_logger_with_file(log_level.as_deref(), log_dir.as_deref());

    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
 _  ___           _
| |/ (_) ___  ___| | __
| ' /| |/ _ \/ __| |/ /
| . \| | (_) \__ \   <
|_|\_\_|\___/|___/_|\_\
    "#
    );
}
