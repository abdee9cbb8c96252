//! Server Implementation
//!
//! HTTP 服务器启动和管理。启动时先完成租户解析与许可证验证，
//! 再开始对外服务——两者失败都会以明确的原因记录，由前端
//! (kiosk UI) 决定是否阻塞进入游戏界面。

use crate::api;
use crate::core::tasks::BackgroundTasks;
use crate::core::{Config, ServerState};
use crate::db::repository::tenant;
use crate::license::LicenseState;
use crate::utils::AppError;

/// HTTP Server
pub struct Server {
    config: Config,
    state: Option<ServerState>,
}

impl Server {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            state: None,
        }
    }

    /// Create server with existing state (tests inject mocks this way)
    pub fn with_state(config: Config, state: ServerState) -> Self {
        Self {
            config,
            state: Some(state),
        }
    }

    pub async fn run(&self) -> Result<(), AppError> {
        // Create application state if not provided
        let state = match &self.state {
            Some(s) => s.clone(),
            None => ServerState::initialize(&self.config).await?,
        };

        // Startup checks run before anything else is reachable
        self.startup_checks(&state).await;

        // Start background tasks (sync worker)
        let mut tasks = BackgroundTasks::new();
        state.start_background_tasks(&mut tasks);

        let app = api::create_router(state.clone());

        let addr = std::net::SocketAddr::from(([0, 0, 0, 0], self.config.http_port));
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;
        tracing::info!("Kiosk server listening on {addr}");

        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = tokio::signal::ctrl_c().await;
                tracing::info!("Shutting down...");
            })
            .await
            .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

        // Stop the sync worker before exiting
        tasks.shutdown().await;

        Ok(())
    }

    /// 启动检查：许可证验证 + 当前租户预热
    ///
    /// 失败不中止进程——管理端仍需要 API 来修复配置，但原因
    /// 必须具名记录，绝不吞掉。
    async fn startup_checks(&self, state: &ServerState) {
        match &self.config.license_key {
            Some(key) => match state.license.validate(key).await {
                LicenseState::Valid(lic) => {
                    tracing::info!(
                        tenant = %lic.tenant_id,
                        license_type = %lic.license_type,
                        "License valid"
                    );
                }
                LicenseState::ValidOffline(cached) => {
                    tracing::warn!(
                        tenant = %cached.tenant_id,
                        "License valid (offline grace period)"
                    );
                }
                LicenseState::Invalid(reason) => {
                    tracing::error!("Kiosk blocked: {}", reason.message());
                }
                _ => {}
            },
            None => {
                tracing::warn!("No LICENSE_KEY configured, skipping license validation");
            }
        }

        // Warm up the previously selected tenant so the kiosk can render
        // with no network.
        match tenant::get_current_slug(&state.pool).await {
            Ok(Some(slug)) => match state.resolver.resolve(&slug).await {
                Ok(config) => {
                    tracing::info!(slug = %config.slug, name = %config.name, "Active tenant resolved");
                }
                Err(e) => {
                    tracing::error!(%slug, "Active tenant resolution failed: {e}");
                }
            },
            Ok(None) => {
                tracing::info!("No tenant selected yet");
            }
            Err(e) => {
                tracing::error!("Failed to read active tenant pointer: {e}");
            }
        }
    }
}
