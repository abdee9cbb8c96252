//! 设备身份
//!
//! 本地生成并持久化的不透明设备标识，同一安装在历次验证中保持稳定。
//! 存储在 `work_dir/auth/device_id`，首次启动时生成。

use std::io;
use std::path::{Path, PathBuf};

/// 设备标识文件名
pub const DEVICE_ID_FILE: &str = "device_id";

#[derive(Debug, Clone)]
pub struct DeviceIdentity {
    id: String,
}

impl DeviceIdentity {
    /// 加载已有标识，不存在则生成一个新的 UUID 并落盘
    pub fn load_or_generate(auth_dir: &Path) -> io::Result<Self> {
        let path = Self::path(auth_dir);
        if path.exists() {
            let id = std::fs::read_to_string(&path)?.trim().to_string();
            if !id.is_empty() {
                return Ok(Self { id });
            }
            // Empty file: fall through and regenerate
        }

        let id = uuid::Uuid::new_v4().to_string();
        std::fs::write(&path, &id)?;
        tracing::info!("Generated new device identity: {id}");
        Ok(Self { id })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    fn path(auth_dir: &Path) -> PathBuf {
        auth_dir.join(DEVICE_ID_FILE)
    }
}
