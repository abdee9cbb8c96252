// shared/src/models/sync.rs
use serde::{Deserialize, Serialize};

/// 同步统计快照
///
/// 由 Sync Worker 在每轮排空后更新，供 `/api/sync/stats` 查询。
/// 计数跨多轮累计（进程生命周期内）。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SyncStats {
    /// 累计成功上传的线索数
    pub total_synced: u64,
    /// 累计失败次数
    pub total_errors: u64,
    /// 最近一次失败原因
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
    /// 最近一次完成同步检查的时间 (Unix millis)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_sync_time: Option<i64>,
}
