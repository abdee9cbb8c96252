/// 获取当前 UTC 时间戳（毫秒）
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// 一天的毫秒数
pub const DAY_MS: i64 = 86_400_000;
