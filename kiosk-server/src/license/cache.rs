//! 许可证验证结果的本地缓存
//!
//! 将最近一次成功在线验证的结果存储到 `work_dir/auth/license_cache.json`。
//! 只在在线验证成功后整体覆盖（临时文件 + rename，避免部分写入）；
//! 验证失败从不清除缓存——下次重试可能恢复。

use std::io;
use std::path::PathBuf;

use shared::models::CachedLicense;

/// 缓存文件名
pub const CACHE_FILE: &str = "license_cache.json";

#[derive(Debug, Clone)]
pub struct LicenseCache {
    auth_dir: PathBuf,
}

impl LicenseCache {
    pub fn new(auth_dir: impl Into<PathBuf>) -> Self {
        Self {
            auth_dir: auth_dir.into(),
        }
    }

    fn path(&self) -> PathBuf {
        self.auth_dir.join(CACHE_FILE)
    }

    /// 从文件加载缓存；文件不存在返回 `None`
    pub fn load(&self) -> Result<Option<CachedLicense>, io::Error> {
        let path = self.path();
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
            .map(Some)
    }

    /// 整体覆盖缓存（写临时文件后 rename，单条记录从不部分更新）
    pub fn save(&self, cached: &CachedLicense) -> Result<(), io::Error> {
        let content = serde_json::to_string(cached)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        let tmp = self.auth_dir.join(format!("{CACHE_FILE}.tmp"));
        std::fs::write(&tmp, content)?;
        std::fs::rename(tmp, self.path())?;
        Ok(())
    }

    /// 删除缓存文件
    pub fn delete(&self) -> Result<(), io::Error> {
        let path = self.path();
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }

    /// 指定 key 是否存在离线可用的缓存
    ///
    /// 条件：key 匹配、上次验证在 `max_age_ms` 内、许可证本身未过期。
    /// 加载失败（损坏文件）按无缓存处理并告警。
    pub fn has_valid_cache(&self, license_key: &str, max_age_ms: i64) -> bool {
        self.get_valid(license_key, max_age_ms).is_some()
    }

    /// 返回离线可用的缓存条目（不满足条件返回 `None`）
    pub fn get_valid(&self, license_key: &str, max_age_ms: i64) -> Option<CachedLicense> {
        match self.load() {
            Ok(Some(cached)) => {
                if cached.license_key == license_key && cached.is_usable_offline(max_age_ms) {
                    Some(cached)
                } else {
                    None
                }
            }
            Ok(None) => None,
            Err(e) => {
                tracing::warn!("Failed to load license cache: {e}");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::util::{DAY_MS, now_millis};

    fn cached(key: &str, last_check_age_days: i64, valid_days_left: i64) -> CachedLicense {
        let now = now_millis();
        CachedLicense {
            license_key: key.to_string(),
            tenant_id: "tenant-1".to_string(),
            valid_until: now + valid_days_left * DAY_MS,
            last_check: now - last_check_age_days * DAY_MS,
        }
    }

    #[test]
    fn test_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let cache = LicenseCache::new(dir.path());

        assert!(cache.load().unwrap().is_none());

        let entry = cached("KEY-1", 0, 30);
        cache.save(&entry).unwrap();
        assert_eq!(cache.load().unwrap(), Some(entry));

        cache.delete().unwrap();
        assert!(cache.load().unwrap().is_none());
    }

    #[test]
    fn test_grace_window() {
        let dir = tempfile::tempdir().unwrap();
        let cache = LicenseCache::new(dir.path());
        let max_age = 7 * DAY_MS;

        // Checked 3 days ago, 10 days of validity left: usable offline
        cache.save(&cached("KEY-1", 3, 10)).unwrap();
        assert!(cache.has_valid_cache("KEY-1", max_age));

        // Checked 8 days ago: outside the grace window
        cache.save(&cached("KEY-1", 8, 10)).unwrap();
        assert!(!cache.has_valid_cache("KEY-1", max_age));

        // License itself expired
        cache.save(&cached("KEY-1", 1, -1)).unwrap();
        assert!(!cache.has_valid_cache("KEY-1", max_age));
    }

    #[test]
    fn test_key_mismatch_is_not_usable() {
        let dir = tempfile::tempdir().unwrap();
        let cache = LicenseCache::new(dir.path());

        cache.save(&cached("KEY-1", 1, 10)).unwrap();
        assert!(!cache.has_valid_cache("KEY-2", 7 * DAY_MS));
    }

    #[test]
    fn test_corrupt_cache_treated_as_missing() {
        let dir = tempfile::tempdir().unwrap();
        let cache = LicenseCache::new(dir.path());

        std::fs::write(dir.path().join(CACHE_FILE), "{broken").unwrap();
        assert!(!cache.has_valid_cache("KEY-1", 7 * DAY_MS));
    }
}
