//! Checkpoint 存储
//!
//! 只追加的日志接口，目录存储只是其中一种实现。
//!
//! | 类型 | 说明 |
//! |------|------|
//! | [`InMemoryCheckpointStore`] | 进程内存，适合测试 |
//! | [`DirCheckpointStore`] | 每条帖子一个 `<created_at>.json` 文件 |
//!
//! 键按数值比较：`10.json` 比 `9.json` 新。

use super::CheckpointRecord;
use crate::error::{Result, StorageError};
use async_trait::async_trait;
use serde_json::Value;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

const EXTENSION: &str = ".json";

// ── CheckpointStore trait ─────────────────────────────────────────────────────

#[async_trait]
pub trait CheckpointStore: Send + Sync {
    /// 追加一条记录，返回是否写入；同键记录已存在时保持原样并返回 `false`
    async fn append(&self, record: &CheckpointRecord) -> Result<bool>;

    /// `created_at` 最大的记录（为空时返回 `None`）
    async fn latest(&self) -> Result<Option<CheckpointRecord>>;

    /// 全部记录，按 `created_at` 升序
    async fn all(&self) -> Result<Vec<CheckpointRecord>>;
}

// ── InMemoryCheckpointStore ───────────────────────────────────────────────────

pub struct InMemoryCheckpointStore {
    records: RwLock<Vec<CheckpointRecord>>,
}

impl Default for InMemoryCheckpointStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryCheckpointStore {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
        }
    }

    pub fn with_records(records: impl IntoIterator<Item = CheckpointRecord>) -> Self {
        Self {
            records: RwLock::new(records.into_iter().collect()),
        }
    }
}

#[async_trait]
impl CheckpointStore for InMemoryCheckpointStore {
    async fn append(&self, record: &CheckpointRecord) -> Result<bool> {
        let mut records = self.records.write().await;
        if records.iter().any(|r| r.created_at == record.created_at) {
            warn!(key = %record.key(), "checkpoint 已存在，跳过写入");
            return Ok(false);
        }
        records.push(record.clone());
        Ok(true)
    }

    async fn latest(&self) -> Result<Option<CheckpointRecord>> {
        Ok(self
            .records
            .read()
            .await
            .iter()
            .max_by_key(|r| r.created_at)
            .cloned())
    }

    async fn all(&self) -> Result<Vec<CheckpointRecord>> {
        let mut records = self.records.read().await.clone();
        records.sort_by_key(|r| r.created_at);
        Ok(records)
    }
}

// ── DirCheckpointStore ────────────────────────────────────────────────────────

/// 基于目录的 checkpoint 存储
///
/// 文件名为十进制 Unix 秒加 `.json`，内容为完整原始帖子。
/// 兼容带小数的旧文件名（如 `1571234567.0.json`）。
pub struct DirCheckpointStore {
    dir: PathBuf,
}

impl DirCheckpointStore {
    /// 打开存储目录，不存在时自动创建
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir).map_err(|e| StorageError::Unwritable {
            path: dir.display().to_string(),
            message: e.to_string(),
        })?;
        info!(path = %dir.display(), "🗄️ Checkpoint 目录就绪");
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// 列出所有合法键，按数值降序
    async fn sorted_keys(&self) -> Result<Vec<(f64, PathBuf)>> {
        let unreadable = |e: std::io::Error| StorageError::Unreadable {
            path: self.dir.display().to_string(),
            message: e.to_string(),
        };
        let mut entries = tokio::fs::read_dir(&self.dir).await.map_err(unreadable)?;
        let mut keys = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(unreadable)? {
            let path = entry.path();
            if !entry.file_type().await.map_err(unreadable)?.is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            match parse_key(&name) {
                Some(key) => keys.push((key, path)),
                None => warn!(file = %name, "忽略无法识别的 checkpoint 文件"),
            }
        }
        keys.sort_by(|a, b| b.0.total_cmp(&a.0));
        Ok(keys)
    }

    async fn read_record(&self, key: f64, path: &Path) -> Result<CheckpointRecord> {
        let corrupt = |message: String| StorageError::Corrupt {
            path: path.display().to_string(),
            message,
        };
        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| StorageError::Unreadable {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
        let value: Value = serde_json::from_str(&raw).map_err(|e| corrupt(e.to_string()))?;
        let record = CheckpointRecord::from_stored(key as i64, value)
            .ok_or_else(|| corrupt("missing id or text".to_string()))?;
        Ok(record)
    }
}

#[async_trait]
impl CheckpointStore for DirCheckpointStore {
    async fn append(&self, record: &CheckpointRecord) -> Result<bool> {
        let path = self.dir.join(record.key());
        let unwritable = |message: String| StorageError::Unwritable {
            path: path.display().to_string(),
            message,
        };
        let json =
            serde_json::to_string_pretty(&record.raw).map_err(|e| unwritable(e.to_string()))?;

        let file = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await;
        let mut file = match file {
            Ok(f) => f,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                warn!(path = %path.display(), "checkpoint 已存在，跳过写入");
                return Ok(false);
            }
            Err(e) => return Err(unwritable(e.to_string()).into()),
        };
        file.write_all(json.as_bytes())
            .await
            .map_err(|e| unwritable(e.to_string()))?;
        file.flush().await.map_err(|e| unwritable(e.to_string()))?;
        debug!(path = %path.display(), id = %record.id, "💾 Checkpoint 已写入");
        Ok(true)
    }

    async fn latest(&self) -> Result<Option<CheckpointRecord>> {
        let keys = self.sorted_keys().await?;
        match keys.first() {
            Some((key, path)) => Ok(Some(self.read_record(*key, path).await?)),
            None => Ok(None),
        }
    }

    async fn all(&self) -> Result<Vec<CheckpointRecord>> {
        let keys = self.sorted_keys().await?;
        let mut records = Vec::with_capacity(keys.len());
        for (key, path) in keys.iter().rev() {
            records.push(self.read_record(*key, path).await?);
        }
        Ok(records)
    }
}

/// `1571234567.json` / `1571234567.0.json` → 数值键
fn parse_key(file_name: &str) -> Option<f64> {
    let stem = file_name.strip_suffix(EXTENSION)?;
    stem.parse::<f64>().ok().filter(|k| k.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key() {
        assert_eq!(parse_key("10.json"), Some(10.0));
        assert_eq!(parse_key("1571234567.0.json"), Some(1571234567.0));
        assert_eq!(parse_key("notes.txt"), None);
        assert_eq!(parse_key("latest.json"), None);
        assert_eq!(parse_key("inf.json"), None);
    }

    #[tokio::test]
    async fn test_empty_store_has_no_latest() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let store = DirCheckpointStore::open(dir.path().join("tweets"))?;
        assert!(store.dir().is_dir());
        assert!(store.latest().await?.is_none());
        assert!(store.all().await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_latest_uses_numeric_order() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let store = DirCheckpointStore::open(dir.path())?;
        store.append(&CheckpointRecord::new("ten", 10, "newer")).await?;
        store.append(&CheckpointRecord::new("nine", 9, "older")).await?;
        store.append(&CheckpointRecord::new("two", 2, "oldest")).await?;

        let latest = store.latest().await?.expect("应该有 checkpoint");
        assert_eq!(latest.id, "ten");
        assert_eq!(latest.created_at, 10);

        let ids: Vec<String> = store.all().await?.into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["two", "nine", "ten"]);
        Ok(())
    }

    #[tokio::test]
    async fn test_legacy_fractional_names_and_foreign_files() -> Result<()> {
        let dir = tempfile::tempdir()?;
        std::fs::write(
            dir.path().join("1571234567.0.json"),
            r#"{"id_str": "legacy", "text": "old format"}"#,
        )?;
        std::fs::write(dir.path().join("README.txt"), "not a checkpoint")?;
        std::fs::create_dir(dir.path().join("99999999999.json"))?;

        let store = DirCheckpointStore::open(dir.path())?;
        let latest = store.latest().await?.expect("应该读到旧格式文件");
        assert_eq!(latest.id, "legacy");
        assert_eq!(latest.created_at, 1571234567);

        store.append(&CheckpointRecord::new("new", 1571234600, "x")).await?;
        assert_eq!(store.latest().await?.unwrap().id, "new");
        Ok(())
    }

    #[tokio::test]
    async fn test_append_never_overwrites() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let store = DirCheckpointStore::open(dir.path())?;
        assert!(store.append(&CheckpointRecord::new("first", 5, "a")).await?);
        assert!(!store.append(&CheckpointRecord::new("second", 5, "b")).await?);
        assert_eq!(store.latest().await?.unwrap().id, "first");
        Ok(())
    }

    #[tokio::test]
    async fn test_open_on_regular_file_is_unwritable() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let file = dir.path().join("tweets");
        std::fs::write(&file, "occupied")?;
        assert!(matches!(
            DirCheckpointStore::open(&file),
            Err(crate::error::BotError::Storage(StorageError::Unwritable { .. }))
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_append_into_removed_dir_is_unwritable() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let store = DirCheckpointStore::open(dir.path().join("tweets"))?;
        std::fs::remove_dir(store.dir())?;
        match store.append(&CheckpointRecord::new("1", 1, "x")).await {
            Err(crate::error::BotError::Storage(StorageError::Unwritable { path, .. })) => {
                assert!(path.ends_with("1.json"))
            }
            other => panic!("应该是 Unwritable: {:?}", other),
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_file_contains_raw_post() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let store = DirCheckpointStore::open(dir.path())?;
        let record = CheckpointRecord::new("7", 1_539_202_764, "hello\nworld");
        store.append(&record).await?;

        let raw = std::fs::read_to_string(dir.path().join("1539202764.json"))?;
        let value: Value = serde_json::from_str(&raw)?;
        assert_eq!(value["id_str"], "7");
        assert_eq!(value["text"], "hello\nworld");
        assert_eq!(value["created_at"], "Wed Oct 10 20:19:24 +0000 2018");
        Ok(())
    }

    #[tokio::test]
    async fn test_corrupt_file_is_storage_error() -> Result<()> {
        let dir = tempfile::tempdir()?;
        std::fs::write(dir.path().join("3.json"), "{ not json")?;
        let store = DirCheckpointStore::open(dir.path())?;
        assert!(matches!(
            store.latest().await,
            Err(crate::error::BotError::Storage(StorageError::Corrupt { .. }))
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_in_memory_latest() -> Result<()> {
        let store = InMemoryCheckpointStore::with_records([
            CheckpointRecord::new("a", 9, "x"),
            CheckpointRecord::new("b", 10, "y"),
        ]);
        assert_eq!(store.latest().await?.unwrap().id, "b");
        store.append(&CheckpointRecord::new("c", 11, "z")).await?;
        assert_eq!(store.all().await?.len(), 3);
        assert_eq!(store.latest().await?.unwrap().id, "c");
        Ok(())
    }
}
