//! 测试用内存远端存储

use async_trait::async_trait;
use drivesync::core::fingerprint_bytes;
use drivesync::storage::local;
use drivesync::{timefmt, RemoteEntry, RemoteStore, SyncError};
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Mutex;

/// 根容器 id
pub const ROOT: &str = "root";

#[derive(Debug, Clone)]
struct MemEntry {
    id: String,
    parent: String,
    name: String,
    modified_time: String,
    is_dir: bool,
    content: Vec<u8>,
}

/// 内存实现的远端存储，记录全部写操作次数
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<Vec<MemEntry>>,
    next_id: AtomicU32,
    pub create_calls: AtomicU32,
    pub update_calls: AtomicU32,
    /// 置位后所有 create/update 调用返回模拟的远端错误
    pub fail_mutations: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn fresh_id(&self) -> String {
        format!("m{}", self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    pub fn add_file(&self, parent: &str, name: &str, content: &[u8], mtime: i64) -> String {
        let id = self.fresh_id();
        self.entries.lock().unwrap().push(MemEntry {
            id: id.clone(),
            parent: parent.to_string(),
            name: name.to_string(),
            modified_time: timefmt::to_remote_format(mtime),
            is_dir: false,
            content: content.to_vec(),
        });
        id
    }

    pub fn add_folder(&self, parent: &str, name: &str, mtime: i64) -> String {
        let id = self.fresh_id();
        self.entries.lock().unwrap().push(MemEntry {
            id: id.clone(),
            parent: parent.to_string(),
            name: name.to_string(),
            modified_time: timefmt::to_remote_format(mtime),
            is_dir: true,
            content: Vec::new(),
        });
        id
    }

    /// 按容器与名称查找条目内容
    pub fn content_of(&self, parent: &str, name: &str) -> Option<Vec<u8>> {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .find(|e| e.parent == parent && e.name == name)
            .map(|e| e.content.clone())
    }

    pub fn find_id(&self, parent: &str, name: &str) -> Option<String> {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .find(|e| e.parent == parent && e.name == name)
            .map(|e| e.id.clone())
    }

    pub fn mutation_calls(&self) -> u32 {
        self.create_calls.load(Ordering::Relaxed) + self.update_calls.load(Ordering::Relaxed)
    }

    fn fail_if_requested(&self) -> Result<(), SyncError> {
        if self.fail_mutations.load(Ordering::Relaxed) {
            return Err(SyncError::Remote("模拟的远端失败".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl RemoteStore for MemoryStore {
    async fn list_children(&self, container_id: &str) -> Result<Vec<RemoteEntry>, SyncError> {
        Ok(self
            .entries
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.parent == container_id)
            .map(|e| RemoteEntry {
                id: e.id.clone(),
                name: e.name.clone(),
                modified_time: e.modified_time.clone(),
                is_dir: e.is_dir,
                checksum: if e.is_dir {
                    None
                } else {
                    Some(fingerprint_bytes(&e.content))
                },
            })
            .collect())
    }

    async fn fetch_content(&self, file_id: &str) -> Result<Vec<u8>, SyncError> {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .find(|e| e.id == file_id && !e.is_dir)
            .map(|e| e.content.clone())
            .ok_or_else(|| SyncError::Remote(format!("文件不存在: {file_id}")))
    }

    async fn fetch_modified_time(&self, file_id: &str) -> Result<String, SyncError> {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .find(|e| e.id == file_id)
            .map(|e| e.modified_time.clone())
            .ok_or_else(|| SyncError::Remote(format!("条目不存在: {file_id}")))
    }

    async fn create_file(
        &self,
        name: &str,
        container_id: &str,
        local_path: &Path,
    ) -> Result<String, SyncError> {
        self.create_calls.fetch_add(1, Ordering::Relaxed);
        self.fail_if_requested()?;

        let content = tokio::fs::read(local_path).await?;
        let mtime = local::modified_time(local_path).await?;
        Ok(self.add_file(container_id, name, &content, mtime))
    }

    async fn update_file(&self, file_id: &str, local_path: &Path) -> Result<(), SyncError> {
        self.update_calls.fetch_add(1, Ordering::Relaxed);
        self.fail_if_requested()?;

        let content = tokio::fs::read(local_path).await?;
        let mut entries = self.entries.lock().unwrap();
        let entry = entries
            .iter_mut()
            .find(|e| e.id == file_id && !e.is_dir)
            .ok_or_else(|| SyncError::Remote(format!("文件不存在: {file_id}")))?;
        entry.content = content;
        Ok(())
    }

    async fn create_folder(&self, name: &str, container_id: &str) -> Result<String, SyncError> {
        self.create_calls.fetch_add(1, Ordering::Relaxed);
        self.fail_if_requested()?;
        Ok(self.add_folder(container_id, name, 0))
    }

    fn name(&self) -> &str {
        "memory"
    }
}
