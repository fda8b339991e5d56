pub mod drive;
pub mod local;

use crate::error::SyncError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub use drive::DriveStore;

/// 远端条目信息
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteEntry {
    /// 远端分配的稳定标识
    pub id: String,
    pub name: String,
    /// 远端原生时间戳字符串，比较前须经 timefmt 归一化
    pub modified_time: String,
    pub is_dir: bool,
    /// 文件的内容校验和，文件夹为 None
    pub checksum: Option<String>,
}

/// 远端存储抽象接口
///
/// 所有时间戳以远端原生字符串跨越该边界。
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// 列出容器下的所有直接子条目
    async fn list_children(&self, container_id: &str) -> Result<Vec<RemoteEntry>, SyncError>;

    /// 读取整个远端文件内容
    async fn fetch_content(&self, file_id: &str) -> Result<Vec<u8>, SyncError>;

    /// 获取远端文件的修改时间
    async fn fetch_modified_time(&self, file_id: &str) -> Result<String, SyncError>;

    /// 以本地文件内容在容器内新建远端文件，返回新条目 id
    async fn create_file(
        &self,
        name: &str,
        container_id: &str,
        local_path: &Path,
    ) -> Result<String, SyncError>;

    /// 用本地文件内容覆盖已有远端文件
    async fn update_file(&self, file_id: &str, local_path: &Path) -> Result<(), SyncError>;

    /// 在容器内新建文件夹，返回新容器 id
    async fn create_folder(&self, name: &str, container_id: &str) -> Result<String, SyncError>;

    /// 获取存储名称（用于日志）
    fn name(&self) -> &str;
}
