//! 同步引擎 - 驱动一次本地目录与远端容器的对账

use crate::core::comparator;
use crate::core::conflict::{self, SyncDecision};
use crate::error::SyncError;
use crate::storage::{local, RemoteEntry, RemoteStore};
use crate::timefmt;
use futures::future::BoxFuture;
use futures::FutureExt;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, error, info, trace};

/// 同步选项
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// 单向模式：禁用一切上传与远端文件夹创建
    pub download_only: bool,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            download_only: true,
        }
    }
}

/// 一次对账的结果统计
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncReport {
    /// 新下载的文件数
    pub files_downloaded: u32,
    /// 被远端覆盖更新的本地文件数
    pub files_updated: u32,
    pub files_uploaded: u32,
    pub folders_created: u32,
    pub files_unchanged: u32,
    /// 判定本地较新但按策略未回传的条目数
    pub local_newer_held: u32,
    /// download_only 模式下被抑制的上传与文件夹创建数
    pub uploads_skipped: u32,
    pub uploads_failed: u32,
    pub errors: Vec<String>,
}

/// 同步引擎
///
/// 每次 run 对一对根路径做一趟完整的深度优先对账，引擎自身不在
/// 两次调用之间保留任何状态。
pub struct SyncEngine {
    remote: Arc<dyn RemoteStore>,
    options: SyncOptions,
}

impl SyncEngine {
    pub fn new(remote: Arc<dyn RemoteStore>) -> Self {
        Self {
            remote,
            options: SyncOptions::default(),
        }
    }

    pub fn with_options(remote: Arc<dyn RemoteStore>, options: SyncOptions) -> Self {
        Self { remote, options }
    }

    /// 对一对根路径执行一次完整对账
    pub async fn run(
        &self,
        local_root: &Path,
        container_id: &str,
    ) -> Result<SyncReport, SyncError> {
        info!(
            "开始同步: {:?} <-> {} ({})",
            local_root,
            container_id,
            self.remote.name()
        );

        let mut report = SyncReport::default();
        self.sync_dir(
            local_root.to_path_buf(),
            container_id.to_string(),
            false,
            &mut report,
        )
        .await?;

        info!(
            "同步完成: 下载 {}, 更新 {}, 上传 {}, 新建文件夹 {}, 未变化 {}, 失败 {}",
            report.files_downloaded,
            report.files_updated,
            report.files_uploaded,
            report.folders_created,
            report.files_unchanged,
            report.uploads_failed
        );
        Ok(report)
    }

    /// 同步一个目录层级，子目录递归进入
    fn sync_dir<'a>(
        &'a self,
        local_dir: PathBuf,
        container_id: String,
        nested: bool,
        report: &'a mut SyncReport,
    ) -> BoxFuture<'a, Result<(), SyncError>> {
        async move {
            trace!(
                "{}目录: {:?}",
                if nested { "递归同步" } else { "同步" },
                local_dir
            );

            // 本地目录不存在时先创建
            local::ensure_dir(&local_dir).await?;

            let remote_entries = self.remote.list_children(&container_id).await?;
            let remote_map = index_by_name(remote_entries, &container_id)?;
            let local_names: HashSet<String> =
                local::list_names(&local_dir).await?.into_iter().collect();
            let remote_names: HashSet<String> = remote_map.keys().cloned().collect();

            let diff = comparator::diff_names(&local_names, &remote_names);

            if diff.common.is_empty() && !nested {
                info!("目录 {:?} 没有需要更新的文件", local_dir);
            }

            // 名称排序只为日志与动作顺序稳定，算法本身与顺序无关
            let mut common: Vec<&String> = diff.common.iter().collect();
            common.sort();

            for name in common {
                let remote_entry = &remote_map[name.as_str()];
                let local_path = local_dir.join(name);

                match conflict::resolve(&local_path, remote_entry).await? {
                    SyncDecision::Unchanged => {
                        report.files_unchanged += 1;
                    }
                    SyncDecision::LocalNewer => {
                        // 本地较新时既不上传也不递归，维持远端现状
                        debug!("本地较新, 保持不动: {:?}", local_path);
                        report.local_newer_held += 1;
                    }
                    SyncDecision::RemoteNewer => {
                        if remote_entry.is_dir {
                            self.sync_dir(local_path, remote_entry.id.clone(), true, report)
                                .await?;
                        } else {
                            self.download(name, &local_path, &remote_entry.id, true, report)
                                .await?;
                        }
                    }
                    // 单侧条目已被 diff 分走，成对判定不会给出这两种结论
                    SyncDecision::LocalOnly | SyncDecision::RemoteOnly => unreachable!(),
                }
            }

            if diff.local_only.is_empty() && diff.remote_only.is_empty() && !nested {
                info!("目录 {:?} 没有需要下载或上传的文件", local_dir);
            }

            let mut remote_only: Vec<&String> = diff.remote_only.iter().collect();
            remote_only.sort();

            for name in remote_only {
                let remote_entry = &remote_map[name.as_str()];
                let local_path = local_dir.join(name);

                if remote_entry.is_dir {
                    // 递归访问会创建对应的本地子目录
                    self.sync_dir(local_path, remote_entry.id.clone(), true, report)
                        .await?;
                } else {
                    self.download(name, &local_path, &remote_entry.id, false, report)
                        .await?;
                }
            }

            let mut local_only: Vec<&String> = diff.local_only.iter().collect();
            local_only.sort();

            for name in local_only {
                let local_path = local_dir.join(name);

                if local::is_dir(&local_path).await {
                    if let Some(folder_id) =
                        self.create_remote_folder(name, &container_id, report).await
                    {
                        self.sync_dir(local_path, folder_id, true, report).await?;
                    }
                } else {
                    self.upload(name, &local_path, &container_id, report).await;
                }
            }

            Ok(())
        }
        .boxed()
    }

    /// 下载远端文件覆盖本地，并把本地 mtime 对齐到远端时间
    ///
    /// 下载失败不在此处捕获，沿当前遍历分支向上传播。
    async fn download(
        &self,
        name: &str,
        local_path: &Path,
        file_id: &str,
        update: bool,
        report: &mut SyncReport,
    ) -> Result<(), SyncError> {
        let data = self.remote.fetch_content(file_id).await?;
        local::write_atomic(local_path, &data).await?;

        // 对齐修改时间后，下一轮比较直接得到 Unchanged，无需再取指纹
        let modified = self.remote.fetch_modified_time(file_id).await?;
        let epoch = timefmt::to_epoch_seconds(&modified)?;
        local::set_modified_time(local_path, epoch)?;

        if update {
            report.files_updated += 1;
            info!("本地文件 '{}' 已更新: {:?}", name, local_path);
        } else {
            report.files_downloaded += 1;
            info!("文件 '{}' 已下载: {:?}", name, local_path);
        }
        Ok(())
    }

    /// 上传一个本地新文件，失败只记录不中断整体遍历
    async fn upload(
        &self,
        name: &str,
        local_path: &Path,
        container_id: &str,
        report: &mut SyncReport,
    ) {
        if self.options.download_only {
            debug!("下载模式, 跳过上传: {:?}", local_path);
            report.uploads_skipped += 1;
            return;
        }

        match self
            .remote
            .create_file(name, container_id, local_path)
            .await
        {
            Ok(id) => {
                report.files_uploaded += 1;
                info!("文件 '{}' 已上传 (id={})", name, id);
            }
            Err(e) => {
                error!("上传文件 '{}' 失败: {}", name, e);
                report.uploads_failed += 1;
                report.errors.push(format!("{name}: {e}"));
            }
        }
    }

    /// 创建远端文件夹并返回新容器 id，被抑制或失败时返回 None
    async fn create_remote_folder(
        &self,
        name: &str,
        container_id: &str,
        report: &mut SyncReport,
    ) -> Option<String> {
        if self.options.download_only {
            debug!("下载模式, 跳过创建远端文件夹: '{}'", name);
            report.uploads_skipped += 1;
            return None;
        }

        match self.remote.create_folder(name, container_id).await {
            Ok(id) => {
                report.folders_created += 1;
                info!("远端文件夹已创建: '{}' (id={})", name, id);
                Some(id)
            }
            Err(e) => {
                error!("创建远端文件夹 '{}' 失败: {}", name, e);
                report.uploads_failed += 1;
                report.errors.push(format!("{name}: {e}"));
                None
            }
        }
    }
}

/// 以名称索引远端条目，重名按错误处理而不是默默取其一
fn index_by_name(
    entries: Vec<RemoteEntry>,
    container_id: &str,
) -> Result<HashMap<String, RemoteEntry>, SyncError> {
    let mut map = HashMap::with_capacity(entries.len());
    for entry in entries {
        if let Some(previous) = map.insert(entry.name.clone(), entry) {
            return Err(SyncError::DuplicateName {
                name: previous.name,
                container: container_id.to_string(),
            });
        }
    }
    Ok(map)
}
