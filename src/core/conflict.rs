//! 同名条目的冲突判定

use crate::core::fingerprint;
use crate::error::SyncError;
use crate::storage::local;
use crate::storage::RemoteEntry;
use crate::timefmt;
use std::io;
use std::path::Path;
use tracing::debug;

/// 单个名称的比较结论，驱动唯一的一个传输动作或空操作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncDecision {
    /// 两侧一致，无需传输
    Unchanged,
    /// 本地较新
    LocalNewer,
    /// 远端较新
    RemoteNewer,
    /// 仅本地存在
    LocalOnly,
    /// 仅远端存在
    RemoteOnly,
}

/// 判定一对同名条目谁更新
///
/// 时间戳为主、内容为辅：时间不同但指纹一致的文件判为 Unchanged，
/// 避免只改过 mtime 的文件触发无谓传输。
pub async fn resolve(local_path: &Path, remote: &RemoteEntry) -> Result<SyncDecision, SyncError> {
    // 列表后被删除的本地条目一律按远端更新处理，由下载兜底
    let local_time = match local::modified_time(local_path).await {
        Ok(t) => t,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(SyncDecision::RemoteNewer),
        Err(e) => return Err(e.into()),
    };

    let remote_time = timefmt::to_epoch_seconds(&remote.modified_time)?;

    let tentative = if local_time > remote_time {
        SyncDecision::LocalNewer
    } else if local_time < remote_time {
        SyncDecision::RemoteNewer
    } else {
        SyncDecision::Unchanged
    };

    if tentative == SyncDecision::Unchanged {
        return Ok(tentative);
    }

    // 只有文件才带 checksum，文件夹直接按时间戳结论走
    if let Some(checksum) = &remote.checksum {
        match fingerprint::fingerprint(local_path).await {
            Ok(local_sum) if &local_sum == checksum => {
                debug!("内容一致, 仅时间戳不同: {:?}", local_path);
                return Ok(SyncDecision::Unchanged);
            }
            Ok(_) => {}
            Err(SyncError::Io(e)) if e.kind() == io::ErrorKind::NotFound => {
                return Ok(SyncDecision::RemoteNewer);
            }
            Err(e) => return Err(e),
        }
    }

    Ok(tentative)
}
