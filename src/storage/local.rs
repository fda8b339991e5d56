//! 本地文件系统操作

use std::io;
use std::path::Path;
use std::time::UNIX_EPOCH;
use tokio::fs;

/// 列出目录下的直接子条目名称
pub async fn list_names(dir: &Path) -> io::Result<Vec<String>> {
    let mut names = Vec::new();
    let mut entries = fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        names.push(entry.file_name().to_string_lossy().into_owned());
    }
    Ok(names)
}

/// 获取路径的修改时间（Unix 秒）
pub async fn modified_time(path: &Path) -> io::Result<i64> {
    let metadata = fs::metadata(path).await?;
    let modified = metadata
        .modified()?
        .duration_since(UNIX_EPOCH)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    Ok(modified.as_secs() as i64)
}

/// 把路径的访问时间与修改时间设为同一 Unix 秒值
pub fn set_modified_time(path: &Path, epoch_seconds: i64) -> io::Result<()> {
    let ft = filetime::FileTime::from_unix_time(epoch_seconds, 0);
    filetime::set_file_times(path, ft, ft)
}

/// 目录不存在时逐级创建
pub async fn ensure_dir(path: &Path) -> io::Result<()> {
    fs::create_dir_all(path).await
}

/// 判断路径是否为目录
pub async fn is_dir(path: &Path) -> bool {
    fs::metadata(path)
        .await
        .map(|m| m.is_dir())
        .unwrap_or(false)
}

/// 写入整个文件
pub async fn write_atomic(path: &Path, data: &[u8]) -> io::Result<()> {
    // 使用临时文件写入，然后原子重命名
    let temp_path = path.with_extension("tmp");
    fs::write(&temp_path, data).await?;
    fs::rename(&temp_path, path).await
}
