//! 内容指纹 - 与远端 checksum 字段直接可比的 md5

use crate::error::SyncError;
use md5::{Digest, Md5};
use std::path::Path;

/// 计算本地文件的内容指纹
///
/// 读取完整文件内容做 md5，编码与远端 checksum 一致（小写十六进制）。
pub async fn fingerprint(path: &Path) -> Result<String, SyncError> {
    let data = tokio::fs::read(path).await?;
    Ok(fingerprint_bytes(&data))
}

/// 计算内存数据的内容指纹
pub fn fingerprint_bytes(data: &[u8]) -> String {
    hex::encode(Md5::digest(data))
}
