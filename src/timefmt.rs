//! 时间戳编解码 - 本地 Unix 秒与远端 ISO-8601 字符串互转

use crate::error::SyncError;
use chrono::{DateTime, NaiveDateTime, Utc};
use regex::Regex;
use std::sync::OnceLock;

/// 远端时间戳格式：UTC、秒级精度、尾部 Z
const REMOTE_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

fn fraction_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\.\d+").unwrap())
}

/// 把 Unix 秒渲染为远端使用的 ISO-8601 字符串
pub fn to_remote_format(epoch_seconds: i64) -> String {
    // chrono 可表示范围之外的值按 0 处理，文件系统不会产生这种时间
    let dt: DateTime<Utc> = DateTime::from_timestamp(epoch_seconds, 0).unwrap_or_default();
    dt.format(REMOTE_FORMAT).to_string()
}

/// 解析远端时间戳为 Unix 秒
///
/// 远端可能带亚秒精度，解析前先丢弃小数部分，保证秒级往返一致。
pub fn to_epoch_seconds(value: &str) -> Result<i64, SyncError> {
    let stripped = fraction_re().replace(value, "");
    let parsed = NaiveDateTime::parse_from_str(&stripped, REMOTE_FORMAT)
        .map_err(|_| SyncError::Format(value.to_string()))?;
    Ok(parsed.and_utc().timestamp())
}
