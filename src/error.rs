use thiserror::Error;

/// 同步过程中的错误类型
#[derive(Debug, Error)]
pub enum SyncError {
    /// 远端时间戳字符串不符合预期格式
    #[error("时间戳格式无效: {0}")]
    Format(String),

    /// 本地读写或 stat 失败
    #[error("本地 IO 错误: {0}")]
    Io(#[from] std::io::Error),

    /// 远端存储操作失败
    #[error("远端操作失败: {0}")]
    Remote(String),

    /// 同一远端容器内出现重名条目
    #[error("远端容器 {container} 内存在重名条目: {name}")]
    DuplicateName { name: String, container: String },
}

impl From<reqwest::Error> for SyncError {
    fn from(e: reqwest::Error) -> Self {
        SyncError::Remote(e.to_string())
    }
}
