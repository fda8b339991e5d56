//! 目录级名称比较

use std::collections::HashSet;

/// 一次目录级比较的三分结果
///
/// 三个集合恰好划分两侧名称的并集，互不重叠。
#[derive(Debug, Clone, Default)]
pub struct TreeDiff {
    /// 两侧同名的条目
    pub common: HashSet<String>,
    /// 仅本地存在的条目
    pub local_only: HashSet<String>,
    /// 仅远端存在的条目
    pub remote_only: HashSet<String>,
}

/// 对两侧名称集合做纯集合运算划分，无 IO、无顺序约定
pub fn diff_names(local: &HashSet<String>, remote: &HashSet<String>) -> TreeDiff {
    TreeDiff {
        common: local.intersection(remote).cloned().collect(),
        local_only: local.difference(remote).cloned().collect(),
        remote_only: remote.difference(local).cloned().collect(),
    }
}
