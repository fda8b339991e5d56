//! 应用配置模块

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// 同步行为配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncSettings {
    /// 单向下载模式（禁用一切上传与远端文件夹创建）
    #[serde(default = "default_download_only")]
    pub download_only: bool,
}

fn default_download_only() -> bool {
    true
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            download_only: default_download_only(),
        }
    }
}

impl SyncSettings {
    /// 从配置文件加载同步配置
    pub fn load(config_dir: &Path) -> Self {
        let config_file = config_dir.join("config.json");
        if config_file.exists() {
            if let Ok(content) = fs::read_to_string(&config_file) {
                if let Ok(config) = serde_json::from_str::<serde_json::Value>(&content) {
                    if let Some(sync_config) = config.get("sync") {
                        if let Ok(sync) =
                            serde_json::from_value::<SyncSettings>(sync_config.clone())
                        {
                            return sync;
                        }
                    }
                }
            }
        }
        Self::default()
    }

    /// 保存同步配置
    pub fn save(&self, config_dir: &Path) -> io::Result<()> {
        let config_file = config_dir.join("config.json");

        // 读取现有配置，只覆盖本节
        let mut config: serde_json::Value = if config_file.exists() {
            let content = fs::read_to_string(&config_file)?;
            serde_json::from_str(&content).unwrap_or_else(|_| serde_json::json!({}))
        } else {
            serde_json::json!({})
        };

        config["sync"] = serde_json::to_value(self)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        fs::create_dir_all(config_dir)?;
        fs::write(
            &config_file,
            serde_json::to_string_pretty(&config)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?,
        )
    }
}

/// 获取应用配置目录
pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .map(|p| p.join("drivesync"))
        .unwrap_or_else(|| PathBuf::from(".drivesync"))
}
