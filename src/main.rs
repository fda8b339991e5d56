use anyhow::{anyhow, Result};
use clap::Parser;
use drivesync::config::{self, SyncSettings};
use drivesync::logging::{self, LogConfig};
use drivesync::{DriveStore, SyncEngine, SyncOptions};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

/// 一次性同步本地目录与 Google Drive 文件夹
#[derive(Parser)]
#[command(name = "drivesync", version, about)]
struct Cli {
    /// 本地目录
    #[arg(long, default_value = ".")]
    local_folder: PathBuf,

    /// 远端文件夹 id
    #[arg(long)]
    drive_folder_id: String,

    /// 仅下载模式，省略时取配置文件的值
    #[arg(long)]
    download_only: Option<bool>,

    /// Drive API 访问令牌（令牌的获取与刷新在本工具之外完成）
    #[arg(long, env = "DRIVE_ACCESS_TOKEN", hide_env_values = true)]
    access_token: String,

    /// 覆盖默认的配置目录
    #[arg(long)]
    config_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_dir = cli.config_dir.clone().unwrap_or_else(config::config_dir);
    let log_config = LogConfig::load(&config_dir);
    let _guard = logging::init(&log_config, &config_dir.join("logs"));

    let settings = SyncSettings::load(&config_dir);
    let download_only = cli.download_only.unwrap_or(settings.download_only);

    info!("开始同步...");

    let store = DriveStore::new(&cli.access_token)?;
    let engine = SyncEngine::with_options(Arc::new(store), SyncOptions { download_only });
    let report = engine
        .run(&cli.local_folder, &cli.drive_folder_id)
        .await
        .map_err(|e| anyhow!("同步失败: {e}"))?;

    if report.uploads_failed > 0 {
        warn!("{} 个上传未成功", report.uploads_failed);
        for err in &report.errors {
            warn!("  {}", err);
        }
    }
    info!("同步结束!");
    Ok(())
}
