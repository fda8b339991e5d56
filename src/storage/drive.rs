//! Google Drive 存储适配
//!
//! 只负责 REST 调用与字段映射，访问令牌的获取与刷新在外部完成。

use super::{RemoteEntry, RemoteStore};
use crate::error::SyncError;
use crate::storage::local;
use crate::timefmt;
use async_trait::async_trait;
use futures::TryStreamExt;
use reqwest::multipart;
use serde::Deserialize;
use std::path::Path;
use tokio_util::io::ReaderStream;
use tracing::debug;

const API_BASE: &str = "https://www.googleapis.com/drive/v3";
const UPLOAD_BASE: &str = "https://www.googleapis.com/upload/drive/v3";
/// 文件夹的类型标记
const FOLDER_MIME: &str = "application/vnd.google-apps.folder";
const LIST_FIELDS: &str = "files(id,name,modifiedTime,mimeType,md5Checksum)";

/// files.list 响应
#[derive(Debug, Deserialize)]
struct FileList {
    #[serde(default)]
    files: Vec<DriveFile>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DriveFile {
    id: String,
    name: String,
    #[serde(default)]
    modified_time: String,
    mime_type: String,
    md5_checksum: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FileMeta {
    modified_time: String,
}

#[derive(Debug, Deserialize)]
struct CreatedFile {
    id: String,
}

pub struct DriveStore {
    client: reqwest::Client,
    access_token: String,
    name: String,
}

impl DriveStore {
    pub fn new(access_token: &str) -> Result<Self, SyncError> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self {
            client,
            access_token: access_token.to_string(),
            name: "gdrive".to_string(),
        })
    }

    /// 非 2xx 响应统一转为远端操作错误
    async fn check(response: reqwest::Response) -> Result<reqwest::Response, SyncError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(SyncError::Remote(format!("HTTP {status}: {body}")))
    }
}

#[async_trait]
impl RemoteStore for DriveStore {
    async fn list_children(&self, container_id: &str) -> Result<Vec<RemoteEntry>, SyncError> {
        let query = format!("'{container_id}' in parents");
        let response = self
            .client
            .get(format!("{API_BASE}/files"))
            .bearer_auth(&self.access_token)
            .query(&[
                ("q", query.as_str()),
                ("fields", LIST_FIELDS),
                ("pageSize", "1000"),
            ])
            .send()
            .await?;
        let list: FileList = Self::check(response).await?.json().await?;
        debug!("list_children {} 返回 {} 个条目", container_id, list.files.len());

        Ok(list
            .files
            .into_iter()
            .map(|f| RemoteEntry {
                is_dir: f.mime_type == FOLDER_MIME,
                id: f.id,
                name: f.name,
                modified_time: f.modified_time,
                checksum: f.md5_checksum,
            })
            .collect())
    }

    async fn fetch_content(&self, file_id: &str) -> Result<Vec<u8>, SyncError> {
        let response = self
            .client
            .get(format!("{API_BASE}/files/{file_id}"))
            .bearer_auth(&self.access_token)
            .query(&[("alt", "media")])
            .send()
            .await?;
        let response = Self::check(response).await?;

        // 分块读取响应体
        let mut data = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.try_next().await? {
            data.extend_from_slice(&chunk);
        }
        Ok(data)
    }

    async fn fetch_modified_time(&self, file_id: &str) -> Result<String, SyncError> {
        let response = self
            .client
            .get(format!("{API_BASE}/files/{file_id}"))
            .bearer_auth(&self.access_token)
            .query(&[("fields", "modifiedTime")])
            .send()
            .await?;
        let meta: FileMeta = Self::check(response).await?.json().await?;
        Ok(meta.modified_time)
    }

    async fn create_file(
        &self,
        name: &str,
        container_id: &str,
        local_path: &Path,
    ) -> Result<String, SyncError> {
        // 元数据带上本地修改时间，上传后的条目在下一轮比较中不再判定差异
        let modified = local::modified_time(local_path).await?;
        let metadata = serde_json::json!({
            "name": name,
            "parents": [container_id],
            "modifiedTime": timefmt::to_remote_format(modified),
        });

        let file = tokio::fs::File::open(local_path).await?;
        let media = multipart::Part::stream(reqwest::Body::wrap_stream(ReaderStream::new(file)));
        let form = multipart::Form::new()
            .part(
                "metadata",
                multipart::Part::text(metadata.to_string()).mime_str("application/json")?,
            )
            .part("media", media);

        let response = self
            .client
            .post(format!("{UPLOAD_BASE}/files"))
            .bearer_auth(&self.access_token)
            .query(&[("uploadType", "multipart"), ("fields", "id")])
            .multipart(form)
            .send()
            .await?;
        let created: CreatedFile = Self::check(response).await?.json().await?;
        Ok(created.id)
    }

    async fn update_file(&self, file_id: &str, local_path: &Path) -> Result<(), SyncError> {
        let file = tokio::fs::File::open(local_path).await?;
        let response = self
            .client
            .patch(format!("{UPLOAD_BASE}/files/{file_id}"))
            .bearer_auth(&self.access_token)
            .query(&[("uploadType", "media")])
            .body(reqwest::Body::wrap_stream(ReaderStream::new(file)))
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn create_folder(&self, name: &str, container_id: &str) -> Result<String, SyncError> {
        let metadata = serde_json::json!({
            "name": name,
            "parents": [container_id],
            "mimeType": FOLDER_MIME,
        });
        let response = self
            .client
            .post(format!("{API_BASE}/files"))
            .bearer_auth(&self.access_token)
            .query(&[("fields", "id")])
            .json(&metadata)
            .send()
            .await?;
        let created: CreatedFile = Self::check(response).await?.json().await?;
        Ok(created.id)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
