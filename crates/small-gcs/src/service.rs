use std::path::{Path, PathBuf};

use bytes::Bytes;
use net_utils::ApiClient;
use reqwest::Method;

use crate::url::UrlBuilder;
use crate::{GcsClient, Object, ObjectList, children};

/// Object-store operations on a single bucket.
#[derive(Debug, Clone)]
pub struct GcsService<'a> {
    client: &'a GcsClient,
    api: &'a ApiClient,
    bucket: Box<str>,
}

impl<'a> GcsService<'a> {
    pub async fn new(client: &'a GcsClient, bucket: impl Into<Box<str>>) -> crate::Result<Self> {
        let api = client.session().await?;
        Ok(Self {
            client,
            api,
            bucket: bucket.into(),
        })
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    fn urls(&self) -> UrlBuilder<'_> {
        UrlBuilder::new(self.client.root(), &self.bucket)
    }

    /// Every object whose key starts with `prefix` (taken verbatim), following page tokens.
    pub async fn list_objects(&self, prefix: &str) -> crate::Result<Vec<Object>> {
        let url = self.urls().format();

        let mut objects = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut query = vec![("prefix", prefix)];
            if let Some(token) = page_token.as_deref() {
                query.push(("pageToken", token));
            }

            let page: ObjectList = self.api.get_json(&url, &query).await?;
            objects.extend(page.items);

            match page.next_page_token {
                Some(next_page_token) if !next_page_token.is_empty() => {
                    page_token = Some(next_page_token)
                }
                _ => break,
            }
        }

        Ok(objects)
    }

    pub async fn list_blob_names(&self, prefix: &str) -> crate::Result<Vec<String>> {
        let objects = self.list_objects(prefix).await?;
        Ok(objects.into_iter().map(|obj| obj.name).collect())
    }

    /// Folder names one level below `prefix`.
    pub async fn direct_child_folders(&self, prefix: &str) -> crate::Result<Vec<String>> {
        let prefix = children::normalize_prefix(prefix);
        let names = self.list_blob_names(&prefix).await?;
        Ok(children::direct_child_folders(
            &prefix,
            names.iter().map(String::as_str),
        ))
    }

    /// File names directly under `prefix`.
    pub async fn direct_child_files(&self, prefix: &str) -> crate::Result<Vec<String>> {
        let prefix = children::normalize_prefix(prefix);
        let names = self.list_blob_names(&prefix).await?;
        Ok(children::direct_child_files(
            &prefix,
            names.iter().map(String::as_str),
        ))
    }

    pub async fn get_object(&self, name: &str) -> crate::Result<Object> {
        let url = self.urls().name(name).format();
        Ok(self.api.get_json(&url, net_utils::NO_QUERY).await?)
    }

    pub async fn exists(&self, name: &str) -> crate::Result<bool> {
        match self.get_object(name).await {
            Ok(_) => Ok(true),
            Err(err) if err.is_not_found() => Ok(false),
            Err(err) => Err(err),
        }
    }

    async fn upload_bytes(
        &self,
        name: &str,
        content_type: &str,
        data: impl Into<reqwest::Body>,
    ) -> crate::Result<Object> {
        let url = self.urls().upload().format();

        let builder = self
            .api
            .request(Method::POST, &url)
            .await?
            .query(&[("uploadType", "media"), ("name", name)])
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(data);

        let resp = self.api.send(builder).await?;
        Ok(net_utils::deserialize_json(resp).await?)
    }

    /// Uploads to `prefix/<file name>`, returning the new key.
    pub async fn upload_file(&self, path: &Path, prefix: &str) -> crate::Result<String> {
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| crate::Error::NoFileName(path.to_path_buf()))?;

        let name = format!("{}{file_name}", children::normalize_prefix(prefix));
        let content_type = mime_guess::from_path(path).first_or_octet_stream();

        let data = tokio::fs::read(path).await?;
        let size = data.len();
        self.upload_bytes(&name, content_type.essence_str(), data)
            .await?;

        tracing::info!(message = "uploaded file", bucket = %self.bucket, name = %name, size);
        Ok(name)
    }

    /// Writes a zero-byte `prefix/folder_name/` marker unless one exists. Returns the marker key.
    pub async fn create_folder_if_not_exists(
        &self,
        prefix: &str,
        folder_name: &str,
    ) -> crate::Result<String> {
        let name = format!("{}{folder_name}/", children::normalize_prefix(prefix));

        if !self.exists(&name).await? {
            self.upload_bytes(&name, "application/x-directory", Bytes::new())
                .await?;
            tracing::debug!(message = "created folder marker", bucket = %self.bucket, name = %name);
        }

        Ok(name)
    }

    pub async fn read_blob(&self, name: &str) -> crate::Result<Bytes> {
        let url = self.urls().name(name).format();
        let builder = self
            .api
            .request(Method::GET, &url)
            .await?
            .query(&[("alt", "media")]);

        let resp = self.api.send(builder).await?;
        Ok(resp.bytes().await?)
    }

    pub async fn download_blob(&self, name: &str, path: &Path) -> crate::Result<PathBuf> {
        let bytes = self.read_blob(name).await?;
        tokio::fs::write(path, &bytes).await?;

        tracing::info!(message = "downloaded blob", name, path = %path.display());
        Ok(path.to_path_buf())
    }

    /// Deletes every key starting with `prefix`, returning how many were removed.
    pub async fn delete_blob(&self, prefix: &str) -> crate::Result<usize> {
        let names = self.list_blob_names(prefix).await?;

        for name in names.iter() {
            let url = self.urls().name(name).format();
            self.api.delete(&url).await?;
        }

        tracing::info!(message = "deleted blobs", prefix, count = names.len());
        Ok(names.len())
    }
}
