use std::path::{Path, PathBuf};

use net_utils::ApiClient;
use net_utils::multipart::MultipartRelated;
use reqwest::Method;
use tokio::io::AsyncWriteExt;

use crate::file::{CreatedFile, FILE_FIELDS, NewFile};
use crate::local::disambiguate;
use crate::{DriveClient, Error, File, FileList, list_query};

const ALL_DRIVES: (&str, &str) = ("supportsAllDrives", "true");

/// Document-store operations, issued through a connected [`DriveClient`].
#[derive(Debug, Clone, Copy)]
pub struct DriveService<'a> {
    client: &'a DriveClient,
    api: &'a ApiClient,
}

impl<'a> DriveService<'a> {
    pub async fn new(client: &'a DriveClient) -> crate::Result<Self> {
        let api = client.session().await?;
        Ok(Self { client, api })
    }

    /// Uploads a single file under `parent` (the user's root if `None`), named `name` or the
    /// local file name. Returns the new file id.
    pub async fn upload_file(
        &self,
        path: &Path,
        parent: Option<&str>,
        name: Option<&str>,
    ) -> crate::Result<String> {
        let name = match name {
            Some(name) => name,
            None => path
                .file_name()
                .and_then(|name| name.to_str())
                .ok_or_else(|| Error::NoFileName(path.to_path_buf()))?,
        };

        let content_type = mime_guess::from_path(path).first_or_octet_stream();
        let data = tokio::fs::read(path).await?;

        let (multipart_type, body) = MultipartRelated::new()
            .json_part(&NewFile::new(name, parent))?
            .part(content_type.essence_str(), &data)
            .finish();

        let builder = self
            .api
            .request(Method::POST, self.client.upload_url())
            .await?
            .query(&[("uploadType", "multipart"), ("fields", "id"), ALL_DRIVES])
            .header(reqwest::header::CONTENT_TYPE, multipart_type)
            .body(body);

        let resp = self.api.send(builder).await?;
        let created: CreatedFile = net_utils::deserialize_json(resp).await?;

        tracing::info!(message = "uploaded file", path = %path.display(), id = %created.id);
        Ok(created.id)
    }

    /// Creates an empty folder, returning its id. Drive allows duplicate names, so this always
    /// creates a new folder.
    pub async fn create_folder(&self, name: &str, parent: Option<&str>) -> crate::Result<String> {
        let url = self.client.files_url();

        let builder = self
            .api
            .request(Method::POST, url)
            .await?
            .query(&[("fields", "id"), ALL_DRIVES])
            .json(&NewFile::folder(name, parent));

        let resp = self.api.send(builder).await?;
        let created: CreatedFile = net_utils::deserialize_json(resp).await?;

        tracing::debug!(message = "created folder", name, id = %created.id);
        Ok(created.id)
    }

    /// Mirrors a local directory tree under `parent`, returning the id of the new top folder.
    pub async fn upload_folder(&self, path: &Path, parent: Option<&str>) -> crate::Result<String> {
        let name = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| Error::NoFileName(path.to_path_buf()))?;

        let folder_id = self.create_folder(name, parent).await?;

        let mut entries = Vec::new();
        let mut read_dir = tokio::fs::read_dir(path).await?;
        while let Some(entry) = read_dir.next_entry().await? {
            entries.push(entry.path());
        }
        entries.sort();

        for entry in entries {
            if tokio::fs::metadata(&entry).await?.is_dir() {
                Box::pin(self.upload_folder(&entry, Some(&folder_id))).await?;
            } else {
                self.upload_file(&entry, Some(&folder_id), None).await?;
            }
        }

        Ok(folder_id)
    }

    pub async fn get_object(&self, id: &str) -> crate::Result<File> {
        let url = self.client.file_url(id);
        Ok(self
            .api
            .get_json(&url, &[("fields", FILE_FIELDS), ALL_DRIVES])
            .await?)
    }

    /// Non-trashed objects in `parent`, optionally only those called `name`, across every page.
    pub async fn list_objects(
        &self,
        parent: Option<&str>,
        name: Option<&str>,
    ) -> crate::Result<Vec<File>> {
        let url = self.client.files_url();
        let query = list_query(parent, name);
        let fields = format!("nextPageToken, files({FILE_FIELDS})");

        let mut files = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut params = vec![
                ("q", query.as_str()),
                ("fields", fields.as_str()),
                ("includeItemsFromAllDrives", "true"),
                ALL_DRIVES,
            ];
            if let Some(token) = page_token.as_deref() {
                params.push(("pageToken", token));
            }

            let page: FileList = self.api.get_json(&url, &params).await?;
            files.extend(page.files);

            match page.next_page_token {
                Some(next_page_token) if !next_page_token.is_empty() => {
                    page_token = Some(next_page_token)
                }
                _ => break,
            }
        }

        Ok(files)
    }

    pub async fn list_file_names(&self, parent: &str) -> crate::Result<Vec<String>> {
        let objects = self.list_objects(Some(parent), None).await?;
        Ok(objects
            .into_iter()
            .filter(|obj| !obj.is_folder())
            .map(|obj| obj.name)
            .collect())
    }

    pub async fn list_folder_names(&self, parent: &str) -> crate::Result<Vec<String>> {
        let objects = self.list_objects(Some(parent), None).await?;
        Ok(objects
            .into_iter()
            .filter(File::is_folder)
            .map(|obj| obj.name)
            .collect())
    }

    /// Downloads into `parent_dir` under the file's Drive name, or `name (1).ext` if that's
    /// taken. Returns the path written.
    pub async fn download_file(&self, id: &str, parent_dir: &Path) -> crate::Result<PathBuf> {
        let file = self.get_object(id).await?;
        self.download_content(&file, parent_dir).await
    }

    async fn download_content(&self, file: &File, parent_dir: &Path) -> crate::Result<PathBuf> {
        let path = disambiguate(parent_dir.join(&file.name)).await?;

        let builder = self
            .api
            .request(Method::GET, self.client.file_url(&file.id))
            .await?
            .query(&[("alt", "media"), ALL_DRIVES]);
        let mut resp = self.api.send(builder).await?;

        let mut dst = tokio::fs::File::create(&path).await?;
        let mut size = 0;
        while let Some(chunk) = resp.chunk().await? {
            size += chunk.len();
            dst.write_all(&chunk).await?;
        }
        dst.flush().await?;

        tracing::info!(message = "downloaded file", id = %file.id, path = %path.display(), size);
        Ok(path)
    }

    /// Recreates the folder and everything under it inside `parent_dir`, disambiguating the top
    /// folder name like [`Self::download_file`] does. Returns the local folder path.
    pub async fn download_folder(&self, id: &str, parent_dir: &Path) -> crate::Result<PathBuf> {
        let folder = self.get_object(id).await?;
        self.download_tree(&folder, parent_dir).await
    }

    async fn download_tree(&self, folder: &File, parent_dir: &Path) -> crate::Result<PathBuf> {
        let path = disambiguate(parent_dir.join(&folder.name)).await?;
        tokio::fs::create_dir(&path).await?;

        for child in self.list_objects(Some(&folder.id), None).await? {
            if child.is_folder() {
                Box::pin(self.download_tree(&child, &path)).await?;
            } else {
                self.download_content(&child, &path).await?;
            }
        }

        Ok(path)
    }
}
