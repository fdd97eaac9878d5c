use serde::{Deserialize, Serialize};

/// Drive's mime type for folders.
pub const FOLDER_MIME: &str = "application/vnd.google-apps.folder";

/// Fields requested for every [`File`].
pub(crate) const FILE_FIELDS: &str = "id, name, mimeType, parents";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct File {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub mime_type: String,
    #[serde(default)]
    pub parents: Vec<String>,
}

impl File {
    pub fn is_folder(&self) -> bool {
        self.mime_type == FOLDER_MIME
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileList {
    #[serde(default)]
    pub files: Vec<File>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

/// Request body for `files.create`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct NewFile<'a> {
    pub name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parents: Option<[&'a str; 1]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<&'a str>,
}

impl<'a> NewFile<'a> {
    pub fn new(name: &'a str, parent: Option<&'a str>) -> Self {
        Self {
            name,
            parents: parent.map(|parent| [parent]),
            mime_type: None,
        }
    }

    pub fn folder(name: &'a str, parent: Option<&'a str>) -> Self {
        Self {
            mime_type: Some(FOLDER_MIME),
            ..Self::new(name, parent)
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct CreatedFile {
    pub id: String,
}
