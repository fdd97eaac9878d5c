/// Object metadata, as returned by `objects.get`/`objects.list`.
#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Object {
    pub name: String,
    #[serde(default)]
    pub bucket: Option<String>,
    #[serde(default)]
    pub content_type: Option<String>,
    #[serde(default, with = "serde_int")]
    pub size: Option<u64>,
    #[serde(default)]
    pub updated: Option<String>,
}

impl Object {
    /// Zero-byte placeholder keys ending in `/`.
    pub fn is_folder_marker(&self) -> bool {
        self.name.ends_with('/')
    }
}

#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectList {
    #[serde(default)]
    pub items: Vec<Object>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

mod serde_int {
    use serde::de;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        match <Option<String> as serde::Deserialize<'de>>::deserialize(deserializer)? {
            Some(s) => s.parse().map(Some).map_err(de::Error::custom),
            None => Ok(None),
        }
    }
}
