//! Folder/file classification over a flat key namespace.
use std::collections::BTreeSet;

/// Appends a trailing `/` if missing, so `"a/b"` and `"a/b/"` name the same folder.
pub fn normalize_prefix(prefix: &str) -> String {
    if prefix.ends_with('/') {
        prefix.to_owned()
    } else {
        format!("{prefix}/")
    }
}

fn segment_count(key: &str) -> usize {
    key.split('/').count()
}

/// Names of files directly under `prefix`: keys not ending in `/` with as many segments as the
/// normalized prefix (the prefix's trailing empty segment stands in for the file name).
pub fn direct_child_files<'a, I>(prefix: &str, keys: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let prefix = normalize_prefix(prefix);
    let prefix_segments = segment_count(&prefix);

    keys.into_iter()
        .filter(|key| key.starts_with(&prefix))
        .filter(|key| !key.ends_with('/') && segment_count(key) == prefix_segments)
        .filter_map(|key| key.rsplit('/').next())
        .map(String::from)
        .collect()
}

/// Names of folders directly under `prefix`, sorted and deduplicated. A folder counts whether it
/// has an explicit `name/` marker key or is only implied by a deeper key like `name/file.txt`.
pub fn direct_child_folders<'a, I>(prefix: &str, keys: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let prefix = normalize_prefix(prefix);
    let prefix_segments = segment_count(&prefix);

    let folders: BTreeSet<&str> = keys
        .into_iter()
        .filter(|key| key.starts_with(&prefix) && *key != prefix)
        .filter(|key| segment_count(key) > prefix_segments)
        .filter_map(|key| key.split('/').nth(prefix_segments - 1))
        .filter(|name| !name.is_empty())
        .collect();

    folders.into_iter().map(String::from).collect()
}
