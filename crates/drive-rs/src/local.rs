use std::path::{Path, PathBuf};

/// `dir/name (1).ext` for `dir/name.ext`.
pub fn with_copy_suffix(path: &Path) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|stem| stem.to_string_lossy())
        .unwrap_or_default();

    let file_name = match path.extension() {
        Some(ext) => format!("{stem} (1).{}", ext.to_string_lossy()),
        None => format!("{stem} (1)"),
    };

    path.with_file_name(file_name)
}

/// `path` if it's free, otherwise [`with_copy_suffix`]. Only one level: a taken `name (1)` is
/// reused as is.
pub(crate) async fn disambiguate(path: PathBuf) -> std::io::Result<PathBuf> {
    if tokio::fs::try_exists(&path).await? {
        Ok(with_copy_suffix(&path))
    } else {
        Ok(path)
    }
}
