use std::path::{Component, Path, PathBuf};

use crate::error::{ApiError, Result};
use crate::models::FileEntry;

/// Read-only view over the directory of importable `.txt` manuscripts.
#[derive(Clone)]
pub struct Library {
    root: PathBuf,
}

impl Library {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Library { root: root.into() }
    }

    /// List the `.txt` files in the library, sorted by name so the
    /// order is stable across requests. A directory read failure
    /// yields an error, never a partial list.
    pub fn list(&self) -> Result<Vec<FileEntry>> {
        let entries = std::fs::read_dir(&self.root)
            .map_err(|e| ApiError::ResourceUnavailable(format!("failed to read files: {e}")))?;

        let mut files: Vec<FileEntry> = entries
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| entry.file_name().into_string().ok())
            .filter(|name| name.ends_with(".txt"))
            .map(|name| FileEntry {
                key: name.clone(),
                label: name,
            })
            .collect();
        files.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(files)
    }

    /// Read one manuscript as UTF-8 text, untransformed.
    pub fn read(&self, filename: &str) -> Result<String> {
        if !is_plain_file_name(filename) {
            return Err(ApiError::ResourceUnavailable(format!(
                "failed to read file: invalid filename {filename:?}"
            )));
        }
        std::fs::read_to_string(self.root.join(filename))
            .map_err(|e| ApiError::ResourceUnavailable(format!("failed to read file: {e}")))
    }
}

/// A filename must be a single normal path component; anything with
/// separators or `..` could escape the library root.
fn is_plain_file_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}
