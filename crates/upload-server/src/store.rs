//! On-disk image store behind `/images`.

use std::path::{Path, PathBuf};

use pixelpop_common::error::{PixelpopError, PixelpopResult};

/// Directory of uploaded images.
#[derive(Debug, Clone)]
pub struct ImageStore {
    root: PathBuf,
}

impl ImageStore {
    /// Open the store, creating the directory if needed.
    pub fn open(root: impl Into<PathBuf>) -> PixelpopResult<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root).map_err(|e| {
            PixelpopError::storage(format!(
                "Cannot create images directory {}: {e}",
                root.display()
            ))
        })?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write `bytes` as `file_name`, replacing any previous file.
    pub async fn save(&self, file_name: &str, bytes: &[u8]) -> PixelpopResult<PathBuf> {
        if !is_safe_file_name(file_name) {
            return Err(PixelpopError::invalid_input(format!(
                "Refusing file name '{file_name}'"
            )));
        }
        let path = self.root.join(file_name);
        tokio::fs::write(&path, bytes).await?;
        Ok(path)
    }
}

/// A plain file name: no separators, no parent references, not hidden.
pub fn is_safe_file_name(name: &str) -> bool {
    !name.is_empty()
        && !name.contains('/')
        && !name.contains('\\')
        && !name.contains("..")
        && !name.starts_with('.')
        && !name.contains('\0')
}

/// Public path of a stored file.
pub fn public_url(file_name: &str) -> String {
    format!("/images/{file_name}")
}
