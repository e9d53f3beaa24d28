//! Print sinks for the self-printing HTML document.

use std::path::{Path, PathBuf};

use pixelpop_common::clock::stamped_file_name;
use pixelpop_common::error::{PixelpopError, PixelpopResult};

pub const PRINT_FILE_PREFIX: &str = "pixelpop-print";

/// Receives a print document.
///
/// Returns the path the document was written to, if the sink stores it.
pub trait PrintSink: Send + Sync {
    fn print(&self, html: &str) -> PixelpopResult<Option<PathBuf>>;
}

/// Writes `pixelpop-print-<ms>.html` into a directory; opening the file in
/// a browser brings up the print dialog.
#[derive(Debug, Clone)]
pub struct HtmlFilePrintSink {
    dir: PathBuf,
}

impl HtmlFilePrintSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl PrintSink for HtmlFilePrintSink {
    fn print(&self, html: &str) -> PixelpopResult<Option<PathBuf>> {
        std::fs::create_dir_all(&self.dir).map_err(|e| {
            PixelpopError::storage(format!(
                "Cannot create print directory {}: {e}",
                self.dir.display()
            ))
        })?;
        let path = self.dir.join(stamped_file_name(PRINT_FILE_PREFIX, "html"));
        std::fs::write(&path, html)?;
        tracing::info!(path = %path.display(), "Wrote print document");
        Ok(Some(path))
    }
}
