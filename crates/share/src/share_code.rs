//! Share-code rendering seam.
//!
//! Turning a link into a scannable code is left to the host; the booth only
//! hands over the link after a successful upload.

use std::sync::{Mutex, PoisonError};

use pixelpop_common::error::PixelpopResult;

/// Renders a scannable code for a share link.
pub trait ShareCodeRenderer: Send + Sync {
    fn render(&self, url: &str) -> PixelpopResult<()>;
}

/// Keeps the most recent share link. Useful as a renderer in headless runs
/// and tests.
#[derive(Debug, Default)]
pub struct ShareLinkSlot {
    last: Mutex<Option<String>>,
    rendered: Mutex<usize>,
}

impl ShareLinkSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// The last link handed to [`ShareCodeRenderer::render`].
    pub fn last(&self) -> Option<String> {
        self.last
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// How many links have been rendered.
    pub fn render_count(&self) -> usize {
        *self.rendered.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ShareCodeRenderer for ShareLinkSlot {
    fn render(&self, url: &str) -> PixelpopResult<()> {
        *self.last.lock().unwrap_or_else(PoisonError::into_inner) = Some(url.to_string());
        *self.rendered.lock().unwrap_or_else(PoisonError::into_inner) += 1;
        Ok(())
    }
}
