//! Where built pages go.

use serde::Serialize;

use super::pages::PageSpec;

/// Receives each page as it is registered.
pub trait PageSink {
    fn create_page(&mut self, page: PageSpec);
}

/// Collects pages into an ordered manifest for the renderer.
#[derive(Debug, Default, Serialize)]
pub struct ManifestSink {
    pages: Vec<PageSpec>,
}

impl ManifestSink {
    pub fn pages(&self) -> &[PageSpec] {
        &self.pages
    }

    /// The manifest as pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl PageSink for ManifestSink {
    fn create_page(&mut self, page: PageSpec) {
        tracing::trace!(path = %page.path, template = %page.template, "Registered page");
        self.pages.push(page);
    }
}
