use std::path::{Path, PathBuf};

use crate::config::SourceConfig;

use super::document::{ContentItem, parse_front_matter};

// =============================================================================
// Errors
// =============================================================================

#[derive(thiserror::Error, Debug)]
pub enum SourceError {
    #[error("source path does not exist: {0}")]
    PathNotFound(PathBuf),

    #[error("source path is not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("failed to read directory {path}: {source}")]
    ReadDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to read directory entry in {path}: {source}")]
    ReadEntry {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to read {path}: {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },
}

// =============================================================================
// Resolved source
// =============================================================================

/// A source after resolution - its content directory is known to exist.
#[derive(Debug, Clone)]
pub struct ResolvedSource {
    /// The source configuration
    pub config: SourceConfig,
    /// The resolved local path to the content directory
    pub local_path: PathBuf,
}

impl ResolvedSource {
    /// Resolve a source configuration against the config file's directory.
    pub fn resolve(config: SourceConfig, base_path: &Path) -> Result<Self, SourceError> {
        let local_path = if config.path.is_relative() {
            base_path.join(&config.path)
        } else {
            config.path.clone()
        };

        if !local_path.exists() {
            return Err(SourceError::PathNotFound(local_path));
        }
        if !local_path.is_dir() {
            return Err(SourceError::NotADirectory(local_path));
        }

        Ok(Self { config, local_path })
    }

    /// Discover all markdown documents in this source.
    ///
    /// Walks the directory tree; unreadable entries and files are returned as
    /// errors next to the items that could be read.
    pub fn discover_content(&self) -> (Vec<ContentItem>, Vec<SourceError>) {
        let mut items = Vec::new();
        let mut errors = Vec::new();
        self.walk_directory(&self.local_path, &PathBuf::new(), &mut items, &mut errors);

        // read_dir order is platform dependent
        items.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));

        (items, errors)
    }

    /// Recursively walk a directory and collect documents.
    fn walk_directory(
        &self,
        dir: &Path,
        relative_path: &Path,
        items: &mut Vec<ContentItem>,
        errors: &mut Vec<SourceError>,
    ) {
        let entries = match std::fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                errors.push(SourceError::ReadDir {
                    path: dir.to_path_buf(),
                    source: e,
                });
                return;
            }
        };

        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    errors.push(SourceError::ReadEntry {
                        path: dir.to_path_buf(),
                        source: e,
                    });
                    continue;
                }
            };

            let path = entry.path();
            let file_name = entry.file_name();
            let file_name_str = file_name.to_string_lossy();

            // Skip hidden files and directories
            if file_name_str.starts_with('.') {
                continue;
            }

            // Skip common non-content directories
            if path.is_dir() && matches!(file_name_str.as_ref(), "node_modules" | "target") {
                continue;
            }

            let item_relative_path = relative_path.join(&file_name);

            if path.is_dir() {
                self.walk_directory(&path, &item_relative_path, items, errors);
            } else if path.is_file() && is_markdown(&item_relative_path) {
                match std::fs::read_to_string(&path) {
                    Ok(content) => items.push(ContentItem::new(
                        self.config.name.clone(),
                        item_relative_path,
                        parse_front_matter(&content),
                    )),
                    Err(e) => errors.push(SourceError::ReadFile { path, source: e }),
                }
            }
        }
    }
}

/// Markdown and MDX documents; everything else is left to the asset pipeline.
fn is_markdown(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .is_some_and(|e| matches!(e.as_str(), "md" | "markdown" | "mdx"))
}
