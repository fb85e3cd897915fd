//! Configuration loading and types for sitepages.
//!
//! - Type definitions for config structures (`types`)
//! - Loading configs from files and the environment (`load`)

mod load;
mod types;

use std::collections::HashSet;
use std::path::PathBuf;

pub use load::DEFAULT_CONFIG_FILE;
pub use types::{
    BlogConfig, LocaleConfig, LocaleEntry, NavConfig, NavItem, QueryConfig, RootConfig,
    SiteConfig, SourceConfig, TemplateConfig,
};

// =============================================================================
// Errors
// =============================================================================

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("failed to encode config file path as a unicode string: {0}")]
    EncodePath(PathBuf),

    #[error("failed to deserialize config: {0}")]
    Deserialize(#[from] config::ConfigError),

    #[error("failed to get current working directory: {0}")]
    CwdFailure(std::io::Error),

    #[error("{0}")]
    Validation(String),
}

// =============================================================================
// Validation
// =============================================================================

impl RootConfig {
    /// Check invariants serde can't express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.blog.posts_per_page == 0 {
            return Err(ConfigError::Validation(
                "invalid config: 'blog.posts_per_page' must be greater than zero".to_string(),
            ));
        }

        if self.query.limit == 0 {
            return Err(ConfigError::Validation(
                "invalid config: 'query.limit' must be greater than zero".to_string(),
            ));
        }

        let mut names = HashSet::new();
        for source in &self.sources {
            if !names.insert(source.name.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "invalid config: source '{}' is defined more than once",
                    source.name
                )));
            }
        }

        if self.locales.default.trim().is_empty() {
            return Err(ConfigError::Validation(
                "invalid config: 'locales.default' must not be empty".to_string(),
            ));
        }
        if let Some(entry) = self
            .locales
            .available
            .iter()
            .find(|entry| entry.code.trim().is_empty() || entry.code.contains('/'))
        {
            return Err(ConfigError::Validation(format!(
                "invalid config: locale code '{}' is not a valid path segment",
                entry.code
            )));
        }

        Ok(())
    }
}
