//! Configuration loading from files.
//!
//! The YAML file is layered with `SITEPAGES_*` environment variables, so
//! `SITEPAGES_BLOG__POSTS_PER_PAGE=12` overrides `blog.posts_per_page`.

use std::path::Path;

use super::{ConfigError, RootConfig};

/// Default config file name, looked up relative to the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "sitepages.yaml";

const ENV_PREFIX: &str = "SITEPAGES";

impl RootConfig {
    /// Load the config from the command line argument, defaulting to `sitepages.yaml`
    pub async fn load_from_arg(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        let config_file = config_file.unwrap_or(Path::new(DEFAULT_CONFIG_FILE));
        let config_file = if config_file.is_relative() {
            std::env::current_dir()
                .map_err(ConfigError::CwdFailure)?
                .join(config_file)
        } else {
            config_file.to_path_buf()
        };

        Self::load_from_file(&config_file).await
    }

    /// Load the config from a file path and validate it
    pub(crate) async fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let path_str = path
            .as_os_str()
            .to_str()
            .ok_or_else(|| ConfigError::EncodePath(path.to_path_buf()))?;

        let config = config::Config::builder()
            .add_source(config::File::new(path_str, config::FileFormat::Yaml))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize::<RootConfig>()?;

        config.validate()?;
        tracing::debug!(path = %path.display(), sources = config.sources.len(), "Loaded config");

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_FILE);
        std::fs::write(
            &path,
            r#"
site:
  name: Example
  output: public
sources:
  - name: docs
    path: ./docs
blog:
  posts_per_page: 4
"#,
        )
        .unwrap();

        let config = RootConfig::load_from_file(&path).await.unwrap();
        assert_eq!(config.site.name, "Example");
        assert_eq!(config.site.output, std::path::PathBuf::from("public"));
        assert_eq!(config.blog.posts_per_page, 4);
        assert_eq!(config.sources[0].name, "docs");
    }

    #[tokio::test]
    async fn test_load_rejects_invalid_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_FILE);
        std::fs::write(
            &path,
            r#"
site:
  name: Example
sources: []
blog:
  posts_per_page: 0
"#,
        )
        .unwrap();

        let err = RootConfig::load_from_file(&path).await.unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = RootConfig::load_from_file(&dir.path().join("missing.yaml"))
            .await
            .unwrap_err();
        assert!(matches!(err, ConfigError::Deserialize(_)));
    }
}
