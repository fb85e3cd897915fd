use std::path::PathBuf;

use chrono::{DateTime, Utc};

use crate::config::RootConfig;

use super::locale::Locales;
use super::nav::SidebarNav;
use super::pages::{PageContext, PageSettings, build_pages};
use super::sink::{ManifestSink, PageSink};
use super::store::{ContentQuery, ContentStore, QueryError};

#[derive(thiserror::Error, Debug)]
pub enum BuildError {
    #[error("{0}")]
    Query(#[from] QueryError),

    #[error("failed to serialize page manifest: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Number of pages registered, by kind.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PageCounts {
    pub blog_lists: usize,
    pub blog_posts: usize,
    pub blog_tags: usize,
    pub docs: usize,
}

impl PageCounts {
    pub fn total(&self) -> usize {
        self.blog_lists + self.blog_posts + self.blog_tags + self.docs
    }

    fn count(&mut self, context: &PageContext) {
        match context {
            PageContext::BlogList(_) => self.blog_lists += 1,
            PageContext::BlogPost(_) => self.blog_posts += 1,
            PageContext::BlogTag(_) => self.blog_tags += 1,
            PageContext::Doc(_) => self.docs += 1,
        }
    }
}

pub struct BuildResult {
    pub output_dir: PathBuf,
    pub manifest_path: PathBuf,
    pub counts: PageCounts,
}

pub struct Builder {
    config: RootConfig,
    /// Base path for resolving relative paths (typically the config file's directory)
    base_path: PathBuf,
    /// Reference time for deciding which posts are released
    now: DateTime<Utc>,
}

impl Builder {
    pub fn new(config: RootConfig, base_path: PathBuf) -> Self {
        Self {
            config,
            base_path,
            now: Utc::now(),
        }
    }

    /// Build as if the current time were `now`.
    pub fn with_now(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }

    pub async fn build(&self) -> Result<BuildResult, BuildError> {
        // Build pass:
        // 1. Read every source into the content store
        // 2. Query, derive pages and register them with the manifest
        // 3. Write the manifest to the output directory

        let locales = Locales::from_config(&self.config.locales);
        let store = ContentStore::load(
            &self.config.sources,
            &self.base_path,
            locales,
            self.now,
            self.config.query.limit,
        );
        tracing::info!(
            sources = self.config.sources.len(),
            items = store.item_count(),
            "Loaded content"
        );

        let mut sink = ManifestSink::default();
        let counts = self.generate(&store, &mut sink)?;

        let output_dir = self.output_dir();
        tokio::fs::create_dir_all(&output_dir).await?;
        let manifest_path = output_dir.join(&self.config.site.manifest);
        tokio::fs::write(&manifest_path, sink.to_json()?).await?;

        tracing::info!(
            pages = counts.total(),
            manifest = %manifest_path.display(),
            "Wrote page manifest"
        );

        Ok(BuildResult {
            output_dir,
            manifest_path,
            counts,
        })
    }

    /// Run the content query and register every page with `sink`.
    ///
    /// Nothing is registered when the query fails.
    pub fn generate(
        &self,
        query: &dyn ContentQuery,
        sink: &mut dyn PageSink,
    ) -> Result<PageCounts, BuildError> {
        let nodes = query.query()?;

        let default_locale = self.config.locales.default.as_str();
        let nav = SidebarNav::build(&nodes, &self.config.sources, default_locale);
        let settings = PageSettings {
            posts_per_page: self.config.blog.posts_per_page,
            default_locale,
            templates: &self.config.templates,
        };

        let mut counts = PageCounts::default();
        for page in build_pages(&nodes, &nav, &settings) {
            counts.count(&page.context);
            sink.create_page(page);
        }

        tracing::debug!(
            blog_lists = counts.blog_lists,
            blog_posts = counts.blog_posts,
            blog_tags = counts.blog_tags,
            docs = counts.docs,
            "Registered pages"
        );

        Ok(counts)
    }

    /// Get the output directory path, resolved against base_path.
    fn output_dir(&self) -> PathBuf {
        let output = &self.config.site.output;
        if output.is_relative() {
            self.base_path.join(output)
        } else {
            output.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::annotate::Node;
    use crate::config::{
        BlogConfig, LocaleConfig, LocaleEntry, QueryConfig, SiteConfig, SourceConfig,
        TemplateConfig,
    };
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use std::path::Path;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()
    }

    fn config(sources: Vec<SourceConfig>) -> RootConfig {
        RootConfig {
            site: SiteConfig {
                name: "Test".to_string(),
                url: None,
                output: "_site".into(),
                manifest: "pages.json".to_string(),
            },
            sources,
            locales: LocaleConfig {
                default: "en".to_string(),
                available: vec![LocaleEntry {
                    code: "de".to_string(),
                    name: Some("Deutsch".to_string()),
                }],
            },
            blog: BlogConfig { posts_per_page: 2 },
            templates: TemplateConfig::default(),
            query: QueryConfig::default(),
        }
    }

    fn source(name: &str, path: &str) -> SourceConfig {
        SourceConfig {
            name: name.to_string(),
            path: path.into(),
            nav: None,
        }
    }

    fn write(root: &Path, path: &str, content: &str) {
        let path = root.join(path);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    struct FailingQuery;

    impl ContentQuery for FailingQuery {
        fn query(&self) -> Result<Vec<Node>, QueryError> {
            Err(QueryError {
                errors: vec!["boom".to_string()],
            })
        }
    }

    #[test]
    fn test_query_failure_registers_nothing() {
        let builder = Builder::new(config(vec![]), PathBuf::from(".")).with_now(now());
        let mut sink = ManifestSink::default();

        let err = builder.generate(&FailingQuery, &mut sink).unwrap_err();
        assert!(matches!(err, BuildError::Query(_)));
        assert!(sink.pages().is_empty());
    }

    #[tokio::test]
    async fn test_build_writes_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(root, "docs/index.md", "---\ntitle: Home\n---\n");
        write(root, "docs/guides/setup.md", "# Setup");
        write(root, "docs/blog/one.md", "---\ndate: 2024-01-01\ntags: [Rust]\n---\n");
        write(root, "docs/blog/two.md", "---\ndate: 2024-02-01\ntags: rust\n---\n");
        write(root, "docs/blog/three.md", "---\ndate: 2024-03-01\n---\n");
        write(root, "docs/blog/draft.md", "---\ndate: 2024-04-01\ndraft: true\n---\n");
        write(root, "i18n/de/guides/setup.md", "# Einrichtung");
        write(root, "pkgs/core/README.md", "# Core");
        write(root, "pkgs/core/CHANGELOG.md", "# Changes");

        let builder = Builder::new(
            config(vec![
                source("docs", "docs"),
                source("docs-de", "i18n"),
                source("packages", "pkgs"),
            ]),
            root.to_path_buf(),
        )
        .with_now(now());

        let result = builder.build().await.unwrap();
        assert_eq!(
            result.counts,
            PageCounts {
                blog_lists: 2,
                blog_posts: 3,
                blog_tags: 1,
                docs: 4,
            }
        );
        assert_eq!(result.manifest_path, root.join("_site/pages.json"));

        let manifest: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&result.manifest_path).unwrap())
                .unwrap();
        let paths: Vec<&str> = manifest["pages"]
            .as_array()
            .unwrap()
            .iter()
            .map(|page| page["path"].as_str().unwrap())
            .collect();
        assert_eq!(
            paths,
            vec![
                "/blog",
                "/blog/page/2",
                "/blog/three/",
                "/blog/two/",
                "/blog/one/",
                "/blog/tags/rust/",
                // Undated docs follow the query order: slug descending
                "/packages/core/",
                "/index/",
                "/guides/setup/",
                "/de/guides/setup/",
            ]
        );
    }

    #[tokio::test]
    async fn test_build_fails_on_missing_source() {
        let dir = tempfile::tempdir().unwrap();
        let builder = Builder::new(config(vec![source("docs", "missing")]), dir.path().into())
            .with_now(now());

        let err = builder.build().await.err().unwrap();
        assert!(matches!(err, BuildError::Query(_)));
        assert!(!dir.path().join("_site/pages.json").exists());
    }
}
