//! The in-memory content store and the query the page builder runs against it.

use std::path::Path;

use chrono::{DateTime, Utc};

use crate::config::SourceConfig;

use super::annotate::{Node, annotate, newest_first};
use super::document::ContentItem;
use super::locale::Locales;
use super::source::ResolvedSource;

/// A failed content query, carrying every error encountered.
#[derive(thiserror::Error, Debug)]
#[error("content query failed with {} error(s): {}", .errors.len(), .errors.join("; "))]
pub struct QueryError {
    pub errors: Vec<String>,
}

/// Answers the single query a build pass needs.
pub trait ContentQuery {
    /// All annotated, non-draft items, newest first then by slug, capped.
    fn query(&self) -> Result<Vec<Node>, QueryError>;
}

/// Content read from every configured source.
pub struct ContentStore {
    items: Vec<ContentItem>,
    errors: Vec<String>,
    locales: Locales,
    now: DateTime<Utc>,
    limit: usize,
}

impl ContentStore {
    /// Build a store from already-read items.
    pub fn from_items(
        items: Vec<ContentItem>,
        locales: Locales,
        now: DateTime<Utc>,
        limit: usize,
    ) -> Self {
        Self {
            items,
            errors: Vec::new(),
            locales,
            now,
            limit,
        }
    }

    /// Resolve and read every source. Failures are kept and reported by `query`.
    pub fn load(
        sources: &[SourceConfig],
        base_path: &Path,
        locales: Locales,
        now: DateTime<Utc>,
        limit: usize,
    ) -> Self {
        let mut store = Self::from_items(Vec::new(), locales, now, limit);

        for config in sources {
            let source = match ResolvedSource::resolve(config.clone(), base_path) {
                Ok(source) => source,
                Err(e) => {
                    store.errors.push(format!("source '{}': {e}", config.name));
                    continue;
                }
            };

            let (items, errors) = source.discover_content();
            tracing::info!(
                source = %config.name,
                items = items.len(),
                path = %source.local_path.display(),
                "Read source"
            );
            store
                .errors
                .extend(errors.into_iter().map(|e| format!("source '{}': {e}", config.name)));
            store.items.extend(items);
        }

        store
    }

    /// Number of items read, before annotation and filtering.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }
}

impl ContentQuery for ContentStore {
    fn query(&self) -> Result<Vec<Node>, QueryError> {
        if !self.errors.is_empty() {
            return Err(QueryError {
                errors: self.errors.clone(),
            });
        }

        let nodes: Vec<Node> = self
            .items
            .iter()
            .cloned()
            .filter_map(|item| annotate(item, &self.locales, self.now))
            .collect();

        Ok(select(nodes, self.limit))
    }
}

/// Drop drafts, order newest first then by slug, and cap the result.
pub fn select(nodes: Vec<Node>, limit: usize) -> Vec<Node> {
    let mut nodes: Vec<Node> = nodes.into_iter().filter(|node| !node.is_draft()).collect();
    nodes.sort_by(newest_first);

    if nodes.len() > limit {
        tracing::warn!(
            total = nodes.len(),
            limit,
            "Content query limit reached, dropping oldest items"
        );
        nodes.truncate(limit);
    }

    nodes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::document::FrontMatter;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()
    }

    fn post(path: &str, date: &str, draft: bool) -> ContentItem {
        ContentItem::new(
            "docs",
            path,
            FrontMatter {
                date: Some(date.to_string()),
                draft,
                ..FrontMatter::default()
            },
        )
    }

    #[test]
    fn test_query_filters_sorts_and_drops_slugless_items() {
        let store = ContentStore::from_items(
            vec![
                post("blog/old.md", "2023-01-01", false),
                post("blog/draft.md", "2024-05-01", true),
                post("blog/new.md", "2024-02-01", false),
                ContentItem::new("assets", "logo.md", FrontMatter::default()),
                ContentItem::new("docs", "guide.md", FrontMatter::default()),
            ],
            Locales::default(),
            now(),
            100,
        );

        let nodes = store.query().unwrap();
        let slugs: Vec<&str> = nodes.iter().map(Node::slug).collect();
        assert_eq!(slugs, vec!["/blog/new/", "/blog/old/", "/guide/"]);
    }

    #[test]
    fn test_query_limit() {
        let store = ContentStore::from_items(
            vec![
                post("blog/a.md", "2024-01-01", false),
                post("blog/b.md", "2024-01-02", false),
                post("blog/c.md", "2024-01-03", false),
            ],
            Locales::default(),
            now(),
            2,
        );

        let nodes = store.query().unwrap();
        let slugs: Vec<&str> = nodes.iter().map(Node::slug).collect();
        assert_eq!(slugs, vec!["/blog/c/", "/blog/b/"]);
    }

    #[test]
    fn test_load_collects_errors() {
        let dir = tempfile::tempdir().unwrap();
        let sources = vec![SourceConfig {
            name: "docs".to_string(),
            path: "missing".into(),
            nav: None,
        }];

        let store = ContentStore::load(&sources, dir.path(), Locales::default(), now(), 100);
        let err = store.query().unwrap_err();
        assert_eq!(err.errors.len(), 1);
        assert!(err.errors[0].starts_with("source 'docs'"));
        assert!(err.to_string().contains("1 error(s)"));
    }

    #[test]
    fn test_load_reads_sources() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("content/blog")).unwrap();
        std::fs::write(
            dir.path().join("content/blog/hello.md"),
            "---\ndate: 2024-01-01\n---\nHello",
        )
        .unwrap();
        let sources = vec![SourceConfig {
            name: "docs".to_string(),
            path: "content".into(),
            nav: None,
        }];

        let store = ContentStore::load(&sources, dir.path(), Locales::default(), now(), 100);
        assert_eq!(store.item_count(), 1);

        let nodes = store.query().unwrap();
        assert_eq!(nodes[0].slug(), "/blog/hello/");
        assert!(nodes[0].is_released());
    }
}
