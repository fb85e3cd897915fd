//! Path and slug conversion utilities.
//!
//! This module handles conversions between:
//! - Source file paths (relative paths within a collection)
//! - Slugs (the absolute, trailing-slashed URL path a document is served at)
//! - Anchors (the last slug segment)

use std::path::{Path, PathBuf};

use super::locale::Locales;

/// Collection holding the default-locale docs.
pub const DOCS_COLLECTION: &str = "docs";
/// Collection holding package READMEs.
pub const PACKAGES_COLLECTION: &str = "packages";

const PACKAGE_README: &str = "README";
const INDEX_NAME: &str = "index";
const BLOG_SEGMENT: &str = "blog";

/// A relative path split into its directory and extension-less file name.
///
/// `guides/setup.md` => `{ dir: "guides", name: "setup" }`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathParts<'a> {
    pub dir: &'a str,
    pub name: &'a str,
}

impl<'a> PathParts<'a> {
    /// Split a `/`-separated relative path.
    pub fn parse(relative_path: &'a str) -> Self {
        let path = relative_path
            .trim_start_matches("./")
            .trim_matches('/');

        let (dir, file) = path.rsplit_once('/').unwrap_or(("", path));

        // Only the last extension is dropped; dotfiles keep their name
        let name = match file.rsplit_once('.') {
            Some((stem, _)) if !stem.is_empty() => stem,
            _ => file,
        };

        Self { dir, name }
    }
}

/// Convert path parts to a slug.
///
/// # Examples
/// ```ignore
/// path_to_slug({ dir: "guides", name: "setup" }) => "/guides/setup/"
/// path_to_slug({ dir: "a/b", name: "index" })    => "/a/b/"
/// path_to_slug({ dir: "", name: "index" })       => "/index/"
/// ```
pub fn path_to_slug(parts: &PathParts<'_>) -> String {
    if parts.dir.is_empty() {
        format!("/{}/", parts.name)
    } else if parts.name != INDEX_NAME {
        format!("/{}/{}/", parts.dir, parts.name)
    } else {
        format!("/{}/", parts.dir)
    }
}

/// The last non-empty segment of a slug, used for in-page anchors.
///
/// `"/a/b/"` => `Some("b")`
pub fn anchor(slug: &str) -> Option<&str> {
    slug.split('/').rev().find(|segment| !segment.is_empty())
}

/// Whether a resolved directory path contains the literal `blog` segment.
pub fn is_blog_dir(dir: &str) -> bool {
    dir.split('/').any(|segment| segment == BLOG_SEGMENT)
}

/// Everything the slug rules derive from a path and collection name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlugInfo {
    pub slug: String,
    pub locale: Option<String>,
    /// Title override (package READMEs are titled by their directory)
    pub title: Option<String>,
    pub package: bool,
    /// Directory the slug was derived from, after any locale prefix was stripped
    pub dir: String,
}

/// Derive a slug (and locale) from a collection-relative path.
///
/// Rules, in priority order:
/// 1. `docs` => slug from the path, default locale
/// 2. `docs-<code>` for a configured locale => first segment stripped, then as `docs`
/// 3. `packages` with a `README` file => `/packages/<dir>/`, titled `<dir>`
/// 4. anything else => `None`; the item gets no page
pub fn derive_slug(relative_path: &str, collection: &str, locales: &Locales) -> Option<SlugInfo> {
    if collection == DOCS_COLLECTION {
        let parts = PathParts::parse(relative_path);
        return Some(SlugInfo {
            slug: path_to_slug(&parts),
            locale: Some(locales.default_locale().to_string()),
            title: None,
            package: false,
            dir: parts.dir.to_string(),
        });
    }

    if let Some(code) = locales.collection_locale(collection) {
        // Translated sources keep their files one directory deeper
        let (_, remainder) = relative_path
            .trim_start_matches("./")
            .trim_start_matches('/')
            .split_once('/')?;
        let parts = PathParts::parse(remainder);
        if parts.name.is_empty() {
            return None;
        }
        return Some(SlugInfo {
            slug: path_to_slug(&parts),
            locale: Some(code.to_string()),
            title: None,
            package: false,
            dir: parts.dir.to_string(),
        });
    }

    if collection == PACKAGES_COLLECTION {
        let parts = PathParts::parse(relative_path);
        if parts.name != PACKAGE_README || parts.dir.is_empty() {
            return None;
        }
        return Some(SlugInfo {
            slug: format!("/{}/{}/", PACKAGES_COLLECTION, parts.dir),
            locale: None,
            title: Some(parts.dir.to_string()),
            package: true,
            dir: parts.dir.to_string(),
        });
    }

    None
}

/// Get the base path from a config file path (its parent directory).
pub fn base_path_from_config(config_path: &Path) -> PathBuf {
    config_path
        .parent()
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn locales() -> Locales {
        Locales::new("en", ["de"])
    }

    #[test]
    fn test_path_parts() {
        assert_eq!(
            PathParts::parse("guides/setup.md"),
            PathParts { dir: "guides", name: "setup" }
        );
        assert_eq!(
            PathParts::parse("index.md"),
            PathParts { dir: "", name: "index" }
        );
        assert_eq!(
            PathParts::parse("./a/b/v1.2.md"),
            PathParts { dir: "a/b", name: "v1.2" }
        );
        assert_eq!(
            PathParts::parse(".hidden"),
            PathParts { dir: "", name: ".hidden" }
        );
    }

    #[test]
    fn test_path_to_slug() {
        let slug = |dir, name| path_to_slug(&PathParts { dir, name });
        assert_eq!(slug("guides", "setup"), "/guides/setup/");
        assert_eq!(slug("a/b", "index"), "/a/b/");
        assert_eq!(slug("", "index"), "/index/");
        assert_eq!(slug("", "faq"), "/faq/");
    }

    #[test]
    fn test_anchor() {
        assert_eq!(anchor("/a/b/"), Some("b"));
        assert_eq!(anchor("/guides/"), Some("guides"));
        assert_eq!(anchor("/"), None);
        assert_eq!(anchor(""), None);
    }

    #[test]
    fn test_is_blog_dir() {
        assert!(is_blog_dir("blog"));
        assert!(is_blog_dir("news/blog/2024"));
        assert!(!is_blog_dir("blogging"));
        assert!(!is_blog_dir(""));
    }

    #[test]
    fn test_derive_slug_docs() {
        let info = derive_slug("guides/setup.md", "docs", &locales()).unwrap();
        assert_eq!(info.slug, "/guides/setup/");
        assert_eq!(info.locale.as_deref(), Some("en"));
        assert!(!info.package);
        assert_eq!(info.dir, "guides");
    }

    #[test]
    fn test_derive_slug_localized_docs() {
        let info = derive_slug("de/guides/index.md", "docs-de", &locales()).unwrap();
        assert_eq!(info.slug, "/guides/");
        assert_eq!(info.locale.as_deref(), Some("de"));
        assert_eq!(info.dir, "guides");
    }

    #[test]
    fn test_derive_slug_localized_docs_without_prefix_dir() {
        assert_eq!(derive_slug("setup.md", "docs-de", &locales()), None);
    }

    #[test]
    fn test_derive_slug_unknown_locale() {
        assert_eq!(derive_slug("fr/setup.md", "docs-fr", &locales()), None);
    }

    #[test]
    fn test_derive_slug_package_readme() {
        let info = derive_slug("foo/bar/README.md", "packages", &locales()).unwrap();
        assert_eq!(info.slug, "/packages/foo/bar/");
        assert_eq!(info.title.as_deref(), Some("foo/bar"));
        assert!(info.package);
        assert_eq!(info.locale, None);
    }

    #[test]
    fn test_derive_slug_package_non_readme() {
        assert_eq!(derive_slug("foo/CHANGELOG.md", "packages", &locales()), None);
        assert_eq!(derive_slug("foo/readme.md", "packages", &locales()), None);
        assert_eq!(derive_slug("README.md", "packages", &locales()), None);
    }

    #[test]
    fn test_derive_slug_other_collection() {
        assert_eq!(derive_slug("post.md", "blog", &locales()), None);
    }

    #[test]
    fn test_derive_slug_is_idempotent() {
        let first = derive_slug("blog/2024/launch.md", "docs", &locales()).unwrap();
        let second = derive_slug("blog/2024/launch.md", "docs", &locales()).unwrap();
        assert_eq!(first, second);
        assert_eq!(anchor(&first.slug), anchor(&second.slug));
        assert_eq!(anchor(&first.slug), Some("launch"));
    }

    #[test]
    fn test_base_path_from_config() {
        assert_eq!(
            base_path_from_config(Path::new("/project/sitepages.yaml")),
            PathBuf::from("/project")
        );
        assert_eq!(
            base_path_from_config(Path::new("sitepages.yaml")),
            PathBuf::from("")
        );
    }
}
