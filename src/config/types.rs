//! Configuration type definitions.
//!
//! This module contains all the data structures used in sitepages configuration files.
//! These types are pure data - no I/O or complex logic.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

// =============================================================================
// Root config
// =============================================================================

/// Site configuration - everything a single build pass needs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RootConfig {
    pub site: SiteConfig,
    pub sources: Vec<SourceConfig>,
    #[serde(default)]
    pub locales: LocaleConfig,
    #[serde(default)]
    pub blog: BlogConfig,
    #[serde(default)]
    pub templates: TemplateConfig,
    #[serde(default)]
    pub query: QueryConfig,
}

// =============================================================================
// Site configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    pub name: String,
    pub url: Option<String>,
    #[serde(default = "default_output")]
    pub output: PathBuf,
    /// File name of the page manifest written inside `output`
    #[serde(default = "default_manifest")]
    pub manifest: String,
}

fn default_output() -> PathBuf {
    PathBuf::from("_site")
}

fn default_manifest() -> String {
    "pages.json".to_string()
}

// =============================================================================
// Source configuration
// =============================================================================

/// A content collection on disk.
///
/// The `name` is the collection name the slug rules key on: `docs`,
/// `docs-<locale>`, `packages`, or anything else (which produces no pages).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Collection name
    pub name: String,
    /// Content directory, relative to the config file
    pub path: PathBuf,
    /// Sidebar order used for previous/next links (auto-generated if omitted)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nav: Option<NavConfig>,
}

// =============================================================================
// Locale configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocaleConfig {
    /// Locale assigned to the plain `docs` collection; never path-prefixed
    #[serde(default = "default_locale")]
    pub default: String,
    /// Locales with a `docs-<code>` collection
    #[serde(default)]
    pub available: Vec<LocaleEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocaleEntry {
    pub code: String,
    /// Human readable name, e.g. "Deutsch"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

fn default_locale() -> String {
    "en".to_string()
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self {
            default: default_locale(),
            available: Vec::new(),
        }
    }
}

// =============================================================================
// Blog configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlogConfig {
    #[serde(default = "default_posts_per_page")]
    pub posts_per_page: usize,
}

fn default_posts_per_page() -> usize {
    8
}

impl Default for BlogConfig {
    fn default() -> Self {
        Self {
            posts_per_page: default_posts_per_page(),
        }
    }
}

// =============================================================================
// Template configuration
// =============================================================================

/// Template identifiers handed to the renderer with each page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateConfig {
    #[serde(default = "default_blog_list_template")]
    pub blog_list: String,
    #[serde(default = "default_blog_post_template")]
    pub blog_post: String,
    #[serde(default = "default_blog_tag_template")]
    pub blog_tag: String,
    #[serde(default = "default_doc_template")]
    pub doc: String,
    #[serde(default = "default_package_template")]
    pub package: String,
}

fn default_blog_list_template() -> String {
    "templates/blog-list.html".to_string()
}

fn default_blog_post_template() -> String {
    "templates/blog-post.html".to_string()
}

fn default_blog_tag_template() -> String {
    "templates/blog-tag.html".to_string()
}

fn default_doc_template() -> String {
    "templates/doc.html".to_string()
}

fn default_package_template() -> String {
    "templates/package.html".to_string()
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            blog_list: default_blog_list_template(),
            blog_post: default_blog_post_template(),
            blog_tag: default_blog_tag_template(),
            doc: default_doc_template(),
            package: default_package_template(),
        }
    }
}

// =============================================================================
// Query configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryConfig {
    /// Maximum number of items the content query returns
    #[serde(default = "default_query_limit")]
    pub limit: usize,
}

fn default_query_limit() -> usize {
    2000
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            limit: default_query_limit(),
        }
    }
}

// =============================================================================
// Navigation configuration
// =============================================================================

/// Sidebar structure for a source.
pub type NavConfig = Vec<NavItem>;

/// A navigation item in the sidebar.
///
/// Supports multiple formats in YAML:
/// ```yaml
/// nav:
///   - installation.md                    # Simple path, title from front matter or filename
///   - Getting Started: getting-started.md  # Explicit title
///   - section: Commands                  # Section with nested items
///     items:
///       - sync.md
///       - Search: search.md
///   - guides/                            # Auto-expand directory
///   - path: configuration.md             # Link with children
///     children:
///       - configuration/root.md
///       - configuration/sub.md
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NavItem {
    /// A section with nested items (no link, just a heading)
    /// Must come first so serde tries it before the map variant
    Section {
        section: String,
        items: Vec<NavItem>,
    },
    /// A link with nested children
    LinkWithChildren {
        path: String,
        #[serde(default)]
        title: Option<String>,
        children: Vec<NavItem>,
    },
    /// A titled page: { "Display Title": "path/to/file.md" }
    Titled(std::collections::HashMap<String, String>),
    /// A simple path: "file.md" or "dir/" for auto-expand
    Path(String),
}
