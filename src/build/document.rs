use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Deserializer, Serialize};
use serde_yaml::Value;

use crate::util::title_case;

// =============================================================================
// Content items
// =============================================================================

/// A source document as read from a collection, before any derived fields.
#[derive(Debug, Clone)]
pub struct ContentItem {
    /// Collection this document was read from (e.g. "docs", "docs-de", "packages")
    pub collection: String,
    /// Path relative to the collection root (e.g. "guides/setup.md")
    pub relative_path: PathBuf,
    /// Front matter metadata
    pub front_matter: FrontMatter,
}

impl ContentItem {
    pub fn new(
        collection: impl Into<String>,
        relative_path: impl Into<PathBuf>,
        front_matter: FrontMatter,
    ) -> Self {
        Self {
            collection: collection.into(),
            relative_path: relative_path.into(),
            front_matter,
        }
    }

    /// The relative path with `/` separators on every platform.
    pub fn relative_path_str(&self) -> String {
        self.relative_path.to_string_lossy().replace('\\', "/")
    }

    /// Get the document title, falling back to filename if not in front matter.
    pub fn title(&self) -> String {
        self.front_matter.title.clone().unwrap_or_else(|| {
            self.relative_path
                .file_stem()
                .and_then(|s| s.to_str())
                .map(title_case)
                .unwrap_or_else(|| "Untitled".to_string())
        })
    }
}

// =============================================================================
// Front matter
// =============================================================================

/// Front matter metadata parsed from the document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FrontMatter {
    pub title: Option<String>,
    /// Drafts are excluded from every page list
    #[serde(default)]
    pub draft: bool,
    /// Publish date, `YYYY-MM-DD` or RFC 3339
    pub date: Option<String>,
    /// Where the post was originally published
    #[serde(rename = "canonicalLink", alias = "canonical_link")]
    pub canonical_link: Option<String>,
    /// Display name of the original publisher
    #[serde(rename = "publishedAt", alias = "published_at")]
    pub published_at: Option<String>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub tags: Vec<String>,
    /// Additional arbitrary metadata
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

/// Accept `tags: rust` as well as `tags: [rust, 2024]`.
///
/// Numbers and booleans are kept as their text; nested values are dropped.
fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let tags = match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Sequence(values)) => values.iter().filter_map(tag_text).collect(),
        Some(value) => tag_text(&value).into_iter().collect(),
    };
    Ok(tags)
}

fn tag_text(value: &Value) -> Option<String> {
    match value {
        Value::String(tag) => Some(tag.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        other => {
            tracing::warn!(tag = ?other, "Ignoring non-scalar tag");
            None
        }
    }
}

/// Parse the front matter at the start of a markdown document.
///
/// Front matter is a YAML block delimited by `---` at the start of the file:
///
/// ```markdown
/// ---
/// title: My Post
/// date: 2024-03-01
/// tags: [release, rust]
/// ---
///
/// # Content starts here
/// ```
///
/// A missing block yields empty front matter. Malformed YAML is logged and
/// treated as empty front matter.
pub fn parse_front_matter(content: &str) -> FrontMatter {
    let Some(after_opening) = content.trim_start().strip_prefix("---") else {
        return FrontMatter::default();
    };
    let Some(closing_pos) = after_opening.find("\n---") else {
        return FrontMatter::default();
    };

    let yaml_content = after_opening[..closing_pos].trim_start_matches(['\r', '\n']);
    if yaml_content.trim().is_empty() {
        return FrontMatter::default();
    }

    serde_yaml::from_str(yaml_content).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to parse front matter");
        FrontMatter::default()
    })
}
