//! Derived fields for content items.
//!
//! Every item is annotated exactly once, in memory, right after it is read.
//! Items the slug rules reject are dropped here and never reach a page list.

use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Serialize;

use super::document::ContentItem;
use super::locale::Locales;
use super::paths::{anchor, derive_slug, is_blog_dir};
use crate::util::hostname;

/// Slugs containing this segment are blog posts.
pub const BLOG_SLUG_SEGMENT: &str = "/blog/";

/// Fields derived from an item's path, collection and front matter.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Fields {
    pub slug: String,
    pub locale: Option<String>,
    pub anchor: Option<String>,
    /// Title override; package READMEs are titled by their directory
    pub title: Option<String>,
    pub package: bool,
    /// Only set for items under a `blog` directory
    pub released: Option<bool>,
    pub published_at: Option<String>,
    /// Parsed front-matter `date`
    pub date: Option<DateTime<Utc>>,
}

/// A content item together with its derived fields.
#[derive(Debug, Clone)]
pub struct Node {
    pub item: ContentItem,
    pub fields: Fields,
}

impl Node {
    pub fn slug(&self) -> &str {
        &self.fields.slug
    }

    pub fn title(&self) -> String {
        self.fields
            .title
            .clone()
            .unwrap_or_else(|| self.item.title())
    }

    pub fn tags(&self) -> &[String] {
        &self.item.front_matter.tags
    }

    pub fn is_draft(&self) -> bool {
        self.item.front_matter.draft
    }

    /// Missing release status counts as unreleased.
    pub fn is_released(&self) -> bool {
        self.fields.released.unwrap_or(false)
    }

    pub fn is_blog_post(&self) -> bool {
        self.fields.slug.contains(BLOG_SLUG_SEGMENT)
    }

    /// Where the page is mounted: the slug, prefixed with `/<locale>` for
    /// every locale except the default one.
    pub fn page_path(&self, default_locale: &str) -> String {
        mount_path(&self.fields.slug, self.fields.locale.as_deref(), default_locale)
    }
}

/// `/<locale><slug>` outside the default locale, the bare slug otherwise.
pub fn mount_path(slug: &str, locale: Option<&str>, default_locale: &str) -> String {
    match locale {
        Some(locale) if locale != default_locale => format!("/{locale}{slug}"),
        _ => slug.to_string(),
    }
}

/// Annotate an item, or `None` if no slug can be derived for it.
pub fn annotate(item: ContentItem, locales: &Locales, now: DateTime<Utc>) -> Option<Node> {
    let relative_path = item.relative_path_str();
    let Some(info) = derive_slug(&relative_path, &item.collection, locales) else {
        tracing::debug!(
            collection = %item.collection,
            path = %relative_path,
            "No slug derived, skipping"
        );
        return None;
    };

    let front_matter = &item.front_matter;
    let date = front_matter.date.as_deref().and_then(|raw| {
        let parsed = parse_date(raw);
        if parsed.is_none() {
            tracing::warn!(path = %relative_path, date = %raw, "Ignoring unparseable date");
        }
        parsed
    });

    let (released, published_at) = if is_blog_dir(&info.dir) {
        let released = date.is_some_and(|date| date <= now);
        let published_at = front_matter.canonical_link.as_deref().and_then(|link| {
            front_matter
                .published_at
                .clone()
                .or_else(|| hostname(link))
        });
        (Some(released), published_at)
    } else {
        (None, None)
    };

    let fields = Fields {
        anchor: anchor(&info.slug).map(str::to_string),
        slug: info.slug,
        locale: info.locale,
        title: info.title,
        package: info.package,
        released,
        published_at,
        date,
    };

    Some(Node { item, fields })
}

/// Parse a front-matter date as UTC.
///
/// Accepts RFC 3339 (`2024-03-01T10:00:00+02:00`), a naive date-time
/// (`2024-03-01T10:00:00` or `2024-03-01 10:00:00`, taken as UTC) or a plain
/// date (`2024-03-01`, midnight UTC).
pub fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(date) = DateTime::parse_from_rfc3339(raw) {
        return Some(date.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(date) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(date.and_utc());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|date| date.and_utc())
}

/// Newest first, then by slug, descending. Undated items sort last.
pub fn newest_first(a: &Node, b: &Node) -> Ordering {
    b.fields
        .date
        .cmp(&a.fields.date)
        .then_with(|| b.fields.slug.cmp(&a.fields.slug))
}
