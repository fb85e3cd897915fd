//! Page list construction.
//!
//! Turns the queried nodes into the pages to render: the paginated blog
//! index, one page per post, one page per tag group and one page per
//! document or package.

use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::TemplateConfig;
use crate::util::kebab_case;

use super::annotate::{Node, newest_first};
use super::nav::{NavLink, SiblingNav};

/// Mount point of the first blog index page.
pub const BLOG_INDEX_PATH: &str = "/blog";
/// Mount point prefix of tag pages.
pub const BLOG_TAGS_PATH: &str = "/blog/tags";

/// A page to register: where it lives, how it renders, what it receives.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageSpec {
    pub path: String,
    pub template: String,
    pub context: PageContext,
}

/// Template context, one variant per page kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PageContext {
    BlogList(BlogListContext),
    BlogPost(BlogPostContext),
    BlogTag(BlogTagContext),
    Doc(DocContext),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogListContext {
    pub limit: usize,
    pub skip: usize,
    pub num_pages: usize,
    /// 1-based
    pub current_page: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPostContext {
    pub slug: String,
    /// The next older post
    pub prev: Option<PostLink>,
    /// The next newer post, if it is already released
    pub next: Option<PostLink>,
}

/// A reference to a neighbouring post.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostLink {
    pub slug: String,
    pub title: String,
    pub date: Option<DateTime<Utc>>,
}

impl From<&Node> for PostLink {
    fn from(node: &Node) -> Self {
        Self {
            slug: node.slug().to_string(),
            title: node.title(),
            date: node.fields.date,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogTagContext {
    /// Normalized key the page is mounted under
    pub tag: String,
    /// Every original spelling that maps to `tag`
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocContext {
    pub slug: String,
    pub locale: Option<String>,
    pub package: bool,
    pub previous: Option<NavLink>,
    pub next: Option<NavLink>,
}

/// Settings that shape the page list.
#[derive(Debug, Clone, Copy)]
pub struct PageSettings<'a> {
    pub posts_per_page: usize,
    pub default_locale: &'a str,
    pub templates: &'a TemplateConfig,
}

/// Build every page for a set of annotated nodes.
pub fn build_pages(
    nodes: &[Node],
    nav: &dyn SiblingNav,
    settings: &PageSettings<'_>,
) -> Vec<PageSpec> {
    let (posts, docs): (Vec<&Node>, Vec<&Node>) =
        nodes.iter().partition(|node| node.is_blog_post());
    let posts = ordered_posts(posts);

    let templates = settings.templates;
    let mut pages = blog_list_pages(&posts, settings.posts_per_page, &templates.blog_list);
    pages.extend(blog_post_pages(&posts, &templates.blog_post));
    pages.extend(tag_pages(&posts, &templates.blog_tag));
    pages.extend(doc_pages(&docs, nav, settings));

    tracing::debug!(
        posts = posts.len(),
        docs = docs.len(),
        pages = pages.len(),
        "Built page list"
    );

    pages
}

/// Non-draft posts, newest first then by slug.
pub fn ordered_posts<'a>(posts: impl IntoIterator<Item = &'a Node>) -> Vec<&'a Node> {
    let mut posts: Vec<&Node> = posts.into_iter().filter(|post| !post.is_draft()).collect();
    posts.sort_by(|a, b| newest_first(a, b));
    posts
}

/// Split released posts into index pages of `per_page`: `/blog`,
/// `/blog/page/2`, ...
///
/// Future posts are left out so no trailing page skips past the last
/// listed post.
pub fn blog_list_pages(posts: &[&Node], per_page: usize, template: &str) -> Vec<PageSpec> {
    let per_page = per_page.max(1);
    let released = posts.iter().filter(|post| post.is_released()).count();
    let num_pages = released.div_ceil(per_page);

    (1..=num_pages)
        .map(|current_page| PageSpec {
            path: if current_page == 1 {
                BLOG_INDEX_PATH.to_string()
            } else {
                format!("{BLOG_INDEX_PATH}/page/{current_page}")
            },
            template: template.to_string(),
            context: PageContext::BlogList(BlogListContext {
                limit: per_page,
                skip: (current_page - 1) * per_page,
                num_pages,
                current_page,
            }),
        })
        .collect()
}

/// One page per post, linked to its older and newer neighbours.
///
/// `posts` must be newest first. The newer neighbour is only linked once it
/// is released, so a post never links forward to a future one.
pub fn blog_post_pages(posts: &[&Node], template: &str) -> Vec<PageSpec> {
    posts
        .iter()
        .enumerate()
        .map(|(i, post)| {
            let prev = posts.get(i + 1).map(|older| PostLink::from(*older));
            let next = i
                .checked_sub(1)
                .and_then(|j| posts.get(j))
                .filter(|newer| newer.is_released())
                .map(|newer| PostLink::from(*newer));

            PageSpec {
                path: post.slug().to_string(),
                template: template.to_string(),
                context: PageContext::BlogPost(BlogPostContext {
                    slug: post.slug().to_string(),
                    prev,
                    next,
                }),
            }
        })
        .collect()
}

/// Group the tags of released posts by normalized key.
///
/// Each distinct spelling is kept once, in first-seen order.
pub fn group_tags(posts: &[&Node]) -> BTreeMap<String, Vec<String>> {
    let mut seen = HashSet::new();
    let mut groups: BTreeMap<String, Vec<String>> = BTreeMap::new();

    for tag in posts
        .iter()
        .filter(|post| post.is_released() && !post.is_draft())
        .flat_map(|post| post.tags())
    {
        if !seen.insert(tag.as_str()) {
            continue;
        }

        let key = tag_key(tag);
        if key.is_empty() {
            tracing::warn!(tag = %tag, "Tag has no usable characters, skipping");
            continue;
        }
        groups.entry(key).or_default().push(tag.clone());
    }

    groups
}

/// Lowercase, then kebab-case: "Case Study" => "case-study".
pub fn tag_key(tag: &str) -> String {
    kebab_case(&tag.to_lowercase())
}

/// One page per tag group at `/blog/tags/<key>/`.
pub fn tag_pages(posts: &[&Node], template: &str) -> Vec<PageSpec> {
    group_tags(posts)
        .into_iter()
        .map(|(tag, tags)| PageSpec {
            path: format!("{BLOG_TAGS_PATH}/{tag}/"),
            template: template.to_string(),
            context: PageContext::BlogTag(BlogTagContext { tag, tags }),
        })
        .collect()
}

/// One page per document or package, with sidebar neighbours.
pub fn doc_pages(
    docs: &[&Node],
    nav: &dyn SiblingNav,
    settings: &PageSettings<'_>,
) -> Vec<PageSpec> {
    docs.iter()
        .map(|doc| {
            let path = doc.page_path(settings.default_locale);
            let siblings = nav.siblings(doc.slug(), doc.fields.locale.as_deref());
            let template = if doc.fields.package {
                &settings.templates.package
            } else {
                &settings.templates.doc
            };

            PageSpec {
                template: template.clone(),
                context: PageContext::Doc(DocContext {
                    slug: doc.slug().to_string(),
                    locale: doc.fields.locale.clone(),
                    package: doc.fields.package,
                    previous: siblings.previous,
                    next: siblings.next,
                }),
                path,
            }
        })
        .collect()
}
