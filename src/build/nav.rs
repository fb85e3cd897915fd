//! Sidebar ordering and previous/next lookup for documentation pages.
//!
//! Each collection gets its own sidebar: the configured `nav` when the source
//! has one, otherwise one generated from the directory structure. The
//! sidebar is flattened depth-first and neighbours in that order become the
//! previous/next links of a page.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::Serialize;

use crate::config::{NavItem, SourceConfig};
use crate::util::title_case;

use super::annotate::{Node, mount_path};

/// Looks up the documents surrounding a docs page.
pub trait SiblingNav {
    /// Neighbours of the page with `slug` in `locale`.
    ///
    /// Translations share slugs, so the locale picks which sidebar the page
    /// belongs to.
    fn siblings(&self, slug: &str, locale: Option<&str>) -> Siblings;
}

/// The documents before and after a page in sidebar order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Siblings {
    pub previous: Option<NavLink>,
    pub next: Option<NavLink>,
}

/// A navigation section (group of links).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum NavSection {
    /// A section with a title and nested items
    Section {
        section: String,
        items: Vec<NavSection>,
    },
    /// A standalone link (no section header)
    Link(NavLink),
}

/// A single navigation link.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NavLink {
    pub title: String,
    pub url: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NavSection>,
}

/// Sidebar-ordered sibling lookup over every docs and package page.
#[derive(Debug, Default)]
pub struct SidebarNav {
    /// Keyed by mount path
    siblings: HashMap<String, Siblings>,
    default_locale: String,
}

impl SidebarNav {
    /// Build sidebars for all non-blog nodes, grouped by collection.
    ///
    /// Links point at page paths, so localized pages link to localized pages.
    pub fn build(nodes: &[Node], sources: &[SourceConfig], default_locale: &str) -> Self {
        let mut docs_by_collection: BTreeMap<&str, Vec<&Node>> = BTreeMap::new();
        for node in nodes.iter().filter(|node| !node.is_blog_post()) {
            docs_by_collection
                .entry(node.item.collection.as_str())
                .or_default()
                .push(node);
        }

        let mut siblings = HashMap::new();

        for (collection, docs) in docs_by_collection {
            let nav_config = sources
                .iter()
                .find(|source| source.name == collection)
                .and_then(|source| source.nav.as_ref());

            let sidebar = match nav_config {
                Some(nav_config) => convert_nav_config(nav_config, &docs, default_locale),
                None => auto_generate_nav(docs, default_locale),
            };

            let order = flatten(&sidebar);
            tracing::debug!(collection, pages = order.len(), "Built sidebar");

            for (i, link) in order.iter().enumerate() {
                let previous = i.checked_sub(1).map(|j| order[j].clone());
                let next = order.get(i + 1).cloned();
                siblings
                    .entry(link.url.clone())
                    .or_insert(Siblings { previous, next });
            }
        }

        Self {
            siblings,
            default_locale: default_locale.to_string(),
        }
    }
}

impl SiblingNav for SidebarNav {
    fn siblings(&self, slug: &str, locale: Option<&str>) -> Siblings {
        let path = mount_path(slug, locale, &self.default_locale);
        self.siblings.get(&path).cloned().unwrap_or_default()
    }
}

/// Flatten a sidebar depth-first into childless links, keeping the first
/// occurrence of each URL.
fn flatten(sections: &[NavSection]) -> Vec<NavLink> {
    fn walk(sections: &[NavSection], seen: &mut HashSet<String>, out: &mut Vec<NavLink>) {
        for section in sections {
            match section {
                NavSection::Section { items, .. } => walk(items, seen, out),
                NavSection::Link(link) => {
                    if seen.insert(link.url.clone()) {
                        out.push(NavLink {
                            title: link.title.clone(),
                            url: link.url.clone(),
                            children: vec![],
                        });
                    }
                    walk(&link.children, seen, out);
                }
            }
        }
    }

    let mut seen = HashSet::new();
    let mut out = Vec::new();
    walk(sections, &mut seen, &mut out);
    out
}

fn link_for(node: &Node, default_locale: &str) -> NavLink {
    NavLink {
        title: node.title(),
        url: node.page_path(default_locale),
        children: vec![],
    }
}

/// Convert a NavConfig to Vec<NavSection> using the collection's documents.
fn convert_nav_config(
    nav_config: &[NavItem],
    docs: &[&Node],
    default_locale: &str,
) -> Vec<NavSection> {
    let path_to_doc: HashMap<String, &Node> = docs
        .iter()
        .map(|node| (node.item.relative_path_str(), *node))
        .collect();

    nav_config
        .iter()
        .filter_map(|item| convert_nav_item(item, &path_to_doc, default_locale))
        .collect()
}

/// Convert a single NavItem to a NavSection (recursively handles children).
fn convert_nav_item(
    item: &NavItem,
    path_to_doc: &HashMap<String, &Node>,
    default_locale: &str,
) -> Option<NavSection> {
    match item {
        NavItem::Section { section, items } => {
            let nav_items: Vec<NavSection> = items
                .iter()
                .filter_map(|item| convert_nav_item(item, path_to_doc, default_locale))
                .collect();

            if nav_items.is_empty() {
                None
            } else {
                Some(NavSection::Section {
                    section: section.clone(),
                    items: nav_items,
                })
            }
        }
        NavItem::LinkWithChildren {
            path,
            title,
            children,
        } => {
            let doc = path_to_doc.get(path)?;
            let child_sections: Vec<NavSection> = children
                .iter()
                .filter_map(|child| convert_nav_item(child, path_to_doc, default_locale))
                .collect();

            Some(NavSection::Link(NavLink {
                title: title.clone().unwrap_or_else(|| doc.title()),
                url: doc.page_path(default_locale),
                children: child_sections,
            }))
        }
        NavItem::Titled(map) => {
            let (title, path) = map.iter().next()?;
            let doc = path_to_doc.get(path)?;
            Some(NavSection::Link(NavLink {
                title: title.clone(),
                url: doc.page_path(default_locale),
                children: vec![],
            }))
        }
        NavItem::Path(path) => {
            if let Some(dir) = path.strip_suffix('/') {
                // Directory: expand to everything underneath, auto-ordered
                let prefix = format!("{dir}/");
                let docs: Vec<&Node> = path_to_doc
                    .iter()
                    .filter(|(doc_path, _)| doc_path.starts_with(&prefix))
                    .map(|(_, node)| *node)
                    .collect();
                let mut items = auto_generate_nav(docs, default_locale);
                // The tree repeats the directory as its only section
                if let [NavSection::Section { items: inner, .. }] = items.as_mut_slice() {
                    items = std::mem::take(inner);
                }
                if items.is_empty() {
                    return None;
                }
                let section = dir.rsplit('/').next().unwrap_or(dir);
                Some(NavSection::Section {
                    section: title_case(section),
                    items,
                })
            } else {
                path_to_doc
                    .get(path)
                    .map(|doc| NavSection::Link(link_for(doc, default_locale)))
            }
        }
    }
}

/// A tree node for building hierarchical navigation.
#[derive(Default)]
struct NavTreeNode {
    /// Documents at this level: (is_index, link)
    links: Vec<(bool, NavLink)>,
    /// Subdirectories
    children: HashMap<String, NavTreeNode>,
}

impl NavTreeNode {
    /// Insert a document into the tree at the appropriate depth.
    fn insert(&mut self, path_parts: &[&str], is_index: bool, link: NavLink) {
        if path_parts.len() <= 1 {
            self.links.push((is_index, link));
        } else {
            self.children
                .entry(path_parts[0].to_string())
                .or_default()
                .insert(&path_parts[1..], is_index, link);
        }
    }

    /// Convert this tree node into a Vec<NavSection>.
    ///
    /// When a link's URL stem matches a child directory name, the directory
    /// contents become the link's `children` instead of a separate section.
    fn into_nav_sections(mut self) -> Vec<NavSection> {
        let mut result = Vec::new();

        // Index files first, then alphabetically
        self.links.sort_by(|a, b| match (a.0, b.0) {
            (true, false) => std::cmp::Ordering::Less,
            (false, true) => std::cmp::Ordering::Greater,
            _ => a.1.title.cmp(&b.1.title),
        });

        for (_, mut link) in self.links {
            let link_stem = link
                .url
                .trim_end_matches('/')
                .rsplit('/')
                .next()
                .map(str::to_lowercase);

            if let Some(stem) = link_stem
                && let Some(child) = self.children.remove(&stem)
            {
                link.children = child.into_nav_sections();
            }

            result.push(NavSection::Link(link));
        }

        let mut remaining_children: Vec<_> = self.children.into_iter().collect();
        remaining_children.sort_by(|a, b| a.0.cmp(&b.0));

        for (name, child) in remaining_children {
            let items = child.into_nav_sections();
            if !items.is_empty() {
                result.push(NavSection::Section {
                    section: title_case(&name),
                    items,
                });
            }
        }

        result
    }
}

/// Auto-generate navigation from a list of documents.
///
/// - Root-level documents appear as top-level links
/// - Documents in subdirectories are grouped into sections
/// - Index files are sorted first within their level
fn auto_generate_nav(mut docs: Vec<&Node>, default_locale: &str) -> Vec<NavSection> {
    docs.sort_by(|a, b| a.item.relative_path.cmp(&b.item.relative_path));

    let mut root = NavTreeNode::default();

    for doc in docs {
        let is_index = doc
            .item
            .relative_path
            .file_stem()
            .is_some_and(|s| s == "index");

        let path_str = doc.item.relative_path_str();
        let path_parts: Vec<&str> = path_str.trim_matches('/').split('/').collect();

        root.insert(&path_parts, is_index, link_for(doc, default_locale));
    }

    root.into_nav_sections()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::annotate::annotate;
    use crate::build::document::{ContentItem, FrontMatter};
    use crate::build::locale::Locales;
    use chrono::Utc;

    fn make_doc(collection: &str, path: &str) -> Node {
        let locales = Locales::new("en", ["de"]);
        annotate(
            ContentItem::new(collection, path, FrontMatter::default()),
            &locales,
            Utc::now(),
        )
        .unwrap()
    }

    fn urls(links: &[NavLink]) -> Vec<&str> {
        links.iter().map(|link| link.url.as_str()).collect()
    }

    #[test]
    fn test_auto_generate_nav_with_sections() {
        let docs = vec![
            make_doc("docs", "index.md"),
            make_doc("docs", "commands/build.md"),
            make_doc("docs", "commands/serve.md"),
        ];
        let nav = auto_generate_nav(docs.iter().collect(), "en");

        assert_eq!(nav.len(), 2);
        if let NavSection::Section { section, items } = &nav[1] {
            assert_eq!(section, "Commands");
            assert_eq!(items.len(), 2);
        } else {
            panic!("Expected Section");
        }
    }

    #[test]
    fn test_auto_generate_nav_merges_matching_directory() {
        let docs = vec![
            make_doc("docs", "commands.md"),
            make_doc("docs", "commands/build.md"),
        ];
        let nav = auto_generate_nav(docs.iter().collect(), "en");

        assert_eq!(nav.len(), 1);
        if let NavSection::Link(link) = &nav[0] {
            assert_eq!(link.url, "/commands/");
            assert_eq!(link.children.len(), 1);
        } else {
            panic!("Expected Link");
        }
    }

    #[test]
    fn test_flatten_is_depth_first() {
        let docs = vec![
            make_doc("docs", "index.md"),
            make_doc("docs", "commands.md"),
            make_doc("docs", "commands/build.md"),
            make_doc("docs", "guides/setup.md"),
        ];
        let order = flatten(&auto_generate_nav(docs.iter().collect(), "en"));

        assert_eq!(
            urls(&order),
            vec!["/index/", "/commands/", "/commands/build/", "/guides/setup/"]
        );
        assert!(order.iter().all(|link| link.children.is_empty()));
    }

    #[test]
    fn test_convert_nav_config() {
        let docs = vec![
            make_doc("docs", "configuration.md"),
            make_doc("docs", "configuration/root.md"),
            make_doc("docs", "guides/a.md"),
            make_doc("docs", "guides/b.md"),
            make_doc("docs", "intro.md"),
        ];
        let doc_refs: Vec<&Node> = docs.iter().collect();

        let mut titled = HashMap::new();
        titled.insert("Start Here".to_string(), "intro.md".to_string());
        let nav_config = vec![
            NavItem::Titled(titled),
            NavItem::LinkWithChildren {
                path: "configuration.md".to_string(),
                title: Some("Configuration".to_string()),
                children: vec![NavItem::Path("configuration/root.md".to_string())],
            },
            NavItem::Path("guides/".to_string()),
            NavItem::Path("missing.md".to_string()),
        ];

        let nav = convert_nav_config(&nav_config, &doc_refs, "en");
        assert_eq!(nav.len(), 3);

        let order = flatten(&nav);
        assert_eq!(order[0].title, "Start Here");
        assert_eq!(
            urls(&order),
            vec![
                "/intro/",
                "/configuration/",
                "/configuration/root/",
                "/guides/a/",
                "/guides/b/"
            ]
        );
    }

    #[test]
    fn test_sidebar_nav_siblings() {
        let nodes = vec![
            make_doc("docs", "a.md"),
            make_doc("docs", "b.md"),
            make_doc("docs", "c.md"),
            make_doc("docs", "blog/post.md"),
            make_doc("docs-de", "de/a.md"),
        ];
        let nav = SidebarNav::build(&nodes, &[], "en");

        let first = nav.siblings("/a/", Some("en"));
        assert_eq!(first.previous, None);
        assert_eq!(first.next.unwrap().url, "/b/");

        let middle = nav.siblings("/b/", Some("en"));
        assert_eq!(middle.previous.unwrap().url, "/a/");
        assert_eq!(middle.next.unwrap().url, "/c/");

        let last = nav.siblings("/c/", Some("en"));
        assert_eq!(last.next, None);

        // Blog posts are not part of any sidebar
        assert_eq!(nav.siblings("/blog/post/", Some("en")), Siblings::default());

        // The German page shares its slug but has its own sidebar
        assert_eq!(nav.siblings("/a/", Some("de")), Siblings::default());
        // Without a locale the default-locale sidebar answers
        assert_eq!(nav.siblings("/a/", None).next.unwrap().url, "/b/");
    }

    #[test]
    fn test_sidebar_nav_uses_configured_order() {
        let nodes = vec![make_doc("docs", "a.md"), make_doc("docs", "b.md")];
        let sources = vec![SourceConfig {
            name: "docs".to_string(),
            path: "docs".into(),
            nav: Some(vec![
                NavItem::Path("b.md".to_string()),
                NavItem::Path("a.md".to_string()),
            ]),
        }];
        let nav = SidebarNav::build(&nodes, &sources, "en");

        assert_eq!(nav.siblings("/b/", Some("en")).next.unwrap().url, "/a/");
        assert_eq!(nav.siblings("/a/", Some("en")).previous.unwrap().url, "/b/");
    }
}
