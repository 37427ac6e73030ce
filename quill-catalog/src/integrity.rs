//! Index/page consistency checks.
//!
//! Every entry linked from an index must resolve to exactly one page, and
//! every entry page must be reachable from some index.

use std::collections::BTreeMap;
use std::fmt;

use pulldown_cmark::{Event, Parser, Tag};

use crate::docs::{DocSet, is_index};
use crate::Catalog;

/// A single inconsistency.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Issue {
    /// The same page is linked more than once across the indexes.
    DuplicateEntry { target: String, indexes: Vec<String> },
    /// An index links a page that does not exist.
    MissingPage { index: String, target: String },
    /// An entry page no index links to.
    OrphanPage { page: String },
    /// Several TL names render to the same page.
    NameCollision { page: String, names: Vec<String> },
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateEntry { target, indexes } => {
                write!(f, "duplicate entry: {target} is linked {} times (from {})", indexes.len(), indexes.join(", "))
            }
            Self::MissingPage { index, target } => write!(f, "missing page: {index} links {target}"),
            Self::OrphanPage { page } => write!(f, "orphan page: {page} is not linked from any index"),
            Self::NameCollision { page, names } => {
                write!(f, "name collision: {} all render to {page}", names.join(", "))
            }
        }
    }
}

/// Outcome of a check.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Report {
    pub issues: Vec<Issue>,
    /// Distinct entry pages reached through the indexes.
    pub linked: usize,
}

impl Report {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_clean() {
            return write!(f, "ok: {} entries, each with exactly one page", self.linked);
        }
        for issue in &self.issues {
            writeln!(f, "{issue}")?;
        }
        write!(f, "{} issue(s)", self.issues.len())
    }
}

/// Checks the links of every index page in `docs` against its pages.
pub fn check(docs: &DocSet) -> Report {
    let mut links: BTreeMap<String, Vec<String>> = BTreeMap::new();
    let mut issues = Vec::new();

    for (index, content) in docs.index_pages() {
        for dest in links_in(content) {
            let Some(target) = resolve(index, &dest) else {
                issues.push(Issue::MissingPage { index: index.to_owned(), target: dest });
                continue;
            };
            if is_index(&target) {
                if !docs.contains(&target) {
                    issues.push(Issue::MissingPage { index: index.to_owned(), target });
                }
                continue;
            }
            links.entry(target).or_default().push(index.to_owned());
        }
    }

    for (target, indexes) in &links {
        if indexes.len() > 1 {
            issues.push(Issue::DuplicateEntry { target: target.clone(), indexes: indexes.clone() });
        }
        if !docs.contains(target) {
            let mut from = indexes.clone();
            from.dedup();
            for index in from {
                issues.push(Issue::MissingPage { index, target: target.clone() });
            }
        }
    }

    for page in docs.entry_pages() {
        if !links.contains_key(page) {
            issues.push(Issue::OrphanPage { page: page.to_owned() });
        }
    }

    let linked = links.keys().filter(|t| docs.contains(t)).count();
    if issues.is_empty() {
        log::debug!("{linked} entries checked, no issues");
    } else {
        log::warn!("{} integrity issue(s) found", issues.len());
    }
    Report { issues, linked }
}

/// Renders `catalog` and checks the result, adding any name collisions.
pub fn verify(catalog: &Catalog) -> Report {
    let mut report = check(&DocSet::render(catalog));
    let mut issues: Vec<Issue> = catalog
        .collisions()
        .into_iter()
        .map(|c| Issue::NameCollision { page: c.page, names: c.names })
        .collect();
    issues.append(&mut report.issues);
    report.issues = issues;
    report
}

/// Link destinations in a Markdown document, in order.
fn links_in(markdown: &str) -> Vec<String> {
    Parser::new(markdown)
        .filter_map(|event| match event {
            Event::Start(Tag::Link { dest_url, .. }) => Some(dest_url.into_string()),
            _ => None,
        })
        .filter(|dest| !dest.contains("://") && !dest.starts_with('#') && !dest.starts_with("mailto:"))
        .collect()
}

/// Resolves `dest` relative to the directory of `index`. `None` when the
/// link climbs above the docs root.
fn resolve(index: &str, dest: &str) -> Option<String> {
    let dest = dest.split('#').next().unwrap_or(dest);
    let mut parts: Vec<&str> = index.split('/').collect();
    parts.pop();

    for part in dest.split('/') {
        match part {
            "" | "." => {}
            ".." => {
                parts.pop()?;
            }
            other => parts.push(other),
        }
    }
    Some(parts.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_relative_links() {
        assert_eq!(resolve("functions/index.md", "channels/index.md").as_deref(), Some("functions/channels/index.md"));
        assert_eq!(resolve("functions/auth/index.md", "SignIn.md").as_deref(), Some("functions/auth/SignIn.md"));
        assert_eq!(resolve("functions/auth/index.md", "../Ping.md").as_deref(), Some("functions/Ping.md"));
        assert_eq!(resolve("index.md", "./types/index.md#top").as_deref(), Some("types/index.md"));
        assert_eq!(resolve("index.md", "../outside.md"), None);
    }

    #[test]
    fn extracts_only_local_links() {
        let md = "- [Ping](Ping.md)\n- [site](https://core.telegram.org)\n- [anchor](#x)\n";
        assert_eq!(links_in(md), vec!["Ping.md".to_owned()]);
    }
}
