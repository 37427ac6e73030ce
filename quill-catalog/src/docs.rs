//! Markdown documentation for a [`Catalog`].
//!
//! Layout, relative to the docs root:
//!
//! ```text
//! index.md                              links to each category index
//! functions/index.md                    namespaces + top-level calls
//! functions/channels/index.md           one line per entry in `channels`
//! functions/channels/CreateChannel.md   one page per entry
//! functions/ReqPq.md                    top-level entries live beside the root index
//! types/...                             same shape for constructors
//! ```

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use quill_tl_parser::tl::{Category, ParameterType};

use crate::{Catalog, Entry, grouping};

const CATEGORIES: [Category; 2] = [Category::Functions, Category::Types];

/// A set of rendered pages keyed by `/`-separated path.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DocSet {
    pages: BTreeMap<String, String>,
}

/// `true` for `index.md` at any depth.
pub fn is_index(path: &str) -> bool {
    path == "index.md" || path.ends_with("/index.md")
}

impl DocSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Renders every entry page and the index pages that link them.
    pub fn render(catalog: &Catalog) -> Self {
        let mut docs = Self::new();
        let mut root = String::from("# API reference\n\n");
        if let Some(layer) = catalog.layer() {
            let _ = writeln!(root, "Schema layer {layer}.\n");
        }

        for category in CATEGORIES {
            let groups = grouping::group_by_ns(&catalog.entries, category);
            if groups.is_empty() {
                continue;
            }
            let label = category.label();
            let _ = writeln!(root, "- [{}]({label}/index.md)", title(category));

            let mut index = format!("# {}\n\n", title(category));
            let namespaces: Vec<&str> = groups.keys().copied().filter(|ns| !ns.is_empty()).collect();
            if !namespaces.is_empty() {
                index.push_str("## Namespaces\n\n");
                for ns in &namespaces {
                    let _ = writeln!(index, "- [{ns}]({ns}/index.md)");
                }
                index.push('\n');
            }

            for (ns, entries) in &groups {
                if ns.is_empty() {
                    index.push_str("## Top level\n\n");
                    push_links(&mut index, entries);
                } else {
                    let mut ns_index = format!("# {ns}\n\n");
                    push_links(&mut ns_index, entries);
                    docs.pages.insert(format!("{label}/{ns}/index.md"), ns_index);
                }

                for entry in entries {
                    if docs.pages.contains_key(&entry.page) {
                        log::warn!("{} renders to {}, which is already taken", entry.name, entry.page);
                        continue;
                    }
                    docs.pages.insert(entry.page.clone(), render_page(entry));
                }
            }

            docs.pages.insert(format!("{label}/index.md"), index);
        }

        docs.pages.insert("index.md".into(), root);
        log::debug!("rendered {} pages for {} entries", docs.pages.len(), catalog.len());
        docs
    }

    /// Writes every page below `dir`, creating directories as needed.
    pub fn write_to(&self, dir: impl AsRef<Path>) -> io::Result<()> {
        let dir = dir.as_ref();
        for (path, content) in &self.pages {
            let full = to_fs_path(dir, path);
            if let Some(parent) = full.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&full, content)?;
        }
        log::info!("wrote {} pages to {}", self.pages.len(), dir.display());
        Ok(())
    }

    /// Loads every `.md` file below `dir`.
    pub fn read_from(dir: impl AsRef<Path>) -> io::Result<Self> {
        let dir = dir.as_ref();
        let mut docs = Self::new();
        let mut pending = vec![(dir.to_path_buf(), String::new())];

        while let Some((current, prefix)) = pending.pop() {
            for item in fs::read_dir(&current)? {
                let item = item?;
                let name = item.file_name().to_string_lossy().into_owned();
                let rel = if prefix.is_empty() { name.clone() } else { format!("{prefix}/{name}") };
                if item.file_type()?.is_dir() {
                    pending.push((item.path(), rel));
                } else if name.ends_with(".md") {
                    docs.pages.insert(rel, fs::read_to_string(item.path())?);
                }
            }
        }

        log::debug!("read {} pages from {}", docs.pages.len(), dir.display());
        Ok(docs)
    }

    pub fn get(&self, path: &str) -> Option<&str> {
        self.pages.get(path).map(String::as_str)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.pages.contains_key(path)
    }

    /// Adds or replaces a page, returning the previous content.
    pub fn insert(&mut self, path: impl Into<String>, content: impl Into<String>) -> Option<String> {
        self.pages.insert(path.into(), content.into())
    }

    pub fn remove(&mut self, path: &str) -> Option<String> {
        self.pages.remove(path)
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// All pages in path order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pages.iter().map(|(p, c)| (p.as_str(), c.as_str()))
    }

    pub fn index_pages(&self) -> impl Iterator<Item = (&str, &str)> {
        self.iter().filter(|(p, _)| is_index(p))
    }

    pub fn entry_pages(&self) -> impl Iterator<Item = &str> {
        self.pages.keys().map(String::as_str).filter(|p| !is_index(p))
    }
}

fn title(category: Category) -> &'static str {
    match category {
        Category::Functions => "Functions",
        Category::Types     => "Types",
    }
}

fn file_name(page: &str) -> &str {
    page.rsplit('/').next().unwrap_or(page)
}

fn push_links(out: &mut String, entries: &[&Entry]) {
    for entry in entries {
        let file = file_name(&entry.page);
        let stem = file.trim_end_matches(".md");
        let _ = writeln!(out, "- [{stem}]({file}) `{}`", entry.name);
    }
    out.push('\n');
}

fn to_fs_path(root: &Path, page: &str) -> PathBuf {
    page.split('/').fold(root.to_path_buf(), |acc, part| acc.join(part))
}

fn render_page(entry: &Entry) -> String {
    let mut out = format!("# {}\n\n", entry.display);
    let _ = writeln!(out, "`{}` `#{:08x}`\n", entry.name, entry.id);
    let _ = writeln!(out, "```tl\n{}\n```\n", entry.signature());

    let params: Vec<_> = entry.definition.data_params().collect();
    out.push_str("## Parameters\n\n");
    if params.is_empty() {
        out.push_str("None.\n\n");
    } else {
        out.push_str("| Name | Type | Required |\n|------|------|----------|\n");
        for p in params {
            let ty = match &p.ty {
                ParameterType::Normal { ty, .. } if ty.generic_ref => ty.name.clone(),
                other => other.to_string(),
            };
            let required = if p.is_optional() { "no" } else { "yes" };
            let _ = writeln!(out, "| {} | `{ty}` | {required} |", p.name);
        }
        out.push('\n');
    }

    let ty = &entry.definition.ty;
    let ty = if ty.generic_ref { ty.name.clone() } else { ty.to_string() };
    match entry.category {
        Category::Functions => { let _ = writeln!(out, "## Returns\n\n`{ty}`"); }
        Category::Types     => { let _ = writeln!(out, "## Belongs to\n\n`{ty}`"); }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_detection() {
        assert!(is_index("index.md"));
        assert!(is_index("functions/channels/index.md"));
        assert!(!is_index("functions/channels/CreateChannel.md"));
        assert!(!is_index("functions/reindex.md"));
    }

    #[test]
    fn page_lists_parameters() {
        let def = "channels.editTitle#566decd0 channel:InputChannel title:string = Updates"
            .parse()
            .unwrap();
        let mut entry = Entry::from_definition(&def);
        entry.category = Category::Functions;
        let page = render_page(&entry);
        assert!(page.starts_with("# channels.EditTitle\n"));
        assert!(page.contains("| title | `string` | yes |"));
        assert!(page.contains("## Returns\n\n`Updates`"));
    }
}
