//! The Telegram RPC method catalog.
//!
//! A [`Catalog`] is the table of contents of a TL schema: every remote call
//! and constructor, grouped by namespace (`account`, `auth`, `channels`, ...)
//! with the top-level session calls (`req_pq`, `ping`, `invokeWithLayer`, ...)
//! in the unnamed namespace.
//!
//! From a catalog you can render a [`DocSet`], one Markdown page per entry
//! plus index pages, and verify it with [`check`]: every entry linked from
//! an index must have exactly one page.
//!
//! ```rust
//! use quill_catalog::{Catalog, DocSet, check};
//! use quill_tl_parser::tl::Category;
//!
//! let catalog = Catalog::bundled();
//! assert!(catalog.namespaces(Category::Functions).contains(&"channels"));
//!
//! let docs = DocSet::render(&catalog);
//! assert!(check(&docs).is_clean());
//! ```

#![deny(unsafe_code)]

pub mod docs;
pub mod integrity;
pub mod naming;
mod grouping;

use std::collections::BTreeMap;

use quill_tl_parser::tl::{Category, Definition};
use quill_tl_parser::{Schema, parse_schema};

pub use docs::DocSet;
pub use integrity::{Issue, Report, check, verify};

/// The schema compiled into the crate.
pub const BUNDLED_SCHEMA: &str = include_str!("../tl/api.tl");

// ─── Entry ────────────────────────────────────────────────────────────────────

/// One catalog row: a remote call or a constructor.
#[derive(Clone, Debug, PartialEq)]
pub struct Entry {
    /// TL name, e.g. `channels.createChannel`.
    pub name: String,
    /// Display name, e.g. `channels.CreateChannel`.
    pub display: String,
    /// Namespace, `""` for the top level.
    pub namespace: String,
    /// Page path relative to the docs root, always `/`-separated,
    /// e.g. `functions/channels/CreateChannel.md`.
    pub page: String,
    pub id: u32,
    pub category: Category,
    /// The parsed definition the entry was built from.
    pub definition: Definition,
}

impl Entry {
    pub fn from_definition(def: &Definition) -> Self {
        let namespace = def.namespace.join(".");
        let file = format!("{}.md", naming::to_pascal(&def.name));
        let page = if namespace.is_empty() {
            format!("{}/{file}", def.category.label())
        } else {
            format!("{}/{namespace}/{file}", def.category.label())
        };

        Self {
            name: def.full_name(),
            display: naming::display_name(&def.namespace, &def.name),
            namespace,
            page,
            id: def.id,
            category: def.category,
            definition: def.clone(),
        }
    }

    /// `channels.create_channel`, the name a Rust method would carry.
    pub fn snake_name(&self) -> String {
        let snake = naming::to_snake(&self.definition.name);
        if self.namespace.is_empty() { snake } else { format!("{}.{snake}", self.namespace) }
    }

    /// The schema line this entry was parsed from, with its `;`.
    pub fn signature(&self) -> String {
        format!("{};", self.definition)
    }
}

// ─── Catalog ──────────────────────────────────────────────────────────────────

/// Two or more TL names that render to the same page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Collision {
    pub page: String,
    pub names: Vec<String>,
}

/// Every entry of a schema, ordered by category, namespace and display name.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    layer: Option<i32>,
    entries: Vec<Entry>,
}

impl Catalog {
    pub fn from_definitions(defs: &[Definition]) -> Self {
        let mut entries: Vec<Entry> = defs.iter().map(Entry::from_definition).collect();
        entries.sort_by(|a, b| {
            (a.category, &a.namespace, &a.display, &a.name).cmp(&(b.category, &b.namespace, &b.display, &b.name))
        });
        Self { layer: None, entries }
    }

    /// Builds a catalog from a parsed schema. Lines that failed to parse are
    /// logged and left out.
    pub fn from_schema(schema: &Schema) -> Self {
        for err in &schema.errors {
            log::warn!("skipping schema definition at {err}");
        }
        Self {
            layer: schema.layer,
            ..Self::from_definitions(&schema.definitions)
        }
    }

    /// The catalog of [`BUNDLED_SCHEMA`].
    pub fn bundled() -> Self {
        Self::from_schema(&parse_schema(BUNDLED_SCHEMA))
    }

    /// The `// LAYER N` the schema announced, if any.
    pub fn layer(&self) -> Option<i32> {
        self.layer
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter()
    }

    /// Namespaces holding at least one entry of `category`, sorted, with the
    /// top level (`""`) first.
    pub fn namespaces(&self, category: Category) -> Vec<&str> {
        grouping::group_by_ns(&self.entries, category).into_keys().collect()
    }

    /// Entries of `category` in `namespace`, sorted by display name.
    pub fn entries(&self, category: Category, namespace: &str) -> Vec<&Entry> {
        grouping::group_by_ns(&self.entries, category)
            .remove(namespace)
            .unwrap_or_default()
    }

    /// Looks an entry up by TL name (`channels.createChannel`), display
    /// name (`channels.CreateChannel`) or, failing both, snake-case name
    /// (`channels.create_channel`). Functions are preferred when a
    /// constructor shares the name.
    pub fn get(&self, name: &str) -> Option<&Entry> {
        self.find(|e| e.name == name || e.display == name)
            .or_else(|| self.find(|e| e.snake_name() == name))
    }

    fn find(&self, pred: impl Fn(&Entry) -> bool) -> Option<&Entry> {
        let mut hits = self.entries.iter().filter(|e| pred(*e));
        let first = hits.next()?;
        if first.category == Category::Functions {
            return Some(first);
        }
        hits.find(|e| e.category == Category::Functions).or(Some(first))
    }

    pub fn get_by_id(&self, id: u32) -> Option<&Entry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Pages claimed by more than one distinct TL name.
    pub fn collisions(&self) -> Vec<Collision> {
        let mut by_page: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
        for entry in &self.entries {
            let names = by_page.entry(entry.page.as_str()).or_default();
            if !names.contains(&entry.name.as_str()) {
                names.push(&entry.name);
            }
        }
        by_page
            .into_iter()
            .filter(|(_, names)| names.len() > 1)
            .map(|(page, names)| Collision {
                page: page.to_owned(),
                names: names.into_iter().map(str::to_owned).collect(),
            })
            .collect()
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a Entry;
    type IntoIter = std::slice::Iter<'a, Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
