//! Groups catalog entries by namespace for index output.

use std::collections::BTreeMap;

use quill_tl_parser::tl::Category;

use crate::Entry;

/// Entries of `category` keyed by first-level namespace (`""` for the top
/// level, which sorts first). Each bucket is ordered by display name.
pub(crate) fn group_by_ns(entries: &[Entry], category: Category) -> BTreeMap<&str, Vec<&Entry>> {
    let mut map: BTreeMap<&str, Vec<&Entry>> = BTreeMap::new();

    for entry in entries.iter().filter(|e| e.category == category) {
        map.entry(entry.namespace.as_str()).or_default().push(entry);
    }

    for bucket in map.values_mut() {
        bucket.sort_by(|a, b| a.display.cmp(&b.display).then(a.name.cmp(&b.name)));
    }

    map
}
