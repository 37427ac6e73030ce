//! Parser for Telegram's [Type Language] (TL) schema files.
//!
//! Converts raw `.tl` text into [`Definition`]s. The catalog crate
//! (`quill-catalog`) builds its method index on top of this.
//!
//! # Quick start
//!
//! ```rust
//! use quill_tl_parser::parse_schema;
//!
//! let src = "// LAYER 224\n---functions---\nhelp.getConfig#c4f9186b = Config;";
//! let schema = parse_schema(src);
//! assert_eq!(schema.layer, Some(224));
//! assert_eq!(schema.definitions[0].full_name(), "help.getConfig");
//! ```
//!
//! [Type Language]: https://core.telegram.org/mtproto/TL

#![deny(unsafe_code)]
#![warn(missing_docs)]

/// Parse error types for TL schema parsing.
pub mod errors;
pub mod tl;
mod iterator;
mod utils;

use errors::{LineError, ParseError};
use tl::Definition;

pub use utils::tl_id;

/// Parses a complete TL schema file, yielding [`Definition`]s one by one.
///
/// Lines starting with `//` are treated as comments and skipped.
/// The special `---functions---` and `---types---` section markers switch
/// the [`tl::Category`] applied to the following definitions.
///
/// Returns an iterator of `Result<Definition, ParseError>` so callers can
/// decide whether to skip or hard-fail on bad lines.
pub fn parse_tl_file(contents: &str) -> impl Iterator<Item = Result<Definition, ParseError>> + '_ {
    iterator::TlIterator::new(contents).map(|(_, result)| result)
}

/// A fully parsed schema: every definition that parsed cleanly, the lines
/// that didn't, and the API layer announced by the file.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Schema {
    /// Value of the highest `// LAYER N` marker, if any.
    pub layer: Option<i32>,
    /// Definitions in file order.
    pub definitions: Vec<Definition>,
    /// Definitions that failed to parse, tagged with their first line (1-based).
    pub errors: Vec<LineError>,
}

impl Schema {
    /// Iterates over RPC function definitions only.
    pub fn functions(&self) -> impl Iterator<Item = &Definition> {
        self.definitions.iter().filter(|d| d.category == tl::Category::Functions)
    }

    /// Iterates over data constructor definitions only.
    pub fn constructors(&self) -> impl Iterator<Item = &Definition> {
        self.definitions.iter().filter(|d| d.category == tl::Category::Types)
    }
}

/// Parses a whole schema, collecting failures instead of stopping at them.
pub fn parse_schema(contents: &str) -> Schema {
    let mut schema = Schema {
        layer: detect_layer(contents),
        ..Schema::default()
    };

    for (line, result) in iterator::TlIterator::new(contents) {
        match result {
            Ok(def) => schema.definitions.push(def),
            Err(error) => schema.errors.push(LineError { line, error }),
        }
    }

    schema
}

/// Scans comment lines for `// LAYER N` and returns the highest `N`.
///
/// Official schema dumps carry the marker on the first line; merged files
/// may carry several, in which case the newest layer wins.
pub fn detect_layer(contents: &str) -> Option<i32> {
    contents
        .lines()
        .filter_map(|line| line.trim().strip_prefix("//"))
        .filter_map(|rest| rest.trim().strip_prefix("LAYER"))
        .filter_map(|n| n.trim().parse::<i32>().ok())
        .max()
}
