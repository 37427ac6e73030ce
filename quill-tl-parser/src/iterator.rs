//! Line-driven iterator behind [`crate::parse_tl_file`] and [`crate::parse_schema`].

use std::str::FromStr;

use crate::errors::ParseError;
use crate::tl::{Category, Definition};

pub(crate) struct TlIterator<'a> {
    lines: std::iter::Enumerate<std::str::Lines<'a>>,
    /// Flips on `---functions---` / `---types---`.
    category: Category,
    /// Text of a definition that has not reached its `;` yet.
    pending: String,
    /// 1-based line where `pending` started.
    pending_line: usize,
}

impl<'a> TlIterator<'a> {
    pub(crate) fn new(src: &'a str) -> Self {
        Self {
            lines: src.lines().enumerate(),
            category: Category::Types,
            pending: String::new(),
            pending_line: 0,
        }
    }

    fn switch_section(&mut self, line: &str) -> bool {
        let next = match line {
            "---functions---" => Category::Functions,
            "---types---"     => Category::Types,
            _ => return false,
        };
        self.category = next;
        true
    }
}

impl Iterator for TlIterator<'_> {
    /// `(first line of the definition, parse result)`
    type Item = (usize, Result<Definition, ParseError>);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let Some((idx, line)) = self.lines.next() else {
                if self.pending.is_empty() {
                    return None;
                }
                self.pending.clear();
                return Some((self.pending_line, Err(ParseError::Unterminated)));
            };
            let trimmed = line.trim();

            if trimmed.is_empty() || trimmed.starts_with("//") || self.switch_section(trimmed) {
                continue;
            }

            if self.pending.is_empty() {
                self.pending_line = idx + 1;
            } else {
                self.pending.push(' ');
            }
            self.pending.push_str(trimmed);

            if !trimmed.ends_with(';') {
                continue;
            }

            let raw = std::mem::take(&mut self.pending);
            let raw = raw.trim_end_matches(';').trim();
            if raw.is_empty() {
                continue;
            }

            let category = self.category;
            let result = Definition::from_str(raw).map(|mut def| {
                def.category = category;
                def
            });
            return Some((self.pending_line, result));
        }
    }
}
