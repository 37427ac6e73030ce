use std::fmt;

/// Which section of the schema a [`super::Definition`] came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    /// Data constructors (before `---functions---`).
    Types,
    /// Remote calls (after `---functions---`).
    Functions,
}

impl Category {
    /// Directory-style label: `"types"` or `"functions"`.
    pub fn label(self) -> &'static str {
        match self {
            Self::Types     => "types",
            Self::Functions => "functions",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
