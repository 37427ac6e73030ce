use std::fmt;

/// The condition on an optional parameter, e.g. `flags.0` in `flags.0?string`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Flag {
    /// The `#` field holding the bit (usually `"flags"`).
    pub name: String,
    /// Bit index, 0-based.
    pub index: u32,
}

impl Flag {
    /// The bit mask this flag tests; zero for out-of-range indices.
    pub fn mask(&self) -> u32 {
        1u32.checked_shl(self.index).unwrap_or(0)
    }
}

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.name, self.index)
    }
}
