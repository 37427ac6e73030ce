use std::fmt;
use std::str::FromStr;

use crate::errors::ParamParseError;

/// A type expression, e.g. `Vector<InputUser>`, `messages.StickerSet` or `!X`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Type {
    /// Namespace components, e.g. `["messages"]` for `messages.StickerSet`.
    pub namespace: Vec<String>,

    /// The bare type name, e.g. `"Vector"`.
    pub name: String,

    /// `true` when the name starts lowercase (bare type such as `int`).
    pub bare: bool,

    /// `true` for a generic reference written `!X`.
    pub generic_ref: bool,

    /// The `<…>` argument, e.g. `long` in `Vector<long>`.
    pub generic_arg: Option<Box<Type>>,
}

impl Type {
    /// Namespace and name joined with dots, without generic arguments.
    pub fn full_name(&self) -> String {
        let mut s = self.namespace.join(".");
        if !s.is_empty() {
            s.push('.');
        }
        s.push_str(&self.name);
        s
    }

    /// `true` for the primitives every schema takes for granted.
    pub fn is_builtin(&self) -> bool {
        self.namespace.is_empty()
            && matches!(
                self.name.as_str(),
                "int" | "long" | "double" | "string" | "bytes" | "int128" | "int256"
                    | "true" | "Bool" | "Vector" | "vector" | "#"
            )
    }

    /// Calls `visit` for this type and every nested generic argument.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Type)) {
        visit(self);
        if let Some(arg) = &self.generic_arg {
            arg.walk(visit);
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.generic_ref {
            f.write_str("!")?;
        }
        f.write_str(&self.full_name())?;
        if let Some(arg) = &self.generic_arg {
            write!(f, "<{arg}>")?;
        }
        Ok(())
    }
}

impl FromStr for Type {
    type Err = ParamParseError;

    /// ```
    /// use quill_tl_parser::tl::Type;
    /// let ty: Type = "Vector<messages.StickerSet>".parse().unwrap();
    /// assert_eq!(ty.generic_arg.unwrap().full_name(), "messages.StickerSet");
    /// ```
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let (raw, generic_ref) = match raw.strip_prefix('!') {
            Some(rest) => (rest, true),
            None => (raw, false),
        };

        let (path, generic_arg) = match raw.split_once('<') {
            Some((path, rest)) => {
                let inner = rest.strip_suffix('>').ok_or(ParamParseError::InvalidGeneric)?;
                (path, Some(Box::new(inner.parse::<Type>()?)))
            }
            None => (raw, None),
        };

        let mut segments: Vec<String> = path.split('.').map(str::to_owned).collect();
        let name = segments.pop().unwrap_or_default();
        if name.is_empty() || segments.iter().any(String::is_empty) {
            return Err(ParamParseError::Empty);
        }

        let bare = name.starts_with(|c: char| c.is_ascii_lowercase());

        Ok(Self {
            namespace: segments,
            name,
            bare,
            generic_ref,
            generic_arg,
        })
    }
}
