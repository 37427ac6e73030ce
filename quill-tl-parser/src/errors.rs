use std::fmt;
use std::num::ParseIntError;

/// Errors produced while parsing a single parameter token.
#[derive(Clone, Debug, PartialEq)]
pub enum ParamParseError {
    /// An empty string was encountered where a name/type was expected.
    Empty,
    /// A `{X:Type}` generic declaration. Not a failure: the definition parser
    /// uses it to learn which names are generic.
    TypeDef {
        /// The declared name (`"X"` in `{X:Type}`).
        name: String,
    },
    /// A generic or flag field was referenced before being declared.
    MissingDef,
    /// A conditional `field.N?Type` was malformed.
    InvalidFlag,
    /// A `<…>` argument was not closed.
    InvalidGeneric,
    /// A bare `name` with no `:type`, as in old-style `? = Int`.
    NotImplemented,
}

impl fmt::Display for ParamParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty           => write!(f, "empty token"),
            Self::TypeDef { name } => write!(f, "generic type declaration: {name}"),
            Self::MissingDef      => write!(f, "reference to an undeclared generic or flags field"),
            Self::InvalidFlag     => write!(f, "malformed conditional field"),
            Self::InvalidGeneric  => write!(f, "unclosed generic argument"),
            Self::NotImplemented  => write!(f, "parameter without `:type`"),
        }
    }
}

impl std::error::Error for ParamParseError {}

/// Errors produced while parsing a complete TL definition.
#[derive(Clone, Debug, PartialEq)]
pub enum ParseError {
    /// The input was blank.
    Empty,
    /// No `= Type` was found.
    MissingType,
    /// The name (before `=`) was missing or had empty namespace components.
    MissingName,
    /// The `#id` hex literal was unparseable.
    InvalidId(ParseIntError),
    /// A parameter was invalid.
    InvalidParam(ParamParseError),
    /// The definition uses syntax this parser does not handle.
    NotImplemented,
    /// The input ended before the definition's closing `;`.
    Unterminated,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty           => write!(f, "empty definition"),
            Self::MissingType     => write!(f, "missing `= Type`"),
            Self::MissingName     => write!(f, "missing or malformed name"),
            Self::InvalidId(e)    => write!(f, "invalid constructor id: {e}"),
            Self::InvalidParam(e) => write!(f, "invalid parameter: {e}"),
            Self::NotImplemented  => write!(f, "unsupported TL syntax"),
            Self::Unterminated    => write!(f, "definition not terminated by `;`"),
        }
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidId(e)    => Some(e),
            Self::InvalidParam(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ParamParseError> for ParseError {
    fn from(e: ParamParseError) -> Self {
        match e {
            ParamParseError::NotImplemented => Self::NotImplemented,
            other => Self::InvalidParam(other),
        }
    }
}

/// A [`ParseError`] together with the schema line the definition started on.
#[derive(Clone, Debug, PartialEq)]
pub struct LineError {
    /// 1-based line number.
    pub line: usize,
    /// What went wrong.
    pub error: ParseError,
}

impl fmt::Display for LineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.error)
    }
}

impl std::error::Error for LineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}
