use std::fmt;
use std::str::FromStr;

use crate::errors::ParamParseError;
use crate::tl::ParameterType;

/// One `name:Type` token of a definition.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Parameter {
    /// Name as written in the schema.
    pub name: String,
    /// What the parameter holds.
    pub ty: ParameterType,
}

impl Parameter {
    /// `true` when the parameter may be omitted (it has a flag condition).
    pub fn is_optional(&self) -> bool {
        matches!(self.ty, ParameterType::Normal { flag: Some(_), .. })
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.ty)
    }
}

impl FromStr for Parameter {
    type Err = ParamParseError;

    /// Parses `flags:#`, `id:long`, `geo_point:flags.2?InputGeoPoint`, ...
    ///
    /// `{X:Type}` is reported as [`ParamParseError::TypeDef`] so the caller
    /// can record the generic name.
    fn from_str(token: &str) -> Result<Self, Self::Err> {
        if let Some(decl) = token.strip_prefix('{') {
            let name = decl.strip_suffix(":Type}").ok_or(ParamParseError::MissingDef)?;
            return Err(ParamParseError::TypeDef { name: name.to_owned() });
        }

        let (name, ty) = token.split_once(':').ok_or(ParamParseError::NotImplemented)?;
        if name.is_empty() || ty.is_empty() {
            return Err(ParamParseError::Empty);
        }

        Ok(Self { name: name.to_owned(), ty: ty.parse()? })
    }
}
