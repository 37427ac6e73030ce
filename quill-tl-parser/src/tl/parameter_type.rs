use std::fmt;
use std::str::FromStr;

use crate::errors::ParamParseError;
use crate::tl::{Flag, Type};

/// What a parameter holds.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ParameterType {
    /// A `#` bit field. Its value is derived from the optional parameters
    /// that reference it.
    Flags,

    /// A typed value, present only when `flag` is set (if any).
    Normal {
        /// The declared type.
        ty: Type,
        /// Condition guarding this parameter.
        flag: Option<Flag>,
    },
}

impl ParameterType {
    /// `true` for `flags.N?true`: a boolean encoded purely in the bit field.
    pub fn is_flag_bool(&self) -> bool {
        matches!(self, Self::Normal { ty, flag: Some(_) } if ty.name == "true")
    }
}

impl fmt::Display for ParameterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flags => f.write_str("#"),
            Self::Normal { ty, flag: Some(flag) } => write!(f, "{flag}?{ty}"),
            Self::Normal { ty, flag: None } => write!(f, "{ty}"),
        }
    }
}

impl FromStr for ParameterType {
    type Err = ParamParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "#" {
            return Ok(Self::Flags);
        }

        let Some((condition, ty)) = s.split_once('?') else {
            return Ok(Self::Normal { ty: s.parse()?, flag: None });
        };

        let (name, index) = condition.split_once('.').ok_or(ParamParseError::InvalidFlag)?;
        if name.is_empty() || ty.contains('?') {
            return Err(ParamParseError::InvalidFlag);
        }
        let index = index.parse::<u32>().map_err(|_| ParamParseError::InvalidFlag)?;

        Ok(Self::Normal {
            ty: ty.parse()?,
            flag: Some(Flag { name: name.to_owned(), index }),
        })
    }
}
