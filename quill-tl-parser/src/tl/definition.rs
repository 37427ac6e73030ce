use std::fmt;
use std::str::FromStr;

use crate::errors::{ParamParseError, ParseError};
use crate::tl::{Category, Parameter, ParameterType, Type};
use crate::utils::tl_id;

/// A single TL definition: a data constructor or a remote call.
///
/// ```text
/// channels.joinChannel#24b524c5 channel:InputChannel = Updates;
/// ```
/// parses to `namespace = ["channels"]`, `name = "joinChannel"`,
/// `id = 0x24b524c5`, one parameter and `ty = Updates`.
#[derive(Clone, Debug, PartialEq)]
pub struct Definition {
    /// Namespace parts; empty for the global namespace.
    pub namespace: Vec<String>,

    /// Name without namespace, e.g. `"joinChannel"`.
    pub name: String,

    /// Constructor id, from `#XXXXXXXX` or derived with [`crate::tl_id`].
    pub id: u32,

    /// Parameters in declaration order (including `flags:#` fields).
    pub params: Vec<Parameter>,

    /// Declared result type.
    pub ty: Type,

    /// Constructor or function.
    pub category: Category,
}

impl Definition {
    /// `namespace.name`, e.g. `"channels.joinChannel"`.
    pub fn full_name(&self) -> String {
        let mut s = String::new();
        for ns in &self.namespace {
            s.push_str(ns);
            s.push('.');
        }
        s.push_str(&self.name);
        s
    }

    /// First namespace component, or `""` for the global namespace.
    pub fn namespace_key(&self) -> &str {
        self.namespace.first().map(String::as_str).unwrap_or("")
    }

    /// Names declared with `{X:Type}`.
    pub fn generics(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for param in &self.params {
            if let ParameterType::Normal { ty, .. } = &param.ty {
                ty.walk(&mut |t| {
                    if t.generic_ref && !names.contains(&t.name.as_str()) {
                        names.push(&t.name);
                    }
                });
            }
        }
        names
    }

    /// Parameters a caller actually supplies (skips `#` bit fields).
    pub fn data_params(&self) -> impl Iterator<Item = &Parameter> {
        self.params.iter().filter(|p| p.ty != ParameterType::Flags)
    }
}

impl fmt::Display for Definition {
    /// Re-renders the schema line without the trailing `;`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{:08x}", self.full_name(), self.id)?;
        let mut generics = self.generics();
        generics.sort_unstable();
        for g in generics {
            write!(f, " {{{g}:Type}}")?;
        }
        for p in &self.params {
            write!(f, " {p}")?;
        }
        if self.ty.generic_ref {
            write!(f, " = {}", self.ty.name)
        } else {
            write!(f, " = {}", self.ty)
        }
    }
}

impl FromStr for Definition {
    type Err = ParseError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(ParseError::Empty);
        }

        let (lhs, rhs) = raw.split_once('=').ok_or(ParseError::MissingType)?;
        let rhs = rhs.trim().trim_end_matches(';').trim();
        if rhs.is_empty() {
            return Err(ParseError::MissingType);
        }
        let mut ty: Type = rhs.parse().map_err(|_| ParseError::MissingType)?;

        let mut tokens = lhs.split_whitespace();
        let head = tokens.next().ok_or(ParseError::MissingName)?;

        let (path, explicit_id) = match head.split_once('#') {
            Some((path, hex)) => (path, Some(hex)),
            None => (head, None),
        };
        let (namespace, name) = split_path(path)?;

        let id = match explicit_id {
            Some(hex) => u32::from_str_radix(hex, 16).map_err(ParseError::InvalidId)?,
            None => tl_id(raw),
        };

        let mut generics: Vec<String> = Vec::new();
        let mut bit_fields: Vec<String> = Vec::new();
        let mut params: Vec<Parameter> = Vec::new();

        for token in tokens {
            let param = match token.parse::<Parameter>() {
                Ok(p) => p,
                Err(ParamParseError::TypeDef { name }) => {
                    generics.push(name);
                    continue;
                }
                Err(e) => return Err(e.into()),
            };
            check_declared(&param, &generics, &bit_fields)?;
            if param.ty == ParameterType::Flags {
                bit_fields.push(param.name.clone());
            }
            params.push(param);
        }

        if generics.contains(&ty.name) {
            ty.generic_ref = true;
        }

        Ok(Self {
            namespace,
            name,
            id,
            params,
            ty,
            // The iterator knows which section we are in.
            category: Category::Types,
        })
    }
}

fn split_path(path: &str) -> Result<(Vec<String>, String), ParseError> {
    let mut segments: Vec<String> = path.split('.').map(str::to_owned).collect();
    let name = segments.pop().unwrap_or_default();
    if name.is_empty() || segments.iter().any(String::is_empty) {
        return Err(ParseError::MissingName);
    }
    Ok((segments, name))
}

/// Generic references and flag conditions must point at earlier declarations.
fn check_declared(param: &Parameter, generics: &[String], bit_fields: &[String]) -> Result<(), ParseError> {
    let ParameterType::Normal { ty, flag } = &param.ty else {
        return Ok(());
    };
    let undeclared_generic = ty.generic_ref && !generics.contains(&ty.name);
    let undeclared_flag = flag.as_ref().is_some_and(|f| !bit_fields.contains(&f.name));
    if undeclared_generic || undeclared_flag {
        return Err(ParseError::InvalidParam(ParamParseError::MissingDef));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_round_trips_through_parse() {
        let src = "initConnection#c1cd5ea9 {X:Type} flags:# api_id:int device_model:string \
                   proxy:flags.0?InputClientProxy query:!X = X";
        let def: Definition = src.parse().unwrap();
        let again: Definition = def.to_string().parse().unwrap();
        assert_eq!(def, again);
        assert!(def.ty.generic_ref);
        assert_eq!(def.generics(), vec!["X"]);
    }

    #[test]
    fn undeclared_flag_field_is_rejected() {
        let err = "a#1 x:flags.0?int = B".parse::<Definition>().unwrap_err();
        assert_eq!(err, ParseError::InvalidParam(ParamParseError::MissingDef));
    }

    #[test]
    fn empty_namespace_segment_is_rejected() {
        assert_eq!("a..b#1 = C".parse::<Definition>().unwrap_err(), ParseError::MissingName);
    }

    #[test]
    fn data_params_skip_bit_fields() {
        let def: Definition = "a#1 flags:# x:flags.0?true y:int = B".parse().unwrap();
        let names: Vec<_> = def.data_params().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["x", "y"]);
    }
}
