//! Error types for quill-client.

use std::{fmt, io};

// ─── RpcError ─────────────────────────────────────────────────────────────────

/// An error returned by Telegram's servers in response to an RPC call.
///
/// A numeric suffix is stripped from the name and placed in [`RpcError::value`]:
/// `FLOOD_WAIT_30` → `RpcError { code: 420, name: "FLOOD_WAIT", value: Some(30) }`
#[derive(Clone, Debug, PartialEq)]
pub struct RpcError {
    /// HTTP-like status code.
    pub code: i32,
    /// Error name in SCREAMING_SNAKE_CASE without the numeric suffix.
    pub name: String,
    /// Numeric suffix, if any.
    pub value: Option<u32>,
}

impl fmt::Display for RpcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RPC {}: {}", self.code, self.name)?;
        if let Some(v) = self.value {
            write!(f, " (value: {v})")?;
        }
        Ok(())
    }
}

impl std::error::Error for RpcError {}

impl RpcError {
    /// Splits a raw message such as `"FLOOD_WAIT_30"` into name and value.
    pub fn from_telegram(code: i32, message: &str) -> Self {
        if let Some((name, suffix)) = message.rsplit_once('_') {
            if !suffix.is_empty() && suffix.bytes().all(|b| b.is_ascii_digit()) {
                if let Ok(v) = suffix.parse::<u32>() {
                    return Self { code, name: name.to_owned(), value: Some(v) };
                }
            }
        }
        Self { code, name: message.to_owned(), value: None }
    }

    /// Matches the name, with an optional `*` wildcard at either end.
    ///
    /// - `err.is("FLOOD_WAIT")`: exact match
    /// - `err.is("AUTH_KEY_*")`: prefix match
    /// - `err.is("*_INVALID")`: suffix match
    pub fn is(&self, pattern: &str) -> bool {
        if let Some(prefix) = pattern.strip_suffix('*') {
            self.name.starts_with(prefix)
        } else if let Some(suffix) = pattern.strip_prefix('*') {
            self.name.ends_with(suffix)
        } else {
            self.name == pattern
        }
    }

    /// Seconds to wait, if this is a `FLOOD_WAIT`.
    pub fn flood_wait_seconds(&self) -> Option<u64> {
        if self.code == 420 && self.name == "FLOOD_WAIT" {
            self.value.map(u64::from)
        } else {
            None
        }
    }
}

// ─── InvocationError ──────────────────────────────────────────────────────────

/// The error type returned from any `Client` method that talks to Telegram.
#[derive(Debug)]
pub enum InvocationError {
    /// Telegram rejected the request.
    Rpc(RpcError),
    /// The sender failed to deliver the request or read the answer.
    Io(io::Error),
    /// The answer could not be decoded.
    Deserialize(String),
    /// The request was dropped before an answer arrived.
    Dropped,
}

impl fmt::Display for InvocationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rpc(e)         => write!(f, "{e}"),
            Self::Io(e)          => write!(f, "I/O error: {e}"),
            Self::Deserialize(s) => write!(f, "deserialize error: {s}"),
            Self::Dropped        => write!(f, "request dropped"),
        }
    }
}

impl std::error::Error for InvocationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Rpc(e) => Some(e),
            Self::Io(e)  => Some(e),
            _            => None,
        }
    }
}

impl From<io::Error> for InvocationError {
    fn from(e: io::Error) -> Self { Self::Io(e) }
}

impl From<RpcError> for InvocationError {
    fn from(e: RpcError) -> Self { Self::Rpc(e) }
}

impl From<quill_tl_types::deserialize::Error> for InvocationError {
    fn from(e: quill_tl_types::deserialize::Error) -> Self { Self::Deserialize(e.to_string()) }
}

impl InvocationError {
    /// `true` if this is the named RPC error (supports `*` wildcards).
    pub fn is(&self, pattern: &str) -> bool {
        match self {
            Self::Rpc(e) => e.is(pattern),
            _            => false,
        }
    }

    /// If this is a `FLOOD_WAIT`, how many seconds to wait.
    pub fn flood_wait_seconds(&self) -> Option<u64> {
        match self {
            Self::Rpc(e) => e.flood_wait_seconds(),
            _            => None,
        }
    }
}

// ─── ConfigError ──────────────────────────────────────────────────────────────

/// Failure to load a settings file.
#[derive(Debug)]
pub enum ConfigError {
    /// The file could not be read.
    Io(io::Error),
    /// The file is not valid TOML or has a value of the wrong type.
    Toml(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e)   => write!(f, "cannot read config: {e}"),
            Self::Toml(e) => write!(f, "invalid config: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e)   => Some(e),
            Self::Toml(e) => Some(e),
        }
    }
}

impl From<io::Error> for ConfigError {
    fn from(e: io::Error) -> Self { Self::Io(e) }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self { Self::Toml(e) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flood_wait_value_is_split_off() {
        let e = RpcError::from_telegram(420, "FLOOD_WAIT_30");
        assert_eq!(e.name, "FLOOD_WAIT");
        assert_eq!(e.value, Some(30));
        assert_eq!(e.flood_wait_seconds(), Some(30));
    }

    #[test]
    fn plain_names_keep_underscores() {
        let e = RpcError::from_telegram(401, "AUTH_KEY_UNREGISTERED");
        assert_eq!(e.name, "AUTH_KEY_UNREGISTERED");
        assert_eq!(e.value, None);
        assert!(e.is("AUTH_KEY_*"));
        assert!(e.is("*_UNREGISTERED"));
        assert!(!e.is("FLOOD_WAIT"));
    }

    #[test]
    fn flood_wait_needs_code_420() {
        assert_eq!(RpcError::from_telegram(400, "FLOOD_WAIT_5").flood_wait_seconds(), None);
    }
}
