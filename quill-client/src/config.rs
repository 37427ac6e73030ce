//! Client configuration and the session identification parameters.
//!
//! Every session is announced to Telegram with four strings that later show
//! up, read-only, in the session list of the account (Settings → Devices in
//! the official apps):
//!
//! | Field            | Shown as                 | Default                   |
//! |------------------|--------------------------|---------------------------|
//! | `app_version`    | application version      | `quill <crate version>`   |
//! | `device_model`   | device                   | `Rust <arch>`             |
//! | `system_version` | operating system         | `<Os> <family>`           |
//! | `lang_code`      | language of server texts | `en`                      |
//!
//! Values can come from direct arguments ([`SessionArgs`]) or from the
//! `[client]` section of a TOML file ([`FileConfig`]). For each field, a
//! non-empty argument wins, then a non-empty file value, then the default.
//!
//! ```toml
//! [client]
//! api_id = 12345
//! api_hash = "0123456789abcdef0123456789abcdef"
//! app_version = "1.2.3"
//! device_model = "PC"
//! system_version = "Linux"
//! lang_code = "it"
//! ```

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;
use crate::retry::{AutoSleep, RetryPolicy};

/// Language used when none is configured.
pub const DEFAULT_LANG_CODE: &str = "en";

// ─── SessionParams ────────────────────────────────────────────────────────────

/// The four strings sent in `initConnection`, after resolution.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionParams {
    pub app_version:    String,
    pub device_model:   String,
    pub system_version: String,
    pub lang_code:      String,
}

impl Default for SessionParams {
    fn default() -> Self {
        Self {
            app_version:    format!("quill {}", env!("CARGO_PKG_VERSION")),
            device_model:   format!("Rust {}", std::env::consts::ARCH),
            system_version: format!("{} {}", capitalize(std::env::consts::OS), std::env::consts::FAMILY),
            lang_code:      DEFAULT_LANG_CODE.to_owned(),
        }
    }
}

impl SessionParams {
    /// Resolves each field independently: argument, then file, then default.
    /// Empty strings count as unset on both sides.
    pub fn resolve(args: &SessionArgs, file: Option<&FileConfig>) -> Self {
        let defaults = Self::default();
        Self {
            app_version: choose(
                args.app_version.as_deref(),
                file_value(file, |f| &f.app_version),
                defaults.app_version,
            ),
            device_model: choose(
                args.device_model.as_deref(),
                file_value(file, |f| &f.device_model),
                defaults.device_model,
            ),
            system_version: choose(
                args.system_version.as_deref(),
                file_value(file, |f| &f.system_version),
                defaults.system_version,
            ),
            lang_code: choose(
                args.lang_code.as_deref(),
                file_value(file, |f| &f.lang_code),
                defaults.lang_code,
            ),
        }
    }
}

impl fmt::Display for SessionParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "app_version    = {:?}", self.app_version)?;
        writeln!(f, "device_model   = {:?}", self.device_model)?;
        writeln!(f, "system_version = {:?}", self.system_version)?;
        write!(f, "lang_code      = {:?}", self.lang_code)
    }
}

fn choose(arg: Option<&str>, file: Option<&str>, default: String) -> String {
    arg.filter(|s| !s.is_empty())
        .or(file.filter(|s| !s.is_empty()))
        .map(str::to_owned)
        .unwrap_or(default)
}

fn file_value<'a>(
    file: Option<&'a FileConfig>,
    pick: impl FnOnce(&'a FileConfig) -> &'a Option<String>,
) -> Option<&'a str> {
    file.and_then(|f| pick(f).as_deref())
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Session fields passed directly by the caller. `None` and `""` both mean
/// "not given".
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionArgs {
    pub app_version:    Option<String>,
    pub device_model:   Option<String>,
    pub system_version: Option<String>,
    pub lang_code:      Option<String>,
}

// ─── FileConfig ───────────────────────────────────────────────────────────────

/// The `[client]` section of a settings file. Other sections are ignored.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub api_id:         Option<i32>,
    pub api_hash:       Option<String>,
    pub app_version:    Option<String>,
    pub device_model:   Option<String>,
    pub system_version: Option<String>,
    pub lang_code:      Option<String>,
}

#[derive(Deserialize)]
struct Document {
    #[serde(default)]
    client: FileConfig,
}

impl FileConfig {
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let doc: Document = toml::from_str(text)?;
        Ok(doc.client)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml(&text)?;
        tracing::debug!(path = %path.display(), "loaded client config");
        Ok(config)
    }
}

// ─── Config ───────────────────────────────────────────────────────────────────

/// Everything a [`crate::Client`] needs.
#[derive(Clone)]
pub struct Config {
    pub api_id:       i32,
    pub api_hash:     String,
    pub params:       SessionParams,
    pub retry_policy: Arc<dyn RetryPolicy>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_id:       0,
            api_hash:     String::new(),
            params:       SessionParams::default(),
            retry_policy: Arc::new(AutoSleep::default()),
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_id", &self.api_id)
            .field("api_hash", &"<redacted>")
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

impl Config {
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Collects direct arguments and an optional settings file, then resolves
/// them into a [`Config`].
#[derive(Default)]
pub struct ConfigBuilder {
    api_id:       Option<i32>,
    api_hash:     Option<String>,
    session:      SessionArgs,
    file:         Option<FileConfig>,
    retry_policy: Option<Arc<dyn RetryPolicy>>,
}

impl ConfigBuilder {
    pub fn api_id(mut self, api_id: i32) -> Self {
        self.api_id = Some(api_id);
        self
    }

    pub fn api_hash(mut self, api_hash: impl Into<String>) -> Self {
        self.api_hash = Some(api_hash.into());
        self
    }

    pub fn app_version(mut self, value: impl Into<String>) -> Self {
        self.session.app_version = Some(value.into());
        self
    }

    pub fn device_model(mut self, value: impl Into<String>) -> Self {
        self.session.device_model = Some(value.into());
        self
    }

    pub fn system_version(mut self, value: impl Into<String>) -> Self {
        self.session.system_version = Some(value.into());
        self
    }

    pub fn lang_code(mut self, value: impl Into<String>) -> Self {
        self.session.lang_code = Some(value.into());
        self
    }

    /// Replaces all four session arguments at once.
    pub fn session_args(mut self, args: SessionArgs) -> Self {
        self.session = args;
        self
    }

    pub fn file(mut self, file: FileConfig) -> Self {
        self.file = Some(file);
        self
    }

    /// Reads the settings file at `path`.
    pub fn config_file(self, path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Ok(self.file(FileConfig::load(path)?))
    }

    pub fn retry_policy(mut self, policy: impl RetryPolicy) -> Self {
        self.retry_policy = Some(Arc::new(policy));
        self
    }

    pub fn build(self) -> Config {
        let file = self.file.as_ref();
        let params = SessionParams::resolve(&self.session, file);
        tracing::debug!(?params, "resolved session parameters");

        Config {
            api_id: self.api_id.or(file.and_then(|f| f.api_id)).unwrap_or(0),
            api_hash: self
                .api_hash
                .filter(|h| !h.is_empty())
                .or(file.and_then(|f| f.api_hash.clone()))
                .unwrap_or_default(),
            params,
            retry_policy: self.retry_policy.unwrap_or_else(|| Arc::new(AutoSleep::default())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_lang_code_is_en() {
        assert_eq!(SessionParams::default().lang_code, "en");
        assert_eq!(SessionParams::resolve(&SessionArgs::default(), None).lang_code, "en");
    }

    #[test]
    fn default_system_version_is_capitalized() {
        let v = SessionParams::default().system_version;
        assert!(v.chars().next().is_some_and(|c| !c.is_lowercase()), "{v}");
    }

    #[test]
    fn capitalize_handles_empty() {
        assert_eq!(capitalize(""), "");
        assert_eq!(capitalize("linux"), "Linux");
    }
}
