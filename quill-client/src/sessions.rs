//! Rows of the remote session list (`account.getAuthorizations`).

use std::fmt;

use chrono::{DateTime, Utc};
use quill_tl_types as tl;

/// One logged-in session of the account.
///
/// `device_model`, `system_version` and `app_version` are the strings the
/// session announced in `initConnection`, returned verbatim.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionInfo {
    /// Identifier to pass to [`crate::Client::reset_authorization`].
    pub hash:             i64,
    /// This is the session making the request.
    pub current:          bool,
    pub official_app:     bool,
    pub password_pending: bool,
    pub device_model:     String,
    pub platform:         String,
    pub system_version:   String,
    pub api_id:           i32,
    pub app_name:         String,
    pub app_version:      String,
    pub date_created:     DateTime<Utc>,
    pub date_active:      DateTime<Utc>,
    pub ip:               String,
    pub country:          String,
    pub region:           String,
}

fn timestamp(secs: i32) -> DateTime<Utc> {
    DateTime::from_timestamp(i64::from(secs), 0).unwrap_or_default()
}

impl From<tl::types::Authorization> for SessionInfo {
    fn from(a: tl::types::Authorization) -> Self {
        Self {
            hash:             a.hash,
            current:          a.current,
            official_app:     a.official_app,
            password_pending: a.password_pending,
            device_model:     a.device_model,
            platform:         a.platform,
            system_version:   a.system_version,
            api_id:           a.api_id,
            app_name:         a.app_name,
            app_version:      a.app_version,
            date_created:     timestamp(a.date_created),
            date_active:      timestamp(a.date_active),
            ip:               a.ip,
            country:          a.country,
            region:           a.region,
        }
    }
}

impl From<tl::enums::Authorization> for SessionInfo {
    fn from(a: tl::enums::Authorization) -> Self {
        let tl::enums::Authorization::Authorization(a) = a;
        a.into()
    }
}

impl fmt::Display for SessionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{} {} ({}, {}) on {} {}, last active {}",
            if self.current { "* " } else { "" },
            self.app_name,
            self.app_version,
            self.device_model,
            self.system_version,
            self.platform,
            self.ip,
            self.date_active.format("%Y-%m-%d %H:%M UTC"),
        )
    }
}
