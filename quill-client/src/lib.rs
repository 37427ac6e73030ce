//! # quill-client
//!
//! The session surface of a Telegram client: how a session identifies
//! itself and how the account's sessions are listed and terminated.
//!
//! ## Features
//! - Session parameters (`app_version`, `device_model`, `system_version`,
//!   `lang_code`) from direct arguments or a TOML settings file
//! - `invokeWithLayer(initConnection(..))` sent once per client
//! - `FLOOD_WAIT` auto-retry with configurable policy
//! - `gzip_packed` and `rpc_error` answers unwrapped for every call
//! - Remote session listing, single and bulk session reset, ping
//!
//! The byte transport is not part of this crate. A [`Sender`] delivers one
//! serialized request and yields the serialized answer; anything from an
//! MTProto connection to an in-memory test double fits behind it.
//!
//! ```rust,no_run
//! # async fn demo(sender: impl quill_client::Sender) -> Result<(), Box<dyn std::error::Error>> {
//! use quill_client::{Client, Config};
//!
//! let config = Config::builder()
//!     .api_id(12345)
//!     .api_hash("0123456789abcdef0123456789abcdef")
//!     .device_model("PC")
//!     .build();
//!
//! let client = Client::new(config, sender);
//! for session in client.get_authorizations().await? {
//!     println!("{session}");
//! }
//! # Ok(()) }
//! ```

#![deny(unsafe_code)]

pub mod config;
mod errors;
mod retry;
mod sessions;

pub use config::{Config, ConfigBuilder, FileConfig, SessionArgs, SessionParams, DEFAULT_LANG_CODE};
pub use errors::{ConfigError, InvocationError, RpcError};
pub use retry::{AutoSleep, NoRetries, RetryContext, RetryPolicy};
pub use sessions::SessionInfo;

use std::future::Future;
use std::io;
use std::num::NonZeroU32;
use std::ops::ControlFlow;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use quill_tl_types as tl;
use tl::{Cursor, Deserializable, Identifiable, RemoteCall, Serializable};
use tokio::sync::Mutex;
use tokio::time::{Instant, sleep};

// ─── Sender ───────────────────────────────────────────────────────────────────

/// The future returned by [`Sender::send`].
pub type SendFuture<'a> = Pin<Box<dyn Future<Output = Result<Vec<u8>, InvocationError>> + Send + 'a>>;

/// Delivers one serialized request and resolves to the serialized answer.
///
/// The answer is the body of the `rpc_result`: either the return value, an
/// `rpc_error` or a `gzip_packed` wrapping one of those.
pub trait Sender: Send + Sync + 'static {
    fn send<'a>(&'a self, body: Vec<u8>) -> SendFuture<'a>;
}

// ─── Client ───────────────────────────────────────────────────────────────────

struct ClientInner {
    api_id:       i32,
    api_hash:     String,
    params:       SessionParams,
    retry_policy: Arc<dyn RetryPolicy>,
    sender:       Box<dyn Sender>,
    initialized:  Mutex<bool>,
}

/// A Telegram client session. Cheap to clone; clones share the sender and
/// the one-time connection setup.
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

impl Client {
    pub fn new(config: Config, sender: impl Sender) -> Self {
        tracing::debug!(api_id = config.api_id, params = ?config.params, "creating client");
        Self {
            inner: Arc::new(ClientInner {
                api_id:       config.api_id,
                api_hash:     config.api_hash,
                params:       config.params,
                retry_policy: config.retry_policy,
                sender:       Box::new(sender),
                initialized:  Mutex::new(false),
            }),
        }
    }

    /// The identification strings this client announces, exactly as sent.
    pub fn session_params(&self) -> &SessionParams {
        &self.inner.params
    }

    pub fn api_id(&self) -> i32 {
        self.inner.api_id
    }

    pub fn api_hash(&self) -> &str {
        &self.inner.api_hash
    }

    // ── Connection setup ───────────────────────────────────────────────────

    /// Announces the session with `invokeWithLayer(initConnection(..))`.
    ///
    /// Only the first successful call reaches the server; concurrent callers
    /// wait for it. A failed attempt leaves the client uninitialized, so the
    /// next call tries again.
    pub async fn init_connection(&self) -> Result<(), InvocationError> {
        let mut initialized = self.inner.initialized.lock().await;
        if *initialized {
            return Ok(());
        }

        let p = &self.inner.params;
        let req = tl::functions::InvokeWithLayer {
            layer: tl::LAYER,
            query: tl::functions::InitConnection {
                api_id:           self.inner.api_id,
                device_model:     p.device_model.clone(),
                system_version:   p.system_version.clone(),
                app_version:      p.app_version.clone(),
                system_lang_code: p.lang_code.clone(),
                lang_pack:        String::new(),
                lang_code:        p.lang_code.clone(),
                proxy:            None,
                query:            tl::functions::help::GetConfig {},
            },
        };

        tracing::info!(layer = tl::LAYER, device_model = %p.device_model, "initializing connection");
        self.rpc_call_raw(&req).await?;
        *initialized = true;
        Ok(())
    }

    // ── Raw invoke ─────────────────────────────────────────────────────────

    /// Invoke any TL function directly, handling flood-wait retries.
    pub async fn invoke<R: RemoteCall>(&self, req: &R) -> Result<R::Return, InvocationError> {
        self.init_connection().await?;
        let body = self.rpc_call_raw(req).await?;
        let mut cur = Cursor::from_slice(&body);
        R::Return::deserialize(&mut cur).map_err(Into::into)
    }

    async fn rpc_call_raw<S: Serializable>(&self, req: &S) -> Result<Vec<u8>, InvocationError> {
        let body = req.to_bytes();
        let mut fail_count   = NonZeroU32::MIN;
        let mut slept_so_far = Duration::default();
        loop {
            match self.do_rpc_call(body.clone()).await {
                Ok(answer) => return Ok(answer),
                Err(e) => {
                    let ctx = RetryContext { fail_count, slept_so_far, error: e };
                    match self.inner.retry_policy.should_retry(&ctx) {
                        ControlFlow::Continue(delay) => {
                            sleep(delay).await;
                            slept_so_far += delay;
                            fail_count = fail_count.saturating_add(1);
                        }
                        ControlFlow::Break(()) => {
                            tracing::warn!(error = %ctx.error, attempts = fail_count.get(), "request failed");
                            return Err(ctx.error);
                        }
                    }
                }
            }
        }
    }

    async fn do_rpc_call(&self, body: Vec<u8>) -> Result<Vec<u8>, InvocationError> {
        let answer = self.inner.sender.send(body).await?;
        unwrap_answer(answer)
    }

    // ── Sessions ───────────────────────────────────────────────────────────

    /// Every session logged into the account, including this one.
    pub async fn get_authorizations(&self) -> Result<Vec<SessionInfo>, InvocationError> {
        let tl::enums::account::Authorizations::Authorizations(list) =
            self.invoke(&tl::functions::account::GetAuthorizations {}).await?;
        tracing::debug!(count = list.authorizations.len(), "fetched authorizations");
        Ok(list.authorizations.into_iter().map(SessionInfo::from).collect())
    }

    /// Terminates the session identified by `hash` (see [`SessionInfo::hash`]).
    pub async fn reset_authorization(&self, hash: i64) -> Result<bool, InvocationError> {
        self.invoke(&tl::functions::account::ResetAuthorization { hash }).await
    }

    /// Terminates every session except this one.
    pub async fn reset_authorizations(&self) -> Result<bool, InvocationError> {
        self.invoke(&tl::functions::auth::ResetAuthorizations {}).await
    }

    /// Round-trip time of a `ping`.
    pub async fn ping(&self) -> Result<Duration, InvocationError> {
        let ping_id = random_i64()?;
        let start = Instant::now();
        let tl::enums::Pong::Pong(pong) = self.invoke(&tl::functions::Ping { ping_id }).await?;
        if pong.ping_id != ping_id {
            return Err(InvocationError::Deserialize(format!(
                "pong echoes ping_id {} instead of {ping_id}",
                pong.ping_id
            )));
        }
        Ok(start.elapsed())
    }
}

// ─── Answer unwrapping ────────────────────────────────────────────────────────

fn unwrap_answer(body: Vec<u8>) -> Result<Vec<u8>, InvocationError> {
    if body.len() < 4 {
        return Err(InvocationError::Deserialize("body < 4 bytes".into()));
    }
    let mut cur = Cursor::from_slice(&body);
    match cur.peek_id()? {
        id if id == tl::types::RpcError::CONSTRUCTOR_ID => {
            cur.take(4)?;
            let e = tl::types::RpcError::deserialize(&mut cur)?;
            Err(RpcError::from_telegram(e.error_code, &e.error_message).into())
        }
        id if id == tl::types::GzipPacked::CONSTRUCTOR_ID => {
            cur.take(4)?;
            let packed = tl::types::GzipPacked::deserialize(&mut cur)?;
            unwrap_answer(gz_inflate(&packed.packed_data)?)
        }
        _ => Ok(body),
    }
}

// ─── Utilities ────────────────────────────────────────────────────────────────

fn random_i64() -> Result<i64, InvocationError> {
    let mut b = [0u8; 8];
    getrandom::getrandom(&mut b).map_err(|e| io::Error::other(e.to_string()))?;
    Ok(i64::from_le_bytes(b))
}

fn gz_inflate(data: &[u8]) -> Result<Vec<u8>, InvocationError> {
    use std::io::Read;
    let mut out = Vec::new();
    if flate2::read::GzDecoder::new(data).read_to_end(&mut out).is_ok() && !out.is_empty() {
        return Ok(out);
    }
    out.clear();
    flate2::read::ZlibDecoder::new(data)
        .read_to_end(&mut out)
        .map_err(|_| InvocationError::Deserialize("decompression failed".into()))?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_answer_is_rejected() {
        assert!(matches!(unwrap_answer(vec![1, 2]), Err(InvocationError::Deserialize(_))));
    }

    #[test]
    fn rpc_error_is_mapped() {
        let body = tl::enums::RpcError::from(tl::types::RpcError {
            error_code:    420,
            error_message: "FLOOD_WAIT_7".into(),
        })
        .to_bytes();
        match unwrap_answer(body) {
            Err(InvocationError::Rpc(e)) => assert_eq!(e.flood_wait_seconds(), Some(7)),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn plain_answer_passes_through() {
        let body = true.to_bytes();
        assert_eq!(unwrap_answer(body.clone()).unwrap(), body);
    }
}
