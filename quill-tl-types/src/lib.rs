//! Telegram TL types for the session surface of a client.
//!
//! Only the calls a client needs to identify itself and inspect its own
//! sessions are modelled here; the full method index lives in
//! `quill-catalog`.
//!
//! | Module        | Contents                                                   |
//! |---------------|------------------------------------------------------------|
//! | [`types`]     | Concrete constructors (bare types) as `struct`s            |
//! | [`functions`] | RPC functions as `struct`s implementing [`RemoteCall`]     |
//! | [`enums`]     | Boxed types as `enum`s implementing [`Deserializable`]     |
//!
//! # Example
//!
//! ```rust
//! use quill_tl_types::{functions, Serializable, LAYER};
//!
//! let req = functions::InvokeWithLayer {
//!     layer: LAYER,
//!     query: functions::InitConnection {
//!         api_id:           12345,
//!         device_model:     "Rust x86_64".into(),
//!         system_version:   "Linux unix".into(),
//!         app_version:      "quill 0.2.0".into(),
//!         system_lang_code: "en".into(),
//!         lang_pack:        String::new(),
//!         lang_code:        "en".into(),
//!         proxy:            None,
//!         query:            functions::help::GetConfig {},
//!     },
//! };
//!
//! let bytes = req.to_bytes();
//! assert_eq!(&bytes[..4], &0xda9b0d0du32.to_le_bytes());
//! ```

#![deny(unsafe_code)]

pub mod deserialize;
pub mod enums;
pub mod functions;
pub mod serialize;
pub mod types;

pub use deserialize::{Cursor, Deserializable};
pub use serialize::Serializable;

/// The API layer announced in `invokeWithLayer`.
pub const LAYER: i32 = 224;

/// Constructor id of a boxed `Vector`.
pub const VECTOR_ID: u32 = 0x1cb5c415;

/// Opaque bytes passed through without interpretation.
///
/// Used as the result of calls whose response is not modelled here
/// (e.g. `help.getConfig`) and for pre-serialized payloads.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Blob(pub Vec<u8>);

impl From<Vec<u8>> for Blob {
    fn from(v: Vec<u8>) -> Self { Self(v) }
}

// ─── Core traits ──────────────────────────────────────────────────────────────

/// Every constructor and function has a unique 32-bit id.
pub trait Identifiable {
    /// The id as written in the TL schema.
    const CONSTRUCTOR_ID: u32;
}

/// A function that can be sent to Telegram.
///
/// `Return` is what the server answers with.
pub trait RemoteCall: Serializable {
    /// The deserialized response type.
    type Return: Deserializable;
}
