//! The [`Serializable`] trait and its implementations for primitive TL types.
//!
//! Encoding follows the [MTProto Binary Serialization] spec: little-endian
//! integers, length-prefixed 4-byte aligned strings, boxed vectors.
//!
//! [MTProto Binary Serialization]: https://core.telegram.org/mtproto/serialize

use crate::{Blob, VECTOR_ID};

/// Serialize `self` into TL binary format.
pub trait Serializable {
    /// Appends the serialized form of `self` to `buf`.
    fn serialize(&self, buf: &mut impl Extend<u8>);

    /// Convenience: allocate a fresh `Vec<u8>` and serialize into it.
    fn to_bytes(&self) -> Vec<u8> {
        let mut v = Vec::new();
        self.serialize(&mut v);
        v
    }
}

// ─── bool ────────────────────────────────────────────────────────────────────

/// `boolTrue#997275b5` / `boolFalse#bc799737`
impl Serializable for bool {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        let id: u32 = if *self { 0x997275b5 } else { 0xbc799737 };
        id.serialize(buf);
    }
}

// ─── integers ────────────────────────────────────────────────────────────────

macro_rules! le_bytes {
    ($($t:ty),*) => {$(
        impl Serializable for $t {
            fn serialize(&self, buf: &mut impl Extend<u8>) {
                buf.extend(self.to_le_bytes());
            }
        }
    )*};
}

le_bytes!(i32, u32, i64, f64);

impl<const N: usize> Serializable for [u8; N] {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        buf.extend(self.iter().copied());
    }
}

// ─── strings / bytes ─────────────────────────────────────────────────────────

/// TL `bytes`/`string`:
///
/// * `len ≤ 253`: `[len][data][padding]`
/// * `len ≥ 254`: `[0xfe][len as 3 LE bytes][data][padding]`
///
/// Padding brings the whole item to a multiple of 4 bytes.
impl Serializable for [u8] {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        let len = self.len();
        let header_len = if len <= 253 {
            buf.extend([len as u8]);
            1
        } else {
            buf.extend([0xfe, len as u8, (len >> 8) as u8, (len >> 16) as u8]);
            4
        };
        buf.extend(self.iter().copied());
        let padding = (4 - (header_len + len) % 4) % 4;
        buf.extend(std::iter::repeat_n(0u8, padding));
    }
}

impl Serializable for Vec<u8> {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        self.as_slice().serialize(buf);
    }
}

impl Serializable for str {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        self.as_bytes().serialize(buf);
    }
}

impl Serializable for String {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        self.as_str().serialize(buf);
    }
}

// ─── vectors ─────────────────────────────────────────────────────────────────

/// Boxed `Vector<T>`: constructor id, count, items.
impl<T: Serializable> Serializable for Vec<T> {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        VECTOR_ID.serialize(buf);
        (self.len() as i32).serialize(buf);
        for item in self {
            item.serialize(buf);
        }
    }
}

// ─── Option / Blob ───────────────────────────────────────────────────────────

/// Absence is recorded in the flags word; `None` writes nothing.
impl<T: Serializable> Serializable for Option<T> {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        if let Some(v) = self {
            v.serialize(buf);
        }
    }
}

/// Written as-is; the bytes are expected to already be TL-encoded.
impl Serializable for Blob {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        buf.extend(self.0.iter().copied());
    }
}

impl<T: Serializable + ?Sized> Serializable for &T {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        (**self).serialize(buf);
    }
}
