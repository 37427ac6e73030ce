//! The [`Deserializable`] trait, [`Cursor`] buffer, and primitive impls.

use std::fmt;

use crate::{Blob, VECTOR_ID};

// ─── Error ───────────────────────────────────────────────────────────────────

/// Errors that can occur during deserialization.
#[derive(Clone, Debug, PartialEq)]
pub enum Error {
    /// Ran out of bytes before the value was fully read.
    UnexpectedEof,
    /// Read a constructor id that doesn't belong to the expected type.
    UnexpectedConstructor { id: u32 },
    /// A `string` field held invalid UTF-8.
    InvalidUtf8,
    /// A vector announced a negative length.
    NegativeLength(i32),
    /// An optional field this crate does not model was present.
    Unsupported(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedEof => write!(f, "unexpected end of buffer"),
            Self::UnexpectedConstructor { id } => write!(f, "unexpected constructor id: {id:#010x}"),
            Self::InvalidUtf8 => write!(f, "string is not valid UTF-8"),
            Self::NegativeLength(n) => write!(f, "negative vector length: {n}"),
            Self::Unsupported(what) => write!(f, "unsupported field present: {what}"),
        }
    }
}

impl std::error::Error for Error {}

/// Specialized `Result` for deserialization.
pub type Result<T> = std::result::Result<T, Error>;

// ─── Cursor ──────────────────────────────────────────────────────────────────

/// A cursor over an in-memory byte slice.
pub struct Cursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    /// Create a cursor positioned at the start of `buf`.
    pub fn from_slice(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Current byte offset.
    pub fn pos(&self) -> usize { self.pos }

    /// Remaining bytes.
    pub fn remaining(&self) -> usize { self.buf.len() - self.pos }

    /// Read a single byte.
    pub fn read_byte(&mut self) -> Result<u8> {
        let b = *self.buf.get(self.pos).ok_or(Error::UnexpectedEof)?;
        self.pos += 1;
        Ok(b)
    }

    /// Borrow the next `n` bytes and advance past them.
    pub fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        let end = self.pos.checked_add(n).ok_or(Error::UnexpectedEof)?;
        let slice = self.buf.get(self.pos..end).ok_or(Error::UnexpectedEof)?;
        self.pos = end;
        Ok(slice)
    }

    /// Read exactly `out.len()` bytes.
    pub fn read_exact(&mut self, out: &mut [u8]) -> Result<()> {
        out.copy_from_slice(self.take(out.len())?);
        Ok(())
    }

    /// Look at the next constructor id without consuming it.
    pub fn peek_id(&self) -> Result<u32> {
        let end = self.pos.checked_add(4).ok_or(Error::UnexpectedEof)?;
        let bytes = self.buf.get(self.pos..end).ok_or(Error::UnexpectedEof)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Consume all remaining bytes.
    pub fn rest(&mut self) -> &'a [u8] {
        let slice = &self.buf[self.pos..];
        self.pos = self.buf.len();
        slice
    }
}

/// Alias used by the hand-written impls: `crate::deserialize::Buffer<'_, '_>`.
pub type Buffer<'a, 'b> = &'a mut Cursor<'b>;

/// Reads a constructor id and checks it against `expected`.
pub fn expect_id(buf: Buffer, expected: u32) -> Result<()> {
    match u32::deserialize(buf)? {
        id if id == expected => Ok(()),
        id => Err(Error::UnexpectedConstructor { id }),
    }
}

// ─── Deserializable ──────────────────────────────────────────────────────────

/// Deserialize a value from TL binary format.
pub trait Deserializable: Sized {
    /// Read `Self` from `buf`, advancing its position.
    fn deserialize(buf: Buffer) -> Result<Self>;

    /// Convenience: deserialize from a byte slice.
    fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut cursor = Cursor::from_slice(bytes);
        Self::deserialize(&mut cursor)
    }
}

// ─── Primitives ───────────────────────────────────────────────────────────────

impl Deserializable for bool {
    fn deserialize(buf: Buffer) -> Result<Self> {
        match u32::deserialize(buf)? {
            0x997275b5 => Ok(true),
            0xbc799737 => Ok(false),
            id => Err(Error::UnexpectedConstructor { id }),
        }
    }
}

macro_rules! le_bytes {
    ($($t:ty),*) => {$(
        impl Deserializable for $t {
            fn deserialize(buf: Buffer) -> Result<Self> {
                let mut b = [0u8; std::mem::size_of::<$t>()];
                buf.read_exact(&mut b)?;
                Ok(<$t>::from_le_bytes(b))
            }
        }
    )*};
}

le_bytes!(i32, u32, i64, f64);

impl<const N: usize> Deserializable for [u8; N] {
    fn deserialize(buf: Buffer) -> Result<Self> {
        let mut b = [0u8; N];
        buf.read_exact(&mut b)?;
        Ok(b)
    }
}

// ─── Bytes / String ───────────────────────────────────────────────────────────

impl Deserializable for Vec<u8> {
    fn deserialize(buf: Buffer) -> Result<Self> {
        let first = buf.read_byte()?;
        let (len, header_len) = if first != 0xfe {
            (first as usize, 1)
        } else {
            let b = buf.take(3)?;
            (b[0] as usize | (b[1] as usize) << 8 | (b[2] as usize) << 16, 4)
        };

        let data = buf.take(len)?.to_vec();
        buf.take((4 - (header_len + len) % 4) % 4)?;
        Ok(data)
    }
}

impl Deserializable for String {
    fn deserialize(buf: Buffer) -> Result<Self> {
        String::from_utf8(Vec::<u8>::deserialize(buf)?).map_err(|_| Error::InvalidUtf8)
    }
}

// ─── Vectors ─────────────────────────────────────────────────────────────────

impl<T: Deserializable> Deserializable for Vec<T> {
    fn deserialize(buf: Buffer) -> Result<Self> {
        expect_id(buf, VECTOR_ID)?;
        let len = i32::deserialize(buf)?;
        if len < 0 {
            return Err(Error::NegativeLength(len));
        }
        (0..len).map(|_| T::deserialize(buf)).collect()
    }
}

/// Swallows the rest of the buffer.
impl Deserializable for Blob {
    fn deserialize(buf: Buffer) -> Result<Self> {
        Ok(Blob(buf.rest().to_vec()))
    }
}
