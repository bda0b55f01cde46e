//! Little-endian primitives shared by request and response frames.
//!
//! ```text
//! u32 / i32   4 bytes, least-significant byte first
//! f64         8 bytes, IEEE-754 little-endian
//! name        UTF-16LE code units followed by a 0x0000 terminator
//! ```
//!
//! Integers are written byte by byte with `(v >> 8*i) & 0xFF`, so every
//! value round-trips regardless of magnitude.

use bytes::BufMut;

use crate::error::DecodeError;

/// Size of the length prefix that starts every frame.
pub const LENGTH_PREFIX_SIZE: usize = 4;

/// Size of the name terminator code unit.
pub const TERMINATOR_SIZE: usize = 2;

/// Append `v` as 4 little-endian bytes.
#[inline]
pub fn write_u32_le<B: BufMut>(buf: &mut B, v: u32) {
    for i in 0..4 {
        buf.put_u8(((v >> (8 * i)) & 0xFF) as u8);
    }
}

/// Append `v` as 4 little-endian two's-complement bytes.
#[inline]
pub fn write_i32_le<B: BufMut>(buf: &mut B, v: i32) {
    write_u32_le(buf, v as u32);
}

/// Append the IEEE-754 little-endian representation of `v`.
#[inline]
pub fn write_f64_le<B: BufMut>(buf: &mut B, v: f64) {
    let bits = v.to_bits();
    for i in 0..8 {
        buf.put_u8(((bits >> (8 * i)) & 0xFF) as u8);
    }
}

/// Append `s` as UTF-16LE code units plus a zero terminator.
///
/// For ASCII names each character becomes `(charcode, 0)`, for a total of
/// `2 * (len + 1)` bytes.
pub fn write_utf16_name<B: BufMut>(buf: &mut B, s: &str) {
    for unit in s.encode_utf16() {
        buf.put_u8((unit & 0xFF) as u8);
        buf.put_u8((unit >> 8) as u8);
    }
    buf.put_u8(0);
    buf.put_u8(0);
}

/// Number of bytes `write_utf16_name` emits for `s`.
#[inline]
pub fn utf16_name_len(s: &str) -> usize {
    TERMINATOR_SIZE * (s.encode_utf16().count() + 1)
}

/// Read a little-endian `u32` at `pos` without a cursor.
#[inline]
pub fn peek_u32_le(buf: &[u8], pos: usize) -> Result<u32, DecodeError> {
    FrameReader::at(buf, pos).read_u32_le()
}

/// Cursor over a borrowed frame buffer.
#[derive(Debug, Clone)]
pub struct FrameReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> FrameReader<'a> {
    /// Start reading at offset 0.
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Start reading at `pos`.
    pub fn at(buf: &'a [u8], pos: usize) -> Self {
        Self { buf, pos }
    }

    /// Current cursor position.
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes left after the cursor.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.buf.len().saturating_sub(self.pos)
    }

    fn take<const N: usize>(&mut self) -> Result<[u8; N], DecodeError> {
        if self.remaining() < N {
            return Err(DecodeError::TruncatedBuffer {
                needed: N,
                available: self.remaining(),
            });
        }
        let mut out = [0u8; N];
        out.copy_from_slice(&self.buf[self.pos..self.pos + N]);
        self.pos += N;
        Ok(out)
    }

    pub fn read_u32_le(&mut self) -> Result<u32, DecodeError> {
        Ok(u32::from_le_bytes(self.take::<4>()?))
    }

    pub fn read_i32_le(&mut self) -> Result<i32, DecodeError> {
        Ok(i32::from_le_bytes(self.take::<4>()?))
    }

    pub fn read_f64_le(&mut self) -> Result<f64, DecodeError> {
        Ok(f64::from_le_bytes(self.take::<8>()?))
    }

    /// Read code units up to and including the zero terminator.
    ///
    /// Running out of bytes before the terminator is `TruncatedBuffer`.
    /// Unpaired surrogates decode to U+FFFD.
    pub fn read_utf16_name(&mut self) -> Result<String, DecodeError> {
        let start = self.pos;
        let mut units = Vec::new();
        loop {
            let unit = match self.take::<2>() {
                Ok(b) => u16::from_le_bytes(b),
                Err(_) => {
                    let available = self.buf.len().saturating_sub(start);
                    self.pos = start;
                    return Err(DecodeError::TruncatedBuffer {
                        needed: available + TERMINATOR_SIZE,
                        available,
                    });
                }
            };
            if unit == 0 {
                break;
            }
            units.push(unit);
        }
        Ok(String::from_utf16_lossy(&units))
    }
}
