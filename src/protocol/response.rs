//! Response frames returned by the computation server.
//!
//! ```text
//! ┌──────────┬─────────────────────┬───────────────────────────┐
//! │ total_len│ tag (UTF-16LE + \0) │ { x: f64 LE, y: f64 LE }* │
//! │ u32 LE   │                     │ only when tag == "Curve"  │
//! └──────────┴─────────────────────┴───────────────────────────┘
//! ```
//!
//! Any tag other than `"Curve"` is a message for the user and carries no
//! points.

use super::primitive::{
    utf16_name_len, write_f64_le, write_u32_le, write_utf16_name, FrameReader, LENGTH_PREFIX_SIZE,
};
use crate::error::DecodeError;

/// Tag of a successful response carrying sampled points.
pub const CURVE_TAG: &str = "Curve";

/// Encoded size of one (x, y) pair.
pub const POINT_SIZE: usize = 16;

/// A decoded server response.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseFrame {
    tag: String,
    points: Vec<(f64, f64)>,
}

impl ResponseFrame {
    /// Curve response with points in arrival order.
    pub fn curve(points: Vec<(f64, f64)>) -> Self {
        Self {
            tag: CURVE_TAG.to_string(),
            points,
        }
    }

    /// Non-curve response carrying only a message.
    pub fn message(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            points: Vec::new(),
        }
    }

    #[inline]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    #[inline]
    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    pub fn into_points(self) -> Vec<(f64, f64)> {
        self.points
    }

    #[inline]
    pub fn is_curve(&self) -> bool {
        self.tag == CURVE_TAG
    }

    /// Decode one complete response frame.
    ///
    /// The length prefix must equal `buf.len()` exactly, and a curve's point
    /// section must be a whole number of 16-byte pairs.
    pub fn decode(buf: &[u8]) -> Result<Self, DecodeError> {
        let mut reader = FrameReader::new(buf);
        let declared = reader.read_u32_le()? as usize;
        if declared != buf.len() {
            return Err(DecodeError::LengthMismatch {
                declared,
                actual: buf.len(),
            });
        }

        let tag = reader.read_utf16_name()?;
        if tag != CURVE_TAG {
            // Bytes after a message tag carry no meaning and are ignored.
            return Ok(Self::message(tag));
        }

        let mut points = Vec::with_capacity(reader.remaining() / POINT_SIZE);
        while reader.remaining() >= POINT_SIZE {
            let x = reader.read_f64_le()?;
            let y = reader.read_f64_le()?;
            points.push((x, y));
        }

        match reader.remaining() {
            0 => Ok(Self { tag, points }),
            remaining => Err(DecodeError::TrailingGarbage { remaining }),
        }
    }

    /// Byte length of the encoded frame.
    pub fn encoded_len(&self) -> usize {
        let points = if self.is_curve() {
            self.points.len() * POINT_SIZE
        } else {
            0
        };
        LENGTH_PREFIX_SIZE + utf16_name_len(&self.tag) + points
    }

    /// Encode in the server's wire shape. Points are only written for a
    /// curve.
    pub fn encode(&self) -> Vec<u8> {
        let total_len = self.encoded_len();
        let mut buf = Vec::with_capacity(total_len);

        write_u32_le(&mut buf, total_len as u32);
        write_utf16_name(&mut buf, &self.tag);
        if self.is_curve() {
            for &(x, y) in &self.points {
                write_f64_le(&mut buf, x);
                write_f64_le(&mut buf, y);
            }
        }
        buf
    }
}
