//! Request frames sent to the computation server.
//!
//! ```text
//! ┌──────────┬──────────────────────┬─────────────┬───────────┬────────────┬─────────────┐
//! │ total_len│ name (UTF-16LE + \0) │ range_start │ range_end │ num_points │ order       │
//! │ u32 LE   │ 2 * (len + 1) bytes  │ f64 LE      │ f64 LE    │ i32 LE     │ i32 LE      │
//! │          │                      │             │           │            │ Bessel only │
//! └──────────┴──────────────────────┴─────────────┴───────────┴────────────┴─────────────┘
//! ```
//!
//! Frame lengths follow from the name and payload layout; nothing is
//! hard-coded per command.

use super::function::FunctionKind;
use super::primitive::{
    utf16_name_len, write_f64_le, write_i32_le, write_u32_le, write_utf16_name, FrameReader,
    LENGTH_PREFIX_SIZE,
};
use crate::error::{CurvewireError, DecodeError, Result};

/// Command name of the goodbye frame sent before disconnecting.
pub const STOP_COMMAND: &str = "Stop";

/// Encoded size of the range_start + range_end + num_points fields.
const BASE_PAYLOAD_SIZE: usize = 8 + 8 + 4;

/// Encoded size of the Bessel order field.
const ORDER_SIZE: usize = 4;

/// A single compute request.
///
/// `order` is present exactly when `kind` is [`FunctionKind::BesselFunction`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RequestFrame {
    kind: FunctionKind,
    range_start: f64,
    range_end: f64,
    num_points: i32,
    order: Option<i32>,
}

impl RequestFrame {
    /// Build a request, checking the order-iff-Bessel invariant.
    ///
    /// `num_points <= 0` is accepted; whether to send it is the caller's call.
    pub fn new(
        kind: FunctionKind,
        range_start: f64,
        range_end: f64,
        num_points: i32,
        order: Option<i32>,
    ) -> Result<Self> {
        match (kind.requires_order(), order.is_some()) {
            (true, false) => {
                return Err(CurvewireError::InvalidParameters(format!(
                    "{} requires an order",
                    kind
                )))
            }
            (false, true) => {
                return Err(CurvewireError::InvalidParameters(format!(
                    "{} does not take an order",
                    kind
                )))
            }
            _ => {}
        }

        Ok(Self {
            kind,
            range_start,
            range_end,
            num_points,
            order,
        })
    }

    /// Bessel function request of the given order.
    pub fn bessel(range_start: f64, range_end: f64, num_points: i32, order: i32) -> Self {
        Self {
            kind: FunctionKind::BesselFunction,
            range_start,
            range_end,
            num_points,
            order: Some(order),
        }
    }

    #[inline]
    pub fn kind(&self) -> FunctionKind {
        self.kind
    }

    #[inline]
    pub fn range_start(&self) -> f64 {
        self.range_start
    }

    #[inline]
    pub fn range_end(&self) -> f64 {
        self.range_end
    }

    #[inline]
    pub fn num_points(&self) -> i32 {
        self.num_points
    }

    #[inline]
    pub fn order(&self) -> Option<i32> {
        self.order
    }

    /// Byte length of the encoded frame, including the length prefix.
    pub fn encoded_len(&self) -> usize {
        let payload_len = BASE_PAYLOAD_SIZE + self.order.map_or(0, |_| ORDER_SIZE);
        LENGTH_PREFIX_SIZE + utf16_name_len(self.kind.wire_name()) + payload_len
    }

    /// Encode into a self-describing frame.
    pub fn encode(&self) -> Vec<u8> {
        let total_len = self.encoded_len();
        let mut buf = Vec::with_capacity(total_len);

        write_u32_le(&mut buf, total_len as u32);
        write_utf16_name(&mut buf, self.kind.wire_name());
        write_f64_le(&mut buf, self.range_start);
        write_f64_le(&mut buf, self.range_end);
        write_i32_le(&mut buf, self.num_points);
        if let Some(order) = self.order {
            write_i32_le(&mut buf, order);
        }

        debug_assert_eq!(buf.len(), total_len);
        buf
    }

    /// Decode a request frame. Fails on a Stop frame; use [`Command::decode`].
    pub fn decode(buf: &[u8]) -> std::result::Result<Self, DecodeError> {
        match Command::decode(buf)? {
            Command::Compute(request) => Ok(request),
            Command::Stop => Err(DecodeError::UnknownCommand(STOP_COMMAND.to_string())),
        }
    }
}

/// Any frame a client may send.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Compute(RequestFrame),
    Stop,
}

impl Command {
    pub fn encode(&self) -> Vec<u8> {
        match self {
            Command::Compute(request) => request.encode(),
            Command::Stop => encode_stop(),
        }
    }

    /// Decode one complete client frame.
    pub fn decode(buf: &[u8]) -> std::result::Result<Self, DecodeError> {
        let mut reader = FrameReader::new(buf);
        let declared = reader.read_u32_le()? as usize;
        if declared != buf.len() {
            return Err(DecodeError::LengthMismatch {
                declared,
                actual: buf.len(),
            });
        }

        let name = reader.read_utf16_name()?;
        if name == STOP_COMMAND {
            return finish(&reader, Command::Stop);
        }
        let kind = FunctionKind::from_wire_name(&name).ok_or(DecodeError::UnknownCommand(name))?;

        let range_start = reader.read_f64_le()?;
        let range_end = reader.read_f64_le()?;
        let num_points = reader.read_i32_le()?;
        let order = if kind.requires_order() {
            Some(reader.read_i32_le()?)
        } else {
            None
        };

        finish(
            &reader,
            Command::Compute(RequestFrame {
                kind,
                range_start,
                range_end,
                num_points,
                order,
            }),
        )
    }
}

fn finish(reader: &FrameReader<'_>, command: Command) -> std::result::Result<Command, DecodeError> {
    match reader.remaining() {
        0 => Ok(command),
        remaining => Err(DecodeError::TrailingGarbage { remaining }),
    }
}

/// Encode the 14-byte Stop frame.
pub fn encode_stop() -> Vec<u8> {
    let total_len = LENGTH_PREFIX_SIZE + utf16_name_len(STOP_COMMAND);
    let mut buf = Vec::with_capacity(total_len);
    write_u32_le(&mut buf, total_len as u32);
    write_utf16_name(&mut buf, STOP_COMMAND);
    buf
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::primitive::peek_u32_le;

    fn request(kind: FunctionKind) -> RequestFrame {
        let order = kind.requires_order().then_some(2);
        RequestFrame::new(kind, -1.5, 10.0, 200, order).unwrap()
    }

    #[test]
    fn test_exact_lengths() {
        let expected = [
            (FunctionKind::SineIntegral, 52),
            (FunctionKind::CosineIntegral, 56),
            (FunctionKind::BesselFunction, 60),
            (FunctionKind::FresnelIntegralS, 62),
            (FunctionKind::FresnelIntegralC, 62),
        ];
        for (kind, len) in expected {
            let req = request(kind);
            assert_eq!(req.encode().len(), len, "{}", kind);
            assert_eq!(req.encoded_len(), len, "{}", kind);
        }
    }

    #[test]
    fn test_length_prefix_matches_buffer() {
        for kind in FunctionKind::ALL {
            let bytes = request(kind).encode();
            assert_eq!(peek_u32_le(&bytes, 0).unwrap() as usize, bytes.len());
        }
    }

    #[test]
    fn test_sine_layout() {
        let bytes = RequestFrame::new(FunctionKind::SineIntegral, 0.5, 2.0, 7, None)
            .unwrap()
            .encode();

        assert_eq!(&bytes[0..4], &[52, 0, 0, 0]);
        assert_eq!(&bytes[4..6], &[b'S', 0]);
        // name "Sine integral" is 13 units, terminator at 30..32
        assert_eq!(&bytes[30..32], &[0, 0]);
        assert_eq!(&bytes[32..40], &0.5f64.to_le_bytes());
        assert_eq!(&bytes[40..48], &2.0f64.to_le_bytes());
        assert_eq!(&bytes[48..52], &[7, 0, 0, 0]);
    }

    #[test]
    fn test_large_num_points() {
        let bytes = RequestFrame::new(FunctionKind::CosineIntegral, 0.0, 1.0, 100_000, None)
            .unwrap()
            .encode();
        // 4 + 2 * 16 + 8 + 8
        let offset = 52;
        let mut reader = FrameReader::at(&bytes, offset);
        assert_eq!(reader.read_i32_le().unwrap(), 100_000);
    }

    #[test]
    fn test_bessel_order_appended() {
        let bytes = RequestFrame::bessel(0.0, 5.0, 1000, 300).encode();
        let mut reader = FrameReader::at(&bytes, bytes.len() - 8);
        assert_eq!(reader.read_i32_le().unwrap(), 1000);
        assert_eq!(reader.read_i32_le().unwrap(), 300);
    }

    #[test]
    fn test_order_invariant() {
        assert!(matches!(
            RequestFrame::new(FunctionKind::BesselFunction, 0.0, 1.0, 10, None),
            Err(CurvewireError::InvalidParameters(_))
        ));
        assert!(matches!(
            RequestFrame::new(FunctionKind::SineIntegral, 0.0, 1.0, 10, Some(1)),
            Err(CurvewireError::InvalidParameters(_))
        ));
    }

    #[test]
    fn test_non_positive_points_still_encode() {
        let req = RequestFrame::new(FunctionKind::FresnelIntegralS, 0.0, 1.0, 0, None).unwrap();
        assert_eq!(req.encode().len(), 62);
    }

    #[test]
    fn test_decode_request() {
        for kind in FunctionKind::ALL {
            let req = request(kind);
            assert_eq!(RequestFrame::decode(&req.encode()).unwrap(), req);
        }
    }

    #[test]
    fn test_stop_frame() {
        let bytes = encode_stop();
        assert_eq!(bytes.len(), 14);
        assert_eq!(
            bytes,
            [14, 0, 0, 0, b'S', 0, b't', 0, b'o', 0, b'p', 0, 0, 0]
        );
        assert_eq!(Command::decode(&bytes).unwrap(), Command::Stop);
        assert!(matches!(
            RequestFrame::decode(&bytes),
            Err(DecodeError::UnknownCommand(_))
        ));
    }

    #[test]
    fn test_decode_unknown_command() {
        let mut bytes = Vec::new();
        write_u32_le(&mut bytes, 14);
        write_utf16_name(&mut bytes, "Tan!");
        assert_eq!(
            Command::decode(&bytes),
            Err(DecodeError::UnknownCommand("Tan!".to_string()))
        );
    }

    #[test]
    fn test_decode_request_length_mismatch() {
        let mut bytes = request(FunctionKind::SineIntegral).encode();
        bytes.push(0);
        assert!(matches!(
            Command::decode(&bytes),
            Err(DecodeError::LengthMismatch {
                declared: 52,
                actual: 53
            })
        ));
    }
}
