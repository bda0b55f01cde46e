//! Frame assembler for accumulating partial reads.
//!
//! The pipe delivers bytes in arbitrary chunks: one read may hold part of
//! a frame, exactly one frame, or several coalesced frames. The assembler
//! keeps unconsumed bytes in a `BytesMut` and splits off each frame once
//! its declared length is available.
//!
//! # Example
//!
//! ```
//! use curvewire_client::protocol::{FrameAssembler, ResponseFrame};
//!
//! let bytes = ResponseFrame::message("Busy").encode();
//! let mut assembler = FrameAssembler::new();
//!
//! assert!(assembler.push(&bytes[..3]).is_empty());
//! let frames = assembler.push(&bytes[3..]);
//! assert_eq!(frames.len(), 1);
//! let frame = frames[0].as_ref().unwrap();
//! assert_eq!(ResponseFrame::decode(frame).unwrap().tag(), "Busy");
//! ```

use bytes::{Bytes, BytesMut};

use super::primitive::{peek_u32_le, LENGTH_PREFIX_SIZE, TERMINATOR_SIZE};
use crate::error::DecodeError;

/// Smallest legal frame: length prefix plus an empty name's terminator.
pub const MIN_FRAME_LEN: u32 = (LENGTH_PREFIX_SIZE + TERMINATOR_SIZE) as u32;

/// Default maximum frame length (16 MB).
pub const DEFAULT_MAX_FRAME_LEN: u32 = 16 * 1024 * 1024;

/// Buffer for accumulating incoming bytes and extracting complete frames.
///
/// Owned by exactly one connection; call [`clear`](Self::clear) on
/// disconnect or reconnect.
#[derive(Debug)]
pub struct FrameAssembler {
    /// Bytes received but not yet forming a complete frame.
    pending: BytesMut,
    /// Largest declared length accepted.
    max_frame_len: u32,
}

impl FrameAssembler {
    /// Create an assembler with the default maximum frame length.
    pub fn new() -> Self {
        Self::with_max_frame_len(DEFAULT_MAX_FRAME_LEN)
    }

    /// Create an assembler with a custom maximum frame length.
    pub fn with_max_frame_len(max_frame_len: u32) -> Self {
        Self {
            pending: BytesMut::with_capacity(64 * 1024),
            max_frame_len,
        }
    }

    /// Push a chunk and extract every frame it completes.
    ///
    /// Returns zero, one or several frames, in arrival order. Each frame
    /// still starts with its length prefix, ready for
    /// [`ResponseFrame::decode`](super::ResponseFrame::decode).
    ///
    /// A declared length below [`MIN_FRAME_LEN`] or above the maximum
    /// leaves no way to find the next frame boundary: the pending bytes are
    /// discarded and the error is appended after the frames completed
    /// before it. At most one error is returned per call, always last.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<Result<Bytes, DecodeError>> {
        self.pending.extend_from_slice(chunk);

        let mut frames = Vec::new();
        loop {
            match self.try_extract_one() {
                Ok(Some(frame)) => frames.push(Ok(frame)),
                Ok(None) => break,
                Err(e) => {
                    frames.push(Err(e));
                    break;
                }
            }
        }
        frames
    }

    /// Try to split off one complete frame.
    ///
    /// - `Ok(Some(frame))` if a complete frame was extracted
    /// - `Ok(None)` if more data is needed
    /// - `Err(...)` if the length prefix is unusable
    fn try_extract_one(&mut self) -> Result<Option<Bytes>, DecodeError> {
        let declared = match peek_u32_le(&self.pending, 0) {
            Ok(len) => len,
            Err(_) => return Ok(None),
        };

        if declared < MIN_FRAME_LEN {
            self.pending.clear();
            return Err(DecodeError::FrameTooShort { declared });
        }
        if declared > self.max_frame_len {
            self.pending.clear();
            return Err(DecodeError::FrameTooLarge {
                declared,
                max: self.max_frame_len,
            });
        }

        let declared = declared as usize;
        if self.pending.len() < declared {
            return Ok(None);
        }

        Ok(Some(self.pending.split_to(declared).freeze()))
    }

    /// End of stream: any buffered partial frame becomes `TruncatedBuffer`.
    ///
    /// The buffer is empty afterwards either way.
    pub fn finish(&mut self) -> Result<(), DecodeError> {
        if self.pending.is_empty() {
            return Ok(());
        }

        let available = self.pending.len();
        let needed = peek_u32_le(&self.pending, 0)
            .map(|len| len as usize)
            .unwrap_or(LENGTH_PREFIX_SIZE);
        self.pending.clear();
        Err(DecodeError::TruncatedBuffer { needed, available })
    }

    /// Get the number of buffered bytes.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Check if the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Drop buffered bytes.
    pub fn clear(&mut self) {
        self.pending.clear();
    }

    pub fn max_frame_len(&self) -> u32 {
        self.max_frame_len
    }
}

impl Default for FrameAssembler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::ResponseFrame;

    /// Push `chunk`, expecting no framing errors.
    fn push_ok(assembler: &mut FrameAssembler, chunk: &[u8]) -> Vec<Bytes> {
        assembler
            .push(chunk)
            .into_iter()
            .collect::<Result<Vec<_>, _>>()
            .unwrap()
    }

    fn curve_bytes(n: usize) -> Vec<u8> {
        let points = (0..n).map(|i| (i as f64, (i * i) as f64)).collect();
        ResponseFrame::curve(points).encode()
    }

    #[test]
    fn test_single_complete_frame() {
        let mut assembler = FrameAssembler::new();
        let bytes = curve_bytes(3);

        let frames = push_ok(&mut assembler, &bytes);

        assert_eq!(frames.len(), 1);
        assert_eq!(&frames[0][..], &bytes[..]);
        assert!(assembler.is_empty());
    }

    #[test]
    fn test_three_fragments() {
        let mut assembler = FrameAssembler::new();
        let bytes = curve_bytes(4);

        assert!(push_ok(&mut assembler, &bytes[..2]).is_empty());
        assert!(push_ok(&mut assembler, &bytes[2..30]).is_empty());
        let frames = push_ok(&mut assembler, &bytes[30..]);

        assert_eq!(frames.len(), 1);
        let frame = ResponseFrame::decode(&frames[0]).unwrap();
        assert_eq!(frame.points().len(), 4);
    }

    #[test]
    fn test_two_frames_in_one_push() {
        let mut assembler = FrameAssembler::new();
        let first = ResponseFrame::message("Working").encode();
        let second = curve_bytes(2);

        let mut combined = first.clone();
        combined.extend_from_slice(&second);

        let frames = push_ok(&mut assembler, &combined);
        assert_eq!(frames.len(), 2);
        assert_eq!(ResponseFrame::decode(&frames[0]).unwrap().tag(), "Working");
        assert!(ResponseFrame::decode(&frames[1]).unwrap().is_curve());
        assert!(assembler.is_empty());
    }

    #[test]
    fn test_mixed_complete_and_partial() {
        let mut assembler = FrameAssembler::new();
        let first = curve_bytes(1);
        let second = curve_bytes(2);

        let mut data = first.clone();
        data.extend_from_slice(&second[..5]);

        let frames = push_ok(&mut assembler, &data);
        assert_eq!(frames.len(), 1);
        assert_eq!(assembler.len(), 5);

        let frames = push_ok(&mut assembler, &second[5..]);
        assert_eq!(frames.len(), 1);
        assert_eq!(&frames[0][..], &second[..]);
    }

    #[test]
    fn test_byte_at_a_time() {
        let mut assembler = FrameAssembler::new();
        let bytes = curve_bytes(2);

        let mut all_frames = Vec::new();
        for byte in &bytes {
            all_frames.extend(push_ok(&mut assembler, &[*byte]));
        }

        assert_eq!(all_frames.len(), 1);
        assert_eq!(&all_frames[0][..], &bytes[..]);
    }

    #[test]
    fn test_declared_length_too_short() {
        let mut assembler = FrameAssembler::new();
        let result = assembler.push(&[0, 0, 0, 0, 1, 2]);

        assert_eq!(result, vec![Err(DecodeError::FrameTooShort { declared: 0 })]);
        assert!(assembler.is_empty());
    }

    #[test]
    fn test_max_frame_len() {
        let mut assembler = FrameAssembler::with_max_frame_len(100);
        let result = assembler.push(&1000u32.to_le_bytes());

        assert_eq!(result.len(), 1);
        let err = result[0].as_ref().unwrap_err();
        assert!(err.to_string().contains("exceeds maximum"));
        assert!(assembler.is_empty());
    }

    #[test]
    fn test_bad_prefix_keeps_earlier_frames() {
        let mut assembler = FrameAssembler::new();
        let good = curve_bytes(1);

        let mut data = good.clone();
        data.extend_from_slice(&[0, 0, 0, 0]);

        let result = assembler.push(&data);
        assert_eq!(result.len(), 2);
        assert_eq!(&result[0].as_ref().unwrap()[..], &good[..]);
        assert_eq!(result[1], Err(DecodeError::FrameTooShort { declared: 0 }));
        assert!(assembler.is_empty());

        // Assembler is usable again after the bad prefix.
        let frames = push_ok(&mut assembler, &good);
        assert_eq!(frames.len(), 1);
    }

    #[test]
    fn test_finish_with_partial_frame() {
        let mut assembler = FrameAssembler::new();
        let bytes = curve_bytes(2);
        push_ok(&mut assembler, &bytes[..10]);

        assert_eq!(
            assembler.finish(),
            Err(DecodeError::TruncatedBuffer {
                needed: bytes.len(),
                available: 10
            })
        );
        assert!(assembler.is_empty());
        assert_eq!(assembler.finish(), Ok(()));
    }

    #[test]
    fn test_clear() {
        let mut assembler = FrameAssembler::new();
        push_ok(&mut assembler, &[1, 2]);
        assert_eq!(assembler.len(), 2);

        assembler.clear();
        assert!(assembler.is_empty());
    }
}
