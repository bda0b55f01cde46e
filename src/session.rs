//! Per-connection protocol state.
//!
//! [`Session`] is the synchronous core between the transport and the
//! presentation layer: encoded requests go out through
//! [`begin_request`](Session::begin_request), received chunks come in
//! through [`on_bytes`](Session::on_bytes), and decoded replies come back
//! tagged with the function they answer.
//!
//! The wire format has no request identifiers, so only one request may be
//! in flight at a time.

use tracing::{debug, warn};

use crate::error::{CurvewireError, DecodeError, Result};
use crate::protocol::{FrameAssembler, FunctionKind, RequestFrame, ResponseFrame};

/// Default number of consecutive bad frames before the stream is
/// considered corrupted.
pub const DEFAULT_MAX_CONSECUTIVE_ERRORS: u32 = 3;

/// A decoded response paired with the request kind it answers.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    /// Kind of the in-flight request, if one was outstanding.
    pub kind: Option<FunctionKind>,
    pub frame: ResponseFrame,
}

impl Reply {
    /// Display label for the curve, empty when unsolicited.
    pub fn label(&self) -> &'static str {
        self.kind.map_or("", FunctionKind::label)
    }
}

/// Protocol state for one connection.
#[derive(Debug)]
pub struct Session {
    assembler: FrameAssembler,
    in_flight: Option<FunctionKind>,
    consecutive_errors: u32,
    max_consecutive_errors: u32,
}

impl Session {
    pub fn new() -> Self {
        Self::with_limits(
            crate::protocol::DEFAULT_MAX_FRAME_LEN,
            DEFAULT_MAX_CONSECUTIVE_ERRORS,
        )
    }

    pub fn with_limits(max_frame_len: u32, max_consecutive_errors: u32) -> Self {
        Self {
            assembler: FrameAssembler::with_max_frame_len(max_frame_len),
            in_flight: None,
            consecutive_errors: 0,
            max_consecutive_errors,
        }
    }

    /// Encode `request` and mark it in flight.
    ///
    /// Fails with `RequestInFlight` until the previous request's reply has
    /// been assembled.
    pub fn begin_request(&mut self, request: &RequestFrame) -> Result<Vec<u8>> {
        if let Some(kind) = self.in_flight {
            warn!("Refusing {} request while {} is in flight", request.kind(), kind);
            return Err(CurvewireError::RequestInFlight);
        }

        let bytes = request.encode();
        debug!(
            "Sending {} request ({} bytes, {} points)",
            request.kind(),
            bytes.len(),
            request.num_points()
        );
        self.in_flight = Some(request.kind());
        Ok(bytes)
    }

    /// Feed a chunk from the transport and decode every completed frame.
    ///
    /// Each completed frame, good or bad, settles the in-flight request.
    /// Bad frames are reported in place; later frames are still decoded.
    pub fn on_bytes(&mut self, chunk: &[u8]) -> Vec<Result<Reply>> {
        self.assembler
            .push(chunk)
            .into_iter()
            .map(|assembled| -> Result<Reply> {
                let kind = self.in_flight.take();
                let bytes = match assembled {
                    Ok(bytes) => bytes,
                    Err(e) => {
                        warn!("Discarding buffered bytes: {}", e);
                        self.record_error();
                        return Err(e.into());
                    }
                };
                match ResponseFrame::decode(&bytes) {
                    Ok(frame) => {
                        debug!(
                            "Received {:?} frame ({} bytes, {} points)",
                            frame.tag(),
                            bytes.len(),
                            frame.points().len()
                        );
                        self.consecutive_errors = 0;
                        Ok(Reply { kind, frame })
                    }
                    Err(e) => {
                        warn!("Bad frame ({} bytes): {}", bytes.len(), e);
                        self.record_error();
                        Err(e.into())
                    }
                }
            })
            .collect()
    }

    fn record_error(&mut self) {
        self.consecutive_errors = self.consecutive_errors.saturating_add(1);
        if self.is_corrupted() {
            warn!(
                "{} consecutive framing errors, stream looks corrupted",
                self.consecutive_errors
            );
        }
    }

    /// Connection closed: a buffered partial frame is reported as truncated.
    pub fn on_close(&mut self) -> std::result::Result<(), DecodeError> {
        self.in_flight = None;
        self.assembler.finish()
    }

    /// Stop waiting for the in-flight reply. Buffered bytes are kept, so a
    /// late reply still frames correctly and arrives without a kind.
    pub fn cancel_request(&mut self) -> Option<FunctionKind> {
        self.in_flight.take()
    }

    /// Forget all state, for disconnect or reconnect.
    pub fn reset(&mut self) {
        self.assembler.clear();
        self.in_flight = None;
        self.consecutive_errors = 0;
    }

    #[inline]
    pub fn in_flight(&self) -> Option<FunctionKind> {
        self.in_flight
    }

    #[inline]
    pub fn pending_bytes(&self) -> usize {
        self.assembler.len()
    }

    #[inline]
    pub fn consecutive_errors(&self) -> u32 {
        self.consecutive_errors
    }

    /// Too many bad frames in a row for the stream to be trusted.
    #[inline]
    pub fn is_corrupted(&self) -> bool {
        self.consecutive_errors >= self.max_consecutive_errors
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
