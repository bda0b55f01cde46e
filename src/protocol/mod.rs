//! Protocol module - primitives, request/response frames, framing.
//!
//! This module implements the binary protocol spoken over the pipe:
//! - Little-endian primitives and UTF-16LE names
//! - Request encoding for each function family, plus the Stop command
//! - Response decoding into a tag and ordered point list
//! - Frame assembler for accumulating partial reads

mod assembler;
mod function;
mod primitive;
mod request;
mod response;

pub use assembler::{FrameAssembler, DEFAULT_MAX_FRAME_LEN, MIN_FRAME_LEN};
pub use function::FunctionKind;
pub use primitive::{
    peek_u32_le, utf16_name_len, write_f64_le, write_i32_le, write_u32_le, write_utf16_name,
    FrameReader, LENGTH_PREFIX_SIZE, TERMINATOR_SIZE,
};
pub use request::{encode_stop, Command, RequestFrame, STOP_COMMAND};
pub use response::{ResponseFrame, CURVE_TAG, POINT_SIZE};
