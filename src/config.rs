//! Client configuration.
//!
//! Loaded from JSON; every field has a default, so `{}` is a valid file.
//!
//! ```
//! use curvewire_client::ClientConfig;
//!
//! let config = ClientConfig::from_json_str(r#"{ "pipe_name": "curves" }"#).unwrap();
//! assert_eq!(config.pipe_name, "curves");
//! assert_eq!(config.read_buffer_size, 64 * 1024);
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::protocol::DEFAULT_MAX_FRAME_LEN;
use crate::session::DEFAULT_MAX_CONSECUTIVE_ERRORS;

/// Pipe name the computation server listens on.
pub const DEFAULT_PIPE_NAME: &str = "ICS0025";

/// Default size of each transport read.
pub const DEFAULT_READ_BUFFER_SIZE: usize = 64 * 1024;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Bare pipe name, resolved per platform by [`crate::transport::pipe_path`].
    pub pipe_name: String,
    /// Bytes requested per transport read.
    pub read_buffer_size: usize,
    /// Largest frame length accepted from the server.
    pub max_frame_len: u32,
    /// How long `compute` waits for a reply; `None` waits forever.
    pub response_timeout_ms: Option<u64>,
    /// Bad frames in a row before the stream is treated as corrupted.
    pub max_consecutive_errors: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            pipe_name: DEFAULT_PIPE_NAME.to_string(),
            read_buffer_size: DEFAULT_READ_BUFFER_SIZE,
            max_frame_len: DEFAULT_MAX_FRAME_LEN,
            response_timeout_ms: None,
            max_consecutive_errors: DEFAULT_MAX_CONSECUTIVE_ERRORS,
        }
    }
}

impl ClientConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn with_pipe_name(mut self, name: impl Into<String>) -> Self {
        self.pipe_name = name.into();
        self
    }

    pub fn with_read_buffer_size(mut self, size: usize) -> Self {
        self.read_buffer_size = size;
        self
    }

    pub fn with_max_frame_len(mut self, len: u32) -> Self {
        self.max_frame_len = len;
        self
    }

    pub fn with_response_timeout(mut self, timeout: Duration) -> Self {
        self.response_timeout_ms = Some(timeout.as_millis() as u64);
        self
    }

    pub fn with_max_consecutive_errors(mut self, limit: u32) -> Self {
        self.max_consecutive_errors = limit;
        self
    }

    pub fn response_timeout(&self) -> Option<Duration> {
        self.response_timeout_ms.map(Duration::from_millis)
    }
}
