//! Async client over a connected pipe.
//!
//! [`Client`] pairs a byte stream with a [`Session`]: it writes encoded
//! requests, reads until the reply frame is assembled, and sends the Stop
//! command on disconnect.
//!
//! # Example
//!
//! ```ignore
//! use curvewire_client::{Client, ClientConfig, FunctionKind, RequestFrame};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut client = Client::connect(&ClientConfig::default()).await?;
//!
//!     let request = RequestFrame::new(FunctionKind::SineIntegral, 0.0, 10.0, 500, None)?;
//!     let reply = client.compute(&request).await?;
//!     println!("{}: {} points", reply.label(), reply.frame.points().len());
//!
//!     client.disconnect().await?;
//!     Ok(())
//! }
//! ```

use std::collections::VecDeque;
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::config::ClientConfig;
use crate::error::{CurvewireError, Result};
use crate::protocol::{encode_stop, RequestFrame};
use crate::session::{Reply, Session};
use crate::transport::{connect, pipe_path, PipeStream};

/// A connected client.
pub struct Client<S = PipeStream> {
    /// `None` once disconnected or closed by the server.
    stream: Option<S>,
    session: Session,
    read_buf: Vec<u8>,
    /// Replies decoded but not yet handed out.
    queued: VecDeque<Result<Reply>>,
    response_timeout: Option<Duration>,
}

impl Client<PipeStream> {
    /// Connect to the pipe named in `config`.
    pub async fn connect(config: &ClientConfig) -> Result<Self> {
        let path = pipe_path(&config.pipe_name);
        let stream = connect(&path).await?;
        tracing::info!("Connected to {}", path);
        Ok(Self::from_stream(stream, config))
    }
}

impl<S> Client<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Wrap an already connected stream.
    pub fn from_stream(stream: S, config: &ClientConfig) -> Self {
        Self {
            stream: Some(stream),
            session: Session::with_limits(config.max_frame_len, config.max_consecutive_errors),
            read_buf: vec![0u8; config.read_buffer_size.max(1)],
            queued: VecDeque::new(),
            response_timeout: config.response_timeout(),
        }
    }

    /// Send `request` and wait for its reply.
    ///
    /// A message-tagged reply is still `Ok`; check
    /// [`ResponseFrame::is_curve`](crate::ResponseFrame::is_curve).
    ///
    /// Replies still queued from earlier deliveries predate this request
    /// and are dropped before it is sent.
    pub async fn compute(&mut self, request: &RequestFrame) -> Result<Reply> {
        let stream = self.stream.as_mut().ok_or(CurvewireError::NotConnected)?;
        let bytes = self.session.begin_request(request)?;

        for stale in self.queued.drain(..) {
            match stale {
                Ok(reply) => tracing::warn!("Dropping unclaimed {:?} reply", reply.frame.tag()),
                Err(e) => tracing::warn!("Dropping unclaimed error: {}", e),
            }
        }

        if let Err(e) = write_frame(stream, &bytes).await {
            self.session.cancel_request();
            return Err(e);
        }

        match self.response_timeout {
            Some(timeout) => match tokio::time::timeout(timeout, self.next_reply()).await {
                Ok(reply) => reply,
                Err(_) => {
                    let kind = self.session.cancel_request();
                    tracing::warn!("No reply to {:?} within {:?}", kind, timeout);
                    Err(CurvewireError::Timeout)
                }
            },
            None => self.next_reply().await,
        }
    }

    /// Next decoded reply, reading from the stream as needed.
    ///
    /// EOF with a partial frame buffered is reported as a truncated frame;
    /// a clean EOF as `ConnectionClosed`.
    pub async fn next_reply(&mut self) -> Result<Reply> {
        loop {
            if let Some(reply) = self.queued.pop_front() {
                return reply;
            }

            let stream = self.stream.as_mut().ok_or(CurvewireError::NotConnected)?;
            let n = stream.read(&mut self.read_buf).await?;
            if n == 0 {
                tracing::debug!("Server closed the connection");
                self.stream = None;
                let closed = self.session.on_close();
                self.session.reset();
                return match closed {
                    Ok(()) => Err(CurvewireError::ConnectionClosed),
                    Err(e) => Err(e.into()),
                };
            }

            self.queued.extend(self.session.on_bytes(&self.read_buf[..n]));
            if self.session.is_corrupted() {
                tracing::error!(
                    "{} consecutive bad frames from server",
                    self.session.consecutive_errors()
                );
            }
        }
    }

    /// Send the Stop command and close the stream.
    ///
    /// Session state is cleared even if the goodbye could not be written.
    pub async fn disconnect(&mut self) -> Result<()> {
        let mut stream = self.stream.take().ok_or(CurvewireError::NotConnected)?;
        self.session.reset();
        self.queued.clear();

        write_frame(&mut stream, &encode_stop()).await?;
        stream.shutdown().await?;
        tracing::info!("Disconnected from pipe server");
        Ok(())
    }

    #[inline]
    pub fn is_connected(&self) -> bool {
        self.stream.is_some()
    }

    /// Protocol state, for inspecting in-flight and error counters.
    #[inline]
    pub fn session(&self) -> &Session {
        &self.session
    }
}

async fn write_frame<S: AsyncWrite + Unpin>(stream: &mut S, bytes: &[u8]) -> Result<()> {
    stream.write_all(bytes).await?;
    stream.flush().await?;
    Ok(())
}
