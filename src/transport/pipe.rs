//! Platform-specific pipe/socket implementation.
//!
//! - Unix: Unix Domain Socket at `/tmp/{name}.sock`
//! - Windows: Named Pipe at `\\.\pipe\{name}`
//!
//! # Example
//!
//! ```ignore
//! use curvewire_client::transport::{connect, pipe_path};
//!
//! let stream = connect(&pipe_path("ICS0025")).await?;
//! ```

use crate::error::Result;
use tokio::io::{AsyncRead, AsyncWrite};

/// Resolve a bare pipe name to a platform path.
pub fn pipe_path(name: &str) -> String {
    #[cfg(unix)]
    {
        format!("/tmp/{}.sock", name)
    }

    #[cfg(windows)]
    {
        format!(r"\\.\pipe\{}", name)
    }
}

/// Connect to the server listening at `path`.
pub async fn connect(path: &str) -> Result<PipeStream> {
    PipeStream::connect(path).await
}

// ============================================================================
// Unix Implementation
// ============================================================================

#[cfg(unix)]
mod unix_impl {
    use super::*;
    use std::path::Path;
    use tokio::net::{UnixListener, UnixStream};

    /// Unix Domain Socket stream (connected).
    pub struct PipeStream {
        stream: UnixStream,
    }

    /// Unix Domain Socket listener, for servers and tests.
    pub struct PipeListener {
        listener: UnixListener,
        path: String,
    }

    impl PipeStream {
        pub async fn connect(path: &str) -> Result<Self> {
            let stream = UnixStream::connect(path).await?;
            Ok(Self { stream })
        }
    }

    impl PipeListener {
        /// Bind to a Unix socket path.
        ///
        /// Removes any existing socket file at the path before binding.
        pub async fn bind(path: &str) -> Result<Self> {
            if Path::new(path).exists() {
                std::fs::remove_file(path)?;
            }

            let listener = UnixListener::bind(path)?;

            Ok(Self {
                listener,
                path: path.to_string(),
            })
        }

        /// Accept a single connection.
        pub async fn accept(&self) -> Result<PipeStream> {
            let (stream, _addr) = self.listener.accept().await?;
            Ok(PipeStream { stream })
        }

        /// Get the socket path.
        pub fn path(&self) -> &str {
            &self.path
        }
    }

    impl Drop for PipeListener {
        fn drop(&mut self) {
            let _ = std::fs::remove_file(&self.path);
        }
    }

    impl AsyncRead for PipeStream {
        fn poll_read(
            mut self: std::pin::Pin<&mut Self>,
            cx: &mut std::task::Context<'_>,
            buf: &mut tokio::io::ReadBuf<'_>,
        ) -> std::task::Poll<std::io::Result<()>> {
            std::pin::Pin::new(&mut self.stream).poll_read(cx, buf)
        }
    }

    impl AsyncWrite for PipeStream {
        fn poll_write(
            mut self: std::pin::Pin<&mut Self>,
            cx: &mut std::task::Context<'_>,
            buf: &[u8],
        ) -> std::task::Poll<std::io::Result<usize>> {
            std::pin::Pin::new(&mut self.stream).poll_write(cx, buf)
        }

        fn poll_flush(
            mut self: std::pin::Pin<&mut Self>,
            cx: &mut std::task::Context<'_>,
        ) -> std::task::Poll<std::io::Result<()>> {
            std::pin::Pin::new(&mut self.stream).poll_flush(cx)
        }

        fn poll_shutdown(
            mut self: std::pin::Pin<&mut Self>,
            cx: &mut std::task::Context<'_>,
        ) -> std::task::Poll<std::io::Result<()>> {
            std::pin::Pin::new(&mut self.stream).poll_shutdown(cx)
        }
    }
}

// ============================================================================
// Windows Implementation
// ============================================================================

#[cfg(windows)]
mod windows_impl {
    use super::*;
    use std::time::Duration;
    use tokio::net::windows::named_pipe::{
        ClientOptions, NamedPipeClient, NamedPipeServer, ServerOptions,
    };

    /// `ERROR_PIPE_BUSY`: every server instance is taken.
    const ERROR_PIPE_BUSY: i32 = 231;

    /// Attempts before giving up on a busy pipe.
    const BUSY_RETRIES: usize = 20;

    enum Inner {
        Client(NamedPipeClient),
        Server(NamedPipeServer),
    }

    /// Windows Named Pipe stream (connected).
    pub struct PipeStream {
        pipe: Inner,
    }

    /// Windows Named Pipe listener, for servers and tests.
    pub struct PipeListener {
        path: String,
    }

    impl PipeStream {
        pub async fn connect(path: &str) -> Result<Self> {
            let mut attempts = 0;
            let client = loop {
                match ClientOptions::new().open(path) {
                    Ok(client) => break client,
                    Err(e) if e.raw_os_error() == Some(ERROR_PIPE_BUSY) && attempts < BUSY_RETRIES => {
                        attempts += 1;
                        tokio::time::sleep(Duration::from_millis(50)).await;
                    }
                    Err(e) => return Err(e.into()),
                }
            };
            Ok(Self {
                pipe: Inner::Client(client),
            })
        }
    }

    impl PipeListener {
        pub async fn bind(path: &str) -> Result<Self> {
            Ok(Self {
                path: path.to_string(),
            })
        }

        /// Accept a single connection.
        pub async fn accept(&self) -> Result<PipeStream> {
            let server = ServerOptions::new().create(&self.path)?;
            server.connect().await?;
            Ok(PipeStream {
                pipe: Inner::Server(server),
            })
        }

        /// Get the pipe path.
        pub fn path(&self) -> &str {
            &self.path
        }
    }

    impl AsyncRead for PipeStream {
        fn poll_read(
            mut self: std::pin::Pin<&mut Self>,
            cx: &mut std::task::Context<'_>,
            buf: &mut tokio::io::ReadBuf<'_>,
        ) -> std::task::Poll<std::io::Result<()>> {
            match &mut self.pipe {
                Inner::Client(p) => std::pin::Pin::new(p).poll_read(cx, buf),
                Inner::Server(p) => std::pin::Pin::new(p).poll_read(cx, buf),
            }
        }
    }

    impl AsyncWrite for PipeStream {
        fn poll_write(
            mut self: std::pin::Pin<&mut Self>,
            cx: &mut std::task::Context<'_>,
            buf: &[u8],
        ) -> std::task::Poll<std::io::Result<usize>> {
            match &mut self.pipe {
                Inner::Client(p) => std::pin::Pin::new(p).poll_write(cx, buf),
                Inner::Server(p) => std::pin::Pin::new(p).poll_write(cx, buf),
            }
        }

        fn poll_flush(
            mut self: std::pin::Pin<&mut Self>,
            cx: &mut std::task::Context<'_>,
        ) -> std::task::Poll<std::io::Result<()>> {
            match &mut self.pipe {
                Inner::Client(p) => std::pin::Pin::new(p).poll_flush(cx),
                Inner::Server(p) => std::pin::Pin::new(p).poll_flush(cx),
            }
        }

        fn poll_shutdown(
            mut self: std::pin::Pin<&mut Self>,
            cx: &mut std::task::Context<'_>,
        ) -> std::task::Poll<std::io::Result<()>> {
            match &mut self.pipe {
                Inner::Client(p) => std::pin::Pin::new(p).poll_shutdown(cx),
                Inner::Server(p) => std::pin::Pin::new(p).poll_shutdown(cx),
            }
        }
    }
}

// ============================================================================
// Platform-independent re-exports
// ============================================================================

#[cfg(unix)]
pub use unix_impl::{PipeListener, PipeStream};

#[cfg(windows)]
pub use windows_impl::{PipeListener, PipeStream};
