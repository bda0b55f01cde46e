//! # curvewire-client
//!
//! Rust client for the curve computation pipe protocol.
//!
//! A client asks the server to sample a special function (sine/cosine
//! integral, Bessel function, Fresnel S/C integral) over a range and gets
//! back a tagged list of points.
//!
//! ## Architecture
//!
//! - **Protocol** (`protocol`): length-prefixed little-endian frames with
//!   UTF-16LE command names, plus a frame assembler for partial reads
//! - **Session** (`session`): synchronous per-connection state, one request
//!   in flight at a time
//! - **Transport** (`transport`): Unix domain socket or Windows named pipe
//! - **Client** (`client`): async request/reply over any tokio stream
//!
//! ## Example
//!
//! ```ignore
//! use curvewire_client::{Client, ClientConfig, RequestForm};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let request = RequestForm {
//!         function: "Bessel function".into(),
//!         range_start: "0".into(),
//!         range_end: "20".into(),
//!         num_points: "400".into(),
//!         order: "1".into(),
//!     }
//!     .parse()?;
//!
//!     let mut client = Client::connect(&ClientConfig::default()).await?;
//!     let reply = client.compute(&request).await?;
//!     for (x, y) in reply.frame.points() {
//!         println!("{x}\t{y}");
//!     }
//!     client.disconnect().await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod input;
pub mod protocol;
pub mod session;
pub mod transport;

mod client;

pub use client::Client;
pub use config::ClientConfig;
pub use error::{CurvewireError, DecodeError};
pub use input::RequestForm;
pub use protocol::{FrameAssembler, FunctionKind, RequestFrame, ResponseFrame};
pub use session::{Reply, Session};
