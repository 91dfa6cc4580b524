//! A network abstraction layer for embedded telemetry nodes
//!
//! This module provides the traits the HTTP transfer machinery is built on. There
//! are two levels:
//!
//! - Byte-stream connection traits ([`Read`], [`Write`], [`Close`],
//!   [`Connection`], [`Connect`]) that a modem or TCP/IP stack implements.
//! - The one-byte, non-blocking [`Transport`](transport::Transport) capability
//!   that the [`NetworkClient`](application::http::client::NetworkClient) state
//!   machine drives. [`transport`] adapts any [`Connect`] implementation to it.
//!
//! Links that need a bearer attach first (cellular) implement
//! [`Link`](link::Link) as well.

#![deny(unsafe_code)]

/// Common error types for network operations
pub mod error;

/// Bounded diagnostic message buffer
pub mod accumulator;

/// The transport capability consumed by the HTTP client, and its adapters
pub mod transport;

/// Bearer attach for cellular links
pub mod link;

/// Application layer protocol implementations
pub mod application;

/// Re-exports of common traits
pub mod prelude {
    pub use super::link::Link;
    pub use super::transport::Transport;
    pub use super::{Close, Connect, Connection, Read, Write};
}

/// Read side of a byte-stream connection.
pub trait Read {
    /// Associated error type
    type Error: core::fmt::Debug;
    /// Read whatever data is ready into `buf`.
    ///
    /// `Ok(0)` means no data is ready right now; it does not signal a closed
    /// connection.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;
}

/// Write side of a byte-stream connection.
pub trait Write {
    /// Associated error type
    type Error: core::fmt::Debug;
    /// Write data to the connection
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error>;
    /// Flush the write buffer
    fn flush(&mut self) -> Result<(), Self::Error>;
}

/// Orderly shutdown of a byte-stream connection.
pub trait Close {
    /// Associated error type
    type Error: core::fmt::Debug;
    /// Close the connection
    fn close(self) -> Result<(), Self::Error>;
}

/// A synchronous connection
pub trait Connection: Read + Write + Close {}

/// A synchronous connector (client)
pub trait Connect {
    /// Associated connection type
    type Connection: Connection;
    /// Associated error type
    type Error: core::fmt::Debug;
    /// Open a connection to `remote`, given as `host:port`
    fn connect(&mut self, remote: &str) -> Result<Self::Connection, Self::Error>;
}
