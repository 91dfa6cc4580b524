//! # Application Layer Network Protocols
//!
//! Protocols that run on top of the [`Transport`](crate::network::transport::Transport)
//! capability. Currently this is the plaintext HTTP/1.1 subset a telemetry node
//! uses to report readings.
//!
//! ## Design Principles
//!
//! - **Transport Agnostic**: Work with any type implementing
//!   [`Transport`](crate::network::transport::Transport)
//! - **No-std Compatible**: Designed for embedded systems without heap allocation
//! - **Resource Conscious**: Caller-supplied, fixed-size buffers only
//! - **Never Blocking**: Progress is made in bounded steps driven by the caller

/// HTTP client implementation.
///
/// Request building, response parsing and the tick-driven transfer state
/// machine.
pub mod http;
