//! HTTP/1.1 transport layer for constrained links.
//!
//! This module provides the pieces a telemetry node needs to push readings to an
//! HTTP endpoint over a slow, unreliable serial or cellular data link, without
//! heap allocation and without ever blocking the caller.
//!
//! # Components
//!
//! - [`Header`] / [`HeaderList`]: ordered, fixed-capacity name/value pairs with
//!   case-insensitive lookup.
//! - [`RequestBuilder`]: accumulates method, URL, query parameters, headers and
//!   body, then serialises them into a caller buffer.
//! - [`ResponseParser`]: a read-only view of the status line, headers and body of
//!   a received response.
//! - [`NetworkClient`]: the tick-driven state machine that sends a request and
//!   receives the response in bounded chunks.
//!
//! # Usage
//!
//! ```rust
//! use telenode::network::application::http::{RequestBuilder, ResponseParser};
//!
//! let mut builder = RequestBuilder::new();
//! builder.set_method_and_url("POST", "/readings");
//! builder.put_header("Host", "api.example.com");
//! builder.put_header("Content-Type", "text/csv");
//! builder.put_body(Some("21.5000, 1013.2500"));
//!
//! let mut request = [0u8; 256];
//! let len = builder.write_to_buffer(&mut request, true);
//! assert!(request[..len].starts_with(b"POST /readings HTTP/1.1\r\n"));
//!
//! // ... hand &request[..len] to a NetworkClient, tick it until idle ...
//!
//! let response = ResponseParser::parse(b"HTTP/1.1 200 OK\r\nContent-Length: 1\r\n\r\n7");
//! assert_eq!(response.status(), 200);
//! assert_eq!(response.body(), b"7");
//! ```

/// Bounded cursor over a caller-supplied buffer.
pub mod buffer;

/// Tick-driven transfer state machine.
pub mod client;

/// Header types.
pub mod header;

/// Request composition.
pub mod request;

/// Response parsing.
pub mod response;

pub use buffer::BoundedWriter;
pub use client::{ClientConfig, NetworkClient, TransferState};
pub use header::{Header, HeaderList, MAX_HEADERS};
pub use request::{MAX_URL_PARAMS, RequestBuilder};
pub use response::ResponseParser;
