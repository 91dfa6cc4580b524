//! # telenode - telemetry node SDK
//!
//! Building blocks for a battery-powered data logger that samples sensors,
//! keeps a local CSV record of every reading and periodically pushes the
//! averages to an HTTP endpoint over a slow serial, Wi-Fi or cellular link. The
//! library is designed for embedded systems and supports `no_std` environments;
//! nothing in it allocates.
//!
//! ## Features
//!
//! ### HTTP over constrained links
//! - **Request building**: method, URL, query parameters, headers and body
//!   serialised into a caller buffer
//! - **Response parsing**: status line, case-insensitive header lookup and body
//!   as borrowed views over the received bytes
//! - **Tick-driven client**: a non-blocking state machine that sends and
//!   receives a bounded number of bytes per tick, with optional deadline
//! - **Transports**: any modem or TCP/IP stack implementing the connection
//!   traits, or `std::net` with the `std` feature
//! - **Cellular attach**: retries a bearer attach with the configured APN and
//!   login, one attempt per poll
//!
//! ### Local storage
//! - Narrow file interface for SD cards and similar media
//! - One CSV file per day with header line and running entry IDs
//!
//! ### Configuration
//! - JSON settings document parsed without allocation
//!
//! ## Usage
//!
//! Add this to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! telenode = "0.1.0"
//! ```
//!
//! ### Uploading readings
//!
//! ```rust,no_run
//! use telenode::config::NodeConfig;
//! use telenode::network::application::http::{NetworkClient, RequestBuilder, ResponseParser};
//! use telenode::network::transport::Transport;
//! use telenode::telemetry::UpdateComposer;
//! # struct Modem;
//! # impl Transport for Modem {
//! #     type Error = ();
//! #     fn connect(&mut self, _: &str, _: u16) -> Result<(), ()> { Ok(()) }
//! #     fn print(&mut self, b: &[u8]) -> Result<usize, ()> { Ok(b.len()) }
//! #     fn connected(&self) -> bool { true }
//! #     fn available(&mut self) -> bool { false }
//! #     fn read(&mut self) -> Option<u8> { None }
//! #     fn stop(&mut self) {}
//! # }
//!
//! let config = NodeConfig::from_json(r#"{"host":"api.thingspeak.com","api_key":"KEY"}"#).unwrap();
//!
//! let mut composer: UpdateComposer<4> = UpdateComposer::new();
//! composer.set_readings(&[21.5, 1013.25]).unwrap();
//!
//! let mut builder = RequestBuilder::new();
//! composer.compose(&config, &mut builder).unwrap();
//!
//! let mut request = [0u8; 256];
//! let len = builder.write_to_buffer(&mut request, false);
//!
//! let mut response = [0u8; 256];
//! let mut client = NetworkClient::with_config(Modem, config.client_config());
//! client.send_http_request(config.host, &request[..len], &mut response, |ok: bool| {
//!     // runs once, from inside the tick that ends the transfer
//!     let _ = ok;
//! });
//!
//! // Called from the application's scheduler:
//! client.tick();
//!
//! let parsed = ResponseParser::parse(client.response());
//! let _ = parsed.status();
//! ```
//!
//! ## Optional Features
//!
//! - `std`: Enable standard library support and the `std::net` transport
//! - `defmt`: Enable defmt logging support for embedded debugging
//! - `log`: Route diagnostics through the `log` facade instead

#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![deny(missing_docs)]
#![warn(missing_debug_implementations)]

#[macro_use]
mod fmt;

/// Network layer: connection traits, transports and the HTTP client.
///
/// This module contains the byte-stream connection traits a modem or TCP/IP
/// stack implements, the one-byte transport capability the HTTP client drives,
/// and the HTTP request/response machinery itself.
pub mod network;

/// Local storage interface and the daily CSV data log.
pub mod storage;

/// Runtime settings loaded from a JSON document.
pub mod config;

/// Composition of telemetry update requests.
pub mod telemetry;
