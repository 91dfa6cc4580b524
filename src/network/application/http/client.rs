//! Tick-driven, non-blocking HTTP transfers.
//!
//! [`NetworkClient`] moves one request/response exchange through a
//! [`Transport`] in small bounded steps. Starting a transfer only opens the
//! connection; after that every call to [`NetworkClient::tick`] pushes at most
//! one chunk of request text or pulls at most one chunk of response bytes, and
//! then returns. A cooperative scheduler is expected to call `tick` at whatever
//! cadence the application chooses.
//!
//! ```text
//!            send_http_request                 remainder < chunk
//!   ┌──────┐ ───────────────▶ ┌─────────┐ ───────────────────▶ ┌───────────┐
//!   │ Idle │                  │ Sending │                      │ Receiving │
//!   └──────┘ ◀─────────────── └─────────┘                      └───────────┘
//!      ▲      write error / timeout                                  │
//!      └─────────────────────────────────────────────────────────────┘
//!        end-of-stream, buffer full, disconnect, timeout, cancel
//! ```
//!
//! The completion callback fires exactly once per call to
//! [`send_http_request`](NetworkClient::send_http_request): synchronously when
//! the request cannot start (busy, connect failure), otherwise from inside the
//! `tick` that ends the transfer.
//!
//! The transfer only completes on a real end of stream: the client asks
//! [`Transport::available`] before every byte it pulls, so a link that goes
//! quiet between bursts leaves the client in [`TransferState::Receiving`].
//! Likewise a transport that accepts only part of a chunk keeps the client in
//! [`TransferState::Sending`] until the rest has been taken.
//!
//! # Examples
//!
//! ```rust
//! use telenode::network::application::http::{NetworkClient, TransferState};
//! use telenode::network::transport::Transport;
//!
//! /// Answers every request with a canned response.
//! struct Canned { reply: &'static [u8], pos: usize, open: bool }
//!
//! impl Transport for Canned {
//!     type Error = ();
//!     fn connect(&mut self, _host: &str, _port: u16) -> Result<(), ()> { self.open = true; Ok(()) }
//!     fn print(&mut self, bytes: &[u8]) -> Result<usize, ()> { Ok(bytes.len()) }
//!     fn connected(&self) -> bool { self.open }
//!     fn available(&mut self) -> bool { self.pos <= self.reply.len() }
//!     fn read(&mut self) -> Option<u8> {
//!         let byte = self.reply.get(self.pos).copied();
//!         self.pos += 1;
//!         byte
//!     }
//!     fn stop(&mut self) { self.open = false; }
//! }
//!
//! let request = b"GET / HTTP/1.1\r\nHost: example.com\r\n\r\n";
//! let mut response = [0u8; 64];
//!
//! let transport = Canned { reply: b"HTTP/1.0 200 OK\r\n", pos: 0, open: false };
//! let mut client = NetworkClient::new(transport);
//!
//! client.send_http_request("example.com", request, &mut response, |ok: bool| assert!(ok));
//! while client.state() != TransferState::Idle {
//!     client.tick();
//! }
//! assert_eq!(client.response(), b"HTTP/1.0 200 OK\r\n");
//! ```

use core::fmt::Write as _;

use super::buffer::BoundedWriter;
use crate::network::accumulator::{ErrorAccumulator, MAX_ERROR_LEN};
use crate::network::error::{Error, Outcome};
use crate::network::transport::{HTTP_PORT, Transport};

/// Default number of request bytes pushed per tick.
pub const DEFAULT_SEND_CHUNK: usize = 16;

/// Default number of response bytes pulled per tick.
pub const DEFAULT_RECV_CHUNK: usize = 16;

/// Tunables for a [`NetworkClient`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientConfig {
    /// Request bytes pushed per tick. Zero is treated as one.
    pub send_chunk: usize,
    /// Response bytes pulled per tick. Zero is treated as one.
    pub recv_chunk: usize,
    /// Remote port passed to [`Transport::connect`].
    pub port: u16,
    /// Ticks a transfer may take before it is abandoned; `None` waits forever.
    pub deadline_ticks: Option<u32>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            send_chunk: DEFAULT_SEND_CHUNK,
            recv_chunk: DEFAULT_RECV_CHUNK,
            port: HTTP_PORT,
            deadline_ticks: None,
        }
    }
}

/// Where a [`NetworkClient`] is in its transfer cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferState {
    /// No transfer is active; a new request may be started.
    Idle,
    /// Request text is being pushed to the transport.
    Sending,
    /// Response bytes are being pulled from the transport.
    Receiving,
}

#[cfg(feature = "defmt")]
impl defmt::Format for TransferState {
    fn format(&self, f: defmt::Formatter) {
        match self {
            TransferState::Idle => defmt::write!(f, "Idle"),
            TransferState::Sending => defmt::write!(f, "Sending"),
            TransferState::Receiving => defmt::write!(f, "Receiving"),
        }
    }
}

/// Drives one HTTP exchange at a time through a [`Transport`].
///
/// The request text and the response buffer are borrowed for `'a`; the client
/// keeps them until the next transfer starts or the response buffer is handed
/// back with [`take_response`](Self::take_response). `F` is the completion
/// callback type; plain `fn(bool)` pointers and closures that capture only
/// shared references can be passed again for every request.
pub struct NetworkClient<'a, T, F = fn(bool)> {
    transport: T,
    config: ClientConfig,
    state: TransferState,
    request: &'a [u8],
    sent: usize,
    response: Option<BoundedWriter<'a>>,
    on_complete: Option<F>,
    ticks: u32,
    deadline: Option<u32>,
    outcome: Option<Outcome>,
    errors: ErrorAccumulator<MAX_ERROR_LEN>,
}

enum Step {
    Continue,
    Finish(Outcome),
}

impl<'a, T: Transport, F: FnOnce(bool)> NetworkClient<'a, T, F> {
    /// Creates an idle client with the default [`ClientConfig`].
    pub fn new(transport: T) -> Self {
        Self::with_config(transport, ClientConfig::default())
    }

    /// Creates an idle client.
    pub fn with_config(transport: T, config: ClientConfig) -> Self {
        Self {
            transport,
            config,
            state: TransferState::Idle,
            request: &[],
            sent: 0,
            response: None,
            on_complete: None,
            ticks: 0,
            deadline: None,
            outcome: None,
            errors: ErrorAccumulator::new(),
        }
    }

    /// Starts sending `request` to `url`, using the configured deadline.
    ///
    /// `url` is the host name handed to [`Transport::connect`]. The response is
    /// written into `response`, never past its end. See
    /// [`send_http_request_with_deadline`](Self::send_http_request_with_deadline).
    pub fn send_http_request(
        &mut self,
        url: &str,
        request: &'a [u8],
        response: &'a mut [u8],
        on_complete: F,
    ) {
        let deadline = self.config.deadline_ticks;
        self.send_http_request_with_deadline(url, request, response, deadline, on_complete);
    }

    /// Starts sending `request` to `url`, abandoning it after `deadline_ticks`
    /// ticks.
    ///
    /// If a transfer is already in flight, `on_complete(false)` is called right
    /// away and the in-flight transfer is left untouched. If the transport cannot
    /// connect, `on_complete(false)` is called right away and the client stays
    /// idle. Otherwise the client enters [`TransferState::Sending`] and returns;
    /// `on_complete` fires later from [`tick`](Self::tick).
    pub fn send_http_request_with_deadline(
        &mut self,
        url: &str,
        request: &'a [u8],
        response: &'a mut [u8],
        deadline_ticks: Option<u32>,
        on_complete: F,
    ) {
        if self.state != TransferState::Idle {
            warn!("request to {} rejected: transfer in flight", url);
            self.errors.reset();
            let _ = write!(self.errors, "{}", Error::Busy);
            on_complete(false);
            return;
        }

        self.errors.reset();
        self.outcome = None;
        self.response = None;

        debug!("connecting to {}:{}", url, self.config.port);
        if self.transport.connect(url, self.config.port).is_err() {
            warn!("failed to connect to {}", url);
            let _ = write!(self.errors, "{} {}", Error::ConnectFailed, url);
            self.outcome = Some(Outcome::Failed(Error::ConnectFailed));
            on_complete(false);
            return;
        }

        self.request = request;
        self.sent = 0;
        self.response = Some(BoundedWriter::new(response));
        self.on_complete = Some(on_complete);
        self.ticks = 0;
        self.deadline = deadline_ticks;
        self.state = TransferState::Sending;
        debug!("sending {} bytes to {}", request.len(), url);
    }

    /// Advances the active transfer by at most one chunk of I/O.
    ///
    /// Does nothing while idle. Never blocks.
    pub fn tick(&mut self) {
        if self.state == TransferState::Idle {
            return;
        }

        if let Some(limit) = self.deadline {
            if self.ticks >= limit {
                warn!("transfer timed out after {} ticks", self.ticks);
                self.finish(Outcome::Failed(Error::Timeout));
                return;
            }
        }
        self.ticks = self.ticks.saturating_add(1);

        let step = match self.state {
            TransferState::Idle => Step::Continue,
            TransferState::Sending => self.send_next_chunk(),
            TransferState::Receiving => self.receive_chunk(),
        };
        if let Step::Finish(outcome) = step {
            self.finish(outcome);
        }
    }

    /// Abandons the active transfer, reporting failure through its callback.
    ///
    /// Does nothing while idle.
    pub fn cancel(&mut self) {
        if self.state != TransferState::Idle {
            info!("transfer cancelled");
            self.finish(Outcome::Failed(Error::Cancelled));
        }
    }

    fn send_next_chunk(&mut self) -> Step {
        let chunk = self.config.send_chunk.max(1);
        let request = self.request;
        let remaining = &request[self.sent..];
        let take = remaining.len().min(chunk);

        let accepted = if take == 0 {
            0
        } else {
            match self.transport.print(&remaining[..take]) {
                Ok(n) => n.min(take),
                Err(_) => return Step::Finish(Outcome::Failed(Error::WriteError)),
            }
        };
        self.sent += accepted;
        trace!("sent {} bytes ({} total)", accepted, self.sent);

        if accepted < take {
            // The link is backed up; offer the rest of this chunk next tick.
            return Step::Continue;
        }
        if remaining.len() < chunk {
            debug!("request sent, awaiting response");
            self.state = TransferState::Receiving;
        }
        Step::Continue
    }

    fn receive_chunk(&mut self) -> Step {
        if !self.transport.connected() {
            return Step::Finish(Outcome::Failed(Error::Disconnected));
        }
        let Some(writer) = self.response.as_mut() else {
            return Step::Finish(Outcome::Complete);
        };

        let chunk = self.config.recv_chunk.max(1);
        for _ in 0..chunk {
            if writer.remaining() == 0 {
                return Step::Finish(Outcome::Truncated);
            }
            // A quiet link ends this tick, not the transfer.
            if !self.transport.available() {
                break;
            }
            match self.transport.read() {
                Some(byte) => {
                    writer.push_byte(byte);
                }
                None => {
                    writer.terminate();
                    return Step::Finish(Outcome::Complete);
                }
            }
        }
        trace!("received {} bytes", writer.len());

        if writer.remaining() == 0 {
            Step::Finish(Outcome::Truncated)
        } else {
            Step::Continue
        }
    }

    fn finish(&mut self, outcome: Outcome) {
        self.transport.stop();
        self.state = TransferState::Idle;
        self.outcome = Some(outcome);
        self.errors.reset();

        match outcome {
            Outcome::Complete => {
                info!("transfer complete, {} bytes received", self.response().len());
            }
            Outcome::Truncated => {
                warn!("response truncated at {} bytes", self.response().len());
                self.errors.write_string("response truncated");
            }
            Outcome::Failed(error) => {
                warn!("transfer failed after {} ticks", self.ticks);
                let _ = write!(self.errors, "{}", error);
            }
        }

        if let Some(on_complete) = self.on_complete.take() {
            on_complete(outcome.is_success());
        }
    }

    /// The current transfer state.
    pub fn state(&self) -> TransferState {
        self.state
    }

    /// Whether the transport reports an open connection.
    pub fn is_connected(&self) -> bool {
        self.transport.connected()
    }

    /// Diagnostic text recorded by the most recent transfer attempt.
    pub fn last_error(&self) -> &str {
        self.errors.as_str()
    }

    /// How the most recent transfer ended; `None` while one is in flight or
    /// before the first one.
    pub fn last_outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    /// Bytes of request text pushed so far in the current or last transfer.
    pub fn bytes_sent(&self) -> usize {
        self.sent
    }

    /// Response bytes received in the current or last transfer.
    pub fn response(&self) -> &[u8] {
        match &self.response {
            Some(writer) => writer.written(),
            None => &[],
        }
    }

    /// Hands the response buffer back to the caller once idle.
    ///
    /// Returns `None` while a transfer is in flight or if the buffer was already
    /// taken.
    pub fn take_response(&mut self) -> Option<&'a mut [u8]> {
        if self.state != TransferState::Idle {
            return None;
        }
        self.response.take().map(BoundedWriter::into_inner)
    }

    /// The active configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The wrapped transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Mutable access to the wrapped transport, e.g. for link housekeeping
    /// between transfers.
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Consumes the client and returns the transport.
    pub fn into_transport(self) -> T {
        self.transport
    }
}

impl<T, F> core::fmt::Debug for NetworkClient<'_, T, F> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("NetworkClient")
            .field("state", &self.state)
            .field("sent", &self.sent)
            .field("ticks", &self.ticks)
            .field("outcome", &self.outcome)
            .field("last_error", &self.errors.as_str())
            .finish()
    }
}
