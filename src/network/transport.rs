//! The transport capability and its concrete variants.
//!
//! [`Transport`] is the minimal, non-blocking socket-like interface the HTTP
//! [`NetworkClient`](crate::network::application::http::client::NetworkClient)
//! drives one small step at a time. It mirrors what serial modem client
//! libraries usually expose: connect, push some bytes, ask whether data is
//! waiting, pull one byte, ask whether the link is still up, close.
//!
//! Two variants ship with the crate:
//!
//! - [`ConnectorTransport`] wraps any [`Connect`] implementation (a cellular
//!   modem driver, an embedded TCP/IP stack, a test double) and stages received
//!   bytes in a fixed-size ring.
//! - `TcpTransport` (feature `std`) runs over a non-blocking
//!   `std::net::TcpStream`, for gateways and host-side testing.
//!
//! The variant is chosen when the client is constructed; the client itself only
//! depends on the trait.

use core::fmt::Write as _;

use heapless::{Deque, String};

use super::error::Error;
use super::{Close, Connect, Read, Write};

/// Default HTTP port for the plaintext transfers this crate performs.
pub const HTTP_PORT: u16 = 80;

/// Longest `host:port` string a [`ConnectorTransport`] will format.
pub const MAX_REMOTE_LEN: usize = 128;

/// A minimal non-blocking socket.
///
/// None of these methods may block for longer than it takes to hand bytes to
/// the underlying driver.
pub trait Transport {
    /// Associated error type
    type Error: core::fmt::Debug;

    /// Open a connection to `host` on `port`.
    fn connect(&mut self, host: &str, port: u16) -> Result<(), Self::Error>;

    /// Push as much of `bytes` to the remote end as the link takes right now.
    ///
    /// Returns the number of leading bytes accepted, which may be anything from
    /// zero to `bytes.len()`. The caller offers the rest again later.
    fn print(&mut self, bytes: &[u8]) -> Result<usize, Self::Error>;

    /// Whether the connection is still usable.
    ///
    /// A transport that has been closed by the remote end but still holds unread
    /// bytes reports `true` until those bytes have been read.
    fn connected(&self) -> bool;

    /// Whether a byte or the end of the stream can be read right now.
    ///
    /// A link that has merely gone quiet reports `false`.
    fn available(&mut self) -> bool;

    /// Pull one byte. `None` is the end marker: nothing more this call.
    ///
    /// After [`available`](Self::available) returned `true`, `None` means the
    /// remote end has finished sending.
    fn read(&mut self) -> Option<u8>;

    /// Close the connection and drop any staged bytes.
    fn stop(&mut self);
}

/// Adapts a [`Connect`] implementation to the [`Transport`] capability.
///
/// Received bytes are staged in a ring of `RX` bytes so that the byte-at-a-time
/// [`Transport::read`] does not issue one driver call per byte. A connection
/// read returning `Ok(0)` leaves the transport quiet but open. A read error is
/// treated as a dropped link. If data had already arrived on that connection,
/// the drop is first reported as the end marker from [`Transport::read`], so a
/// close-delimited response can still complete.
///
/// # Examples
///
/// ```rust
/// use telenode::network::transport::{ConnectorTransport, Transport};
/// use telenode::network::{Close, Connect, Connection, Read, Write};
///
/// struct Loopback;
/// impl Read for Loopback {
///     type Error = ();
///     fn read(&mut self, buf: &mut [u8]) -> Result<usize, ()> {
///         buf[..2].copy_from_slice(b"OK");
///         Ok(2)
///     }
/// }
/// impl Write for Loopback {
///     type Error = ();
///     fn write(&mut self, buf: &[u8]) -> Result<usize, ()> { Ok(buf.len()) }
///     fn flush(&mut self) -> Result<(), ()> { Ok(()) }
/// }
/// impl Close for Loopback {
///     type Error = ();
///     fn close(self) -> Result<(), ()> { Ok(()) }
/// }
/// impl Connection for Loopback {}
///
/// struct Modem;
/// impl Connect for Modem {
///     type Connection = Loopback;
///     type Error = ();
///     fn connect(&mut self, _remote: &str) -> Result<Loopback, ()> { Ok(Loopback) }
/// }
///
/// let mut transport: ConnectorTransport<Modem> = ConnectorTransport::new(Modem);
/// transport.connect("example.com", 80).unwrap();
/// assert!(transport.available());
/// assert_eq!(transport.read(), Some(b'O'));
/// ```
pub struct ConnectorTransport<N: Connect, const RX: usize = 64> {
    connector: N,
    connection: Option<N::Connection>,
    rx: Deque<u8, RX>,
    received_any: bool,
    hangup: bool,
}

impl<N: Connect, const RX: usize> ConnectorTransport<N, RX> {
    /// Wraps `connector`; no connection is opened until [`Transport::connect`].
    pub fn new(connector: N) -> Self {
        Self {
            connector,
            connection: None,
            rx: Deque::new(),
            received_any: false,
            hangup: false,
        }
    }

    /// Gives back the wrapped connector, closing any open connection.
    pub fn into_inner(mut self) -> N {
        self.stop();
        self.connector
    }

    /// Moves whatever the connection has ready into the staging ring.
    fn fill(&mut self) {
        let free = RX - self.rx.len();
        if free == 0 {
            return;
        }
        let Some(connection) = self.connection.as_mut() else {
            return;
        };

        let mut chunk = [0u8; RX];
        match connection.read(&mut chunk[..free]) {
            Ok(n) => {
                for &byte in &chunk[..n] {
                    // `n <= free`, so the ring cannot overflow here.
                    let _ = self.rx.push_back(byte);
                }
            }
            Err(_) => {
                warn!("connection read failed, dropping link");
                self.teardown();
                self.hangup = self.received_any;
            }
        }
    }

    fn teardown(&mut self) {
        if let Some(connection) = self.connection.take() {
            if connection.close().is_err() {
                debug!("connection close reported an error");
            }
        }
    }
}

impl<N: Connect, const RX: usize> core::fmt::Debug for ConnectorTransport<N, RX> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ConnectorTransport")
            .field("open", &self.connection.is_some())
            .field("staged", &self.rx.len())
            .field("hangup", &self.hangup)
            .finish()
    }
}

impl<N: Connect, const RX: usize> Transport for ConnectorTransport<N, RX> {
    type Error = Error;

    fn connect(&mut self, host: &str, port: u16) -> Result<(), Self::Error> {
        self.stop();

        let mut remote: String<MAX_REMOTE_LEN> = String::new();
        write!(remote, "{}:{}", host, port).map_err(|_| Error::InvalidAddress)?;

        let connection = self
            .connector
            .connect(&remote)
            .map_err(|_| Error::ConnectFailed)?;
        self.connection = Some(connection);
        Ok(())
    }

    fn print(&mut self, bytes: &[u8]) -> Result<usize, Self::Error> {
        let connection = self.connection.as_mut().ok_or(Error::NotOpen)?;

        let mut sent = 0;
        while sent < bytes.len() {
            match connection.write(&bytes[sent..]) {
                // Driver buffer full; the rest goes out on a later call.
                Ok(0) => break,
                Ok(n) => sent += n.min(bytes.len() - sent),
                Err(_) => return Err(Error::WriteError),
            }
        }
        if sent > 0 {
            connection.flush().map_err(|_| Error::WriteError)?;
        }
        Ok(sent)
    }

    fn connected(&self) -> bool {
        self.connection.is_some() || !self.rx.is_empty() || self.hangup
    }

    fn available(&mut self) -> bool {
        if self.rx.is_empty() {
            self.fill();
        }
        !self.rx.is_empty() || self.hangup
    }

    fn read(&mut self) -> Option<u8> {
        if self.rx.is_empty() {
            self.fill();
        }
        match self.rx.pop_front() {
            Some(byte) => {
                self.received_any = true;
                Some(byte)
            }
            None => {
                self.hangup = false;
                None
            }
        }
    }

    fn stop(&mut self) {
        self.teardown();
        self.rx.clear();
        self.received_any = false;
        self.hangup = false;
    }
}

#[cfg(feature = "std")]
pub use self::tcp::TcpTransport;

#[cfg(feature = "std")]
mod tcp {
    use std::io::{ErrorKind, Read as _, Write as _};
    use std::net::TcpStream;

    use super::Transport;

    const RX_BUFFER: usize = 256;

    /// A [`Transport`] over a non-blocking `std::net::TcpStream`.
    ///
    /// Connecting blocks until the TCP handshake finishes; everything after that
    /// is non-blocking. A full send buffer makes [`Transport::print`] accept
    /// fewer bytes than offered. An orderly close by the remote end counts as
    /// available input: it is reported through [`Transport::read`] returning
    /// `None` first, and only then through [`Transport::connected`].
    #[derive(Debug)]
    pub struct TcpTransport {
        stream: Option<TcpStream>,
        rx: [u8; RX_BUFFER],
        head: usize,
        tail: usize,
        eof: bool,
        eof_reported: bool,
    }

    impl Default for TcpTransport {
        fn default() -> Self {
            Self::new()
        }
    }

    impl TcpTransport {
        /// Creates an unconnected transport.
        pub fn new() -> Self {
            Self {
                stream: None,
                rx: [0; RX_BUFFER],
                head: 0,
                tail: 0,
                eof: false,
                eof_reported: false,
            }
        }

        fn staged(&self) -> usize {
            self.tail - self.head
        }

        fn fill(&mut self) {
            if self.staged() > 0 || self.eof {
                return;
            }
            let Some(stream) = self.stream.as_mut() else {
                return;
            };
            self.head = 0;
            self.tail = 0;
            match stream.read(&mut self.rx) {
                Ok(0) => self.eof = true,
                Ok(n) => self.tail = n,
                Err(e) if e.kind() == ErrorKind::WouldBlock => {}
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(_) => {
                    warn!("tcp read failed, dropping link");
                    self.stream = None;
                }
            }
        }
    }

    impl Transport for TcpTransport {
        type Error = std::io::Error;

        fn connect(&mut self, host: &str, port: u16) -> Result<(), Self::Error> {
            self.stop();
            let stream = TcpStream::connect((host, port))?;
            stream.set_nonblocking(true)?;
            stream.set_nodelay(true)?;
            self.stream = Some(stream);
            Ok(())
        }

        fn print(&mut self, bytes: &[u8]) -> Result<usize, Self::Error> {
            let stream = self
                .stream
                .as_mut()
                .ok_or_else(|| std::io::Error::from(ErrorKind::NotConnected))?;

            let mut sent = 0;
            while sent < bytes.len() {
                match stream.write(&bytes[sent..]) {
                    Ok(0) => return Err(ErrorKind::WriteZero.into()),
                    Ok(n) => sent += n,
                    Err(e) if e.kind() == ErrorKind::WouldBlock => break,
                    Err(e) if e.kind() == ErrorKind::Interrupted => {}
                    Err(e) => return Err(e),
                }
            }
            Ok(sent)
        }

        fn connected(&self) -> bool {
            self.stream.is_some() && !self.eof_reported
        }

        fn available(&mut self) -> bool {
            self.fill();
            self.staged() > 0 || (self.eof && !self.eof_reported)
        }

        fn read(&mut self) -> Option<u8> {
            self.fill();
            if self.staged() == 0 {
                if self.eof {
                    self.eof_reported = true;
                }
                return None;
            }
            let byte = self.rx[self.head];
            self.head += 1;
            Some(byte)
        }

        fn stop(&mut self) {
            if let Some(stream) = self.stream.take() {
                let _ = stream.shutdown(std::net::Shutdown::Both);
            }
            self.head = 0;
            self.tail = 0;
            self.eof = false;
            self.eof_reported = false;
        }
    }
}
