//! Common error types for network operations

use core::fmt;

/// A common error type for network operations.
///
/// This enum defines the failures a transfer or a transport can report. It is
/// designed to be simple and portable for `no_std` environments. The
/// [`Display`](core::fmt::Display) implementation yields the diagnostic text that
/// the HTTP client appends to its error accumulator.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Error {
    /// A new request was started while another one was still in flight.
    Busy,
    /// The transport could not open a connection to the remote host.
    ConnectFailed,
    /// The transport dropped the connection in the middle of a transfer.
    Disconnected,
    /// The transfer did not finish within its tick deadline.
    Timeout,
    /// The transfer was abandoned by the caller.
    Cancelled,
    /// An operation was attempted on a connection that is not open.
    NotOpen,
    /// An error occurred during a write operation.
    WriteError,
    /// An invalid address was provided.
    InvalidAddress,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Error::Busy => "already connected to a client",
            Error::ConnectFailed => "failed to connect to",
            Error::Disconnected => "client disconnected",
            Error::Timeout => "timed out",
            Error::Cancelled => "transfer cancelled",
            Error::NotOpen => "connection not open",
            Error::WriteError => "failed to send",
            Error::InvalidAddress => "invalid address",
        };
        f.write_str(text)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Error {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Error::Busy => defmt::write!(f, "Busy"),
            Error::ConnectFailed => defmt::write!(f, "ConnectFailed"),
            Error::Disconnected => defmt::write!(f, "Disconnected"),
            Error::Timeout => defmt::write!(f, "Timeout"),
            Error::Cancelled => defmt::write!(f, "Cancelled"),
            Error::NotOpen => defmt::write!(f, "NotOpen"),
            Error::WriteError => defmt::write!(f, "WriteError"),
            Error::InvalidAddress => defmt::write!(f, "InvalidAddress"),
        }
    }
}

/// How the most recent transfer ended.
///
/// The completion callback only sees a `bool`; this type keeps the detail.
/// [`Outcome::Truncated`] counts as success: the response filled the caller's
/// buffer before the remote end finished sending.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Outcome {
    /// The response was received up to end-of-stream.
    Complete,
    /// The response buffer filled before end-of-stream.
    Truncated,
    /// The transfer failed.
    Failed(Error),
}

impl Outcome {
    /// Returns `true` for [`Outcome::Complete`] and [`Outcome::Truncated`].
    pub fn is_success(&self) -> bool {
        !matches!(self, Outcome::Failed(_))
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Outcome {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Outcome::Complete => defmt::write!(f, "Complete"),
            Outcome::Truncated => defmt::write!(f, "Truncated"),
            Outcome::Failed(e) => defmt::write!(f, "Failed({})", e),
        }
    }
}
