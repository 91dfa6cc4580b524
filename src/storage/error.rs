//! Common error types for storage operations

/// A common error type for local file storage.
///
/// This enum defines the errors a [`LocalStorage`](super::LocalStorage)
/// implementation or the data log built on it can report. It is designed to be
/// simple and portable for `no_std` environments.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Error {
    /// The file or directory does not exist.
    NotFound,
    /// The file could not be opened or created.
    OpenFailed,
    /// An error occurred during a write operation.
    WriteError,
    /// An error occurred during a read operation.
    ReadError,
    /// The handle does not refer to an open file.
    InvalidHandle,
    /// A path or line did not fit its fixed-size buffer.
    TooLong,
    /// The card or medium is missing or unusable.
    StorageFault,
}

#[cfg(feature = "defmt")]
impl defmt::Format for Error {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Error::NotFound => defmt::write!(f, "NotFound"),
            Error::OpenFailed => defmt::write!(f, "OpenFailed"),
            Error::WriteError => defmt::write!(f, "WriteError"),
            Error::ReadError => defmt::write!(f, "ReadError"),
            Error::InvalidHandle => defmt::write!(f, "InvalidHandle"),
            Error::TooLong => defmt::write!(f, "TooLong"),
            Error::StorageFault => defmt::write!(f, "StorageFault"),
        }
    }
}
