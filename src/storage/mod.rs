//! # Local storage interface
//!
//! A telemetry node keeps a local copy of every reading it uploads, typically on
//! an SD card. This module defines the narrow file interface the rest of the
//! crate needs from such a medium, and the daily CSV log built on it.
//!
//! The interface is deliberately small: existence checks, directory creation,
//! open, write, read, close. Anything a FAT driver or a host file system offers
//! beyond that is not used.
//!
//! # Usage Examples
//!
//! ```rust
//! use telenode::storage::{LocalStorage, OpenMode};
//!
//! fn append_line<S: LocalStorage>(storage: &mut S, path: &str, line: &str) -> Result<(), telenode::storage::error::Error> {
//!     let handle = storage.open(path, OpenMode::Append)?;
//!     storage.write(handle, line)?;
//!     storage.close(handle)
//! }
//! ```

#![deny(unsafe_code)]

/// Common error types for storage operations
pub mod error;

/// One CSV file of readings per day.
pub mod csv;


use error::Error;

/// Re-exports of common items for convenient importing
pub mod prelude {
    pub use super::csv::{DailyCsvLog, Timestamp};
    pub use super::{LocalStorage, OpenMode};
}

/// How [`LocalStorage::open`] should treat the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    /// Open an existing file for reading from the start.
    Read,
    /// Open for writing at the end, creating the file if it is missing.
    Append,
    /// Create the file, discarding any previous contents.
    Create,
}

/// File access on a local storage medium.
///
/// Handles are small copyable tokens owned by the implementation. A handle is
/// valid from [`open`](Self::open) until [`close`](Self::close).
pub trait LocalStorage {
    /// Token identifying an open file.
    type Handle: Copy;

    /// Whether a file exists at `path`.
    fn file_exists(&mut self, path: &str) -> bool;

    /// Whether a directory exists at `path`.
    fn directory_exists(&mut self, path: &str) -> bool;

    /// Create a directory at `path`.
    fn mkdir(&mut self, path: &str) -> Result<(), Error>;

    /// Open the file at `path`.
    fn open(&mut self, path: &str, mode: OpenMode) -> Result<Self::Handle, Error>;

    /// Append `text` to an open file.
    fn write(&mut self, handle: Self::Handle, text: &str) -> Result<(), Error>;

    /// Read up to `buf.len()` bytes; `Ok(0)` at end of file.
    fn read(&mut self, handle: Self::Handle, buf: &mut [u8]) -> Result<usize, Error>;

    /// Close an open file.
    fn close(&mut self, handle: Self::Handle) -> Result<(), Error>;

    /// Read the whole file at `path` into `buf`, returning the bytes read.
    ///
    /// Fails with [`Error::TooLong`] if the file does not fit.
    fn read_to_buffer(&mut self, path: &str, buf: &mut [u8]) -> Result<usize, Error> {
        let handle = self.open(path, OpenMode::Read)?;
        let mut total = 0;
        let result = loop {
            if total == buf.len() {
                let mut extra = [0u8; 1];
                match self.read(handle, &mut extra) {
                    Ok(0) => break Ok(total),
                    Ok(_) => break Err(Error::TooLong),
                    Err(e) => break Err(e),
                }
            }
            match self.read(handle, &mut buf[total..]) {
                Ok(0) => break Ok(total),
                Ok(n) => total += n,
                Err(e) => break Err(e),
            }
        };
        self.close(handle)?;
        result
    }
}
