//! Bounded diagnostic string builder.
//!
//! [`ErrorAccumulator`] concatenates message fragments into a fixed-capacity
//! buffer. Writes that do not fit are cut at the last whole character that does;
//! once the buffer is full every further write is a no-op. Nothing is ever
//! written past the declared capacity.
//!
//! # Examples
//!
//! ```rust
//! use core::fmt::Write;
//! use telenode::network::accumulator::ErrorAccumulator;
//!
//! let mut acc: ErrorAccumulator<16> = ErrorAccumulator::new();
//! acc.write_string("failed to connect to ");
//! write!(acc, "{}", "api.example.com").unwrap();
//!
//! assert_eq!(acc.as_str(), "failed to connec");
//! assert!(acc.is_full());
//! ```

use core::fmt;
use heapless::String;

/// Maximum length of the diagnostic text kept by the HTTP client.
pub const MAX_ERROR_LEN: usize = 256;

/// A fixed-capacity, silently truncating string builder.
#[derive(Debug, Clone, Default)]
pub struct ErrorAccumulator<const N: usize> {
    buffer: String<N>,
}

impl<const N: usize> ErrorAccumulator<N> {
    /// Creates an empty accumulator.
    pub const fn new() -> Self {
        Self {
            buffer: String::new(),
        }
    }

    /// Rewinds the write cursor to the start, discarding previous text.
    pub fn reset(&mut self) {
        self.buffer.clear();
    }

    /// Appends as much of `fragment` as fits in the remaining capacity.
    ///
    /// Returns the number of bytes actually appended.
    pub fn write_string(&mut self, fragment: &str) -> usize {
        let room = N - self.buffer.len();
        let mut take = fragment.len().min(room);
        while !fragment.is_char_boundary(take) {
            take -= 1;
        }
        // `take` is a char boundary within the remaining capacity.
        let _ = self.buffer.push_str(&fragment[..take]);
        take
    }

    /// The text accumulated since the last [`reset`](Self::reset).
    pub fn as_str(&self) -> &str {
        self.buffer.as_str()
    }

    /// Number of bytes currently held.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Returns `true` if nothing has been written since the last reset.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Returns `true` once the buffer has no room left.
    pub fn is_full(&self) -> bool {
        self.buffer.len() == N
    }

    /// Declared capacity in bytes.
    pub const fn capacity(&self) -> usize {
        N
    }
}

impl<const N: usize> fmt::Write for ErrorAccumulator<N> {
    /// Never fails: overflowing text is dropped, matching [`write_string`](ErrorAccumulator::write_string).
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.write_string(s);
        Ok(())
    }
}
