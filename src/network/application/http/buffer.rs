//! A bounded cursor over a caller-supplied byte buffer.

use core::fmt;

/// Writes into a borrowed slice and never past its end.
///
/// The writer tracks `(buffer, cursor)` as a value. Bytes that do not fit are
/// dropped and counted, so callers can tell that output was cut short and by
/// how much.
#[derive(Debug)]
pub struct BoundedWriter<'b> {
    buf: &'b mut [u8],
    len: usize,
    dropped: usize,
}

impl<'b> BoundedWriter<'b> {
    /// Starts writing at the beginning of `buf`.
    pub fn new(buf: &'b mut [u8]) -> Self {
        Self {
            buf,
            len: 0,
            dropped: 0,
        }
    }

    /// Appends as much of `bytes` as fits. Returns the number of bytes written.
    pub fn push(&mut self, bytes: &[u8]) -> usize {
        let take = bytes.len().min(self.remaining());
        self.buf[self.len..self.len + take].copy_from_slice(&bytes[..take]);
        self.len += take;
        self.dropped += bytes.len() - take;
        take
    }

    /// Appends a single byte. Returns `false` if the buffer is full.
    pub fn push_byte(&mut self, byte: u8) -> bool {
        self.push(&[byte]) == 1
    }

    /// Writes a NUL after the data if there is room, without counting it.
    pub fn terminate(&mut self) {
        if let Some(slot) = self.buf.get_mut(self.len) {
            *slot = 0;
        }
    }

    /// Bytes written so far.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Room left before the end of the buffer.
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.len
    }

    /// Total size of the underlying buffer.
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Returns `true` if any write was cut short.
    pub fn overflowed(&self) -> bool {
        self.dropped > 0
    }

    /// Bytes that would have been written given unlimited room.
    pub fn attempted(&self) -> usize {
        self.len + self.dropped
    }

    /// The bytes written so far.
    pub fn written(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    /// Gives the whole underlying buffer back.
    pub fn into_inner(self) -> &'b mut [u8] {
        self.buf
    }
}

impl fmt::Write for BoundedWriter<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.push(s.as_bytes());
        Ok(())
    }
}
