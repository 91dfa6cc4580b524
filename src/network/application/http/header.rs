//! HTTP header name/value pairs and the fixed-capacity list that holds them.

use heapless::Vec;

/// Maximum number of headers a [`HeaderList`] can hold.
pub const MAX_HEADERS: usize = 16;

/// A single `Name: Value` header.
///
/// Both halves borrow from elsewhere: from the caller's strings when a request is
/// being composed, or from the received buffer when a response is parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header<'a> {
    /// Header name, e.g. `Content-Type`.
    pub name: &'a str,
    /// Header value, e.g. `text/html`.
    pub value: &'a str,
}

impl<'a> Header<'a> {
    /// Creates a header from its parts.
    pub const fn new(name: &'a str, value: &'a str) -> Self {
        Self { name, value }
    }

    /// Parses a `Name: Value` line.
    ///
    /// The line is split at the first colon. At most one space after the colon is
    /// skipped, and a trailing `\r` is ignored. Returns `None` when there is no
    /// colon, or when the name or the value is empty once trimmed.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use telenode::network::application::http::Header;
    ///
    /// let header = Header::from_line("Content-Length: 48").unwrap();
    /// assert!(header.matches_name("content-length"));
    /// assert_eq!(header.value, "48");
    ///
    /// assert!(Header::from_line("no separator here").is_none());
    /// ```
    pub fn from_line(line: &'a str) -> Option<Self> {
        let line = line.strip_suffix('\r').unwrap_or(line);
        let (name, value) = line.split_once(':')?;
        let value = value.strip_prefix(' ').unwrap_or(value);

        if name.trim().is_empty() || value.trim().is_empty() {
            return None;
        }
        Some(Self { name, value })
    }

    /// Case-insensitive comparison against `name`.
    pub fn matches_name(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }
}

/// An ordered, fixed-capacity collection of headers.
///
/// Insertion order is preserved and lookups return the first header whose name
/// matches case-insensitively.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderList<'a> {
    headers: Vec<Header<'a>, MAX_HEADERS>,
}

impl<'a> HeaderList<'a> {
    /// Creates an empty list.
    pub const fn new() -> Self {
        Self {
            headers: Vec::new(),
        }
    }

    /// Appends a header. Returns `false` and leaves the list unchanged when it
    /// is already full.
    pub fn push(&mut self, header: Header<'a>) -> bool {
        self.headers.push(header).is_ok()
    }

    /// The header at `index`, in insertion order.
    pub fn get(&self, index: usize) -> Option<&Header<'a>> {
        self.headers.get(index)
    }

    /// The first header named `name`, compared case-insensitively.
    pub fn find(&self, name: &str) -> Option<&Header<'a>> {
        self.headers.iter().find(|h| h.matches_name(name))
    }

    /// Value of the first header named `name`.
    pub fn value(&self, name: &str) -> Option<&'a str> {
        self.find(name).map(|h| h.value)
    }

    /// Number of headers held.
    pub fn len(&self) -> usize {
        self.headers.len()
    }

    /// Returns `true` if the list holds no headers.
    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    /// Returns `true` if no more headers can be added.
    pub fn is_full(&self) -> bool {
        self.headers.is_full()
    }

    /// Removes every header.
    pub fn clear(&mut self) {
        self.headers.clear();
    }

    /// Iterates over the headers in insertion order.
    pub fn iter(&self) -> core::slice::Iter<'_, Header<'a>> {
        self.headers.iter()
    }
}

impl<'l, 'a> IntoIterator for &'l HeaderList<'a> {
    type Item = &'l Header<'a>;
    type IntoIter = core::slice::Iter<'l, Header<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
