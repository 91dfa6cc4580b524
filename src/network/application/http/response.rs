//! Parsing of a fully received HTTP response.

use super::header::{Header, HeaderList};

/// A read-only view over a received response buffer.
///
/// Parsing never fails. A malformed status line leaves version, status and
/// reason at zero/empty; header lines without a colon (or with an empty name or
/// value) are skipped; headers beyond [`MAX_HEADERS`](super::header::MAX_HEADERS)
/// are ignored. Scanning stops at the first NUL byte, so a buffer terminated by
/// the network client can be passed in whole.
///
/// # Examples
///
/// ```rust
/// use telenode::network::application::http::ResponseParser;
///
/// let response = ResponseParser::parse(b"HTTP/1.0 200 OK\r\nContent-Length:100\r\n");
///
/// assert_eq!(response.version(), 10);
/// assert_eq!(response.status(), 200);
/// assert_eq!(response.reason(), "OK");
/// assert_eq!(response.header_count(), 1);
/// assert_eq!(response.header_value("content-length"), Some("100"));
/// assert_eq!(response.header_value("Server"), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseParser<'a> {
    version: u16,
    status: u16,
    reason: &'a str,
    headers: HeaderList<'a>,
    body: &'a [u8],
}

impl<'a> ResponseParser<'a> {
    /// Parses the status line and headers of `buffer`.
    pub fn parse(buffer: &'a [u8]) -> Self {
        let data = match buffer.iter().position(|&b| b == 0) {
            Some(end) => &buffer[..end],
            None => buffer,
        };

        let mut parser = Self {
            version: 0,
            status: 0,
            reason: "",
            headers: HeaderList::new(),
            body: &[],
        };

        let mut lines = Lines { data, pos: 0 };

        if let Some(status_line) = lines.next() {
            parser.parse_status_line(status_line);
        }

        while let Some(line) = lines.next() {
            if line.is_empty() {
                parser.body = &data[lines.pos..];
                break;
            }
            let Ok(line) = core::str::from_utf8(line) else {
                continue;
            };
            if let Some(header) = Header::from_line(line) {
                // Headers past capacity are dropped.
                let _ = parser.headers.push(header);
            }
        }

        parser
    }

    fn parse_status_line(&mut self, line: &'a [u8]) {
        let Ok(line) = core::str::from_utf8(line) else {
            return;
        };
        let mut parts = line.splitn(3, ' ');

        let version = parts
            .next()
            .and_then(|proto| proto.strip_prefix("HTTP/"))
            .and_then(|v| v.split_once('.'))
            .and_then(|(major, minor)| {
                let major: u16 = major.parse().ok()?;
                let minor: u16 = minor.parse().ok()?;
                major.checked_mul(10)?.checked_add(minor)
            });
        let Some(version) = version else {
            return;
        };
        let Some(status) = parts.next().and_then(|code| code.parse::<u16>().ok()) else {
            return;
        };

        self.version = version;
        self.status = status;
        self.reason = parts.next().unwrap_or("").trim();
    }

    /// Protocol version times ten: `HTTP/1.0` gives 10, `HTTP/1.1` gives 11.
    pub fn version(&self) -> u16 {
        self.version
    }

    /// Numeric status code, or 0 if the status line was malformed.
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Reason phrase following the status code.
    pub fn reason(&self) -> &'a str {
        self.reason
    }

    /// Number of headers parsed.
    pub fn header_count(&self) -> usize {
        self.headers.len()
    }

    /// The header at `index`, in the order received.
    pub fn header_by_index(&self, index: usize) -> Option<&Header<'a>> {
        self.headers.get(index)
    }

    /// The first header named `name`, compared case-insensitively.
    pub fn find_header(&self, name: &str) -> Option<&Header<'a>> {
        self.headers.find(name)
    }

    /// Value of the first header named `name`.
    pub fn header_value(&self, name: &str) -> Option<&'a str> {
        self.headers.value(name)
    }

    /// All parsed headers.
    pub fn headers(&self) -> &HeaderList<'a> {
        &self.headers
    }

    /// Bytes after the blank line ending the headers; empty if there was none.
    pub fn body(&self) -> &'a [u8] {
        self.body
    }

    /// The `Content-Length` header as a number.
    pub fn content_length(&self) -> Option<usize> {
        self.header_value("Content-Length")?.trim().parse().ok()
    }
}

/// Splits on `\n`, dropping a trailing `\r` from each line.
struct Lines<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Iterator for Lines<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.data.len() {
            return None;
        }
        let rest = &self.data[self.pos..];
        let (line, advance) = match rest.iter().position(|&b| b == b'\n') {
            Some(nl) => (&rest[..nl], nl + 1),
            None => (rest, rest.len()),
        };
        self.pos += advance;
        Some(line.strip_suffix(b"\r").unwrap_or(line))
    }
}
