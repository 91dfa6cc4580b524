//! Incremental HTTP/1.1 request composition.

use core::fmt::Write as _;

use heapless::Vec;

use super::buffer::BoundedWriter;
use super::header::{Header, HeaderList};

/// Maximum number of URL query parameters a [`RequestBuilder`] can hold.
pub const MAX_URL_PARAMS: usize = 16;

/// Accumulates one request and serialises it into a caller buffer.
///
/// The builder only borrows the strings it is given; the serialised text is
/// produced by [`write_to_buffer`](Self::write_to_buffer). Setters return `false`
/// when a fixed-capacity list is already full, leaving the builder unchanged.
///
/// # Examples
///
/// ```rust
/// use telenode::network::application::http::RequestBuilder;
///
/// let mut builder = RequestBuilder::new();
/// builder.set_method_and_url("GET", "/update");
/// builder.set_url_param("field1", "21.5000");
/// builder.put_header("Host", "api.example.com");
///
/// let mut buffer = [0u8; 128];
/// let len = builder.write_to_buffer(&mut buffer, false);
/// assert_eq!(
///     &buffer[..len],
///     b"GET /update?field1=21.5000 HTTP/1.1\r\nHost: api.example.com\r\n"
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct RequestBuilder<'a> {
    method: &'a str,
    url: &'a str,
    params: Vec<(&'a str, &'a str), MAX_URL_PARAMS>,
    headers: HeaderList<'a>,
    body: Option<&'a str>,
    end_headers: bool,
}

impl<'a> RequestBuilder<'a> {
    /// Creates an empty builder.
    pub const fn new() -> Self {
        Self {
            method: "",
            url: "",
            params: Vec::new(),
            headers: HeaderList::new(),
            body: None,
            end_headers: false,
        }
    }

    /// Replaces the method and URL path. Parameters, headers and body are kept;
    /// call [`reset`](Self::reset) first for a clean slate.
    pub fn set_method_and_url(&mut self, method: &'a str, url: &'a str) {
        self.method = method;
        self.url = url;
    }

    /// Appends a query parameter. No percent-encoding is applied.
    pub fn set_url_param(&mut self, key: &'a str, value: &'a str) -> bool {
        self.params.push((key, value)).is_ok()
    }

    /// Appends a header.
    pub fn put_header(&mut self, name: &'a str, value: &'a str) -> bool {
        self.headers.push(Header::new(name, value))
    }

    /// Sets the body text, or clears it with `None`.
    pub fn put_body(&mut self, body: Option<&'a str>) {
        self.body = body;
    }

    /// Emit the blank line that closes the header block even when no body is
    /// set. Servers need it to see the end of a body-less request.
    pub fn set_end_headers(&mut self, end_headers: bool) {
        self.end_headers = end_headers;
    }

    /// Clears method, URL, parameters, headers, body and the header terminator.
    pub fn reset(&mut self) {
        self.method = "";
        self.url = "";
        self.params.clear();
        self.headers.clear();
        self.body = None;
        self.end_headers = false;
    }

    /// The request method.
    pub fn method(&self) -> &'a str {
        self.method
    }

    /// The URL path, without parameters.
    pub fn url(&self) -> &'a str {
        self.url
    }

    /// The headers added so far.
    pub fn headers(&self) -> &HeaderList<'a> {
        &self.headers
    }

    /// The body, if one is set.
    pub fn body(&self) -> Option<&'a str> {
        self.body
    }

    /// Serialises the request into `buffer` and returns the number of bytes
    /// written.
    ///
    /// The output is the request line, each header in insertion order, then,
    /// when a body is set, an optional `Content-Length` header, a blank line, the
    /// body and a closing `\r\n`. Without a body the text ends after the last
    /// header line, or after one blank line if
    /// [`set_end_headers`](Self::set_end_headers) is on. Output that does not fit
    /// is cut off at the end of `buffer`.
    pub fn write_to_buffer(&self, buffer: &mut [u8], add_content_length: bool) -> usize {
        let mut writer = BoundedWriter::new(buffer);
        self.serialize(&mut writer, add_content_length);
        writer.len()
    }

    /// Number of bytes [`write_to_buffer`](Self::write_to_buffer) needs to emit
    /// the whole request.
    pub fn encoded_len(&self, add_content_length: bool) -> usize {
        let mut empty: [u8; 0] = [];
        let mut writer = BoundedWriter::new(&mut empty);
        self.serialize(&mut writer, add_content_length);
        writer.attempted()
    }

    fn serialize(&self, w: &mut BoundedWriter<'_>, add_content_length: bool) {
        w.push(self.method.as_bytes());
        w.push(b" ");
        w.push(self.url.as_bytes());
        for (i, (key, value)) in self.params.iter().enumerate() {
            w.push(if i == 0 { b"?" } else { b"&" });
            w.push(key.as_bytes());
            w.push(b"=");
            w.push(value.as_bytes());
        }
        w.push(b" HTTP/1.1\r\n");

        for header in &self.headers {
            w.push(header.name.as_bytes());
            w.push(b": ");
            w.push(header.value.as_bytes());
            w.push(b"\r\n");
        }

        if let Some(body) = self.body {
            if add_content_length {
                // BoundedWriter's fmt::Write never fails.
                let _ = write!(w, "Content-Length: {}\r\n", body.len());
            }
            w.push(b"\r\n");
            w.push(body.as_bytes());
            w.push(b"\r\n");
        } else if self.end_headers {
            w.push(b"\r\n");
        }
    }
}
