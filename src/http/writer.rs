use bytes::{BufMut, Bytes, BytesMut};

use crate::http::response::Response;

const HTTP_VERSION: &str = "HTTP/1.1";
const CONTENT_LENGTH: &str = "Content-length";

/// Renders `resp` into the bytes sent on the wire.
///
/// `Content-length` is always computed from the body; a header of that
/// name set by a handler is skipped. Cookies are not serialized.
pub fn serialize_response(resp: &Response) -> Bytes {
    let mut buf = BytesMut::with_capacity(128 + resp.body.len());

    // Status line
    let code = resp.code.unwrap_or(200);
    match resp.status.as_deref() {
        Some(text) if !text.is_empty() => {
            buf.put_slice(format!("{HTTP_VERSION} {code} {text}\r\n").as_bytes())
        }
        _ => buf.put_slice(format!("{HTTP_VERSION} {code}\r\n").as_bytes()),
    }

    for (k, v) in &resp.headers {
        if k.eq_ignore_ascii_case(CONTENT_LENGTH) {
            continue;
        }
        buf.put_slice(k.as_bytes());
        buf.put_slice(b": ");
        buf.put_slice(v.as_bytes());
        buf.put_slice(b"\r\n");
    }

    buf.put_slice(format!("{CONTENT_LENGTH}: {}\r\n\r\n", resp.body.len()).as_bytes());
    buf.put_slice(&resp.body);

    buf.freeze()
}

/// A serialized response plus a cursor over the bytes already flushed.
pub struct ResponseWriter {
    buffer: Bytes,
    written: usize,
}

impl ResponseWriter {
    pub fn new(response: &Response) -> Self {
        Self {
            buffer: serialize_response(response),
            written: 0,
        }
    }

    /// The part of the response not yet handed to the socket.
    pub fn remaining(&self) -> &[u8] {
        &self.buffer[self.written..]
    }

    pub fn advance(&mut self, n: usize) {
        self.written = (self.written + n).min(self.buffer.len());
    }

    pub fn is_complete(&self) -> bool {
        self.written == self.buffer.len()
    }

    pub fn written(&self) -> usize {
        self.written
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}
