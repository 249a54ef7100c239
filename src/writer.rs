use hyper::{HeaderMap, StatusCode};

/// Decoupled response sink so middleware can wrap writes without caring
/// whether it is writing straight to the eventual `hyper::Response` or into
/// another decorator, guarding against a double `write_status` call along
/// the way.
pub trait ResponseSink {
    fn write_status(&mut self, status: StatusCode);
    fn write_header(&mut self, name: hyper::header::HeaderName, value: hyper::header::HeaderValue);
    fn write_body(&mut self, chunk: &[u8]);
    fn status(&self) -> Option<StatusCode>;

    /// Forwards flush capability to the underlying sink when it has one.
    /// Most sinks buffer in memory and have nothing to flush, so the
    /// default is a no-op; a decorator wrapping a real streaming sink
    /// overrides this to actually push bytes downstream.
    fn flush(&mut self) {}
}

/// The concrete sink every request ultimately writes into. Accumulates a
/// status, header map and body buffer that [`crate::router`] converts into
/// a real `hyper::Response<B>` once the middleware chain has unwound.
///
/// Calling `write_status` more than once is a no-op after the first call,
/// satisfying the "never call WriteHeader twice" rule handlers and
/// middleware both rely on.
pub struct ResponseWriter {
    status: StatusCode,
    headers: HeaderMap,
    body: Vec<u8>,
    status_written: bool,
}

impl ResponseWriter {
    pub fn new() -> ResponseWriter {
        ResponseWriter {
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            body: Vec::new(),
            status_written: false,
        }
    }

    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn set_body(&mut self, body: Vec<u8>) {
        self.body = body;
    }

    /// The status actually written, or `200 OK` if nothing wrote one yet,
    /// the default a bare `write_body` call without `write_status` implies.
    pub fn status_code_or_default(&self) -> StatusCode {
        self.status
    }

    pub fn bytes_written(&self) -> usize {
        self.body.len()
    }

    pub fn into_parts(self) -> (StatusCode, HeaderMap, Vec<u8>) {
        (self.status, self.headers, self.body)
    }
}

impl Default for ResponseWriter {
    fn default() -> Self {
        ResponseWriter::new()
    }
}

impl ResponseSink for ResponseWriter {
    fn write_status(&mut self, status: StatusCode) {
        if !self.status_written {
            self.status = status;
            self.status_written = true;
        }
    }

    fn write_header(&mut self, name: hyper::header::HeaderName, value: hyper::header::HeaderValue) {
        self.headers.insert(name, value);
    }

    fn write_body(&mut self, chunk: &[u8]) {
        self.body.extend_from_slice(chunk);
    }

    fn status(&self) -> Option<StatusCode> {
        if self.status_written {
            Some(self.status)
        } else {
            None
        }
    }
}

/// Wraps any `ResponseSink`, recording the first status written and the
/// total byte count without changing write semantics. This is what
/// logging, ETag or byte-counting middleware wrap their downstream writer
/// in.
pub struct RecordingSink<'a> {
    inner: &'a mut dyn ResponseSink,
    first_status: Option<StatusCode>,
    bytes_written: usize,
}

impl<'a> RecordingSink<'a> {
    pub fn new(inner: &'a mut dyn ResponseSink) -> RecordingSink<'a> {
        RecordingSink {
            inner,
            first_status: None,
            bytes_written: 0,
        }
    }

    pub fn status_code(&self) -> Option<StatusCode> {
        self.first_status
    }

    pub fn bytes_written(&self) -> usize {
        self.bytes_written
    }
}

impl<'a> ResponseSink for RecordingSink<'a> {
    fn write_status(&mut self, status: StatusCode) {
        if self.first_status.is_none() {
            self.first_status = Some(status);
            self.inner.write_status(status);
        }
    }

    fn write_header(&mut self, name: hyper::header::HeaderName, value: hyper::header::HeaderValue) {
        self.inner.write_header(name, value);
    }

    fn write_body(&mut self, chunk: &[u8]) {
        self.bytes_written += chunk.len();
        self.inner.write_body(chunk);
    }

    fn status(&self) -> Option<StatusCode> {
        self.first_status
    }

    fn flush(&mut self) {
        self.inner.flush();
    }
}
