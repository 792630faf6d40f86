use std::collections::HashMap;

/// Name of the content type header, spelled the way it goes on the wire.
pub const CONTENT_TYPE: &str = "Content-type";

/// HTTP status codes the server and its helpers produce.
///
/// Handlers are not limited to these; [`Response::set_code`] accepts any code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 200 OK
    Ok,
    /// 201 Created
    Created,
    /// 204 No Content
    NoContent,
    /// 303 See Other
    SeeOther,
    /// 400 Bad Request
    BadRequest,
    /// 403 Forbidden
    Forbidden,
    /// 404 Not Found
    NotFound,
    /// 405 Method Not Allowed
    MethodNotAllowed,
    /// 500 Internal Server Error
    InternalServerError,
}

impl StatusCode {
    const ALL: [StatusCode; 9] = [
        StatusCode::Ok,
        StatusCode::Created,
        StatusCode::NoContent,
        StatusCode::SeeOther,
        StatusCode::BadRequest,
        StatusCode::Forbidden,
        StatusCode::NotFound,
        StatusCode::MethodNotAllowed,
        StatusCode::InternalServerError,
    ];

    /// Returns the numeric HTTP status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use beacon::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.as_u16(), 200);
    /// assert_eq!(StatusCode::SeeOther.as_u16(), 303);
    /// ```
    pub fn as_u16(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::Created => 201,
            StatusCode::NoContent => 204,
            StatusCode::SeeOther => 303,
            StatusCode::BadRequest => 400,
            StatusCode::Forbidden => 403,
            StatusCode::NotFound => 404,
            StatusCode::MethodNotAllowed => 405,
            StatusCode::InternalServerError => 500,
        }
    }

    /// Returns the standard HTTP reason phrase for this status code.
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::Created => "Created",
            StatusCode::NoContent => "No Content",
            StatusCode::SeeOther => "See Other",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::Forbidden => "Forbidden",
            StatusCode::NotFound => "Not Found",
            StatusCode::MethodNotAllowed => "Method Not Allowed",
            StatusCode::InternalServerError => "Internal Server Error",
        }
    }

    pub fn from_u16(code: u16) -> Option<Self> {
        StatusCode::ALL.into_iter().find(|s| s.as_u16() == code)
    }
}

/// The response a handler fills in.
///
/// A fresh response has no status (it becomes `200 OK` when finalized), a
/// `Content-type: text/html` header and an empty body. Cookies can be
/// recorded but are not written to the wire yet.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    /// Numeric status, `None` until a handler or the server sets it
    pub code: Option<u16>,
    /// Status text placed after the code on the status line
    pub status: Option<String>,
    /// HTTP headers as key-value pairs
    pub headers: HashMap<String, String>,
    pub cookies: HashMap<String, String>,
    /// Response body as bytes
    pub body: Vec<u8>,
}

impl Default for Response {
    fn default() -> Self {
        Self::new()
    }
}

impl Response {
    pub fn new() -> Self {
        let mut response = Self {
            code: None,
            status: None,
            headers: HashMap::new(),
            cookies: HashMap::new(),
            body: Vec::new(),
        };
        response.set_content_type("text/html");
        response
    }

    /// Creates a fresh response that already carries `status`.
    pub fn with_status(status: StatusCode) -> Self {
        let mut response = Self::new();
        response.set_status(status);
        response
    }

    pub fn set_status(&mut self, status: StatusCode) {
        self.set_code(status.as_u16(), status.reason_phrase());
    }

    pub fn set_code(&mut self, code: u16, text: impl Into<String>) {
        self.code = Some(code);
        self.status = Some(text.into());
    }

    /// Adds or replaces a header.
    pub fn set_header(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.headers.insert(key.into(), value.into());
    }

    pub fn set_content_type(&mut self, content_type: impl Into<String>) {
        self.set_header(CONTENT_TYPE, content_type);
    }

    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers.get(key).map(|v| v.as_str())
    }

    pub fn set_cookie(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.cookies.insert(name.into(), value.into());
    }

    /// Appends bytes to the body.
    pub fn write(&mut self, bytes: impl AsRef<[u8]>) {
        self.body.extend_from_slice(bytes.as_ref());
    }

    pub fn set_body(&mut self, body: impl Into<Vec<u8>>) {
        self.body = body.into();
    }

    /// Turns the response into a `303 See Other` pointing at `uri`.
    pub fn redirect(&mut self, uri: impl Into<String>) {
        self.set_status(StatusCode::SeeOther);
        self.set_header("Location", uri);
    }

    /// Fills in whatever status the handler left unset.
    ///
    /// An unset code becomes 200. An unset text becomes the reason phrase of
    /// the code when it is a known one, so a bare 200 reads `OK`.
    pub fn finalize(&mut self) {
        let code = *self.code.get_or_insert(StatusCode::Ok.as_u16());
        if self.status.is_none() {
            self.status = StatusCode::from_u16(code).map(|s| s.reason_phrase().to_string());
        }
    }
}
