use std::collections::HashMap;
use std::fmt;

/// HTTP request methods understood by the parser and the router.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// GET - Retrieve a resource
    GET,
    /// POST - Create or submit data
    POST,
    /// PUT - Replace a resource
    PUT,
    /// PATCH - Partial modification of a resource
    PATCH,
    /// DELETE - Delete a resource
    DELETE,
}

impl Method {
    pub const ALL: [Method; 5] = [
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::PATCH,
        Method::DELETE,
    ];

    /// Parses an HTTP method from a string, ignoring ASCII case.
    ///
    /// # Example
    ///
    /// ```
    /// # use beacon::http::request::Method;
    /// assert_eq!(Method::from_str("GET"), Some(Method::GET));
    /// assert_eq!(Method::from_str("patch"), Some(Method::PATCH));
    /// assert_eq!(Method::from_str("HEAD"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        Method::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Method::GET => "GET",
            Method::POST => "POST",
            Method::PUT => "PUT",
            Method::PATCH => "PATCH",
            Method::DELETE => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed HTTP request, alive for one request/response cycle.
///
/// Header names keep the case they were received with, values are stored
/// verbatim. Nothing is URL-decoded.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    /// The HTTP method, normalized to upper case
    pub method: Method,
    /// The request path without the query string (e.g. "/user/42")
    pub path: String,
    /// Raw query string, everything after the first `?`
    pub query: Option<String>,
    /// Values captured by wildcard route segments, left to right
    pub args: Vec<String>,
    /// Query string parameters
    pub params: HashMap<String, String>,
    /// Request headers as received
    pub headers: HashMap<String, String>,
    /// Cookies decomposed from the `Cookie` header
    pub cookies: HashMap<String, String>,
}

impl Request {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: None,
            args: Vec::new(),
            params: HashMap::new(),
            headers: HashMap::new(),
            cookies: HashMap::new(),
        }
    }

    /// Retrieves a header value by its exact name.
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers.get(key).map(|v| v.as_str())
    }

    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(|v| v.as_str())
    }

    pub fn cookie(&self, key: &str) -> Option<&str> {
        self.cookies.get(key).map(|v| v.as_str())
    }

    /// Returns the wildcard capture at `idx`, if the route produced that many.
    pub fn arg(&self, idx: usize) -> Option<&str> {
        self.args.get(idx).map(|v| v.as_str())
    }
}
