//! HTTP request abstraction consumed by the dispatcher.

use std::collections::HashMap;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::Stream;
use futures::channel::mpsc;

/// HTTP request methods.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Method {
    /// GET method
    Get,
    /// POST method
    Post,
    /// PUT method
    Put,
    /// PATCH method
    Patch,
    /// DELETE method
    Delete,
    /// HEAD method
    Head,
    /// OPTIONS method
    Options,
    /// CONNECT method
    Connect,
    /// TRACE method
    Trace,
    /// Any other method token, stored uppercased.
    Extension(String),
}

impl Method {
    /// Parses a method token.
    ///
    /// Known methods are recognized case-insensitively; anything else is
    /// kept as an [`Method::Extension`].
    pub fn parse(s: &str) -> Self {
        let upper = s.to_ascii_uppercase();
        match upper.as_str() {
            "GET" => Self::Get,
            "POST" => Self::Post,
            "PUT" => Self::Put,
            "PATCH" => Self::Patch,
            "DELETE" => Self::Delete,
            "HEAD" => Self::Head,
            "OPTIONS" => Self::Options,
            "CONNECT" => Self::Connect,
            "TRACE" => Self::Trace,
            _ => Self::Extension(upper),
        }
    }

    /// Returns the method as a string.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
            Self::Head => "HEAD",
            Self::Options => "OPTIONS",
            Self::Connect => "CONNECT",
            Self::Trace => "TRACE",
            Self::Extension(token) => token,
        }
    }
}

impl From<&str> for Method {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Writer half of a deferred response.
///
/// A handler that returns [`crate::Render::NotDoneYet`] keeps this and
/// writes the rest of the body whenever it is ready.
#[derive(Debug, Clone)]
pub struct ResponseStream {
    tx: mpsc::UnboundedSender<Vec<u8>>,
}

impl ResponseStream {
    /// Writes a chunk of the response body.
    ///
    /// Returns `false` if the server binding has gone away.
    pub fn write(&self, chunk: impl Into<Vec<u8>>) -> bool {
        self.tx.unbounded_send(chunk.into()).is_ok()
    }

    /// Completes the response.
    pub fn finish(self) {
        self.tx.close_channel();
    }

    /// Returns true if the response can still be written to.
    pub fn is_open(&self) -> bool {
        !self.tx.is_closed()
    }
}

/// Reader half of a deferred response, held by the server binding.
///
/// Yields body chunks in write order and ends once the handler calls
/// [`ResponseStream::finish`] or drops every writer.
#[derive(Debug)]
pub struct ResponseBody {
    rx: mpsc::UnboundedReceiver<Vec<u8>>,
}

impl Stream for ResponseBody {
    type Item = Vec<u8>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.rx).poll_next(cx)
    }
}

/// An HTTP request together with the head of its response.
#[derive(Debug)]
pub struct Request {
    /// HTTP method.
    pub method: Method,
    /// Request path, without the query component.
    pub path: String,
    /// Query string parameters.
    pub query: HashMap<String, String>,
    /// Request headers.
    pub headers: HashMap<String, String>,
    /// Request body.
    pub body: Vec<u8>,
    status: u16,
    response_headers: HashMap<String, String>,
    stream: Option<ResponseStream>,
}

impl Request {
    /// Creates a new request.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: HashMap::new(),
            headers: HashMap::new(),
            body: Vec::new(),
            status: 200,
            response_headers: HashMap::new(),
            stream: None,
        }
    }

    /// Creates a request from a raw request target such as `/docs?page=2`.
    ///
    /// The query component is split off into [`Request::query`].
    pub fn from_target(method: Method, target: &str) -> Self {
        match target.split_once('?') {
            Some((path, query)) => {
                let mut req = Self::new(method, path);
                req.query = Self::parse_query_string(query);
                req
            }
            None => Self::new(method, target),
        }
    }

    /// Creates a GET request.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    /// Creates a POST request.
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    /// Attaches a channel for completing the response later.
    ///
    /// The binding keeps the returned [`ResponseBody`]; the handler takes
    /// the writer with [`Request::take_stream`].
    #[must_use]
    pub fn deferred(mut self) -> (Self, ResponseBody) {
        let (tx, rx) = mpsc::unbounded();
        self.stream = Some(ResponseStream { tx });
        (self, ResponseBody { rx })
    }

    /// Takes the deferred response writer, if the binding provided one.
    pub fn take_stream(&mut self) -> Option<ResponseStream> {
        self.stream.take()
    }

    /// Sets a header.
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Sets the body.
    #[must_use]
    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// Sets a query parameter.
    #[must_use]
    pub fn query_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    /// Gets a header value.
    pub fn get_header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    /// Gets a query parameter.
    pub fn get_query(&self, key: &str) -> Option<&str> {
        self.query.get(key).map(String::as_str)
    }

    /// Returns the body as a string.
    pub fn body_string(&self) -> Option<String> {
        String::from_utf8(self.body.clone()).ok()
    }

    /// Parses the body as JSON.
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }

    /// Sets the response status code.
    pub fn set_response_code(&mut self, status: u16) {
        self.status = status;
    }

    /// Returns the response status code (200 unless changed).
    pub fn response_code(&self) -> u16 {
        self.status
    }

    /// Sets a response header.
    pub fn set_header(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.response_headers.insert(key.into(), value.into());
    }

    /// Returns the response headers set so far.
    pub fn response_headers(&self) -> &HashMap<String, String> {
        &self.response_headers
    }

    /// Parses query parameters from a query string.
    pub fn parse_query_string(query: &str) -> HashMap<String, String> {
        query
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| {
                let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
                (percent_decode(key), percent_decode(value))
            })
            .collect()
    }
}

/// Decodes `%XX` escapes and `+` in a query component.
fn percent_decode(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'%' => {
                let decoded = s
                    .get(i + 1..i + 3)
                    .and_then(|hex| u8::from_str_radix(hex, 16).ok());
                if let Some(byte) = decoded {
                    out.push(byte);
                    i += 3;
                    continue;
                }
                out.push(b'%');
            }
            b'+' => out.push(b' '),
            b => out.push(b),
        }
        i += 1;
    }

    String::from_utf8_lossy(&out).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_parsing() {
        assert_eq!(Method::parse("GET"), Method::Get);
        assert_eq!(Method::parse("post"), Method::Post);
        assert_eq!(
            Method::parse("propfind"),
            Method::Extension("PROPFIND".to_string())
        );
        assert_eq!(Method::parse("propfind").as_str(), "PROPFIND");
        assert_eq!(Method::from("delete").to_string(), "DELETE");
    }

    #[test]
    fn test_request_builder() {
        let req = Request::get("/users")
            .header("Content-Type", "application/json")
            .query_param("page", "1");

        assert_eq!(req.method, Method::Get);
        assert_eq!(req.path, "/users");
        assert_eq!(req.get_header("content-type"), Some("application/json"));
        assert_eq!(req.get_query("page"), Some("1"));
        assert_eq!(req.response_code(), 200);
    }

    #[test]
    fn test_from_target_splits_query() {
        let req = Request::from_target(Method::Get, "/docs/manual?page=2&q=a+b");
        assert_eq!(req.path, "/docs/manual");
        assert_eq!(req.get_query("page"), Some("2"));
        assert_eq!(req.get_query("q"), Some("a b"));
    }

    #[test]
    fn test_query_string_parsing() {
        let query = Request::parse_query_string("name=John+Doe&age=30&city=New%20York&flag");
        assert_eq!(query.get("name"), Some(&"John Doe".to_string()));
        assert_eq!(query.get("age"), Some(&"30".to_string()));
        assert_eq!(query.get("city"), Some(&"New York".to_string()));
        assert_eq!(query.get("flag"), Some(&String::new()));
    }

    #[test]
    fn test_percent_decode_multibyte_and_invalid() {
        assert_eq!(percent_decode("caf%C3%A9"), "café");
        assert_eq!(percent_decode("100%"), "100%");
        assert_eq!(percent_decode("%zz"), "%zz");
    }

    #[test]
    fn test_response_head() {
        let mut req = Request::get("/");
        req.set_response_code(404);
        req.set_header("Content-Type", "text/html");
        assert_eq!(req.response_code(), 404);
        assert_eq!(
            req.response_headers().get("Content-Type"),
            Some(&"text/html".to_string())
        );
    }

    #[test]
    fn test_take_stream_only_when_deferred() {
        let mut plain = Request::get("/");
        assert!(plain.take_stream().is_none());

        let (mut req, _body) = Request::get("/wait").deferred();
        assert!(req.take_stream().is_some());
        assert!(req.take_stream().is_none());
    }
}
