//! What a handler action hands back to the server binding.

/// Body returned, with status 404, when no handler can be resolved.
pub const NOT_FOUND_BODY: &str =
    "<html><head><title>404 Not Found</title></head><body><h1>Not found</h1></body></html>";

/// The result of rendering a request.
///
/// The dispatcher passes this through untouched; status and headers live
/// on the [`crate::Request`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Render {
    /// The complete response body. The binding writes it and closes the response.
    Body(Vec<u8>),
    /// The handler completes the response later through its
    /// [`crate::ResponseStream`].
    NotDoneYet,
}

impl Render {
    /// Creates a complete body from a string.
    pub fn html(body: impl Into<String>) -> Self {
        Self::Body(body.into().into_bytes())
    }

    /// Creates a complete body from raw bytes.
    pub fn bytes(body: impl Into<Vec<u8>>) -> Self {
        Self::Body(body.into())
    }

    /// The fixed not-found body.
    pub fn not_found() -> Self {
        Self::html(NOT_FOUND_BODY)
    }

    /// Returns true if the response is completed asynchronously.
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::NotDoneYet)
    }

    /// Returns the body as a string, if complete and valid UTF-8.
    pub fn body_string(&self) -> Option<String> {
        match self {
            Self::Body(body) => String::from_utf8(body.clone()).ok(),
            Self::NotDoneYet => None,
        }
    }
}

impl From<String> for Render {
    fn from(body: String) -> Self {
        Self::html(body)
    }
}

impl From<&str> for Render {
    fn from(body: &str) -> Self {
        Self::html(body)
    }
}
