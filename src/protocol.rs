//! Protocol constants plus request/response text handling
//!
//! Every message travels as one length-prefixed frame (see `net`). The frame
//! payload is line-oriented text: a request is `"<METHOD> <path>\r\n\r\n"`
//! (POST carries the encoded body between the two line breaks), a response
//! is a status line optionally followed by a body segment. The frame
//! boundary already delimits the message, so no trailing separator is
//! required on the receive side.

use crate::error::{ClientError, Result};

// Default server port; overridable via --port
pub const DEFAULT_PORT: u16 = 8080;

// Maximum frame payload size (64MB) - prevents memory exhaustion on a
// garbled or hostile length prefix
pub const MAX_FRAME_SIZE: usize = 64 * 1024 * 1024;

// Extension marking a resource as a manifest of further locators
pub const MANIFEST_EXT: &str = "list";

// The only status line that denotes success; anything else is the
// diagnostic text for that request
pub const OK_STATUS: &str = "200 OK";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

/// A parsed response frame. `body` holds the transport-encoded text segment,
/// absent when the response carried no content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: String,
    pub body: Option<String>,
}

impl Response {
    pub fn is_ok(&self) -> bool {
        self.status == OK_STATUS
    }
}

/// Format a request as frame payload text.
///
/// GET produces `"GET <path>\r\n\r\n"`; POST inserts the already-encoded
/// body between the line breaks: `"POST <path>\r\n<body>\r\n\r\n"`.
pub fn build_request(method: Method, path: &str, body: Option<&str>) -> Vec<u8> {
    let mut req = format!("{} {}\r\n", method.as_str(), path);
    if let Some(body) = body {
        req.push_str(body);
        req.push_str("\r\n");
    }
    req.push_str("\r\n");
    req.into_bytes()
}

/// Split a response frame into status line and optional body.
///
/// Tokenizer semantics: the first `\r\n`-delimited segment is the status,
/// the next non-empty segment (if any) is the body. Runs of `\r\n` around
/// the body are skipped, so `"200 OK\r\nabc"` and `"200 OK\r\nabc\r\n\r\n"`
/// parse identically.
pub fn parse_response(payload: &[u8]) -> Result<Response> {
    let text = std::str::from_utf8(payload)
        .map_err(|_| ClientError::Framing("response frame is not valid UTF-8".into()))?;

    let mut segments = text.split("\r\n").filter(|s| !s.is_empty());
    let status = segments
        .next()
        .ok_or_else(|| ClientError::Framing("empty response frame".into()))?
        .to_string();
    let body = segments.next().map(str::to_string);

    Ok(Response { status, body })
}
