//! Grab - client library for a minimal framed TCP file-transfer protocol
//!
//! Every message is one length-prefixed frame carrying line-oriented text;
//! bodies are base64 so binary content survives the wire. The library
//! covers locator parsing, framing, the request/response text layer, the
//! single-file and manifest fetch flows, and the encoded POST upload.

pub mod codec;
pub mod config;
pub mod error;
pub mod fetch;
pub mod locator;
pub mod net;
pub mod protocol;
pub mod storage;
pub mod upload;
