//! Byte codec: reversible transform between raw bytes and transport-safe text
//!
//! Bodies cross the wire as base64 so binary content survives the
//! line-oriented payload format. `decode(encode(b)) == b` for any bytes.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::error::{ClientError, Result};

pub fn encode(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

pub fn decode(text: &str) -> Result<Vec<u8>> {
    STANDARD
        .decode(text)
        .map_err(|e| ClientError::Encoding(format!("invalid base64 body: {e}")))
}
