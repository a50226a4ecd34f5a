//! Error taxonomy for the protocol engine
//!
//! Every variant except `Protocol` is fatal to the flow that raised it.
//! `Protocol` (a non-success status line) is recoverable only inside a
//! manifest round, where one bad entry must not abort its siblings.

use std::io;
use std::net::SocketAddr;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// Bad arguments or URL shape, detected before any connection is opened.
    #[error("usage error: {0}")]
    Usage(String),

    /// Host lookup yielded no usable address.
    #[error("failed to resolve host {host}: {reason}")]
    Resolution { host: String, reason: String },

    /// Transport-level connect failure.
    #[error("failed to connect to {addr}: {source}")]
    Connection {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },

    /// Channel closed or errored mid-frame, or an oversized/garbled frame.
    #[error("framing error: {0}")]
    Framing(String),

    /// Server answered with a non-success status line; the status text is
    /// the diagnostic.
    #[error("server returned: {0}")]
    Protocol(String),

    /// Body could not be encoded/decoded through the byte codec.
    #[error("encoding error: {0}")]
    Encoding(String),

    /// Local read/write failure.
    #[error("file I/O error on {path}: {source}")]
    FileIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub type Result<T> = std::result::Result<T, ClientError>;
