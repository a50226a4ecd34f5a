//! Runtime configuration passed into the fetch/upload flows
//!
//! The server port and output directory were baked-in constants in earlier
//! revisions; they are now explicit so flows never reach for globals.

use crate::protocol::DEFAULT_PORT;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    /// Server port used for every connection the client opens.
    pub port: u16,
    /// Directory fetched files are persisted into.
    pub out_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            out_dir: PathBuf::from("."),
        }
    }
}
