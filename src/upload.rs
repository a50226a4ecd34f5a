//! Upload flow: POST of a local file as one encoded frame
//!
//! The file is read fully into memory, encoded, and sent inside the request
//! frame itself; there is no chunked or streamed upload.

use std::path::Path;

use tracing::debug;

use crate::codec;
use crate::config::Config;
use crate::error::{ClientError, Result};
use crate::locator::Locator;
use crate::net;
use crate::protocol::{self, Method};
use crate::storage;

pub async fn upload(cfg: &Config, locator: &Locator, file: &Path) -> Result<()> {
    let content = storage::read_file(file).await?;
    let encoded = codec::encode(&content);
    debug!(
        file = %file.display(),
        bytes = content.len(),
        encoded = encoded.len(),
        "read upload source"
    );

    let addr = locator.resolve(cfg.port).await?;
    let mut stream = net::connect(addr).await?;
    let request = protocol::build_request(Method::Post, &locator.path, Some(&encoded));
    net::send_frame(&mut stream, &request).await?;

    let frame = net::recv_frame(&mut stream).await?;
    let response = protocol::parse_response(&frame)?;
    if !response.is_ok() {
        return Err(ClientError::Protocol(response.status));
    }
    println!(
        "uploaded {} to {} ({} bytes)",
        file.display(),
        locator,
        content.len()
    );
    Ok(())
}
