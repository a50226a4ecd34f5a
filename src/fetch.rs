//! Fetch flows: the single-resource GET and the manifest orchestrator
//!
//! A manifest is a newline-delimited list of absolute locators whose entries
//! may themselves be manifests. Expansion is driven by a work queue of
//! decoded manifest bodies instead of direct recursion, so nesting depth
//! never deepens the call stack. Each queue item is one round: every listed
//! locator is resolved, opened, and sent a GET before any response is
//! awaited, then completions are drained in readiness order until the
//! round's pending set is empty.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use futures::stream::{FuturesUnordered, StreamExt};
use tracing::{debug, warn};

use crate::codec;
use crate::config::Config;
use crate::error::{ClientError, Result};
use crate::locator::Locator;
use crate::net;
use crate::protocol::{self, Method, Response, MANIFEST_EXT};
use crate::storage;

/// Outcome of a manifest run: how many leaf files landed on disk and how
/// many entries were skipped on a non-success status.
#[derive(Debug, Default, Clone, Copy)]
pub struct FetchStats {
    pub files_written: u64,
    pub failures: u64,
}

/// One line of a manifest body: the parsed locator plus the filename its
/// content persists under.
#[derive(Debug, Clone)]
struct ManifestEntry {
    locator: Locator,
    filename: String,
}

impl ManifestEntry {
    fn parse(line: &str) -> Result<Self> {
        let locator = Locator::parse(line)?;
        let filename = locator.filename().to_string();
        if filename.is_empty() {
            return Err(ClientError::Usage(format!(
                "locator {line:?} has no filename"
            )));
        }
        Ok(Self { locator, filename })
    }

    // Inside a manifest only the `.list` extension matters; anything else,
    // extension or not, is persisted as a leaf file.
    fn is_manifest(&self) -> bool {
        Path::new(&self.filename)
            .extension()
            .and_then(|e| e.to_str())
            == Some(MANIFEST_EXT)
    }
}

/// Fetch one leaf file and persist it into `cfg.out_dir` under the
/// locator's filename. Any non-success status propagates as a `Protocol`
/// error; the connection drops on every exit path.
pub async fn fetch_file(cfg: &Config, locator: &Locator) -> Result<PathBuf> {
    let filename = locator.filename();
    if filename.is_empty() {
        return Err(ClientError::Usage(format!(
            "path {:?} has no filename to save under",
            locator.path
        )));
    }
    let response = fetch_response(cfg, locator).await?;
    let content = decode_body(response.body.as_deref())?;
    let path = storage::write_file(&cfg.out_dir, filename, &content).await?;
    println!("fetched {} ({} bytes)", path.display(), content.len());
    Ok(path)
}

/// Expand the manifest named by `locator` and fetch everything it lists,
/// recursively. Per-entry protocol failures are reported and skipped;
/// every other error aborts the whole flow (dropping the pending set
/// closes each still-open connection).
pub async fn fetch_manifest(cfg: &Config, locator: &Locator) -> Result<FetchStats> {
    let mut stats = FetchStats::default();
    let mut queue = VecDeque::new();
    queue.push_back(fetch_manifest_body(cfg, locator).await?);

    while let Some(body) = queue.pop_front() {
        run_round(cfg, &body, &mut queue, &mut stats).await?;
    }
    Ok(stats)
}

/// One GET request/response cycle on a fresh connection, with the success
/// status enforced.
async fn fetch_response(cfg: &Config, locator: &Locator) -> Result<Response> {
    let addr = locator.resolve(cfg.port).await?;
    debug!(url = %locator, %addr, "GET");
    let mut stream = net::connect(addr).await?;
    let request = protocol::build_request(Method::Get, &locator.path, None);
    net::send_frame(&mut stream, &request).await?;
    let frame = net::recv_frame(&mut stream).await?;
    let response = protocol::parse_response(&frame)?;
    if !response.is_ok() {
        return Err(ClientError::Protocol(response.status));
    }
    Ok(response)
}

/// GET a manifest resource and return its decoded body text.
async fn fetch_manifest_body(cfg: &Config, locator: &Locator) -> Result<String> {
    let response = fetch_response(cfg, locator).await?;
    let bytes = decode_body(response.body.as_deref())?;
    String::from_utf8(bytes).map_err(|_| {
        ClientError::Encoding(format!("manifest {} is not valid UTF-8", locator.path))
    })
}

/// Run one manifest round: open and send for every entry, then multiplex
/// across the whole pending set and handle completions as they become
/// ready. Nested manifests are re-fetched on a fresh connection and their
/// bodies pushed onto the work queue.
async fn run_round(
    cfg: &Config,
    body: &str,
    queue: &mut VecDeque<String>,
    stats: &mut FetchStats,
) -> Result<()> {
    let entries = body
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(ManifestEntry::parse)
        .collect::<Result<Vec<_>>>()?;
    debug!(entries = entries.len(), "manifest round");

    // Every entry is opened and its request sent before any response is
    // awaited; no entry's connection waits on another's reply.
    let mut opened = Vec::with_capacity(entries.len());
    for entry in entries {
        let addr = entry.locator.resolve(cfg.port).await?;
        let mut stream = net::connect(addr).await?;
        let request = protocol::build_request(Method::Get, &entry.locator.path, None);
        net::send_frame(&mut stream, &request).await?;
        opened.push((entry, stream));
    }

    // Each receive future owns its connection; completion order is
    // readiness order, not manifest order.
    let mut pending: FuturesUnordered<_> = opened
        .into_iter()
        .map(|(entry, mut stream)| async move {
            let frame = net::recv_frame(&mut stream).await;
            (entry, frame)
        })
        .collect();

    while let Some((entry, frame)) = pending.next().await {
        let response = protocol::parse_response(&frame?)?;
        if !response.is_ok() {
            warn!(url = %entry.locator, status = %response.status, "entry failed, skipping");
            eprintln!("{}: {}", entry.filename, response.status);
            stats.failures += 1;
            continue;
        }

        if entry.is_manifest() {
            // The ready connection is gone; the nested manifest is fetched
            // again on a connection of its own, and its body queued for a
            // later round.
            match fetch_manifest_body(cfg, &entry.locator).await {
                Ok(nested) => queue.push_back(nested),
                Err(ClientError::Protocol(status)) => {
                    eprintln!("{}: {}", entry.filename, status);
                    stats.failures += 1;
                }
                Err(e) => return Err(e),
            }
        } else {
            let content = decode_body(response.body.as_deref())?;
            let path = storage::write_file(&cfg.out_dir, &entry.filename, &content).await?;
            println!("fetched {} ({} bytes)", path.display(), content.len());
            stats.files_written += 1;
        }
    }
    Ok(())
}

/// Decode an optional encoded body segment; an absent body is empty content.
fn decode_body(body: Option<&str>) -> Result<Vec<u8>> {
    match body {
        Some(text) => codec::decode(text),
        None => Ok(Vec::new()),
    }
}
