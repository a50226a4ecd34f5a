//! Locator parsing and name resolution for http://host/path URLs
//!
//! The scheme is address syntax only; transport is always the raw framed
//! protocol. A locator is immutable once parsed and its path always begins
//! with `/`.

use std::fmt;
use std::net::SocketAddr;
use std::path::Path;

use tokio::net::lookup_host;

use crate::error::{ClientError, Result};
use crate::protocol::MANIFEST_EXT;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locator {
    pub host: String,
    pub path: String,
}

/// What a GET for this locator is expected to return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    File,
    Manifest,
}

impl Locator {
    /// Split a scheme-qualified URL into host and `/`-prefixed path.
    pub fn parse(url: &str) -> Result<Self> {
        let url = url.trim();
        let rest = url
            .strip_prefix("http://")
            .or_else(|| url.strip_prefix("https://"))
            .ok_or_else(|| {
                ClientError::Usage(format!(
                    "invalid URL {url:?}: must start with http:// or https://"
                ))
            })?;
        let (host, path) = rest.split_once('/').unwrap_or((rest, ""));
        if host.is_empty() {
            return Err(ClientError::Usage(format!("invalid URL {url:?}: empty host")));
        }
        Ok(Self {
            host: host.to_string(),
            path: format!("/{path}"),
        })
    }

    /// Final path segment; the whole path when it has no separator.
    pub fn filename(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }

    /// Classify by extension. A path with no extension is a usage error,
    /// raised before any connection is opened.
    pub fn kind(&self) -> Result<ResourceKind> {
        match Path::new(self.filename()).extension().and_then(|e| e.to_str()) {
            Some(ext) if ext == MANIFEST_EXT => Ok(ResourceKind::Manifest),
            Some(_) => Ok(ResourceKind::File),
            None => Err(ClientError::Usage(format!(
                "no file extension in path {:?}",
                self.path
            ))),
        }
    }

    /// Resolve the host to one reachable address; the first answer wins.
    pub async fn resolve(&self, port: u16) -> Result<SocketAddr> {
        let mut addrs = lookup_host((self.host.as_str(), port))
            .await
            .map_err(|e| ClientError::Resolution {
                host: self.host.clone(),
                reason: e.to_string(),
            })?;
        addrs.next().ok_or_else(|| ClientError::Resolution {
            host: self.host.clone(),
            reason: "lookup returned no addresses".into(),
        })
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.host, self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_http_url() {
        let loc = Locator::parse("http://example.com/docs/a.txt").unwrap();
        assert_eq!(loc.host, "example.com");
        assert_eq!(loc.path, "/docs/a.txt");
    }

    #[test]
    fn parse_https_url() {
        let loc = Locator::parse("https://h/files.list").unwrap();
        assert_eq!(loc.host, "h");
        assert_eq!(loc.path, "/files.list");
    }

    #[test]
    fn parse_deep_path_rejoined() {
        let loc = Locator::parse("http://h/a/b/c/d.bin").unwrap();
        assert_eq!(loc.path, "/a/b/c/d.bin");
        assert_eq!(loc.filename(), "d.bin");
    }

    #[test]
    fn parse_rejects_missing_scheme() {
        assert!(matches!(
            Locator::parse("example.com/a.txt"),
            Err(ClientError::Usage(_))
        ));
        assert!(matches!(
            Locator::parse("ftp://example.com/a.txt"),
            Err(ClientError::Usage(_))
        ));
    }

    #[test]
    fn parse_rejects_empty_host() {
        assert!(matches!(
            Locator::parse("http:///a.txt"),
            Err(ClientError::Usage(_))
        ));
    }

    #[test]
    fn kind_classification() {
        let file = Locator::parse("http://h/a.txt").unwrap();
        assert_eq!(file.kind().unwrap(), ResourceKind::File);

        let manifest = Locator::parse("http://h/root.list").unwrap();
        assert_eq!(manifest.kind().unwrap(), ResourceKind::Manifest);
    }

    #[test]
    fn kind_rejects_missing_extension() {
        let loc = Locator::parse("http://h/noext").unwrap();
        assert!(matches!(loc.kind(), Err(ClientError::Usage(_))));
    }

    #[test]
    fn display_is_host_and_path() {
        let loc = Locator::parse("http://h/a/b.txt").unwrap();
        assert_eq!(loc.to_string(), "h/a/b.txt");
    }

    #[tokio::test]
    async fn resolve_loopback() {
        let loc = Locator::parse("http://127.0.0.1/a.txt").unwrap();
        let addr = loc.resolve(9999).await.unwrap();
        assert_eq!(addr.port(), 9999);
        assert!(addr.ip().is_loopback());
    }
}
