//! Local persistence: writing fetched bodies, reading upload sources

use std::path::{Path, PathBuf};

use crate::error::{ClientError, Result};

/// Persist `content` as `dir/filename`, returning the written path.
pub async fn write_file(dir: &Path, filename: &str, content: &[u8]) -> Result<PathBuf> {
    let path = dir.join(filename);
    tokio::fs::write(&path, content)
        .await
        .map_err(|source| ClientError::FileIo {
            path: path.clone(),
            source,
        })?;
    Ok(path)
}

/// Read a local file fully into memory (uploads are never streamed).
pub async fn read_file(path: &Path) -> Result<Vec<u8>> {
    tokio::fs::read(path).await.map_err(|source| ClientError::FileIo {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn write_then_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "out.bin", b"\x00\x01payload")
            .await
            .unwrap();
        assert_eq!(path, dir.path().join("out.bin"));
        assert_eq!(read_file(&path).await.unwrap(), b"\x00\x01payload");
    }

    #[tokio::test]
    async fn write_into_missing_dir_is_file_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(matches!(
            write_file(&missing, "out.bin", b"x").await,
            Err(ClientError::FileIo { .. })
        ));
    }

    #[tokio::test]
    async fn read_missing_file_is_file_io_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            read_file(&dir.path().join("absent.txt")).await,
            Err(ClientError::FileIo { .. })
        ));
    }
}
