//! Framed Channel: length-prefixed messaging over a byte stream
//!
//! Wire format in both directions: `[4-byte big-endian length][payload]`,
//! no padding. A frame is atomic from the caller's perspective even though
//! the transport may deliver it in arbitrary chunks; short reads and writes
//! are looped to completion, and a channel that closes mid-frame is a
//! framing error. The framing functions are generic over the stream so the
//! invariants are testable without a real socket.

use std::net::SocketAddr;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;

use crate::error::{ClientError, Result};
use crate::protocol::MAX_FRAME_SIZE;

/// Open a transport connection to a resolved address.
pub async fn connect(addr: SocketAddr) -> Result<TcpStream> {
    let stream = TcpStream::connect(addr)
        .await
        .map_err(|source| ClientError::Connection { addr, source })?;
    let _ = stream.set_nodelay(true);
    Ok(stream)
}

/// Send one frame: the 4-byte length prefix, then every payload byte.
pub async fn send_frame<S>(stream: &mut S, payload: &[u8]) -> Result<()>
where
    S: AsyncWrite + Unpin,
{
    if payload.len() > MAX_FRAME_SIZE {
        return Err(ClientError::Framing(format!(
            "frame payload too large: {} bytes (max {})",
            payload.len(),
            MAX_FRAME_SIZE
        )));
    }
    let len = payload.len() as u32;
    stream
        .write_all(&len.to_be_bytes())
        .await
        .map_err(|e| ClientError::Framing(format!("channel closed writing length prefix: {e}")))?;
    if !payload.is_empty() {
        stream
            .write_all(payload)
            .await
            .map_err(|e| ClientError::Framing(format!("channel closed mid-frame: {e}")))?;
    }
    stream
        .flush()
        .await
        .map_err(|e| ClientError::Framing(format!("channel flush failed: {e}")))?;
    Ok(())
}

/// Receive one frame: exactly 4 prefix bytes, then exactly the advertised
/// payload length.
pub async fn recv_frame<S>(stream: &mut S) -> Result<Vec<u8>>
where
    S: AsyncRead + Unpin,
{
    let mut prefix = [0u8; 4];
    stream
        .read_exact(&mut prefix)
        .await
        .map_err(|e| ClientError::Framing(format!("channel closed reading length prefix: {e}")))?;
    let len = u32::from_be_bytes(prefix) as usize;
    if len > MAX_FRAME_SIZE {
        return Err(ClientError::Framing(format!(
            "frame too large: {len} bytes (max {MAX_FRAME_SIZE})"
        )));
    }
    let mut payload = vec![0u8; len];
    if len > 0 {
        stream
            .read_exact(&mut payload)
            .await
            .map_err(|e| ClientError::Framing(format!("channel closed mid-frame: {e}")))?;
    }
    Ok(payload)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn frame_round_trip() {
        let (mut a, mut b) = tokio::io::duplex(1024);
        send_frame(&mut a, b"hello").await.unwrap();
        assert_eq!(recv_frame(&mut b).await.unwrap(), b"hello");
    }

    #[tokio::test]
    async fn frame_round_trip_empty() {
        let (mut a, mut b) = tokio::io::duplex(64);
        send_frame(&mut a, b"").await.unwrap();
        assert_eq!(recv_frame(&mut b).await.unwrap(), Vec::<u8>::new());
    }

    #[tokio::test]
    async fn frame_round_trip_spanning_chunks() {
        // Tiny duplex buffer forces the payload through many partial
        // transfers; both sides must loop to completion.
        let (mut a, mut b) = tokio::io::duplex(16);
        let payload: Vec<u8> = (0..10_000u32).map(|i| i as u8).collect();
        let expected = payload.clone();

        let writer = tokio::spawn(async move {
            send_frame(&mut a, &payload).await.unwrap();
            a
        });
        let got = recv_frame(&mut b).await.unwrap();
        writer.await.unwrap();
        assert_eq!(got, expected);
    }

    #[tokio::test]
    async fn recv_errors_when_channel_closes_mid_frame() {
        let (mut a, mut b) = tokio::io::duplex(64);
        // Advertise 10 bytes, deliver 3, then close the channel.
        a.write_all(&10u32.to_be_bytes()).await.unwrap();
        a.write_all(b"abc").await.unwrap();
        drop(a);

        assert!(matches!(
            recv_frame(&mut b).await,
            Err(ClientError::Framing(_))
        ));
    }

    #[tokio::test]
    async fn recv_errors_when_channel_closes_before_prefix() {
        let (a, mut b) = tokio::io::duplex(64);
        drop(a);
        assert!(matches!(
            recv_frame(&mut b).await,
            Err(ClientError::Framing(_))
        ));
    }

    #[tokio::test]
    async fn recv_rejects_oversized_length_prefix() {
        let (mut a, mut b) = tokio::io::duplex(64);
        let len = (MAX_FRAME_SIZE as u32) + 1;
        a.write_all(&len.to_be_bytes()).await.unwrap();

        assert!(matches!(
            recv_frame(&mut b).await,
            Err(ClientError::Framing(_))
        ));
    }

    #[tokio::test]
    async fn connect_refused_is_connection_error() {
        // Bind then drop to get a port nothing is listening on.
        let port = {
            let sock = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            let p = sock.local_addr().unwrap().port();
            drop(sock);
            p
        };
        let addr: SocketAddr = format!("127.0.0.1:{port}").parse().unwrap();
        assert!(matches!(
            connect(addr).await,
            Err(ClientError::Connection { .. })
        ));
    }
}
