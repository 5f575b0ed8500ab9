//! Chunked output readers (non-UTF8-safe).
//!
//! The node can emit non-UTF8 bytes, and notifications are per chunk rather
//! than per line, so this reads raw chunks and decodes them lossily.

use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::debug;

const CHUNK_SIZE: usize = 4096;

/// Read `stream` to EOF, handing each decoded chunk to `on_chunk`.
///
/// A read error ends the stream like EOF. Returns the number of chunks read.
pub(super) async fn pump_chunks<R, F>(
    mut stream: R,
    stream_type: &'static str,
    pid: Option<u32>,
    mut on_chunk: F,
) -> usize
where
    R: AsyncRead + Unpin,
    F: FnMut(&str),
{
    let mut buf = vec![0u8; CHUNK_SIZE];
    let mut chunks = 0;

    loop {
        match stream.read(&mut buf).await {
            Ok(0) => break,
            Ok(n) => {
                chunks += 1;
                let text = String::from_utf8_lossy(&buf[..n]);
                debug!(?pid, %stream_type, "{}: {}", stream_type, text.trim_end());
                on_chunk(&text);
            }
            Err(e) => {
                debug!(?pid, %stream_type, error = %e, "output reader exiting due to read error");
                break;
            }
        }
    }

    debug!(?pid, %stream_type, chunks, "output stream closed");
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::io::Builder;

    #[tokio::test]
    async fn delivers_each_chunk_separately() {
        let reader = Builder::new().read(b"one\n").read(b"two").build();
        let mut seen = Vec::new();

        let count = pump_chunks(reader, "stdout", Some(1), |chunk| seen.push(chunk.to_string())).await;

        assert_eq!(count, 2);
        assert_eq!(seen, vec!["one\n".to_string(), "two".to_string()]);
    }

    #[tokio::test]
    async fn invalid_utf8_is_decoded_lossily() {
        let reader = Builder::new().read(&[b'o', b'k', 0xff]).build();
        let mut seen = Vec::new();

        pump_chunks(reader, "stderr", None, |chunk| seen.push(chunk.to_string())).await;

        assert_eq!(seen, vec!["ok\u{fffd}".to_string()]);
    }

    #[tokio::test]
    async fn read_error_ends_stream() {
        let reader = Builder::new()
            .read(b"partial")
            .read_error(std::io::Error::other("pipe broke"))
            .build();
        let mut seen = 0;

        let count = pump_chunks(reader, "stdout", None, |_| seen += 1).await;

        assert_eq!(count, 1);
        assert_eq!(seen, 1);
    }
}
