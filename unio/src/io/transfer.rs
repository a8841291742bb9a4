//! Partial-transfer loops shared by the file and connection drivers.

use std::io;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Read into `buf` until at least one byte has arrived or the source reports
/// end-of-stream.
///
/// Returns the number of bytes at the front of `buf`. `0` means end-of-stream
/// with nothing received, which callers surface as an empty read.
pub async fn read_some<R>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize>
where
    R: AsyncRead + Unpin + ?Sized,
{
    let mut nread = 0;
    while nread < 1 {
        let received = reader.read(&mut buf[nread..]).await?;
        if received == 0 {
            return Ok(0);
        }
        nread += received;
    }
    Ok(nread)
}

/// Write all of `data`, reissuing the write from the current offset after
/// every short transfer.
///
/// A sink that accepts zero bytes for a non-empty slice fails with
/// [`io::ErrorKind::WriteZero`] instead of spinning.
pub async fn write_fully<W>(writer: &mut W, data: &[u8]) -> io::Result<()>
where
    W: AsyncWrite + Unpin + ?Sized,
{
    let mut nwritten = 0;
    while nwritten < data.len() {
        let sent = writer.write(&data[nwritten..]).await?;
        if sent == 0 {
            return Err(io::Error::new(
                io::ErrorKind::WriteZero,
                format!("sink accepted 0 of {} bytes", data.len() - nwritten),
            ));
        }
        nwritten += sent;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::pin::Pin;
    use std::task::{Context, Poll};

    use tokio::io::ReadBuf;

    use super::*;

    /// In-memory stream that moves at most `chunk` bytes per call.
    struct Trickle {
        data: Vec<u8>,
        pos: usize,
        chunk: usize,
        calls: usize,
    }

    impl Trickle {
        fn new(data: Vec<u8>, chunk: usize) -> Self {
            Self {
                data,
                pos: 0,
                chunk,
                calls: 0,
            }
        }
    }

    impl AsyncRead for Trickle {
        fn poll_read(
            self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            buf: &mut ReadBuf<'_>,
        ) -> Poll<io::Result<()>> {
            let this = self.get_mut();
            let end = (this.pos + this.chunk)
                .min(this.data.len())
                .min(this.pos + buf.remaining());
            buf.put_slice(&this.data[this.pos..end]);
            this.pos = end;
            this.calls += 1;
            Poll::Ready(Ok(()))
        }
    }

    impl AsyncWrite for Trickle {
        fn poll_write(
            self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            buf: &[u8],
        ) -> Poll<io::Result<usize>> {
            let this = self.get_mut();
            let accepted = buf.len().min(this.chunk);
            this.data.extend_from_slice(&buf[..accepted]);
            this.calls += 1;
            Poll::Ready(Ok(accepted))
        }

        fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
            Poll::Ready(Ok(()))
        }

        fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
            Poll::Ready(Ok(()))
        }
    }

    #[tokio::test]
    async fn write_fully_survives_one_byte_writes() {
        let mut sink = Trickle::new(Vec::new(), 1);
        write_fully(&mut sink, b"ping").await.expect("write");
        assert_eq!(sink.data, b"ping");
        assert_eq!(sink.calls, 4);
    }

    #[tokio::test]
    async fn write_fully_of_nothing_never_touches_the_sink() {
        let mut sink = Trickle::new(Vec::new(), 1);
        write_fully(&mut sink, b"").await.expect("write");
        assert_eq!(sink.calls, 0);
    }

    #[tokio::test]
    async fn write_fully_reports_zero_length_sink() {
        let mut sink = Trickle::new(Vec::new(), 0);
        let err = write_fully(&mut sink, b"x").await.expect_err("write zero");
        assert_eq!(err.kind(), io::ErrorKind::WriteZero);
    }

    #[tokio::test]
    async fn read_some_returns_first_chunk() {
        let mut source = Trickle::new(b"hello".to_vec(), 2);
        let mut buf = [0u8; 8];
        let n = read_some(&mut source, &mut buf).await.expect("read");
        assert_eq!(&buf[..n], b"he");
    }

    #[tokio::test]
    async fn read_some_is_bounded_by_buffer() {
        let mut source: &[u8] = b"abcdefgh";
        let mut buf = [0u8; 3];
        let n = read_some(&mut source, &mut buf).await.expect("read");
        assert_eq!(&buf[..n], b"abc");
        let n = read_some(&mut source, &mut buf).await.expect("read");
        assert_eq!(&buf[..n], b"def");
    }

    #[tokio::test]
    async fn read_some_at_end_of_stream_is_zero() {
        let mut source = Trickle::new(Vec::new(), 4);
        let mut buf = [0u8; 4];
        assert_eq!(read_some(&mut source, &mut buf).await.expect("read"), 0);
    }
}
