//! The demo's building blocks, each driving the runtime through handles only.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Result, bail};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use unio::{Handle, OpenFlag, Runtime};

/// Canned reply sent to every accepted connection.
pub const RESPONSE: &[u8] =
    b"HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nConnection: close\r\n\r\nHello";

/// Write `payload` to `path`, read it back through a fresh handle, unlink.
pub async fn file_round_trip(rt: &Runtime, path: &Path, payload: &[u8]) -> Result<Vec<u8>> {
    let fd = rt.open(path, Some(&[OpenFlag::Write, OpenFlag::Create])).await?;
    rt.write(fd, payload).await?;
    rt.close(fd).await?;

    let fd = rt.open(path, Some(&[OpenFlag::Read])).await?;
    let mut contents = Vec::new();
    loop {
        let read = rt.read_with(fd, |chunk| {
            contents.extend_from_slice(chunk);
            chunk.len()
        });
        if read.await? == 0 {
            break;
        }
    }
    rt.close(fd).await?;

    rt.unlink(path).await?;
    Ok(contents)
}

/// Listen on `address` and serve connections until `deadline` closes the
/// listener. The task yields the request bytes it received, in order.
pub async fn start_server(
    rt: &Arc<Runtime>,
    address: &str,
    deadline: Duration,
) -> Result<JoinHandle<Result<Vec<Vec<u8>>>>> {
    let server = rt.listen(address).await;
    if !server.is_valid() {
        bail!("listen {address} failed");
    }
    info!(%server, address, "listening");

    let closer = Arc::clone(rt);
    tokio::spawn(async move {
        tokio::time::sleep(deadline).await;
        debug!(%server, "deadline reached, closing listener");
        if let Err(err) = closer.close(server).await {
            warn!(%server, error = %format!("{err:#}"), "closing listener at deadline failed");
        }
    });

    let rt = Arc::clone(rt);
    Ok(tokio::spawn(async move { serve(&rt, server).await }))
}

async fn serve(rt: &Runtime, server: Handle) -> Result<Vec<Vec<u8>>> {
    let mut requests = Vec::new();
    loop {
        let conn = rt.accept(server).await;
        if !conn.is_valid() {
            return Ok(requests);
        }
        requests.push(rt.read(conn).await?);
        rt.write(conn, RESPONSE).await?;
        rt.close(conn).await?;
    }
}

/// Connect, send `body`, and return the first chunk of the reply.
pub async fn request(rt: &Runtime, address: &str, body: &[u8]) -> Result<Vec<u8>> {
    let conn = rt.connect(address).await;
    if !conn.is_valid() {
        bail!("connect {address} failed");
    }
    rt.write(conn, body).await?;
    let response = rt.read(conn).await?;
    rt.close(conn).await?;
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use unio::test_support::{free_port, loopback, scratch_dir};

    #[tokio::test]
    async fn file_round_trip_returns_payload_and_removes_file() {
        let temp = scratch_dir();
        let path = temp.path().join("file.txt");
        let rt = Runtime::default();

        let contents = file_round_trip(&rt, &path, b"hello").await.expect("round trip");
        assert_eq!(contents, b"hello");
        assert!(!path.exists());
        assert_eq!(rt.open_handles(), 0);
    }

    #[tokio::test]
    async fn server_answers_until_deadline() {
        let address = loopback(free_port());
        let rt = Arc::new(Runtime::default());

        let server = start_server(&rt, &address, Duration::from_millis(300))
            .await
            .expect("start");
        let response = request(&rt, &address, b"GET / HTTP/1.1\r\n\r\n")
            .await
            .expect("request");
        assert_eq!(response, RESPONSE);

        let served = server.await.expect("join").expect("serve");
        assert_eq!(served, vec![b"GET / HTTP/1.1\r\n\r\n".to_vec()]);
        assert_eq!(rt.open_handles(), 0);
    }

    #[tokio::test]
    async fn deadline_closes_idle_listener() {
        let address = loopback(free_port());
        let rt = Arc::new(Runtime::default());

        let server = start_server(&rt, &address, Duration::from_millis(50))
            .await
            .expect("start");
        let served = tokio::time::timeout(Duration::from_secs(10), server)
            .await
            .expect("server stopped")
            .expect("join")
            .expect("serve");
        assert!(served.is_empty());
        assert_eq!(rt.open_handles(), 0);
    }
}
