use deluge::{Beacon, FieldSet, HttpBeacon};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Serves one request with `status_line` and hands back the request line.
async fn one_shot_collector(status_line: &'static str) -> (String, tokio::task::JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = vec![0u8; 4096];
        let mut read = 0;
        loop {
            let n = socket.read(&mut buf[read..]).await.unwrap();
            read += n;
            if n == 0 || buf[..read].windows(4).any(|w| w == b"\r\n\r\n") {
                break;
            }
        }
        let response = format!("{}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n", status_line);
        socket.write_all(response.as_bytes()).await.unwrap();

        let request = String::from_utf8_lossy(&buf[..read]).to_string();
        request.lines().next().unwrap_or_default().to_owned()
    });

    (format!("http://{}/", addr), handle)
}

#[tokio::test]
async fn sends_get_with_encoded_fields() {
    let (url, collector) = one_shot_collector("HTTP/1.1 200 OK").await;
    let beacon = HttpBeacon::new(url, Duration::from_secs(5)).unwrap();

    let mut fields = FieldSet::new();
    fields.set("comfort", 0.6);
    fields.set("v", "ignored");
    beacon.send(true, fields, "docs//intro").await.unwrap();

    let request_line = collector.await.unwrap();
    assert_eq!(
        request_line,
        "GET /?comfort=0.6&v=true&p=%22docs%2F%2Fintro%22 HTTP/1.1"
    );
}

#[tokio::test]
async fn error_status_is_a_failure() {
    let (url, collector) = one_shot_collector("HTTP/1.1 500 Internal Server Error").await;
    let beacon = HttpBeacon::new(url, Duration::from_secs(5)).unwrap();

    let result = beacon.send(false, FieldSet::new(), "docs//intro").await;
    assert!(result.is_err());
    collector.await.unwrap();
}
