//! One-shot HTTP responder for client tests.

use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// What the client sent.
pub(crate) struct Recorded {
    pub request_line: String,
    pub body: String,
}

/// Answer exactly one request with `status` and a JSON `body`.
///
/// Returns a base url ending in `/api` and a handle resolving to the request
/// once it has been answered.
pub(crate) async fn respond_once(status: &str, body: &str) -> (String, JoinHandle<Recorded>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let response = format!(
        "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );

    let handle = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut reader = BufReader::new(stream);

        let mut request_line = String::new();
        reader.read_line(&mut request_line).await.unwrap();

        let mut length = 0usize;
        loop {
            let mut header = String::new();
            reader.read_line(&mut header).await.unwrap();
            let header = header.trim_end();
            if header.is_empty() {
                break;
            }
            if let Some((name, value)) = header.split_once(':') {
                if name.eq_ignore_ascii_case("content-length") {
                    length = value.trim().parse().unwrap();
                }
            }
        }

        let mut body = vec![0; length];
        reader.read_exact(&mut body).await.unwrap();

        let stream = reader.get_mut();
        stream.write_all(response.as_bytes()).await.unwrap();
        let _ = stream.shutdown().await;

        Recorded {
            request_line: request_line.trim_end().to_string(),
            body: String::from_utf8(body).unwrap(),
        }
    });

    (format!("http://{addr}/api"), handle)
}
