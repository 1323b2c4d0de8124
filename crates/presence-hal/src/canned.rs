//! One-shot HTTP server on loopback for exercising the blocking clients.

use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::thread::{self, JoinHandle};

/// Serve a single request with `status` (e.g. `"200 OK"`) and `body`.
///
/// Returns the server's base URL and a handle yielding the request line the
/// client sent.
pub(crate) fn serve_once(status: &str, body: &str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind loopback");
    let base_url = format!("http://{}", listener.local_addr().expect("local addr"));
    let response = format!(
        "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );

    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().expect("accept");
        let mut reader = BufReader::new(stream.try_clone().expect("clone stream"));

        let mut request_line = String::new();
        reader.read_line(&mut request_line).expect("request line");
        loop {
            let mut header = String::new();
            let n = reader.read_line(&mut header).expect("header");
            if n == 0 || header == "\r\n" {
                break;
            }
        }

        stream.write_all(response.as_bytes()).expect("write response");
        stream.flush().expect("flush");
        request_line.trim_end().to_string()
    });

    (base_url, handle)
}
