// src/ai/test_support.rs
use reqwest::blocking::Client;
use std::net::TcpListener;
use std::thread;
use std::time::Duration;

/// URL of a socket that accepts connections and never answers
pub fn silent_endpoint() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    thread::spawn(move || {
        let mut held = Vec::new();
        for stream in listener.incoming() {
            match stream {
                Ok(stream) => held.push(stream),
                Err(_) => break,
            }
        }
    });
    format!("http://{}", addr)
}

/// URL of a port nothing is listening on
pub fn closed_endpoint() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}", port)
}

// The blocking client cannot be driven from inside an async runtime, so both
// helpers do their work on a plain thread.
fn failed_post(url: String, timeout: Duration) -> reqwest::Error {
    thread::spawn(move || {
        let client = Client::builder().timeout(timeout).build().unwrap();
        client.post(url).send().unwrap_err()
    })
    .join()
    .unwrap()
}

pub fn timeout_error() -> reqwest::Error {
    failed_post(silent_endpoint(), Duration::from_millis(200))
}

pub fn connection_refused_error() -> reqwest::Error {
    failed_post(closed_endpoint(), Duration::from_secs(5))
}
