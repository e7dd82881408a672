//! Minimal HTTP server for transport tests.
//!
//! Serves a fixed table of routes on `127.0.0.1` from a background thread
//! and counts every request it receives. Each connection handles exactly one
//! request and is closed after the response.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

/// Canned response for one path.
#[derive(Debug, Clone)]
struct Route {
    status: u16,
    body: String,
}

#[derive(Default)]
struct Shared {
    total: AtomicUsize,
    per_path: Mutex<HashMap<String, usize>>,
}

/// A counting HTTP server that lives as long as the value.
///
/// # Example
///
/// ```rust,no_run
/// use shipyard_test_utils::TestServer;
///
/// let server = TestServer::start(&[("/shipyard.yaml", 200, "type: monorepo\n")]);
/// let url = server.url("/shipyard.yaml");
/// // ... fetch url ...
/// assert_eq!(server.hits(), 1);
/// ```
pub struct TestServer {
    addr: SocketAddr,
    shared: Arc<Shared>,
    shutdown: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl TestServer {
    /// Bind an ephemeral port and serve `(path, status, body)` routes.
    /// Unknown paths answer `404`.
    ///
    /// # Panics
    /// Panics if the listener cannot be bound.
    pub fn start(routes: &[(&str, u16, &str)]) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .unwrap_or_else(|e| panic!("TestServer::start: failed to bind: {e}"));
        let addr = listener
            .local_addr()
            .unwrap_or_else(|e| panic!("TestServer::start: no local address: {e}"));

        let routes: HashMap<String, Route> = routes
            .iter()
            .map(|(path, status, body)| {
                (
                    path.to_string(),
                    Route {
                        status: *status,
                        body: body.to_string(),
                    },
                )
            })
            .collect();

        let shared = Arc::new(Shared::default());
        let shutdown = Arc::new(AtomicBool::new(false));

        let handle = {
            let shared = Arc::clone(&shared);
            let shutdown = Arc::clone(&shutdown);
            std::thread::spawn(move || {
                for stream in listener.incoming() {
                    if shutdown.load(Ordering::SeqCst) {
                        break;
                    }
                    if let Ok(stream) = stream {
                        serve_one(stream, &routes, &shared);
                    }
                }
            })
        };

        Self {
            addr,
            shared,
            shutdown,
            handle: Some(handle),
        }
    }

    /// Absolute URL for `path` on this server.
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Total number of requests received.
    pub fn hits(&self) -> usize {
        self.shared.total.load(Ordering::SeqCst)
    }

    /// Number of requests received for `path`.
    pub fn hits_for(&self, path: &str) -> usize {
        self.shared
            .per_path
            .lock()
            .map(|m| m.get(path).copied().unwrap_or(0))
            .unwrap_or(0)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::SeqCst);
        // Wake the accept loop so it observes the flag.
        let _ = TcpStream::connect(self.addr);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn serve_one(mut stream: TcpStream, routes: &HashMap<String, Route>, shared: &Shared) {
    let Some(path) = read_request_path(&mut stream) else {
        return;
    };

    shared.total.fetch_add(1, Ordering::SeqCst);
    if let Ok(mut per_path) = shared.per_path.lock() {
        *per_path.entry(path.clone()).or_default() += 1;
    }

    let (status, body) = match routes.get(&path) {
        Some(route) => (route.status, route.body.as_str()),
        None => (404, "not found"),
    };

    let response = format!(
        "HTTP/1.1 {status} {reason}\r\nContent-Type: text/plain\r\nContent-Length: {len}\r\nConnection: close\r\n\r\n{body}",
        reason = reason_phrase(status),
        len = body.len(),
    );
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.flush();
}

/// Read the request head and return the request target.
fn read_request_path(stream: &mut TcpStream) -> Option<String> {
    let mut head = Vec::new();
    let mut buf = [0u8; 1024];

    while !head.windows(4).any(|w| w == b"\r\n\r\n") {
        let n = stream.read(&mut buf).ok()?;
        if n == 0 {
            break;
        }
        head.extend_from_slice(&buf[..n]);
    }

    let text = String::from_utf8_lossy(&head);
    let request_line = text.lines().next()?;
    let mut parts = request_line.split_whitespace();
    let _method = parts.next()?;
    parts.next().map(str::to_string)
}

fn reason_phrase(status: u16) -> &'static str {
    match status {
        200 => "OK",
        404 => "Not Found",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "Status",
    }
}
