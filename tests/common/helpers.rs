use std::fs;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::TempDir;
use privy::{FetchStrategyBuilder, Variant};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// Common test constants
pub const TEST_TOKEN: &str = "test-token-123";
pub const TREE_URL: &str = "https://github.com/acme/widget/main/dist/widget.txt";
pub const ARCHIVE_URL: &str = "https://github.com/acme/widget/archive/v1.0.tar.gz";
pub const ZIP_ARCHIVE_URL: &str = "https://github.com/acme/widget/archive/v1.0.zip";
pub const ASSET_URL: &str = "https://github.com/acme/widget/releases/download/v1.0/b.tar.gz";
pub const MISSING_ASSET_URL: &str = "https://github.com/acme/widget/releases/download/v1.0/c.tar.gz";
pub const ASSET_BODY: &[u8] = b"\x1f\x8b binary payload";

static ENV_COUNTER: AtomicUsize = AtomicUsize::new(0);

/// Creates a temporary directory for testing purposes
pub fn create_temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temporary directory")
}

/// Sets a token in a variable no other test uses and returns its name.
pub fn unique_token_env(token: &str) -> String {
    let var = unique_unset_env();
    std::env::set_var(&var, token);
    var
}

/// Returns the name of a variable that is guaranteed to be unset.
pub fn unique_unset_env() -> String {
    let n = ENV_COUNTER.fetch_add(1, Ordering::SeqCst);
    let var = format!("PRIVY_TEST_TOKEN_{}_{}", std::process::id(), n);
    std::env::remove_var(&var);
    var
}

/// A builder pointed at the mock server, with a fresh token variable.
pub fn builder(server: &MockServer, variant: Variant) -> FetchStrategyBuilder {
    FetchStrategyBuilder::new(variant)
        .api_url(server.uri())
        .content_url(format!("{}/raw", server.uri()))
        .token_env(unique_token_env(TEST_TOKEN))
        .hidden()
}

/// Release metadata with two assets, `a.tar.gz` (1) and `b.tar.gz` (2).
pub fn release_json(server: &MockServer) -> serde_json::Value {
    serde_json::json!({
        "tag_name": "v1.0",
        "name": "Widget 1.0",
        "tarball_url": format!("{}/repos/acme/widget/tarball/v1.0", server.uri()),
        "zipball_url": format!("{}/repos/acme/widget/zipball/v1.0", server.uri()),
        "assets": [
            { "id": 1, "name": "a.tar.gz", "size": 10 },
            { "id": 2, "name": "b.tar.gz", "size": 20 }
        ]
    })
}

/// Mounts a successful repository access check, expected `times` times.
pub async fn mount_repository(server: &MockServer, times: u64) {
    Mock::given(method("GET"))
        .and(path("/repos/acme/widget"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "name": "widget",
            "full_name": "acme/widget",
            "private": true,
            "default_branch": "main"
        })))
        .expect(times)
        .mount(server)
        .await;
}

/// Mounts the release metadata endpoint, expected `times` times.
pub async fn mount_release(server: &MockServer, times: u64) {
    Mock::given(method("GET"))
        .and(path("/repos/acme/widget/releases/tags/v1.0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(release_json(server)))
        .expect(times)
        .mount(server)
        .await;
}

/// Serves one response announcing `announced` bytes but sending only `body`,
/// then drops the connection. Returns the base URL.
pub fn serve_truncated_body(announced: usize, body: &'static [u8]) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind listener");
    let addr = listener.local_addr().expect("Failed to read local address");

    std::thread::spawn(move || {
        let (mut stream, _) = listener.accept().expect("Failed to accept connection");
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            match stream.read(&mut buf) {
                Ok(0) | Err(_) => return,
                Ok(n) => request.extend_from_slice(&buf[..n]),
            }
        }
        let head = format!(
            "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nContent-Type: application/octet-stream\r\n\r\n",
            announced
        );
        let _ = stream.write_all(head.as_bytes());
        let _ = stream.write_all(body);
        let _ = stream.flush();
    });

    format!("http://{}", addr)
}

/// Asserts that a directory holds no files at all.
pub fn assert_dir_empty(dir: &Path) {
    let entries: Vec<_> = fs::read_dir(dir)
        .expect("Failed to read directory")
        .collect();
    assert!(entries.is_empty(), "Directory should be empty: {:?}", entries);
}

/// Asserts that a file holds exactly `expected`.
pub fn assert_file_content(path: &Path, expected: &[u8]) {
    let content = fs::read(path).expect("Failed to read file");
    assert_eq!(content, expected, "File content mismatch at path: {:?}", path);
}
