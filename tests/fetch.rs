//! End-to-end tests: resolve a reference, then fetch it into a cache root
//!
//! HTTP sources are served by wiremock; the fetch itself is blocking and runs
//! on the test thread while the mock server answers from its own runtime.

use levitate_fetch::{Config, FetchError, Options, SourceKind, fetch, resolve};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const HELLO_SHA256: &str = "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9";

/// Config with a single cache root inside a fresh temp directory
fn create_cache() -> (TempDir, Config) {
    let dir = TempDir::new().unwrap();
    let mut config = Config::new();
    config.set_define("_sourcedir", &dir.path().join("sources").display().to_string());
    (dir, config)
}

async fn serve_hello(expected_calls: u64) -> MockServer {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/dist/hello-1.0.tar.gz"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"hello world".as_slice()))
        .expect(expected_calls)
        .mount(&mock_server)
        .await;
    mock_server
}

// =============================================================================
// Plain downloads
// =============================================================================

#[tokio::test]
async fn test_resolve_then_fetch_verified_tarball() {
    let mock_server = serve_hello(1).await;
    let (_dir, mut config) = create_cache();
    config.set_hash("hello-1.0.tar.gz", &format!("sha256 {}", HELLO_SHA256));

    let reference = format!("{}/dist/hello-1.0.tar.gz", mock_server.uri());
    let source = resolve(&reference, "_sourcedir", &config).unwrap();
    assert_eq!(source.name, "hello-1.0");
    assert_eq!(source.ext, ".tar.gz");
    assert!(matches!(source.kind, SourceKind::Plain { .. }));

    fetch(&source.url, &source.local, &Options::default(), &config).unwrap();

    assert_eq!(std::fs::read(&source.local).unwrap(), b"hello world");
    assert_eq!(source.symlink, source.local);
}

#[tokio::test]
async fn test_second_fetch_uses_cache() {
    // The mock fails verification on drop if it is hit more than once
    let mock_server = serve_hello(1).await;
    let (_dir, config) = create_cache();

    let reference = format!("{}/dist/hello-1.0.tar.gz", mock_server.uri());
    let source = resolve(&reference, "_sourcedir", &config).unwrap();

    fetch(&source.url, &source.local, &Options::default(), &config).unwrap();
    fetch(&source.url, &source.local, &Options::default(), &config).unwrap();

    let again = resolve(&reference, "_sourcedir", &config).unwrap();
    assert_eq!(again, source);
}

#[tokio::test]
async fn test_fetch_without_hash_spec_succeeds() {
    let mock_server = serve_hello(1).await;
    let (_dir, config) = create_cache();

    let reference = format!("{}/dist/hello-1.0.tar.gz", mock_server.uri());
    let source = resolve(&reference, "_sourcedir", &config).unwrap();

    fetch(&source.url, &source.local, &Options::default(), &config).unwrap();
    assert!(source.local.is_file());
}

#[tokio::test]
async fn test_checksum_mismatch_leaves_nothing_cached() {
    let mock_server = serve_hello(1).await;
    let (_dir, mut config) = create_cache();
    config.set_hash("hello-1.0.tar.gz", &format!("sha256 {}", "0".repeat(64)));

    let reference = format!("{}/dist/hello-1.0.tar.gz", mock_server.uri());
    let source = resolve(&reference, "_sourcedir", &config).unwrap();
    let result = fetch(&source.url, &source.local, &Options::default(), &config);

    assert!(matches!(result, Err(FetchError::ChecksumFailure { .. })));
    assert!(!source.local.exists());
}

#[tokio::test]
async fn test_mirror_base_preferred_over_origin() {
    let mirror = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/mirror/hello-1.0.tar.gz"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"hello world".as_slice()))
        .expect(1)
        .mount(&mirror)
        .await;
    let origin = serve_hello(0).await;
    let (_dir, config) = create_cache();

    let reference = format!("{}/dist/hello-1.0.tar.gz", origin.uri());
    let source = resolve(&reference, "_sourcedir", &config).unwrap();
    let options = Options {
        mirror_bases: Some(vec![format!("{}/mirror", mirror.uri())]),
        ..Default::default()
    };

    fetch(&source.url, &source.local, &options, &config).unwrap();
    assert!(source.local.is_file());
}

#[tokio::test]
async fn test_all_candidates_failing() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;
    let (_dir, config) = create_cache();

    let reference = format!("{}/dist/gone-2.0.tar.xz", mock_server.uri());
    let source = resolve(&reference, "_sourcedir", &config).unwrap();
    let result = fetch(&source.url, &source.local, &Options::default(), &config);

    assert!(matches!(result, Err(FetchError::AllMirrorsExhausted { .. })));
    assert!(!source.local.exists());
}

// =============================================================================
// Modes
// =============================================================================

#[test]
fn test_dry_run_touches_nothing() {
    let (dir, config) = create_cache();
    let source = resolve("http://127.0.0.1:9/dist/foo-1.0.tar.gz", "_sourcedir", &config).unwrap();
    let options = Options {
        dry_run: true,
        ..Default::default()
    };

    fetch(&source.url, &source.local, &options, &config).unwrap();

    assert!(!source.local.exists());
    assert!(!dir.path().join("sources").exists());
}

#[test]
fn test_downloads_disabled_requires_cached_file() {
    let (_dir, config) = create_cache();
    let source = resolve("http://127.0.0.1:9/dist/foo-1.0.tar.gz", "_sourcedir", &config).unwrap();
    let options = Options {
        download_disabled: true,
        ..Default::default()
    };

    let result = fetch(&source.url, &source.local, &options, &config);
    assert!(matches!(result, Err(FetchError::SourceNotFound(_))));

    std::fs::write(&source.local, b"cached").unwrap();
    fetch(&source.url, &source.local, &options, &config).unwrap();
}

// =============================================================================
// Cache roots
// =============================================================================

#[test]
fn test_stale_cached_file_dropped_during_resolve() {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("sources");
    std::fs::create_dir_all(&root).unwrap();
    std::fs::write(root.join("foo-1.0.tar.gz"), b"stale").unwrap();

    let mut config = Config::new();
    config.set_define("_sourcedir", &root.display().to_string());
    config.set_hash("foo-1.0.tar.gz", &format!("sha256 {}", HELLO_SHA256));

    let source = resolve("http://example.org/foo-1.0.tar.gz", "_sourcedir", &config).unwrap();

    assert_eq!(source.local, root.join("foo-1.0.tar.gz"));
    assert!(!source.local.exists());
}

#[test]
fn test_second_root_used_when_it_holds_the_file() {
    let dir = TempDir::new().unwrap();
    let first = dir.path().join("a");
    let second = dir.path().join("b");
    std::fs::create_dir_all(&second).unwrap();
    std::fs::write(second.join("foo-1.0.tar.gz"), b"hello world").unwrap();

    let mut config = Config::new();
    config.set_define(
        "_sourcedir",
        &format!("{}:{}", first.display(), second.display()),
    );

    let source = resolve("http://127.0.0.1:9/foo-1.0.tar.gz", "_sourcedir", &config).unwrap();
    assert_eq!(source.local_prefix, second);

    // Already cached, so no network attempt is made
    fetch(&source.url, &source.local, &Options::default(), &config).unwrap();
}

// =============================================================================
// Local trees
// =============================================================================

#[test]
fn test_file_reference_to_local_tree() {
    let (dir, config) = create_cache();
    let tree = dir.path().join("tree");
    std::fs::create_dir_all(&tree).unwrap();

    let reference = format!("file://{}", tree.display());
    let source = resolve(&reference, "_sourcedir", &config).unwrap();
    assert!(matches!(source.kind, SourceKind::File));

    fetch(&source.url, &source.local, &Options::default(), &config).unwrap();
}

#[test]
fn test_file_reference_missing_tree() {
    let (_dir, config) = create_cache();
    let reference = "file:///definitely/not/a/tree";
    let source = resolve(reference, "_sourcedir", &config).unwrap();

    let result = fetch(&source.url, &source.local, &Options::default(), &config);
    assert!(matches!(result, Err(FetchError::AllMirrorsExhausted { .. })));
}

#[test]
fn test_undefined_cache_root() {
    let config = Config::new();
    let result = resolve("http://example.org/foo.tar.gz", "_sourcedir", &config);
    assert!(matches!(result, Err(FetchError::UndefinedMacro(ref key)) if key == "_sourcedir"));
}
