//! End-to-end CLI tests for the vider-dl binary.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ENTRY: &str = "https://vider.info/vid/+fabc123";

fn vider_dl() -> Command {
    let mut cmd = Command::cargo_bin("vider-dl").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}

/// Test that --help displays usage information and exits with code 0.
#[test]
fn test_binary_help_displays_usage() {
    vider_dl()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Download a video from vider"))
        .stdout(predicate::str::contains("--output-dir"))
        .stdout(predicate::str::contains("--concurrency"));
}

/// Test that --version displays version and exits with code 0.
#[test]
fn test_binary_version_displays_version() {
    vider_dl()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("vider-dl"));
}

/// Test that the video URL is required.
#[test]
fn test_binary_missing_video_url_fails() {
    vider_dl()
        .assert()
        .failure()
        .stderr(predicate::str::contains("<VIDEO_URL>"));
}

/// Test that an out-of-range concurrency is rejected by the parser.
#[test]
fn test_binary_rejects_bad_concurrency() {
    vider_dl()
        .args([ENTRY, "-c", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

/// Test that an entry without a video id exits 1 before any request.
#[test]
fn test_binary_invalid_entry_exits_one() {
    let temp_dir = TempDir::new().unwrap();
    vider_dl()
        .current_dir(temp_dir.path())
        .args(["-q", "https://vider.info/vid/fabc123"])
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Error: invalid video entry"));
}

async fn mount_site(server: &MockServer, page: &'static str) {
    Mock::given(method("GET"))
        .and(path("/embed/video/fabc123"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page))
        .mount(server)
        .await;
}

/// Full run: resolve the embed page, download the stream, print the report.
#[tokio::test]
async fn test_binary_downloads_video_end_to_end() {
    let server = MockServer::start().await;
    mount_site(
        &server,
        r#"<html><head><meta name="title" content="Film: Test!"></head>
           <body><div id="video_player" data-file-id="777"></div></body></html>"#,
    )
    .await;

    let body: Vec<u8> = (0..3000u32).map(|i| (i % 7) as u8).collect();
    Mock::given(method("GET"))
        .and(path("/video/777/v.mp4"))
        .and(header("range", "bytes=0-2999"))
        .respond_with(ResponseTemplate::new(206).set_body_bytes(body.clone()))
        .with_priority(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/video/777/v.mp4"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(body.clone()))
        .mount(&server)
        .await;

    let temp_dir = TempDir::new().unwrap();
    let out_dir = temp_dir.path().join("out");
    let uri = server.uri();
    let run_dir = temp_dir.path().to_path_buf();
    let out_arg = out_dir.clone();

    let assert = tokio::task::spawn_blocking(move || {
        vider_dl()
            .current_dir(&run_dir)
            .arg(ENTRY)
            .arg("--site-url")
            .arg(&uri)
            .arg("--stream-url")
            .arg(&uri)
            .arg("--output-dir")
            .arg(&out_arg)
            .arg("-q")
            .assert()
    })
    .await
    .unwrap();

    let expected_path = out_dir.join("Film- Test-.mp4");
    assert.success().stdout(predicate::str::contains(format!(
        "Downloaded Film: Test! to {}",
        expected_path.display()
    )));
    assert_eq!(std::fs::read(&expected_path).unwrap(), body);
}

/// A page without a title fails with exit 1 and creates no file.
#[tokio::test]
async fn test_binary_missing_title_exits_one_without_file() {
    let server = MockServer::start().await;
    mount_site(
        &server,
        r#"<html><body><div id="video_player" data-file-id="777"></div></body></html>"#,
    )
    .await;

    let temp_dir = TempDir::new().unwrap();
    let uri = server.uri();
    let run_dir = temp_dir.path().to_path_buf();

    let assert = tokio::task::spawn_blocking(move || {
        vider_dl()
            .current_dir(&run_dir)
            .args([ENTRY, "--site-url", uri.as_str(), "--stream-url", uri.as_str(), "-q"])
            .assert()
    })
    .await
    .unwrap();

    assert
        .code(1)
        .stderr(predicate::str::contains("Error: video 'title' not found"));
    assert_eq!(std::fs::read_dir(temp_dir.path()).unwrap().count(), 0);
}
