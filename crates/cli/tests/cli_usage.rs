//! Command line usage tests.
//!
//! These run the built binary and only cover paths that fail or finish
//! before any external tool is needed.

use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

fn msic(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_msic"))
        .args(args)
        .env_remove("MSIC_CONFIG")
        .env("RUST_LOG", "error")
        .output()
        .expect("Failed to run msic")
}

fn path(p: &Path) -> &str {
    p.to_str().unwrap()
}

#[test]
fn test_no_inputs() {
    let temp = TempDir::new().unwrap();
    let out = temp.path().join("out");

    let output = msic(&["copy", path(&out)]);

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("You must provide inputs"));
    assert!(!out.exists());

    let output = msic(&["compress"]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_conflicting_overwrite_flags() {
    let temp = TempDir::new().unwrap();
    let input = temp.path().join("in");
    let out = temp.path().join("out");
    std::fs::create_dir_all(&input).unwrap();
    std::fs::write(input.join("a.mp3"), b"mp3").unwrap();

    let output = msic(&["copy", "-y", "-n", path(&input), path(&out)]);

    assert_eq!(output.status.code(), Some(1));
    assert!(!out.exists());
}

#[test]
fn test_input_not_a_directory() {
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("a.mp3");
    let out = temp.path().join("out");
    std::fs::write(&file, b"mp3").unwrap();

    let output = msic(&["compress", path(&file), path(&out)]);

    assert_eq!(output.status.code(), Some(1));
    assert!(!out.exists());
}

#[test]
fn test_unknown_argument() {
    let output = msic(&["copy", "--frobnicate", "a", "b"]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_help_and_version() {
    assert_eq!(msic(&["--help"]).status.code(), Some(0));
    assert_eq!(msic(&["--version"]).status.code(), Some(0));
}

#[test]
fn test_missing_config_file() {
    let temp = TempDir::new().unwrap();
    let input = temp.path().join("in");
    let out = temp.path().join("out");
    std::fs::create_dir_all(&input).unwrap();
    let config = temp.path().join("missing.toml");

    let output = msic(&["-c", path(&config), "compress", path(&input), path(&out)]);

    assert_eq!(output.status.code(), Some(3));
    assert!(!out.exists());
}

#[test]
fn test_invalid_config_file() {
    let temp = TempDir::new().unwrap();
    let input = temp.path().join("in");
    let out = temp.path().join("out");
    std::fs::create_dir_all(&input).unwrap();
    let config = temp.path().join("msic.toml");
    std::fs::write(&config, "[engine]\nmax_parallel_files = 0\n").unwrap();

    let output = msic(&["-c", path(&config), "compress", path(&input), path(&out)]);

    assert_eq!(output.status.code(), Some(3));
    assert!(!out.exists());
}

#[test]
fn test_playlist_prefix_with_absolute() {
    let temp = TempDir::new().unwrap();
    let input = temp.path().join("in.m3u");
    let out = temp.path().join("out.m3u");
    std::fs::write(&input, "a.mp3\n").unwrap();

    let output = msic(&[
        "playlist",
        path(&input),
        path(&out),
        "--relative-prefix",
        "music",
        "--absolute",
    ]);

    assert_eq!(output.status.code(), Some(1));
    assert!(!out.exists());
}

#[test]
fn test_playlist_rewrite() {
    let temp = TempDir::new().unwrap();
    let input = temp.path().join("in.m3u");
    let out = temp.path().join("out.m3u");
    std::fs::write(
        &input,
        "#EXTM3U\n#EXTINF:1,Artist - Title\n/music/Artist/a.flac\nhttp://radio.example/live\n",
    )
    .unwrap();

    let output = msic(&[
        "playlist",
        path(&input),
        path(&out),
        "--relative-to",
        "/music",
        "--relative-prefix",
        "../mirror",
    ]);

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(
        std::fs::read_to_string(&out).unwrap(),
        "#EXTM3U\n#EXTINF:1,Artist - Title\n../mirror/Artist/a.flac\nhttp://radio.example/live\n"
    );
}

#[test]
fn test_playlist_entry_outside_base() {
    let temp = TempDir::new().unwrap();
    let input = temp.path().join("in.m3u");
    let out = temp.path().join("out.m3u");
    std::fs::write(&input, "/podcasts/a.mp3\n").unwrap();

    let output = msic(&["playlist", path(&input), path(&out), "--relative-to", "/music"]);

    assert_eq!(output.status.code(), Some(2));
    assert!(!out.exists());
}
