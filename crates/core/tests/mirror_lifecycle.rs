//! Mirror engine lifecycle integration tests.
//!
//! These tests run the engine over real temporary trees with mock
//! collaborators:
//! - Structure preservation and output naming
//! - Idempotence of repeated runs
//! - Non-audio passthrough and skipping
//! - Failure isolation and partial file cleanup
//! - Cancellation

use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tokio::sync::watch;

use msic_core::{
    testing::{MockClassifier, MockConverter},
    AudioMode, EncodingProfile, FsPlacer, MirrorConfig, MirrorEngine, MirrorError,
    RunReport,
};

/// Test helper owning the input and output trees and the mocks.
struct TestHarness {
    converter: MockConverter,
    classifier: MockClassifier,
    _temp_dir: TempDir,
    input: PathBuf,
    output: PathBuf,
}

impl TestHarness {
    fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let input = temp_dir.path().join("library");
        let output = temp_dir.path().join("mirror");
        std::fs::create_dir_all(&input).expect("Failed to create input dir");

        Self {
            converter: MockConverter::new(),
            classifier: MockClassifier::new(),
            _temp_dir: temp_dir,
            input,
            output,
        }
    }

    fn add_file(&self, relative: &str, contents: &[u8]) -> PathBuf {
        let path = self.input.join(relative);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, contents).unwrap();
        path
    }

    fn engine(&self, config: MirrorConfig) -> MirrorEngine<MockConverter, MockClassifier> {
        MirrorEngine::new(
            config,
            self.converter.clone(),
            self.classifier.clone(),
            FsPlacer::with_defaults(),
        )
    }

    async fn run(&self, config: MirrorConfig) -> RunReport {
        self.engine(config)
            .run(&[self.input.clone()], &self.output)
            .await
            .expect("Run failed")
    }

    fn out(&self, relative: &str) -> PathBuf {
        self.output.join(relative)
    }
}

/// Every file below `root`, relative to it, sorted.
fn tree(root: &Path) -> Vec<String> {
    let mut files = Vec::new();
    let mut stack = vec![root.to_path_buf()];
    while let Some(dir) = stack.pop() {
        for entry in std::fs::read_dir(&dir).unwrap() {
            let path = entry.unwrap().path();
            if path.is_dir() {
                stack.push(path);
            } else {
                let relative = path.strip_prefix(root).unwrap();
                files.push(relative.to_string_lossy().into_owned());
            }
        }
    }
    files.sort();
    files
}

fn compress() -> MirrorConfig {
    MirrorConfig {
        audio_mode: AudioMode::Compress,
        profile: EncodingProfile::compress_preset(),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_compress_mirrors_structure() {
    let harness = TestHarness::new();
    harness.add_file("a.wav", b"wav");
    harness.add_file("sub/b.mp3", b"mp3");

    let report = harness.run(compress()).await;

    assert_eq!(tree(&harness.output), vec!["a.wav.mp3", "sub/b.mp3.mp3"]);
    assert_eq!(report.transcodes, 2);
    assert_eq!(report.directories, 2);
    assert!(!report.has_failures());

    let conversions = harness.converter.recorded_conversions().await;
    assert_eq!(conversions.len(), 2);
    for conversion in &conversions {
        assert_eq!(conversion.job.profile.bitrate_kbps, 64);
        assert!(conversion.job.profile.map_metadata);
        assert!(conversion.job.overwrite);
    }

    // Files of a directory come before its subdirectories
    assert_eq!(conversions[0].job.input_path, harness.input.join("a.wav"));
    assert_eq!(conversions[1].job.input_path, harness.input.join("sub/b.mp3"));
}

#[tokio::test]
async fn test_second_run_with_skip_existing_writes_nothing() {
    let harness = TestHarness::new();
    harness.add_file("a.flac", b"flac");
    harness.add_file("notes.txt", b"notes");
    harness.add_file("disc 2/b.flac", b"flac");

    let config = MirrorConfig {
        emit_metadata: true,
        skip_existing: true,
        ..compress()
    };

    let first = harness.run(config.clone()).await;
    assert_eq!(first.files_processed, 3);
    let before = tree(&harness.output);
    let conversions = harness.converter.conversion_count().await;
    let probes = harness.converter.probe_count().await;

    let second = harness.run(config).await;

    assert_eq!(second.files_processed, 0);
    assert_eq!(second.files_skipped, 3);
    assert_eq!(tree(&harness.output), before);
    assert_eq!(harness.converter.conversion_count().await, conversions);
    assert_eq!(harness.converter.probe_count().await, probes);
}

#[tokio::test]
async fn test_second_metadata_only_run_writes_nothing() {
    let harness = TestHarness::new();
    let track = harness.add_file("a.flac", b"flac");
    harness.converter.set_cover_art(&track, b"abc".to_vec()).await;

    let config = MirrorConfig {
        audio_mode: AudioMode::None,
        emit_metadata: true,
        skip_existing: true,
        ..Default::default()
    };

    let first = harness.run(config.clone()).await;
    assert_eq!(first.files_processed, 1);
    let artwork = harness.out("metadata-artwork/ba7816bf8f.jpg");
    let modified = std::fs::metadata(&artwork).unwrap().modified().unwrap();
    let probes = harness.converter.probe_count().await;

    let second = harness.run(config).await;

    assert_eq!(second.files_processed, 0);
    assert_eq!(second.files_skipped, 1);
    assert_eq!(second.outputs_written, 0);
    assert_eq!(harness.converter.probe_count().await, probes);
    assert_eq!(
        std::fs::metadata(&artwork).unwrap().modified().unwrap(),
        modified
    );
}

#[tokio::test]
async fn test_second_run_skips_equivalent_durations() {
    let harness = TestHarness::new();
    harness.add_file("a.flac", b"flac");

    harness.run(compress()).await;
    let second = harness.run(compress()).await;

    assert_eq!(second.files_skipped, 1);
    assert_eq!(harness.converter.conversion_count().await, 1);
}

#[tokio::test]
async fn test_non_audio_passthrough() {
    let harness = TestHarness::new();
    let bytes: Vec<u8> = (0..=255u8).cycle().take(10_000).collect();
    harness.add_file("art/booklet.pdf", &bytes);
    harness.add_file("art/cover.jpg", b"jpeg");

    let report = harness.run(compress()).await;

    assert_eq!(std::fs::read(harness.out("art/booklet.pdf")).unwrap(), bytes);
    assert_eq!(std::fs::read(harness.out("art/cover.jpg")).unwrap(), b"jpeg");
    assert_eq!(report.transcodes, 0);
}

#[tokio::test]
async fn test_skip_non_audio_creates_no_directories() {
    let harness = TestHarness::new();
    harness.add_file("scans/front.png", b"png");
    harness.add_file("a.mp3", b"mp3");

    let config = MirrorConfig {
        skip_non_audio: true,
        ..compress()
    };
    harness.run(config).await;

    assert_eq!(tree(&harness.output), vec!["a.mp3.mp3"]);
    assert!(!harness.out("scans").exists());
}

#[tokio::test]
async fn test_audio_none_with_metadata() {
    let harness = TestHarness::new();
    let track = harness.add_file("a.flac", b"flac");
    harness.converter.set_cover_art(&track, b"abc".to_vec()).await;

    let config = MirrorConfig {
        audio_mode: AudioMode::None,
        emit_metadata: true,
        ..Default::default()
    };
    harness.run(config).await;

    assert_eq!(
        tree(&harness.output),
        vec!["a.flac.metadata.json", "metadata-artwork/ba7816bf8f.jpg"]
    );
    let sidecar: serde_json::Value =
        serde_json::from_slice(&std::fs::read(harness.out("a.flac.metadata.json")).unwrap())
            .unwrap();
    assert!(sidecar["ffprobe"]["streams"].is_array());
}

#[tokio::test]
async fn test_transcode_failure_does_not_stop_siblings() {
    let harness = TestHarness::new();
    let broken = harness.add_file("a.flac", b"flac");
    harness.add_file("b.flac", b"flac");
    harness.add_file("c/d.flac", b"flac");
    harness
        .converter
        .fail_conversion_of(&broken, "Invalid data found when processing input")
        .await;

    let report = harness.run(compress()).await;

    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].path, broken);
    assert_eq!(tree(&harness.output), vec!["b.flac.mp3", "c/d.flac.mp3"]);
}

#[cfg(unix)]
#[tokio::test]
async fn test_broken_symlink_is_reported() {
    let harness = TestHarness::new();
    harness.add_file("a.mp3", b"mp3");
    std::os::unix::fs::symlink(harness.input.join("gone.mp3"), harness.input.join("b.mp3"))
        .unwrap();
    harness.add_file("c.mp3", b"mp3");

    let report = harness.run(compress()).await;

    assert_eq!(report.unknown_entries, 1);
    assert_eq!(tree(&harness.output), vec!["a.mp3.mp3", "c.mp3.mp3"]);
}

#[cfg(unix)]
#[tokio::test]
async fn test_symlink_cycle_terminates() {
    let harness = TestHarness::new();
    harness.add_file("sub/a.mp3", b"mp3");
    std::os::unix::fs::symlink(&harness.input, harness.input.join("sub/loop")).unwrap();

    let report = harness.run(compress()).await;

    assert_eq!(report.transcodes, 1);
    assert_eq!(tree(&harness.output), vec!["sub/a.mp3.mp3"]);
}

#[tokio::test]
async fn test_output_inside_input() {
    let harness = TestHarness::new();
    harness.add_file("a.mp3", b"mp3");
    let output = harness.input.join("zz-mirror");

    let report = harness
        .engine(compress())
        .run(&[harness.input.clone()], &output)
        .await
        .unwrap();

    assert_eq!(report.transcodes, 1);
    assert_eq!(tree(&output), vec!["a.mp3.mp3"]);

    // The output tree now exists inside the input and is not descended into
    let report = harness
        .engine(compress())
        .run(&[harness.input.clone()], &output)
        .await
        .unwrap();
    assert_eq!(report.directories, 1);
    assert_eq!(tree(&output), vec!["a.mp3.mp3"]);
}

#[tokio::test]
async fn test_multiple_inputs_share_output() {
    let harness = TestHarness::new();
    harness.add_file("a.mp3", b"mp3");
    let second = harness.input.parent().unwrap().join("second");
    std::fs::create_dir_all(second.join("x")).unwrap();
    std::fs::write(second.join("x/b.mp3"), b"mp3").unwrap();

    harness
        .engine(compress())
        .run(&[harness.input.clone(), second], &harness.output)
        .await
        .unwrap();

    assert_eq!(tree(&harness.output), vec!["a.mp3.mp3", "x/b.mp3.mp3"]);
}

#[tokio::test]
async fn test_input_must_be_directory() {
    let harness = TestHarness::new();
    let file = harness.add_file("a.mp3", b"mp3");

    let result = harness.engine(compress()).run(&[file], &harness.output).await;

    assert!(matches!(result, Err(MirrorError::InputNotDirectory { .. })));
    assert!(!harness.output.exists());
}

#[tokio::test]
async fn test_missing_classifier_aborts_run() {
    let harness = TestHarness::new();
    harness.add_file("a.mp3", b"mp3");
    harness.classifier.set_unavailable(true).await;

    let engine = harness.engine(compress());
    assert!(matches!(
        engine.validate().await,
        Err(MirrorError::Configuration(_))
    ));

    let result = engine.run(&[harness.input.clone()], &harness.output).await;
    assert!(result.unwrap_err().is_fatal());
}

#[tokio::test]
async fn test_cancelled_run_stops_early() {
    let harness = TestHarness::new();
    harness.add_file("a.mp3", b"mp3");

    let (tx, rx) = watch::channel(false);
    tx.send(true).unwrap();

    let report = harness
        .engine(compress())
        .with_cancellation(rx)
        .run(&[harness.input.clone()], &harness.output)
        .await
        .unwrap();

    assert!(report.cancelled);
    assert_eq!(harness.converter.conversion_count().await, 0);
    assert!(!harness.output.exists());
}

#[tokio::test]
async fn test_serial_and_parallel_runs_agree() {
    let serial = TestHarness::new();
    let parallel = TestHarness::new();
    for harness in [&serial, &parallel] {
        for i in 0..8 {
            harness.add_file(&format!("d{}/t{}.flac", i % 3, i), b"flac");
            harness.add_file(&format!("d{}/n{}.txt", i % 2, i), b"txt");
        }
    }

    let serial_report = serial
        .run(MirrorConfig {
            max_parallel_files: 1,
            ..compress()
        })
        .await;
    let parallel_report = parallel
        .run(MirrorConfig {
            max_parallel_files: 8,
            ..compress()
        })
        .await;

    assert_eq!(tree(&serial.output), tree(&parallel.output));
    assert_eq!(serial_report.files_processed, 16);
    assert_eq!(parallel_report.files_processed, 16);
    assert_eq!(parallel.converter.conversion_count().await, 8);
}
