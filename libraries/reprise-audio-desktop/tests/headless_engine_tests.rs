//! Integration tests for the headless engine
//!
//! Fixtures are real WAV files written with hound, so probing goes through
//! Symphonia exactly as it does for user files.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use reprise_audio_desktop::{HeadlessEngine, NOT_PREPARED, PREPARE_FAIL, RELEASED, SEEK_FAIL};
use reprise_core::RepriseError;
use reprise_playback::decoder::INVALID_PATH;
use reprise_playback::{DecoderHandle, NativeEngine, PlayerOptions};
use tempfile::TempDir;
use tokio::sync::mpsc;

const SAMPLE_RATE: u32 = 44_100;

/// Write a silent stereo 16-bit WAV of `duration_ms`
fn write_wav(dir: &Path, name: &str, duration_ms: u32) -> PathBuf {
    let path = dir.join(name);
    let spec = hound::WavSpec {
        channels: 2,
        sample_rate: SAMPLE_RATE,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer = hound::WavWriter::create(&path, spec).expect("Failed to create WAV");
    let frames = SAMPLE_RATE * duration_ms / 1000;
    for _ in 0..frames {
        writer.write_sample(0i16).unwrap();
        writer.write_sample(0i16).unwrap();
    }
    writer.finalize().expect("Failed to finalize WAV");
    path
}

fn uri(path: &Path) -> String {
    path.to_str().unwrap().to_string()
}

async fn prepared(path: &Path) -> DecoderHandle {
    let mut handle =
        DecoderHandle::open(&HeadlessEngine, &uri(path), PlayerOptions::default()).unwrap();
    handle.prepare().await.unwrap();
    handle
}

fn decoder_code(err: RepriseError) -> String {
    match err {
        RepriseError::Decoder { code, .. } => code,
        other => panic!("Expected Decoder error, got {other:?}"),
    }
}

// ===== Open / Prepare =====

#[test]
fn test_open_missing_file_is_invalid_path() {
    let err = HeadlessEngine
        .open("/definitely/not/here.wav", PlayerOptions::default())
        .err()
        .unwrap();
    assert_eq!(err.code, INVALID_PATH);
}

#[test]
fn test_open_directory_is_invalid_path() {
    let dir = TempDir::new().unwrap();
    let err = HeadlessEngine
        .open(&uri(dir.path()), PlayerOptions::default())
        .err()
        .unwrap();
    assert_eq!(err.code, INVALID_PATH);
}

#[tokio::test]
async fn test_prepare_reads_duration() {
    let dir = TempDir::new().unwrap();
    let path = write_wav(dir.path(), "one_second.wav", 1_000);

    let handle = prepared(&path).await;

    assert_eq!(handle.duration(), 1_000);
    assert_eq!(handle.current_time(), 0);
    assert!(!handle.is_playing());
}

#[tokio::test]
async fn test_file_scheme_is_accepted() {
    let dir = TempDir::new().unwrap();
    let path = write_wav(dir.path(), "scheme.wav", 500);

    let mut handle = DecoderHandle::open(
        &HeadlessEngine,
        &format!("file://{}", uri(&path)),
        PlayerOptions::default(),
    )
    .unwrap();
    handle.prepare().await.unwrap();

    assert_eq!(handle.duration(), 500);
}

#[tokio::test]
async fn test_prepare_garbage_fails() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("noise.mp3");
    std::fs::write(&path, b"this is not an audio container").unwrap();

    let mut handle =
        DecoderHandle::open(&HeadlessEngine, &uri(&path), PlayerOptions::default()).unwrap();
    let err = handle.prepare().await.unwrap_err();

    assert_eq!(decoder_code(err), PREPARE_FAIL);
}

#[tokio::test]
async fn test_prepare_after_file_removed_is_file_not_found() {
    let dir = TempDir::new().unwrap();
    let path = write_wav(dir.path(), "short_lived.wav", 500);

    let mut handle =
        DecoderHandle::open(&HeadlessEngine, &uri(&path), PlayerOptions::default()).unwrap();
    std::fs::remove_file(&path).unwrap();

    let err = handle.prepare().await.unwrap_err();
    assert!(matches!(err, RepriseError::FileNotFound(_)));
}

#[tokio::test]
async fn test_commands_before_prepare_fail() {
    let dir = TempDir::new().unwrap();
    let path = write_wav(dir.path(), "unprepared.wav", 500);

    let mut handle =
        DecoderHandle::open(&HeadlessEngine, &uri(&path), PlayerOptions::default()).unwrap();

    assert_eq!(decoder_code(handle.play_pause().await.unwrap_err()), NOT_PREPARED);
}

// ===== Transport =====

#[tokio::test]
async fn test_play_pause_moves_the_clock() {
    let dir = TempDir::new().unwrap();
    let path = write_wav(dir.path(), "clock.wav", 5_000);
    let mut handle = prepared(&path).await;

    handle.play_pause().await.unwrap();
    assert!(handle.is_playing());
    tokio::time::sleep(Duration::from_millis(60)).await;
    handle.play_pause().await.unwrap();
    assert!(!handle.is_playing());

    let paused_at = handle.current_time();
    assert!(paused_at >= 50, "clock only reached {paused_at}ms");
    assert!(paused_at < 5_000);

    tokio::time::sleep(Duration::from_millis(30)).await;
    assert_eq!(handle.current_time(), paused_at);
}

#[tokio::test]
async fn test_seek_clamps_and_rejects_negative() {
    let dir = TempDir::new().unwrap();
    let path = write_wav(dir.path(), "seek.wav", 2_000);
    let mut handle = prepared(&path).await;

    handle.seek(1_200).await.unwrap();
    assert_eq!(handle.current_time(), 1_200);

    handle.seek(60_000).await.unwrap();
    assert_eq!(handle.current_time(), 2_000);

    let err = handle.seek(-1).await.unwrap_err();
    assert_eq!(decoder_code(err), SEEK_FAIL);
    assert_eq!(handle.current_time(), 2_000);
}

#[tokio::test]
async fn test_stop_releases_the_player() {
    let dir = TempDir::new().unwrap();
    let path = write_wav(dir.path(), "stop.wav", 2_000);
    let mut handle = prepared(&path).await;

    handle.play_pause().await.unwrap();
    handle.stop().await.unwrap();

    assert!(!handle.is_playing());
    assert_eq!(decoder_code(handle.play_pause().await.unwrap_err()), RELEASED);
}

// ===== End of track =====

fn ended_channel(handle: &mut DecoderHandle) -> mpsc::UnboundedReceiver<()> {
    let (tx, rx) = mpsc::unbounded_channel();
    handle.on_ended(Box::new(move || {
        let _ = tx.send(());
    }));
    rx
}

#[tokio::test]
async fn test_end_of_track_fires_and_parks_at_end() {
    let dir = TempDir::new().unwrap();
    let path = write_wav(dir.path(), "short.wav", 150);
    let mut handle = prepared(&path).await;
    let mut ended = ended_channel(&mut handle);

    handle.play_pause().await.unwrap();

    tokio::time::timeout(Duration::from_secs(2), ended.recv())
        .await
        .expect("end of track not signalled")
        .unwrap();
    assert!(!handle.is_playing());
    assert_eq!(handle.current_time(), 150);
}

#[tokio::test]
async fn test_pause_cancels_end_timer() {
    let dir = TempDir::new().unwrap();
    let path = write_wav(dir.path(), "paused.wav", 150);
    let mut handle = prepared(&path).await;
    let mut ended = ended_channel(&mut handle);

    handle.play_pause().await.unwrap();
    handle.play_pause().await.unwrap();

    let result = tokio::time::timeout(Duration::from_millis(400), ended.recv()).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_auto_destroy_releases_after_end() {
    let dir = TempDir::new().unwrap();
    let path = write_wav(dir.path(), "auto.wav", 100);
    let options = PlayerOptions {
        continues_in_background: false,
        auto_destroy: true,
    };

    let engine: Arc<dyn NativeEngine> = Arc::new(HeadlessEngine);
    let mut handle = DecoderHandle::open(engine.as_ref(), &uri(&path), options).unwrap();
    handle.prepare().await.unwrap();
    let mut ended = ended_channel(&mut handle);

    handle.play_pause().await.unwrap();
    tokio::time::timeout(Duration::from_secs(2), ended.recv())
        .await
        .expect("end of track not signalled")
        .unwrap();

    assert_eq!(decoder_code(handle.seek(0).await.unwrap_err()), RELEASED);
}
