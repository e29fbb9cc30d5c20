//! Integration tests for the CLI wiring
//!
//! The session is driven with in-memory input so no terminal is needed.

use std::io::Write;
use std::sync::Arc;

use reprise_audio_desktop::HeadlessEngine;
use reprise_cli::commands::Command;
use reprise_cli::session::{self, Flow};
use reprise_cli::{App, RepriseConfig};
use reprise_core::identity::UriMd5Hasher;
use reprise_core::ChecksumKind;
use reprise_playback::PlaybackController;
use reprise_storage::{MemoryKeyValueStore, TrackHistoryService, TrackProgressRepository};
use tempfile::TempDir;

fn memory_controller() -> PlaybackController {
    let store = Arc::new(MemoryKeyValueStore::new());
    PlaybackController::new(
        Arc::new(HeadlessEngine),
        TrackProgressRepository::new(store.clone(), Arc::new(UriMd5Hasher)),
        TrackHistoryService::new(store),
    )
}

#[test]
fn test_config_file_overrides_defaults() {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(
        file,
        r#"
[storage]
database_url = "sqlite://./elsewhere/state.db"

[identity]
checksum = "md5-uri"

[playback]
relative_seek_ms = 30000
continues_in_background = false
"#
    )
    .unwrap();

    let config = RepriseConfig::load(Some(file.path())).unwrap();
    config.validate().unwrap();

    assert_eq!(config.storage.database_url, "sqlite://./elsewhere/state.db");
    assert_eq!(config.checksum_kind().unwrap(), ChecksumKind::Md5Uri);
    assert_eq!(config.playback.relative_seek_ms, 30_000);
    assert!(!config.player_options().continues_in_background);
}

#[test]
fn test_missing_explicit_config_file_is_an_error() {
    let result = RepriseConfig::load(Some(std::path::Path::new("/no/such/reprise.toml")));
    assert!(result.is_err());
}

#[tokio::test]
async fn test_app_creates_database_directory() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("nested").join("reprise.db");

    let mut config = RepriseConfig::default();
    config.storage.database_url = format!("sqlite://{}", db_path.display());

    let app = App::open(config).await.unwrap();

    assert!(db_path.exists());
    assert!(!app.controller().is_loaded());
}

#[tokio::test]
async fn test_open_missing_file_keeps_session_alive() {
    let mut controller = memory_controller();

    let flow = session::execute(
        &mut controller,
        Command::Open("/no/such/track.mp3".to_string()),
        15_000,
    )
    .await;

    assert_eq!(flow, Flow::Continue);
    assert!(!controller.is_loaded());
    assert_eq!(session::status_line(&controller), "Nothing loaded");
}

#[tokio::test]
async fn test_quit_ends_the_session() {
    let mut controller = memory_controller();

    let flow = session::execute(&mut controller, Command::Quit, 15_000).await;

    assert_eq!(flow, Flow::Quit);
}

#[tokio::test]
async fn test_run_stops_at_quit() {
    let mut controller = memory_controller();
    let input: &[u8] = b"i\nnonsense\n\np\nq\no /never/reached.mp3\n";

    session::run(&mut controller, input, 15_000).await.unwrap();

    assert!(!controller.is_loaded());
}

#[tokio::test]
async fn test_run_stops_at_end_of_input() {
    let mut controller = memory_controller();
    let input: &[u8] = b"r\n";

    session::run(&mut controller, input, 15_000).await.unwrap();
}
