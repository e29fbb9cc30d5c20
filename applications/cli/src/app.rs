//! Service construction from configuration

use std::sync::Arc;

use anyhow::Context;
use reprise_audio_desktop::HeadlessEngine;
use reprise_core::identity::hasher_for;
use reprise_playback::PlaybackController;
use reprise_storage::{TrackHistoryService, TrackProgressRepository};

use crate::config::RepriseConfig;

/// Long-lived services shared by every subcommand
pub struct App {
    pub config: RepriseConfig,
    pub repository: TrackProgressRepository,
    pub history: TrackHistoryService,
}

impl App {
    /// Open the store and build the services
    pub async fn open(config: RepriseConfig) -> anyhow::Result<Self> {
        if let Some(dir) = config.database_dir() {
            std::fs::create_dir_all(&dir)
                .with_context(|| format!("Failed to create {}", dir.display()))?;
        }

        let store = reprise_storage::open_store(&config.storage.database_url)
            .await
            .with_context(|| format!("Failed to open {}", config.storage.database_url))?;
        let store = Arc::new(store);
        tracing::info!(database_url = %config.storage.database_url, "Database connected");

        let hasher = hasher_for(config.checksum_kind()?);
        let repository = TrackProgressRepository::new(store.clone(), hasher);
        let history = TrackHistoryService::new(store);

        Ok(Self {
            config,
            repository,
            history,
        })
    }

    /// Controller on the headless engine
    pub fn controller(&self) -> PlaybackController {
        PlaybackController::new(
            Arc::new(HeadlessEngine),
            self.repository.clone(),
            self.history.clone(),
        )
        .with_options(self.config.player_options())
    }
}

/// Turn a command-line path into the URI stored for it
///
/// Existing paths are made absolute so the same file always maps to the same
/// track id regardless of the working directory.
pub fn resolve_uri(path: &str) -> String {
    std::fs::canonicalize(path)
        .ok()
        .and_then(|p| p.to_str().map(str::to_string))
        .unwrap_or_else(|| path.to_string())
}
