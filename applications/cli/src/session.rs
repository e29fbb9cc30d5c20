//! Interactive session
//!
//! Reads commands from stdin and watches for the end of the loaded track at
//! the same time. The controller is only ever touched from this loop.

use reprise_core::util::format_time;
use reprise_core::{AudioFile, RepriseError};
use reprise_playback::PlaybackController;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::app::resolve_uri;
use crate::commands::{Command, HELP};

/// Whether the loop should keep going
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Run the session until `q` or end of input
pub async fn run<R>(
    controller: &mut PlaybackController,
    input: R,
    relative_seek_ms: i64,
) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();
    println!("{HELP}");

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                if line.trim().is_empty() {
                    continue;
                }

                match line.parse::<Command>() {
                    Ok(command) => {
                        if execute(controller, command, relative_seek_ms).await == Flow::Quit {
                            break;
                        }
                    }
                    Err(e) => println!("{e}"),
                }
            }
            () = controller.track_ended() => {
                match controller.handle_track_ended().await {
                    Ok(()) => println!("Track ended"),
                    Err(e) => report(&e),
                }
            }
        }
    }

    tracing::debug!("Session finished");
    Ok(())
}

/// Apply one command to the controller
///
/// Controller errors are reported and the session continues.
pub async fn execute(
    controller: &mut PlaybackController,
    command: Command,
    relative_seek_ms: i64,
) -> Flow {
    let result = match command {
        Command::PlayPause => controller.play_pause().await,
        Command::Seek(position) => controller.seek(position).await,
        Command::Forward => controller.relative_seek(relative_seek_ms).await,
        Command::Back => controller.relative_seek(-relative_seek_ms).await,
        Command::Open(path) => {
            let file = AudioFile::from_uri(resolve_uri(&path));
            controller.load(&file).await
        }
        Command::Reset => controller.reset().await,
        Command::Info => Ok(()),
        Command::Help => {
            println!("{HELP}");
            return Flow::Continue;
        }
        Command::Quit => return Flow::Quit,
    };

    match result {
        Ok(()) => println!("{}", status_line(controller)),
        Err(e) => report(&e),
    }
    Flow::Continue
}

/// One-line status: title, state, position and length
pub fn status_line(controller: &PlaybackController) -> String {
    if !controller.is_loaded() {
        return "Nothing loaded".to_string();
    }

    format!(
        "{} [{}] {} / {}",
        controller.title(),
        controller.player_state(),
        format_time(controller.current_time()),
        format_time(controller.duration()),
    )
}

/// Log an error at the level its kind deserves
pub fn report(err: &RepriseError) {
    match err {
        RepriseError::FileNotFound(uri) => {
            tracing::warn!(%uri, "File not found");
            println!("File not found: {uri}");
        }
        RepriseError::NoStoredData(reason) => {
            tracing::info!(%reason, "No stored data");
        }
        other => {
            tracing::error!(error = %other, "Playback operation failed");
            println!("Error: {other}");
        }
    }
}
