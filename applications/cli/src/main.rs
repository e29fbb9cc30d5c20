/// Reprise - audio player that resumes where you stopped
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use reprise_cli::app::resolve_uri;
use reprise_cli::{session, App, RepriseConfig};
use reprise_core::util::format_time;
use reprise_core::{AudioFile, RepriseError};
use tokio::io::BufReader;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "reprise")]
#[command(about = "Audio player that remembers where you stopped", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "REPRISE_CONFIG_FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Open a file and start an interactive session
    Play {
        /// Audio file path
        path: String,
    },
    /// Reopen the last played file and start an interactive session
    Resume,
    /// Print the stored resume point of a file
    Progress {
        /// Audio file path
        path: String,
    },
    /// Print the last played file
    Last,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = RepriseConfig::load(cli.config.as_deref())?;
    config.validate()?;

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.logging.filter.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let app = App::open(config).await?;

    match cli.command {
        Commands::Play { path } => play(&app, &path).await?,
        Commands::Resume => resume(&app).await?,
        Commands::Progress { path } => progress(&app, &path).await?,
        Commands::Last => last(&app).await?,
    }

    Ok(())
}

async fn play(app: &App, path: &str) -> anyhow::Result<()> {
    let mut controller = app.controller();

    let file = AudioFile::from_uri(resolve_uri(path));
    if let Err(e) = controller.load(&file).await {
        session::report(&e);
    }
    println!("{}", session::status_line(&controller));

    interact(app, &mut controller).await
}

async fn resume(app: &App) -> anyhow::Result<()> {
    let mut controller = app.controller();

    match controller.load_last_opened_track().await {
        Ok(true) => println!("{}", session::status_line(&controller)),
        Ok(false) => println!("Nothing to resume"),
        // Startup continues unloaded whatever went wrong
        Err(e) => session::report(&e),
    }

    interact(app, &mut controller).await
}

async fn interact(
    app: &App,
    controller: &mut reprise_playback::PlaybackController,
) -> anyhow::Result<()> {
    let stdin = BufReader::new(tokio::io::stdin());
    session::run(controller, stdin, app.config.playback.relative_seek_ms).await?;

    // Checkpoint on the way out; reset alone would drop the position
    controller.save_progress().await?;
    controller.reset().await?;
    Ok(())
}

async fn progress(app: &App, path: &str) -> anyhow::Result<()> {
    let uri = resolve_uri(path);

    match app.repository.find(&uri).await {
        Ok(Some(progress)) => println!(
            "{}: {} (track {})",
            uri,
            format_time(progress.current_time),
            progress.track_id
        ),
        Ok(None) => println!("{uri}: no stored progress"),
        Err(RepriseError::FileNotFound(_)) => println!("{uri}: file not found"),
        Err(e) => return Err(e.into()),
    }

    Ok(())
}

async fn last(app: &App) -> anyhow::Result<()> {
    match app.history.last_track().await {
        Ok(uri) => println!("{uri}"),
        Err(RepriseError::NoStoredData(_)) => println!("No track played yet"),
        Err(e) => return Err(e.into()),
    }

    Ok(())
}
