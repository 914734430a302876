use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::{
    AskCommand, ConfigCommand, DeleteCommand, EditCommand, ListCommand, ShowCommand,
    SyncCommand, WriteCommand,
};
use diary::{ApiClient, Config, DiaryStore, Reconciler, Session};

#[derive(Parser)]
#[command(name = "diary")]
#[command(version)]
#[command(about = "A keyword diary that writes itself", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Write an entry from a keyword
    Write(WriteCommand),

    /// List diary entries
    List(ListCommand),

    /// Show the entry for a date
    Show(ShowCommand),

    /// Replace an entry's content
    Edit(EditCommand),

    /// Delete an entry
    Delete(DeleteCommand),

    /// Merge entries from the server
    Sync(SyncCommand),

    /// Ask a question about your diary
    Ask(AskCommand),

    /// Manage configuration
    Config(ConfigCommand),
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "diary=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(cli.config)?;

    let command = match cli.command {
        Some(command) => command,
        None => {
            println!("Use --help to see available commands");
            return Ok(());
        }
    };

    match command {
        Commands::Config(cmd) => cmd.run(&config),
        Commands::Ask(cmd) => cmd.run(&api_client(&config)?, &config).await,
        Commands::Sync(cmd) => {
            // An explicit sync runs even when sync_on_start is off
            let store = open_store(&config);
            store.initialize().await?;
            cmd.run(&store, &Reconciler::new(api_client(&config)?)).await
        }
        Commands::Write(cmd) => {
            let session = start_session(&config).await?;
            cmd.run(session.store(), &api_client(&config)?).await
        }
        Commands::List(cmd) => {
            let session = start_session(&config).await?;
            cmd.run(session.store()).await
        }
        Commands::Show(cmd) => {
            let session = start_session(&config).await?;
            cmd.run(session.store()).await
        }
        Commands::Edit(cmd) => {
            let session = start_session(&config).await?;
            cmd.run(session.store()).await
        }
        Commands::Delete(cmd) => {
            let session = start_session(&config).await?;
            cmd.run(session.store()).await
        }
    }
}

fn open_store(config: &Config) -> DiaryStore {
    DiaryStore::new(config.database_path.value.clone(), config.user_id.value)
}

fn api_client(config: &Config) -> Result<ApiClient, diary::ApiError> {
    ApiClient::with_timeout(config.api.base_url.clone(), config.api.timeout())
}

/// Opens the store and, when enabled, merges the server's entries first.
/// Sync is bounded by `api.timeout_secs`, so a stalled server only delays
/// the command by that much.
async fn start_session(config: &Config) -> Result<Session, Box<dyn std::error::Error>> {
    let store = open_store(config);
    let session = if config.api.sync_on_start {
        Session::new(store, Reconciler::new(api_client(config)?))
    } else {
        Session::offline(store)
    };

    if session.start().await? == Some(false) {
        eprintln!("Sync: server unreachable, showing local entries only");
    }

    Ok(session)
}
