use anyhow::Context;
use clap::Parser;
use shelf_app::books;
use shelf_kernel::{settings::Settings, DatabaseSettings};

mod commands;

use commands::Command;

/// Personal library manager backed by MongoDB.
#[derive(Debug, Parser)]
#[command(name = "shelf", version)]
struct Cli {
    /// MongoDB connection string (overrides configuration)
    #[arg(long, global = true, value_name = "URI")]
    uri: Option<String>,

    /// Database holding the book collection
    #[arg(long, global = true, value_name = "NAME")]
    database: Option<String>,

    /// Collection holding the books
    #[arg(long, global = true, value_name = "NAME")]
    collection: Option<String>,

    /// Defaults to the interactive menu
    #[command(subcommand)]
    command: Option<Command>,
}

impl Cli {
    fn apply_overrides(&self, database: &mut DatabaseSettings) {
        if let Some(uri) = &self.uri {
            database.uri = uri.clone();
        }
        if let Some(name) = &self.database {
            database.name = name.clone();
        }
        if let Some(collection) = &self.collection {
            database.collection = collection.clone();
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut settings = Settings::load().with_context(|| "failed to load shelf settings")?;
    cli.apply_overrides(&mut settings.database);
    shelf_telemetry::init(&settings.telemetry)?;

    // Arguments are checked before connecting so typos fail fast.
    let request = cli.command.unwrap_or(Command::Shell).into_request()?;

    let repo = books::open(&settings.database)
        .await
        .with_context(|| "cannot start without the book store")?;

    let stdout = std::io::stdout();
    commands::execute(&repo, request, &mut stdout.lock()).await
}
