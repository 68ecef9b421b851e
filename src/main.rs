use anyhow::Context;
use shelf_app::{books, shell::Shell};
use shelf_kernel::settings::Settings;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().with_context(|| "failed to load shelf settings")?;
    shelf_telemetry::init(&settings.telemetry)?;

    tracing::info!(
        env = ?settings.environment,
        collection = %settings.database.collection,
        "shelf-app bootstrap starting"
    );

    // Without the store there is nothing to do; fail before showing the menu.
    let repo = books::open(&settings.database)
        .await
        .with_context(|| "cannot start without the book store")?;

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    Shell::new(&repo, stdin.lock(), stdout.lock()).run().await?;

    tracing::info!("shelf-app finished");
    Ok(())
}
