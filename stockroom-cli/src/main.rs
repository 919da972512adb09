use anyhow::Context;
use std::io;
use stockroom_cli::{init_tracing, Menu};
use stockroom_store::{Config, InMemoryProductRepository, PgProductRepository};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("Failed to load config")?;
    init_tracing(&config.logging.filter);

    let in_memory = std::env::args().skip(1).any(|arg| arg == "--in-memory");
    let stdin = io::stdin();
    let stdout = io::stdout();

    if in_memory {
        tracing::info!("Starting catalog menu with an in-memory store");
        let repo = InMemoryProductRepository::new();
        return Menu::new(&repo, stdin.lock(), stdout.lock()).run().await;
    }

    tracing::info!(
        host = %config.database.host,
        port = config.database.port,
        database = %config.database.name,
        "Starting catalog menu"
    );
    let repo = PgProductRepository::new(&config.database);
    repo.database()
        .ensure_schema()
        .await
        .context("Failed to prepare product schema")?;

    Menu::new(&repo, stdin.lock(), stdout.lock()).run().await
}
