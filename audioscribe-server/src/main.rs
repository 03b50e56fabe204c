use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

mod config;
mod routes;
mod state;

use crate::config::Cli;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is fine; real environment variables still apply.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("audioscribe=info".parse()?)
                .add_directive("audioscribe_server=info".parse()?)
                .add_directive("tower_http=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let state = AppState::from_cli(&cli)?;
    let app = routes::router(state);

    let listener = tokio::net::TcpListener::bind(cli.listen.as_str())
        .await
        .with_context(|| format!("failed to bind {}", cli.listen))?;
    info!(
        addr = %cli.listen,
        output_root = %cli.output_root.display(),
        "audioscribe server listening"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
