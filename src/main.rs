use anyhow::Context;
use clap::Parser;
use std::sync::Arc;

use streamgate::config::{ConfigValidator, load_config};
use streamgate::{ApiServer, FsStreamStore, NginxController, Reconciler, tracing_setup};

#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Args {
    #[clap(short, long, default_value = "config.yaml")]
    config: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_setup::init_tracing()
        .map_err(|err| anyhow::anyhow!("Failed to initialize tracing: {err}"))?;

    let args = Args::parse();

    tracing::info!("Loading configuration from {}", args.config);
    let config = load_config(&args.config)
        .await
        .with_context(|| format!("Failed to load config file: {}", args.config))?;
    ConfigValidator::validate(&config).context("Invalid configuration")?;

    // The fragment directory must exist before the listener is bound;
    // the daemon's include and the first request both depend on it.
    let store = FsStreamStore::new(&config.streams_dir);
    store
        .ensure_dir()
        .await
        .with_context(|| format!("Could not prepare stream directory: {}", config.streams_dir))?;

    let controller = NginxController::new(&config.nginx);
    let reconciler = Arc::new(Reconciler::new(Arc::new(store), Arc::new(controller)));

    tracing::info!(
        "Managing stream fragments in {} via {}",
        config.streams_dir,
        config.nginx.binary
    );

    let server = ApiServer::new(&config, reconciler);
    server.run().await
}
