//! Exercise tracker HTTP server binary entry point.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use exercise_core::{Config, JsonFileStore, MemoryStore, Result, StorageBackend, UserStore};
use exercise_http::{AppState, ExerciseServer};

#[derive(Parser)]
#[command(name = "extrack-server")]
#[command(about = "Exercise tracker HTTP API", long_about = None)]
struct Args {
    /// Read configuration from this file instead of the default path
    #[arg(long)]
    config: Option<PathBuf>,

    /// Address to bind
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on (overrides PORT and the config file)
    #[arg(long)]
    port: Option<u16>,

    /// Override data directory
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Keep users in memory only
    #[arg(long)]
    memory: bool,
}

impl Args {
    fn load_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => {
                let mut config = Config::load_from(path)?;
                config.apply_env()?;
                config
            }
            None => Config::load()?,
        };

        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(data_dir) = &self.data_dir {
            config.data.data_dir = data_dir.clone();
        }
        if self.memory {
            config.storage.backend = StorageBackend::Memory;
        }
        Ok(config)
    }
}

fn open_store(config: &Config) -> Arc<dyn UserStore> {
    match config.storage.backend {
        StorageBackend::Memory => {
            tracing::info!("Using in-memory user store");
            Arc::new(MemoryStore::new())
        }
        StorageBackend::File => {
            let path = config.users_path();
            tracing::info!("Using user store at {:?}", path);
            Arc::new(JsonFileStore::new(path))
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    exercise_core::logging::init();

    let args = Args::parse();
    let config = args.load_config()?;

    let state = AppState::new(open_store(&config));
    let server = ExerciseServer::new(state, config.server.host.clone(), config.server.port);
    server.run().await?;

    Ok(())
}
