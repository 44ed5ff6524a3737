use tracing::{error, info, warn};

use imgdrop::{AppState, BlobStore, Config, Database, IntakePolicy, WebServer};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // Load configuration
    let (mut config, load_error) = match Config::load_or_default("config.toml") {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };

    // Initialize logging
    if let Err(e) = imgdrop::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        imgdrop::logging::init_console_only(&config.logging.level);
    }

    if let Some(e) = load_error {
        warn!("Failed to load config.toml, using default configuration: {}", e);
    }
    for rejected in config.apply_env_overrides() {
        warn!("{}", rejected);
    }

    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        std::process::exit(1);
    }

    let blobs = match BlobStore::new(&config.upload.dir, &config.upload.public_prefix) {
        Ok(blobs) => blobs,
        Err(e) => {
            error!("Failed to prepare upload directory {}: {}", config.upload.dir, e);
            std::process::exit(1);
        }
    };
    let policy = IntakePolicy::new(&config.upload.allowed_types, config.upload.max_size_bytes);

    // A failed connection is logged but does not stop the server; uploads
    // then fail at the metadata step.
    let db = match Database::connect(&config.database.url).await {
        Ok(db) => {
            info!("Database connected");
            Some(db)
        }
        Err(e) => {
            error!("Database connection error: {}", e);
            None
        }
    };

    let state = AppState::new(blobs, policy).with_database(db.clone());
    let server = match WebServer::new(&config, state) {
        Ok(server) => server,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = server.run(shutdown_signal()).await {
        error!("Web server error: {}", e);
    }

    if let Some(db) = db {
        db.close().await;
    }
    info!("Server stopped");
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
