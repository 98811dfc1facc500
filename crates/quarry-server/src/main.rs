use quarry_common::{ConfigError, ServerConfig};
use quarry_logger::LogSeverity::{Fatal, Info, Warning};
use quarry_logger::{init, log, LogSeverity};
use quarry_server::Server;
use std::path::Path;
use std::process;

const DEFAULT_CONFIG: &str = "quarry.toml";

fn load_config() -> Result<ServerConfig, ConfigError> {
    match std::env::args().nth(1) {
        Some(path) => ServerConfig::load(path),
        None if Path::new(DEFAULT_CONFIG).exists() => ServerConfig::load(DEFAULT_CONFIG),
        None => Ok(ServerConfig::default()),
    }
}

#[tokio::main]
async fn main() {
    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            log(e.to_string(), Fatal);
            process::exit(1);
        }
    };

    match config.logging.level.parse::<LogSeverity>() {
        Ok(level) => {
            init(level);
        }
        Err(e) => log(format!("{e}, keeping the default level"), Warning),
    }

    log("Quarry init".to_owned(), Info);
    let server = match Server::bind(config).await {
        Ok(server) => server,
        Err(e) => {
            log(format!("Failed to start: {e}"), Fatal);
            process::exit(1);
        }
    };
    if let Err(e) = server.run().await {
        log(format!("Server stopped: {e}"), Fatal);
        process::exit(1);
    }
}
