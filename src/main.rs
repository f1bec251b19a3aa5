use clap::Parser;
use tokio::net::TcpListener;

use devrelay::config::{self, Cli};
use devrelay::lifecycle::{self, startup};
use devrelay::observability::logging;
use devrelay::HttpServer;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match config::load_from_cli(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("devrelay: {e}");
            std::process::exit(2);
        }
    };

    logging::init(&config.observability.log_level);

    tracing::info!(
        bind_address = %config.socket_addr(),
        upstream = %config.upstream.base_url,
        prefix = %config.upstream.prefix,
        timeout_secs = config.upstream.timeout_secs,
        root = %config.static_files.root.display(),
        "Configuration loaded"
    );

    let listener = TcpListener::bind(config.socket_addr()).await?;
    let local_addr = listener.local_addr()?;
    startup::print_banner(&config, local_addr);

    let server = HttpServer::new(config)?;
    server.run(listener, lifecycle::shutdown_signal()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
