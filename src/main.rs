//! Relec API server

use clap::Parser;
use relec_api::{
    config::{Config, HOST_ENV, PORT_ENV},
    server,
    tracing_setup::{init_tracing, LogFormat},
};

/// Relec API server
#[derive(Parser, Debug)]
#[command(name = "relecapi")]
#[command(version)]
#[command(about = "Read-only JSON API for verse quotation trends and Bills of Mortality data")]
#[command(long_about = r#"Read-only JSON API for verse quotation trends and Bills of Mortality data

Database settings are read from the environment:
  RELECAPI_DBHOST, RELECAPI_DBPORT, RELECAPI_DBNAME, RELECAPI_DBUSER,
  RELECAPI_DBPASS, RELECAPI_SSL, RELECAPI_DBMAXCONN

EXAMPLES:
  # Start server on the default port (8080)
  relecapi

  # Custom port and verbose logging
  relecapi --port 8090 --verbose
"#)]
struct Args {
    /// Port to listen on
    #[arg(short, long, env = PORT_ENV)]
    port: Option<u16>,

    /// Host to bind to
    #[arg(short = 'H', long, env = HOST_ENV)]
    host: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    init_tracing(LogFormat::from_env(), args.verbose);

    let mut config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            tracing::error!("{}", err);
            std::process::exit(1);
        }
    };
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(host) = args.host {
        config.host = host;
    }

    tracing::debug!(?config, "configuration loaded");

    if let Err(err) = server::run(config).await {
        tracing::error!("{}", err);
        std::process::exit(1);
    }
}
