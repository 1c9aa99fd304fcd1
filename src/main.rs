//! `ursa` binary: load configuration and certificates, then serve.
//!
//! Run with:
//!   RUST_LOG=ursa=debug cargo run -- --file-cert cert.crt --file-key cert.key
//!
//! Try:
//!   printf 'gemini://localhost/\r\n' | openssl s_client -quiet -connect localhost:9999

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use ursa::{Config, Error, Router, Server, StaticContent, tls};

/// The index document, embedded at build time.
const INDEX_PAGE: &[u8] = include_bytes!("../index.gmi");

#[derive(Debug, Parser)]
#[command(name = "ursa", version, about = "Gemini content server")]
struct Cli {
    /// TOML configuration file.
    #[arg(long, env = "URSA_CONFIG")]
    config: Option<PathBuf>,

    /// PEM certificate chain. Overrides `cert_file`.
    #[arg(long = "file-cert")]
    file_cert: Option<PathBuf>,

    /// PEM private key. Overrides `key_file`.
    #[arg(long = "file-key")]
    file_key: Option<PathBuf>,

    /// Listen address (`host:port`). Overrides `addr`.
    #[arg(long)]
    addr: Option<String>,
}

impl Cli {
    fn into_config(self) -> Result<Config, Error> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };
        if let Some(cert) = self.file_cert {
            config.cert_file = cert;
        }
        if let Some(key) = self.file_key {
            config.key_file = key;
        }
        if let Some(addr) = self.addr {
            config.addr = addr;
        }
        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "ursa=info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), Error> {
    let config = cli.into_config()?;
    tracing::info!(
        addr = %config.addr,
        cert = %config.cert_file.display(),
        request_timeout_secs = config.request_timeout_secs,
        "configuration loaded"
    );

    let tls = tls::load_server_config(&config.cert_file, &config.key_file)?;
    let router = Router::new(StaticContent::gemtext(INDEX_PAGE));

    Server::from_config(&config, tls).serve(router).await
}
