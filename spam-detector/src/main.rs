//! spam-detector: email spam classification server
//!
//! ```bash
//! # Serve the form and JSON API with config.toml (or defaults)
//! spam-detector serve --listen 127.0.0.1:5000
//!
//! # Classify a single email from the command line
//! spam-detector check --subject "You won!" --body "Claim your prize now" --scorer heuristic
//! ```

use anyhow::Context;
use clap::{Parser, Subcommand};
use spam_detector::api::ApiServer;
use spam_detector::config::Config;
use spam_detector::spam::{ScorerKind, SpamLogStore, SpamService};
use spam_detector::telemetry;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};

#[derive(Parser)]
#[command(name = "spam-detector")]
#[command(about = "Classify emails as spam or not spam", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server (default)
    Serve {
        /// Listen address, overrides the config file
        #[arg(short, long)]
        listen: Option<String>,
        /// Scoring strategy, overrides the config file
        #[arg(short, long)]
        scorer: Option<ScorerKind>,
    },
    /// Classify one email and print the verdict as JSON
    Check {
        #[arg(short, long, default_value = "")]
        subject: String,
        #[arg(short, long, default_value = "")]
        body: String,
        /// Scoring strategy, overrides the config file
        #[arg(long)]
        scorer: Option<ScorerKind>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config_found = cli.config.exists();
    let mut config = if config_found {
        Config::from_file(&cli.config)
            .with_context(|| format!("loading {}", cli.config.display()))?
    } else {
        Config::default()
    };

    telemetry::init(&config.logging)?;

    if config_found {
        info!("Configuration loaded from {}", cli.config.display());
    } else {
        info!("No config file found, using defaults");
    }

    match cli.command.unwrap_or(Commands::Serve {
        listen: None,
        scorer: None,
    }) {
        Commands::Serve { listen, scorer } => {
            if let Some(listen) = listen {
                config.server.listen_addr = listen;
            }
            if let Some(scorer) = scorer {
                config.classifier.scorer = scorer;
            }
            config.validate()?;
            serve(config).await
        }
        Commands::Check {
            subject,
            body,
            scorer,
        } => {
            let service = SpamService::with_kind(scorer.unwrap_or(config.classifier.scorer));
            let verdict = service.check(&subject, &body)?;
            println!("{}", serde_json::to_string_pretty(&verdict)?);
            Ok(())
        }
    }
}

async fn serve(config: Config) -> anyhow::Result<()> {
    info!("Starting spam-detector v{}", env!("CARGO_PKG_VERSION"));
    info!("  Listening on: {}", config.server.listen_addr);
    info!("  Scorer: {}", config.classifier.scorer);

    let mut service = SpamService::with_kind(config.classifier.scorer);

    if config.classifier.eager_training {
        service
            .warm_up()
            .context("training the spam model at startup")?;
        info!("Spam model ready");
    }

    if config.storage.log_enabled {
        match SpamLogStore::connect(&config.storage.database_url).await {
            Ok(store) => {
                info!("  Classification log: {}", config.storage.database_url);
                service = service.with_log_store(Arc::new(store));
            }
            Err(e) => {
                error!("Failed to open classification log: {}", e);
                warn!("Continuing without classification log");
            }
        }
    } else {
        info!("  Classification log disabled");
    }

    let server = ApiServer::new(service, config.server.listen_addr.clone());
    server.run().await?;

    Ok(())
}
