//! # apns-send
//!
//! Sends one push notification through APNs, or prints a provider token.
//!
//! Configuration comes from a JSON file (`--config`, default
//! `~/.apns/config.json`) overlaid with `APNS_*` environment variables.

#![deny(unsafe_code)]

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use apns_client::{ApnsService, NotificationRequest, SendResult};
use apns_settings::{ApnsEnvironment, ApnsSettings};
use clap::{Parser, Subcommand};
use tracing::debug;

/// Token-authenticated APNs sender.
#[derive(Parser, Debug)]
#[command(name = "apns-send", about = "Send a push notification through APNs")]
struct Cli {
    /// Path to the JSON configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the configured environment.
    #[arg(long, global = true, value_parser = parse_environment)]
    environment: Option<ApnsEnvironment>,

    /// Log filter (overridden by `RUST_LOG`).
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Send one notification and print the result as JSON.
    Send {
        /// Target device token.
        #[arg(long)]
        device_token: String,
        /// Alert title.
        #[arg(long)]
        title: Option<String>,
        /// Alert body.
        #[arg(long)]
        body: Option<String>,
    },
    /// Print a freshly signed provider token.
    Token,
}

fn parse_environment(value: &str) -> std::result::Result<ApnsEnvironment, String> {
    value.parse().map_err(|e: apns_settings::ConfigurationError| e.to_string())
}

impl Cli {
    fn config_path(&self) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(apns_settings::default_config_path)
    }

    fn load_settings(&self) -> Result<ApnsSettings> {
        let path = self.config_path();
        let mut settings = apns_settings::load_settings_from_path(&path)
            .with_context(|| format!("Failed to load APNs configuration from {}", path.display()))?;
        if let Some(environment) = self.environment {
            settings = settings.with_environment(environment);
        }
        Ok(settings)
    }
}

fn build_request(device_token: String, title: Option<String>, body: Option<String>) -> NotificationRequest {
    let mut request = NotificationRequest::new(device_token);
    if let Some(title) = title {
        request = request.title(title);
    }
    if let Some(body) = body {
        request = request.body(body);
    }
    request
}

fn render(result: &SendResult) -> Result<String> {
    serde_json::to_string_pretty(result).context("Failed to render send result")
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    if cli.json_logs {
        apns_core::logging::init_json_subscriber(&cli.log_level);
    } else {
        apns_core::logging::init_subscriber(&cli.log_level);
    }

    let settings = cli.load_settings()?;
    debug!(environment = %settings.environment, "configuration loaded");
    let service = ApnsService::new(&settings).context("Failed to initialize APNs service")?;

    match cli.command {
        Command::Send {
            device_token,
            title,
            body,
        } => {
            let result = service.send(&build_request(device_token, title, body)).await;
            println!("{}", render(&result)?);
            Ok(if result.success {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Command::Token => {
            let token = service.fetch_jwt().context("Failed to generate provider token")?;
            println!("{token}");
            Ok(ExitCode::SUCCESS)
        }
    }
}
