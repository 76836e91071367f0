//! mdeploy - CI deploy plugin for Marathon-style orchestration APIs
//!
//! Usage:
//!   PLUGIN_SERVER=http://marathon:8080 PLUGIN_APP_CONFIG='{"id":"app"}' mdeploy
//!   PLUGIN_SERVER=... PLUGIN_MARATHONFILE=marathon.yml mdeploy
//!   mdeploy -- '{"vargs":{"server":"...","app_config":{...}}}'   # legacy runners

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mdeploy_core::commands::DeployCommand;
use mdeploy_core::config::PluginSettings;
use mdeploy_core::config::settings::DEFAULT_TIMEOUT_MINUTES;
use mdeploy_core::env::process_env;
use mdeploy_core::interpolate::MissingSecretPolicy;

#[derive(Parser, Debug)]
#[command(name = "mdeploy", version)]
#[command(about = "Deploy an application descriptor to a Marathon server", long_about = None)]
struct Cli {
    /// Append force=true to the update request
    ///
    /// Overrides a deployment already in progress for the same app.
    #[arg(
        long,
        env = "PLUGIN_FORCE",
        default_value_t = true,
        action = clap::ArgAction::Set,
        value_parser = clap::builder::BoolishValueParser::new()
    )]
    force: bool,

    /// Request timeout in minutes (0 waits indefinitely)
    #[arg(long, env = "PLUGIN_TIMEOUT", default_value_t = DEFAULT_TIMEOUT_MINUTES)]
    timeout: u64,

    /// What to substitute for ${NAME} placeholders whose variable is unset
    #[arg(long, env = "PLUGIN_MISSING_SECRET", value_enum, default_value_t = MissingSecret::Empty)]
    missing_secret: MissingSecret,

    /// Legacy positional payload, read from raw argv by the resolver
    #[arg(hide = true, trailing_var_arg = true, allow_hyphen_values = true)]
    legacy: Vec<String>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum MissingSecret {
    /// Empty string
    Empty,
    /// JSON null
    Null,
    /// Fail the deploy
    Error,
}

impl From<MissingSecret> for MissingSecretPolicy {
    fn from(value: MissingSecret) -> Self {
        match value {
            MissingSecret::Empty => MissingSecretPolicy::Empty,
            MissingSecret::Null => MissingSecretPolicy::Null,
            MissingSecret::Error => MissingSecretPolicy::Error,
        }
    }
}

impl Cli {
    fn settings(&self) -> PluginSettings {
        PluginSettings::default()
            .with_force(self.force)
            .with_timeout_minutes(self.timeout)
            .with_missing_secret(self.missing_secret.into())
    }
}

fn main() -> Result<()> {
    // Logs go to stderr; stdout carries the descriptor and response body
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mdeploy=info,mdeploy_core=info,warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let argv: Vec<String> = std::env::args_os()
        .map(|arg| arg.to_string_lossy().into_owned())
        .collect();
    let cli = Cli::parse_from(&argv);
    tracing::debug!(?cli, legacy_args = cli.legacy.len(), "parsed arguments");

    let command = DeployCommand::new(argv, process_env()).with_settings(cli.settings());

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    let mut stdout = std::io::stdout().lock();
    let report = runtime
        .block_on(command.run(&mut stdout))
        .context("Deployment failed")?;

    tracing::info!(
        url = %report.url,
        status = report.status,
        mode = ?report.mode,
        "application updated"
    );
    Ok(())
}
