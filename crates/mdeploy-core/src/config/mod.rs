//! Config resolution: where to deploy and what to deploy.
//!
//! Two invocation shapes are supported. The current one reads
//! `PLUGIN_SERVER` plus either `PLUGIN_MARATHONFILE` or `PLUGIN_APP_CONFIG`
//! from the environment. The legacy one passes a JSON payload as the second
//! positional argument and is only taken when that payload is well formed.

pub mod legacy;
pub mod marathonfile;
pub mod settings;

use std::path::Path;

use serde_json::Value;
use tracing::{debug, info, warn};
use url::Url;

use crate::descriptor::Descriptor;
use crate::env::{EnvMap, PLUGIN_APP_CONFIG, PLUGIN_MARATHONFILE, PLUGIN_SERVER, non_empty};
use crate::error::{DeployError, Result};
use crate::interpolate::MissingSecretPolicy;

pub use legacy::LegacyVargs;
pub use settings::PluginSettings;

/// Which invocation convention supplied the configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionMode {
    /// Environment variables (`PLUGIN_*`).
    Current,
    /// JSON payload in argv.
    Legacy,
}

impl ResolutionMode {
    /// Decide the mode from argv alone. Legacy only when the payload at the
    /// legacy position carries `vargs.server` and `vargs.app_config`.
    pub fn detect(args: &[String]) -> Self {
        if LegacyVargs::from_args(args).is_some() {
            Self::Legacy
        } else {
            Self::Current
        }
    }
}

/// Fully resolved deployment inputs.
#[derive(Debug, Clone, PartialEq)]
pub struct DeployConfig {
    pub mode: ResolutionMode,
    /// Orchestration server base URL.
    pub server: String,
    pub descriptor: Descriptor,
    /// Pretty-printed descriptor as the user wrote it, before any
    /// substitution. This is what gets printed for auditing.
    pub audit: String,
}

/// Resolve server and descriptor from argv and the environment.
///
/// `args` is the full argv, program name included.
pub fn resolve(args: &[String], env: &EnvMap) -> Result<DeployConfig> {
    resolve_with_policy(args, env, MissingSecretPolicy::default())
}

/// As [`resolve`], with an explicit policy for unset variables referenced
/// from a marathonfile.
pub fn resolve_with_policy(
    args: &[String],
    env: &EnvMap,
    policy: MissingSecretPolicy,
) -> Result<DeployConfig> {
    let config = match LegacyVargs::from_args(args) {
        Some(vargs) => {
            info!("Running legacy version (Drone 0.4)");
            resolve_legacy(&vargs)?
        }
        None => {
            if legacy::payload_arg(args).is_some() {
                debug!("positional payload is not a legacy config, using environment");
            }
            resolve_current(env, policy)?
        }
    };

    config.descriptor.validate()?;
    info!(
        server = %config.server,
        app = config.descriptor.id().unwrap_or_default(),
        mode = ?config.mode,
        "resolved deployment target"
    );
    Ok(config)
}

fn resolve_legacy(vargs: &LegacyVargs) -> Result<DeployConfig> {
    let server = match vargs.server() {
        Value::String(server) => checked_server(server, "vargs.server")?,
        _ => return Err(DeployError::missing("vargs.server must be a non-empty string")),
    };

    let descriptor = match vargs.app_config() {
        // some runners hand the app config over as an encoded string
        Value::String(text) => Descriptor::from_json(text)?,
        other => Descriptor::from_value(other.clone())?,
    };

    Ok(DeployConfig {
        mode: ResolutionMode::Legacy,
        server,
        audit: descriptor.to_pretty_json(),
        descriptor,
    })
}

fn resolve_current(env: &EnvMap, policy: MissingSecretPolicy) -> Result<DeployConfig> {
    let server = non_empty(env, PLUGIN_SERVER)
        .ok_or_else(|| DeployError::missing(format!("{PLUGIN_SERVER} is not set")))?;
    let server = checked_server(server, PLUGIN_SERVER)?;

    let app_config = non_empty(env, PLUGIN_APP_CONFIG);
    let (descriptor, audit) = match non_empty(env, PLUGIN_MARATHONFILE) {
        Some(path) => {
            if app_config.is_some() {
                warn!("{PLUGIN_APP_CONFIG} is ignored because {PLUGIN_MARATHONFILE} is set");
            }
            let loaded = marathonfile::load(Path::new(path), env, policy)?;
            (loaded.descriptor, loaded.audit)
        }
        None => {
            let text = app_config.ok_or_else(|| {
                DeployError::missing(format!(
                    "neither {PLUGIN_MARATHONFILE} nor {PLUGIN_APP_CONFIG} is set"
                ))
            })?;
            let descriptor = Descriptor::from_json(text)?;
            let audit = descriptor.to_pretty_json();
            (descriptor, audit)
        }
    };

    Ok(DeployConfig {
        mode: ResolutionMode::Current,
        server,
        descriptor,
        audit,
    })
}

/// Require an absolute URL; returns it without a trailing slash.
fn checked_server(server: &str, source: &str) -> Result<String> {
    let trimmed = server.trim();
    if trimmed.is_empty() {
        return Err(DeployError::missing(format!("{source} is empty")));
    }
    Url::parse(trimmed).map_err(|err| {
        DeployError::missing(format!("{source} is not a valid URL ({trimmed}): {err}"))
    })?;
    Ok(trimmed.trim_end_matches('/').to_string())
}
