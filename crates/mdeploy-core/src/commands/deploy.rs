//! Deploy command: resolve, interpolate, apply.
//!
//! The stages run strictly in order with no retries. The first error ends
//! the run; at most one PUT is sent.

use std::io::Write;

use tracing::debug;

use crate::apply::RemoteApplier;
use crate::config::{self, PluginSettings, ResolutionMode};
use crate::env::EnvMap;
use crate::error::Result;
use crate::interpolate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployStage {
    Resolving,
    Interpolating,
    Applying,
}

/// Outcome of a successful deploy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployReport {
    pub mode: ResolutionMode,
    pub url: String,
    pub status: u16,
    pub body: String,
}

/// One deploy run over a fixed argv and environment snapshot.
#[derive(Debug, Clone)]
pub struct DeployCommand {
    args: Vec<String>,
    env: EnvMap,
    settings: PluginSettings,
}

impl DeployCommand {
    pub fn new(args: Vec<String>, env: EnvMap) -> Self {
        Self {
            args,
            env,
            settings: PluginSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: PluginSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn settings(&self) -> &PluginSettings {
        &self.settings
    }

    /// Run the pipeline, writing audit output to `out`.
    ///
    /// `out` receives the pretty-printed descriptor as written, before any
    /// substitution (so secrets never reach CI logs), and then the raw
    /// response body. The body is written even when the status is non-2xx.
    pub async fn run<W: Write>(&self, out: &mut W) -> Result<DeployReport> {
        let applier = RemoteApplier::new(self.settings.apply_options())?;
        self.run_with(&applier, out).await
    }

    /// As [`run`](Self::run), with a caller-supplied applier.
    pub async fn run_with<W: Write>(
        &self,
        applier: &RemoteApplier,
        out: &mut W,
    ) -> Result<DeployReport> {
        enter(DeployStage::Resolving);
        let config =
            config::resolve_with_policy(&self.args, &self.env, self.settings.missing_secret)?;
        writeln!(out, "{}", config.audit)?;

        enter(DeployStage::Interpolating);
        let descriptor =
            interpolate::interpolate(config.descriptor, &self.env, self.settings.missing_secret)?;

        enter(DeployStage::Applying);
        let response = applier.put(&config.server, &descriptor).await?;
        writeln!(out, "{}", response.body)?;
        out.flush()?;

        let response = response.error_for_status()?;
        Ok(DeployReport {
            mode: config.mode,
            url: response.url,
            status: response.status,
            body: response.body,
        })
    }
}

fn enter(stage: DeployStage) {
    debug!(stage = ?stage, "deploy stage");
}
