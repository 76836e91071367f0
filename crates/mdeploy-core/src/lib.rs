//! mdeploy Core Library
//!
//! Deploys an application descriptor to a Marathon-style orchestration API
//! from a CI plugin step: resolves the target and descriptor, substitutes
//! `${NAME}` secrets in the descriptor's env block, and PUTs the result.

pub mod apply;
pub mod commands;
pub mod config;
pub mod descriptor;
pub mod env;
pub mod error;
pub mod interpolate;

/// Re-exports of commonly used types
pub mod prelude {
    // Configuration
    pub use crate::config::{
        DeployConfig, LegacyVargs, PluginSettings, ResolutionMode, resolve, resolve_with_policy,
    };
    pub use crate::env::{EnvMap, process_env};

    // Descriptor and interpolation
    pub use crate::descriptor::Descriptor;
    pub use crate::interpolate::{MissingSecretPolicy, Placeholder, interpolate, substitute_text};

    // Remote apply
    pub use crate::apply::{ApplyOptions, RawResponse, RemoteApplier};

    // Commands
    pub use crate::commands::{DeployCommand, DeployReport, DeployStage};

    // Errors
    pub use crate::error::{DeployError, Result};
}
