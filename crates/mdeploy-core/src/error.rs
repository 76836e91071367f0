//! Error taxonomy for the deploy pipeline.

use std::path::PathBuf;

/// Errors raised while resolving, interpolating or applying a descriptor.
///
/// Every variant is fatal: the pipeline stops at the first error and the
/// caller is expected to exit non-zero.
#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    /// Server or descriptor absent, empty, or not parseable.
    #[error("missing configuration: {reason}")]
    MissingConfiguration { reason: String },

    /// Descriptor parsed but fails a presence check (`id`, `env` shape).
    #[error("invalid application descriptor: {reason}")]
    InvalidDescriptor { reason: String },

    /// A placeholder names a variable that is not set (strict policy only).
    #[error("placeholder ${{{name}}} could not be resolved from the environment")]
    MalformedPlaceholder { name: String },

    /// The marathonfile could not be read.
    #[error("failed to read marathonfile {}: {source}", .path.display())]
    ReadMarathonfile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The orchestration API answered with a non-2xx status.
    #[error("remote apply failed ({status}): {body}")]
    RemoteApplyFailed { status: u16, body: String },

    /// DNS, connection, timeout or other network-level failure.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Writing audit output failed.
    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

impl DeployError {
    pub(crate) fn missing(reason: impl Into<String>) -> Self {
        Self::MissingConfiguration {
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidDescriptor {
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DeployError>;
