//! Behaviour flags that shape a deployment but not its inputs.

use std::time::Duration;

use crate::apply::ApplyOptions;
use crate::interpolate::MissingSecretPolicy;

/// Default HTTP timeout, in minutes.
pub const DEFAULT_TIMEOUT_MINUTES: u64 = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginSettings {
    /// Append `?force=true` to the update request. Earlier plugin revisions
    /// sent the PUT without it.
    pub force: bool,
    /// Upper bound on the outbound request. `None` waits indefinitely.
    pub timeout: Option<Duration>,
    pub missing_secret: MissingSecretPolicy,
}

impl Default for PluginSettings {
    fn default() -> Self {
        Self {
            force: true,
            timeout: Some(Duration::from_secs(DEFAULT_TIMEOUT_MINUTES * 60)),
            missing_secret: MissingSecretPolicy::Empty,
        }
    }
}

impl PluginSettings {
    pub fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    /// Set the timeout in whole minutes; zero disables it.
    pub fn with_timeout_minutes(mut self, minutes: u64) -> Self {
        self.timeout =
            (minutes > 0).then(|| Duration::from_secs(minutes.saturating_mul(60)));
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_missing_secret(mut self, policy: MissingSecretPolicy) -> Self {
        self.missing_secret = policy;
        self
    }

    pub fn apply_options(&self) -> ApplyOptions {
        ApplyOptions {
            force: self.force,
            timeout: self.timeout,
        }
    }
}
