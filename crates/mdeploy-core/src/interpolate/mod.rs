//! Secret interpolation.
//!
//! Values in a descriptor's `env` block of the exact form `${NAME}` are
//! replaced with the value of `NAME` from the injected environment. Only the
//! top-level string values of `env` are examined.

mod text;

pub use text::substitute_text;

use serde_json::Value;
use tracing::{debug, warn};

use crate::descriptor::Descriptor;
use crate::env::EnvMap;
use crate::error::{DeployError, Result};

/// What to substitute when a placeholder names an unset variable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MissingSecretPolicy {
    /// Substitute an empty string.
    #[default]
    Empty,
    /// Substitute JSON `null`.
    Null,
    /// Fail with [`DeployError::MalformedPlaceholder`].
    Error,
}

/// Classification of a single env value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder<'a> {
    Literal(&'a str),
    /// `${NAME}`, carrying `NAME`.
    Variable(&'a str),
}

impl<'a> Placeholder<'a> {
    /// Classify a string against the `${NAME}` grammar.
    ///
    /// The whole value must be the placeholder: `${` at the start, `}` at the
    /// end, a non-empty name in between with no braces.
    pub fn parse(value: &'a str) -> Self {
        match value
            .strip_prefix("${")
            .and_then(|rest| rest.strip_suffix('}'))
        {
            Some(name) if is_variable_name(name) => Self::Variable(name),
            _ => Self::Literal(value),
        }
    }
}

pub(crate) fn is_variable_name(name: &str) -> bool {
    !name.is_empty() && !name.contains(['{', '}'])
}

/// Replace placeholder values in the descriptor's `env` mapping.
///
/// The key set of `env` is preserved. Descriptors without `env`, non-string
/// values and literal strings pass through unchanged.
pub fn interpolate(
    mut descriptor: Descriptor,
    env: &EnvMap,
    policy: MissingSecretPolicy,
) -> Result<Descriptor> {
    let Some(block) = descriptor.env_mut() else {
        debug!("descriptor has no env block, skipping interpolation");
        return Ok(descriptor);
    };

    let mut resolved = 0usize;
    for (key, value) in block.iter_mut() {
        let Value::String(text) = &*value else {
            continue;
        };
        let Placeholder::Variable(name) = Placeholder::parse(text) else {
            continue;
        };

        let replacement = match env.get(name) {
            Some(secret) => {
                resolved += 1;
                Value::String(secret.clone())
            }
            None => {
                warn!(key = %key, variable = %name, "placeholder variable is not set");
                match policy {
                    MissingSecretPolicy::Empty => Value::String(String::new()),
                    MissingSecretPolicy::Null => Value::Null,
                    MissingSecretPolicy::Error => {
                        return Err(DeployError::MalformedPlaceholder {
                            name: name.to_string(),
                        });
                    }
                }
            }
        };
        *value = replacement;
    }

    debug!(resolved, "interpolated env placeholders");
    Ok(descriptor)
}
