//! Whole-text `${NAME}` substitution for descriptor files.

use crate::env::EnvMap;
use crate::error::{DeployError, Result};

use super::MissingSecretPolicy;

/// A `${...}` expression understood by [`substitute_text`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Expr<'a> {
    /// `${NAME}`
    Variable(&'a str),
    /// `${NAME-fallback}` (unset) or `${NAME:-fallback}` (unset or empty).
    Fallback {
        name: &'a str,
        fallback: &'a str,
        when_empty: bool,
    },
}

impl<'a> Expr<'a> {
    /// Parse the text between `${` and `}`. Names follow shell rules:
    /// `[A-Za-z_][A-Za-z0-9_]*`. Anything else is not an expression.
    fn parse(inner: &'a str) -> Option<Self> {
        let name_len = inner
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(inner.len());
        let (name, op) = inner.split_at(name_len);
        if name.is_empty() || name.starts_with(|c: char| c.is_ascii_digit()) {
            return None;
        }

        if op.is_empty() {
            Some(Self::Variable(name))
        } else if let Some(fallback) = op.strip_prefix(":-") {
            Some(Self::Fallback {
                name,
                fallback,
                when_empty: true,
            })
        } else {
            op.strip_prefix('-').map(|fallback| Self::Fallback {
                name,
                fallback,
                when_empty: false,
            })
        }
    }
}

/// Replace every `${NAME}` in `input` with its value from `env`.
///
/// `${NAME:-fallback}` and `${NAME-fallback}` supply a default for an unset
/// (or, with `:-`, empty) variable. `$${NAME}` is an escape and yields a
/// literal `${NAME}`. Anything else inside `${...}`, unterminated
/// placeholders included, is copied through as-is. Unset variables without a
/// fallback become an empty string unless `policy` is
/// [`MissingSecretPolicy::Error`]; `Null` has no textual form and also
/// yields an empty string.
pub fn substitute_text(input: &str, env: &EnvMap, policy: MissingSecretPolicy) -> Result<String> {
    let mut result = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find("${") {
        let escaped = start > 0 && rest.as_bytes()[start - 1] == b'$';
        if escaped {
            // drop the escaping '$' and keep the placeholder text
            result.push_str(&rest[..start - 1]);
            result.push_str("${");
            rest = &rest[start + 2..];
            continue;
        }

        result.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else {
            result.push_str(&rest[start..]);
            return Ok(result);
        };
        let inner = &after[..end];
        rest = &after[end + 1..];

        let (name, fallback) = match Expr::parse(inner) {
            Some(Expr::Variable(name)) => (name, None),
            Some(Expr::Fallback {
                name,
                fallback,
                when_empty,
            }) => match env.get(name) {
                Some(value) if !(when_empty && value.is_empty()) => (name, None),
                _ => (name, Some(fallback)),
            },
            None => {
                result.push_str("${");
                result.push_str(inner);
                result.push('}');
                continue;
            }
        };

        if let Some(fallback) = fallback {
            result.push_str(fallback);
            continue;
        }
        match env.get(name) {
            Some(value) => result.push_str(value),
            None if policy == MissingSecretPolicy::Error => {
                return Err(DeployError::MalformedPlaceholder {
                    name: name.to_string(),
                });
            }
            None => tracing::warn!(variable = %name, "marathonfile variable is not set"),
        }
    }

    result.push_str(rest);
    Ok(result)
}
