//! Descriptor files in JSON or YAML, with `${NAME}` substitution.

use std::path::Path;

use serde_json::Value;
use tracing::{debug, info};

use crate::descriptor::Descriptor;
use crate::env::EnvMap;
use crate::error::{DeployError, Result};
use crate::interpolate::{MissingSecretPolicy, substitute_text};

/// A loaded marathonfile.
#[derive(Debug, Clone, PartialEq)]
pub struct Marathonfile {
    /// Descriptor with every `${NAME}` substituted.
    pub descriptor: Descriptor,
    /// The document before substitution, pretty-printed when it parses and
    /// verbatim otherwise. Safe to print: it holds no secret values.
    pub audit: String,
}

/// Read, substitute and parse a marathonfile.
pub fn load(path: &Path, env: &EnvMap, policy: MissingSecretPolicy) -> Result<Marathonfile> {
    info!(path = %path.display(), "parsing marathonfile");
    let raw = std::fs::read_to_string(path).map_err(|source| DeployError::ReadMarathonfile {
        path: path.to_path_buf(),
        source,
    })?;
    let text = substitute_text(&raw, env, policy)?;
    let descriptor = parse_document(&text)?;

    let audit = match parse_document(&raw) {
        Ok(unsubstituted) => unsubstituted.to_pretty_json(),
        // placeholders standing in for whole values keep the raw file from parsing
        Err(_) => raw.trim_end().to_string(),
    };
    Ok(Marathonfile { descriptor, audit })
}

/// Parse descriptor text, accepting JSON first and YAML second.
pub fn parse_document(text: &str) -> Result<Descriptor> {
    if let Ok(value) = serde_json::from_str::<Value>(text) {
        debug!("marathonfile is JSON");
        return Descriptor::from_value(value);
    }

    let value: Value = serde_yaml_ng::from_str(text).map_err(|err| {
        DeployError::missing(format!("marathonfile is neither JSON nor YAML: {err}"))
    })?;
    debug!("marathonfile is YAML, converted to JSON");
    Descriptor::from_value(value)
}
