//! Process environment as an explicit, injectable mapping.

use std::collections::HashMap;

/// Snapshot of environment variables handed to the resolver and interpolator.
pub type EnvMap = HashMap<String, String>;

/// Environment variable holding the orchestration server base URL.
pub const PLUGIN_SERVER: &str = "PLUGIN_SERVER";
/// Environment variable holding the JSON-encoded application descriptor.
pub const PLUGIN_APP_CONFIG: &str = "PLUGIN_APP_CONFIG";
/// Environment variable holding a path to a JSON or YAML descriptor file.
pub const PLUGIN_MARATHONFILE: &str = "PLUGIN_MARATHONFILE";

/// Capture the current process environment.
///
/// Variables whose name or value is not valid unicode are skipped.
pub fn process_env() -> EnvMap {
    std::env::vars_os()
        .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
        .collect()
}

/// Look up a variable, treating empty values the same as unset ones.
pub fn non_empty<'a>(env: &'a EnvMap, key: &str) -> Option<&'a str> {
    env.get(key).map(String::as_str).filter(|v| !v.is_empty())
}
