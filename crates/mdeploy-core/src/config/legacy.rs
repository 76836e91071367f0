//! Legacy invocation: configuration passed as a JSON positional argument.
//!
//! Older CI runners invoked plugins as `<entrypoint> -- '<payload>'` where
//! the payload is `{"vargs": {"server": ..., "app_config": {...}}}`. Flags may
//! precede the `--` separator.

use serde_json::{Map, Value};

/// Position of the legacy payload in argv (program name at index 0) when no
/// `--` separator is present.
pub const LEGACY_ARG_INDEX: usize = 2;

/// The argument that may carry a legacy payload: the one right after the
/// first `--`, or argv[2] when there is no separator.
pub fn payload_arg(args: &[String]) -> Option<&str> {
    let candidate = match args.iter().skip(1).position(|arg| arg == "--") {
        Some(separator) => args.get(separator + 2),
        None => args.get(LEGACY_ARG_INDEX),
    };
    candidate.map(String::as_str)
}

/// The `vargs` object of a legacy payload that carries both required keys.
#[derive(Debug, Clone, PartialEq)]
pub struct LegacyVargs {
    vargs: Map<String, Value>,
}

impl LegacyVargs {
    /// Extract `vargs` from argv, if the legacy payload is present and shaped
    /// correctly. Anything else means the invocation is not legacy.
    pub fn from_args(args: &[String]) -> Option<Self> {
        Self::parse(payload_arg(args)?)
    }

    pub fn parse(payload: &str) -> Option<Self> {
        let value: Value = serde_json::from_str(payload).ok()?;
        let Value::Object(mut root) = value else {
            return None;
        };
        let Value::Object(vargs) = root.remove("vargs")? else {
            return None;
        };
        if vargs.contains_key("server") && vargs.contains_key("app_config") {
            Some(Self { vargs })
        } else {
            None
        }
    }

    pub fn server(&self) -> &Value {
        &self.vargs["server"]
    }

    pub fn app_config(&self) -> &Value {
        &self.vargs["app_config"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn argv(payload: &str) -> Vec<String> {
        vec!["mdeploy".to_string(), "--".to_string(), payload.to_string()]
    }

    #[test]
    fn parses_well_formed_payload() {
        let vargs = LegacyVargs::from_args(&argv(
            r#"{"vargs":{"server":"http://m:8080","app_config":{"id":"a"}}}"#,
        ))
        .unwrap();

        assert_eq!(vargs.server(), &json!("http://m:8080"));
        assert_eq!(vargs.app_config(), &json!({"id": "a"}));
    }

    #[test]
    fn requires_both_keys() {
        assert!(LegacyVargs::parse(r#"{"vargs":{"server":"http://m:8080"}}"#).is_none());
        assert!(LegacyVargs::parse(r#"{"vargs":{"app_config":{"id":"a"}}}"#).is_none());
    }

    #[test]
    fn rejects_non_object_shapes() {
        assert!(LegacyVargs::parse("not json").is_none());
        assert!(LegacyVargs::parse(r#"["vargs"]"#).is_none());
        assert!(LegacyVargs::parse(r#"{"vargs":"server"}"#).is_none());
        assert!(LegacyVargs::parse(r#"{"server":"x","app_config":{}}"#).is_none());
    }

    #[test]
    fn payload_follows_separator_after_flags() {
        let payload = r#"{"vargs":{"server":"http://m:8080","app_config":{"id":"a"}}}"#;
        let args: Vec<String> = ["mdeploy", "--timeout", "1", "--force", "false", "--", payload]
            .iter()
            .map(|a| a.to_string())
            .collect();

        assert_eq!(payload_arg(&args), Some(payload));
        assert!(LegacyVargs::from_args(&args).is_some());
    }

    #[test]
    fn separator_without_payload_is_not_legacy() {
        let args = vec!["mdeploy".to_string(), "--timeout".to_string(), "--".to_string()];
        assert_eq!(payload_arg(&args), None);
    }

    #[test]
    fn payload_must_be_second_positional() {
        let payload = r#"{"vargs":{"server":"http://m:8080","app_config":{"id":"a"}}}"#;
        let args = vec!["mdeploy".to_string(), payload.to_string()];
        assert!(LegacyVargs::from_args(&args).is_none());
        assert!(LegacyVargs::from_args(&["mdeploy".to_string()]).is_none());
    }
}
