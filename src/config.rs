//! Configuration types.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use secrecy::SecretString;

use crate::error::ConfigError;
use crate::llm::LlmConfig;
use crate::llm::gateway::DEFAULT_MAX_TOKENS;
use crate::prompt::PromptOptions;
use crate::session::HistoryWindow;
use crate::session::manager::DEFAULT_MAX_SESSIONS;

pub const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";
pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Process configuration.
#[derive(Debug, Clone)]
pub struct AssistConfig {
    /// Hosted model credentials and identifier.
    pub llm: LlmConfig,
    /// Upper bound on response length.
    pub max_tokens: u32,
    /// Prior chat sent with each question.
    pub history: HistoryWindow,
    pub prompt: PromptOptions,
    /// Folder the knowledge documents are loaded from.
    pub data_dir: PathBuf,
    /// Serve the HTTP API on this port when set.
    pub http_port: Option<u16>,
    /// Live HTTP sessions allowed at once.
    pub max_sessions: usize,
    /// Append not-found records here instead of the log.
    pub escalation_log: Option<PathBuf>,
    /// Show transport error detail to the user.
    pub show_error_detail: bool,
}

impl AssistConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`; blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_key = get("ANTHROPIC_API_KEY")
            .ok_or_else(|| ConfigError::MissingEnvVar("ANTHROPIC_API_KEY".to_string()))?;
        let model = get("HAYDEN_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let timeout_secs = parse_or("HAYDEN_TIMEOUT_SECS", get("HAYDEN_TIMEOUT_SECS"), DEFAULT_TIMEOUT_SECS)?;

        let max_tokens = parse_or("HAYDEN_MAX_TOKENS", get("HAYDEN_MAX_TOKENS"), DEFAULT_MAX_TOKENS)?;
        if max_tokens == 0 {
            return Err(ConfigError::InvalidValue {
                key: "HAYDEN_MAX_TOKENS".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }

        let history = match get("HAYDEN_HISTORY") {
            Some(value) => value.parse()?,
            None => HistoryWindow::default(),
        };

        let structured_response = match get("HAYDEN_STRUCTURED") {
            Some(value) => parse_bool("HAYDEN_STRUCTURED", &value)?,
            None => true,
        };

        let http_port = get("HAYDEN_HTTP_PORT")
            .map(|v| parse_value::<u16>("HAYDEN_HTTP_PORT", &v))
            .transpose()?;

        let max_sessions = parse_or("HAYDEN_MAX_SESSIONS", get("HAYDEN_MAX_SESSIONS"), DEFAULT_MAX_SESSIONS)?;
        if max_sessions == 0 {
            return Err(ConfigError::InvalidValue {
                key: "HAYDEN_MAX_SESSIONS".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }

        let show_error_detail = match get("HAYDEN_SHOW_ERROR_DETAIL") {
            Some(value) => parse_bool("HAYDEN_SHOW_ERROR_DETAIL", &value)?,
            None => false,
        };

        Ok(Self {
            llm: LlmConfig {
                api_key: SecretString::from(api_key),
                model,
                timeout: Duration::from_secs(timeout_secs),
            },
            max_tokens,
            history,
            prompt: PromptOptions {
                structured_response,
            },
            data_dir: get("HAYDEN_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR)),
            http_port,
            max_sessions,
            escalation_log: get("HAYDEN_ESCALATION_LOG").map(PathBuf::from),
            show_error_detail,
        })
    }
}

fn parse_value<T>(key: &str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e: T::Err| ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("{value:?}: {e}"),
        })
}

fn parse_or<T>(key: &str, value: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.map_or(Ok(default), |v| parse_value(key, &v))
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("expected true or false, got {other:?}"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use secrecy::ExposeSecret;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_with_only_api_key() {
        let config = AssistConfig::from_lookup(lookup(&[("ANTHROPIC_API_KEY", "sk-test")])).unwrap();
        assert_eq!(config.llm.api_key.expose_secret(), "sk-test");
        assert_eq!(config.llm.model, DEFAULT_MODEL);
        assert_eq!(config.llm.timeout, Duration::from_secs(120));
        assert_eq!(config.max_tokens, 1024);
        assert_eq!(config.history, HistoryWindow::None);
        assert!(config.prompt.structured_response);
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert!(config.http_port.is_none());
        assert_eq!(config.max_sessions, 1000);
        assert!(config.escalation_log.is_none());
        assert!(!config.show_error_detail);
    }

    #[test]
    fn missing_api_key_is_an_error() {
        let err = AssistConfig::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(ref k) if k == "ANTHROPIC_API_KEY"));

        let blank = AssistConfig::from_lookup(lookup(&[("ANTHROPIC_API_KEY", "  ")]));
        assert!(blank.is_err());
    }

    #[test]
    fn overrides_are_parsed() {
        let config = AssistConfig::from_lookup(lookup(&[
            ("ANTHROPIC_API_KEY", "k"),
            ("HAYDEN_MODEL", "claude-3-5-haiku-latest"),
            ("HAYDEN_MAX_TOKENS", "512"),
            ("HAYDEN_HISTORY", "last:4"),
            ("HAYDEN_STRUCTURED", "false"),
            ("HAYDEN_DATA_DIR", "/srv/kb"),
            ("HAYDEN_HTTP_PORT", "8080"),
            ("HAYDEN_MAX_SESSIONS", "25"),
            ("HAYDEN_ESCALATION_LOG", "out/escalations.log"),
            ("HAYDEN_SHOW_ERROR_DETAIL", "yes"),
            ("HAYDEN_TIMEOUT_SECS", "30"),
        ]))
        .unwrap();
        assert_eq!(config.llm.model, "claude-3-5-haiku-latest");
        assert_eq!(config.max_tokens, 512);
        assert_eq!(config.history, HistoryWindow::LastTurns(4));
        assert!(!config.prompt.structured_response);
        assert_eq!(config.data_dir, PathBuf::from("/srv/kb"));
        assert_eq!(config.http_port, Some(8080));
        assert_eq!(config.max_sessions, 25);
        assert_eq!(config.escalation_log, Some(PathBuf::from("out/escalations.log")));
        assert!(config.show_error_detail);
        assert_eq!(config.llm.timeout, Duration::from_secs(30));
    }

    #[test]
    fn invalid_values_name_the_key() {
        for (key, value) in [
            ("HAYDEN_MAX_TOKENS", "lots"),
            ("HAYDEN_MAX_TOKENS", "0"),
            ("HAYDEN_HTTP_PORT", "99999"),
            ("HAYDEN_MAX_SESSIONS", "0"),
            ("HAYDEN_MAX_SESSIONS", "-1"),
            ("HAYDEN_STRUCTURED", "maybe"),
            ("HAYDEN_HISTORY", "some"),
        ] {
            let err = AssistConfig::from_lookup(lookup(&[("ANTHROPIC_API_KEY", "k"), (key, value)]))
                .unwrap_err();
            match err {
                ConfigError::InvalidValue { key: k, .. } => assert_eq!(k, key),
                other => panic!("unexpected: {other:?}"),
            }
        }
    }
}
