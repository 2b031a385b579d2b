//! Configuration errors and host-side option sources (env vars, JSON).
//!
//! Env and JSON each produce a *partial* [`BoopOptions`] layer. Hosts combine
//! them with code-supplied layers the same way as any other layer.

use crate::types::{BoopOptions, PanelVariant};

/// Errors raised while building or resolving an options tree.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The built-in endpoint is in use but no project id was configured.
    #[error("projectId is required when using the default endpoint")]
    MissingProjectId,

    /// An environment variable held a value that could not be interpreted.
    #[error("invalid value for {var}: {value:?}")]
    InvalidValue { var: &'static str, value: String },

    /// A JSON options document could not be parsed.
    #[error("options parse failed: {0}")]
    Parse(String),
}

impl BoopOptions {
    /// Build an options layer from environment variables.
    ///
    /// All optional; unset variables leave the field unset:
    /// - `BOOP_PROJECT_ID`
    /// - `BOOP_ENDPOINT`
    /// - `BOOP_MODE`: `sidebar` or `widget`
    /// - `BOOP_DARK_MODE`: boolean
    /// - `BOOP_INCLUDE_STACK_TRACE`: boolean
    /// - `BOOP_ANIMATION_DURATION_MS`: integer milliseconds
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] when a set variable cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut options = Self {
            project_id: env_string("BOOP_PROJECT_ID"),
            endpoint: env_string("BOOP_ENDPOINT"),
            dark_mode: env_bool("BOOP_DARK_MODE")?,
            mode: parse_mode(env_string("BOOP_MODE").as_deref())?,
            include_stack_trace: env_bool("BOOP_INCLUDE_STACK_TRACE")?,
            ..Self::default()
        };
        if let Some(raw) = env_string("BOOP_ANIMATION_DURATION_MS") {
            let duration = raw
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidValue { var: "BOOP_ANIMATION_DURATION_MS", value: raw.clone() })?;
            options.animation.duration_ms = Some(duration);
        }
        Ok(options)
    }

    /// Parse a camelCase JSON options document. Function-valued fields
    /// (callbacks, URL resolver, success renderer) cannot be expressed in JSON
    /// and are left unset.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] on malformed JSON or mistyped fields.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))
    }
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn env_bool(key: &'static str) -> Result<Option<bool>, ConfigError> {
    let Some(raw) = env_string(key) else {
        return Ok(None);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(Some(true)),
        "0" | "false" | "no" | "off" => Ok(Some(false)),
        _ => Err(ConfigError::InvalidValue { var: key, value: raw }),
    }
}

fn parse_mode(raw: Option<&str>) -> Result<Option<PanelVariant>, ConfigError> {
    match raw.map(str::trim) {
        None => Ok(None),
        Some("sidebar") => Ok(Some(PanelVariant::Sidebar)),
        Some("widget") => Ok(Some(PanelVariant::Widget)),
        Some(other) => Err(ConfigError::InvalidValue { var: "BOOP_MODE", value: other.to_string() }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
