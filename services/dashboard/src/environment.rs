//! Runtime environment classification
//!
//! The environment decides which capability variants the service selector
//! hands out. It is classified once at startup and then passed explicitly
//! to whatever needs it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Environment variable consulted by [`RuntimeEnvironment::from_env`]
pub const ENV_VAR: &str = "DASHBOARD_ENV";

/// Whether the process runs against simulated or live equipment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuntimeEnvironment {
    Development,
    Production,
}

impl RuntimeEnvironment {
    pub fn is_development(self) -> bool {
        self == RuntimeEnvironment::Development
    }

    /// Classify the current process.
    ///
    /// Reads [`ENV_VAR`] first. When it is unset or unparsable, debug builds
    /// count as development and release builds as production.
    pub fn from_env() -> Self {
        Self::classify(std::env::var(ENV_VAR).ok().as_deref())
    }

    fn classify(value: Option<&str>) -> Self {
        if let Some(raw) = value {
            match raw.parse() {
                Ok(environment) => {
                    tracing::debug!("{}={} -> {}", ENV_VAR, raw, environment);
                    return environment;
                }
                Err(e) => tracing::warn!("Ignoring {}: {}", ENV_VAR, e),
            }
        }

        if cfg!(debug_assertions) {
            RuntimeEnvironment::Development
        } else {
            RuntimeEnvironment::Production
        }
    }
}

impl fmt::Display for RuntimeEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuntimeEnvironment::Development => write!(f, "development"),
            RuntimeEnvironment::Production => write!(f, "production"),
        }
    }
}

impl FromStr for RuntimeEnvironment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(RuntimeEnvironment::Development),
            "production" | "prod" => Ok(RuntimeEnvironment::Production),
            other => Err(format!(
                "Invalid environment: {}. Use: development, production",
                other
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_long_and_short_names() {
        assert_eq!(
            "development".parse::<RuntimeEnvironment>(),
            Ok(RuntimeEnvironment::Development)
        );
        assert_eq!(
            "DEV".parse::<RuntimeEnvironment>(),
            Ok(RuntimeEnvironment::Development)
        );
        assert_eq!(
            " production ".parse::<RuntimeEnvironment>(),
            Ok(RuntimeEnvironment::Production)
        );
        assert_eq!(
            "prod".parse::<RuntimeEnvironment>(),
            Ok(RuntimeEnvironment::Production)
        );
    }

    #[test]
    fn rejects_unknown_names() {
        let err = "staging".parse::<RuntimeEnvironment>().unwrap_err();
        assert!(err.contains("staging"), "{err}");
    }

    #[test]
    fn classify_prefers_explicit_value() {
        assert_eq!(
            RuntimeEnvironment::classify(Some("production")),
            RuntimeEnvironment::Production
        );
        assert_eq!(
            RuntimeEnvironment::classify(Some("development")),
            RuntimeEnvironment::Development
        );
    }

    #[test]
    fn classify_falls_back_to_build_profile() {
        let expected = if cfg!(debug_assertions) {
            RuntimeEnvironment::Development
        } else {
            RuntimeEnvironment::Production
        };
        assert_eq!(RuntimeEnvironment::classify(None), expected);
        assert_eq!(RuntimeEnvironment::classify(Some("bogus")), expected);
    }

    #[test]
    fn display_round_trips_through_from_str() {
        for environment in [
            RuntimeEnvironment::Development,
            RuntimeEnvironment::Production,
        ] {
            assert_eq!(environment.to_string().parse(), Ok(environment));
        }
    }

    #[test]
    fn serde_uses_snake_case() {
        let json = serde_json::to_string(&RuntimeEnvironment::Production).unwrap();
        assert_eq!(json, r#""production""#);
        let parsed: RuntimeEnvironment = serde_json::from_str(r#""development""#).unwrap();
        assert!(parsed.is_development());
    }
}
