//! Declarative detector construction (feature = `"serde"`).
//!
//! [`DetectorConfig`] is the serde mirror of a [`Detector`]: an ordered rule
//! list plus an optional default. It deserializes from whatever format the
//! caller already parsed, then [`build()`](DetectorConfig::build) validates it
//! and produces a detector.
//!
//! ```yaml
//! rules:
//!   - type: env_var
//!     name: APP_ENV
//!     pattern: "prod*"
//!     environment: production
//!   - type: http_host
//!     pattern: "*.staging.example.com"
//!     environment: staging
//!   - type: bool
//!     flag: true
//!     environment: forced
//! default: development
//! ```

use crate::detector::validate_rules;
use crate::{Detector, DetectorError, Rule, Signals};
use serde::{Deserialize, Serialize};

/// Configuration for a [`Detector`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// Rules in evaluation order (first-match-wins).
    #[serde(default)]
    pub rules: Vec<Rule>,

    /// Result when no rule matches.
    #[serde(default)]
    pub default: Option<String>,
}

impl DetectorConfig {
    /// Check the config against the detector limits.
    ///
    /// # Errors
    ///
    /// Same as [`Detector::validate`].
    pub fn validate(&self) -> Result<(), DetectorError> {
        validate_rules(&self.rules)
    }

    /// Validate, then build a detector reading `signals`.
    ///
    /// # Errors
    ///
    /// Returns the first [`DetectorError`] found; no detector is built.
    pub fn build(self, signals: Signals) -> Result<Detector, DetectorError> {
        self.validate()?;

        let mut detector = Detector::with_signals(signals);
        for rule in self.rules {
            detector.add_rule(rule);
        }
        if let Some(default) = self.default {
            detector.set_default(default);
        }
        Ok(detector)
    }
}
