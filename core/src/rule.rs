//! Rule: one deferred test against one signal
//!
//! A [`Rule`] holds the data needed to decide a match later: the pattern, the
//! environment name it yields, and whatever key or literal its kind needs.
//! Nothing is read when the rule is built. [`Rule::evaluate`] reads its signal
//! from the [`Signals`] it is given, every time.

use crate::{wildcard, Signals};
use std::borrow::Cow;
use std::fmt;

/// A single detection rule.
///
/// # Variants
///
/// - `HttpHost`: wildcard test against the request `Host` header
/// - `HostName`: wildcard test against the machine host name
/// - `EnvVar`: wildcard test against an environment variable
/// - `Match`: wildcard test against a literal supplied up front
/// - `Bool`: matches iff the flag is set
///
/// All pattern tests are case-sensitive.
///
/// # Example
///
/// ```
/// use envdetect::{EnvMap, Rule, Signals};
///
/// let rule = Rule::env_var("APP_ENV", "prod*", "production");
/// let signals = Signals::system().with_env(EnvMap::new().with("APP_ENV", "prod-eu"));
/// assert_eq!(rule.evaluate(&signals), Some("production"));
///
/// let signals = Signals::system().with_env(EnvMap::new());
/// assert_eq!(rule.evaluate(&signals), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "type", rename_all = "snake_case")
)]
pub enum Rule {
    /// Request `Host` header. No active request → no match.
    HttpHost {
        /// Wildcard pattern.
        pattern: String,
        /// Name yielded on match.
        environment: String,
    },
    /// Machine host name. Unreadable → no match.
    HostName {
        /// Wildcard pattern.
        pattern: String,
        /// Name yielded on match.
        environment: String,
    },
    /// Environment variable. Unset → no match.
    EnvVar {
        /// Variable to read.
        name: String,
        /// Wildcard pattern.
        pattern: String,
        /// Name yielded on match.
        environment: String,
    },
    /// Caller-supplied literal.
    Match {
        /// The value to test.
        value: String,
        /// Wildcard pattern.
        pattern: String,
        /// Name yielded on match.
        environment: String,
    },
    /// Boolean flag.
    Bool {
        /// Matches iff `true`.
        flag: bool,
        /// Name yielded on match.
        environment: String,
    },
}

impl Rule {
    /// Match the request `Host` header against `pattern`.
    pub fn http_host(pattern: impl Into<String>, environment: impl Into<String>) -> Self {
        Self::HttpHost {
            pattern: pattern.into(),
            environment: environment.into(),
        }
    }

    /// Match the machine host name against `pattern`.
    pub fn host_name(pattern: impl Into<String>, environment: impl Into<String>) -> Self {
        Self::HostName {
            pattern: pattern.into(),
            environment: environment.into(),
        }
    }

    /// Match the environment variable `name` against `pattern`.
    pub fn env_var(
        name: impl Into<String>,
        pattern: impl Into<String>,
        environment: impl Into<String>,
    ) -> Self {
        Self::EnvVar {
            name: name.into(),
            pattern: pattern.into(),
            environment: environment.into(),
        }
    }

    /// Match a caller-supplied `value` against `pattern`.
    pub fn direct_match(
        value: impl Into<String>,
        pattern: impl Into<String>,
        environment: impl Into<String>,
    ) -> Self {
        Self::Match {
            value: value.into(),
            pattern: pattern.into(),
            environment: environment.into(),
        }
    }

    /// Yield `environment` iff `flag` is set.
    pub fn bool(flag: bool, environment: impl Into<String>) -> Self {
        Self::Bool {
            flag,
            environment: environment.into(),
        }
    }

    /// Short name of the rule kind, as used in config (`"http_host"`, ...).
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::HttpHost { .. } => "http_host",
            Self::HostName { .. } => "host_name",
            Self::EnvVar { .. } => "env_var",
            Self::Match { .. } => "match",
            Self::Bool { .. } => "bool",
        }
    }

    /// The environment name this rule yields on match.
    #[must_use]
    pub fn environment(&self) -> &str {
        match self {
            Self::HttpHost { environment, .. }
            | Self::HostName { environment, .. }
            | Self::EnvVar { environment, .. }
            | Self::Match { environment, .. }
            | Self::Bool { environment, .. } => environment,
        }
    }

    /// The wildcard pattern, or `None` for `Bool`.
    #[must_use]
    pub fn pattern(&self) -> Option<&str> {
        match self {
            Self::HttpHost { pattern, .. }
            | Self::HostName { pattern, .. }
            | Self::EnvVar { pattern, .. }
            | Self::Match { pattern, .. } => Some(pattern),
            Self::Bool { .. } => None,
        }
    }

    /// Evaluate against live signals.
    ///
    /// Returns the environment name on match. The name is returned as-is,
    /// even when empty; deciding whether it may win is the detector's job.
    pub fn evaluate(&self, signals: &Signals) -> Option<&str> {
        let (_, matched) = self.observe(signals);
        matched.then(|| self.environment())
    }

    /// Read this rule's signal and test it.
    ///
    /// Returns the observed value (`None` when the signal is unavailable) and
    /// whether it matched.
    pub(crate) fn observe(&self, signals: &Signals) -> (Option<Cow<'_, str>>, bool) {
        match self {
            Self::HttpHost { pattern, .. } => test_signal(signals.http_host(), pattern),
            Self::HostName { pattern, .. } => test_signal(signals.host_name(), pattern),
            Self::EnvVar { name, pattern, .. } => test_signal(signals.env_var(name), pattern),
            Self::Match { value, pattern, .. } => (
                Some(Cow::Borrowed(value.as_str())),
                wildcard::is_match(value, pattern, false),
            ),
            Self::Bool { flag, .. } => {
                let shown = if *flag { "true" } else { "false" };
                (Some(Cow::Borrowed(shown)), *flag)
            }
        }
    }
}

fn test_signal(signal: Option<String>, pattern: &str) -> (Option<Cow<'static, str>>, bool) {
    let matched = signal
        .as_deref()
        .is_some_and(|value| wildcard::is_match(value, pattern, false));
    (signal.map(Cow::Owned), matched)
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HttpHost {
                pattern,
                environment,
            } => write!(f, "http_host(\"{pattern}\") -> \"{environment}\""),
            Self::HostName {
                pattern,
                environment,
            } => write!(f, "host_name(\"{pattern}\") -> \"{environment}\""),
            Self::EnvVar {
                name,
                pattern,
                environment,
            } => write!(f, "env_var({name}, \"{pattern}\") -> \"{environment}\""),
            Self::Match {
                value,
                pattern,
                environment,
            } => write!(f, "match(\"{value}\", \"{pattern}\") -> \"{environment}\""),
            Self::Bool { flag, environment } => write!(f, "bool({flag}) -> \"{environment}\""),
        }
    }
}
