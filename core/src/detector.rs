//! Detector: ordered rules with first-match-wins resolution
//!
//! The `Detector` is the entry point. Rules are added with the fluent
//! `add_*_rule` methods and tried in insertion order by [`Detector::resolve`].

use crate::rule::Rule;
use crate::{
    wildcard, DetectorError, ResolveTrace, RuleStep, Signals, MAX_PATTERN_LENGTH, MAX_RULES,
};
use std::borrow::Cow;
use std::fmt;

/// Ordered environment detection rules plus an optional default.
///
/// # INV: First-match-wins
///
/// Rules are evaluated in the order they were added. The first rule that
/// matches with a truthy environment name ends resolution, even if later
/// rules would also match.
///
/// # INV: Lazy signals
///
/// Nothing is read when a rule is added. Every `resolve` call reads each
/// signal it needs afresh, so a changed environment variable is seen on the
/// next call.
///
/// # Truthy names
///
/// A rule mapped to `""` or `"0"` can match but never wins; resolution moves
/// on to the next rule. The default is returned exactly as stored.
///
/// # Example
///
/// ```
/// use envdetect::{Detector, EnvMap, RequestHost, Signals};
///
/// let signals = Signals::system()
///     .with_http(RequestHost::new("shop.staging.example.com"))
///     .with_env(EnvMap::new());
///
/// let mut detector = Detector::with_signals(signals);
/// detector
///     .add_env_var_rule("APP_ENV", "*", "from-env")
///     .add_http_host_rule("*.staging.example.com", "staging")
///     .add_http_host_rule("*.example.com", "production")
///     .set_default("development");
///
/// assert_eq!(detector.resolve().as_deref(), Some("staging"));
/// ```
pub struct Detector {
    rules: Vec<Rule>,
    default: Option<String>,
    signals: Signals,
}

impl Detector {
    /// An empty detector reading the live process ([`Signals::system()`]).
    #[must_use]
    pub fn new() -> Self {
        Self::with_signals(Signals::system())
    }

    /// An empty detector reading the given signals.
    #[must_use]
    pub fn with_signals(signals: Signals) -> Self {
        Self {
            rules: Vec::new(),
            default: None,
            signals,
        }
    }

    /// The signals `resolve()` reads.
    #[must_use]
    pub fn signals(&self) -> &Signals {
        &self.signals
    }

    /// Replace the signals `resolve()` reads. Rules and default are kept.
    pub fn set_signals(&mut self, signals: Signals) -> &mut Self {
        self.signals = signals;
        self
    }

    /// Match `pattern` against the current request's `Host` header.
    ///
    /// Never matches when no request is active.
    pub fn add_http_host_rule(
        &mut self,
        pattern: impl Into<String>,
        environment: impl Into<String>,
    ) -> &mut Self {
        self.add_rule(Rule::http_host(pattern, environment))
    }

    /// Match `pattern` against the machine host name (`uname -n`).
    pub fn add_host_name_rule(
        &mut self,
        pattern: impl Into<String>,
        environment: impl Into<String>,
    ) -> &mut Self {
        self.add_rule(Rule::host_name(pattern, environment))
    }

    /// Match `pattern` against the environment variable `name`.
    ///
    /// Never matches when the variable is unset.
    pub fn add_env_var_rule(
        &mut self,
        name: impl Into<String>,
        pattern: impl Into<String>,
        environment: impl Into<String>,
    ) -> &mut Self {
        self.add_rule(Rule::env_var(name, pattern, environment))
    }

    /// Match `pattern` against `value` directly.
    pub fn add_direct_match_rule(
        &mut self,
        value: impl Into<String>,
        pattern: impl Into<String>,
        environment: impl Into<String>,
    ) -> &mut Self {
        self.add_rule(Rule::direct_match(value, pattern, environment))
    }

    /// Yield `environment` iff `flag` is `true`.
    pub fn add_bool_rule(&mut self, flag: bool, environment: impl Into<String>) -> &mut Self {
        self.add_rule(Rule::bool(flag, environment))
    }

    /// Append a prebuilt rule.
    pub fn add_rule(&mut self, rule: Rule) -> &mut Self {
        self.rules.push(rule);
        self
    }

    /// Set the result used when no rule matches. Replaces any earlier default.
    pub fn set_default(&mut self, environment: impl Into<String>) -> &mut Self {
        self.default = Some(environment.into());
        self
    }

    /// Remove every rule and the default.
    pub fn clear(&mut self) -> &mut Self {
        self.rules.clear();
        self.default = None;
        self
    }

    /// Returns the number of rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns `true` if there are no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Returns `true` if a default is set.
    #[must_use]
    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }

    /// Resolve the environment name against this detector's signals.
    ///
    /// Returns the first truthy match, else the default, else `None`.
    #[must_use]
    pub fn resolve(&self) -> Option<String> {
        self.resolve_with(&self.signals)
    }

    /// Resolve against other signals, e.g. a per-request bundle.
    #[must_use]
    pub fn resolve_with(&self, signals: &Signals) -> Option<String> {
        match self.first_match(signals, |_| {}) {
            Some(environment) => Some(environment.to_owned()),
            None => self.fallback(),
        }
    }

    /// Resolve with a full trace for debugging.
    #[must_use]
    pub fn resolve_with_trace(&self) -> ResolveTrace {
        self.resolve_with_trace_in(&self.signals)
    }

    /// Resolve against other signals with a full trace.
    ///
    /// The trace's `result` always equals `resolve_with(signals)`.
    #[must_use]
    pub fn resolve_with_trace_in(&self, signals: &Signals) -> ResolveTrace {
        let mut steps = Vec::new();
        let winner = self.first_match(signals, |observed| {
            steps.push(RuleStep {
                index: observed.index,
                kind: observed.rule.kind(),
                rule: observed.rule.to_string(),
                signal: observed.signal.map(Cow::into_owned),
                matched: observed.matched,
                accepted: observed.accepted,
            });
        });

        match winner {
            Some(environment) => ResolveTrace {
                result: Some(environment.to_owned()),
                steps,
                used_default: false,
            },
            None => ResolveTrace {
                result: self.fallback(),
                steps,
                used_default: self.default.is_some(),
            },
        }
    }

    /// Test `value` against a wildcard `pattern`.
    ///
    /// `*` matches any run of characters (including none); everything else is
    /// literal; the whole value must match. See [`wildcard`] for details.
    ///
    /// ```
    /// use envdetect::Detector;
    ///
    /// assert!(Detector::matches("test.local", "*.local", false));
    /// assert!(Detector::matches("TEST.local", "test.*", true));
    /// assert!(!Detector::matches("test.local", "est.local*", false));
    /// ```
    #[must_use]
    pub fn matches(value: &str, pattern: &str, case_insensitive: bool) -> bool {
        wildcard::is_match(value, pattern, case_insensitive)
    }

    /// Check this detector against the size limits.
    ///
    /// Checks:
    /// - At most [`MAX_RULES`] rules
    /// - Every pattern at most [`MAX_PATTERN_LENGTH`] bytes
    /// - Every environment variable name non-empty, without `=` or NUL
    ///
    /// # Errors
    ///
    /// Returns the first violation found, in rule order.
    pub fn validate(&self) -> Result<(), DetectorError> {
        validate_rules(&self.rules)
    }

    /// Walk the rules in order, reporting each one to `on_rule`, and stop at
    /// the first truthy match.
    fn first_match<'a>(
        &'a self,
        signals: &Signals,
        mut on_rule: impl FnMut(Observed<'a>),
    ) -> Option<&'a str> {
        for (index, rule) in self.rules.iter().enumerate() {
            let (signal, matched) = rule.observe(signals);
            let accepted = matched && is_truthy(rule.environment());
            if !matched {
                tracing::trace!(index, %rule, "rule did not match");
            } else if !accepted {
                tracing::debug!(index, %rule, "rule matched a falsy environment name, skipping");
            }
            on_rule(Observed {
                index,
                rule,
                signal,
                matched,
                accepted,
            });
            if accepted {
                let environment = rule.environment();
                tracing::debug!(index, environment, "resolved environment");
                return Some(environment);
            }
        }
        None
    }

    fn fallback(&self) -> Option<String> {
        match &self.default {
            Some(default) => tracing::debug!(%default, "no rule matched, using default"),
            None => tracing::debug!("no rule matched and no default set"),
        }
        self.default.clone()
    }
}

/// One rule as seen during resolution.
struct Observed<'a> {
    index: usize,
    rule: &'a Rule,
    signal: Option<Cow<'a, str>>,
    matched: bool,
    accepted: bool,
}

/// The truthiness check applied to a matched environment name.
///
/// `""` and `"0"` are falsy; everything else is truthy.
#[must_use]
pub fn is_truthy(environment: &str) -> bool {
    !environment.is_empty() && environment != "0"
}

pub(crate) fn validate_rules(rules: &[Rule]) -> Result<(), DetectorError> {
    if rules.len() > MAX_RULES {
        return Err(DetectorError::TooManyRules {
            count: rules.len(),
            max: MAX_RULES,
        });
    }

    for (index, rule) in rules.iter().enumerate() {
        if let Some(pattern) = rule.pattern() {
            if pattern.len() > MAX_PATTERN_LENGTH {
                return Err(DetectorError::PatternTooLong {
                    index,
                    len: pattern.len(),
                    max: MAX_PATTERN_LENGTH,
                });
            }
        }
        if let Rule::EnvVar { name, .. } = rule {
            if name.is_empty() || name.contains(['=', '\0']) {
                return Err(DetectorError::InvalidVarName {
                    index,
                    name: name.clone(),
                });
            }
        }
    }

    Ok(())
}

impl Default for Detector {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Detector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Detector")
            .field("rules_len", &self.rules.len())
            .field("has_default", &self.default.is_some())
            .finish()
    }
}
