//! Resolution trace for debugging rule order.
//!
//! [`Detector::resolve_with_trace()`](crate::Detector::resolve_with_trace)
//! returns the same result as `resolve()` plus the path it took: which rules
//! were tried, what each one saw, and whether the default was used.
//!
//! # Example
//!
//! ```
//! use envdetect::Detector;
//!
//! let mut detector = Detector::new();
//! detector
//!     .add_direct_match_rule("web-01", "db-*", "database")
//!     .add_bool_rule(true, "fallthrough");
//!
//! let trace = detector.resolve_with_trace();
//! assert_eq!(trace.result.as_deref(), Some("fallthrough"));
//! assert_eq!(trace.steps.len(), 2);
//! assert!(!trace.steps[0].matched);
//! assert_eq!(trace.steps[0].signal.as_deref(), Some("web-01"));
//! ```

/// Trace of a full resolution.
///
/// # INV: `result` == `resolve()` result
///
/// For the same rules, default, and signals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveTrace {
    /// The final result (identical to what `resolve()` returns).
    pub result: Option<String>,
    /// One entry per rule evaluated, in order.
    /// Stops after the first accepted rule (first-match-wins).
    pub steps: Vec<RuleStep>,
    /// Whether the default was returned.
    pub used_default: bool,
}

impl ResolveTrace {
    /// The step whose rule won, if any.
    #[must_use]
    pub fn winner(&self) -> Option<&RuleStep> {
        self.steps.iter().find(|step| step.accepted)
    }
}

/// One rule's evaluation in a trace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleStep {
    /// Position in insertion order (0-based).
    pub index: usize,
    /// Rule kind (`"http_host"`, `"env_var"`, ...).
    pub kind: &'static str,
    /// The rule, rendered with `Display`.
    pub rule: String,
    /// The value the rule tested, or `None` if its signal was unavailable.
    pub signal: Option<String>,
    /// Did the pattern (or flag) match?
    pub matched: bool,
    /// Did the match win? `false` when the environment name is falsy.
    pub accepted: bool,
}
