//! envdetect - Resolve the deployment environment from ordered wildcard rules
//!
//! A [`Detector`] holds an ordered list of [`Rule`]s, each pairing a wildcard
//! test on one runtime signal with an environment name. Resolution returns the
//! name of the first rule that matches, or a configured default.
//!
//! # Architecture
//!
//! - [`wildcard`]: Anchored `*`-only pattern matching (infallible)
//! - [`Signals`]: One provider per signal kind, injected into the detector
//! - [`Rule`]: One deferred test against one signal
//! - [`Detector`]: Ordered rules with first-match-wins semantics
//! - [`ResolveTrace`]: Step-by-step record of a resolution
//!
//! # Key Invariants
//!
//! 1. **Unavailable signal → no match**: no request, an unset variable, or an
//!    unreadable host name make the rule miss. Resolution never errors.
//!
//! 2. **First-match-wins**: rules run in insertion order and stop at the first
//!    match with a truthy name (not `""`, not `"0"`).
//!
//! 3. **Lazy signals**: signals are read on every `resolve`, never when a rule
//!    is added.
//!
//! # Example
//!
//! ```
//! use envdetect::prelude::*;
//!
//! let signals = Signals::system()
//!     .with_host(FixedHostName::new("web-03.prod.internal"))
//!     .with_env(EnvMap::new().with("CI", "true"));
//!
//! let mut detector = Detector::with_signals(signals);
//! detector
//!     .add_env_var_rule("CI", "true", "testing")
//!     .add_host_name_rule("*.prod.internal", "production")
//!     .set_default("development");
//!
//! assert_eq!(detector.resolve(), Some("testing".to_string()));
//! ```
//!
//! # Features
//!
//! - `serde`: `Serialize`/`Deserialize` for [`Rule`] and the `DetectorConfig` builder

// ═══════════════════════════════════════════════════════════════════════════════
// Modules
// ═══════════════════════════════════════════════════════════════════════════════

mod detector;
mod rule;
mod signal;
mod trace;
pub mod wildcard;

#[cfg(feature = "serde")]
mod config;

// ═══════════════════════════════════════════════════════════════════════════════
// Public API
// ═══════════════════════════════════════════════════════════════════════════════

pub use detector::{is_truthy, Detector};
pub use rule::Rule;
pub use signal::{
    EnvMap, FixedHostName, HostIdentity, HttpContext, NoHttpContext, ProcessEnv,
    ProcessEnvironment, RequestHost, Signals, SystemHostName,
};
pub use trace::{ResolveTrace, RuleStep};
pub use wildcard::WildcardPattern;

#[cfg(feature = "serde")]
pub use config::DetectorConfig;

// ═══════════════════════════════════════════════════════════════════════════════
// Prelude
// ═══════════════════════════════════════════════════════════════════════════════

/// Prelude module for convenient imports.
///
/// ```
/// use envdetect::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        // Core types
        Detector,
        // Errors
        DetectorError,
        // Signals
        EnvMap,
        FixedHostName,
        HostIdentity,
        HttpContext,
        NoHttpContext,
        ProcessEnv,
        ProcessEnvironment,
        RequestHost,
        // Trace types
        ResolveTrace,
        Rule,
        RuleStep,
        Signals,
        SystemHostName,
        WildcardPattern,
    };
}

// ═══════════════════════════════════════════════════════════════════════════════
// Constants
// ═══════════════════════════════════════════════════════════════════════════════

/// Maximum number of rules in a validated [`Detector`].
pub const MAX_RULES: usize = 256;

/// Maximum pattern length, in bytes, in a validated [`Detector`].
pub const MAX_PATTERN_LENGTH: usize = 8192;

// ═══════════════════════════════════════════════════════════════════════════════
// Errors
// ═══════════════════════════════════════════════════════════════════════════════

/// Errors from detector validation.
///
/// Raised by [`Detector::validate`] and config building, never by `resolve`.
/// Fix the rules and rebuild the detector.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DetectorError {
    /// More rules than [`MAX_RULES`].
    #[error("detector has {count} rules, but maximum allowed is {max}")]
    TooManyRules {
        /// Actual rule count.
        count: usize,
        /// Maximum allowed.
        max: usize,
    },
    /// A pattern longer than [`MAX_PATTERN_LENGTH`].
    #[error("rule {index}: pattern length is {len}, but maximum allowed is {max}")]
    PatternTooLong {
        /// Position of the offending rule.
        index: usize,
        /// Actual pattern length in bytes.
        len: usize,
        /// Maximum allowed.
        max: usize,
    },
    /// An environment variable name that can never be set.
    #[error(
        "rule {index}: invalid environment variable name \"{name}\", \
         names must be non-empty and contain no '=' or NUL"
    )]
    InvalidVarName {
        /// Position of the offending rule.
        index: usize,
        /// The rejected name.
        name: String,
    },
}
