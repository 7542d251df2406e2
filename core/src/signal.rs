//! Signals: where rules read the outside world
//!
//! Rules never touch process state directly. Each signal comes from a small
//! provider trait, and a [`Signals`] bundle carries one provider per kind:
//!
//! - [`HttpContext`]: the inbound request's `Host` header, if a request is active
//! - [`HostIdentity`]: the machine's network host name
//! - [`ProcessEnvironment`]: environment variable lookup
//!
//! [`Signals::system()`] wires the live process. Tests and servers swap in
//! their own providers with the `with_*` builders.
//!
//! # INV: unavailable → no match
//!
//! A provider that cannot produce a value returns `None`. The rule reading it
//! evaluates to no match; nothing in the resolution path fails.

use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;

// ═══════════════════════════════════════════════════════════════════════════════
// Provider traits
// ═══════════════════════════════════════════════════════════════════════════════

/// Access to the HTTP request currently being served, if any.
#[diagnostic::on_unimplemented(
    message = "`{Self}` does not implement `HttpContext`",
    note = "implement `is_active` and `host_header`, or use `RequestHost` / `NoHttpContext`"
)]
pub trait HttpContext: Send + Sync + Debug {
    /// Whether a request context is active.
    fn is_active(&self) -> bool;

    /// The request's `Host` header value.
    ///
    /// Only consulted when [`is_active`](Self::is_active) returns `true`.
    fn host_header(&self) -> Option<String>;
}

/// Access to the machine's identity.
#[diagnostic::on_unimplemented(
    message = "`{Self}` does not implement `HostIdentity`",
    note = "implement `host_name`, or use `SystemHostName` / `FixedHostName`"
)]
pub trait HostIdentity: Send + Sync + Debug {
    /// The network host name (what `uname -n` prints).
    fn host_name(&self) -> Option<String>;
}

/// Access to environment variables.
#[diagnostic::on_unimplemented(
    message = "`{Self}` does not implement `ProcessEnvironment`",
    note = "implement `var`, or use `ProcessEnv` / `EnvMap`"
)]
pub trait ProcessEnvironment: Send + Sync + Debug {
    /// Look up a variable. `None` if unset.
    fn var(&self, name: &str) -> Option<String>;
}

// ═══════════════════════════════════════════════════════════════════════════════
// HTTP
// ═══════════════════════════════════════════════════════════════════════════════

/// No request is being served. Host header rules never match.
///
/// This is the system default: a Rust process has no ambient request, so the
/// serving layer must hand one in via [`RequestHost`] or its own provider.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHttpContext;

impl HttpContext for NoHttpContext {
    fn is_active(&self) -> bool {
        false
    }

    fn host_header(&self) -> Option<String> {
        None
    }
}

/// An active request with a known `Host` header.
///
/// # Example
///
/// ```
/// use envdetect::{HttpContext, RequestHost};
///
/// let ctx = RequestHost::new("api.example.com");
/// assert!(ctx.is_active());
/// assert_eq!(ctx.host_header().as_deref(), Some("api.example.com"));
///
/// let ctx = RequestHost::without_header();
/// assert!(ctx.is_active());
/// assert_eq!(ctx.host_header(), None);
/// ```
#[derive(Debug, Clone)]
pub struct RequestHost {
    host: Option<String>,
}

impl RequestHost {
    /// An active request whose `Host` header is `host`.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: Some(host.into()),
        }
    }

    /// An active request that carried no `Host` header.
    #[must_use]
    pub fn without_header() -> Self {
        Self { host: None }
    }

    /// Build from `(name, value)` header pairs.
    ///
    /// Header names compare case-insensitively; the first `Host` wins.
    pub fn from_headers<'a, I>(headers: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let host = headers
            .into_iter()
            .find(|(name, _)| name.eq_ignore_ascii_case("host"))
            .map(|(_, value)| value.to_owned());
        Self { host }
    }
}

impl HttpContext for RequestHost {
    fn is_active(&self) -> bool {
        true
    }

    fn host_header(&self) -> Option<String> {
        self.host.clone()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Host name
// ═══════════════════════════════════════════════════════════════════════════════

/// Reads the host name from the operating system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemHostName;

impl HostIdentity for SystemHostName {
    fn host_name(&self) -> Option<String> {
        match hostname::get() {
            Ok(name) => Some(name.to_string_lossy().into_owned()),
            Err(error) => {
                tracing::debug!(%error, "host name unavailable");
                None
            }
        }
    }
}

/// A fixed host name.
#[derive(Debug, Clone)]
pub struct FixedHostName(String);

impl FixedHostName {
    /// A provider that always reports `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

impl HostIdentity for FixedHostName {
    fn host_name(&self) -> Option<String> {
        Some(self.0.clone())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Environment
// ═══════════════════════════════════════════════════════════════════════════════

/// Reads the live process environment.
///
/// Variables whose value is not valid UTF-8 are treated as unset.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl ProcessEnvironment for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        match std::env::var(name) {
            Ok(value) => Some(value),
            Err(std::env::VarError::NotPresent) => None,
            Err(std::env::VarError::NotUnicode(_)) => {
                tracing::debug!(name, "environment variable is not valid UTF-8");
                None
            }
        }
    }
}

/// An in-memory environment.
///
/// # Example
///
/// ```
/// use envdetect::{EnvMap, ProcessEnvironment};
///
/// let env = EnvMap::new().with("APP_ENV", "staging");
/// assert_eq!(env.var("APP_ENV").as_deref(), Some("staging"));
/// assert_eq!(env.var("MISSING"), None);
/// ```
#[derive(Debug, Clone, Default)]
pub struct EnvMap {
    vars: HashMap<String, String>,
}

impl EnvMap {
    /// Create an empty environment.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a variable (builder pattern).
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(name.into(), value.into());
        self
    }

    /// Set a variable in place.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(name.into(), value.into());
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for EnvMap {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl ProcessEnvironment for EnvMap {
    fn var(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Bundle
// ═══════════════════════════════════════════════════════════════════════════════

/// One provider per signal kind.
///
/// Cloning is cheap (three `Arc` bumps), so a server can keep a base bundle
/// and derive a per-request one:
///
/// ```
/// use envdetect::{RequestHost, Signals};
///
/// let base = Signals::system();
/// let per_request = base.clone().with_http(RequestHost::new("shop.example.com"));
/// # let _ = per_request;
/// ```
#[derive(Debug, Clone)]
pub struct Signals {
    http: Arc<dyn HttpContext>,
    host: Arc<dyn HostIdentity>,
    env: Arc<dyn ProcessEnvironment>,
}

impl Signals {
    /// The live process: no HTTP context, OS host name, process environment.
    #[must_use]
    pub fn system() -> Self {
        Self {
            http: Arc::new(NoHttpContext),
            host: Arc::new(SystemHostName),
            env: Arc::new(ProcessEnv),
        }
    }

    /// Replace the HTTP context provider.
    #[must_use]
    pub fn with_http(mut self, http: impl HttpContext + 'static) -> Self {
        self.http = Arc::new(http);
        self
    }

    /// Replace the host identity provider.
    #[must_use]
    pub fn with_host(mut self, host: impl HostIdentity + 'static) -> Self {
        self.host = Arc::new(host);
        self
    }

    /// Replace the environment provider.
    #[must_use]
    pub fn with_env(mut self, env: impl ProcessEnvironment + 'static) -> Self {
        self.env = Arc::new(env);
        self
    }

    /// The current `Host` header, or `None` when no request is active.
    ///
    /// An active request without the header reads as the empty string.
    #[must_use]
    pub fn http_host(&self) -> Option<String> {
        if !self.http.is_active() {
            return None;
        }
        Some(self.http.host_header().unwrap_or_default())
    }

    /// The machine host name, if it can be read.
    #[must_use]
    pub fn host_name(&self) -> Option<String> {
        self.host.host_name()
    }

    /// An environment variable, if set.
    #[must_use]
    pub fn env_var(&self, name: &str) -> Option<String> {
        self.env.var(name)
    }
}

impl Default for Signals {
    fn default() -> Self {
        Self::system()
    }
}
