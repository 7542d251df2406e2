//! envdetect-test: Deterministic signals for conformance testing
//!
//! Provides a [`TestSignals`] builder that never touches the live process,
//! plus the YAML fixture runner (feature = `"fixtures"`).
//!
//! # Example
//!
//! ```
//! use envdetect_test::prelude::*;
//!
//! let signals = TestSignals::new()
//!     .with_request_host("test.localhost")
//!     .with_env("APP_ENV", "staging")
//!     .into_signals();
//!
//! let mut detector = Detector::with_signals(signals);
//! detector.add_http_host_rule("*.localhost", "local");
//! assert_eq!(detector.resolve().as_deref(), Some("local"));
//! ```

use envdetect::prelude::*;


/// HTTP state of a [`TestSignals`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TestRequest {
    /// No request is being served.
    #[default]
    Inactive,
    /// A request without a `Host` header.
    NoHost,
    /// A request with this `Host` header.
    Host(String),
}

/// Host identity that is never available.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHostName;

impl HostIdentity for NoHostName {
    fn host_name(&self) -> Option<String> {
        None
    }
}

/// A fully controlled set of signals.
///
/// Starts with no request, no host name, and an empty environment.
#[derive(Debug, Clone, Default)]
pub struct TestSignals {
    request: TestRequest,
    host_name: Option<String>,
    env: EnvMap,
}

impl TestSignals {
    /// Create signals with nothing available.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve a request with the given `Host` header (builder pattern).
    #[must_use]
    pub fn with_request_host(mut self, host: impl Into<String>) -> Self {
        self.request = TestRequest::Host(host.into());
        self
    }

    /// Serve a request that has no `Host` header.
    #[must_use]
    pub fn with_request_without_host(mut self) -> Self {
        self.request = TestRequest::NoHost;
        self
    }

    /// Set the machine host name.
    #[must_use]
    pub fn with_host_name(mut self, name: impl Into<String>) -> Self {
        self.host_name = Some(name.into());
        self
    }

    /// Set an environment variable.
    #[must_use]
    pub fn with_env(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.set(name, value);
        self
    }

    /// The current HTTP state.
    #[must_use]
    pub fn request(&self) -> &TestRequest {
        &self.request
    }

    /// Bundle into the [`Signals`] a detector reads.
    #[must_use]
    pub fn into_signals(self) -> Signals {
        let signals = match self.request {
            TestRequest::Inactive => Signals::system().with_http(NoHttpContext),
            TestRequest::NoHost => Signals::system().with_http(RequestHost::without_header()),
            TestRequest::Host(host) => Signals::system().with_http(RequestHost::new(host)),
        };
        let signals = match self.host_name {
            Some(name) => signals.with_host(FixedHostName::new(name)),
            None => signals.with_host(NoHostName),
        };
        signals.with_env(self.env)
    }
}

impl From<TestSignals> for Signals {
    fn from(signals: TestSignals) -> Self {
        signals.into_signals()
    }
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use super::{NoHostName, TestRequest, TestSignals};
    pub use envdetect::prelude::*;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_signals_have_nothing() {
        let signals = TestSignals::new().into_signals();
        assert_eq!(signals.http_host(), None);
        assert_eq!(signals.host_name(), None);
        assert_eq!(signals.env_var("PATH"), None);
    }

    #[test]
    fn builder_sets_every_signal() {
        let signals = TestSignals::new()
            .with_request_host("a.test")
            .with_host_name("box-1")
            .with_env("K", "V")
            .into_signals();
        assert_eq!(signals.http_host().as_deref(), Some("a.test"));
        assert_eq!(signals.host_name().as_deref(), Some("box-1"));
        assert_eq!(signals.env_var("K").as_deref(), Some("V"));
    }

    #[test]
    fn request_without_host_reads_empty() {
        let test = TestSignals::new().with_request_without_host();
        assert_eq!(test.request(), &TestRequest::NoHost);
        assert_eq!(test.into_signals().http_host().as_deref(), Some(""));
    }

    #[test]
    fn full_detector() {
        let signals: Signals = TestSignals::new()
            .with_host_name("definitely-not-prod")
            .into();

        let mut detector = Detector::with_signals(signals);
        detector
            .add_direct_match_rule("asdadas", "nomatch", "match")
            .add_http_host_rule("definitelynotgonnamatch.local", "http-host")
            .add_bool_rule(true, "bool")
            .add_host_name_rule("definitelynotgonnamatch.local", "host-name");

        assert_eq!(detector.resolve().as_deref(), Some("bool"));
    }

    #[test]
    fn host_name_unavailable_never_matches() {
        let mut detector = Detector::with_signals(TestSignals::new().into_signals());
        detector
            .add_host_name_rule("*", "any")
            .set_default("fallback");
        assert_eq!(detector.resolve().as_deref(), Some("fallback"));
    }
}
