//! Probe definitions and the context handed to probe procedures.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::future::{self, BoxFuture};
use futures::FutureExt;
use parking_lot::Mutex;

use crate::environment::{Environment, Value};

use super::outcome::ProbeError;

/// What a procedure returns: an optional note on success.
pub type ProbeResult = Result<Option<String>, ProbeError>;

/// A probe body: an async check run against the environment.
#[derive(Clone)]
pub struct ProbeProcedure(
    Arc<dyn Fn(ProbeContext) -> BoxFuture<'static, ProbeResult> + Send + Sync>,
);

impl ProbeProcedure {
    /// Wrap an async closure.
    pub fn new<F, Fut>(f: F) -> Self
    where
        F: Fn(ProbeContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ProbeResult> + Send + 'static,
    {
        Self(Arc::new(move |ctx| f(ctx).boxed()))
    }

    /// Wrap a synchronous closure.
    pub fn sync<F>(f: F) -> Self
    where
        F: Fn(&ProbeContext) -> ProbeResult + Send + Sync + 'static,
    {
        Self(Arc::new(move |ctx| future::ready(f(&ctx)).boxed()))
    }

    pub(crate) fn call(&self, ctx: ProbeContext) -> BoxFuture<'static, ProbeResult> {
        (self.0)(ctx)
    }
}

impl fmt::Debug for ProbeProcedure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ProbeProcedure(..)")
    }
}

/// One named capability check.
#[derive(Debug, Clone)]
pub struct ProbeDefinition {
    /// Dotted path of the capability in the environment.
    pub name: String,
    /// Alternate paths the capability may also be exposed under.
    pub aliases: Vec<String>,
    /// The check itself; `None` for declared-but-unimplemented probes.
    pub procedure: Option<ProbeProcedure>,
}

impl ProbeDefinition {
    /// A probe with a procedure and no aliases.
    pub fn new(name: impl Into<String>, procedure: ProbeProcedure) -> Self {
        Self {
            name: name.into(),
            aliases: Vec::new(),
            procedure: Some(procedure),
        }
    }

    /// A probe without a procedure.
    pub fn unimplemented(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            aliases: Vec::new(),
            procedure: None,
        }
    }

    /// Set the aliases.
    pub fn with_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases = aliases.into_iter().map(Into::into).collect();
        self
    }

    pub fn is_implemented(&self) -> bool {
        self.procedure.is_some()
    }
}

/// Handle a running procedure uses to reach the environment and its flags.
///
/// Flags set here are staged; the runner commits them only if the
/// procedure passes.
#[derive(Debug, Clone)]
pub struct ProbeContext {
    name: Arc<str>,
    environment: Arc<Environment>,
    staged_flags: Arc<Mutex<Vec<String>>>,
}

impl ProbeContext {
    pub fn new(name: &str, environment: Arc<Environment>) -> Self {
        Self {
            name: Arc::from(name),
            environment,
            staged_flags: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Name of the probe being run.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    /// The capability value this probe is checking.
    pub fn capability(&self) -> Result<&Value, ProbeError> {
        self.environment
            .resolve(&self.name)
            .ok_or(ProbeError::CapabilityAbsent)
    }

    /// Resolve any dotted path in the environment.
    pub fn resolve(&self, path: &str) -> Option<&Value> {
        self.environment.resolve(path)
    }

    /// Stage a compatibility flag for `name`.
    pub fn set_flag(&self, name: &str) {
        self.staged_flags.lock().push(name.to_string());
    }

    /// Stage the flag for this probe's own capability.
    pub fn mark_compatible(&self) {
        self.set_flag(&self.name);
    }

    pub(crate) fn take_staged_flags(&self) -> Vec<String> {
        std::mem::take(&mut *self.staged_flags.lock())
    }
}
