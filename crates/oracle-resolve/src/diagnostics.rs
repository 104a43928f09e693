use std::fmt;

use crate::error::ResolveError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Error,
    Warning,
}

/// A single report emitted while resolving signatures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: &'static str,
    pub message: String,
    /// Binary name of the class, or `Class.member` for methods and fields.
    pub owner: Option<String>,
    pub signature: Option<String>,
}

impl Diagnostic {
    pub fn error(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
            owner: None,
            signature: None,
        }
    }

    pub fn warning(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
            owner: None,
            signature: None,
        }
    }

    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    pub fn with_signature(mut self, signature: Option<&str>) -> Self {
        self.signature = signature.map(str::to_owned);
        self
    }
}

impl From<&ResolveError> for Diagnostic {
    fn from(err: &ResolveError) -> Self {
        Diagnostic::error(err.code(), err.to_string())
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let severity = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "{severity}[{}]: {}", self.code, self.message)?;
        if let Some(owner) = &self.owner {
            write!(f, " (in {owner})")?;
        }
        Ok(())
    }
}

/// Reports a fatal resolution error with the owner and signature it concerns.
pub(crate) fn report_failure(
    sink: &mut dyn DiagnosticSink,
    err: &ResolveError,
    owner: String,
    signature: Option<&str>,
) {
    sink.report(
        Diagnostic::from(err)
            .with_owner(owner)
            .with_signature(signature),
    );
}

/// Receives diagnostics as resolution proceeds.
pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: Diagnostic);
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

/// Target of every event this crate logs.
pub(crate) const LOG_TARGET: &str = "oracle.resolve";

/// Forwards every diagnostic to `tracing` under the `oracle.resolve` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&mut self, diagnostic: Diagnostic) {
        let owner = diagnostic.owner.as_deref().unwrap_or("");
        let signature = diagnostic.signature.as_deref().unwrap_or("");
        match diagnostic.severity {
            Severity::Error => tracing::error!(
                target: LOG_TARGET,
                code = diagnostic.code,
                owner,
                signature,
                "{}",
                diagnostic.message
            ),
            Severity::Warning => tracing::warn!(
                target: LOG_TARGET,
                code = diagnostic.code,
                owner,
                signature,
                "{}",
                diagnostic.message
            ),
        }
    }
}
