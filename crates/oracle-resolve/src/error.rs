use thiserror::Error;

pub type Result<T, E = ResolveError> = std::result::Result<T, E>;

/// A fatal condition that aborts the current class, method or field resolution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("malformed signature: {reason}")]
    MalformedSignature { reason: String },

    #[error("unknown type variable `{name}`")]
    UnknownTypeVariable { name: String },

    #[error("unknown class `{name}`")]
    UnknownClass { name: String },

    #[error("signature does not match the erased descriptor: {reason}")]
    DescriptorShapeMismatch { reason: String },

    #[error("incomplete signature: missing {missing}")]
    IncompleteSignature { missing: &'static str },

    #[error("`{name}` is already being resolved")]
    CyclicResolution { name: String },

    #[error("`{name}` is already resolved")]
    AlreadyResolved { name: String },

    #[error("unknown declaration: {what}")]
    UnknownDeclaration { what: String },
}

impl ResolveError {
    /// Stable diagnostic code.
    pub fn code(&self) -> &'static str {
        match self {
            ResolveError::MalformedSignature { .. } => "malformed-signature",
            ResolveError::UnknownTypeVariable { .. } => "unknown-type-variable",
            ResolveError::UnknownClass { .. } => "unknown-class",
            ResolveError::DescriptorShapeMismatch { .. } => "descriptor-shape-mismatch",
            ResolveError::IncompleteSignature { .. } => "incomplete-signature",
            ResolveError::CyclicResolution { .. } => "cyclic-resolution",
            ResolveError::AlreadyResolved { .. } => "already-resolved",
            ResolveError::UnknownDeclaration { .. } => "unknown-declaration",
        }
    }

    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        ResolveError::MalformedSignature {
            reason: reason.into(),
        }
    }

    pub(crate) fn shape(reason: impl Into<String>) -> Self {
        ResolveError::DescriptorShapeMismatch {
            reason: reason.into(),
        }
    }
}

impl From<oracle_classfile::Error> for ResolveError {
    fn from(err: oracle_classfile::Error) -> Self {
        ResolveError::MalformedSignature {
            reason: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ResolveError;

    #[test]
    fn parser_errors_become_malformed_signatures() {
        let err = oracle_classfile::parse_class_signature("<T:>").unwrap_err();
        let err = ResolveError::from(err);
        assert_eq!(err.code(), "malformed-signature");
        assert!(err.to_string().starts_with("malformed signature: "));
    }
}
