pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("invalid descriptor `{descriptor}` at offset {offset}: {reason}")]
    InvalidDescriptor {
        descriptor: String,
        offset: usize,
        reason: &'static str,
    },

    #[error("invalid signature `{signature}` at offset {offset}: {reason}")]
    InvalidSignature {
        signature: String,
        offset: usize,
        reason: &'static str,
    },
}

impl Error {
    /// Byte offset into the input where parsing stopped.
    pub fn offset(&self) -> usize {
        match self {
            Error::InvalidDescriptor { offset, .. } | Error::InvalidSignature { offset, .. } => {
                *offset
            }
        }
    }

    pub fn reason(&self) -> &'static str {
        match self {
            Error::InvalidDescriptor { reason, .. } | Error::InvalidSignature { reason, .. } => {
                reason
            }
        }
    }
}
