//! Error taxonomy for the pricing core.
//!
//! Every public operation of the core returns [`Error`]. Collaborators (ledger,
//! cache, broker) have their own error types which are mapped into this one at
//! the component boundary. Only the caller decides status codes and retries.

use derive_more::Display;

use crate::cache::CacheError;

/// Result alias used by the pricing core
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Stage of the amount-out pipeline at which a failure happened
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Resolving the pair address
    #[display("pair address resolution")]
    PairAddress,
    /// Reading live reserves
    #[display("reserve retrieval")]
    Reserves,
    /// Resolving token decimals
    #[display("decimals resolution")]
    Decimals,
    /// Converting between human and smallest units
    #[display("unit conversion")]
    Conversion,
    /// Applying the constant-product formula
    #[display("amount out formula")]
    Formula,
}

/// Errors raised by the pricing core
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Malformed caller input, names the offending field
    #[error("invalid {field}: {reason}")]
    InvalidInput {
        /// Name of the offending field
        field: &'static str,
        /// What is wrong with it
        reason: String,
    },
    /// A ledger call failed while resolving on-chain data
    #[error("data unavailable for {context}: {reason}")]
    DataUnavailable {
        /// Token / pair the data was requested for
        context: String,
        /// Underlying failure
        reason: String,
    },
    /// One of the reserves is zero
    #[error("insufficient liquidity")]
    InsufficientLiquidity,
    /// The input amount is zero
    #[error("insufficient input amount")]
    InsufficientInputAmount,
    /// The cache store could not be reached
    #[error("cache unavailable: {0}")]
    CacheUnavailable(String),
    /// A stage of the amount-out pipeline failed
    #[error("computation failed during {stage}: {source}")]
    ComputationFailed {
        /// Stage that failed
        stage: Stage,
        /// The failure raised by that stage
        #[source]
        source: Box<Error>,
    },
    /// Anything uncategorized
    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl Error {
    /// Shorthand for [`Error::InvalidInput`]
    pub fn invalid_input(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field,
            reason: reason.into(),
        }
    }

    /// Shorthand for [`Error::DataUnavailable`]
    pub fn data_unavailable(context: impl Into<String>, reason: impl ToString) -> Self {
        Self::DataUnavailable {
            context: context.into(),
            reason: reason.to_string(),
        }
    }

    /// Wraps the error as a failure of the given pipeline stage.
    ///
    /// Caller input errors and already wrapped errors are returned unchanged.
    #[must_use]
    pub fn at(self, stage: Stage) -> Self {
        match self {
            Self::InvalidInput { .. } | Self::ComputationFailed { .. } => self,
            other => Self::ComputationFailed {
                stage,
                source: Box::new(other),
            },
        }
    }

    /// The pipeline stage this error was raised at, if any
    #[must_use]
    pub fn stage(&self) -> Option<Stage> {
        match self {
            Self::ComputationFailed { stage, .. } => Some(*stage),
            _ => None,
        }
    }

    /// Unwraps [`Error::ComputationFailed`] down to the error that caused it
    #[must_use]
    pub fn root(&self) -> &Self {
        match self {
            Self::ComputationFailed { source, .. } => source.root(),
            other => other,
        }
    }

    /// True when the caller can fix the request (bad input, formula rejection).
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(
            self.root(),
            Self::InvalidInput { .. } | Self::InsufficientLiquidity | Self::InsufficientInputAmount
        )
    }

    /// Message safe to hand to an external caller.
    ///
    /// Unexpected failures are reduced to an opaque text; their detail only
    /// goes to the log.
    #[must_use]
    pub fn public_message(&self) -> String {
        match self.root() {
            Self::Unexpected(_) => {
                "An unexpected error occurred. Please try again later.".to_string()
            }
            _ => self.to_string(),
        }
    }
}

impl From<CacheError> for Error {
    fn from(e: CacheError) -> Self {
        Self::CacheUnavailable(e.to_string())
    }
}
