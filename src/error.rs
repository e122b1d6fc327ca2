//! Error types for contact force evaluation.

use thiserror::Error;

use crate::contact::types::ContactTypeId;
use crate::state::Stage;

/// Errors raised by the compliant contact subsystem and its force generators.
///
/// Every variant is a hard failure for the current step. Nothing here is
/// retried internally.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ContactError {
    /// A contact of this type was encountered but neither a matching nor a
    /// default force generator is registered.
    #[error("no force generator registered for contact type {type_id} and no default generator")]
    Configuration {
        /// Contact type that could not be dispatched.
        type_id: ContactTypeId,
    },

    /// A force generator that is declared but not implemented was invoked.
    #[error("{generator}::{operation}() is not implemented")]
    UnimplementedAlgorithm {
        /// Name of the generator that was invoked.
        generator: &'static str,
        /// Operation that was requested.
        operation: &'static str,
    },

    /// A value was requested before the state was realized far enough.
    #[error("{what} requires stage {required:?} but state is only realized to {actual:?}")]
    InvalidState {
        /// Stage the access needs.
        required: Stage,
        /// Stage the state has actually reached.
        actual: Stage,
        /// What was being accessed.
        what: &'static str,
    },

    /// Cached forces were read before [`evaluate`] ran, or after a setup
    /// change discarded them.
    ///
    /// [`evaluate`]: crate::CompliantContactSubsystem::evaluate
    #[error("{what} requested before contact forces were evaluated")]
    NotEvaluated {
        /// What was being accessed.
        what: &'static str,
    },

    /// A caller-supplied argument was out of range or of the wrong kind.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl ContactError {
    /// Creates an [`ContactError::InvalidArgument`] from anything printable.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ContactError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ContactError::Configuration {
            type_id: ContactTypeId::new(7),
        };
        assert_eq!(
            err.to_string(),
            "no force generator registered for contact type 7 and no default generator"
        );

        let err = ContactError::UnimplementedAlgorithm {
            generator: "ThrowError",
            operation: "calc_contact_force",
        };
        assert_eq!(
            err.to_string(),
            "ThrowError::calc_contact_force() is not implemented"
        );

        let err = ContactError::NotEvaluated {
            what: "contact forces",
        };
        assert_eq!(
            err.to_string(),
            "contact forces requested before contact forces were evaluated"
        );

        let err = ContactError::invalid_argument("negative energy");
        assert_eq!(err.to_string(), "invalid argument: negative energy");
    }
}
