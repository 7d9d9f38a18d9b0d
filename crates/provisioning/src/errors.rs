use crate::store::StoreError;
use models::{CodecError, OrgId};

/// Error of a notification policy operation.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The candidate policy tree is structurally invalid or references
    /// receivers or mute time intervals which don't exist. Fixable by the caller.
    #[error("invalid notification policy tree:\n{0}")]
    Validation(validation::Errors),
    /// The configuration changed between being read and written.
    /// The caller may re-fetch and retry.
    #[error("alerting configuration of organization {org_id} was modified concurrently")]
    ConcurrentModification {
        org_id: OrgId,
        #[source]
        source: StoreError,
    },
    /// The store could not be read or written.
    #[error("alerting configuration of organization {org_id} is unavailable")]
    ConfigUnavailable {
        org_id: OrgId,
        #[source]
        source: StoreError,
    },
    /// The stored configuration could not be decoded.
    #[error("stored alerting configuration of organization {org_id} is corrupt")]
    CorruptConfig {
        org_id: OrgId,
        #[source]
        source: CodecError,
    },
}

/// ErrorKind is the class of an Error, for mapping errors to responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    ConcurrentModification,
    ConfigUnavailable,
    CorruptConfig,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Validation(_) => ErrorKind::Validation,
            Error::ConcurrentModification { .. } => ErrorKind::ConcurrentModification,
            Error::ConfigUnavailable { .. } => ErrorKind::ConfigUnavailable,
            Error::CorruptConfig { .. } => ErrorKind::CorruptConfig,
        }
    }

    /// Is this error resolved by re-fetching the configuration and retrying?
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::ConcurrentModification { .. })
    }

    pub(crate) fn from_store(org_id: OrgId, source: StoreError) -> Self {
        match source {
            StoreError::HashMismatch { .. } => Error::ConcurrentModification { org_id, source },
            source => Error::ConfigUnavailable { org_id, source },
        }
    }
}
