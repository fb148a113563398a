use crate::Principal;
use thiserror::Error;

/// Wire code for a transfer that references an unregistered id
pub const ERR_NOT_FOUND: u32 = 2000;

/// Wire code for a transfer attempted by someone other than the owner
pub const ERR_NOT_AUTHORIZED: u32 = 2001;

/// Wire code for a call that matches no registry operation
pub const ERR_UNKNOWN_OPERATION: u32 = 9999;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Equipment not found: {id}")]
    NotFound { id: u64 },

    #[error("Principal {caller} is not the owner of equipment {id}")]
    NotAuthorized { id: u64, caller: Principal },

    #[error("Unknown operation: {0}")]
    UnknownOperation(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid principal: {0}")]
    InvalidPrincipal(String),

    #[error("Corrupt registry snapshot: {0}")]
    CorruptSnapshot(String),
}

impl Error {
    /// Registry error code surfaced to callers, if this error has one
    pub fn code(&self) -> Option<u32> {
        match self {
            Error::NotFound { .. } => Some(ERR_NOT_FOUND),
            Error::NotAuthorized { .. } => Some(ERR_NOT_AUTHORIZED),
            Error::UnknownOperation(_) => Some(ERR_UNKNOWN_OPERATION),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
