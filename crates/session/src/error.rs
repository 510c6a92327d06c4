use mirage_policy::TransportError;
use thiserror::Error;

/// Errors surfaced by [`crate::Session::dispatch`]. Only the host transport
/// can fail; routing itself never does.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
}

pub type DispatchResult<T> = Result<T, DispatchError>;
