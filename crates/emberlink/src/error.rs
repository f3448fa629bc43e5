//! Unified error type for the Emberlink client core.

use emberlink_protocol::ProtocolError;
use emberlink_transport::TransportError;

use crate::dispatch::DispatchError;

/// Top-level error that wraps all crate-specific errors.
///
/// When using the `emberlink` meta-crate, you deal with this single
/// error type instead of importing errors from each sub-crate.
/// The `#[from]` attribute on each variant auto-generates `From` impls,
/// so the `?` operator converts sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum EmberlinkError {
    /// A transport-level error (connect, send, recv).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error (field decoding).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A dispatch-level error (unknown opcode, handler failure).
    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    /// An operation that needs a live connection was called without one.
    #[error("not connected")]
    NotConnected,

    /// `connect` was called while a connection is already in progress
    /// or established.
    #[error("already connected")]
    AlreadyConnected,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_transport_error() {
        let err = TransportError::Closed;
        let top: EmberlinkError = err.into();
        assert!(matches!(top, EmberlinkError::Transport(_)));
    }

    #[test]
    fn test_from_protocol_error() {
        let err = ProtocolError::InsufficientData {
            needed: 2,
            available: 0,
        };
        let top: EmberlinkError = err.into();
        assert!(matches!(top, EmberlinkError::Protocol(_)));
        assert!(top.to_string().contains("insufficient data"));
    }

    #[test]
    fn test_from_dispatch_error() {
        let err = DispatchError::UnknownOpcode(0xFF);
        let top: EmberlinkError = err.into();
        assert!(matches!(top, EmberlinkError::Dispatch(_)));
        assert!(top.to_string().contains("0xFF"));
    }
}
