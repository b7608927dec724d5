//! Unified error type for the Subs stack.

use subs_protocol::ProtocolError;
use subs_transport::TransportError;

/// Top-level error that wraps all crate-specific errors.
///
/// Callers of [`Stream`](crate::Stream) deal with this single type. The
/// `#[from]` attribute on each variant auto-generates `From` impls, so the
/// `?` operator converts sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum SubsError {
    /// The connection failed (reset, closed, I/O failure).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A packet could not be packed, unpacked, or failed validation.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}

impl SubsError {
    /// Returns `true` for errors caused by a single bad packet.
    ///
    /// The connection is still usable; the usual reaction is to tell the
    /// peer with an ERROR/UNEXPECTED packet and receive again.
    pub fn is_packet_error(&self) -> bool {
        matches!(
            self,
            Self::Protocol(ProtocolError::Unpack(_) | ProtocolError::InvalidPacket(_))
        )
    }

    /// Returns `true` if the connection itself failed.
    pub fn is_transport_error(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

/// Shorthand for results carrying a [`SubsError`].
pub type Result<T> = std::result::Result<T, SubsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_transport_error() {
        let err: SubsError = TransportError::ConnectionClosed.into();
        assert!(matches!(err, SubsError::Transport(_)));
        assert!(err.is_transport_error());
        assert!(!err.is_packet_error());
        assert_eq!(err.to_string(), "connection closed by peer");
    }

    #[test]
    fn test_from_protocol_error() {
        let err: SubsError = ProtocolError::InvalidPacket("bad".into()).into();
        assert!(matches!(err, SubsError::Protocol(_)));
        assert!(err.to_string().contains("bad"));
    }

    #[test]
    fn test_packet_errors_are_recoverable_kinds() {
        let unpack: SubsError = ProtocolError::Unpack("x".into()).into();
        let invalid: SubsError = ProtocolError::InvalidPacket("x".into()).into();
        let pack: SubsError = ProtocolError::Pack("x".into()).into();
        assert!(unpack.is_packet_error());
        assert!(invalid.is_packet_error());
        // A pack failure is our own fault, not the peer's.
        assert!(!pack.is_packet_error());
        assert!(!pack.is_transport_error());
    }
}
