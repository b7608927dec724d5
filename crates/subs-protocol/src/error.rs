//! Error types for the protocol layer.
//!
//! Codecs and validators never recover from their own errors; they return
//! them and let the stream layer hand them to the caller unchanged.

/// Errors that can occur while packing, unpacking, or validating packets.
///
/// Each variant carries a human-readable description of what went wrong.
/// Callers switch on the variant, not on the message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProtocolError {
    /// An in-memory packet could not be serialized.
    ///
    /// The text codec never produces this; it is reserved for encodings
    /// that can reject in-memory state.
    #[error("pack failed: {0}")]
    Pack(String),

    /// Raw bytes could not be decoded into a well-formed packet: a
    /// required field is missing, an enumeration value is unknown, or a
    /// coordinate is not a number.
    #[error("unpack failed: {0}")]
    Unpack(String),

    /// The packet is well-typed but breaks the field rules for its type,
    /// or carries the wrong protocol version.
    #[error("invalid packet: {0}")]
    InvalidPacket(String),
}
