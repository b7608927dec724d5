//! Packet validation rules.
//!
//! A validator is a pure predicate: it looks at a packet and says yes or
//! no. The stream calls it on every outgoing packet before encoding and on
//! every incoming packet after decoding.

use crate::{Packet, PacketType};

/// Decides whether a packet may be sent or accepted.
///
/// Implementations carry their own configuration (such as the expected
/// protocol version) and must not have side effects.
pub trait Validator {
    /// Returns `true` if `packet` is valid.
    fn is_valid(&self, packet: &Packet) -> bool;
}

impl<V: Validator + ?Sized> Validator for &V {
    fn is_valid(&self, packet: &Packet) -> bool {
        (**self).is_valid(packet)
    }
}

/// The standard rule set, bound to one expected protocol version.
///
/// ## Rules
///
/// | type    | requires                          |
/// |---------|-----------------------------------|
/// | READY   | nothing                           |
/// | ATTEMPT | `x` and `y`                       |
/// | ANSWER  | `x`, `y` and an answer status     |
/// | ERROR   | an error status                   |
///
/// A version mismatch fails every packet. Coordinates are not range
/// checked; that belongs to the game. ERROR packets are not checked for
/// stray coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionValidator {
    version: String,
}

impl VersionValidator {
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
        }
    }

    /// The protocol version this validator accepts.
    pub fn version(&self) -> &str {
        &self.version
    }
}

impl Validator for VersionValidator {
    fn is_valid(&self, packet: &Packet) -> bool {
        is_valid(packet, &self.version)
    }
}

/// Checks `packet` against the standard rules for `expected_version`.
pub fn is_valid(packet: &Packet, expected_version: &str) -> bool {
    if packet.version() != expected_version {
        return false;
    }

    let has_coordinates = packet.coordinates().is_some();
    match packet.packet_type() {
        PacketType::Ready => true,
        PacketType::Attempt => has_coordinates,
        PacketType::Answer => {
            has_coordinates && packet.status().is_some_and(|s| s.is_answer())
        }
        PacketType::Error => packet.status().is_some_and(|s| s.is_error()),
    }
}
