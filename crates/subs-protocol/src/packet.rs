//! Core packet types for the Subs protocol.
//!
//! A [`Packet`] is one message between the two peers: a protocol version,
//! a [`PacketType`], and depending on the type a [`Status`] and a pair of
//! board coordinates.
//!
//! ```text
//! READY    version
//! ATTEMPT  version  x  y
//! ANSWER   version  status(answer)  x  y
//! ERROR    version  status(error)
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ProtocolError;

// ---------------------------------------------------------------------------
// PacketType
// ---------------------------------------------------------------------------

/// The kind of a packet. The set is closed.
///
/// `#[serde(rename_all = "SCREAMING-KEBAB-CASE")]` makes the serde names
/// match the wire strings, so every codec agrees on them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING-KEBAB-CASE")]
pub enum PacketType {
    /// "I'm ready to play." Exchanged once before the first turn.
    Ready,
    /// "Is there a sub at (x, y)?"
    Attempt,
    /// The reply to an attempt, with the outcome as its status.
    Answer,
    /// Something went wrong; the status says what.
    Error,
}

impl PacketType {
    /// All packet types, in wire-declaration order.
    pub const ALL: [PacketType; 4] = [
        PacketType::Ready,
        PacketType::Attempt,
        PacketType::Answer,
        PacketType::Error,
    ];

    /// Returns the wire representation of this type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ready => "READY",
            Self::Attempt => "ATTEMPT",
            Self::Answer => "ANSWER",
            Self::Error => "ERROR",
        }
    }
}

impl fmt::Display for PacketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PacketType {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| {
                ProtocolError::Unpack(format!("unknown packet type {s:?}"))
            })
    }
}

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// The outcome carried by ANSWER and ERROR packets.
///
/// The first four variants belong to ANSWER packets, the last four to
/// ERROR packets. A status from the wrong group makes a packet invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING-KEBAB-CASE")]
pub enum Status {
    /// The attempt hit a sub.
    Correct,
    /// The attempt missed.
    Incorrect,
    /// The attempt sank a whole sub.
    FullSub,
    /// The attempt sank the last sub.
    Victory,
    /// The attempted coordinates are off the board.
    OutOfRange,
    /// The peer attempted while it was not its turn.
    AttemptNotInTurn,
    /// The sender is closing the session.
    Closed,
    /// The sender received something it could not use.
    Unexpected,
}

/// Statuses an ANSWER packet may carry.
pub const ANSWER_STATUSES: [Status; 4] = [
    Status::Correct,
    Status::Incorrect,
    Status::FullSub,
    Status::Victory,
];

/// Statuses an ERROR packet may carry.
pub const ERROR_STATUSES: [Status; 4] = [
    Status::OutOfRange,
    Status::AttemptNotInTurn,
    Status::Closed,
    Status::Unexpected,
];

impl Status {
    /// Returns the wire representation of this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Correct => "CORRECT",
            Self::Incorrect => "INCORRECT",
            Self::FullSub => "FULL-SUB",
            Self::Victory => "VICTORY",
            Self::OutOfRange => "OUT-OF-RANGE",
            Self::AttemptNotInTurn => "ATTEMPT-NOT-IN-TURN",
            Self::Closed => "CLOSED",
            Self::Unexpected => "UNEXPECTED",
        }
    }

    /// Returns `true` for statuses that belong on ANSWER packets.
    pub fn is_answer(&self) -> bool {
        ANSWER_STATUSES.contains(self)
    }

    /// Returns `true` for statuses that belong on ERROR packets.
    pub fn is_error(&self) -> bool {
        ERROR_STATUSES.contains(self)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ANSWER_STATUSES
            .into_iter()
            .chain(ERROR_STATUSES)
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ProtocolError::Unpack(format!("unknown status {s:?}")))
    }
}

// ---------------------------------------------------------------------------
// Packet
// ---------------------------------------------------------------------------

/// A single protocol message.
///
/// Fields are private: a packet is built once, by a factory or a codec,
/// and never changes afterwards. Optional fields are real `Option`s, so
/// "absent" and "zero" stay distinct all the way to the wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Packet {
    version: String,

    #[serde(rename = "type")]
    packet_type: PacketType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    status: Option<Status>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    x: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    y: Option<i64>,
}

impl Packet {
    /// Creates a READY packet.
    pub fn ready(version: impl Into<String>) -> Self {
        Self::from_parts(version, PacketType::Ready, None, None, None)
    }

    /// Creates an ATTEMPT packet for the point `(x, y)`.
    pub fn attempt(version: impl Into<String>, x: i64, y: i64) -> Self {
        Self::from_parts(version, PacketType::Attempt, None, Some(x), Some(y))
    }

    /// Creates an ANSWER packet reporting `status` for the point `(x, y)`.
    pub fn answer(
        version: impl Into<String>,
        status: Status,
        x: i64,
        y: i64,
    ) -> Self {
        Self::from_parts(
            version,
            PacketType::Answer,
            Some(status),
            Some(x),
            Some(y),
        )
    }

    /// Creates an ERROR packet.
    pub fn error(version: impl Into<String>, status: Status) -> Self {
        Self::from_parts(version, PacketType::Error, Some(status), None, None)
    }

    /// Creates a packet from raw field values.
    ///
    /// Used by codecs. No rules are checked here; the result may well be
    /// rejected by a validator.
    pub fn from_parts(
        version: impl Into<String>,
        packet_type: PacketType,
        status: Option<Status>,
        x: Option<i64>,
        y: Option<i64>,
    ) -> Self {
        Self {
            version: version.into(),
            packet_type,
            status,
            x,
            y,
        }
    }

    /// The protocol version tag.
    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn packet_type(&self) -> PacketType {
        self.packet_type
    }

    pub fn status(&self) -> Option<Status> {
        self.status
    }

    pub fn x(&self) -> Option<i64> {
        self.x
    }

    pub fn y(&self) -> Option<i64> {
        self.y
    }

    /// Returns both coordinates, or `None` if either is absent.
    pub fn coordinates(&self) -> Option<(i64, i64)> {
        self.x.zip(self.y)
    }

    /// Returns `true` if this packet ends the session: a winning answer or
    /// a close notice.
    pub fn is_terminating(&self) -> bool {
        matches!(
            (self.packet_type, self.status),
            (PacketType::Answer, Some(Status::Victory))
                | (PacketType::Error, Some(Status::Closed))
        )
    }
}

impl fmt::Display for Packet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} v{}", self.packet_type, self.version)?;
        if let Some(status) = self.status {
            write!(f, " {status}")?;
        }
        match (self.x, self.y) {
            (Some(x), Some(y)) => write!(f, " ({x}, {y})"),
            (Some(x), None) => write!(f, " (x={x})"),
            (None, Some(y)) => write!(f, " (y={y})"),
            (None, None) => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_packet_type_wire_strings() {
        let wire: Vec<&str> =
            PacketType::ALL.iter().map(PacketType::as_str).collect();
        assert_eq!(wire, ["READY", "ATTEMPT", "ANSWER", "ERROR"]);
    }

    #[test]
    fn test_packet_type_parse_is_case_sensitive() {
        assert_eq!("ANSWER".parse::<PacketType>(), Ok(PacketType::Answer));
        assert!(matches!(
            "answer".parse::<PacketType>(),
            Err(ProtocolError::Unpack(_))
        ));
        assert!("GARBAGE".parse::<PacketType>().is_err());
    }

    #[test]
    fn test_status_wire_strings_round_trip_through_from_str() {
        for status in ANSWER_STATUSES.into_iter().chain(ERROR_STATUSES) {
            assert_eq!(status.as_str().parse::<Status>(), Ok(status));
        }
        assert_eq!(Status::FullSub.to_string(), "FULL-SUB");
        assert_eq!(Status::AttemptNotInTurn.to_string(), "ATTEMPT-NOT-IN-TURN");
    }

    #[test]
    fn test_status_subsets_are_disjoint() {
        for status in ANSWER_STATUSES {
            assert!(status.is_answer());
            assert!(!status.is_error());
        }
        for status in ERROR_STATUSES {
            assert!(status.is_error());
            assert!(!status.is_answer());
        }
    }

    #[test]
    fn test_serde_names_match_wire_strings() {
        // Any serde-based codec must agree with the text codec.
        let json = serde_json::to_string(&Status::OutOfRange).unwrap();
        assert_eq!(json, "\"OUT-OF-RANGE\"");
        let json = serde_json::to_string(&PacketType::Attempt).unwrap();
        assert_eq!(json, "\"ATTEMPT\"");
    }

    #[test]
    fn test_factories_set_only_type_specific_fields() {
        let ready = Packet::ready("1.0");
        assert_eq!(ready.packet_type(), PacketType::Ready);
        assert_eq!(ready.status(), None);
        assert_eq!(ready.coordinates(), None);

        let attempt = Packet::attempt("1.0", 3, -4);
        assert_eq!(attempt.status(), None);
        assert_eq!(attempt.coordinates(), Some((3, -4)));

        let answer = Packet::answer("1.0", Status::Correct, 1, 2);
        assert_eq!(answer.status(), Some(Status::Correct));
        assert_eq!(answer.coordinates(), Some((1, 2)));

        let error = Packet::error("1.0", Status::Closed);
        assert_eq!(error.status(), Some(Status::Closed));
        assert_eq!(error.x(), None);
        assert_eq!(error.y(), None);
        assert_eq!(error.version(), "1.0");
    }

    #[test]
    fn test_is_terminating() {
        assert!(Packet::answer("1.0", Status::Victory, 0, 0).is_terminating());
        assert!(Packet::error("1.0", Status::Closed).is_terminating());
        assert!(!Packet::answer("1.0", Status::Correct, 0, 0).is_terminating());
        assert!(!Packet::error("1.0", Status::Unexpected).is_terminating());
        // A VICTORY status on the wrong type does not count.
        let odd = Packet::from_parts(
            "1.0",
            PacketType::Error,
            Some(Status::Victory),
            None,
            None,
        );
        assert!(!odd.is_terminating());
    }

    #[test]
    fn test_display() {
        assert_eq!(Packet::ready("1.0").to_string(), "READY v1.0");
        assert_eq!(
            Packet::answer("1.0", Status::Incorrect, 5, 6).to_string(),
            "ANSWER v1.0 INCORRECT (5, 6)"
        );
    }
}
