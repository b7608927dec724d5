//! Packer trait and implementations for encoding/decoding packets.
//!
//! A packer converts between a [`Packet`] and the bytes that travel on
//! the wire. The stream doesn't care how packets are encoded; it only
//! needs something that implements [`Packer`], so a new encoding can be
//! dropped in without touching the stream.
//!
//! We provide [`TextPacker`] (the line-oriented wire format every peer
//! speaks) and, behind the `json` feature, [`JsonPacker`].

use std::collections::HashMap;

use crate::{Packet, PacketType, ProtocolError, Status};

/// Encodes packets to bytes and decodes bytes back.
///
/// `pack` and `unpack` are inverses on every packet a factory can build.
pub trait Packer {
    /// Serializes a packet into bytes.
    ///
    /// # Errors
    /// Returns `ProtocolError::Pack` if the packet cannot be represented
    /// in this encoding.
    fn pack(&self, packet: &Packet) -> Result<Vec<u8>, ProtocolError>;

    /// Deserializes bytes back into a packet.
    ///
    /// No validation happens here beyond what is needed to build a
    /// well-typed [`Packet`].
    ///
    /// # Errors
    /// Returns `ProtocolError::Unpack` if the bytes are malformed, a
    /// required field is missing, or a value has the wrong type.
    fn unpack(&self, data: &[u8]) -> Result<Packet, ProtocolError>;
}

impl<P: Packer + ?Sized> Packer for &P {
    fn pack(&self, packet: &Packet) -> Result<Vec<u8>, ProtocolError> {
        (**self).pack(packet)
    }

    fn unpack(&self, data: &[u8]) -> Result<Packet, ProtocolError> {
        (**self).unpack(data)
    }
}

// ---------------------------------------------------------------------------
// TextPacker
// ---------------------------------------------------------------------------

pub const VERSION_FIELD: &str = "VERSION";
pub const TYPE_FIELD: &str = "TYPE";
pub const STATUS_FIELD: &str = "STATUS";
pub const X_FIELD: &str = "X-COOR";
pub const Y_FIELD: &str = "Y-COOR";

const FIELD_SEPARATOR: &str = ": ";
const LINE_SEPARATOR: char = '\n';

/// The textual wire format: one `NAME: value` line per field.
///
/// ```text
/// VERSION: 1.0
/// TYPE: ANSWER
/// STATUS: CORRECT
/// X-COOR: 1
/// Y-COOR: 2
/// ```
///
/// `VERSION` and `TYPE` are always written. `STATUS`, `X-COOR` and
/// `Y-COOR` are written only when present, always in that order. There is
/// no trailing newline.
///
/// Decoding accepts the lines in any order. Unknown field names are
/// ignored, and a repeated field keeps its last value.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextPacker;

impl TextPacker {
    fn parse_coordinate(
        fields: &HashMap<&str, &str>,
        name: &str,
    ) -> Result<Option<i64>, ProtocolError> {
        fields
            .get(name)
            .map(|raw| {
                raw.parse::<i64>().map_err(|e| {
                    ProtocolError::Unpack(format!("{name} {raw:?}: {e}"))
                })
            })
            .transpose()
    }
}

impl Packer for TextPacker {
    fn pack(&self, packet: &Packet) -> Result<Vec<u8>, ProtocolError> {
        let mut lines = vec![
            format!("{VERSION_FIELD}{FIELD_SEPARATOR}{}", packet.version()),
            format!("{TYPE_FIELD}{FIELD_SEPARATOR}{}", packet.packet_type()),
        ];
        if let Some(status) = packet.status() {
            lines.push(format!("{STATUS_FIELD}{FIELD_SEPARATOR}{status}"));
        }
        if let Some(x) = packet.x() {
            lines.push(format!("{X_FIELD}{FIELD_SEPARATOR}{x}"));
        }
        if let Some(y) = packet.y() {
            lines.push(format!("{Y_FIELD}{FIELD_SEPARATOR}{y}"));
        }
        Ok(lines.join("\n").into_bytes())
    }

    fn unpack(&self, data: &[u8]) -> Result<Packet, ProtocolError> {
        // Bytes -> &str. Anything that isn't UTF-8 can't be a text packet.
        let text = std::str::from_utf8(data).map_err(|e| {
            ProtocolError::Unpack(format!("packet is not UTF-8: {e}"))
        })?;

        // Every line must be a field. An empty line (including the one a
        // trailing newline leaves behind) has no separator and fails here.
        let mut fields = HashMap::new();
        for line in text.split(LINE_SEPARATOR) {
            // Only the first separator splits, so values may contain ": ".
            let (name, value) =
                line.split_once(FIELD_SEPARATOR).ok_or_else(|| {
                    ProtocolError::Unpack(format!(
                        "line {line:?} is not a `NAME: value` field"
                    ))
                })?;
            fields.insert(name, value);
        }

        // Required fields fail when missing; optional ones become `None`.
        let required = |name: &str| {
            fields.get(name).copied().ok_or_else(|| {
                ProtocolError::Unpack(format!("missing required field {name}"))
            })
        };
        let version = required(VERSION_FIELD)?;
        // `PacketType::from_str` already reports an unknown name as Unpack,
        // so `?` passes it through unchanged.
        let packet_type = required(TYPE_FIELD)?.parse::<PacketType>()?;

        // Option<Result<_>> -> Result<Option<_>>: a present but unknown
        // status is an error, a missing one is just `None`.
        let status = fields
            .get(STATUS_FIELD)
            .map(|raw| raw.parse::<Status>())
            .transpose()?;
        let x = Self::parse_coordinate(&fields, X_FIELD)?;
        let y = Self::parse_coordinate(&fields, Y_FIELD)?;

        Ok(Packet::from_parts(version, packet_type, status, x, y))
    }
}

// ---------------------------------------------------------------------------
// JsonPacker
// ---------------------------------------------------------------------------

/// A [`Packer`] that uses JSON (via `serde_json`).
///
/// Peers must agree on the encoding out of band; the standard wire format
/// is [`TextPacker`]. Absent optional fields are left out of the object:
///
/// ```rust
/// use subs_protocol::{JsonPacker, Packer, Packet};
///
/// let bytes = JsonPacker.pack(&Packet::attempt("1.0", 3, 4)).unwrap();
/// assert_eq!(bytes, br#"{"version":"1.0","type":"ATTEMPT","x":3,"y":4}"#);
/// assert_eq!(JsonPacker.unpack(&bytes).unwrap(), Packet::attempt("1.0", 3, 4));
/// ```
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonPacker;

#[cfg(feature = "json")]
impl Packer for JsonPacker {
    fn pack(&self, packet: &Packet) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec(packet).map_err(|e| ProtocolError::Pack(e.to_string()))
    }

    fn unpack(&self, data: &[u8]) -> Result<Packet, ProtocolError> {
        serde_json::from_slice(data)
            .map_err(|e| ProtocolError::Unpack(e.to_string()))
    }
}
