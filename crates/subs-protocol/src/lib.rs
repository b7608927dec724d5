//! Wire protocol for Subs.
//!
//! This crate defines the "language" the two peers speak:
//!
//! - **Packets** ([`Packet`], [`PacketType`], [`Status`]): the messages
//!   that travel on the wire.
//! - **Validation** ([`Validator`] trait, [`VersionValidator`]): which
//!   field combinations each packet type allows.
//! - **Codecs** ([`Packer`] trait, [`TextPacker`], [`JsonPacker`]): how
//!   packets are converted to/from bytes.
//! - **Errors** ([`ProtocolError`]): what can go wrong along the way.
//!
//! # Architecture
//!
//! The protocol layer does no I/O. It sits between the transport (raw
//! bytes) and the stream, which composes everything:
//!
//! ```text
//! Transport (bytes) → Packer (Packet) → Validator (valid Packet)
//! ```

mod codec;
mod error;
mod packet;
mod validator;

pub use codec::{Packer, TextPacker};
pub use codec::{STATUS_FIELD, TYPE_FIELD, VERSION_FIELD, X_FIELD, Y_FIELD};
#[cfg(feature = "json")]
pub use codec::JsonPacker;
pub use error::ProtocolError;
pub use packet::{ANSWER_STATUSES, ERROR_STATUSES, Packet, PacketType, Status};
pub use validator::{Validator, VersionValidator, is_valid};
