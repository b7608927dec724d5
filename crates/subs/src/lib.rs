//! # Subs
//!
//! The Subs protocol: a two-peer, turn-based, battleship-style game
//! protocol over a reliable byte stream.
//!
//! Peers exchange four kinds of packets (READY, ATTEMPT, ANSWER, ERROR).
//! A [`Stream`] binds a transport, a codec and a validator into a single
//! channel: invalid packets never leave, malformed or invalid packets are
//! never handed to the caller, and every failure comes back as a
//! [`SubsError`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use subs::prelude::*;
//!
//! # fn main() -> subs::Result<()> {
//! let config = StreamConfig::default();
//! let mut stream = Stream::connect(("127.0.0.1", DEFAULT_PORT), &config)?;
//!
//! stream.send(&Packet::ready(PROTOCOL_VERSION))?;
//! let reply = stream.receive_expecting(PacketType::Ready)?;
//! # let _ = reply;
//! # Ok(())
//! # }
//! ```

mod config;
mod error;
mod stream;

pub use config::{DEFAULT_PORT, DEFAULT_READ_SIZE, PROTOCOL_VERSION, StreamConfig};
pub use error::{Result, SubsError};
pub use stream::Stream;

pub use subs_protocol as protocol;
pub use subs_transport as transport;

/// Everything needed to open a stream and exchange packets.
pub mod prelude {
    pub use crate::{
        DEFAULT_PORT, PROTOCOL_VERSION, Stream, StreamConfig, SubsError,
    };
    pub use subs_protocol::{
        Packer, Packet, PacketType, ProtocolError, Status, TextPacker,
        Validator, VersionValidator,
    };
    #[cfg(feature = "tcp")]
    pub use subs_transport::{TcpHost, TcpTransport};
    pub use subs_transport::{Transport, TransportError};
}
