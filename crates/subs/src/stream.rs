//! The packet stream: transport + packer + validator.
//!
//! This is the one place where the layers meet. Callers get two
//! operations, [`Stream::send`] and [`Stream::receive`], with the same
//! error semantics whatever encoding or transport sits underneath.
//!
//! ```text
//! send:    Packet → validate → pack → transport.send
//! receive: transport.recv → unpack → validate → Packet
//! ```

use subs_protocol::{
    Packer, Packet, PacketType, ProtocolError, TextPacker, Validator,
    VersionValidator,
};
use subs_transport::Transport;

use crate::config::{DEFAULT_READ_SIZE, StreamConfig};
use crate::Result;

/// A reliable, validated packet channel over one connection.
///
/// Every call does exactly one blocking transport operation. Nothing is
/// retried and nothing is queued; every failure goes straight back to the
/// caller. The stream does not enforce turn order, that is up to the
/// caller.
///
/// After a transport error the connection state is undefined and the
/// stream should be dropped.
pub struct Stream<T, P = TextPacker, V = VersionValidator> {
    transport: T,
    packer: P,
    validator: V,
    read_size: usize,
}

impl<T, P, V> Stream<T, P, V>
where
    T: Transport,
    P: Packer,
    V: Validator,
{
    /// Creates a stream that reads up to [`DEFAULT_READ_SIZE`] bytes per
    /// packet.
    pub fn new(transport: T, packer: P, validator: V) -> Self {
        Self {
            transport,
            packer,
            validator,
            read_size: DEFAULT_READ_SIZE,
        }
    }

    /// Creates a stream using the read size from `config`.
    ///
    /// The validator is passed separately so callers can use their own
    /// rules; [`StreamConfig::validator`] builds the standard one.
    pub fn with_config(
        transport: T,
        packer: P,
        validator: V,
        config: &StreamConfig,
    ) -> Self {
        Self {
            read_size: config.read_size.max(1),
            ..Self::new(transport, packer, validator)
        }
    }

    /// Sends one packet.
    ///
    /// An invalid packet never reaches the packer or the wire.
    ///
    /// # Errors
    /// - `ProtocolError::InvalidPacket` if the validator rejects `packet`
    /// - `ProtocolError::Pack` if the packer fails
    /// - any [`TransportError`](subs_transport::TransportError) from the write
    pub fn send(&mut self, packet: &Packet) -> Result<()> {
        if !self.validator.is_valid(packet) {
            tracing::warn!(%packet, "refusing to send invalid packet");
            return Err(ProtocolError::InvalidPacket(format!(
                "refusing to send {packet}"
            ))
            .into());
        }

        // `?` lifts ProtocolError::Pack and TransportError into SubsError
        // through their `#[from]` conversions.
        let data = self.packer.pack(packet)?;
        self.transport.send(&data)?;
        tracing::debug!(%packet, len = data.len(), "sent packet");
        Ok(())
    }

    /// Receives one packet.
    ///
    /// Reads once from the transport and treats the bytes as exactly one
    /// packet; there is no reassembly across reads.
    ///
    /// # Errors
    /// - any [`TransportError`](subs_transport::TransportError) from the read
    /// - `ProtocolError::Unpack` if the bytes don't decode (the validator
    ///   is not consulted)
    /// - `ProtocolError::InvalidPacket` if the decoded packet is rejected
    pub fn receive(&mut self) -> Result<Packet> {
        // A closed peer surfaces here as TransportError::ConnectionClosed.
        let data = self.transport.recv(self.read_size)?;
        // Malformed bytes stop here; the validator only sees decoded packets.
        let packet = self.packer.unpack(&data).inspect_err(|e| {
            tracing::warn!(error = %e, len = data.len(), "could not unpack packet");
        })?;

        if !self.validator.is_valid(&packet) {
            tracing::warn!(%packet, "received invalid packet");
            return Err(ProtocolError::InvalidPacket(format!(
                "received {packet}"
            ))
            .into());
        }

        tracing::debug!(%packet, "received packet");
        Ok(packet)
    }

    /// Receives one packet and checks that it has the wanted type.
    ///
    /// ERROR packets and terminating packets are always returned, since
    /// the caller must react to them whatever it was waiting for. Any
    /// other type mismatch fails with `ProtocolError::InvalidPacket`.
    /// Nothing is sent to the peer; replying is the caller's call.
    pub fn receive_expecting(&mut self, wanted: PacketType) -> Result<Packet> {
        let packet = self.receive()?;
        let kind = packet.packet_type();
        // ERROR packets pass through so the caller can tell a complaint
        // (UNEXPECTED, OUT-OF-RANGE) from a close.
        if kind == wanted || kind == PacketType::Error || packet.is_terminating()
        {
            return Ok(packet);
        }

        tracing::warn!(%packet, expected = %wanted, "unexpected packet type");
        Err(ProtocolError::InvalidPacket(format!(
            "expected {wanted}, received {kind}"
        ))
        .into())
    }

    /// Maximum bytes taken from the transport per receive.
    pub fn read_size(&self) -> usize {
        self.read_size
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Takes the stream apart.
    pub fn into_inner(self) -> (T, P, V) {
        (self.transport, self.packer, self.validator)
    }
}

#[cfg(feature = "tcp")]
mod tcp {
    use std::net::ToSocketAddrs;

    use subs_protocol::{TextPacker, VersionValidator};
    use subs_transport::TcpTransport;

    use super::Stream;
    use crate::{Result, StreamConfig};

    impl Stream<TcpTransport, TextPacker, VersionValidator> {
        /// Connects to a hosting peer and speaks the text wire format.
        pub fn connect(
            addr: impl ToSocketAddrs,
            config: &StreamConfig,
        ) -> Result<Self> {
            let transport = TcpTransport::connect(addr)?;
            Ok(Self::with_config(
                transport,
                TextPacker,
                config.validator(),
                config,
            ))
        }

        /// Listens on `addr`, waits for one peer, and speaks the text wire
        /// format.
        pub fn host(addr: impl ToSocketAddrs, config: &StreamConfig) -> Result<Self> {
            let transport = TcpTransport::listen(addr)?;
            Ok(Self::with_config(
                transport,
                TextPacker,
                config.validator(),
                config,
            ))
        }
    }
}
