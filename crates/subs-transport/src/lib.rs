//! Transport abstraction layer for the Subs protocol.
//!
//! Provides the [`Transport`] trait: a connected, reliable byte stream
//! with blocking `send`/`recv`. The protocol layer above never touches
//! sockets directly, so tests can swap in an in-memory transport.
//!
//! # Feature Flags
//!
//! - `tcp` (default): [`TcpTransport`] over `std::net::TcpStream`

mod error;
#[cfg(feature = "tcp")]
mod tcp;

pub use error::TransportError;
#[cfg(feature = "tcp")]
pub use tcp::{TcpHost, TcpTransport};

/// A single connection that can send and receive bytes.
///
/// Every call performs exactly one blocking operation and returns or
/// fails before the caller proceeds. There are no internal queues, retries
/// or timeouts at this level; implementations inherit whatever blocking
/// behavior their underlying connection has.
pub trait Transport {
    /// Writes all of `data` to the remote peer.
    fn send(&mut self, data: &[u8]) -> Result<(), TransportError>;

    /// Performs one read of at most `max_len` bytes.
    ///
    /// Returns `Err(TransportError::ConnectionClosed)` when the peer has
    /// closed the connection, so an empty buffer is never returned.
    fn recv(&mut self, max_len: usize) -> Result<Vec<u8>, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn send(&mut self, data: &[u8]) -> Result<(), TransportError> {
        (**self).send(data)
    }

    fn recv(&mut self, max_len: usize) -> Result<Vec<u8>, TransportError> {
        (**self).recv(max_len)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn send(&mut self, data: &[u8]) -> Result<(), TransportError> {
        (**self).send(data)
    }

    fn recv(&mut self, max_len: usize) -> Result<Vec<u8>, TransportError> {
        (**self).recv(max_len)
    }
}
