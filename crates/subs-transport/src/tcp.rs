//! TCP transport implementation over `std::net`.

use std::io::{Read, Write};
use std::net::{Shutdown, SocketAddr, TcpListener, TcpStream, ToSocketAddrs};
use std::time::Duration;

use crate::{Transport, TransportError};

/// The listening side of a two-peer game.
///
/// A host accepts exactly the peers it is asked for; the Subs protocol
/// only ever uses one.
pub struct TcpHost {
    listener: TcpListener,
}

impl TcpHost {
    /// Binds a listener to the given address.
    pub fn bind(addr: impl ToSocketAddrs) -> Result<Self, TransportError> {
        let listener =
            TcpListener::bind(addr).map_err(TransportError::AcceptFailed)?;
        if let Ok(local) = listener.local_addr() {
            tracing::info!(%local, "TCP transport listening");
        }
        Ok(Self { listener })
    }

    /// Returns the local address the listener is bound to.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Blocks until a peer connects.
    pub fn accept(&self) -> Result<TcpTransport, TransportError> {
        let (stream, addr) = self
            .listener
            .accept()
            .map_err(TransportError::AcceptFailed)?;
        tracing::debug!(%addr, "accepted TCP connection");
        Ok(TcpTransport { stream })
    }
}

/// A connected TCP byte stream.
#[derive(Debug)]
pub struct TcpTransport {
    stream: TcpStream,
}

impl TcpTransport {
    /// Connects to a listening peer.
    pub fn connect(addr: impl ToSocketAddrs) -> Result<Self, TransportError> {
        let stream =
            TcpStream::connect(addr).map_err(TransportError::ConnectFailed)?;
        if let Ok(peer) = stream.peer_addr() {
            tracing::info!(%peer, "connected over TCP");
        }
        Ok(Self { stream })
    }

    /// Listens on `addr` and blocks until one peer connects.
    pub fn listen(addr: impl ToSocketAddrs) -> Result<Self, TransportError> {
        TcpHost::bind(addr)?.accept()
    }

    /// Wraps an already connected stream.
    pub fn from_stream(stream: TcpStream) -> Self {
        Self { stream }
    }

    /// Returns the address of the remote peer.
    pub fn peer_addr(&self) -> std::io::Result<SocketAddr> {
        self.stream.peer_addr()
    }

    /// Returns the local address of this connection.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.stream.local_addr()
    }

    /// Sets socket-level read and write timeouts. `None` blocks forever.
    pub fn set_timeouts(
        &self,
        read: Option<Duration>,
        write: Option<Duration>,
    ) -> std::io::Result<()> {
        self.stream.set_read_timeout(read)?;
        self.stream.set_write_timeout(write)
    }

    /// Closes both halves of the connection.
    pub fn shutdown(&self) -> std::io::Result<()> {
        self.stream.shutdown(Shutdown::Both)
    }

    /// Returns the underlying stream.
    pub fn into_inner(self) -> TcpStream {
        self.stream
    }
}

impl Transport for TcpTransport {
    fn send(&mut self, data: &[u8]) -> Result<(), TransportError> {
        self.stream
            .write_all(data)
            .map_err(TransportError::SendFailed)?;
        tracing::trace!(len = data.len(), "sent bytes");
        Ok(())
    }

    fn recv(&mut self, max_len: usize) -> Result<Vec<u8>, TransportError> {
        let mut buf = vec![0u8; max_len];
        let n = self
            .stream
            .read(&mut buf)
            .map_err(TransportError::ReceiveFailed)?;
        if n == 0 {
            return Err(TransportError::ConnectionClosed);
        }
        buf.truncate(n);
        tracing::trace!(len = n, "received bytes");
        Ok(buf)
    }
}
