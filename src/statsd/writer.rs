use std::io::{self, Write};
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr, TcpStream, ToSocketAddrs, UdpSocket};

use tracing::trace;

use super::Protocol;

/// A connection opened for one flush cycle.
///
/// Dropping the connection closes it.
pub trait Connection: Send {
    /// Sends `buf` as one datagram (UDP) or one stream write (TCP).
    ///
    /// Returns the number of bytes accepted.
    ///
    /// # Errors
    /// Returns the underlying I/O error.
    fn send(&mut self, buf: &[u8]) -> io::Result<usize>;
}

/// Opens connections to the collector.
///
/// Implement this trait to route flushed metrics somewhere other than a real socket.
pub trait Dialer: Send + Sync {
    /// Opens a fresh connection to `address` using `protocol`.
    ///
    /// # Errors
    /// Returns the I/O error that prevented the connection.
    fn dial(&self, protocol: Protocol, address: &str) -> io::Result<Box<dyn Connection>>;
}

/// Receives lines submitted while debug mode is on.
pub trait DebugSink: Send + Sync {
    /// Emits one rendered metric line.
    fn emit(&self, line: &str);
}

/// Selects the dialer used by the flush job.
#[derive(Default)]
pub enum DialerType {
    /// Real UDP/TCP sockets.
    #[default]
    Net,
    /// User-provided dialer.
    Custom(Box<dyn Dialer>),
}

impl std::fmt::Debug for DialerType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Net => write!(f, "Net"),
            Self::Custom(_) => write!(f, "Custom(...)"),
        }
    }
}

impl DialerType {
    pub(crate) fn into_dialer(self) -> Box<dyn Dialer> {
        match self {
            Self::Net => Box::new(NetDialer),
            Self::Custom(dialer) => dialer,
        }
    }
}

/// Selects where debug-mode lines go.
#[derive(Default)]
pub enum DebugSinkType {
    /// Prints `StatsD: <line>` to stdout.
    #[default]
    Stdout,
    /// User-provided sink.
    Custom(Box<dyn DebugSink>),
}

impl std::fmt::Debug for DebugSinkType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stdout => write!(f, "Stdout"),
            Self::Custom(_) => write!(f, "Custom(...)"),
        }
    }
}

impl DebugSinkType {
    pub(crate) fn into_sink(self) -> Box<dyn DebugSink> {
        match self {
            Self::Stdout => Box::new(StdoutSink),
            Self::Custom(sink) => sink,
        }
    }
}

struct StdoutSink;

impl DebugSink for StdoutSink {
    fn emit(&self, line: &str) {
        let _ = writeln!(io::stdout().lock(), "StatsD: {line}");
    }
}

/// Dials real sockets. A new socket is created for every call.
pub struct NetDialer;

impl Dialer for NetDialer {
    fn dial(&self, protocol: Protocol, address: &str) -> io::Result<Box<dyn Connection>> {
        match protocol {
            Protocol::Udp => {
                UdpConnection::connect(address).map(|c| Box::new(c) as Box<dyn Connection>)
            }
            Protocol::Tcp => TcpStream::connect(address)
                .map(|stream| Box::new(TcpConnection { stream }) as Box<dyn Connection>),
        }
    }
}

fn resolve(address: &str) -> io::Result<SocketAddr> {
    address.to_socket_addrs()?.next().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::AddrNotAvailable,
            format!("no address resolved for {address}"),
        )
    })
}

struct UdpConnection {
    sock: UdpSocket,
}

impl UdpConnection {
    fn connect(address: &str) -> io::Result<Self> {
        let destination = resolve(address)?;
        let bind_addr: SocketAddr = match destination {
            SocketAddr::V4(_) => (Ipv4Addr::UNSPECIFIED, 0).into(),
            SocketAddr::V6(_) => (Ipv6Addr::UNSPECIFIED, 0).into(),
        };
        let sock = UdpSocket::bind(bind_addr)?;
        sock.connect(destination)?;
        Ok(Self { sock })
    }
}

impl Connection for UdpConnection {
    fn send(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.sock.send(buf)
    }
}

struct TcpConnection {
    stream: TcpStream,
}

impl Connection for TcpConnection {
    fn send(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.stream.write_all(buf)?;
        self.stream.flush()?;
        Ok(buf.len())
    }
}

/// Owns the connection for the duration of one push.
pub(crate) struct ConnectionGuard {
    connection: Box<dyn Connection>,
    protocol: Protocol,
}

impl ConnectionGuard {
    pub(crate) fn open(
        dialer: &dyn Dialer,
        protocol: Protocol,
        address: &str,
    ) -> io::Result<Self> {
        let connection = dialer.dial(protocol, address)?;
        trace!(%protocol, address, "connection opened");
        Ok(Self {
            connection,
            protocol,
        })
    }

    pub(crate) fn send(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.connection.send(buf)
    }
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        trace!(protocol = %self.protocol, "connection closed");
    }
}
