use std::fmt;
use std::str::FromStr;

use crate::MetricsError;

pub mod emitter;
pub mod formatter;
mod job;
pub mod macros;
pub mod transmitter;
pub mod writer;

/// Transport used to reach the collector.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum Protocol {
    /// One datagram per line, best effort.
    #[default]
    Udp,
    /// One stream write per flush; failed flushes are re-queued.
    Tcp,
}

impl Protocol {
    /// Returns the lowercase protocol name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Udp => "udp",
            Self::Tcp => "tcp",
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Protocol {
    type Err = MetricsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "udp" => Ok(Self::Udp),
            "tcp" => Ok(Self::Tcp),
            _ => Err(MetricsError::InvalidProtocol(s.to_string())),
        }
    }
}

/// Line terminator between buffered metrics.
pub(crate) const LINE_TERMINATOR: u8 = b'\n';
