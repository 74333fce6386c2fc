use thiserror::Error;

/// Errors that can occur while configuring a transmitter or pushing metrics.
#[derive(Error, Debug)]
pub enum MetricsError {
    /// A custom error with a free-form message.
    #[error("Custom error: {0}")]
    Custom(String),

    /// An I/O error from the standard library.
    #[error("Std Io error: {0}")]
    StdIo(#[from] std::io::Error),

    /// The connection accepted fewer bytes than the payload held.
    #[error("Short write: {written} of {expected} bytes")]
    ShortWrite {
        /// Bytes reported as written.
        written: usize,
        /// Bytes in the payload.
        expected: usize,
    },

    /// The protocol name is neither `udp` nor `tcp`.
    #[error("Invalid protocol: {0}")]
    InvalidProtocol(String),

    /// The flush interval could not be parsed or is zero.
    #[error("Invalid flush interval: {0}")]
    InvalidFlushInterval(String),
}

impl From<String> for MetricsError {
    fn from(value: String) -> Self {
        Self::Custom(value)
    }
}

impl From<&str> for MetricsError {
    fn from(value: &str) -> Self {
        Self::Custom(value.to_string())
    }
}
