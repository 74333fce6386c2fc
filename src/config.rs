//! Transmitter configuration.
//!
//! [`TransmitterOptions`] is passed explicitly to [`crate::Transmitter::new`].
//! It can also be filled from environment-style keys:
//!
//! | Key | Meaning | Default |
//! |-----|---------|---------|
//! | `STATSD_ADDR` | collector `host:port` | `127.0.0.1:8125` |
//! | `STATSD_PREFIX` | namespace prefix | none |
//! | `STATSD_PROTOCOL` | `udp` or `tcp` | `udp` |
//! | `STATSD_FLUSH_INTERVAL` | `humantime` duration, e.g. `500ms` | `1s` |
//! | `STATSD_DEBUG` | `1`/`true` to print instead of send | off |

use std::time::Duration;

use tracing::warn;

use crate::statsd::writer::{DebugSinkType, DialerType};
use crate::{MetricResult, MetricsError, Protocol};

/// Default collector address.
pub const DEFAULT_ADDRESS: &str = "127.0.0.1:8125";
/// Default flush interval.
pub const DEFAULT_FLUSH_INTERVAL: Duration = Duration::from_secs(1);

/// Environment key for the collector address.
pub const ENV_ADDRESS: &str = "STATSD_ADDR";
/// Environment key for the namespace prefix.
pub const ENV_PREFIX: &str = "STATSD_PREFIX";
/// Environment key for the protocol.
pub const ENV_PROTOCOL: &str = "STATSD_PROTOCOL";
/// Environment key for the flush interval.
pub const ENV_FLUSH_INTERVAL: &str = "STATSD_FLUSH_INTERVAL";
/// Environment key for debug mode.
pub const ENV_DEBUG: &str = "STATSD_DEBUG";

/// Configuration options for a transmitter.
#[derive(Debug)]
pub struct TransmitterOptions {
    /// Collector address as `host:port`. Resolved on every flush.
    pub address: String,
    /// Namespace prefix joined to every name with a dot. Empty for none.
    pub prefix: String,
    /// Transport used for flushes.
    pub protocol: Protocol,
    /// Time between flush cycles. Must be non-zero.
    pub flush_interval: Duration,
    /// Write lines to the debug sink instead of buffering them.
    pub debug: bool,
    /// How connections are opened.
    pub dialer: DialerType,
    /// Where lines go in debug mode.
    pub debug_sink: DebugSinkType,
}

impl Default for TransmitterOptions {
    fn default() -> Self {
        Self {
            address: DEFAULT_ADDRESS.to_string(),
            prefix: String::new(),
            protocol: Protocol::Udp,
            flush_interval: DEFAULT_FLUSH_INTERVAL,
            debug: false,
            dialer: DialerType::Net,
            debug_sink: DebugSinkType::Stdout,
        }
    }
}

impl TransmitterOptions {
    /// Builds options from the process environment.
    ///
    /// Invalid values are logged and replaced by their defaults.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds options from an arbitrary key lookup, using the `STATSD_*` keys.
    ///
    /// Invalid values are logged and replaced by their defaults.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut options = Self::default();

        if let Some(address) = lookup(ENV_ADDRESS).filter(|v| !v.trim().is_empty()) {
            options.address = address.trim().to_string();
        }

        if let Some(prefix) = lookup(ENV_PREFIX) {
            options.prefix = prefix.trim().to_string();
        }

        if let Some(protocol) = lookup(ENV_PROTOCOL) {
            match protocol.parse() {
                Ok(protocol) => options.protocol = protocol,
                Err(err) => warn!("{ENV_PROTOCOL}: {err}, using {}", options.protocol),
            }
        }

        if let Some(interval) = lookup(ENV_FLUSH_INTERVAL) {
            match parse_flush_interval(&interval) {
                Ok(interval) => options.flush_interval = interval,
                Err(err) => warn!(
                    "{ENV_FLUSH_INTERVAL}: {err}, using {:?}",
                    options.flush_interval
                ),
            }
        }

        if let Some(raw) = lookup(ENV_DEBUG) {
            match parse_bool(&raw) {
                Some(enabled) => options.debug = enabled,
                None => warn!("{ENV_DEBUG}: invalid boolean {raw:?}, debug stays off"),
            }
        }

        options
    }
}

/// Parses a non-zero `humantime` duration such as `"500ms"`, `"2s"` or `"1m 30s"`.
///
/// # Errors
/// Returns [`MetricsError::InvalidFlushInterval`] for empty, unparsable or zero input.
pub fn parse_flush_interval(s: &str) -> MetricResult<Duration> {
    let s = s.trim();
    if s.is_empty() {
        return Err(MetricsError::InvalidFlushInterval(
            "duration string is empty".to_string(),
        ));
    }
    let interval = humantime::parse_duration(s)
        .map_err(|e| MetricsError::InvalidFlushInterval(format!("{s:?}: {e}")))?;
    if interval.is_zero() {
        return Err(MetricsError::InvalidFlushInterval(format!(
            "{s:?}: must be greater than zero"
        )));
    }
    Ok(interval)
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
