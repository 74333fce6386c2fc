//! # statsd-emitter
//!
//! A buffered StatsD metrics emitter. Metric calls render text lines into an
//! in-memory buffer; a background thread flushes the buffer to the collector
//! over UDP or TCP on a fixed interval.
//!
//! ## Features
//!
//! - **Non-blocking producers**: `submit` only appends under a short lock, network I/O never touches callers
//! - **UDP**: one datagram per metric line, best effort
//! - **TCP**: one stream write per flush, failed flushes are re-queued ahead of newer data
//! - **Debug mode**: print lines instead of sending them
//! - **Metric Types**: Counters, Gauges (absolute and relative) and Timings
//!
//! ## Quick Start
//!
//! ```no_run
//! use statsd_emitter::{count, MetricEmitterTrait, Protocol, Transmitter, TransmitterOptions};
//! use std::time::Duration;
//!
//! let options = TransmitterOptions {
//!     address: "127.0.0.1:8125".to_string(),
//!     prefix: "myapp".to_string(),
//!     protocol: Protocol::Udp,
//!     flush_interval: Duration::from_secs(1),
//!     ..Default::default()
//! };
//! let transmitter = Transmitter::new(options)?;
//!
//! // myapp.customers.new:3|c
//! transmitter.count("customers.new", 3);
//! // myapp.queue.default.depth:342|g
//! transmitter.gauge("queue.default.depth", 342);
//! // myapp.web.response.duration:142|ms
//! transmitter.measure("web.response.duration", 142);
//! transmitter.measure_duration("job.run", Duration::from_millis(32));
//!
//! count!(transmitter, "heartbeat");
//!
//! // Shutdown flushes pending metrics before returning
//! transmitter.shutdown();
//! # Ok::<(), statsd_emitter::MetricsError>(())
//! ```

#![deny(unsafe_code)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![warn(clippy::missing_errors_doc)]
#![warn(clippy::missing_panics_doc)]
#![allow(clippy::module_name_repetitions)]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

// https://github.com/statsd/statsd/blob/master/docs/metric_types.md
pub mod config;
mod error;
mod statsd;

pub use config::{parse_flush_interval, TransmitterOptions};
pub use error::MetricsError;
pub use statsd::emitter::MetricEmitterTrait;
pub use statsd::formatter::{self, MetricType, MetricValue};
pub use statsd::transmitter::Transmitter;
pub use statsd::writer::{Connection, DebugSink, DebugSinkType, Dialer, DialerType, NetDialer};
pub use statsd::Protocol;

/// Result type for transmitter operations.
pub type MetricResult<T> = Result<T, MetricsError>;
