//! TCP flushes that fail are kept and retried on the next cycle.
//!
//! Run with: `cargo run --example tcp_retry`, then start a collector, e.g.
//! `nc -lk 8125`, and watch the buffered lines arrive.

use statsd_emitter::{MetricEmitterTrait, Protocol, Transmitter, TransmitterOptions};
use std::time::Duration;

fn main() -> Result<(), statsd_emitter::MetricsError> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let options = TransmitterOptions {
        address: "127.0.0.1:8125".to_string(),
        prefix: "myapp".to_string(),
        protocol: Protocol::Tcp,
        flush_interval: Duration::from_millis(500),
        ..Default::default()
    };
    let transmitter = Transmitter::new(options)?;

    for i in 0..20 {
        transmitter.count("requests", 1);
        transmitter.gauge("iteration", i);
        std::thread::sleep(Duration::from_millis(250));
        println!("pending bytes: {}", transmitter.pending_len());
    }

    transmitter.shutdown();
    Ok(())
}
