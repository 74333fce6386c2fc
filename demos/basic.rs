//! Basic usage of every metric type over UDP.
//!
//! Run with: `cargo run --example basic`

use statsd_emitter::{count, time, MetricEmitterTrait, Protocol, Transmitter, TransmitterOptions};
use std::time::Duration;

fn main() -> Result<(), statsd_emitter::MetricsError> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let options = TransmitterOptions {
        address: "127.0.0.1:8125".to_string(),
        prefix: "myapp".to_string(),
        protocol: Protocol::Udp,
        flush_interval: Duration::from_secs(1),
        ..Default::default()
    };
    let transmitter = Transmitter::new(options)?;

    // Counter
    transmitter.count("customers.new", 3);
    transmitter.dec("customers.maintained", 60);
    count!(transmitter, "heartbeat");

    // Gauges, absolute and relative
    transmitter.gauge("queue.default.depth", 342);
    transmitter.inc_gauge("workers.busy", 2);
    transmitter.fgauge("cpu.load", 0.75);

    // Timings
    transmitter.measure("web.response.duration", 142);
    transmitter.measure_duration("job.run", Duration::from_millis(32));
    let sum = time!(transmitter, "work.sum", { (0..1_000u64).sum::<u64>() });

    // Shutdown flushes pending metrics before exiting
    transmitter.shutdown();

    println!("All metric types recorded and flushed (sum = {sum}).");
    Ok(())
}
