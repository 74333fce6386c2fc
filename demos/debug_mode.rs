//! Debug mode prints lines instead of sending them.
//!
//! Run with: `STATSD_PREFIX=myapp STATSD_DEBUG=1 cargo run --example debug_mode`

use statsd_emitter::{MetricEmitterTrait, Transmitter, TransmitterOptions};
use std::time::Duration;

fn main() -> Result<(), statsd_emitter::MetricsError> {
    tracing_subscriber::fmt().init();

    let transmitter = Transmitter::new(TransmitterOptions::from_env())?;
    transmitter.set_debug(true);

    // StatsD: myapp.customers.new:3|c
    transmitter.count("customers.new", 3);
    // StatsD: myapp.web.response.duration:142|ms
    transmitter.measure("web.response.duration", 142);
    transmitter.measure_duration("job.run", Duration::from_secs(11));

    transmitter.shutdown();
    Ok(())
}
