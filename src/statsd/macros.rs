/// Macro for incrementing a counter, by one or by an explicit delta.
///
/// # Examples
///
/// ```no_run
/// use statsd_emitter::{count, Transmitter, TransmitterOptions};
///
/// let transmitter = Transmitter::new(TransmitterOptions::default())?;
///
/// count!(transmitter, "requests.total");
/// count!(transmitter, "bytes.sent", 1024);
/// # Ok::<(), statsd_emitter::MetricsError>(())
/// ```
#[macro_export]
macro_rules! count {
    ($emitter:expr, $name:expr) => {{
        use $crate::MetricEmitterTrait as _;
        $emitter.count($name, 1)
    }};
    ($emitter:expr, $name:expr, $delta:expr) => {{
        use $crate::MetricEmitterTrait as _;
        $emitter.count($name, $delta)
    }};
}

/// Macro for timing a block and recording the elapsed whole milliseconds.
///
/// Evaluates to the value of the block.
///
/// # Examples
///
/// ```no_run
/// use statsd_emitter::{time, Transmitter, TransmitterOptions};
///
/// let transmitter = Transmitter::new(TransmitterOptions::default())?;
///
/// let rows = time!(transmitter, "db.query", {
///     // run the query
///     42
/// });
/// assert_eq!(rows, 42);
/// # Ok::<(), statsd_emitter::MetricsError>(())
/// ```
#[macro_export]
macro_rules! time {
    ($emitter:expr, $name:expr, $body:block) => {{
        use $crate::MetricEmitterTrait as _;
        let start = ::std::time::Instant::now();
        let result = $body;
        $emitter.measure_duration($name, start.elapsed());
        result
    }};
}
