use std::time::Duration;

use super::formatter;

/// Trait defining the metric calls an application makes.
///
/// Implementors only provide [`prefix`](Self::prefix) and [`submit`](Self::submit);
/// every metric method renders its line with [`formatter`] and submits it.
pub trait MetricEmitterTrait {
    /// Namespace prefix applied to every metric name. Empty for none.
    fn prefix(&self) -> &str;

    /// Hands a rendered line to the transport.
    fn submit(&self, line: &str);

    /// Adds `delta` to a counter. Negative deltas decrement.
    fn count(&self, name: &str, delta: i64) {
        self.submit(&formatter::count(self.prefix(), name, delta));
    }

    /// Same as [`count`](Self::count).
    fn inc(&self, name: &str, delta: i64) {
        self.count(name, delta);
    }

    /// Subtracts `delta` from a counter.
    fn dec(&self, name: &str, delta: i64) {
        self.submit(&formatter::dec(self.prefix(), name, delta));
    }

    /// Sets a gauge to an absolute value.
    fn gauge(&self, name: &str, value: i64) {
        self.submit(&formatter::gauge(self.prefix(), name, value));
    }

    /// Sets a gauge to an absolute float value, rendered with three decimals.
    fn fgauge(&self, name: &str, value: f64) {
        self.submit(&formatter::gauge(self.prefix(), name, value));
    }

    /// Adjusts a gauge relative to its current value (`ig`).
    fn inc_gauge(&self, name: &str, delta: i64) {
        self.submit(&formatter::inc_gauge(self.prefix(), name, delta));
    }

    /// Records a timing in milliseconds.
    fn measure(&self, name: &str, value: i64) {
        self.submit(&formatter::measure(self.prefix(), name, value));
    }

    /// Same as [`measure`](Self::measure).
    fn timing(&self, name: &str, value: i64) {
        self.measure(name, value);
    }

    /// Records a float timing in milliseconds, rendered with three decimals.
    fn fmeasure(&self, name: &str, value: f64) {
        self.submit(&formatter::measure(self.prefix(), name, value));
    }

    /// Records a duration as whole milliseconds.
    fn measure_duration(&self, name: &str, duration: Duration) {
        self.submit(&formatter::measure_duration(self.prefix(), name, duration));
    }
}
