//! Rendering of metric calls into StatsD wire lines.
//!
//! Every function here is pure: it only builds strings.

use std::borrow::Cow;
use std::time::Duration;

use itoa::Buffer;

/// Separator placed between the namespace prefix and the metric name.
pub const PREFIX_SEPARATOR: char = '.';

/// The StatsD type suffix of a line.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MetricType {
    /// `c`
    Count,
    /// `g`, an absolute gauge value.
    Gauge,
    /// `ig`, a relative adjustment of a gauge.
    GaugeDelta,
    /// `ms`
    Timing,
}

impl MetricType {
    /// Returns the wire suffix for this type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Count => "c",
            Self::Gauge => "g",
            Self::GaugeDelta => "ig",
            Self::Timing => "ms",
        }
    }
}

/// A numeric metric value.
///
/// Integers render as-is; floats always render with exactly three decimals.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum MetricValue {
    /// A signed integer value.
    Int(i64),
    /// A floating point value, rendered as `{:.3}`.
    Float(f64),
}

impl From<i64> for MetricValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for MetricValue {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<u32> for MetricValue {
    fn from(value: u32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<f64> for MetricValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<f32> for MetricValue {
    fn from(value: f32) -> Self {
        Self::Float(f64::from(value))
    }
}

/// Joins `prefix` and `name` with a dot, or returns `name` when there is no prefix.
#[must_use]
pub fn prefixed<'a>(prefix: &str, name: &'a str) -> Cow<'a, str> {
    if prefix.is_empty() {
        return Cow::Borrowed(name);
    }

    let mut out = String::with_capacity(prefix.len() + 1 + name.len());
    out.push_str(prefix);
    out.push(PREFIX_SEPARATOR);
    out.push_str(name);
    Cow::Owned(out)
}

/// Renders `<prefix>.<name>:<value>|<type>` without a line terminator.
#[must_use]
pub fn format_line(
    prefix: &str,
    name: &str,
    value: MetricValue,
    metric_type: MetricType,
) -> String {
    let full_name = prefixed(prefix, name);
    let mut line = String::with_capacity(full_name.len() + 24);
    line.push_str(&full_name);
    line.push(':');
    match value {
        MetricValue::Int(v) => line.push_str(Buffer::new().format(v)),
        MetricValue::Float(v) => {
            use std::fmt::Write;
            // writing into a String cannot fail
            let _ = write!(line, "{v:.3}");
        }
    }
    line.push('|');
    line.push_str(metric_type.as_str());
    line
}

/// `name:delta|c`
#[must_use]
pub fn count(prefix: &str, name: &str, delta: i64) -> String {
    format_line(prefix, name, MetricValue::Int(delta), MetricType::Count)
}

/// `count` with a negated delta.
#[must_use]
pub fn dec(prefix: &str, name: &str, delta: i64) -> String {
    count(prefix, name, delta.wrapping_neg())
}

/// `name:value|g`
#[must_use]
pub fn gauge(prefix: &str, name: &str, value: impl Into<MetricValue>) -> String {
    format_line(prefix, name, value.into(), MetricType::Gauge)
}

/// `name:delta|ig`
#[must_use]
pub fn inc_gauge(prefix: &str, name: &str, delta: i64) -> String {
    format_line(prefix, name, MetricValue::Int(delta), MetricType::GaugeDelta)
}

/// `name:value|ms`
#[must_use]
pub fn measure(prefix: &str, name: &str, value: impl Into<MetricValue>) -> String {
    format_line(prefix, name, value.into(), MetricType::Timing)
}

/// `name:<millis>|ms`, using [`duration_millis`].
#[must_use]
pub fn measure_duration(prefix: &str, name: &str, duration: Duration) -> String {
    measure(prefix, name, duration_millis(duration))
}

/// Converts a duration to whole milliseconds, truncating any sub-millisecond part.
///
/// Saturates at `i64::MAX`.
#[must_use]
pub fn duration_millis(duration: Duration) -> i64 {
    i64::try_from(duration.as_millis()).unwrap_or(i64::MAX)
}
