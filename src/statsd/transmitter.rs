use std::mem;
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use crossbeam::channel::{bounded, unbounded, Sender};
use parking_lot::{Mutex, RwLock};
use tracing::{debug, warn};

use super::emitter::MetricEmitterTrait;
use super::job::{run_job, Command, FlushJob};
use super::writer::DebugSink;
use super::{Protocol, LINE_TERMINATOR};
use crate::config::{parse_flush_interval, TransmitterOptions};
use crate::MetricResult;

/// Buffer contents and the debug flag, guarded by one lock so `submit`
/// decides its branch on a consistent view.
pub(crate) struct Pending {
    pub(crate) buffer: Vec<u8>,
    pub(crate) debug: bool,
}

pub(crate) struct Settings {
    pub(crate) protocol: Protocol,
    pub(crate) flush_interval: Duration,
}

pub(crate) struct TransmitterState {
    pub(crate) address: String,
    pub(crate) prefix: String,
    pub(crate) pending: Mutex<Pending>,
    pub(crate) settings: RwLock<Settings>,
}

impl TransmitterState {
    pub(crate) fn protocol(&self) -> Protocol {
        self.settings.read().protocol
    }

    pub(crate) fn flush_interval(&self) -> Duration {
        self.settings.read().flush_interval
    }

    /// Swaps the pending buffer for an empty one and returns the old contents.
    pub(crate) fn take_snapshot(&self) -> Vec<u8> {
        mem::take(&mut self.pending.lock().buffer)
    }

    /// Puts a failed snapshot back in front of everything appended since it was taken.
    pub(crate) fn requeue(&self, mut snapshot: Vec<u8>) {
        let mut pending = self.pending.lock();
        mem::swap(&mut pending.buffer, &mut snapshot);
        pending.buffer.extend_from_slice(&snapshot);
    }

    pub(crate) fn pending_len(&self) -> usize {
        self.pending.lock().buffer.len()
    }
}

/// Buffers rendered metric lines and flushes them to a StatsD collector
/// from a background thread.
///
/// `submit` only appends to an in-memory buffer; all network I/O happens on the
/// flush thread, which dials a fresh UDP or TCP connection every cycle. Failed
/// TCP flushes are re-queued for the next cycle, UDP losses are accepted.
///
/// This type is `Send + Sync` and can be shared across threads via `Arc<Transmitter>`.
/// Dropping it stops the flush thread after one final flush.
///
/// # Example
///
/// ```no_run
/// use statsd_emitter::{MetricEmitterTrait, Protocol, Transmitter, TransmitterOptions};
/// use std::time::Duration;
///
/// let options = TransmitterOptions {
///     address: "127.0.0.1:8125".to_string(),
///     prefix: "myapp".to_string(),
///     protocol: Protocol::Udp,
///     flush_interval: Duration::from_secs(1),
///     ..Default::default()
/// };
/// let transmitter = Transmitter::new(options)?;
///
/// transmitter.count("customers.new", 3);
/// transmitter.gauge("queue.default.depth", 342);
/// transmitter.measure("web.response.duration", 142);
///
/// transmitter.shutdown();
/// # Ok::<(), statsd_emitter::MetricsError>(())
/// ```
pub struct Transmitter {
    state: Arc<TransmitterState>,
    debug_sink: Box<dyn DebugSink>,
    sender: Option<Sender<Command>>,
    job_handle: Option<JoinHandle<()>>,
}

impl std::fmt::Debug for Transmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transmitter")
            .field("address", &self.state.address)
            .field("prefix", &self.state.prefix)
            .field("protocol", &self.protocol())
            .field("flush_interval", &self.flush_interval())
            .finish_non_exhaustive()
    }
}

impl Transmitter {
    /// Creates a transmitter and spawns its background flush thread.
    ///
    /// # Errors
    /// Returns [`crate::MetricsError::StdIo`] if the flush thread cannot be spawned.
    pub fn new(options: TransmitterOptions) -> MetricResult<Self> {
        let TransmitterOptions {
            address,
            prefix,
            protocol,
            mut flush_interval,
            debug,
            dialer,
            debug_sink,
        } = options;

        if flush_interval.is_zero() {
            let default = TransmitterOptions::default().flush_interval;
            warn!(?default, "Zero flush interval, using default");
            flush_interval = default;
        }

        let state = Arc::new(TransmitterState {
            address,
            prefix,
            pending: Mutex::new(Pending {
                buffer: Vec::new(),
                debug,
            }),
            settings: RwLock::new(Settings {
                protocol,
                flush_interval,
            }),
        });

        let (sender, receiver) = unbounded::<Command>();
        let job = FlushJob::new(state.clone(), dialer.into_dialer());
        let job_handle = std::thread::Builder::new()
            .name("statsd-flush".to_string())
            .spawn(move || run_job(&job, &receiver))?;

        debug!(address = %state.address, %protocol, ?flush_interval, "transmitter started");

        Ok(Self {
            state,
            debug_sink: debug_sink.into_sink(),
            sender: Some(sender),
            job_handle: Some(job_handle),
        })
    }

    /// Appends a rendered line to the pending buffer.
    ///
    /// In debug mode the line goes to the debug sink instead and is never sent.
    /// Never blocks on network I/O.
    pub fn submit(&self, line: &str) {
        {
            let mut pending = self.state.pending.lock();
            if !pending.debug {
                pending.buffer.reserve(line.len() + 1);
                pending.buffer.extend_from_slice(line.as_bytes());
                pending.buffer.push(LINE_TERMINATOR);
                return;
            }
        }
        self.debug_sink.emit(line);
    }

    /// Switches the transport used from the next flush cycle on.
    pub fn set_protocol(&self, protocol: Protocol) {
        self.state.settings.write().protocol = protocol;
    }

    /// Changes the flush interval. A zero interval is rejected and logged.
    ///
    /// The running wait is restarted with the new interval.
    pub fn set_flush_interval(&self, interval: Duration) {
        if interval.is_zero() {
            warn!("Ignoring zero flush interval");
            return;
        }
        self.state.settings.write().flush_interval = interval;
        if let Some(sender) = &self.sender {
            let _ = sender.send(Command::Reconfigure);
        }
    }

    /// Parses a `humantime` interval such as `"500ms"` or `"2s"` and applies it.
    ///
    /// Invalid input is logged and the current interval is kept.
    pub fn set_flush_interval_str(&self, interval: &str) {
        match parse_flush_interval(interval) {
            Ok(interval) => self.set_flush_interval(interval),
            Err(err) => warn!("Keeping flush interval: {err}"),
        }
    }

    /// Turns debug mode on or off.
    pub fn set_debug(&self, debug: bool) {
        self.state.pending.lock().debug = debug;
    }

    /// Returns the active protocol.
    #[must_use]
    pub fn protocol(&self) -> Protocol {
        self.state.protocol()
    }

    /// Returns the active flush interval.
    #[must_use]
    pub fn flush_interval(&self) -> Duration {
        self.state.flush_interval()
    }

    /// Returns whether debug mode is on.
    #[must_use]
    pub fn is_debug(&self) -> bool {
        self.state.pending.lock().debug
    }

    /// Returns the collector address.
    #[must_use]
    pub fn address(&self) -> &str {
        &self.state.address
    }

    /// Returns the namespace prefix.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.state.prefix
    }

    /// Returns the number of buffered bytes waiting for the next flush.
    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.state.pending_len()
    }

    /// Runs a flush cycle now and waits for it to finish.
    pub fn flush(&self) {
        let Some(sender) = &self.sender else {
            return;
        };
        let (ack_sender, ack_receiver) = bounded(1);
        if sender.send(Command::Flush(ack_sender)).is_ok() {
            // an error means the job is gone, nothing left to wait for
            let _ = ack_receiver.recv();
        }
    }

    /// Stops the flush thread after a final flush.
    ///
    /// Blocks until that flush finishes. No timeout is set on dialing or
    /// writing, so with TCP and an unreachable collector this can take as long
    /// as the OS connect timeout. Dropping the transmitter behaves the same.
    pub fn shutdown(self) {
        drop(self);
    }
}

impl MetricEmitterTrait for Transmitter {
    fn prefix(&self) -> &str {
        Self::prefix(self)
    }

    fn submit(&self, line: &str) {
        Self::submit(self, line);
    }
}

impl Drop for Transmitter {
    fn drop(&mut self) {
        // Closing the channel tells the job to run its last flush and exit.
        drop(self.sender.take());

        if let Some(handle) = self.job_handle.take() {
            let _ = handle.join();
        }
    }
}
