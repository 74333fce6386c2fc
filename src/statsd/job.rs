use std::sync::Arc;

use crossbeam::channel::{after, Receiver, Sender};
use crossbeam::select;
use tracing::{debug, error, trace, warn};

use super::transmitter::TransmitterState;
use super::writer::{ConnectionGuard, Dialer};
use super::{Protocol, LINE_TERMINATOR};
use crate::{MetricResult, MetricsError};

pub(crate) enum Command {
    /// Flush now and acknowledge once done.
    Flush(Sender<()>),
    /// The flush interval changed; restart the wait.
    Reconfigure,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum FlushOutcome {
    Empty,
    Sent,
    Dropped,
    Requeued,
}

pub(crate) struct FlushJob {
    state: Arc<TransmitterState>,
    dialer: Box<dyn Dialer>,
}

impl FlushJob {
    pub(crate) fn new(state: Arc<TransmitterState>, dialer: Box<dyn Dialer>) -> Self {
        Self { state, dialer }
    }

    fn flush_cycle(&self) -> FlushOutcome {
        let snapshot = self.state.take_snapshot();
        if snapshot.is_empty() {
            return FlushOutcome::Empty;
        }
        self.push(snapshot)
    }

    fn push(&self, snapshot: Vec<u8>) -> FlushOutcome {
        match self.state.protocol() {
            Protocol::Udp => self.push_udp(&snapshot),
            Protocol::Tcp => self.push_tcp(snapshot),
        }
    }

    fn push_udp(&self, snapshot: &[u8]) -> FlushOutcome {
        let mut connection =
            match ConnectionGuard::open(self.dialer.as_ref(), Protocol::Udp, &self.state.address)
            {
                Ok(connection) => connection,
                Err(err) => {
                    error!(
                        error = %err,
                        bytes = snapshot.len(),
                        "Error dialing collector, dropping metrics"
                    );
                    return FlushOutcome::Dropped;
                }
            };

        let mut sent = 0usize;
        let mut failed = 0usize;
        for packet in snapshot
            .split(|b| *b == LINE_TERMINATOR)
            .filter(|packet| !packet.is_empty())
        {
            match connection.send(packet) {
                Ok(_) => sent += 1,
                Err(err) => {
                    warn!("UDP send error: {err}");
                    failed += 1;
                }
            }
        }

        debug!(sent, failed, "Finished sending packets.");
        FlushOutcome::Sent
    }

    fn push_tcp(&self, snapshot: Vec<u8>) -> FlushOutcome {
        match self.send_stream(&snapshot) {
            Ok(()) => {
                debug!(bytes = snapshot.len(), "Finished sending payload.");
                FlushOutcome::Sent
            }
            Err(err) => {
                error!(error = %err, bytes = snapshot.len(), "Error sending metrics, re-queuing");
                self.state.requeue(snapshot);
                FlushOutcome::Requeued
            }
        }
    }

    fn send_stream(&self, payload: &[u8]) -> MetricResult<()> {
        let mut connection =
            ConnectionGuard::open(self.dialer.as_ref(), Protocol::Tcp, &self.state.address)?;
        let written = connection.send(payload)?;
        if written != payload.len() {
            return Err(MetricsError::ShortWrite {
                written,
                expected: payload.len(),
            });
        }
        Ok(())
    }
}

/// Flush loop run on the background thread.
///
/// Waits for the flush interval or a command. When the command channel closes
/// the pending buffer is flushed one last time and the loop exits.
pub(crate) fn run_job(job: &FlushJob, receiver: &Receiver<Command>) {
    loop {
        let timeout = after(job.state.flush_interval());

        select! {
            recv(timeout) -> _ => {
                let outcome = job.flush_cycle();
                trace!(?outcome, "timed flush");
            },
            recv(receiver) -> command => match command {
                Ok(Command::Flush(ack)) => {
                    let outcome = job.flush_cycle();
                    trace!(?outcome, "requested flush");
                    let _ = ack.send(());
                }
                Ok(Command::Reconfigure) => {}
                Err(_) => {
                    if job.flush_cycle() == FlushOutcome::Requeued {
                        warn!(
                            bytes = job.state.pending_len(),
                            "Dropping unsent metrics on shutdown"
                        );
                    }
                    return;
                }
            },
        }
    }
}
