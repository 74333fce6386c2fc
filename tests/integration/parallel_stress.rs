use statsd_emitter::{
    Connection, Dialer, DialerType, MetricEmitterTrait, Protocol, Transmitter, TransmitterOptions,
};
use std::collections::HashMap;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

/// Records every payload; fails TCP writes while `fail` is set.
#[derive(Default)]
struct Sink {
    payloads: Mutex<Vec<Vec<u8>>>,
    fail: AtomicBool,
}

struct SinkDialer(Arc<Sink>);
struct SinkConnection(Arc<Sink>);

impl Dialer for SinkDialer {
    fn dial(&self, _protocol: Protocol, _address: &str) -> io::Result<Box<dyn Connection>> {
        Ok(Box::new(SinkConnection(self.0.clone())))
    }
}

impl Connection for SinkConnection {
    fn send(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.0.fail.load(Ordering::SeqCst) {
            return Err(io::Error::new(io::ErrorKind::ConnectionReset, "simulated"));
        }
        self.0.payloads.lock().unwrap().push(buf.to_vec());
        Ok(buf.len())
    }
}

fn create_test_transmitter(sink: Arc<Sink>, protocol: Protocol) -> Transmitter {
    let options = TransmitterOptions {
        protocol,
        flush_interval: Duration::from_millis(5),
        dialer: DialerType::Custom(Box::new(SinkDialer(sink))),
        ..Default::default()
    };
    Transmitter::new(options).unwrap()
}

fn lines(sink: &Sink) -> Vec<String> {
    sink.payloads
        .lock()
        .unwrap()
        .iter()
        .flat_map(|p| {
            String::from_utf8(p.clone())
                .unwrap()
                .lines()
                .map(str::to_string)
                .collect::<Vec<_>>()
        })
        .collect()
}

#[test]
fn test_parallel_submit_loses_nothing_over_tcp() {
    let sink = Arc::new(Sink::default());
    let transmitter = Arc::new(create_test_transmitter(sink.clone(), Protocol::Tcp));
    let num_threads = 8;
    let iterations_per_thread = 5_000;

    let handles: Vec<_> = (0..num_threads)
        .map(|thread_id| {
            let transmitter = Arc::clone(&transmitter);
            let sink = sink.clone();
            thread::spawn(move || {
                for i in 0..iterations_per_thread {
                    // flip failures on and off while producers run
                    if thread_id == 0 && i % 500 == 0 {
                        sink.fail.store((i / 500) % 2 == 0, Ordering::SeqCst);
                    }
                    transmitter.count(&format!("thread{thread_id}"), i);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("Thread panicked");
    }

    sink.fail.store(false, Ordering::SeqCst);
    transmitter.flush();
    assert_eq!(transmitter.pending_len(), 0);

    let received = lines(&sink);
    assert_eq!(received.len(), num_threads * iterations_per_thread as usize);

    // per producer, lines keep their submission order
    let mut per_thread: HashMap<String, Vec<i64>> = HashMap::new();
    for line in received {
        let (name, rest) = line.split_once(':').unwrap();
        let value: i64 = rest.trim_end_matches("|c").parse().unwrap();
        per_thread.entry(name.to_string()).or_default().push(value);
    }
    assert_eq!(per_thread.len(), num_threads);
    for values in per_thread.values() {
        let expected: Vec<i64> = (0..iterations_per_thread).collect();
        assert_eq!(values, &expected);
    }
}

#[test]
fn test_parallel_submit_over_udp() {
    let sink = Arc::new(Sink::default());
    let transmitter = Arc::new(create_test_transmitter(sink.clone(), Protocol::Udp));

    let handles: Vec<_> = (0..4)
        .map(|thread_id| {
            let transmitter = Arc::clone(&transmitter);
            thread::spawn(move || {
                for i in 0..1_000 {
                    transmitter.gauge(&format!("udp.thread{thread_id}"), i);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("Thread panicked");
    }
    transmitter.flush();

    let payloads = sink.payloads.lock().unwrap();
    assert_eq!(payloads.len(), 4_000);
    assert!(payloads.iter().all(|p| !p.contains(&b'\n')));
}
