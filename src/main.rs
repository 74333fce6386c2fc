use statsd_emitter::{MetricEmitterTrait, Transmitter, TransmitterOptions};
use std::sync::Arc;
use std::thread;
use std::time::Instant;

const THREADS: usize = 8;
const ITERATIONS: usize = 1_000_000;

fn main() {
    let options = TransmitterOptions::from_env();
    println!(
        "sending to {} over {} every {:?}",
        options.address, options.protocol, options.flush_interval
    );

    let transmitter = match Transmitter::new(options) {
        Ok(transmitter) => Arc::new(transmitter),
        Err(err) => {
            eprintln!("failed to start transmitter: {err}");
            std::process::exit(1);
        }
    };

    let instant = Instant::now();
    let handles: Vec<_> = (0..THREADS)
        .map(|thread_id| {
            let transmitter = Arc::clone(&transmitter);
            thread::spawn(move || {
                let name = format!("load.thread{thread_id}.ops");
                for i in 0..ITERATIONS {
                    transmitter.count(&name, 1);
                    if i % 1000 == 0 {
                        transmitter.gauge("load.pending", i64::try_from(i).unwrap_or(i64::MAX));
                    }
                }
            })
        })
        .collect();

    for handle in handles {
        let _ = handle.join();
    }
    println!("submitted in {:?}ms", instant.elapsed().as_millis());

    if let Ok(transmitter) = Arc::try_unwrap(transmitter) {
        transmitter.shutdown();
    }
    println!("elapsed: {:?}ms", instant.elapsed().as_millis());
}
