use statsd_emitter::{count, MetricEmitterTrait, Protocol, Transmitter, TransmitterOptions};
use std::net::UdpSocket;
use std::thread::JoinHandle;
use std::time::Duration;

// ============================================================================
// Helper functions
// ============================================================================

/// Binds a receiver on an ephemeral loopback port.
fn bind_receiver() -> (UdpSocket, String) {
    let socket = UdpSocket::bind("127.0.0.1:0").expect("couldn't bind to address");
    socket
        .set_read_timeout(Some(Duration::from_secs(2)))
        .expect("set_read_timeout failed");
    let address = socket.local_addr().unwrap().to_string();
    (socket, address)
}

/// Collects datagrams until `expected_count` arrive or the read times out.
fn spawn_udp_receiver(socket: UdpSocket, expected_count: usize) -> JoinHandle<Vec<String>> {
    std::thread::spawn(move || {
        let mut buf = [0; 10000];
        let mut received = Vec::<String>::new();
        while received.len() < expected_count {
            match socket.recv_from(&mut buf) {
                Ok((number_of_bytes, _)) => {
                    let text = String::from_utf8(buf[..number_of_bytes].to_vec()).unwrap();
                    received.push(text);
                }
                Err(_) => break,
            }
        }
        received
    })
}

fn create_transmitter(address: String, prefix: &str, flush_interval: Duration) -> Transmitter {
    let options = TransmitterOptions {
        address,
        prefix: prefix.to_string(),
        protocol: Protocol::Udp,
        flush_interval,
        ..Default::default()
    };
    Transmitter::new(options).unwrap()
}

// ============================================================================
// Wire format scenarios
// ============================================================================

#[test]
fn test_count() {
    let (socket, address) = bind_receiver();
    let receiver = spawn_udp_receiver(socket, 1);
    let transmitter = create_transmitter(address, "myapp", Duration::from_secs(3600));

    transmitter.count("customers.new", 3);
    transmitter.flush();

    assert_eq!(receiver.join().unwrap(), vec!["myapp.customers.new:3|c"]);
}

#[test]
fn test_inc_large_value() {
    let (socket, address) = bind_receiver();
    let receiver = spawn_udp_receiver(socket, 1);
    let transmitter = create_transmitter(address, "myapp", Duration::from_secs(3600));

    transmitter.inc("invoices.received", 3 << 30);
    transmitter.flush();

    assert_eq!(
        receiver.join().unwrap(),
        vec!["myapp.invoices.received:3221225472|c"]
    );
}

#[test]
fn test_dec() {
    let (socket, address) = bind_receiver();
    let receiver = spawn_udp_receiver(socket, 1);
    let transmitter = create_transmitter(address, "myapp", Duration::from_secs(3600));

    transmitter.dec("customers.maintained", 60);
    transmitter.flush();

    assert_eq!(
        receiver.join().unwrap(),
        vec!["myapp.customers.maintained:-60|c"]
    );
}

#[test]
fn test_gauge() {
    let (socket, address) = bind_receiver();
    let receiver = spawn_udp_receiver(socket, 1);
    let transmitter = create_transmitter(address, "myapp", Duration::from_secs(3600));

    transmitter.gauge("queue.default.depth", 342);
    transmitter.flush();

    assert_eq!(
        receiver.join().unwrap(),
        vec!["myapp.queue.default.depth:342|g"]
    );
}

#[test]
fn test_measure_and_timing() {
    let (socket, address) = bind_receiver();
    let receiver = spawn_udp_receiver(socket, 2);
    let transmitter = create_transmitter(address, "myapp", Duration::from_secs(3600));

    transmitter.measure("web.response.duration", 142);
    transmitter.timing("web.response.duration", 142);
    transmitter.flush();

    assert_eq!(
        receiver.join().unwrap(),
        vec![
            "myapp.web.response.duration:142|ms",
            "myapp.web.response.duration:142|ms"
        ]
    );
}

// ============================================================================
// Packetization
// ============================================================================

#[test]
fn test_each_line_is_its_own_datagram() {
    let (socket, address) = bind_receiver();
    let receiver = spawn_udp_receiver(socket, 4);
    let transmitter = create_transmitter(address, "", Duration::from_secs(3600));

    transmitter.count("a", 1);
    transmitter.gauge("b", 2);
    transmitter.measure_duration("c", Duration::from_secs(11));
    count!(transmitter, "d");
    transmitter.flush();

    assert_eq!(
        receiver.join().unwrap(),
        vec!["a:1|c", "b:2|g", "c:11000|ms", "d:1|c"]
    );
}

#[test]
fn test_timer_flush() {
    let (socket, address) = bind_receiver();
    let receiver = spawn_udp_receiver(socket, 1);
    let transmitter = create_transmitter(address, "myapp", Duration::from_millis(50));

    transmitter.count("timer.flushed", 1);

    assert_eq!(receiver.join().unwrap(), vec!["myapp.timer.flushed:1|c"]);
    assert_eq!(transmitter.pending_len(), 0);
}

#[test]
fn test_shutdown_flushes_pending_metrics() {
    let (socket, address) = bind_receiver();
    let receiver = spawn_udp_receiver(socket, 1);
    let transmitter = create_transmitter(address, "myapp", Duration::from_secs(3600));

    transmitter.count("on.shutdown", 1);
    transmitter.shutdown();

    assert_eq!(receiver.join().unwrap(), vec!["myapp.on.shutdown:1|c"]);
}

#[test]
fn test_unreachable_udp_collector_drops_snapshot() {
    let transmitter = create_transmitter(
        "missing-port".to_string(),
        "",
        Duration::from_secs(3600),
    );

    transmitter.count("lost", 1);
    transmitter.flush();

    assert_eq!(transmitter.pending_len(), 0);
}
