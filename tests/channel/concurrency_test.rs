/*!
 * Channel Concurrency Tests
 * Blocking hand-off, close-driven wakeups and multi-producer/consumer delivery
 */

use std::collections::HashSet;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use stratum_channel::{Channel, ChannelError, ChannelReader, ChannelWriter, Timeout};

/// Poll until `pred` holds, failing the test after a generous bound
fn wait_until(pred: impl Fn() -> bool) {
    let start = Instant::now();
    while !pred() {
        assert!(start.elapsed() < Duration::from_secs(5), "condition never became true");
        thread::sleep(Duration::from_millis(1));
    }
}

#[test]
fn test_close_unblocks_writer_and_reader() {
    let full = Channel::<u32>::create(1);
    let empty = Channel::<u32>::create(1);

    let writer = ChannelWriter::create(&full).unwrap();
    writer.try_write(0).unwrap();
    let reader = ChannelReader::create(&empty).unwrap();

    let blocked_writer = thread::spawn(move || writer.write(1, Timeout::Infinite));
    let blocked_reader = thread::spawn(move || reader.read(Timeout::Infinite));

    wait_until(|| full.stats().waiting_writers == 1 && empty.stats().waiting_readers == 1);

    let start = Instant::now();
    assert!(full.close());
    assert!(empty.close());

    assert_eq!(blocked_writer.join().unwrap(), Err(ChannelError::Cancelled));
    assert_eq!(blocked_reader.join().unwrap(), Err(ChannelError::Cancelled));
    assert!(start.elapsed() < Duration::from_secs(1));
}

#[test]
fn test_close_wakes_every_waiter() {
    let channel = Channel::<u32>::create(4);

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let reader = channel.reader().unwrap();
            thread::spawn(move || reader.read(Timeout::from_secs(10)))
        })
        .collect();

    wait_until(|| channel.stats().waiting_readers == 4);
    channel.close();

    for handle in readers {
        assert_eq!(handle.join().unwrap(), Err(ChannelError::Cancelled));
    }
}

#[test]
fn test_blocked_reader_receives_later_write() {
    let channel = Channel::<String>::create(2);
    let reader = channel.reader().unwrap();
    let writer = channel.writer().unwrap();

    let handle = thread::spawn(move || reader.read(Timeout::from_secs(5)));
    wait_until(|| channel.stats().waiting_readers == 1);

    writer.write("wake up".to_string(), Timeout::IMMEDIATE).unwrap();
    assert_eq!(handle.join().unwrap().unwrap(), "wake up");
}

#[test]
fn test_blocked_writers_resume_after_read_all() {
    let channel = Channel::<u32>::create(2);
    let writer = channel.writer().unwrap();
    writer.try_write(0).unwrap();
    writer.try_write(1).unwrap();

    let handles: Vec<_> = (2..4u32)
        .map(|i| {
            let writer = channel.writer().unwrap();
            thread::spawn(move || writer.write(i, Timeout::from_secs(5)))
        })
        .collect();

    wait_until(|| channel.stats().waiting_writers == 2);

    let reader = channel.reader().unwrap();
    assert_eq!(reader.read_all().unwrap(), vec![0, 1]);

    for handle in handles {
        handle.join().unwrap().unwrap();
    }

    let mut rest = reader.read_all().unwrap();
    rest.sort_unstable();
    assert_eq!(rest, vec![2, 3]);
}

#[test]
fn test_every_message_delivered_exactly_once() {
    const WRITERS: u32 = 4;
    const READERS: usize = 3;
    const PER_WRITER: u32 = 500;

    let channel = Channel::<u32>::create(8);

    let writers: Vec<_> = (0..WRITERS)
        .map(|w| {
            let writer = channel.writer().unwrap();
            thread::spawn(move || {
                for i in 0..PER_WRITER {
                    writer.write(w * PER_WRITER + i, Timeout::Infinite).unwrap();
                }
            })
        })
        .collect();

    let readers: Vec<_> = (0..READERS)
        .map(|_| {
            let reader = channel.reader().unwrap();
            thread::spawn(move || {
                let mut received = Vec::new();
                loop {
                    match reader.read(Timeout::from_millis(10)) {
                        Ok(value) => received.push(value),
                        Err(ChannelError::NotFound(_)) => continue,
                        Err(ChannelError::Cancelled) => break,
                        Err(e) => panic!("unexpected error: {}", e),
                    }
                }
                received
            })
        })
        .collect();

    for handle in writers {
        handle.join().unwrap();
    }
    wait_until(|| channel.is_empty());
    channel.close();

    let mut seen = HashSet::new();
    let mut total = 0;
    for handle in readers {
        let received = handle.join().unwrap();
        // Each reader sees every writer's messages in send order
        for w in 0..WRITERS {
            let from_writer: Vec<_> = received
                .iter()
                .filter(|v| **v / PER_WRITER == w)
                .collect();
            assert!(from_writer.windows(2).all(|pair| pair[0] < pair[1]));
        }
        total += received.len();
        seen.extend(received);
    }

    assert_eq!(total, (WRITERS * PER_WRITER) as usize);
    assert_eq!(seen.len(), total);
}

#[test]
fn test_read_all_never_exceeds_depth_under_contention() {
    let channel = Channel::<u64>::create(16);
    let stop = Arc::new(std::sync::atomic::AtomicBool::new(false));

    let producers: Vec<_> = (0..3)
        .map(|_| {
            let writer = channel.writer().unwrap();
            let stop = stop.clone();
            thread::spawn(move || {
                let mut sent = 0u64;
                while !stop.load(std::sync::atomic::Ordering::Relaxed) {
                    if writer.write(sent, Timeout::from_millis(1)).is_ok() {
                        sent += 1;
                    }
                }
                sent
            })
        })
        .collect();

    let reader = channel.reader().unwrap();
    let mut drained = 0u64;
    let deadline = Instant::now() + Duration::from_millis(200);
    while Instant::now() < deadline {
        let batch = reader.read_all().unwrap();
        assert!(batch.len() <= 16);
        drained += batch.len() as u64;
    }

    stop.store(true, std::sync::atomic::Ordering::Relaxed);
    let sent: u64 = producers.into_iter().map(|h| h.join().unwrap()).sum();
    drained += reader.read_all().unwrap().len() as u64;

    assert_eq!(sent, drained);
}

#[test]
fn test_zero_depth_blocked_writer_cancelled_by_close() {
    let channel = Channel::<u32>::create(0);
    let writer = channel.writer().unwrap();

    let blocked = thread::spawn(move || writer.write(1, Timeout::Infinite));
    wait_until(|| channel.stats().waiting_writers == 1);

    assert!(channel.close());
    assert_eq!(blocked.join().unwrap(), Err(ChannelError::Cancelled));
    assert_eq!(channel.stats().waiting_writers, 0);
}

#[test]
fn test_unproductive_wakeups_do_not_extend_write_timeout() {
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    // A depth-0 channel stays full, so every read_all wakes the parked
    // writer without ever giving it a slot
    let channel = Channel::<u32>::create(0);
    let writer = channel.writer().unwrap();
    let reader = channel.reader().unwrap();
    let done = Arc::new(AtomicBool::new(false));
    let wakeups = Arc::new(AtomicUsize::new(0));

    let churner = {
        let channel = channel.clone();
        let done = done.clone();
        let wakeups = wakeups.clone();
        thread::spawn(move || {
            let start = Instant::now();
            while !done.load(Ordering::SeqCst) && start.elapsed() < Duration::from_secs(2) {
                if channel.stats().waiting_writers == 1 {
                    assert_eq!(reader.read_all().unwrap(), Vec::<u32>::new());
                    wakeups.fetch_add(1, Ordering::SeqCst);
                }
                thread::sleep(Duration::from_micros(500));
            }
        })
    };

    let start = Instant::now();
    let result = writer.write(7, Timeout::from_millis(100));
    let elapsed = start.elapsed();
    done.store(true, Ordering::SeqCst);
    churner.join().unwrap();

    assert!(matches!(result, Err(ChannelError::ResourceExhausted(_))));
    assert!(wakeups.load(Ordering::SeqCst) >= 2, "writer was never woken early");
    assert!(elapsed >= Duration::from_millis(100));
    // Re-arming the full timeout on each wakeup would keep the writer
    // parked until the churner gives up
    assert!(elapsed < Duration::from_secs(1), "write waited {:?}", elapsed);
}
