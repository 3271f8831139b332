/*!
 * Channel Handle Tests
 * Handle creation rules and shared ownership of the channel
 */

use std::sync::Arc;
use stratum_channel::{
    Channel, ChannelReader, ChannelWriter, MessageReader, MessageWriter, Timeout,
};

#[test]
fn test_handles_refused_for_closed_channel() {
    let channel = Channel::<u32>::create(4);
    channel.close();

    assert!(ChannelWriter::create(&channel).is_none());
    assert!(ChannelReader::create(&channel).is_none());
    assert!(channel.writer().is_none());
    assert!(channel.reader().is_none());
}

#[test]
fn test_handles_refused_for_absent_channel() {
    assert!(ChannelWriter::<u32>::create_from(None).is_none());
    assert!(ChannelReader::<u32>::create_from(None).is_none());

    let channel = Channel::<u32>::create(1);
    assert!(ChannelWriter::create_from(Some(channel.clone())).is_some());
    assert!(ChannelReader::create_from(Some(channel)).is_some());
}

#[test]
fn test_existing_handles_survive_close() {
    let channel = Channel::<u32>::create(4);
    let writer = channel.writer().unwrap();
    channel.close();

    // The handle stays valid but every operation is cancelled
    assert!(writer.is_closed());
    assert!(writer.try_write(1).unwrap_err().is_cancelled());
}

#[test]
fn test_channel_outlives_creator_reference() {
    let channel = Channel::<u32>::create(4);
    let weak = Arc::downgrade(&channel);

    let writer = ChannelWriter::create(&channel).unwrap();
    let reader = ChannelReader::create(&channel).unwrap();
    assert_eq!(Arc::strong_count(&channel), 3);

    drop(channel);
    assert!(weak.upgrade().is_some());

    writer.try_write(42).unwrap();
    assert_eq!(reader.try_read().unwrap(), 42);

    drop(writer);
    assert!(weak.upgrade().is_some());
    drop(reader);
    assert!(weak.upgrade().is_none());
}

#[test]
fn test_many_handles_share_one_queue() {
    let channel = Channel::<u32>::create(8);
    let writers: Vec<_> = (0..3).map(|_| channel.writer().unwrap()).collect();
    let reader = channel.reader().unwrap();

    for (i, writer) in writers.iter().enumerate() {
        writer.try_write(i as u32).unwrap();
    }

    assert_eq!(reader.read_all().unwrap(), vec![0, 1, 2]);
}

#[test]
fn test_handles_through_traits() {
    let channel = Channel::<String>::create(2);
    let writer: Box<dyn MessageWriter<String>> = Box::new(channel.writer().unwrap());
    let reader: Box<dyn MessageReader<String>> = Box::new(channel.reader().unwrap());

    writer.write("hello".to_string(), Timeout::IMMEDIATE).unwrap();
    writer.try_write("world".to_string()).unwrap();
    assert_eq!(reader.read(Timeout::IMMEDIATE).unwrap(), "hello");
    assert_eq!(reader.read_all().unwrap(), vec!["world".to_string()]);

    channel.close();
    assert!(writer.is_closed());
    assert!(reader.try_read().unwrap_err().is_cancelled());
}
