//! Framing and recovery tests
//!
//! Streams are built in memory, then damaged in the ways real files get
//! damaged: leading garbage, garbage between frames, and cuts at every
//! possible byte.

use eicio_core::{
    Collection, Event, McParticle, McParticleCollection, SimTrackerHit, SimTrackerHitCollection,
};
use eicio_stream::{
    encode_frame, EventReader, EventWriter, FrameSection, ReadError, TruncationCause,
    FRAME_PREAMBLE_SIZE, MAGIC,
};
use proptest::prelude::*;
use std::io::Cursor;

/// Helper: event with `particles` MCParticles and `hits` tracker hits
fn make_event(particles: usize, hits: usize) -> Event {
    let mut event = Event::new();
    let mc: McParticleCollection = (0..particles)
        .map(|i| McParticle {
            pdg: if i % 2 == 0 { 11 } else { -11 },
            gen_status: 1,
            charge: if i % 2 == 0 { -1.0 } else { 1.0 },
            mass: 0.000511,
            momentum: [i as f32, 0.5, 10.0],
            ..Default::default()
        })
        .collect();
    let th: SimTrackerHitCollection = (0..hits)
        .map(|i| SimTrackerHit {
            cell_id: 0xABCD_0000 + i as u64,
            edep: 1.0e-6 * i as f32,
            position: [i as f64, -(i as f64), 100.0],
            ..Default::default()
        })
        .collect();
    event.add_collection("MCParticles", mc).unwrap();
    event.add_collection("TrackerHits", th).unwrap();
    event
}

/// Helper: write events through an EventWriter into a byte buffer
fn write_stream(events: &[Event]) -> Vec<u8> {
    let mut writer = EventWriter::new(Vec::new());
    for event in events {
        writer.write(event).unwrap();
    }
    writer.into_inner()
}

/// Helper: read until the stream ends, panicking on any other error
fn read_all(data: Vec<u8>) -> Vec<Event> {
    let mut reader = EventReader::new(Cursor::new(data));
    reader.events().map(|r| r.unwrap().0).collect()
}

// ============================================================================
// Round trips
// ============================================================================

#[test]
fn test_round_trip_single_event() {
    let event = make_event(2, 3);
    let data = write_stream(std::slice::from_ref(&event));

    let mut reader = EventReader::new(Cursor::new(data));
    let (read, resync) = reader.read_next().unwrap();

    assert!(resync.is_none());
    assert_eq!(read, event);
    assert_eq!(read.get::<McParticle>("MCParticles").unwrap().len(), 2);
    assert_eq!(read.get::<SimTrackerHit>("TrackerHits").unwrap().len(), 3);
    assert_eq!(read.header().payload_len(), 2 * 64 + 3 * 60);
}

#[test]
fn test_multiple_events_then_end_of_stream() {
    let events: Vec<Event> = (0..5).map(|i| make_event(i, 2 * i)).collect();
    let data = write_stream(&events);

    let mut reader = EventReader::new(Cursor::new(data));
    for expected in &events {
        let (event, resync) = reader.read_next().unwrap();
        assert!(resync.is_none());
        assert_eq!(&event, expected);
    }
    assert!(matches!(reader.read_next(), Err(ReadError::EndOfStream)));
    // Still at the end on repeated calls
    assert!(matches!(reader.read_next(), Err(ReadError::EndOfStream)));
    assert_eq!(reader.events_read(), 5);
    assert_eq!(reader.resync_count(), 0);
}

#[test]
fn test_empty_collections_round_trip() {
    let event = make_event(0, 0);
    let read = read_all(write_stream(std::slice::from_ref(&event)));
    assert_eq!(read, vec![event]);
    assert_eq!(read[0].header().payload_len(), 0);
}

#[test]
fn test_event_without_collections_round_trip() {
    let read = read_all(write_stream(&[Event::new(), make_event(1, 1)]));
    assert_eq!(read.len(), 2);
    assert!(read[0].is_empty());
    assert_eq!(read[1].len(), 2);
}

#[test]
fn test_collection_order_preserved() {
    let mut event = Event::new();
    for name in ["zeta", "alpha", "mid"] {
        let coll: McParticleCollection = vec![McParticle::default()].into();
        event.add_collection(name, coll).unwrap();
    }

    let read = read_all(write_stream(&[event]));
    let names: Vec<&str> = read[0].names().collect();
    assert_eq!(names, vec!["zeta", "alpha", "mid"]);
}

// ============================================================================
// Resynchronization
// ============================================================================

#[test]
fn test_resync_after_leading_junk() {
    let event = make_event(3, 1);
    let mut data = vec![0x42u8; 100];
    data.extend(write_stream(std::slice::from_ref(&event)));

    let mut reader = EventReader::new(Cursor::new(data));
    let (read, resync) = reader.read_next().unwrap();
    let resync = resync.expect("junk should be reported");

    assert_eq!(read, event);
    assert_eq!(resync.bytes_scanned, 104);
    assert_eq!(resync.skipped(), 100);
    assert_eq!(resync.frame_offset, 100);
    assert_eq!(reader.resync_count(), 1);
}

#[test]
fn test_resync_between_frames() {
    let first = make_event(1, 0);
    let second = make_event(0, 4);

    let mut data = write_stream(std::slice::from_ref(&first));
    let first_len = data.len() as u64;
    data.extend_from_slice(&[0xDE, 0xAD, 0xBE, 0xEF, 0xE1]);
    data.extend(write_stream(std::slice::from_ref(&second)));

    let mut reader = EventReader::new(Cursor::new(data));
    let (a, ra) = reader.read_next().unwrap();
    let (b, rb) = reader.read_next().unwrap();

    assert_eq!(a, first);
    assert!(ra.is_none());
    assert_eq!(b, second);
    let rb = rb.unwrap();
    assert_eq!(rb.skipped(), 5);
    assert_eq!(rb.frame_offset, first_len + 5);
    assert!(reader.read_next().unwrap_err().is_end_of_stream());
}

#[test]
fn test_only_junk_is_end_of_stream() {
    let mut reader = EventReader::new(Cursor::new(vec![0u8; 64]));
    assert!(reader.read_next().unwrap_err().is_end_of_stream());
    assert_eq!(reader.position(), 64);
}

#[test]
fn test_header_only_reports_resync() {
    let event = make_event(2, 2);
    let mut data = vec![0x01, 0x02, 0x03];
    data.extend(write_stream(std::slice::from_ref(&event)));

    let mut reader = EventReader::seekable(Cursor::new(data));
    let (header, resync) = reader.read_next_header().unwrap();
    assert_eq!(&header, event.header());
    assert_eq!(resync.unwrap().skipped(), 3);
}

// ============================================================================
// Truncation
// ============================================================================

#[test]
fn test_truncation_at_every_cut() {
    let event = make_event(2, 2);
    let frame = encode_frame(&event).unwrap();
    let header_len = u32::from_le_bytes([frame[4], frame[5], frame[6], frame[7]]) as usize;
    let payload_start = FRAME_PREAMBLE_SIZE + header_len;

    for cut in 0..frame.len() {
        let mut reader = EventReader::new(Cursor::new(frame[..cut].to_vec()));
        let err = reader.read_next().unwrap_err();

        if cut < MAGIC.len() {
            assert!(err.is_end_of_stream(), "cut {} should end the stream", cut);
            continue;
        }

        let expected = if cut < FRAME_PREAMBLE_SIZE {
            FrameSection::HeaderLen
        } else if cut < payload_start {
            FrameSection::Header
        } else {
            FrameSection::Payload
        };
        match err {
            ReadError::Truncated(t) => {
                assert_eq!(t.section, expected, "cut {}", cut);
                assert!(
                    matches!(t.cause, TruncationCause::ShortRead { .. }),
                    "cut {}: {:?}",
                    cut,
                    t.cause
                );
            }
            other => panic!("cut {}: expected truncation, got {:?}", cut, other),
        }
    }
}

#[test]
fn test_truncated_last_event_keeps_earlier_ones() {
    let events: Vec<Event> = (1..4).map(|i| make_event(i, i)).collect();
    let data = write_stream(&events);
    let cut = data[..data.len() - 7].to_vec();

    let mut reader = EventReader::new(Cursor::new(cut));
    assert_eq!(reader.read_next().unwrap().0, events[0]);
    assert_eq!(reader.read_next().unwrap().0, events[1]);

    match reader.read_next() {
        Err(ReadError::Truncated(t)) => {
            assert_eq!(t.section, FrameSection::Payload);
            assert_eq!(
                t.cause,
                TruncationCause::ShortRead {
                    expected: events[2].header().payload_len(),
                    actual: events[2].header().payload_len() - 7,
                }
            );
        }
        other => panic!("expected truncation, got {:?}", other.map(|_| ())),
    }
    assert!(reader.read_next().unwrap_err().is_end_of_stream());
}

#[test]
fn test_header_only_truncated_payload() {
    let frame = encode_frame(&make_event(4, 0)).unwrap();
    let cut = frame[..frame.len() - 1].to_vec();

    let mut sequential = EventReader::new(Cursor::new(cut.clone()));
    assert!(sequential.read_next_header().unwrap_err().is_truncated());

    let mut seekable = EventReader::seekable(Cursor::new(cut));
    assert!(seekable.read_next_header().unwrap_err().is_truncated());
}

// ============================================================================
// Header-only reads
// ============================================================================

#[test]
fn test_header_only_matches_full_read() {
    let events: Vec<Event> = (0..4).map(|i| make_event(i + 1, 3 - i)).collect();
    let data = write_stream(&events);

    let mut full = EventReader::new(Cursor::new(data.clone()));
    let mut sequential = EventReader::new(Cursor::new(data.clone()));
    let mut seekable = EventReader::seekable(Cursor::new(data));

    for _ in 0..events.len() {
        let (event, _) = full.read_next().unwrap();
        let (h1, _) = sequential.read_next_header().unwrap();
        let (h2, _) = seekable.read_next_header().unwrap();

        assert_eq!(event.header(), &h1);
        assert_eq!(h1, h2);
        assert_eq!(full.position(), sequential.position());
        assert_eq!(full.position(), seekable.position());
    }

    assert!(full.read_next().unwrap_err().is_end_of_stream());
    assert!(sequential.read_next_header().unwrap_err().is_end_of_stream());
    assert!(seekable.read_next_header().unwrap_err().is_end_of_stream());
}

#[test]
fn test_mixed_full_and_header_reads() {
    let events: Vec<Event> = (0..3).map(|i| make_event(i, i)).collect();
    let data = write_stream(&events);

    let mut reader = EventReader::seekable(Cursor::new(data));
    let (h, _) = reader.read_next_header().unwrap();
    assert_eq!(&h, events[0].header());
    let (e, _) = reader.read_next().unwrap();
    assert_eq!(e, events[1]);
    let (h, _) = reader.read_next_header().unwrap();
    assert_eq!(&h, events[2].header());
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn prop_payload_len_matches_frame(particles in 0usize..20, hits in 0usize..20) {
        let event = make_event(particles, hits);
        let frame = encode_frame(&event).unwrap();
        let header_len = u32::from_le_bytes([frame[4], frame[5], frame[6], frame[7]]) as u64;

        prop_assert_eq!(
            frame.len() as u64,
            FRAME_PREAMBLE_SIZE as u64 + header_len + event.header().payload_len()
        );
        prop_assert_eq!(event.header().payload_len(), (particles * 64 + hits * 60) as u64);
    }

    #[test]
    fn prop_junk_prefix_recovered(junk in proptest::collection::vec(any::<u8>(), 0..64)) {
        // Junk containing the marker itself would be a different frame.
        prop_assume!(!junk.windows(MAGIC.len()).any(|w| w == MAGIC));

        let event = make_event(1, 1);
        let frame = encode_frame(&event).unwrap();
        let mut data = junk.clone();
        data.extend_from_slice(&frame);

        // The tail of the junk plus the start of the frame must not form an
        // earlier marker either.
        let first = data.windows(MAGIC.len()).position(|w| w == MAGIC).unwrap();
        prop_assume!(first == junk.len());

        let mut reader = EventReader::new(Cursor::new(data));
        let (read, resync) = reader.read_next().unwrap();
        prop_assert_eq!(read, event);
        prop_assert_eq!(resync.map(|r| r.skipped()).unwrap_or(0), junk.len() as u64);
    }
}
