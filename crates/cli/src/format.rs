//! Output → human/json string formatting.
//!
//! Two modes:
//! - **Human** (default): one line per event, indented lines per collection
//! - **JSON** (`--json`): one compact JSON object per line

use eicio_core::{Event, EventHeader};
use eicio_stream::ResyncOccurred;
use serde_json::json;

/// Output formatting mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
}

/// Format one header for `ls`.
pub fn format_header(index: u64, header: &EventHeader, mode: OutputMode) -> String {
    match mode {
        OutputMode::Json => {
            let collections: Vec<_> = header
                .collections
                .iter()
                .map(|c| {
                    json!({
                        "name": c.name,
                        "type": c.type_tag,
                        "payload_size": c.payload_size,
                    })
                })
                .collect();
            json!({
                "event": index,
                "payload_len": header.payload_len(),
                "collections": collections,
            })
            .to_string()
        }
        OutputMode::Human => {
            let mut out = format!(
                "event {}: {} collections, {} bytes",
                index,
                header.len(),
                header.payload_len()
            );
            for c in &header.collections {
                out.push_str(&format!(
                    "\n  {:<24} {:<24} {:>10}",
                    c.name, c.type_tag, c.payload_size
                ));
            }
            out
        }
    }
}

/// Format the totals for `count`.
pub fn format_count(events: u64, resyncs: u64, mode: OutputMode) -> String {
    match mode {
        OutputMode::Json => json!({ "events": events, "resyncs": resyncs }).to_string(),
        OutputMode::Human => format!("{} events, {} resyncs", events, resyncs),
    }
}

/// Format one decoded event for `cat`.
///
/// Records have no JSON form of their own; in JSON mode each collection
/// carries its Debug rendering.
pub fn format_event(index: u64, event: &Event, mode: OutputMode) -> String {
    match mode {
        OutputMode::Json => {
            let collections: Vec<_> = event
                .iter()
                .map(|(name, c)| {
                    json!({
                        "name": name,
                        "type": c.type_tag(),
                        "len": c.len(),
                        "records": format!("{:?}", c),
                    })
                })
                .collect();
            json!({ "event": index, "collections": collections }).to_string()
        }
        OutputMode::Human => format!("event {}: {:#?}", index, event),
    }
}

/// Format a resynchronization notice.
pub fn format_resync(resync: &ResyncOccurred, mode: OutputMode) -> String {
    match mode {
        OutputMode::Json => json!({
            "resync": {
                "skipped": resync.skipped(),
                "frame_offset": resync.frame_offset,
            }
        })
        .to_string(),
        OutputMode::Human => format!("(warning) {}", resync),
    }
}

/// Format an error.
pub fn format_error(err: &dyn std::fmt::Display, mode: OutputMode) -> String {
    match mode {
        OutputMode::Json => json!({ "error": err.to_string() }).to_string(),
        OutputMode::Human => format!("(error) {}", err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eicio_core::{CollectionHeader, McParticle, McParticleCollection};
    use serde_json::Value;

    fn header() -> EventHeader {
        EventHeader {
            collections: vec![
                CollectionHeader::new("MCParticles", "eicio.MCParticle", 128),
                CollectionHeader::new("TrackerHits", "eicio.SimTrackerHit", 180),
            ],
        }
    }

    #[test]
    fn test_header_json() {
        let line = format_header(3, &header(), OutputMode::Json);
        let v: Value = serde_json::from_str(&line).unwrap();
        assert_eq!(v["event"], 3);
        assert_eq!(v["payload_len"], 308);
        assert_eq!(v["collections"][0]["name"], "MCParticles");
        assert_eq!(v["collections"][1]["type"], "eicio.SimTrackerHit");
        assert_eq!(v["collections"][1]["payload_size"], 180);
    }

    #[test]
    fn test_header_human() {
        let out = format_header(0, &header(), OutputMode::Human);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "event 0: 2 collections, 308 bytes");
        assert!(lines[1].contains("MCParticles"));
        assert!(lines[2].contains("180"));
    }

    #[test]
    fn test_count() {
        assert_eq!(format_count(10, 1, OutputMode::Human), "10 events, 1 resyncs");
        let v: Value = serde_json::from_str(&format_count(10, 1, OutputMode::Json)).unwrap();
        assert_eq!(v["events"], 10);
        assert_eq!(v["resyncs"], 1);
    }

    #[test]
    fn test_resync() {
        let resync = ResyncOccurred {
            bytes_scanned: 12,
            frame_offset: 40,
        };
        let v: Value = serde_json::from_str(&format_resync(&resync, OutputMode::Json)).unwrap();
        assert_eq!(v["resync"]["skipped"], 8);
        assert!(format_resync(&resync, OutputMode::Human).starts_with("(warning)"));
    }

    #[test]
    fn test_event_json() {
        let mut event = Event::new();
        let particles: McParticleCollection = vec![McParticle::default(); 2].into();
        event.add_collection("MCParticles", particles).unwrap();

        let v: Value = serde_json::from_str(&format_event(5, &event, OutputMode::Json)).unwrap();
        assert_eq!(v["event"], 5);
        assert_eq!(v["collections"][0]["name"], "MCParticles");
        assert_eq!(v["collections"][0]["type"], "eicio.MCParticle");
        assert_eq!(v["collections"][0]["len"], 2);
        assert!(v["collections"][0]["records"].as_str().unwrap().contains("pdg"));

        let human = format_event(5, &event, OutputMode::Human);
        assert!(human.starts_with("event 5: {"));
    }

    #[test]
    fn test_error() {
        let v: Value = serde_json::from_str(&format_error(&"boom", OutputMode::Json)).unwrap();
        assert_eq!(v["error"], "boom");
        assert_eq!(format_error(&"boom", OutputMode::Human), "(error) boom");
    }
}
