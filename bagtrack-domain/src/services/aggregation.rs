use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};

use crate::entities::{ActiveBag, GateCount, ScanEvent};
use crate::value_objects::TimeWindow;

/// Most recent first: later timestamp wins, equal timestamps fall back to
/// the larger store id (later append).
pub fn recency_order(a: &ScanEvent, b: &ScanEvent) -> Ordering {
    b.timestamp
        .cmp(&a.timestamp)
        .then_with(|| b.id.cmp(&a.id))
}

pub fn sort_recent_first(events: &mut [ScanEvent]) {
    events.sort_by(recency_order);
}

/// The bag's current known state. Does not rely on the input being sorted.
pub fn latest_scan(events: &[ScanEvent]) -> Option<&ScanEvent> {
    events.iter().max_by_key(|event| (event.timestamp, event.id))
}

/// One entry per bag seen inside the window, carrying its most recent scan.
/// Callers pass events already scoped to a single gate; no cross-gate
/// history is consulted. Output is ordered most recent first.
pub fn active_bags(events: &[ScanEvent], window: &TimeWindow) -> Vec<ActiveBag> {
    let mut in_window: Vec<&ScanEvent> = events
        .iter()
        .filter(|event| window.contains(event.timestamp))
        .collect();
    in_window.sort_by(|a, b| recency_order(a, b));

    let mut seen: HashSet<&str> = HashSet::new();
    let mut bags = Vec::new();
    for event in in_window {
        if !seen.insert(event.bag_tag_id.as_str()) {
            continue;
        }
        bags.push(ActiveBag {
            bag_tag_id: event.bag_tag_id.clone(),
            last_scan_at: event.timestamp,
            last_location: event.location_scanned.clone(),
        });
    }
    bags
}

/// Distinct bags per gate inside the window. A re-routed bag counts once
/// toward each gate it was scanned for. Gates without qualifying events are
/// absent; output is sorted by gate.
pub fn gate_counts(events: &[ScanEvent], window: &TimeWindow) -> Vec<GateCount> {
    let mut seen: HashSet<(&str, &str)> = HashSet::new();
    let mut counts: BTreeMap<&str, u64> = BTreeMap::new();
    for event in events.iter().filter(|event| window.contains(event.timestamp)) {
        let key = (event.destination_gate.as_str(), event.bag_tag_id.as_str());
        if seen.insert(key) {
            *counts.entry(key.0).or_default() += 1;
        }
    }
    counts
        .into_iter()
        .map(|(gate, count)| GateCount {
            destination_gate: gate.to_string(),
            unique_bag_count: count,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn base() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    fn scan(id: i64, bag: &str, gate: &str, location: &str, minutes_ago: i64) -> ScanEvent {
        ScanEvent {
            id,
            bag_tag_id: bag.to_string(),
            destination_gate: gate.to_string(),
            location_scanned: location.to_string(),
            timestamp: base() - Duration::minutes(minutes_ago),
        }
    }

    fn window(minutes: u32) -> TimeWindow {
        TimeWindow::trailing(base(), minutes)
    }

    #[test]
    fn latest_scan_picks_max_timestamp_regardless_of_order() {
        let events = vec![
            scan(1, "B001", "G1", "Checkin", 20),
            scan(3, "B001", "G1", "Security", 5),
            scan(2, "B001", "G1", "Sorter", 10),
        ];
        let latest = latest_scan(&events).expect("latest");
        assert_eq!(latest.location_scanned, "Security");
    }

    #[test]
    fn latest_scan_handles_out_of_order_ingestion() {
        // id 2 was appended later but describes an earlier sighting
        let events = vec![
            scan(1, "B001", "G1", "Gate", 1),
            scan(2, "B001", "G1", "Checkin", 30),
        ];
        assert_eq!(latest_scan(&events).map(|e| e.id), Some(1));
    }

    #[test]
    fn equal_timestamps_prefer_larger_id() {
        let events = vec![
            scan(7, "B001", "G1", "Sorter", 5),
            scan(9, "B001", "G1", "Ramp", 5),
            scan(8, "B001", "G1", "Belt", 5),
        ];
        assert_eq!(latest_scan(&events).map(|e| e.id), Some(9));

        let mut sorted = events.clone();
        sort_recent_first(&mut sorted);
        let ids: Vec<i64> = sorted.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![9, 8, 7]);
    }

    #[test]
    fn latest_scan_of_empty_history_is_none() {
        assert!(latest_scan(&[]).is_none());
    }

    #[test]
    fn active_bags_collapse_repeated_scans_to_latest() {
        let events = vec![
            scan(1, "B001", "G1", "Checkin", 50),
            scan(2, "B001", "G1", "Security", 40),
            scan(3, "B001", "G1", "Sorter", 30),
            scan(4, "B001", "G1", "Belt", 20),
            scan(5, "B001", "G1", "Ramp", 10),
            scan(6, "B002", "G1", "Checkin", 15),
        ];
        let bags = active_bags(&events, &window(60));
        assert_eq!(bags.len(), 2);
        assert_eq!(bags[0].bag_tag_id, "B001");
        assert_eq!(bags[0].last_location, "Ramp");
        assert_eq!(bags[0].last_scan_at, base() - Duration::minutes(10));
        assert_eq!(bags[1].bag_tag_id, "B002");
    }

    #[test]
    fn active_bags_ignore_scans_outside_window() {
        let events = vec![
            scan(1, "B001", "G1", "Checkin", 90),
            scan(2, "B002", "G1", "Checkin", 30),
        ];
        let bags = active_bags(&events, &window(60));
        assert_eq!(bags.len(), 1);
        assert_eq!(bags[0].bag_tag_id, "B002");
    }

    #[test]
    fn active_bags_use_latest_in_window_not_latest_overall() {
        let events = vec![
            scan(1, "B001", "G1", "Checkin", 30),
            // timestamped after "now"; not yet inside the trailing window
            scan(2, "B001", "G1", "Gate", -10),
        ];
        let bags = active_bags(&events, &window(60));
        assert_eq!(bags.len(), 1);
        assert_eq!(bags[0].last_location, "Checkin");
    }

    #[test]
    fn future_only_bag_is_not_active_yet() {
        let events = vec![scan(1, "B002", "G1", "Gate", -5)];
        assert!(active_bags(&events, &window(60)).is_empty());
        assert!(gate_counts(&events, &window(60)).is_empty());
    }

    #[test]
    fn active_bag_tie_break_uses_id() {
        let events = vec![
            scan(4, "B001", "G1", "Belt", 5),
            scan(5, "B001", "G1", "Ramp", 5),
        ];
        let bags = active_bags(&events, &window(60));
        assert_eq!(bags.len(), 1);
        assert_eq!(bags[0].last_location, "Ramp");
    }

    #[test]
    fn rerouted_bag_counts_once_per_gate() {
        let events = vec![
            scan(1, "B001", "GA", "Checkin", 2),
            scan(2, "B001", "GB", "Sorter", 1),
            scan(3, "B001", "GB", "Ramp", 0),
        ];
        let counts = gate_counts(&events, &window(60));
        assert_eq!(
            counts,
            vec![
                GateCount {
                    destination_gate: "GA".to_string(),
                    unique_bag_count: 1,
                },
                GateCount {
                    destination_gate: "GB".to_string(),
                    unique_bag_count: 1,
                },
            ]
        );
    }

    #[test]
    fn gates_without_recent_scans_are_omitted() {
        let events = vec![
            scan(1, "B001", "G1", "Checkin", 120),
            scan(2, "B002", "G2", "Checkin", 10),
        ];
        let counts = gate_counts(&events, &window(60));
        assert_eq!(counts.len(), 1);
        assert_eq!(counts[0].destination_gate, "G2");
    }

    #[test]
    fn gate_counts_match_active_bag_lengths() {
        let events = vec![
            scan(1, "B001", "G1", "Checkin", 55),
            scan(2, "B001", "G1", "Security", 45),
            scan(3, "B002", "G1", "Checkin", 40),
            scan(4, "B002", "G2", "Sorter", 35),
            scan(5, "B003", "G2", "Checkin", 75),
            scan(6, "B003", "G2", "Belt", 5),
            scan(7, "B004", "G3", "Checkin", 65),
        ];
        let w = window(60);
        let counts = gate_counts(&events, &w);
        for count in &counts {
            let scoped: Vec<ScanEvent> = events
                .iter()
                .filter(|e| e.destination_gate == count.destination_gate)
                .cloned()
                .collect();
            assert_eq!(
                active_bags(&scoped, &w).len() as u64,
                count.unique_bag_count,
                "gate {}",
                count.destination_gate
            );
        }
        assert!(counts.iter().all(|c| c.destination_gate != "G3"));
    }

    #[test]
    fn folds_are_independent_of_input_order() {
        let events = vec![
            scan(1, "B001", "G1", "Checkin", 30),
            scan(2, "B002", "G1", "Checkin", 20),
            scan(3, "B001", "G1", "Gate", 10),
        ];
        let mut reversed = events.clone();
        reversed.reverse();
        let w = window(60);
        assert_eq!(active_bags(&events, &w), active_bags(&reversed, &w));
        assert_eq!(gate_counts(&events, &w), gate_counts(&reversed, &w));
    }
}
