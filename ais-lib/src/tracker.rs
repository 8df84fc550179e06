//! Stateful per-vessel tracking.
//!
//! [AisTracker] consumes decoded messages and maintains one [Track] per
//! MMSI, merging whatever fields each message carries. Consumers can watch
//! the track lifecycle through registered callbacks.

use std::collections::{BTreeSet, HashMap};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::messages::{Message, Mmsi};

/// Latest known state of one vessel.
///
/// Every field except `mmsi` and `last_seen` is populated lazily as
/// messages arrive; a field stays `None` until some message carries it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub mmsi: Mmsi,
    pub last_seen: DateTime<Utc>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub speed: Option<f64>,
    pub course: Option<f64>,
    pub heading: Option<u16>,
    pub turn: Option<f64>,
    pub shipname: Option<String>,
    pub callsign: Option<String>,
    pub destination: Option<String>,
    pub draught: Option<f64>,
    pub ship_type: Option<u8>,
    pub imo: Option<u32>,
}

impl Track {
    fn new(mmsi: Mmsi, seen: DateTime<Utc>) -> Self {
        Track {
            mmsi,
            last_seen: seen,
            lat: None,
            lon: None,
            speed: None,
            course: None,
            heading: None,
            turn: None,
            shipname: None,
            callsign: None,
            destination: None,
            draught: None,
            ship_type: None,
            imo: None,
        }
    }

    /// Copy the fields present on `msg` onto this track.
    fn merge(&mut self, msg: &Message) {
        if let Some(v) = msg.lat() {
            self.lat = Some(v);
        }
        if let Some(v) = msg.lon() {
            self.lon = Some(v);
        }
        if let Some(v) = msg.speed() {
            self.speed = Some(v);
        }
        if let Some(v) = msg.course() {
            self.course = Some(v);
        }
        if let Some(v) = msg.heading() {
            self.heading = Some(v);
        }
        if let Some(v) = msg.turn() {
            self.turn = Some(v);
        }
        if let Some(v) = msg.shipname() {
            self.shipname = Some(v.to_string());
        }
        if let Some(v) = msg.callsign() {
            self.callsign = Some(v.to_string());
        }
        if let Some(v) = msg.destination() {
            self.destination = Some(v.to_string());
        }
        if let Some(v) = msg.draught() {
            self.draught = Some(v);
        }
        if let Some(v) = msg.ship_type() {
            self.ship_type = Some(v);
        }
        if let Some(v) = msg.imo() {
            self.imo = Some(v);
        }
    }
}

/// Track lifecycle events delivered to callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrackEvent {
    Created,
    Updated,
    Deleted,
}

type Callback = Box<dyn FnMut(&Track)>;

/// Aggregates decoded messages into per-MMSI tracks.
///
/// With `stream_is_ordered` unset (the default) tracks live in a plain map
/// and [AisTracker::n_latest]/[AisTracker::cleanup] sort on demand. When
/// updates arrive in non-decreasing time order, enabling it maintains a
/// time-ordered index making those operations O(k) and O(expired).
///
/// The tracker owns its map exclusively and hands value snapshots to
/// callbacks; callbacks must not call back into the tracker.
pub struct AisTracker {
    tracks: HashMap<u32, Track>,
    // (last_seen, mmsi) index, maintained only in ordered mode
    by_time: BTreeSet<(DateTime<Utc>, u32)>,
    stream_is_ordered: bool,
    ttl: Duration,
    callbacks: HashMap<TrackEvent, Vec<Callback>>,
}

impl std::fmt::Debug for AisTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "AisTracker{{tracks={}, ordered={}, ttl={}}}",
            self.tracks.len(),
            self.stream_is_ordered,
            self.ttl
        )
    }
}

impl Default for AisTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl AisTracker {
    /// Default track expiry.
    pub const DEFAULT_TTL_SECONDS: i64 = 600;

    #[must_use]
    pub fn new() -> Self {
        Self::with_options(Duration::seconds(Self::DEFAULT_TTL_SECONDS), false)
    }

    /// `stream_is_ordered` promises that update timestamps never decrease.
    #[must_use]
    pub fn with_options(ttl: Duration, stream_is_ordered: bool) -> Self {
        AisTracker {
            tracks: HashMap::new(),
            by_time: BTreeSet::new(),
            stream_is_ordered,
            ttl,
            callbacks: HashMap::new(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Register `callback` for `event`. Callbacks run synchronously on the
    /// updating thread; a panicking callback is caught and logged.
    pub fn register_callback<F>(&mut self, event: TrackEvent, callback: F)
    where
        F: FnMut(&Track) + 'static,
    {
        self.callbacks
            .entry(event)
            .or_default()
            .push(Box::new(callback));
    }

    /// Apply `msg` to its vessel's track, creating it on first sight.
    ///
    /// `timestamp` defaults to the current time. Out-of-order updates merge
    /// normally but never move `last_seen` backwards.
    pub fn update(&mut self, msg: &Message, timestamp: Option<DateTime<Utc>>) {
        let seen = timestamp.unwrap_or_else(Utc::now);
        let mmsi = msg.mmsi();
        let key = mmsi.raw();

        let event = match self.tracks.get_mut(&key) {
            Some(track) => {
                let prev_seen = track.last_seen;
                track.merge(msg);
                track.last_seen = prev_seen.max(seen);
                if self.stream_is_ordered && track.last_seen != prev_seen {
                    self.by_time.remove(&(prev_seen, key));
                    let reinsert = (track.last_seen, key);
                    self.by_time.insert(reinsert);
                }
                TrackEvent::Updated
            }
            None => {
                let mut track = Track::new(mmsi, seen);
                track.merge(msg);
                self.tracks.insert(key, track);
                if self.stream_is_ordered {
                    self.by_time.insert((seen, key));
                }
                TrackEvent::Created
            }
        };
        self.emit(event, key);
    }

    /// The track for `mmsi`, if one exists.
    #[must_use]
    pub fn get(&self, mmsi: Mmsi) -> Option<&Track> {
        self.tracks.get(&mmsi.raw())
    }

    /// The `k` most recently seen tracks, newest first.
    #[must_use]
    pub fn n_latest(&self, k: usize) -> Vec<&Track> {
        if self.stream_is_ordered {
            self.by_time
                .iter()
                .rev()
                .take(k)
                .filter_map(|(_, key)| self.tracks.get(key))
                .collect()
        } else {
            let mut all: Vec<&Track> = self.tracks.values().collect();
            all.sort_by(|a, b| b.last_seen.cmp(&a.last_seen));
            all.truncate(k);
            all
        }
    }

    /// All tracks in unspecified order.
    pub fn tracks(&self) -> impl Iterator<Item = &Track> {
        self.tracks.values()
    }

    /// Remove tracks not seen within the TTL before `now`, firing
    /// [TrackEvent::Deleted] for each.
    pub fn cleanup(&mut self, now: DateTime<Utc>) {
        let deadline = now - self.ttl;
        let expired: Vec<u32> = if self.stream_is_ordered {
            self.by_time
                .iter()
                .take_while(|(seen, _)| *seen <= deadline)
                .map(|(_, key)| *key)
                .collect()
        } else {
            self.tracks
                .iter()
                .filter(|(_, t)| t.last_seen <= deadline)
                .map(|(key, _)| *key)
                .collect()
        };
        for key in expired {
            self.emit(TrackEvent::Deleted, key);
            if let Some(track) = self.tracks.remove(&key) {
                self.by_time.remove(&(track.last_seen, key));
            }
        }
    }

    fn emit(&mut self, event: TrackEvent, key: u32) {
        let Some(callbacks) = self.callbacks.get_mut(&event) else {
            return;
        };
        let Some(track) = self.tracks.get(&key) else {
            return;
        };
        let snapshot = track.clone();
        for callback in callbacks {
            let zult = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                callback(&snapshot);
            }));
            if let Err(panic) = zult {
                warn!(?event, mmsi = %snapshot.mmsi, "track callback panicked: {panic:?}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::{Mmsi, PositionReport, StaticAndVoyageData};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn position(mmsi: u32, lat: f64, lon: f64) -> Message {
        Message::PositionReport(PositionReport {
            mmsi: Mmsi::new(mmsi),
            lat,
            lon,
            speed: 7.8,
            ..PositionReport::default()
        })
    }

    fn voyage(mmsi: u32, name: &str) -> Message {
        Message::StaticAndVoyageData(StaticAndVoyageData {
            mmsi: Mmsi::new(mmsi),
            shipname: name.into(),
            ..StaticAndVoyageData::default()
        })
    }

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, 0).unwrap()
    }

    #[test]
    fn create_then_merge() {
        let mut tracker = AisTracker::new();
        tracker.update(&position(367_000_001, 37.8, -122.4), Some(at(100)));
        tracker.update(&voyage(367_000_001, "EVER GIVEN"), Some(at(101)));

        assert_eq!(tracker.len(), 1);
        let track = tracker.get(Mmsi::new(367_000_001)).unwrap();
        assert_eq!(track.lat, Some(37.8));
        assert_eq!(track.shipname.as_deref(), Some("EVER GIVEN"));
        assert_eq!(track.speed, Some(7.8));
        assert_eq!(track.last_seen, at(101));
    }

    #[test]
    fn last_seen_never_regresses() {
        let mut tracker = AisTracker::new();
        tracker.update(&position(367_000_001, 37.8, -122.4), Some(at(200)));
        tracker.update(&position(367_000_001, 37.9, -122.5), Some(at(150)));
        let track = tracker.get(Mmsi::new(367_000_001)).unwrap();
        assert_eq!(track.last_seen, at(200));
        // The late position still merged.
        assert_eq!(track.lat, Some(37.9));
    }

    #[test]
    fn n_latest_returns_newest_first() {
        let mut tracker = AisTracker::new();
        for i in 0..20u32 {
            tracker.update(&position(367_000_000 + i, 37.8, -122.4), Some(at(i64::from(i))));
        }
        let latest = tracker.n_latest(3);
        assert_eq!(latest.len(), 3);
        assert_eq!(latest[0].mmsi, Mmsi::new(367_000_019));
        assert_eq!(latest[1].mmsi, Mmsi::new(367_000_018));
        assert_eq!(latest[2].mmsi, Mmsi::new(367_000_017));
    }

    #[test]
    fn ordered_and_unordered_agree() {
        use rand::seq::SliceRandom;

        let mut times: Vec<i64> = (0..1000).collect();
        times.shuffle(&mut rand::thread_rng());

        let mut unordered = AisTracker::with_options(Duration::seconds(600), false);
        for &t in &times {
            unordered.update(&position(360_000_000 + t as u32, 1.0, 2.0), Some(at(t)));
        }

        let mut sorted_times = times.clone();
        sorted_times.sort_unstable();
        let mut ordered = AisTracker::with_options(Duration::seconds(600), true);
        for &t in &sorted_times {
            ordered.update(&position(360_000_000 + t as u32, 1.0, 2.0), Some(at(t)));
        }

        let a: Vec<_> = unordered.n_latest(10).iter().map(|t| t.mmsi).collect();
        let b: Vec<_> = ordered.n_latest(10).iter().map(|t| t.mmsi).collect();
        assert_eq!(a, b);
        assert_eq!(a.len(), 10);
        assert_eq!(a[0], Mmsi::new(360_000_999));
    }

    #[test]
    fn cleanup_expires_by_ttl() {
        let mut tracker = AisTracker::with_options(Duration::seconds(60), false);
        tracker.update(&position(367_000_001, 1.0, 2.0), Some(at(0)));
        tracker.update(&position(367_000_002, 1.0, 2.0), Some(at(100)));
        tracker.cleanup(at(120));
        assert_eq!(tracker.len(), 1);
        assert!(tracker.get(Mmsi::new(367_000_001)).is_none());
        assert!(tracker.get(Mmsi::new(367_000_002)).is_some());
    }

    #[test]
    fn ordered_cleanup_only_touches_expired_prefix() {
        let mut tracker = AisTracker::with_options(Duration::seconds(60), true);
        for i in 0..100u32 {
            tracker.update(&position(360_000_000 + i, 1.0, 2.0), Some(at(i64::from(i))));
        }
        tracker.cleanup(at(120));
        // Tracks seen at t <= 60 expired.
        assert_eq!(tracker.len(), 39);
    }

    #[test]
    fn callbacks_fire_for_lifecycle() {
        let events: Rc<RefCell<Vec<(TrackEvent, Mmsi)>>> = Rc::default();

        let mut tracker = AisTracker::with_options(Duration::seconds(60), false);
        for event in [TrackEvent::Created, TrackEvent::Updated, TrackEvent::Deleted] {
            let log = Rc::clone(&events);
            tracker.register_callback(event, move |track: &Track| {
                log.borrow_mut().push((event, track.mmsi));
            });
        }

        tracker.update(&position(367_000_001, 1.0, 2.0), Some(at(0)));
        tracker.update(&position(367_000_001, 1.1, 2.1), Some(at(1)));
        tracker.cleanup(at(1000));

        let seen = events.borrow();
        assert_eq!(
            seen.as_slice(),
            &[
                (TrackEvent::Created, Mmsi::new(367_000_001)),
                (TrackEvent::Updated, Mmsi::new(367_000_001)),
                (TrackEvent::Deleted, Mmsi::new(367_000_001)),
            ]
        );
    }

    #[test]
    fn panicking_callback_does_not_corrupt_state() {
        let mut tracker = AisTracker::new();
        tracker.register_callback(TrackEvent::Created, |_track: &Track| {
            panic!("callback bug");
        });
        tracker.update(&position(367_000_001, 1.0, 2.0), Some(at(0)));
        tracker.update(&position(367_000_001, 1.5, 2.0), Some(at(1)));
        assert_eq!(tracker.len(), 1);
        assert_eq!(
            tracker.get(Mmsi::new(367_000_001)).unwrap().lat,
            Some(1.5)
        );
    }
}
