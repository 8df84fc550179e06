//! Composable message predicates.
//!
//! Filters decide whether a decoded [Message] passes; a [FilterChain]
//! applies several in order over any message iterator. Geographic filters
//! pass messages that carry no position at all, so static reports survive a
//! position-based chain.

use crate::messages::Message;

/// Mean Earth radius used for great-circle distances, in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance between two `(lat, lon)` pairs in kilometers.
#[must_use]
pub fn haversine(a: (f64, f64), b: (f64, f64)) -> f64 {
    let (lat1, lon1) = (a.0.to_radians(), a.1.to_radians());
    let (lat2, lon2) = (b.0.to_radians(), b.1.to_radians());
    let dlat = lat2 - lat1;
    let dlon = lon2 - lon1;
    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.sqrt().asin()
}

/// A predicate over decoded messages.
pub trait MessageFilter {
    fn accept(&self, msg: &Message) -> bool;
}

/// Keeps messages satisfying an arbitrary predicate.
pub struct AttributeFilter<F>(pub F)
where
    F: Fn(&Message) -> bool;

impl<F> MessageFilter for AttributeFilter<F>
where
    F: Fn(&Message) -> bool,
{
    fn accept(&self, msg: &Message) -> bool {
        (self.0)(msg)
    }
}

/// Keeps messages on which every named attribute is present.
///
/// Attribute names follow [Message::has_attribute].
pub struct NoneFilter {
    attrs: Vec<String>,
}

impl NoneFilter {
    #[must_use]
    pub fn new<S: Into<String>, I: IntoIterator<Item = S>>(attrs: I) -> Self {
        NoneFilter {
            attrs: attrs.into_iter().map(Into::into).collect(),
        }
    }
}

impl MessageFilter for NoneFilter {
    fn accept(&self, msg: &Message) -> bool {
        self.attrs.iter().all(|attr| msg.has_attribute(attr))
    }
}

/// Keeps messages of the given wire types.
pub struct MessageTypeFilter {
    types: Vec<u8>,
}

impl MessageTypeFilter {
    #[must_use]
    pub fn new<I: IntoIterator<Item = u8>>(types: I) -> Self {
        MessageTypeFilter {
            types: types.into_iter().collect(),
        }
    }
}

impl MessageFilter for MessageTypeFilter {
    fn accept(&self, msg: &Message) -> bool {
        self.types.contains(&msg.msg_type())
    }
}

/// Keeps messages reporting a position within `distance_km` of a reference
/// point; messages without a position pass.
pub struct DistanceFilter {
    lat: f64,
    lon: f64,
    distance_km: f64,
}

impl DistanceFilter {
    #[must_use]
    pub fn new(lat: f64, lon: f64, distance_km: f64) -> Self {
        DistanceFilter {
            lat,
            lon,
            distance_km,
        }
    }
}

impl MessageFilter for DistanceFilter {
    fn accept(&self, msg: &Message) -> bool {
        match (msg.lat(), msg.lon()) {
            (Some(lat), Some(lon)) => {
                haversine((self.lat, self.lon), (lat, lon)) < self.distance_km
            }
            _ => true,
        }
    }
}

/// Keeps messages reporting a position inside a bounding box; messages
/// without a position pass.
pub struct GridFilter {
    lat_min: f64,
    lon_min: f64,
    lat_max: f64,
    lon_max: f64,
}

impl GridFilter {
    #[must_use]
    pub fn new(lat_min: f64, lon_min: f64, lat_max: f64, lon_max: f64) -> Self {
        GridFilter {
            lat_min,
            lon_min,
            lat_max,
            lon_max,
        }
    }
}

impl MessageFilter for GridFilter {
    fn accept(&self, msg: &Message) -> bool {
        match (msg.lat(), msg.lon()) {
            (Some(lat), Some(lon)) => {
                (self.lat_min..=self.lat_max).contains(&lat)
                    && (self.lon_min..=self.lon_max).contains(&lon)
            }
            _ => true,
        }
    }
}

/// Applies a sequence of filters in order.
pub struct FilterChain {
    filters: Vec<Box<dyn MessageFilter>>,
}

impl FilterChain {
    #[must_use]
    pub fn new(filters: Vec<Box<dyn MessageFilter>>) -> Self {
        FilterChain { filters }
    }

    /// Whether `msg` passes every filter.
    #[must_use]
    pub fn accept(&self, msg: &Message) -> bool {
        self.filters.iter().all(|f| f.accept(msg))
    }

    /// Filter a message iterator, keeping messages that pass the whole
    /// chain.
    pub fn filter<'a, I>(&'a self, messages: I) -> impl Iterator<Item = Message> + 'a
    where
        I: Iterator<Item = Message> + 'a,
    {
        messages.filter(move |msg| self.accept(msg))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::{Mmsi, PositionReport, StaticAndVoyageData};

    fn position(lat: f64, lon: f64) -> Message {
        Message::PositionReport(PositionReport {
            mmsi: Mmsi::new(367_000_001),
            lat,
            lon,
            ..PositionReport::default()
        })
    }

    fn voyage() -> Message {
        Message::StaticAndVoyageData(StaticAndVoyageData {
            mmsi: Mmsi::new(367_000_001),
            ..StaticAndVoyageData::default()
        })
    }

    #[test]
    fn haversine_known_distance() {
        // San Francisco to Los Angeles, roughly 559 km.
        let d = haversine((37.7749, -122.4194), (34.0522, -118.2437));
        assert!((d - 559.0).abs() < 5.0, "got {d}");
    }

    #[test]
    fn haversine_zero_distance() {
        assert_eq!(haversine((10.0, 20.0), (10.0, 20.0)), 0.0);
    }

    #[test]
    fn attribute_filter_applies_predicate() {
        let f = AttributeFilter(|msg: &Message| msg.speed().is_some_and(|s| s > 5.0));
        let mut fast = position(0.0, 0.0);
        if let Message::PositionReport(ref mut m) = fast {
            m.speed = 12.0;
        }
        assert!(f.accept(&fast));
        assert!(!f.accept(&position(0.0, 0.0)));
    }

    #[test]
    fn none_filter_requires_attributes() {
        let f = NoneFilter::new(["lat", "lon"]);
        assert!(f.accept(&position(1.0, 2.0)));
        assert!(!f.accept(&voyage()));

        let f = NoneFilter::new(["shipname"]);
        assert!(f.accept(&voyage()));
        assert!(!f.accept(&position(1.0, 2.0)));
    }

    #[test]
    fn type_filter_selects_types() {
        let f = MessageTypeFilter::new([1, 2, 3]);
        assert!(f.accept(&position(1.0, 2.0)));
        assert!(!f.accept(&voyage()));
    }

    #[test]
    fn distance_filter_passes_near_and_positionless() {
        let f = DistanceFilter::new(37.8, -122.4, 50.0);
        assert!(f.accept(&position(37.9, -122.3)));
        assert!(!f.accept(&position(34.05, -118.24)));
        assert!(f.accept(&voyage()));
    }

    #[test]
    fn grid_filter_bounds_positions() {
        let f = GridFilter::new(37.0, -123.0, 38.0, -122.0);
        assert!(f.accept(&position(37.5, -122.5)));
        assert!(!f.accept(&position(36.0, -122.5)));
        assert!(f.accept(&voyage()));
    }

    #[test]
    fn chain_applies_all_filters() {
        let chain = FilterChain::new(vec![
            Box::new(MessageTypeFilter::new([1, 2, 3])),
            Box::new(GridFilter::new(37.0, -123.0, 38.0, -122.0)),
        ]);
        let input = vec![
            position(37.5, -122.5),
            position(40.0, -122.5),
            voyage(),
        ];
        let kept: Vec<Message> = chain.filter(input.into_iter()).collect();
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].lat(), Some(37.5));
    }
}
