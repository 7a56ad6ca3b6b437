//! Chennai event venues used as route sources.
//!
//! Coordinates are routable with the OSRM southern-zone India extract.

use route_overlay::geo::{Coordinate, Region};

/// A named location with coordinates.
#[derive(Debug, Clone)]
pub struct Location {
    pub name: &'static str,
    pub lat: f64,
    pub lng: f64,
}

impl Location {
    pub const fn new(name: &'static str, lat: f64, lng: f64) -> Self {
        Self { name, lat, lng }
    }

    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lng)
    }
}

/// Marina Beach, used as the shared destination.
pub const HQ: Location = Location::new("Marina Beach", 13.0500, 80.2824);

pub const EVENTS: &[Location] = &[
    Location::new("Tech Talk @ TIDEL Park", 13.0213, 80.2240),
    Location::new("Open Mic Night", 13.0475, 80.2610),
    Location::new("Startup Pitch Day", 13.0358, 80.2446),
    Location::new("Cultural Fest", 13.0085, 80.2340),
];

pub fn event_coordinates() -> Vec<Coordinate> {
    EVENTS.iter().map(Location::coordinate).collect()
}

/// Initial region roughly covering central Chennai.
pub fn city_region() -> Region {
    Region::new(Coordinate::new(12.98, 80.20), Coordinate::new(13.08, 80.30))
}
