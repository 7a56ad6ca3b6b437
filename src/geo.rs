//! Geographic and screen-space value types.

use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// Earth radius in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// A geographic point in degrees.
///
/// Two coordinates are equal iff both components are bitwise equal, so the
/// type can key hash maps. `-0.0` and `0.0` are therefore distinct keys.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Great-circle distance to `other` in kilometers.
    pub fn haversine_km(&self, other: &Coordinate) -> f64 {
        let lat1_rad = self.latitude.to_radians();
        let lat2_rad = other.latitude.to_radians();
        let delta_lat = (other.latitude - self.latitude).to_radians();
        let delta_lng = (other.longitude - self.longitude).to_radians();

        let a = (delta_lat / 2.0).sin().powi(2)
            + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().asin();

        EARTH_RADIUS_KM * c
    }
}

impl PartialEq for Coordinate {
    fn eq(&self, other: &Self) -> bool {
        self.latitude.to_bits() == other.latitude.to_bits()
            && self.longitude.to_bits() == other.longitude.to_bits()
    }
}

impl Eq for Coordinate {}

impl Hash for Coordinate {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.latitude.to_bits().hash(state);
        self.longitude.to_bits().hash(state);
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((latitude, longitude): (f64, f64)) -> Self {
        Self::new(latitude, longitude)
    }
}

/// A point in the map view's pixel space (origin top-left, y grows down).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A lat/lng bounding box describing a visible map region.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub min: Coordinate,
    pub max: Coordinate,
}

impl Region {
    pub fn new(min: Coordinate, max: Coordinate) -> Self {
        Self { min, max }
    }

    /// Smallest region containing every point, or `None` for an empty input.
    pub fn enclosing<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Coordinate>,
    {
        let mut iter = points.into_iter();
        let first = *iter.next()?;
        let mut region = Region::new(first, first);
        for point in iter {
            region = region.union(&Region::new(*point, *point));
        }
        Some(region)
    }

    pub fn union(&self, other: &Region) -> Region {
        Region {
            min: Coordinate::new(
                self.min.latitude.min(other.min.latitude),
                self.min.longitude.min(other.min.longitude),
            ),
            max: Coordinate::new(
                self.max.latitude.max(other.max.latitude),
                self.max.longitude.max(other.max.longitude),
            ),
        }
    }

    /// Grows the region on every side by `fraction` of its span.
    ///
    /// Degenerate (zero-span) axes are grown by `min_degrees` instead.
    pub fn padded(&self, fraction: f64, min_degrees: f64) -> Region {
        let lat_pad = ((self.max.latitude - self.min.latitude) * fraction).max(min_degrees);
        let lng_pad = ((self.max.longitude - self.min.longitude) * fraction).max(min_degrees);
        Region {
            min: Coordinate::new(self.min.latitude - lat_pad, self.min.longitude - lng_pad),
            max: Coordinate::new(self.max.latitude + lat_pad, self.max.longitude + lng_pad),
        }
    }

    pub fn contains(&self, point: &Coordinate) -> bool {
        point.latitude >= self.min.latitude
            && point.latitude <= self.max.latitude
            && point.longitude >= self.min.longitude
            && point.longitude <= self.max.longitude
    }

    pub fn center(&self) -> Coordinate {
        Coordinate::new(
            (self.min.latitude + self.max.latitude) / 2.0,
            (self.min.longitude + self.max.longitude) / 2.0,
        )
    }
}
