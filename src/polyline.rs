//! Polyline representation for route geometries.
//!
//! Routes are held as decoded coordinate sequences. The compact encoded
//! form (the precision-5 polyline format OSRM emits by default) is decoded
//! at the provider boundary and never travels further into the crate.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geo::{Coordinate, Region};

/// Scale factor for the precision-5 encoding.
const PRECISION_5: f64 = 1e5;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PolylineError {
    #[error("polyline ends mid-value at byte {0}")]
    Truncated(usize),
    #[error("invalid polyline byte at offset {0}")]
    InvalidByte(usize),
    #[error("polyline coordinate overflows at byte {0}")]
    Overflow(usize),
}

/// A route geometry as decoded coordinates, in travel order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polyline {
    points: Vec<Coordinate>,
}

impl Polyline {
    /// Creates a polyline from decoded points.
    pub fn new(points: Vec<Coordinate>) -> Self {
        Self { points }
    }

    /// Decodes a precision-5 encoded polyline.
    pub fn decode(encoded: &str) -> Result<Self, PolylineError> {
        let bytes = encoded.as_bytes();
        let mut points = Vec::new();
        let mut offset = 0;
        let mut lat: i64 = 0;
        let mut lng: i64 = 0;

        while offset < bytes.len() {
            let start = offset;
            lat = lat
                .checked_add(next_delta(bytes, &mut offset)?)
                .ok_or(PolylineError::Overflow(start))?;
            let start = offset;
            lng = lng
                .checked_add(next_delta(bytes, &mut offset)?)
                .ok_or(PolylineError::Overflow(start))?;
            points.push(Coordinate::new(
                lat as f64 / PRECISION_5,
                lng as f64 / PRECISION_5,
            ));
        }

        Ok(Self { points })
    }

    /// Returns a reference to the coordinate points.
    pub fn points(&self) -> &[Coordinate] {
        &self.points
    }

    /// Consumes the polyline and returns the owned points.
    pub fn into_points(self) -> Vec<Coordinate> {
        self.points
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Bounding region of the path, `None` when empty.
    pub fn bounds(&self) -> Option<Region> {
        Region::enclosing(&self.points)
    }

    /// First point of the path.
    pub fn first(&self) -> Option<Coordinate> {
        self.points.first().copied()
    }

    /// Last point of the path.
    pub fn last(&self) -> Option<Coordinate> {
        self.points.last().copied()
    }
}

/// Reads one zig-zag encoded varint from `bytes`, advancing `offset`.
fn next_delta(bytes: &[u8], offset: &mut usize) -> Result<i64, PolylineError> {
    let mut result: i64 = 0;
    let mut shift = 0;

    loop {
        let byte = *bytes.get(*offset).ok_or(PolylineError::Truncated(*offset))?;
        if !(63..=126).contains(&byte) || shift > 60 {
            return Err(PolylineError::InvalidByte(*offset));
        }
        let chunk = (byte - 63) as i64;
        *offset += 1;
        result |= (chunk & 0x1f) << shift;
        shift += 5;
        if chunk < 0x20 {
            break;
        }
    }

    if result & 1 == 1 {
        Ok(!(result >> 1))
    } else {
        Ok(result >> 1)
    }
}
