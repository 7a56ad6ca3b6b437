//! Straight-line routing provider (fallback when OSRM unavailable).
//!
//! Uses great-circle distance to estimate travel time. Less accurate than
//! OSRM (ignores roads) but always available, so screens still get a
//! drawn line and a badge offline.

use crate::error::RoutingError;
use crate::polyline::Polyline;
use crate::traits::{RouteQuery, RouteResult, RoutingProvider};

/// Average driving speed assumption for time estimation.
const DEFAULT_SPEED_KMH: f64 = 40.0;

#[derive(Debug, Clone)]
pub struct StraightLineRouter {
    /// Assumed average driving speed in km/h.
    pub speed_kmh: f64,
}

impl Default for StraightLineRouter {
    fn default() -> Self {
        Self {
            speed_kmh: DEFAULT_SPEED_KMH,
        }
    }
}

impl StraightLineRouter {
    pub fn new(speed_kmh: f64) -> Self {
        Self { speed_kmh }
    }

    fn km_to_seconds(&self, km: f64) -> f64 {
        km / self.speed_kmh * 3600.0
    }
}

impl RoutingProvider for StraightLineRouter {
    fn route(&self, query: &RouteQuery) -> Result<Vec<RouteResult>, RoutingError> {
        if self.speed_kmh <= 0.0 {
            return Err(RoutingError::NoRouteFound);
        }

        let km = query.source.haversine_km(&query.destination);
        Ok(vec![RouteResult {
            path: Polyline::new(vec![query.source, query.destination]),
            travel_time_seconds: self.km_to_seconds(km),
        }])
    }
}
