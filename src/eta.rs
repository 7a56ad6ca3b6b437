//! ETA selection and the floating badge model.

use crate::geo::Coordinate;
use crate::traits::RouteResult;

/// Fastest candidate by travel time. Ties go to the earliest candidate.
///
/// Candidates with a non-finite travel time are skipped.
pub fn fastest(routes: &[RouteResult]) -> Option<&RouteResult> {
    let finite = routes.iter().filter(|route| route.travel_time_seconds.is_finite());
    finite.fold(None, |best: Option<&RouteResult>, route| match best {
        Some(current) if current.travel_time_seconds <= route.travel_time_seconds => Some(current),
        _ => Some(route),
    })
}

/// Whole minutes, rounded down. Negative or NaN inputs clamp to zero.
pub fn eta_minutes(travel_time_seconds: f64) -> u32 {
    let minutes = (travel_time_seconds / 60.0).floor();
    if minutes.is_nan() || minutes <= 0.0 {
        0
    } else {
        minutes as u32
    }
}

/// Content of a floating ETA badge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EtaBadge {
    pub anchor: Coordinate,
    pub minutes: u32,
}

impl EtaBadge {
    pub fn new(anchor: Coordinate, minutes: u32) -> Self {
        Self { anchor, minutes }
    }

    pub fn label(&self) -> String {
        format!("ETA to HQ: {} min", self.minutes)
    }
}
