//! Simulated live location along a route.
//!
//! Replays a route's path points one per tick, the way a tracked person's
//! marker would move on the map.

use std::time::Duration;

use crate::geo::Coordinate;
use crate::traits::RouteResult;

/// Interval between simulated position updates.
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Clone)]
pub struct LocationSimulator {
    points: Vec<Coordinate>,
    step: usize,
}

impl LocationSimulator {
    pub fn new(points: Vec<Coordinate>) -> Self {
        Self { points, step: 0 }
    }

    pub fn from_route(route: &RouteResult) -> Self {
        Self::new(route.path.points().to_vec())
    }

    /// Position after the most recent tick, `None` before the first.
    pub fn position(&self) -> Option<Coordinate> {
        self.step.checked_sub(1).map(|index| self.points[index])
    }

    pub fn remaining(&self) -> usize {
        self.points.len() - self.step
    }

    pub fn is_finished(&self) -> bool {
        self.step >= self.points.len()
    }
}

impl Iterator for LocationSimulator {
    type Item = Coordinate;

    /// Advances one tick.
    fn next(&mut self) -> Option<Coordinate> {
        let point = *self.points.get(self.step)?;
        self.step += 1;
        Some(point)
    }
}
