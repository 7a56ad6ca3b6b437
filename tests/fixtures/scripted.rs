//! Scripted routing provider.

use std::collections::HashMap;
use std::sync::Mutex;
use std::thread;
use std::time::Duration;

use route_overlay::error::RoutingError;
use route_overlay::geo::{Coordinate, Region};
use route_overlay::headless::{HeadlessMap, HeadlessWidgetHost};
use route_overlay::polyline::Polyline;
use route_overlay::traits::{RouteQuery, RouteResult, RoutingProvider, TravelMode};

/// Answers each source with a fixed list of alternates (travel times in
/// seconds), optionally after a delay. Unknown sources get `NoRouteFound`.
#[derive(Default)]
pub struct ScriptedProvider {
    answers: HashMap<Coordinate, Result<Vec<f64>, RoutingError>>,
    delays: HashMap<Coordinate, Duration>,
    calls: Mutex<Vec<(Coordinate, TravelMode, bool)>>,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answer(mut self, source: Coordinate, travel_times: &[f64]) -> Self {
        self.answers.insert(source, Ok(travel_times.to_vec()));
        self
    }

    pub fn fail(mut self, source: Coordinate, error: RoutingError) -> Self {
        self.answers.insert(source, Err(error));
        self
    }

    pub fn delay(mut self, source: Coordinate, delay: Duration) -> Self {
        self.delays.insert(source, delay);
        self
    }

    pub fn calls(&self) -> Vec<(Coordinate, TravelMode, bool)> {
        self.calls.lock().map(|calls| calls.clone()).unwrap_or_default()
    }
}

impl RoutingProvider for ScriptedProvider {
    fn route(&self, query: &RouteQuery) -> Result<Vec<RouteResult>, RoutingError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push((query.source, query.mode, query.allow_alternates));
        }
        if let Some(delay) = self.delays.get(&query.source) {
            thread::sleep(*delay);
        }

        let times = self
            .answers
            .get(&query.source)
            .cloned()
            .unwrap_or(Err(RoutingError::NoRouteFound))?;
        let take = if query.allow_alternates { times.len() } else { 1 };

        Ok(times
            .into_iter()
            .take(take)
            .enumerate()
            .map(|(i, seconds)| {
                // Alternates fan out slightly so their geometries differ.
                let via = Coordinate::new(
                    (query.source.latitude + query.destination.latitude) / 2.0 + i as f64 * 0.001,
                    (query.source.longitude + query.destination.longitude) / 2.0,
                );
                RouteResult {
                    path: Polyline::new(vec![query.source, via, query.destination]),
                    travel_time_seconds: seconds,
                }
            })
            .collect())
    }
}

pub fn headless_map(region: Region) -> HeadlessMap {
    HeadlessMap::new(region, 390.0, 844.0)
}

pub fn widget_host() -> HeadlessWidgetHost {
    HeadlessWidgetHost::default()
}
