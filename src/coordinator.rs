//! Route and ETA overlay coordinator for one map screen.
//!
//! The coordinator never calls the routing provider itself. It queues
//! [`PendingQuery`] values which the owner runs (see `runtime`) and feeds
//! back as [`Completion`]s, in whatever order they finish. All state is
//! touched only from the thread that owns the coordinator.

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::error::RoutingError;
use crate::eta::{eta_minutes, fastest, EtaBadge};
use crate::geo::{Coordinate, Region};
use crate::overlay::{OverlayOptions, OverlayTracker};
use crate::palette::ColorRegistry;
use crate::selection::{SelectionMachine, Transition};
use crate::traits::{
    MapSurface, RouteId, RouteOverlay, RouteQuery, RouteResult, TravelMode, WidgetHost,
};

/// Stroke width for drawn routes, in points.
pub const ROUTE_LINE_WIDTH: f64 = 4.0;

/// Padding applied around sources and destination when framing the map.
const FIT_PADDING_FRACTION: f64 = 0.15;
const FIT_PADDING_MIN_DEGREES: f64 = 0.005;

/// Why a query was issued, and so what its result is used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryPurpose {
    /// Path to draw; the first alternate is used.
    Geometry,
    /// Badge for a bulk source; the fastest alternate is used.
    BestEta,
    /// Badge for a tapped annotation, valid only while that selection lasts.
    Selection { generation: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingQuery {
    pub purpose: QueryPurpose,
    pub query: RouteQuery,
}

/// A finished provider call.
#[derive(Debug, Clone)]
pub struct Completion {
    pub pending: PendingQuery,
    pub outcome: Result<Vec<RouteResult>, RoutingError>,
}

/// Input events from the map surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MapEvent {
    AnnotationSelected(Coordinate),
    AnnotationDeselected(Coordinate),
    RegionWillChange,
    RegionDidChange,
}

pub struct Coordinator<M, W> {
    destination: Coordinate,
    sources: HashSet<Coordinate>,
    colors: ColorRegistry,
    overlays: OverlayTracker,
    selection: SelectionMachine,
    next_route_id: u64,
    pending: Vec<PendingQuery>,
    map: M,
    host: W,
}

impl<M, W> Coordinator<M, W>
where
    M: MapSurface,
    W: WidgetHost,
{
    /// Creates a coordinator for `destination` with default overlay options.
    pub fn new(destination: Coordinate, map: M, host: W) -> Self {
        Self::with_options(destination, map, host, OverlayOptions::default())
    }

    /// Creates a coordinator with explicit overlay options.
    pub fn with_options(destination: Coordinate, map: M, host: W, options: OverlayOptions) -> Self {
        Self {
            destination,
            sources: HashSet::new(),
            colors: ColorRegistry::new(),
            overlays: OverlayTracker::new(options),
            selection: SelectionMachine::default(),
            next_route_id: 0,
            pending: Vec::new(),
            map,
            host,
        }
    }

    /// Queues the geometry and best-ETA queries for `source`.
    ///
    /// The two queries are independent; either may finish first.
    pub fn add_route(&mut self, source: Coordinate, destination: Coordinate) {
        self.sources.insert(source);
        self.pending.push(PendingQuery {
            purpose: QueryPurpose::Geometry,
            query: RouteQuery {
                source,
                destination,
                mode: TravelMode::Any,
                allow_alternates: true,
            },
        });
        self.pending.push(PendingQuery {
            purpose: QueryPurpose::BestEta,
            query: RouteQuery {
                source,
                destination,
                mode: TravelMode::Driving,
                allow_alternates: true,
            },
        });
    }

    /// Frames the map, pins every source and queues its routes.
    ///
    /// Duplicate sources are pinned twice; their badges share one slot and
    /// the last result to arrive wins.
    pub fn add_routes(&mut self, sources: &[Coordinate], destination: Coordinate) {
        let framed = sources.iter().chain(std::iter::once(&destination));
        if let Some(region) = Region::enclosing(framed) {
            self.map
                .set_visible_region(region.padded(FIT_PADDING_FRACTION, FIT_PADDING_MIN_DEGREES));
        }

        for source in sources {
            self.map.add_annotation(*source);
            self.add_route(*source, destination);
        }
    }

    /// Single entry point for map events.
    pub fn handle_event(&mut self, event: MapEvent) {
        match event {
            MapEvent::AnnotationSelected(annotation) => self.on_select(annotation),
            MapEvent::AnnotationDeselected(annotation) => self.on_deselect(annotation),
            MapEvent::RegionWillChange => self.overlays.hide_all(&mut self.host),
            MapEvent::RegionDidChange => {
                self.overlays.reposition(&self.map, &mut self.host);
                self.overlays.show_all(&mut self.host);
            }
        }
    }

    /// Applies a finished query. Failures and empty results change nothing.
    pub fn complete(&mut self, completion: Completion) {
        let Completion { pending, outcome } = completion;
        let source = pending.query.source;

        let routes = match outcome {
            Ok(routes) if !routes.is_empty() => routes,
            Ok(_) | Err(RoutingError::NoRouteFound) => {
                debug!(?source, purpose = ?pending.purpose, "no route found");
                return;
            }
            Err(err) => {
                warn!(?source, purpose = ?pending.purpose, error = %err, "route query failed");
                return;
            }
        };

        match pending.purpose {
            QueryPurpose::Geometry => self.draw_first(routes),
            QueryPurpose::BestEta => {
                if let Some(best) = fastest(&routes) {
                    let minutes = eta_minutes(best.travel_time_seconds);
                    self.overlays
                        .place(EtaBadge::new(source, minutes), &self.map, &mut self.host);
                }
            }
            QueryPurpose::Selection { generation } => {
                if !self.selection.is_current(source, generation) {
                    debug!(?source, generation, "ignoring route for stale selection");
                    return;
                }
                let minutes = eta_minutes(routes[0].travel_time_seconds);
                self.overlays
                    .place(EtaBadge::new(source, minutes), &self.map, &mut self.host);
            }
        }
    }

    /// Drains queries queued since the last call.
    pub fn take_queries(&mut self) -> Vec<PendingQuery> {
        std::mem::take(&mut self.pending)
    }

    /// Removes every badge and hands the surfaces back.
    pub fn teardown(mut self) -> (M, W) {
        self.overlays.clear(&mut self.host);
        (self.map, self.host)
    }

    /// Returns the fixed destination.
    pub fn destination(&self) -> Coordinate {
        self.destination
    }

    /// Returns every source passed to `add_route`.
    pub fn sources(&self) -> &HashSet<Coordinate> {
        &self.sources
    }

    /// Returns the route colour assignments.
    pub fn colors(&self) -> &ColorRegistry {
        &self.colors
    }

    /// Returns the ETA badge tracker.
    pub fn overlays(&self) -> &OverlayTracker {
        &self.overlays
    }

    /// Returns the selected annotation, if any.
    pub fn selected(&self) -> Option<Coordinate> {
        self.selection.selected()
    }

    /// Returns a reference to the map surface.
    pub fn map(&self) -> &M {
        &self.map
    }

    /// Returns a mutable reference to the map surface.
    pub fn map_mut(&mut self) -> &mut M {
        &mut self.map
    }

    /// Returns a reference to the widget host.
    pub fn host(&self) -> &W {
        &self.host
    }

    fn draw_first(&mut self, mut routes: Vec<RouteResult>) {
        let route = routes.swap_remove(0);
        let id = RouteId(self.next_route_id);
        self.next_route_id += 1;
        let color = self.colors.color_for(id);

        let bounds = route.path.bounds();
        self.map.add_overlay(RouteOverlay {
            id,
            path: route.path,
            color,
            line_width: ROUTE_LINE_WIDTH,
        });

        if let Some(bounds) = bounds {
            let region = self.map.visible_region();
            if !(region.contains(&bounds.min) && region.contains(&bounds.max)) {
                self.map.set_visible_region(region.union(&bounds));
                self.overlays.reposition(&self.map, &mut self.host);
            }
        }
    }

    fn on_select(&mut self, annotation: Coordinate) {
        match self.selection.tap(annotation) {
            Transition::Entered {
                annotation,
                generation,
                previous,
            } => {
                if let Some(previous) = previous {
                    self.drop_selection_badge(previous);
                }
                self.pending.push(PendingQuery {
                    purpose: QueryPurpose::Selection { generation },
                    query: RouteQuery {
                        source: annotation,
                        destination: self.destination,
                        mode: TravelMode::Driving,
                        allow_alternates: false,
                    },
                });
            }
            Transition::Left { annotation } => self.drop_selection_badge(annotation),
            Transition::Unchanged => {}
        }
    }

    fn on_deselect(&mut self, annotation: Coordinate) {
        // Maps emit deselect(old) after select(new) has already moved on.
        if self.selection.selected() != Some(annotation) {
            return;
        }
        if let Transition::Left { annotation } = self.selection.clear() {
            self.drop_selection_badge(annotation);
        }
    }

    /// Removes a selection badge unless it belongs to a bulk source.
    fn drop_selection_badge(&mut self, annotation: Coordinate) {
        if !self.sources.contains(&annotation) {
            self.overlays.remove(&annotation, &mut self.host);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::{HeadlessMap, HeadlessWidgetHost};
    use crate::palette::PALETTE;
    use crate::polyline::Polyline;

    const DEST: Coordinate = Coordinate::new(13.0500, 80.2824);
    const A: Coordinate = Coordinate::new(13.0213, 80.2240);
    const B: Coordinate = Coordinate::new(13.0475, 80.2610);

    fn coordinator() -> Coordinator<HeadlessMap, HeadlessWidgetHost> {
        let map = HeadlessMap::new(
            Region::new(Coordinate::new(13.0, 80.2), Coordinate::new(13.1, 80.3)),
            390.0,
            844.0,
        );
        Coordinator::new(DEST, map, HeadlessWidgetHost::default())
    }

    fn result(source: Coordinate, seconds: f64) -> RouteResult {
        RouteResult {
            path: Polyline::new(vec![source, DEST]),
            travel_time_seconds: seconds,
        }
    }

    fn finish(pending: PendingQuery, outcome: Result<Vec<RouteResult>, RoutingError>) -> Completion {
        Completion { pending, outcome }
    }

    #[test]
    fn test_add_route_queues_geometry_and_eta() {
        let mut c = coordinator();
        c.add_route(A, DEST);
        let queries = c.take_queries();
        assert_eq!(queries.len(), 2);
        assert_eq!(queries[0].purpose, QueryPurpose::Geometry);
        assert_eq!(queries[0].query.mode, TravelMode::Any);
        assert!(queries[0].query.allow_alternates);
        assert_eq!(queries[1].purpose, QueryPurpose::BestEta);
        assert_eq!(queries[1].query.mode, TravelMode::Driving);
        assert!(c.take_queries().is_empty());
    }

    #[test]
    fn test_geometry_draws_first_alternate_with_next_color() {
        let mut c = coordinator();
        c.add_routes(&[A, B], DEST);
        let queries = c.take_queries();

        c.complete(finish(queries[2], Ok(vec![result(B, 300.0), result(A, 100.0)])));
        c.complete(finish(queries[0], Ok(vec![result(A, 200.0)])));

        let overlays = c.map().overlays();
        assert_eq!(overlays.len(), 2);
        assert_eq!(overlays[0].path.first(), Some(B));
        assert_eq!(overlays[0].color, PALETTE[0]);
        assert_eq!(overlays[1].color, PALETTE[1]);
        assert_eq!(overlays[0].line_width, ROUTE_LINE_WIDTH);
    }

    #[test]
    fn test_best_eta_uses_fastest_alternate() {
        let mut c = coordinator();
        c.add_route(A, DEST);
        let queries = c.take_queries();

        c.complete(finish(
            queries[1],
            Ok(vec![result(A, 1500.0), result(A, 719.0), result(A, 900.0)]),
        ));

        let widget = c.overlays().get(&A).unwrap();
        assert_eq!(widget.badge.minutes, 11);
        assert!(c.map().overlays().is_empty());
    }

    #[test]
    fn test_failures_leave_state_untouched() {
        let mut c = coordinator();
        c.add_route(A, DEST);
        let queries = c.take_queries();

        c.complete(finish(queries[0], Err(RoutingError::NoRouteFound)));
        c.complete(finish(
            queries[1],
            Err(RoutingError::ProviderUnavailable("timeout".to_string())),
        ));
        c.complete(finish(queries[1], Ok(Vec::new())));

        assert!(c.map().overlays().is_empty());
        assert!(c.overlays().is_empty());
        assert_eq!(c.colors().assigned(), 0);
    }

    #[test]
    fn test_add_routes_frames_and_pins_sources() {
        let mut c = coordinator();
        c.add_routes(&[A, B], DEST);
        assert_eq!(c.map().annotations(), &[A, B]);
        let region = c.map().visible_region();
        assert!(region.contains(&A) && region.contains(&B) && region.contains(&DEST));
        assert_eq!(c.take_queries().len(), 4);
    }

    #[test]
    fn test_geometry_outside_region_widens_view() {
        let mut c = coordinator();
        c.add_route(A, DEST);
        let queries = c.take_queries();
        let far = Coordinate::new(13.2, 80.4);
        c.complete(finish(
            queries[0],
            Ok(vec![RouteResult {
                path: Polyline::new(vec![A, far, DEST]),
                travel_time_seconds: 600.0,
            }]),
        ));
        assert!(c.map().visible_region().contains(&far));
    }

    #[test]
    fn test_region_events_hide_then_restore() {
        let mut c = coordinator();
        c.add_route(A, DEST);
        let queries = c.take_queries();
        c.complete(finish(queries[1], Ok(vec![result(A, 600.0)])));

        c.handle_event(MapEvent::RegionWillChange);
        assert!(!c.overlays().get(&A).unwrap().visible);

        c.map_mut().set_visible_region(Region::new(
            Coordinate::new(13.01, 80.21),
            Coordinate::new(13.06, 80.29),
        ));
        c.handle_event(MapEvent::RegionDidChange);

        let widget = c.overlays().get(&A).unwrap();
        assert!(widget.visible);
        let projected = c.map().project(A);
        assert_eq!(widget.screen_position.x, projected.x);
        assert_eq!(widget.screen_position.y, projected.y - 50.0);
    }

    #[test]
    fn test_select_issues_single_driving_query() {
        let mut c = coordinator();
        c.handle_event(MapEvent::AnnotationSelected(A));
        let queries = c.take_queries();
        assert_eq!(queries.len(), 1);
        assert_eq!(queries[0].query.source, A);
        assert_eq!(queries[0].query.destination, DEST);
        assert_eq!(queries[0].query.mode, TravelMode::Driving);
        assert!(!queries[0].query.allow_alternates);
        assert_eq!(c.selected(), Some(A));
    }

    #[test]
    fn test_selection_uses_first_route_not_fastest() {
        let mut c = coordinator();
        c.handle_event(MapEvent::AnnotationSelected(A));
        let queries = c.take_queries();
        c.complete(finish(queries[0], Ok(vec![result(A, 900.0), result(A, 60.0)])));
        assert_eq!(c.overlays().get(&A).unwrap().badge.minutes, 15);
    }

    #[test]
    fn test_stale_selection_does_not_overwrite_new_one() {
        let mut c = coordinator();
        c.handle_event(MapEvent::AnnotationSelected(A));
        let stale = c.take_queries()[0];
        c.handle_event(MapEvent::AnnotationSelected(B));
        c.handle_event(MapEvent::AnnotationDeselected(A));
        let fresh = c.take_queries()[0];

        c.complete(finish(fresh, Ok(vec![result(B, 240.0)])));
        c.complete(finish(stale, Ok(vec![result(A, 600.0)])));

        assert_eq!(c.selected(), Some(B));
        assert_eq!(c.overlays().len(), 1);
        assert_eq!(c.overlays().get(&B).unwrap().badge.minutes, 4);
        assert!(c.overlays().get(&A).is_none());
    }

    #[test]
    fn test_deselect_clears_selection_badge_only() {
        let mut c = coordinator();
        c.add_route(B, DEST);
        let bulk = c.take_queries();
        c.complete(finish(bulk[1], Ok(vec![result(B, 300.0)])));

        c.handle_event(MapEvent::AnnotationSelected(A));
        let selected = c.take_queries()[0];
        c.complete(finish(selected, Ok(vec![result(A, 600.0)])));
        assert_eq!(c.overlays().len(), 2);

        c.handle_event(MapEvent::AnnotationDeselected(A));
        assert_eq!(c.selected(), None);
        assert!(c.overlays().get(&A).is_none());
        assert!(c.overlays().get(&B).is_some());
    }

    #[test]
    fn test_deselecting_bulk_source_keeps_its_badge() {
        let mut c = coordinator();
        c.add_routes(&[A], DEST);
        let bulk = c.take_queries();
        c.complete(finish(bulk[1], Ok(vec![result(A, 300.0)])));

        c.handle_event(MapEvent::AnnotationSelected(A));
        c.handle_event(MapEvent::AnnotationSelected(A));
        assert_eq!(c.selected(), None);
        assert!(c.overlays().get(&A).is_some());
    }

    #[test]
    fn test_teardown_removes_widgets() {
        let mut c = coordinator();
        c.add_routes(&[A, B], DEST);
        let queries = c.take_queries();
        c.complete(finish(queries[1], Ok(vec![result(A, 300.0)])));
        c.complete(finish(queries[3], Ok(vec![result(B, 300.0)])));
        assert_eq!(c.host().len(), 2);

        let (_map, host) = c.teardown();
        assert!(host.is_empty());
    }
}
