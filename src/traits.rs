//! Capability traits the coordinator is written against.
//!
//! The map surface, the widget host and the routing provider are all
//! external. Concrete apps implement these for their own map toolkit and
//! directions backend; `headless`, `osrm` and `haversine` hold the
//! implementations shipped with the crate.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::RoutingError;
use crate::eta::EtaBadge;
use crate::geo::{Coordinate, Region, ScreenPoint};
use crate::palette::RouteColor;
use crate::polyline::Polyline;

/// Transport mode requested from the routing provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TravelMode {
    Driving,
    Any,
}

/// A request for a path between two points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteQuery {
    pub source: Coordinate,
    pub destination: Coordinate,
    pub mode: TravelMode,
    pub allow_alternates: bool,
}

/// One candidate path returned by the provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteResult {
    pub path: Polyline,
    pub travel_time_seconds: f64,
}

/// Directions backend.
///
/// Calls are blocking from the caller's point of view; the event loop runs
/// them off the UI thread. An empty `Ok` list and `Err(NoRouteFound)` mean
/// the same thing to the coordinator.
pub trait RoutingProvider: Send + Sync {
    fn route(&self, query: &RouteQuery) -> Result<Vec<RouteResult>, RoutingError>;
}

/// Identity of a drawn route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RouteId(pub u64);

/// A route geometry tagged for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteOverlay {
    pub id: RouteId,
    pub path: Polyline,
    pub color: RouteColor,
    pub line_width: f64,
}

/// The map rendering surface.
pub trait MapSurface {
    fn add_annotation(&mut self, coordinate: Coordinate);

    fn add_overlay(&mut self, overlay: RouteOverlay);

    /// World to screen projection for the current visible region.
    fn project(&self, coordinate: Coordinate) -> ScreenPoint;

    fn visible_region(&self) -> Region;

    fn set_visible_region(&mut self, region: Region);
}

/// Handle to a widget owned by a [`WidgetHost`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WidgetId(pub u64);

/// The surface floating ETA badges are layered onto.
pub trait WidgetHost {
    fn add_widget(&mut self, badge: &EtaBadge) -> WidgetId;

    fn remove_widget(&mut self, widget: WidgetId);

    fn set_position(&mut self, widget: WidgetId, point: ScreenPoint);

    /// Shows or hides a widget, animating over `fade`.
    fn set_visible(&mut self, widget: WidgetId, visible: bool, fade: Duration);
}
