//! In-memory map surface and widget host.
//!
//! These stand in for a real map toolkit: they keep what was drawn and
//! project with Web Mercator, which is enough to drive a coordinator
//! without a window.

use std::collections::HashMap;
use std::f64::consts::FRAC_PI_4;
use std::time::Duration;

use crate::eta::EtaBadge;
use crate::geo::{Coordinate, Region, ScreenPoint};
use crate::traits::{MapSurface, RouteOverlay, WidgetHost, WidgetId};

/// A map view of fixed pixel size showing `region`.
#[derive(Debug, Clone)]
pub struct HeadlessMap {
    region: Region,
    width: f64,
    height: f64,
    annotations: Vec<Coordinate>,
    overlays: Vec<RouteOverlay>,
}

impl HeadlessMap {
    pub fn new(region: Region, width: f64, height: f64) -> Self {
        Self {
            region,
            width,
            height,
            annotations: Vec::new(),
            overlays: Vec::new(),
        }
    }

    pub fn annotations(&self) -> &[Coordinate] {
        &self.annotations
    }

    pub fn overlays(&self) -> &[RouteOverlay] {
        &self.overlays
    }

    pub fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }
}

fn mercator_y(latitude: f64) -> f64 {
    (FRAC_PI_4 + latitude.to_radians() / 2.0).tan().ln()
}

impl MapSurface for HeadlessMap {
    fn add_annotation(&mut self, coordinate: Coordinate) {
        self.annotations.push(coordinate);
    }

    fn add_overlay(&mut self, overlay: RouteOverlay) {
        self.overlays.push(overlay);
    }

    fn project(&self, coordinate: Coordinate) -> ScreenPoint {
        let lng_span = self.region.max.longitude - self.region.min.longitude;
        let x = if lng_span > 0.0 {
            (coordinate.longitude - self.region.min.longitude) / lng_span * self.width
        } else {
            self.width / 2.0
        };

        let top = mercator_y(self.region.max.latitude);
        let bottom = mercator_y(self.region.min.latitude);
        let y = if top > bottom {
            (top - mercator_y(coordinate.latitude)) / (top - bottom) * self.height
        } else {
            self.height / 2.0
        };

        ScreenPoint::new(x, y)
    }

    fn visible_region(&self) -> Region {
        self.region
    }

    fn set_visible_region(&mut self, region: Region) {
        self.region = region;
    }
}

/// State of one hosted widget.
#[derive(Debug, Clone, PartialEq)]
pub struct HostedWidget {
    pub label: String,
    pub position: ScreenPoint,
    pub visible: bool,
    pub last_fade: Duration,
}

#[derive(Debug, Default)]
pub struct HeadlessWidgetHost {
    next_id: u64,
    widgets: HashMap<WidgetId, HostedWidget>,
}

impl HeadlessWidgetHost {
    pub fn get(&self, widget: WidgetId) -> Option<&HostedWidget> {
        self.widgets.get(&widget)
    }

    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }

    pub fn labels(&self) -> Vec<String> {
        let mut labels: Vec<String> = self.widgets.values().map(|w| w.label.clone()).collect();
        labels.sort();
        labels
    }
}

impl WidgetHost for HeadlessWidgetHost {
    fn add_widget(&mut self, badge: &EtaBadge) -> WidgetId {
        let id = WidgetId(self.next_id);
        self.next_id += 1;
        self.widgets.insert(
            id,
            HostedWidget {
                label: badge.label(),
                position: ScreenPoint::default(),
                visible: true,
                last_fade: Duration::ZERO,
            },
        );
        id
    }

    fn remove_widget(&mut self, widget: WidgetId) {
        self.widgets.remove(&widget);
    }

    fn set_position(&mut self, widget: WidgetId, point: ScreenPoint) {
        if let Some(hosted) = self.widgets.get_mut(&widget) {
            hosted.position = point;
        }
    }

    fn set_visible(&mut self, widget: WidgetId, visible: bool, fade: Duration) {
        if let Some(hosted) = self.widgets.get_mut(&widget) {
            hosted.visible = visible;
            hosted.last_fade = fade;
        }
    }
}
