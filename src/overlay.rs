//! Screen-space placement of floating ETA badges.
//!
//! Each badge is anchored to a source coordinate. Badges are hidden while
//! the map is being dragged or zoomed and snapped back into place once the
//! region settles, instead of being moved every frame.

use std::collections::HashMap;
use std::time::Duration;

use tracing::debug;

use crate::eta::EtaBadge;
use crate::geo::{Coordinate, ScreenPoint};
use crate::traits::{MapSurface, WidgetHost, WidgetId};

#[derive(Debug, Clone)]
pub struct OverlayOptions {
    /// Added to the projected anchor's y. Negative places the badge above the pin.
    pub vertical_offset: f64,
    /// Fade duration for hide/show.
    pub fade: Duration,
}

impl Default for OverlayOptions {
    fn default() -> Self {
        Self {
            vertical_offset: -50.0,
            fade: Duration::from_millis(250),
        }
    }
}

/// A badge currently hosted on screen.
#[derive(Debug, Clone, PartialEq)]
pub struct EtaWidget {
    pub widget: WidgetId,
    pub badge: EtaBadge,
    pub screen_position: ScreenPoint,
    pub visible: bool,
}

#[derive(Debug, Default)]
pub struct OverlayTracker {
    widgets: HashMap<Coordinate, EtaWidget>,
    options: OverlayOptions,
    interacting: bool,
}

impl OverlayTracker {
    /// Creates an empty tracker with the given placement options.
    pub fn new(options: OverlayOptions) -> Self {
        Self {
            widgets: HashMap::new(),
            options,
            interacting: false,
        }
    }

    /// Returns the placement options.
    pub fn options(&self) -> &OverlayOptions {
        &self.options
    }

    /// Hosts `badge` at its anchor, replacing any widget already there.
    ///
    /// A badge placed mid-gesture starts hidden and appears with the rest
    /// on the next [`show_all`](Self::show_all).
    pub fn place<M, W>(&mut self, badge: EtaBadge, map: &M, host: &mut W) -> WidgetId
    where
        M: MapSurface,
        W: WidgetHost,
    {
        let anchor = badge.anchor;
        if let Some(previous) = self.widgets.remove(&anchor) {
            debug!(?anchor, widget = previous.widget.0, "replacing ETA widget");
            host.remove_widget(previous.widget);
        }

        let widget = host.add_widget(&badge);
        let screen_position = self.position_for(anchor, map);
        host.set_position(widget, screen_position);

        let visible = !self.interacting;
        if !visible {
            host.set_visible(widget, false, Duration::ZERO);
        }

        self.widgets.insert(
            anchor,
            EtaWidget {
                widget,
                badge,
                screen_position,
                visible,
            },
        );
        widget
    }

    /// Reprojects every anchor for the map's current region.
    pub fn reposition<M, W>(&mut self, map: &M, host: &mut W)
    where
        M: MapSurface,
        W: WidgetHost,
    {
        let offset = self.options.vertical_offset;
        for (anchor, entry) in self.widgets.iter_mut() {
            let point = map.project(*anchor);
            entry.screen_position = ScreenPoint::new(point.x, point.y + offset);
            host.set_position(entry.widget, entry.screen_position);
        }
    }

    /// Fades every widget out. Called when the visible region starts changing.
    pub fn hide_all<W: WidgetHost>(&mut self, host: &mut W) {
        self.interacting = true;
        for entry in self.widgets.values_mut() {
            entry.visible = false;
            host.set_visible(entry.widget, false, self.options.fade);
        }
    }

    /// Fades every widget back in. Called once the region settles.
    pub fn show_all<W: WidgetHost>(&mut self, host: &mut W) {
        self.interacting = false;
        for entry in self.widgets.values_mut() {
            entry.visible = true;
            host.set_visible(entry.widget, true, self.options.fade);
        }
    }

    /// Removes the widget anchored at `anchor`, returning whether one existed.
    pub fn remove<W: WidgetHost>(&mut self, anchor: &Coordinate, host: &mut W) -> bool {
        match self.widgets.remove(anchor) {
            Some(entry) => {
                host.remove_widget(entry.widget);
                true
            }
            None => false,
        }
    }

    /// Removes every hosted widget.
    pub fn clear<W: WidgetHost>(&mut self, host: &mut W) {
        for (_, entry) in self.widgets.drain() {
            host.remove_widget(entry.widget);
        }
    }

    /// Returns the widget anchored at `anchor`.
    pub fn get(&self, anchor: &Coordinate) -> Option<&EtaWidget> {
        self.widgets.get(anchor)
    }

    /// Iterates over every anchored widget.
    pub fn iter(&self) -> impl Iterator<Item = (&Coordinate, &EtaWidget)> {
        self.widgets.iter()
    }

    /// Number of hosted widgets.
    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }

    /// Whether a pan or zoom gesture is in progress.
    pub fn is_interacting(&self) -> bool {
        self.interacting
    }

    fn position_for<M: MapSurface>(&self, anchor: Coordinate, map: &M) -> ScreenPoint {
        let point = map.project(anchor);
        ScreenPoint::new(point.x, point.y + self.options.vertical_offset)
    }
}
