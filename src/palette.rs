//! Route colour palette and per-route colour assignment.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::traits::RouteId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RouteColor {
    Blue,
    Red,
    Green,
    Orange,
    Purple,
    Teal,
}

/// Fixed palette, cycled in this order.
pub const PALETTE: [RouteColor; 6] = [
    RouteColor::Blue,
    RouteColor::Red,
    RouteColor::Green,
    RouteColor::Orange,
    RouteColor::Purple,
    RouteColor::Teal,
];

impl RouteColor {
    /// Stroke colour as `#rrggbb`.
    pub fn hex(&self) -> &'static str {
        match self {
            RouteColor::Blue => "#007aff",
            RouteColor::Red => "#ff3b30",
            RouteColor::Green => "#34c759",
            RouteColor::Orange => "#ff9500",
            RouteColor::Purple => "#af52de",
            RouteColor::Teal => "#30b0c7",
        }
    }
}

/// Round-robin colour assignment keyed by route identity.
///
/// The index only grows; colours repeat once more routes exist than
/// palette entries.
#[derive(Debug, Default)]
pub struct ColorRegistry {
    colors: HashMap<RouteId, RouteColor>,
    next_index: usize,
}

impl ColorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Colour for `route`, assigning the next palette entry on first sight.
    pub fn color_for(&mut self, route: RouteId) -> RouteColor {
        if let Some(color) = self.colors.get(&route) {
            return *color;
        }
        let color = PALETTE[self.next_index % PALETTE.len()];
        self.next_index = self.next_index.wrapping_add(1);
        self.colors.insert(route, color);
        color
    }

    /// Stored colour without assigning one.
    pub fn get(&self, route: RouteId) -> Option<RouteColor> {
        self.colors.get(&route).copied()
    }

    /// Number of colours handed out so far.
    pub fn assigned(&self) -> usize {
        self.next_index
    }
}
