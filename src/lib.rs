//! route-overlay
//!
//! Draws routes from several sources to one destination on a map, colours
//! them from a fixed palette and keeps floating ETA badges pinned to their
//! sources while the map moves.

pub mod geo;
pub mod error;
pub mod traits;
pub mod polyline;
pub mod palette;
pub mod eta;
pub mod overlay;
pub mod selection;
pub mod coordinator;
pub mod registry;
pub mod runtime;
pub mod osrm;
pub mod haversine;
pub mod headless;
pub mod simulation;
