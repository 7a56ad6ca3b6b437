//! Test fixtures for route-overlay.
//!
//! Provides:
//! - Real Chennai event locations and the HQ destination
//! - A scripted routing provider with per-source results and delays
//! - Headless surface builders

pub mod chennai_locations;
pub mod scripted;

pub use chennai_locations::*;
pub use scripted::*;
