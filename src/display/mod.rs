/*
 *  display/mod.rs
 *
 *  travelboard - worth the squeeze
 *  (c) 2020-26 Stuart Hunter
 *
 *  Display subsystem - panels, composite surfaces and icon overlays
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *  Public License.
 *
 */

use embedded_graphics::pixelcolor::Rgb888;

use crate::vframebuf::VarFrameBuf;

// Core trait definitions
pub mod traits;
pub mod error;

// Animated icon overlays
pub mod overlay;

// Off-screen composite and its projection
pub mod composite;
pub mod projector;

// Panels
pub mod travel;

pub mod snapshot;

/// Full colour drawing surface used for both the visible canvas and composites.
pub type Canvas = VarFrameBuf<Rgb888>;

// Re-exports for convenience
pub use traits::{BoxFuture, Panel, PanelState};
pub use error::PanelError;
pub use overlay::{AnimatedIcon, IconSource, OverlaySet};
pub use composite::{CompositeRenderer, CompositeSurface};
pub use projector::ScrollProjector;
pub use travel::{travel_day_name, CommitOutcome, RefreshTicket, TravelForecastPanel};
