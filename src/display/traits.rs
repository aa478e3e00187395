/*
 *  display/traits.rs
 *
 *  travelboard - worth the squeeze
 *  (c) 2020-26 Stuart Hunter
 *
 *  Core trait definitions for host driven panels
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

use std::future::Future;
use std::pin::Pin;

use crate::display::error::PanelError;
use crate::display::Canvas;
use crate::schedule::DwellSchedule;

/// Boxed future returned by [`Panel::get_data`], keeps the trait dyn compatible.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Lifecycle of a panel within one activation cycle.
///
/// `Inactive -> AwaitingData -> NoData | Ready -> Visible`, and back to
/// `Inactive` on deactivation from any state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelState {
    Inactive,
    AwaitingData,
    /// Every city failed; the host skips the panel for this cycle
    NoData,
    Ready,
    Visible,
}

impl PanelState {
    pub fn is_active(&self) -> bool {
        !matches!(self, PanelState::Inactive)
    }

    pub fn has_composite(&self) -> bool {
        matches!(self, PanelState::Ready | PanelState::Visible)
    }
}

/// A rotating display panel driven by the host.
///
/// The host activates the panel, awaits its data, shows it, then feeds it
/// the pacing counter and screen index until the dwell schedule runs out.
pub trait Panel: Send {
    /// Short name used in log lines
    fn name(&self) -> &str;

    fn state(&self) -> PanelState;

    /// Dwell schedule the host paces this panel with
    fn timing(&self) -> &DwellSchedule;

    /// Start a new activation cycle
    fn activate(&mut self);

    /// End the cycle; results of fetches still in flight are discarded
    fn deactivate(&mut self);

    /// Refresh all data, resolving to the state reached afterwards
    fn get_data(&mut self) -> BoxFuture<'_, PanelState>;

    /// Full redraw of the visible canvas
    fn draw_canvas(&mut self) -> Result<(), PanelError>;

    /// Draw and mark the panel visible
    fn show_canvas(&mut self) -> Result<(), PanelError>;

    fn screen_index_change(&mut self, screen_index: usize);

    /// The pacing counter moved; reproject the visible viewport
    fn base_count_change(&mut self, count: i64);

    /// Advance any running animations by one frame
    fn tick(&mut self) {}

    /// The visible canvas as last drawn
    fn canvas(&self) -> &Canvas;
}
