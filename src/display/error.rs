/*
 *  display/error.rs
 *
 *  travelboard - worth the squeeze
 *  (c) 2020-26 Stuart Hunter
 *
 *  Error types for the panel subsystem
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

use std::convert::Infallible;
use std::error::Error;
use std::fmt;

use crate::display::traits::PanelState;

/// Error type for panel drawing and lifecycle operations
#[derive(Debug)]
pub enum PanelError {
    /// Operation needs a state the panel is not in
    InvalidState { expected: &'static str, actual: PanelState },

    /// Composite has no rows to draw
    EmptyComposite,

    /// Snapshot could not be encoded or written
    Snapshot(String),
}

impl fmt::Display for PanelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PanelError::InvalidState { expected, actual } =>
                write!(f, "Panel must be {} but is {:?}", expected, actual),
            PanelError::EmptyComposite =>
                write!(f, "Composite surface has no rows"),
            PanelError::Snapshot(msg) =>
                write!(f, "Snapshot error: {}", msg),
        }
    }
}

impl Error for PanelError {}

// framebuffer draws cannot fail
impl From<Infallible> for PanelError {
    fn from(err: Infallible) -> Self {
        match err {}
    }
}
