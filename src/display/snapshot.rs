/*
 *  display/snapshot.rs
 *
 *  travelboard - worth the squeeze
 *  (c) 2020-26 Stuart Hunter
 *
 *  PNG snapshots of a canvas
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

use embedded_graphics::pixelcolor::RgbColor;
use log::info;
use std::path::Path;
use tiny_skia::Pixmap;

use crate::display::error::PanelError;
use crate::display::Canvas;

/// Copy the canvas into an opaque pixmap.
pub fn to_pixmap(canvas: &Canvas) -> Result<Pixmap, PanelError> {
    let (w, h) = (canvas.width() as u32, canvas.height() as u32);
    let mut pixmap = Pixmap::new(w, h)
        .ok_or_else(|| PanelError::Snapshot(format!("cannot create {}x{} pixmap", w, h)))?;
    for (px, c) in pixmap.data_mut().chunks_exact_mut(4).zip(canvas.as_slice()) {
        px.copy_from_slice(&[c.r(), c.g(), c.b(), 255]);
    }
    Ok(pixmap)
}

pub fn save_png(canvas: &Canvas, path: &Path) -> Result<(), PanelError> {
    to_pixmap(canvas)?
        .save_png(path)
        .map_err(|e| PanelError::Snapshot(format!("{}: {}", path.display(), e)))?;
    info!("snapshot written to {}", path.display());
    Ok(())
}
