/*
 *  display/composite.rs
 *
 *  travelboard - worth the squeeze
 *  (c) 2020-26 Stuart Hunter
 *
 *  Off-screen composite holding every city row of the travel board
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

use embedded_graphics::{pixelcolor::Rgb888, prelude::*};
use log::{debug, warn};

use crate::aggregator::{CityForecast, Outlook};
use crate::constants::*;
use crate::display::error::PanelError;
use crate::display::overlay::{AnimatedIcon, IconSource, OverlaySet};
use crate::display::Canvas;
use crate::draw;
use crate::units::TemperatureUnits;

/// Composite surface, one 72px row per catalog entry, plus its overlays.
#[derive(Debug)]
pub struct CompositeSurface {
    canvas: Canvas,
    overlays: OverlaySet,
    rows: usize,
}

impl CompositeSurface {
    pub fn new(rows: usize) -> Self {
        Self {
            canvas: Canvas::new(COMPOSITE_WIDTH, rows as u32 * ROW_HEIGHT, draw::BACKGROUND),
            overlays: OverlaySet::new(),
            rows,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn height(&self) -> u32 {
        self.canvas.height() as u32
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn overlays(&self) -> &OverlaySet {
        &self.overlays
    }

    /// Advance icon playback; returns how many icons redrew.
    pub fn tick_overlays(&mut self) -> usize {
        self.overlays.advance_all(&mut self.canvas)
    }

    /// Stop every overlay without touching the pixels.
    pub fn release_overlays(&mut self) {
        self.overlays.release();
    }
}

/// Paints the forecast rows onto a [`CompositeSurface`].
#[derive(Debug, Default, Clone, Copy)]
pub struct CompositeRenderer;

impl CompositeRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Clear and repaint the whole surface from `forecasts`.
    ///
    /// Row `i` always shows `forecasts[i]`. Overlays from the previous render
    /// are released first; a missing icon leaves its row without one.
    pub fn render(
        &self,
        surface: &mut CompositeSurface,
        forecasts: &[CityForecast],
        units: TemperatureUnits,
        icons: &dyn IconSource,
    ) -> Result<(), PanelError> {
        surface.release_overlays();
        if surface.rows != forecasts.len() {
            debug!("composite resized from {} to {} rows", surface.rows, forecasts.len());
            *surface = CompositeSurface::new(forecasts.len());
        }

        let height = surface.height();
        let canvas = &mut surface.canvas;
        canvas.clear(Rgb888::BLACK)?;
        draw::fill_box(canvas, Point::zero(), COMPOSITE_WIDTH, height, draw::BACKGROUND)?;
        // bands repeat down the whole surface however many rows it holds
        for band in 0..height.div_ceil(GRADIENT_BAND_HEIGHT) as i32 {
            let y = band * GRADIENT_BAND_HEIGHT as i32;
            draw::horizontal_gradient(
                canvas,
                0,
                y,
                COMPOSITE_WIDTH as i32,
                y + GRADIENT_BAND_HEIGHT as i32,
                draw::BAND_TOP,
                draw::BAND_BOTTOM,
            )?;
        }

        // built locally so an early return drops and stops them
        let mut overlays = OverlaySet::new();
        for (index, forecast) in forecasts.iter().enumerate() {
            let y = ROW_BASELINE_Y + index as i32 * ROW_HEIGHT as i32;
            draw::draw_text(canvas, &forecast.name, CITY_NAME_X, y, draw::LARGE_FONT, draw::YELLOW)?;

            match forecast.outlook.as_ref() {
                Some(outlook) => {
                    draw_temperatures(canvas, outlook, units, y)?;
                    match icons.frames(&outlook.icon, ICON_MAX_WIDTH) {
                        Ok(frames) => overlays.push(AnimatedIcon::place(
                            frames,
                            Point::new(ICON_X, y - ICON_RAISE),
                            canvas,
                        )),
                        Err(e) => warn!("No icon for {}: {}", forecast.name, e),
                    }
                }
                None => {
                    draw::draw_text(canvas, "NO TRAVEL", PLACEHOLDER_X, y - PLACEHOLDER_LINE_GAP, draw::SMALL_FONT, draw::WHITE)?;
                    draw::draw_text(canvas, "DATA AVAILABLE", PLACEHOLDER_X, y, draw::SMALL_FONT, draw::WHITE)?;
                }
            }
        }

        debug!("composite rendered: {} rows, {} icons", forecasts.len(), overlays.len());
        surface.overlays = overlays;
        Ok(())
    }
}

fn draw_temperatures(canvas: &mut Canvas, outlook: &Outlook, units: TemperatureUnits, y: i32) -> Result<(), PanelError> {
    let low = units.present(outlook.low).to_string();
    let high = units.present(outlook.high).to_string();
    draw::draw_text_right(canvas, &low, LOW_RIGHT_X, y, draw::LARGE_FONT, draw::YELLOW)?;
    draw::draw_text_right(canvas, &high, HIGH_RIGHT_X, y, draw::LARGE_FONT, draw::YELLOW)?;
    Ok(())
}
