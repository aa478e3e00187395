/*
 *  display/projector.rs
 *
 *  travelboard - worth the squeeze
 *  (c) 2020-26 Stuart Hunter
 *
 *  Projects the scrolling slice of the composite onto the visible canvas
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

use embedded_graphics::prelude::*;

use crate::constants::{COMPOSITE_WIDTH, SCROLL_LEAD, VIEWPORT_HEIGHT, VIEWPORT_Y};
use crate::display::Canvas;
use crate::draw;

/// Maps the pacing counter to a composite offset and copies that slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollProjector {
    lead: i64,
    viewport_y: i32,
    viewport_height: u32,
}

impl Default for ScrollProjector {
    fn default() -> Self {
        Self {
            lead: SCROLL_LEAD,
            viewport_y: VIEWPORT_Y,
            viewport_height: VIEWPORT_HEIGHT,
        }
    }
}

impl ScrollProjector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn viewport_height(&self) -> u32 {
        self.viewport_height
    }

    /// Largest offset that still fills the viewport; zero for short composites.
    pub fn max_offset(&self, composite_height: u32) -> u32 {
        composite_height.saturating_sub(self.viewport_height)
    }

    /// Offset into the composite for `counter`.
    ///
    /// Holds at zero for the lead-in, then moves one pixel per unit until the
    /// last full viewport, where it stays.
    pub fn offset_for(&self, counter: i64, composite_height: u32) -> u32 {
        let max = self.max_offset(composite_height) as i64;
        counter.saturating_sub(self.lead).clamp(0, max) as u32
    }

    /// Project the slice for `counter`, returning the offset used.
    pub fn project(&self, composite: &Canvas, visible: &mut Canvas, counter: i64) -> u32 {
        let offset = self.offset_for(counter, composite.height() as u32);
        self.blit(composite, visible, offset);
        offset
    }

    /// Copy composite rows `[offset, offset + viewport)` to the viewport.
    ///
    /// Viewport rows the composite cannot fill are painted background, so the
    /// result depends only on the offset.
    pub fn blit(&self, composite: &Canvas, visible: &mut Canvas, offset: u32) {
        let available = (composite.height() as u32).saturating_sub(offset).min(self.viewport_height);
        if available < self.viewport_height {
            let _ = draw::fill_box(
                visible,
                Point::new(0, self.viewport_y + available as i32),
                COMPOSITE_WIDTH,
                self.viewport_height - available,
                draw::BACKGROUND,
            );
        }
        visible.blit_rows(composite, offset as usize, self.viewport_y, available as usize);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{CANVAS_HEIGHT, CANVAS_WIDTH, ROW_HEIGHT};
    use embedded_graphics::pixelcolor::Rgb888;

    /// Composite whose row y is coloured by y, so slices are recognisable.
    fn striped(rows: u32) -> Canvas {
        let height = rows * ROW_HEIGHT;
        let mut c = Canvas::new(COMPOSITE_WIDTH, height, Rgb888::BLACK);
        for y in 0..height as i32 {
            let color = Rgb888::new((y % 256) as u8, (y / 256) as u8, 7);
            draw::fill_box(&mut c, Point::new(0, y), COMPOSITE_WIDTH, 1, color).unwrap();
        }
        c
    }

    fn visible() -> Canvas {
        Canvas::new(CANVAS_WIDTH, CANVAS_HEIGHT, Rgb888::BLACK)
    }

    #[test]
    fn test_offset_bounds_hold_for_all_counters() {
        let p = ScrollProjector::new();
        for rows in [0u32, 1, 4, 5, 20, 24] {
            let h = rows * ROW_HEIGHT;
            let max = h.saturating_sub(VIEWPORT_HEIGHT);
            for counter in [-1_000i64, -1, 0, 149, 150, 151, 400, 1_000, 100_000, i64::MAX] {
                let offset = p.offset_for(counter, h);
                assert!(offset <= max, "rows {} counter {} offset {}", rows, counter, offset);
            }
        }
        assert_eq!(p.offset_for(i64::MIN, 20 * ROW_HEIGHT), 0);
    }

    #[test]
    fn test_offset_follows_counter_after_lead() {
        let p = ScrollProjector::new();
        let h = 20 * ROW_HEIGHT;
        assert_eq!(p.offset_for(150, h), 0);
        assert_eq!(p.offset_for(151, h), 1);
        assert_eq!(p.offset_for(150 + 288, h), 288);
        assert_eq!(p.offset_for(1_000_000, h), h - VIEWPORT_HEIGHT);
    }

    #[test]
    fn test_counter_zero_shows_first_page() {
        let composite = striped(20);
        let mut screen = visible();
        assert_eq!(ScrollProjector::new().project(&composite, &mut screen, 0), 0);
        for y in 0..VIEWPORT_HEIGHT as usize {
            assert_eq!(screen.row(VIEWPORT_Y as usize + y), composite.row(y));
        }
    }

    #[test]
    fn test_far_counter_shows_last_full_page() {
        let composite = striped(20);
        let mut screen = visible();
        let offset = ScrollProjector::new().project(&composite, &mut screen, 50_000);
        assert_eq!(offset, 20 * ROW_HEIGHT - VIEWPORT_HEIGHT);
        let last = composite.height() - 1;
        assert_eq!(
            screen.row(VIEWPORT_Y as usize + VIEWPORT_HEIGHT as usize - 1),
            composite.row(last)
        );
    }

    #[test]
    fn test_short_composite_pads_viewport() {
        let composite = striped(2);
        let mut screen = visible();
        assert_eq!(ScrollProjector::new().project(&composite, &mut screen, 10_000), 0);
        let below = VIEWPORT_Y as usize + 2 * ROW_HEIGHT as usize;
        assert_eq!(screen.pixel(0, below), Some(draw::BACKGROUND));
        // nothing outside the viewport is touched
        assert_eq!(screen.pixel(0, VIEWPORT_Y as usize - 1), Some(Rgb888::BLACK));
        assert_eq!(screen.pixel(0, (VIEWPORT_Y as u32 + VIEWPORT_HEIGHT) as usize), Some(Rgb888::BLACK));
    }

    #[test]
    fn test_projection_is_idempotent() {
        let composite = striped(20);
        let p = ScrollProjector::new();
        let mut once = visible();
        p.project(&composite, &mut once, 612);
        let mut twice = once.clone();
        p.project(&composite, &mut twice, 612);
        assert_eq!(once, twice);
    }
}
