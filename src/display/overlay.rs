/*
 *  display/overlay.rs
 *
 *  travelboard - worth the squeeze
 *  (c) 2020-26 Stuart Hunter
 *
 *  Animated icon overlays placed on the composite surface
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
use log::debug;
use std::sync::Arc;

use crate::display::Canvas;
use crate::draw::lerp;
use crate::icons::IconRef;
use crate::svgimage::{IconError, IconFrame};

/// Supplies rendered icon frames, scaled to fit `max_width`.
pub trait IconSource: Send + Sync {
    fn frames(&self, icon: &IconRef, max_width: u32) -> Result<Arc<Vec<IconFrame>>, IconError>;
}

/// One icon placed on a composite, cycling through its frames.
///
/// The pixels underneath are captured on placement so each frame is drawn
/// over the clean backdrop rather than over the previous frame.
#[derive(Debug)]
pub struct AnimatedIcon {
    frames: Arc<Vec<IconFrame>>,
    origin: Point,
    backdrop: Vec<Rgb888>,
    area: Size,
    frame: usize,
    playing: bool,
}

impl AnimatedIcon {
    /// Place the icon at `origin` and draw its first frame.
    pub fn place(frames: Arc<Vec<IconFrame>>, origin: Point, surface: &mut Canvas) -> Self {
        let area = frames.iter().fold(Size::zero(), |acc, f| {
            Size::new(acc.width.max(f.width), acc.height.max(f.height))
        });
        let mut backdrop = Vec::with_capacity((area.width * area.height) as usize);
        for y in 0..area.height as i32 {
            for x in 0..area.width as i32 {
                backdrop.push(pixel_at(surface, origin + Point::new(x, y)).unwrap_or(Rgb888::BLACK));
            }
        }
        let icon = Self { frames, origin, backdrop, area, frame: 0, playing: true };
        icon.draw_current(surface);
        icon
    }

    pub fn origin(&self) -> Point {
        self.origin
    }

    pub fn frame_index(&self) -> usize {
        self.frame
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Move to the next frame and draw it. Returns whether anything changed.
    pub fn advance(&mut self, surface: &mut Canvas) -> bool {
        if !self.playing || self.frames.len() < 2 {
            return false;
        }
        self.frame = (self.frame + 1) % self.frames.len();
        self.draw_current(surface);
        true
    }

    pub fn stop(&mut self) {
        self.playing = false;
    }

    fn draw_current(&self, surface: &mut Canvas) {
        let Some(frame) = self.frames.get(self.frame) else { return };
        let w = self.area.width as usize;
        let backdrop = self.backdrop.iter().enumerate().map(|(i, c)| {
            Pixel(self.origin + Point::new((i % w) as i32, (i / w) as i32), *c)
        });
        let _ = surface.draw_iter(backdrop);

        let fw = frame.width as usize;
        let blended = frame.pixels.iter().enumerate().filter_map(|(i, (color, alpha))| {
            if *alpha == 0 {
                return None;
            }
            let offset = Point::new((i % fw) as i32, (i / fw) as i32);
            let under = self.backdrop[(offset.y as usize) * w + offset.x as usize];
            Some(Pixel(self.origin + offset, lerp(under, *color, *alpha as f32 / 255.0)))
        });
        let _ = surface.draw_iter(blended);
    }
}

fn pixel_at(surface: &Canvas, p: Point) -> Option<Rgb888> {
    if p.x < 0 || p.y < 0 {
        return None;
    }
    surface.pixel(p.x as usize, p.y as usize)
}

/// Every overlay attached to one composite.
///
/// Released before the composite is redrawn and again on drop, so no
/// animation outlives the surface it was placed on.
#[derive(Debug, Default)]
pub struct OverlaySet {
    icons: Vec<AnimatedIcon>,
}

impl OverlaySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, icon: AnimatedIcon) {
        self.icons.push(icon);
    }

    pub fn len(&self) -> usize {
        self.icons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.icons.is_empty()
    }

    pub fn icons(&self) -> &[AnimatedIcon] {
        &self.icons
    }

    pub fn playing(&self) -> usize {
        self.icons.iter().filter(|i| i.is_playing()).count()
    }

    /// Advance every playing icon, returns how many redrew.
    pub fn advance_all(&mut self, surface: &mut Canvas) -> usize {
        self.icons.iter_mut().filter_map(|i| i.advance(surface).then_some(())).count()
    }

    /// Stop and forget every overlay.
    pub fn release(&mut self) {
        if self.icons.is_empty() {
            return;
        }
        for icon in self.icons.iter_mut() {
            icon.stop();
        }
        debug!("released {} icon overlays", self.icons.len());
        self.icons.clear();
    }
}

impl Drop for OverlaySet {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_frames() -> Arc<Vec<IconFrame>> {
        Arc::new(vec![
            IconFrame::solid(2, 2, Rgb888::RED),
            IconFrame::solid(2, 2, Rgb888::GREEN),
        ])
    }

    #[test]
    fn test_place_draws_first_frame() {
        let mut surface = Canvas::new(10, 10, Rgb888::BLUE);
        let icon = AnimatedIcon::place(two_frames(), Point::new(3, 4), &mut surface);
        assert!(icon.is_playing());
        assert_eq!(surface.pixel(3, 4), Some(Rgb888::RED));
        assert_eq!(surface.pixel(4, 5), Some(Rgb888::RED));
        assert_eq!(surface.pixel(5, 4), Some(Rgb888::BLUE));
    }

    #[test]
    fn test_advance_cycles_frames() {
        let mut surface = Canvas::new(10, 10, Rgb888::BLUE);
        let mut icon = AnimatedIcon::place(two_frames(), Point::new(0, 0), &mut surface);
        assert!(icon.advance(&mut surface));
        assert_eq!(surface.pixel(0, 0), Some(Rgb888::GREEN));
        assert!(icon.advance(&mut surface));
        assert_eq!(icon.frame_index(), 0);
        assert_eq!(surface.pixel(1, 1), Some(Rgb888::RED));
    }

    #[test]
    fn test_transparent_pixels_keep_backdrop() {
        let mut surface = Canvas::new(4, 4, Rgb888::BLUE);
        let frame = IconFrame {
            width: 2,
            height: 1,
            pixels: vec![(Rgb888::RED, 0), (Rgb888::RED, 255)],
        };
        AnimatedIcon::place(Arc::new(vec![frame]), Point::new(0, 0), &mut surface);
        assert_eq!(surface.pixel(0, 0), Some(Rgb888::BLUE));
        assert_eq!(surface.pixel(1, 0), Some(Rgb888::RED));
    }

    #[test]
    fn test_stopped_icon_does_not_advance() {
        let mut surface = Canvas::new(4, 4, Rgb888::BLUE);
        let mut icon = AnimatedIcon::place(two_frames(), Point::new(0, 0), &mut surface);
        icon.stop();
        assert!(!icon.advance(&mut surface));
        assert_eq!(surface.pixel(0, 0), Some(Rgb888::RED));
    }

    #[test]
    fn test_release_stops_everything() {
        let mut surface = Canvas::new(8, 8, Rgb888::BLUE);
        let mut set = OverlaySet::new();
        set.push(AnimatedIcon::place(two_frames(), Point::new(0, 0), &mut surface));
        set.push(AnimatedIcon::place(two_frames(), Point::new(4, 4), &mut surface));
        assert_eq!(set.advance_all(&mut surface), 2);
        assert_eq!(set.playing(), 2);

        set.release();
        assert!(set.is_empty());
        assert_eq!(set.advance_all(&mut surface), 0);
    }

    #[test]
    fn test_clipped_placement_does_not_panic() {
        let mut surface = Canvas::new(4, 4, Rgb888::BLUE);
        let mut icon = AnimatedIcon::place(two_frames(), Point::new(3, -1), &mut surface);
        assert_eq!(surface.pixel(3, 0), Some(Rgb888::RED));
        icon.advance(&mut surface);
        assert_eq!(surface.pixel(3, 0), Some(Rgb888::GREEN));
    }
}
