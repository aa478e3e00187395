/*
 *  vframebuf.rs
 *
 *  travelboard - worth the squeeze
 *	(c) 2020-26 Stuart Hunter
 *
 *	This program is free software: you can redistribute it and/or modify
 *	it under the terms of the GNU General Public License as published by
 *	the Free Software Foundation, either version 3 of the License, or
 *	(at your option) any later version.
 *
 *	This program is distributed in the hope that it will be useful,
 *	but WITHOUT ANY WARRANTY; without even the implied warranty of
 *	MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *	GNU General Public License for more details.
 *
 *	See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *	Public License.
 *
 */

use core::convert::Infallible;
use embedded_graphics::{
    geometry::{OriginDimensions, Size},
    pixelcolor::PixelColor,
    prelude::*,
    primitives::Rectangle,
};

/// Heap backed framebuffer sized at runtime, used for the visible canvas and
/// for composites whose height depends on the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct VarFrameBuf<C: PixelColor> {
    buf: Vec<C>,
    w: usize,
    h: usize,
}

impl<C: PixelColor + Clone> VarFrameBuf<C> {
    pub fn new(width: u32, height: u32, fill: C) -> Self {
        let (w, h) = (width as usize, height as usize);
        Self { buf: vec![fill; w * h], w, h }
    }

    pub fn width(&self) -> usize { self.w }
    pub fn height(&self) -> usize { self.h }

    /// Row-major pixels
    pub fn as_slice(&self) -> &[C] { &self.buf }

    pub fn clear_color(&mut self, color: C) {
        self.buf.fill(color);
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<C> {
        (x < self.w && y < self.h).then(|| self.buf[y * self.w + x])
    }

    /// One full row, top to bottom.
    pub fn row(&self, y: usize) -> Option<&[C]> {
        if y < self.h {
            Some(&self.buf[y * self.w..(y + 1) * self.w])
        } else {
            None
        }
    }

    /// Copy `rows` rows of `src` starting at `src_y` into this buffer at `dst_y`.
    ///
    /// Rows outside either buffer are skipped and widths are cropped to the
    /// narrower of the two, so an out of range request never panics.
    pub fn blit_rows(&mut self, src: &VarFrameBuf<C>, src_y: usize, dst_y: i32, rows: usize) {
        let width = self.w.min(src.w);
        for r in 0..rows {
            let sy = src_y + r;
            let dy = dst_y + r as i32;
            if sy >= src.h || dy < 0 || dy as usize >= self.h {
                continue;
            }
            let dy = dy as usize;
            let s = sy * src.w;
            let d = dy * self.w;
            self.buf[d..d + width].copy_from_slice(&src.buf[s..s + width]);
        }
    }

    #[inline]
    fn offset_of(&self, p: Point) -> Option<usize> {
        let x = usize::try_from(p.x).ok().filter(|x| *x < self.w)?;
        let y = usize::try_from(p.y).ok().filter(|y| *y < self.h)?;
        Some(y * self.w + x)
    }
}

impl<C: PixelColor> OriginDimensions for VarFrameBuf<C> {
    fn size(&self) -> Size {
        Size::new(self.w as u32, self.h as u32)
    }
}

impl<C: PixelColor + Clone> DrawTarget for VarFrameBuf<C> {
    type Color = C;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(p, c) in pixels {
            if let Some(at) = self.offset_of(p) {
                self.buf[at] = c;
            }
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.clear_color(color);
        Ok(())
    }

    fn fill_contiguous<I>(&mut self, area: &Rectangle, colors: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Self::Color>,
    {
        // colors arrive row-major over the whole area, clipped pixels are consumed and dropped
        let Size { width, height } = area.size;
        if width == 0 || height == 0 { return Ok(()); }

        let mut it = colors.into_iter();
        for row in 0..height as i32 {
            for col in 0..width as i32 {
                let Some(c) = it.next() else { return Ok(()); };
                let p = Point::new(area.top_left.x + col, area.top_left.y + row);
                if let Some(at) = self.offset_of(p) {
                    self.buf[at] = c;
                }
            }
        }
        Ok(())
    }
}
