use embedded_graphics::{
    mono_font::{
        ascii::{FONT_10X20, FONT_9X15_BOLD},
        MonoFont, MonoTextStyle,
    },
    pixelcolor::Rgb888,
    prelude::*,
    primitives::{PrimitiveStyle, Rectangle, Triangle},
    text::{Baseline, Text},
};

use embedded_text::{
    alignment::{HorizontalAlignment, VerticalAlignment}, style::TextBoxStyleBuilder, TextBox
};

pub const BACKGROUND: Rgb888 = Rgb888::new(35, 50, 112);
pub const BAND_TOP: Rgb888 = Rgb888::new(0x10, 0x20, 0x80);
pub const BAND_BOTTOM: Rgb888 = Rgb888::new(0x00, 0x10, 0x40);
pub const TITLE_TOP: Rgb888 = Rgb888::new(192, 91, 2);
pub const TITLE_BOTTOM: Rgb888 = Rgb888::new(72, 34, 64);
pub const TITLE_TRIANGLE: Rgb888 = Rgb888::new(28, 10, 87);
pub const PAGE_TOP: Rgb888 = Rgb888::new(28, 10, 87);
pub const YELLOW: Rgb888 = Rgb888::new(255, 255, 0);
pub const WHITE: Rgb888 = Rgb888::WHITE;
pub const SHADOW: Rgb888 = Rgb888::BLACK;

/// Large face, city names and temperatures.
pub const LARGE_FONT: &MonoFont = &FONT_10X20;
/// Small face, column labels and placeholders.
pub const SMALL_FONT: &MonoFont = &FONT_9X15_BOLD;

/// Drop shadow offset for all board text.
const SHADOW_OFFSET: i32 = 2;

/// Width of `text` when set in `font`.
pub fn text_width(text: &str, font: &MonoFont) -> u32 {
    let n = text.chars().count() as u32;
    if n == 0 {
        return 0;
    }
    n * font.character_size.width + (n - 1) * font.character_spacing
}

/// X at which `text` must start to end at `right`.
pub fn right_aligned_x(text: &str, font: &MonoFont, right: i32) -> i32 {
    right - text_width(text, font) as i32
}

pub fn fill_box<D>(target: &mut D, top_left: Point, w: u32, h: u32, color: Rgb888) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb888>,
{
    Rectangle::new(top_left, Size::new(w, h))
        .into_styled(PrimitiveStyle::with_fill(color))
        .draw(target)
}

/// Linear blend of two colours, `t` in 0..=1.
pub fn lerp(a: Rgb888, b: Rgb888, t: f32) -> Rgb888 {
    let t = t.clamp(0.0, 1.0);
    let mix = |x: u8, y: u8| (x as f32 + (y as f32 - x as f32) * t).round() as u8;
    Rgb888::new(mix(a.r(), b.r()), mix(a.g(), b.g()), mix(a.b(), b.b()))
}

/// Band of horizontal lines blending `top` into `bottom` between `y0` and `y1`.
pub fn horizontal_gradient<D>(
    target: &mut D,
    x0: i32,
    y0: i32,
    x1: i32,
    y1: i32,
    top: Rgb888,
    bottom: Rgb888,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb888>,
{
    if x1 <= x0 || y1 <= y0 {
        return Ok(());
    }
    let span = (y1 - y0) as f32;
    for y in y0..y1 {
        let color = lerp(top, bottom, (y - y0) as f32 / span);
        fill_box(target, Point::new(x0, y), (x1 - x0) as u32, 1, color)?;
    }
    Ok(())
}

/// Two stop gradient that reverses at the midpoint, the look of the title bar.
pub fn horizontal_gradient_single<D>(
    target: &mut D,
    x0: i32,
    y0: i32,
    x1: i32,
    y1: i32,
    edge: Rgb888,
    middle: Rgb888,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb888>,
{
    let mid = y0 + (y1 - y0) / 2;
    horizontal_gradient(target, x0, y0, x1, mid, edge, middle)?;
    horizontal_gradient(target, x0, mid, x1, y1, middle, edge)
}

pub fn fill_triangle<D>(target: &mut D, a: Point, b: Point, c: Point, color: Rgb888) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb888>,
{
    Triangle::new(a, b, c)
        .into_styled(PrimitiveStyle::with_fill(color))
        .draw(target)
}

/// Board text: `y` is the baseline, drawn over a drop shadow.
pub fn draw_text<D>(
    target: &mut D,
    text: &str,
    x: i32,
    y: i32,
    font: &MonoFont,
    color: Rgb888,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb888>,
{
    let shadow = MonoTextStyle::new(font, SHADOW);
    Text::with_baseline(text, Point::new(x + SHADOW_OFFSET, y + SHADOW_OFFSET), shadow, Baseline::Alphabetic)
        .draw(target)?;
    let style = MonoTextStyle::new(font, color);
    Text::with_baseline(text, Point::new(x, y), style, Baseline::Alphabetic).draw(target)?;
    Ok(())
}

pub fn draw_text_right<D>(
    target: &mut D,
    text: &str,
    right: i32,
    y: i32,
    font: &MonoFont,
    color: Rgb888,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb888>,
{
    draw_text(target, text, right_aligned_x(text, font, right), y, font, color)
}

/// Two stacked title lines, vertically centred in `region`.
pub fn draw_title_text<D>(
    target: &mut D,
    top: &str,
    bottom: &str,
    region: Rectangle,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb888>,
{
    let text = format!("{}\n{}", top, bottom);
    let textbox_style = TextBoxStyleBuilder::new()
        .alignment(HorizontalAlignment::Left)
        .vertical_alignment(VerticalAlignment::Middle)
        .build();

    let shadow_region = Rectangle::new(region.top_left + Point::new(SHADOW_OFFSET, SHADOW_OFFSET), region.size);
    TextBox::with_textbox_style(&text, shadow_region, MonoTextStyle::new(LARGE_FONT, SHADOW), textbox_style)
        .draw(target)?;
    TextBox::with_textbox_style(&text, region, MonoTextStyle::new(LARGE_FONT, YELLOW), textbox_style)
        .draw(target)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vframebuf::VarFrameBuf;

    #[test]
    fn test_right_alignment_measures_length() {
        // FONT_10X20 has no extra spacing: 10px per glyph
        assert_eq!(right_aligned_x("70", LARGE_FONT, 560), 540);
        assert_eq!(right_aligned_x("-5", LARGE_FONT, 500), 480);
        assert_eq!(right_aligned_x("100", LARGE_FONT, 560), 530);
        assert_eq!(text_width("", LARGE_FONT), 0);
    }

    #[test]
    fn test_gradient_endpoints() {
        let mut fb = VarFrameBuf::new(4, 10, Rgb888::BLACK);
        horizontal_gradient(&mut fb, 0, 0, 4, 10, BAND_TOP, BAND_BOTTOM).unwrap();
        assert_eq!(fb.pixel(0, 0), Some(BAND_TOP));
        assert_ne!(fb.pixel(0, 9), Some(BAND_TOP));
        assert_eq!(lerp(BAND_TOP, BAND_BOTTOM, 1.0), BAND_BOTTOM);
    }

    #[test]
    fn test_text_touches_pixels() {
        let mut fb = VarFrameBuf::new(100, 30, BACKGROUND);
        draw_text(&mut fb, "HI", 10, 20, LARGE_FONT, YELLOW).unwrap();
        assert!(fb.as_slice().iter().any(|p| *p == YELLOW));
        assert!(fb.as_slice().iter().any(|p| *p == SHADOW));
    }
}
