//! Module for rendering forecast icons from SVG to colour frames.
//!
//! This module uses `usvg` (through resvg's re-export) for SVG parsing and
//! `resvg` for rendering. Output frames keep straight alpha so they can be
//! blended over the board's gradients.

use resvg::{
    render,
    usvg::{
        Tree as ResvgTree,
        Options as ResvgUsvgOptions,
        Transform,
    }
}; // Use resvg's re-exports for usvg types

use embedded_graphics::pixelcolor::Rgb888;
use log::{debug, warn};
use mini_moka::sync::Cache;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tiny_skia::Pixmap;

use crate::display::overlay::IconSource;
use crate::icons::IconRef;

/// Error type for icon loading and SVG rendering.
#[derive(Debug, Error)]
pub enum IconError {
    #[error("I/O error on {path}: {source}")]
    Io { path: String, source: std::io::Error },
    #[error("SVG parse error: {0}")]
    SvgParse(String),
    #[error("Pixmap creation error: {0}")]
    Pixmap(String),
    #[error("Icon not found: {0}")]
    NotFound(String),
}

/// One rendered frame, row-major, straight (not premultiplied) alpha.
#[derive(Debug, Clone, PartialEq)]
pub struct IconFrame {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<(Rgb888, u8)>,
}

impl IconFrame {
    pub fn solid(width: u32, height: u32, color: Rgb888) -> Self {
        Self { width, height, pixels: vec![(color, 255); (width * height) as usize] }
    }
}

/// Parsed SVG ready to be rasterised at any width.
#[derive(Debug)]
pub struct SvgImageRenderer {
    tree: ResvgTree,
}

impl SvgImageRenderer {
    pub fn new(svg_data: &str) -> Result<Self, IconError> {
        let usvg_options = ResvgUsvgOptions::default();
        let tree = ResvgTree::from_str(svg_data, &usvg_options)
            .map_err(|e| IconError::SvgParse(format!("Failed to parse SVG: {:?}", e)))?;
        Ok(Self { tree })
    }

    /// Render scaled to `width`, keeping the aspect ratio.
    pub fn render_frame(&self, width: u32) -> Result<IconFrame, IconError> {
        let svg_size = self.tree.size();
        if svg_size.width() <= 0.0 || width == 0 {
            return Err(IconError::Pixmap(format!("cannot scale {:?} to width {}", svg_size, width)));
        }
        let scale = width as f32 / svg_size.width();
        let height = ((svg_size.height() * scale).round() as u32).max(1);

        let mut pixmap = Pixmap::new(width, height)
            .ok_or_else(|| IconError::Pixmap(format!("Failed to create {}x{} pixmap", width, height)))?;
        render(&self.tree, Transform::from_scale(scale, scale), &mut pixmap.as_mut());

        let pixels = pixmap
            .pixels()
            .iter()
            .map(|p| {
                let c = p.demultiply();
                (Rgb888::new(c.red(), c.green(), c.blue()), c.alpha())
            })
            .collect();

        debug!("SVG rendered to {}x{} frame", width, height);
        Ok(IconFrame { width, height, pixels })
    }
}

/// Icons from a folder of svgs.
///
/// `name.svg` is the first frame; `name_1.svg`, `name_2.svg`, ... are picked
/// up as further animation frames when present. Rendered frames are cached
/// per icon and width.
#[derive(Clone)]
pub struct SvgIconSource {
    folder: PathBuf,
    cache: Cache<(String, u32), Arc<Vec<IconFrame>>>,
}

impl SvgIconSource {
    pub fn new(folder: impl AsRef<Path>) -> Self {
        Self {
            folder: folder.as_ref().to_path_buf(),
            cache: Cache::new(64),
        }
    }

    fn frame_paths(&self, icon: &IconRef) -> Vec<PathBuf> {
        let first = self.folder.join(icon.file_name());
        let stem = Path::new(icon.file_name())
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        let mut paths = vec![first];
        for n in 1.. {
            let p = self.folder.join(format!("{}_{}.svg", stem, n));
            if !p.exists() {
                break;
            }
            paths.push(p);
        }
        paths
    }

    fn load(&self, icon: &IconRef, width: u32) -> Result<Vec<IconFrame>, IconError> {
        let paths = self.frame_paths(icon);
        if !paths[0].exists() {
            warn!("{} doesn't exist!", paths[0].display());
            return Err(IconError::NotFound(paths[0].display().to_string()));
        }
        paths
            .iter()
            .map(|path| {
                let data = std::fs::read_to_string(path).map_err(|source| IconError::Io {
                    path: path.display().to_string(),
                    source,
                })?;
                SvgImageRenderer::new(&data)?.render_frame(width)
            })
            .collect()
    }
}

impl IconSource for SvgIconSource {
    fn frames(&self, icon: &IconRef, max_width: u32) -> Result<Arc<Vec<IconFrame>>, IconError> {
        let key = (icon.file_name().to_string(), max_width);
        if let Some(frames) = self.cache.get(&key) {
            return Ok(frames);
        }
        let frames = Arc::new(self.load(icon, max_width)?);
        self.cache.insert(key, Arc::clone(&frames));
        Ok(frames)
    }
}
