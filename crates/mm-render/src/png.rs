//! PNG export: rasterize the SVG scene with `resvg`.
//!
//! Labels are drawn with an embedded DejaVu Sans so the output does not
//! depend on host fonts (a wasm32 host has none).

use crate::svg::{SvgOptions, render_svg};
use mm_core::model::MindMap;
use resvg::tiny_skia::{Pixmap, Transform};
use resvg::usvg::{self, fontdb};
use std::sync::{Arc, LazyLock};
use thiserror::Error;

/// Default raster canvas.
pub const DEFAULT_PNG_SIZE: (u32, u32) = (1200, 800);

const LABEL_FONT: &[u8] = include_bytes!("../assets/DejaVuSans.ttf");
const LABEL_FAMILY: &str = "DejaVu Sans";

static FONTS: LazyLock<Arc<fontdb::Database>> = LazyLock::new(|| {
    let mut db = fontdb::Database::new();
    db.load_font_source(fontdb::Source::Binary(Arc::new(LABEL_FONT)));
    db.set_sans_serif_family(LABEL_FAMILY);
    db.set_serif_family(LABEL_FAMILY);
    db.set_monospace_family(LABEL_FAMILY);
    db.set_cursive_family(LABEL_FAMILY);
    db.set_fantasy_family(LABEL_FAMILY);
    Arc::new(db)
});

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to parse generated SVG for PNG export: {0}")]
    Svg(#[from] usvg::Error),

    #[error("cannot allocate a {width}x{height} surface for PNG export")]
    Surface { width: u32, height: u32 },

    #[error("failed to encode PNG output: {0}")]
    Encode(String),
}

/// Render `tree` to SVG, then rasterize it onto a `width` × `height`
/// canvas, scaled uniformly to fit.
///
/// # Errors
/// Returns `RenderError` when the surface cannot be allocated or the SVG
/// cannot be parsed or encoded.
pub fn render_png(
    tree: &MindMap,
    options: &SvgOptions,
    width: u32,
    height: u32,
) -> Result<Vec<u8>, RenderError> {
    rasterize_svg(&render_svg(tree, options), width, height)
}

/// Rasterize an SVG document onto a `width` × `height` canvas.
///
/// # Errors
/// See [`render_png`].
pub fn rasterize_svg(svg: &str, width: u32, height: u32) -> Result<Vec<u8>, RenderError> {
    let mut pixmap = Pixmap::new(width, height).ok_or(RenderError::Surface { width, height })?;

    let options = usvg::Options {
        font_family: LABEL_FAMILY.to_string(),
        fontdb: Arc::clone(&FONTS),
        ..usvg::Options::default()
    };

    let tree = usvg::Tree::from_str(svg, &options)?;
    let size = tree.size();
    let scale = (width as f32 / size.width()).min(height as f32 / size.height());
    log::debug!(
        "rasterizing {}x{} svg at scale {scale} onto {width}x{height}",
        size.width(),
        size.height()
    );

    resvg::render(&tree, Transform::from_scale(scale, scale), &mut pixmap.as_mut());

    pixmap
        .encode_png()
        .map_err(|err| RenderError::Encode(err.to_string()))
}
