//! Render surface for mind maps: SVG scene, PNG rasterization, shape
//! geometry, and hit testing.

pub mod geometry;
pub mod hit;
pub mod png;
pub mod svg;
pub mod theme;

pub use hit::{Hit, HitPart, hit_test};
pub use png::{DEFAULT_PNG_SIZE, RenderError, rasterize_svg, render_png};
pub use svg::{SvgOptions, ViewBox, render_svg};
pub use theme::RenderTheme;
