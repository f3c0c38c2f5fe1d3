use mm_core::LayoutConfig;
use serde::Deserialize;

/// Configuration for an editor session.
///
/// Every field has a default, so hosts may pass partial JSON.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    /// Placement of new children.
    pub layout: LayoutConfig,

    /// Maximum undo depth. Default: **200**.
    pub history_depth: usize,

    /// Default: **0.3**.
    pub min_zoom: f64,
    /// Default: **3**.
    pub max_zoom: f64,
    /// Factor applied by one zoom step. Default: **1.2**.
    pub zoom_step: f64,

    /// Drawing surface size at zoom 1. Default: **800 × 600**.
    pub surface_width: f64,
    pub surface_height: f64,

    /// PNG export canvas. Default: **1200 × 800**.
    pub export_width: u32,
    pub export_height: u32,

    pub dark_mode: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            layout: LayoutConfig::default(),
            history_depth: 200,
            min_zoom: 0.3,
            max_zoom: 3.0,
            zoom_step: 1.2,
            surface_width: 800.0,
            surface_height: 600.0,
            export_width: mm_render::DEFAULT_PNG_SIZE.0,
            export_height: mm_render::DEFAULT_PNG_SIZE.1,
            dark_mode: false,
        }
    }
}

impl EditorConfig {
    /// Parse a (possibly partial) JSON config.
    ///
    /// # Errors
    /// Returns the `serde_json` error for malformed input.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}
