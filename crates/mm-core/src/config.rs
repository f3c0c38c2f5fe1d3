//! Placement and styling defaults for newly added nodes.

use crate::model::{DEFAULT_FONT_SIZE, Shape};
use serde::Deserialize;

/// Colors cycled through by new children.
pub const PALETTE: [&str; 8] = [
    "#3b82f6", "#ef4444", "#10b981", "#f59e0b", "#8b5cf6", "#06b6d4", "#f97316", "#84cc16",
];

/// Configuration for `add_child_with`.
///
/// A new child `i` of a parent at `p` lands at
/// `p + (cos(i * angle_step), sin(i * angle_step)) * child_distance`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutConfig {
    /// Distance from the parent center. Default: **150**.
    pub child_distance: f64,

    /// Angle between consecutive children, in degrees. Default: **60**.
    pub angle_step_deg: f64,

    /// Default: **14**.
    pub font_size: f64,

    /// Default: **"New Node"**.
    pub text: String,

    /// Default: **rectangle**.
    pub shape: Shape,

    /// Child `i` of a parent at level `l` gets `palette[(l + i) % len]`.
    /// An empty palette leaves the color unset.
    pub palette: Vec<String>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            child_distance: 150.0,
            angle_step_deg: 60.0,
            font_size: DEFAULT_FONT_SIZE,
            text: "New Node".into(),
            shape: Shape::Rectangle,
            palette: PALETTE.iter().map(|c| (*c).to_string()).collect(),
        }
    }
}

impl LayoutConfig {
    /// Offset of child number `index` from its parent.
    pub fn child_offset(&self, index: usize) -> (f64, f64) {
        let angle = (index as f64 * self.angle_step_deg).to_radians();
        (
            angle.cos() * self.child_distance,
            angle.sin() * self.child_distance,
        )
    }

    pub fn color_for(&self, parent_level: u32, index: usize) -> Option<String> {
        if self.palette.is_empty() {
            return None;
        }
        let slot = (parent_level as usize + index) % self.palette.len();
        Some(self.palette[slot].clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_child_goes_right() {
        let cfg = LayoutConfig::default();
        let (dx, dy) = cfg.child_offset(0);
        assert_eq!(dx, 150.0);
        assert_eq!(dy, 0.0);
    }

    #[test]
    fn offsets_follow_angle_step() {
        let cfg = LayoutConfig::default();
        let (dx, dy) = cfg.child_offset(2);
        assert!((dx - (-75.0)).abs() < 1e-9);
        assert!((dy - 129.903_810_567_665_8).abs() < 1e-9);
    }

    #[test]
    fn palette_cycles() {
        let cfg = LayoutConfig::default();
        assert_eq!(cfg.color_for(0, 0).as_deref(), Some("#3b82f6"));
        assert_eq!(cfg.color_for(1, 0).as_deref(), Some("#ef4444"));
        assert_eq!(cfg.color_for(0, 8).as_deref(), Some("#3b82f6"));

        let bare = LayoutConfig {
            palette: Vec::new(),
            ..Default::default()
        };
        assert_eq!(bare.color_for(0, 0), None);
    }

    #[test]
    fn partial_config_from_json() {
        let cfg: LayoutConfig =
            serde_json::from_str(r#"{ "childDistance": 90, "shape": "diamond" }"#).unwrap();
        assert_eq!(cfg.child_distance, 90.0);
        assert_eq!(cfg.shape, Shape::Diamond);
        assert_eq!(cfg.angle_step_deg, 60.0);
    }
}
