//! Light and dark color themes for the SVG scene.

/// Colors for the parts of the scene that do not come from the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderTheme {
    pub connection: &'static str,
    pub toggle_fill: &'static str,
    pub toggle_text: &'static str,
    pub node_text: &'static str,
    pub selection: &'static str,
}

impl RenderTheme {
    pub fn light() -> Self {
        Self {
            connection: "#a0aec0",
            toggle_fill: "#e5e7eb",
            toggle_text: "#000000",
            node_text: "white",
            selection: "#fbbf24",
        }
    }

    pub fn dark() -> Self {
        Self {
            connection: "#4a5568",
            toggle_fill: "#374151",
            toggle_text: "#ffffff",
            node_text: "white",
            selection: "#fbbf24",
        }
    }

    pub fn for_mode(dark: bool) -> Self {
        if dark { Self::dark() } else { Self::light() }
    }
}

impl Default for RenderTheme {
    fn default() -> Self {
        Self::light()
    }
}
