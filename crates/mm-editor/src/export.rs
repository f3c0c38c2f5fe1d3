//! Export artifacts handed back to the host.

use mm_render::RenderError;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Png,
    Svg,
}

impl ExportFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
            ExportFormat::Svg => "svg",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "png" | "image" => Ok(ExportFormat::Png),
            "svg" | "vector" => Ok(ExportFormat::Svg),
            _ => Err(ExportError::UnknownFormat(s.to_string())),
        }
    }
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("unknown export format `{0}` (expected png or svg)")]
    UnknownFormat(String),

    #[error(transparent)]
    Render(#[from] RenderError),
}

/// A finished export.
#[derive(Debug, Clone, PartialEq)]
pub enum ExportArtifact {
    Png(Vec<u8>),
    Svg(String),
}

impl ExportArtifact {
    pub fn format(&self) -> ExportFormat {
        match self {
            ExportArtifact::Png(_) => ExportFormat::Png,
            ExportArtifact::Svg(_) => ExportFormat::Svg,
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportArtifact::Png(_) => "image/png",
            ExportArtifact::Svg(_) => "image/svg+xml",
        }
    }

    /// Suggested download name.
    pub fn file_name(&self) -> &'static str {
        match self {
            ExportArtifact::Png(_) => "mindmap.png",
            ExportArtifact::Svg(_) => "mindmap.svg",
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            ExportArtifact::Png(bytes) => bytes,
            ExportArtifact::Svg(text) => text.as_bytes(),
        }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            ExportArtifact::Png(bytes) => bytes,
            ExportArtifact::Svg(text) => text.into_bytes(),
        }
    }
}
