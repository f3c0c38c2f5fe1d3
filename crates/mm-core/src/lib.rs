pub mod codec;
pub mod config;
pub mod id;
pub mod lint;
pub mod model;
pub mod ops;

pub use codec::{CodecError, deserialize, format_document, from_json, serialize};
pub use config::{LayoutConfig, PALETTE};
pub use id::NodeId;
pub use lint::{LintDiagnostic, LintSeverity, lint_mindmap};
pub use model::*;
pub use ops::{Connection, FlatNode};
