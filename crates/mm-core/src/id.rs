use lasso::{Spur, ThreadedRodeo};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::LazyLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Global string interner for node IDs — fast comparisons, low memory.
static INTERNER: LazyLock<ThreadedRodeo> = LazyLock::new(ThreadedRodeo::default);

/// The fixed id of every document's root node.
pub const ROOT_ID: &str = "root";

/// A lightweight, interned identifier for mind-map nodes.
/// Internally a `Spur` index — 4 bytes, Copy, Eq, Hash in O(1).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(Spur);

impl NodeId {
    /// Intern a string as a NodeId, or return the existing one.
    pub fn intern(s: &str) -> Self {
        NodeId(INTERNER.get_or_intern(s))
    }

    /// The root node's id.
    pub fn root() -> Self {
        Self::intern(ROOT_ID)
    }

    pub fn is_root(&self) -> bool {
        self.as_str() == ROOT_ID
    }

    /// Resolve back to a string slice.
    pub fn as_str(&self) -> &str {
        INTERNER.resolve(&self.0)
    }

    /// Generate a `node_<millis>_<n>` id for which `taken` returns false.
    ///
    /// The counter makes ids unique within the process; `taken` guards
    /// against ids that arrived with a loaded document.
    pub fn fresh(taken: impl Fn(NodeId) -> bool) -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default();
        loop {
            let n = COUNTER.fetch_add(1, Ordering::Relaxed);
            let id = Self::intern(&format!("node_{millis}_{n}"));
            if !taken(id) {
                return id;
            }
        }
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.as_str())
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for NodeId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for NodeId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(NodeId::intern(&s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_roundtrip() {
        let a = NodeId::intern("topic_a");
        let b = NodeId::intern("topic_a");
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "topic_a");
        assert_eq!(a.to_string(), "topic_a");
    }

    #[test]
    fn fresh_ids_are_unique() {
        let a = NodeId::fresh(|_| false);
        let b = NodeId::fresh(|_| false);
        assert_ne!(a, b);
        assert!(a.as_str().starts_with("node_"));
        assert!(!a.is_root());
    }

    #[test]
    fn fresh_skips_taken_ids() {
        let calls = std::cell::Cell::new(0);
        let id = NodeId::fresh(|_| {
            calls.set(calls.get() + 1);
            calls.get() == 1
        });
        assert_eq!(calls.get(), 2);
        assert!(id.as_str().starts_with("node_"));
    }

    #[test]
    fn root_id() {
        assert!(NodeId::root().is_root());
        assert_eq!(NodeId::root(), NodeId::intern("root"));
    }
}
