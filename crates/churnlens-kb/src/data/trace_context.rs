//! Trace identifiers for one investigation and the stages inside it

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identifies an investigation run (`trace_id`) and one unit of work in it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TraceContext {
    pub trace_id: Uuid,
    pub span_id: Uuid,
    pub parent_span_id: Option<Uuid>,
}

impl TraceContext {
    pub fn new_root() -> Self {
        Self {
            trace_id: Uuid::new_v4(),
            span_id: Uuid::new_v4(),
            parent_span_id: None,
        }
    }

    /// Same trace, fresh span, parented on this one.
    pub fn child(&self) -> Self {
        Self {
            trace_id: self.trace_id,
            span_id: Uuid::new_v4(),
            parent_span_id: Some(self.span_id),
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent_span_id.is_none()
    }
}

impl Default for TraceContext {
    fn default() -> Self {
        Self::new_root()
    }
}

impl fmt::Display for TraceContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.trace_id, self.span_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roots_are_distinct() {
        let a = TraceContext::new_root();
        let b = TraceContext::new_root();
        assert!(a.is_root());
        assert_ne!(a.trace_id, b.trace_id);
        assert_ne!(a.trace_id, Uuid::nil());
    }

    #[test]
    fn test_child_keeps_trace() {
        let root = TraceContext::new_root();
        let child = root.child();

        assert_eq!(child.trace_id, root.trace_id);
        assert_ne!(child.span_id, root.span_id);
        assert_eq!(child.parent_span_id, Some(root.span_id));
        assert!(!child.is_root());
        assert_eq!(child.to_string(), format!("{}/{}", root.trace_id, child.span_id));
    }
}
