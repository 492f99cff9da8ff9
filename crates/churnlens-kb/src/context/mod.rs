//! Why-aware context assembly and rendering.

pub mod assembler;
pub mod render;

use serde::Serialize;

pub use assembler::{assemble, DEFAULT_UNCERTAINTY};
pub use render::render;

/// Name and purpose of a context operation, for orchestration layers that
/// register callable tools.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolDescriptor {
    pub name: &'static str,
    pub description: &'static str,
}

/// Operations this module exposes as tools.
pub fn tools() -> Vec<ToolDescriptor> {
    vec![
        ToolDescriptor {
            name: "assemble_causal_context",
            description: "Build structured what/why/intervention context payload.",
        },
        ToolDescriptor {
            name: "render_why_aware_prompt",
            description: "Render deterministic prompt text from context payload.",
        },
    ]
}
