//! Churnlens investigation pipeline
//!
//! A fixed sequence of stages: retrieve facts, explain causality, rank
//! interventions, compose a why-aware response. Each stage degrades to an
//! empty result instead of failing the run.

pub mod config;
pub mod error;
pub mod runner;
pub mod stages;
pub mod state;
pub mod store;

pub use config::{PipelineConfig, Settings};
pub use error::{PipelineError, PipelineResult};
pub use runner::Pipeline;
pub use stages::Stage;
pub use state::{InvestigationRequest, PipelineOutcome, PipelineState, StateDelta};
pub use store::{build_store, StoreSource};
