//! Workflow domain module.
//!
//! - `model`: plan, step, and settings types (`WorkflowPlan`, `Step`, ...)
//! - `builder`: deterministic plan derivation (`PlanBuilder`)

mod builder;
mod model;

pub use builder::{
    ALL_TARGETS, MAX_WORD_COUNT, MIN_WORD_COUNT, PlanBuilder, PlanRequest, PlanWarning,
    WORDS_PER_IMAGE,
};
pub use model::{
    AvailableIntegrations, ProjectInfo, Step, StepAction, WorkflowPhase, WorkflowPlan,
    WorkflowSettings,
};
