//! Workflow use case.
//!
//! Creates a new production workflow: detects which integrations are
//! available, derives the plan, and records it onto a fresh session.

use quill_core::config::{ProjectConfig, SecretConfig};
use quill_core::error::Result;
use quill_core::integration::BackendToolExecutor;
use quill_core::session::SessionStore;
use quill_core::workflow::{AvailableIntegrations, PlanBuilder, PlanRequest, PlanWarning, WorkflowPlan};
use std::sync::Arc;

/// Result of creating a workflow: the recorded plan plus advisory warnings.
#[derive(Debug, Clone)]
pub struct CreateWorkflowOutcome {
    pub plan: WorkflowPlan,
    pub warnings: Vec<PlanWarning>,
}

/// Use case for starting a new content production workflow.
pub struct WorkflowUseCase {
    store: Arc<SessionStore>,
}

impl WorkflowUseCase {
    pub fn new(store: Arc<SessionStore>) -> Self {
        Self { store }
    }

    /// Derives the available-integration flags from the credential set.
    ///
    /// When a backend executor is supplied its tool list is probed over the
    /// resilient client; an unreachable backend downgrades to
    /// `backend_tools = false` instead of failing workflow creation.
    pub async fn detect_integrations(
        secrets: &SecretConfig,
        config: &ProjectConfig,
        backend: Option<&dyn BackendToolExecutor>,
    ) -> AvailableIntegrations {
        let mut integrations = AvailableIntegrations {
            publishing_platforms: secrets.publishing_platforms(),
            image_generation: secrets.has_image_generation(),
            backend_tools: false,
            external_tools: config.external_tools.clone(),
        };

        if let Some(backend) = backend {
            match backend.list_tools().await {
                Ok(tools) => {
                    integrations.backend_tools = true;
                    for tool in tools {
                        if !integrations.external_tools.contains(&tool) {
                            integrations.external_tools.push(tool);
                        }
                    }
                }
                Err(err) => {
                    tracing::warn!(
                        target: "workflow",
                        %err,
                        "backend unreachable; planning without backend tools"
                    );
                }
            }
        }

        integrations
    }

    /// Builds a plan and starts a brand-new session around it.
    ///
    /// # Errors
    ///
    /// Returns the plan builder's itemized configuration error unchanged;
    /// the existing session is left untouched in that case.
    pub async fn create_workflow(
        &self,
        request: &PlanRequest,
        config: &ProjectConfig,
        integrations: &AvailableIntegrations,
    ) -> Result<CreateWorkflowOutcome> {
        let (plan, warnings) = PlanBuilder::build(request, config, integrations)?;

        tracing::info!(
            target: "workflow",
            plan_id = %plan.id,
            steps = plan.steps.len(),
            articles = plan.article_count,
            "starting new workflow"
        );
        self.store.begin_workflow(plan.clone()).await;

        Ok(CreateWorkflowOutcome { plan, warnings })
    }
}
