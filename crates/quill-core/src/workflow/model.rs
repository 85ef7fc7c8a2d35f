//! Workflow plan domain model.
//!
//! A `WorkflowPlan` is the immutable, ordered production plan derived from
//! project configuration. Steps are data only: this core never executes them,
//! it produces and tracks the plan for an external LLM-driven agent.

use crate::config::ProjectConfig;
use serde::{Deserialize, Serialize};

/// The four production phases, in their fixed execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowPhase {
    Research,
    Creation,
    Optimization,
    Publishing,
}

impl std::fmt::Display for WorkflowPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Research => "research",
            Self::Creation => "creation",
            Self::Optimization => "optimization",
            Self::Publishing => "publishing",
        };
        f.write_str(name)
    }
}

/// A phase-tagged step action identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepAction {
    KeywordResearch,
    SeoStrategy,
    TopicalMap,
    ContentCalendar,
    Outline,
    WriteArticle,
    QualityCheck,
    GeoOptimization,
    GenerateImages,
    Publish,
}

impl StepAction {
    /// The phase this action belongs to.
    pub fn phase(&self) -> WorkflowPhase {
        match self {
            Self::KeywordResearch | Self::SeoStrategy | Self::TopicalMap | Self::ContentCalendar => {
                WorkflowPhase::Research
            }
            Self::Outline | Self::WriteArticle => WorkflowPhase::Creation,
            Self::QualityCheck | Self::GeoOptimization => WorkflowPhase::Optimization,
            Self::GenerateImages | Self::Publish => WorkflowPhase::Publishing,
        }
    }

    /// The key under which the executing agent stores this step's output.
    pub fn store_key(&self) -> &'static str {
        match self {
            Self::KeywordResearch => "keyword_research",
            Self::SeoStrategy => "seo_strategy",
            Self::TopicalMap => "topical_map",
            Self::ContentCalendar => "content_calendar",
            Self::Outline => "outline",
            Self::WriteArticle => "article",
            Self::QualityCheck => "quality_check",
            Self::GeoOptimization => "geo_optimization",
            Self::GenerateImages => "images",
            Self::Publish => "publish",
        }
    }
}

/// A single entry of the production plan.
///
/// Steps carry a contiguous 1-based `sequence` and are strictly ordered by
/// phase. They are never executed by this crate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub sequence: u32,
    pub phase: WorkflowPhase,
    pub action: StepAction,
    pub instruction: String,
    pub store_key: String,
}

/// Content settings the plan was derived from, plus the derived image counts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowSettings {
    pub target_word_count: u32,
    pub reading_level: Option<String>,
    pub brand_voice: String,
    pub target_audience: Option<String>,
    pub primary_keywords: Vec<String>,
    pub geo_focus: Option<String>,
    pub visual_style: Option<String>,
    pub include_images: bool,
    /// Inline images per article (`target_word_count / 300` when enabled)
    pub content_images: u32,
    /// Cover plus inline images (`1 + content_images` when enabled)
    pub total_images: u32,
}

/// Identifying information about the project the plan belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectInfo {
    pub name: String,
    pub url: String,
    pub niche: String,
}

impl ProjectInfo {
    pub fn from_config(config: &ProjectConfig) -> Self {
        Self {
            name: config.name.clone(),
            url: config.url.clone(),
            niche: config.niche.clone().unwrap_or_default(),
        }
    }
}

/// Which external integrations are available to the executing agent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AvailableIntegrations {
    /// Publish platforms with an available credential
    pub publishing_platforms: Vec<String>,
    /// Whether an image generation credential is available
    pub image_generation: bool,
    /// Whether the content generation backend is reachable
    pub backend_tools: bool,
    /// Names of external tools the agent may call
    pub external_tools: Vec<String>,
}

/// The immutable, ordered production plan.
///
/// Built once by [`crate::workflow::PlanBuilder`], recorded by the session
/// store, and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowPlan {
    pub id: String,
    pub request: String,
    pub article_count: usize,
    pub settings: WorkflowSettings,
    pub project_info: ProjectInfo,
    pub available_integrations: AvailableIntegrations,
    /// Resolved publish targets (empty when nothing is publishable)
    pub publish_targets: Vec<String>,
    pub steps: Vec<Step>,
}
