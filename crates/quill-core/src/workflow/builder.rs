//! Workflow Plan Builder.
//!
//! Deterministically derives the ordered step list from project configuration.
//! Fatal configuration gaps fail the build with an itemized
//! [`QuillError::Configuration`]; advisory gaps come back as [`PlanWarning`]s
//! alongside the plan.

use super::model::{
    AvailableIntegrations, ProjectInfo, Step, StepAction, WorkflowPlan, WorkflowSettings,
};
use crate::config::ProjectConfig;
use crate::error::{QuillError, Result};
use uuid::Uuid;

/// Minimum accepted target word count.
pub const MIN_WORD_COUNT: u32 = 100;
/// Maximum accepted target word count.
pub const MAX_WORD_COUNT: u32 = 10_000;
/// One inline image is planned per this many words of target length.
pub const WORDS_PER_IMAGE: u32 = 300;

/// Sentinel target meaning "every platform with an available credential".
pub const ALL_TARGETS: &str = "all";

/// A non-fatal gap detected while building a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanWarning {
    NoPrimaryKeywords,
    NoTargetAudience,
}

impl std::fmt::Display for PlanWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoPrimaryKeywords => {
                write!(f, "no primary keywords configured; research quality may suffer")
            }
            Self::NoTargetAudience => {
                write!(f, "no target audience configured; using a general readership")
            }
        }
    }
}

/// Request parameters for building a plan.
#[derive(Debug, Clone)]
pub struct PlanRequest {
    /// Free-text description of what to produce
    pub request: String,
    /// Number of articles to produce (must be >= 1)
    pub article_count: usize,
    /// Explicit publish targets; empty or containing "all" resolves to every
    /// platform with an available credential
    pub requested_targets: Vec<String>,
    /// Whether the caller wants images generated
    pub want_images: bool,
}

/// Builds [`WorkflowPlan`]s from configuration. Stateless.
pub struct PlanBuilder;

impl PlanBuilder {
    /// Derives an ordered production plan.
    ///
    /// # Errors
    ///
    /// Returns [`QuillError::Configuration`] listing every missing or
    /// out-of-bounds required field.
    pub fn build(
        request: &PlanRequest,
        config: &ProjectConfig,
        integrations: &AvailableIntegrations,
    ) -> Result<(WorkflowPlan, Vec<PlanWarning>)> {
        let mut issues = Vec::new();

        match config.target_word_count {
            None => issues.push("target word count is missing".to_string()),
            Some(count) if count < MIN_WORD_COUNT => issues.push(format!(
                "target word count {} is below the minimum of {}",
                count, MIN_WORD_COUNT
            )),
            Some(count) if count > MAX_WORD_COUNT => issues.push(format!(
                "target word count {} is above the maximum of {}",
                count, MAX_WORD_COUNT
            )),
            Some(_) => {}
        }
        if config.brand_voice.as_deref().is_none_or(|v| v.trim().is_empty()) {
            issues.push("brand voice is missing".to_string());
        }
        if config.niche.as_deref().is_none_or(|n| n.trim().is_empty()) {
            issues.push("niche is missing".to_string());
        }
        if request.article_count == 0 {
            issues.push("article count must be at least 1".to_string());
        }
        if !issues.is_empty() {
            return Err(QuillError::configuration(issues));
        }

        let mut warnings = Vec::new();
        if config.primary_keywords.is_empty() {
            warnings.push(PlanWarning::NoPrimaryKeywords);
        }
        if config.target_audience.as_deref().is_none_or(|a| a.trim().is_empty()) {
            warnings.push(PlanWarning::NoTargetAudience);
        }

        // Validated above
        let target_word_count = config.target_word_count.unwrap_or(MIN_WORD_COUNT);
        let brand_voice = config.brand_voice.clone().unwrap_or_default();

        let should_generate_images =
            request.want_images && config.include_images && integrations.image_generation;
        let content_images = if should_generate_images {
            target_word_count / WORDS_PER_IMAGE
        } else {
            0
        };
        let total_images = if should_generate_images {
            1 + content_images
        } else {
            0
        };

        let publish_targets = resolve_targets(&request.requested_targets, integrations);

        let settings = WorkflowSettings {
            target_word_count,
            reading_level: config.reading_level.clone(),
            brand_voice,
            target_audience: config.target_audience.clone(),
            primary_keywords: config.primary_keywords.clone(),
            geo_focus: config.geo_focus.clone(),
            visual_style: config.visual_style.clone(),
            include_images: config.include_images,
            content_images,
            total_images,
        };

        let steps = build_steps(
            request,
            config,
            &settings,
            should_generate_images,
            &publish_targets,
        );

        let plan = WorkflowPlan {
            id: Uuid::new_v4().to_string(),
            request: request.request.clone(),
            article_count: request.article_count,
            settings,
            project_info: ProjectInfo::from_config(config),
            available_integrations: integrations.clone(),
            publish_targets,
            steps,
        };

        Ok((plan, warnings))
    }
}

/// Resolves the publish target list.
///
/// An explicit non-empty list without the "all" sentinel is used verbatim;
/// availability filtering is a publish-time concern, not a plan-time one.
fn resolve_targets(requested: &[String], integrations: &AvailableIntegrations) -> Vec<String> {
    if !requested.is_empty() && !requested.iter().any(|t| t.eq_ignore_ascii_case(ALL_TARGETS)) {
        return requested.to_vec();
    }
    integrations.publishing_platforms.clone()
}

fn build_steps(
    request: &PlanRequest,
    config: &ProjectConfig,
    settings: &WorkflowSettings,
    should_generate_images: bool,
    publish_targets: &[String],
) -> Vec<Step> {
    let niche = config.niche.as_deref().unwrap_or_default();
    let audience = settings
        .target_audience
        .as_deref()
        .unwrap_or("a general readership");
    let mut steps = StepList::new();

    // Research phase
    steps.push(
        StepAction::KeywordResearch,
        format!(
            "Research high-intent keywords in the '{}' niche for: {}",
            niche, request.request
        ),
    );
    steps.push(
        StepAction::SeoStrategy,
        format!(
            "Define the SEO strategy for '{}' targeting {}",
            request.request, audience
        ),
    );
    steps.push(
        StepAction::TopicalMap,
        format!("Build a topical map covering '{}'", request.request),
    );
    if request.article_count > 1 {
        steps.push(
            StepAction::ContentCalendar,
            format!(
                "Lay out a content calendar ordering all {} articles",
                request.article_count
            ),
        );
    }

    // Creation phase
    steps.push(
        StepAction::Outline,
        format!(
            "Outline every article at roughly {} words each, in this brand voice: {}",
            settings.target_word_count, settings.brand_voice
        ),
    );
    for index in 1..=request.article_count {
        steps.push(
            StepAction::WriteArticle,
            format!(
                "Write article {} of {} (~{} words) following its outline",
                index, request.article_count, settings.target_word_count
            ),
        );
    }

    // Optimization phase
    steps.push(
        StepAction::QualityCheck,
        "Review every draft for factual accuracy, tone, and structure".to_string(),
    );
    steps.push(
        StepAction::GeoOptimization,
        "Optimize every draft for AI search and generative engines".to_string(),
    );

    // Publishing phase
    if should_generate_images {
        steps.push(
            StepAction::GenerateImages,
            format!(
                "Generate {} images per article (1 cover + {} inline){}",
                settings.total_images,
                settings.content_images,
                settings
                    .visual_style
                    .as_deref()
                    .map(|s| format!(" in the '{}' style", s))
                    .unwrap_or_default()
            ),
        );
    }
    if !publish_targets.is_empty() {
        steps.push(
            StepAction::Publish,
            format!("Publish saved articles to: {}", publish_targets.join(", ")),
        );
    }

    steps.into_inner()
}

/// Accumulates steps with a contiguous 1-based sequence.
struct StepList {
    steps: Vec<Step>,
}

impl StepList {
    fn new() -> Self {
        Self { steps: Vec::new() }
    }

    fn push(&mut self, action: StepAction, instruction: String) {
        let sequence = self.steps.len() as u32 + 1;
        self.steps.push(Step {
            sequence,
            phase: action.phase(),
            action,
            instruction,
            store_key: action.store_key().to_string(),
        });
    }

    fn into_inner(self) -> Vec<Step> {
        self.steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::model::WorkflowPhase;

    fn config() -> ProjectConfig {
        ProjectConfig {
            name: "Example".to_string(),
            url: "https://example.com".to_string(),
            niche: Some("home coffee roasting".to_string()),
            target_word_count: Some(1500),
            reading_level: Some("8th grade".to_string()),
            brand_voice: Some("warm and practical".to_string()),
            target_audience: Some("hobbyist roasters".to_string()),
            primary_keywords: vec!["coffee roasting".to_string()],
            geo_focus: None,
            visual_style: Some("bright photography".to_string()),
            include_images: true,
            external_tools: vec![],
        }
    }

    fn integrations() -> AvailableIntegrations {
        AvailableIntegrations {
            publishing_platforms: vec!["ghost".to_string(), "wordpress".to_string()],
            image_generation: true,
            backend_tools: true,
            external_tools: vec![],
        }
    }

    fn request(article_count: usize) -> PlanRequest {
        PlanRequest {
            request: "a beginner roasting series".to_string(),
            article_count,
            requested_targets: vec![],
            want_images: true,
        }
    }

    #[test]
    fn phases_are_ordered_and_sequences_contiguous() {
        let (plan, _) = PlanBuilder::build(&request(3), &config(), &integrations()).unwrap();

        for (i, step) in plan.steps.iter().enumerate() {
            assert_eq!(step.sequence, i as u32 + 1, "sequence gap at {}", i);
        }
        let phases: Vec<_> = plan.steps.iter().map(|s| s.phase).collect();
        let mut sorted = phases.clone();
        sorted.sort();
        assert_eq!(phases, sorted, "phases out of order: {:?}", phases);
        assert_eq!(phases.first(), Some(&WorkflowPhase::Research));
        assert_eq!(phases.last(), Some(&WorkflowPhase::Publishing));
    }

    #[test]
    fn fifteen_hundred_words_plans_six_images() {
        let (plan, _) = PlanBuilder::build(&request(1), &config(), &integrations()).unwrap();
        assert_eq!(plan.settings.content_images, 5);
        assert_eq!(plan.settings.total_images, 6);
    }

    #[test]
    fn no_images_when_credential_is_missing() {
        let mut available = integrations();
        available.image_generation = false;
        let (plan, _) = PlanBuilder::build(&request(1), &config(), &available).unwrap();
        assert_eq!(plan.settings.total_images, 0);
        assert!(!plan.steps.iter().any(|s| s.action == StepAction::GenerateImages));
    }

    #[test]
    fn calendar_only_appears_for_multi_article_plans() {
        let (single, _) = PlanBuilder::build(&request(1), &config(), &integrations()).unwrap();
        assert!(!single.steps.iter().any(|s| s.action == StepAction::ContentCalendar));

        let (multi, _) = PlanBuilder::build(&request(2), &config(), &integrations()).unwrap();
        assert!(multi.steps.iter().any(|s| s.action == StepAction::ContentCalendar));
    }

    #[test]
    fn one_write_step_per_article_with_progress_text() {
        let (plan, _) = PlanBuilder::build(&request(3), &config(), &integrations()).unwrap();
        let writes: Vec<_> = plan
            .steps
            .iter()
            .filter(|s| s.action == StepAction::WriteArticle)
            .collect();
        assert_eq!(writes.len(), 3);
        assert!(writes[0].instruction.contains("article 1 of 3"));
        assert!(writes[2].instruction.contains("article 3 of 3"));
    }

    #[test]
    fn explicit_targets_are_used_verbatim() {
        let mut req = request(1);
        req.requested_targets = vec!["medium".to_string()];
        let (plan, _) = PlanBuilder::build(&req, &config(), &integrations()).unwrap();
        assert_eq!(plan.publish_targets, vec!["medium".to_string()]);
    }

    #[test]
    fn all_sentinel_resolves_to_available_platforms() {
        let mut req = request(1);
        req.requested_targets = vec!["all".to_string()];
        let (plan, _) = PlanBuilder::build(&req, &config(), &integrations()).unwrap();
        assert_eq!(plan.publish_targets, vec!["ghost".to_string(), "wordpress".to_string()]);
    }

    #[test]
    fn no_publish_step_without_targets() {
        let mut available = integrations();
        available.publishing_platforms.clear();
        let (plan, _) = PlanBuilder::build(&request(1), &config(), &available).unwrap();
        assert!(plan.publish_targets.is_empty());
        assert!(!plan.steps.iter().any(|s| s.action == StepAction::Publish));
    }

    #[test]
    fn configuration_errors_are_itemized() {
        let mut bad = config();
        bad.target_word_count = Some(50);
        bad.brand_voice = None;
        bad.niche = None;

        let err = PlanBuilder::build(&request(1), &bad, &integrations()).unwrap_err();
        let QuillError::Configuration { issues } = err else {
            panic!("expected a configuration error");
        };
        assert_eq!(issues.len(), 3, "all issues must be reported: {:?}", issues);
        assert!(issues.iter().any(|i| i.contains("below the minimum")));
        assert!(issues.iter().any(|i| i.contains("brand voice")));
        assert!(issues.iter().any(|i| i.contains("niche")));
    }

    #[test]
    fn advisory_gaps_warn_instead_of_failing() {
        let mut sparse = config();
        sparse.primary_keywords.clear();
        sparse.target_audience = None;

        let (_, warnings) = PlanBuilder::build(&request(1), &sparse, &integrations()).unwrap();
        assert!(warnings.contains(&PlanWarning::NoPrimaryKeywords));
        assert!(warnings.contains(&PlanWarning::NoTargetAudience));
    }
}
