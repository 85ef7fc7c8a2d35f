//! Plain-text rendering of report and snapshot data.
//!
//! Pure functions from data to display strings. Nothing here mutates state
//! or performs I/O, so front ends can render the same structures however
//! they like and tests can assert on exact output.

use crate::session_usecase::SessionSnapshot;
use quill_core::publish::BatchReport;
use quill_core::workflow::{PlanWarning, WorkflowPlan};

/// Renders a workflow plan as a numbered step list with a header.
pub fn render_plan(plan: &WorkflowPlan, warnings: &[PlanWarning]) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Workflow plan: {} article(s) for \"{}\"\n",
        plan.article_count, plan.request
    ));
    if !plan.publish_targets.is_empty() {
        out.push_str(&format!(
            "Publish targets: {}\n",
            plan.publish_targets.join(", ")
        ));
    }
    for warning in warnings {
        out.push_str(&format!("Warning: {}\n", warning));
    }
    out.push('\n');
    for step in &plan.steps {
        out.push_str(&format!(
            "{:>3}. [{}] {}\n",
            step.sequence, step.phase, step.instruction
        ));
    }
    out
}

/// Renders a batch publish report.
pub fn render_report(report: &BatchReport) -> String {
    if let Some(notice) = &report.notice {
        return format!("Nothing published: {}\n", notice);
    }

    let mut out = String::new();
    for article in &report.articles {
        out.push_str(&format!(
            "{} ({} words)\n",
            article.title, article.word_count
        ));
        for outcome in &article.outcomes {
            let mark = if outcome.success { "ok" } else { "failed" };
            out.push_str(&format!(
                "  {} {}: {}\n",
                mark, outcome.platform, outcome.detail
            ));
        }
    }
    out.push_str(&format!(
        "\n{}/{} article(s) published, {} words total\n",
        report.succeeded, report.attempted, report.total_words
    ));
    out
}

/// Renders the session snapshot as a status view.
pub fn render_snapshot(snapshot: &SessionSnapshot) -> String {
    let mut out = String::new();

    match &snapshot.workflow {
        Some(workflow) => out.push_str(&format!(
            "Workflow: \"{}\" ({} steps, {} article(s))\n",
            workflow.request, workflow.step_count, workflow.article_count
        )),
        None => out.push_str("Workflow: none\n"),
    }

    if snapshot.articles.is_empty() {
        out.push_str("Articles: none\n");
    } else {
        out.push_str(&format!("Articles: {}\n", snapshot.articles.len()));
        for article in &snapshot.articles {
            let status = if article.published {
                format!("published to {}", article.published_to.join(", "))
            } else {
                "unpublished".to_string()
            };
            out.push_str(&format!(
                "  {}. {} ({} words, {})\n",
                article.index, article.title, article.word_count, status
            ));
        }
    }

    if snapshot.draft_in_progress {
        out.push_str("Draft: in progress\n");
    }
    if let Some(folder) = &snapshot.content_folder {
        out.push_str(&format!("Last saved to: {}\n", folder.display()));
    }
    out
}
