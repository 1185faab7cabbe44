//! End-to-end `build` pipeline: tables → normalize → aggregate/match → dataset.

use std::path::PathBuf;
use std::time::Instant;

use tracing::{info, instrument, warn};

use dashprep_shared::{DashboardData, RecruitmentView, Researcher, ResearcherProfile, Result, RunId};

use crate::aggregate::aggregate;
use crate::assembler::{self, AssembleConfig, InputSpec};
use crate::catalog::{AggregateLimits, MatchRules, round1};
use crate::normalize::normalize_researchers;
use crate::recruit::build_recruitment;

/// Which artifacts `build` emits (the manifest is always written).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmitSelection {
    Json,
    Ts,
    All,
}

impl EmitSelection {
    pub fn json(&self) -> bool {
        matches!(self, EmitSelection::Json | EmitSelection::All)
    }

    pub fn ts(&self) -> bool {
        matches!(self, EmitSelection::Ts | EmitSelection::All)
    }
}

/// Configuration for the `build` pipeline.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Personnel table path (CSV).
    pub personnel_path: PathBuf,
    /// Funded-projects table path (CSV).
    pub projects_path: PathBuf,
    /// Root directory for dataset output.
    pub output_root: PathBuf,
    /// Dataset name (directory name under the output root).
    pub name: String,
    /// Tool version string.
    pub tool_version: String,
    /// Recruitment target year.
    pub target_year: i32,
    /// Ranking limits for the aggregator.
    pub limits: AggregateLimits,
    /// Matched projects kept in the recruitment detail list.
    pub top_projects: usize,
    /// Artifacts to emit.
    pub emit: EmitSelection,
}

/// Result of the `build` pipeline.
#[derive(Debug)]
pub struct BuildResult {
    /// Path to the assembled dataset directory.
    pub dataset_path: PathBuf,
    /// Run identifier.
    pub run_id: RunId,
    /// Researchers normalized from the personnel table.
    pub researcher_count: usize,
    /// Projects matched to a platform by the recruitment matcher.
    pub matched_project_count: usize,
    /// True when the projects table was unavailable and the recruitment
    /// view degraded to empty.
    pub recruitment_degraded: bool,
    /// Total elapsed time.
    pub elapsed: std::time::Duration,
}

/// Progress callback for reporting pipeline status.
pub trait ProgressReporter {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called when the pipeline completes.
    fn done(&self, result: &BuildResult);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn done(&self, _result: &BuildResult) {}
}

/// Run the full `build` pipeline.
///
/// 1. Load and normalize the personnel table (fatal if unavailable)
/// 2. Aggregate platform statistics
/// 3. Load the projects table and match recruitment candidates
///    (degrades to an empty view if unavailable)
/// 4. Assemble the dataset directory
#[instrument(skip_all, fields(name = %config.name, personnel = %config.personnel_path.display()))]
pub fn build_dataset(
    config: &BuildConfig,
    progress: &dyn ProgressReporter,
) -> Result<BuildResult> {
    let start = Instant::now();
    let run_id = RunId::new();

    info!(%run_id, "starting build pipeline");

    // --- Phase 1: Personnel ---
    progress.phase("Loading personnel table");
    let personnel = dashprep_tabular::read_personnel(&config.personnel_path)?;

    progress.phase("Normalizing researchers");
    let researchers = normalize_researchers(&personnel);

    // --- Phase 2: Aggregation ---
    progress.phase("Aggregating platform statistics");
    let views = aggregate(&researchers, &config.limits);

    // --- Phase 3: Recruitment ---
    // Aggregator output must survive a missing projects table: the
    // recruitment view degrades to empty instead of failing the build.
    progress.phase("Matching recruitment candidates");
    let rules = MatchRules::standard(config.target_year, config.top_projects);
    let (recruitment, project_rows, recruitment_degraded) =
        match dashprep_tabular::read_projects(&config.projects_path) {
            Ok(rows) => {
                let view = build_recruitment(&rows, &researchers, &rules);
                (view, rows.len(), false)
            }
            Err(e) => {
                warn!(error = %e, "projects table unavailable, recruitment degraded to empty");
                (RecruitmentView::empty(), 0, true)
            }
        };
    let matched_project_count = recruitment.top_projects.len();

    let data = DashboardData {
        demographics: views.demographics,
        performance: views.performance,
        avg_stats: views.avg_stats,
        platform: views.platform,
        recruitment,
        researchers: roster(&researchers),
    };

    // --- Phase 4: Assembly ---
    progress.phase("Assembling dataset");
    let mut inputs = vec![InputSpec {
        role: "personnel".into(),
        path: config.personnel_path.clone(),
        rows: personnel.len(),
    }];
    if !recruitment_degraded {
        inputs.push(InputSpec {
            role: "projects".into(),
            path: config.projects_path.clone(),
            rows: project_rows,
        });
    }

    let assemble_config = AssembleConfig {
        run_id: run_id.clone(),
        name: config.name.clone(),
        output_root: config.output_root.clone(),
        tool_version: config.tool_version.clone(),
        inputs,
        emit: config.emit,
    };

    let assembled = assembler::assemble(&assemble_config, &data)?;

    let result = BuildResult {
        dataset_path: assembled.dataset_path,
        run_id,
        researcher_count: researchers.len(),
        matched_project_count,
        recruitment_degraded,
        elapsed: start.elapsed(),
    };

    progress.done(&result);

    info!(
        run_id = %result.run_id,
        researchers = result.researcher_count,
        matched_projects = result.matched_project_count,
        degraded = result.recruitment_degraded,
        elapsed_ms = result.elapsed.as_millis(),
        "build pipeline complete"
    );

    Ok(result)
}

/// Build the exported researcher roster. Funding is rounded here, at the
/// output boundary.
fn roster(researchers: &[Researcher]) -> Vec<ResearcherProfile> {
    researchers
        .iter()
        .map(|r| ResearcherProfile {
            id: r.id.clone(),
            name: r.name.clone(),
            department: r.department.clone(),
            position: r.position,
            keywords: r.keywords.clone(),
            major_research: r.keywords.first().cloned().unwrap_or_default(),
            publications: r.publications,
            budget: round1(r.budget),
            platforms: r.platforms,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
