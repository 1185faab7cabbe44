//! Artifact generators for DashPrep.
//!
//! Pure functions from the computed [`DashboardData`] document to file
//! contents. Writing them to disk is the assembler's job; nothing here
//! touches the filesystem.

use serde::Serialize;
use tracing::debug;

use dashprep_shared::{
    DashboardData, DashPrepError, PlatformPotential, PositionSeries, Result,
};

/// Render the dashboard document as pretty-printed JSON (`dashboard.json`).
pub fn render_dashboard_json(data: &DashboardData) -> Result<String> {
    let mut json = serde_json::to_string_pretty(data)
        .map_err(|e| DashPrepError::validation(format!("dashboard serialization failed: {e}")))?;
    json.push('\n');

    debug!(size = json.len(), "rendered dashboard.json");
    Ok(json)
}

/// Render the TypeScript dataset module (`dataset.ts`) consumed by the
/// dashboard frontend.
///
/// Per-position and per-platform breakdowns are emitted as objects keyed
/// by label, in canonical label order, matching the frontend's existing
/// import shape.
pub fn render_dataset_ts(data: &DashboardData) -> String {
    let mut out: Vec<String> = Vec::new();
    let demo = &data.demographics;

    out.push("export const demographicsData = {".into());
    out.push(format!("    positionLabels: {},", json(&demo.position_labels)));
    out.push(format!("    positionCounts: {},", json(&demo.position_counts)));
    out.push(format!("    deptTop10Labels: {},", json(&demo.dept_top10_labels)));
    out.push(format!("    deptTop10Values: {},", json(&demo.dept_top10_values)));
    out.push(format!(
        "    deptTop10Breakdown: {},",
        series_object(&demo.dept_top10_breakdown)
    ));
    out.push(format!("    yearLabels: {},", json(&demo.year_labels)));
    out.push(format!("    yearValues: {}", json(&demo.year_values)));
    out.push("};".into());
    out.push(String::new());

    out.push("export const performanceData = [".into());
    for entry in &data.performance {
        out.push(format!("    {},", json(entry)));
    }
    out.push("];".into());
    out.push(String::new());

    out.push("export const avgStatsData = {".into());
    out.push(format!("    labels: {},", json(&data.avg_stats.labels)));
    out.push(format!("    avgPapers: {},", json(&data.avg_stats.avg_papers)));
    out.push(format!("    avgBudget: {}", json(&data.avg_stats.avg_budget)));
    out.push("};".into());
    out.push(String::new());

    let platform = &data.platform;
    out.push("export const platformData = {".into());
    out.push(format!("    participation: {},", json(&platform.participation)));
    out.push(format!("    labels: {},", json(&platform.labels)));
    out.push(format!("    budget: {},", json(&platform.budget)));
    out.push(format!("    breakdown: {}", series_object(&platform.breakdown)));
    out.push("};".into());
    out.push(String::new());

    let recruitment = &data.recruitment;
    out.push("export const recruitmentData = {".into());
    out.push(format!(
        "    totalPotential: {},",
        json(&recruitment.total_potential)
    ));
    out.push(format!(
        "    platformPotential: {},",
        potential_object(&recruitment.platform_potential)
    ));
    out.push(format!("    topProjects: {}", json(&recruitment.top_projects)));
    out.push("};".into());
    out.push(String::new());

    out.push("export const researchers = [".into());
    for researcher in &data.researchers {
        out.push(format!("    {},", json(researcher)));
    }
    out.push("];".into());

    let module = out.join("\n") + "\n";
    debug!(size = module.len(), "rendered dataset.ts");
    module
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Compact JSON for a literal. The view types cannot fail to serialize;
/// the fallback only guards against future non-string map keys and such.
fn json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "null".into())
}

/// `{"교수": [1, 0], …}` — an object keyed by series label, preserving
/// the canonical order the series arrive in.
fn series_object(series: &[PositionSeries]) -> String {
    let entries: Vec<String> = series
        .iter()
        .map(|s| format!("{}: {}", json(&s.label), json(&s.counts)))
        .collect();
    format!("{{{}}}", entries.join(", "))
}

/// `{"데이터": 5.0, …}` — per-platform totals keyed by label.
fn potential_object(entries: &[PlatformPotential]) -> String {
    let parts: Vec<String> = entries
        .iter()
        .map(|p| format!("{}: {}", json(&p.platform.label()), json(&p.budget)))
        .collect();
    format!("{{{}}}", parts.join(", "))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
