//! Recruitment matching: eligible-PI projects → platform potential.
//!
//! A single filter → dedup → classify → aggregate pass. Eligible PIs are
//! researchers belonging to no platform; their funded projects for the
//! target year are attributed to the platform whose keyword list scores
//! strictly highest against the project title. Ties and zero-score titles
//! are excluded entirely — they contribute to no total and no list.

use std::collections::HashSet;

use tracing::{debug, instrument};

use dashprep_shared::{
    MatchedProject, Platform, PlatformPotential, Project, RecruitmentView, Researcher,
    identity_key,
};
use dashprep_tabular::{ProjectRow, value};

use crate::catalog::{DENOMINATION, MatchRules, round1};

/// Build the recruitment-potential view from the raw projects table and
/// the normalized researcher population.
#[instrument(skip_all, fields(rows = rows.len(), target_year = rules.target_year))]
pub fn build_recruitment(
    rows: &[ProjectRow],
    researchers: &[Researcher],
    rules: &MatchRules,
) -> RecruitmentView {
    let eligible = eligible_pi_keys(researchers);

    let candidates: Vec<Project> = rows
        .iter()
        .map(project_from_row)
        .filter(|p| p.year == Some(rules.target_year))
        .filter(|p| eligible.contains(&identity_key(&p.pi)))
        .collect();

    let before = candidates.len();
    let projects = dedup_projects(candidates);
    debug!(
        kept = projects.len(),
        removed = before - projects.len(),
        "eligible projects after dedup"
    );

    let mut potential = [0.0f64; Platform::ALL.len()];
    let mut matched: Vec<(Project, Platform)> = Vec::new();

    for project in projects {
        if let Some(platform) = match_platform(&project.title, rules) {
            potential[platform.index()] += project.budget;
            matched.push((project, platform));
        }
    }

    matched.sort_by(|a, b| {
        b.0.budget
            .partial_cmp(&a.0.budget)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let total: f64 = matched.iter().map(|(p, _)| p.budget).sum();

    RecruitmentView {
        total_potential: round1(total),
        platform_potential: Platform::ALL
            .into_iter()
            .map(|platform| PlatformPotential {
                platform,
                budget: round1(potential[platform.index()]),
            })
            .collect(),
        top_projects: matched
            .into_iter()
            .take(rules.top_projects)
            .map(|(p, platform)| MatchedProject {
                title: p.title,
                pi: p.pi,
                budget: round1(p.budget),
                platform,
                project_name: p.project_name,
            })
            .collect(),
    }
}

/// Identity keys of researchers with an empty platform set.
fn eligible_pi_keys(researchers: &[Researcher]) -> HashSet<String> {
    researchers
        .iter()
        .filter(|r| r.platforms.is_empty())
        .map(|r| r.identity_key())
        .collect()
}

/// Boundary default substitution for one raw project row.
fn project_from_row(row: &ProjectRow) -> Project {
    Project {
        title: value::text(row.title.as_deref()),
        project_name: value::text(row.project.as_deref()),
        pi: value::text(row.pi.as_deref()),
        year: value::year(row.year.as_deref()),
        budget: value::number_or_zero(row.budget.as_deref()) / DENOMINATION,
    }
}

/// Remove exact duplicates on (title, project_name, year, pi), keeping the
/// first occurrence. Differing budgets alone do not make rows distinct.
fn dedup_projects(projects: Vec<Project>) -> Vec<Project> {
    let mut seen: HashSet<(String, String, Option<i32>, String)> = HashSet::new();
    projects
        .into_iter()
        .filter(|p| {
            seen.insert((
                p.title.clone(),
                p.project_name.clone(),
                p.year,
                p.pi.clone(),
            ))
        })
        .collect()
}

/// Score a title against every keyword set; the strictly highest count
/// wins. A keyword counts once no matter how often it occurs (substring
/// match, case-sensitive). Ties and zero-score titles match nothing.
pub fn match_platform(title: &str, rules: &MatchRules) -> Option<Platform> {
    let mut best: Option<Platform> = None;
    let mut best_count = 0usize;
    let mut tied = false;

    for set in &rules.keyword_sets {
        let count = set
            .keywords
            .iter()
            .filter(|k| title.contains(k.as_str()))
            .count();
        if count == 0 {
            continue;
        }
        if count > best_count {
            best = Some(set.platform);
            best_count = count;
            tied = false;
        } else if count == best_count {
            tied = true;
        }
    }

    if tied { None } else { best }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
