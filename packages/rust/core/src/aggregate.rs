//! Platform aggregation: the researcher population → dashboard views.
//!
//! Every view is a pure reduction with deterministic output order. Series
//! over positions and platforms always follow the canonical orders and
//! keep zero-count entries. Funding is summed at full precision and
//! rounded exactly once, when the view is built.

use std::collections::HashMap;

use tracing::instrument;

use dashprep_shared::{
    AvgStatsView, DemographicsView, PerformanceEntry, Platform, PlatformView, Position,
    PositionSeries, Researcher,
};

use crate::catalog::{self, AggregateLimits, CAREER_BIN_LABELS, round1, round2};

/// The four independent views produced by the aggregator.
#[derive(Debug, Clone)]
pub struct AggregateViews {
    pub demographics: DemographicsView,
    pub performance: Vec<PerformanceEntry>,
    pub avg_stats: AvgStatsView,
    pub platform: PlatformView,
}

/// Compute all aggregate views over the normalized population.
#[instrument(skip_all, fields(researchers = researchers.len()))]
pub fn aggregate(researchers: &[Researcher], limits: &AggregateLimits) -> AggregateViews {
    AggregateViews {
        demographics: demographics(researchers, limits.top_departments),
        performance: performance(researchers, limits.top_performance),
        avg_stats: avg_stats(researchers),
        platform: platform_view(researchers),
    }
}

// ---------------------------------------------------------------------------
// Demographics
// ---------------------------------------------------------------------------

fn demographics(researchers: &[Researcher], top_departments: usize) -> DemographicsView {
    // Position histogram: fixed canonical order, zero counts kept.
    let mut position_counts = [0u32; Position::ALL.len()];
    for r in researchers {
        position_counts[r.position.index()] += 1;
    }

    // Department ranking over non-empty departments.
    let ranked = count_departments(researchers);
    let top: Vec<(String, u32)> = ranked.into_iter().take(top_departments).collect();
    let dept_top10_labels: Vec<String> = top.iter().map(|(name, _)| name.clone()).collect();
    let dept_top10_values: Vec<u32> = top.iter().map(|(_, count)| *count).collect();

    // Per-department position breakdown, one series per bucket. A bucket
    // with no researchers in a department stays in the series with count 0.
    let dept_top10_breakdown = Position::ALL
        .iter()
        .map(|pos| PositionSeries {
            label: pos.label().to_string(),
            counts: dept_top10_labels
                .iter()
                .map(|dept| {
                    researchers
                        .iter()
                        .filter(|r| r.department == *dept && r.position == *pos)
                        .count() as u32
                })
                .collect(),
        })
        .collect();

    // Career-year histogram; unknown years (≤ floor) are excluded.
    let mut year_values = vec![0u32; CAREER_BIN_LABELS.len()];
    for r in researchers {
        if let Some(bin) = catalog::career_bin(r.career_start_year) {
            year_values[bin] += 1;
        }
    }

    DemographicsView {
        position_labels: position_labels(),
        position_counts: position_counts.to_vec(),
        dept_top10_labels,
        dept_top10_values,
        dept_top10_breakdown,
        year_labels: CAREER_BIN_LABELS.iter().map(|l| (*l).to_string()).collect(),
        year_values,
    }
}

fn position_labels() -> Vec<String> {
    Position::ALL.iter().map(|p| p.label().to_string()).collect()
}

/// Count researchers per non-empty department, descending by count.
/// Equal counts keep first-encounter order (stable sort) — this tie order
/// is implementation-defined, not contractual.
fn count_departments(researchers: &[Researcher]) -> Vec<(String, u32)> {
    let mut order: Vec<String> = Vec::new();
    let mut counts: HashMap<String, u32> = HashMap::new();

    for r in researchers {
        if r.department.is_empty() {
            continue;
        }
        if !counts.contains_key(&r.department) {
            order.push(r.department.clone());
        }
        *counts.entry(r.department.clone()).or_default() += 1;
    }

    let mut ranked: Vec<(String, u32)> = order
        .into_iter()
        .map(|dept| {
            let count = counts[&dept];
            (dept, count)
        })
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked
}

// ---------------------------------------------------------------------------
// Performance
// ---------------------------------------------------------------------------

/// Sum funding and publications per department (the unknown, empty-named
/// department included), keep the top N by funding.
fn performance(researchers: &[Researcher], top_performance: usize) -> Vec<PerformanceEntry> {
    let mut order: Vec<String> = Vec::new();
    let mut budgets: HashMap<String, f64> = HashMap::new();
    let mut papers: HashMap<String, u32> = HashMap::new();

    for r in researchers {
        if !budgets.contains_key(&r.department) {
            order.push(r.department.clone());
        }
        *budgets.entry(r.department.clone()).or_default() += r.budget;
        *papers.entry(r.department.clone()).or_default() += r.publications;
    }

    let mut entries: Vec<PerformanceEntry> = order
        .into_iter()
        .map(|dept| PerformanceEntry {
            budget: budgets[&dept],
            papers: papers[&dept],
            name: dept,
        })
        .collect();

    entries.sort_by(|a, b| {
        b.budget
            .partial_cmp(&a.budget)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    entries.truncate(top_performance);

    for entry in &mut entries {
        entry.budget = round1(entry.budget);
    }
    entries
}

// ---------------------------------------------------------------------------
// Per-position averages
// ---------------------------------------------------------------------------

fn avg_stats(researchers: &[Researcher]) -> AvgStatsView {
    let mut avg_papers = Vec::with_capacity(Position::ALL.len());
    let mut avg_budget = Vec::with_capacity(Position::ALL.len());

    for pos in Position::ALL {
        let bucket: Vec<&Researcher> = researchers.iter().filter(|r| r.position == pos).collect();
        if bucket.is_empty() {
            // An empty bucket yields 0, never a division error.
            avg_papers.push(0.0);
            avg_budget.push(0.0);
            continue;
        }

        let n = bucket.len() as f64;
        let papers_sum: u32 = bucket.iter().map(|r| r.publications).sum();
        let budget_sum: f64 = bucket.iter().map(|r| r.budget).sum();
        avg_papers.push(round1(papers_sum as f64 / n));
        avg_budget.push(round2(budget_sum / n));
    }

    AvgStatsView {
        labels: position_labels(),
        avg_papers,
        avg_budget,
    }
}

// ---------------------------------------------------------------------------
// Platform participation and funding
// ---------------------------------------------------------------------------

fn platform_view(researchers: &[Researcher]) -> PlatformView {
    let mut platform_budgets = [0.0f64; Platform::ALL.len()];
    let mut breakdown_counts = [[0u32; Platform::ALL.len()]; Position::ALL.len()];
    let mut non_participating_budget = 0.0;
    let mut participating = 0u32;

    for r in researchers {
        if r.platforms.is_empty() {
            non_participating_budget += r.budget;
            continue;
        }

        participating += 1;
        // A researcher in k platforms contributes funding and headcount to
        // all k — totals are intentionally not divided across memberships.
        for platform in r.platforms.iter() {
            platform_budgets[platform.index()] += r.budget;
            breakdown_counts[r.position.index()][platform.index()] += 1;
        }
    }

    let mut budget: Vec<f64> = platform_budgets.iter().map(|b| round1(*b)).collect();
    // Non-participating total funding is a final, separate slot — not one
    // of the six platform labels.
    budget.push(round1(non_participating_budget));

    PlatformView {
        participation: vec![researchers.len() as u32 - participating, participating],
        labels: Platform::ALL.iter().map(|p| p.label().to_string()).collect(),
        budget,
        breakdown: Position::ALL
            .iter()
            .map(|pos| PositionSeries {
                label: pos.label().to_string(),
                counts: breakdown_counts[pos.index()].to_vec(),
            })
            .collect(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn make_researcher(
        id: u32,
        name: &str,
        department: &str,
        position: Position,
        budget: f64,
        publications: u32,
        career_start_year: i32,
        platforms: &[Platform],
    ) -> Researcher {
        Researcher {
            id: id.to_string(),
            name: name.into(),
            department: department.into(),
            position,
            keywords: vec![],
            publications,
            budget,
            career_start_year,
            platforms: platforms.iter().copied().collect(),
        }
    }

    fn sample_population() -> Vec<Researcher> {
        vec![
            make_researcher(1, "김진원", "내과", Position::Professor, 5.0, 12, 1995, &[
                Platform::Regeneration,
                Platform::Data,
            ]),
            make_researcher(2, "이수민", "외과", Position::Associate, 2.5, 8, 2005, &[
                Platform::MedicalDevice,
            ]),
            make_researcher(3, "박철수", "내과", Position::Assistant, 1.2, 3, 2012, &[]),
            make_researcher(4, "최유리", "병리과", Position::Other, 0.0, 0, 0, &[]),
            make_researcher(5, "정민아", "외과", Position::Unknown, 0.8, 2, 1978, &[
                Platform::NewDrug,
            ]),
        ]
    }

    #[test]
    fn position_histogram_sums_to_population() {
        let researchers = sample_population();
        let views = aggregate(&researchers, &AggregateLimits::default());

        let counts = &views.demographics.position_counts;
        assert_eq!(counts.len(), Position::ALL.len());
        assert_eq!(counts.iter().sum::<u32>() as usize, researchers.len());
        // Fixed order, zero-count buckets kept: no 임상조교수 in the sample.
        assert_eq!(counts[Position::ClinicalAssistant.index()], 0);
    }

    #[test]
    fn department_ranking_counts_and_breakdown() {
        let researchers = sample_population();
        let views = aggregate(&researchers, &AggregateLimits::default());
        let demo = &views.demographics;

        assert_eq!(demo.dept_top10_labels[0], "내과");
        assert_eq!(demo.dept_top10_values[0], 2);

        // Every position series covers every ranked department; a bucket
        // with zero researchers appears with count 0, not omitted.
        assert_eq!(demo.dept_top10_breakdown.len(), Position::ALL.len());
        for series in &demo.dept_top10_breakdown {
            assert_eq!(series.counts.len(), demo.dept_top10_labels.len());
        }
        let professor = &demo.dept_top10_breakdown[Position::Professor.index()];
        let naegwa = demo
            .dept_top10_labels
            .iter()
            .position(|d| d == "내과")
            .unwrap();
        let pathology = demo
            .dept_top10_labels
            .iter()
            .position(|d| d == "병리과")
            .unwrap();
        assert_eq!(professor.counts[naegwa], 1);
        assert_eq!(professor.counts[pathology], 0);
    }

    #[test]
    fn department_ranking_ignores_empty_department() {
        let mut researchers = sample_population();
        researchers.push(make_researcher(
            6,
            "무소속",
            "",
            Position::Professor,
            9.0,
            1,
            2000,
            &[],
        ));
        let views = aggregate(&researchers, &AggregateLimits::default());
        assert!(
            views
                .demographics
                .dept_top10_labels
                .iter()
                .all(|d| !d.is_empty())
        );
    }

    #[test]
    fn department_tie_keeps_first_encounter_order() {
        // 외과 and 내과 both have 2 researchers; 내과 appears first in the
        // input, so it ranks first.
        let researchers = sample_population();
        let views = aggregate(&researchers, &AggregateLimits::default());
        assert_eq!(
            views.demographics.dept_top10_labels,
            vec!["내과".to_string(), "외과".into(), "병리과".into()]
        );
    }

    #[test]
    fn career_histogram_excludes_unknown_years() {
        let researchers = sample_population();
        let views = aggregate(&researchers, &AggregateLimits::default());
        let years = &views.demographics.year_values;

        assert_eq!(years.len(), 9);
        // 최유리 has year 0 — excluded, so only 4 researchers binned.
        assert_eq!(years.iter().sum::<u32>(), 4);
        assert_eq!(years[0], 1); // 1978
        assert_eq!(years[4], 1); // 1995
        assert_eq!(years[6], 1); // 2005
        assert_eq!(years[7], 1); // 2012
    }

    #[test]
    fn performance_is_sorted_and_truncated() {
        let researchers = sample_population();
        let views = aggregate(
            &researchers,
            &AggregateLimits {
                top_departments: 10,
                top_performance: 2,
            },
        );

        assert_eq!(views.performance.len(), 2);
        assert_eq!(views.performance[0].name, "내과");
        assert_eq!(views.performance[0].budget, 6.2);
        assert_eq!(views.performance[0].papers, 15);
        assert_eq!(views.performance[1].name, "외과");
        assert_eq!(views.performance[1].budget, 3.3);
    }

    #[test]
    fn avg_stats_empty_bucket_is_zero() {
        let researchers = sample_population();
        let views = aggregate(&researchers, &AggregateLimits::default());
        let avg = &views.avg_stats;

        let clinical = Position::ClinicalAssistant.index();
        assert_eq!(avg.avg_papers[clinical], 0.0);
        assert_eq!(avg.avg_budget[clinical], 0.0);

        let professor = Position::Professor.index();
        assert_eq!(avg.avg_papers[professor], 12.0);
        assert_eq!(avg.avg_budget[professor], 5.0);
    }

    #[test]
    fn platform_funding_counts_multi_membership_once_per_platform() {
        let researchers = sample_population();
        let views = aggregate(&researchers, &AggregateLimits::default());
        let platform = &views.platform;

        assert_eq!(platform.budget.len(), 7);
        // 김진원 (5.0) is in both 데이터 and 정밀재생: each platform total
        // carries the full 5.0.
        assert_eq!(platform.budget[Platform::Data.index()], 5.0);
        assert_eq!(platform.budget[Platform::Regeneration.index()], 5.0);
        // The per-platform sum is therefore inflated over the raw funding
        // sum — by design, not a bug.
        let platform_sum: f64 = platform.budget[..6].iter().sum();
        let raw_participating_sum = 5.0 + 2.5 + 0.8;
        assert!(platform_sum > raw_participating_sum);
        assert!((platform_sum - (raw_participating_sum + 5.0)).abs() < 1e-9);
        // Non-participating total rides in the final slot.
        assert_eq!(platform.budget[6], 1.2);
    }

    #[test]
    fn platform_totals_decompose_exactly_without_multi_membership() {
        let researchers = vec![
            make_researcher(1, "가", "내과", Position::Professor, 3.0, 1, 2000, &[
                Platform::Data,
            ]),
            make_researcher(2, "나", "외과", Position::Associate, 2.0, 1, 2000, &[
                Platform::NewDrug,
            ]),
            make_researcher(3, "다", "외과", Position::Other, 1.5, 0, 2000, &[]),
        ];
        let views = aggregate(&researchers, &AggregateLimits::default());
        let budget = &views.platform.budget;

        let total: f64 = budget.iter().sum();
        let raw: f64 = researchers.iter().map(|r| r.budget).sum();
        assert_eq!(total, raw);
    }

    #[test]
    fn participation_split_is_binary() {
        let researchers = sample_population();
        let views = aggregate(&researchers, &AggregateLimits::default());
        // [non-participating, participating]
        assert_eq!(views.platform.participation, vec![2, 3]);
    }

    #[test]
    fn empty_population_yields_empty_views() {
        let views = aggregate(&[], &AggregateLimits::default());
        assert_eq!(views.demographics.position_counts.iter().sum::<u32>(), 0);
        assert!(views.demographics.dept_top10_labels.is_empty());
        assert!(views.performance.is_empty());
        assert_eq!(views.platform.participation, vec![0, 0]);
        assert_eq!(views.avg_stats.avg_papers, vec![0.0; 6]);
    }
}
