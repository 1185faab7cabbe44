//! Named constant tables driving the pipeline stages.
//!
//! Every fixed table — keyword lists, histogram bins, ranking limits — is a
//! value passed into the stage that consumes it, so tests can substitute
//! smaller fixtures without touching global state.

use dashprep_shared::Platform;

/// Funding denomination divisor: raw KRW amounts are divided by 10^8 (억)
/// for display consistency across every view.
pub const DENOMINATION: f64 = 100_000_000.0;

/// Round to 1 decimal place (funding totals).
pub fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

/// Round to 2 decimal places (per-researcher averages).
pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

// ---------------------------------------------------------------------------
// Career-year histogram bins
// ---------------------------------------------------------------------------

/// Display labels of the nine career-start-year bins.
pub const CAREER_BIN_LABELS: [&str; 9] = [
    "1980이전",
    "1980-84",
    "1985-89",
    "1990-94",
    "1995-99",
    "2000-04",
    "2005-09",
    "2010-14",
    "2015이후",
];

/// Lower edges of bins 1..=8. Years below the first edge fall into the
/// open-ended first bin, years at or above the last edge into the
/// open-ended final bin; interior bins are left-inclusive.
pub const CAREER_BIN_EDGES: [i32; 8] = [1980, 1985, 1990, 1995, 2000, 2005, 2010, 2015];

/// Years at or below this are treated as unknown and excluded from the
/// histogram.
pub const CAREER_YEAR_FLOOR: i32 = 1900;

/// Bin index for a career-start year, or `None` when the year is unknown.
pub fn career_bin(year: i32) -> Option<usize> {
    if year <= CAREER_YEAR_FLOOR {
        return None;
    }
    let mut bin = 0;
    for (i, edge) in CAREER_BIN_EDGES.iter().enumerate() {
        if year >= *edge {
            bin = i + 1;
        }
    }
    Some(bin)
}

// ---------------------------------------------------------------------------
// Ranking limits
// ---------------------------------------------------------------------------

/// Top-N limits for the aggregator's department rankings.
#[derive(Debug, Clone)]
pub struct AggregateLimits {
    /// Departments kept in the demographics ranking.
    pub top_departments: usize,
    /// Departments kept in the performance ranking.
    pub top_performance: usize,
}

impl Default for AggregateLimits {
    fn default() -> Self {
        Self {
            top_departments: 10,
            top_performance: 7,
        }
    }
}

// ---------------------------------------------------------------------------
// Recruitment match rules
// ---------------------------------------------------------------------------

/// Keyword list for one platform category.
#[derive(Debug, Clone)]
pub struct KeywordSet {
    pub platform: Platform,
    pub keywords: Vec<String>,
}

/// Rules for the recruitment matcher: which funding year to consider, how
/// many projects to expose, and the keyword table used for scoring.
#[derive(Debug, Clone)]
pub struct MatchRules {
    pub target_year: i32,
    pub top_projects: usize,
    pub keyword_sets: Vec<KeywordSet>,
}

impl MatchRules {
    /// The standard keyword table, one set per platform in canonical order.
    pub fn standard(target_year: i32, top_projects: usize) -> Self {
        let keyword_sets = Platform::ALL
            .into_iter()
            .map(|platform| KeywordSet {
                platform,
                keywords: platform_keywords(platform)
                    .iter()
                    .map(|k| (*k).to_string())
                    .collect(),
            })
            .collect();

        Self {
            target_year,
            top_projects,
            keyword_sets,
        }
    }
}

/// The fixed per-platform keyword vocabulary used for project matching.
pub fn platform_keywords(platform: Platform) -> &'static [&'static str] {
    match platform {
        Platform::Data => &[
            "데이터",
            "AI",
            "인공지능",
            "빅데이터",
            "클라우드",
            "머신러닝",
            "딥러닝",
            "스마트",
        ],
        Platform::PhysicianScientist => &["의사과학자", "혁신형", "양성"],
        Platform::Regeneration => &["재생", "줄기세포", "오가노이드", "조직공학", "바이오프린팅"],
        Platform::MedicalDevice => &[
            "의료기기",
            "디바이스",
            "로봇",
            "센서",
            "영상",
            "진단기기",
            "웨어러블",
        ],
        Platform::ImmuneMicrobiome => &["면역", "마이크로바이옴", "백신", "감염", "바이러스", "항체"],
        Platform::NewDrug => &["신약", "약물", "치료제", "항암제", "표적", "후보물질"],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn career_bins_cover_the_line() {
        assert_eq!(career_bin(1979), Some(0));
        assert_eq!(career_bin(1980), Some(1));
        assert_eq!(career_bin(1984), Some(1));
        assert_eq!(career_bin(1985), Some(2));
        assert_eq!(career_bin(1999), Some(4));
        assert_eq!(career_bin(2014), Some(7));
        assert_eq!(career_bin(2015), Some(8));
        assert_eq!(career_bin(2031), Some(8));
    }

    #[test]
    fn unknown_years_have_no_bin() {
        assert_eq!(career_bin(0), None);
        assert_eq!(career_bin(1900), None);
        assert_eq!(career_bin(-5), None);
        assert_eq!(career_bin(1901), Some(0));
    }

    #[test]
    fn standard_rules_cover_all_platforms() {
        let rules = MatchRules::standard(2025, 20);
        assert_eq!(rules.keyword_sets.len(), 6);
        for set in &rules.keyword_sets {
            assert!(!set.keywords.is_empty());
        }
        let data = &rules.keyword_sets[Platform::Data.index()];
        assert!(data.keywords.iter().any(|k| k == "빅데이터"));
    }

    #[test]
    fn rounding_helpers() {
        assert_eq!(round1(5.04), 5.0);
        assert_eq!(round1(5.25), 5.3);
        assert_eq!(round2(1.234), 1.23);
        assert_eq!(round2(1.125), 1.13);
    }
}
