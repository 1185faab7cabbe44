//! Core domain types for DashPrep datasets.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Current schema version for the dataset manifest format.
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

// ---------------------------------------------------------------------------
// RunId
// ---------------------------------------------------------------------------

/// A UUID v7 wrapper for pipeline run identifiers (time-sortable).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(pub Uuid);

impl RunId {
    /// Generate a new time-sortable run identifier.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for RunId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

// ---------------------------------------------------------------------------
// Position
// ---------------------------------------------------------------------------

/// Closed set of position buckets, in the canonical display order used by
/// every per-position series in the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Position {
    /// 교수
    Professor,
    /// 부교수
    Associate,
    /// 조교수
    Assistant,
    /// 임상조교수
    ClinicalAssistant,
    /// 기타 — any non-empty title outside the four recognized ones.
    Other,
    /// 정보없음 — empty or missing title.
    Unknown,
}

impl Position {
    /// All buckets in canonical order. Series over positions always use this
    /// order and always keep zero-count entries.
    pub const ALL: [Position; 6] = [
        Position::Professor,
        Position::Associate,
        Position::Assistant,
        Position::ClinicalAssistant,
        Position::Other,
        Position::Unknown,
    ];

    /// Display label (matches the personnel table's title vocabulary).
    pub fn label(&self) -> &'static str {
        match self {
            Position::Professor => "교수",
            Position::Associate => "부교수",
            Position::Assistant => "조교수",
            Position::ClinicalAssistant => "임상조교수",
            Position::Other => "기타",
            Position::Unknown => "정보없음",
        }
    }

    /// Bucket a raw job-title string. Total function: empty input maps to
    /// [`Position::Unknown`], the four recognized literal titles map to
    /// themselves (exact, case-sensitive), anything else to
    /// [`Position::Other`].
    pub fn from_title(raw: &str) -> Self {
        match raw {
            "" => Position::Unknown,
            "교수" => Position::Professor,
            "부교수" => Position::Associate,
            "조교수" => Position::Assistant,
            "임상조교수" => Position::ClinicalAssistant,
            _ => Position::Other,
        }
    }

    /// Reverse of [`Position::label`], for deserialization.
    pub fn from_label(label: &str) -> Option<Self> {
        Position::ALL.into_iter().find(|p| p.label() == label)
    }

    /// Index into the canonical order.
    pub fn index(&self) -> usize {
        Position::ALL
            .iter()
            .position(|p| p == self)
            .unwrap_or_default()
    }
}

impl Serialize for Position {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for Position {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        Position::from_label(&label)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown position label: {label}")))
    }
}

// ---------------------------------------------------------------------------
// Platform
// ---------------------------------------------------------------------------

/// Closed set of the six research platforms, in the canonical display order
/// used by every per-platform series in the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    /// 데이터
    Data,
    /// 의사과학자
    PhysicianScientist,
    /// 정밀재생
    Regeneration,
    /// 정밀의료기기
    MedicalDevice,
    /// 면역/마이크로
    ImmuneMicrobiome,
    /// 신약
    NewDrug,
}

impl Platform {
    /// All platforms in canonical order.
    pub const ALL: [Platform; 6] = [
        Platform::Data,
        Platform::PhysicianScientist,
        Platform::Regeneration,
        Platform::MedicalDevice,
        Platform::ImmuneMicrobiome,
        Platform::NewDrug,
    ];

    /// Display label used in dashboard series and artifacts.
    pub fn label(&self) -> &'static str {
        match self {
            Platform::Data => "데이터",
            Platform::PhysicianScientist => "의사과학자",
            Platform::Regeneration => "정밀재생",
            Platform::MedicalDevice => "정밀의료기기",
            Platform::ImmuneMicrobiome => "면역/마이크로",
            Platform::NewDrug => "신약",
        }
    }

    /// Membership-flag column name in the personnel table. Differs from the
    /// display label for two platforms.
    pub fn flag_column(&self) -> &'static str {
        match self {
            Platform::Data => "데이터",
            Platform::PhysicianScientist => "혁신형의사과학자",
            Platform::Regeneration => "정밀재생",
            Platform::MedicalDevice => "정밀의료기기",
            Platform::ImmuneMicrobiome => "면역-마이크로바이옴",
            Platform::NewDrug => "신약",
        }
    }

    /// Reverse of [`Platform::label`], for deserialization.
    pub fn from_label(label: &str) -> Option<Self> {
        Platform::ALL.into_iter().find(|p| p.label() == label)
    }

    /// Index into the canonical order.
    pub fn index(&self) -> usize {
        Platform::ALL
            .iter()
            .position(|p| p == self)
            .unwrap_or_default()
    }
}

impl Serialize for Platform {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for Platform {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        Platform::from_label(&label)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown platform label: {label}")))
    }
}

// ---------------------------------------------------------------------------
// PlatformSet
// ---------------------------------------------------------------------------

/// Set-valued platform membership.
///
/// A researcher may belong to zero, one, or several platforms at once; this
/// is a genuine set, not a single categorical field. Funding aggregation
/// over platforms counts a multi-member researcher once per platform.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct PlatformSet(u8);

impl PlatformSet {
    /// The empty set (a non-participating researcher).
    pub fn empty() -> Self {
        Self(0)
    }

    /// Add a platform to the set.
    pub fn insert(&mut self, platform: Platform) {
        self.0 |= 1 << platform.index();
    }

    /// Membership test.
    pub fn contains(&self, platform: Platform) -> bool {
        self.0 & (1 << platform.index()) != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Iterate members in canonical platform order.
    pub fn iter(&self) -> impl Iterator<Item = Platform> + '_ {
        Platform::ALL.into_iter().filter(|p| self.contains(*p))
    }
}

impl FromIterator<Platform> for PlatformSet {
    fn from_iter<I: IntoIterator<Item = Platform>>(iter: I) -> Self {
        let mut set = PlatformSet::empty();
        for p in iter {
            set.insert(p);
        }
        set
    }
}

impl Serialize for PlatformSet {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter().map(|p| p.label()))
    }
}

impl<'de> Deserialize<'de> for PlatformSet {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let labels = Vec::<String>::deserialize(deserializer)?;
        let mut set = PlatformSet::empty();
        for label in labels {
            let platform = Platform::from_label(&label).ok_or_else(|| {
                serde::de::Error::custom(format!("unknown platform label: {label}"))
            })?;
            set.insert(platform);
        }
        Ok(set)
    }
}

// ---------------------------------------------------------------------------
// Researcher
// ---------------------------------------------------------------------------

/// A normalized personnel record. Built once per pipeline run, immutable
/// afterwards. Ids are sequential and stable only within one run.
#[derive(Debug, Clone, PartialEq)]
pub struct Researcher {
    /// Sequential id, assigned at normalization time ("1", "2", …).
    pub id: String,
    /// Display name, surrounding whitespace trimmed. Empty means unknown.
    /// Duplicate names across researchers are expected (homonyms).
    pub name: String,
    /// Department name, empty means unknown — never absent.
    pub department: String,
    pub position: Position,
    /// Specialty keywords, comma-split and trimmed, in source order.
    pub keywords: Vec<String>,
    pub publications: u32,
    /// Funding in the display denomination (raw amount / 10^8), full
    /// precision — rounding happens only when views are built.
    pub budget: f64,
    /// Career-start year; 0 (or anything ≤ 1900) means unknown.
    pub career_start_year: i32,
    pub platforms: PlatformSet,
}

impl Researcher {
    /// Identity-matching form of the name: all whitespace removed.
    /// Used only for cross-dataset joins, never for display.
    pub fn identity_key(&self) -> String {
        identity_key(&self.name)
    }
}

/// Strip all whitespace (internal included) from a name for identity joins.
pub fn identity_key(name: &str) -> String {
    name.chars().filter(|c| !c.is_whitespace()).collect()
}

// ---------------------------------------------------------------------------
// Project
// ---------------------------------------------------------------------------

/// A funded-project record after boundary default substitution.
///
/// Projects carry no explicit identity: two rows are duplicates exactly when
/// (title, project_name, year, pi) all match.
#[derive(Debug, Clone, PartialEq)]
pub struct Project {
    pub title: String,
    /// Free-text programme/project name (the table's `project` column).
    pub project_name: String,
    /// Principal-investigator name as written in the table.
    pub pi: String,
    /// Funding year; `None` when the cell failed numeric coercion.
    pub year: Option<i32>,
    /// Funding in the display denomination, full precision.
    pub budget: f64,
}

// ---------------------------------------------------------------------------
// Dashboard views
// ---------------------------------------------------------------------------

/// One per-position (or per-platform) series of counts, with the series
/// label. Serialized field names follow the dashboard's existing dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionSeries {
    pub label: String,
    pub counts: Vec<u32>,
}

/// Population statistics: position histogram, department top-N, career-year
/// histogram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DemographicsView {
    pub position_labels: Vec<String>,
    pub position_counts: Vec<u32>,
    pub dept_top10_labels: Vec<String>,
    pub dept_top10_values: Vec<u32>,
    /// One series per position bucket; `counts[i]` belongs to
    /// `dept_top10_labels[i]`. Zero-count buckets are kept.
    pub dept_top10_breakdown: Vec<PositionSeries>,
    pub year_labels: Vec<String>,
    pub year_values: Vec<u32>,
}

/// Department funding/publication totals, descending by funding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceEntry {
    pub name: String,
    /// Summed funding, rounded to 1 decimal place.
    pub budget: f64,
    pub papers: u32,
}

/// Per-position averages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvgStatsView {
    pub labels: Vec<String>,
    /// Mean publication count per bucket, 1 decimal place; empty bucket → 0.
    pub avg_papers: Vec<f64>,
    /// Mean funding per bucket, 2 decimal places; empty bucket → 0.
    pub avg_budget: Vec<f64>,
}

/// Per-platform funding and position breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformView {
    /// `[non-participating, participating]` researcher counts.
    pub participation: Vec<u32>,
    /// The six canonical platform labels.
    pub labels: Vec<String>,
    /// Seven values: one funding total per platform (a researcher in k
    /// platforms contributes to all k), then the non-participating total as
    /// a final, separate slot. 1 decimal place each.
    pub budget: Vec<f64>,
    /// One series per position bucket; `counts[i]` belongs to `labels[i]`.
    pub breakdown: Vec<PositionSeries>,
}

/// A project matched to a platform by keyword scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchedProject {
    pub title: String,
    pub pi: String,
    /// Funding, 1 decimal place.
    pub budget: f64,
    pub platform: Platform,
    pub project_name: String,
}

/// Recruitment potential attributed to one platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformPotential {
    pub platform: Platform,
    /// Summed matched funding, 1 decimal place.
    pub budget: f64,
}

/// Recruitment-potential summary over eligible-PI projects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecruitmentView {
    /// Grand total over all matched projects, 1 decimal place.
    pub total_potential: f64,
    /// Per-platform totals in canonical order; zero entries are kept.
    pub platform_potential: Vec<PlatformPotential>,
    /// Matched projects, descending by funding, capped to the configured
    /// list length.
    pub top_projects: Vec<MatchedProject>,
}

impl RecruitmentView {
    /// The degraded result used when the projects table cannot be loaded:
    /// zero totals, empty list. Aggregator output is unaffected.
    pub fn empty() -> Self {
        Self {
            total_potential: 0.0,
            platform_potential: Platform::ALL
                .into_iter()
                .map(|platform| PlatformPotential {
                    platform,
                    budget: 0.0,
                })
                .collect(),
            top_projects: Vec::new(),
        }
    }
}

/// One researcher in the exported roster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResearcherProfile {
    pub id: String,
    pub name: String,
    pub department: String,
    pub position: Position,
    pub keywords: Vec<String>,
    /// First specialty keyword, empty when there are none.
    pub major_research: String,
    pub publications: u32,
    /// Funding, 1 decimal place.
    pub budget: f64,
    pub platforms: PlatformSet,
}

/// The complete dashboard dataset document (`dashboard.json`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardData {
    pub demographics: DemographicsView,
    pub performance: Vec<PerformanceEntry>,
    pub avg_stats: AvgStatsView,
    pub platform: PlatformView,
    pub recruitment: RecruitmentView,
    pub researchers: Vec<ResearcherProfile>,
}

// ---------------------------------------------------------------------------
// Dataset manifest
// ---------------------------------------------------------------------------

/// Provenance for one input table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputProvenance {
    /// "personnel" or "projects".
    pub role: String,
    /// Source path as given on the command line.
    pub path: String,
    /// SHA-256 of the raw file bytes.
    pub sha256: String,
    /// Data rows read (header excluded).
    pub rows: usize,
}

/// Metadata for a single written artifact file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactMeta {
    pub filename: String,
    pub sha256: String,
    pub size_bytes: usize,
}

/// The `manifest.json` structure stored at the root of each dataset
/// directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetManifest {
    /// Schema version for forward compatibility.
    pub schema_version: u32,
    /// Unique identifier for this pipeline run.
    pub id: RunId,
    /// Human-readable dataset name.
    pub name: String,
    /// Tool version that produced this dataset.
    pub tool_version: String,
    /// When the dataset was first created.
    pub created_at: DateTime<Utc>,
    /// When the dataset was last updated.
    pub updated_at: DateTime<Utc>,
    /// Number of researchers in the dataset.
    pub researcher_count: usize,
    /// Provenance of each input table.
    pub inputs: Vec<InputProvenance>,
    /// Written artifacts (populated after assembly).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub artifacts: Vec<ArtifactMeta>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_id_roundtrip() {
        let id = RunId::new();
        let s = id.to_string();
        let parsed: RunId = s.parse().expect("parse RunId");
        assert_eq!(id, parsed);
    }

    #[test]
    fn position_bucketing_rules() {
        assert_eq!(Position::from_title(""), Position::Unknown);
        assert_eq!(Position::from_title("교수"), Position::Professor);
        assert_eq!(Position::from_title("부교수"), Position::Associate);
        assert_eq!(Position::from_title("조교수"), Position::Assistant);
        assert_eq!(Position::from_title("임상조교수"), Position::ClinicalAssistant);
        // Anything else non-empty, including near-misses, is Other.
        assert_eq!(Position::from_title("명예교수"), Position::Other);
        assert_eq!(Position::from_title("연구교수"), Position::Other);
    }

    #[test]
    fn position_labels_roundtrip_in_canonical_order() {
        let labels: Vec<&str> = Position::ALL.iter().map(|p| p.label()).collect();
        assert_eq!(
            labels,
            ["교수", "부교수", "조교수", "임상조교수", "기타", "정보없음"]
        );
        for p in Position::ALL {
            assert_eq!(Position::from_label(p.label()), Some(p));
        }
    }

    #[test]
    fn platform_flag_columns_differ_where_expected() {
        assert_eq!(Platform::PhysicianScientist.flag_column(), "혁신형의사과학자");
        assert_eq!(Platform::ImmuneMicrobiome.flag_column(), "면역-마이크로바이옴");
        assert_eq!(Platform::Data.flag_column(), Platform::Data.label());
    }

    #[test]
    fn platform_set_operations() {
        let mut set = PlatformSet::empty();
        assert!(set.is_empty());

        set.insert(Platform::Regeneration);
        set.insert(Platform::Data);
        assert_eq!(set.len(), 2);
        assert!(set.contains(Platform::Data));
        assert!(!set.contains(Platform::NewDrug));

        // Iteration follows canonical order regardless of insertion order.
        let labels: Vec<&str> = set.iter().map(|p| p.label()).collect();
        assert_eq!(labels, ["데이터", "정밀재생"]);
    }

    #[test]
    fn platform_set_serializes_as_labels() {
        let set: PlatformSet = [Platform::Data, Platform::Regeneration]
            .into_iter()
            .collect();
        let json = serde_json::to_string(&set).expect("serialize");
        assert_eq!(json, r#"["데이터","정밀재생"]"#);

        let parsed: PlatformSet = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(parsed, set);
    }

    #[test]
    fn identity_key_strips_all_whitespace() {
        assert_eq!(identity_key(" 김 진원 "), "김진원");
        assert_eq!(identity_key("김진원"), "김진원");
        assert_eq!(identity_key(""), "");
    }

    #[test]
    fn empty_recruitment_view_keeps_all_platforms() {
        let view = RecruitmentView::empty();
        assert_eq!(view.total_potential, 0.0);
        assert_eq!(view.platform_potential.len(), 6);
        assert!(view.platform_potential.iter().all(|p| p.budget == 0.0));
        assert!(view.top_projects.is_empty());
    }

    #[test]
    fn manifest_serialization() {
        let manifest = DatasetManifest {
            schema_version: CURRENT_SCHEMA_VERSION,
            id: RunId::new(),
            name: "test-dataset".into(),
            tool_version: "0.1.0".into(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
            researcher_count: 3,
            inputs: vec![InputProvenance {
                role: "personnel".into(),
                path: "total_df.csv".into(),
                sha256: "ab".repeat(32),
                rows: 3,
            }],
            artifacts: vec![],
        };

        let json = serde_json::to_string_pretty(&manifest).expect("serialize");
        let parsed: DatasetManifest = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(parsed.schema_version, CURRENT_SCHEMA_VERSION);
        assert_eq!(parsed.researcher_count, 3);
        assert_eq!(parsed.inputs.len(), 1);
    }

    #[test]
    fn dashboard_field_names_are_camel_case() {
        let view = DemographicsView {
            position_labels: vec!["교수".into()],
            position_counts: vec![1],
            dept_top10_labels: vec![],
            dept_top10_values: vec![],
            dept_top10_breakdown: vec![],
            year_labels: vec![],
            year_values: vec![],
        };
        let json = serde_json::to_string(&view).expect("serialize");
        assert!(json.contains("positionLabels"));
        assert!(json.contains("deptTop10Labels"));
    }
}
