//! Researcher normalization: raw personnel rows → typed [`Researcher`]s.
//!
//! One researcher per input row, same order, never dropping or merging —
//! duplicate names are expected (homonyms) and kept. Malformed cells
//! degrade to defaults; nothing here can fail.

use std::collections::HashMap;

use tracing::{debug, instrument};

use dashprep_shared::{Platform, PlatformSet, Position, Researcher};
use dashprep_tabular::{PersonnelRow, value};

use crate::catalog::DENOMINATION;

/// Normalize the whole personnel table. Output order matches input order;
/// ids are the 1-based row numbers.
#[instrument(skip_all, fields(rows = rows.len()))]
pub fn normalize_researchers(rows: &[PersonnelRow]) -> Vec<Researcher> {
    let researchers: Vec<Researcher> = rows
        .iter()
        .enumerate()
        .map(|(index, row)| normalize_row(index, row))
        .collect();

    log_homonyms(&researchers);
    researchers
}

fn normalize_row(index: usize, row: &PersonnelRow) -> Researcher {
    let mut platforms = PlatformSet::empty();
    for platform in Platform::ALL {
        if value::is_flag_set(row.flag_cell(platform)) {
            platforms.insert(platform);
        }
    }

    let title = value::text(row.title.as_deref());

    Researcher {
        id: (index + 1).to_string(),
        name: value::text(row.name.as_deref()),
        department: value::text(row.department.as_deref()),
        position: Position::from_title(&title),
        keywords: value::keyword_list(row.specialty.as_deref()),
        publications: value::count(row.papers.as_deref()),
        // Full precision; rounding happens only when views are built.
        budget: (value::number_or_zero(row.budget.as_deref()) / DENOMINATION).max(0.0),
        career_start_year: value::year(row.career_start_year.as_deref()).unwrap_or(0),
        platforms,
    }
}

/// Duplicate display names are a known condition, not an error; surface
/// them at debug level so homonym-related questions can be answered from
/// the logs.
fn log_homonyms(researchers: &[Researcher]) {
    let mut seen: HashMap<&str, usize> = HashMap::new();
    for r in researchers {
        if !r.name.is_empty() {
            *seen.entry(r.name.as_str()).or_default() += 1;
        }
    }

    let homonyms = seen.values().filter(|&&n| n > 1).count();
    if homonyms > 0 {
        debug!(names = homonyms, "duplicate researcher names present");
    }
}
