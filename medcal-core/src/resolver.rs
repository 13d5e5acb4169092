//! Fuzzy clinic-name resolution against the location catalog.
//!
//! Appointment exports carry abbreviated clinic names ("CM Warszawa Płd.")
//! while the catalog is keyed by full facility names. Resolution normalizes
//! the input, then picks the catalog entry with the highest partial-ratio
//! similarity. There is deliberately no minimum score: the best entry is
//! returned however distant, and only an empty catalog yields no match.

use crate::catalog::{LocationCatalog, LocationRecord};

/// Organizational prefix prepended to every clinic name before matching.
const ORG_PREFIX: &str = "Centrum Medicover ";

/// Literal substitutions expanding known abbreviations.
const SUBSTITUTIONS: &[(&str, &str)] = &[("Płd.", "Południe"), (" CM ", " ")];

/// The winning catalog entry for a clinic-name lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedLocation<'a> {
    pub key: &'a str,
    pub record: Option<&'a LocationRecord>,
}

/// Expand abbreviations and attach the organizational prefix.
pub fn normalize(clinic_name: &str) -> String {
    let mut name = format!("{ORG_PREFIX}{clinic_name}");
    for (from, to) in SUBSTITUTIONS {
        name = name.replace(from, to);
    }
    name
}

/// Comparable label for a catalog entry: key plus city when known.
fn candidate_label(key: &str, record: Option<&LocationRecord>) -> String {
    match record {
        Some(record) => format!("{} {}", key, record.cityname),
        None => key.to_string(),
    }
}

/// Partial-ratio similarity in [0, 100].
///
/// Slides the shorter string across every equal-length character window of
/// the longer one and keeps the best normalized-Levenshtein score, so a
/// substring match scores 100 regardless of the length difference. An empty
/// side scores 0 so a degenerate catalog label never outranks a real one.
pub fn partial_ratio(a: &str, b: &str) -> f64 {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let (short, long) = if a_chars.len() <= b_chars.len() {
        (a_chars, b_chars)
    } else {
        (b_chars, a_chars)
    };

    if short.is_empty() {
        return 0.0;
    }

    let needle: String = short.iter().collect();
    let mut best = 0.0_f64;
    for window in long.windows(short.len()) {
        let window: String = window.iter().collect();
        let score = strsim::normalized_levenshtein(&needle, &window) * 100.0;
        if score > best {
            best = score;
        }
        if best >= 100.0 {
            break;
        }
    }
    best
}

/// Find the best-matching catalog entry for a clinic name.
///
/// Scoring is case-insensitive. Ties go to the later catalog entry (`>=`
/// selection, equivalent to a stable ascending sort followed by taking the
/// last element). Returns `None` only when the catalog is empty.
pub fn resolve<'a>(
    clinic_name: &str,
    catalog: &'a LocationCatalog,
) -> Option<ResolvedLocation<'a>> {
    let needle = normalize(clinic_name).to_lowercase();

    let mut best: Option<ResolvedLocation<'a>> = None;
    let mut best_score = f64::NEG_INFINITY;
    for (key, record) in catalog.iter() {
        let label = candidate_label(key, record).to_lowercase();
        let score = partial_ratio(&needle, &label);
        if score >= best_score {
            best_score = score;
            best = Some(ResolvedLocation { key, record });
        }
    }
    best
}
