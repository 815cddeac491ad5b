//! Attribute label and tag normalization

use std::collections::{BTreeMap, BTreeSet};
use tracing::warn;

/// Canonical sector label
pub const SECTOR: &str = "Sector";
pub const SECTOR_PUBLIC: &str = "Public";
pub const SECTOR_PRIVATE: &str = "Private";

/// Sector value used when the site states none or an unknown one
pub const SECTOR_NOT_SPECIFIED: &str = "Not specified";

/// Lowercased site label -> canonical label
const LABEL_SYNONYMS: &[(&str, &str)] = &[
    ("adresse", "Location"),
    ("arbeidssted", "Location"),
    ("sted", "Location"),
    ("location", "Location"),
    ("ansettelsesform", "Employment type"),
    ("employment type", "Employment type"),
    ("antall stillinger", "Positions"),
    ("positions", "Positions"),
    ("arbeidsdager", "Workdays"),
    ("workdays", "Workdays"),
    ("arbeidsgiver", "Employer"),
    ("employer", "Employer"),
    ("arbeidsspråk", "Working language"),
    ("working language", "Working language"),
    ("arbeidstid", "Working hours"),
    ("working hours", "Working hours"),
    ("arbeidstidsordning", "Working hours arrangement"),
    ("working hours arrangement", "Working hours arrangement"),
    ("bransje", "Industry"),
    ("industry", "Industry"),
    ("heltid/deltid", "Position type"),
    ("stillingstype", "Position type"),
    ("stilling", "Position type"),
    ("position type", "Position type"),
    ("hjemmekontor", "Remote work"),
    ("remote work", "Remote work"),
    ("lederkategori", "Management level"),
    ("management level", "Management level"),
    ("oppstart", "Start date"),
    ("start date", "Start date"),
    ("sektor", SECTOR),
    ("sector", SECTOR),
    ("stillingsfunksjon", "Job function"),
    ("job function", "Job function"),
    ("stillingstittel", "Job title"),
    ("job title", "Job title"),
];

/// Maps a site label to its canonical label
///
/// Matching ignores case, surrounding whitespace and a trailing colon.
/// Unknown labels map to None.
pub fn canonical_label(label: &str) -> Option<&'static str> {
    let key = label.trim().trim_end_matches(':').trim().to_lowercase();
    LABEL_SYNONYMS
        .iter()
        .find(|(synonym, _)| *synonym == key)
        .map(|(_, canonical)| *canonical)
}

/// Maps a sector value onto the allowed set
pub fn normalize_sector(value: &str) -> &'static str {
    match value.trim().to_lowercase().as_str() {
        "public" | "offentlig" => SECTOR_PUBLIC,
        "private" | "privat" => SECTOR_PRIVATE,
        _ => SECTOR_NOT_SPECIFIED,
    }
}

/// Builds the canonical attribute map from raw label/value pairs
///
/// Unmapped labels and blank values are dropped. The sector attribute
/// always ends up holding exactly one allowed value, taken from the first
/// sector pair in document order.
pub fn normalize_attributes(
    raw: &[(String, String)],
    url: &str,
) -> BTreeMap<String, BTreeSet<String>> {
    let mut attributes: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    let mut first_sector: Option<&str> = None;

    for (label, value) in raw {
        let Some(canonical) = canonical_label(label) else {
            continue;
        };

        let value = clean_value(value);
        if value.is_empty() {
            continue;
        }

        if is_suspicious_value(value) {
            warn!("Suspicious value '{}' for '{}' on {}", value, canonical, url);
        }

        if canonical == SECTOR {
            match first_sector {
                None => first_sector = Some(value),
                Some(first) if first != value => warn!(
                    "Several sectors on {}, keeping '{}' over '{}'",
                    url, first, value
                ),
                Some(_) => {}
            }
        }

        attributes
            .entry(canonical.to_string())
            .or_default()
            .insert(value.to_string());
    }

    let sector = first_sector
        .map(normalize_sector)
        .unwrap_or(SECTOR_NOT_SPECIFIED);
    attributes.insert(SECTOR.to_string(), BTreeSet::from([sector.to_string()]));

    attributes
}

/// Splits, trims and deduplicates tag strings
pub fn normalize_tags(raw: &[String]) -> BTreeSet<String> {
    raw.iter()
        .flat_map(|tag| tag.split(','))
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

/// A one-character value that is not a digit from 1 to 9
///
/// Such values are logged but still delivered as-is.
fn is_suspicious_value(value: &str) -> bool {
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => !matches!(c, '1'..='9'),
        _ => false,
    }
}

fn clean_value(value: &str) -> &str {
    value.trim().trim_end_matches(',').trim()
}
