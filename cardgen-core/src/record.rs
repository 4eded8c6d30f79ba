//! Typed card rows and the normalization rules applied to their fields.
//!
//! Spreadsheet data is dirty. Every normalizer here returns a usable value
//! for any input; nothing in this module fails on bad field contents.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::config::Locale;
use crate::error::{CardError, Result};

/// One CSV row. Columns the renderers do not know about are ignored.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct CardRecord {
    #[serde(rename = "ID")]
    pub id: Option<String>,
    #[serde(rename = "Title")]
    pub title: Option<String>,
    #[serde(rename = "Text")]
    pub text: Option<String>,
    #[serde(rename = "RU Text")]
    pub ru_text: Option<String>,
    #[serde(rename = "Funny text")]
    pub funny_text: Option<String>,
    #[serde(rename = "Text (SA - Special Ability; OC - On Completion)")]
    pub ability_text: Option<String>,
    #[serde(rename = "Category")]
    pub category: Option<String>,
    #[serde(rename = "Points")]
    pub points: Option<String>,
    #[serde(rename = "Score Points")]
    pub score_points: Option<String>,
    #[serde(rename = "Copies")]
    pub copies: Option<String>,
    #[serde(rename = "Addon")]
    pub addon: Option<String>,
    #[serde(rename = "Tier")]
    pub tier: Option<String>,
    #[serde(rename = "Minimum Score")]
    pub minimum_score: Option<String>,
    #[serde(rename = "Deadline")]
    pub deadline: Option<String>,
    #[serde(rename = "North edge")]
    pub north_edge: Option<String>,
    #[serde(rename = "East edge")]
    pub east_edge: Option<String>,
    #[serde(rename = "South edge")]
    pub south_edge: Option<String>,
    #[serde(rename = "West edge")]
    pub west_edge: Option<String>,
    #[serde(rename = "Counter slots")]
    pub counter_slots: Option<String>,
    #[serde(rename = "TCF")]
    pub tcf: Option<String>,
    #[serde(rename = "ACF")]
    pub acf: Option<String>,
    #[serde(rename = "MTS")]
    pub mts: Option<String>,
}

/// Body text sources, tried in order after the locale override.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextField {
    Text,
    AbilityText,
}

impl CardRecord {
    pub fn title(&self) -> &str {
        field(&self.title)
    }

    pub fn category(&self) -> &str {
        field(&self.category)
    }

    pub fn funny_text(&self) -> &str {
        field(&self.funny_text)
    }

    fn text_field(&self, which: TextField) -> &str {
        match which {
            TextField::Text => field(&self.text),
            TextField::AbilityText => field(&self.ability_text),
        }
    }

    /// Body copy for the active locale, falling back through `fallbacks`.
    pub fn localized_text(&self, locale: Locale, fallbacks: &[TextField]) -> &str {
        if locale == Locale::Ru {
            let ru = field(&self.ru_text);
            if !ru.is_empty() {
                return ru;
            }
        }
        fallbacks
            .iter()
            .map(|which| self.text_field(*which))
            .find(|value| !value.is_empty())
            .unwrap_or("")
    }

    /// Whether the row belongs to an add-on and should be skipped.
    pub fn is_ignored(&self, ignore_addon_records: bool) -> bool {
        ignore_addon_records && !field(&self.addon).is_empty()
    }

    pub fn copy_count(&self) -> u32 {
        normalize_copies(self.copies.as_deref())
    }
}

/// Trimmed field value; missing columns read as empty.
pub fn field(value: &Option<String>) -> &str {
    value.as_deref().map(str::trim).unwrap_or("")
}

/// Parse CSV text with a header row. Ragged rows are tolerated and blank lines skipped.
pub fn parse_records(csv_text: &str) -> std::result::Result<Vec<CardRecord>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(csv_text.as_bytes());
    reader.deserialize().collect()
}

pub fn read_records(path: &Path) -> Result<Vec<CardRecord>> {
    let raw = fs::read_to_string(path).map_err(|e| CardError::io(path, e))?;
    // Spreadsheet exports often carry a BOM that would otherwise rename the first column.
    let raw = raw.strip_prefix('\u{feff}').unwrap_or(&raw);
    parse_records(raw).map_err(|source| CardError::Csv {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Copies column: non-numeric or below one becomes 1, otherwise floored.
pub fn normalize_copies(raw: Option<&str>) -> u32 {
    match raw.and_then(parse_number) {
        Some(n) if n >= 1.0 => n.floor().min(f64::from(u32::MAX)) as u32,
        _ => 1,
    }
}

/// Non-negative integer points; blank stays blank, text passes through trimmed.
pub fn normalize_points(raw: Option<&str>) -> String {
    let trimmed = raw.unwrap_or("").trim();
    if trimmed.is_empty() {
        return String::new();
    }
    match parse_number(trimmed) {
        Some(n) => format!("{}", n.floor().max(0.0)),
        None => trimmed.to_string(),
    }
}

/// Feature score: sign and fraction are kept, positives get a `+`.
pub fn format_feature_score(raw: Option<&str>) -> String {
    let trimmed = raw.unwrap_or("").trim();
    if trimmed.is_empty() {
        return "0".to_string();
    }
    match parse_number(trimmed) {
        Some(n) if n > 0.0 => format!("+{n}"),
        Some(n) => format!("{}", n + 0.0),
        None => trimmed.to_string(),
    }
}

pub fn normalize_tier(raw: Option<&str>) -> i64 {
    raw.and_then(parse_number)
        .map(|n| n.floor() as i64)
        .unwrap_or(0)
}

pub const MAX_COUNTER_SLOTS: usize = 6;

pub fn normalize_slot_count(raw: Option<&str>) -> usize {
    match raw.and_then(parse_number) {
        Some(n) if n >= 0.0 => (n.floor() as usize).min(MAX_COUNTER_SLOTS),
        _ => 0,
    }
}

/// Milestone stat value; zero or non-numeric hides the stat.
pub fn normalize_stat(raw: Option<&str>) -> Option<f64> {
    raw.and_then(parse_number).filter(|n| *n != 0.0)
}

/// Replace each run of characters outside `[A-Za-z0-9._-]` with one `_`.
pub fn sanitize_file_name(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut in_run = false;
    for c in value.chars() {
        if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
            out.push(c);
            in_run = false;
        } else if !in_run {
            out.push('_');
            in_run = true;
        }
    }
    out
}

/// First non-empty candidate, sanitized.
pub fn slug_from(candidates: &[&str], fallback: &str) -> String {
    let base = candidates
        .iter()
        .map(|c| c.trim())
        .find(|c| !c.is_empty())
        .unwrap_or(fallback);
    sanitize_file_name(base)
}

/// File names for every copy: `slug.png`, or `slug-copyN.png` when there are several.
pub fn copy_file_names(slug: &str, copies: u32) -> Vec<String> {
    if copies <= 1 {
        return vec![format!("{slug}.png")];
    }
    (1..=copies).map(|n| format!("{slug}-copy{n}.png")).collect()
}
