//! Normalizes raw upload rows into [`Participant`] records.

use std::collections::BTreeMap;

use tracing::debug;

use crate::model::Participant;

/// One upload row keyed by column header. Missing columns are simply absent.
pub type RawRow = BTreeMap<String, String>;

pub const COL_FULL_NAME: &str = "NOM ET PRENOM";
pub const COL_EMAIL: &str = "Email Address";
pub const COL_LANGUAGE: &str = "LANGUE";
pub const COL_LEVEL: &str = "NIVEAU D'ETUDES";
pub const COL_SKILLS: &str = "VOS COMPETENCES";

/// Recognised columns, in the order they are shown in the report.
pub const USEFUL_COLUMNS: [&str; 5] = [
    COL_FULL_NAME,
    COL_EMAIL,
    COL_LANGUAGE,
    COL_LEVEL,
    COL_SKILLS,
];

const ALIAS_FULL_NAME: &str = "Nom";
const ALIAS_EMAIL: &str = "EMAIL";
const ALIAS_LANGUAGE: &str = "Langue";
const ALIAS_LEVEL: &str = "Niveau d'etudes";
const ALIAS_SKILLS: &str = "Competences";

pub const DEV_SKILLS: [&str; 5] = [
    "DEVELOPPEMENT BACKEND",
    "DEVELOPPEMENT FRONTEND",
    "DEVELOPPEMENT FULLSTACK",
    "MODELISATION DES SYSTEMES D'INFORMATION",
    "SECURITE RESEAUX",
];

pub const MARKETING_SKILLS: [&str; 4] = [
    "COMMUNITY MANAGEMENT",
    "MEDIA BUYER",
    "STORYTELLING",
    "COPYWRITING",
];

pub const FRENCH_TOKENS: [&str; 6] = ["fr", "fra", "fran", "franc", "french", "francais"];
pub const ENGLISH_TOKENS: [&str; 5] = ["en", "ang", "eng", "anglais", "english"];
pub const BOTH_TOKENS: [&str; 2] = ["les deux", "both"];

pub const LANGUAGE_UNSPECIFIED: &str = "Non precise";
pub const LEVEL_UNSPECIFIED: &str = "NC";

const SKILL_SEPARATORS: [char; 5] = [',', ';', '/', '|', '\n'];

/// A parsed upload: enriched participants plus the columns to display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedUpload {
    pub participants: Vec<Participant>,
    pub columns: Vec<String>,
}

/// Enriches every row and computes the display column order from `headers`.
pub fn parse_participants(headers: &[String], rows: &[RawRow]) -> ParsedUpload {
    let participants: Vec<Participant> = rows
        .iter()
        .enumerate()
        .map(|(idx, row)| enrich_row(idx, row))
        .collect();
    debug!(count = participants.len(), "enriched participant rows");
    ParsedUpload {
        participants,
        columns: display_columns(headers),
    }
}

/// Recognised columns present in `headers`, in canonical order. Falls back
/// to every recognised column when the sheet contains none of them.
pub fn display_columns(headers: &[String]) -> Vec<String> {
    let present: Vec<String> = USEFUL_COLUMNS
        .iter()
        .filter(|col| headers.iter().any(|h| h == *col))
        .map(|col| col.to_string())
        .collect();
    if present.is_empty() {
        USEFUL_COLUMNS.iter().map(|col| col.to_string()).collect()
    } else {
        present
    }
}

/// Builds the enriched record for the upload row at position `index`.
pub fn enrich_row(index: usize, row: &RawRow) -> Participant {
    let full_name = cell(row, COL_FULL_NAME, ALIAS_FULL_NAME);
    let email = cell(row, COL_EMAIL, ALIAS_EMAIL);
    let language_raw = cell(row, COL_LANGUAGE, ALIAS_LANGUAGE);
    let academic_level_raw = cell(row, COL_LEVEL, ALIAS_LEVEL);
    let skills_raw = cell(row, COL_SKILLS, ALIAS_SKILLS);

    let skills = split_skills(&skills_raw);
    let flags = LanguageFlags::detect(&language_raw);
    let level = academic_level_raw.to_uppercase();

    Participant {
        uid: format!("p{index}"),
        full_name,
        email,
        language_label: if language_raw.is_empty() {
            LANGUAGE_UNSPECIFIED.to_string()
        } else {
            language_raw.clone()
        },
        language_raw,
        language_fr: flags.french,
        language_en: flags.english,
        is_dev: skills.iter().any(|s| DEV_SKILLS.contains(&s.as_str())),
        is_marketing: skills.iter().any(|s| MARKETING_SKILLS.contains(&s.as_str())),
        academic_score: academic_score(&level),
        academic_level: if level.is_empty() {
            LEVEL_UNSPECIFIED.to_string()
        } else {
            level
        },
        academic_level_raw,
        skills,
        skills_raw,
        email_sent: false,
        placement: None,
    }
}

fn cell(row: &RawRow, column: &str, alias: &str) -> String {
    row.get(column)
        .or_else(|| row.get(alias))
        .map(|value| value.trim().to_string())
        .unwrap_or_default()
}

/// Splits a free-text skills cell into trimmed, upper-cased tokens.
pub fn split_skills(raw: &str) -> Vec<String> {
    raw.split(SKILL_SEPARATORS)
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_uppercase)
        .collect()
}

/// Maps an upper-cased academic level (`B1`..`M2`) to its score.
pub fn academic_score(level: &str) -> u8 {
    match level {
        "B1" => 1,
        "B2" => 2,
        "B3" => 3,
        "M1" => 4,
        "M2" => 5,
        _ => 0,
    }
}

/// Languages a participant declared, matched by substring on the lower-cased
/// cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LanguageFlags {
    pub french: bool,
    pub english: bool,
}

impl LanguageFlags {
    pub fn detect(raw: &str) -> Self {
        let lower = raw.to_lowercase();
        let both = signals_both(&lower);
        Self {
            french: both || FRENCH_TOKENS.iter().any(|t| lower.contains(t)),
            english: both || ENGLISH_TOKENS.iter().any(|t| lower.contains(t)),
        }
    }
}

/// Whether a lower-cased language cell asks for both languages.
pub fn signals_both(lower: &str) -> bool {
    BOTH_TOKENS.iter().any(|t| lower.contains(t))
}
