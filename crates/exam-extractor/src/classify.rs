//! Subject classification
//!
//! Two tiers: ENEM papers map fixed question-number bands to knowledge areas;
//! everything else (and ENEM numbers outside 1-180) falls back to keyword
//! matching over the statement and alternatives.

use crate::patterns::{contains_any, ENEM_LAYOUT, SUBJECT_KEYWORDS};
use shared_types::Subject;

/// Layout family of the source document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExamLayout {
    /// ENEM paper with the fixed 4 x 45 question bands
    Enem,
    /// Any other exam
    Generic,
}

impl ExamLayout {
    pub fn detect(text: &str) -> Self {
        if ENEM_LAYOUT.is_match(text) {
            ExamLayout::Enem
        } else {
            ExamLayout::Generic
        }
    }
}

/// ENEM question-number band -> area
pub fn enem_band(number: u32) -> Option<Subject> {
    match number {
        1..=45 => Some(Subject::Languages),
        46..=90 => Some(Subject::HumanSciences),
        91..=135 => Some(Subject::NaturalSciences),
        136..=180 => Some(Subject::Mathematics),
        _ => None,
    }
}

/// Case-insensitive keyword match; first subject in table order wins
pub fn classify_by_keywords(text: &str) -> Subject {
    let text_lower = text.to_lowercase();
    SUBJECT_KEYWORDS
        .iter()
        .find(|(_, keywords)| contains_any(&text_lower, keywords))
        .map(|(subject, _)| *subject)
        .unwrap_or(Subject::Unclassified)
}

pub fn classify_subject(number: u32, text: &str, layout: ExamLayout) -> Subject {
    let band = match layout {
        ExamLayout::Enem => enem_band(number),
        ExamLayout::Generic => None,
    };
    band.unwrap_or_else(|| classify_by_keywords(text))
}
