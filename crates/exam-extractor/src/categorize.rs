//! Categorization pass: subject, competency and difficulty for stored questions

use crate::classify::classify_by_keywords;
use crate::patterns::{count_matches, COMPETENCY_KEYWORDS, DATA_CUE_KEYWORDS};
use shared_types::{Categorization, Difficulty, Question, Subject};

/// Statements longer than this many words count as long
const LONG_STATEMENT_WORDS: usize = 80;
/// Statements longer than this many words count as very long
const VERY_LONG_STATEMENT_WORDS: usize = 160;
/// Mean alternative length (chars) above which alternatives count as dense
const DENSE_ALTERNATIVE_CHARS: usize = 60;

/// Categorizes a question.
///
/// An already classified subject is kept; `Não classificado` is retried with
/// keywords. Competency is the first topic of that subject whose keywords occur
/// in the question text.
pub fn categorize(question: &Question) -> Categorization {
    let text = question.searchable_text();

    let subject = if question.subject.is_classified() {
        question.subject
    } else {
        classify_by_keywords(&text)
    };

    Categorization {
        subject,
        competency: competency_for(subject, &text).map(str::to_string),
        difficulty: estimate_difficulty(question),
    }
}

/// First matching topic of `subject`
pub fn competency_for(subject: Subject, text: &str) -> Option<&'static str> {
    let text_lower = format!(" {} ", text.to_lowercase());
    COMPETENCY_KEYWORDS
        .iter()
        .filter(|(topic_subject, _, _)| *topic_subject == subject)
        .find(|(_, _, keywords)| count_matches(&text_lower, keywords) > 0)
        .map(|(_, topic, _)| *topic)
}

/// Scores statement length, alternative density and reliance on charts/tables
pub fn estimate_difficulty(question: &Question) -> Difficulty {
    let mut score = 0;

    let words = question.statement.split_whitespace().count();
    if words > LONG_STATEMENT_WORDS {
        score += 1;
    }
    if words > VERY_LONG_STATEMENT_WORDS {
        score += 1;
    }

    if !question.alternatives.is_empty() {
        let total: usize = question
            .alternatives
            .values()
            .map(|text| text.chars().count())
            .sum();
        if total / question.alternatives.len() > DENSE_ALTERNATIVE_CHARS {
            score += 1;
        }
    }

    if count_matches(&question.statement.to_lowercase(), DATA_CUE_KEYWORDS) > 0 {
        score += 1;
    }

    match score {
        0 => Difficulty::Easy,
        1 | 2 => Difficulty::Medium,
        _ => Difficulty::Hard,
    }
}
