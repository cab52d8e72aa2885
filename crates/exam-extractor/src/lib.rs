//! Exam paper text extraction
//!
//! Turns the plain text of an exam paper (and optionally its gabarito) into
//! ordered `Question` records. Everything here is a pure function of its input:
//! no I/O, no hidden state.

pub mod categorize;
pub mod classify;
pub mod extractors;
pub mod patterns;

pub use categorize::{categorize, competency_for, estimate_difficulty};
pub use classify::{classify_by_keywords, classify_subject, enem_band, ExamLayout};
pub use extractors::{apply_answer_key, extract_year, parse_answer_key};

use chrono::Datelike;
use extractors::{split_alternatives, split_questions};
use shared_types::{ExtractionResult, Question};

/// ExamExtractor entry point
#[derive(Debug, Clone, Copy)]
pub struct ExamExtractor;

impl ExamExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Extracts questions, falling back to the current calendar year when the
    /// text carries no usable year
    pub fn extract(&self, text: &str, answer_key: Option<&str>) -> ExtractionResult {
        let current_year = chrono::Local::now().year();
        self.extract_with_year(text, answer_key, current_year)
    }

    /// Deterministic variant of [`ExamExtractor::extract`]
    pub fn extract_with_year(
        &self,
        text: &str,
        answer_key: Option<&str>,
        current_year: i32,
    ) -> ExtractionResult {
        let raw_questions = split_questions(text);
        if raw_questions.is_empty() {
            return ExtractionResult::default();
        }

        let layout = ExamLayout::detect(text);
        let year = extract_year(text, current_year);

        let mut questions: Vec<Question> = raw_questions
            .into_iter()
            .map(|raw| {
                let (statement, alternatives) = split_alternatives(raw.body);
                let mut question = Question {
                    number: raw.number,
                    statement,
                    alternatives,
                    subject: shared_types::Subject::Unclassified,
                    year,
                    correct_answer: None,
                };
                question.subject =
                    classify_subject(raw.number, &question.searchable_text(), layout);
                question
            })
            .collect();

        if let Some(key_text) = answer_key {
            let key = parse_answer_key(key_text);
            apply_answer_key(&mut questions, &key);
        }

        ExtractionResult { questions }
    }
}

impl Default for ExamExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use shared_types::{OptionLetter, Subject};

    const ENEM_SAMPLE: &str = "EXAME NACIONAL DO ENSINO MÉDIO\nENEM 2022\n\
        QUESTÃO 01\nLeia o poema abaixo.\nA) rima B) verso C) estrofe D) métrica E) ritmo\n\
        QUESTÃO 02\nResolva a equação x + 1 = 2.\nA) 0 B) 1 C) 2\n\
        QUESTÃO 03\nRedija um comentário sobre o texto.";

    #[test]
    fn test_extracts_questions_in_order() {
        let result = ExamExtractor::new().extract_with_year(ENEM_SAMPLE, None, 2026);

        assert_eq!(result.len(), 3);
        let numbers: Vec<u32> = result.questions.iter().map(|q| q.number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
        assert_eq!(result.questions[0].statement, "Leia o poema abaixo.");
        assert_eq!(result.questions[0].alternatives.len(), 5);
        assert!(result.questions[2].alternatives.is_empty());
    }

    #[test]
    fn test_year_and_subject_from_enem_layout() {
        let result = ExamExtractor::new().extract_with_year(ENEM_SAMPLE, None, 2026);

        assert!(result.questions.iter().all(|q| q.year == 2022));
        // Question 2 talks about an equation but the ENEM band wins
        assert_eq!(result.questions[1].subject, Subject::Languages);
    }

    #[test]
    fn test_generic_exam_classified_by_keywords() {
        let text = "Vestibular 2020\nQuestão 1 Resolva a equação.\nA) 1 B) 2\n\
                    Questão 2 Sobre a fotossíntese na célula:\nA) sim B) não";
        let result = ExamExtractor::new().extract_with_year(text, None, 2026);

        assert_eq!(result.questions[0].subject, Subject::Mathematics);
        assert_eq!(result.questions[1].subject, Subject::NaturalSciences);
        assert_eq!(result.questions[0].year, 2020);
    }

    #[test]
    fn test_answer_key_is_merged() {
        let result =
            ExamExtractor::new().extract_with_year(ENEM_SAMPLE, Some("1 - A\n2 - C"), 2026);

        assert_eq!(result.questions[0].correct_answer, Some(OptionLetter::A));
        assert_eq!(result.questions[1].correct_answer, Some(OptionLetter::C));
        assert_eq!(result.questions[2].correct_answer, None);
        assert_eq!(result.answered(), 2);
    }

    #[test]
    fn test_empty_or_garbage_text_yields_nothing() {
        let extractor = ExamExtractor::new();
        assert!(extractor.extract("", None).is_empty());
        assert!(extractor.extract("%PDF-1.4 \u{0}\u{1} garbage", Some("1 - A")).is_empty());
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let extractor = ExamExtractor::new();
        let first = extractor.extract_with_year(ENEM_SAMPLE, Some("1 - B"), 2026);
        let second = extractor.extract_with_year(ENEM_SAMPLE, Some("1 - B"), 2026);
        assert_eq!(first, second);
    }
}
