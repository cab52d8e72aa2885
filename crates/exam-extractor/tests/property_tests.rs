//! Property-based tests for exam-extractor
//!
//! Generates synthetic exam papers and checks the extraction contracts:
//! marker count, alternative letters, answer-key merging, ENEM bands and
//! determinism.

use exam_extractor::ExamExtractor;
use proptest::prelude::*;
use shared_types::{OptionLetter, Subject};

/// Statement text without anything that looks like a marker
fn statement_text() -> impl Strategy<Value = String> {
    "[a-z]{3,10}( [a-z]{3,10}){0,12}"
}

/// One question rendered the way exam PDFs come out of text extraction
fn render_question(number: u32, statement: &str, alternative_count: usize) -> String {
    let mut out = format!("QUESTÃO {:02}\n{}\n", number, statement);
    for letter in OptionLetter::ALL.iter().take(alternative_count) {
        out.push_str(&format!("{}) opção {}\n", letter, letter.as_char().to_ascii_lowercase()));
    }
    out
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn n_markers_yield_n_questions_in_order(
        statements in prop::collection::vec(statement_text(), 1..20),
        alternative_count in 0usize..=5
    ) {
        let text: String = statements
            .iter()
            .enumerate()
            .map(|(i, s)| render_question(i as u32 + 1, s, alternative_count))
            .collect();

        let result = ExamExtractor::new().extract_with_year(&text, None, 2026);

        prop_assert_eq!(result.len(), statements.len());
        for (i, question) in result.questions.iter().enumerate() {
            prop_assert_eq!(question.number, i as u32 + 1);
            prop_assert_eq!(&question.statement, &statements[i]);
        }
    }

    #[test]
    fn alternatives_match_rendered_letters(
        statement in statement_text(),
        alternative_count in 0usize..=5
    ) {
        let text = render_question(1, &statement, alternative_count);
        let result = ExamExtractor::new().extract_with_year(&text, None, 2026);

        let letters: Vec<OptionLetter> =
            result.questions[0].alternatives.keys().copied().collect();
        let expected: Vec<OptionLetter> =
            OptionLetter::ALL.iter().copied().take(alternative_count).collect();
        prop_assert_eq!(letters, expected);
    }

    #[test]
    fn correct_answer_is_always_an_alternative(
        alternative_count in 0usize..=5,
        key_letter in prop::sample::select(OptionLetter::ALL.to_vec())
    ) {
        let text = render_question(1, "enunciado qualquer", alternative_count);
        let key = format!("1 - {}", key_letter);
        let result = ExamExtractor::new().extract_with_year(&text, Some(&key), 2026);

        let question = &result.questions[0];
        prop_assert!(question.is_consistent());
        let expected = question.alternatives.contains_key(&key_letter);
        prop_assert_eq!(question.correct_answer.is_some(), expected);
    }

    #[test]
    fn enem_bands_override_keywords(number in 1u32..=180) {
        let text = format!("ENEM 2021\n{}", render_question(number, "resolva a equação", 2));
        let result = ExamExtractor::new().extract_with_year(&text, None, 2026);

        let expected = match number {
            1..=45 => Subject::Languages,
            46..=90 => Subject::HumanSciences,
            91..=135 => Subject::NaturalSciences,
            _ => Subject::Mathematics,
        };
        prop_assert_eq!(result.questions[0].subject, expected);
        prop_assert_eq!(result.questions[0].year, 2021);
    }

    #[test]
    fn extraction_is_deterministic(text in "\\PC{0,400}") {
        let extractor = ExamExtractor::new();
        let first = extractor.extract_with_year(&text, Some(&text), 2026);
        let second = extractor.extract_with_year(&text, Some(&text), 2026);
        prop_assert_eq!(first, second);
    }
}

#[test]
fn year_anchor_ignores_other_numbers() {
    let text = "Dados de 2010, 2010 e 2010.\nENEM 2022\nQUESTÃO 1\nTexto.";
    let result = ExamExtractor::new().extract_with_year(text, None, 2026);
    assert_eq!(result.questions[0].year, 2022);
}
