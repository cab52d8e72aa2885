// Gabarito parsing and merging
use crate::patterns::ANSWER_KEY_ENTRY;
use shared_types::{AnswerKey, OptionLetter, Question};

/// Parses "<number> <separator> <letter>" pairs from an answer-key document.
///
/// The first entry for a given number wins; later repeats are ignored.
pub fn parse_answer_key(text: &str) -> AnswerKey {
    ANSWER_KEY_ENTRY
        .captures_iter(text)
        .filter_map(|cap| {
            let number = cap.get(1)?.as_str().parse::<u32>().ok()?;
            let letter = cap
                .get(2)?
                .as_str()
                .chars()
                .next()
                .and_then(OptionLetter::from_char)?;
            Some((number, letter))
        })
        .collect()
}

/// Sets `correct_answer` on every question whose number appears in the key.
///
/// A key letter missing from the question's alternatives is not assigned.
/// Returns how many questions received an answer.
pub fn apply_answer_key(questions: &mut [Question], key: &AnswerKey) -> usize {
    if key.is_empty() {
        return 0;
    }

    let mut applied = 0;
    for question in questions.iter_mut() {
        if let Some(letter) = key.get(question.number) {
            if question.set_correct_answer(letter) {
                applied += 1;
            }
        }
    }
    applied
}
