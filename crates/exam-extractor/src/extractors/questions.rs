// Question body and alternative splitting
use crate::patterns::{normalize_whitespace, ALTERNATIVE_MARKER, QUESTION_MARKER};
use shared_types::{Alternatives, OptionLetter};

/// A question marker and the raw text it owns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawQuestion<'a> {
    pub number: u32,
    pub body: &'a str,
}

/// Splits document text at every question marker.
///
/// Each body runs from the end of its marker to the start of the next marker,
/// or to the end of the text. Returns an empty list when no marker matches.
pub fn split_questions(text: &str) -> Vec<RawQuestion<'_>> {
    let markers: Vec<(usize, usize, u32)> = QUESTION_MARKER
        .captures_iter(text)
        .filter_map(|cap| {
            let whole = cap.get(0)?;
            let number = cap.get(1)?.as_str().parse::<u32>().ok()?;
            Some((whole.start(), whole.end(), number))
        })
        .collect();

    markers
        .iter()
        .enumerate()
        .map(|(i, &(_, body_start, number))| {
            let body_end = markers
                .get(i + 1)
                .map(|&(next_start, _, _)| next_start)
                .unwrap_or(text.len());
            RawQuestion {
                number,
                body: &text[body_start..body_end],
            }
        })
        .collect()
}

/// Splits a question body into its statement and alternatives.
///
/// Markers are accepted only in sequence A, B, C, D, E; out-of-order markers
/// stay in the surrounding text. Without any accepted marker the whole body is
/// the statement and the alternatives are empty.
pub fn split_alternatives(body: &str) -> (String, Alternatives) {
    // (marker start, text start, letter)
    let mut accepted: Vec<(usize, usize, OptionLetter)> = Vec::new();
    let mut expected = Some(OptionLetter::A);

    for cap in ALTERNATIVE_MARKER.captures_iter(body) {
        let Some(want) = expected else { break };

        let letter = cap
            .get(1)
            .or_else(|| cap.get(2))
            .and_then(|m| m.as_str().chars().next())
            .and_then(OptionLetter::from_char);

        if letter == Some(want) {
            let whole = cap.get(0).map(|m| (m.start(), m.end()));
            if let Some((start, end)) = whole {
                accepted.push((start, end, want));
                expected = want.next();
            }
        }
    }

    if accepted.is_empty() {
        return (normalize_whitespace(body), Alternatives::new());
    }

    let statement = normalize_whitespace(&body[..accepted[0].0]);
    let mut alternatives = Alternatives::new();

    for (i, &(_, text_start, letter)) in accepted.iter().enumerate() {
        let text_end = accepted
            .get(i + 1)
            .map(|&(next_start, _, _)| next_start)
            .unwrap_or(body.len());
        alternatives.insert(letter, normalize_whitespace(&body[text_start..text_end]));
    }

    (statement, alternatives)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_split_questions_in_marker_order() {
        let text = "capa\nQUESTÃO 01\nprimeira\nQUESTÃO 02\nsegunda\nQuestão 3 terceira";
        let questions = split_questions(text);

        let numbers: Vec<u32> = questions.iter().map(|q| q.number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
        assert_eq!(questions[0].body.trim(), "primeira");
        assert_eq!(questions[2].body.trim(), "terceira");
    }

    #[test]
    fn test_split_questions_without_markers_is_empty() {
        assert!(split_questions("Nenhuma marcação aqui. 1) 2) 3)").is_empty());
        assert!(split_questions("").is_empty());
    }

    #[test]
    fn test_split_alternatives_inline() {
        let (statement, alternatives) =
            split_alternatives(" Quanto é 2 + 2?\nA) 3 B) 4 C) 5 D) 6 E) 7");

        assert_eq!(statement, "Quanto é 2 + 2?");
        assert_eq!(alternatives.len(), 5);
        assert_eq!(alternatives[&OptionLetter::B], "4");
        assert_eq!(alternatives[&OptionLetter::E], "7");
    }

    #[test]
    fn test_split_alternatives_partial_set() {
        let (_, alternatives) = split_alternatives("Escolha:\n(A) um\n(B) dois\n(C) três");
        let letters: Vec<OptionLetter> = alternatives.keys().copied().collect();
        assert_eq!(letters, vec![OptionLetter::A, OptionLetter::B, OptionLetter::C]);
    }

    #[test]
    fn test_out_of_order_marker_stays_in_text() {
        let (statement, alternatives) =
            split_alternatives("Veja o item C) citado.\nA) sim B) não");

        assert_eq!(statement, "Veja o item C) citado.");
        assert_eq!(alternatives.len(), 2);
    }

    #[test]
    fn test_repeated_letter_is_not_a_new_alternative() {
        let (_, alternatives) = split_alternatives("Enunciado\nA) primeira parte A) ainda A\nB) outra");
        assert_eq!(alternatives[&OptionLetter::A], "primeira parte A) ainda A");
        assert_eq!(alternatives[&OptionLetter::B], "outra");
    }

    #[test]
    fn test_no_alternatives_keeps_whole_body() {
        let (statement, alternatives) = split_alternatives("  Redija um texto\n dissertativo. ");
        assert_eq!(statement, "Redija um texto dissertativo.");
        assert!(alternatives.is_empty());
    }

    #[test]
    fn test_dotted_alternatives_at_line_start() {
        let (statement, alternatives) =
            split_alternatives("Qual a capital?\nA. Recife\nB. Brasília\nC - Salvador");
        assert_eq!(statement, "Qual a capital?");
        assert_eq!(alternatives[&OptionLetter::B], "Brasília");
        assert_eq!(alternatives[&OptionLetter::C], "Salvador");
    }
}
