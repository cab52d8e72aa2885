use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Returned when a label or letter does not name a known variant
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind}: '{value}'")]
pub struct ParseLabelError {
    pub kind: &'static str,
    pub value: String,
}

/// Alternative marker letter of a multiple-choice question
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum OptionLetter {
    A,
    B,
    C,
    D,
    E,
}

impl OptionLetter {
    pub const ALL: [OptionLetter; 5] = [
        OptionLetter::A,
        OptionLetter::B,
        OptionLetter::C,
        OptionLetter::D,
        OptionLetter::E,
    ];

    /// Case-insensitive conversion from a single character
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'A' => Some(OptionLetter::A),
            'B' => Some(OptionLetter::B),
            'C' => Some(OptionLetter::C),
            'D' => Some(OptionLetter::D),
            'E' => Some(OptionLetter::E),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            OptionLetter::A => 'A',
            OptionLetter::B => 'B',
            OptionLetter::C => 'C',
            OptionLetter::D => 'D',
            OptionLetter::E => 'E',
        }
    }

    /// The letter that follows this one, `None` after `E`
    pub fn next(self) -> Option<Self> {
        match self {
            OptionLetter::A => Some(OptionLetter::B),
            OptionLetter::B => Some(OptionLetter::C),
            OptionLetter::C => Some(OptionLetter::D),
            OptionLetter::D => Some(OptionLetter::E),
            OptionLetter::E => None,
        }
    }
}

impl fmt::Display for OptionLetter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

impl FromStr for OptionLetter {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.trim().chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => OptionLetter::from_char(c),
            _ => None,
        }
        .ok_or_else(|| ParseLabelError {
            kind: "option letter",
            value: s.to_string(),
        })
    }
}

/// Letter -> alternative text. Ordered so serialized output is stable.
pub type Alternatives = BTreeMap<OptionLetter, String>;

/// ENEM knowledge area a question belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Subject {
    #[serde(rename = "Linguagens e Códigos")]
    Languages,
    #[serde(rename = "Ciências Humanas")]
    HumanSciences,
    #[serde(rename = "Ciências da Natureza")]
    NaturalSciences,
    #[serde(rename = "Matemática")]
    Mathematics,
    #[serde(rename = "Não classificado")]
    Unclassified,
}

impl Subject {
    pub fn label(&self) -> &'static str {
        match self {
            Subject::Languages => "Linguagens e Códigos",
            Subject::HumanSciences => "Ciências Humanas",
            Subject::NaturalSciences => "Ciências da Natureza",
            Subject::Mathematics => "Matemática",
            Subject::Unclassified => "Não classificado",
        }
    }

    pub fn is_classified(&self) -> bool {
        *self != Subject::Unclassified
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Subject {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [
            Subject::Languages,
            Subject::HumanSciences,
            Subject::NaturalSciences,
            Subject::Mathematics,
            Subject::Unclassified,
        ]
        .into_iter()
        .find(|subject| subject.label().eq_ignore_ascii_case(s.trim()))
        .ok_or_else(|| ParseLabelError {
            kind: "subject",
            value: s.to_string(),
        })
    }
}

/// Estimated difficulty assigned by the categorization pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    #[serde(rename = "Fácil")]
    Easy,
    #[serde(rename = "Médio")]
    Medium,
    #[serde(rename = "Difícil")]
    Hard,
}

impl Difficulty {
    pub fn label(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Fácil",
            Difficulty::Medium => "Médio",
            Difficulty::Hard => "Difícil",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Difficulty {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Fácil" => Ok(Difficulty::Easy),
            "Médio" => Ok(Difficulty::Medium),
            "Difícil" => Ok(Difficulty::Hard),
            other => Err(ParseLabelError {
                kind: "difficulty",
                value: other.to_string(),
            }),
        }
    }
}

/// A multiple-choice question extracted from an exam paper
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Position within the exam, as printed next to the marker
    #[serde(rename = "numero")]
    pub number: u32,
    #[serde(rename = "enunciado")]
    pub statement: String,
    #[serde(rename = "alternativas", default)]
    pub alternatives: Alternatives,
    #[serde(rename = "materia")]
    pub subject: Subject,
    #[serde(rename = "ano")]
    pub year: i32,
    #[serde(
        rename = "resposta_correta",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub correct_answer: Option<OptionLetter>,
}

impl Question {
    /// Sets the correct answer only when `letter` is one of this question's
    /// alternatives. Returns whether the answer was recorded.
    pub fn set_correct_answer(&mut self, letter: OptionLetter) -> bool {
        if self.alternatives.contains_key(&letter) {
            self.correct_answer = Some(letter);
            true
        } else {
            false
        }
    }

    /// The correct answer, if any, is one of the alternatives
    pub fn is_consistent(&self) -> bool {
        self.correct_answer
            .map_or(true, |letter| self.alternatives.contains_key(&letter))
    }

    /// Statement and alternatives joined, used for keyword matching
    pub fn searchable_text(&self) -> String {
        let mut text = self.statement.clone();
        for alternative in self.alternatives.values() {
            text.push(' ');
            text.push_str(alternative);
        }
        text
    }
}

/// Gabarito: question number -> correct letter
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerKey {
    answers: BTreeMap<u32, OptionLetter>,
}

impl AnswerKey {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an answer unless the number already has one
    pub fn insert_first(&mut self, number: u32, letter: OptionLetter) -> bool {
        match self.answers.entry(number) {
            std::collections::btree_map::Entry::Vacant(entry) => {
                entry.insert(letter);
                true
            }
            std::collections::btree_map::Entry::Occupied(_) => false,
        }
    }

    pub fn get(&self, number: u32) -> Option<OptionLetter> {
        self.answers.get(&number).copied()
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, OptionLetter)> + '_ {
        self.answers.iter().map(|(number, letter)| (*number, *letter))
    }
}

impl FromIterator<(u32, OptionLetter)> for AnswerKey {
    fn from_iter<I: IntoIterator<Item = (u32, OptionLetter)>>(iter: I) -> Self {
        let mut key = AnswerKey::new();
        for (number, letter) in iter {
            key.insert_first(number, letter);
        }
        key
    }
}

/// Questions of one source document, in marker order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    #[serde(rename = "questoes")]
    pub questions: Vec<Question>,
}

impl ExtractionResult {
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Number of questions carrying a correct answer
    pub fn answered(&self) -> usize {
        self.questions
            .iter()
            .filter(|q| q.correct_answer.is_some())
            .count()
    }
}

/// Output of the categorization pass for one question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Categorization {
    #[serde(rename = "materia")]
    pub subject: Subject,
    #[serde(rename = "competencia")]
    pub competency: Option<String>,
    #[serde(rename = "dificuldade")]
    pub difficulty: Difficulty,
}
