pub mod types;

pub use types::{
    Alternatives, AnswerKey, Categorization, Difficulty, ExtractionResult, OptionLetter,
    ParseLabelError, Question, Subject,
};
