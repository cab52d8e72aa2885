pub mod answer_key;
pub mod questions;
pub mod year;

pub use answer_key::{apply_answer_key, parse_answer_key};
pub use questions::{split_alternatives, split_questions, RawQuestion};
pub use year::extract_year;
