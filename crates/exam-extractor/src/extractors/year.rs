// Exam year extraction
use std::collections::HashMap;

use crate::patterns::{ENEM_YEAR_ANCHOR, EXAM_NAME_YEAR_ANCHOR, YEAR_CANDIDATE};

/// How far back a bare four-digit number is still considered an exam year
pub const PLAUSIBLE_YEAR_WINDOW: i32 = 20;

/// Extracts the exam year from the full document text.
///
/// Order of preference:
/// 1. an explicit anchor ("ENEM 2022", "2021 - Exame Nacional ...")
/// 2. the most frequent year in `[current_year - 20, current_year]`,
///    ties going to the more recent year
/// 3. `current_year`
pub fn extract_year(text: &str, current_year: i32) -> i32 {
    if let Some(year) = anchored_year(text) {
        return year;
    }

    most_frequent_recent_year(text, current_year).unwrap_or(current_year)
}

fn anchored_year(text: &str) -> Option<i32> {
    [&*ENEM_YEAR_ANCHOR, &*EXAM_NAME_YEAR_ANCHOR]
        .into_iter()
        .find_map(|pattern| {
            pattern
                .captures(text)
                .and_then(|cap| cap.get(1))
                .and_then(|m| m.as_str().parse::<i32>().ok())
        })
}

fn most_frequent_recent_year(text: &str, current_year: i32) -> Option<i32> {
    let oldest = current_year - PLAUSIBLE_YEAR_WINDOW;
    let mut counts: HashMap<i32, usize> = HashMap::new();

    for cap in YEAR_CANDIDATE.captures_iter(text) {
        if let Some(year) = cap.get(1).and_then(|m| m.as_str().parse::<i32>().ok()) {
            if (oldest..=current_year).contains(&year) {
                *counts.entry(year).or_insert(0) += 1;
            }
        }
    }

    counts
        .into_iter()
        .max_by_key(|&(year, count)| (count, year))
        .map(|(year, _)| year)
}
