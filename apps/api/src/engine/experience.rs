//! Years-of-experience extraction.
//!
//! Resumes and JDs state experience several ways at once ("5+ years", "at
//! least 3 years", "2016 - present"). Every pattern family contributes
//! candidate values; implausible ones are dropped and the maximum wins.

use regex::Regex;

use crate::engine::normalize::normalize;

/// Values outside this range are treated as extraction noise.
pub const MAX_PLAUSIBLE_YEARS: u32 = 50;

pub struct ExperienceExtractor {
    /// Families whose first capture group is the year count.
    count_patterns: Vec<Regex>,
    /// `YYYY - YYYY` / `YYYY - present` spans.
    span_pattern: Regex,
    /// `YYYY - YY` spans, e.g. "2019-21".
    short_span_pattern: Regex,
    /// Year substituted for "present", "current" and "now".
    reference_year: i32,
}

impl ExperienceExtractor {
    pub fn new(reference_year: i32) -> Self {
        let count_patterns = [
            // 1. explicit phrasing: "5 years of experience", "3+ yrs exp", "4+ years"
            r"\b(\d+)\s*\+?\s*(?:years?|yrs?)\s*(?:of\s+)?(?:experience|exp)\b",
            r"\b(\d+)\s*\+\s*(?:years?|yrs?)\b",
            // 2. lower bounds
            r"\b(?:at\s+least|minimum(?:\s+of)?|over|more\s+than)\s+(\d+)\s*\+?\s*(?:years?|yrs?)\b",
            // 3. numeric ranges, lower bound taken
            r"\b(\d+)\s*(?:to|-)\s*\d+\s*(?:years?|yrs?)\b",
        ]
        .into_iter()
        .map(|p| Regex::new(p).expect("experience pattern compiles"))
        .collect();

        let span_pattern =
            Regex::new(r"\b((?:19|20)\d{2})\s*(?:-|to)\s*((?:19|20)\d{2}|present|current|now)\b")
                .expect("year span pattern compiles");
        let short_span_pattern = Regex::new(r"\b((?:19|20)\d{2})\s*(?:-|to)\s*(\d{2})\b")
            .expect("short year span pattern compiles");

        Self {
            count_patterns,
            span_pattern,
            short_span_pattern,
            reference_year,
        }
    }

    pub fn reference_year(&self) -> i32 {
        self.reference_year
    }

    /// Best-estimate years of experience in `text`, always within `0..=50`.
    pub fn extract_years(&self, text: &str) -> u32 {
        self.candidate_values(&normalize(text))
            .into_iter()
            .filter(|years| *years <= MAX_PLAUSIBLE_YEARS)
            .max()
            .unwrap_or(0)
    }

    /// Every raw value matched by any pattern family, in family order.
    /// Captures that fail to parse are skipped.
    fn candidate_values(&self, text: &str) -> Vec<u32> {
        let mut values = Vec::new();

        for pattern in &self.count_patterns {
            for caps in pattern.captures_iter(text) {
                if let Some(years) = caps.get(1).and_then(|m| m.as_str().parse::<u32>().ok()) {
                    values.push(years);
                }
            }
        }

        for caps in self.span_pattern.captures_iter(text) {
            let start = caps.get(1).and_then(|m| m.as_str().parse::<i32>().ok());
            let end = caps.get(2).and_then(|m| match m.as_str() {
                "present" | "current" | "now" => Some(self.reference_year),
                year => year.parse::<i32>().ok(),
            });
            if let (Some(start), Some(end)) = (start, end) {
                if end >= start {
                    values.push((end - start) as u32);
                }
            }
        }

        for caps in self.short_span_pattern.captures_iter(text) {
            let start = caps.get(1).and_then(|m| m.as_str().parse::<i32>().ok());
            let end = caps.get(2).and_then(|m| m.as_str().parse::<i32>().ok());
            if let (Some(start), Some(end)) = (start, end) {
                // The end year borrows the start's century, rolling over once.
                let mut end = start - start % 100 + end;
                if end < start {
                    end += 100;
                }
                values.push((end - start) as u32);
            }
        }

        values
    }
}
