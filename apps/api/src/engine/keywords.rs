//! Keyword extraction: ranked, bounded sets of salient JD/candidate terms.
//!
//! Two strategies share one contract so the ranker can overlap their output
//! against a skill list by exact string match:
//! - `Frequency`: single tokens ranked by how often they occur.
//! - `PhraseRank`: RAKE-style phrases of up to three words, scored by word
//!   co-occurrence degree.
//!
//! Ties always resolve by first occurrence in the source text.

use std::collections::{HashMap, HashSet};
use std::{fmt, str};

use serde::{Deserialize, Serialize};

/// Longest phrase emitted by the phrase-ranking strategy.
const MAX_PHRASE_WORDS: usize = 3;

/// Tokens of this many characters or fewer are never keywords.
const MIN_TOKEN_CHARS: usize = 2;

const STOP_WORDS: &[&str] = &[
    "a", "about", "above", "across", "after", "again", "against", "all", "almost", "along",
    "already", "also", "although", "always", "am", "among", "an", "and", "another", "any",
    "anyone", "anything", "are", "around", "as", "at", "be", "became", "because", "become",
    "been", "before", "being", "below", "between", "both", "but", "by", "can", "cannot",
    "could", "did", "do", "does", "doing", "done", "down", "during", "each", "either", "else",
    "enough", "etc", "even", "ever", "every", "few", "for", "from", "further", "get", "had",
    "has", "have", "having", "he", "her", "here", "hers", "herself", "him", "himself", "his",
    "how", "however", "i", "if", "in", "into", "is", "it", "its", "itself", "just", "least",
    "less", "like", "made", "many", "may", "me", "might", "more", "most", "much", "must", "my",
    "myself", "neither", "no", "nor", "not", "now", "of", "off", "often", "on", "once", "one",
    "only", "or", "other", "others", "otherwise", "our", "ours", "ourselves", "out", "over",
    "own", "per", "perhaps", "please", "rather", "same", "several", "shall", "she", "should",
    "since", "so", "some", "something", "such", "than", "that", "the", "their", "theirs",
    "them", "themselves", "then", "there", "these", "they", "this", "those", "though",
    "through", "throughout", "thus", "to", "together", "too", "toward", "towards", "under",
    "until", "up", "upon", "us", "very", "via", "was", "we", "well", "were", "what",
    "whatever", "when", "where", "whether", "which", "while", "who", "whole", "whom", "whose",
    "why", "will", "with", "within", "without", "would", "yet", "you", "your", "yours",
    "yourself", "yourselves",
];

pub fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.contains(&word)
}

/// Available keyword extraction strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeywordStrategy {
    /// Top tokens by frequency after stop-word and short-token filtering.
    #[default]
    Frequency,
    /// Multi-word phrases ranked by co-occurrence degree.
    PhraseRank,
}

impl fmt::Display for KeywordStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Frequency => write!(f, "frequency"),
            Self::PhraseRank => write!(f, "phrase"),
        }
    }
}

impl str::FromStr for KeywordStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "frequency" | "freq" => Ok(Self::Frequency),
            "phrase" | "rake" | "phrase_rank" | "phrase-rank" => Ok(Self::PhraseRank),
            _ => Err(format!(
                "unknown keyword strategy '{s}', expected one of: frequency, phrase"
            )),
        }
    }
}

/// A keyword with its rank score (frequency or phrase degree score).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keyword {
    pub term: String,
    pub score: f32,
}

#[derive(Debug, Clone)]
pub struct KeywordExtractor {
    strategy: KeywordStrategy,
    limit: usize,
}

impl KeywordExtractor {
    pub fn new(strategy: KeywordStrategy, limit: usize) -> Self {
        Self { strategy, limit }
    }

    pub fn strategy(&self) -> KeywordStrategy {
        self.strategy
    }

    /// Extracts at most `limit` keywords from already-normalized text, best first.
    pub fn extract(&self, text: &str) -> Vec<Keyword> {
        let mut keywords = match self.strategy {
            KeywordStrategy::Frequency => frequency_keywords(text),
            KeywordStrategy::PhraseRank => phrase_keywords(text),
        };
        keywords.truncate(self.limit);
        keywords
    }
}

/// Counts occurrences of `term` (one or more words) in the token stream of `text`.
pub fn term_frequency(term: &str, text: &str) -> u32 {
    let needle: Vec<&str> = term.split_whitespace().collect();
    if needle.is_empty() {
        return 0;
    }
    let tokens: Vec<&str> = text.split_whitespace().map(clean_token).collect();
    if tokens.len() < needle.len() {
        return 0;
    }
    tokens
        .windows(needle.len())
        .filter(|window| *window == needle.as_slice())
        .count() as u32
}

/// Strips sentence/bracket punctuation that normalization keeps around words.
/// Leading dots survive so `.net` stays intact.
fn clean_token(raw: &str) -> &str {
    raw.trim_matches(|c: char| c == '(' || c == ')')
        .trim_end_matches('.')
        .trim_matches('-')
}

fn is_content_word(word: &str) -> bool {
    word.chars().count() > MIN_TOKEN_CHARS
        && word.chars().any(char::is_alphanumeric)
        && !is_stop_word(word)
}

fn frequency_keywords(text: &str) -> Vec<Keyword> {
    // Insertion order == first occurrence; the stable sort below keeps it for ties.
    let mut counts: Vec<(String, u32)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for word in text.split_whitespace().map(clean_token) {
        if !is_content_word(word) {
            continue;
        }
        match index.get(word) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(word.to_string(), counts.len());
                counts.push((word.to_string(), 1));
            }
        }
    }

    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
        .into_iter()
        .map(|(term, freq)| Keyword {
            term,
            score: freq as f32,
        })
        .collect()
}

/// Splits text into runs of content words, broken at stop words, short tokens,
/// sentence ends and brackets.
fn content_runs(text: &str) -> Vec<Vec<&str>> {
    let mut runs = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for raw in text.split_whitespace() {
        if raw.starts_with('(') && !current.is_empty() {
            runs.push(std::mem::take(&mut current));
        }
        let word = clean_token(raw);
        if is_content_word(word) {
            current.push(word);
        } else if !current.is_empty() {
            runs.push(std::mem::take(&mut current));
        }
        if (raw.ends_with('.') || raw.ends_with(')')) && !current.is_empty() {
            runs.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        runs.push(current);
    }
    runs
}

fn phrase_keywords(text: &str) -> Vec<Keyword> {
    let runs = content_runs(text);

    let mut frequency: HashMap<&str, f32> = HashMap::new();
    let mut degree: HashMap<&str, f32> = HashMap::new();
    for run in &runs {
        for word in run {
            *frequency.entry(*word).or_insert(0.0) += 1.0;
            *degree.entry(*word).or_insert(0.0) += run.len() as f32;
        }
    }
    let word_score = |word: &str| -> f32 {
        let freq = frequency.get(word).copied().unwrap_or(1.0);
        degree.get(word).copied().unwrap_or(0.0) / freq
    };

    let mut phrases: Vec<Keyword> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    for run in &runs {
        for start in 0..run.len() {
            for len in 1..=MAX_PHRASE_WORDS {
                if start + len > run.len() {
                    break;
                }
                let words = &run[start..start + len];
                let term = words.join(" ");
                if !seen.insert(term.clone()) {
                    continue;
                }
                let score = words.iter().map(|w| word_score(*w)).sum();
                phrases.push(Keyword { term, score });
            }
        }
    }

    phrases.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    phrases
}
