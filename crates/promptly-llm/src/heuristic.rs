//! Local keyword heuristics used when the remote analysis is unavailable.

use std::collections::HashMap;

use promptly_core::enums::TaskType;

const CREATIVE_WORDS: &[&str] = &[
    "create", "write", "story", "poem", "art", "design", "imagine", "creative",
];
const TECHNICAL_WORDS: &[&str] = &[
    "code",
    "program",
    "function",
    "technical",
    "build",
    "develop",
    "implement",
];
const INFORMATIONAL_WORDS: &[&str] = &[
    "explain",
    "describe",
    "what",
    "how",
    "why",
    "information",
    "detail",
];
const PROBLEM_SOLVING_WORDS: &[&str] = &[
    "solve", "fix", "improve", "optimize", "solution", "problem", "debug",
];

const STOPWORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "all", "am", "an", "and", "any", "are", "as", "at",
    "be", "because", "been", "before", "being", "below", "between", "both", "but", "by", "can",
    "could", "did", "do", "does", "doing", "down", "during", "each", "few", "for", "from",
    "further", "had", "has", "have", "having", "he", "her", "here", "hers", "him", "his", "how",
    "i", "if", "in", "into", "is", "it", "its", "just", "me", "more", "most", "my", "no", "nor",
    "not", "now", "of", "off", "on", "once", "only", "or", "other", "our", "out", "over", "own",
    "please", "same", "she", "should", "so", "some", "such", "than", "that", "the", "their",
    "them", "then", "there", "these", "they", "this", "those", "through", "to", "too", "under",
    "until", "up", "us", "very", "was", "we", "were", "what", "when", "where", "which", "while",
    "who", "whom", "why", "will", "with", "would", "you", "your",
];

const MAX_KEY_CONCEPTS: usize = 5;

/// Lowercase word tokens, split on anything that is not alphanumeric.
#[must_use]
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

const fn keywords(task_type: TaskType) -> &'static [&'static str] {
    match task_type {
        TaskType::Creative => CREATIVE_WORDS,
        TaskType::Technical => TECHNICAL_WORDS,
        TaskType::Informational => INFORMATIONAL_WORDS,
        TaskType::ProblemSolving => PROBLEM_SOLVING_WORDS,
        TaskType::Conversational => &[],
    }
}

/// Keyword score per task type. Conversational starts at 1.
#[must_use]
pub fn scores(tokens: &[String]) -> [(TaskType, usize); 5] {
    TaskType::ALL.map(|task_type| {
        let base = usize::from(task_type == TaskType::Conversational);
        let hits = tokens
            .iter()
            .filter(|token| keywords(task_type).contains(&token.as_str()))
            .count();
        (task_type, base + hits)
    })
}

/// Pick the task type with the highest keyword score.
///
/// Types are visited in [`TaskType::ALL`] order and a later type replaces the
/// running best on a tie, so conversational wins any tie with the top score.
#[must_use]
pub fn detect_task_type(text: &str) -> TaskType {
    let tokens = tokenize(text);
    let mut best = (TaskType::Conversational, 0);
    for (task_type, score) in scores(&tokens) {
        if score >= best.1 {
            best = (task_type, score);
        }
    }
    best.0
}

/// The most frequent non-stopword tokens, ties broken by first occurrence.
#[must_use]
pub fn key_concepts(text: &str) -> Vec<String> {
    let tokens = tokenize(text);
    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
    for (position, token) in tokens.iter().enumerate() {
        if STOPWORDS.contains(&token.as_str()) {
            continue;
        }
        counts.entry(token.as_str()).or_insert((0, position)).0 += 1;
    }
    let mut ranked: Vec<(&str, (usize, usize))> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.0.cmp(&a.1.0).then(a.1.1.cmp(&b.1.1)));
    ranked
        .into_iter()
        .take(MAX_KEY_CONCEPTS)
        .map(|(token, _)| token.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("Write a creative story about space", TaskType::Creative)]
    #[case("implement a function to build the code", TaskType::Technical)]
    #[case("explain how tides work and describe why", TaskType::Informational)]
    #[case("debug and fix this problem", TaskType::ProblemSolving)]
    #[case("hello there", TaskType::Conversational)]
    #[case("", TaskType::Conversational)]
    fn detects_task_type(#[case] text: &str, #[case] expected: TaskType) {
        assert_eq!(detect_task_type(text), expected);
    }

    #[test]
    fn single_keyword_ties_go_to_conversational() {
        // creative = 1, conversational = 1
        assert_eq!(detect_task_type("a poem"), TaskType::Conversational);
    }

    #[test]
    fn ties_between_keyword_types_go_to_the_later_type() {
        // creative = 2, technical = 2, conversational = 1
        assert_eq!(detect_task_type("write code, design a program"), TaskType::Technical);
    }

    #[test]
    fn tokenizer_splits_on_punctuation() {
        assert_eq!(tokenize("Fix: the BUG!"), vec!["fix", "the", "bug"]);
    }

    #[test]
    fn key_concepts_rank_by_frequency_then_position() {
        let concepts = key_concepts("Rust traits and rust lifetimes explain traits of the borrow checker");
        assert_eq!(concepts, vec!["rust", "traits", "lifetimes", "explain", "borrow"]);
    }

    #[test]
    fn key_concepts_skip_stopwords() {
        assert!(key_concepts("the and of to").is_empty());
    }
}
