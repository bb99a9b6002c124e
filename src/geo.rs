//! Generative-engine-optimization rubrics.
//!
//! Each rubric is a point-additive score over primitives the analyzer has
//! already extracted, capped at 100.

use once_cell::sync::Lazy;
use regex::Regex;

static SENTENCE_SPLIT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[.!?]+").expect("sentence split regex should be valid"));
static HEADING_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<h[1-3][^>]*>(.*?)</h[1-3]>").expect("heading regex should be valid")
});
static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("tag regex should be valid"));
static ORDERED_LIST_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<ol[\s>]").expect("ordered list regex should be valid"));
static NUMBER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d+[%$,.]?\d*").expect("number regex should be valid"));
static QUOTE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new("\"[^\"]+\"|\u{201C}[^\u{201D}]+\u{201D}").expect("quote regex should be valid")
});

const BULLET_GLYPHS: &[char] = &['•', '◦', '▪', '✓', '✔', '✅', '☑'];
const QUESTION_WORDS: &[&str] = &["how", "what", "why", "when", "where"];
const DEFINITION_PHRASES: &[&str] = &[
    " is a ",
    " is an ",
    " are ",
    " means ",
    " refers to ",
    " provides ",
];
const DATA_PHRASES: &[&str] = &[
    "average",
    "according to",
    "research",
    "study",
    "survey",
    "report",
    "data shows",
];
const AUTHORITY_PHRASES: &[&str] = &[
    "founded",
    "established",
    "certified",
    "award",
    "recognition",
    "partner",
];

/// Primitives the rubrics are computed from.
pub struct GeoInput<'a> {
    pub markup: &'a str,
    pub body_text: &'a str,
    pub word_count: usize,
    pub h1_count: usize,
    pub h2_count: usize,
    pub h3_count: usize,
    pub has_faq_schema: bool,
}

pub fn content_clarity_score(input: &GeoInput<'_>) -> u32 {
    let mut score = 0;

    if input.word_count >= 100 {
        score += 15;
    }
    if input.word_count >= 300 {
        score += 15;
    }
    if input.h1_count == 1 {
        score += 15;
    }
    if input.h2_count >= 2 {
        score += 10;
    }
    if input.h3_count >= 1 {
        score += 5;
    }

    if let Some(avg) = average_sentence_length(input.body_text) {
        if avg <= 20.0 {
            score += 20;
        } else if avg <= 30.0 {
            score += 10;
        }
    }

    if input.body_text.contains(BULLET_GLYPHS) {
        score += 10;
    }
    if input.h2_count >= 3 {
        score += 10;
    }

    score.min(100)
}

pub fn answerability_score(input: &GeoInput<'_>) -> u32 {
    let mut score = 0;

    if input.has_faq_schema {
        score += 30;
    }

    let question_headings = HEADING_RE
        .captures_iter(input.markup)
        .filter(|caps| is_question_heading(&caps[1]))
        .count()
        .min(3) as u32;
    score += question_headings * 10;

    let text = input.body_text.to_lowercase();
    score += (phrase_hits(&text, DEFINITION_PHRASES) * 5).min(20);

    if ORDERED_LIST_RE.is_match(input.markup)
        || text.contains("step 1")
        || text.contains("step one")
    {
        score += 20;
    }

    score.min(100)
}

pub fn citation_worthiness_score(input: &GeoInput<'_>) -> u32 {
    let mut score = 0;

    let numbers = NUMBER_RE.find_iter(input.body_text).count() as u32;
    score += numbers.saturating_mul(3).min(30);

    let text = input.body_text.to_lowercase();
    score += (phrase_hits(&text, DATA_PHRASES) * 5).min(20);
    score += (phrase_hits(&text, AUTHORITY_PHRASES) * 5).min(20);

    score += match input.word_count {
        n if n >= 500 => 15,
        n if n >= 300 => 10,
        n if n >= 100 => 5,
        _ => 0,
    };

    let quotes = QUOTE_RE.find_iter(input.body_text).count() as u32;
    score += quotes.saturating_mul(5).min(15);

    score.min(100)
}

/// Mean words per sentence, counting only fragments longer than 10 chars.
fn average_sentence_length(text: &str) -> Option<f64> {
    let sentences: Vec<&str> = SENTENCE_SPLIT_RE
        .split(text)
        .map(str::trim)
        .filter(|s| s.chars().count() > 10)
        .collect();

    if sentences.is_empty() {
        return None;
    }

    let words: usize = sentences
        .iter()
        .map(|s| s.split_whitespace().count())
        .sum();
    Some(words as f64 / sentences.len() as f64)
}

fn is_question_heading(inner_html: &str) -> bool {
    let text = TAG_RE.replace_all(inner_html, "");
    let text = text.trim();
    if text.ends_with('?') {
        return true;
    }
    let lower = text.to_lowercase();
    QUESTION_WORDS.iter().any(|word| lower.starts_with(word))
}

fn phrase_hits(lower_text: &str, phrases: &[&str]) -> u32 {
    phrases
        .iter()
        .filter(|phrase| lower_text.contains(*phrase))
        .count() as u32
}
