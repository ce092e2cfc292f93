//! @acp:module "Style"
//! @acp:summary "Readability grade, active-voice ratio and blended style score"
//! @acp:domain qa
//! @acp:layer service
//!
//! The score blends a grade term and an active-voice term and subtracts a
//! penalty per bad phrase:
//! `0.5 * max(0, (8 - min(fk, 16)) / 8) + 0.5 * av - 0.1 * bad`, clamped to `[0, 1]`.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::{Document, QaCheck};

static SENTENCE_BREAK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[.!?]\s+").unwrap());

static PASSIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(be|been|being|is|was|were|are)\b\s+\w+ed\b").unwrap()
});

/// AI-disclosure and cliché phrases, matched case-sensitively
static BAD_PHRASES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [r"\bAs an AI\b", r"\bAs a language model\b", r"\bIn conclusion\b", r"\bcutting-edge\b"]
        .iter()
        .map(|p| Regex::new(p).unwrap())
        .collect()
});

static MD_LINK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"!?\[([^\]]*)\]\([^)]*\)").unwrap());

static MD_MARKUP: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^[ \t]*(#{1,6}|>|[-*+]|\d+[.)])[ \t]+|[*_`|]").unwrap());

static TERMINATORS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[.!?]+").unwrap());

/// Strip markdown syntax, keeping link text
fn plain_text(markdown: &str) -> String {
    let text = MD_LINK.replace_all(markdown, "$1");
    MD_MARKUP.replace_all(&text, " ").into_owned()
}

fn is_word(token: &str) -> bool {
    token.chars().any(|c| c.is_alphanumeric())
}

/// Vowel-group syllable estimate, at least one per word
pub fn count_syllables(word: &str) -> usize {
    let letters: Vec<char> = word
        .chars()
        .filter(|c| c.is_ascii_alphabetic())
        .map(|c| c.to_ascii_lowercase())
        .collect();
    if letters.is_empty() {
        return 1;
    }

    let is_vowel = |c: char| matches!(c, 'a' | 'e' | 'i' | 'o' | 'u' | 'y');
    let mut count = 0;
    let mut prev_vowel = false;
    for &c in &letters {
        let vowel = is_vowel(c);
        if vowel && !prev_vowel {
            count += 1;
        }
        prev_vowel = vowel;
    }

    let n = letters.len();
    let silent_e = n > 2 && letters[n - 1] == 'e' && letters[n - 2] != 'l' && !is_vowel(letters[n - 2]);
    if silent_e && count > 1 {
        count -= 1;
    }
    count.max(1)
}

/// Flesch-Kincaid grade of markdown text; 0.0 when there are no words
pub fn fk_grade(markdown: &str) -> f64 {
    let text = plain_text(markdown);
    let mut sentences = 0usize;
    let mut words = 0usize;
    let mut syllables = 0usize;

    for line in text.lines() {
        for segment in TERMINATORS.split(line) {
            let tokens: Vec<&str> = segment.split_whitespace().filter(|t| is_word(t)).collect();
            if tokens.is_empty() {
                continue;
            }
            sentences += 1;
            words += tokens.len();
            syllables += tokens.iter().map(|t| count_syllables(t)).sum::<usize>();
        }
    }

    if words == 0 {
        return 0.0;
    }
    0.39 * (words as f64 / sentences as f64) + 11.8 * (syllables as f64 / words as f64) - 15.59
}

/// One minus the share of sentences that contain a passive construction
pub fn active_voice_ratio(text: &str) -> f64 {
    let sentences: Vec<&str> = SENTENCE_BREAK.split(text.trim()).collect();
    let passive = sentences.iter().filter(|s| PASSIVE.is_match(s)).count();
    (1.0 - passive as f64 / sentences.len().max(1) as f64).max(0.0)
}

pub fn bad_phrase_count(text: &str) -> usize {
    BAD_PHRASES.iter().map(|re| re.find_iter(text).count()).sum()
}

fn blend(fk: f64, active: f64, bad: usize) -> f64 {
    let grade_term = ((8.0 - fk.min(16.0)) / 8.0).max(0.0);
    let score = 0.5 * grade_term + 0.5 * active - 0.1 * bad as f64;
    score.clamp(0.0, 1.0)
}

/// Blended style score in `[0, 1]`
pub fn style_score(text: &str) -> f64 {
    blend(fk_grade(text), active_voice_ratio(text), bad_phrase_count(text))
}

/// @acp:summary "Style metrics for one document"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleReport {
    pub fk_grade: f64,
    pub active_voice_ratio: f64,
    pub bad_phrase_count: usize,
    pub narrative_style_score: f64,
    pub qa_pass: bool,
    pub notes: Vec<String>,
}

/// Compute every style metric and judge it against the thresholds
pub fn run_style_checks(text: &str, fk_max: f64, style_min: f64) -> StyleReport {
    let fk = fk_grade(text);
    let active = active_voice_ratio(text);
    let bad = bad_phrase_count(text);
    let score = blend(fk, active, bad);

    let mut notes = Vec::new();
    if fk > fk_max {
        notes.push(format!("Readability too hard (FK > {:.1})", fk_max));
    }
    if score < style_min {
        notes.push(format!("Style score < {}", style_min));
    }
    if bad > 0 {
        notes.push("Filler/AI phrasing present".to_string());
    }

    StyleReport {
        fk_grade: fk,
        active_voice_ratio: active,
        bad_phrase_count: bad,
        narrative_style_score: score,
        qa_pass: notes.is_empty(),
        notes,
    }
}

/// Readability and style gate
#[derive(Debug, Clone)]
pub struct StyleCheck {
    pub fk_max: f64,
    pub style_min: f64,
}

impl QaCheck for StyleCheck {
    fn name(&self) -> &'static str {
        "style"
    }

    fn check(&self, doc: &Document<'_>) -> Vec<String> {
        run_style_checks(doc.text, self.fk_max, self.style_min).notes
    }
}
