//! Answer evaluation and response parsing.
//!
//! Model output is semi-structured at best. Every parser here is total:
//! a miss resolves to a documented default instead of an error.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

use crate::interview::models::{Category, ScoreTriple};
use crate::interview::prompts::build_evaluation_prompt;
use crate::llm_client::ModelGateway;

/// Returned in place of model output when the evaluation call fails.
pub const EVALUATION_UNAVAILABLE: &str = "KNOWLEDGE SCORE: 5/10\n\
COMMUNICATION SCORE: 5/10\n\
SPECIFICITY SCORE: 5/10\n\
FEEDBACK: Evaluation system temporarily unavailable. Please continue.";

/// Score used for a rubric label that is absent from the text.
pub const DEFAULT_LABEL_SCORE: u8 = 5;
/// Result of the generic parser when fewer than three scores are present.
pub const DEFAULT_GENERIC_SCORES: [u8; 3] = [6, 7, 7];

const MAX_SCORE: u8 = 10;
const FEEDBACK_MARKER: &str = "FEEDBACK:";
const FEEDBACK_LINE_MARKERS: &[&str] = &["FEEDBACK", "COMMENT", "ANALYSIS"];

static KNOWLEDGE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)KNOWLEDGE SCORE:\s*(\d+)/10").expect("valid regex"));
static COMMUNICATION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)COMMUNICATION SCORE:\s*(\d+)/10").expect("valid regex"));
static SPECIFICITY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)SPECIFICITY SCORE:\s*(\d+)/10").expect("valid regex"));
static OUT_OF_TEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+)/10").expect("valid regex"));

/// Asks the gateway to grade an answer and returns the raw rubric text.
/// Gateway failures yield `EVALUATION_UNAVAILABLE`; this never blocks the interview.
pub async fn evaluate_answer(
    gateway: &dyn ModelGateway,
    question: &str,
    answer: &str,
    jd_text: &str,
    resume_text: &str,
    category: &Category,
) -> String {
    let prompt = build_evaluation_prompt(question, answer, jd_text, resume_text, category);
    match gateway.generate(&prompt).await {
        Ok(text) if !text.trim().is_empty() => text,
        Ok(_) => {
            warn!("Evaluation returned empty text, using neutral scores");
            EVALUATION_UNAVAILABLE.to_string()
        }
        Err(e) => {
            warn!("Evaluation call failed, using neutral scores: {e}");
            EVALUATION_UNAVAILABLE.to_string()
        }
    }
}

/// Label-based score parser. Each label is searched independently.
pub fn parse_scores(raw: &str) -> ScoreTriple {
    ScoreTriple::new(
        label_score(&KNOWLEDGE_RE, raw).unwrap_or(DEFAULT_LABEL_SCORE),
        label_score(&COMMUNICATION_RE, raw).unwrap_or(DEFAULT_LABEL_SCORE),
        label_score(&SPECIFICITY_RE, raw).unwrap_or(DEFAULT_LABEL_SCORE),
    )
}

/// Looser parser: the first three `N/10` values anywhere in the text, in order.
/// Never used to score answers; those go through `parse_scores` only.
#[allow(dead_code)]
pub fn parse_generic_scores(raw: &str) -> [u8; 3] {
    let found: Vec<u8> = OUT_OF_TEN_RE
        .captures_iter(raw)
        .take(3)
        .map(|c| clamp_score(&c[1]))
        .collect();

    match found.as_slice() {
        [a, b, c] => [*a, *b, *c],
        _ => DEFAULT_GENERIC_SCORES,
    }
}

/// Returns the human-readable feedback portion of rubric text.
/// Never returns an empty string for non-empty input.
pub fn extract_feedback_body(raw: &str) -> String {
    if let Some((_, body)) = raw.split_once(FEEDBACK_MARKER) {
        let body = body.trim();
        if !body.is_empty() {
            return body.to_string();
        }
    }

    let lines: Vec<&str> = raw.lines().collect();
    if let Some(idx) = lines.iter().position(|line| {
        let upper = line.to_uppercase();
        FEEDBACK_LINE_MARKERS.iter().any(|m| upper.contains(m))
    }) {
        let rest = lines[idx + 1..].join("\n");
        let rest = rest.trim();
        if !rest.is_empty() {
            return rest.to_string();
        }
    }

    raw.to_string()
}

/// Cleans a generated question. `None` means the model produced nothing usable.
pub fn extract_question(raw: &str) -> Option<String> {
    let text = raw.trim();
    let text = text
        .strip_prefix("Question:")
        .or_else(|| text.strip_prefix("QUESTION:"))
        .unwrap_or(text)
        .trim()
        .trim_matches('"')
        .trim();

    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

fn label_score(re: &Regex, raw: &str) -> Option<u8> {
    re.captures(raw).map(|c| clamp_score(&c[1]))
}

fn clamp_score(digits: &str) -> u8 {
    // Digit strings too long for u64 are certainly above the maximum.
    digits
        .parse::<u64>()
        .map(|n| n.min(MAX_SCORE as u64) as u8)
        .unwrap_or(MAX_SCORE)
}
