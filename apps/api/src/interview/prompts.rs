// Prompt templates for question generation and answer evaluation.
// Placeholders in `{braces}` are substituted by the builders below.

use crate::interview::models::{Category, Difficulty};

/// Character budget for JD/résumé excerpts in the question prompt.
pub const QUESTION_CONTEXT_CHARS: usize = 500;
/// Character budget for JD/résumé excerpts in the evaluation prompt.
pub const EVALUATION_CONTEXT_CHARS: usize = 300;

/// Replace: {difficulty}, {category}, {jd_excerpt}, {resume_excerpt}, {used_questions}
pub const QUESTION_PROMPT_TEMPLATE: &str = r#"As a professional interviewer, generate ONE unique {difficulty} difficulty {category} interview question.

JOB DESCRIPTION CONTEXT:
{jd_excerpt}

CANDIDATE'S RESUME CONTEXT:
{resume_excerpt}

PREVIOUSLY ASKED QUESTIONS (DO NOT REPEAT THESE):
{used_questions}

Generate a question that:
1. Is relevant to the job description
2. Considers the candidate's background from the resume
3. Is not similar to any previously asked question
4. Is appropriate for {difficulty} difficulty
5. Is specific and requires a detailed answer

Return ONLY the question text without any additional commentary."#;

/// Replace: {jd_excerpt}, {resume_excerpt}, {category}, {question}, {answer}
pub const EVALUATION_PROMPT_TEMPLATE: &str = r#"Evaluate this interview answer objectively.

JOB REQUIREMENTS (from JD):
{jd_excerpt}

CANDIDATE'S BACKGROUND (from resume):
{resume_excerpt}

QUESTION CATEGORY: {category}
QUESTION: {question}
CANDIDATE'S ANSWER: {answer}

Score each dimension from 0 to 10:
1. KNOWLEDGE/RELEVANCE: accuracy and understanding of the topic.
2. COMMUNICATION/STRUCTURE: clarity and structure of the response.
3. SPECIFICITY/EXAMPLES: concrete examples, data, or evidence from experience.

Scoring guide:
- 9-10: exceptional, specific, directly relevant to the JD
- 7-8: good, some relevant detail
- 5-6: average, generic
- 3-4: vague, limited understanding
- 1-2: irrelevant or incorrect
- 0: no answer or off-topic

Respond in this EXACT format:
KNOWLEDGE SCORE: X/10
COMMUNICATION SCORE: Y/10
SPECIFICITY SCORE: Z/10
FEEDBACK: [explanation of the scores and areas for improvement]"#;

/// Returns at most `max_chars` characters of `text`. Cuts may land mid-word.
pub fn excerpt(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

pub fn build_question_prompt(
    used_questions: &[String],
    jd_text: &str,
    resume_text: &str,
    category: &Category,
    difficulty: Difficulty,
) -> String {
    let used = if used_questions.is_empty() {
        "None".to_string()
    } else {
        used_questions.join("\n")
    };

    let difficulty = difficulty.to_string();

    fill_template(
        QUESTION_PROMPT_TEMPLATE,
        &[
            ("difficulty", difficulty.as_str()),
            ("category", category.name()),
            ("jd_excerpt", excerpt(jd_text, QUESTION_CONTEXT_CHARS)),
            ("resume_excerpt", excerpt(resume_text, QUESTION_CONTEXT_CHARS)),
            ("used_questions", used.as_str()),
        ],
    )
}

pub fn build_evaluation_prompt(
    question: &str,
    answer: &str,
    jd_text: &str,
    resume_text: &str,
    category: &Category,
) -> String {
    fill_template(
        EVALUATION_PROMPT_TEMPLATE,
        &[
            ("jd_excerpt", excerpt(jd_text, EVALUATION_CONTEXT_CHARS)),
            ("resume_excerpt", excerpt(resume_text, EVALUATION_CONTEXT_CHARS)),
            ("category", category.name()),
            ("question", question),
            ("answer", answer),
        ],
    )
}

/// Substitutes `{name}` placeholders in one left-to-right pass.
/// Substituted values are never rescanned, so text containing `{answer}`
/// or similar is embedded literally. Unknown `{...}` sequences are kept as is.
fn fill_template(template: &str, fields: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let field = fields.iter().find(|(name, _)| {
            after.starts_with(*name) && after[name.len()..].starts_with('}')
        });

        match field {
            Some((name, value)) => {
                out.push_str(value);
                rest = &after[name.len() + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_excerpt_counts_chars_not_bytes() {
        assert_eq!(excerpt("résumé", 3), "rés");
        assert_eq!(excerpt("short", 500), "short");
        assert_eq!(excerpt("", 10), "");
    }

    #[test]
    fn test_question_prompt_truncates_context() {
        let jd = "J".repeat(800);
        let resume = "R".repeat(800);
        let prompt =
            build_question_prompt(&[], &jd, &resume, &Category::Technical, Difficulty::Hard);

        assert!(prompt.contains(&"J".repeat(QUESTION_CONTEXT_CHARS)));
        assert!(!prompt.contains(&"J".repeat(QUESTION_CONTEXT_CHARS + 1)));
        assert!(!prompt.contains(&"R".repeat(QUESTION_CONTEXT_CHARS + 1)));
        assert!(prompt.contains("Hard difficulty Technical"));
    }

    #[test]
    fn test_question_prompt_lists_used_questions() {
        let used = vec![
            "What is ownership?".to_string(),
            "Explain lifetimes.".to_string(),
        ];
        let prompt = build_question_prompt(
            &used,
            "jd",
            "resume",
            &Category::Behavioral,
            Difficulty::Easy,
        );
        assert!(prompt.contains("What is ownership?\nExplain lifetimes."));
    }

    #[test]
    fn test_question_prompt_without_history_says_none() {
        let prompt =
            build_question_prompt(&[], "jd", "resume", &Category::Personal, Difficulty::Medium);
        assert!(prompt.contains("(DO NOT REPEAT THESE):\nNone"));
    }

    #[test]
    fn test_evaluation_prompt_embeds_answer_verbatim() {
        let prompt = build_evaluation_prompt(
            "Why Rust?",
            "Because {category} is safe",
            &"J".repeat(400),
            "resume",
            &Category::Custom("Leadership".to_string()),
        );
        assert!(prompt.contains("CANDIDATE'S ANSWER: Because {category} is safe"));
        assert!(prompt.contains("QUESTION CATEGORY: Leadership"));
        assert!(!prompt.contains(&"J".repeat(EVALUATION_CONTEXT_CHARS + 1)));
    }

    #[test]
    fn test_evaluation_prompt_does_not_expand_placeholders_in_question() {
        let prompt = build_evaluation_prompt(
            "What does {answer} mean?",
            "SECRET",
            "jd",
            "resume",
            &Category::Technical,
        );
        assert!(prompt.contains("QUESTION: What does {answer} mean?"));
        assert!(prompt.contains("CANDIDATE'S ANSWER: SECRET"));
        assert_eq!(prompt.matches("SECRET").count(), 1);
    }

    #[test]
    fn test_fill_template_keeps_unknown_braces() {
        let filled = fill_template("{a} {unknown} {a", &[("a", "{a}")]);
        assert_eq!(filled, "{a} {unknown} {a");
    }
}
