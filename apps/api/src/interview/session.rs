//! Interview session state machine.
//!
//! ```text
//! setup ──start()──▶ interviewing ──skip()/submit()──▶ interviewing
//!                                  └─(last round)────▶ results
//! ```
//!
//! A `Session` is owned by exactly one caller at a time; every command takes
//! `&mut self` and runs to completion before the next one starts.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::extract::TextExtractor;
use crate::interview::evaluation::{
    evaluate_answer, extract_feedback_body, extract_question, parse_scores,
};
use crate::interview::fallback::fallback_question;
use crate::interview::models::{
    Category, Difficulty, PendingQuestion, Phase, RoundRecord, ScoreTriple,
};
use crate::interview::prompts::build_question_prompt;
use crate::interview::summary::{export_document, round1, summarize, ExportDocument, Summary};
use crate::llm_client::ModelGateway;

pub const MIN_QUESTIONS: usize = 3;
pub const MAX_QUESTIONS: usize = 10;
pub const DEFAULT_QUESTIONS: usize = 5;

/// Feedback recorded for a skipped round.
pub const SKIPPED_FEEDBACK: &str = "Question was skipped.";

/// Everything collected on the setup screen.
#[derive(Debug, Clone)]
pub struct SessionSetup {
    pub resume: Bytes,
    pub job_description: String,
    pub total_questions: usize,
    pub difficulty: Difficulty,
    pub categories: Vec<Category>,
}

#[derive(Debug, Clone)]
pub struct Session {
    id: Uuid,
    phase: Phase,
    total_questions: usize,
    difficulty: Difficulty,
    categories: Vec<Category>,
    job_description: String,
    resume_text: String,
    used_questions: Vec<String>,
    pending: Option<PendingQuestion>,
    score_card: Vec<RoundRecord>,
    created_at: DateTime<Utc>,
}

impl Session {
    /// Validates the setup, extracts résumé text and opens the interview.
    /// Nothing is created when validation fails.
    pub fn start(setup: SessionSetup, extractor: &dyn TextExtractor) -> Result<Self, AppError> {
        if setup.resume.is_empty() {
            return Err(AppError::Configuration(
                "Please upload a resume".to_string(),
            ));
        }
        if setup.job_description.trim().is_empty() {
            return Err(AppError::Configuration(
                "Please paste the job description".to_string(),
            ));
        }
        if setup.categories.is_empty() {
            return Err(AppError::Configuration(
                "Select at least one focus area".to_string(),
            ));
        }
        if !(MIN_QUESTIONS..=MAX_QUESTIONS).contains(&setup.total_questions) {
            return Err(AppError::Configuration(format!(
                "Number of questions must be between {MIN_QUESTIONS} and {MAX_QUESTIONS}, got {}",
                setup.total_questions
            )));
        }

        let resume_text = extractor.extract(&setup.resume);

        let mut session = Session {
            id: Uuid::new_v4(),
            phase: Phase::Setup,
            total_questions: setup.total_questions,
            difficulty: setup.difficulty,
            categories: setup.categories,
            job_description: setup.job_description,
            resume_text,
            used_questions: Vec::new(),
            pending: None,
            score_card: Vec::new(),
            created_at: Utc::now(),
        };
        session.advance(Phase::Interviewing)?;

        info!(
            "Session {} started: {} {} questions over {:?}",
            session.id,
            session.total_questions,
            session.difficulty,
            session.categories.iter().map(Category::name).collect::<Vec<_>>()
        );
        Ok(session)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn total_questions(&self) -> usize {
        self.total_questions
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn used_questions(&self) -> &[String] {
        &self.used_questions
    }

    pub fn pending(&self) -> Option<&PendingQuestion> {
        self.pending.as_ref()
    }

    pub fn score_card(&self) -> &[RoundRecord] {
        &self.score_card
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Rounds completed so far, skipped ones included.
    pub fn round_count(&self) -> usize {
        self.score_card.len()
    }

    /// Categories rotate in selection order: round `i` uses `categories[i % len]`.
    pub fn category_for_round(&self, round: usize) -> &Category {
        &self.categories[round % self.categories.len()]
    }

    /// Category of the round in progress; `None` once the interview is over.
    pub fn current_category(&self) -> Option<&Category> {
        (self.phase == Phase::Interviewing).then(|| self.category_for_round(self.round_count()))
    }

    /// Returns the pending question, generating one first if needed.
    ///
    /// Repeated calls return the same question without another gateway call.
    /// Gateway failures fall back to the static question bank.
    pub async fn next_question(
        &mut self,
        gateway: &dyn ModelGateway,
    ) -> Result<PendingQuestion, AppError> {
        self.require_interviewing()?;

        if let Some(pending) = &self.pending {
            return Ok(pending.clone());
        }

        let round = self.round_count();
        let category = self.category_for_round(round).clone();
        let prompt = build_question_prompt(
            &self.used_questions,
            &self.job_description,
            &self.resume_text,
            &category,
            self.difficulty,
        );

        let text = match gateway.generate(&prompt).await {
            Ok(raw) => match extract_question(&raw) {
                Some(question) => question,
                None => {
                    warn!("Session {}: model returned an empty question, using fallback", self.id);
                    fallback_question(&category, &self.used_questions)
                }
            },
            Err(e) => {
                warn!("Session {}: question generation failed, using fallback: {e}", self.id);
                fallback_question(&category, &self.used_questions)
            }
        };

        self.used_questions.push(text.clone());
        let pending = PendingQuestion {
            number: round + 1,
            category,
            text,
            asked_at: Utc::now(),
        };
        self.pending = Some(pending.clone());

        Ok(pending)
    }

    /// Records the pending question as skipped with zero scores.
    pub fn skip(&mut self) -> Result<RoundRecord, AppError> {
        self.require_interviewing()?;
        let pending = self.take_pending()?;

        let record = RoundRecord {
            category: pending.category,
            question: pending.text,
            answer: None,
            feedback: SKIPPED_FEEDBACK.to_string(),
            elapsed_secs: elapsed_secs(pending.asked_at),
            scores: ScoreTriple::default(),
        };

        self.complete_round(record)
    }

    /// Evaluates an answer to the pending question and records the round.
    ///
    /// A blank answer is rejected and leaves the session untouched.
    pub async fn submit(
        &mut self,
        answer: &str,
        gateway: &dyn ModelGateway,
    ) -> Result<RoundRecord, AppError> {
        self.require_interviewing()?;
        let pending = self
            .pending
            .as_ref()
            .ok_or_else(|| AppError::Conflict("No question is awaiting an answer".to_string()))?;
        if answer.trim().is_empty() {
            return Err(AppError::Validation(
                "Please provide an answer before submitting".to_string(),
            ));
        }

        let elapsed = elapsed_secs(pending.asked_at);
        let raw = evaluate_answer(
            gateway,
            &pending.text,
            answer,
            &self.job_description,
            &self.resume_text,
            &pending.category,
        )
        .await;

        let pending = self.take_pending()?;
        let record = RoundRecord {
            category: pending.category,
            question: pending.text,
            answer: Some(answer.to_string()),
            feedback: extract_feedback_body(&raw),
            elapsed_secs: elapsed,
            scores: parse_scores(&raw),
        };

        self.complete_round(record)
    }

    pub fn summarize(&self) -> Summary {
        summarize(&self.score_card)
    }

    pub fn export(&self) -> ExportDocument<'_> {
        export_document(&self.score_card)
    }

    fn complete_round(&mut self, record: RoundRecord) -> Result<RoundRecord, AppError> {
        self.score_card.push(record.clone());

        let next = if self.round_count() >= self.total_questions {
            Phase::Results
        } else {
            Phase::Interviewing
        };
        self.advance(next)?;

        info!(
            "Session {}: round {}/{} recorded ({})",
            self.id,
            self.round_count(),
            self.total_questions,
            if record.is_skipped() { "skipped" } else { "answered" }
        );
        Ok(record)
    }

    fn advance(&mut self, next: Phase) -> Result<(), AppError> {
        if !self.phase.can_advance_to(next) {
            return Err(AppError::Conflict(format!(
                "Cannot move interview from {:?} to {:?}",
                self.phase, next
            )));
        }
        if self.phase != next {
            info!("Session {}: {:?} -> {:?}", self.id, self.phase, next);
        }
        self.phase = next;
        Ok(())
    }

    fn require_interviewing(&self) -> Result<(), AppError> {
        match self.phase {
            Phase::Interviewing => Ok(()),
            Phase::Setup => Err(AppError::Conflict("Interview has not started".to_string())),
            Phase::Results => Err(AppError::Conflict("Interview is already complete".to_string())),
        }
    }

    fn take_pending(&mut self) -> Result<PendingQuestion, AppError> {
        self.pending
            .take()
            .ok_or_else(|| AppError::Conflict("No question is awaiting an answer".to_string()))
    }
}

fn elapsed_secs(since: DateTime<Utc>) -> f64 {
    let millis = (Utc::now() - since).num_milliseconds().max(0);
    round1(millis as f64 / 1000.0)
}
