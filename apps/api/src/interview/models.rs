use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Setup,
    Interviewing,
    Results,
}

impl Phase {
    /// Whether the transition table permits moving from `self` to `next`.
    pub fn can_advance_to(self, next: Phase) -> bool {
        matches!(
            (self, next),
            (Phase::Setup, Phase::Interviewing)
                | (Phase::Interviewing, Phase::Interviewing)
                | (Phase::Interviewing, Phase::Results)
        )
    }
}

/// Ordered difficulty levels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
    Expert,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
            Difficulty::Expert => "Expert",
        };
        f.write_str(label)
    }
}

impl FromStr for Difficulty {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            "expert" => Ok(Difficulty::Expert),
            other => Err(AppError::Configuration(format!(
                "Unknown difficulty '{other}'. Expected Easy, Medium, Hard or Expert"
            ))),
        }
    }
}

/// Question theme. Names outside the built-in set are kept as `Custom`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    Technical,
    Behavioral,
    Personal,
    Custom(String),
}

impl Category {
    pub fn name(&self) -> &str {
        match self {
            Category::Technical => "Technical",
            Category::Behavioral => "Behavioral",
            Category::Personal => "Personal",
            Category::Custom(name) => name,
        }
    }

    pub fn defaults() -> Vec<Category> {
        vec![Category::Technical, Category::Behavioral]
    }
}

impl From<&str> for Category {
    fn from(value: &str) -> Self {
        let trimmed = value.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "technical" => Category::Technical,
            "behavioral" | "behavioural" => Category::Behavioral,
            "personal" => Category::Personal,
            _ => Category::Custom(trimmed.to_string()),
        }
    }
}

impl From<String> for Category {
    fn from(value: String) -> Self {
        Category::from(value.as_str())
    }
}

impl From<Category> for String {
    fn from(value: Category) -> Self {
        value.name().to_string()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Rubric scores, each in `0..=10`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreTriple {
    pub knowledge: u8,
    pub communication: u8,
    pub specificity: u8,
}

impl ScoreTriple {
    pub fn new(knowledge: u8, communication: u8, specificity: u8) -> Self {
        Self {
            knowledge,
            communication,
            specificity,
        }
    }

    pub fn mean(&self) -> f64 {
        (self.knowledge as f64 + self.communication as f64 + self.specificity as f64) / 3.0
    }
}

/// One completed round. Never mutated after it is appended to the score card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundRecord {
    pub category: Category,
    pub question: String,
    /// `None` when the round was skipped.
    pub answer: Option<String>,
    pub feedback: String,
    pub elapsed_secs: f64,
    pub scores: ScoreTriple,
}

impl RoundRecord {
    pub fn is_skipped(&self) -> bool {
        self.answer.is_none()
    }
}

/// The question currently awaiting an answer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PendingQuestion {
    /// 1-based round number.
    pub number: usize,
    pub category: Category,
    pub text: String,
    pub asked_at: chrono::DateTime<chrono::Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_transitions_are_one_directional() {
        assert!(Phase::Setup.can_advance_to(Phase::Interviewing));
        assert!(Phase::Interviewing.can_advance_to(Phase::Interviewing));
        assert!(Phase::Interviewing.can_advance_to(Phase::Results));
        assert!(!Phase::Results.can_advance_to(Phase::Interviewing));
        assert!(!Phase::Results.can_advance_to(Phase::Setup));
        assert!(!Phase::Setup.can_advance_to(Phase::Results));
    }

    #[test]
    fn test_difficulty_parses_case_insensitively() {
        assert_eq!("expert".parse::<Difficulty>().unwrap(), Difficulty::Expert);
        assert_eq!(" Hard ".parse::<Difficulty>().unwrap(), Difficulty::Hard);
        assert!("impossible".parse::<Difficulty>().is_err());
        assert!(Difficulty::Easy < Difficulty::Expert);
    }

    #[test]
    fn test_category_serde_uses_plain_names() {
        let cats: Vec<Category> = serde_json::from_str(r#"["Technical", "Leadership"]"#).unwrap();
        assert_eq!(cats[0], Category::Technical);
        assert_eq!(cats[1], Category::Custom("Leadership".to_string()));
        assert_eq!(
            serde_json::to_string(&cats).unwrap(),
            r#"["Technical","Leadership"]"#
        );
    }

    #[test]
    fn test_score_mean() {
        assert!((ScoreTriple::new(9, 6, 3).mean() - 6.0).abs() < f64::EPSILON);
    }
}
