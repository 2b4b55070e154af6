//! Aggregate statistics over a completed score card.

use serde::{Deserialize, Serialize};

use crate::interview::models::RoundRecord;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DimensionAverages {
    pub knowledge: f64,
    pub communication: f64,
    pub specificity: f64,
}

/// One point of the per-question performance series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoundPoint {
    pub label: String,
    pub knowledge: u8,
    pub communication: u8,
    pub average: f64,
    pub elapsed_secs: f64,
    pub skipped: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    /// Mean of the three dimension averages, one decimal place.
    pub overall_score: f64,
    pub answered_questions: usize,
    pub total_questions: usize,
    pub averages: DimensionAverages,
    pub average_response_secs: f64,
    pub recommendation: String,
    pub rounds: Vec<RoundPoint>,
}

/// Skipped rounds count towards `total_questions` only.
pub fn summarize(score_card: &[RoundRecord]) -> Summary {
    let answered: Vec<&RoundRecord> = score_card.iter().filter(|r| !r.is_skipped()).collect();

    let (averages, average_response_secs) = if answered.is_empty() {
        (DimensionAverages::default(), 0.0)
    } else {
        (
            DimensionAverages {
                knowledge: mean_of(&answered, |r| r.scores.knowledge as f64),
                communication: mean_of(&answered, |r| r.scores.communication as f64),
                specificity: mean_of(&answered, |r| r.scores.specificity as f64),
            },
            mean_of(&answered, |r| r.elapsed_secs),
        )
    };

    let overall_score = round1(
        (averages.knowledge + averages.communication + averages.specificity) / 3.0,
    );

    let rounds = score_card
        .iter()
        .enumerate()
        .map(|(i, r)| RoundPoint {
            label: format!("Q{}", i + 1),
            knowledge: r.scores.knowledge,
            communication: r.scores.communication,
            average: round1(r.scores.mean()),
            elapsed_secs: r.elapsed_secs,
            skipped: r.is_skipped(),
        })
        .collect();

    Summary {
        overall_score,
        answered_questions: answered.len(),
        total_questions: score_card.len(),
        averages,
        average_response_secs,
        recommendation: recommendation(overall_score).to_string(),
        rounds,
    }
}

pub fn recommendation(overall_score: f64) -> &'static str {
    if overall_score >= 8.0 {
        "Excellent performance! You demonstrated strong knowledge, communication skills, and provided specific examples."
    } else if overall_score >= 6.0 {
        "Good performance. Consider adding more specific examples and details to your answers."
    } else if overall_score >= 4.0 {
        "Average performance. Focus on providing more structured answers with concrete examples from your experience."
    } else {
        "Needs improvement. Practice structuring your answers with clear explanations and relevant examples."
    }
}

/// Downloadable results document.
#[derive(Debug, Clone, Serialize)]
pub struct ExportDocument<'a> {
    pub overall_score: f64,
    pub detailed_feedback: &'a [RoundRecord],
    pub averages: ExportAverages,
}

/// Export keeps the historical `clarity` key for the specificity dimension.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ExportAverages {
    pub knowledge: f64,
    pub communication: f64,
    pub clarity: f64,
}

pub fn export_document(score_card: &[RoundRecord]) -> ExportDocument<'_> {
    let summary = summarize(score_card);
    ExportDocument {
        overall_score: summary.overall_score,
        detailed_feedback: score_card,
        averages: ExportAverages {
            knowledge: summary.averages.knowledge,
            communication: summary.averages.communication,
            clarity: summary.averages.specificity,
        },
    }
}

fn mean_of(records: &[&RoundRecord], value: impl Fn(&RoundRecord) -> f64) -> f64 {
    records.iter().map(|r| value(*r)).sum::<f64>() / records.len() as f64
}

pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interview::models::{Category, ScoreTriple};

    fn answered(k: u8, c: u8, s: u8, secs: f64) -> RoundRecord {
        RoundRecord {
            category: Category::Technical,
            question: "Q".to_string(),
            answer: Some("A".to_string()),
            feedback: "ok".to_string(),
            elapsed_secs: secs,
            scores: ScoreTriple::new(k, c, s),
        }
    }

    fn skipped(secs: f64) -> RoundRecord {
        RoundRecord {
            category: Category::Behavioral,
            question: "Q".to_string(),
            answer: None,
            feedback: "Question was skipped.".to_string(),
            elapsed_secs: secs,
            scores: ScoreTriple::default(),
        }
    }

    #[test]
    fn test_empty_score_card_is_all_zero() {
        let summary = summarize(&[]);
        assert_eq!(summary.overall_score, 0.0);
        assert_eq!(summary.averages, DimensionAverages::default());
        assert_eq!(summary.average_response_secs, 0.0);
        assert_eq!(summary.total_questions, 0);
    }

    #[test]
    fn test_all_skipped_is_all_zero_but_counted() {
        let summary = summarize(&[skipped(3.0), skipped(4.0)]);
        assert_eq!(summary.overall_score, 0.0);
        assert_eq!(summary.answered_questions, 0);
        assert_eq!(summary.total_questions, 2);
        assert_eq!(summary.average_response_secs, 0.0);
    }

    #[test]
    fn test_skipped_rounds_excluded_from_averages() {
        let card = vec![answered(8, 6, 4, 30.0), skipped(2.0), answered(6, 8, 8, 50.0)];
        let summary = summarize(&card);

        assert_eq!(summary.answered_questions, 2);
        assert_eq!(summary.total_questions, 3);
        assert_eq!(summary.averages.knowledge, 7.0);
        assert_eq!(summary.averages.communication, 7.0);
        assert_eq!(summary.averages.specificity, 6.0);
        assert_eq!(summary.average_response_secs, 40.0);
        // (7 + 7 + 6) / 3 = 6.666…
        assert_eq!(summary.overall_score, 6.7);
        assert!(summary.recommendation.starts_with("Good performance"));
    }

    #[test]
    fn test_round_series_labels_every_round() {
        let summary = summarize(&[answered(9, 9, 9, 1.0), skipped(1.0)]);
        let labels: Vec<&str> = summary.rounds.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, vec!["Q1", "Q2"]);
        assert!(summary.rounds[1].skipped);
        assert_eq!(summary.rounds[0].average, 9.0);
    }

    #[test]
    fn test_recommendation_thresholds() {
        assert!(recommendation(8.0).starts_with("Excellent"));
        assert!(recommendation(6.0).starts_with("Good"));
        assert!(recommendation(4.0).starts_with("Average"));
        assert!(recommendation(3.9).starts_with("Needs improvement"));
    }

    #[test]
    fn test_export_uses_clarity_key() {
        let card = vec![answered(10, 8, 6, 12.0)];
        let value = serde_json::to_value(export_document(&card)).unwrap();
        assert_eq!(value["overall_score"], 8.0);
        assert_eq!(value["averages"]["clarity"], 6.0);
        assert_eq!(value["detailed_feedback"].as_array().unwrap().len(), 1);
        assert_eq!(value["detailed_feedback"][0]["scores"]["specificity"], 6);
    }
}
