use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{AnswerOption, AttemptId, MockId, OptionId, QuestionId, Section, SectionId};

/// Server-side status of an attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttemptStatus {
    InProgress,
    Submitted,
    AutoSubmitted,
}

impl AttemptStatus {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            AttemptStatus::InProgress => "In progress",
            AttemptStatus::Submitted => "Submitted",
            AttemptStatus::AutoSubmitted => "Auto-submitted",
        }
    }

    #[must_use]
    pub fn is_finished(self) -> bool {
        !matches!(self, AttemptStatus::InProgress)
    }
}

/// Per-section score breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionResult {
    pub section_id: SectionId,
    pub section_name: String,
    pub total_questions: u32,
    pub answered_questions: u32,
    pub correct_answers: u32,
    pub incorrect_answers: u32,
    pub unanswered_questions: u32,
    pub total_marks: f64,
    pub obtained_marks: f64,
    pub percentage: f64,
}

/// Scored result returned by the submit-attempt call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionResult {
    pub attempt_id: AttemptId,
    pub mock_id: MockId,
    pub title: String,
    pub status: AttemptStatus,
    pub score: f64,
    pub percentage: f64,
    pub total_marks: f64,
    pub obtained_marks: f64,
    pub time_taken: u64,
    pub submitted_at: DateTime<Utc>,
    pub total_questions: u32,
    pub answered_questions: u32,
    pub correct_answers: u32,
    pub incorrect_answers: u32,
    pub unanswered_questions: u32,
    #[serde(default, rename = "sectionWiseResults")]
    pub sections: Vec<SectionResult>,
}

/// One row of the user's attempt history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptSummary {
    #[serde(rename = "id")]
    pub attempt_id: AttemptId,
    pub mock_id: MockId,
    pub mock_title: String,
    pub started_at: DateTime<Utc>,
    #[serde(default)]
    pub submitted_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub percentage: Option<f64>,
    pub status: AttemptStatus,
    pub total_marks: f64,
    pub obtained_marks: f64,
    pub total_questions: u32,
    pub answered_questions: u32,
    pub correct_answers: u32,
    pub incorrect_answers: u32,
    pub unanswered_questions: u32,
    #[serde(default, rename = "sectionWiseResults")]
    pub sections: Vec<SectionResult>,
}

/// A question as reviewed after submission, with the user's and the correct choice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionReview {
    pub id: QuestionId,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    pub marks: f64,
    pub negative_mark: f64,
    pub sort_order: i32,
    #[serde(default)]
    pub section_id: Option<SectionId>,
    #[serde(default)]
    pub user_selected_option_id: Option<OptionId>,
    #[serde(default)]
    pub correct_option_id: Option<OptionId>,
    pub is_correct: bool,
    pub options: Vec<AnswerOption>,
}

impl QuestionReview {
    #[must_use]
    pub fn was_answered(&self) -> bool {
        self.user_selected_option_id.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionReview {
    pub id: SectionId,
    pub name: String,
    pub sort_order: i32,
    pub questions: Vec<QuestionReview>,
}

/// Full breakdown of a historical attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptDetails {
    pub attempt_id: AttemptId,
    pub mock_id: MockId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "duration")]
    pub duration_minutes: u32,
    pub started_at: DateTime<Utc>,
    #[serde(default)]
    pub submitted_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub time_taken: Option<u64>,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub percentage: Option<f64>,
    pub status: AttemptStatus,
    pub total_marks: f64,
    pub obtained_marks: f64,
    pub total_questions: u32,
    pub answered_questions: u32,
    pub correct_answers: u32,
    pub incorrect_answers: u32,
    pub unanswered_questions: u32,
    pub sections: Vec<SectionReview>,
    #[serde(default, rename = "sectionWiseResults")]
    pub section_results: Vec<SectionResult>,
}

/// Answer key for a mock: the paper with `is_correct` set on options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerKey {
    pub mock_id: MockId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "duration")]
    pub duration_minutes: u32,
    pub sections: Vec<Section>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_uses_screaming_snake_case() {
        let parsed: AttemptStatus = serde_json::from_str("\"AUTO_SUBMITTED\"").unwrap();
        assert_eq!(parsed, AttemptStatus::AutoSubmitted);
        assert!(parsed.is_finished());
        assert!(!AttemptStatus::InProgress.is_finished());
    }

    #[test]
    fn history_row_reads_id_and_nullable_scores() {
        let json = r#"{
            "id": "a1", "mockId": "m1", "mockTitle": "Mock",
            "startedAt": "2024-05-01T08:00:00Z", "submittedAt": null,
            "score": null, "percentage": null, "status": "IN_PROGRESS",
            "totalMarks": 40, "obtainedMarks": 0, "totalQuestions": 10,
            "answeredQuestions": 0, "correctAnswers": 0, "incorrectAnswers": 0,
            "unansweredQuestions": 10, "sectionWiseResults": []
        }"#;
        let row: AttemptSummary = serde_json::from_str(json).unwrap();
        assert_eq!(row.attempt_id, AttemptId::new("a1"));
        assert!(row.submitted_at.is_none());
        assert_eq!(row.status, AttemptStatus::InProgress);
    }
}
