use exam_core::model::{AttemptStatus, SectionResult, SubmissionResult};

use crate::vm::time_fmt::{format_datetime, format_span};

/// Colour band for a percentage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScoreTone {
    Good,
    Fair,
    Poor,
}

impl ScoreTone {
    #[must_use]
    pub fn for_percentage(percentage: f64) -> Self {
        if percentage >= 70.0 {
            ScoreTone::Good
        } else if percentage >= 50.0 {
            ScoreTone::Fair
        } else {
            ScoreTone::Poor
        }
    }

    #[must_use]
    pub fn class(self) -> &'static str {
        match self {
            ScoreTone::Good => "tone-good",
            ScoreTone::Fair => "tone-fair",
            ScoreTone::Poor => "tone-poor",
        }
    }
}

#[must_use]
pub fn format_marks(obtained: f64, total: f64) -> String {
    format!("{obtained:.2} / {total}")
}

#[must_use]
pub fn format_percentage(percentage: f64) -> String {
    format!("{percentage:.2}%")
}

#[derive(Clone, Debug, PartialEq)]
pub struct SectionResultVm {
    pub name: String,
    pub marks_label: String,
    pub percentage_label: String,
    pub tone: ScoreTone,
    /// Progress bar width, clamped to 0..=100.
    pub bar_width: f64,
    pub total: u32,
    pub answered: u32,
    pub correct: u32,
    pub incorrect: u32,
}

impl From<&SectionResult> for SectionResultVm {
    fn from(section: &SectionResult) -> Self {
        Self {
            name: section.section_name.clone(),
            marks_label: format_marks(section.obtained_marks, section.total_marks),
            percentage_label: format_percentage(section.percentage),
            tone: ScoreTone::for_percentage(section.percentage),
            bar_width: section.percentage.clamp(0.0, 100.0),
            total: section.total_questions,
            answered: section.answered_questions,
            correct: section.correct_answers,
            incorrect: section.incorrect_answers,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ResultVm {
    pub attempt_id: String,
    pub mock_id: String,
    pub title: String,
    pub status_label: &'static str,
    pub auto_submitted: bool,
    pub marks_label: String,
    pub percentage_label: String,
    pub tone: ScoreTone,
    pub time_taken_label: String,
    pub submitted_label: String,
    pub total: u32,
    pub answered: u32,
    pub correct: u32,
    pub incorrect: u32,
    pub unanswered: u32,
    pub sections: Vec<SectionResultVm>,
}

impl From<&SubmissionResult> for ResultVm {
    fn from(result: &SubmissionResult) -> Self {
        Self {
            attempt_id: result.attempt_id.to_string(),
            mock_id: result.mock_id.to_string(),
            title: result.title.clone(),
            status_label: result.status.label(),
            auto_submitted: result.status == AttemptStatus::AutoSubmitted,
            marks_label: format_marks(result.obtained_marks, result.total_marks),
            percentage_label: format_percentage(result.percentage),
            tone: ScoreTone::for_percentage(result.percentage),
            time_taken_label: format_span(result.time_taken),
            submitted_label: format_datetime(result.submitted_at),
            total: result.total_questions,
            answered: result.answered_questions,
            correct: result.correct_answers,
            incorrect: result.incorrect_answers,
            unanswered: result.unanswered_questions,
            sections: result.sections.iter().map(SectionResultVm::from).collect(),
        }
    }
}
