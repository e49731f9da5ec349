use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{AttemptId, MockId, OptionId, QuestionId, SectionId};

/// A selectable answer option.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerOption {
    pub id: OptionId,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub sort_order: i32,
    /// Only populated by answer-key responses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_correct: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: QuestionId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub marks: f64,
    pub negative_mark: f64,
    pub sort_order: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section_id: Option<SectionId>,
    pub options: Vec<AnswerOption>,
}

impl Question {
    #[must_use]
    pub fn has_option(&self, option_id: &OptionId) -> bool {
        self.options.iter().any(|option| &option.id == option_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub id: SectionId,
    pub name: String,
    pub sort_order: i32,
    pub questions: Vec<Question>,
}

/// Payload returned when an attempt is started.
///
/// This is the point-in-time copy of the paper that is persisted with the
/// local snapshot; it is never re-fetched while the attempt is open.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartedAttempt {
    pub attempt_id: AttemptId,
    pub mock_id: MockId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "duration")]
    pub duration_minutes: u32,
    pub started_at: DateTime<Utc>,
    pub sections: Vec<Section>,
}

/// A question together with its position in the flattened paper.
#[derive(Debug, Clone, Copy)]
pub struct QuestionRef<'a> {
    pub index: usize,
    pub section: &'a Section,
    pub question: &'a Question,
}

impl StartedAttempt {
    /// Total allotted time in seconds.
    #[must_use]
    pub fn duration_secs(&self) -> u64 {
        u64::from(self.duration_minutes) * 60
    }

    /// Questions in paper order (sections first, then questions within them).
    pub fn questions(&self) -> impl Iterator<Item = QuestionRef<'_>> + '_ {
        self.sections
            .iter()
            .flat_map(|section| section.questions.iter().map(move |question| (section, question)))
            .enumerate()
            .map(|(index, (section, question))| QuestionRef {
                index,
                section,
                question,
            })
    }

    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.sections.iter().map(|section| section.questions.len()).sum()
    }

    #[must_use]
    pub fn question_at(&self, index: usize) -> Option<QuestionRef<'_>> {
        self.questions().nth(index)
    }

    #[must_use]
    pub fn find_question(&self, question_id: &QuestionId) -> Option<QuestionRef<'_>> {
        self.questions().find(|item| &item.question.id == question_id)
    }
}
