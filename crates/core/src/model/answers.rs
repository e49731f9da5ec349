use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::{AttemptId, OptionId, QuestionId, StartedAttempt};

/// Working answers for an attempt: question id to selected option, or `None`
/// when a selection was cleared. Questions never touched have no entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerSheet(BTreeMap<QuestionId, Option<OptionId>>);

impl AnswerSheet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a selection (or clear it with `None`).
    pub fn select(&mut self, question_id: QuestionId, option_id: Option<OptionId>) {
        self.0.insert(question_id, option_id);
    }

    #[must_use]
    pub fn selected(&self, question_id: &QuestionId) -> Option<&OptionId> {
        self.0.get(question_id).and_then(Option::as_ref)
    }

    #[must_use]
    pub fn is_answered(&self, question_id: &QuestionId) -> bool {
        self.selected(question_id).is_some()
    }

    /// Number of questions with a non-empty selection.
    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.0.values().filter(|value| value.is_some()).count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&QuestionId, Option<&OptionId>)> {
        self.0.iter().map(|(question, option)| (question, option.as_ref()))
    }

    /// One submission entry per question of the paper, in paper order.
    #[must_use]
    pub fn submissions_for(&self, attempt: &StartedAttempt) -> Vec<AnswerSubmission> {
        attempt
            .questions()
            .map(|item| AnswerSubmission {
                question_id: item.question.id.clone(),
                selected_option_id: self.selected(&item.question.id).cloned(),
            })
            .collect()
    }

    /// Questions of the paper without a selection.
    #[must_use]
    pub fn unanswered_in(&self, attempt: &StartedAttempt) -> usize {
        attempt
            .questions()
            .filter(|item| !self.is_answered(&item.question.id))
            .count()
    }
}

impl FromIterator<(QuestionId, Option<OptionId>)> for AnswerSheet {
    fn from_iter<T: IntoIterator<Item = (QuestionId, Option<OptionId>)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerSubmission {
    pub question_id: QuestionId,
    pub selected_option_id: Option<OptionId>,
}

/// Body of the submit-attempt call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitAttemptRequest {
    pub attempt_id: AttemptId,
    pub answers: Vec<AnswerSubmission>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_taken: Option<u64>,
}

/// Confirmation text shown before a manual submit.
#[must_use]
pub fn submit_prompt(unanswered: usize) -> String {
    const TAIL: &str = "Are you sure you want to submit your test? This action cannot be undone.";
    if unanswered > 0 {
        format!("You have {unanswered} unanswered question(s).\n\n{TAIL}")
    } else {
        TAIL.to_string()
    }
}
