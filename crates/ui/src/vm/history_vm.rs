use exam_core::model::{AnswerKey, AnswerOption, AttemptDetails, AttemptSummary, QuestionReview};
use services::ClientConfig;

use crate::vm::attempt_vm::{marks_label, resolve_image};
use crate::vm::results_vm::{ScoreTone, SectionResultVm, format_marks, format_percentage};
use crate::vm::time_fmt::{format_datetime, format_span};

const NOT_AVAILABLE: &str = "N/A";

#[derive(Clone, Debug, PartialEq)]
pub struct SectionChipVm {
    pub name: String,
    pub percentage_label: String,
    pub tone: ScoreTone,
    pub ratio_label: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AttemptRowVm {
    pub attempt_id: String,
    pub title: String,
    pub status_label: &'static str,
    pub is_finished: bool,
    pub submitted_label: String,
    pub marks_label: String,
    pub percentage_label: String,
    pub tone: Option<ScoreTone>,
    pub correct: u32,
    pub incorrect: u32,
    pub unanswered: u32,
    pub sections: Vec<SectionChipVm>,
}

impl From<&AttemptSummary> for AttemptRowVm {
    fn from(attempt: &AttemptSummary) -> Self {
        Self {
            attempt_id: attempt.attempt_id.to_string(),
            title: attempt.mock_title.clone(),
            status_label: attempt.status.label(),
            is_finished: attempt.status.is_finished(),
            submitted_label: attempt
                .submitted_at
                .map_or_else(|| NOT_AVAILABLE.to_string(), format_datetime),
            marks_label: format_marks(attempt.obtained_marks, attempt.total_marks),
            percentage_label: attempt
                .percentage
                .map_or_else(|| NOT_AVAILABLE.to_string(), format_percentage),
            tone: attempt.percentage.map(ScoreTone::for_percentage),
            correct: attempt.correct_answers,
            incorrect: attempt.incorrect_answers,
            unanswered: attempt.unanswered_questions,
            sections: attempt
                .sections
                .iter()
                .map(|section| SectionChipVm {
                    name: section.section_name.clone(),
                    percentage_label: format!("{:.1}%", section.percentage),
                    tone: ScoreTone::for_percentage(section.percentage),
                    ratio_label: format!("{}/{}", section.correct_answers, section.total_questions),
                })
                .collect(),
        }
    }
}

#[must_use]
pub fn map_attempt_rows(attempts: &[AttemptSummary]) -> Vec<AttemptRowVm> {
    attempts.iter().map(AttemptRowVm::from).collect()
}

/// How a reviewed question turned out for the user.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReviewOutcome {
    Correct,
    Incorrect,
    Unanswered,
}

impl ReviewOutcome {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            ReviewOutcome::Correct => "Correct",
            ReviewOutcome::Incorrect => "Incorrect",
            ReviewOutcome::Unanswered => "Not answered",
        }
    }

    #[must_use]
    pub fn class(self) -> &'static str {
        match self {
            ReviewOutcome::Correct => "outcome correct",
            ReviewOutcome::Incorrect => "outcome incorrect",
            ReviewOutcome::Unanswered => "outcome unanswered",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReviewOptionVm {
    pub label: String,
    pub text: Option<String>,
    pub image_url: Option<String>,
    pub is_correct: bool,
    pub is_selected: bool,
}

impl ReviewOptionVm {
    #[must_use]
    pub fn class(&self) -> &'static str {
        if self.is_correct {
            "option correct"
        } else if self.is_selected {
            "option wrong"
        } else {
            "option"
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReviewQuestionVm {
    pub number: usize,
    pub text: Option<String>,
    pub image_url: Option<String>,
    pub marks_label: String,
    /// `None` on the answer key, where nobody answered.
    pub outcome: Option<ReviewOutcome>,
    pub options: Vec<ReviewOptionVm>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReviewSectionVm {
    pub name: String,
    pub questions: Vec<ReviewQuestionVm>,
}

fn sorted_options(options: &[AnswerOption]) -> Vec<&AnswerOption> {
    let mut sorted: Vec<&AnswerOption> = options.iter().collect();
    sorted.sort_by_key(|option| option.sort_order);
    sorted
}

fn review_question(
    config: &ClientConfig,
    number: usize,
    question: &QuestionReview,
) -> ReviewQuestionVm {
    let outcome = if !question.was_answered() {
        ReviewOutcome::Unanswered
    } else if question.is_correct {
        ReviewOutcome::Correct
    } else {
        ReviewOutcome::Incorrect
    };
    ReviewQuestionVm {
        number,
        text: question.text.clone(),
        image_url: resolve_image(config, question.image_url.as_ref()),
        marks_label: marks_label(question.marks, question.negative_mark),
        outcome: Some(outcome),
        options: sorted_options(&question.options)
            .into_iter()
            .map(|option| ReviewOptionVm {
                label: option.label.clone(),
                text: option.text.clone(),
                image_url: resolve_image(config, option.image_url.as_ref()),
                is_correct: question.correct_option_id.as_ref() == Some(&option.id)
                    || option.is_correct == Some(true),
                is_selected: question.user_selected_option_id.as_ref() == Some(&option.id),
            })
            .collect(),
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct AttemptDetailsVm {
    pub title: String,
    pub status_label: &'static str,
    pub started_label: String,
    pub submitted_label: String,
    pub time_taken_label: String,
    pub marks_label: String,
    pub percentage_label: String,
    pub correct: u32,
    pub incorrect: u32,
    pub unanswered: u32,
    pub section_results: Vec<SectionResultVm>,
    pub sections: Vec<ReviewSectionVm>,
}

#[must_use]
pub fn map_attempt_details(details: &AttemptDetails, config: &ClientConfig) -> AttemptDetailsVm {
    let mut number = 0;
    let sections = details
        .sections
        .iter()
        .map(|section| ReviewSectionVm {
            name: section.name.clone(),
            questions: section
                .questions
                .iter()
                .map(|question| {
                    number += 1;
                    review_question(config, number, question)
                })
                .collect(),
        })
        .collect();

    AttemptDetailsVm {
        title: details.title.clone(),
        status_label: details.status.label(),
        started_label: format_datetime(details.started_at),
        submitted_label: details
            .submitted_at
            .map_or_else(|| NOT_AVAILABLE.to_string(), format_datetime),
        time_taken_label: details
            .time_taken
            .map_or_else(|| NOT_AVAILABLE.to_string(), format_span),
        marks_label: format_marks(details.obtained_marks, details.total_marks),
        percentage_label: details
            .percentage
            .map_or_else(|| NOT_AVAILABLE.to_string(), format_percentage),
        correct: details.correct_answers,
        incorrect: details.incorrect_answers,
        unanswered: details.unanswered_questions,
        section_results: details.section_results.iter().map(SectionResultVm::from).collect(),
        sections,
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnswerKeyVm {
    pub title: String,
    pub duration_label: String,
    pub sections: Vec<ReviewSectionVm>,
}

#[must_use]
pub fn map_answer_key(key: &AnswerKey, config: &ClientConfig) -> AnswerKeyVm {
    let mut number = 0;
    let sections = key
        .sections
        .iter()
        .map(|section| ReviewSectionVm {
            name: section.name.clone(),
            questions: section
                .questions
                .iter()
                .map(|question| {
                    number += 1;
                    ReviewQuestionVm {
                        number,
                        text: question.text.clone(),
                        image_url: resolve_image(config, question.image_url.as_ref()),
                        marks_label: marks_label(question.marks, question.negative_mark),
                        outcome: None,
                        options: sorted_options(&question.options)
                            .into_iter()
                            .map(|option| ReviewOptionVm {
                                label: option.label.clone(),
                                text: option.text.clone(),
                                image_url: resolve_image(config, option.image_url.as_ref()),
                                is_correct: option.is_correct == Some(true),
                                is_selected: false,
                            })
                            .collect(),
                    }
                })
                .collect(),
        })
        .collect();

    AnswerKeyVm {
        title: key.title.clone(),
        duration_label: format!("{} minutes", key.duration_minutes),
        sections,
    }
}
