use exam_core::model::{AnswerOption, AnswerSheet, OptionId, QuestionId, StartedAttempt};
use services::ClientConfig;

use crate::vm::time_fmt::{format_countdown, is_low_time};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavStatus {
    Current,
    Answered,
    Unanswered,
}

impl NavStatus {
    #[must_use]
    pub fn class(self) -> &'static str {
        match self {
            NavStatus::Current => "nav-cell current",
            NavStatus::Answered => "nav-cell answered",
            NavStatus::Unanswered => "nav-cell",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NavCellVm {
    pub index: usize,
    pub number: usize,
    pub status: NavStatus,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NavSectionVm {
    pub id: String,
    pub name: String,
    pub cells: Vec<NavCellVm>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptionVm {
    pub id: OptionId,
    pub label: String,
    pub text: Option<String>,
    pub image_url: Option<String>,
    pub selected: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuestionVm {
    pub id: QuestionId,
    pub number: usize,
    pub section_name: String,
    pub text: Option<String>,
    pub image_url: Option<String>,
    pub marks_label: String,
    pub options: Vec<OptionVm>,
}

/// Everything the attempt screen renders for one frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttemptScreenVm {
    pub title: String,
    pub countdown: String,
    pub low_time: bool,
    pub current: usize,
    pub total: usize,
    pub answered: usize,
    pub has_previous: bool,
    pub has_next: bool,
    pub question: Option<QuestionVm>,
    pub nav: Vec<NavSectionVm>,
}

impl AttemptScreenVm {
    #[must_use]
    pub fn timer_class(&self) -> &'static str {
        if self.low_time { "timer low" } else { "timer" }
    }
}

/// Keep a question index inside the paper.
#[must_use]
pub fn clamp_index(index: usize, total: usize) -> usize {
    index.min(total.saturating_sub(1))
}

#[must_use]
pub fn marks_label(marks: f64, negative_mark: f64) -> String {
    if negative_mark > 0.0 {
        format!("+{marks} / -{negative_mark}")
    } else {
        format!("+{marks}")
    }
}

pub(crate) fn resolve_image(config: &ClientConfig, path: Option<&String>) -> Option<String> {
    path.filter(|path| !path.trim().is_empty())
        .map(|path| config.resolve_image_url(path))
}

fn option_vm(config: &ClientConfig, option: &AnswerOption, selected: bool) -> OptionVm {
    OptionVm {
        id: option.id.clone(),
        label: option.label.clone(),
        text: option.text.clone(),
        image_url: resolve_image(config, option.image_url.as_ref()),
        selected,
    }
}

#[must_use]
pub fn build_attempt_screen(
    attempt: &StartedAttempt,
    answers: &AnswerSheet,
    remaining_seconds: u64,
    current: usize,
    config: &ClientConfig,
) -> AttemptScreenVm {
    let total = attempt.total_questions();
    let current = clamp_index(current, total);

    let question = attempt.question_at(current).map(|item| {
        let selected = answers.selected(&item.question.id);
        let mut options: Vec<&AnswerOption> = item.question.options.iter().collect();
        options.sort_by_key(|option| option.sort_order);
        QuestionVm {
            id: item.question.id.clone(),
            number: item.index + 1,
            section_name: item.section.name.clone(),
            text: item.question.text.clone(),
            image_url: resolve_image(config, item.question.image_url.as_ref()),
            marks_label: marks_label(item.question.marks, item.question.negative_mark),
            options: options
                .into_iter()
                .map(|option| option_vm(config, option, selected == Some(&option.id)))
                .collect(),
        }
    });

    let mut nav: Vec<NavSectionVm> = Vec::with_capacity(attempt.sections.len());
    for item in attempt.questions() {
        let status = if item.index == current {
            NavStatus::Current
        } else if answers.is_answered(&item.question.id) {
            NavStatus::Answered
        } else {
            NavStatus::Unanswered
        };
        let cell = NavCellVm {
            index: item.index,
            number: item.index + 1,
            status,
        };
        match nav.last_mut() {
            Some(section) if section.id == item.section.id.as_str() => section.cells.push(cell),
            _ => nav.push(NavSectionVm {
                id: item.section.id.to_string(),
                name: item.section.name.clone(),
                cells: vec![cell],
            }),
        }
    }

    AttemptScreenVm {
        title: attempt.title.clone(),
        countdown: format_countdown(remaining_seconds),
        low_time: is_low_time(remaining_seconds),
        current,
        total,
        answered: answers.answered_count(),
        has_previous: current > 0,
        has_next: current + 1 < total,
        question,
        nav,
    }
}
