use dioxus::prelude::*;

use crate::views::ViewError;
use crate::vm::{ReviewSectionVm, SectionResultVm};

#[component]
pub fn ErrorPanel(error: ViewError, on_retry: EventHandler<()>) -> Element {
    rsx! {
        div { class: "error",
            p { "{error.message()}" }
            button { class: "btn", onclick: move |_| on_retry.call(()), "Retry" }
        }
    }
}

#[component]
pub fn SectionResultCard(section: SectionResultVm) -> Element {
    let width = format!("width: {:.0}%", section.bar_width);
    rsx! {
        div { class: "card section-result",
            h3 { "{section.name}" }
            dl {
                dt { "Score" }
                dd { "{section.marks_label}" }
                dt { "Percentage" }
                dd { class: section.tone.class(), "{section.percentage_label}" }
            }
            div { class: "bar",
                div { class: "bar-fill {section.tone.class()}", style: "{width}" }
            }
            p { class: "counts",
                "Total: {section.total} | Answered: {section.answered} | Correct: {section.correct} | Incorrect: {section.incorrect}"
            }
        }
    }
}

/// Questions with the correct option highlighted and, after an attempt, the
/// user's own choice.
#[component]
pub fn ReviewSections(sections: Vec<ReviewSectionVm>) -> Element {
    rsx! {
        for group in sections {
            section { class: "review-section",
                h3 { "{group.name}" }
                for question in group.questions {
                    article { class: "card review-question",
                        header {
                            span { class: "question-number", "Q{question.number}" }
                            span { class: "marks", "{question.marks_label}" }
                            if let Some(outcome) = question.outcome {
                                span { class: outcome.class(), "{outcome.label()}" }
                            }
                        }
                        if let Some(text) = question.text {
                            p { class: "question-text", "{text}" }
                        }
                        if let Some(src) = question.image_url {
                            img { class: "question-image", src: "{src}" }
                        }
                        ul { class: "review-options",
                            for option in question.options {
                                li { class: option.class(),
                                    span { class: "option-label", "{option.label}" }
                                    if let Some(text) = &option.text {
                                        span { "{text}" }
                                    }
                                    if let Some(src) = &option.image_url {
                                        img { class: "option-image", src: "{src}" }
                                    }
                                    if option.is_selected {
                                        span { class: "tag", "Your answer" }
                                    }
                                    if option.is_correct {
                                        span { class: "tag", "Correct answer" }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
