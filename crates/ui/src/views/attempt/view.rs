use dioxus::prelude::*;
use dioxus_router::{Link, use_navigator};

use exam_core::model::{AttemptId, OptionId, QuestionId};

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::components::ErrorPanel;
use crate::views::{ViewState, view_state_from_resource};
use crate::vm::{NavSectionVm, OptionVm, QuestionVm, build_attempt_screen};

use super::actions::{attach, confirm_submit, request_submit, select_option, suspend};
use super::state::use_attempt_state;

#[component]
pub fn AttemptView(attempt_id: String) -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let attempts = ctx.attempts();
    let config = ctx.config();
    let state = use_attempt_state();

    {
        let attempts = attempts.clone();
        let state = state.clone();
        use_drop(move || suspend(attempts, &state));
    }

    let mut resource = {
        let attempts = attempts.clone();
        let state = state.clone();
        use_resource(move || {
            let attempts = attempts.clone();
            let state = state.clone();
            let attempt_id = AttemptId::new(attempt_id.clone());
            async move { attach(attempts, attempt_id, state, navigator).await }
        })
    };

    let on_answer = {
        let attempts = attempts.clone();
        let state = state.clone();
        use_callback(move |(question_id, option_id): (QuestionId, Option<OptionId>)| {
            select_option(attempts.clone(), state.clone(), question_id, option_id);
        })
    };
    let on_submit = {
        let state = state.clone();
        use_callback(move |()| request_submit(&state))
    };
    let on_confirm = {
        let state = state.clone();
        use_callback(move |()| confirm_submit(attempts.clone(), state.clone(), navigator))
    };

    let mut current = state.current;
    let mut confirm = state.confirm;
    let warning = state.warning;
    let notice = state.notice;
    let submitting = state.submitting;

    let load_state = view_state_from_resource(resource);
    let screen = state.session.read().as_ref().map(|session| {
        (
            build_attempt_screen(
                session.attempt(),
                session.answers(),
                session.remaining_seconds(),
                current(),
                &config,
            ),
            session.is_active(),
        )
    });

    rsx! {
        div { class: "page attempt",
            match load_state {
                ViewState::Idle | ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Error(err) => rsx! {
                    ErrorPanel { error: err, on_retry: move |()| resource.restart() }
                    Link { class: "back", to: Route::Mocks {}, "Back to mocks" }
                },
                ViewState::Ready(()) => rsx! {
                    match screen {
                        None => rsx! {
                            p { "Loading..." }
                        },
                        Some((vm, running)) => rsx! {
                            header { class: "attempt-header",
                                h2 { "{vm.title}" }
                                div { class: vm.timer_class(),
                                    span { class: "countdown", "{vm.countdown}" }
                                    if warning() && vm.low_time {
                                        span { class: "warning", "Time running out!" }
                                    }
                                }
                            }

                            if let Some(message) = notice() {
                                p { class: "notice error", "{message}" }
                            }
                            if !running {
                                p { class: "notice", "Time is up. Your answers can no longer be changed." }
                            }

                            div { class: "attempt-body",
                                div { class: "attempt-main",
                                    p { class: "progress", "Question {vm.current + 1} of {vm.total} · {vm.answered} answered" }
                                    if let Some(question) = vm.question.clone() {
                                        QuestionPanel {
                                            question,
                                            disabled: !running || submitting(),
                                            on_answer,
                                        }
                                    }
                                    div { class: "actions",
                                        button {
                                            class: "btn",
                                            disabled: !vm.has_previous,
                                            onclick: move |_| current.set(vm.current.saturating_sub(1)),
                                            "Previous"
                                        }
                                        button {
                                            class: "btn",
                                            disabled: !vm.has_next,
                                            onclick: move |_| current.set(vm.current + 1),
                                            "Next"
                                        }
                                        button {
                                            class: "btn danger",
                                            disabled: submitting(),
                                            onclick: move |_| on_submit.call(()),
                                            if submitting() { "Submitting..." } else { "Submit test" }
                                        }
                                    }
                                }
                                NavGrid { sections: vm.nav.clone(), on_jump: move |index| current.set(index) }
                            }
                        },
                    }
                },
            }

            if let Some(message) = confirm() {
                div { class: "modal-backdrop",
                    div { class: "modal",
                        h3 { "Submit test" }
                        for line in message.lines().filter(|line| !line.is_empty()).map(str::to_string) {
                            p { "{line}" }
                        }
                        div { class: "actions",
                            button { class: "btn", onclick: move |_| confirm.set(None), "Cancel" }
                            button { class: "btn danger", onclick: move |_| on_confirm.call(()), "Submit test" }
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn QuestionPanel(
    question: QuestionVm,
    disabled: bool,
    on_answer: EventHandler<(QuestionId, Option<OptionId>)>,
) -> Element {
    let question_id = question.id.clone();
    let clear_id = question.id.clone();
    let answered = question.options.iter().any(|option| option.selected);

    rsx! {
        article { class: "card question",
            header {
                span { class: "section-name", "{question.section_name}" }
                span { class: "question-number", "Question {question.number}" }
                span { class: "marks", "{question.marks_label}" }
            }
            if let Some(text) = question.text.clone() {
                p { class: "question-text", "{text}" }
            }
            if let Some(src) = question.image_url.clone() {
                img { class: "question-image", src: "{src}" }
            }
            div { class: "options",
                for option in question.options.clone() {
                    OptionButton {
                        question_id: question_id.clone(),
                        option,
                        disabled,
                        on_answer,
                    }
                }
            }
            if answered {
                button {
                    class: "btn link",
                    disabled,
                    onclick: move |_| on_answer.call((clear_id.clone(), None)),
                    "Clear response"
                }
            }
        }
    }
}

#[component]
fn OptionButton(
    question_id: QuestionId,
    option: OptionVm,
    disabled: bool,
    on_answer: EventHandler<(QuestionId, Option<OptionId>)>,
) -> Element {
    let option_id = option.id.clone();
    let class = if option.selected { "option selected" } else { "option" };
    rsx! {
        button {
            class,
            disabled,
            onclick: move |_| on_answer.call((question_id.clone(), Some(option_id.clone()))),
            span { class: "option-label", "{option.label}" }
            if let Some(text) = option.text.clone() {
                span { class: "option-text", "{text}" }
            }
            if let Some(src) = option.image_url.clone() {
                img { class: "option-image", src: "{src}" }
            }
        }
    }
}

#[component]
fn NavGrid(sections: Vec<NavSectionVm>, on_jump: EventHandler<usize>) -> Element {
    rsx! {
        aside { class: "nav-grid",
            h3 { "Questions" }
            for group in sections {
                div { class: "nav-section",
                    h4 { "{group.name}" }
                    div { class: "nav-cells",
                        for cell in group.cells {
                            button {
                                class: cell.status.class(),
                                onclick: move |_| on_jump.call(cell.index),
                                "{cell.number}"
                            }
                        }
                    }
                }
            }
        }
    }
}
