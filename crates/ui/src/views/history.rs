use dioxus::prelude::*;
use dioxus_router::Link;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::components::ErrorPanel;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{AttemptRowVm, map_attempt_rows};

#[component]
pub fn HistoryView() -> Element {
    let ctx = use_context::<AppContext>();
    let history = ctx.history();

    let mut resource = use_resource(move || {
        let history = history.clone();
        async move {
            let attempts = history.list_attempts().await.map_err(ViewError::from)?;
            Ok::<_, ViewError>(map_attempt_rows(&attempts))
        }
    });

    let state = view_state_from_resource(resource);

    rsx! {
        div { class: "page",
            h2 { "My attempts" }

            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Ready(rows) => rsx! {
                    if rows.is_empty() {
                        p { "No attempts yet." }
                        Link { class: "btn primary", to: Route::Mocks {}, "Browse mock tests" }
                    } else {
                        ul { class: "attempt-list",
                            for row in rows {
                                AttemptRow { key: "{row.attempt_id}", row }
                            }
                        }
                    }
                },
                ViewState::Error(err) => rsx! {
                    ErrorPanel { error: err, on_retry: move |()| resource.restart() }
                },
            }
        }
    }
}

#[component]
fn AttemptRow(row: AttemptRowVm) -> Element {
    let tone = row.tone.map_or("", |tone| tone.class());
    rsx! {
        li { class: "card attempt-row",
            header {
                h3 { "{row.title}" }
                span { class: "badge", "{row.status_label}" }
            }
            p { class: "muted", "Submitted on {row.submitted_label}" }
            p {
                "Score: {row.marks_label} | "
                span { class: tone, "{row.percentage_label}" }
                " | Correct: {row.correct} | Incorrect: {row.incorrect} | Unanswered: {row.unanswered}"
            }
            if !row.sections.is_empty() {
                ul { class: "chips",
                    for chip in row.sections.iter() {
                        li { class: "chip {chip.tone.class()}", "{chip.name}: {chip.percentage_label} ({chip.ratio_label})" }
                    }
                }
            }
            if row.is_finished {
                Link { class: "btn", to: Route::AttemptDetails { attempt_id: row.attempt_id.clone() }, "View details" }
            }
        }
    }
}
