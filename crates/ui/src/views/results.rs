use dioxus::prelude::*;
use dioxus_router::Link;

use exam_core::model::AttemptId;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::components::SectionResultCard;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::ResultVm;

/// Score of the submission just made. Older attempts are shown through the
/// attempt details page instead.
#[component]
pub fn ResultsView(attempt_id: String) -> Element {
    let ctx = use_context::<AppContext>();
    let attempts = ctx.attempts();

    let resource = {
        let attempt_id = attempt_id.clone();
        use_resource(move || {
            let attempts = attempts.clone();
            let attempt_id = AttemptId::new(attempt_id.clone());
            async move {
                let controller = attempts.lock().await;
                let result = controller
                    .last_result()
                    .filter(|result| result.attempt_id == attempt_id)
                    .map(ResultVm::from);
                result.ok_or(ViewError::NotFound)
            }
        })
    };

    let state = view_state_from_resource(resource);

    rsx! {
        div { class: "page",
            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Ready(result) => rsx! {
                    h2 { "{result.title}" }
                    p { class: "status", "{result.status_label} on {result.submitted_label}" }
                    if result.auto_submitted {
                        p { class: "notice", "Time ran out, so your test was submitted automatically." }
                    }
                    div { class: "card summary",
                        dl {
                            dt { "Score" }
                            dd { "{result.marks_label}" }
                            dt { "Percentage" }
                            dd { class: result.tone.class(), "{result.percentage_label}" }
                            dt { "Time taken" }
                            dd { "{result.time_taken_label}" }
                        }
                        p { class: "counts",
                            "Total: {result.total} | Answered: {result.answered} | Correct: {result.correct} | Incorrect: {result.incorrect} | Unanswered: {result.unanswered}"
                        }
                    }
                    if !result.sections.is_empty() {
                        h3 { "Section-wise results" }
                        div { class: "section-grid",
                            for section in result.sections.clone() {
                                SectionResultCard { section }
                            }
                        }
                    }
                    div { class: "actions",
                        Link { class: "btn", to: Route::AttemptDetails { attempt_id: result.attempt_id.clone() }, "Review answers" }
                        Link { class: "btn", to: Route::History {}, "My attempts" }
                        Link { class: "btn primary", to: Route::Mocks {}, "Back to mocks" }
                    }
                },
                ViewState::Error(err) => rsx! {
                    p { "{err.message()}" }
                    p { "Results are shown right after a submission. Past attempts are listed under My attempts." }
                    Link { class: "btn", to: Route::AttemptDetails { attempt_id: attempt_id.clone() }, "View this attempt" }
                },
            }
        }
    }
}
