use dioxus::prelude::*;
use dioxus_router::Link;

use exam_core::model::AttemptId;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::components::{ErrorPanel, ReviewSections, SectionResultCard};
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::map_attempt_details;

#[component]
pub fn AttemptDetailsView(attempt_id: String) -> Element {
    let ctx = use_context::<AppContext>();
    let history = ctx.history();
    let config = ctx.config();

    let mut resource = use_resource(move || {
        let history = history.clone();
        let config = config.clone();
        let attempt_id = AttemptId::new(attempt_id.clone());
        async move {
            let details = history
                .attempt_details(&attempt_id)
                .await
                .map_err(ViewError::from)?;
            Ok::<_, ViewError>(map_attempt_details(&details, &config))
        }
    });

    let state = view_state_from_resource(resource);

    rsx! {
        div { class: "page",
            Link { class: "back", to: Route::History {}, "Back to my attempts" }

            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Ready(details) => rsx! {
                    h2 { "{details.title}" }
                    p { class: "status", "{details.status_label}" }
                    div { class: "card summary",
                        dl {
                            dt { "Started" }
                            dd { "{details.started_label}" }
                            dt { "Submitted" }
                            dd { "{details.submitted_label}" }
                            dt { "Time taken" }
                            dd { "{details.time_taken_label}" }
                            dt { "Score" }
                            dd { "{details.marks_label}" }
                            dt { "Percentage" }
                            dd { "{details.percentage_label}" }
                        }
                        p { class: "counts",
                            "Correct: {details.correct} | Incorrect: {details.incorrect} | Unanswered: {details.unanswered}"
                        }
                    }
                    if !details.section_results.is_empty() {
                        div { class: "section-grid",
                            for section in details.section_results.clone() {
                                SectionResultCard { section }
                            }
                        }
                    }
                    ReviewSections { sections: details.sections.clone() }
                },
                ViewState::Error(err) => rsx! {
                    ErrorPanel { error: err, on_retry: move |()| resource.restart() }
                },
            }
        }
    }
}
