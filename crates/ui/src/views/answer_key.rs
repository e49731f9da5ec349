use dioxus::prelude::*;
use dioxus_router::Link;

use exam_core::model::MockId;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::components::{ErrorPanel, ReviewSections};
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::map_answer_key;

#[component]
pub fn AnswerKeyView(mock_id: String) -> Element {
    let ctx = use_context::<AppContext>();
    let catalog = ctx.catalog();
    let config = ctx.config();

    let mut resource = {
        let mock_id = mock_id.clone();
        use_resource(move || {
            let catalog = catalog.clone();
            let config = config.clone();
            let mock_id = MockId::new(mock_id.clone());
            async move {
                let key = catalog.answer_key(&mock_id).await.map_err(ViewError::from)?;
                Ok::<_, ViewError>(map_answer_key(&key, &config))
            }
        })
    };

    let state = view_state_from_resource(resource);

    rsx! {
        div { class: "page",
            Link { class: "back", to: Route::MockDetails { mock_id: mock_id.clone() }, "Back to mock" }

            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Ready(key) => rsx! {
                    h2 { "Answer key: {key.title}" }
                    p { class: "muted", "{key.duration_label}" }
                    ReviewSections { sections: key.sections.clone() }
                },
                ViewState::Error(err) => rsx! {
                    ErrorPanel { error: err, on_retry: move |()| resource.restart() }
                },
            }
        }
    }
}
