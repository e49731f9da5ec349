use dioxus::prelude::*;
use dioxus_router::Link;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::components::ErrorPanel;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{MockCardVm, map_mock_cards};

#[component]
pub fn MockListView() -> Element {
    let ctx = use_context::<AppContext>();
    let catalog = ctx.catalog();

    let mut resource = use_resource(move || {
        let catalog = catalog.clone();
        async move {
            let mocks = catalog.list_mocks().await.map_err(ViewError::from)?;
            Ok::<_, ViewError>(map_mock_cards(&mocks))
        }
    });

    let state = view_state_from_resource(resource);

    rsx! {
        div { class: "page",
            h2 { "Mock tests" }

            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Ready(cards) => rsx! {
                    if cards.is_empty() {
                        p { "No mock tests available yet." }
                    } else {
                        ul { class: "mock-grid",
                            for card in cards {
                                MockCard { key: "{card.id}", card }
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
fn MockCard(card: MockCardVm) -> Element {
    rsx! {
        li { class: "card mock-card",
            h3 { "{card.title}" }
            if !card.is_active {
                span { class: "badge muted", "Inactive" }
            }
            if let Some(description) = card.description.clone() {
                p { class: "description", "{description}" }
            }
            p { class: "meta", "{card.duration_label} · {card.sections_label}" }
            if !card.section_names.is_empty() {
                ul { class: "chips",
                    for name in card.section_names.iter() {
                        li { class: "chip", "{name}" }
                    }
                }
            }
            Link { class: "btn primary", to: Route::MockDetails { mock_id: card.id.clone() }, "View details" }
        }
    }
}
