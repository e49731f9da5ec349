use dioxus::prelude::*;
use dioxus_router::{Link, Outlet, Routable};

use crate::views::{
    AnswerKeyView, AttemptDetailsView, AttemptView, HistoryView, MockDetailsView, MockListView,
    ResultsView,
};

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Layout)]
        #[route("/", MockListView)] Mocks {},
        #[route("/mock/:mock_id", MockDetailsView)] MockDetails { mock_id: String },
        #[route("/mock/:mock_id/answers", AnswerKeyView)] AnswerKey { mock_id: String },
        #[route("/test/:attempt_id", AttemptView)] Test { attempt_id: String },
        #[route("/results/:attempt_id", ResultsView)] Results { attempt_id: String },
        #[route("/attempts", HistoryView)] History {},
        #[route("/attempts/:attempt_id", AttemptDetailsView)] AttemptDetails { attempt_id: String },
}

#[component]
fn Layout() -> Element {
    rsx! {
        div { class: "app",
            Sidebar {}
            main { class: "content",
                Outlet::<Route> {}
            }
        }
    }
}

#[component]
fn Sidebar() -> Element {
    rsx! {
        nav { class: "sidebar",
            h1 { "Mock Tests" }
            ul {
                li { Link { to: Route::Mocks {}, "Mocks" } }
                li { Link { to: Route::History {}, "My attempts" } }
            }
        }
    }
}
