use std::sync::Arc;

use dioxus::prelude::*;
use dioxus_router::{Link, use_navigator};
use tokio::sync::Mutex;

use exam_core::model::{AttemptId, MockId};
use services::attempt::CountdownStep;
use services::{
    AttemptController, AttemptError, ExamApi, ResumeChoice, ResumeDecision, ResumeOffer,
};

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::attempt::send_submit;
use crate::views::components::ErrorPanel;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{MockCardVm, ResumePromptVm};

#[derive(Clone, Debug, PartialEq)]
struct DetailsData {
    card: MockCardVm,
    saved: Option<ResumePromptVm>,
}

enum Opened {
    Offer(ResumeOffer),
    Active(AttemptId),
    Submitted(AttemptId),
}

#[component]
pub fn MockDetailsView(mock_id: String) -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let catalog = ctx.catalog();
    let attempts = ctx.attempts();

    let prompt = use_signal(|| None::<ResumeOffer>);
    let busy = use_signal(|| false);
    let action_error = use_signal(|| None::<String>);

    let mut resource = {
        let attempts = attempts.clone();
        let mock_id = mock_id.clone();
        use_resource(move || {
            let catalog = catalog.clone();
            let attempts = attempts.clone();
            let mock_id = MockId::new(mock_id.clone());
            async move {
                let mock = catalog
                    .find_mock(&mock_id)
                    .await
                    .map_err(ViewError::from)?
                    .ok_or(ViewError::NotFound)?;
                let decision = attempts.lock().await.resume_decision(&mock_id).await;
                let saved = match decision {
                    ResumeDecision::Offer(offer) => Some(ResumePromptVm::from(&offer)),
                    ResumeDecision::StartFresh => None,
                };
                Ok::<_, ViewError>(DetailsData {
                    card: MockCardVm::from(&mock),
                    saved,
                })
            }
        })
    };

    let open = {
        let mock_id = mock_id.clone();
        use_callback(move |choice: Option<ResumeChoice>| {
            let mut busy = busy;
            let mut prompt = prompt;
            let mut action_error = action_error;
            if busy() {
                return;
            }
            busy.set(true);
            prompt.set(None);
            action_error.set(None);

            let attempts = attempts.clone();
            let mock_id = MockId::new(mock_id.clone());
            spawn(async move {
                match open_attempt(attempts, mock_id, choice).await {
                    Ok(Opened::Offer(offer)) => prompt.set(Some(offer)),
                    Ok(Opened::Active(attempt_id)) => {
                        navigator.push(Route::Test {
                            attempt_id: attempt_id.to_string(),
                        });
                    }
                    Ok(Opened::Submitted(attempt_id)) => {
                        navigator.push(Route::Results {
                            attempt_id: attempt_id.to_string(),
                        });
                    }
                    Err(err) => action_error.set(Some(err.to_string())),
                }
                busy.set(false);
            });
        })
    };

    let state = view_state_from_resource(resource);

    rsx! {
        div { class: "page",
            Link { class: "back", to: Route::Mocks {}, "Back to mocks" }

            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Ready(data) => rsx! {
                    h2 { "{data.card.title}" }
                    if let Some(description) = data.card.description.clone() {
                        p { class: "description", "{description}" }
                    }
                    dl { class: "facts",
                        dt { "Duration" }
                        dd { "{data.card.duration_label}" }
                        dt { "Sections" }
                        dd { "{data.card.sections_label}" }
                    }
                    if !data.card.section_names.is_empty() {
                        ul { class: "chips",
                            for name in data.card.section_names.iter() {
                                li { class: "chip", "{name}" }
                            }
                        }
                    }
                    if let Some(saved) = data.saved.clone() {
                        p { class: "notice",
                            "You have an unfinished attempt ({saved.progress_label}) with {saved.remaining_label} left."
                        }
                    }
                    div { class: "actions",
                        button {
                            class: "btn primary",
                            disabled: busy(),
                            onclick: move |_| open.call(None),
                            if busy() { "Starting..." } else { "Start test" }
                        }
                        Link { class: "btn", to: Route::AnswerKey { mock_id: data.card.id.clone() }, "View answers" }
                    }
                    if let Some(message) = action_error() {
                        p { class: "error", "{message}" }
                    }
                },
                ViewState::Error(err) => rsx! {
                    ErrorPanel { error: err, on_retry: move |()| resource.restart() }
                },
            }

            if let Some(offer) = prompt() {
                ResumePrompt {
                    prompt: ResumePromptVm::from(&offer),
                    on_resume: move |()| open.call(Some(ResumeChoice::Resume)),
                    on_start_new: move |()| open.call(Some(ResumeChoice::StartNew)),
                }
            }
        }
    }
}

#[component]
fn ResumePrompt(
    prompt: ResumePromptVm,
    on_resume: EventHandler<()>,
    on_start_new: EventHandler<()>,
) -> Element {
    rsx! {
        div { class: "modal-backdrop",
            div { class: "modal",
                h3 { "Resume previous test?" }
                p {
                    "You have an incomplete attempt of {prompt.title} with "
                    strong { "{prompt.remaining_label}" }
                    " remaining ({prompt.progress_label})."
                }
                p { class: "muted", "Starting a new test will clear your previous attempt." }
                div { class: "actions",
                    button { class: "btn", onclick: move |_| on_start_new.call(()), "Start new test" }
                    button { class: "btn primary", onclick: move |_| on_resume.call(()), "Resume test" }
                }
            }
        }
    }
}

/// Start or resume `mock_id` without holding the controller lock across the
/// start request.
async fn open_attempt(
    attempts: Arc<Mutex<AttemptController>>,
    mock_id: MockId,
    choice: Option<ResumeChoice>,
) -> Result<Opened, AttemptError> {
    if choice == Some(ResumeChoice::Resume) {
        let pending = {
            let mut controller = attempts.lock().await;
            match controller.restore_saved(&mock_id).await? {
                CountdownStep::TimeUp(pending) => pending,
                CountdownStep::Running(_) | CountdownStep::Ignored => {
                    return current_attempt(&controller);
                }
            }
        };
        // Expired while away: submit it now, and if that fails open the
        // attempt so it can be submitted by hand.
        return match send_submit(Arc::clone(&attempts), pending).await {
            Ok(result) => Ok(Opened::Submitted(result.attempt_id)),
            Err(AttemptError::Api(err)) => {
                tracing::warn!(%mock_id, error = %err, "auto-submission on resume failed");
                current_attempt(&*attempts.lock().await)
            }
            Err(err) => Err(err),
        };
    }

    let (pending, api) = {
        let mut controller = attempts.lock().await;
        if choice.is_none() {
            if let ResumeDecision::Offer(offer) = controller.resume_decision(&mock_id).await {
                return Ok(Opened::Offer(offer));
            }
        }
        let pending = controller.begin_start(&mock_id)?;
        if choice == Some(ResumeChoice::StartNew) {
            controller.store().clear(&mock_id).await;
        }
        (pending, controller.api())
    };

    let result = api.start_attempt(pending.mock_id()).await;
    let mut controller = attempts.lock().await;
    controller.complete_start(pending, result).await?;
    current_attempt(&controller)
}

fn current_attempt(controller: &AttemptController) -> Result<Opened, AttemptError> {
    controller
        .session()
        .map(|session| Opened::Active(session.attempt_id().clone()))
        .ok_or(AttemptError::NotActive)
}
