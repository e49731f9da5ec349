use std::sync::Arc;

use dioxus::dioxus_core::spawn_forever;
use dioxus::prelude::*;
use dioxus_router::Navigator;
use tokio::sync::Mutex;
use tokio::sync::mpsc::{self, UnboundedReceiver};

use exam_core::model::{AttemptId, OptionId, QuestionId, SubmissionResult, submit_prompt};
use services::attempt::{
    AttemptSession, CountdownStep, LOW_TIME_WARNING_SECS, PendingSubmit, RequestKind,
    RequestState,
};
use services::{ApiError, AttemptController, AttemptError, AttemptPhase, ExamApi};

use crate::routes::Route;
use crate::views::ViewError;

use super::state::AttemptViewState;

fn auto_submit_failed(err: &ApiError) -> String {
    format!("Time is up, but the automatic submission failed ({err}). Submit again to finish.")
}

fn results_route(attempt_id: &AttemptId) -> Route {
    Route::Results {
        attempt_id: attempt_id.to_string(),
    }
}

/// Send an admitted submission with the controller unlocked, then apply the
/// server's answer.
pub(crate) async fn send_submit(
    attempts: Arc<Mutex<AttemptController>>,
    pending: PendingSubmit,
) -> Result<SubmissionResult, AttemptError> {
    let api = attempts.lock().await.api();
    let result = api.submit_attempt(pending.request()).await;
    attempts.lock().await.complete_submit(pending, result).await
}

/// Bind the controller to `attempt_id`, resuming it from the local snapshot
/// when it is not already the running attempt, and start listening for ticks.
pub(super) async fn attach(
    attempts: Arc<Mutex<AttemptController>>,
    attempt_id: AttemptId,
    state: AttemptViewState,
    navigator: Navigator,
) -> Result<(), ViewError> {
    let mut warning = state.warning;
    let (sender, receiver) = mpsc::unbounded_channel();
    let mut controller = attempts.lock().await;

    if controller
        .last_result()
        .is_some_and(|result| result.attempt_id == attempt_id)
    {
        navigator.replace(results_route(&attempt_id));
        return Ok(());
    }

    let attached = controller.phase() == AttemptPhase::Active
        && controller
            .session()
            .is_some_and(|session| session.attempt_id() == &attempt_id);
    if attached {
        if controller
            .remaining_seconds()
            .is_some_and(|remaining| remaining <= LOW_TIME_WARNING_SECS)
        {
            warning.set(true);
        }
        if let Some(message) = controller.request().and_then(RequestState::error) {
            state.show_notice(format!("The last request failed: {message}"));
        }
    } else {
        // Another attempt left running keeps its snapshot.
        controller.suspend();
        let step = controller.restore_attempt(&attempt_id).await;
        match step {
            Ok(CountdownStep::TimeUp(pending)) => {
                drop(controller);
                match send_submit(Arc::clone(&attempts), pending).await {
                    Ok(_) => {
                        navigator.replace(results_route(&attempt_id));
                        return Ok(());
                    }
                    Err(AttemptError::Api(err)) => state.show_notice(auto_submit_failed(&err)),
                    Err(err) => return Err(ViewError::from(err)),
                }
                controller = attempts.lock().await;
            }
            Ok(CountdownStep::Running(countdown)) => {
                if countdown.warning {
                    warning.set(true);
                }
            }
            Ok(CountdownStep::Ignored) => {}
            Err(err) => return Err(ViewError::from(err)),
        }
    }

    controller.attach_ticks(sender);
    state.show_session(controller.session().cloned());
    drop(controller);

    spawn(run_ticks(attempts, receiver, state, navigator));
    Ok(())
}

async fn run_ticks(
    attempts: Arc<Mutex<AttemptController>>,
    mut receiver: UnboundedReceiver<u64>,
    state: AttemptViewState,
    navigator: Navigator,
) {
    let mut warning = state.warning;
    let mut submitting = state.submitting;
    while let Some(generation) = receiver.recv().await {
        let step = {
            let mut controller = attempts.lock().await;
            let step = controller.on_tick(generation);
            if !matches!(step, CountdownStep::Ignored) {
                state.show_session(controller.session().cloned());
            }
            step
        };
        match step {
            CountdownStep::Ignored => {}
            CountdownStep::Running(countdown) => {
                if countdown.warning {
                    warning.set(true);
                }
            }
            CountdownStep::TimeUp(pending) => {
                submitting.set(true);
                spawn_forever(finish_submit(
                    Arc::clone(&attempts),
                    pending,
                    state.clone(),
                    navigator,
                ));
            }
        }
    }
}

/// Send an admitted submission and apply the answer. Runs to completion even
/// if the view is left meanwhile, so the controller never stays busy.
async fn finish_submit(
    attempts: Arc<Mutex<AttemptController>>,
    pending: PendingSubmit,
    state: AttemptViewState,
    navigator: Navigator,
) {
    let kind = pending.kind();
    let attempt_id = pending.request().attempt_id.clone();
    let outcome = send_submit(Arc::clone(&attempts), pending).await;
    let session = attempts.lock().await.session().cloned();

    if !state.is_mounted() {
        return;
    }
    let mut submitting = state.submitting;
    submitting.set(false);
    match outcome {
        Ok(_) => {
            navigator.replace(results_route(&attempt_id));
        }
        Err(err) => {
            state.show_session(session);
            let message = match (kind, err) {
                (RequestKind::AutoSubmit, AttemptError::Api(err)) => auto_submit_failed(&err),
                (_, err) => format!("Submission failed ({err}). Your answers are saved; please try again."),
            };
            state.show_notice(message);
        }
    }
}

/// Open the confirmation dialog for a manual submit.
pub(super) fn request_submit(state: &AttemptViewState) {
    let unanswered = state
        .session
        .read()
        .as_ref()
        .map_or(0, AttemptSession::unanswered_count);
    let mut confirm = state.confirm;
    confirm.set(Some(submit_prompt(unanswered)));
}

pub(super) fn confirm_submit(
    attempts: Arc<Mutex<AttemptController>>,
    state: AttemptViewState,
    navigator: Navigator,
) {
    let mut confirm = state.confirm;
    let mut submitting = state.submitting;
    confirm.set(None);
    if submitting() {
        return;
    }
    submitting.set(true);

    spawn_forever(async move {
        let admitted = attempts.lock().await.begin_submit();
        match admitted {
            Ok(pending) => finish_submit(attempts, pending, state, navigator).await,
            Err(err) => {
                if state.is_mounted() {
                    submitting.set(false);
                    state.show_notice(err.to_string());
                }
            }
        }
    });
}

pub(super) fn select_option(
    attempts: Arc<Mutex<AttemptController>>,
    state: AttemptViewState,
    question_id: QuestionId,
    option_id: Option<OptionId>,
) {
    spawn(async move {
        let mut controller = attempts.lock().await;
        match controller.answer(question_id, option_id).await {
            Ok(()) => state.show_session(controller.session().cloned()),
            Err(err) => state.show_notice(err.to_string()),
        }
    });
}

/// Leaving the view suspends the attempt; its snapshot stays resumable.
pub(super) fn suspend(attempts: Arc<Mutex<AttemptController>>, state: &AttemptViewState) {
    state.unmount();
    if let Ok(mut controller) = attempts.try_lock() {
        controller.suspend();
        return;
    }
    spawn_forever(async move {
        attempts.lock().await.suspend();
    });
}
