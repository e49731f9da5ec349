use std::sync::Arc;

use tokio::sync::mpsc::UnboundedSender;

use exam_core::Clock;
use exam_core::model::{
    AnswerSheet, AttemptId, AttemptSnapshot, MockId, OptionId, QuestionId, StartedAttempt,
    SubmissionResult, submit_prompt,
};
use storage::LocalAttemptStore;

use super::resume::{self, ResumeChoice, ResumeDecision, StartOutcome};
use super::state::{
    AttemptPhase, AttemptSession, Countdown, CountdownOutcome, CountdownStep, PendingStart,
    PendingSubmit, RequestKind, RequestState,
};
use super::ticker::{TICK_INTERVAL, TickHandle};
use crate::api::ExamApi;
use crate::error::{ApiError, AttemptError};

/// Owns the in-memory state of a timed attempt and keeps the local snapshot
/// in step with it.
///
/// Network calls come in two flavours. The composed methods (`start_fresh`,
/// `submit`, `tick`, ...) call the injected `ExamApi` themselves. The
/// `begin_*` / `complete_*` pairs let a caller drop its lock on the
/// controller while the request is in flight; `begin_*` refuses with
/// `AttemptError::Busy` while another request is pending.
pub struct AttemptController {
    api: Arc<dyn ExamApi>,
    store: LocalAttemptStore,
    clock: Clock,
    phase: AttemptPhase,
    session: Option<AttemptSession>,
    last_result: Option<SubmissionResult>,
    request: Option<RequestState>,
    tick_sink: Option<UnboundedSender<u64>>,
    ticker: Option<TickHandle>,
    generation: u64,
}

impl AttemptController {
    /// The controller reads time from the store's clock.
    #[must_use]
    pub fn new(api: Arc<dyn ExamApi>, store: LocalAttemptStore) -> Self {
        let clock = store.clock().clone();
        Self {
            api,
            store,
            clock,
            phase: AttemptPhase::Idle,
            session: None,
            last_result: None,
            request: None,
            tick_sink: None,
            ticker: None,
            generation: 0,
        }
    }

    /// Route countdown ticks to `sink`. Each tick carries the generation it
    /// was spawned for; pass it back to `tick` / `on_tick`.
    ///
    /// Without a sink no tick task is spawned and the caller drives the
    /// countdown by hand.
    pub fn attach_ticks(&mut self, sink: UnboundedSender<u64>) {
        self.tick_sink = Some(sink);
        if self.countdown_running() {
            self.spawn_ticker();
        }
    }

    #[must_use]
    pub fn api(&self) -> Arc<dyn ExamApi> {
        Arc::clone(&self.api)
    }

    #[must_use]
    pub fn store(&self) -> &LocalAttemptStore {
        &self.store
    }

    #[must_use]
    pub fn phase(&self) -> AttemptPhase {
        self.phase
    }

    #[must_use]
    pub fn session(&self) -> Option<&AttemptSession> {
        self.session.as_ref()
    }

    #[must_use]
    pub fn last_result(&self) -> Option<&SubmissionResult> {
        self.last_result.as_ref()
    }

    #[must_use]
    pub fn request(&self) -> Option<&RequestState> {
        self.request.as_ref()
    }

    /// Generation of the current countdown; ticks from any other generation
    /// are ignored.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.request.as_ref().is_some_and(RequestState::is_pending)
    }

    #[must_use]
    pub fn is_ticking(&self) -> bool {
        self.ticker.as_ref().is_some_and(|ticker| !ticker.is_finished())
    }

    #[must_use]
    pub fn remaining_seconds(&self) -> Option<u64> {
        self.session.as_ref().map(AttemptSession::remaining_seconds)
    }

    /// Confirmation text for a manual submit of the current attempt.
    #[must_use]
    pub fn submit_prompt(&self) -> String {
        submit_prompt(
            self.session
                .as_ref()
                .map_or(0, AttemptSession::unanswered_count),
        )
    }

    //
    // ─── START / RESUME ─────────────────────────────────────────────────────────
    //

    /// What starting `mock_id` would do. Expired snapshots are discarded here.
    pub async fn resume_decision(&self, mock_id: &MockId) -> ResumeDecision {
        resume::decide(&self.store, mock_id).await
    }

    /// Start `mock_id`, unless a resumable snapshot exists, in which case the
    /// offer is returned and nothing else happens.
    ///
    /// # Errors
    ///
    /// Returns `AttemptError::Busy` or `AttemptError::AlreadyActive` if a start
    /// is not possible now, or `AttemptError::Api` if the server refuses.
    pub async fn start(&mut self, mock_id: &MockId) -> Result<StartOutcome, AttemptError> {
        self.ensure_can_begin()?;
        match self.resume_decision(mock_id).await {
            ResumeDecision::Offer(offer) => Ok(StartOutcome::ChooseResume(offer)),
            ResumeDecision::StartFresh => {
                let countdown = self.start_fresh(mock_id).await?;
                Ok(StartOutcome::Started(countdown))
            }
        }
    }

    /// Act on the user's answer to a resume offer.
    ///
    /// # Errors
    ///
    /// See `resume` and `start_fresh`.
    pub async fn choose(
        &mut self,
        mock_id: &MockId,
        choice: ResumeChoice,
    ) -> Result<CountdownOutcome, AttemptError> {
        match choice {
            ResumeChoice::Resume => self.resume(mock_id).await,
            ResumeChoice::StartNew => {
                self.ensure_can_begin()?;
                self.store.clear(mock_id).await;
                let countdown = self.start_fresh(mock_id).await?;
                Ok(CountdownOutcome::Running(countdown))
            }
        }
    }

    /// Open a new attempt on the server without looking for a saved one.
    ///
    /// # Errors
    ///
    /// Returns `AttemptError::Busy`, `AttemptError::AlreadyActive`, or
    /// `AttemptError::Api` when the server call fails; the phase stays `Idle`.
    pub async fn start_fresh(&mut self, mock_id: &MockId) -> Result<Countdown, AttemptError> {
        let pending = self.begin_start(mock_id)?;
        let result = self.api.start_attempt(pending.mock_id()).await;
        self.complete_start(pending, result).await
    }

    /// Admit a start request.
    ///
    /// # Errors
    ///
    /// Returns `AttemptError::Busy` while another request is pending and
    /// `AttemptError::AlreadyActive` during an attempt.
    pub fn begin_start(&mut self, mock_id: &MockId) -> Result<PendingStart, AttemptError> {
        self.ensure_can_begin()?;
        self.request = Some(RequestState::pending(RequestKind::Start));
        tracing::debug!(%mock_id, "starting attempt");
        Ok(PendingStart {
            mock_id: mock_id.clone(),
        })
    }

    /// Apply the server's answer to a start request.
    ///
    /// # Errors
    ///
    /// Returns `AttemptError::Api` if the request failed; the phase stays `Idle`.
    pub async fn complete_start(
        &mut self,
        pending: PendingStart,
        result: Result<StartedAttempt, ApiError>,
    ) -> Result<Countdown, AttemptError> {
        let attempt = match result {
            Ok(attempt) => attempt,
            Err(err) => {
                tracing::warn!(mock_id = %pending.mock_id, error = %err, "failed to start attempt");
                self.request = Some(RequestState::failed(RequestKind::Start, err.to_string()));
                return Err(err.into());
            }
        };

        let answers = AnswerSheet::new();
        let started_at = self.store.save(&attempt.mock_id, &attempt, &answers).await;
        tracing::info!(
            attempt_id = %attempt.attempt_id,
            mock_id = %attempt.mock_id,
            duration_minutes = attempt.duration_minutes,
            "attempt started"
        );

        self.request = Some(RequestState::fulfilled(RequestKind::Start));
        let session = AttemptSession::new(attempt, answers, started_at, self.clock.now());
        Ok(self.activate(session))
    }

    /// Resume the saved attempt for `mock_id`. A snapshot whose time has run
    /// out is auto-submitted straight away.
    ///
    /// # Errors
    ///
    /// Returns `AttemptError::NothingToResume` if there is no readable
    /// snapshot, and auto-submit failures as `AttemptError::Api`.
    pub async fn resume(&mut self, mock_id: &MockId) -> Result<CountdownOutcome, AttemptError> {
        let step = self.restore_saved(mock_id).await?;
        self.finish_restore(step).await
    }

    /// Resume by attempt id, scanning every saved mock.
    ///
    /// # Errors
    ///
    /// As for `resume`.
    pub async fn resume_attempt(
        &mut self,
        attempt_id: &AttemptId,
    ) -> Result<CountdownOutcome, AttemptError> {
        let step = self.restore_attempt(attempt_id).await?;
        self.finish_restore(step).await
    }

    /// Restore the saved attempt for `mock_id` without contacting the server.
    /// An expired snapshot comes back as `CountdownStep::TimeUp` with the
    /// auto-submission admitted; send it and hand the answer to
    /// `complete_submit`.
    ///
    /// # Errors
    ///
    /// Returns `AttemptError::NothingToResume` if there is no readable
    /// snapshot, or `Busy` / `AlreadyActive` as for `restore`.
    pub async fn restore_saved(&mut self, mock_id: &MockId) -> Result<CountdownStep, AttemptError> {
        self.ensure_can_begin()?;
        let snapshot = self
            .store
            .load(mock_id)
            .await
            .ok_or(AttemptError::NothingToResume)?;
        self.restore(snapshot)
    }

    /// Like `restore_saved`, looking the snapshot up by attempt id.
    ///
    /// # Errors
    ///
    /// As for `restore_saved`.
    pub async fn restore_attempt(
        &mut self,
        attempt_id: &AttemptId,
    ) -> Result<CountdownStep, AttemptError> {
        self.ensure_can_begin()?;
        let snapshot = self
            .store
            .load_by_attempt_id(attempt_id)
            .await
            .ok_or(AttemptError::NothingToResume)?;
        self.restore(snapshot)
    }

    /// Rebuild the session from `snapshot`.
    ///
    /// # Errors
    ///
    /// Returns `AttemptError::Busy` or `AttemptError::AlreadyActive`.
    pub fn restore(&mut self, snapshot: AttemptSnapshot) -> Result<CountdownStep, AttemptError> {
        self.ensure_can_begin()?;
        let (attempt, answers, started_at) = snapshot.into_parts();
        let session = AttemptSession::new(attempt, answers, started_at, self.clock.now());
        tracing::info!(
            attempt_id = %session.attempt_id(),
            remaining_seconds = session.remaining_seconds(),
            answered = session.answered_count(),
            "attempt resumed"
        );

        if session.remaining_seconds() == 0 {
            self.generation += 1;
            self.phase = AttemptPhase::Active;
            self.last_result = None;
            self.session = Some(session);
            return Ok(self.expire());
        }
        Ok(CountdownStep::Running(self.activate(session)))
    }

    async fn finish_restore(
        &mut self,
        step: CountdownStep,
    ) -> Result<CountdownOutcome, AttemptError> {
        match step {
            CountdownStep::TimeUp(pending) => self.send_auto_submit(pending).await,
            CountdownStep::Running(countdown) => Ok(CountdownOutcome::Running(countdown)),
            CountdownStep::Ignored => Ok(CountdownOutcome::Ignored),
        }
    }

    //
    // ─── ANSWERS ────────────────────────────────────────────────────────────────
    //

    /// Record the selection for a question (`None` clears it) and persist the
    /// answer sheet. The attempt's start time is never touched.
    ///
    /// # Errors
    ///
    /// Returns `AttemptError::NotActive` outside an attempt, `AttemptError::TimeUp`
    /// once the countdown has ended, `AttemptError::Busy` during a submit, or
    /// `UnknownQuestion` / `UnknownOption` for ids not in the paper.
    pub async fn answer(
        &mut self,
        question_id: QuestionId,
        option_id: Option<OptionId>,
    ) -> Result<(), AttemptError> {
        if self.phase != AttemptPhase::Active {
            return Err(AttemptError::NotActive);
        }
        if self.is_busy() {
            return Err(AttemptError::Busy);
        }
        let session = self.session.as_mut().ok_or(AttemptError::NotActive)?;
        if !session.is_active() {
            return Err(AttemptError::TimeUp);
        }

        let question = session
            .attempt()
            .find_question(&question_id)
            .ok_or_else(|| AttemptError::UnknownQuestion(question_id.clone()))?;
        if let Some(option) = &option_id {
            if !question.question.has_option(option) {
                return Err(AttemptError::UnknownOption {
                    question: question_id,
                    option: option.clone(),
                });
            }
        }

        session.select(question_id, option_id);
        let mock_id = session.mock_id().clone();
        let answers = session.answers().clone();
        self.store.update_answers(&mock_id, &answers).await;
        Ok(())
    }

    //
    // ─── COUNTDOWN ──────────────────────────────────────────────────────────────
    //

    /// Recompute the countdown for a tick of `generation`.
    ///
    /// Reaching zero stops the countdown and, unless a submit is already in
    /// flight, returns the auto-submission to send.
    pub fn on_tick(&mut self, generation: u64) -> CountdownStep {
        if generation != self.generation || self.phase != AttemptPhase::Active {
            return CountdownStep::Ignored;
        }
        let now = self.clock.now();
        let Some(session) = self.session.as_mut() else {
            return CountdownStep::Ignored;
        };
        if !session.is_active() {
            return CountdownStep::Ignored;
        }

        let remaining_seconds = session.refresh(now);
        if remaining_seconds == 0 {
            return self.expire();
        }
        let warning = session.take_warning();
        if warning {
            tracing::info!(remaining_seconds, "low time warning");
        }
        CountdownStep::Running(Countdown {
            remaining_seconds,
            warning,
        })
    }

    /// `on_tick`, sending the auto-submission when time runs out.
    ///
    /// # Errors
    ///
    /// Returns `AttemptError::Api` if the auto-submission fails. The phase
    /// stays `Active` with the countdown stopped; `submit` may still be used.
    pub async fn tick(&mut self, generation: u64) -> Result<CountdownOutcome, AttemptError> {
        match self.on_tick(generation) {
            CountdownStep::Ignored => Ok(CountdownOutcome::Ignored),
            CountdownStep::Running(countdown) => Ok(CountdownOutcome::Running(countdown)),
            CountdownStep::TimeUp(pending) => self.send_auto_submit(pending).await,
        }
    }

    fn expire(&mut self) -> CountdownStep {
        self.stop_ticker();
        let busy = self.is_busy();
        let Some(session) = self.session.as_mut() else {
            return CountdownStep::Ignored;
        };
        session.expire();
        tracing::info!(attempt_id = %session.attempt_id(), "time is up");
        if busy {
            return CountdownStep::Running(Countdown {
                remaining_seconds: 0,
                warning: false,
            });
        }

        let time_taken = session.attempt().duration_secs();
        let pending = PendingSubmit {
            mock_id: session.mock_id().clone(),
            kind: RequestKind::AutoSubmit,
            request: session.submission(time_taken),
        };
        self.request = Some(RequestState::pending(RequestKind::AutoSubmit));
        CountdownStep::TimeUp(pending)
    }

    async fn send_auto_submit(
        &mut self,
        pending: PendingSubmit,
    ) -> Result<CountdownOutcome, AttemptError> {
        let result = self.api.submit_attempt(pending.request()).await;
        let submitted = self.complete_submit(pending, result).await?;
        Ok(CountdownOutcome::AutoSubmitted(Box::new(submitted)))
    }

    //
    // ─── SUBMIT ─────────────────────────────────────────────────────────────────
    //

    /// Submit the current attempt with the time used so far.
    ///
    /// # Errors
    ///
    /// Returns `AttemptError::Api` if the server call fails; the phase stays
    /// `Active`, the answers stay saved and the call may be retried.
    pub async fn submit(&mut self) -> Result<SubmissionResult, AttemptError> {
        let pending = self.begin_submit()?;
        let result = self.api.submit_attempt(pending.request()).await;
        self.complete_submit(pending, result).await
    }

    /// Admit a manual submission, one entry per question in paper order.
    ///
    /// # Errors
    ///
    /// Returns `AttemptError::Busy` while another request is pending and
    /// `AttemptError::NotActive` outside an attempt.
    pub fn begin_submit(&mut self) -> Result<PendingSubmit, AttemptError> {
        if self.is_busy() {
            return Err(AttemptError::Busy);
        }
        if self.phase != AttemptPhase::Active {
            return Err(AttemptError::NotActive);
        }
        let now = self.clock.now();
        let session = self.session.as_mut().ok_or(AttemptError::NotActive)?;
        if session.is_active() {
            session.refresh(now);
        }

        let pending = PendingSubmit {
            mock_id: session.mock_id().clone(),
            kind: RequestKind::Submit,
            request: session.submission(session.time_taken_secs()),
        };
        self.request = Some(RequestState::pending(RequestKind::Submit));
        tracing::debug!(attempt_id = %pending.request.attempt_id, "submitting attempt");
        Ok(pending)
    }

    /// Apply the server's answer to a submission. On success the local
    /// snapshot is cleared even if the attempt view has been left meanwhile.
    ///
    /// # Errors
    ///
    /// Returns `AttemptError::Api` if the request failed.
    pub async fn complete_submit(
        &mut self,
        pending: PendingSubmit,
        result: Result<SubmissionResult, ApiError>,
    ) -> Result<SubmissionResult, AttemptError> {
        let submitted = match result {
            Ok(submitted) => submitted,
            Err(err) => {
                tracing::warn!(
                    attempt_id = %pending.request.attempt_id,
                    kind = ?pending.kind,
                    error = %err,
                    "failed to submit attempt"
                );
                self.request = Some(RequestState::failed(pending.kind, err.to_string()));
                return Err(err.into());
            }
        };

        self.store.clear(&pending.mock_id).await;
        let is_current = self
            .session
            .as_ref()
            .is_some_and(|session| session.attempt_id() == &pending.request.attempt_id);
        if is_current {
            self.stop_ticker();
            if let Some(session) = self.session.as_mut() {
                session.stop();
            }
            self.phase = AttemptPhase::Submitted;
        }

        tracing::info!(
            attempt_id = %submitted.attempt_id,
            kind = ?pending.kind,
            time_taken = submitted.time_taken,
            percentage = submitted.percentage,
            "attempt submitted"
        );
        self.request = Some(RequestState::fulfilled(pending.kind));
        self.last_result = Some(submitted.clone());
        Ok(submitted)
    }

    //
    // ─── LEAVING ────────────────────────────────────────────────────────────────
    //

    /// Drop all session state and the saved snapshot of the current attempt.
    pub async fn reset(&mut self) {
        self.stop_ticker();
        if let Some(session) = self.session.take() {
            self.store.clear(session.mock_id()).await;
            tracing::debug!(attempt_id = %session.attempt_id(), "attempt reset");
        }
        self.phase = AttemptPhase::Idle;
        self.last_result = None;
        if !self.is_busy() {
            self.request = None;
        }
    }

    /// Leave an active attempt without discarding its saved snapshot, so it
    /// can be resumed later. Does nothing in other phases.
    pub fn suspend(&mut self) {
        if self.phase != AttemptPhase::Active {
            return;
        }
        self.stop_ticker();
        if let Some(session) = self.session.take() {
            tracing::debug!(attempt_id = %session.attempt_id(), "attempt suspended");
        }
        self.phase = AttemptPhase::Idle;
    }

    /// Forget every saved attempt, as when the local profile is reset. A
    /// running attempt is dropped as well.
    pub async fn discard_all(&mut self) {
        self.stop_ticker();
        if let Some(session) = self.session.take() {
            tracing::debug!(attempt_id = %session.attempt_id(), "attempt discarded");
        }
        self.phase = AttemptPhase::Idle;
        self.last_result = None;
        if !self.is_busy() {
            self.request = None;
        }
        self.store.clear_all().await;
        tracing::info!("discarded all saved attempts");
    }

    //
    // ─── INTERNALS ──────────────────────────────────────────────────────────────
    //

    fn ensure_can_begin(&self) -> Result<(), AttemptError> {
        if self.is_busy() {
            return Err(AttemptError::Busy);
        }
        if self.phase == AttemptPhase::Active {
            return Err(AttemptError::AlreadyActive);
        }
        Ok(())
    }

    fn countdown_running(&self) -> bool {
        self.phase == AttemptPhase::Active
            && self.session.as_ref().is_some_and(AttemptSession::is_active)
    }

    fn activate(&mut self, mut session: AttemptSession) -> Countdown {
        let warning = session.take_warning();
        let countdown = Countdown {
            remaining_seconds: session.remaining_seconds(),
            warning,
        };
        self.generation += 1;
        self.phase = AttemptPhase::Active;
        self.last_result = None;
        self.session = Some(session);
        self.spawn_ticker();
        countdown
    }

    fn spawn_ticker(&mut self) {
        if let Some(sink) = &self.tick_sink {
            self.ticker = Some(TickHandle::spawn(
                self.generation,
                TICK_INTERVAL,
                sink.clone(),
            ));
        }
    }

    fn stop_ticker(&mut self) {
        self.ticker = None;
        self.generation += 1;
    }
}
