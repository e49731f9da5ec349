mod common;

use std::time::Duration as StdDuration;

use chrono::Duration;
use tokio::sync::mpsc;

use common::Harness;
use exam_core::model::{AnswerSheet, AttemptId, MockId, OptionId, QuestionId};
use services::attempt::{CountdownStep, RequestKind, RequestStatus};
use services::{
    ApiError, AttemptError, AttemptPhase, Countdown, CountdownOutcome, ExamApi, ResumeChoice,
    ResumeDecision, StartOutcome,
};

fn mock() -> MockId {
    MockId::new("mock-1")
}

fn running(remaining_seconds: u64, warning: bool) -> Countdown {
    Countdown {
        remaining_seconds,
        warning,
    }
}

async fn pick(h: &mut Harness, question: &str, option: &str) {
    h.controller
        .answer(QuestionId::new(question), Some(OptionId::new(option)))
        .await
        .unwrap();
}

#[tokio::test]
async fn thirty_minute_attempt_counts_down_and_auto_submits() {
    let mut h = Harness::new(30);

    let outcome = h.controller.start(&mock()).await.unwrap();
    assert_eq!(outcome, StartOutcome::Started(running(1800, false)));
    assert_eq!(h.controller.phase(), AttemptPhase::Active);
    pick(&mut h, "q1", "o2").await;

    let generation = h.controller.generation();
    h.clock.advance(Duration::minutes(29));
    let outcome = h.controller.tick(generation).await.unwrap();
    assert_eq!(outcome, CountdownOutcome::Running(running(60, true)));

    h.clock.advance(Duration::seconds(61));
    let outcome = h.controller.tick(generation).await.unwrap();
    let CountdownOutcome::AutoSubmitted(result) = outcome else {
        panic!("expected auto-submit, got {outcome:?}");
    };
    assert_eq!(result.time_taken, 1800);
    assert_eq!(h.controller.phase(), AttemptPhase::Submitted);
    assert_eq!(h.controller.last_result(), Some(result.as_ref()));
    assert!(h.store.load(&mock()).await.is_none());

    let sent = h.api.submissions();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].time_taken, Some(1800));
    let answers: Vec<_> = sent[0]
        .answers
        .iter()
        .map(|a| (a.question_id.as_str(), a.selected_option_id.as_ref().map(OptionId::as_str)))
        .collect();
    assert_eq!(
        answers,
        vec![("q1", Some("o2")), ("q2", None), ("q3", None)]
    );
}

#[tokio::test]
async fn reload_resumes_by_attempt_id_with_answers() {
    let mut h = Harness::new(30);
    h.controller.start(&mock()).await.unwrap();
    pick(&mut h, "q1", "o1").await;
    pick(&mut h, "q3", "o6").await;
    h.clock.advance(Duration::minutes(10));

    let mut reloaded = h.reloaded();
    let outcome = reloaded
        .resume_attempt(&AttemptId::new("att-1"))
        .await
        .unwrap();
    assert_eq!(outcome, CountdownOutcome::Running(running(1200, false)));

    let session = reloaded.session().expect("session restored");
    let mut expected = AnswerSheet::new();
    expected.select(QuestionId::new("q1"), Some(OptionId::new("o1")));
    expected.select(QuestionId::new("q3"), Some(OptionId::new("o6")));
    assert_eq!(session.answers(), &expected);
    assert_eq!(h.api.start_calls(), 1);
}

#[tokio::test]
async fn answering_never_moves_the_start_time() {
    let mut h = Harness::new(30);
    h.controller.start(&mock()).await.unwrap();
    let started = h.store.load(&mock()).await.unwrap().start_time();

    h.clock.advance(Duration::minutes(3));
    pick(&mut h, "q2", "o3").await;
    h.controller
        .answer(QuestionId::new("q2"), None)
        .await
        .unwrap();

    let snapshot = h.store.load(&mock()).await.unwrap();
    assert_eq!(snapshot.start_time(), started);
    assert_eq!(snapshot.answers().answered_count(), 0);
    assert_eq!(h.store.remaining_seconds(&mock()).await, Some(1620));
}

#[tokio::test]
async fn expired_snapshot_skips_the_choice_and_is_replaced() {
    let mut h = Harness::new(30);
    h.controller.start(&mock()).await.unwrap();
    pick(&mut h, "q1", "o1").await;
    h.controller.suspend();
    assert!(h.store.load(&mock()).await.is_some());

    h.clock.advance(Duration::minutes(31));
    let outcome = h.controller.start(&mock()).await.unwrap();
    assert_eq!(outcome, StartOutcome::Started(running(1800, false)));

    let snapshot = h.store.load(&mock()).await.unwrap();
    assert_eq!(snapshot.attempt_id(), &AttemptId::new("att-2"));
    assert_eq!(snapshot.start_time(), h.clock.now());
    assert!(snapshot.answers().is_empty());
}

#[tokio::test]
async fn decision_discards_expired_snapshot() {
    let h = Harness::new(30);
    let mut first = h.reloaded();
    first.start(&mock()).await.unwrap();
    first.suspend();

    h.clock.advance(Duration::minutes(30));
    assert_eq!(
        h.controller.resume_decision(&mock()).await,
        ResumeDecision::StartFresh
    );
    assert!(h.kv.is_empty());
}

#[tokio::test]
async fn valid_snapshot_offers_a_choice_and_resume_restores_it() {
    let mut h = Harness::new(30);
    h.controller.start(&mock()).await.unwrap();
    pick(&mut h, "q2", "o4").await;
    h.controller.suspend();
    assert_eq!(h.controller.phase(), AttemptPhase::Idle);

    h.clock.advance(Duration::minutes(1));
    let StartOutcome::ChooseResume(offer) = h.controller.start(&mock()).await.unwrap() else {
        panic!("expected a resume offer");
    };
    assert_eq!(offer.attempt_id, AttemptId::new("att-1"));
    assert_eq!(offer.remaining_seconds, 1740);
    assert_eq!(offer.answered, 1);
    assert_eq!(offer.total_questions, 3);
    assert_eq!(h.controller.phase(), AttemptPhase::Idle);

    let outcome = h
        .controller
        .choose(&mock(), ResumeChoice::Resume)
        .await
        .unwrap();
    assert_eq!(outcome, CountdownOutcome::Running(running(1740, false)));
    let session = h.controller.session().unwrap();
    assert_eq!(
        session.answers().selected(&QuestionId::new("q2")),
        Some(&OptionId::new("o4"))
    );
    assert_eq!(h.api.start_calls(), 1);
}

#[tokio::test]
async fn start_new_clears_the_old_snapshot_first() {
    let mut h = Harness::new(30);
    h.controller.start(&mock()).await.unwrap();
    pick(&mut h, "q1", "o2").await;
    h.controller.suspend();
    h.clock.advance(Duration::minutes(5));

    let outcome = h
        .controller
        .choose(&mock(), ResumeChoice::StartNew)
        .await
        .unwrap();
    assert_eq!(outcome, CountdownOutcome::Running(running(1800, false)));

    let snapshot = h.store.load(&mock()).await.unwrap();
    assert_eq!(snapshot.attempt_id(), &AttemptId::new("att-2"));
    assert_eq!(snapshot.start_time(), h.clock.now());
    assert!(snapshot.answers().is_empty());
}

#[tokio::test]
async fn start_new_that_fails_leaves_nothing_to_resume() {
    let mut h = Harness::new(30);
    h.controller.start(&mock()).await.unwrap();
    h.controller.suspend();

    h.api.fail_next_start();
    let err = h
        .controller
        .choose(&mock(), ResumeChoice::StartNew)
        .await
        .unwrap_err();
    assert!(matches!(err, AttemptError::Api(ApiError::Unauthorized)));
    assert!(h.store.load(&mock()).await.is_none());
}

#[tokio::test]
async fn warning_fires_once_when_crossing_threshold() {
    let mut h = Harness::new(10);
    h.controller.start(&mock()).await.unwrap();
    let generation = h.controller.generation();

    h.clock.advance(Duration::seconds(299));
    assert_eq!(
        h.controller.tick(generation).await.unwrap(),
        CountdownOutcome::Running(running(301, false))
    );
    h.clock.advance(Duration::seconds(1));
    assert_eq!(
        h.controller.tick(generation).await.unwrap(),
        CountdownOutcome::Running(running(300, true))
    );
    h.clock.advance(Duration::seconds(1));
    assert_eq!(
        h.controller.tick(generation).await.unwrap(),
        CountdownOutcome::Running(running(299, false))
    );
}

#[tokio::test]
async fn warning_fires_at_start_when_already_below_threshold() {
    let mut h = Harness::new(4);
    let outcome = h.controller.start(&mock()).await.unwrap();
    assert_eq!(outcome, StartOutcome::Started(running(240, true)));

    let generation = h.controller.generation();
    h.clock.advance(Duration::seconds(1));
    assert_eq!(
        h.controller.tick(generation).await.unwrap(),
        CountdownOutcome::Running(running(239, false))
    );
}

#[tokio::test]
async fn start_failure_stays_idle() {
    let mut h = Harness::new(30);
    h.api.fail_next_start();

    let err = h.controller.start(&mock()).await.unwrap_err();
    assert!(matches!(err, AttemptError::Api(ApiError::Unauthorized)));
    assert_eq!(h.controller.phase(), AttemptPhase::Idle);
    assert!(!h.controller.is_busy());
    let request = h.controller.request().unwrap();
    assert_eq!(request.kind, RequestKind::Start);
    assert!(request.error().is_some());
    assert!(h.kv.is_empty());

    h.controller.start(&mock()).await.unwrap();
    assert_eq!(h.controller.phase(), AttemptPhase::Active);
}

#[tokio::test]
async fn manual_submit_failure_keeps_attempt_and_can_be_retried() {
    let mut h = Harness::new(30);
    h.controller.start(&mock()).await.unwrap();
    pick(&mut h, "q1", "o1").await;
    h.clock.advance(Duration::minutes(10));

    h.api.fail_next_submit();
    let err = h.controller.submit().await.unwrap_err();
    assert!(matches!(err, AttemptError::Api(ApiError::Status { .. })));
    assert_eq!(h.controller.phase(), AttemptPhase::Active);
    assert!(h.store.load(&mock()).await.is_some());
    assert!(matches!(
        h.controller.request().map(|r| &r.status),
        Some(RequestStatus::Failed(_))
    ));

    let result = h.controller.submit().await.unwrap();
    assert_eq!(result.time_taken, 600);
    assert_eq!(result.answered_questions, 1);
    assert_eq!(h.controller.phase(), AttemptPhase::Submitted);
    assert!(h.store.load(&mock()).await.is_none());
}

#[tokio::test]
async fn submit_prompt_counts_unanswered_questions() {
    let mut h = Harness::new(30);
    h.controller.start(&mock()).await.unwrap();
    pick(&mut h, "q1", "o1").await;
    assert!(
        h.controller
            .submit_prompt()
            .starts_with("You have 2 unanswered question(s).")
    );

    pick(&mut h, "q2", "o3").await;
    pick(&mut h, "q3", "o5").await;
    assert!(!h.controller.submit_prompt().contains("unanswered"));
}

#[tokio::test]
async fn pending_request_refuses_a_second_one() {
    let mut h = Harness::new(30);
    h.controller.start(&mock()).await.unwrap();

    let pending = h.controller.begin_submit().unwrap();
    assert!(h.controller.is_busy());
    assert!(matches!(h.controller.begin_submit(), Err(AttemptError::Busy)));
    assert!(matches!(
        h.controller.start(&mock()).await,
        Err(AttemptError::Busy)
    ));
    assert!(matches!(
        h.controller
            .answer(QuestionId::new("q1"), Some(OptionId::new("o1")))
            .await,
        Err(AttemptError::Busy)
    ));

    let api = h.controller.api();
    let result = api.submit_attempt(pending.request()).await;
    h.controller.complete_submit(pending, result).await.unwrap();
    assert!(!h.controller.is_busy());
    assert_eq!(h.controller.phase(), AttemptPhase::Submitted);
}

#[tokio::test]
async fn split_start_admits_one_request() {
    let mut h = Harness::new(30);
    let pending = h.controller.begin_start(&mock()).unwrap();
    assert!(matches!(
        h.controller.begin_start(&mock()),
        Err(AttemptError::Busy)
    ));

    let countdown = h
        .controller
        .complete_start(pending, Err(ApiError::Unauthorized))
        .await;
    assert!(countdown.is_err());
    assert_eq!(h.controller.phase(), AttemptPhase::Idle);
    assert!(h.controller.begin_start(&mock()).is_ok());
}

#[tokio::test]
async fn resuming_an_expired_snapshot_auto_submits() {
    let mut h = Harness::new(30);
    h.controller.start(&mock()).await.unwrap();
    pick(&mut h, "q3", "o5").await;
    h.controller.suspend();

    h.clock.advance(Duration::minutes(45));
    let outcome = h.controller.resume(&mock()).await.unwrap();
    let CountdownOutcome::AutoSubmitted(result) = outcome else {
        panic!("expected auto-submit, got {outcome:?}");
    };
    assert_eq!(result.time_taken, 1800);
    assert_eq!(result.answered_questions, 1);
    assert_eq!(h.controller.phase(), AttemptPhase::Submitted);
    assert!(h.kv.is_empty());
}

#[tokio::test]
async fn restoring_an_expired_snapshot_leaves_the_request_to_the_caller() {
    let mut h = Harness::new(30);
    h.controller.start(&mock()).await.unwrap();
    let attempt_id = h.controller.session().unwrap().attempt_id().clone();
    pick(&mut h, "q1", "o2").await;
    h.controller.suspend();

    h.clock.advance(Duration::minutes(40));
    let step = h.controller.restore_attempt(&attempt_id).await.unwrap();
    let CountdownStep::TimeUp(pending) = step else {
        panic!("expected the expired attempt to be due, got {step:?}");
    };
    assert_eq!(pending.kind(), RequestKind::AutoSubmit);
    assert_eq!(pending.request().time_taken, Some(1800));
    assert!(h.api.submissions().is_empty());
    assert!(h.controller.is_busy());
    assert_eq!(h.controller.phase(), AttemptPhase::Active);
    assert!(h.store.load(&mock()).await.is_some());

    let result = h.api.submit_attempt(pending.request()).await;
    let submitted = h.controller.complete_submit(pending, result).await.unwrap();
    assert_eq!(submitted.answered_questions, 1);
    assert_eq!(h.controller.phase(), AttemptPhase::Submitted);
    assert!(h.kv.is_empty());
}

#[tokio::test]
async fn restoring_a_running_snapshot_sends_nothing() {
    let mut h = Harness::new(30);
    h.controller.start(&mock()).await.unwrap();
    h.controller.suspend();

    h.clock.advance(Duration::minutes(10));
    let step = h.controller.restore_saved(&mock()).await.unwrap();
    assert!(matches!(step, CountdownStep::Running(Countdown { remaining_seconds: 1200, .. })));
    assert!(!h.controller.is_busy());
    assert!(h.api.submissions().is_empty());
}

#[tokio::test]
async fn failed_auto_submit_stops_the_countdown_and_allows_manual_submit() {
    let mut h = Harness::new(30);
    h.controller.start(&mock()).await.unwrap();
    let generation = h.controller.generation();

    h.api.fail_next_submit();
    h.clock.advance(Duration::minutes(30));
    let err = h.controller.tick(generation).await.unwrap_err();
    assert!(matches!(err, AttemptError::Api(_)));
    assert_eq!(h.controller.phase(), AttemptPhase::Active);
    assert_eq!(h.controller.remaining_seconds(), Some(0));
    assert!(!h.controller.session().unwrap().is_active());
    assert_eq!(h.controller.request().unwrap().kind, RequestKind::AutoSubmit);

    assert_eq!(
        h.controller.tick(generation).await.unwrap(),
        CountdownOutcome::Ignored
    );
    assert!(matches!(
        h.controller
            .answer(QuestionId::new("q1"), Some(OptionId::new("o1")))
            .await,
        Err(AttemptError::TimeUp)
    ));
    assert!(h.store.load(&mock()).await.is_some());

    let result = h.controller.submit().await.unwrap();
    assert_eq!(result.time_taken, 1800);
    assert_eq!(h.controller.phase(), AttemptPhase::Submitted);
}

#[tokio::test]
async fn answers_are_checked_against_the_paper() {
    let mut h = Harness::new(30);
    assert!(matches!(
        h.controller
            .answer(QuestionId::new("q1"), Some(OptionId::new("o1")))
            .await,
        Err(AttemptError::NotActive)
    ));

    h.controller.start(&mock()).await.unwrap();
    assert!(matches!(
        h.controller
            .answer(QuestionId::new("q9"), Some(OptionId::new("o1")))
            .await,
        Err(AttemptError::UnknownQuestion(_))
    ));
    assert!(matches!(
        h.controller
            .answer(QuestionId::new("q1"), Some(OptionId::new("o5")))
            .await,
        Err(AttemptError::UnknownOption { .. })
    ));
    assert!(h.store.load(&mock()).await.unwrap().answers().is_empty());
}

#[tokio::test]
async fn suspend_keeps_the_snapshot_and_reset_clears_it() {
    let mut h = Harness::new(30);
    h.controller.start(&mock()).await.unwrap();
    pick(&mut h, "q1", "o1").await;

    h.controller.suspend();
    assert_eq!(h.controller.phase(), AttemptPhase::Idle);
    assert!(h.controller.session().is_none());
    assert!(h.store.load(&mock()).await.is_some());

    h.controller.resume(&mock()).await.unwrap();
    assert!(matches!(
        h.controller.start(&mock()).await,
        Err(AttemptError::AlreadyActive)
    ));

    h.controller.reset().await;
    assert_eq!(h.controller.phase(), AttemptPhase::Idle);
    assert!(h.controller.session().is_none());
    assert!(h.store.load(&mock()).await.is_none());
    assert!(matches!(
        h.controller.resume(&mock()).await,
        Err(AttemptError::NothingToResume)
    ));
}

#[tokio::test]
async fn ticks_from_an_earlier_countdown_are_ignored() {
    let mut h = Harness::new(30);
    h.controller.start(&mock()).await.unwrap();
    let stale = h.controller.generation();
    h.controller.reset().await;
    h.controller.start(&mock()).await.unwrap();

    h.clock.advance(Duration::minutes(31));
    assert_eq!(
        h.controller.tick(stale).await.unwrap(),
        CountdownOutcome::Ignored
    );
    assert_eq!(h.controller.phase(), AttemptPhase::Active);
    assert!(h.api.submissions().is_empty());
}

#[tokio::test]
async fn submit_finishing_after_leaving_still_clears_the_snapshot() {
    let mut h = Harness::new(30);
    h.controller.start(&mock()).await.unwrap();
    let pending = h.controller.begin_submit().unwrap();

    h.controller.suspend();
    let result = h.controller.api().submit_attempt(pending.request()).await;
    h.controller.complete_submit(pending, result).await.unwrap();

    assert!(h.store.load(&mock()).await.is_none());
    assert_eq!(h.controller.phase(), AttemptPhase::Idle);
    assert!(h.controller.last_result().is_some());
}

#[tokio::test(start_paused = true)]
async fn tick_task_runs_only_while_active() {
    let mut h = Harness::new(30);
    let (tx, mut rx) = mpsc::unbounded_channel();
    h.controller.attach_ticks(tx);
    assert!(!h.controller.is_ticking());

    h.controller.start(&mock()).await.unwrap();
    assert!(h.controller.is_ticking());

    let generation = rx.recv().await.unwrap();
    assert_eq!(generation, h.controller.generation());
    h.clock.advance(Duration::seconds(1));
    assert_eq!(
        h.controller.tick(generation).await.unwrap(),
        CountdownOutcome::Running(running(1799, false))
    );

    h.controller.suspend();
    assert!(!h.controller.is_ticking());
    while let Ok(late) = rx.try_recv() {
        assert_ne!(late, h.controller.generation());
    }
    let next = tokio::time::timeout(StdDuration::from_secs(5), rx.recv()).await;
    assert!(next.is_err(), "no ticks after leaving the attempt");
}

#[tokio::test]
async fn discard_all_forgets_every_saved_attempt() {
    let mut h = Harness::new(30);
    let other = MockId::new("mock-2");
    h.controller.start(&other).await.unwrap();
    h.controller.suspend();
    h.controller.start(&mock()).await.unwrap();
    pick(&mut h, "q1", "o1").await;

    h.controller.discard_all().await;

    assert_eq!(h.controller.phase(), AttemptPhase::Idle);
    assert!(h.controller.session().is_none());
    assert!(!h.controller.is_ticking());
    assert!(h.kv.is_empty());
    assert_eq!(h.controller.resume_decision(&other).await, ResumeDecision::StartFresh);
    assert!(matches!(
        h.controller.resume(&mock()).await,
        Err(AttemptError::NothingToResume)
    ));
}

#[tokio::test]
async fn clock_set_behind_the_start_never_adds_time() {
    let mut h = Harness::new(30);
    h.controller.start(&mock()).await.unwrap();
    h.controller.suspend();

    h.clock.set(exam_core::time::fixed_now() - Duration::minutes(5));
    assert_eq!(h.store.remaining_seconds(&mock()).await, Some(1800));
    let outcome = h.controller.resume(&mock()).await.unwrap();
    assert_eq!(outcome, CountdownOutcome::Running(running(1800, false)));
}
