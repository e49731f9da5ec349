use exam_core::model::{AnswerSheet, MockId};

use super::test_harness::{
    FakeApi, ViewKind, attempt_summary, mock_summary, paper, setup_view_harness,
};

fn catalog_api() -> FakeApi {
    let mut inactive = mock_summary("m2");
    inactive.is_active = false;
    FakeApi {
        mocks: vec![mock_summary("m1"), inactive],
        attempts: vec![attempt_summary("a1")],
        ..FakeApi::default()
    }
}

#[tokio::test(flavor = "current_thread")]
async fn mock_list_renders_cards() {
    let mut harness = setup_view_harness(ViewKind::Mocks, catalog_api());
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("Mock tests"));
    assert!(html.contains("Mock m1"));
    assert!(html.contains("Mock m2"));
    assert!(html.contains("Inactive"));
    assert!(html.contains("View details"));
}

#[tokio::test(flavor = "current_thread")]
async fn mock_list_shows_error_with_retry() {
    let api = FakeApi {
        fail: true,
        ..FakeApi::default()
    };
    let mut harness = setup_view_harness(ViewKind::Mocks, api);
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("You are not signed in"));
    assert!(html.contains("Retry"));
}

#[tokio::test(flavor = "current_thread")]
async fn mock_details_mentions_unfinished_attempt() {
    let mut harness = setup_view_harness(ViewKind::MockDetails("m1".into()), catalog_api());
    {
        let attempts = harness.services.attempts();
        let controller = attempts.lock().await;
        controller
            .store()
            .save(&MockId::new("m1"), &paper("a1", "m1", 30), &AnswerSheet::new())
            .await;
    }
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("Mock m1"));
    assert!(html.contains("unfinished attempt"));
    assert!(html.contains("0 of 3 answered"));
    assert!(html.contains("Start test"));
}

#[tokio::test(flavor = "current_thread")]
async fn mock_details_for_unknown_mock_is_not_found() {
    let mut harness = setup_view_harness(ViewKind::MockDetails("nope".into()), catalog_api());
    harness.settle().await;

    assert!(harness.render().contains("Nothing was found here."));
}

#[tokio::test(flavor = "current_thread")]
async fn attempt_view_resumes_saved_attempt() {
    let mut harness = setup_view_harness(ViewKind::Attempt("a1".into()), catalog_api());
    {
        let attempts = harness.services.attempts();
        let controller = attempts.lock().await;
        controller
            .store()
            .save(&MockId::new("m1"), &paper("a1", "m1", 30), &AnswerSheet::new())
            .await;
    }
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("Physics Mock"));
    assert!(html.contains("30:00"));
    assert!(html.contains("Question 1 of 3"));
    assert!(html.contains("Mechanics"));
    assert!(html.contains("Submit test"));
}

#[tokio::test(flavor = "current_thread")]
async fn attempt_view_without_snapshot_is_not_found() {
    let mut harness = setup_view_harness(ViewKind::Attempt("missing".into()), catalog_api());
    harness.settle().await;

    assert!(harness.render().contains("Nothing was found here."));
}

#[tokio::test(flavor = "current_thread")]
async fn results_without_submission_points_to_history() {
    let mut harness = setup_view_harness(ViewKind::Results("a1".into()), catalog_api());
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("Results are shown right after a submission."));
    assert!(html.contains("View this attempt"));
}

#[tokio::test(flavor = "current_thread")]
async fn history_renders_rows() {
    let mut harness = setup_view_harness(ViewKind::History, catalog_api());
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("My attempts"));
    assert!(html.contains("Mock m1"));
    assert!(html.contains("View details"));
}

#[tokio::test(flavor = "current_thread")]
async fn history_without_attempts_offers_catalog() {
    let mut harness = setup_view_harness(ViewKind::History, FakeApi::default());
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("No attempts yet."));
    assert!(html.contains("Browse mock tests"));
}

#[tokio::test(flavor = "current_thread")]
async fn attempt_details_failure_renders_error() {
    let mut harness = setup_view_harness(ViewKind::AttemptDetails("a1".into()), catalog_api());
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("Back to my attempts"));
    assert!(html.contains("Retry"));
}

#[tokio::test(flavor = "current_thread")]
async fn answer_key_renders_correct_options() {
    let mut harness = setup_view_harness(ViewKind::AnswerKey("m1".into()), catalog_api());
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("Answer key: Physics Mock"));
    assert!(html.contains("Correct answer"));
    assert!(html.contains("Option o2"));
}
