use std::sync::Arc;

use async_trait::async_trait;
use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use dioxus_router::{Routable, Router};
use tokio::sync::{Mutex, Notify};

use exam_core::model::{
    AnswerKey, AnswerOption, AttemptDetails, AttemptId, AttemptStatus, AttemptSummary, MockId,
    MockSummary, OptionId, Question, QuestionId, Section, SectionId, SectionSummary,
    StartedAttempt, SubmissionResult, SubmitAttemptRequest,
};
use exam_core::time::{fixed_clock, fixed_now};
use services::config::{DEFAULT_API_BASE_URL, DEFAULT_IMAGE_BASE_URL};
use services::{
    ApiError, AppServices, AttemptController, AttemptHistoryService, ClientConfig, ExamApi,
    MockCatalogService,
};
use storage::repository::Storage;

use crate::context::{UiApp, build_app_context};
use crate::views::{
    AnswerKeyView, AttemptDetailsView, AttemptView, HistoryView, MockDetailsView, MockListView,
    ResultsView,
};

fn question(id: &str, options: &[&str], correct: Option<&str>) -> Question {
    Question {
        id: QuestionId::new(id),
        text: Some(format!("Question {id}")),
        image_url: None,
        marks: 4.0,
        negative_mark: 1.0,
        sort_order: 0,
        section_id: None,
        options: options
            .iter()
            .zip(["A", "B", "C", "D"])
            .zip(0..)
            .map(|((option, label), sort_order)| AnswerOption {
                id: OptionId::new(*option),
                label: label.to_string(),
                text: Some(format!("Option {option}")),
                image_url: None,
                sort_order,
                is_correct: correct.map(|correct| correct == *option),
            })
            .collect(),
    }
}

pub fn paper(attempt_id: &str, mock_id: &str, duration_minutes: u32) -> StartedAttempt {
    StartedAttempt {
        attempt_id: AttemptId::new(attempt_id),
        mock_id: MockId::new(mock_id),
        title: "Physics Mock".into(),
        description: None,
        duration_minutes,
        started_at: fixed_now(),
        sections: vec![
            Section {
                id: SectionId::new("s1"),
                name: "Mechanics".into(),
                sort_order: 0,
                questions: vec![question("q1", &["o1", "o2"], None), question("q2", &["o3", "o4"], None)],
            },
            Section {
                id: SectionId::new("s2"),
                name: "Optics".into(),
                sort_order: 1,
                questions: vec![question("q3", &["o5", "o6"], None)],
            },
        ],
    }
}

pub fn mock_summary(id: &str) -> MockSummary {
    MockSummary {
        id: MockId::new(id),
        title: format!("Mock {id}"),
        description: Some("Full-length practice paper".into()),
        duration_minutes: 30,
        is_active: true,
        created_at: fixed_now(),
        sections: vec![SectionSummary {
            id: SectionId::new("s1"),
            name: "Mechanics".into(),
            sort_order: 0,
        }],
    }
}

pub fn attempt_summary(id: &str) -> AttemptSummary {
    AttemptSummary {
        attempt_id: AttemptId::new(id),
        mock_id: MockId::new("m1"),
        mock_title: "Mock m1".into(),
        started_at: fixed_now(),
        submitted_at: Some(fixed_now()),
        score: Some(8.0),
        percentage: Some(66.67),
        status: AttemptStatus::Submitted,
        total_marks: 12.0,
        obtained_marks: 8.0,
        total_questions: 3,
        answered_questions: 2,
        correct_answers: 2,
        incorrect_answers: 0,
        unanswered_questions: 1,
        sections: Vec::new(),
    }
}

/// Canned backend; `fail` makes every call answer `Unauthorized`, and a
/// `submit_gate` holds submissions until it is notified.
#[derive(Clone, Default)]
pub struct FakeApi {
    pub mocks: Vec<MockSummary>,
    pub attempts: Vec<AttemptSummary>,
    pub fail: bool,
    pub submit_gate: Option<Arc<Notify>>,
}

impl FakeApi {
    fn check(&self) -> Result<(), ApiError> {
        if self.fail {
            return Err(ApiError::Unauthorized);
        }
        Ok(())
    }
}

#[async_trait]
impl ExamApi for FakeApi {
    async fn fetch_mocks(&self) -> Result<Vec<MockSummary>, ApiError> {
        self.check()?;
        Ok(self.mocks.clone())
    }

    async fn start_attempt(&self, mock_id: &MockId) -> Result<StartedAttempt, ApiError> {
        self.check()?;
        Ok(paper("a-new", mock_id.as_str(), 30))
    }

    async fn submit_attempt(
        &self,
        request: &SubmitAttemptRequest,
    ) -> Result<SubmissionResult, ApiError> {
        if let Some(gate) = &self.submit_gate {
            gate.notified().await;
        }
        self.check()?;
        Ok(SubmissionResult {
            attempt_id: request.attempt_id.clone(),
            mock_id: MockId::new("m1"),
            title: "Physics Mock".into(),
            status: AttemptStatus::Submitted,
            score: 0.0,
            percentage: 0.0,
            total_marks: 12.0,
            obtained_marks: 0.0,
            time_taken: request.time_taken.unwrap_or_default(),
            submitted_at: fixed_now(),
            total_questions: 3,
            answered_questions: 0,
            correct_answers: 0,
            incorrect_answers: 0,
            unanswered_questions: 3,
            sections: Vec::new(),
        })
    }

    async fn view_answers(&self, mock_id: &MockId) -> Result<AnswerKey, ApiError> {
        self.check()?;
        Ok(AnswerKey {
            mock_id: mock_id.clone(),
            title: "Physics Mock".into(),
            description: None,
            duration_minutes: 30,
            sections: vec![Section {
                id: SectionId::new("s1"),
                name: "Mechanics".into(),
                sort_order: 0,
                questions: vec![question("q1", &["o1", "o2"], Some("o2"))],
            }],
        })
    }

    async fn fetch_user_attempts(&self) -> Result<Vec<AttemptSummary>, ApiError> {
        self.check()?;
        Ok(self.attempts.clone())
    }

    async fn fetch_attempt_details(
        &self,
        _attempt_id: &AttemptId,
    ) -> Result<AttemptDetails, ApiError> {
        Err(ApiError::Unauthorized)
    }
}

#[derive(Clone)]
struct TestApp {
    services: AppServices,
}

impl UiApp for TestApp {
    fn config(&self) -> ClientConfig {
        self.services.config().clone()
    }

    fn catalog(&self) -> Arc<MockCatalogService> {
        self.services.catalog()
    }

    fn history(&self) -> Arc<AttemptHistoryService> {
        self.services.history()
    }

    fn attempts(&self) -> Arc<Mutex<AttemptController>> {
        self.services.attempts()
    }
}

#[derive(Clone, PartialEq, Eq)]
pub enum ViewKind {
    Mocks,
    MockDetails(String),
    AnswerKey(String),
    Attempt(String),
    Results(String),
    History,
    AttemptDetails(String),
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    app: Arc<TestApp>,
    view: ViewKind,
}

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl Eq for ViewHarnessProps {}

#[component]
fn ViewRouterHarness(props: ViewHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(&app));
    use_context_provider(|| props.view.clone());
    rsx! { Router::<TestRoute> {} }
}

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum TestRoute {
    #[route("/")]
    Root {},
}

#[component]
fn Root() -> Element {
    let view = use_context::<ViewKind>();
    match view {
        ViewKind::Mocks => rsx! { MockListView {} },
        ViewKind::MockDetails(mock_id) => rsx! { MockDetailsView { mock_id } },
        ViewKind::AnswerKey(mock_id) => rsx! { AnswerKeyView { mock_id } },
        ViewKind::Attempt(attempt_id) => rsx! { AttemptView { attempt_id } },
        ViewKind::Results(attempt_id) => rsx! { ResultsView { attempt_id } },
        ViewKind::History => rsx! { HistoryView {} },
        ViewKind::AttemptDetails(attempt_id) => rsx! { AttemptDetailsView { attempt_id } },
    }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
    pub services: AppServices,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub async fn drive_async(&mut self) {
        let _ = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            self.dom.wait_for_work(),
        )
        .await;
        self.dom.render_immediate(&mut NoOpMutations);
        self.dom.process_events();
    }

    /// Rebuild, then let resources and the tasks they spawn settle.
    pub async fn settle(&mut self) {
        self.rebuild();
        for _ in 0..4 {
            self.drive_async().await;
        }
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

pub fn setup_view_harness(view: ViewKind, api: FakeApi) -> ViewHarness {
    let config = ClientConfig::new(DEFAULT_API_BASE_URL, DEFAULT_IMAGE_BASE_URL)
        .expect("default config");
    let api: Arc<dyn ExamApi> = Arc::new(api);
    let services = AppServices::from_parts(config, api, Storage::in_memory(), fixed_clock());

    let app = Arc::new(TestApp {
        services: services.clone(),
    });
    let dom = VirtualDom::new_with_props(ViewRouterHarness, ViewHarnessProps { app, view });

    ViewHarness { dom, services }
}
