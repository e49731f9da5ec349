#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use reqwest::StatusCode;

use exam_core::model::{
    AnswerKey, AnswerOption, AttemptDetails, AttemptId, AttemptStatus, AttemptSummary, MockId,
    MockSummary, OptionId, Question, QuestionId, Section, SectionId, StartedAttempt,
    SubmissionResult, SubmitAttemptRequest,
};
use exam_core::time::{fixed_clock, fixed_now};
use services::{ApiError, AttemptController, Clock, ExamApi};
use storage::LocalAttemptStore;
use storage::repository::InMemoryKeyValueStore;

pub fn question(id: &str, options: &[&str], sort_order: i32) -> Question {
    Question {
        id: QuestionId::new(id),
        text: Some(format!("Question {id}")),
        image_url: None,
        marks: 4.0,
        negative_mark: 1.0,
        sort_order,
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
                is_correct: None,
            })
            .collect(),
    }
}

/// Two sections, three questions: q1 (o1, o2), q2 (o3, o4) and q3 (o5, o6).
pub fn paper(attempt_id: &str, mock_id: &MockId, duration_minutes: u32) -> StartedAttempt {
    StartedAttempt {
        attempt_id: AttemptId::new(attempt_id),
        mock_id: mock_id.clone(),
        title: "Physics Mock".into(),
        description: Some("Mechanics and optics".into()),
        duration_minutes,
        started_at: fixed_now(),
        sections: vec![
            Section {
                id: SectionId::new("s1"),
                name: "Mechanics".into(),
                sort_order: 0,
                questions: vec![question("q1", &["o1", "o2"], 0), question("q2", &["o3", "o4"], 1)],
            },
            Section {
                id: SectionId::new("s2"),
                name: "Optics".into(),
                sort_order: 1,
                questions: vec![question("q3", &["o5", "o6"], 0)],
            },
        ],
    }
}

pub fn mock_summary(id: &str, is_active: bool) -> MockSummary {
    MockSummary {
        id: MockId::new(id),
        title: format!("Mock {id}"),
        description: None,
        duration_minutes: 30,
        is_active,
        created_at: fixed_now(),
        sections: Vec::new(),
    }
}

pub fn attempt_summary(id: &str, started_minutes_after: i64) -> AttemptSummary {
    AttemptSummary {
        attempt_id: AttemptId::new(id),
        mock_id: MockId::new("mock-1"),
        mock_title: "Physics Mock".into(),
        started_at: fixed_now() + chrono::Duration::minutes(started_minutes_after),
        submitted_at: None,
        score: None,
        percentage: None,
        status: AttemptStatus::InProgress,
        total_marks: 12.0,
        obtained_marks: 0.0,
        total_questions: 3,
        answered_questions: 0,
        correct_answers: 0,
        incorrect_answers: 0,
        unanswered_questions: 3,
        sections: Vec::new(),
    }
}

/// In-process `ExamApi` that hands out numbered attempts and records every
/// submission. Failures are scripted per call.
#[derive(Default)]
pub struct ScriptedApi {
    duration_minutes: u32,
    started: AtomicUsize,
    fail_starts: AtomicUsize,
    fail_submits: AtomicUsize,
    issued: Mutex<HashMap<AttemptId, MockId>>,
    submissions: Mutex<Vec<SubmitAttemptRequest>>,
    pub mocks: Vec<MockSummary>,
    pub attempts: Vec<AttemptSummary>,
}

impl ScriptedApi {
    pub fn new(duration_minutes: u32) -> Self {
        Self {
            duration_minutes,
            ..Self::default()
        }
    }

    pub fn fail_next_start(&self) {
        self.fail_starts.fetch_add(1, Ordering::SeqCst);
    }

    pub fn fail_next_submit(&self) {
        self.fail_submits.fetch_add(1, Ordering::SeqCst);
    }

    pub fn start_calls(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }

    pub fn submissions(&self) -> Vec<SubmitAttemptRequest> {
        self.submissions.lock().unwrap().clone()
    }

    fn take_failure(counter: &AtomicUsize) -> bool {
        counter
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

#[async_trait]
impl ExamApi for ScriptedApi {
    async fn fetch_mocks(&self) -> Result<Vec<MockSummary>, ApiError> {
        Ok(self.mocks.clone())
    }

    async fn start_attempt(&self, mock_id: &MockId) -> Result<StartedAttempt, ApiError> {
        if Self::take_failure(&self.fail_starts) {
            return Err(ApiError::Unauthorized);
        }
        let n = self.started.fetch_add(1, Ordering::SeqCst) + 1;
        let attempt = paper(&format!("att-{n}"), mock_id, self.duration_minutes);
        self.issued
            .lock()
            .unwrap()
            .insert(attempt.attempt_id.clone(), mock_id.clone());
        Ok(attempt)
    }

    async fn submit_attempt(
        &self,
        request: &SubmitAttemptRequest,
    ) -> Result<SubmissionResult, ApiError> {
        if Self::take_failure(&self.fail_submits) {
            return Err(ApiError::Status {
                status: StatusCode::SERVICE_UNAVAILABLE,
                message: Some("grading is down".into()),
            });
        }
        self.submissions.lock().unwrap().push(request.clone());

        let mock_id = self
            .issued
            .lock()
            .unwrap()
            .get(&request.attempt_id)
            .cloned()
            .unwrap_or_else(|| MockId::new("unknown"));
        let answered = request
            .answers
            .iter()
            .filter(|answer| answer.selected_option_id.is_some())
            .count();
        let answered = u32::try_from(answered).unwrap();
        let total = u32::try_from(request.answers.len()).unwrap();
        Ok(SubmissionResult {
            attempt_id: request.attempt_id.clone(),
            mock_id,
            title: "Physics Mock".into(),
            status: AttemptStatus::Submitted,
            score: f64::from(answered * 4),
            percentage: f64::from(answered * 100) / f64::from(total.max(1)),
            total_marks: f64::from(total * 4),
            obtained_marks: f64::from(answered * 4),
            time_taken: request.time_taken.unwrap_or_default(),
            submitted_at: fixed_now(),
            total_questions: total,
            answered_questions: answered,
            correct_answers: answered,
            incorrect_answers: 0,
            unanswered_questions: total - answered,
            sections: Vec::new(),
        })
    }

    async fn view_answers(&self, mock_id: &MockId) -> Result<AnswerKey, ApiError> {
        let mut sections = paper("key", mock_id, self.duration_minutes).sections;
        sections.reverse();
        for section in &mut sections {
            section.questions.reverse();
        }
        Ok(AnswerKey {
            mock_id: mock_id.clone(),
            title: "Physics Mock".into(),
            description: None,
            duration_minutes: self.duration_minutes,
            sections,
        })
    }

    async fn fetch_user_attempts(&self) -> Result<Vec<AttemptSummary>, ApiError> {
        Ok(self.attempts.clone())
    }

    async fn fetch_attempt_details(
        &self,
        _attempt_id: &AttemptId,
    ) -> Result<AttemptDetails, ApiError> {
        Err(ApiError::Status {
            status: StatusCode::NOT_FOUND,
            message: None,
        })
    }
}

/// A controller over an in-memory store and a manual clock, with handles to
/// everything a test needs to poke at.
pub struct Harness {
    pub api: Arc<ScriptedApi>,
    pub kv: InMemoryKeyValueStore,
    pub clock: Clock,
    pub store: LocalAttemptStore,
    pub controller: AttemptController,
}

impl Harness {
    pub fn new(duration_minutes: u32) -> Self {
        let api = Arc::new(ScriptedApi::new(duration_minutes));
        let kv = InMemoryKeyValueStore::new();
        let clock = fixed_clock();
        let store = LocalAttemptStore::new(Arc::new(kv.clone()), clock.clone());
        let controller = AttemptController::new(api.clone(), store.clone());
        Self {
            api,
            kv,
            clock,
            store,
            controller,
        }
    }

    /// A second controller over the same store, API and clock, as after an
    /// app restart.
    pub fn reloaded(&self) -> AttemptController {
        AttemptController::new(self.api.clone(), self.store.clone())
    }
}
