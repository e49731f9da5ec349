mod answers;
mod attempt;
mod ids;
mod mock;
mod results;
mod snapshot;

pub use answers::{AnswerSheet, AnswerSubmission, SubmitAttemptRequest, submit_prompt};
pub use attempt::{AnswerOption, Question, QuestionRef, Section, StartedAttempt};
pub use ids::{AttemptId, MockId, OptionId, ParseIdError, QuestionId, SectionId};
pub use mock::{MockSummary, SectionSummary};
pub use results::{
    AnswerKey, AttemptDetails, AttemptStatus, AttemptSummary, QuestionReview, SectionResult,
    SectionReview, SubmissionResult,
};
pub use snapshot::AttemptSnapshot;
