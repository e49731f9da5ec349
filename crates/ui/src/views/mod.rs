mod answer_key;
mod attempt;
mod attempt_details;
mod components;
mod history;
mod mock_details;
mod mock_list;
mod results;
mod state;

#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;

pub use answer_key::AnswerKeyView;
pub use attempt::AttemptView;
pub use attempt_details::AttemptDetailsView;
pub use history::HistoryView;
pub use mock_details::MockDetailsView;
pub use mock_list::MockListView;
pub use results::ResultsView;
pub use state::{ViewError, ViewState, view_state_from_resource};
