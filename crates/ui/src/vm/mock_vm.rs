use exam_core::model::MockSummary;
use services::ResumeOffer;

use crate::vm::time_fmt::format_span;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MockCardVm {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub duration_label: String,
    pub sections_label: String,
    pub section_names: Vec<String>,
    pub is_active: bool,
}

impl From<&MockSummary> for MockCardVm {
    fn from(mock: &MockSummary) -> Self {
        let count = mock.section_count();
        let mut sections = mock.sections.clone();
        sections.sort_by_key(|section| section.sort_order);
        Self {
            id: mock.id.to_string(),
            title: mock.title.clone(),
            description: mock.description.clone().filter(|text| !text.trim().is_empty()),
            duration_label: format!("{} minutes", mock.duration_minutes),
            sections_label: if count == 1 {
                "1 section".to_string()
            } else {
                format!("{count} sections")
            },
            section_names: sections.into_iter().map(|section| section.name).collect(),
            is_active: mock.is_active,
        }
    }
}

#[must_use]
pub fn map_mock_cards(mocks: &[MockSummary]) -> Vec<MockCardVm> {
    mocks.iter().map(MockCardVm::from).collect()
}

/// Text for the "resume or start new" prompt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResumePromptVm {
    pub title: String,
    pub remaining_label: String,
    pub progress_label: String,
}

impl From<&ResumeOffer> for ResumePromptVm {
    fn from(offer: &ResumeOffer) -> Self {
        Self {
            title: offer.title.clone(),
            remaining_label: format_span(offer.remaining_seconds),
            progress_label: format!("{} of {} answered", offer.answered, offer.total_questions),
        }
    }
}
