use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{MockId, SectionId};

/// Section header as listed in the mock catalog (no questions).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionSummary {
    pub id: SectionId,
    pub name: String,
    pub sort_order: i32,
}

/// A mock test as listed in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MockSummary {
    pub id: MockId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "duration")]
    pub duration_minutes: u32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub sections: Vec<SectionSummary>,
}

impl MockSummary {
    #[must_use]
    pub fn section_count(&self) -> usize {
        self.sections.len()
    }
}
