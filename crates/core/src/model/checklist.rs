use serde::Serialize;

use crate::model::ids::TaskId;

/// A fixed, non-week-scoped evidence item for the visa application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChecklistItem {
    id: TaskId,
    text: String,
}

impl ChecklistItem {
    #[must_use]
    pub fn new(id: TaskId, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
        }
    }

    #[must_use]
    pub fn id(&self) -> &TaskId {
        &self.id
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }
}

const REFERENCE_ITEMS: [(&str, &str); 10] = [
    ("c1", "Intro to FinTech certificate (edX)"),
    ("c2", "Excel Skills certificate (Coursera)"),
    ("c3", "SQL certificate"),
    ("c4", "Power BI / Tableau certificate"),
    ("c5", "Payments 101 certificate"),
    ("c6", "AML/KYC certificate"),
    ("c7", "3 Recommendation letters (prepare drafts)"),
    ("c8", "Portfolio: Onboarding case study (PDF)"),
    ("c9", "Portfolio: Payments Dashboard (Power BI)"),
    ("c10", "Published articles (LinkedIn/Medium)"),
];

/// The ten evidence items tracked alongside the weekly plan.
#[must_use]
pub fn reference_checklist() -> Vec<ChecklistItem> {
    REFERENCE_ITEMS
        .iter()
        .map(|(id, text)| ChecklistItem::new(TaskId::new(*id), *text))
        .collect()
}
