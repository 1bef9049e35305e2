//! CV fields and the plain-text CV template.
//!
//! The same rendering backs every output of the CV (preview, clipboard copy,
//! `cv.txt` download), so all of them are byte-identical.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_TITLE: &str = "FinTech Product Analyst";

const NAME_PLACEHOLDER: &str = "Your Name";
const SUMMARY_PLACEHOLDER: &str = "Brief summary about your strengths and transition to FinTech.";
const EXPERIENCE_PLACEHOLDER: &str = "List your relevant roles and achievements.";
const EDUCATION_PLACEHOLDER: &str = "Your degrees and institutions.";
const SKILLS_PLACEHOLDER: &str = "Excel, SQL, Power BI, Product Analysis, Payments";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CvFieldError {
    #[error("unknown CV field: {0}")]
    Unknown(String),
}

/// Free-text CV content. Serialized with the field names of the export file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CvFields {
    pub name: String,
    pub title: String,
    pub summary: String,
    pub experience: String,
    pub education: String,
    pub skills: String,
}

impl Default for CvFields {
    fn default() -> Self {
        Self {
            name: String::new(),
            title: DEFAULT_TITLE.to_string(),
            summary: String::new(),
            experience: String::new(),
            education: String::new(),
            skills: String::new(),
        }
    }
}

/// One editable field of [`CvFields`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CvField {
    Name,
    Title,
    Summary,
    Experience,
    Education,
    Skills,
}

impl CvField {
    pub const ALL: [CvField; 6] = [
        CvField::Name,
        CvField::Title,
        CvField::Summary,
        CvField::Experience,
        CvField::Education,
        CvField::Skills,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            CvField::Name => "name",
            CvField::Title => "title",
            CvField::Summary => "summary",
            CvField::Experience => "experience",
            CvField::Education => "education",
            CvField::Skills => "skills",
        }
    }
}

impl fmt::Display for CvField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CvField {
    type Err = CvFieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        CvField::ALL
            .into_iter()
            .find(|field| field.as_str() == wanted)
            .ok_or_else(|| CvFieldError::Unknown(s.to_string()))
    }
}

impl CvFields {
    /// Replace a single field.
    pub fn set(&mut self, field: CvField, value: impl Into<String>) {
        let value = value.into();
        match field {
            CvField::Name => self.name = value,
            CvField::Title => self.title = value,
            CvField::Summary => self.summary = value,
            CvField::Experience => self.experience = value,
            CvField::Education => self.education = value,
            CvField::Skills => self.skills = value,
        }
    }

}

fn or_placeholder<'a>(value: &'a str, placeholder: &'a str) -> &'a str {
    if value.is_empty() { placeholder } else { value }
}

/// Render the CV as plain text.
///
/// Sections are emitted in a fixed order; empty fields are replaced by a
/// placeholder sentence, other values are copied verbatim.
#[must_use]
pub fn render_cv_text(cv: &CvFields) -> String {
    format!(
        "{name}\n{title}\n\nProfessional Summary:\n{summary}\n\nExperience:\n{experience}\n\nEducation:\n{education}\n\nSkills:\n{skills}\n",
        name = or_placeholder(&cv.name, NAME_PLACEHOLDER),
        title = or_placeholder(&cv.title, DEFAULT_TITLE),
        summary = or_placeholder(&cv.summary, SUMMARY_PLACEHOLDER),
        experience = or_placeholder(&cv.experience, EXPERIENCE_PLACEHOLDER),
        education = or_placeholder(&cv.education, EDUCATION_PLACEHOLDER),
        skills = or_placeholder(&cv.skills, SKILLS_PLACEHOLDER),
    )
}
