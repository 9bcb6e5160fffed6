//! Render configuration.
//!
//! Everything that differed between revisions of the resume template (heading wording and
//! casing, separators, the bold marker) lives here instead of in separate code paths.  All fields
//! have defaults, so a JSON file only needs the values it changes.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{RenderError, Result};
use crate::layout::LayoutPolicy;
use crate::richtext::DEFAULT_BOLD_MARKER;

/// How section titles are cased.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeadingCase {
    /// `TECHNICAL SKILLS`
    #[default]
    Upper,
    /// `Technical Skills`
    Title,
    /// Labels are used verbatim.
    AsIs,
}

impl HeadingCase {
    pub fn apply(self, label: &str) -> String {
        match self {
            HeadingCase::Upper => label.to_uppercase(),
            HeadingCase::AsIs => label.to_owned(),
            HeadingCase::Title => label
                .split(' ')
                .map(|word| {
                    let mut chars = word.chars();
                    match chars.next() {
                        Some(first) => first
                            .to_uppercase()
                            .chain(chars.flat_map(char::to_lowercase))
                            .collect(),
                        None => String::new(),
                    }
                })
                .collect::<Vec<_>>()
                .join(" "),
        }
    }
}

/// Section title labels.  A `None` summary label renders the summary under a bare divider.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SectionLabels {
    pub summary: Option<String>,
    pub education: String,
    pub experience: String,
    pub projects: String,
    pub coursework: String,
    pub skills: String,
}

impl Default for SectionLabels {
    fn default() -> Self {
        Self {
            summary: Some("Summary".to_owned()),
            education: "Education".to_owned(),
            experience: "Experience".to_owned(),
            projects: "Projects".to_owned(),
            coursework: "Relevant Coursework".to_owned(),
            skills: "Technical Skills".to_owned(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub labels: SectionLabels,
    pub heading_case: HeadingCase,
    /// Joins the contact fields under the name.
    pub contact_separator: String,
    /// Joins role and company on experience rows.
    pub role_company_separator: String,
    pub coursework_separator: String,
    pub skills_separator: String,
    pub bold_marker: String,
    pub layout: LayoutPolicy,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            labels: SectionLabels::default(),
            heading_case: HeadingCase::Upper,
            contact_separator: " | ".to_owned(),
            role_company_separator: " \u{2014} ".to_owned(),
            coursework_separator: ", ".to_owned(),
            skills_separator: ", ".to_owned(),
            bold_marker: DEFAULT_BOLD_MARKER.to_owned(),
            layout: LayoutPolicy::default(),
        }
    }
}

impl RenderConfig {
    /// Loads a configuration from a JSON file; absent fields keep their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path.as_ref())?;
        serde_json::from_str(&text).map_err(RenderError::Config)
    }

    /// Sets the heading case and returns the updated configuration.
    pub fn with_heading_case(mut self, heading_case: HeadingCase) -> Self {
        self.heading_case = heading_case;
        self
    }

    /// Sets the layout policy and returns the updated configuration.
    pub fn with_layout(mut self, layout: LayoutPolicy) -> Self {
        self.layout = layout;
        self
    }

    /// Applies the configured casing to a section label.
    pub fn heading(&self, label: &str) -> String {
        self.heading_case.apply(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heading_cases() {
        assert_eq!(HeadingCase::Upper.apply("Technical Skills"), "TECHNICAL SKILLS");
        assert_eq!(
            HeadingCase::Title.apply("relevant COURSEWORK"),
            "Relevant Coursework"
        );
        assert_eq!(HeadingCase::AsIs.apply("skills"), "skills");
    }

    #[test]
    fn partial_config_keeps_defaults() {
        let config: RenderConfig = serde_json::from_str(
            r#"{"heading_case": "title", "labels": {"skills": "Skills", "summary": null}}"#,
        )
        .expect("parse config");
        assert_eq!(config.heading_case, HeadingCase::Title);
        assert_eq!(config.labels.skills, "Skills");
        assert_eq!(config.labels.summary, None);
        assert_eq!(config.labels.education, "Education");
        assert_eq!(config.contact_separator, " | ");
    }

    #[test]
    fn config_file_errors_are_reported() {
        let dir = tempfile::tempdir().expect("temp dir");
        let good = dir.path().join("good.json");
        std::fs::write(&good, r#"{"layout": {"paper": "a4"}}"#).expect("write config");
        let config = RenderConfig::from_json_file(&good).expect("load config");
        assert_eq!(config.layout.paper, crate::document::PaperSize::A4);

        let bad = dir.path().join("bad.json");
        std::fs::write(&bad, "{ not json").expect("write config");
        assert!(matches!(
            RenderConfig::from_json_file(&bad),
            Err(RenderError::Config(_))
        ));
        assert!(matches!(
            RenderConfig::from_json_file(dir.path().join("missing.json")),
            Err(RenderError::Io(_))
        ));
    }
}
