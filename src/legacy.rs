//! Saved-history resumes.
//!
//! Resumes saved by the form front end use their own field names: contacts split into first,
//! middle and last name, entries with separate `start`/`end` dates and free-text descriptions,
//! and skills as a flat list.  [`SavedResume`] reads that shape and converts it into a
//! [`ResumeRecord`].

use serde::Deserialize;

use crate::error::RecordError;
use crate::model::{
    self, EducationEntry, ExperienceEntry, Header, ProjectEntry, ResumeRecord, SkillSet,
};

/// Category that a flat skill list is filed under.
pub const DEFAULT_SKILLS_CATEGORY: &str = "Skills";

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SavedContacts {
    pub f_name: String,
    pub m_name: String,
    pub l_name: String,
    pub email: String,
    pub phone: String,
    #[serde(alias = "linkedin")]
    pub linked_in: String,
    pub github: String,
}

impl SavedContacts {
    /// First, middle and last name joined by single spaces.
    pub fn full_name(&self) -> String {
        join_present([&self.f_name, &self.m_name, &self.l_name], " ")
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SavedEducation {
    pub degree: String,
    #[serde(alias = "institution")]
    pub institute: String,
    pub start: String,
    pub end: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SavedExperience {
    pub company: String,
    pub role: String,
    pub start: String,
    pub end: String,
    pub desc: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SavedProject {
    pub name: String,
    pub url: String,
    pub mem: String,
    pub desc: String,
}

/// A skill or course saved either as a bare string or wrapped in an object.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum SavedItem {
    Text(String),
    Skill { skill: String },
    Course { course: String },
}

impl SavedItem {
    pub fn text(&self) -> &str {
        match self {
            SavedItem::Text(text)
            | SavedItem::Skill { skill: text }
            | SavedItem::Course { course: text } => text,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum SavedSkills {
    /// Flat list from the form.
    List(Vec<SavedItem>),
    /// Already categorized skills.
    Categories(SkillSet),
}

impl Default for SavedSkills {
    fn default() -> Self {
        SavedSkills::List(Vec::new())
    }
}

/// A resume in the saved-history shape.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SavedResume {
    pub contacts: SavedContacts,
    pub education: Vec<SavedEducation>,
    pub experience: Vec<SavedExperience>,
    pub projects: Vec<SavedProject>,
    pub skills: SavedSkills,
    #[serde(alias = "relevant_coursework")]
    pub coursework: Vec<SavedItem>,
}

impl SavedResume {
    pub fn from_json_str(json: &str) -> Result<Self, RecordError> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        Self::from_json_value(value)
    }

    pub fn from_json_value(mut value: serde_json::Value) -> Result<Self, RecordError> {
        if !value.is_object() {
            return Err(RecordError::shape("$", "an object"));
        }
        model::strip_nulls(&mut value);
        Ok(serde_json::from_value(value)?)
    }

    /// Converts into a record, filing a flat skill list under `skills_category`.
    pub fn into_record_with_category(self, skills_category: &str) -> ResumeRecord {
        let contacts = &self.contacts;
        let header = Header {
            name: contacts.full_name(),
            phone: present(&contacts.phone),
            email: present(&contacts.email),
            linkedin: present(&contacts.linked_in),
            github: present(&contacts.github),
        };

        let education = self
            .education
            .into_iter()
            .map(|entry| EducationEntry {
                duration: duration(&entry.start, &entry.end),
                degree: entry.degree,
                institution: entry.institute,
                grade: String::new(),
            })
            .collect();

        let experience = self
            .experience
            .into_iter()
            .map(|entry| ExperienceEntry {
                duration: duration(&entry.start, &entry.end),
                bullets: description_bullets(&entry.desc),
                role: entry.role,
                company: entry.company,
            })
            .collect();

        let projects = self
            .projects
            .into_iter()
            .map(|entry| {
                let mut bullets = description_bullets(&entry.desc);
                if !model::is_blank(&entry.mem) {
                    bullets.push(format!("Team: {}", entry.mem.trim()));
                }
                ProjectEntry {
                    title: join_present([&entry.name, &entry.url], " | "),
                    bullets,
                }
            })
            .collect();

        let skills = match self.skills {
            SavedSkills::Categories(skills) => skills,
            SavedSkills::List(items) => {
                let names: Vec<String> = items
                    .iter()
                    .map(|item| item.text().trim())
                    .filter(|text| !text.is_empty())
                    .map(str::to_owned)
                    .collect();
                let mut skills = SkillSet::new();
                if !names.is_empty() {
                    skills.insert(skills_category, names);
                }
                skills
            }
        };

        ResumeRecord {
            header: Some(header),
            summary: None,
            education,
            experience,
            projects,
            coursework: self
                .coursework
                .iter()
                .map(|item| item.text().trim().to_owned())
                .collect(),
            skills,
        }
    }
}

impl From<SavedResume> for ResumeRecord {
    fn from(saved: SavedResume) -> Self {
        saved.into_record_with_category(DEFAULT_SKILLS_CATEGORY)
    }
}

fn present(value: &str) -> Option<String> {
    match value.trim() {
        "" => None,
        trimmed => Some(trimmed.to_owned()),
    }
}

fn join_present<'a>(parts: impl IntoIterator<Item = &'a String>, separator: &str) -> String {
    parts
        .into_iter()
        .map(|part| part.trim())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(separator)
}

fn duration(start: &str, end: &str) -> String {
    match (start.trim(), end.trim()) {
        ("", "") => String::new(),
        (start, "") => start.to_owned(),
        ("", end) => end.to_owned(),
        (start, end) => format!("{start} - {end}"),
    }
}

/// Removes a leading `•`, or a `-`, `*` or `–` followed by whitespace.
fn strip_bullet_marker(line: &str) -> &str {
    let line = line.trim();
    if let Some(rest) = line.strip_prefix('\u{2022}') {
        return rest.trim_start();
    }
    for marker in ['-', '*', '\u{2013}'] {
        if let Some(rest) = line.strip_prefix(marker) {
            if rest.starts_with(char::is_whitespace) {
                return rest.trim_start();
            }
        }
    }
    line
}

/// Splits a free-text description into bullets, one per non-empty line.
fn description_bullets(desc: &str) -> Vec<String> {
    desc.lines()
        .map(strip_bullet_marker)
        .filter(|line| !line.is_empty())
        .map(str::to_owned)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn saved() -> SavedResume {
        SavedResume::from_json_value(json!({
            "contacts": {
                "f_name": "Ada", "m_name": "", "l_name": "Lovelace",
                "email": "ada@example.com", "phone": "555-0100",
                "linked_in": "linkedin.com/in/ada", "github": null
            },
            "education": [{"degree": "B.Sc. Mathematics", "institute": "London University",
                           "start": "2019", "end": "2023"}],
            "experience": [{"company": "Analytical Engines", "role": "Engineer",
                            "start": "2023-06", "end": "",
                            "desc": "- Wrote the first **program**\n\n\u{2022} Debugged the mill\n"}],
            "projects": [{"name": "Notes", "url": "github.com/ada/notes", "mem": "2",
                          "desc": "Annotated a paper"}],
            "skills": ["Rust", {"skill": "Go"}, "  "],
            "relevant_coursework": [{"course": "Algorithms"}, "Compilers"],
            "job_description": {"title": "ignored"}
        }))
        .expect("saved resume parses")
    }

    #[test]
    fn contacts_become_header() {
        let record = ResumeRecord::from(saved());
        let header = record.header().expect("header");
        assert_eq!(header.name, "Ada Lovelace");
        assert_eq!(
            header.contact_fields(),
            ["555-0100", "ada@example.com", "linkedin.com/in/ada"]
        );
    }

    #[test]
    fn entries_get_durations_and_bullets() {
        let record = ResumeRecord::from(saved());
        assert_eq!(record.education[0].duration, "2019 - 2023");
        assert_eq!(record.education[0].institution, "London University");

        let job = &record.experience[0];
        assert_eq!(job.duration, "2023-06");
        assert_eq!(
            job.bullets,
            ["Wrote the first **program**", "Debugged the mill"]
        );

        let project = &record.projects[0];
        assert_eq!(project.title, "Notes | github.com/ada/notes");
        assert_eq!(project.bullets, ["Annotated a paper", "Team: 2"]);
    }

    #[test]
    fn flat_skills_land_in_one_category() {
        let record = saved().into_record_with_category("Technical");
        let categories = record.skills.categories();
        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0].name, "Technical");
        assert_eq!(categories[0].skills, ["Rust", "Go"]);
        assert_eq!(record.coursework, ["Algorithms", "Compilers"]);
    }

    #[test]
    fn categorized_skills_pass_through() {
        let saved = SavedResume::from_json_value(json!({
            "skills": {"Languages": ["Rust"], "Tools": ["Git"]}
        }))
        .expect("parses");
        let record = ResumeRecord::from(saved);
        let names: Vec<_> = record.skills.categories().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Languages", "Tools"]);
    }

    #[test]
    fn non_object_is_rejected() {
        let err = SavedResume::from_json_value(json!([1, 2])).unwrap_err();
        assert!(matches!(err, RecordError::Shape { .. }));
    }

    #[test]
    fn bold_markup_at_line_start_is_kept() {
        assert_eq!(
            description_bullets("**Led** a team of 4\n* Shipped v2\n-3% churn"),
            ["**Led** a team of 4", "Shipped v2", "-3% churn"]
        );
    }

    #[test]
    fn duration_handles_missing_ends() {
        assert_eq!(duration(" ", ""), "");
        assert_eq!(duration("", "2024"), "2024");
        assert_eq!(duration("2020", "2021"), "2020 - 2021");
    }
}
