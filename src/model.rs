//! Canonical resume content handed to the renderer.
//!
//! A [`ResumeRecord`] is built by the calling layer (the form, the saved-history loader in
//! [`crate::legacy`], or the model-response parser in [`crate::response`]) and is read-only while
//! a document is assembled.  Every field is optional; the `is_empty` helpers decide which sections
//! the assembler visits.
//!
//! The serde representation accepts the field names that drifted between revisions of the form
//! (`contacts`, `institute`, `name`, `relevant_coursework`) as aliases so older payloads still
//! deserialize into the canonical shape.

use std::fmt;

use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::RecordError;

/// Returns `true` when the string is empty after trimming.
pub(crate) fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Contact block shown at the top of the document.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Header {
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    #[serde(alias = "linked_in")]
    pub linkedin: Option<String>,
    pub github: Option<String>,
}

impl Header {
    /// Creates a header with just a name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Sets the email address and returns the updated header.
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Sets the phone number and returns the updated header.
    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    /// Sets the LinkedIn URL and returns the updated header.
    pub fn with_linkedin(mut self, linkedin: impl Into<String>) -> Self {
        self.linkedin = Some(linkedin.into());
        self
    }

    /// Sets the GitHub URL and returns the updated header.
    pub fn with_github(mut self, github: impl Into<String>) -> Self {
        self.github = Some(github.into());
        self
    }

    /// Present contact fields in display order: phone, email, LinkedIn, GitHub.
    pub fn contact_fields(&self) -> Vec<&str> {
        [&self.phone, &self.email, &self.linkedin, &self.github]
            .into_iter()
            .filter_map(|field| field.as_deref())
            .map(str::trim)
            .filter(|field| !field.is_empty())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        is_blank(&self.name) && self.contact_fields().is_empty()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EducationEntry {
    pub degree: String,
    #[serde(alias = "institute")]
    pub institution: String,
    pub duration: String,
    pub grade: String,
}

impl EducationEntry {
    pub fn is_blank(&self) -> bool {
        [&self.degree, &self.institution, &self.duration, &self.grade]
            .into_iter()
            .all(|field| is_blank(field))
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperienceEntry {
    pub role: String,
    pub company: String,
    pub duration: String,
    pub bullets: Vec<String>,
}

impl ExperienceEntry {
    pub fn is_blank(&self) -> bool {
        is_blank(&self.role)
            && is_blank(&self.company)
            && is_blank(&self.duration)
            && self.bullets.iter().all(|bullet| is_blank(bullet))
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectEntry {
    #[serde(alias = "name")]
    pub title: String,
    pub bullets: Vec<String>,
}

impl ProjectEntry {
    pub fn is_blank(&self) -> bool {
        is_blank(&self.title) && self.bullets.iter().all(|bullet| is_blank(bullet))
    }
}

/// One row of the skills section.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SkillCategory {
    pub name: String,
    pub skills: Vec<String>,
}

impl SkillCategory {
    pub fn new<I, S>(name: impl Into<String>, skills: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            skills: skills.into_iter().map(Into::into).collect(),
        }
    }

    /// Non-blank skills, trimmed.
    pub fn visible_skills(&self) -> Vec<&str> {
        self.skills
            .iter()
            .map(|skill| skill.trim())
            .filter(|skill| !skill.is_empty())
            .collect()
    }
}

/// Ordered mapping of category name to skills.
///
/// Serialized as a JSON object.  Deserialization walks the object in document order, so the order
/// the caller wrote the categories in is the order they are displayed in.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SkillSet {
    categories: Vec<SkillCategory>,
}

impl SkillSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends skills to `category`, creating the category if it does not exist yet.
    pub fn insert<I, S>(&mut self, category: impl Into<String>, skills: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let category = category.into();
        let skills = skills.into_iter().map(Into::into);
        match self.categories.iter_mut().find(|c| c.name == category) {
            Some(existing) => existing.skills.extend(skills),
            None => self.categories.push(SkillCategory::new(category, skills)),
        }
    }

    /// Builder-style variant of [`SkillSet::insert`].
    pub fn with<I, S>(mut self, category: impl Into<String>, skills: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.insert(category, skills);
        self
    }

    pub fn categories(&self) -> &[SkillCategory] {
        &self.categories
    }

    /// Categories that have at least one non-blank skill.
    pub fn visible_categories(&self) -> impl Iterator<Item = &SkillCategory> {
        self.categories
            .iter()
            .filter(|category| !category.visible_skills().is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.visible_categories().next().is_none()
    }
}

impl Serialize for SkillSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.categories.len()))?;
        for category in &self.categories {
            map.serialize_entry(&category.name, &category.skills)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for SkillSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SkillSetVisitor;

        impl<'de> Visitor<'de> for SkillSetVisitor {
            type Value = SkillSet;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a mapping of skill category to a list of skills")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<SkillSet, A::Error> {
                let mut set = SkillSet::new();
                while let Some((name, skills)) = access.next_entry::<String, Vec<String>>()? {
                    set.insert(name, skills);
                }
                Ok(set)
            }

            fn visit_unit<E: de::Error>(self) -> Result<SkillSet, E> {
                Ok(SkillSet::new())
            }
        }

        deserializer.deserialize_any(SkillSetVisitor)
    }
}

/// The canonical structured content of one resume.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResumeRecord {
    #[serde(alias = "contacts")]
    pub header: Option<Header>,
    pub summary: Option<String>,
    pub education: Vec<EducationEntry>,
    pub experience: Vec<ExperienceEntry>,
    pub projects: Vec<ProjectEntry>,
    #[serde(alias = "relevant_coursework")]
    pub coursework: Vec<String>,
    pub skills: SkillSet,
}

impl ResumeRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a record from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self, RecordError> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        Self::from_json_value(value)
    }

    /// Validates the structural shape of `value` and deserializes it.
    ///
    /// Missing fields and `null`s are fine; a field of the wrong kind (a string where a list of
    /// bullets is expected, say) is reported with its path.
    pub fn from_json_value(mut value: serde_json::Value) -> Result<Self, RecordError> {
        check_shape(&value)?;
        strip_nulls(&mut value);
        Ok(serde_json::from_value(value)?)
    }

    pub fn header(&self) -> Option<&Header> {
        self.header.as_ref().filter(|header| !header.is_empty())
    }

    /// Trimmed summary text, if any.
    pub fn summary(&self) -> Option<&str> {
        self.summary
            .as_deref()
            .map(str::trim)
            .filter(|summary| !summary.is_empty())
    }

    pub fn visible_education(&self) -> impl Iterator<Item = &EducationEntry> {
        self.education.iter().filter(|entry| !entry.is_blank())
    }

    pub fn visible_experience(&self) -> impl Iterator<Item = &ExperienceEntry> {
        self.experience.iter().filter(|entry| !entry.is_blank())
    }

    pub fn visible_projects(&self) -> impl Iterator<Item = &ProjectEntry> {
        self.projects.iter().filter(|entry| !entry.is_blank())
    }

    pub fn visible_coursework(&self) -> Vec<&str> {
        self.coursework
            .iter()
            .map(|course| course.trim())
            .filter(|course| !course.is_empty())
            .collect()
    }
}

fn check_shape(value: &serde_json::Value) -> Result<(), RecordError> {
    use serde_json::Value;

    let Value::Object(root) = value else {
        return Err(RecordError::shape("<root>", "an object"));
    };

    let field = |canonical: &'static str, alias: Option<&'static str>| {
        root.get(canonical)
            .map(|value| (canonical, value))
            .or_else(|| alias.and_then(|alias| root.get(alias).map(|value| (alias, value))))
            .filter(|(_, value)| !value.is_null())
    };

    if let Some((name, header)) = field("header", Some("contacts")) {
        if !header.is_object() {
            return Err(RecordError::shape(name, "an object"));
        }
    }
    if let Some((name, summary)) = field("summary", None) {
        if !summary.is_string() {
            return Err(RecordError::shape(name, "a string"));
        }
    }
    if let Some((name, skills)) = field("skills", None) {
        if !skills.is_object() {
            return Err(RecordError::shape(name, "an object of category to skill list"));
        }
    }
    if let Some((name, coursework)) = field("coursework", Some("relevant_coursework")) {
        expect_string_list(name, coursework)?;
    }

    for (section, bulleted) in [("education", false), ("experience", true), ("projects", true)] {
        let Some((_, items)) = field(section, None) else {
            continue;
        };
        let Value::Array(items) = items else {
            return Err(RecordError::shape(section, "a list"));
        };
        for (index, item) in items.iter().enumerate() {
            let Value::Object(item) = item else {
                return Err(RecordError::shape(format!("{section}[{index}]"), "an object"));
            };
            if bulleted {
                if let Some(bullets) = item.get("bullets").filter(|value| !value.is_null()) {
                    expect_string_list(&format!("{section}[{index}].bullets"), bullets)?;
                }
            }
        }
    }

    Ok(())
}

/// Drops `null` members from every object so they fall back to field defaults.
pub(crate) fn strip_nulls(value: &mut serde_json::Value) {
    match value {
        serde_json::Value::Object(map) => {
            map.retain(|_, member| !member.is_null());
            map.values_mut().for_each(strip_nulls);
        }
        serde_json::Value::Array(items) => items.iter_mut().for_each(strip_nulls),
        _ => {}
    }
}

fn expect_string_list(field: &str, value: &serde_json::Value) -> Result<(), RecordError> {
    match value.as_array() {
        Some(items) if items.iter().all(|item| item.is_string()) => Ok(()),
        _ => Err(RecordError::shape(field, "a list of strings")),
    }
}
