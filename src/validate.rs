//! Advisory check for required form fields.
//!
//! Rendering never consults this: a record with missing fields still renders whatever it has.
//! The CLI's `check` command and form front ends use the report to prompt the user before saving.

use crate::legacy::SavedResume;
use crate::model::{is_blank, ResumeRecord};

/// Labels of required fields that are blank, in form order.
///
/// The header needs a name, an email and a phone number; every education row needs an
/// institution, every experience row a company and every project a title.
pub fn missing_fields(record: &ResumeRecord) -> Vec<String> {
    let mut missing = Vec::new();
    let header = record.header.as_ref();
    let name = header.map(|h| h.name.as_str()).unwrap_or_default();
    let email = header.and_then(|h| h.email.as_deref()).unwrap_or_default();
    let phone = header.and_then(|h| h.phone.as_deref()).unwrap_or_default();

    for (label, value) in [("Name", name), ("Email", email), ("Phone", phone)] {
        if is_blank(value) {
            missing.push(label.to_owned());
        }
    }

    push_rows(
        &mut missing,
        "Education",
        "Institution",
        record.education.iter().map(|e| e.institution.as_str()),
    );
    push_rows(
        &mut missing,
        "Experience",
        "Company",
        record.experience.iter().map(|e| e.company.as_str()),
    );
    push_rows(
        &mut missing,
        "Project",
        "Title",
        record.projects.iter().map(|p| p.title.as_str()),
    );
    missing
}

/// Same check on the saved-history shape, where the name is split into first and last name.
pub fn missing_saved_fields(saved: &SavedResume) -> Vec<String> {
    let contacts = &saved.contacts;
    let mut missing: Vec<String> = [
        ("First Name", &contacts.f_name),
        ("Last Name", &contacts.l_name),
        ("Email", &contacts.email),
        ("Phone", &contacts.phone),
    ]
    .into_iter()
    .filter(|(_, value)| is_blank(value))
    .map(|(label, _)| label.to_owned())
    .collect();

    push_rows(
        &mut missing,
        "Education",
        "Institute",
        saved.education.iter().map(|e| e.institute.as_str()),
    );
    push_rows(
        &mut missing,
        "Experience",
        "Company",
        saved.experience.iter().map(|e| e.company.as_str()),
    );
    push_rows(
        &mut missing,
        "Project",
        "Name",
        saved.projects.iter().map(|p| p.name.as_str()),
    );
    missing
}

fn push_rows<'a>(
    missing: &mut Vec<String>,
    section: &str,
    field: &str,
    values: impl Iterator<Item = &'a str>,
) {
    for (index, value) in values.enumerate() {
        if is_blank(value) {
            missing.push(format!("{section} #{} {field}", index + 1));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EducationEntry, ExperienceEntry, Header, ProjectEntry};
    use serde_json::json;

    #[test]
    fn complete_record_has_nothing_missing() {
        let record = ResumeRecord {
            header: Some(
                Header::new("Jane Doe")
                    .with_email("jane@example.com")
                    .with_phone("555-0100"),
            ),
            education: vec![EducationEntry {
                institution: "MIT".into(),
                ..EducationEntry::default()
            }],
            ..ResumeRecord::default()
        };
        assert!(missing_fields(&record).is_empty());
    }

    #[test]
    fn rows_are_numbered_from_one() {
        let record = ResumeRecord {
            header: Some(Header::new("Jane Doe").with_email(" ")),
            experience: vec![
                ExperienceEntry {
                    company: "Acme".into(),
                    ..ExperienceEntry::default()
                },
                ExperienceEntry::default(),
            ],
            projects: vec![ProjectEntry::default()],
            ..ResumeRecord::default()
        };
        assert_eq!(
            missing_fields(&record),
            ["Email", "Phone", "Experience #2 Company", "Project #1 Title"]
        );
    }

    #[test]
    fn missing_header_reports_all_contact_fields() {
        assert_eq!(
            missing_fields(&ResumeRecord::default()),
            ["Name", "Email", "Phone"]
        );
    }

    #[test]
    fn saved_shape_checks_first_and_last_name() {
        let saved = SavedResume::from_json_value(json!({
            "contacts": {"f_name": "Ada", "email": "ada@example.com", "phone": "1"},
            "education": [{"degree": "BSc"}]
        }))
        .expect("parses");
        assert_eq!(
            missing_saved_fields(&saved),
            ["Last Name", "Education #1 Institute"]
        );
    }
}
