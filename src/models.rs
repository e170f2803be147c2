use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Posting {
    pub id: u32,
    pub title: String,
    pub company: String,
    pub location: String,
    #[serde(rename = "type")]
    pub kind: String, // "Full-time", "Part-time"
    pub duration: String,
    pub stipend: String,
    pub posted_date: NaiveDate,
    pub description: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub requirements: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[allow(dead_code)] // only Pending is produced by submission
pub enum ApplicationStatus {
    Pending,
    Accepted,
    Rejected,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "Pending",
            ApplicationStatus::Accepted => "Accepted",
            ApplicationStatus::Rejected => "Rejected",
        }
    }
}

/// Fields the applicant fills in. The resume is tracked by file name only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationForm {
    pub cover_letter: String,
    pub resume_file_name: String,
    pub available_start_date: String,
    pub expected_graduation: String,
    pub additional_info: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    pub internship: Posting, // snapshot taken at submission
    pub cover_letter: String,
    pub resume_file_name: String,
    pub available_start_date: String,
    pub expected_graduation: String,
    pub additional_info: String,
    pub submitted_date: DateTime<Utc>,
    pub status: ApplicationStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub university: String,
    pub major: String,
    pub graduation_year: String,
    pub gpa: String,
    pub skills: String, // comma-separated, free text
    pub bio: String,
    pub linkedin: String,
    pub github: String,
    pub portfolio: String,
}

impl UserProfile {
    /// Profile every session starts with.
    pub fn sample() -> Self {
        Self {
            full_name: "John Doe".to_string(),
            email: "john.doe@example.com".to_string(),
            phone: "+1 (555) 123-4567".to_string(),
            university: "State University".to_string(),
            major: "Computer Science".to_string(),
            graduation_year: "2025".to_string(),
            gpa: "3.8".to_string(),
            skills: "React, JavaScript, Node.js, Python".to_string(),
            bio: "Passionate computer science student seeking internship opportunities.".to_string(),
            linkedin: "https://linkedin.com/in/johndoe".to_string(),
            github: "https://github.com/johndoe".to_string(),
            portfolio: "https://johndoe.dev".to_string(),
        }
    }
}

pub const COMPANY_SIZES: &[&str] = &["1-10", "11-50", "51-200", "201-500", "501+"];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyProfile {
    pub company_name: String,
    pub industry: String,
    pub website: String,
    pub location: String,
    pub size: String, // one of COMPANY_SIZES, or empty
    pub description: String,
    pub contact_email: String,
    pub contact_phone: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Tab {
    #[default]
    Browse,
    Applications,
    Saved,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Browse, Tab::Applications, Tab::Saved];

    pub fn index(&self) -> usize {
        match self {
            Tab::Browse => 0,
            Tab::Applications => 1,
            Tab::Saved => 2,
        }
    }

    pub fn next(&self) -> Tab {
        Tab::ALL[(self.index() + 1) % Tab::ALL.len()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(dead_code)]
pub enum Severity {
    Success,
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub severity: Severity,
    pub visible: bool,
    pub raised_at: DateTime<Utc>,
}

/// Visibility flags for the four dialogs. Each one is independent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Dialogs {
    pub application: bool,
    pub details: bool,
    pub profile: bool,
    pub company: bool,
}

impl Dialogs {
    pub fn any_open(&self) -> bool {
        self.application || self.details || self.profile || self.company
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_posting_uses_camel_case_and_type_key() {
        let json = r#"{
            "id": 7,
            "title": "Data Intern",
            "company": "Acme",
            "location": "Remote",
            "type": "Part-time",
            "duration": "2 months",
            "stipend": "$1,000/month",
            "postedDate": "2024-02-01",
            "description": "Crunch numbers.",
            "skills": ["SQL"],
            "requirements": "None."
        }"#;
        let posting: Posting = serde_json::from_str(json).unwrap();
        assert_eq!(posting.kind, "Part-time");
        assert_eq!(posting.posted_date, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        assert_eq!(posting.skills, vec!["SQL".to_string()]);
    }

    #[test]
    fn test_tab_next_wraps() {
        assert_eq!(Tab::Browse.next(), Tab::Applications);
        assert_eq!(Tab::Applications.next(), Tab::Saved);
        assert_eq!(Tab::Saved.next(), Tab::Browse);
    }

    #[test]
    fn test_dialogs_any_open() {
        let mut dialogs = Dialogs::default();
        assert!(!dialogs.any_open());
        dialogs.company = true;
        assert!(dialogs.any_open());
    }
}
