use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use std::collections::HashSet;
use std::path::Path;

use crate::models::Posting;

/// Read-only list of postings. Nothing mutates it once built.
#[derive(Debug, Clone)]
pub struct Catalog {
    postings: Vec<Posting>,
}

impl Catalog {
    pub fn new(postings: Vec<Posting>) -> Result<Self> {
        if postings.is_empty() {
            return Err(anyhow!("Catalog contains no postings"));
        }
        let mut seen = HashSet::new();
        for posting in &postings {
            if !seen.insert(posting.id) {
                return Err(anyhow!("Duplicate posting id {} in catalog", posting.id));
            }
        }
        Ok(Self { postings })
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let postings: Vec<Posting> =
            serde_json::from_str(json).context("Failed to parse catalog JSON")?;
        Self::new(postings)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read catalog file: {}", path.display()))?;
        Self::from_json(&json).with_context(|| format!("Invalid catalog file: {}", path.display()))
    }

    pub fn sample() -> Self {
        Self {
            postings: sample_postings(),
        }
    }

    pub fn get(&self, id: u32) -> Option<&Posting> {
        self.postings.iter().find(|p| p.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Posting> {
        self.postings.iter()
    }

    pub fn postings(&self) -> &[Posting] {
        &self.postings
    }

    pub fn len(&self) -> usize {
        self.postings.len()
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or(NaiveDate::MIN)
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn sample_postings() -> Vec<Posting> {
    vec![
        Posting {
            id: 1,
            title: "Frontend Developer Intern".to_string(),
            company: "Tech Solutions Inc.".to_string(),
            location: "Remote".to_string(),
            kind: "Full-time".to_string(),
            duration: "3 months".to_string(),
            stipend: "$2,000/month".to_string(),
            posted_date: date(2024, 1, 15),
            description: "We are looking for a frontend developer intern with React experience."
                .to_string(),
            skills: strings(&["React", "JavaScript", "CSS"]),
            requirements: "Currently enrolled in Computer Science program, knowledge of React and modern JavaScript."
                .to_string(),
        },
        Posting {
            id: 2,
            title: "Backend Developer Intern".to_string(),
            company: "Data Systems LLC".to_string(),
            location: "New York, NY".to_string(),
            kind: "Part-time".to_string(),
            duration: "6 months".to_string(),
            stipend: "$1,800/month".to_string(),
            posted_date: date(2024, 1, 10),
            description: "Join our backend team working on scalable systems.".to_string(),
            skills: strings(&["Node.js", "MySQL", "API Development"]),
            requirements: "Experience with Node.js and databases, understanding of RESTful APIs."
                .to_string(),
        },
        Posting {
            id: 3,
            title: "UI/UX Design Intern".to_string(),
            company: "Creative Designs Co.".to_string(),
            location: "San Francisco, CA".to_string(),
            kind: "Full-time".to_string(),
            duration: "4 months".to_string(),
            stipend: "$1,900/month".to_string(),
            posted_date: date(2024, 1, 12),
            description: "Create beautiful and functional user interfaces.".to_string(),
            skills: strings(&["Figma", "UI Design", "User Research"]),
            requirements: "Portfolio required, proficiency in Figma, understanding of design principles."
                .to_string(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_catalog_has_unique_ids() {
        let catalog = Catalog::sample();
        assert_eq!(catalog.len(), 3);
        let ids: Vec<u32> = catalog.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert!(Catalog::new(catalog.postings().to_vec()).is_ok());
    }

    #[test]
    fn test_get_by_id() {
        let catalog = Catalog::sample();
        assert_eq!(catalog.get(2).map(|p| p.company.as_str()), Some("Data Systems LLC"));
        assert!(catalog.get(99).is_none());
    }

    #[test]
    fn test_from_json_rejects_duplicate_ids() {
        let mut postings = Catalog::sample().postings().to_vec();
        postings[2].id = 1;
        let json = serde_json::to_string(&postings).unwrap();
        let err = Catalog::from_json(&json).unwrap_err();
        assert!(err.to_string().contains("Duplicate posting id 1"));
    }

    #[test]
    fn test_from_json_rejects_empty_catalog() {
        assert!(Catalog::from_json("[]").is_err());
        assert!(Catalog::from_json("not json").is_err());
    }

    #[test]
    fn test_from_json_accepts_sample_shape() {
        let json = serde_json::to_string(Catalog::sample().postings()).unwrap();
        assert!(json.contains("\"postedDate\":\"2024-01-15\""));
        assert!(json.contains("\"type\":\"Full-time\""));
        let catalog = Catalog::from_json(&json).unwrap();
        assert_eq!(catalog.postings(), Catalog::sample().postings());
    }
}
