use crate::models::Posting;

/// Location choices offered by the browse screen, as (slug, label).
pub const LOCATIONS: [(&str, &str); 4] = [
    ("", "All Locations"),
    ("remote", "Remote"),
    ("new-york", "New York"),
    ("san-francisco", "San Francisco"),
];

pub const TYPES: [(&str, &str); 3] = [
    ("", "All Types"),
    ("full-time", "Full-time"),
    ("part-time", "Part-time"),
];

/// Browse-view filter. An empty criterion matches every posting.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchFilters {
    pub query: String,
    pub location: String,
    pub kind: String,
}

impl SearchFilters {
    pub fn is_empty(&self) -> bool {
        self.query.trim().is_empty() && self.location.is_empty() && self.kind.is_empty()
    }

    pub fn matches(&self, posting: &Posting) -> bool {
        self.matches_query(posting) && self.matches_location(posting) && self.matches_kind(posting)
    }

    fn matches_query(&self, posting: &Posting) -> bool {
        let query = self.query.trim().to_lowercase();
        if query.is_empty() {
            return true;
        }
        posting.title.to_lowercase().contains(&query)
            || posting.company.to_lowercase().contains(&query)
            || posting.skills.iter().any(|s| s.to_lowercase().contains(&query))
    }

    fn matches_location(&self, posting: &Posting) -> bool {
        if self.location.is_empty() {
            return true;
        }
        // "New York, NY" is compared by its city part
        let city = posting.location.split(',').next().unwrap_or_default();
        slugify(city) == self.location
    }

    fn matches_kind(&self, posting: &Posting) -> bool {
        self.kind.is_empty() || slugify(&posting.kind) == self.kind
    }

    pub fn cycle_location(&mut self) {
        self.location = next_slug(&LOCATIONS, &self.location);
    }

    pub fn cycle_kind(&mut self) {
        self.kind = next_slug(&TYPES, &self.kind);
    }

    pub fn location_label(&self) -> &'static str {
        label_for(&LOCATIONS, &self.location)
    }

    pub fn kind_label(&self) -> &'static str {
        label_for(&TYPES, &self.kind)
    }

    pub fn apply<'a>(&self, postings: &'a [Posting]) -> Vec<&'a Posting> {
        postings.iter().filter(|p| self.matches(p)).collect()
    }
}

pub fn slugify(text: &str) -> String {
    text.trim()
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

fn next_slug(choices: &[(&str, &str)], current: &str) -> String {
    let idx = choices.iter().position(|(slug, _)| *slug == current).unwrap_or(0);
    choices[(idx + 1) % choices.len()].0.to_string()
}

fn label_for(choices: &[(&str, &'static str)], slug: &str) -> &'static str {
    choices
        .iter()
        .find(|(s, _)| *s == slug)
        .map(|(_, label)| *label)
        .unwrap_or(choices[0].1)
}
