use chrono::Local;

use crate::filters::SearchFilters;
use crate::models::{ApplicationStatus, Posting, Tab};
use crate::session::Session;

pub const NO_APPLICATIONS: &str = "No applications yet. Start applying to internships!";
pub const NO_SAVED: &str =
    "No saved internships yet. Browse and save internships you're interested in!";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowseRow<'a> {
    pub posting: &'a Posting,
    pub saved: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationRow {
    pub position: String,
    pub company: String,
    pub applied_date: String,
    pub status: ApplicationStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplicationsView {
    Empty(&'static str),
    Rows(Vec<ApplicationRow>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SavedView<'a> {
    Empty(&'static str),
    Postings(Vec<&'a Posting>),
}

pub fn browse_view<'a>(session: &'a Session, filters: &SearchFilters) -> Vec<BrowseRow<'a>> {
    filters
        .apply(session.catalog().postings())
        .into_iter()
        .map(|posting| BrowseRow {
            posting,
            saved: session.is_saved(posting.id),
        })
        .collect()
}

/// Oldest submission first.
pub fn applications_view(session: &Session) -> ApplicationsView {
    if session.applications().is_empty() {
        return ApplicationsView::Empty(NO_APPLICATIONS);
    }
    let rows = session
        .applications()
        .iter()
        .map(|app| ApplicationRow {
            position: app.internship.title.clone(),
            company: app.internship.company.clone(),
            applied_date: app
                .submitted_date
                .with_timezone(&Local)
                .format("%Y-%m-%d")
                .to_string(),
            status: app.status,
        })
        .collect();
    ApplicationsView::Rows(rows)
}

/// Saved postings in catalog order, whatever order they were saved in.
pub fn saved_view(session: &Session) -> SavedView<'_> {
    let saved: Vec<&Posting> = session
        .catalog()
        .iter()
        .filter(|p| session.is_saved(p.id))
        .collect();
    if saved.is_empty() {
        SavedView::Empty(NO_SAVED)
    } else {
        SavedView::Postings(saved)
    }
}

pub fn tab_label(tab: Tab, session: &Session) -> String {
    match tab {
        Tab::Browse => "Browse Internships".to_string(),
        Tab::Applications => format!("My Applications ({})", session.applications().len()),
        Tab::Saved => format!("Saved ({})", session.saved_ids().len()),
    }
}
