use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info, warn};

use crate::catalog::Catalog;
use crate::models::{
    Application, ApplicationForm, ApplicationStatus, CompanyProfile, Dialogs, Notification,
    Posting, Severity, Tab, UserProfile,
};

pub const DEFAULT_NOTIFY_MS: i64 = 4000;

/// All mutable state of one running session.
///
/// The saved set and the application list only change through
/// `toggle_saved` and `submit_application`. No operation here can fail.
pub struct Session {
    catalog: Catalog,
    saved: Vec<u32>,
    applications: Vec<Application>,
    profile: UserProfile,
    company: Option<CompanyProfile>,
    tab: Tab,
    selected: Option<u32>,
    dialogs: Dialogs,
    notification: Option<Notification>,
    notify_ttl: Duration,
}

impl Session {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            saved: Vec::new(),
            applications: Vec::new(),
            profile: UserProfile::sample(),
            company: None,
            tab: Tab::Browse,
            selected: None,
            dialogs: Dialogs::default(),
            notification: None,
            notify_ttl: Duration::milliseconds(DEFAULT_NOTIFY_MS),
        }
    }

    pub fn with_notify_ttl(mut self, notify_ttl: Duration) -> Self {
        self.notify_ttl = notify_ttl;
        self
    }

    // --- Read accessors ---

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn saved_ids(&self) -> &[u32] {
        &self.saved
    }

    pub fn is_saved(&self, posting_id: u32) -> bool {
        self.saved.contains(&posting_id)
    }

    pub fn applications(&self) -> &[Application] {
        &self.applications
    }

    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    pub fn company(&self) -> Option<&CompanyProfile> {
        self.company.as_ref()
    }

    pub fn tab(&self) -> Tab {
        self.tab
    }

    pub fn selected_posting(&self) -> Option<&Posting> {
        self.selected.and_then(|id| self.catalog.get(id))
    }

    pub fn dialogs(&self) -> Dialogs {
        self.dialogs
    }

    /// The notification, if one is currently shown.
    pub fn notification(&self) -> Option<&Notification> {
        self.notification.as_ref().filter(|n| n.visible)
    }

    // --- Saved set ---

    pub fn toggle_saved(&mut self, posting_id: u32) {
        self.toggle_saved_at(posting_id, Utc::now());
    }

    pub fn toggle_saved_at(&mut self, posting_id: u32, now: DateTime<Utc>) {
        if self.catalog.get(posting_id).is_none() {
            warn!(posting_id, "toggle_saved for unknown posting ignored");
            return;
        }
        if let Some(pos) = self.saved.iter().position(|id| *id == posting_id) {
            self.saved.remove(pos);
            info!(posting_id, "posting removed from saved");
            self.notify_at("Internship removed from saved", Severity::Info, now);
        } else {
            self.saved.push(posting_id);
            info!(posting_id, "posting saved");
            self.notify_at("Internship saved!", Severity::Success, now);
        }
    }

    // --- Applications ---

    pub fn submit_application(&mut self, form: ApplicationForm, posting: Posting) {
        self.submit_application_at(form, posting, Utc::now());
    }

    pub fn submit_application_at(
        &mut self,
        form: ApplicationForm,
        posting: Posting,
        now: DateTime<Utc>,
    ) {
        info!(posting_id = posting.id, title = %posting.title, "application submitted");
        self.applications.push(Application {
            internship: posting,
            cover_letter: form.cover_letter,
            resume_file_name: form.resume_file_name,
            available_start_date: form.available_start_date,
            expected_graduation: form.expected_graduation,
            additional_info: form.additional_info,
            submitted_date: now,
            status: ApplicationStatus::Pending,
        });
        self.dialogs.application = false;
        self.notify_at("Application submitted successfully!", Severity::Success, now);
    }

    /// Submits against the currently selected posting. Without a selection
    /// this does nothing.
    pub fn submit_for_selected(&mut self, form: ApplicationForm) {
        let Some(posting) = self.selected_posting().cloned() else {
            warn!("application submitted with no posting selected");
            return;
        };
        self.submit_application(form, posting);
    }

    // --- Profiles ---

    pub fn save_profile(&mut self, profile: UserProfile) {
        info!(full_name = %profile.full_name, "profile saved");
        self.profile = profile;
        self.dialogs.profile = false;
        self.notify_at("Profile updated successfully!", Severity::Success, Utc::now());
    }

    pub fn save_company(&mut self, company: CompanyProfile) {
        info!(company_name = %company.company_name, "company profile saved");
        self.company = Some(company);
        self.dialogs.company = false;
        self.notify_at("Company profile saved!", Severity::Success, Utc::now());
    }

    // --- Selection and dialogs ---

    pub fn select_posting(&mut self, posting_id: u32) -> bool {
        if self.catalog.get(posting_id).is_none() {
            warn!(posting_id, "selection of unknown posting ignored");
            return false;
        }
        self.selected = Some(posting_id);
        true
    }

    pub fn open_details(&mut self, posting_id: u32) {
        if self.select_posting(posting_id) {
            debug!(posting_id, "details dialog opened");
            self.dialogs.details = true;
        }
    }

    pub fn open_apply(&mut self, posting_id: u32) {
        if self.select_posting(posting_id) {
            debug!(posting_id, "application dialog opened");
            self.dialogs.application = true;
        }
    }

    /// "Apply" from the details dialog: details closes, apply opens for the
    /// same posting.
    pub fn apply_from_details(&mut self) {
        self.dialogs.details = false;
        if let Some(id) = self.selected {
            self.open_apply(id);
        }
    }

    pub fn open_profile(&mut self) {
        self.dialogs.profile = true;
    }

    pub fn open_company(&mut self) {
        self.dialogs.company = true;
    }

    pub fn close_application(&mut self) {
        self.dialogs.application = false;
    }

    pub fn close_details(&mut self) {
        self.dialogs.details = false;
    }

    pub fn close_profile(&mut self) {
        self.dialogs.profile = false;
    }

    pub fn close_company(&mut self) {
        self.dialogs.company = false;
    }

    pub fn change_tab(&mut self, tab: Tab) {
        self.tab = tab;
    }

    // --- Notification ---

    pub fn notify_at(&mut self, message: &str, severity: Severity, now: DateTime<Utc>) {
        self.notification = Some(Notification {
            message: message.to_string(),
            severity,
            visible: true,
            raised_at: now,
        });
    }

    pub fn dismiss_notification(&mut self) {
        if let Some(n) = self.notification.as_mut() {
            n.visible = false;
        }
    }

    /// Hides the notification once it has been shown for the auto-hide
    /// duration.
    pub fn tick(&mut self, now: DateTime<Utc>) {
        if let Some(n) = self.notification.as_mut() {
            if n.visible && now - n.raised_at >= self.notify_ttl {
                n.visible = false;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn session() -> Session {
        Session::new(Catalog::sample())
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 2, 1, 9, 0, 0).unwrap()
    }

    fn posting(s: &Session, id: u32) -> Posting {
        s.catalog().get(id).cloned().unwrap()
    }

    #[test]
    fn test_toggle_saved_twice_restores_membership() {
        let mut s = session();
        for id in [1, 2, 3] {
            let before = s.is_saved(id);
            s.toggle_saved(id);
            assert_ne!(s.is_saved(id), before);
            s.toggle_saved(id);
            assert_eq!(s.is_saved(id), before);
        }

        s.toggle_saved(2);
        let before: Vec<u32> = s.saved_ids().to_vec();
        s.toggle_saved(3);
        s.toggle_saved(3);
        assert_eq!(s.saved_ids(), before.as_slice());
    }

    #[test]
    fn test_toggle_saved_notifications() {
        let mut s = session();
        s.toggle_saved(1);
        let n = s.notification().unwrap();
        assert_eq!(n.message, "Internship saved!");
        assert_eq!(n.severity, Severity::Success);

        s.toggle_saved(1);
        let n = s.notification().unwrap();
        assert_eq!(n.message, "Internship removed from saved");
        assert_eq!(n.severity, Severity::Info);
    }

    #[test]
    fn test_saved_id_appears_at_most_once() {
        let mut s = session();
        s.toggle_saved(1);
        s.toggle_saved(2);
        s.toggle_saved(1);
        s.toggle_saved(1);
        assert_eq!(s.saved_ids(), &[2u32, 1]);
    }

    #[test]
    fn test_toggle_unknown_posting_is_ignored() {
        let mut s = session();
        s.toggle_saved(42);
        assert!(s.saved_ids().is_empty());
        assert!(s.notification().is_none());
    }

    #[test]
    fn test_submit_twice_yields_two_pending_entries() {
        let mut s = session();
        let p = posting(&s, 1);
        s.open_apply(1);
        s.submit_application_at(ApplicationForm::default(), p.clone(), t0());
        s.submit_application_at(
            ApplicationForm {
                cover_letter: "Second try".into(),
                ..Default::default()
            },
            p,
            t0() + Duration::minutes(5),
        );

        let apps = s.applications();
        assert_eq!(apps.len(), 2);
        assert!(apps.iter().all(|a| a.status == ApplicationStatus::Pending));
        assert_eq!(apps[0].internship.id, 1);
        assert_eq!(apps[1].cover_letter, "Second try");
        assert!(apps[0].submitted_date < apps[1].submitted_date);
    }

    #[test]
    fn test_submit_does_not_touch_saved_profile_or_catalog() {
        let mut s = session();
        s.toggle_saved(3);
        let saved = s.saved_ids().to_vec();
        let profile = s.profile().clone();
        let catalog = s.catalog().postings().to_vec();

        let p = posting(&s, 2);
        s.submit_application(ApplicationForm::default(), p);

        assert_eq!(s.saved_ids(), saved.as_slice());
        assert_eq!(s.profile(), &profile);
        assert_eq!(s.catalog().postings(), catalog.as_slice());
    }

    #[test]
    fn test_submit_closes_dialog_and_notifies() {
        let mut s = session();
        s.open_apply(2);
        assert!(s.dialogs().application);
        s.submit_for_selected(ApplicationForm::default());
        assert!(!s.dialogs().application);
        assert_eq!(s.applications().len(), 1);
        assert_eq!(s.applications()[0].internship.id, 2);
        assert_eq!(
            s.notification().map(|n| n.message.as_str()),
            Some("Application submitted successfully!")
        );
    }

    #[test]
    fn test_submit_for_selected_without_selection_is_noop() {
        let mut s = session();
        s.submit_for_selected(ApplicationForm::default());
        assert!(s.applications().is_empty());
    }

    #[test]
    fn test_save_profile_replaces_wholesale() {
        let mut s = session();
        let new_profile = UserProfile {
            full_name: "Jane Roe".into(),
            email: "not-an-email".into(),
            ..Default::default()
        };
        s.save_profile(new_profile.clone());
        assert_eq!(s.profile(), &new_profile);
        assert_eq!(s.profile().university, "");
        assert_eq!(s.notification().unwrap().message, "Profile updated successfully!");
    }

    #[test]
    fn test_save_company_is_stored() {
        let mut s = session();
        assert!(s.company().is_none());
        let company = CompanyProfile {
            company_name: "Acme".into(),
            size: "11-50".into(),
            ..Default::default()
        };
        s.open_company();
        s.save_company(company.clone());
        assert_eq!(s.company(), Some(&company));
        assert!(!s.dialogs().company);
        assert_eq!(s.notification().unwrap().message, "Company profile saved!");
    }

    #[test]
    fn test_closing_dialog_keeps_selection() {
        let mut s = session();
        s.open_details(3);
        assert!(s.dialogs().details);
        s.close_details();
        assert!(!s.dialogs().details);
        assert_eq!(s.selected_posting().map(|p| p.id), Some(3));

        s.open_apply(1);
        s.close_application();
        assert_eq!(s.selected_posting().map(|p| p.id), Some(1));
    }

    #[test]
    fn test_apply_from_details_switches_dialogs() {
        let mut s = session();
        s.open_details(2);
        s.apply_from_details();
        let dialogs = s.dialogs();
        assert!(!dialogs.details);
        assert!(dialogs.application);
        assert_eq!(s.selected_posting().map(|p| p.id), Some(2));
    }

    #[test]
    fn test_dialog_flags_are_independent() {
        let mut s = session();
        s.open_profile();
        s.open_company();
        s.open_details(1);
        let d = s.dialogs();
        assert!(d.profile && d.company && d.details && !d.application);
        s.close_company();
        let d = s.dialogs();
        assert!(d.profile && !d.company && d.details);
    }

    #[test]
    fn test_change_tab_has_no_side_effects() {
        let mut s = session();
        s.toggle_saved(1);
        s.open_details(1);
        let dialogs = s.dialogs();
        s.change_tab(Tab::Saved);
        assert_eq!(s.tab(), Tab::Saved);
        assert_eq!(s.dialogs(), dialogs);
        assert_eq!(s.saved_ids(), &[1u32]);
        assert_eq!(s.selected_posting().map(|p| p.id), Some(1));
    }

    #[test]
    fn test_notification_auto_hides_after_ttl() {
        let mut s = session();
        s.toggle_saved_at(1, t0());
        s.tick(t0() + Duration::milliseconds(DEFAULT_NOTIFY_MS - 1));
        assert!(s.notification().is_some());
        s.tick(t0() + Duration::milliseconds(DEFAULT_NOTIFY_MS));
        assert!(s.notification().is_none());
    }

    #[test]
    fn test_notification_dismiss_early_and_replace() {
        let mut s = session();
        s.toggle_saved_at(1, t0());
        s.dismiss_notification();
        assert!(s.notification().is_none());

        s.toggle_saved_at(2, t0());
        s.toggle_saved_at(2, t0() + Duration::seconds(3));
        // the replacement restarts the auto-hide window
        s.tick(t0() + Duration::seconds(5));
        assert_eq!(
            s.notification().map(|n| n.message.as_str()),
            Some("Internship removed from saved")
        );
    }
}
