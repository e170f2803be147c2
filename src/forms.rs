use tracing::debug;

use crate::models::{ApplicationForm, CompanyProfile, UserProfile, COMPANY_SIZES};
use crate::session::Session;

/// A record that a dialog can edit one text field at a time.
pub trait Editable: Clone {
    type Field: Copy + PartialEq + std::fmt::Debug + 'static;

    const FIELDS: &'static [Self::Field];

    fn label(field: Self::Field) -> &'static str;
    fn value(&self, field: Self::Field) -> &str;
    fn value_mut(&mut self, field: Self::Field) -> &mut String;

    /// Fixed choices for a select-style field.
    fn choices(_field: Self::Field) -> Option<&'static [&'static str]> {
        None
    }
}

/// Local draft of a record. Nothing reaches the session until the owning
/// dialog is confirmed.
#[derive(Debug, Clone)]
pub struct Form<T: Editable> {
    draft: T,
    focus: usize,
}

impl<T: Editable> Form<T> {
    pub fn new(seed: T) -> Self {
        Self {
            draft: seed,
            focus: 0,
        }
    }

    pub fn draft(&self) -> &T {
        &self.draft
    }

    pub fn focused(&self) -> T::Field {
        T::FIELDS[self.focus]
    }

    pub fn set(&mut self, field: T::Field, value: impl Into<String>) {
        *self.draft.value_mut(field) = value.into();
    }

    pub fn push_char(&mut self, c: char) {
        let field = self.focused();
        if T::choices(field).is_some() {
            return;
        }
        self.draft.value_mut(field).push(c);
    }

    pub fn backspace(&mut self) {
        let field = self.focused();
        if T::choices(field).is_some() {
            self.draft.value_mut(field).clear();
            return;
        }
        self.draft.value_mut(field).pop();
    }

    pub fn next_field(&mut self) {
        self.focus = (self.focus + 1) % T::FIELDS.len();
    }

    pub fn prev_field(&mut self) {
        self.focus = (self.focus + T::FIELDS.len() - 1) % T::FIELDS.len();
    }

    /// Steps a select-style field to its next choice. Text fields are left
    /// alone.
    pub fn cycle_choice(&mut self) {
        let field = self.focused();
        let Some(choices) = T::choices(field) else {
            return;
        };
        let current = self.draft.value(field);
        let next = match choices.iter().position(|c| *c == current) {
            Some(idx) => choices[(idx + 1) % choices.len()],
            None => choices[0],
        };
        self.set(field, next);
    }

    pub fn into_draft(self) -> T {
        self.draft
    }
}

// --- Application ---

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplicationField {
    AvailableStartDate,
    ExpectedGraduation,
    ResumeFileName,
    CoverLetter,
    AdditionalInfo,
}

impl Editable for ApplicationForm {
    type Field = ApplicationField;

    const FIELDS: &'static [ApplicationField] = &[
        ApplicationField::AvailableStartDate,
        ApplicationField::ExpectedGraduation,
        ApplicationField::ResumeFileName,
        ApplicationField::CoverLetter,
        ApplicationField::AdditionalInfo,
    ];

    fn label(field: ApplicationField) -> &'static str {
        match field {
            ApplicationField::AvailableStartDate => "Available Start Date",
            ApplicationField::ExpectedGraduation => "Expected Graduation",
            ApplicationField::ResumeFileName => "Resume (file name)",
            ApplicationField::CoverLetter => "Cover Letter",
            ApplicationField::AdditionalInfo => "Additional Information",
        }
    }

    fn value(&self, field: ApplicationField) -> &str {
        match field {
            ApplicationField::AvailableStartDate => &self.available_start_date,
            ApplicationField::ExpectedGraduation => &self.expected_graduation,
            ApplicationField::ResumeFileName => &self.resume_file_name,
            ApplicationField::CoverLetter => &self.cover_letter,
            ApplicationField::AdditionalInfo => &self.additional_info,
        }
    }

    fn value_mut(&mut self, field: ApplicationField) -> &mut String {
        match field {
            ApplicationField::AvailableStartDate => &mut self.available_start_date,
            ApplicationField::ExpectedGraduation => &mut self.expected_graduation,
            ApplicationField::ResumeFileName => &mut self.resume_file_name,
            ApplicationField::CoverLetter => &mut self.cover_letter,
            ApplicationField::AdditionalInfo => &mut self.additional_info,
        }
    }
}

// --- User profile ---

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileField {
    FullName,
    Email,
    Phone,
    University,
    Major,
    GraduationYear,
    Gpa,
    Skills,
    Bio,
    Linkedin,
    Github,
    Portfolio,
}

impl Editable for UserProfile {
    type Field = ProfileField;

    const FIELDS: &'static [ProfileField] = &[
        ProfileField::FullName,
        ProfileField::Email,
        ProfileField::Phone,
        ProfileField::University,
        ProfileField::Major,
        ProfileField::GraduationYear,
        ProfileField::Gpa,
        ProfileField::Skills,
        ProfileField::Bio,
        ProfileField::Linkedin,
        ProfileField::Github,
        ProfileField::Portfolio,
    ];

    fn label(field: ProfileField) -> &'static str {
        match field {
            ProfileField::FullName => "Full Name",
            ProfileField::Email => "Email",
            ProfileField::Phone => "Phone",
            ProfileField::University => "University",
            ProfileField::Major => "Major",
            ProfileField::GraduationYear => "Graduation Year",
            ProfileField::Gpa => "GPA",
            ProfileField::Skills => "Skills",
            ProfileField::Bio => "Bio",
            ProfileField::Linkedin => "LinkedIn",
            ProfileField::Github => "GitHub",
            ProfileField::Portfolio => "Portfolio",
        }
    }

    fn value(&self, field: ProfileField) -> &str {
        match field {
            ProfileField::FullName => &self.full_name,
            ProfileField::Email => &self.email,
            ProfileField::Phone => &self.phone,
            ProfileField::University => &self.university,
            ProfileField::Major => &self.major,
            ProfileField::GraduationYear => &self.graduation_year,
            ProfileField::Gpa => &self.gpa,
            ProfileField::Skills => &self.skills,
            ProfileField::Bio => &self.bio,
            ProfileField::Linkedin => &self.linkedin,
            ProfileField::Github => &self.github,
            ProfileField::Portfolio => &self.portfolio,
        }
    }

    fn value_mut(&mut self, field: ProfileField) -> &mut String {
        match field {
            ProfileField::FullName => &mut self.full_name,
            ProfileField::Email => &mut self.email,
            ProfileField::Phone => &mut self.phone,
            ProfileField::University => &mut self.university,
            ProfileField::Major => &mut self.major,
            ProfileField::GraduationYear => &mut self.graduation_year,
            ProfileField::Gpa => &mut self.gpa,
            ProfileField::Skills => &mut self.skills,
            ProfileField::Bio => &mut self.bio,
            ProfileField::Linkedin => &mut self.linkedin,
            ProfileField::Github => &mut self.github,
            ProfileField::Portfolio => &mut self.portfolio,
        }
    }
}

// --- Company profile ---

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompanyField {
    CompanyName,
    Industry,
    Size,
    Website,
    Location,
    Description,
    ContactEmail,
    ContactPhone,
}

impl Editable for CompanyProfile {
    type Field = CompanyField;

    const FIELDS: &'static [CompanyField] = &[
        CompanyField::CompanyName,
        CompanyField::Industry,
        CompanyField::Size,
        CompanyField::Website,
        CompanyField::Location,
        CompanyField::Description,
        CompanyField::ContactEmail,
        CompanyField::ContactPhone,
    ];

    fn label(field: CompanyField) -> &'static str {
        match field {
            CompanyField::CompanyName => "Company Name",
            CompanyField::Industry => "Industry",
            CompanyField::Size => "Company Size",
            CompanyField::Website => "Website",
            CompanyField::Location => "Location",
            CompanyField::Description => "Company Description",
            CompanyField::ContactEmail => "Contact Email",
            CompanyField::ContactPhone => "Contact Phone",
        }
    }

    fn value(&self, field: CompanyField) -> &str {
        match field {
            CompanyField::CompanyName => &self.company_name,
            CompanyField::Industry => &self.industry,
            CompanyField::Size => &self.size,
            CompanyField::Website => &self.website,
            CompanyField::Location => &self.location,
            CompanyField::Description => &self.description,
            CompanyField::ContactEmail => &self.contact_email,
            CompanyField::ContactPhone => &self.contact_phone,
        }
    }

    fn value_mut(&mut self, field: CompanyField) -> &mut String {
        match field {
            CompanyField::CompanyName => &mut self.company_name,
            CompanyField::Industry => &mut self.industry,
            CompanyField::Size => &mut self.size,
            CompanyField::Website => &mut self.website,
            CompanyField::Location => &mut self.location,
            CompanyField::Description => &mut self.description,
            CompanyField::ContactEmail => &mut self.contact_email,
            CompanyField::ContactPhone => &mut self.contact_phone,
        }
    }

    fn choices(field: CompanyField) -> Option<&'static [&'static str]> {
        match field {
            CompanyField::Size => Some(COMPANY_SIZES),
            _ => None,
        }
    }
}

/// Open drafts for the three editing dialogs. The details dialog is read
/// only and keeps no draft.
#[derive(Debug, Default)]
pub struct FormSet {
    application: Option<Form<ApplicationForm>>,
    profile: Option<Form<UserProfile>>,
    company: Option<Form<CompanyProfile>>,
}

impl FormSet {
    pub fn application(&self) -> Option<&Form<ApplicationForm>> {
        self.application.as_ref()
    }

    pub fn application_mut(&mut self) -> Option<&mut Form<ApplicationForm>> {
        self.application.as_mut()
    }

    pub fn profile(&self) -> Option<&Form<UserProfile>> {
        self.profile.as_ref()
    }

    pub fn profile_mut(&mut self) -> Option<&mut Form<UserProfile>> {
        self.profile.as_mut()
    }

    pub fn company(&self) -> Option<&Form<CompanyProfile>> {
        self.company.as_ref()
    }

    pub fn company_mut(&mut self) -> Option<&mut Form<CompanyProfile>> {
        self.company.as_mut()
    }

    pub fn open_apply(&mut self, session: &mut Session, posting_id: u32) {
        session.open_apply(posting_id);
        if session.dialogs().application {
            self.application = Some(Form::new(ApplicationForm::default()));
        }
    }

    pub fn apply_from_details(&mut self, session: &mut Session) {
        session.apply_from_details();
        if session.dialogs().application {
            self.application = Some(Form::new(ApplicationForm::default()));
        }
    }

    pub fn open_profile(&mut self, session: &mut Session) {
        session.open_profile();
        self.profile = Some(Form::new(session.profile().clone()));
    }

    pub fn open_company(&mut self, session: &mut Session) {
        session.open_company();
        self.company = Some(Form::new(session.company().cloned().unwrap_or_default()));
    }

    pub fn cancel_application(&mut self, session: &mut Session) {
        debug!("application draft discarded");
        self.application = None;
        session.close_application();
    }

    pub fn cancel_profile(&mut self, session: &mut Session) {
        debug!("profile draft discarded");
        self.profile = None;
        session.close_profile();
    }

    pub fn cancel_company(&mut self, session: &mut Session) {
        debug!("company draft discarded");
        self.company = None;
        session.close_company();
    }

    pub fn confirm_application(&mut self, session: &mut Session) {
        if let Some(form) = self.application.take() {
            session.submit_for_selected(form.into_draft());
        }
    }

    pub fn confirm_profile(&mut self, session: &mut Session) {
        if let Some(form) = self.profile.take() {
            session.save_profile(form.into_draft());
        }
    }

    pub fn confirm_company(&mut self, session: &mut Session) {
        if let Some(form) = self.company.take() {
            session.save_company(form.into_draft());
        }
    }
}
