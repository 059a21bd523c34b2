//! Contact / demo request form.
//!
//! Fields are validated locally before anything goes over the wire; a form
//! with missing or malformed required fields never reaches the
//! [`Transport`]. Server rejections are mapped back onto fields by keyword.
//! Anything that can't be mapped becomes a generic alert naming the support
//! address.

pub mod transport;

pub use transport::{HttpTransport, Transport, TransportError};

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use unveil_config::FormConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Name,
    Email,
    CompanyName,
    CompanySize,
    Country,
    Message,
}

impl Field {
    pub const ALL: [Field; 6] = [
        Field::Name,
        Field::Email,
        Field::CompanyName,
        Field::CompanySize,
        Field::Country,
        Field::Message,
    ];

    /// Order in which server messages are matched. Compound names go first
    /// so "company name" is not claimed by `Name`, and "size" before the bare
    /// "company".
    const MATCH_ORDER: [Field; 6] = [
        Field::CompanySize,
        Field::CompanyName,
        Field::Email,
        Field::Country,
        Field::Message,
        Field::Name,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Email => "email",
            Field::CompanyName => "company_name",
            Field::CompanySize => "company_size",
            Field::Country => "country",
            Field::Message => "message",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Field::Name => "Name",
            Field::Email => "Email",
            Field::CompanyName => "Company name",
            Field::CompanySize => "Company size",
            Field::Country => "Country",
            Field::Message => "Message",
        }
    }

    pub fn is_required(self) -> bool {
        !matches!(self, Field::Message)
    }

    fn keywords(self) -> &'static [&'static str] {
        match self {
            Field::Name => &["name"],
            Field::Email => &["email", "e-mail"],
            Field::CompanyName => &["company name", "company_name", "companyname", "company"],
            Field::CompanySize => &["company size", "company_size", "companysize", "size"],
            Field::Country => &["country"],
            Field::Message => &["message"],
        }
    }

    /// Field a server error message refers to, if any.
    pub fn from_message(message: &str) -> Option<Field> {
        let lower = message.to_lowercase();
        Field::MATCH_ORDER
            .into_iter()
            .find(|field| field.keywords().iter().any(|keyword| lower.contains(keyword)))
    }
}

/// Form contents as posted to the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub company_name: String,
    pub company_size: String,
    pub country: String,
    #[serde(default)]
    pub message: String,
}

impl ContactForm {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Email => &self.email,
            Field::CompanyName => &self.company_name,
            Field::CompanySize => &self.company_size,
            Field::Country => &self.country,
            Field::Message => &self.message,
        }
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let slot = match field {
            Field::Name => &mut self.name,
            Field::Email => &mut self.email,
            Field::CompanyName => &mut self.company_name,
            Field::CompanySize => &mut self.company_size,
            Field::Country => &mut self.country,
            Field::Message => &mut self.message,
        };
        *slot = value.into();
    }

    /// Field errors, empty when the form can be submitted.
    pub fn validate(&self) -> BTreeMap<Field, String> {
        let mut errors = BTreeMap::new();
        for field in Field::ALL {
            if field.is_required() && self.get(field).trim().is_empty() {
                errors.insert(field, format!("{} is required", field.label()));
            }
        }
        if !errors.contains_key(&Field::Email) && !looks_like_email(self.email.trim()) {
            errors.insert(Field::Email, "Enter a valid email address".to_string());
        }
        errors
    }
}

fn looks_like_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !value.chars().any(char::is_whitespace)
        && domain
            .split_once('.')
            .is_some_and(|(host, rest)| !host.is_empty() && !rest.is_empty() && !rest.ends_with('.'))
}

/// Backend verdict.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub errors: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FormStatus {
    Idle,
    /// Confirmation is showing until `until_ms`.
    Confirmed { until_ms: f64 },
    /// Last attempt failed; errors or an alert are showing.
    Failed,
}

/// What a submit attempt did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Local validation failed; nothing was sent.
    Invalid,
    Confirmed,
    /// The backend rejected the submission.
    Rejected,
    /// Network or response failure.
    Failed,
    /// A confirmation is still showing.
    Ignored,
}

/// Form state machine: fields, errors, alert and confirmation timer.
#[derive(Debug, Clone)]
pub struct FormController {
    form: ContactForm,
    status: FormStatus,
    errors: BTreeMap<Field, String>,
    alert: Option<String>,
    support_email: String,
    confirmation_ms: f64,
}

impl FormController {
    pub fn new(config: &FormConfig) -> Self {
        Self {
            form: ContactForm::default(),
            status: FormStatus::Idle,
            errors: BTreeMap::new(),
            alert: None,
            support_email: config.support_email.clone(),
            confirmation_ms: config.confirmation_ms.max(0.0),
        }
    }

    pub fn form(&self) -> &ContactForm {
        &self.form
    }

    pub fn status(&self) -> FormStatus {
        self.status
    }

    pub fn errors(&self) -> &BTreeMap<Field, String> {
        &self.errors
    }

    pub fn error(&self, field: Field) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    pub fn alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    /// Edit a field. Clears that field's error.
    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        self.form.set(field, value);
        self.errors.remove(&field);
    }

    pub fn submit(&mut self, transport: &dyn Transport, now_ms: f64) -> SubmitOutcome {
        if matches!(self.status, FormStatus::Confirmed { .. }) {
            return SubmitOutcome::Ignored;
        }

        self.alert = None;
        self.errors = self.form.validate();
        if !self.errors.is_empty() {
            debug!(fields = self.errors.len(), "contact form failed validation");
            self.status = FormStatus::Failed;
            return SubmitOutcome::Invalid;
        }

        match transport.submit(&self.form) {
            Ok(response) if response.success => {
                info!("contact form submitted");
                self.status = FormStatus::Confirmed {
                    until_ms: now_ms + self.confirmation_ms,
                };
                SubmitOutcome::Confirmed
            }
            Ok(response) => {
                info!(errors = response.errors.len(), "contact form rejected");
                self.apply_rejection(&response);
                self.status = FormStatus::Failed;
                SubmitOutcome::Rejected
            }
            Err(error) => {
                warn!(%error, "contact form submission failed");
                self.alert = Some(self.generic_alert());
                self.status = FormStatus::Failed;
                SubmitOutcome::Failed
            }
        }
    }

    /// Reset once the confirmation has been shown long enough. Returns `true`
    /// when the form was cleared.
    pub fn tick(&mut self, now_ms: f64) -> bool {
        match self.status {
            FormStatus::Confirmed { until_ms } if now_ms >= until_ms => {
                self.form = ContactForm::default();
                self.errors.clear();
                self.alert = None;
                self.status = FormStatus::Idle;
                true
            }
            _ => false,
        }
    }

    fn apply_rejection(&mut self, response: &SubmitResponse) {
        let mut unmatched = false;
        for message in &response.errors {
            match Field::from_message(message) {
                Some(field) => {
                    self.errors.entry(field).or_insert_with(|| message.clone());
                }
                None => unmatched = true,
            }
        }
        if unmatched || self.errors.is_empty() {
            self.alert = Some(match response.message.as_deref() {
                Some(message) if !message.trim().is_empty() => {
                    format!("{} {}", message.trim(), self.support_line())
                }
                _ => self.generic_alert(),
            });
        }
    }

    fn support_line(&self) -> String {
        format!("If the problem persists, email us at {}.", self.support_email)
    }

    fn generic_alert(&self) -> String {
        format!(
            "We couldn't send your request. Please email us directly at {}.",
            self.support_email
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> ContactForm {
        ContactForm {
            name: "Ada Lovelace".into(),
            email: "ada@example.com".into(),
            company_name: "Analytical Engines".into(),
            company_size: "11-50".into(),
            country: "United Kingdom".into(),
            message: String::new(),
        }
    }

    #[test]
    fn complete_form_validates() {
        assert!(filled().validate().is_empty());
    }

    #[test]
    fn required_fields_and_email_shape() {
        let mut form = filled();
        form.country = "  ".into();
        form.email = "ada@example".into();
        let errors = form.validate();
        assert!(errors.contains_key(&Field::Country));
        assert!(errors.contains_key(&Field::Email));
        assert!(!errors.contains_key(&Field::Message));
    }

    #[test]
    fn email_checks() {
        assert!(looks_like_email("a@b.co"));
        assert!(!looks_like_email("a@@b.co"));
        assert!(!looks_like_email("@b.co"));
        assert!(!looks_like_email("a b@c.io"));
        assert!(!looks_like_email("a@.io"));
        assert!(!looks_like_email("a@b."));
    }

    #[test]
    fn server_messages_map_to_fields() {
        assert_eq!(Field::from_message("Company name is required"), Some(Field::CompanyName));
        assert_eq!(Field::from_message("Invalid company size"), Some(Field::CompanySize));
        assert_eq!(Field::from_message("Name too long"), Some(Field::Name));
        assert_eq!(Field::from_message("E-mail bounced"), Some(Field::Email));
        assert_eq!(Field::from_message("Rate limited"), None);
    }

    #[test]
    fn serializes_with_snake_case_keys() {
        let json = serde_json::to_value(filled()).unwrap();
        assert_eq!(json["company_name"], "Analytical Engines");
        assert_eq!(json["company_size"], "11-50");
    }
}
