use serde::Serialize;
use std::fmt;

use super::validation::{FieldRule, Rule};

/// Which of the two site forms a value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormKind {
    Contact,
    Newsletter,
}

impl FormKind {
    /// Label of the trigger control, depending on whether a submission is in flight.
    pub fn trigger_label(self, submitting: bool) -> &'static str {
        match (self, submitting) {
            (FormKind::Contact, false) => "Send Message",
            (FormKind::Contact, true) => "Sending...",
            (FormKind::Newsletter, false) => "Subscribe",
            (FormKind::Newsletter, true) => "Subscribing...",
        }
    }

    pub fn success_banner(self) -> &'static str {
        match self {
            FormKind::Contact => "✓ Thank you! We'll get back to you soon.",
            FormKind::Newsletter => "✓ Successfully subscribed!",
        }
    }

    pub fn error_banner(self) -> &'static str {
        match self {
            FormKind::Contact => {
                "Failed to send message. Please try again or email us directly."
            }
            FormKind::Newsletter => "Failed to subscribe. Please try again.",
        }
    }
}

impl fmt::Display for FormKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormKind::Contact => write!(f, "contact"),
            FormKind::Newsletter => write!(f, "newsletter"),
        }
    }
}

/// Lifecycle of a single form's most recent submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmissionStatus {
    #[default]
    Idle,
    Submitting,
    Success,
    Error,
}

impl SubmissionStatus {
    /// `Success` and `Error` are the only states that show a banner.
    pub fn is_terminal(self) -> bool {
        matches!(self, SubmissionStatus::Success | SubmissionStatus::Error)
    }
}

/// Static description of one input field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub placeholder: &'static str,
    /// Empty optional fields skip their rules and are left out of the request body.
    pub optional: bool,
}

/// A form's input state: a fixed set of named string fields.
///
/// Implementors serialize to the JSON body that is posted to the form's endpoint.
pub trait FormInput: Default + Serialize {
    const KIND: FormKind;

    fn fields() -> &'static [FieldSpec];

    fn rules() -> &'static [FieldRule];

    fn value(&self, field: &str) -> Option<&str>;

    fn value_mut(&mut self, field: &str) -> Option<&mut String>;

    fn is_empty(&self) -> bool {
        Self::fields()
            .iter()
            .all(|spec| self.value(spec.name).is_none_or(str::is_empty))
    }

    fn clear(&mut self) {
        *self = Self::default();
    }

    fn to_payload(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub phone: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub company: String,
    pub message: String,
}

const CONTACT_FIELDS: &[FieldSpec] = &[
    FieldSpec { name: "name", label: "Name *", placeholder: "Your full name", optional: false },
    FieldSpec { name: "email", label: "Email *", placeholder: "your@email.com", optional: false },
    FieldSpec { name: "phone", label: "Phone", placeholder: "+44", optional: true },
    FieldSpec { name: "company", label: "Company", placeholder: "Your company", optional: true },
    FieldSpec {
        name: "message",
        label: "Message *",
        placeholder: "Tell us about your fleet management needs...",
        optional: false,
    },
];

const CONTACT_RULES: &[FieldRule] = &[
    FieldRule {
        field: "name",
        rules: &[Rule::MinLength(2, "Name must be at least 2 characters")],
    },
    FieldRule {
        field: "email",
        rules: &[Rule::EmailWithTld("Please enter a valid email address")],
    },
    FieldRule {
        field: "message",
        rules: &[Rule::MinLength(10, "Message must be at least 10 characters")],
    },
];

impl FormInput for ContactForm {
    const KIND: FormKind = FormKind::Contact;

    fn fields() -> &'static [FieldSpec] {
        CONTACT_FIELDS
    }

    fn rules() -> &'static [FieldRule] {
        CONTACT_RULES
    }

    fn value(&self, field: &str) -> Option<&str> {
        match field {
            "name" => Some(&self.name),
            "email" => Some(&self.email),
            "phone" => Some(&self.phone),
            "company" => Some(&self.company),
            "message" => Some(&self.message),
            _ => None,
        }
    }

    fn value_mut(&mut self, field: &str) -> Option<&mut String> {
        match field {
            "name" => Some(&mut self.name),
            "email" => Some(&mut self.email),
            "phone" => Some(&mut self.phone),
            "company" => Some(&mut self.company),
            "message" => Some(&mut self.message),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NewsletterForm {
    pub email: String,
}

const NEWSLETTER_FIELDS: &[FieldSpec] = &[FieldSpec {
    name: "email",
    label: "Email",
    placeholder: "Enter your email",
    optional: false,
}];

const NEWSLETTER_RULES: &[FieldRule] = &[FieldRule {
    field: "email",
    rules: &[
        Rule::Required("Email is required"),
        Rule::Email("Please enter a valid email address"),
    ],
}];

impl FormInput for NewsletterForm {
    const KIND: FormKind = FormKind::Newsletter;

    fn fields() -> &'static [FieldSpec] {
        NEWSLETTER_FIELDS
    }

    fn rules() -> &'static [FieldRule] {
        NEWSLETTER_RULES
    }

    fn value(&self, field: &str) -> Option<&str> {
        match field {
            "email" => Some(&self.email),
            _ => None,
        }
    }

    fn value_mut(&mut self, field: &str) -> Option<&mut String> {
        match field {
            "email" => Some(&mut self.email),
            _ => None,
        }
    }
}

/// Contact details displayed beside the contact form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteInfo {
    pub name: &'static str,
    pub owner: &'static str,
    pub role: &'static str,
    pub email: &'static str,
    pub phone: &'static str,
    pub address: [&'static str; 4],
}

impl Default for SiteInfo {
    fn default() -> Self {
        Self {
            name: "Olaris Consulting Limited",
            owner: "Alan Carreras",
            role: "Founder & CEO",
            email: "alan@olaris.co.uk",
            phone: "+44-7919-35-40-68",
            address: ["10 Bull Street, Aston", "Nr Bampton", "OX18 2DN", "United Kingdom"],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contact_payload_omits_empty_optional_fields() {
        let form = ContactForm {
            name: "Alan Carreras".to_string(),
            email: "alan@olaris.co.uk".to_string(),
            message: "Please contact me about fleet services".to_string(),
            ..ContactForm::default()
        };

        let payload = form.to_payload().unwrap();
        assert_eq!(
            payload,
            serde_json::json!({
                "name": "Alan Carreras",
                "email": "alan@olaris.co.uk",
                "message": "Please contact me about fleet services",
            })
        );
    }

    #[test]
    fn test_contact_payload_keeps_filled_optional_fields() {
        let form = ContactForm {
            name: "Alan".to_string(),
            email: "alan@olaris.co.uk".to_string(),
            phone: "+44 7919".to_string(),
            company: "Olaris".to_string(),
            message: "Fleet review please".to_string(),
        };

        let payload = form.to_payload().unwrap();
        assert_eq!(payload["phone"], "+44 7919");
        assert_eq!(payload["company"], "Olaris");
    }

    #[test]
    fn test_newsletter_payload_shape() {
        let form = NewsletterForm { email: "a@b.com".to_string() };
        assert_eq!(form.to_payload().unwrap(), serde_json::json!({ "email": "a@b.com" }));
    }

    #[test]
    fn test_field_access_by_name() {
        let mut form = ContactForm::default();
        *form.value_mut("company").unwrap() = "Olaris".to_string();

        assert_eq!(form.value("company"), Some("Olaris"));
        assert_eq!(form.value("unknown"), None);
        assert!(form.value_mut("unknown").is_none());
    }

    #[test]
    fn test_every_field_spec_is_addressable() {
        let form = ContactForm::default();
        for spec in ContactForm::fields() {
            assert!(form.value(spec.name).is_some(), "missing field {}", spec.name);
        }
        let form = NewsletterForm::default();
        for spec in NewsletterForm::fields() {
            assert!(form.value(spec.name).is_some(), "missing field {}", spec.name);
        }
    }

    #[test]
    fn test_clear_and_is_empty() {
        let mut form = ContactForm {
            name: "Alan".to_string(),
            ..ContactForm::default()
        };
        assert!(!form.is_empty());

        form.clear();
        assert!(form.is_empty());
        assert_eq!(form, ContactForm::default());
    }

    #[test]
    fn test_trigger_labels() {
        assert_eq!(FormKind::Contact.trigger_label(false), "Send Message");
        assert_eq!(FormKind::Contact.trigger_label(true), "Sending...");
        assert_eq!(FormKind::Newsletter.trigger_label(false), "Subscribe");
        assert_eq!(FormKind::Newsletter.trigger_label(true), "Subscribing...");
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(!SubmissionStatus::Idle.is_terminal());
        assert!(!SubmissionStatus::Submitting.is_terminal());
        assert!(SubmissionStatus::Success.is_terminal());
        assert!(SubmissionStatus::Error.is_terminal());
    }
}
