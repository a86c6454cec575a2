//! Declarative field validation.
//!
//! Each form publishes a table of [`FieldRule`]s. [`validate`] walks the table
//! and reports, per field, the message of the first rule that fails.

use std::collections::BTreeMap;
use validator::ValidateEmail;

use super::models::FormInput;

/// A single constraint on a field's value, carrying the message shown when it fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Value must not be empty.
    Required(&'static str),
    /// Value must contain at least this many characters.
    MinLength(usize, &'static str),
    /// Value must look like an email address.
    Email(&'static str),
    /// Like `Email`, and the domain must be dotted with an alphabetic TLD of two or more letters.
    EmailWithTld(&'static str),
}

impl Rule {
    pub fn check(&self, value: &str) -> Result<(), &'static str> {
        match *self {
            Rule::Required(message) => {
                if value.is_empty() { Err(message) } else { Ok(()) }
            }
            Rule::MinLength(min, message) => {
                if value.chars().count() < min { Err(message) } else { Ok(()) }
            }
            Rule::Email(message) => {
                if value.validate_email() { Ok(()) } else { Err(message) }
            }
            Rule::EmailWithTld(message) => {
                if value.validate_email() && has_dotted_domain(value) {
                    Ok(())
                } else {
                    Err(message)
                }
            }
        }
    }
}

fn has_dotted_domain(email: &str) -> bool {
    let Some((_, domain)) = email.rsplit_once('@') else {
        return false;
    };
    let Some((labels, tld)) = domain.rsplit_once('.') else {
        return false;
    };
    !labels.split('.').any(str::is_empty)
        && tld.len() >= 2
        && tld.chars().all(|c| c.is_ascii_alphabetic())
}

/// The ordered rules attached to one field.
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub field: &'static str,
    pub rules: &'static [Rule],
}

/// Field name to error message, for every field that failed validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<&'static str, &'static str>);

impl FieldErrors {
    pub fn get(&self, field: &str) -> Option<&'static str> {
        self.0.get(field).copied()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.keys().copied()
    }

    fn insert(&mut self, field: &'static str, message: &'static str) {
        self.0.insert(field, message);
    }
}

pub type ValidationResult = Result<(), FieldErrors>;

/// Runs every rule table entry of `F` against `input`.
///
/// Empty optional fields are skipped entirely.
pub fn validate<F: FormInput>(input: &F) -> ValidationResult {
    let mut errors = FieldErrors::default();

    for field_rule in F::rules() {
        let value = input.value(field_rule.field).unwrap_or_default();
        let optional = F::fields()
            .iter()
            .any(|spec| spec.name == field_rule.field && spec.optional);
        if optional && value.is_empty() {
            continue;
        }

        if let Some(message) = field_rule.rules.iter().find_map(|rule| rule.check(value).err()) {
            errors.insert(field_rule.field, message);
        }
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}
