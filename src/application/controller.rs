//! Submission lifecycle of a single form.
//!
//! A [`FormController`] owns one form's input, its validation errors and the
//! status of its latest submission. It never performs I/O itself: a
//! successful [`FormController::begin_submit`] hands out a [`Submission`]
//! that the caller delivers, and the outcome is fed back through
//! [`FormController::complete`]. Terminal statuses revert to idle through
//! [`FormController::tick`] once their display window has passed.

use crate::domain::{FieldErrors, FormInput, FormKind, SubmissionStatus, SubmitResult, validate};
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, info, warn};

/// What happens to the input when a submission fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorPolicy {
    /// Keep what the user typed so they can resubmit without retyping.
    #[default]
    PreserveInput,
    ClearInput,
}

/// Per-form behaviour knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ControllerOptions {
    /// How long a success or error banner stays up. `None` keeps it until the next attempt.
    pub status_window: Option<Duration>,
    pub on_error: ErrorPolicy,
    /// Refuse edits while a submission is in flight.
    pub lock_input_in_flight: bool,
}

/// A validated request ready to be delivered.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub ticket: u64,
    pub kind: FormKind,
    pub payload: serde_json::Value,
}

#[derive(Debug, Error, PartialEq)]
pub enum SubmitRefused {
    #[error("a submission is already in flight")]
    InFlight,
    #[error("{} field(s) failed validation", .0.len())]
    Invalid(FieldErrors),
    #[error("could not encode the form: {0}")]
    Encode(String),
}

#[derive(Debug)]
pub struct FormController<F: FormInput> {
    input: F,
    errors: FieldErrors,
    status: SubmissionStatus,
    options: ControllerOptions,
    next_ticket: u64,
    pending: Option<u64>,
    clear_at: Option<Instant>,
    /// Set by the first submit attempt, cleared by a successful delivery.
    submitted_once: bool,
}

impl<F: FormInput> Default for FormController<F> {
    fn default() -> Self {
        Self::new(ControllerOptions::default())
    }
}

impl<F: FormInput> FormController<F> {
    pub fn new(options: ControllerOptions) -> Self {
        Self {
            input: F::default(),
            errors: FieldErrors::default(),
            status: SubmissionStatus::Idle,
            options,
            next_ticket: 1,
            pending: None,
            clear_at: None,
            submitted_once: false,
        }
    }

    pub fn kind(&self) -> FormKind {
        F::KIND
    }

    pub fn input(&self) -> &F {
        &self.input
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn status(&self) -> SubmissionStatus {
        self.status
    }

    pub fn options(&self) -> ControllerOptions {
        self.options
    }

    pub fn is_submitting(&self) -> bool {
        self.status == SubmissionStatus::Submitting
    }

    /// Whether the trigger control accepts activation.
    pub fn trigger_enabled(&self) -> bool {
        !self.is_submitting()
    }

    pub fn input_locked(&self) -> bool {
        self.options.lock_input_in_flight && self.is_submitting()
    }

    /// When the current banner will be hidden, if a clear is scheduled.
    pub fn clear_deadline(&self) -> Option<Instant> {
        self.clear_at
    }

    /// Sets one field. Returns `false` for unknown fields or while input is locked.
    ///
    /// After the first submit attempt every edit re-validates, until a submission succeeds.
    pub fn set_field(&mut self, field: &str, value: impl Into<String>) -> bool {
        if self.input_locked() {
            return false;
        }
        let Some(slot) = self.input.value_mut(field) else {
            return false;
        };
        *slot = value.into();

        if self.submitted_once {
            self.errors = validate(&self.input).err().unwrap_or_default();
        }
        true
    }

    /// Runs the form's rules and records the resulting per-field errors.
    pub fn validate(&mut self) -> Result<(), FieldErrors> {
        let result = validate(&self.input);
        self.errors = result.clone().err().unwrap_or_default();
        result
    }

    /// Validates and, if valid, moves to `Submitting` and returns the request to deliver.
    ///
    /// Nothing changes when a submission is already in flight. On a validation
    /// failure the errors are recorded and the status is left alone.
    pub fn begin_submit(&mut self) -> Result<Submission, SubmitRefused> {
        if self.is_submitting() {
            return Err(SubmitRefused::InFlight);
        }
        self.submitted_once = true;

        if let Err(errors) = self.validate() {
            debug!(form = %self.kind(), fields = errors.len(), "validation failed");
            return Err(SubmitRefused::Invalid(errors));
        }

        let payload = self
            .input
            .to_payload()
            .map_err(|e| SubmitRefused::Encode(e.to_string()))?;

        let ticket = self.next_ticket;
        self.next_ticket += 1;
        self.pending = Some(ticket);
        self.status = SubmissionStatus::Submitting;
        self.clear_at = None;

        info!(form = %self.kind(), ticket, "submission started");
        Ok(Submission {
            ticket,
            kind: F::KIND,
            payload,
        })
    }

    /// Reconciles a delivery outcome. Outcomes for anything but the pending ticket are ignored.
    pub fn complete(&mut self, ticket: u64, outcome: SubmitResult, now: Instant) {
        if self.pending != Some(ticket) {
            warn!(form = %self.kind(), ticket, "ignoring completion for unknown submission");
            return;
        }
        self.pending = None;

        match outcome {
            Ok(()) => {
                info!(form = %self.kind(), ticket, "submission succeeded");
                self.status = SubmissionStatus::Success;
                self.input.clear();
                self.errors = FieldErrors::default();
                self.submitted_once = false;
            }
            Err(err) => {
                warn!(form = %self.kind(), ticket, error = %err, "submission failed");
                self.status = SubmissionStatus::Error;
                if self.options.on_error == ErrorPolicy::ClearInput {
                    self.input.clear();
                }
            }
        }

        self.clear_at = self.options.status_window.map(|window| now + window);
    }

    /// Reverts a terminal status to idle once its display window has passed.
    ///
    /// Returns `true` when the status changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.clear_at {
            Some(deadline) if now >= deadline && self.status.is_terminal() => {
                self.status = SubmissionStatus::Idle;
                self.clear_at = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ContactForm, NewsletterForm, SubmitError};

    fn newsletter_options() -> ControllerOptions {
        ControllerOptions {
            status_window: Some(Duration::from_secs(5)),
            on_error: ErrorPolicy::PreserveInput,
            lock_input_in_flight: true,
        }
    }

    fn filled_contact() -> FormController<ContactForm> {
        let mut controller = FormController::<ContactForm>::default();
        controller.set_field("name", "Alan Carreras");
        controller.set_field("email", "alan@olaris.co.uk");
        controller.set_field("message", "Please contact me about fleet services");
        controller
    }

    #[test]
    fn test_invalid_input_produces_no_submission() {
        let mut controller = FormController::<ContactForm>::default();
        controller.set_field("name", "A");
        controller.set_field("email", "a@b.com");
        controller.set_field("message", "short");

        let refused = controller.begin_submit().unwrap_err();
        match refused {
            SubmitRefused::Invalid(errors) => assert!(errors.contains("message")),
            other => panic!("unexpected refusal: {other:?}"),
        }
        assert_eq!(controller.status(), SubmissionStatus::Idle);
        assert!(controller.errors().contains("message"));
        assert!(controller.trigger_enabled());
    }

    #[test]
    fn test_valid_input_starts_submission() {
        let mut controller = filled_contact();
        let submission = controller.begin_submit().unwrap();

        assert_eq!(submission.kind, FormKind::Contact);
        assert_eq!(submission.payload["name"], "Alan Carreras");
        assert_eq!(controller.status(), SubmissionStatus::Submitting);
        assert!(!controller.trigger_enabled());
    }

    #[test]
    fn test_second_attempt_while_in_flight_is_refused() {
        let mut controller = filled_contact();
        controller.begin_submit().unwrap();

        assert_eq!(controller.begin_submit(), Err(SubmitRefused::InFlight));
        assert_eq!(controller.status(), SubmissionStatus::Submitting);
    }

    #[test]
    fn test_success_clears_input_and_reenables_trigger() {
        let mut controller = filled_contact();
        let submission = controller.begin_submit().unwrap();

        controller.complete(submission.ticket, Ok(()), Instant::now());

        assert_eq!(controller.status(), SubmissionStatus::Success);
        assert!(controller.input().is_empty());
        assert!(controller.trigger_enabled());
    }

    #[test]
    fn test_rejection_preserves_input() {
        let mut controller = filled_contact();
        let submission = controller.begin_submit().unwrap();

        controller.complete(
            submission.ticket,
            Err(SubmitError::Rejected { status: 500 }),
            Instant::now(),
        );

        assert_eq!(controller.status(), SubmissionStatus::Error);
        assert_eq!(controller.input().name, "Alan Carreras");
        assert!(controller.trigger_enabled());
    }

    #[test]
    fn test_transport_failure_with_clear_policy() {
        let mut controller = FormController::<NewsletterForm>::new(ControllerOptions {
            on_error: ErrorPolicy::ClearInput,
            ..newsletter_options()
        });
        controller.set_field("email", "fleet@example.com");
        let submission = controller.begin_submit().unwrap();

        controller.complete(
            submission.ticket,
            Err(SubmitError::Transport("connection refused".into())),
            Instant::now(),
        );

        assert_eq!(controller.status(), SubmissionStatus::Error);
        assert!(controller.input().is_empty());
    }

    #[test]
    fn test_contact_status_stays_until_next_attempt() {
        let mut controller = filled_contact();
        let submission = controller.begin_submit().unwrap();
        let now = Instant::now();
        controller.complete(submission.ticket, Err(SubmitError::Rejected { status: 503 }), now);

        assert!(!controller.tick(now + Duration::from_secs(3600)));
        assert_eq!(controller.status(), SubmissionStatus::Error);

        controller.begin_submit().unwrap();
        assert_eq!(controller.status(), SubmissionStatus::Submitting);
    }

    #[test]
    fn test_newsletter_status_reverts_after_window() {
        let mut controller = FormController::<NewsletterForm>::new(newsletter_options());
        controller.set_field("email", "fleet@example.com");
        let submission = controller.begin_submit().unwrap();
        let now = Instant::now();
        controller.complete(submission.ticket, Ok(()), now);

        assert!(!controller.tick(now + Duration::from_millis(4999)));
        assert_eq!(controller.status(), SubmissionStatus::Success);

        assert!(controller.tick(now + Duration::from_secs(5)));
        assert_eq!(controller.status(), SubmissionStatus::Idle);

        assert!(!controller.tick(now + Duration::from_secs(60)));
        assert_eq!(controller.status(), SubmissionStatus::Idle);
    }

    #[test]
    fn test_new_submission_cancels_pending_clear() {
        let mut controller = FormController::<NewsletterForm>::new(newsletter_options());
        controller.set_field("email", "fleet@example.com");
        let first = controller.begin_submit().unwrap();
        let now = Instant::now();
        controller.complete(first.ticket, Err(SubmitError::Rejected { status: 500 }), now);

        controller.begin_submit().unwrap();
        assert_eq!(controller.clear_deadline(), None);
        assert!(!controller.tick(now + Duration::from_secs(10)));
        assert_eq!(controller.status(), SubmissionStatus::Submitting);
    }

    #[test]
    fn test_stale_completion_is_ignored() {
        let mut controller = filled_contact();
        let submission = controller.begin_submit().unwrap();

        controller.complete(submission.ticket + 1, Ok(()), Instant::now());
        assert_eq!(controller.status(), SubmissionStatus::Submitting);

        controller.complete(submission.ticket, Ok(()), Instant::now());
        controller.complete(submission.ticket, Err(SubmitError::Rejected { status: 500 }), Instant::now());
        assert_eq!(controller.status(), SubmissionStatus::Success);
    }

    #[test]
    fn test_newsletter_locks_input_in_flight() {
        let mut controller = FormController::<NewsletterForm>::new(newsletter_options());
        controller.set_field("email", "fleet@example.com");
        controller.begin_submit().unwrap();

        assert!(controller.input_locked());
        assert!(!controller.set_field("email", "other@example.com"));
        assert_eq!(controller.input().email, "fleet@example.com");
    }

    #[test]
    fn test_contact_stays_editable_in_flight() {
        let mut controller = filled_contact();
        controller.begin_submit().unwrap();

        assert!(!controller.input_locked());
        assert!(controller.set_field("company", "Olaris"));
    }

    #[test]
    fn test_edits_revalidate_once_errors_are_shown() {
        let mut controller = FormController::<ContactForm>::default();
        controller.set_field("name", "A");
        assert!(controller.errors().is_empty());

        controller.begin_submit().unwrap_err();
        assert!(controller.errors().contains("name"));

        controller.set_field("name", "Alan");
        assert!(!controller.errors().contains("name"));
        assert!(controller.errors().contains("message"));
    }

    #[test]
    fn test_edits_keep_revalidating_after_errors_are_fixed() {
        let mut controller = FormController::<ContactForm>::default();
        controller.begin_submit().unwrap_err();

        controller.set_field("name", "Alan");
        controller.set_field("email", "alan@olaris.co.uk");
        controller.set_field("message", "Please contact me about fleet services");
        assert!(controller.errors().is_empty());

        controller.set_field("email", "alan@olaris");
        assert_eq!(controller.errors().get("email"), Some("Please enter a valid email address"));
    }

    #[test]
    fn test_success_stops_revalidating_edits() {
        let mut controller = filled_contact();
        let submission = controller.begin_submit().unwrap();
        controller.complete(submission.ticket, Ok(()), Instant::now());

        controller.set_field("name", "A");
        assert!(controller.errors().is_empty());
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let mut controller = FormController::<NewsletterForm>::default();
        assert!(!controller.set_field("firstName", "Alan"));
    }
}
