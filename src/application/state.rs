//! Application state for the terminal front end.
//!
//! Holds both form controllers, the focus position, the field editing buffer
//! and the transient status line, and routes delivery outcomes back to the
//! form that issued them.

use super::controller::{ControllerOptions, ErrorPolicy, FormController, SubmitRefused};
use super::dispatch::Dispatcher;
use crate::domain::{
    ContactForm, FieldSpec, FormInput, FormKind, NewsletterForm, SiteInfo, SubmissionStatus,
};
use crate::infrastructure::{ConfigError, Settings, Transport};
use std::sync::Arc;
use std::time::Instant;

/// Represents the current mode of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    /// Moving between fields and forms
    Normal,
    /// Typing into the selected field
    Editing,
    /// Help screen is displayed
    Help,
}

/// Which form has the focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pane {
    Contact,
    Newsletter,
}

impl Pane {
    pub fn kind(self) -> FormKind {
        match self {
            Pane::Contact => FormKind::Contact,
            Pane::Newsletter => FormKind::Newsletter,
        }
    }
}

/// Main application state.
///
/// `selected` indexes the focused form's fields; one past the last field is
/// the form's trigger control.
pub struct App {
    pub contact: FormController<ContactForm>,
    pub newsletter: FormController<NewsletterForm>,
    pub site: SiteInfo,
    pub mode: AppMode,
    pub pane: Pane,
    pub selected: usize,
    /// Editing buffer for the selected field
    pub input: String,
    /// Cursor position within the editing buffer, in characters
    pub cursor_position: usize,
    pub help_scroll: usize,
    /// Temporary message shown in the status bar
    pub status_message: Option<String>,
    dispatcher: Dispatcher,
}

impl App {
    pub fn new(
        dispatcher: Dispatcher,
        contact_options: ControllerOptions,
        newsletter_options: ControllerOptions,
    ) -> Self {
        Self {
            contact: FormController::new(contact_options),
            newsletter: FormController::new(newsletter_options),
            site: SiteInfo::default(),
            mode: AppMode::Normal,
            pane: Pane::Contact,
            selected: 0,
            input: String::new(),
            cursor_position: 0,
            help_scroll: 0,
            status_message: None,
            dispatcher,
        }
    }

    /// Wires both forms with the endpoints and display windows from `settings`.
    pub fn from_settings(
        settings: &Settings,
        transport: Arc<dyn Transport>,
    ) -> Result<Self, ConfigError> {
        let dispatcher = Dispatcher::new(transport, settings.endpoints()?);
        let contact = ControllerOptions {
            status_window: settings.contact_status_window(),
            on_error: ErrorPolicy::PreserveInput,
            lock_input_in_flight: false,
        };
        let newsletter = ControllerOptions {
            status_window: settings.newsletter_status_window(),
            on_error: ErrorPolicy::PreserveInput,
            lock_input_in_flight: true,
        };
        Ok(Self::new(dispatcher, contact, newsletter))
    }

    pub fn fields(&self) -> &'static [FieldSpec] {
        match self.pane {
            Pane::Contact => ContactForm::fields(),
            Pane::Newsletter => NewsletterForm::fields(),
        }
    }

    pub fn selected_field(&self) -> Option<&'static FieldSpec> {
        self.fields().get(self.selected)
    }

    pub fn trigger_selected(&self) -> bool {
        self.selected == self.fields().len()
    }

    pub fn field_value(&self, field: &str) -> &str {
        let value = match self.pane {
            Pane::Contact => self.contact.input().value(field),
            Pane::Newsletter => self.newsletter.input().value(field),
        };
        value.unwrap_or_default()
    }

    pub fn focused_status(&self) -> SubmissionStatus {
        match self.pane {
            Pane::Contact => self.contact.status(),
            Pane::Newsletter => self.newsletter.status(),
        }
    }

    fn focused_input_locked(&self) -> bool {
        match self.pane {
            Pane::Contact => self.contact.input_locked(),
            Pane::Newsletter => self.newsletter.input_locked(),
        }
    }

    pub fn switch_pane(&mut self) {
        self.pane = match self.pane {
            Pane::Contact => Pane::Newsletter,
            Pane::Newsletter => Pane::Contact,
        };
        self.selected = 0;
    }

    pub fn select_next(&mut self) {
        if self.selected < self.fields().len() {
            self.selected += 1;
        }
    }

    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Opens the selected field for editing, or fires the trigger when it is selected.
    pub fn activate(&mut self) {
        if self.trigger_selected() {
            self.submit_focused();
        } else {
            self.start_editing();
        }
    }

    pub fn start_editing(&mut self) {
        let Some(spec) = self.selected_field() else {
            return;
        };
        if self.focused_input_locked() {
            self.status_message = Some("Please wait for the current submission".to_string());
            return;
        }
        self.input = self.field_value(spec.name).to_string();
        self.cursor_position = self.input.chars().count();
        self.mode = AppMode::Editing;
        self.status_message = None;
    }

    pub fn finish_editing(&mut self) {
        let value = std::mem::take(&mut self.input);
        if let Some(spec) = self.selected_field() {
            let accepted = match self.pane {
                Pane::Contact => self.contact.set_field(spec.name, value),
                Pane::Newsletter => self.newsletter.set_field(spec.name, value),
            };
            if !accepted {
                self.status_message = Some("Field is locked while submitting".to_string());
            }
        }
        self.cursor_position = 0;
        self.mode = AppMode::Normal;
        if self.selected + 1 < self.fields().len() {
            self.selected += 1;
        }
    }

    pub fn cancel_editing(&mut self) {
        self.input.clear();
        self.cursor_position = 0;
        self.mode = AppMode::Normal;
    }

    fn byte_index(&self, char_index: usize) -> usize {
        self.input
            .char_indices()
            .nth(char_index)
            .map(|(i, _)| i)
            .unwrap_or(self.input.len())
    }

    pub fn insert_char(&mut self, c: char) {
        let at = self.byte_index(self.cursor_position);
        self.input.insert(at, c);
        self.cursor_position += 1;
    }

    pub fn insert_str(&mut self, text: &str) {
        let at = self.byte_index(self.cursor_position);
        self.input.insert_str(at, text);
        self.cursor_position += text.chars().count();
    }

    pub fn delete_before_cursor(&mut self) {
        if self.cursor_position > 0 {
            self.cursor_position -= 1;
            let at = self.byte_index(self.cursor_position);
            self.input.remove(at);
        }
    }

    pub fn delete_at_cursor(&mut self) {
        if self.cursor_position < self.input.chars().count() {
            let at = self.byte_index(self.cursor_position);
            self.input.remove(at);
        }
    }

    pub fn move_cursor_left(&mut self) {
        self.cursor_position = self.cursor_position.saturating_sub(1);
    }

    pub fn move_cursor_right(&mut self) {
        if self.cursor_position < self.input.chars().count() {
            self.cursor_position += 1;
        }
    }

    pub fn move_cursor_home(&mut self) {
        self.cursor_position = 0;
    }

    pub fn move_cursor_end(&mut self) {
        self.cursor_position = self.input.chars().count();
    }

    /// Validates the focused form and hands it to the dispatcher when valid.
    pub fn submit_focused(&mut self) {
        let result = match self.pane {
            Pane::Contact => submit(&mut self.contact, &self.dispatcher),
            Pane::Newsletter => submit(&mut self.newsletter, &self.dispatcher),
        };

        self.status_message = match result {
            Ok(()) => None,
            Err(SubmitRefused::InFlight) => None,
            Err(SubmitRefused::Invalid(errors)) => {
                if let Some(index) = self
                    .fields()
                    .iter()
                    .position(|spec| errors.contains(spec.name))
                {
                    self.selected = index;
                }
                Some("Please correct the highlighted fields".to_string())
            }
            Err(SubmitRefused::Encode(message)) => Some(message),
        };
    }

    /// Applies arrived outcomes and expires banners. Returns `true` if anything changed.
    pub fn on_tick(&mut self, now: Instant) -> bool {
        let mut changed = false;
        for completion in self.dispatcher.drain() {
            match completion.kind {
                FormKind::Contact => self.contact.complete(completion.ticket, completion.outcome, now),
                FormKind::Newsletter => {
                    self.newsletter.complete(completion.ticket, completion.outcome, now)
                }
            }
            changed = true;
        }
        changed |= self.contact.tick(now);
        changed |= self.newsletter.tick(now);
        changed
    }
}

fn submit<F: FormInput>(
    controller: &mut FormController<F>,
    dispatcher: &Dispatcher,
) -> Result<(), SubmitRefused> {
    let submission = controller.begin_submit()?;
    dispatcher.dispatch(submission);
    Ok(())
}
