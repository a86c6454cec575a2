//! Application layer managing form state and submission workflows.
//!
//! This module sits between the domain rules and the terminal front end:
//! it owns each form's submission lifecycle and delivers requests off the
//! UI thread.

pub mod controller;
pub mod dispatch;
pub mod state;

pub use controller::*;
pub use dispatch::{Completion, Dispatcher};
pub use state::*;
