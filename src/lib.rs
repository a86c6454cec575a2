//! olaris - contact and newsletter forms for Olaris Consulting
//!
//! Validates form input, delivers each submission as a single JSON POST and
//! tracks its idle/submitting/success/error lifecycle, with a terminal front end.

pub mod domain;
pub mod application;
pub mod infrastructure;
pub mod presentation;

pub use domain::*;
pub use application::*;
