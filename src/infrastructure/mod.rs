//! Infrastructure layer providing external service integrations.
//!
//! HTTP delivery of form bodies, configuration loading, log output and
//! clipboard access live here.

pub mod clipboard;
pub mod config;
pub mod logging;
pub mod transport;

pub use config::*;
pub use transport::*;
