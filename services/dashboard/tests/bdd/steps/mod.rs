//! BDD step definitions for the dashboard service

pub mod selector_steps;
pub mod settings_steps;
