//! Event handling module.
//!
//! Terminal events: key presses polled on a separate thread and translated
//! into form actions.

pub mod terminal;
