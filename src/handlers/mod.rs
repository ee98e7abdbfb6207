//! Event handling
//!
//! - **`keys`**: keyboard dispatch per screen
//! - **`tasks`**: one-shot background work and its completion events
//! - **`editor`**: handing the terminal to an external editor

pub mod editor;
pub mod keys;
pub mod tasks;
