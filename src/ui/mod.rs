//! Terminal rendering
//!
//! Every renderer takes the application state by shared reference and only
//! draws; state changes happen in the key handlers.

pub mod browser;
pub mod colors;
pub mod components;
pub mod form;
pub mod input;
pub mod layout;
pub mod start_page;
pub mod theme;
