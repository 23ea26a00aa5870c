//! Terminal UI for the initiative tracker.
//!
//! Presents a scene file as the host canvas next to the initiative list.
//! The presenter turns tracker state into a view model; the terminal layer
//! draws that view with ratatui.

pub mod app;
pub mod presenter;
pub mod shared;
pub mod terminal;
pub mod views;
