//! Team Gantt: per-assignee Gantt lanes with working-day aware drag
//! rescheduling.
//!
//! Layout and drag logic live in [`model`] and are independent of egui.
//! [`io`] holds the store boundary, [`ui`] the egui widgets, and [`app`]
//! ties them together.

pub mod app;
pub mod config;
pub mod error;
pub mod io;
pub mod model;
pub mod ui;
