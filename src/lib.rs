//! citywx Library
//!
//! City weather dashboard: location parsing, geocoding, forecast retrieval,
//! persistence of the last location, and the terminal UI. Exposed as a
//! library for the binary and for integration tests.

pub mod app;
pub mod cli;
pub mod data;
pub mod logging;
pub mod pipeline;
pub mod presenter;
pub mod store;
pub mod ui;
