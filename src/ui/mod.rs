//! UI rendering module for citywx
//!
//! This module contains all the rendering logic for the terminal user interface,
//! using the ratatui library for TUI components. Rendering only reads `App`.

pub mod candidates;
pub mod dashboard;
pub mod help_overlay;
pub mod widgets;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    Frame,
};

use crate::app::App;

pub use candidates::render as render_candidates;
pub use dashboard::render as render_dashboard;
pub use help_overlay::render as render_help_overlay;

/// Draws the whole screen: dashboard, then any open overlay
pub fn draw(frame: &mut Frame, app: &App) {
    render_dashboard(frame, app);

    if let Some(picker) = &app.picker {
        render_candidates(frame, picker, app.states());
    }
    if app.show_help {
        render_help_overlay(frame);
    }
}

/// Helper function to create a centered rect
pub(crate) fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length((area.height.saturating_sub(height)) / 2),
            Constraint::Length(height.min(area.height)),
            Constraint::Min(0),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length((area.width.saturating_sub(width)) / 2),
            Constraint::Length(width.min(area.width)),
            Constraint::Min(0),
        ])
        .split(vertical[1]);

    horizontal[1]
}
