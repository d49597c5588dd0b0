//! Main dashboard screen
//!
//! Renders, top to bottom: the search box, the header, the current
//! conditions panel (tinted by sky category), the 10-day grid and the
//! 24-hour strip with a temperature sparkline.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::widgets::TempSparkline;
use crate::app::App;
use crate::data::Sky;
use crate::presenter::{DayCell, HourCell, Panels, UiState};

/// Days per row of the forecast grid
const DAYS_PER_ROW: usize = 5;
/// Hours per column of the hourly strip
const HOURS_PER_COLUMN: usize = 12;

/// Color scheme for the dashboard
mod colors {
    use ratatui::style::Color;

    /// Section borders and titles
    pub const HEADER: Color = Color::Cyan;
    /// Primary text
    pub const PRIMARY: Color = Color::White;
    /// Secondary/dimmed text
    pub const SECONDARY: Color = Color::Gray;
    /// Hints and placeholders
    pub const DIM: Color = Color::DarkGray;
    /// Key names in the footer
    pub const KEY: Color = Color::Yellow;
}

/// Accent color for a sky category
fn sky_color(sky: Option<Sky>) -> Color {
    match sky {
        Some(Sky::Clear) => Color::Yellow,
        Some(Sky::Cloudy) => Color::Gray,
        Some(Sky::Rain) => Color::Blue,
        Some(Sky::Snow) => Color::White,
        Some(Sky::Thunder) => Color::Magenta,
        Some(Sky::Default) | None => colors::HEADER,
    }
}

/// Color for a Fahrenheit temperature (warmer = more red, cooler = more blue)
fn temperature_color(temp: f64) -> Color {
    if temp >= 90.0 {
        Color::Red
    } else if temp >= 80.0 {
        Color::LightRed
    } else if temp >= 70.0 {
        Color::Yellow
    } else if temp >= 55.0 {
        Color::Green
    } else if temp >= 40.0 {
        Color::Cyan
    } else {
        Color::Blue
    }
}

/// Renders the dashboard
///
/// # Arguments
/// * `frame` - The ratatui frame to render into
/// * `app` - The application state
pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),  // Search box
            Constraint::Length(1),  // Header
            Constraint::Length(4),  // Current conditions
            Constraint::Length(12), // 10-day grid
            Constraint::Min(4),     // 24-hour strip
            Constraint::Length(1),  // Footer
        ])
        .split(frame.area());

    let presenter = app.presenter();
    let panels = presenter.panels();

    render_search_box(frame, chunks[0], app);
    render_header(frame, chunks[1], panels);
    render_current(frame, chunks[2], panels);
    render_forecast(frame, chunks[3], panels, presenter.state());
    render_hourly(frame, chunks[4], panels);
    render_footer(frame, chunks[5]);
}

fn render_search_box(frame: &mut Frame, area: Rect, app: &App) {
    let editing = app.picker.is_none() && !app.show_help;
    let line = if app.input.is_empty() && editing {
        Line::from(vec![
            Span::styled("▏", Style::default().fg(colors::KEY)),
            Span::styled(
                "City, State (e.g. Austin, TX)",
                Style::default().fg(colors::DIM),
            ),
        ])
    } else {
        let mut spans = vec![Span::styled(
            app.input.clone(),
            Style::default().fg(colors::PRIMARY),
        )];
        if editing {
            spans.push(Span::styled("▏", Style::default().fg(colors::KEY)));
        }
        Line::from(spans)
    };

    let block = Block::default()
        .title(" Location ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors::HEADER));
    frame.render_widget(Paragraph::new(line).block(block), area);
}

fn render_header(frame: &mut Frame, area: Rect, panels: &Panels) {
    let header = Paragraph::new(Span::styled(
        panels.header.clone(),
        Style::default()
            .fg(colors::PRIMARY)
            .add_modifier(Modifier::BOLD),
    ))
    .alignment(Alignment::Center);
    frame.render_widget(header, area);
}

fn render_current(frame: &mut Frame, area: Rect, panels: &Panels) {
    let accent = sky_color(panels.sky);

    let mut lines = Vec::new();
    if !panels.temperature.is_empty() {
        lines.push(Line::from(Span::styled(
            panels.temperature.clone(),
            Style::default().fg(accent).add_modifier(Modifier::BOLD),
        )));
    }
    if let Some(description) = &panels.description {
        let mut spans = Vec::new();
        if let Some(entry) = description.entry {
            spans.push(Span::raw(format!("{} ", entry.glyph)));
        }
        spans.push(Span::styled(
            description.text.clone(),
            Style::default().fg(colors::SECONDARY),
        ));
        lines.push(Line::from(spans));
    }

    let block = Block::default()
        .title(" Now ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(accent));
    frame.render_widget(
        Paragraph::new(lines)
            .block(block)
            .alignment(Alignment::Center),
        area,
    );
}

fn render_forecast(frame: &mut Frame, area: Rect, panels: &Panels, state: UiState) {
    let block = Block::default()
        .title(" 10-Day Forecast ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors::HEADER));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if panels.forecast.is_empty() {
        let hint = match state {
            UiState::Idle => "Type a city and press Enter",
            UiState::Searching => "Loading…",
            UiState::Resolved | UiState::Error(_) => "",
        };
        frame.render_widget(
            Paragraph::new(Span::styled(hint, Style::default().fg(colors::DIM)))
                .alignment(Alignment::Center),
            inner,
        );
        return;
    }

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(5), Constraint::Length(5)])
        .split(inner);

    for (row_area, days) in rows.iter().zip(panels.forecast.chunks(DAYS_PER_ROW)) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![
                Constraint::Ratio(1, DAYS_PER_ROW as u32);
                DAYS_PER_ROW
            ])
            .split(*row_area);
        for (cell_area, day) in columns.iter().zip(days) {
            render_day_cell(frame, *cell_area, day);
        }
    }
}

fn render_day_cell(frame: &mut Frame, area: Rect, day: &DayCell) {
    let high_color = day.high_value.map_or(colors::SECONDARY, temperature_color);
    let lines = vec![
        Line::from(format!("{} {}", day.entry.glyph, day.label)),
        Line::from(Span::styled(day.high.clone(), Style::default().fg(high_color))),
        Line::from(Span::styled(
            day.low.clone(),
            Style::default().fg(colors::SECONDARY),
        )),
    ];
    let block = Block::default()
        .title(format!(" {} ", day.day))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors::DIM));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_hourly(frame: &mut Frame, area: Rect, panels: &Panels) {
    let block = Block::default()
        .title(" Next 24 Hours ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors::HEADER));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if panels.hourly.is_empty() || inner.height == 0 {
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(inner);

    let temperatures: Vec<Option<f64>> = panels.hourly.iter().map(|h| h.temperature).collect();
    let cell_width = (chunks[0].width / temperatures.len().max(1) as u16).clamp(1, 3);
    frame.render_widget(
        TempSparkline::new(&temperatures).cell_width(cell_width),
        chunks[0],
    );

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 2), Constraint::Ratio(1, 2)])
        .split(chunks[1]);
    for (column_area, hours) in columns.iter().zip(panels.hourly.chunks(HOURS_PER_COLUMN)) {
        let lines: Vec<Line> = hours.iter().map(hour_line).collect();
        frame.render_widget(Paragraph::new(lines), *column_area);
    }
}

fn hour_line(hour: &HourCell) -> Line<'static> {
    let temp_color = hour.temperature.map_or(colors::SECONDARY, temperature_color);
    Line::from(vec![
        Span::styled(format!("{:>5} ", hour.time), Style::default().fg(colors::KEY)),
        Span::raw(format!("{} ", hour.entry.glyph)),
        Span::styled(format!("{:<14} ", hour.label), Style::default().fg(colors::SECONDARY)),
        Span::styled(hour.details.clone(), Style::default().fg(temp_color)),
    ])
}

fn render_footer(frame: &mut Frame, area: Rect) {
    let help_text = Line::from(vec![
        Span::styled("Enter", Style::default().fg(colors::KEY)),
        Span::raw(" Search  "),
        Span::styled("F1", Style::default().fg(colors::KEY)),
        Span::raw(" Help  "),
        Span::styled("Esc", Style::default().fg(colors::KEY)),
        Span::raw(" Quit"),
    ]);
    frame.render_widget(
        Paragraph::new(help_text).style(Style::default().fg(colors::DIM)),
        area,
    );
}
