//! Candidate picker overlay
//!
//! Lists the places an ambiguous search matched; the highlighted one is
//! chosen with Enter.

use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};

use super::centered_rect;
use crate::app::CandidatePicker;
use crate::data::StateTable;

/// Renders the picker on top of the dashboard
pub fn render(frame: &mut Frame, picker: &CandidatePicker, states: StateTable) {
    let labels = picker.labels(states);
    let widest = labels.iter().map(|l| l.chars().count()).max().unwrap_or(0) as u16;
    let width = (widest + 6).clamp(36, 72);
    // Border, items, blank line, hint
    let height = picker.candidates.len() as u16 + 4;
    let overlay_area = centered_rect(width, height, frame.area());

    frame.render_widget(Clear, overlay_area);

    let block = Block::default()
        .title(" Choose a location ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(overlay_area);
    frame.render_widget(block, overlay_area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(inner);

    let items: Vec<ListItem> = labels.into_iter().map(ListItem::new).collect();
    let list = List::new(items)
        .highlight_style(
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▶ ");
    let mut state = ListState::default().with_selected(Some(picker.selected));
    frame.render_stateful_widget(list, chunks[0], &mut state);

    let hint = Line::from(vec![
        Span::styled("↑/↓", Style::default().fg(Color::Yellow)),
        Span::raw(" Move  "),
        Span::styled("Enter", Style::default().fg(Color::Yellow)),
        Span::raw(" Choose  "),
        Span::styled("Esc", Style::default().fg(Color::Yellow)),
        Span::raw(" Cancel"),
    ]);
    frame.render_widget(
        Paragraph::new(hint).style(Style::default().fg(Color::DarkGray)),
        chunks[1],
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::GeocodeCandidate;
    use ratatui::{backend::TestBackend, Terminal};

    fn picker() -> CandidatePicker {
        let candidate = |state: &str, lat: f64, lon: f64| GeocodeCandidate {
            name: "Portland".to_string(),
            latitude: lat,
            longitude: lon,
            country_code: Some("US".to_string()),
            country: Some("United States".to_string()),
            state: Some(state.to_string()),
            admin1: None,
            admin1_code: None,
        };
        CandidatePicker {
            candidates: vec![
                candidate("Oregon", 45.52345, -122.67621),
                candidate("Maine", 43.66147, -70.25533),
            ],
            selected: 1,
        }
    }

    #[test]
    fn test_picker_lists_candidates_with_coordinates() {
        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();

        terminal
            .draw(|frame| render(frame, &picker(), StateTable::US))
            .unwrap();

        let buffer = terminal.backend().buffer();
        let content: String = buffer.content().iter().map(|cell| cell.symbol()).collect();

        assert!(content.contains("Choose a location"));
        assert!(content.contains("Portland, OR (45.52, -122.68)"));
        assert!(content.contains("Portland, ME (43.66, -70.26)"));
    }

    #[test]
    fn test_selected_candidate_is_marked() {
        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();

        terminal
            .draw(|frame| render(frame, &picker(), StateTable::US))
            .unwrap();

        let buffer = terminal.backend().buffer();
        let marked_row = (0..buffer.area.height).find_map(|y| {
            let row: String = (0..buffer.area.width)
                .map(|x| buffer[(x, y)].symbol())
                .collect();
            row.contains("▶").then_some(row)
        });
        let row = marked_row.expect("a highlighted row");
        assert!(row.contains("Portland, ME"));
    }
}
