//! Temperature sparkline widget for the 24-hour strip

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

/// Block characters for different temperatures (8 levels)
const BLOCKS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// A sparkline of hourly temperatures, scaled between their own min and max
///
/// Missing hours are left blank. The first hour is highlighted as "now".
pub struct TempSparkline<'a> {
    temperatures: &'a [Option<f64>],
    /// Columns per hour
    cell_width: u16,
    style: Style,
    marker_style: Style,
}

impl<'a> TempSparkline<'a> {
    pub fn new(temperatures: &'a [Option<f64>]) -> Self {
        Self {
            temperatures,
            cell_width: 1,
            style: Style::default().fg(Color::Yellow),
            marker_style: Style::default().fg(Color::LightRed),
        }
    }

    pub fn cell_width(mut self, width: u16) -> Self {
        self.cell_width = width.max(1);
        self
    }

    /// (min, max) over the present values
    fn range(&self) -> Option<(f64, f64)> {
        self.temperatures
            .iter()
            .flatten()
            .fold(None, |acc, &t| match acc {
                None => Some((t, t)),
                Some((lo, hi)) => Some((lo.min(t), hi.max(t))),
            })
    }

    fn temperature_to_block(&self, temperature: f64, min: f64, max: f64) -> char {
        let span = max - min;
        let normalized = if span > 0.0 {
            ((temperature - min) / span).clamp(0.0, 1.0)
        } else {
            0.5
        };
        let index = ((normalized * 7.0).round() as usize).min(7);
        BLOCKS[index]
    }
}

impl<'a> Widget for TempSparkline<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let Some((min, max)) = self.range() else {
            return;
        };

        let columns = (area.width / self.cell_width) as usize;

        for (i, temperature) in self.temperatures.iter().take(columns).enumerate() {
            let Some(temperature) = temperature else {
                continue;
            };
            let block = self.temperature_to_block(*temperature, min, max);
            let style = if i == 0 {
                self.marker_style
            } else {
                self.style
            };

            let x0 = area.x + i as u16 * self.cell_width;
            for dx in 0..self.cell_width {
                if let Some(cell) = buf.cell_mut((x0 + dx, area.y)) {
                    cell.set_char(block).set_style(style);
                }
            }
        }
    }
}
