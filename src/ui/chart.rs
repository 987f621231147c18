//! Pain trend chart
//!
//! Y is the pain value (0-5), X the 1-based position of the record in
//! the log.

use ratatui::{
    layout::Rect,
    style::Style,
    symbols,
    text::Span,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph},
    Frame,
};

use super::theme::Theme;

/// Highest value in the pain table
const MAX_PAIN: f64 = 5.0;

/// Upper x bound; a lone point still gets a visible axis
pub fn x_upper_bound(points: usize) -> f64 {
    points.max(2) as f64
}

/// Up to five evenly spread x labels, always including first and last.
/// Only logged positions are labelled; a lone point's padded end stays blank.
pub fn x_labels(points: usize) -> Vec<String> {
    if points <= 1 {
        return vec!["1".to_string(), String::new()];
    }
    if points <= 5 {
        return (1..=points).map(|i| i.to_string()).collect();
    }
    let step = (points - 1) as f64 / 4.0;
    (0..5)
        .map(|i| (1.0 + step * i as f64).round() as usize)
        .map(|i| i.to_string())
        .collect()
}

pub fn draw_trend(f: &mut Frame, area: Rect, points: &[(f64, f64)], theme: &Theme) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.accent))
        .title(" Grafik Nyeri ")
        .style(Style::default().bg(theme.background));

    // Chart only appears once something is logged
    if points.is_empty() {
        let hint = Paragraph::new("Belum ada data")
            .style(Style::default().fg(theme.dimmed))
            .block(block);
        f.render_widget(hint, area);
        return;
    }

    let dataset = Dataset::default()
        .name("Nyeri")
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(theme.chart))
        .data(points);

    let axis_style = Style::default().fg(theme.dimmed);
    let chart = Chart::new(vec![dataset])
        .block(block)
        .x_axis(
            Axis::default()
                .title(Span::styled("Catatan", axis_style))
                .style(axis_style)
                .bounds([1.0, x_upper_bound(points.len())])
                .labels(x_labels(points.len())),
        )
        .y_axis(
            Axis::default()
                .title(Span::styled("Nyeri", axis_style))
                .style(axis_style)
                .bounds([0.0, MAX_PAIN])
                .labels((0..=MAX_PAIN as u32).map(|v| v.to_string())),
        );

    f.render_widget(chart, area);
}
