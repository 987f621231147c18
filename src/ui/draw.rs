use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use super::chart::draw_trend;
use super::theme::Theme;
use crate::app::{App, AppMode, PickerField};
use crate::platform::{Alert, Severity};
use crate::session::FormField;

/// Main draw function
pub fn draw(f: &mut Frame, app: &App) {
    let theme = app.theme();
    let area = f.area();
    let bg_block = Block::default().style(Style::default().bg(theme.background));
    f.render_widget(bg_block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Title
            Constraint::Length(7), // Alarm + form
            Constraint::Min(8),    // Chart
            Constraint::Length(4), // Alerts
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(chunks[1]);

    draw_title(f, app, chunks[0], theme);
    draw_alarm_panel(f, app, top[0], theme);
    draw_form(f, app, top[1], theme);
    draw_trend(f, chunks[2], &app.trend_points(), theme);
    draw_alerts(f, app, chunks[3], theme);
    draw_status_bar(f, app, chunks[4], theme);

    if let AppMode::TimePicker { draft, field } = app.mode() {
        let hour = format!("{:02}", draft.hour());
        let minute = format!("{:02}", draft.minute());
        draw_picker(f, &hour, &minute, *field, theme);
    }
}

fn draw_title(f: &mut Frame, app: &App, area: Rect, theme: &Theme) {
    let title = Line::from(vec![
        Span::styled(
            " Plester Hydrogel App ",
            Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("  {} catatan", app.records().len()),
            Style::default().fg(theme.dimmed),
        ),
    ]);
    f.render_widget(Paragraph::new(title), area);
}

fn draw_alarm_panel(f: &mut Frame, app: &App, area: Rect, theme: &Theme) {
    let session = app.session();

    let state = match session.reminder.active() {
        Some(active) => Line::from(vec![
            Span::styled("● ", Style::default().fg(theme.armed)),
            Span::styled(
                format!("Aktif setiap hari {}", active.time),
                Style::default().fg(theme.foreground),
            ),
        ]),
        None => Line::from(Span::styled("○ Tidak aktif", Style::default().fg(theme.dimmed))),
    };

    let mut lines = vec![
        Line::from(vec![
            Span::styled("Jam alarm  ", Style::default().fg(theme.dimmed)),
            Span::styled(
                session.alarm_time.to_string(),
                Style::default().fg(theme.highlight).add_modifier(Modifier::BOLD),
            ),
        ]),
        state,
        Line::from(""),
        Line::from(Span::styled(
            "t: setel  a: konfirmasi",
            Style::default().fg(theme.dimmed),
        )),
    ];
    // Stop is only offered while armed
    if session.reminder.is_armed() {
        lines.push(Line::from(Span::styled("x: stop alarm", Style::default().fg(theme.dimmed))));
    }

    let panel = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.accent))
            .title(" Alarm ")
            .style(Style::default().bg(theme.background)),
    );
    f.render_widget(panel, area);
}

fn draw_form(f: &mut Frame, app: &App, area: Rect, theme: &Theme) {
    let form = &app.session().form;

    let mut lines: Vec<Line> = FormField::ALL
        .iter()
        .map(|&field| {
            let focused = field == app.focus();
            let options = field.options();
            let selected = form.selected_index(field);

            let value = match selected {
                Some(i) => Span::styled(
                    format!("◀ {} ▶", options[i]),
                    if focused {
                        Style::default().fg(theme.highlight).add_modifier(Modifier::BOLD)
                    } else {
                        Style::default().fg(theme.foreground)
                    },
                ),
                None => Span::styled(
                    "◀ -- pilih -- ▶",
                    Style::default().fg(if focused { theme.highlight } else { theme.dimmed }),
                ),
            };

            let position = selected
                .map(|i| format!("  {}/{}", i + 1, options.len()))
                .unwrap_or_default();

            let marker = if focused { "› " } else { "  " };
            Line::from(vec![
                Span::styled(marker, Style::default().fg(theme.highlight)),
                Span::styled(format!("{:<15}", field.title()), Style::default().fg(theme.foreground)),
                value,
                Span::styled(position, Style::default().fg(theme.dimmed)),
            ])
        })
        .collect();

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "s/Enter: simpan",
        Style::default().fg(theme.dimmed),
    )));

    let panel = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.accent))
            .title(" Form Monitoring ")
            .style(Style::default().bg(theme.background)),
    );
    f.render_widget(panel, area);
}

fn draw_alerts(f: &mut Frame, app: &App, area: Rect, theme: &Theme) {
    let visible = area.height.saturating_sub(2) as usize;
    let lines: Vec<Line> = app
        .alerts()
        .recent()
        .take(visible)
        .enumerate()
        .map(|(i, alert)| {
            let style = alert_style(alert, i == 0, theme);
            Line::from(vec![
                Span::styled(format!("{} ", alert.at.format("%H:%M")), Style::default().fg(theme.dimmed)),
                Span::styled(alert.line(), style),
            ])
        })
        .collect();

    let panel = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(Style::default().fg(theme.dimmed))
            .title(" Pesan "),
    );
    f.render_widget(panel, area);
}

/// Failures keep their color even once newer alerts push them down
fn alert_style(alert: &Alert, newest: bool, theme: &Theme) -> Style {
    match (alert.severity, newest) {
        (Severity::Failure, true) => Style::default().fg(theme.failure).add_modifier(Modifier::BOLD),
        (Severity::Failure, false) => Style::default().fg(theme.failure),
        (Severity::Info, true) => Style::default().fg(theme.foreground),
        (Severity::Info, false) => Style::default().fg(theme.dimmed),
    }
}

fn draw_status_bar(f: &mut Frame, app: &App, area: Rect, theme: &Theme) {
    let status = match app.mode() {
        AppMode::TimePicker { .. } => {
            " ↑/↓: ubah | ←/→/Tab: jam/menit | Enter: pilih | Esc: batal".to_string()
        }
        _ => {
            let export = match app.last_export() {
                Some(file) => format!(" | terakhir: {}", file.path().display()),
                None => String::new(),
            };
            format!(
                " Tab/j/k: pindah | ←/→: pilih | s: simpan | e: ekspor | q: keluar{}",
                export
            )
        }
    };

    let status_bar = Paragraph::new(status).style(Style::default().fg(theme.dimmed));
    f.render_widget(status_bar, area);
}

fn draw_picker(f: &mut Frame, hour: &str, minute: &str, field: PickerField, theme: &Theme) {
    let area = centered_rect(24, 5, f.area());
    f.render_widget(Clear, area);

    let active = Style::default()
        .fg(theme.background)
        .bg(theme.highlight)
        .add_modifier(Modifier::BOLD);
    let idle = Style::default().fg(theme.foreground);
    let (hour_style, minute_style) = match field {
        PickerField::Hour => (active, idle),
        PickerField::Minute => (idle, active),
    };

    let lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::raw("     "),
            Span::styled(format!(" {} ", hour), hour_style),
            Span::styled(" : ", idle),
            Span::styled(format!(" {} ", minute), minute_style),
        ]),
    ];

    let picker = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.highlight))
            .title(" Setel Alarm ")
            .style(Style::default().bg(theme.background)),
    );
    f.render_widget(picker, area);
}

/// Fixed-size rect centered in `area`, clipped to fit
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
