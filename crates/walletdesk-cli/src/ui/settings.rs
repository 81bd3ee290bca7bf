use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::fmt::truncate;
use crate::pages::{QrPreview, SettingsField, SettingsPage};

pub fn draw(frame: &mut Frame<'_>, page: &SettingsPage, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(SettingsField::ALL.len() as u16 + 2),
            Constraint::Min(3),
        ])
        .split(area);

    let title = if page.saving {
        "System settings (saving...)"
    } else if page.loading {
        "System settings (loading...)"
    } else {
        "System settings"
    };
    let value_width = usize::from(area.width.saturating_sub(24));
    let lines: Vec<Line> = SettingsField::ALL
        .iter()
        .map(|&field| {
            let focused = field == page.focus;
            let marker = if field.is_required() { "*" } else { " " };
            let label_style = if focused {
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            Line::from(vec![
                Span::styled(format!("{:<17}{marker} ", field.label()), label_style),
                Span::raw(truncate(page.value(field), value_width)),
                Span::raw(if focused { "█" } else { "" }),
            ])
        })
        .collect();
    frame.render_widget(
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(title)),
        chunks[0],
    );

    let preview = match &page.qr {
        QrPreview::Available(url) => Line::from(vec![
            Span::styled("QR code: ", Style::default().fg(Color::Green)),
            Span::raw(url.clone()),
        ]),
        QrPreview::Unchecked(_) => Line::from(Span::styled(
            "QR code: checking...",
            Style::default().fg(Color::DarkGray),
        )),
        QrPreview::Empty | QrPreview::Broken(_) => Line::from(""),
    };
    frame.render_widget(
        Paragraph::new(preview).block(Block::default().borders(Borders::ALL).title("Preview")),
        chunks[1],
    );
}
