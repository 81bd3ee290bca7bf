//! Centered overlays: result notices, yes/no prompt, tx hash input.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::pages::{Notice, TxHashModal};

pub fn render_notice(frame: &mut Frame<'_>, area: Rect, notice: &Notice) {
    let (title, color) = if notice.is_error() {
        ("Error", Color::Red)
    } else {
        ("Done", Color::Green)
    };
    let lines = vec![
        Line::from(notice.text().to_string()),
        Line::from(""),
        Line::from(Span::styled(
            "Press Enter to continue",
            Style::default().fg(Color::DarkGray),
        )),
    ];
    render_box(frame, area, title, color, lines, 50, 7);
}

pub fn render_cancel_prompt(frame: &mut Frame<'_>, area: Rect, order_label: &str) {
    let lines = vec![
        Line::from(format!("Cancel order {order_label}?")),
        Line::from(""),
        Line::from(vec![
            Span::styled("[y]", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
            Span::raw(" cancel order   "),
            Span::styled("[n]", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" keep"),
        ]),
    ];
    render_box(frame, area, "Confirm", Color::Yellow, lines, 44, 7);
}

pub fn render_tx_modal(frame: &mut Frame<'_>, area: Rect, modal: &TxHashModal, order_label: &str) {
    let lines = vec![
        Line::from(format!("Transaction hash for order {order_label}:")),
        Line::from(vec![
            Span::styled("> ", Style::default().fg(Color::Cyan)),
            Span::raw(modal.input.clone()),
            Span::styled("█", Style::default().fg(Color::White)),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "Enter confirm  Esc close",
            Style::default().fg(Color::DarkGray),
        )),
    ];
    render_box(frame, area, "Confirm with TX hash", Color::Cyan, lines, 76, 8);
}

fn render_box(
    frame: &mut Frame<'_>,
    area: Rect,
    title: &str,
    color: Color,
    lines: Vec<Line<'_>>,
    width: u16,
    height: u16,
) {
    let width = width.min(area.width.saturating_sub(4));
    let height = height.min(area.height.saturating_sub(2));
    let rect = centered_rect(width, height, area);
    frame.render_widget(Clear, rect);
    let panel = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .title(title.to_string())
            .border_style(Style::default().fg(color)),
    );
    frame.render_widget(panel, rect);
}

/// Compute a centered rectangle within the given area.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(area.height.saturating_sub(height) / 2),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(area.width.saturating_sub(width) / 2),
            Constraint::Length(width),
            Constraint::Min(0),
        ])
        .split(vertical[1]);

    horizontal[1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centered_rect_is_centered() {
        let area = Rect::new(0, 0, 100, 40);
        let r = centered_rect(50, 10, area);
        assert_eq!(r, Rect::new(25, 15, 50, 10));
    }

    #[test]
    fn centered_rect_clamps_to_area() {
        let area = Rect::new(0, 0, 20, 5);
        let r = centered_rect(50, 10, area);
        assert!(r.width <= 20 && r.height <= 5);
    }
}
