use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::pages::{LoginField, LoginPage};

use super::overlay::centered_rect;

pub fn draw(frame: &mut Frame<'_>, page: &LoginPage, area: Rect) {
    let rect = centered_rect(48.min(area.width), 10.min(area.height), area);
    frame.render_widget(Clear, rect);

    let field = |label: &'static str, value: String, focused: bool| {
        let style = if focused {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        let cursor = if focused { "█" } else { "" };
        Line::from(vec![
            Span::styled(format!("{label:<10}"), style),
            Span::raw(value),
            Span::raw(cursor),
        ])
    };

    let mut lines = vec![
        field(
            "Username",
            page.username.clone(),
            page.focus == LoginField::Username,
        ),
        field(
            "Password",
            page.masked_password(),
            page.focus == LoginField::Password,
        ),
        Line::from(""),
    ];
    if page.submitting {
        lines.push(Line::from(Span::styled(
            "Signing in...",
            Style::default().fg(Color::Yellow),
        )));
    } else if let Some(err) = &page.error {
        lines.push(Line::from(Span::styled(
            err.clone(),
            Style::default().fg(Color::Red),
        )));
    } else {
        lines.push(Line::from(""));
    }
    lines.push(Line::from(Span::styled(
        "Tab switch  Enter sign in  Esc quit",
        Style::default().fg(Color::DarkGray),
    )));

    let panel = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title("walletdesk admin login")
            .border_style(Style::default().fg(Color::Cyan)),
    );
    frame.render_widget(panel, rect);
}
