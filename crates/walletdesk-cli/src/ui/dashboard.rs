use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use walletdesk_core::models::OrderStatus;

use crate::pages::DashboardPage;

use super::orders::{header_line, order_line, status_color};

pub fn draw(frame: &mut Frame<'_>, page: &DashboardPage, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(3)])
        .split(area);

    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(chunks[0]);
    let stats = &page.stats;
    stat_card(frame, cards[0], "Total orders", stats.total, Color::Cyan);
    stat_card(
        frame,
        cards[1],
        "Pending",
        stats.pending,
        status_color(OrderStatus::Pending),
    );
    stat_card(
        frame,
        cards[2],
        "Confirmed",
        stats.confirmed,
        status_color(OrderStatus::Confirmed),
    );
    stat_card(
        frame,
        cards[3],
        "Cancelled",
        stats.cancelled,
        status_color(OrderStatus::Cancelled),
    );

    let block = Block::default()
        .borders(Borders::ALL)
        .title("Recent orders");
    let lines = if page.loading && page.recent.is_empty() {
        vec![Line::from("Loading...")]
    } else if page.recent.is_empty() {
        vec![Line::from(Span::styled(
            "No orders yet",
            Style::default().fg(Color::DarkGray),
        ))]
    } else {
        std::iter::once(header_line())
            .chain(page.recent.iter().map(order_line))
            .collect()
    };
    frame.render_widget(Paragraph::new(lines).block(block), chunks[1]);
}

fn stat_card(frame: &mut Frame<'_>, area: Rect, title: &str, value: u64, color: Color) {
    let card = Paragraph::new(Line::from(Span::styled(
        value.to_string(),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    )))
    .block(Block::default().borders(Borders::ALL).title(title.to_string()));
    frame.render_widget(card, area);
}
