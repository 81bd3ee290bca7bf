use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use walletdesk_core::models::{Order, OrderStatus};

use crate::fmt::{format_amount, format_timestamp, short_address, short_id, tx_hint};
use crate::pages::OrdersPage;

pub fn draw(frame: &mut Frame<'_>, page: &OrdersPage, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),
            Constraint::Length(u16::from(page.shows_pagination())),
        ])
        .split(area);

    let block = Block::default()
        .borders(Borders::ALL)
        .title("P2P orders");

    if page.loading && page.orders.is_empty() {
        frame.render_widget(Paragraph::new("Loading...").block(block), chunks[0]);
        return;
    }

    let mut lines = vec![header_line()];
    if page.orders.is_empty() {
        lines.push(Line::from(Span::styled(
            "No orders yet",
            Style::default().fg(Color::DarkGray),
        )));
    }
    for (i, order) in page.orders.iter().enumerate() {
        let mut line = order_line(order);
        line.spans.push(Span::raw("  "));
        line.spans.extend(action_spans(page, order));
        if i == page.selected {
            line = line.style(Style::default().add_modifier(Modifier::REVERSED));
        }
        lines.push(line);
    }
    frame.render_widget(Paragraph::new(lines).block(block), chunks[0]);

    if page.shows_pagination() {
        let footer = format!(
            "Page {} / {}   ← previous   → next",
            page.current_page, page.total_pages
        );
        frame.render_widget(Paragraph::new(footer), chunks[1]);
    }
}

pub(super) fn header_line() -> Line<'static> {
    Line::from(Span::styled(
        format!(
            "{:<10} {:<16} {:<14} {:<10} {:<17}",
            "ID", "AMOUNT", "WALLET", "STATUS", "CREATED"
        ),
        Style::default().add_modifier(Modifier::BOLD),
    ))
}

pub(super) fn order_line(order: &Order) -> Line<'static> {
    Line::from(vec![
        Span::raw(format!("{:<10} ", short_id(&order.id))),
        Span::raw(format!("{:<16} ", format_amount(order.amount))),
        Span::raw(format!("{:<14} ", short_address(&order.wallet_address))),
        Span::styled(
            format!("{:<10} ", order.status.label()),
            Style::default().fg(status_color(order.status)),
        ),
        Span::raw(format!("{:<17}", format_timestamp(order.created_at))),
    ])
}

fn action_spans(page: &OrdersPage, order: &Order) -> Vec<Span<'static>> {
    if page.is_busy(&order.id) {
        return vec![Span::styled("working...", Style::default().fg(Color::Yellow))];
    }
    let mut spans = Vec::new();
    if order.status.can_confirm() {
        spans.push(Span::styled("[c]onfirm [t]x ", Style::default().fg(Color::Green)));
    }
    if order.status.can_cancel() {
        spans.push(Span::styled("[x] cancel", Style::default().fg(Color::Red)));
    }
    if let Some(hint) = tx_hint(order) {
        spans.push(Span::styled(hint, Style::default().fg(Color::Green)));
    }
    spans
}

pub(super) const fn status_color(status: OrderStatus) -> Color {
    match status {
        OrderStatus::Pending => Color::Yellow,
        OrderStatus::Paid => Color::Blue,
        OrderStatus::Confirmed => Color::Green,
        OrderStatus::Cancelled => Color::Red,
        OrderStatus::Unknown => Color::DarkGray,
    }
}
