//! Top-level layout: header with navigation, page body, key hints.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::app::App;
use crate::fmt::short_id;
use crate::pages::Route;

use super::{dashboard, login, orders, overlay, settings};

/// Draw the full UI.
pub fn draw(frame: &mut Frame<'_>, app: &App) {
    if app.route == Route::Login {
        login::draw(frame, &app.login, frame.area());
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header
            Constraint::Min(5),    // Page
            Constraint::Length(1), // Key hints
        ])
        .split(frame.area());

    draw_header(frame, app, chunks[0]);
    match app.route {
        Route::Dashboard => dashboard::draw(frame, &app.dashboard, chunks[1]),
        Route::Orders => orders::draw(frame, &app.orders, chunks[1]),
        Route::Settings => settings::draw(frame, &app.settings, chunks[1]),
        Route::Login => {}
    }
    draw_hints(frame, app, chunks[2]);

    let area = frame.area();
    if let Some(order_id) = &app.cancel_prompt {
        overlay::render_cancel_prompt(frame, area, &short_id(order_id));
    } else if let Some(modal) = &app.orders.tx_modal {
        if app.route == Route::Orders {
            overlay::render_tx_modal(frame, area, modal, &short_id(&modal.order_id));
        }
    }
    if let Some(notice) = app.notice() {
        overlay::render_notice(frame, area, notice);
    }
}

fn draw_header(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let mut spans = vec![Span::styled(
        "walletdesk",
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )];
    for (i, route) in Route::NAV.iter().enumerate() {
        spans.push(Span::raw("  "));
        let label = format!("{} {}", i + 1, route.title());
        if *route == app.route {
            spans.push(Span::styled(
                label,
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ));
        } else {
            spans.push(Span::raw(label));
        }
    }
    if let Some(user) = &app.user {
        spans.push(Span::styled(
            format!("  | {}", user.username),
            Style::default().fg(Color::DarkGray),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_hints(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let hints = match app.route {
        Route::Orders if app.orders.tx_modal.is_some() => "Enter confirm  Esc close",
        Route::Orders => {
            "↑/↓ select  ←/→ page  c confirm  t confirm with TX  x cancel  r refresh  L logout  q quit"
        }
        Route::Settings => "Tab/↑/↓ field  type to edit  Ctrl+S save  F5 reload  Esc back",
        Route::Dashboard => "1-3 switch page  r refresh  L logout  q quit",
        Route::Login => "",
    };
    frame.render_widget(
        Paragraph::new(Span::styled(hints, Style::default().fg(Color::DarkGray))),
        area,
    );
}
