//! Display helpers shared by the subcommands and the TUI.

use std::io::{self, Write};

use chrono::{DateTime, Local, TimeZone, Utc};
use rust_decimal::Decimal;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};
use walletdesk_core::models::{DashboardStats, Order, OrderStatus, SystemConfig};

/// `#` followed by the last 8 characters of the id.
pub fn short_id(id: &str) -> String {
    let chars: Vec<char> = id.chars().collect();
    let start = chars.len().saturating_sub(8);
    format!("#{}", chars[start..].iter().collect::<String>())
}

/// `0x1234...abcd`. Short values are returned unchanged.
pub fn short_address(addr: &str) -> String {
    let chars: Vec<char> = addr.chars().collect();
    if chars.len() <= 10 {
        return addr.to_string();
    }
    let head: String = chars[..6].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}...{tail}")
}

/// `TX: 0xabcd...` for a confirmed order with a recorded hash.
pub fn tx_hint(order: &Order) -> Option<String> {
    if order.status != OrderStatus::Confirmed {
        return None;
    }
    let hash = order.tx_hash.as_deref().filter(|h| !h.is_empty())?;
    let head: String = hash.chars().take(6).collect();
    Some(format!("TX: {head}..."))
}

pub fn format_amount(amount: Decimal) -> String {
    format!("{} USDT", amount.normalize())
}

/// `dd/mm/yyyy HH:MM` in the local time zone.
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    format_timestamp_in(ts, &Local)
}

pub fn format_timestamp_in<Tz: TimeZone>(ts: DateTime<Utc>, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    ts.with_timezone(tz).format("%d/%m/%Y %H:%M").to_string()
}

/// Cut `s` to at most `max` terminal columns, marking the cut with `...`.
pub fn truncate(s: &str, max: usize) -> String {
    if s.width() <= max {
        return s.to_string();
    }
    let budget = max.saturating_sub(3);
    let mut used = 0;
    let mut kept = String::new();
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        kept.push(c);
    }
    format!("{kept}...")
}

pub fn write_order_table(w: &mut impl Write, orders: &[Order]) -> io::Result<()> {
    if orders.is_empty() {
        writeln!(w, "No orders")?;
        return Ok(());
    }
    writeln!(
        w,
        "{:<10} {:<16} {:<14} {:<10} {:<17} {}",
        "ID", "AMOUNT", "WALLET", "STATUS", "CREATED", "ORDER ID"
    )?;
    for o in orders {
        writeln!(
            w,
            "{:<10} {:<16} {:<14} {:<10} {:<17} {}{}",
            short_id(&o.id),
            format_amount(o.amount),
            short_address(&o.wallet_address),
            o.status.label(),
            format_timestamp(o.created_at),
            o.id,
            tx_hint(o).map(|t| format!("  {t}")).unwrap_or_default(),
        )?;
    }
    Ok(())
}

pub fn write_stats(w: &mut impl Write, stats: &DashboardStats) -> io::Result<()> {
    writeln!(w, "  Total:     {}", stats.total)?;
    writeln!(w, "  Pending:   {}", stats.pending)?;
    writeln!(w, "  Confirmed: {}", stats.confirmed)?;
    writeln!(w, "  Cancelled: {}", stats.cancelled)?;
    Ok(())
}

pub fn write_config(w: &mut impl Write, cfg: &SystemConfig) -> io::Result<()> {
    writeln!(w, "  Bank:      {}", cfg.bank_name)?;
    writeln!(w, "  Account:   {}", cfg.account_number)?;
    writeln!(w, "  Holder:    {}", cfg.account_holder)?;
    if !cfg.qr_image_url.is_empty() {
        writeln!(w, "  QR image:  {}", cfg.qr_image_url)?;
    }
    if !cfg.note.is_empty() {
        writeln!(w, "  Note:      {}", cfg.note)?;
    }
    writeln!(w, "  Wallet:    {}", cfg.admin_wallet_address)?;
    writeln!(w, "  USDT rate: {} VND", cfg.usdt_rate.normalize())?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use walletdesk_core::testing::sample_order;

    #[test]
    fn short_id_keeps_last_eight() {
        assert_eq!(short_id("665f1c2e9b1e8a0012345678"), "#12345678");
        assert_eq!(short_id("abc"), "#abc");
    }

    #[test]
    fn short_address_abbreviates() {
        assert_eq!(
            short_address("0x1234567890abcdef1234567890abcdef12345678"),
            "0x1234...5678"
        );
        assert_eq!(short_address("0x12"), "0x12");
    }

    #[test]
    fn tx_hint_only_for_confirmed_with_hash() {
        let mut order = sample_order("a", OrderStatus::Confirmed);
        assert!(tx_hint(&order).is_none());
        order.tx_hash = Some("0xdeadbeefcafe".into());
        assert_eq!(tx_hint(&order).as_deref(), Some("TX: 0xdead..."));
        order.status = OrderStatus::Paid;
        assert!(tx_hint(&order).is_none());
    }

    #[test]
    fn timestamp_is_day_first() {
        let order = sample_order("a", OrderStatus::Pending);
        assert_eq!(format_timestamp_in(order.created_at, &Utc), "01/05/2024 08:30");
    }

    #[test]
    fn amount_drops_trailing_zeros() {
        assert_eq!(format_amount(Decimal::new(10050, 2)), "100.5 USDT");
    }

    #[test]
    fn truncate_marks_cut() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello world", 8), "hello...");
    }

    #[test]
    fn truncate_counts_columns() {
        assert_eq!(truncate("NGUYỄN VĂN A", 12), "NGUYỄN VĂN A");
        assert_eq!(truncate("ngân hàng", 7), "ngân...");
        // Wide glyphs take two columns each.
        assert_eq!(truncate("銀行銀行", 7), "銀行...");
    }

    #[test]
    fn order_table_lists_rows() {
        let mut buf = Vec::new();
        write_order_table(&mut buf, &[sample_order("order-00000001", OrderStatus::Paid)]).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("#00000001"));
        assert!(text.contains("Paid"));
        assert!(text.contains("100.5 USDT"));
    }
}
