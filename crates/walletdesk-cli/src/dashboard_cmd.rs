//! `walletdesk dashboard`: counters and recent orders.

use std::io::{self, Write};

use walletdesk_core::models::DashboardStats;

use crate::context::Context;
use crate::fmt::{write_order_table, write_stats};

pub async fn run(ctx: &Context) -> anyhow::Result<()> {
    let user = ctx.require_login()?;
    let mut out = io::stdout();
    writeln!(out, "Signed in as {}", user.username)?;
    show(ctx, &mut out).await
}

pub async fn show(ctx: &Context, out: &mut impl Write) -> anyhow::Result<()> {
    let page = ctx
        .api
        .p2p()
        .get_orders(1, ctx.settings.ui.dashboard_page_size.max(1))
        .await?;
    let stats = DashboardStats::from_page(&page);
    writeln!(out, "Orders")?;
    write_stats(out, &stats)?;
    writeln!(out)?;
    writeln!(out, "Recent orders")?;
    write_order_table(out, &page.orders)?;
    Ok(())
}
