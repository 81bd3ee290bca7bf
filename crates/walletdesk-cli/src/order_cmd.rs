//! Order subcommands: list, confirm, cancel.

use std::io::{self, Write};

use dialoguer::Confirm;
use walletdesk_core::models::{Order, OrderStatus};

use crate::context::{Context, action_error};
use crate::fmt::{short_id, write_order_table};

/// Order subcommand actions.
#[derive(clap::Subcommand, Debug)]
pub enum OrderAction {
    /// List P2P orders, newest first.
    List {
        /// Page number (1-based).
        #[arg(long, default_value_t = 1)]
        page: u32,
        /// Rows per page (defaults to the configured page size).
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Confirm a paid order.
    Confirm {
        /// Order ID.
        order_id: String,
        /// On-chain transaction hash of the USDT transfer.
        #[arg(long)]
        tx_hash: Option<String>,
    },
    /// Cancel a pending or paid order.
    Cancel {
        /// Order ID.
        order_id: String,
        /// Skip the confirmation prompt.
        #[arg(short, long)]
        yes: bool,
    },
}

/// Local refusal before anything is sent to the backend.
#[derive(Debug, thiserror::Error)]
pub enum OrderStateError {
    #[error("Order {id} is {status} and cannot be confirmed")]
    NotConfirmable { id: String, status: OrderStatus },
    #[error("Order {id} is {status} and cannot be cancelled")]
    NotCancellable { id: String, status: OrderStatus },
}

/// Execute an order subcommand.
pub async fn run(action: OrderAction, ctx: &Context) -> anyhow::Result<()> {
    ctx.require_login()?;
    let mut out = io::stdout();
    match action {
        OrderAction::List { page, limit } => {
            let limit = limit.unwrap_or(ctx.settings.ui.orders_page_size);
            list(ctx, page, limit, &mut out).await
        }
        OrderAction::Confirm { order_id, tx_hash } => {
            confirm(ctx, &order_id, tx_hash.as_deref(), &mut out).await
        }
        OrderAction::Cancel { order_id, yes } => {
            if !yes
                && !Confirm::new()
                    .with_prompt(format!("Cancel order {}?", short_id(&order_id)))
                    .default(false)
                    .interact()?
            {
                writeln!(out, "Aborted")?;
                return Ok(());
            }
            cancel(ctx, &order_id, &mut out).await
        }
    }
}

pub async fn list(ctx: &Context, page: u32, limit: u32, out: &mut impl Write) -> anyhow::Result<()> {
    let page = page.max(1);
    let result = ctx.api.p2p().get_orders(page, limit.max(1)).await?;
    write_order_table(out, &result.orders)?;
    if result.total_pages() > 1 {
        writeln!(out, "Page {} / {}", page, result.total_pages())?;
    }
    Ok(())
}

/// Scan the order list for `order_id` so its status can be checked before
/// anything is sent. `None` leaves the decision to the server.
async fn find_order(ctx: &Context, order_id: &str) -> anyhow::Result<Option<Order>> {
    let limit = ctx.settings.ui.orders_page_size.max(1);
    let mut page = 1;
    loop {
        let result = ctx.api.p2p().get_orders(page, limit).await?;
        let total_pages = result.total_pages();
        if let Some(order) = result.orders.into_iter().find(|o| o.id == order_id) {
            return Ok(Some(order));
        }
        if page >= total_pages {
            return Ok(None);
        }
        page += 1;
    }
}

pub async fn confirm(
    ctx: &Context,
    order_id: &str,
    tx_hash: Option<&str>,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let tx_hash = tx_hash.map(str::trim).filter(|h| !h.is_empty());
    if let Some(order) = find_order(ctx, order_id).await? {
        if !order.status.can_confirm() {
            return Err(OrderStateError::NotConfirmable {
                id: short_id(order_id),
                status: order.status,
            }
            .into());
        }
    }
    ctx.api
        .p2p()
        .confirm_order(order_id, tx_hash)
        .await
        .map_err(|e| action_error("Confirm failed", e))?;
    writeln!(out, "Order {} confirmed", short_id(order_id))?;
    Ok(())
}

pub async fn cancel(ctx: &Context, order_id: &str, out: &mut impl Write) -> anyhow::Result<()> {
    if let Some(order) = find_order(ctx, order_id).await? {
        if !order.status.can_cancel() {
            return Err(OrderStateError::NotCancellable {
                id: short_id(order_id),
                status: order.status,
            }
            .into());
        }
    }
    ctx.api
        .p2p()
        .cancel_order(order_id)
        .await
        .map_err(|e| action_error("Cancel failed", e))?;
    writeln!(out, "Order {} cancelled", short_id(order_id))?;
    Ok(())
}
