//! Token list and price feed subcommands.

use std::io::{self, Write};

use crate::context::Context;

#[derive(clap::Subcommand, Debug)]
pub enum TokensAction {
    /// List supported tokens.
    List,
    /// Ask the backend to refresh its token list.
    Refresh,
}

pub async fn run_tokens(action: TokensAction, ctx: &Context) -> anyhow::Result<()> {
    let mut out = io::stdout();
    let value = match action {
        TokensAction::List => ctx.api.tokens().get_tokens().await?,
        TokensAction::Refresh => {
            ctx.require_login()?;
            ctx.api.tokens().refresh_tokens().await?
        }
    };
    writeln!(out, "{}", serde_json::to_string_pretty(&value)?)?;
    Ok(())
}

pub async fn run_prices(symbols: &[String], ctx: &Context) -> anyhow::Result<()> {
    let symbols: Vec<String> = symbols.iter().map(|s| s.trim().to_uppercase()).collect();
    let refs: Vec<&str> = symbols.iter().map(String::as_str).collect();
    let prices = ctx.api.prices().get_prices(&refs).await?;
    let mut out = io::stdout();
    match prices.as_object() {
        Some(map) => {
            for (symbol, price) in map {
                writeln!(out, "{symbol:<8} {price}")?;
            }
        }
        None => writeln!(out, "{}", serde_json::to_string_pretty(&prices)?)?,
    }
    Ok(())
}
