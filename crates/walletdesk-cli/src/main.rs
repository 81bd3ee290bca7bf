//! walletdesk CLI
//!
//! Terminal admin console for the custodial USDT wallet backend.
//! Runs the TUI when no subcommand is given.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::{info, warn};

use walletdesk_cli::auth_cmd::{self, AuthAction};
use walletdesk_cli::context::{Context, with_login_hint};
use walletdesk_cli::market_cmd::{self, TokensAction};
use walletdesk_cli::order_cmd::{self, OrderAction};
use walletdesk_cli::settings_cmd::{self, SettingsAction};
use walletdesk_cli::{dashboard_cmd, tui};
use walletdesk_core::config::{default_log_path, load_settings};
use walletdesk_core::tracing_init::{init_file_tracing, init_tracing};

#[derive(Parser, Debug)]
#[command(name = "walletdesk")]
#[command(version, about = "Admin console for the custodial USDT wallet", long_about = None)]
struct Cli {
    /// Admin API base URL (e.g. "https://wallet.example.com/api")
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Cookie jar holding the admin session
    #[arg(long, global = true)]
    cookie_file: Option<PathBuf>,

    /// Emit JSON log lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Log in, log out, show session status
    Auth {
        #[command(subcommand)]
        action: AuthAction,
    },
    /// List, confirm, cancel P2P orders
    Orders {
        #[command(subcommand)]
        action: OrderAction,
    },
    /// Order counters and recent orders
    Dashboard,
    /// Show or change the system configuration
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
    /// Supported tokens
    Tokens {
        #[command(subcommand)]
        action: TokensAction,
    },
    /// Current prices for the given symbols
    Prices {
        /// Token symbols, e.g. BTC ETH USDT
        #[arg(required = true)]
        symbols: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // The TUI owns the terminal, so its logs go to a file.
    if cli.command.is_some() {
        init_tracing("walletdesk=info", cli.log_json);
    } else if let Some(path) = default_log_path() {
        if let Err(e) = init_file_tracing("walletdesk=warn", cli.log_json, &path) {
            eprintln!("walletdesk: logging disabled: {e}");
        }
    }

    let mut settings = load_settings()?;
    if let Some(url) = cli.api_url {
        settings.api.base_url = url;
    }
    if let Some(path) = cli.cookie_file {
        settings.session.cookie_file = Some(path);
    }
    info!(version = env!("CARGO_PKG_VERSION"), api = %settings.api.base_url, "Starting walletdesk");

    let ctx = Context::open(settings)?;
    let result = match cli.command {
        Some(Commands::Auth { action }) => auth_cmd::run(action, &ctx).await,
        Some(Commands::Orders { action }) => order_cmd::run(action, &ctx).await,
        Some(Commands::Dashboard) => dashboard_cmd::run(&ctx).await,
        Some(Commands::Settings { action }) => settings_cmd::run(action, &ctx).await,
        Some(Commands::Tokens { action }) => market_cmd::run_tokens(action, &ctx).await,
        Some(Commands::Prices { symbols }) => market_cmd::run_prices(&symbols, &ctx).await,
        None => tui::run(ctx).await,
    }
    .map_err(with_login_hint);
    if let Err(ref e) = result {
        warn!(error = %e, "Command failed");
    }
    result
}
