//! System configuration subcommands: show, set.

use std::io::{self, Write};

use rust_decimal::Decimal;
use walletdesk_core::models::SystemConfig;

use crate::context::{Context, action_error};
use crate::fmt::write_config;

#[derive(clap::Subcommand, Debug)]
pub enum SettingsAction {
    /// Show the current configuration.
    Show,
    /// Change some fields. Unset fields keep their current value.
    Set(ConfigPatch),
}

/// Fields accepted by `settings set`.
#[derive(clap::Args, Debug, Default, Clone)]
pub struct ConfigPatch {
    #[arg(long)]
    pub bank_name: Option<String>,
    #[arg(long)]
    pub account_number: Option<String>,
    #[arg(long)]
    pub account_holder: Option<String>,
    /// Empty string clears the QR image.
    #[arg(long)]
    pub qr_image_url: Option<String>,
    #[arg(long)]
    pub note: Option<String>,
    #[arg(long)]
    pub admin_wallet_address: Option<String>,
    /// VND per USDT.
    #[arg(long)]
    pub usdt_rate: Option<Decimal>,
}

impl ConfigPatch {
    pub fn is_empty(&self) -> bool {
        self.bank_name.is_none()
            && self.account_number.is_none()
            && self.account_holder.is_none()
            && self.qr_image_url.is_none()
            && self.note.is_none()
            && self.admin_wallet_address.is_none()
            && self.usdt_rate.is_none()
    }

    /// Overlay the given fields onto `config`.
    pub fn apply(self, config: &mut SystemConfig) {
        let fields = [
            (self.bank_name, &mut config.bank_name),
            (self.account_number, &mut config.account_number),
            (self.account_holder, &mut config.account_holder),
            (self.qr_image_url, &mut config.qr_image_url),
            (self.note, &mut config.note),
            (self.admin_wallet_address, &mut config.admin_wallet_address),
        ];
        for (value, slot) in fields {
            if let Some(value) = value {
                *slot = value;
            }
        }
        if let Some(rate) = self.usdt_rate {
            config.usdt_rate = rate;
        }
    }
}

pub async fn run(action: SettingsAction, ctx: &Context) -> anyhow::Result<()> {
    let mut out = io::stdout();
    match action {
        SettingsAction::Show => show(ctx, &mut out).await,
        SettingsAction::Set(patch) => {
            ctx.require_login()?;
            set(ctx, patch, &mut out).await
        }
    }
}

pub async fn show(ctx: &Context, out: &mut impl Write) -> anyhow::Result<()> {
    let config = ctx.api.system_config().get_config().await?;
    write_config(out, &config)?;
    Ok(())
}

/// Fetch, overlay, and save the whole record.
pub async fn set(ctx: &Context, patch: ConfigPatch, out: &mut impl Write) -> anyhow::Result<()> {
    if patch.is_empty() {
        anyhow::bail!("Nothing to change; pass at least one field (see --help)");
    }
    let mut config = ctx.api.system_config().get_config().await?;
    patch.apply(&mut config);
    let saved = ctx
        .api
        .system_config()
        .update_config(&config)
        .await
        .map_err(|e| action_error("Save failed", e))?;
    writeln!(out, "Settings saved")?;
    write_config(out, &saved)?;
    Ok(())
}
