//! Auth subcommands: login, logout, status.
//!
//! User-facing output uses writeln! to stdout (this is a CLI binary, not debug output).

use std::io::{self, Write};

use dialoguer::{Input, Password};

use crate::context::{Context, action_error};

/// Auth subcommand actions.
#[derive(clap::Subcommand, Debug)]
pub enum AuthAction {
    /// Log in to the admin API. Prompts for missing credentials.
    Login {
        /// Username.
        #[arg(short, long)]
        username: Option<String>,
        /// Password.
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Drop the local session.
    Logout,
    /// Show current auth status.
    Status,
}

/// Execute an auth subcommand.
pub async fn run(action: AuthAction, ctx: &Context) -> anyhow::Result<()> {
    let mut out = io::stdout();
    match action {
        AuthAction::Login { username, password } => {
            let username = match username {
                Some(u) => u,
                None => Input::new().with_prompt("Username").interact_text()?,
            };
            let password = match password {
                Some(p) => p,
                None => Password::new().with_prompt("Password").interact()?,
            };
            login(ctx, &username, &password, &mut out).await
        }
        AuthAction::Logout => logout(ctx, &mut out),
        AuthAction::Status => status(ctx, &mut out),
    }
}

pub async fn login(
    ctx: &Context,
    username: &str,
    password: &str,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let user = ctx
        .session()
        .login(&ctx.api, username, password)
        .await
        .map_err(|e| action_error("Login failed", e))?;
    writeln!(out, "Logged in as {}", user.username)?;
    Ok(())
}

pub fn logout(ctx: &Context, out: &mut impl Write) -> anyhow::Result<()> {
    ctx.session().logout();
    writeln!(out, "Logged out")?;
    Ok(())
}

pub fn status(ctx: &Context, out: &mut impl Write) -> anyhow::Result<()> {
    match ctx.session().user() {
        Some(user) => {
            writeln!(out, "Logged in as: {}", user.username)?;
            writeln!(out, "User ID: {}", user.id)?;
        }
        None => writeln!(out, "Not logged in")?,
    }
    writeln!(out, "API: {}", ctx.api.base_url())?;
    Ok(())
}
