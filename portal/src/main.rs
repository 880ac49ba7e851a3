//! Command-line shell over the portal client: sign in, inspect the session,
//! sign out.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::ffi::OsString;
use std::io::{self, Write};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Context, Result, eyre};
use ortho_config::OrthoConfig;
use tokio::runtime::Builder;

use portal::domain::UserProfile;
use portal::{Portal, PortalSettings, telemetry};

/// `portal` command arguments.
#[derive(Debug, Parser)]
#[command(
    name = "portal",
    about = "Huntersrun property portal client",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Sign in and persist the session.
    Login {
        /// Account email.
        #[arg(long)]
        email: String,
        /// Account password.
        #[arg(long, env = "PORTAL_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Show the user behind the persisted session.
    Whoami,
    /// Print the dashboard overview for the signed-in user.
    Dashboard,
    /// End the session and forget the persisted credential.
    Logout,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    telemetry::init();
    let cli = Cli::parse();
    // Settings come from the environment and config files; the command line
    // belongs to clap.
    let settings = PortalSettings::load_from_iter([OsString::from("portal")])
        .map_err(|error| eyre!("failed to load portal settings: {error}"))?;
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("create Tokio runtime")?;
    runtime.block_on(run(cli.command, &settings))
}

async fn run(command: Command, settings: &PortalSettings) -> Result<()> {
    let portal = Portal::connect(settings).wrap_err("failed to start portal client")?;
    portal.session().initialize().await;
    let mut stdout = io::stdout().lock();

    match command {
        Command::Login { email, password } => {
            let user = portal.session().login(&email, &password).await?;
            print_user(&mut stdout, &user)?;
        }
        Command::Whoami => match portal.session().current_user() {
            Some(user) => print_user(&mut stdout, &user)?,
            None => writeln!(stdout, "not signed in")?,
        },
        Command::Dashboard => {
            if !portal.session().is_authenticated() {
                return Err(eyre!("not signed in"));
            }
            let overview = portal.api().dashboard().overview().await?;
            writeln!(stdout, "{}", serde_json::to_string_pretty(&overview)?)?;
        }
        Command::Logout => {
            portal.session().logout().await;
            writeln!(stdout, "signed out")?;
        }
    }
    Ok(())
}

fn print_user(out: &mut impl Write, user: &UserProfile) -> io::Result<()> {
    writeln!(out, "id={}", user.id())?;
    writeln!(out, "name={}", user.name())?;
    writeln!(out, "email={}", user.email())?;
    writeln!(out, "role={}", user.role())
}
