mod color;
mod config;
mod get;
mod jetset;
mod render;
pub(crate) mod spinner;
mod yaml;

use std::time;

use anyhow::{Context as _, bail};
use clap::{Parser, Subcommand};
use sedbuilder::{Client, Profile, SedResponse};
use tracing::debug;

use crate::cli::spinner::ProgressExt as _;

#[derive(Debug, Parser)]
#[command(
    name = "sedbuilder",
    about = "Query the ASI-SSDC SED Builder",
    version = env!("SEDBUILDER_VERSION"),
    propagate_version = true
)]
pub(crate) struct Args {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// How to format output.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub(crate) enum Output {
    Json,
    Csv,
    #[default]
    Tty,
}

#[derive(Debug, clap::Args)]
#[command(next_help_heading = "Global Options")]
pub(crate) struct GlobalArgs {
    /// Name of the profile to use
    #[arg(long, short = 'P', global = true)]
    pub profile: Option<String>,
    /// Output format
    #[arg(long, short = 'O', global = true)]
    pub output: Option<Output>,
    /// Timeout (in seconds) for requests (-1 = no timeout)
    #[arg(long, global = true, allow_negative_numbers = true)]
    pub client_timeout: Option<i64>,
    /// Print verbose logs
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub(crate) enum Command {
    /// Print version.
    Version,
    /// Fetch SED data for a sky position
    Get(get::GetArgs),
    /// Display a saved response
    Show(get::ShowArgs),
    /// Export SED data as a Jetset table
    Jetset(jetset::JetsetArgs),
    /// Configure CLI settings
    Config(config::ConfigArgs),
}

pub(crate) struct Cli {
    pub(crate) global: GlobalArgs,
    pub(crate) client: Client,
    pub(crate) multiprogress: indicatif::MultiProgress,
}

pub(crate) fn run(args: Args, multiprogress: indicatif::MultiProgress) -> anyhow::Result<()> {
    // Some commands don't require any config.
    match args.command {
        Command::Version => {
            println!("sedbuilder {}", env!("SEDBUILDER_VERSION"));
            return Ok(());
        }
        Command::Config(config_args) => return config::handle(config_args, args.global),
        Command::Show(show_args) => return get::handle_show(&args.global, show_args),
        _ => (),
    }

    let profile = if let Some(name) = args.global.profile.as_deref() {
        Profile::from_env(name)
    } else {
        Profile::from_default_env()
    };

    let profile = profile?.with_ua_product("sedbuilder-cli");

    let profile = match args.global.client_timeout {
        None => profile,
        Some(-1) => profile.with_timeout(None),
        Some(v) if v > 0 => profile.with_timeout(Some(time::Duration::from_secs(v as _))),
        Some(v) => bail!("Invalid timeout value: {v}"),
    };

    debug!(?profile, command = ?args.command, "cli invocation");

    let cli = Cli {
        global: args.global,
        client: Client::new(profile),
        multiprogress,
    };

    match args.command {
        Command::Version | Command::Config(_) | Command::Show(_) => unreachable!(),
        Command::Get(args) => get::handle(&cli, args),
        Command::Jetset(args) => jetset::handle(&cli, args),
    }
}

impl Cli {
    /// Query the service, with a spinner on stderr. Fails if the service
    /// reports an unsuccessful query.
    pub(crate) fn fetch(&self, ra: f64, dec: f64) -> anyhow::Result<SedResponse> {
        let progress = self
            .new_spinner()
            .with_message(format!("Querying SED Builder at ra={ra} dec={dec}..."));
        progress.enable_steady_tick(time::Duration::from_millis(100));

        let sed = match self.client.get_data(ra, dec) {
            Ok(sed) => sed,
            Err(e) => {
                progress.finish_with_failed();
                return Err(e).context("Failed to fetch SED data");
            }
        };

        if !sed.is_successful() {
            progress.finish_with_failed();
            check_status(&sed)?;
        }

        progress.finish_with_done();
        Ok(sed)
    }
}

/// Turn an unsuccessful service status into an error.
pub(crate) fn check_status(sed: &SedResponse) -> anyhow::Result<()> {
    if sed.is_successful() {
        return Ok(());
    }

    match &sed.response_info.message {
        Some(message) => bail!(
            "SED Builder returned status {}: {message}",
            sed.response_info.status_code
        ),
        None => bail!(
            "SED Builder returned status {}",
            sed.response_info.status_code
        ),
    }
}
