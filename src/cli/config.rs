use std::io::Write;

use anyhow::bail;
use sedbuilder::Profile;
use tabwriter::TabWriter;

use crate::cli::{
    GlobalArgs, Output,
    color::*,
    yaml::{self, Scalar},
};

#[derive(Debug, clap::Args)]
pub(crate) struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, clap::Subcommand)]
pub(crate) enum ConfigCommand {
    /// Set a configuration value
    Set(ConfigSetArgs),
    /// Get the current configuration
    Get(ConfigGetArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
#[clap(rename_all = "snake_case")]
pub(crate) enum ConfigSetting {
    ApiEndpoint,
    Timeout,
}

impl std::fmt::Display for ConfigSetting {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSetting::ApiEndpoint => f.write_str("api_endpoint"),
            ConfigSetting::Timeout => f.write_str("timeout"),
        }
    }
}

#[derive(Debug, clap::Args)]
#[command(after_long_help = CliExamples("
  # Point the default profile at a mirror
  sedbuilder config set api_endpoint http://localhost:8080/sed

  # Give up on slow queries after a minute (0 = no timeout)
  sedbuilder config set timeout 60
"))]
pub(crate) struct ConfigSetArgs {
    /// Setting name
    pub name: ConfigSetting,
    /// Value to set
    pub value: String,
}

#[derive(Debug, clap::Args)]
#[command(after_long_help = CliExamples("
  # Show the active profile
  sedbuilder config get

  # Show all profiles
  sedbuilder config get --all
"))]
pub(crate) struct ConfigGetArgs {
    /// Show all the available profiles
    #[arg(short, long)]
    pub all: bool,
}

pub(crate) fn handle(args: ConfigArgs, global: GlobalArgs) -> anyhow::Result<()> {
    match args.command {
        ConfigCommand::Set(args) => config_set(args, global),
        ConfigCommand::Get(args) => config_get(args, global),
    }
}

fn config_set(args: ConfigSetArgs, global: GlobalArgs) -> anyhow::Result<()> {
    let key = args.name.to_string();
    let name = match global.profile {
        Some(name) => name,
        None => std::env::var("SEDBUILDER_PROFILE").unwrap_or_else(|_| "default".to_owned()),
    };

    let value = match args.name {
        ConfigSetting::ApiEndpoint => {
            let url = url::Url::parse(&args.value)?;
            if !matches!(url.scheme(), "http" | "https") {
                bail!("Invalid API endpoint {:?}: must be http or https", args.value);
            }

            Scalar::Str(&args.value)
        }
        ConfigSetting::Timeout => match args.value.parse::<u32>() {
            Ok(secs) => Scalar::Int(secs.into()),
            Err(_) => bail!("Invalid timeout {:?}: expected whole seconds", args.value),
        },
    };

    let path = sedbuilder::config::find_config()?;
    yaml::set_profile_value(&path, &name, &key, value)?;

    eprintln!("Set {key} for profile {name:?} in {}", path.display());
    Ok(())
}

fn config_get(args: ConfigGetArgs, global: GlobalArgs) -> anyhow::Result<()> {
    let mut out = anstream::stdout().lock();

    match (global.output.unwrap_or_default(), args.all) {
        (Output::Tty, false) => {
            let profile = load_profile(&global)?;
            let mut tw = TabWriter::new(&mut out).ansi(true);
            print_profile(&mut tw, &profile)?;
            tw.flush()?;
        }
        (Output::Tty, true) => {
            let mut tw = TabWriter::new(&mut out).ansi(true);
            for (i, profile) in Profile::load_all()?.enumerate() {
                if i > 0 {
                    writeln!(&mut tw)?;
                }
                print_profile(&mut tw, &profile)?;
            }
            tw.flush()?;
        }
        (Output::Json | Output::Csv, false) => {
            let profile = load_profile(&global)?;
            serde_json::to_writer(&mut out, &profile)?;
            writeln!(&mut out)?;
        }
        (Output::Json | Output::Csv, true) => {
            let profiles: Vec<_> = Profile::load_all()?.collect();
            serde_json::to_writer(&mut out, &profiles)?;
            writeln!(&mut out)?;
        }
    }

    Ok(())
}

fn load_profile(global: &GlobalArgs) -> anyhow::Result<Profile> {
    let profile = match global.profile.as_deref() {
        Some(name) => Profile::from_env(name)?,
        None => Profile::from_default_env()?,
    };

    Ok(profile)
}

fn print_profile(out: &mut impl Write, profile: &Profile) -> anyhow::Result<()> {
    writeln!(out, "{HEADER}Profile {:?}{HEADER:#}", profile.name)?;
    writeln!(out, "{GREEN}API Endpoint{GREEN:#}\t{}", profile.api_endpoint)?;
    match profile.timeout {
        Some(t) => writeln!(out, "{GREEN}Timeout{GREEN:#}\t{}s", t.as_secs())?,
        None => writeln!(out, "{GREEN}Timeout{GREEN:#}\t{DIM}none{DIM:#}")?,
    }

    Ok(())
}
