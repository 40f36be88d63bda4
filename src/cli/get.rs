use std::{fs, io::Write as _, path::PathBuf};

use anyhow::Context as _;
use sedbuilder::{Coordinates, SedResponse};
use tracing::info;

use crate::cli::{Cli, GlobalArgs, check_status, color::CliExamples, render::print_response};

#[derive(Debug, clap::Args)]
#[command(allow_negative_numbers = true, after_long_help = CliExamples("
  # Fetch the SED of 3C 279
  sedbuilder get 194.04625 -5.789167

  # Save the raw response for later
  sedbuilder get 194.04625 -5.789167 --save 3c279.json

  # Export as CSV
  sedbuilder -O csv get 83.6329 22.0144 > crab.csv
"))]
pub(crate) struct GetArgs {
    /// Right ascension, in degrees [0, 360)
    pub ra: f64,
    /// Declination, in degrees [-90, 90]
    pub dec: f64,
    /// Also write the raw JSON response to this file
    #[arg(long)]
    pub save: Option<PathBuf>,
    /// Do not truncate output
    #[arg(long)]
    pub no_trunc: bool,
}

#[derive(Debug, clap::Args)]
#[command(after_long_help = CliExamples("
  # Show a response saved with `sedbuilder get --save`
  sedbuilder show 3c279.json
"))]
pub(crate) struct ShowArgs {
    /// Path to a saved JSON response
    pub file: PathBuf,
    /// Do not truncate output
    #[arg(long)]
    pub no_trunc: bool,
}

pub(crate) fn handle(cli: &Cli, args: GetArgs) -> anyhow::Result<()> {
    let GetArgs {
        ra,
        dec,
        save,
        no_trunc,
    } = args;

    // Check before we bother with the spinner.
    Coordinates::new(ra, dec)?;

    let sed = cli.fetch(ra, dec)?;
    if let Some(path) = save {
        fs::write(&path, sed.to_json_pretty())
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!(path = %path.display(), "saved response");
    }

    let mut out = anstream::stdout().lock();
    print_response(&mut out, &sed, cli.global.output.unwrap_or_default(), !no_trunc)?;
    out.flush()?;

    Ok(())
}

pub(crate) fn handle_show(global: &GlobalArgs, args: ShowArgs) -> anyhow::Result<()> {
    let sed = SedResponse::from_json_file(&args.file)
        .with_context(|| format!("Failed to read {}", args.file.display()))?;
    check_status(&sed)?;

    let mut out = anstream::stdout().lock();
    print_response(&mut out, &sed, global.output.unwrap_or_default(), !args.no_trunc)?;
    out.flush()?;

    Ok(())
}
