use std::{io::Write as _, path::PathBuf};

use anyhow::{Context as _, bail};
use sedbuilder::{
    Coordinates, SedResponse,
    jetset::{DataScale, JetsetOptions, RestFrame},
};
use tabwriter::TabWriter;

use crate::cli::{Cli, Output, check_status, color::*, render::print_table};

/// Metadata keys, in display order.
const METADATA_KEYS: [&str; 5] = ["obj_name", "z", "UL_CL", "restframe", "data_scale"];

#[derive(Debug, clap::Args)]
#[command(allow_negative_numbers = true, after_long_help = CliExamples("
  # Jetset table for Mrk 421
  sedbuilder jetset 166.1138 38.2088 --z 0.031 --obj-name Mrk421

  # From a saved response, as CSV
  sedbuilder -O csv jetset --file mrk421.json --z 0.031 > mrk421.csv
"))]
pub(crate) struct JetsetArgs {
    /// Right ascension, in degrees [0, 360)
    #[arg(required_unless_present = "file", requires = "dec")]
    pub ra: Option<f64>,
    /// Declination, in degrees [-90, 90]
    #[arg(required_unless_present = "file")]
    pub dec: Option<f64>,
    /// Read a saved response instead of querying the service
    #[arg(long, conflicts_with_all = ["ra", "dec"])]
    pub file: Option<PathBuf>,
    /// Source redshift [0, 1]
    #[arg(long)]
    pub z: f64,
    /// Confidence level for upper limits [0, 1]
    #[arg(long, default_value_t = 0.95)]
    pub ul_cl: f64,
    /// Reference frame (obs or src)
    #[arg(long, default_value_t = RestFrame::default())]
    pub restframe: RestFrame,
    /// Data scale (lin-lin or log-log)
    #[arg(long, default_value_t = DataScale::default())]
    pub data_scale: DataScale,
    /// Object name
    #[arg(long, default_value = "new-src")]
    pub obj_name: String,
    /// Do not truncate output
    #[arg(long)]
    pub no_trunc: bool,
}

pub(crate) fn handle(cli: &Cli, args: JetsetArgs) -> anyhow::Result<()> {
    let opts = JetsetOptions {
        z: args.z,
        ul_cl: args.ul_cl,
        restframe: args.restframe,
        data_scale: args.data_scale,
        obj_name: args.obj_name,
    };
    opts.validate()?;

    let sed = match (args.file, args.ra, args.dec) {
        (Some(path), _, _) => {
            let sed = SedResponse::from_json_file(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            check_status(&sed)?;
            sed
        }
        (None, Some(ra), Some(dec)) => {
            Coordinates::new(ra, dec)?;
            cli.fetch(ra, dec)?
        }
        _ => bail!("Either RA and DEC or --file are required"),
    };

    let batch = sed.to_jetset(&opts)?;
    let mut out = anstream::stdout().lock();

    match cli.global.output.unwrap_or_default() {
        Output::Tty => {
            {
                let metadata = batch.schema_ref().metadata();
                let mut tw = TabWriter::new(&mut out).ansi(true);
                for key in METADATA_KEYS {
                    writeln!(tw, "{GREEN}{key}{GREEN:#}\t{}", metadata[key])?;
                }
                tw.flush()?;
            }

            if batch.num_rows() == 0 {
                eprintln!("No data points!");
            } else {
                writeln!(out)?;
                print_table(&mut out, &batch, !args.no_trunc)?;
            }
        }
        Output::Csv => {
            let mut writer = arrow_csv::WriterBuilder::new()
                .with_header(true)
                .build(&mut out);
            writer.write(&batch)?;
        }
        Output::Json => {
            let mut rows = Vec::new();
            {
                let mut writer = arrow::json::ArrayWriter::new(&mut rows);
                writer.write(&batch)?;
                writer.finish()?;
            }

            let rows: serde_json::Value = if rows.is_empty() {
                serde_json::Value::Array(Vec::new())
            } else {
                serde_json::from_slice(&rows)?
            };

            let doc = serde_json::json!({
                "metadata": batch.schema_ref().metadata(),
                "rows": rows,
            });

            serde_json::to_writer(&mut out, &doc)?;
            writeln!(out)?;
        }
    }

    out.flush()?;
    Ok(())
}
