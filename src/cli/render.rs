use std::{fmt::Write as _, io::Write};

use arrow::{
    array::RecordBatch,
    util::display::{ArrayFormatter, FormatOptions},
};
use sedbuilder::{
    SedResponse,
    table::{TABLE_SCHEMA, UNIT_KEY},
};
use tabwriter::TabWriter;

use crate::cli::{Output, color::*};

const TRUNCATE_TO_COLUMN_WIDTH: usize = 32;

/// Print a response in the requested format.
pub(crate) fn print_response(
    out: &mut impl Write,
    sed: &SedResponse,
    output: Output,
    truncate: bool,
) -> anyhow::Result<()> {
    match output {
        Output::Json => {
            serde_json::to_writer(&mut *out, sed)?;
            writeln!(out)?;
        }
        Output::Csv => sed.write_csv(out)?,
        Output::Tty => {
            let batch = sed.to_record_batch()?;

            {
                let mut tw = TabWriter::new(&mut *out).ansi(true);
                writeln!(tw, "{GREEN}Status{GREEN:#}\t{}", sed.response_info.status_code)?;
                if let Some(message) = &sed.response_info.message {
                    writeln!(tw, "{GREEN}Message{GREEN:#}\t{message}")?;
                }

                for prop in TABLE_SCHEMA.metadata() {
                    let value = &batch.schema_ref().metadata()[prop.name];
                    let unit = prop.unit.unwrap_or_default();
                    writeln!(tw, "{GREEN}{}{GREEN:#}\t{value} {unit}", prop.name)?;
                }

                writeln!(tw, "{GREEN}Catalogs{GREEN:#}\t{}", sed.catalogs.len())?;
                writeln!(tw, "{GREEN}Data points{GREEN:#}\t{}", batch.num_rows())?;
                tw.flush()?;
            }

            if batch.num_rows() == 0 {
                eprintln!("No data points!");
                return Ok(());
            }

            writeln!(out)?;
            print_table(out, &batch, truncate)?;
        }
    }

    Ok(())
}

/// Print a table with aligned columns. Column headers include the unit, if
/// there is one.
pub(crate) fn print_table(
    out: &mut impl Write,
    batch: &RecordBatch,
    truncate: bool,
) -> anyhow::Result<()> {
    let schema = batch.schema();
    let mut tw = TabWriter::new(&mut *out).ansi(true);

    for (i, field) in schema.fields().iter().enumerate() {
        if i > 0 {
            write!(tw, "\t")?;
        }

        write!(tw, "{HEADER}{}", field.name().to_uppercase())?;
        if let Some(unit) = field.metadata().get(UNIT_KEY) {
            write!(tw, " [{unit}]")?;
        }
        write!(tw, "{HEADER:#}")?;
    }
    writeln!(tw)?;

    let options = FormatOptions::default().with_null("-");
    let formatters: Vec<_> = batch
        .columns()
        .iter()
        .map(|col| ArrayFormatter::try_new(col.as_ref(), &options))
        .collect::<Result<_, _>>()?;

    // Track if we truncated any values, so we can print a helpful note at the end.
    let mut truncation_occurred = false;
    let mut buf = String::new();

    for row in 0..batch.num_rows() {
        for (i, formatter) in formatters.iter().enumerate() {
            if i > 0 {
                write!(tw, "\t")?;
            }

            buf.clear();
            write!(buf, "{}", formatter.value(row))?;
            if truncate && buf.chars().count() > TRUNCATE_TO_COLUMN_WIDTH {
                truncation_occurred = true;
                let cut: String = buf.chars().take(TRUNCATE_TO_COLUMN_WIDTH - 3).collect();
                write!(tw, "{cut}...")?;
            } else {
                write!(tw, "{buf}")?;
            }
        }

        writeln!(tw)?;
    }

    tw.flush()?;

    if truncation_occurred {
        eprintln!("\nNote: some values were truncated. Use --no-trunc to see full values.");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response() -> SedResponse {
        SedResponse::from_json_str(
            r#"{
                "ResponseInfo": {"statusCode": "OK"},
                "Properties": {"Nh": 2e20},
                "Catalogs": [{
                    "Catalog": {"CatalogName": "2MASS", "ErrorRadius": 1.5},
                    "SourceData": [{
                        "Frequency": 1.4e14, "Nufnu": 4e-11, "FrequencyError": 0, "NufnuError": 1e-12,
                        "Name": "a very long source designation that will not fit"
                    }]
                }]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn tty_table() -> anyhow::Result<()> {
        let mut out = Vec::new();
        print_response(&mut out, &response(), Output::Tty, true)?;
        let out = String::from_utf8(out)?;

        assert!(out.contains("Data points"));
        assert!(out.contains("2e20 1 / cm2"));
        assert!(out.contains("FREQUENCY [Hz]"));
        assert!(out.contains("2MASS"));
        assert!(out.contains("a very long source designatio..."));
        assert!(!out.contains("will not fit"));

        Ok(())
    }

    #[test]
    fn tty_no_trunc() -> anyhow::Result<()> {
        let mut out = Vec::new();
        print_response(&mut out, &response(), Output::Tty, false)?;
        assert!(String::from_utf8(out)?.contains("will not fit"));

        Ok(())
    }

    #[test]
    fn json() -> anyhow::Result<()> {
        let mut out = Vec::new();
        print_response(&mut out, &response(), Output::Json, true)?;

        let parsed: serde_json::Value = serde_json::from_slice(&out)?;
        assert_eq!(parsed["Catalogs"][0]["Catalog"]["CatalogName"], "2MASS");

        Ok(())
    }
}
