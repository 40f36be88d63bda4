//! Conversions from a [`SedResponse`] into other representations: a generic
//! JSON value, a JSON string, an Arrow table with physical units, and CSV.
//!
//! The table layout is described by [`TABLE_SCHEMA`], which also defines the
//! column order.

use std::{collections::HashMap, io, sync::Arc};

use arrow::{
    array::{ArrayRef, Float64Array, RecordBatch, StringArray},
    datatypes::{DataType, Field, Schema},
    error::ArrowError,
};

use crate::{Catalog, SedResponse, SourceData};

/// The field metadata key holding a column's physical unit.
pub const UNIT_KEY: &str = "unit";

/// Which group of columns to iterate over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Columns read from each data point.
    Data,
    /// Columns read from the catalog a data point belongs to.
    Catalog,
    /// Both, data columns first.
    All,
}

/// The storage type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    /// Strings. Missing values are empty.
    Utf8,
    /// 64-bit floats.
    Float64,
}

impl From<ColumnType> for DataType {
    fn from(t: ColumnType) -> Self {
        match t {
            ColumnType::Utf8 => DataType::Utf8,
            ColumnType::Float64 => DataType::Float64,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Cell<'a> {
    Str(&'a str),
    Num(Option<f64>),
}

/// A column of the SED table.
#[derive(Clone, Copy)]
pub struct Column {
    /// The column name, identical to the field name on the wire.
    pub name: &'static str,
    /// The storage type.
    pub ty: ColumnType,
    /// The physical unit, if any.
    pub unit: Option<&'static str>,
    /// Whether the column may contain nulls.
    pub nullable: bool,
    value: for<'a> fn(&'a Catalog, &'a SourceData) -> Cell<'a>,
}

impl std::fmt::Debug for Column {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Column")
            .field("name", &self.name)
            .field("ty", &self.ty)
            .field("unit", &self.unit)
            .field("nullable", &self.nullable)
            .finish()
    }
}

impl Column {
    /// The Arrow field for this column, with the unit attached as metadata.
    pub fn field(&self) -> Field {
        let field = Field::new(self.name, self.ty.into(), self.nullable);
        match self.unit {
            Some(unit) => field.with_metadata(HashMap::from([(
                UNIT_KEY.to_owned(),
                unit.to_owned(),
            )])),
            None => field,
        }
    }

    fn build<'a>(&self, rows: impl Iterator<Item = (&'a Catalog, &'a SourceData)>) -> ArrayRef {
        let cells = rows.map(|(catalog, point)| (self.value)(catalog, point));
        match self.ty {
            ColumnType::Utf8 => Arc::new(
                cells
                    .map(|c| match c {
                        Cell::Str(s) => Some(s),
                        Cell::Num(_) => unreachable!("numeric cell in string column"),
                    })
                    .collect::<StringArray>(),
            ),
            ColumnType::Float64 => Arc::new(
                cells
                    .map(|c| match c {
                        Cell::Num(v) => v,
                        Cell::Str(_) => unreachable!("string cell in numeric column"),
                    })
                    .collect::<Float64Array>(),
            ),
        }
    }
}

/// A source property stored in the table's schema metadata.
#[derive(Debug, Clone, Copy)]
pub struct PropertyMetadata {
    /// The metadata key, identical to the field name on the wire.
    pub name: &'static str,
    /// The physical unit, stored under `<name>.unit`.
    pub unit: Option<&'static str>,
}

/// Units used across the table.
pub mod units {
    /// Frequency.
    pub const HZ: &str = "Hz";
    /// Energy flux (nu F_nu).
    pub const ENERGY_FLUX: &str = "erg / (cm2 s)";
    /// Angles.
    pub const ARCSEC: &str = "arcsec";
    /// Times, as MJD.
    pub const DAY: &str = "d";
    /// Column density.
    pub const PER_CM2: &str = "1 / cm2";
}

static DATA_COLUMNS: [Column; 9] = [
    Column {
        name: "Name",
        ty: ColumnType::Utf8,
        unit: None,
        nullable: false,
        value: |_, p| Cell::Str(&p.name),
    },
    Column {
        name: "Frequency",
        ty: ColumnType::Float64,
        unit: Some(units::HZ),
        nullable: false,
        value: |_, p| Cell::Num(Some(p.frequency)),
    },
    Column {
        name: "Nufnu",
        ty: ColumnType::Float64,
        unit: Some(units::ENERGY_FLUX),
        nullable: false,
        value: |_, p| Cell::Num(Some(p.nufnu)),
    },
    Column {
        name: "FrequencyError",
        ty: ColumnType::Float64,
        unit: Some(units::HZ),
        nullable: false,
        value: |_, p| Cell::Num(Some(p.frequency_error)),
    },
    Column {
        name: "NufnuError",
        ty: ColumnType::Float64,
        unit: Some(units::ENERGY_FLUX),
        nullable: false,
        value: |_, p| Cell::Num(Some(p.nufnu_error)),
    },
    Column {
        name: "AngularDistance",
        ty: ColumnType::Float64,
        unit: Some(units::ARCSEC),
        nullable: true,
        value: |_, p| Cell::Num(p.angular_distance),
    },
    Column {
        name: "StartTime",
        ty: ColumnType::Float64,
        unit: Some(units::DAY),
        nullable: true,
        value: |_, p| Cell::Num(p.start_time),
    },
    Column {
        name: "StopTime",
        ty: ColumnType::Float64,
        unit: Some(units::DAY),
        nullable: true,
        value: |_, p| Cell::Num(p.stop_time),
    },
    Column {
        name: "Info",
        ty: ColumnType::Utf8,
        unit: None,
        nullable: false,
        value: |_, p| Cell::Str(&p.info),
    },
];

static CATALOG_COLUMNS: [Column; 2] = [
    Column {
        name: "CatalogName",
        ty: ColumnType::Utf8,
        unit: None,
        nullable: false,
        value: |c, _| Cell::Str(&c.catalog_name),
    },
    Column {
        name: "ErrorRadius",
        ty: ColumnType::Float64,
        unit: Some(units::ARCSEC),
        nullable: false,
        value: |c, _| Cell::Num(Some(c.error_radius)),
    },
];

static PROPERTIES: [PropertyMetadata; 1] = [PropertyMetadata {
    name: "Nh",
    unit: Some(units::PER_CM2),
}];

/// The layout of the SED table.
#[derive(Debug, Clone, Copy)]
pub struct TableSchema(());

/// The one and only table layout.
pub const TABLE_SCHEMA: TableSchema = TableSchema(());

impl TableSchema {
    /// Iterate over columns, in table order.
    pub fn columns(&self, kind: ColumnKind) -> impl Iterator<Item = &'static Column> {
        let data: &'static [Column] = match kind {
            ColumnKind::Data | ColumnKind::All => &DATA_COLUMNS,
            ColumnKind::Catalog => &[],
        };
        let catalog: &'static [Column] = match kind {
            ColumnKind::Catalog | ColumnKind::All => &CATALOG_COLUMNS,
            ColumnKind::Data => &[],
        };

        data.iter().chain(catalog)
    }

    /// Iterate over the source properties stored as table metadata.
    pub fn metadata(&self) -> impl Iterator<Item = &'static PropertyMetadata> {
        PROPERTIES.iter()
    }

    /// The Arrow schema, without metadata.
    pub fn arrow_schema(&self) -> Schema {
        Schema::new(
            self.columns(ColumnKind::All)
                .map(Column::field)
                .collect::<Vec<_>>(),
        )
    }
}

impl SedResponse {
    /// Dump the response into a generic JSON value, keeping the field names
    /// used on the wire.
    pub fn to_value(&self) -> serde_json::Value {
        serde_json::to_value(self).expect("JSON serialization should be infallible")
    }

    /// Dump the response as a compact JSON string.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).expect("JSON serialization should be infallible")
    }

    /// Dump the response as an indented JSON string.
    pub fn to_json_pretty(&self) -> String {
        serde_json::to_string_pretty(self).expect("JSON serialization should be infallible")
    }

    /// Convert the response into an Arrow table.
    ///
    /// The table has one row per data point; flagged entries are skipped.
    /// Each row also carries the columns of its catalog. Columns with a
    /// physical unit have it attached as field metadata under
    /// [`UNIT_KEY`], and the source properties (see
    /// [`TableSchema::metadata`]) are stored in the schema metadata.
    pub fn to_record_batch(&self) -> Result<RecordBatch, ArrowError> {
        let columns = TABLE_SCHEMA
            .columns(ColumnKind::All)
            .map(|col| col.build(self.points()))
            .collect();

        let schema = TABLE_SCHEMA
            .arrow_schema()
            .with_metadata(self.table_metadata());

        RecordBatch::try_new(Arc::new(schema), columns)
    }

    /// Write the table as CSV, with a header row.
    pub fn write_csv(&self, w: impl io::Write) -> Result<(), ArrowError> {
        let batch = self.to_record_batch()?;
        let mut writer = arrow_csv::WriterBuilder::new().with_header(true).build(w);
        writer.write(&batch)
    }

    /// The table as a CSV string, with a header row.
    pub fn to_csv(&self) -> Result<String, ArrowError> {
        let mut buf = Vec::new();
        self.write_csv(&mut buf)?;

        // The writer only ever emits UTF-8.
        String::from_utf8(buf).map_err(|e| ArrowError::CsvError(e.to_string()))
    }

    fn table_metadata(&self) -> HashMap<String, String> {
        let mut meta = HashMap::new();
        for prop in TABLE_SCHEMA.metadata() {
            let value = match prop.name {
                "Nh" => self.properties.nh,
                _ => continue,
            };

            meta.insert(prop.name.to_owned(), format!("{value:e}"));
            if let Some(unit) = prop.unit {
                meta.insert(format!("{}.unit", prop.name), unit.to_owned());
            }
        }

        meta
    }
}
