//! Command-line definition.

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Args, Parser, Subcommand};
use fieldsift_core::{FieldType, FilterValue, Operator};
use fieldsift_io::{ExportFormat, OutputMode};

/// Default location of the condition store, relative to the working directory.
pub const DEFAULT_STORE: &str = ".fieldsift/conditions.json";

/// Filter JSON records with typed field conditions.
///
/// Conditions are kept in a small store between runs; `add`, `edit`,
/// `remove` and `clear` change it, `filter` and `export` apply it.
#[derive(Debug, Parser)]
#[command(name = "fieldsift", version)]
pub struct Cli {
    /// Records file (JSON array). Use `-` to read stdin.
    #[arg(long, env = "FIELDSIFT_RECORDS", global = true)]
    pub records: Option<PathBuf>,

    /// Field definitions file (JSON array)
    #[arg(long, env = "FIELDSIFT_FIELDS", global = true)]
    pub fields: Option<PathBuf>,

    /// Where the condition set is saved
    #[arg(long, env = "FIELDSIFT_STORE", default_value = DEFAULT_STORE, global = true)]
    pub store: PathBuf,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the filterable fields
    Fields,

    /// List the saved conditions
    List,

    /// Add a condition
    Add(AddArgs),

    /// Change a condition
    Edit(EditArgs),

    /// Remove a condition
    Remove {
        /// Condition id, e.g. filter-2
        id: String,
    },

    /// Remove every condition
    Clear,

    /// Show the records matching every condition
    Filter(FilterArgs),

    /// Write the matching records to a file
    Export(ExportArgs),
}

#[derive(Debug, Args)]
pub struct AddArgs {
    /// Field name (defaults to the first field)
    #[arg(long)]
    pub field: Option<String>,

    /// Operator wire name, e.g. startsWith (defaults to the field's first)
    #[arg(long, value_parser = parse_operator)]
    pub operator: Option<Operator>,

    #[command(flatten)]
    pub value: ValueArgs,
}

#[derive(Debug, Args)]
pub struct EditArgs {
    /// Condition id, e.g. filter-2
    pub id: String,

    /// New field; resets operator and value
    #[arg(long)]
    pub field: Option<String>,

    /// New operator; resets the value unless value flags are given
    #[arg(long, value_parser = parse_operator)]
    pub operator: Option<Operator>,

    #[command(flatten)]
    pub value: ValueArgs,
}

/// Value flags. Only those matching the condition's field type are used.
#[derive(Debug, Default, Args)]
pub struct ValueArgs {
    /// Text to compare against (text fields)
    #[arg(long)]
    pub text: Option<String>,

    /// Number to compare against (number fields)
    #[arg(long, allow_negative_numbers = true)]
    pub number: Option<f64>,

    /// Range start, YYYY-MM-DD (date fields)
    #[arg(long)]
    pub from: Option<String>,

    /// Range end, YYYY-MM-DD (date fields)
    #[arg(long)]
    pub to: Option<String>,

    /// Lower bound (amount fields)
    #[arg(long, allow_negative_numbers = true)]
    pub min: Option<f64>,

    /// Upper bound (amount fields)
    #[arg(long, allow_negative_numbers = true)]
    pub max: Option<f64>,

    /// Option value (select fields)
    #[arg(long)]
    pub select: Option<String>,

    /// Option value, repeatable (multiselect fields)
    #[arg(long = "choice")]
    pub choices: Vec<String>,

    /// Match true (boolean fields)
    #[arg(long, conflicts_with = "no")]
    pub yes: bool,

    /// Match false (boolean fields)
    #[arg(long)]
    pub no: bool,
}

impl ValueArgs {
    pub fn is_empty(&self) -> bool {
        self.text.is_none()
            && self.number.is_none()
            && self.from.is_none()
            && self.to.is_none()
            && self.min.is_none()
            && self.max.is_none()
            && self.select.is_none()
            && self.choices.is_empty()
            && !self.yes
            && !self.no
    }

    /// Builds the payload for a field of the given type. `None` when no value
    /// flag was given; an error when the flags belong to another type.
    pub fn to_value(&self, field_type: FieldType) -> Result<Option<FilterValue>> {
        if self.is_empty() {
            return Ok(None);
        }
        let value = match field_type {
            FieldType::Text => self.text.as_deref().map(FilterValue::text),
            FieldType::Number => self.number.map(FilterValue::number),
            FieldType::Date if self.from.is_some() || self.to.is_some() => Some(
                FilterValue::dates(self.from.as_deref(), self.to.as_deref()),
            ),
            FieldType::Amount if self.min.is_some() || self.max.is_some() => {
                Some(FilterValue::amount(self.min, self.max))
            }
            FieldType::Select => self.select.as_deref().map(FilterValue::select),
            FieldType::Multiselect if !self.choices.is_empty() => {
                Some(FilterValue::multi(self.choices.iter().map(String::as_str)))
            }
            FieldType::Boolean if self.yes || self.no => Some(FilterValue::boolean(self.yes)),
            _ => None,
        };
        match value {
            Some(value) => Ok(Some(value)),
            None => bail!("{}", expected_flags(field_type)),
        }
    }
}

fn expected_flags(field_type: FieldType) -> String {
    let flags = match field_type {
        FieldType::Text => "--text",
        FieldType::Number => "--number",
        FieldType::Date => "--from/--to",
        FieldType::Amount => "--min/--max",
        FieldType::Select => "--select",
        FieldType::Multiselect => "--choice",
        FieldType::Boolean => "--yes/--no",
    };
    format!("a {field_type} field takes {flags}")
}

#[derive(Debug, Args)]
pub struct FilterArgs {
    /// Ignore conditions that are not filled in correctly
    #[arg(long)]
    pub skip_invalid: bool,

    /// Sort by this field (dotted paths allowed)
    #[arg(long)]
    pub sort: Option<String>,

    /// Sort descending
    #[arg(long, requires = "sort")]
    pub desc: bool,

    /// Output format: text, json, yaml or csv
    #[arg(short, long, default_value = "text")]
    pub output: OutputMode,
}

#[derive(Debug, Args)]
pub struct ExportArgs {
    /// csv or json
    #[arg(long, default_value = "csv")]
    pub format: ExportFormat,

    /// Output file or directory (stdout when omitted)
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Ignore conditions that are not filled in correctly
    #[arg(long)]
    pub skip_invalid: bool,
}

fn parse_operator(name: &str) -> Result<Operator, String> {
    Operator::parse(name).ok_or_else(|| format!("unknown operator '{name}'"))
}
