//! Command handlers.
//!
//! Each handler takes the resolved [`Config`] and writes its output to the
//! given writer. Commands that edit the condition set load it, apply one
//! copy-on-write edit and save the result.

use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use fieldsift_core::{
    project_with, sort_records, validate, ConditionSet, FieldDefinition, FilterCondition,
    MatchOptions, Operator, Schema, SortKey,
};
use fieldsift_io::{export, serialize_structured, DEFAULT_BASE_NAME};
use serde_json::Value;

use crate::cli::{AddArgs, EditArgs, ExportArgs, FilterArgs};
use crate::config::{Config, Session};
use crate::render::{record_table, ConditionRow, Renderer, Table};

/// Loads the saved set and brings it in line with the current schema.
fn load_conditions(config: &Config, schema: &Schema) -> ConditionSet {
    let saved = config.store().load();
    let set = schema.reconcile(&saved);
    if set.len() != saved.len() {
        log::warn!(
            "dropped {} condition(s) on fields that no longer exist",
            saved.len() - set.len()
        );
    }
    set
}

fn save(config: &Config, set: &ConditionSet) -> Result<()> {
    config
        .store()
        .save(set)
        .with_context(|| format!("failed to save conditions to {}", config.store.display()))
}

fn renderer(config: &Config) -> Result<Renderer> {
    Renderer::new(config.styled).context("failed to load templates")
}

fn field<'s>(schema: &'s Schema, name: &str) -> Result<&'s FieldDefinition> {
    schema.get(name).ok_or_else(|| {
        let known: Vec<&str> = schema.iter().map(|f| f.name.as_str()).collect();
        anyhow!("unknown field '{name}' (known: {})", known.join(", "))
    })
}

fn check_operator(def: &FieldDefinition, op: Operator) -> Result<()> {
    if def.offers(op) {
        return Ok(());
    }
    let offered: Vec<&str> = def.operators.iter().map(|o| o.as_str()).collect();
    bail!(
        "field '{}' does not offer '{op}' (offers: {})",
        def.name,
        offered.join(", ")
    )
}

fn report(out: &mut dyn Write, verb: &str, condition: &FilterCondition) -> Result<()> {
    let validation = validate(condition);
    match validation.message {
        Some(message) => writeln!(out, "{verb} {} (incomplete: {message})", condition.id)?,
        None => writeln!(out, "{verb} {}", condition.id)?,
    }
    Ok(())
}

pub fn fields(config: &Config, out: &mut dyn Write) -> Result<()> {
    let session = config.load()?;
    let rows = session
        .schema
        .iter()
        .map(|def| {
            let operators: Vec<&str> = def.operators.iter().map(|o| o.as_str()).collect();
            let options = def
                .options
                .as_ref()
                .map(|opts| {
                    opts.iter()
                        .map(|o| o.label.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                })
                .unwrap_or_default();
            vec![
                def.name.clone(),
                def.label.clone(),
                def.field_type.to_string(),
                operators.join(", "),
                options,
            ]
        })
        .collect();
    let headers = ["Field", "Label", "Type", "Operators", "Options"]
        .map(String::from)
        .to_vec();
    writeln!(out, "{}", renderer(config)?.fields(&Table::new(headers, rows))?)?;
    Ok(())
}

pub fn list(config: &Config, out: &mut dyn Write) -> Result<()> {
    let session = config.load()?;
    let set = load_conditions(config, &session.schema);
    let rows: Vec<ConditionRow> = set
        .iter()
        .map(|c| ConditionRow::new(c, validate(c)))
        .collect();
    writeln!(out, "{}", renderer(config)?.conditions(&rows)?)?;
    Ok(())
}

pub fn add(config: &Config, args: &AddArgs, out: &mut dyn Write) -> Result<()> {
    let Session { schema, .. } = config.load()?;
    let set = load_conditions(config, &schema);

    let def = match args.field.as_deref() {
        Some(name) => field(&schema, name)?,
        None => schema.first().context("the schema has no fields")?,
    };
    let mut condition = FilterCondition::for_field(set.next_id(), def);
    if let Some(op) = args.operator {
        check_operator(def, op)?;
        condition = condition.with_operator(op);
    }
    if let Some(value) = args.value.to_value(def.field_type)? {
        condition = condition.with_value(value);
    }

    save(config, &set.with_added(condition.clone()))?;
    report(out, "added", &condition)
}

pub fn edit(config: &Config, args: &EditArgs, out: &mut dyn Write) -> Result<()> {
    let Session { schema, .. } = config.load()?;
    let set = load_conditions(config, &schema);
    let mut condition = set
        .get(&args.id)
        .cloned()
        .with_context(|| format!("no condition with id '{}'", args.id))?;

    if let Some(name) = args.field.as_deref() {
        condition = condition.with_field(field(&schema, name)?);
    }
    if let Some(op) = args.operator {
        check_operator(field(&schema, &condition.field)?, op)?;
        condition = condition.with_operator(op);
    }
    if let Some(value) = args.value.to_value(condition.field_type)? {
        condition = condition.with_value(value);
    }

    save(config, &set.with_replaced(condition.clone()))?;
    report(out, "updated", &condition)
}

pub fn remove(config: &Config, id: &str, out: &mut dyn Write) -> Result<()> {
    let Session { schema, .. } = config.load()?;
    let set = load_conditions(config, &schema);
    if set.get(id).is_none() {
        bail!("no condition with id '{id}'");
    }
    save(config, &set.without(id))?;
    writeln!(out, "removed {id}")?;
    Ok(())
}

pub fn clear(config: &Config, out: &mut dyn Write) -> Result<()> {
    let set = config.store().load();
    save(config, &set.cleared())?;
    writeln!(out, "cleared {} condition(s)", set.len())?;
    Ok(())
}

fn options(skip_invalid: bool) -> MatchOptions {
    MatchOptions { skip_invalid }
}

pub fn filter(config: &Config, args: &FilterArgs, out: &mut dyn Write) -> Result<()> {
    let session = config.load()?;
    let set = load_conditions(config, &session.schema);
    let records = session.dataset.records.as_slice();

    let mut matched = project_with(records, set.as_slice(), options(args.skip_invalid));
    if let Some(field) = &args.sort {
        let key = if args.desc {
            SortKey::desc(field.as_str())
        } else {
            SortKey::asc(field.as_str())
        };
        sort_records(matched.as_mut_slice(), &[key]);
    }

    if args.output.is_structured() {
        let rendered = serialize_structured(&matched, args.output)?;
        writeln!(out, "{}", rendered.trim_end())?;
        return Ok(());
    }

    let mut columns = vec![("id".to_string(), "ID".to_string())];
    columns.extend(
        session
            .schema
            .iter()
            .filter(|def| def.name != "id")
            .map(|def| (def.name.clone(), def.label.clone())),
    );
    let table = record_table::<Value>(&matched, &columns);
    let rendered = renderer(config)?.records(&table, matched.len(), records.len())?;
    writeln!(out, "{rendered}")?;
    Ok(())
}

pub fn export_records(config: &Config, args: &ExportArgs, out: &mut dyn Write) -> Result<()> {
    let session = config.load()?;
    let set = load_conditions(config, &session.schema);
    let matched = project_with(
        session.dataset.records.as_slice(),
        set.as_slice(),
        options(args.skip_invalid),
    );

    let exported = export(&matched, args.format, DEFAULT_BASE_NAME)?;
    if exported.format != args.format {
        log::info!("no records matched, exported as {} instead", exported.format);
    }

    match &args.out {
        None => {
            out.write_all(&exported.bytes)?;
            writeln!(out)?;
        }
        Some(path) => {
            let target = if path.is_dir() {
                path.join(&exported.file_name)
            } else {
                path.to_path_buf()
            };
            write_file(&target, &exported.bytes)?;
            writeln!(
                out,
                "wrote {} record(s) to {} ({})",
                matched.len(),
                target.display(),
                exported.format
            )?;
        }
    }
    Ok(())
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;
    }
    fs::write(path, bytes).with_context(|| format!("failed to write {}", path.display()))
}
