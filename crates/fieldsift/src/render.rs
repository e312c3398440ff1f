//! Text rendering with MiniJinja templates and `console` styles.
//!
//! Views are plain serializable structs built by the command handlers.
//! Cells are measured and truncated here, before templating, so templates
//! only pad and style.

use std::collections::HashMap;

use console::Style;
use fieldsift_core::{as_text, FieldType, FilterCondition, Record, Validation};
use minijinja::{Environment, Value};
use serde::Serialize;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Widest a record table cell may get, in terminal columns.
pub const MAX_CELL_WIDTH: usize = 28;

const TABLE_MACROS: &str = r#"{% macro line(cells, widths, style_name) %}{% for cell in cells %}{% if loop.last %}{{ cell | style(style_name) }}{% else %}{{ cell | pad(widths[loop.index0]) | style(style_name) }}  {% endif %}{% endfor %}{% endmacro %}
"#;

const FIELDS_TEMPLATE: &str = r#"{% from "table" import line %}
{{ line(table.headers, table.widths, "header") }}
{% for row in table.rows %}
{{ line(row, table.widths, "") }}
{% endfor %}
{{ (table.rows | length ~ " fields") | style("muted") }}
"#;

const CONDITIONS_TEMPLATE: &str = r#"{% for c in rows %}
{{ c.id | pad(id_width) | style("id") }}  {{ c.summary }}  {{ ("ok" | style("ok")) if c.valid else (c.message | style("error")) }}
{% else %}
{{ "No conditions. Everything matches." | style("muted") }}
{% endfor %}
"#;

const RECORDS_TEMPLATE: &str = r#"{% from "table" import line %}
{% if table.rows %}
{{ line(table.headers, table.widths, "header") }}
{% for row in table.rows %}
{{ line(row, table.widths, "") }}
{% endfor %}
{% endif %}
{{ (shown ~ " of " ~ total ~ " records") | style("muted") }}
"#;

/// A header row plus body rows, all cells already as text.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub widths: Vec<usize>,
}

impl Table {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let mut widths: Vec<usize> = headers.iter().map(|h| h.width()).collect();
        for row in &rows {
            for (i, cell) in row.iter().enumerate() {
                if let Some(width) = widths.get_mut(i) {
                    *width = (*width).max(cell.width());
                }
            }
        }
        Table {
            headers,
            rows,
            widths,
        }
    }
}

/// One line of the condition listing.
#[derive(Debug, Clone, Serialize)]
pub struct ConditionRow {
    pub id: String,
    pub summary: String,
    pub valid: bool,
    pub message: Option<String>,
}

impl ConditionRow {
    pub fn new(condition: &FilterCondition, validation: Validation) -> Self {
        ConditionRow {
            id: condition.id.clone(),
            summary: summarize(condition),
            valid: validation.valid,
            message: validation.message,
        }
    }
}

pub struct Renderer {
    env: Environment<'static>,
}

impl Renderer {
    pub fn new(styled: bool) -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        env.set_trim_blocks(true);
        register_filters(&mut env, styled);
        env.add_template("table", TABLE_MACROS)?;
        env.add_template("fields", FIELDS_TEMPLATE)?;
        env.add_template("conditions", CONDITIONS_TEMPLATE)?;
        env.add_template("records", RECORDS_TEMPLATE)?;
        Ok(Renderer { env })
    }

    /// Renders a named template. Trailing whitespace is dropped; callers
    /// end the line.
    pub fn render<S: Serialize>(&self, name: &str, ctx: S) -> Result<String, minijinja::Error> {
        let rendered = self.env.get_template(name)?.render(ctx)?;
        Ok(rendered.trim_end().to_string())
    }

    pub fn fields(&self, table: &Table) -> Result<String, minijinja::Error> {
        self.render("fields", minijinja::context! { table => table })
    }

    pub fn conditions(&self, rows: &[ConditionRow]) -> Result<String, minijinja::Error> {
        let id_width = rows.iter().map(|r| r.id.width()).max().unwrap_or(0);
        self.render(
            "conditions",
            minijinja::context! { rows => rows, id_width => id_width },
        )
    }

    pub fn records(
        &self,
        table: &Table,
        shown: usize,
        total: usize,
    ) -> Result<String, minijinja::Error> {
        self.render(
            "records",
            minijinja::context! { table => table, shown => shown, total => total },
        )
    }
}

fn theme() -> HashMap<&'static str, Style> {
    HashMap::from([
        ("header", Style::new().bold().cyan()),
        ("muted", Style::new().dim()),
        ("id", Style::new().yellow()),
        ("ok", Style::new().green()),
        ("error", Style::new().red()),
    ])
}

fn register_filters(env: &mut Environment<'static>, styled: bool) {
    let theme = theme();
    env.add_filter("style", move |value: Value, name: String| -> String {
        let text = value.to_string();
        match theme.get(name.as_str()) {
            Some(style) if styled => style
                .clone()
                .force_styling(true)
                .apply_to(text)
                .to_string(),
            _ => text,
        }
    });

    env.add_filter("pad", |value: Value, width: usize| -> String {
        pad_right(&value.to_string(), width)
    });
}

/// Pads to `width` terminal columns.
pub fn pad_right(text: &str, width: usize) -> String {
    let used = text.width();
    if used >= width {
        text.to_string()
    } else {
        format!("{text}{}", " ".repeat(width - used))
    }
}

/// Truncates to `max_width` terminal columns, ending in `…` when cut.
pub fn truncate_to_width(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    let limit = max_width.saturating_sub(1);
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > limit {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

/// Builds the record table for the given field paths.
pub fn record_table<R: Record>(records: &[&R], columns: &[(String, String)]) -> Table {
    let headers = columns.iter().map(|(_, label)| label.clone()).collect();
    let rows = records
        .iter()
        .map(|record| {
            columns
                .iter()
                .map(|(path, _)| {
                    let cell = display_cell(record.resolve(path));
                    truncate_to_width(&cell, MAX_CELL_WIDTH)
                })
                .collect()
        })
        .collect();
    Table::new(headers, rows)
}

fn display_cell(value: Option<&serde_json::Value>) -> String {
    match value {
        Some(serde_json::Value::Array(items)) => items
            .iter()
            .map(|item| as_text(Some(item)))
            .collect::<Vec<_>>()
            .join(", "),
        other => as_text(other),
    }
}

/// One-line description of a condition, e.g. `salary between 50000 .. 90000`.
pub fn summarize(condition: &FilterCondition) -> String {
    let value = &condition.value;
    let shown = match condition.field_type {
        FieldType::Text => value.text.as_ref().map(|t| format!("\"{t}\"")),
        FieldType::Number => value.number.map(|n| n.to_string()),
        FieldType::Date => range(value.date_start.clone(), value.date_end.clone()),
        FieldType::Amount => range(
            value.amount_min.map(|n| n.to_string()),
            value.amount_max.map(|n| n.to_string()),
        ),
        FieldType::Select => value.select_value.clone(),
        FieldType::Multiselect => value
            .multi_select_value
            .as_ref()
            .map(|items| format!("[{}]", items.join(", "))),
        FieldType::Boolean => value.boolean_value.map(|b| b.to_string()),
    };
    format!(
        "{} {} {}",
        condition.field,
        condition.operator.label(),
        shown.unwrap_or_else(|| "?".to_string())
    )
}

fn range(low: Option<String>, high: Option<String>) -> Option<String> {
    if low.is_none() && high.is_none() {
        return None;
    }
    Some(format!(
        "{} .. {}",
        low.unwrap_or_else(|| "*".to_string()),
        high.unwrap_or_else(|| "*".to_string())
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use fieldsift_core::{validate, FilterValue, Operator};
    use serde_json::json;

    #[test]
    fn pads_by_display_width() {
        assert_eq!(pad_right("ab", 4), "ab  ");
        assert_eq!(pad_right("日本", 5), "日本 ");
        assert_eq!(pad_right("long", 2), "long");
    }

    #[test]
    fn truncates_wide_text() {
        assert_eq!(truncate_to_width("Hello", 10), "Hello");
        assert_eq!(truncate_to_width("Hello World", 6), "Hello…");
    }

    #[test]
    fn summaries() {
        let amount = FilterCondition::new(
            "filter-1",
            "salary",
            FieldType::Amount,
            Operator::Between,
            FilterValue::amount(Some(50000.0), None),
        );
        assert_eq!(summarize(&amount), "salary between 50000 .. *");

        let multi = FilterCondition::new(
            "filter-2",
            "skills",
            FieldType::Multiselect,
            Operator::NotIn,
            FilterValue::multi(["Go", "Rust"]),
        );
        assert_eq!(summarize(&multi), "skills not in [Go, Rust]");

        let blank = FilterCondition::new(
            "filter-3",
            "name",
            FieldType::Text,
            Operator::Contains,
            FilterValue::default(),
        );
        assert_eq!(summarize(&blank), "name contains ?");
    }

    #[test]
    fn renders_table_unstyled() {
        let renderer = Renderer::new(false).unwrap();
        let records = [json!({"id": 1, "name": "Ann"}), json!({"id": 22, "name": "Bo"})];
        let refs: Vec<&serde_json::Value> = records.iter().collect();
        let columns = vec![
            ("id".to_string(), "ID".to_string()),
            ("name".to_string(), "Name".to_string()),
        ];
        let out = renderer
            .records(&record_table(&refs, &columns), 2, 5)
            .unwrap();
        assert_eq!(out, "ID  Name\n1   Ann\n22  Bo\n2 of 5 records");
    }

    #[test]
    fn renders_empty_condition_list() {
        let renderer = Renderer::new(false).unwrap();
        let out = renderer.conditions(&[]).unwrap();
        assert_eq!(out, "No conditions. Everything matches.");
    }

    #[test]
    fn renders_condition_validity() {
        let renderer = Renderer::new(false).unwrap();
        let blank = FilterCondition::new(
            "filter-1",
            "name",
            FieldType::Text,
            Operator::Contains,
            FilterValue::default(),
        );
        let row = ConditionRow::new(&blank, validate(&blank));
        let out = renderer.conditions(&[row]).unwrap();
        assert_eq!(out, "filter-1  name contains ?  Enter text value");
    }

    #[test]
    fn styles_when_enabled() {
        let renderer = Renderer::new(true).unwrap();
        let out = renderer.conditions(&[]).unwrap();
        assert!(out.contains("\u{1b}["));
    }
}
