use std::io::IsTerminal;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::cli::OutputFormat;

pub mod table;

/// Columns pulled to the front of list tables, in this order.
const LEADING_COLUMNS: &[&str] = &["id", "status", "current_level", "role", "name", "title"];

/// Render a serializable response to a string in the requested format.
pub fn render<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Table => Ok(render_table(
            &serde_json::to_value(value)?,
            table_options(),
        )),
        OutputFormat::Raw => Ok(serde_json::to_string(value)?),
    }
}

/// Print a serializable response in the requested format.
pub fn output<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<()> {
    let rendered = render(value, format)?;
    println!("{rendered}");
    Ok(())
}

fn table_options() -> table::TableOptions {
    let max_width = std::env::var("COLUMNS")
        .ok()
        .and_then(|value| value.parse::<usize>().ok())
        .filter(|width| *width >= 40);
    let color = std::io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none();
    table::TableOptions { max_width, color }
}

fn render_table(value: &Value, options: table::TableOptions) -> String {
    match value {
        Value::Array(items) => render_rows(items, options),
        Value::Object(map) => {
            let rows = map
                .iter()
                .map(|(key, value)| vec![key.clone(), cell(value)])
                .collect::<Vec<_>>();
            table::render_table(&["key", "value"], &rows, options)
        }
        scalar => table::render_table(&["value"], &[vec![cell(scalar)]], options),
    }
}

fn render_rows(items: &[Value], options: table::TableOptions) -> String {
    if items.is_empty() {
        return String::from("(no rows)");
    }

    let objects = items.iter().filter_map(Value::as_object).collect::<Vec<_>>();
    if objects.len() != items.len() {
        let rows = items.iter().map(|item| vec![cell(item)]).collect::<Vec<_>>();
        return table::render_table(&["value"], &rows, options);
    }

    let headers = column_order(&objects);
    let header_refs = headers.iter().map(String::as_str).collect::<Vec<_>>();
    let rows = objects
        .iter()
        .map(|map| {
            headers
                .iter()
                .map(|header| map.get(header).map_or_else(|| String::from("-"), cell))
                .collect()
        })
        .collect::<Vec<_>>();
    table::render_table(&header_refs, &rows, options)
}

/// Leading columns first, the rest alphabetical.
fn column_order(objects: &[&Map<String, Value>]) -> Vec<String> {
    let mut rest = Vec::<String>::new();
    for map in objects {
        for key in map.keys() {
            if !LEADING_COLUMNS.contains(&key.as_str()) && !rest.contains(key) {
                rest.push(key.clone());
            }
        }
    }
    rest.sort();

    LEADING_COLUMNS
        .iter()
        .filter(|column| objects.iter().any(|map| map.contains_key(**column)))
        .map(|column| (*column).to_string())
        .chain(rest)
        .collect()
}

/// Nested arrays and objects collapse to a summary; tables stay one line
/// per record.
fn cell(value: &Value) -> String {
    match value {
        Value::Null => String::from("-"),
        Value::Bool(v) => v.to_string(),
        Value::Number(v) => v.to_string(),
        Value::String(v) => v.clone(),
        Value::Array(items) => format!("[{} items]", items.len()),
        Value::Object(map) => format!("{{{} fields}}", map.len()),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde::Serialize;
    use serde_json::json;

    use super::{cell, render, render_table, table::TableOptions};
    use crate::cli::OutputFormat;

    const PLAIN: TableOptions = TableOptions {
        max_width: None,
        color: false,
    };

    #[derive(Serialize)]
    struct Example {
        id: &'static str,
        current_level: u8,
    }

    #[test]
    fn json_render_is_valid_json() {
        let out = render(&Example { id: "cas-1", current_level: 3 }, OutputFormat::Json)
            .expect("json render should work");
        let parsed: serde_json::Value = serde_json::from_str(&out).expect("json should parse");
        assert_eq!(parsed["id"], "cas-1");
        assert_eq!(parsed["current_level"], 3);
    }

    #[test]
    fn raw_render_is_single_line_json() {
        let out = render(&Example { id: "cas-1", current_level: 3 }, OutputFormat::Raw)
            .expect("raw render should work");
        assert!(!out.contains('\n'));
    }

    #[test]
    fn list_tables_lead_with_identity_columns() {
        let rows = json!([
            {"updated_at": "x", "status": "pending_am", "id": "cas-1", "timeline": [1, 2]},
            {"updated_at": "y", "status": "resolved", "id": "cas-2", "timeline": []}
        ]);
        let out = render_table(&rows, PLAIN);
        let header = out.lines().next().unwrap();
        let columns = header.split_whitespace().collect::<Vec<_>>();
        assert_eq!(columns, vec!["id", "status", "timeline", "updated_at"]);
        assert!(out.contains("[2 items]"));
    }

    #[test]
    fn empty_list_renders_placeholder() {
        let out = render_table(&json!([]), PLAIN);
        assert_eq!(out, "(no rows)");
    }

    #[test]
    fn nested_values_collapse() {
        assert_eq!(cell(&json!({"a": 1, "b": 2})), "{2 fields}");
        assert_eq!(cell(&json!(null)), "-");
    }
}
