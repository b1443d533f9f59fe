use serde::Serialize;
use serde_json::{Map, Value};

use crate::cli::OutputFormat;
use crate::ui;

pub mod table;

/// Render a serializable response to a string in the requested format.
pub fn render<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Table => render_table(value),
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
    let prefs = ui::prefs();
    table::TableOptions {
        max_width: prefs.term_width,
        color: prefs.table_color,
    }
}

fn render_table<T: Serialize>(value: &T) -> anyhow::Result<String> {
    let options = table_options();
    let value = serde_json::to_value(value)?;
    match value {
        Value::Array(items) => Ok(render_array_table(&items, options)),
        Value::Object(map) => {
            // Nested records become dotted keys such as `analysis.intent`.
            let mut rows = Vec::with_capacity(map.len());
            flatten(None, map, &mut rows);
            rows.sort_by(|a, b| a[0].cmp(&b[0]));
            Ok(table::render_table(&["key", "value"], &rows, options))
        }
        scalar => Ok(table::render_table(
            &["value"],
            &[vec![value_to_cell(&scalar)]],
            options,
        )),
    }
}

fn flatten(prefix: Option<&str>, map: Map<String, Value>, rows: &mut Vec<Vec<String>>) {
    for (key, value) in map {
        let key = prefix.map_or_else(|| key.clone(), |prefix| format!("{prefix}.{key}"));
        match value {
            Value::Object(inner) => flatten(Some(&key), inner, rows),
            other => rows.push(vec![key, value_to_cell(&other)]),
        }
    }
}

fn render_array_table(items: &[Value], options: table::TableOptions) -> String {
    if items.is_empty() {
        return String::from("(no rows)");
    }

    if !items.iter().all(Value::is_object) {
        let rows = items
            .iter()
            .map(|item| vec![value_to_cell(item)])
            .collect::<Vec<_>>();
        return table::render_table(&["value"], &rows, options);
    }

    let mut headers = Vec::<String>::new();
    for map in items.iter().filter_map(Value::as_object) {
        for key in map.keys() {
            if !headers.contains(key) {
                headers.push(key.clone());
            }
        }
    }

    if headers.is_empty() {
        return String::from("(no columns)");
    }

    headers.sort();

    let header_refs = headers.iter().map(String::as_str).collect::<Vec<_>>();
    let rows = items
        .iter()
        .filter_map(Value::as_object)
        .map(|map| {
            headers
                .iter()
                .map(|header| {
                    map.get(header)
                        .map_or_else(|| String::from("-"), value_to_cell)
                })
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();

    table::render_table(&header_refs, &rows, options)
}

/// Scalars print as-is. Lists of scalars print one item per line.
fn value_to_cell(value: &Value) -> String {
    match value {
        Value::Null => String::from("-"),
        Value::Bool(v) => v.to_string(),
        Value::Number(v) => v.to_string(),
        Value::String(v) => v.clone(),
        Value::Array(items) if items.is_empty() => String::from("-"),
        Value::Array(items) if items.iter().all(|item| !item.is_array() && !item.is_object()) => {
            items
                .iter()
                .map(|item| format!("- {}", value_to_cell(item)))
                .collect::<Vec<_>>()
                .join("\n")
        }
        other => serde_json::to_string(other).unwrap_or_else(|_| String::from("<invalid-json>")),
    }
}
