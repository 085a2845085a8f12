use serde::Serialize;
use serde_json::Value;

use crate::cli::{GlobalFlags, OutputFormat};

pub mod table;

use table::TableOptions;

/// Render a serializable response to a string in the requested format.
pub fn render<T: Serialize>(
    value: &T,
    format: OutputFormat,
    options: TableOptions,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Table => render_table(value, options),
        OutputFormat::Raw => Ok(serde_json::to_string(value)?),
    }
}

/// Print a serializable response in the format the flags ask for.
pub fn output<T: Serialize>(value: &T, flags: &GlobalFlags) -> anyhow::Result<()> {
    let rendered = render(value, flags.format, TableOptions::detect(flags))?;
    println!("{rendered}");
    Ok(())
}

fn render_table<T: Serialize>(value: &T, options: TableOptions) -> anyhow::Result<String> {
    match serde_json::to_value(value)? {
        Value::Array(items) => Ok(render_array_table(&items, options)),
        Value::Object(map) => {
            let mut rows = map
                .into_iter()
                .map(|(key, value)| vec![key, value_to_cell(&value)])
                .collect::<Vec<_>>();
            rows.sort();
            Ok(table::render_rows(&["key", "value"], &rows, options))
        }
        scalar => Ok(table::render_rows(
            &["value"],
            &[vec![value_to_cell(&scalar)]],
            options,
        )),
    }
}

/// Entities are tagged by `kind`, so an `id` and `kind` column lead; other
/// headers follow in key order.
fn render_array_table(items: &[Value], options: TableOptions) -> String {
    if items.is_empty() {
        return String::from("(no rows)");
    }

    if !items.iter().all(Value::is_object) {
        let rows = items
            .iter()
            .map(|item| vec![value_to_cell(item)])
            .collect::<Vec<_>>();
        return table::render_rows(&["value"], &rows, options);
    }

    let mut headers = Vec::<String>::new();
    for key in items.iter().filter_map(Value::as_object).flat_map(|map| map.keys()) {
        if !headers.contains(key) {
            headers.push(key.clone());
        }
    }
    headers.sort_by_key(|header| match header.as_str() {
        "id" => 0,
        "kind" => 1,
        _ => 2,
    });

    let header_refs = headers.iter().map(String::as_str).collect::<Vec<_>>();
    let rows = items
        .iter()
        .filter_map(Value::as_object)
        .map(|map| {
            headers
                .iter()
                .map(|header| map.get(header).map_or_else(|| String::from("-"), value_to_cell))
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();

    table::render_rows(&header_refs, &rows, options)
}

fn value_to_cell(value: &Value) -> String {
    match value {
        Value::Null => String::from("-"),
        Value::Bool(v) => v.to_string(),
        Value::Number(v) => v.to_string(),
        Value::String(v) => v.clone(),
        other => serde_json::to_string(other).unwrap_or_else(|_| String::from("<invalid-json>")),
    }
}

#[cfg(test)]
mod tests {
    use serde::Serialize;
    use syl_core::entities::{Entity, Year};

    use super::render;
    use super::table::TableOptions;
    use crate::cli::OutputFormat;

    #[derive(Serialize)]
    struct Example {
        id: &'static str,
        value: u32,
    }

    #[test]
    fn json_render_is_valid_json() {
        let value = Example { id: "x", value: 7 };
        let out = render(&value, OutputFormat::Json, TableOptions::default())
            .expect("json render should work");
        let parsed: serde_json::Value = serde_json::from_str(&out).expect("json should parse");
        assert_eq!(parsed["id"], "x");
        assert_eq!(parsed["value"], 7);
    }

    #[test]
    fn raw_render_is_single_line_json() {
        let value = Example { id: "x", value: 7 };
        let out = render(&value, OutputFormat::Raw, TableOptions::default())
            .expect("raw render should work");
        assert!(!out.contains('\n'));
    }

    #[test]
    fn table_render_for_object_is_key_value() {
        let value = Example { id: "x", value: 7 };
        let out = render(&value, OutputFormat::Table, TableOptions::default())
            .expect("table render should work");
        let lines: Vec<&str> = out.lines().collect();
        assert!(lines[0].starts_with("key"));
        assert!(lines[1].chars().all(|c| c == '-'));
        assert!(lines[2].starts_with("id"));
        assert!(lines[3].starts_with("value"));
    }

    #[test]
    fn entity_tables_lead_with_id_and_kind() {
        let years = vec![
            Entity::Year(Year { id: 1, year_number: 7 }),
            Entity::Year(Year { id: 2, year_number: 8 }),
        ];
        let out = render(&years, OutputFormat::Table, TableOptions::default())
            .expect("table render should work");
        let header: Vec<&str> = out.lines().next().unwrap_or_default().split_whitespace().collect();
        assert_eq!(header, ["id", "kind", "yearNumber"]);
    }

    #[test]
    fn empty_list_renders_placeholder() {
        let out = render(&Vec::<Example>::new(), OutputFormat::Table, TableOptions::default())
            .expect("table render should work");
        assert_eq!(out, "(no rows)");
    }
}
