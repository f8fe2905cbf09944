//! Output formatting for the CLI.

use console::style;
use lazyattr::{PropertySpec, Registry};
use serde_json::Value;

pub fn json(value: &Value, pretty: bool) -> serde_json::Result<String> {
    let mut out = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    out.push('\n');
    Ok(out)
}

const HEADERS: [&str; 5] = ["NAME", "FROM", "WITH", "REQUIRED", "DEFAULT"];

fn row(spec: &PropertySpec) -> [String; 5] {
    [
        spec.name().to_string(),
        spec.source_keys().join(", "),
        spec.transformer().to_string(),
        if spec.is_required() { "yes" } else { "" }.to_string(),
        spec.default_value()
            .map(|v| Value::from(v.clone()).to_string())
            .unwrap_or_default(),
    ]
}

/// Aligned table of every property in `registry`.
pub fn properties(registry: &Registry) -> String {
    if registry.is_empty() {
        return "No properties declared.\n".to_string();
    }

    let rows: Vec<[String; 5]> = registry.properties().values().map(|s| row(s)).collect();
    let mut widths = HEADERS.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let header = line(&HEADERS.map(String::from), &widths);
    out.push_str(&style(header).bold().to_string());
    out.push('\n');
    for row in &rows {
        out.push_str(&line(row, &widths));
        out.push('\n');
    }
    out
}

fn line(cells: &[String; 5], widths: &[usize; 5]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use lazyattr::{PropertyOptions, Selector};
    use serde_json::json;

    #[test]
    fn json_respects_pretty_flag() {
        let value = json!({"a": 1});
        assert_eq!(json(&value, false).unwrap(), "{\"a\":1}\n");
        assert_eq!(json(&value, true).unwrap(), "{\n  \"a\": 1\n}\n");
    }

    #[test]
    fn empty_registry_message() {
        assert_eq!(properties(&Registry::new()), "No properties declared.\n");
    }

    #[test]
    fn table_lists_each_property() {
        console::set_colors_enabled(false);
        let registry = Registry::new()
            .property(
                "age",
                PropertyOptions::new()
                    .from(["years", "yrs"])
                    .with(Selector::ToI)
                    .default("0"),
            )
            .property("name", PropertyOptions::new().required());

        let out = properties(&registry);
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("NAME"));
        assert!(lines[1].starts_with("age "));
        assert!(lines[1].contains("years, yrs"));
        assert!(lines[1].contains("to_i"));
        assert!(lines[1].contains("\"0\""));
        assert!(lines[2].starts_with("name"));
        assert!(lines[2].contains("yes"));
    }
}
