use colored::Colorize;
use serde_json::{Map, Value};
use tabled::builder::Builder;

use super::OutputFormat;

/// Print a command response in the requested format.
///
/// `default_properties` restricts table and plain output to the listed
/// properties; JSON output is always the full response.
pub fn print_value(data: &Value, format: OutputFormat, default_properties: &[&str]) {
    let rendered = render(data, format, default_properties);
    if !rendered.is_empty() {
        println!("{}", rendered);
    }
}

pub fn render(data: &Value, format: OutputFormat, default_properties: &[&str]) -> String {
    if data.is_null() {
        return String::new();
    }

    match format {
        OutputFormat::Json => serde_json::to_string_pretty(data).unwrap_or_else(|_| data.to_string()),
        OutputFormat::Table => render_table(data, default_properties),
        OutputFormat::Plain => render_plain(data, default_properties),
    }
}

fn cell(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn columns(objects: &[&Map<String, Value>], default_properties: &[&str]) -> Vec<String> {
    if !default_properties.is_empty() {
        return default_properties.iter().map(|p| p.to_string()).collect();
    }

    let mut columns: Vec<String> = Vec::new();
    for obj in objects {
        for (key, value) in obj.iter() {
            if !value.is_object() && !value.is_array() && !columns.contains(key) {
                columns.push(key.clone());
            }
        }
    }
    columns
}

fn render_table(data: &Value, default_properties: &[&str]) -> String {
    match data {
        Value::Array(items) => {
            let objects: Vec<&Map<String, Value>> =
                items.iter().filter_map(Value::as_object).collect();
            if objects.is_empty() {
                return items.iter().map(cell).collect::<Vec<_>>().join("\n");
            }

            let columns = columns(&objects, default_properties);
            let mut builder = Builder::default();
            builder.push_record(columns.clone());
            for obj in objects {
                builder.push_record(
                    columns
                        .iter()
                        .map(|c| obj.get(c).map(cell).unwrap_or_default()),
                );
            }
            builder.build().to_string()
        }
        Value::Object(obj) => {
            let mut builder = Builder::default();
            builder.push_record(["Property".to_string(), "Value".to_string()]);
            for (key, value) in obj.iter() {
                if default_properties.is_empty() || default_properties.contains(&key.as_str()) {
                    builder.push_record([key.clone(), cell(value)]);
                }
            }
            builder.build().to_string()
        }
        other => cell(other),
    }
}

fn render_plain(data: &Value, default_properties: &[&str]) -> String {
    let line = |obj: &Map<String, Value>| -> String {
        let values: Vec<String> = if default_properties.is_empty() {
            obj.values().map(cell).collect()
        } else {
            default_properties
                .iter()
                .map(|p| obj.get(*p).map(cell).unwrap_or_default())
                .collect()
        };
        values.join("|")
    };

    match data {
        Value::Array(items) => items
            .iter()
            .map(|item| match item.as_object() {
                Some(obj) => line(obj),
                None => cell(item),
            })
            .collect::<Vec<_>>()
            .join("\n"),
        Value::Object(obj) => line(obj),
        other => cell(other),
    }
}

/// Print success message
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green(), message);
}

/// Print error message
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red(), message);
}

/// Print info message
pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue(), message);
}

/// Print warning message
pub fn print_warning(message: &str) {
    println!("{} {}", "⚠".yellow(), message);
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_is_unchanged() {
        let data = json!({"id": "adatumisv_exo2", "targetTypes": ["Message"]});
        let rendered = render(&data, OutputFormat::Json, &[]);
        let parsed: Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(parsed, data);
    }

    #[test]
    fn test_null_renders_nothing() {
        assert_eq!(render(&Value::Null, OutputFormat::Table, &[]), "");
    }

    #[test]
    fn test_plain_uses_default_properties() {
        let data = json!([
            {"Id": "1", "Title": "Field Name", "InternalName": "fieldname", "Hidden": false, "Group": "Core"},
            {"Id": "2", "Title": "Other", "InternalName": "other", "Hidden": true}
        ]);
        let rendered = render(&data, OutputFormat::Plain, &["Id", "Title", "InternalName", "Hidden"]);
        assert_eq!(rendered, "1|Field Name|fieldname|false\n2|Other|other|true");
    }

    #[test]
    fn test_table_lists_scalar_columns() {
        let data = json!([{"id": "a", "displayName": "Tab", "configuration": {"x": 1}}]);
        let rendered = render(&data, OutputFormat::Table, &[]);
        assert!(rendered.contains("displayName"));
        assert!(rendered.contains("Tab"));
        assert!(!rendered.contains("configuration"));
    }

    #[test]
    fn test_table_single_object() {
        let data = json!({"id": "MC001337", "title": "Reminder"});
        let rendered = render(&data, OutputFormat::Table, &[]);
        assert!(rendered.contains("Property"));
        assert!(rendered.contains("MC001337"));
    }
}
