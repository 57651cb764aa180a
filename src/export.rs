//! Serialization of fetched collections to JSON or CSV files.
//!
//! JSON keeps objects as the API returned them, under the collection key.
//! CSV flattens `actions` into `action:<field>` columns and
//! `conditions.{all,any}` into `condition:all:<field>` / `condition:any:<field>`
//! columns, one row per object.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use serde_json::{Map, Value};

use crate::client::ZendeskClient;
use crate::error::ZenklyError;
use crate::models::{ListFilter, Resource};
use crate::paginator::{Paginator, Progress};

/// Output file format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    /// Pretty-printed JSON.
    #[default]
    Json,
    /// Flattened CSV.
    Csv,
}

impl ExportFormat {
    /// File extension for this format.
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
        }
    }
}

/// Writes `{ "<key>": [...] }` with two-space indentation.
pub fn write_json<W: Write>(writer: W, key: &str, objects: &[Value]) -> Result<(), ZenklyError> {
    let mut document = Map::new();
    document.insert(key.to_string(), Value::Array(objects.to_vec()));
    serde_json::to_writer_pretty(writer, &document)?;
    Ok(())
}

/// Groups action values by field, keeping their order.
fn flatten_actions(actions: &[Value]) -> BTreeMap<String, Vec<Value>> {
    let mut columns: BTreeMap<String, Vec<Value>> = BTreeMap::new();
    for action in actions {
        let Some(field) = action.get("field").and_then(Value::as_str) else {
            continue;
        };
        let value = action.get("value").cloned().unwrap_or(Value::Null);
        columns
            .entry(format!("action:{field}"))
            .or_default()
            .push(value);
    }
    columns
}

/// Groups `"<operator> <value>"` entries by condition set and field.
fn flatten_conditions(conditions: &Map<String, Value>) -> BTreeMap<String, Vec<Value>> {
    let mut columns: BTreeMap<String, Vec<Value>> = BTreeMap::new();
    for set in ["all", "any"] {
        let Some(entries) = conditions.get(set).and_then(Value::as_array) else {
            continue;
        };
        for entry in entries {
            let Some(field) = entry.get("field").and_then(Value::as_str) else {
                continue;
            };
            let operator = entry.get("operator").map(scalar_text).unwrap_or_default();
            let value = entry.get("value").map(scalar_text).unwrap_or_default();
            columns
                .entry(format!("condition:{set}:{field}"))
                .or_default()
                .push(Value::String(format!("{operator} {value}")));
        }
    }
    columns
}

/// Replaces `actions` and `conditions` with their flattened columns.
pub fn flatten_for_csv(object: &Map<String, Value>) -> Map<String, Value> {
    let mut row = object.clone();

    if let Some(Value::Array(actions)) = row.remove("actions") {
        for (column, values) in flatten_actions(&actions) {
            row.insert(column, Value::Array(values));
        }
    }

    match row.remove("conditions") {
        Some(Value::Object(conditions)) => {
            for (column, values) in flatten_conditions(&conditions) {
                row.insert(column, Value::Array(values));
            }
        }
        Some(other) if !other.is_null() => {
            row.insert("conditions".to_string(), other);
        }
        _ => {}
    }

    row
}

/// Orders CSV columns: reverse lexical order, then `id` and `title` first.
///
/// Reverse order pushes every `action:` and `condition:` column behind the
/// scalar columns.
pub fn csv_columns<'a, I>(rows: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a Map<String, Value>>,
{
    let names: BTreeSet<&str> = rows
        .into_iter()
        .flat_map(|row| row.keys().map(String::as_str))
        .collect();
    let mut columns: Vec<String> = names.into_iter().rev().map(str::to_string).collect();

    let mut leading = 0;
    for name in ["id", "title"] {
        if let Some(index) = columns.iter().position(|c| c == name) {
            let column = columns.remove(index);
            columns.insert(leading, column);
            leading += 1;
        }
    }

    columns
}

/// Text for strings and scalars inside a cell.
fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Renders one CSV cell.
///
/// Null is empty, strings are written as-is, lists and objects as compact JSON.
fn cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(value) => scalar_text(value),
    }
}

/// Writes one flattened row per object.
pub fn write_csv<W: Write>(writer: W, objects: &[Value]) -> Result<(), ZenklyError> {
    let rows: Vec<Map<String, Value>> = objects
        .iter()
        .filter_map(Value::as_object)
        .map(flatten_for_csv)
        .collect();
    let columns = csv_columns(&rows);

    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(&columns)?;
    for row in &rows {
        csv_writer.write_record(columns.iter().map(|column| cell(row.get(column))))?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Serializes `objects` and writes them to `<directory>/<filename>.<ext>`.
///
/// The file is only created once the whole document is rendered.
pub fn write_collection(
    directory: &Path,
    filename: &str,
    format: ExportFormat,
    key: &str,
    objects: &[Value],
) -> Result<PathBuf, ZenklyError> {
    let mut buffer = Vec::new();
    match format {
        ExportFormat::Json => write_json(&mut buffer, key, objects)?,
        ExportFormat::Csv => write_csv(&mut buffer, objects)?,
    }

    let extension = format.extension();
    let file_name = if filename.ends_with(&format!(".{extension}")) {
        filename.to_string()
    } else {
        format!("{filename}.{extension}")
    };
    let path = directory.join(file_name);
    fs::write(&path, buffer)?;

    tracing::info!(path = %path.display(), count = objects.len(), "Collection written");
    Ok(path)
}

/// Fetches a whole resource collection and writes it to disk.
pub struct Exporter<'a> {
    client: &'a ZendeskClient,
}

impl<'a> Exporter<'a> {
    /// Creates an exporter.
    pub fn new(client: &'a ZendeskClient) -> Self {
        Self { client }
    }

    /// Fetches every object of `resource` matching `filter`.
    pub async fn fetch(
        &self,
        resource: Resource,
        filter: &ListFilter,
        progress: &dyn Progress,
    ) -> Result<Vec<Value>, ZenklyError> {
        Paginator::new(self.client)
            .collect_all(
                resource.collection_key(),
                &resource.list_path(),
                &filter.to_query(),
                progress,
            )
            .await
    }

    /// Fetches `resource` and writes it to `<directory>/<filename>.<ext>`.
    pub async fn export(
        &self,
        resource: Resource,
        filter: &ListFilter,
        format: ExportFormat,
        directory: &Path,
        filename: &str,
        progress: &dyn Progress,
    ) -> Result<PathBuf, ZenklyError> {
        let objects = self.fetch(resource, filter, progress).await?;
        write_collection(
            directory,
            filename,
            format,
            resource.collection_key(),
            &objects,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn to_csv(objects: &[Value]) -> String {
        let mut buffer = Vec::new();
        write_csv(&mut buffer, objects).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn test_csv_columns_id_title_first() {
        let row = json!({"id": 1, "title": "t", "foo": "x", "action:bar": ["y"]});
        let rows = vec![row.as_object().unwrap().clone()];
        assert_eq!(csv_columns(&rows), vec!["id", "title", "foo", "action:bar"]);
    }

    #[test]
    fn test_csv_columns_reverse_lexical() {
        let row = json!({
            "id": 1,
            "title": "t",
            "active": true,
            "position": 3,
            "action:status": [],
            "condition:all:status": []
        });
        let rows = vec![row.as_object().unwrap().clone()];
        assert_eq!(
            csv_columns(&rows),
            vec![
                "id",
                "title",
                "position",
                "condition:all:status",
                "active",
                "action:status"
            ]
        );
    }

    #[test]
    fn test_csv_columns_without_title() {
        let row = json!({"id": 1, "name": "n"});
        let rows = vec![row.as_object().unwrap().clone()];
        assert_eq!(csv_columns(&rows), vec!["id", "name"]);
    }

    #[test]
    fn test_csv_columns_title_leads_without_id() {
        let row = json!({"title": "t", "zeta": 1, "alpha": 2});
        let rows = vec![row.as_object().unwrap().clone()];
        assert_eq!(csv_columns(&rows), vec!["title", "zeta", "alpha"]);
    }

    #[test]
    fn test_flatten_actions_groups_values() {
        let trigger = json!({
            "id": 10,
            "title": "Notify",
            "actions": [
                {"field": "notification_user", "value": ["requester_id", "Subject", "Body"]},
                {"field": "set_tags", "value": "vip"},
                {"field": "set_tags", "value": "urgent"}
            ]
        });
        let row = flatten_for_csv(trigger.as_object().unwrap());

        assert!(!row.contains_key("actions"));
        assert_eq!(row["action:set_tags"], json!(["vip", "urgent"]));
        assert_eq!(
            row["action:notification_user"],
            json!([["requester_id", "Subject", "Body"]])
        );
    }

    #[test]
    fn test_flatten_conditions() {
        let view = json!({
            "id": 3,
            "title": "Open",
            "conditions": {
                "all": [
                    {"field": "status", "operator": "less_than", "value": "solved"},
                    {"field": "group_id", "operator": "is", "value": 42}
                ],
                "any": [
                    {"field": "priority", "operator": "is", "value": "high"},
                    {"field": "priority", "operator": "is", "value": "urgent"}
                ]
            }
        });
        let row = flatten_for_csv(view.as_object().unwrap());

        assert!(!row.contains_key("conditions"));
        assert_eq!(row["condition:all:status"], json!(["less_than solved"]));
        assert_eq!(row["condition:all:group_id"], json!(["is 42"]));
        assert_eq!(row["condition:any:priority"], json!(["is high", "is urgent"]));
    }

    #[test]
    fn test_write_csv_rows() {
        let objects = vec![
            json!({
                "id": 1,
                "title": "First",
                "active": true,
                "actions": [{"field": "status", "value": "solved"}]
            }),
            json!({
                "id": 2,
                "title": "Second, with comma",
                "active": false,
                "description": null
            }),
        ];

        let output = to_csv(&objects);
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines[0], "id,title,description,active,action:status");
        assert_eq!(lines[1], "1,First,,true,\"[\"\"solved\"\"]\"");
        assert_eq!(lines[2], "2,\"Second, with comma\",,false,");
    }

    #[test]
    fn test_write_json_pretty_two_spaces() {
        let mut buffer = Vec::new();
        write_json(&mut buffer, "macros", &[json!({"id": 1})]).unwrap();
        let output = String::from_utf8(buffer).unwrap();
        assert_eq!(output, "{\n  \"macros\": [\n    {\n      \"id\": 1\n    }\n  ]\n}");
    }

    #[test]
    fn test_write_collection_adds_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_collection(
            dir.path(),
            "triggers",
            ExportFormat::Csv,
            "triggers",
            &[json!({"id": 1, "title": "t"})],
        )
        .unwrap();
        assert_eq!(path, dir.path().join("triggers.csv"));
        assert!(fs::read_to_string(&path).unwrap().starts_with("id,title"));

        let path = write_collection(dir.path(), "macros.json", ExportFormat::Json, "macros", &[])
            .unwrap();
        assert_eq!(path, dir.path().join("macros.json"));
    }
}
