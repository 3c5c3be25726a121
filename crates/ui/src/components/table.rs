//! # Generic Table
//!
//! One row per record, one column per field, plus a column of named actions.
//! Columns are inferred from the first record unless the resource names them.

use dioxus::prelude::*;
use serde_json::Value;

use sentinel_core::{column_header, is_table_hidden};
use sentinel_model::{Record, ResourceKind, record_id};

use crate::theme::{self, Tone};

/// Shown instead of the table when there are no records
pub const EMPTY_PLACEHOLDER: &str = "No data available";

/// Longest string shown in a cell before it is cut
pub const MAX_CELL_CHARS: usize = 80;

// ============================================================================
// Table Model
// ============================================================================

/// Records plus the columns they are shown with
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TableModel {
    columns: Vec<String>,
    rows: Vec<Record>,
}

impl TableModel {
    /// Explicit columns are used as given; otherwise they are inferred
    pub fn new(rows: Vec<Record>, explicit_columns: Option<Vec<String>>) -> Self {
        let columns = explicit_columns.unwrap_or_else(|| infer_columns(&rows));
        Self { columns, rows }
    }

    /// Model for a resource, using its explicit columns when it has them
    pub fn for_kind(kind: ResourceKind, rows: Vec<Record>) -> Self {
        Self::new(rows, kind.columns())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn headers(&self) -> Vec<String> {
        self.columns.iter().map(|c| column_header(c)).collect()
    }

    pub fn rows(&self) -> &[Record] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn cell(&self, row: &Record, column: &str) -> String {
        format_cell_value(row.get(column))
    }
}

/// Fields of the first record, minus the hidden ones, in server order
pub fn infer_columns(rows: &[Record]) -> Vec<String> {
    rows.first()
        .map(|first| {
            first
                .keys()
                .filter(|name| !is_table_hidden(name))
                .cloned()
                .collect()
        })
        .unwrap_or_default()
}

/// Display text of one cell
pub fn format_cell_value(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => "—".to_string(),
        Some(Value::Bool(true)) => "✅".to_string(),
        Some(Value::Bool(false)) => "❌".to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::String(s)) => truncate(s),
        Some(Value::Array(items)) => format!("[{} items]", items.len()),
        Some(Value::Object(_)) => "{…}".to_string(),
    }
}

fn truncate(text: &str) -> String {
    if text.chars().count() <= MAX_CELL_CHARS {
        return text.to_string();
    }
    let cut: String = text.chars().take(MAX_CELL_CHARS).collect();
    format!("{}…", cut)
}

// ============================================================================
// Actions
// ============================================================================

/// A named control shown on every row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableAction {
    pub name: &'static str,
    pub label: &'static str,
    pub tone: Tone,
}

impl TableAction {
    pub const fn new(name: &'static str, label: &'static str, tone: Tone) -> Self {
        Self { name, label, tone }
    }
}

pub const EDIT: TableAction = TableAction::new("edit", "Edit", Tone::Primary);
pub const DELETE: TableAction = TableAction::new("delete", "Delete", Tone::Danger);

/// Row actions for a resource list
pub fn actions_for(kind: ResourceKind) -> Vec<TableAction> {
    match kind {
        ResourceKind::Users => vec![
            EDIT,
            DELETE,
            TableAction::new("addresses", "Addresses", Tone::Secondary),
            TableAction::new("passwords", "Passwords", Tone::Secondary),
            TableAction::new("profile", "Profile", Tone::Secondary),
            TableAction::new("sessions", "Sessions", Tone::Secondary),
            TableAction::new("devices", "Devices", Tone::Secondary),
            TableAction::new("roles", "Roles", Tone::Info),
        ],
        ResourceKind::Roles => vec![
            EDIT,
            DELETE,
            TableAction::new("grant", "Grant permission", Tone::Info),
        ],
        ResourceKind::SecurityQuestions => vec![
            EDIT,
            DELETE,
            TableAction::new("answers", "Answers", Tone::Secondary),
        ],
        ResourceKind::Sessions => vec![TableAction::new("delete", "Revoke", Tone::Danger)],
        _ => vec![EDIT, DELETE],
    }
}

// ============================================================================
// Component
// ============================================================================

#[derive(Props, Clone, PartialEq)]
pub struct DataTableProps {
    pub model: TableModel,

    #[props(default)]
    pub actions: Vec<TableAction>,

    /// Called with `(action name, record)`
    #[props(default)]
    pub on_action: EventHandler<(String, Record)>,

    /// Disable the action controls while a mutation runs
    #[props(default = false)]
    pub busy: bool,
}

/// Table of records with per-row actions
#[component]
pub fn DataTable(props: DataTableProps) -> Element {
    let r = theme::current();

    if props.model.is_empty() {
        return rsx! {
            div { class: r.empty_state(), "{EMPTY_PLACEHOLDER}" }
        };
    }

    let headers = props.model.headers();
    let has_actions = !props.actions.is_empty();
    let rows: Vec<(String, Record)> = props
        .model
        .rows()
        .iter()
        .enumerate()
        .map(|(index, row)| (row_key(row, index), row.clone()))
        .collect();

    rsx! {
        table {
            class: r.table(),
            thead {
                class: r.table_head(),
                tr {
                    for header in headers {
                        th { class: r.table_cell(), "{header}" }
                    }
                    if has_actions {
                        th { class: r.table_cell(), "ACTIONS" }
                    }
                }
            }
            tbody {
                for (key, row) in rows {
                    tr {
                        key: "{key}",
                        class: r.table_row(),
                        for column in props.model.columns() {
                            td { class: r.table_cell(), {props.model.cell(&row, column)} }
                        }
                        if has_actions {
                            td {
                                class: r.table_cell(),
                                for action in props.actions.iter().copied() {
                                    button {
                                        class: r.button(action.tone),
                                        disabled: props.busy,
                                        onclick: {
                                            let row = row.clone();
                                            move |_| props.on_action.call((action.name.to_string(), row.clone()))
                                        },
                                        "{action.label}"
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

fn row_key(row: &Record, index: usize) -> String {
    record_id(row)
        .map(|id| id.to_string())
        .unwrap_or_else(|| format!("row-{}", index))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn record(value: Value) -> Record {
        match value {
            Value::Object(map) => map,
            _ => panic!("not an object"),
        }
    }

    #[test]
    fn test_inferred_columns_skip_hidden_fields() {
        let rows = vec![record(json!({
            "id": 1,
            "email": "ana@example.com",
            "password": "x",
            "created_at": "2024-01-01",
            "updated_at": "2024-01-02",
            "is_active": true
        }))];
        let model = TableModel::new(rows, None);
        assert_eq!(model.columns(), ["id", "email", "is_active"]);
        assert_eq!(model.headers(), ["ID", "EMAIL", "IS ACTIVE"]);
    }

    #[test]
    fn test_empty_collection_has_no_columns() {
        let model = TableModel::new(Vec::new(), None);
        assert!(model.is_empty());
        assert!(model.columns().is_empty());
    }

    #[test]
    fn test_explicit_columns_are_used_verbatim() {
        let rows = vec![record(json!({"id": "s1", "token": "t", "state": "active"}))];
        let model = TableModel::for_kind(ResourceKind::Sessions, rows);
        assert_eq!(
            model.columns(),
            ["id", "token", "expiration", "FACode", "state", "created_at"]
        );
        assert_eq!(model.cell(&model.rows()[0], "expiration"), "—");
    }

    #[test]
    fn test_cell_formatting() {
        assert_eq!(format_cell_value(Some(&json!(null))), "—");
        assert_eq!(format_cell_value(Some(&json!(true))), "✅");
        assert_eq!(format_cell_value(Some(&json!(false))), "❌");
        assert_eq!(format_cell_value(Some(&json!(42))), "42");
        assert_eq!(format_cell_value(Some(&json!([1, 2, 3]))), "[3 items]");
        assert_eq!(format_cell_value(Some(&json!({"a": 1}))), "{…}");
    }

    #[test]
    fn test_long_strings_are_truncated() {
        let long = "é".repeat(100);
        let shown = format_cell_value(Some(&Value::String(long)));
        assert_eq!(shown.chars().count(), MAX_CELL_CHARS + 1);
        assert!(shown.ends_with('…'));

        let short = "x".repeat(MAX_CELL_CHARS);
        assert_eq!(format_cell_value(Some(&Value::String(short.clone()))), short);
    }

    #[test]
    fn test_user_actions() {
        let names: Vec<&str> = actions_for(ResourceKind::Users)
            .iter()
            .map(|a| a.name)
            .collect();
        assert_eq!(
            names,
            ["edit", "delete", "addresses", "passwords", "profile", "sessions", "devices", "roles"]
        );
    }

    #[test]
    fn test_row_key_falls_back_to_index() {
        assert_eq!(row_key(&record(json!({"id": 5})), 0), "5");
        assert_eq!(row_key(&record(json!({"name": "x"})), 2), "row-2");
    }
}
