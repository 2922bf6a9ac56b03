use std::cmp::Ordering;

use serde_json::Value;

use crate::database::{Document, RecordId};

use super::error::FilterError;
use super::filter::validate_field_name;
use super::types::{sort_key_of, Condition, DocFilter, Keyset, SortDirection};

/// Translates a `DocFilter` into a parameterised WHERE clause and evaluates it
/// against in-memory documents. Both paths must agree on every condition.
pub struct FilterWhere {
    param_values: Vec<String>,
    param_index: usize,
}

impl FilterWhere {
    pub fn new(starting_param_index: usize) -> Self {
        Self {
            param_values: vec![],
            param_index: starting_param_index,
        }
    }

    pub fn generate(filter: &DocFilter, starting_param_index: usize) -> Result<(String, Vec<String>), FilterError> {
        let mut filter_where = Self::new(starting_param_index);
        filter_where.build(filter)
    }

    pub fn validate(filter: &DocFilter) -> Result<(), FilterError> {
        for condition in &filter.conditions {
            match condition {
                Condition::Contains { field, .. } => validate_field_name(field)?,
                Condition::After(keyset) => validate_field_name(&keyset.field)?,
            }
        }
        Ok(())
    }

    fn build(&mut self, filter: &DocFilter) -> Result<(String, Vec<String>), FilterError> {
        Self::validate(filter)?;

        let mut sql_conditions = vec![];
        for condition in &filter.conditions {
            sql_conditions.push(self.build_sql_condition(condition));
        }
        let where_clause = if sql_conditions.is_empty() { "1=1".to_string() } else { sql_conditions.join(" AND ") };
        Ok((where_clause, self.param_values.clone()))
    }

    fn build_sql_condition(&mut self, condition: &Condition) -> String {
        match condition {
            Condition::Contains { field, needle } => {
                let p = self.push_param(format!("%{}%", escape_like(needle)));
                format!("doc->>'{}' ILIKE {} ESCAPE '\\'", field, p)
            }
            Condition::After(keyset) => {
                let value = self.push_param(keyset.value.clone());
                let id = self.push_param(keyset.id.to_hex());
                format!(
                    "({}, id) {} ({}, {})",
                    sort_expression(&keyset.field),
                    keyset.direction.after_operator(),
                    value,
                    id
                )
            }
        }
    }

    fn push_param(&mut self, value: String) -> String {
        self.param_values.push(value);
        self.param_index += 1;
        format!("${}", self.param_index)
    }

    /// In-memory evaluation of the same filter
    pub fn matches(filter: &DocFilter, id: &RecordId, doc: &Document) -> bool {
        filter.conditions.iter().all(|condition| match condition {
            // `doc->>'field'` is NULL for missing and null fields, text otherwise
            Condition::Contains { field, needle } => match doc.get(field) {
                None | Some(Value::Null) => false,
                Some(_) => sort_key_of(doc, field).to_lowercase().contains(&needle.to_lowercase()),
            },
            Condition::After(keyset) => is_after(keyset, id, doc),
        })
    }
}

fn is_after(keyset: &Keyset, id: &RecordId, doc: &Document) -> bool {
    let ordering = sort_key_of(doc, &keyset.field)
        .as_str()
        .cmp(keyset.value.as_str())
        .then_with(|| id.cmp(&keyset.id));
    match keyset.direction {
        SortDirection::Asc => ordering == Ordering::Greater,
        SortDirection::Desc => ordering == Ordering::Less,
    }
}

/// SQL rendering of `sort_key_of`, compared bytewise
pub(crate) fn sort_expression(field: &str) -> String {
    format!("COALESCE(doc->>'{}', '') COLLATE \"C\"", field)
}

fn escape_like(needle: &str) -> String {
    let mut out = String::with_capacity(needle.len());
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: serde_json::Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    fn id(n: u8) -> RecordId {
        RecordId::from_bytes([0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, n])
    }

    #[test]
    fn empty_filter_matches_everything() {
        let (sql, params) = FilterWhere::generate(&DocFilter::new(), 0).unwrap();
        assert_eq!(sql, "1=1");
        assert!(params.is_empty());
        assert!(FilterWhere::matches(&DocFilter::new(), &id(1), &doc(json!({}))));
    }

    #[test]
    fn contains_is_literal_and_case_insensitive() {
        let filter = DocFilter::new().contains("name", "50%_off");
        let (sql, params) = FilterWhere::generate(&filter, 0).unwrap();
        assert_eq!(sql, "doc->>'name' ILIKE $1 ESCAPE '\\'");
        assert_eq!(params, vec!["%50\\%\\_off%".to_string()]);

        let filter = DocFilter::new().contains("name", "test");
        assert!(FilterWhere::matches(&filter, &id(1), &doc(json!({ "name": "Alpha-Test" }))));
        assert!(!FilterWhere::matches(&filter, &id(1), &doc(json!({ "name": "Alpha" }))));
        assert!(!FilterWhere::matches(&filter, &id(1), &doc(json!({ "description": "test" }))));
    }

    #[test]
    fn contains_matches_scalars_by_their_text() {
        let filter = DocFilter::new().contains("name", "42");
        assert!(FilterWhere::matches(&filter, &id(1), &doc(json!({ "name": 1425 }))));
        assert!(!FilterWhere::matches(&filter, &id(1), &doc(json!({ "name": 17 }))));

        let filter = DocFilter::new().contains("name", "TRU");
        assert!(FilterWhere::matches(&filter, &id(1), &doc(json!({ "name": true }))));
        assert!(!FilterWhere::matches(&filter, &id(1), &doc(json!({ "name": null }))));
    }

    #[test]
    fn regex_metacharacters_are_not_interpreted() {
        let filter = DocFilter::new().contains("name", "a.c");
        assert!(!FilterWhere::matches(&filter, &id(1), &doc(json!({ "name": "abc" }))));
        assert!(FilterWhere::matches(&filter, &id(1), &doc(json!({ "name": "xa.cx" }))));
    }

    #[test]
    fn keyset_uses_row_comparison() {
        let keyset = Keyset {
            field: "name".to_string(),
            value: "m".to_string(),
            id: id(5),
            direction: SortDirection::Desc,
        };
        let filter = DocFilter::new().contains("name", "x").after(keyset);
        let (sql, params) = FilterWhere::generate(&filter, 0).unwrap();
        assert_eq!(
            sql,
            "doc->>'name' ILIKE $1 ESCAPE '\\' AND (COALESCE(doc->>'name', '') COLLATE \"C\", id) < ($2, $3)"
        );
        assert_eq!(params[1], "m");
        assert_eq!(params[2], id(5).to_hex());
    }

    #[test]
    fn keyset_breaks_ties_on_id() {
        let keyset = Keyset {
            field: "name".to_string(),
            value: "same".to_string(),
            id: id(5),
            direction: SortDirection::Asc,
        };
        let filter = DocFilter::new().after(keyset);
        let same = doc(json!({ "name": "same" }));
        assert!(FilterWhere::matches(&filter, &id(6), &same));
        assert!(!FilterWhere::matches(&filter, &id(5), &same));
        assert!(!FilterWhere::matches(&filter, &id(4), &same));
        assert!(FilterWhere::matches(&filter, &id(1), &doc(json!({ "name": "zed" }))));
        assert!(!FilterWhere::matches(&filter, &id(9), &doc(json!({}))));
    }

    #[test]
    fn rejects_unsafe_field_names() {
        let filter = DocFilter::new().contains("name'; DROP TABLE x; --", "a");
        assert!(FilterWhere::generate(&filter, 0).is_err());
    }
}
