use std::cmp::Ordering;

use crate::database::{Document, RecordId};

use super::error::FilterError;
use super::filter::validate_field_name;
use super::filter_where::sort_expression;
use super::types::{sort_key_of, SortDirection, SortKey, ID_FIELD};

pub struct FilterOrder;

impl FilterOrder {
    pub fn generate(keys: &[SortKey]) -> Result<String, FilterError> {
        if keys.is_empty() { return Ok(String::new()); }
        let mut parts = Vec::with_capacity(keys.len());
        for key in keys {
            let expr = if key.field == ID_FIELD {
                "id".to_string()
            } else {
                validate_field_name(&key.field)?;
                sort_expression(&key.field)
            };
            parts.push(format!("{} {}", expr, key.direction.to_sql()));
        }
        Ok(format!("ORDER BY {}", parts.join(", ")))
    }

    /// Compare two stored documents under `keys`, falling through to the next
    /// key on ties. Documents equal on every key compare equal.
    pub fn compare(keys: &[SortKey], a: (&RecordId, &Document), b: (&RecordId, &Document)) -> Ordering {
        for key in keys {
            let ordering = if key.field == ID_FIELD {
                a.0.cmp(b.0)
            } else {
                sort_key_of(a.1, &key.field).cmp(&sort_key_of(b.1, &key.field))
            };
            let ordering = match key.direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn generates_order_by_with_id_tiebreak() {
        let keys = vec![
            SortKey::new("description", SortDirection::Desc),
            SortKey::new(ID_FIELD, SortDirection::Desc),
        ];
        assert_eq!(
            FilterOrder::generate(&keys).unwrap(),
            "ORDER BY COALESCE(doc->>'description', '') COLLATE \"C\" DESC, id DESC"
        );
        assert_eq!(FilterOrder::generate(&[]).unwrap(), "");
    }

    #[test]
    fn compare_falls_through_to_id() {
        let keys = vec![SortKey::new("name", SortDirection::Asc), SortKey::new(ID_FIELD, SortDirection::Asc)];
        let a_id = RecordId::from_bytes([0; 12]);
        let b_id = RecordId::from_bytes([1; 12]);
        let doc = json!({ "name": "same" }).as_object().cloned().unwrap();
        assert_eq!(FilterOrder::compare(&keys, (&a_id, &doc), (&b_id, &doc)), Ordering::Less);

        let desc = vec![SortKey::new("name", SortDirection::Desc), SortKey::new(ID_FIELD, SortDirection::Desc)];
        assert_eq!(FilterOrder::compare(&desc, (&a_id, &doc), (&b_id, &doc)), Ordering::Greater);
    }
}
