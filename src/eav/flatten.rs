use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::HashMap;

use super::parse_decimal;
use super::property_map::{self, FieldKind, PROPERTY_FIELDS};
use crate::database::models::PropertyRow;

/// One AFE assembled from its property rows.
///
/// Holds a raw text slot for every entry of `PROPERTY_FIELDS`; slots nothing
/// was found for serialize as `null`.
#[derive(Debug, Clone, PartialEq)]
pub struct AfeDetail {
    pub content_guid: String,
    pub afe_number: Option<String>,
    values: Vec<Option<String>>,
}

impl AfeDetail {
    pub fn new(content_guid: impl Into<String>, afe_number: Option<String>) -> Self {
        Self {
            content_guid: content_guid.into(),
            afe_number,
            values: vec![None; PROPERTY_FIELDS.len()],
        }
    }

    /// Apply one property row. Unmapped GUIDs and null values leave the record untouched.
    pub fn apply(&mut self, property_guid: &str, value: Option<&str>) -> bool {
        let (Some((idx, _)), Some(value)) = (property_map::lookup(property_guid), value) else {
            return false;
        };
        self.values[idx] = Some(value.to_string());
        true
    }

    /// Raw stored text of a mapped field
    pub fn raw(&self, field: &str) -> Option<&str> {
        PROPERTY_FIELDS
            .iter()
            .position(|f| f.field == field)
            .and_then(|idx| self.values[idx].as_deref())
    }

    /// Output value of a mapped field, with numeric fields converted
    pub fn value(&self, field: &str) -> Option<serde_json::Value> {
        let idx = PROPERTY_FIELDS.iter().position(|f| f.field == field)?;
        Some(output_value(PROPERTY_FIELDS[idx].kind, self.values[idx].as_deref()))
    }
}

fn output_value(kind: FieldKind, raw: Option<&str>) -> serde_json::Value {
    match kind {
        FieldKind::Text => raw.map_or(serde_json::Value::Null, |v| serde_json::Value::String(v.to_string())),
        FieldKind::Number => parse_decimal(raw)
            .and_then(serde_json::Number::from_f64)
            .map_or(serde_json::Value::Null, serde_json::Value::Number),
    }
}

impl Serialize for AfeDetail {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(PROPERTY_FIELDS.len() + 1))?;
        map.serialize_entry("afe_number", &self.afe_number)?;
        for (field, raw) in PROPERTY_FIELDS.iter().zip(&self.values) {
            map.serialize_entry(field.field, &output_value(field.kind, raw.as_deref()))?;
        }
        map.end()
    }
}

/// Group property rows by content GUID into one `AfeDetail` each.
///
/// Records come out in the order their content GUID is first seen. Within a
/// record the last non-null value for a field wins.
pub fn flatten_properties<I>(rows: I) -> Vec<AfeDetail>
where
    I: IntoIterator<Item = PropertyRow>,
{
    let mut details: Vec<AfeDetail> = Vec::new();
    let mut by_content: HashMap<String, usize> = HashMap::new();

    for row in rows {
        let idx = match by_content.get(&row.content_guid) {
            Some(idx) => *idx,
            None => {
                details.push(AfeDetail::new(row.content_guid.clone(), row.afe_number.clone()));
                by_content.insert(row.content_guid.clone(), details.len() - 1);
                details.len() - 1
            }
        };

        if let Some(property_guid) = row.property_guid.as_deref() {
            details[idx].apply(property_guid, row.value.as_deref());
        }
    }

    details
}
