//! Input records.

use serde_json::{Map, Value};

use crate::error::TreeError;
use crate::node::Properties;

/// One flat input row: field name to value, in field order.
pub type Record = Map<String, Value>;

/// Anything readable as a field-name-to-value mapping.
pub trait IntoRecord {
    fn into_record(self) -> Result<Record, TreeError>;
}

impl IntoRecord for Record {
    fn into_record(self) -> Result<Record, TreeError> {
        Ok(self)
    }
}

impl IntoRecord for &Record {
    fn into_record(self) -> Result<Record, TreeError> {
        Ok(self.clone())
    }
}

impl IntoRecord for Value {
    fn into_record(self) -> Result<Record, TreeError> {
        match self {
            Value::Object(map) => Ok(map),
            other => Err(TreeError::InvalidDatatype(format!(
                "record must be an object, got {other}"
            ))),
        }
    }
}

impl IntoRecord for &Value {
    fn into_record(self) -> Result<Record, TreeError> {
        self.clone().into_record()
    }
}

impl IntoRecord for Properties {
    fn into_record(self) -> Result<Record, TreeError> {
        Ok(self.into_iter().collect())
    }
}

impl IntoRecord for Vec<(String, Value)> {
    fn into_record(self) -> Result<Record, TreeError> {
        Ok(self.into_iter().collect())
    }
}

impl<const N: usize> IntoRecord for [(&str, Value); N] {
    fn into_record(self) -> Result<Record, TreeError> {
        Ok(self
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect())
    }
}

/// Splits a JSON array into records.
///
/// Anything other than an array is the input-shape error.
pub fn records_from_value(value: Value) -> Result<Vec<Value>, TreeError> {
    match value {
        Value::Array(rows) => Ok(rows),
        other => Err(TreeError::InvalidDatatype(format!(
            "data must be an array of records, got {}",
            type_name(&other)
        ))),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn objects_are_records() {
        let rec = json!({"id": 1, "parent": 0}).into_record().unwrap();
        assert_eq!(rec.len(), 2);
    }

    #[test]
    fn scalars_are_not_records() {
        assert!(matches!(
            json!(5).into_record(),
            Err(TreeError::InvalidDatatype(_))
        ));
    }

    #[test]
    fn non_array_data_is_rejected() {
        assert!(records_from_value(json!([])).unwrap().is_empty());
        let err = records_from_value(json!({"id": 1})).unwrap_err();
        assert_eq!(
            err,
            TreeError::InvalidDatatype("data must be an array of records, got object".into())
        );
    }
}
