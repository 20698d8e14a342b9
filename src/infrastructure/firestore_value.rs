// Conversion between Firestore REST typed values and plain JSON
use chrono::DateTime;
use serde::Deserialize;
use serde_json::{json, Map, Number, Value};

/// A document as returned by the Firestore REST API
#[derive(Debug, Deserialize)]
pub struct FirestoreDocument {
    pub name: String,
    #[serde(default)]
    pub fields: Map<String, Value>,
}

impl FirestoreDocument {
    /// Last segment of the document path
    pub fn id(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or(&self.name)
    }

    /// Plain JSON object of the document fields with `id` set to the document id
    pub fn into_json(self) -> Value {
        let id = self.id().to_string();
        let mut object = fields_to_json(self.fields);
        object.insert("id".to_string(), Value::String(id));
        Value::Object(object)
    }
}

pub fn fields_to_json(fields: Map<String, Value>) -> Map<String, Value> {
    fields
        .into_iter()
        .map(|(key, value)| (key, from_firestore(value)))
        .collect()
}

/// Unwraps one typed value (`{"stringValue": "x"}` → `"x"`).
/// Timestamps become epoch milliseconds, matching how records store dates.
pub fn from_firestore(value: Value) -> Value {
    let Value::Object(mut typed) = value else {
        return Value::Null;
    };
    let Some((kind, inner)) = typed.iter_mut().next().map(|(k, v)| (k.clone(), v.take())) else {
        return Value::Null;
    };

    match kind.as_str() {
        "stringValue" | "booleanValue" | "referenceValue" => inner,
        "integerValue" => match &inner {
            Value::String(s) => s.parse::<i64>().map(Value::from).unwrap_or(Value::Null),
            Value::Number(_) => inner,
            _ => Value::Null,
        },
        "doubleValue" => match &inner {
            Value::String(s) => s
                .parse::<f64>()
                .ok()
                .and_then(Number::from_f64)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            _ => inner,
        },
        "timestampValue" => inner
            .as_str()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|t| Value::from(t.timestamp_millis()))
            .unwrap_or(Value::Null),
        "mapValue" => match inner.get("fields") {
            Some(Value::Object(fields)) => Value::Object(fields_to_json(fields.clone())),
            _ => Value::Object(Map::new()),
        },
        "arrayValue" => match inner {
            Value::Object(mut array) => match array.remove("values") {
                Some(Value::Array(values)) => {
                    Value::Array(values.into_iter().map(from_firestore).collect())
                }
                _ => Value::Array(Vec::new()),
            },
            _ => Value::Array(Vec::new()),
        },
        _ => Value::Null,
    }
}

/// Wraps plain JSON into Firestore typed values
pub fn to_firestore(value: &Value) -> Value {
    match value {
        Value::Null => json!({ "nullValue": null }),
        Value::Bool(b) => json!({ "booleanValue": b }),
        Value::Number(n) => match n.as_i64() {
            Some(i) => json!({ "integerValue": i.to_string() }),
            None => json!({ "doubleValue": n.as_f64().unwrap_or(0.0) }),
        },
        Value::String(s) => json!({ "stringValue": s }),
        Value::Array(values) => {
            let values: Vec<Value> = values.iter().map(to_firestore).collect();
            json!({ "arrayValue": { "values": values } })
        }
        Value::Object(map) => {
            let fields: Map<String, Value> = map
                .iter()
                .map(|(k, v)| (k.clone(), to_firestore(v)))
                .collect();
            json!({ "mapValue": { "fields": fields } })
        }
    }
}
