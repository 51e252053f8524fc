use crate::resource::Resource;
use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

/// An in-memory field value.
///
/// There is no null variant: the wire's `null` means "absent" and maps to
/// the unset slot in [`Resource`], not to a value. Enumerated strings are
/// carried as `String` and validated against their allowed set when
/// encoded.
#[derive(Debug, Clone)]
pub enum Value {
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Timestamp(OffsetDateTime),
    Object(Resource),
    Map(BTreeMap<String, Value>),
    Seq(Vec<Value>),
}

impl Value {
    pub(crate) fn describe(&self) -> &'static str {
        match self {
            Value::Bool(_) => "boolean",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Timestamp(_) => "timestamp",
            Value::Object(_) => "object",
            Value::Map(_) => "map",
            Value::Seq(_) => "sequence",
        }
    }

    /// Renders a scalar to its wire string form: booleans as
    /// `true`/`false`, timestamps as RFC 3339. Containers have no scalar
    /// form and report why.
    pub(crate) fn render(&self) -> Result<String, String> {
        match self {
            Value::Bool(value) => Ok(value.to_string()),
            Value::Integer(value) => Ok(value.to_string()),
            Value::Float(value) => {
                if value.is_finite() {
                    Ok(value.to_string())
                } else {
                    Err(format!("non-finite float {value} has no wire form"))
                }
            }
            Value::String(value) => Ok(value.clone()),
            Value::Timestamp(value) => value
                .format(&Rfc3339)
                .map_err(|err| format!("timestamp cannot be formatted: {err}")),
            Value::Object(_) | Value::Map(_) | Value::Seq(_) => {
                Err(format!("{} value in scalar position", self.describe()))
            }
        }
    }
}

// Floats compare and hash by bit pattern so `Eq` and `Hash` agree; see
// DESIGN.md. NaN therefore equals itself and `0.0 != -0.0`.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Timestamp(a), Value::Timestamp(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::Seq(a), Value::Seq(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::Bool(value) => value.hash(state),
            Value::Integer(value) => value.hash(state),
            Value::Float(value) => value.to_bits().hash(state),
            Value::String(value) => value.hash(state),
            Value::Timestamp(value) => value.hash(state),
            Value::Object(value) => value.hash(state),
            Value::Map(value) => value.hash(state),
            Value::Seq(value) => value.hash(state),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Integer(value.into())
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<OffsetDateTime> for Value {
    fn from(value: OffsetDateTime) -> Self {
        Value::Timestamp(value)
    }
}

impl From<Resource> for Value {
    fn from(value: Resource) -> Self {
        Value::Object(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::Seq(value)
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(value: BTreeMap<String, Value>) -> Self {
        Value::Map(value)
    }
}
