use crate::error::Error;
use crate::schema::{FieldType, Schema};
use crate::value::Value;
use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// A schema-driven instance of a resource shape.
///
/// One slot per field; a slot is either unset (the absence sentinel) or
/// holds a [`Value`] matching the field's declared type. Instances start
/// empty and are populated field by field, mirroring how request bodies
/// are assembled before serialization. A required `Map` field starts as an
/// empty map rather than unset, since its required-ness forbids omission.
#[derive(Debug, Clone)]
pub struct Resource {
    schema: Arc<Schema>,
    slots: Vec<Option<Value>>,
}

impl Resource {
    pub fn new(schema: Arc<Schema>) -> Self {
        let slots = schema
            .fields()
            .iter()
            .map(|field| match field.ty() {
                FieldType::Map(_) if field.required() => Some(Value::Map(BTreeMap::new())),
                _ => None,
            })
            .collect();
        Resource { schema, slots }
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Current value of a field, or `None` while it is unset.
    pub fn get(&self, name: &str) -> Option<&Value> {
        let (idx, _) = self.schema.field(name)?;
        self.slots[idx].as_ref()
    }

    /// Replaces a field's value after checking it against the declared
    /// type. Integers are accepted into float fields.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<(), Error> {
        let (idx, field) = self
            .schema
            .field(name)
            .ok_or_else(|| self.unknown_field(name))?;
        let value = coerce(field.ty(), value.into(), self.schema.name(), field.name())?;
        self.slots[idx] = Some(value);
        Ok(())
    }

    /// Fluent variant of [`set`](Self::set) for chained construction.
    pub fn with(mut self, name: &str, value: impl Into<Value>) -> Result<Self, Error> {
        self.set(name, value)?;
        Ok(self)
    }

    /// Inserts one entry into a `Map` field, creating the map if the field
    /// is unset.
    pub fn put(&mut self, name: &str, key: impl Into<String>, value: impl Into<Value>) -> Result<(), Error> {
        let (idx, field) = self
            .schema
            .field(name)
            .ok_or_else(|| self.unknown_field(name))?;
        let FieldType::Map(element) = field.ty() else {
            return Err(Error::malformed(
                self.schema.name(),
                format!("field `{}` is {}, not a map", field.name(), field.ty().describe()),
            ));
        };
        let value = coerce(element, value.into(), self.schema.name(), field.name())?;
        let slot = self.slots[idx].get_or_insert_with(|| Value::Map(BTreeMap::new()));
        match slot {
            Value::Map(map) => {
                map.insert(key.into(), value);
                Ok(())
            }
            // set() and new() only ever store maps in map slots
            _ => unreachable!("map field holds non-map value"),
        }
    }

    /// Appends one element to a `Seq` field, creating the sequence if the
    /// field is unset.
    pub fn push(&mut self, name: &str, value: impl Into<Value>) -> Result<(), Error> {
        let (idx, field) = self
            .schema
            .field(name)
            .ok_or_else(|| self.unknown_field(name))?;
        let FieldType::Seq(element) = field.ty() else {
            return Err(Error::malformed(
                self.schema.name(),
                format!(
                    "field `{}` is {}, not a sequence",
                    field.name(),
                    field.ty().describe()
                ),
            ));
        };
        let value = coerce(element, value.into(), self.schema.name(), field.name())?;
        let slot = self.slots[idx].get_or_insert_with(|| Value::Seq(Vec::new()));
        match slot {
            Value::Seq(items) => {
                items.push(value);
                Ok(())
            }
            _ => unreachable!("seq field holds non-seq value"),
        }
    }

    /// Restores the absence sentinel for a field. A required `Map` field
    /// returns to its empty-map default instead, since its required-ness
    /// forbids omission; required maps are therefore never absent.
    pub fn unset(&mut self, name: &str) -> Result<(), Error> {
        let (idx, field) = self
            .schema
            .field(name)
            .ok_or_else(|| self.unknown_field(name))?;
        self.slots[idx] = match field.ty() {
            FieldType::Map(_) if field.required() => Some(Value::Map(BTreeMap::new())),
            _ => None,
        };
        Ok(())
    }

    pub(crate) fn slot(&self, idx: usize) -> Option<&Value> {
        self.slots[idx].as_ref()
    }

    pub(crate) fn set_slot(&mut self, idx: usize, value: Value) {
        self.slots[idx] = Some(value);
    }

    fn unknown_field(&self, name: &str) -> Error {
        Error::malformed(self.schema.name(), format!("no field named `{name}`"))
    }
}

/// Checks a value against a declared type, coercing integers into float
/// fields. Nested objects must carry the declared schema.
fn coerce(ty: &FieldType, value: Value, shape: &str, field: &str) -> Result<Value, Error> {
    let ok = match (ty, &value) {
        (FieldType::String, Value::String(_)) => true,
        (FieldType::Enum(_), Value::String(_)) => true,
        (FieldType::Bool, Value::Bool(_)) => true,
        (FieldType::Integer, Value::Integer(_)) => true,
        (FieldType::Float, Value::Float(_)) => true,
        (FieldType::Float, Value::Integer(n)) => {
            return Ok(Value::Float(*n as f64));
        }
        (FieldType::Timestamp, Value::Timestamp(_)) => true,
        (FieldType::Object(schema), Value::Object(resource)) => {
            resource.schema().name() == schema.name()
        }
        (FieldType::Map(element), Value::Map(map)) => {
            let mut checked = BTreeMap::new();
            for (key, entry) in map.clone() {
                checked.insert(key, coerce(element, entry, shape, field)?);
            }
            return Ok(Value::Map(checked));
        }
        (FieldType::Seq(element), Value::Seq(items)) => {
            let mut checked = Vec::with_capacity(items.len());
            for item in items.clone() {
                checked.push(coerce(element, item, shape, field)?);
            }
            return Ok(Value::Seq(checked));
        }
        _ => false,
    };
    if ok {
        Ok(value)
    } else {
        Err(Error::malformed(
            shape,
            format!(
                "field `{field}` expects {}, got {}",
                ty.describe(),
                value.describe()
            ),
        ))
    }
}

// Two instances are equal iff they are of the same shape and every slot
// compares equal by deep value equality; hash is derived from the same
// slot set.
impl PartialEq for Resource {
    fn eq(&self, other: &Self) -> bool {
        self.schema.name() == other.schema.name() && self.slots == other.slots
    }
}

impl Eq for Resource {}

impl Hash for Resource {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.schema.name().hash(state);
        self.slots.hash(state);
    }
}
