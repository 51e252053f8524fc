use std::sync::Arc;

/// The wire type of a single field in a resource shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    String,
    Bool,
    Integer,
    Float,
    /// RFC 3339 timestamp, carried as `time::OffsetDateTime` in memory.
    Timestamp,
    /// Enumerated string; values outside the allowed set fail encoding.
    Enum(Vec<String>),
    /// A nested resource shape.
    Object(Arc<Schema>),
    /// String-keyed mapping. Keys are kept in sorted order so query-string
    /// output is stable.
    Map(Box<FieldType>),
    Seq(Box<FieldType>),
}

impl FieldType {
    pub(crate) fn describe(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Bool => "boolean",
            FieldType::Integer => "integer",
            FieldType::Float => "float",
            FieldType::Timestamp => "timestamp",
            FieldType::Enum(_) => "enumerated string",
            FieldType::Object(_) => "object",
            FieldType::Map(_) => "map",
            FieldType::Seq(_) => "sequence",
        }
    }
}

/// One field of a resource shape: in-memory name, wire name, required
/// flag, and wire type. The wire name is what appears in JSON keys and
/// query-string parameters (for example `links` is written as `_links`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    name: String,
    wire_name: String,
    required: bool,
    ty: FieldType,
}

impl Field {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn wire_name(&self) -> &str {
        &self.wire_name
    }

    pub fn required(&self) -> bool {
        self.required
    }

    pub fn ty(&self) -> &FieldType {
        &self.ty
    }
}

/// A named resource shape: an ordered list of fields.
///
/// The field order is fixed when the schema is built and drives the order
/// of JSON emission and query-string pairs, so output for a given instance
/// is byte-identical across calls.
#[derive(Debug, PartialEq, Eq)]
pub struct Schema {
    name: String,
    fields: Vec<Field>,
}

impl Schema {
    pub fn builder(name: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub(crate) fn field(&self, name: &str) -> Option<(usize, &Field)> {
        self.fields
            .iter()
            .enumerate()
            .find(|(_, field)| field.name == name)
    }
}

/// Fluent builder for [`Schema`].
///
/// Fields are appended in declaration order. `required`/`optional` use the
/// field name as the wire name; the `_wire` variants take an explicit wire
/// name for properties like `_links`.
pub struct SchemaBuilder {
    name: String,
    fields: Vec<Field>,
}

impl SchemaBuilder {
    pub fn required(self, name: impl Into<String>, ty: FieldType) -> Self {
        let name = name.into();
        let wire = name.clone();
        self.push(name, wire, true, ty)
    }

    pub fn optional(self, name: impl Into<String>, ty: FieldType) -> Self {
        let name = name.into();
        let wire = name.clone();
        self.push(name, wire, false, ty)
    }

    pub fn required_wire(
        self,
        name: impl Into<String>,
        wire_name: impl Into<String>,
        ty: FieldType,
    ) -> Self {
        self.push(name.into(), wire_name.into(), true, ty)
    }

    pub fn optional_wire(
        self,
        name: impl Into<String>,
        wire_name: impl Into<String>,
        ty: FieldType,
    ) -> Self {
        self.push(name.into(), wire_name.into(), false, ty)
    }

    fn push(mut self, name: String, wire_name: String, required: bool, ty: FieldType) -> Self {
        self.fields.push(Field {
            name,
            wire_name,
            required,
            ty,
        });
        self
    }

    /// Finishes the schema.
    ///
    /// # Panics
    ///
    /// Panics if two fields share a name or a wire name. Schemas are
    /// program-defined tables, so a collision is a bug at the definition
    /// site, not a runtime condition.
    pub fn build(self) -> Arc<Schema> {
        for (i, field) in self.fields.iter().enumerate() {
            for other in &self.fields[i + 1..] {
                assert!(
                    field.name != other.name,
                    "schema `{}` declares field `{}` twice",
                    self.name,
                    field.name
                );
                assert!(
                    field.wire_name != other.wire_name,
                    "schema `{}` declares wire name `{}` twice",
                    self.name,
                    field.wire_name
                );
            }
        }
        Arc::new(Schema {
            name: self.name,
            fields: self.fields,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_preserves_declaration_order() {
        let schema = Schema::builder("authenticatorDetail")
            .required_wire("links", "_links", FieldType::Map(Box::new(FieldType::String)))
            .required("createdAt", FieldType::Timestamp)
            .optional("certPem", FieldType::String)
            .build();

        let names: Vec<&str> = schema.fields().iter().map(Field::name).collect();
        assert_eq!(names, vec!["links", "createdAt", "certPem"]);
        assert_eq!(schema.fields()[0].wire_name(), "_links");
        assert!(schema.fields()[0].required());
        assert!(!schema.fields()[2].required());
    }

    #[test]
    fn field_lookup_is_by_in_memory_name() {
        let schema = Schema::builder("shape")
            .required_wire("links", "_links", FieldType::String)
            .build();
        let (idx, field) = schema.field("links").expect("field");
        assert_eq!(idx, 0);
        assert_eq!(field.wire_name(), "_links");
        assert!(schema.field("_links").is_none());
    }

    #[test]
    #[should_panic(expected = "declares field `id` twice")]
    fn duplicate_field_names_are_rejected() {
        let _ = Schema::builder("shape")
            .required("id", FieldType::String)
            .optional("id", FieldType::Integer)
            .build();
    }
}
