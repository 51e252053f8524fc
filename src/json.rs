use crate::error::Error;
use crate::resource::Resource;
use crate::schema::{Field, FieldType, Schema};
use crate::value::Value;
use log::warn;
use serde_json::{Map as JsonMap, Value as Json};
use std::collections::BTreeMap;
use std::sync::Arc;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

/// What to do when a parsed payload omits a field the schema marks
/// required. `Reject` fails with [`Error::MissingRequiredField`];
/// `Default` leaves the slot unset and logs a warning.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MissingFieldPolicy {
    #[default]
    Reject,
    Default,
}

/// Knobs for [`from_json`]. Strict by default.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParseOptions {
    pub missing_required: MissingFieldPolicy,
}

/// Serializes a resource to a JSON object.
///
/// Fields are emitted in schema order. A required field is always present,
/// as `null` while unset; an unset optional field is omitted entirely.
pub fn to_json(resource: &Resource) -> Result<Json, Error> {
    let schema = resource.schema();
    let mut object = JsonMap::new();
    for (idx, field) in schema.fields().iter().enumerate() {
        match resource.slot(idx) {
            Some(value) => {
                let encoded = encode_value(schema.name(), field.name(), field.ty(), value)?;
                object.insert(field.wire_name().to_string(), encoded);
            }
            None if field.required() => {
                object.insert(field.wire_name().to_string(), Json::Null);
            }
            None => {}
        }
    }
    Ok(Json::Object(object))
}

pub fn to_json_string(resource: &Resource) -> Result<String, Error> {
    Ok(serde_json::to_string(&to_json(resource)?)?)
}

/// Parses a JSON object into a resource of the given shape.
///
/// Keys not named by the schema are ignored for wire compatibility with
/// newer servers. A JSON `null` maps to the absence sentinel, so
/// `from_json(schema, &to_json(v)?, ..)` reproduces `v` exactly.
pub fn from_json(
    schema: &Arc<Schema>,
    json: &Json,
    options: &ParseOptions,
) -> Result<Resource, Error> {
    let Some(object) = json.as_object() else {
        return Err(Error::malformed(
            schema.name(),
            format!("expected a JSON object, got {}", json_kind(json)),
        ));
    };
    let mut resource = Resource::new(Arc::clone(schema));
    for (idx, field) in schema.fields().iter().enumerate() {
        match object.get(field.wire_name()) {
            None if field.required() => match options.missing_required {
                MissingFieldPolicy::Reject => {
                    return Err(Error::MissingRequiredField {
                        shape: schema.name().to_string(),
                        field: field.wire_name().to_string(),
                    });
                }
                MissingFieldPolicy::Default => {
                    warn!(
                        "payload for `{}` is missing required field `{}`, leaving it unset",
                        schema.name(),
                        field.wire_name()
                    );
                }
            },
            None | Some(Json::Null) => {}
            Some(value) => {
                let decoded = decode_value(schema.name(), field, field.ty(), value, options)?;
                resource.set_slot(idx, decoded);
            }
        }
    }
    Ok(resource)
}

pub fn from_json_str(
    schema: &Arc<Schema>,
    payload: &str,
    options: &ParseOptions,
) -> Result<Resource, Error> {
    let json: Json = serde_json::from_str(payload)?;
    from_json(schema, &json, options)
}

fn encode_value(shape: &str, field: &str, ty: &FieldType, value: &Value) -> Result<Json, Error> {
    match (ty, value) {
        (FieldType::Enum(allowed), Value::String(text)) => {
            if allowed.iter().any(|candidate| candidate == text) {
                Ok(Json::String(text.clone()))
            } else {
                Err(Error::encoding(
                    shape,
                    field,
                    format!("`{text}` is not one of the allowed values"),
                ))
            }
        }
        (_, Value::String(text)) => Ok(Json::String(text.clone())),
        (_, Value::Bool(flag)) => Ok(Json::Bool(*flag)),
        (_, Value::Integer(number)) => Ok(Json::Number((*number).into())),
        (_, Value::Float(number)) => serde_json::Number::from_f64(*number)
            .map(Json::Number)
            .ok_or_else(|| {
                Error::encoding(shape, field, format!("non-finite float {number} has no wire form"))
            }),
        (_, Value::Timestamp(stamp)) => stamp
            .format(&Rfc3339)
            .map(Json::String)
            .map_err(|err| Error::encoding(shape, field, format!("timestamp cannot be formatted: {err}"))),
        (_, Value::Object(nested)) => to_json(nested),
        (FieldType::Map(element), Value::Map(entries)) => {
            let mut object = JsonMap::new();
            for (key, entry) in entries {
                object.insert(key.clone(), encode_value(shape, field, element, entry)?);
            }
            Ok(Json::Object(object))
        }
        (FieldType::Seq(element), Value::Seq(items)) => {
            let mut array = Vec::with_capacity(items.len());
            for item in items {
                array.push(encode_value(shape, field, element, item)?);
            }
            Ok(Json::Array(array))
        }
        // set() guarantees slot values match their declared type
        (_, value) => Err(Error::encoding(
            shape,
            field,
            format!("{} value does not match declared {}", value.describe(), ty.describe()),
        )),
    }
}

fn decode_value(
    shape: &str,
    field: &Field,
    ty: &FieldType,
    json: &Json,
    options: &ParseOptions,
) -> Result<Value, Error> {
    let mismatch = || {
        Error::malformed(
            shape,
            format!(
                "field `{}` expects {}, got {}",
                field.wire_name(),
                ty.describe(),
                json_kind(json)
            ),
        )
    };
    match ty {
        FieldType::String => json
            .as_str()
            .map(|text| Value::String(text.to_string()))
            .ok_or_else(mismatch),
        FieldType::Enum(allowed) => {
            let text = json.as_str().ok_or_else(mismatch)?;
            if allowed.iter().any(|candidate| candidate == text) {
                Ok(Value::String(text.to_string()))
            } else {
                Err(Error::malformed(
                    shape,
                    format!(
                        "field `{}` has value `{text}` outside its allowed set",
                        field.wire_name()
                    ),
                ))
            }
        }
        FieldType::Bool => json.as_bool().map(Value::Bool).ok_or_else(mismatch),
        FieldType::Integer => json.as_i64().map(Value::Integer).ok_or_else(mismatch),
        FieldType::Float => json.as_f64().map(Value::Float).ok_or_else(mismatch),
        FieldType::Timestamp => {
            let text = json.as_str().ok_or_else(mismatch)?;
            OffsetDateTime::parse(text, &Rfc3339)
                .map(Value::Timestamp)
                .map_err(|err| {
                    Error::malformed(
                        shape,
                        format!(
                            "field `{}` is not an RFC 3339 timestamp: {err}",
                            field.wire_name()
                        ),
                    )
                })
        }
        FieldType::Object(nested) => from_json(nested, json, options).map(Value::Object),
        FieldType::Map(element) => {
            let object = json.as_object().ok_or_else(mismatch)?;
            let mut entries = BTreeMap::new();
            for (key, entry) in object {
                entries.insert(key.clone(), decode_value(shape, field, element, entry, options)?);
            }
            Ok(Value::Map(entries))
        }
        FieldType::Seq(element) => {
            let array = json.as_array().ok_or_else(mismatch)?;
            let mut items = Vec::with_capacity(array.len());
            for item in array {
                items.push(decode_value(shape, field, element, item, options)?);
            }
            Ok(Value::Seq(items))
        }
    }
}

fn json_kind(json: &Json) -> &'static str {
    match json {
        Json::Null => "null",
        Json::Bool(_) => "boolean",
        Json::Number(_) => "number",
        Json::String(_) => "string",
        Json::Array(_) => "array",
        Json::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Schema;
    use serde_json::json;
    use time::macros::datetime;

    fn enrollment_schema() -> Arc<Schema> {
        Schema::builder("identityExtendValidateEnrollmentRequest")
            .required("clientCert", FieldType::String)
            .build()
    }

    fn detail_schema() -> Arc<Schema> {
        Schema::builder("authenticatorDetail")
            .required_wire("links", "_links", FieldType::Map(Box::new(FieldType::String)))
            .required("createdAt", FieldType::Timestamp)
            .required("id", FieldType::String)
            .optional("isIssuedByNetwork", FieldType::Bool)
            .optional(
                "method",
                FieldType::Enum(vec!["cert".to_string(), "updb".to_string()]),
            )
            .build()
    }

    #[test]
    fn required_fields_are_emitted_even_when_unset() {
        let resource = Resource::new(detail_schema());
        let json = to_json(&resource).expect("encode");
        let object = json.as_object().expect("object");
        assert_eq!(object.get("_links"), Some(&json!({})));
        assert_eq!(object.get("createdAt"), Some(&Json::Null));
        assert_eq!(object.get("id"), Some(&Json::Null));
        assert!(!object.contains_key("isIssuedByNetwork"));
    }

    #[test]
    fn emission_follows_schema_order() {
        let resource = Resource::new(detail_schema())
            .with("id", "auth1")
            .expect("id")
            .with("createdAt", datetime!(2024-09-04 10:11:22 UTC))
            .expect("createdAt");
        assert_eq!(
            to_json_string(&resource).expect("encode"),
            r#"{"_links":{},"createdAt":"2024-09-04T10:11:22Z","id":"auth1"}"#
        );
    }

    #[test]
    fn client_cert_scenario_matches_wire_form() {
        let resource = Resource::new(enrollment_schema())
            .with("clientCert", "ABC+DEF")
            .expect("set");
        assert_eq!(
            to_json_string(&resource).expect("encode"),
            r#"{"clientCert":"ABC+DEF"}"#
        );
    }

    #[test]
    fn round_trip_preserves_the_instance() {
        let mut resource = Resource::new(detail_schema());
        resource.set("id", "auth1").expect("id");
        resource
            .set("createdAt", datetime!(2024-09-04 10:11:22.5 UTC))
            .expect("createdAt");
        resource.put("links", "self", "./authenticators/auth1").expect("put");
        resource.set("method", "cert").expect("method");

        let encoded = to_json(&resource).expect("encode");
        let decoded =
            from_json(&detail_schema(), &encoded, &ParseOptions::default()).expect("decode");
        assert_eq!(decoded, resource);
    }

    #[test]
    fn round_trip_holds_for_unset_required_fields() {
        let resource = Resource::new(detail_schema());
        let encoded = to_json(&resource).expect("encode");
        let decoded =
            from_json(&detail_schema(), &encoded, &ParseOptions::default()).expect("decode");
        assert_eq!(decoded, resource);
    }

    #[test]
    fn strict_parse_rejects_missing_required_field() {
        let err = from_json_str(&enrollment_schema(), "{}", &ParseOptions::default())
            .expect_err("missing");
        match err {
            Error::MissingRequiredField { shape, field } => {
                assert_eq!(shape, "identityExtendValidateEnrollmentRequest");
                assert_eq!(field, "clientCert");
            }
            other => panic!("expected MissingRequiredField, got {other:?}"),
        }
    }

    #[test]
    fn lenient_parse_leaves_missing_required_field_unset() {
        let options = ParseOptions {
            missing_required: MissingFieldPolicy::Default,
        };
        let resource = from_json_str(&enrollment_schema(), "{}", &options).expect("decode");
        assert!(resource.get("clientCert").is_none());
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let resource = from_json_str(
            &enrollment_schema(),
            r#"{"clientCert":"PEM","futureField":42}"#,
            &ParseOptions::default(),
        )
        .expect("decode");
        assert_eq!(resource.get("clientCert"), Some(&Value::from("PEM")));
    }

    #[test]
    fn type_mismatch_names_field_and_shape() {
        let err = from_json_str(
            &enrollment_schema(),
            r#"{"clientCert":17}"#,
            &ParseOptions::default(),
        )
        .expect_err("mismatch");
        let text = err.to_string();
        assert!(text.contains("identityExtendValidateEnrollmentRequest"));
        assert!(text.contains("`clientCert`"));
        assert!(text.contains("expects string"));
    }

    #[test]
    fn non_object_payload_is_malformed() {
        let err = from_json(&enrollment_schema(), &json!([1, 2]), &ParseOptions::default())
            .expect_err("array");
        assert!(err.to_string().contains("expected a JSON object, got array"));
    }

    #[test]
    fn enum_values_are_validated_both_ways() {
        let mut resource = Resource::new(detail_schema());
        resource.set("method", "pwned").expect("set accepts any string");
        let err = to_json(&resource).expect_err("encode");
        assert!(matches!(err, Error::Encoding { .. }));

        let err = from_json_str(
            &detail_schema(),
            r#"{"_links":{},"createdAt":null,"id":null,"method":"pwned"}"#,
            &ParseOptions::default(),
        )
        .expect_err("decode");
        assert!(err.to_string().contains("outside its allowed set"));
    }

    #[test]
    fn nested_objects_recurse_through_the_codec() {
        let inner = Schema::builder("entityRef")
            .required("id", FieldType::String)
            .optional("name", FieldType::String)
            .build();
        let outer = Schema::builder("detail")
            .required("identity", FieldType::Object(Arc::clone(&inner)))
            .build();

        let identity = Resource::new(Arc::clone(&inner)).with("id", "id1").expect("id");
        let resource = Resource::new(Arc::clone(&outer))
            .with("identity", identity)
            .expect("identity");

        assert_eq!(
            to_json_string(&resource).expect("encode"),
            r#"{"identity":{"id":"id1"}}"#
        );
        let decoded = from_json_str(
            &outer,
            r#"{"identity":{"id":"id1"}}"#,
            &ParseOptions::default(),
        )
        .expect("decode");
        assert_eq!(decoded, resource);
    }
}
