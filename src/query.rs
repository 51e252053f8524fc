use crate::error::Error;
use crate::resource::Resource;
use crate::schema::FieldType;
use crate::value::Value;

/// Renders a resource as a URL query string in form style with explode:
/// `field=value&field2=value2`. Sequence fields repeat their key per
/// element; object and map fields switch to deepObject style using the
/// field's wire name as prefix.
pub fn to_query_string(resource: &Resource) -> Result<String, Error> {
    let mut pairs = Vec::new();
    encode_resource(resource, None, &mut pairs)?;
    Ok(pairs.join("&"))
}

/// Renders a resource in deepObject style under a prefix: every key is
/// wrapped as `prefix[name]`, nested objects recurse with `prefix[name]`
/// as their own prefix, map entries as `prefix[name][key]`, and sequence
/// elements as `prefix[name][index]`.
pub fn to_query_string_with_prefix(resource: &Resource, prefix: &str) -> Result<String, Error> {
    let mut pairs = Vec::new();
    encode_resource(resource, Some(prefix), &mut pairs)?;
    Ok(pairs.join("&"))
}

/// Percent-encodes one query value. Uses form-urlencoded rules, then
/// rewrites the `+` spaces to `%20`; a literal `+` in the value has
/// already become `%2B` at that point, matching what the Edge API expects.
pub(crate) fn encode_component(value: &str) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(value.as_bytes()).collect();
    encoded.replace('+', "%20")
}

fn encode_resource(
    resource: &Resource,
    prefix: Option<&str>,
    pairs: &mut Vec<String>,
) -> Result<(), Error> {
    let schema = resource.schema();
    for (idx, field) in schema.fields().iter().enumerate() {
        let Some(value) = resource.slot(idx) else {
            continue;
        };
        let key = match prefix {
            Some(prefix) => format!("{prefix}[{}]", field.wire_name()),
            None => field.wire_name().to_string(),
        };
        emit(
            &key,
            prefix.is_some(),
            field.ty(),
            value,
            schema.name(),
            field.name(),
            pairs,
        )?;
    }
    Ok(())
}

fn emit(
    key: &str,
    indexed: bool,
    ty: &FieldType,
    value: &Value,
    shape: &str,
    field: &str,
    pairs: &mut Vec<String>,
) -> Result<(), Error> {
    match (ty, value) {
        (FieldType::Object(_), Value::Object(nested)) => {
            encode_resource(nested, Some(key), pairs)
        }
        (FieldType::Map(element), Value::Map(entries)) => {
            for (entry_key, entry) in entries {
                emit(
                    &format!("{key}[{entry_key}]"),
                    true,
                    element,
                    entry,
                    shape,
                    field,
                    pairs,
                )?;
            }
            Ok(())
        }
        (FieldType::Seq(element), Value::Seq(items)) => {
            for (index, item) in items.iter().enumerate() {
                if indexed {
                    emit(&format!("{key}[{index}]"), true, element, item, shape, field, pairs)?;
                } else {
                    emit(key, false, element, item, shape, field, pairs)?;
                }
            }
            Ok(())
        }
        (FieldType::Enum(allowed), Value::String(text)) => {
            if allowed.iter().any(|candidate| candidate == text) {
                pairs.push(format!("{key}={}", encode_component(text)));
                Ok(())
            } else {
                Err(Error::encoding(
                    shape,
                    field,
                    format!("`{text}` is not one of the allowed values"),
                ))
            }
        }
        (_, value) => {
            let text = value
                .render()
                .map_err(|reason| Error::encoding(shape, field, reason))?;
            pairs.push(format!("{key}={}", encode_component(&text)));
            Ok(())
        }
    }
}
