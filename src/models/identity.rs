use super::common::{EntityRef, Link, Tags};
use crate::schema::{FieldType, Schema};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use time::OffsetDateTime;

/// A singular authenticator resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticatorDetail {
    #[serde(rename = "_links", default)]
    pub links: BTreeMap<String, Link>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Tags>,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cert_pem: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<String>,
    pub identity: EntityRef,
    pub identity_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_issued_by_network: Option<bool>,
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

impl AuthenticatorDetail {
    /// Generic schema for this shape. `tags` is modeled as a string-valued
    /// map here; the typed struct carries any scalar via [`Tags`].
    pub fn schema() -> Arc<Schema> {
        Schema::builder("authenticatorDetail")
            .required_wire(
                "links",
                "_links",
                FieldType::Map(Box::new(FieldType::Object(Link::schema()))),
            )
            .required("createdAt", FieldType::Timestamp)
            .required("id", FieldType::String)
            .optional("tags", FieldType::Map(Box::new(FieldType::String)))
            .required("updatedAt", FieldType::Timestamp)
            .optional("certPem", FieldType::String)
            .optional("fingerprint", FieldType::String)
            .required("identity", FieldType::Object(EntityRef::schema()))
            .required("identityId", FieldType::String)
            .optional("isIssuedByNetwork", FieldType::Bool)
            .required(
                "method",
                FieldType::Enum(vec!["cert".to_string(), "updb".to_string()]),
            )
            .optional("username", FieldType::String)
            .build()
    }
}

/// Request body for validating an extended enrollment: the PEM encoded
/// client certificate previously returned after an extension request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityExtendValidateEnrollmentRequest {
    pub client_cert: String,
}

impl IdentityExtendValidateEnrollmentRequest {
    pub fn new(client_cert: impl Into<String>) -> Self {
        IdentityExtendValidateEnrollmentRequest {
            client_cert: client_cert.into(),
        }
    }

    pub fn schema() -> Arc<Schema> {
        Schema::builder("identityExtendValidateEnrollmentRequest")
            .required("clientCert", FieldType::String)
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use time::macros::datetime;

    fn sample_detail() -> AuthenticatorDetail {
        AuthenticatorDetail {
            links: BTreeMap::new(),
            created_at: datetime!(2024-09-04 10:11:22 UTC),
            id: "auth1".to_string(),
            tags: None,
            updated_at: datetime!(2024-09-04 10:11:22 UTC),
            cert_pem: None,
            fingerprint: None,
            identity: EntityRef::new("identities", "id1", "laptop"),
            identity_id: "id1".to_string(),
            is_issued_by_network: None,
            method: "cert".to_string(),
            username: None,
        }
    }

    #[test]
    fn detail_omits_unset_optionals_and_keeps_required_keys() {
        let json = serde_json::to_value(sample_detail()).expect("serialize");
        let object = json.as_object().expect("object");
        assert!(object.contains_key("_links"));
        assert!(object.contains_key("createdAt"));
        assert!(object.contains_key("identityId"));
        assert!(!object.contains_key("certPem"));
        assert!(!object.contains_key("isIssuedByNetwork"));
        assert_eq!(object.get("method"), Some(&json!("cert")));
    }

    #[test]
    fn detail_round_trips_through_json() {
        let detail = sample_detail();
        let text = serde_json::to_string(&detail).expect("serialize");
        let back: AuthenticatorDetail = serde_json::from_str(&text).expect("deserialize");
        assert_eq!(back, detail);
    }

    #[test]
    fn enrollment_request_wire_form() {
        let request = IdentityExtendValidateEnrollmentRequest::new("ABC+DEF");
        assert_eq!(
            serde_json::to_string(&request).expect("serialize"),
            r#"{"clientCert":"ABC+DEF"}"#
        );
    }

    #[test]
    fn boolean_tags_parse_typed_but_not_through_the_generic_schema() {
        let payload = r#"{"tags":{"critical":true}}"#;

        #[derive(serde::Deserialize)]
        struct TagsOnly {
            tags: Tags,
        }
        let typed: TagsOnly = serde_json::from_str(payload).expect("typed");
        assert_eq!(typed.tags.0["critical"], json!(true));

        let options = crate::json::ParseOptions {
            missing_required: crate::json::MissingFieldPolicy::Default,
        };
        let err = crate::json::from_json_str(&AuthenticatorDetail::schema(), payload, &options)
            .expect_err("generic tags are string-valued");
        let text = err.to_string();
        assert!(text.contains("`tags`"));
        assert!(text.contains("expects string"));
    }

    #[test]
    fn typed_and_generic_schemas_agree_on_wire_names() {
        let schema = AuthenticatorDetail::schema();
        let json = serde_json::to_value(sample_detail()).expect("serialize");
        let object = json.as_object().expect("object");
        for field in schema.fields().iter().filter(|field| field.required()) {
            assert!(
                object.contains_key(field.wire_name()),
                "missing required key {}",
                field.wire_name()
            );
        }
    }
}
