use super::common::{EntityRef, Link, Tags};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use time::OffsetDateTime;

/// Controller version report, returned without authentication.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Version {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub api_versions: BTreeMap<String, BTreeMap<String, ApiVersion>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiVersion {
    pub path: String,
}

/// The API session created by a successful authentication.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiSessionDetail {
    #[serde(rename = "_links", default)]
    pub links: BTreeMap<String, Link>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Tags>,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    pub token: String,
    pub identity: EntityRef,
    pub identity_id: String,
    #[serde(with = "time::serde::rfc3339")]
    pub expires_at: OffsetDateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_seconds: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_mfa_required: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_mfa_complete: Option<bool>,
}

/// Whether a service permission or session is for dialing or binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum DialBind {
    Dial,
    Bind,
}

/// A service visible to the authenticated identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceDetail {
    #[serde(rename = "_links", default)]
    pub links: BTreeMap<String, Link>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Tags>,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    pub name: String,
    pub encryption_required: bool,
    #[serde(default)]
    pub permissions: Vec<DialBind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terminator_strategy: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_idle_time_millis: Option<i64>,
}

/// A network session for one service, carrying the edge routers that can
/// service it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionDetail {
    #[serde(rename = "_links", default)]
    pub links: BTreeMap<String, Link>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Tags>,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    #[serde(rename = "type")]
    pub session_type: DialBind,
    pub service: EntityRef,
    pub service_id: String,
    #[serde(default)]
    pub edge_routers: Vec<SessionEdgeRouter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionEdgeRouter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    #[serde(default)]
    pub supported_protocols: BTreeMap<String, String>,
    #[serde(default)]
    pub urls: BTreeMap<String, String>,
}

/// An edge router as listed for the current identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeRouterDetail {
    #[serde(rename = "_links", default)]
    pub links: BTreeMap<String, Link>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Tags>,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    pub name: String,
    pub is_online: bool,
    #[serde(default)]
    pub supported_protocols: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_verified: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_tunneler_enabled: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn version_parses_a_controller_report() {
        let payload = r#"{
            "buildDate": "2024-09-04 10:11:22",
            "revision": "abcdef",
            "runtimeVersion": "go1.22.5",
            "version": "v1.1.9",
            "apiVersions": {
                "edge-client": {"v1": {"path": "/edge/client/v1"}}
            }
        }"#;
        let version: Version = serde_json::from_str(payload).expect("deserialize");
        assert!(version
            .runtime_version
            .as_deref()
            .map(|v| v.starts_with("go1."))
            .unwrap_or(false));
        let path = &version.api_versions["edge-client"]["v1"].path;
        assert_eq!(path, "/edge/client/v1");
    }

    #[test]
    fn dial_bind_uses_pascal_case_on_the_wire() {
        assert_eq!(
            serde_json::to_string(&vec![DialBind::Dial, DialBind::Bind]).expect("serialize"),
            r#"["Dial","Bind"]"#
        );
    }

    #[test]
    fn session_detail_round_trips_with_renamed_type_key() {
        let session = SessionDetail {
            links: BTreeMap::new(),
            created_at: datetime!(2024-09-04 10:11:22 UTC),
            id: "sess1".to_string(),
            tags: None,
            updated_at: datetime!(2024-09-04 10:11:22 UTC),
            session_type: DialBind::Dial,
            service: EntityRef::new("services", "svc1", "ssh"),
            service_id: "svc1".to_string(),
            edge_routers: vec![SessionEdgeRouter {
                name: Some("er1".to_string()),
                ..SessionEdgeRouter::default()
            }],
            token: Some("tok".to_string()),
        };
        let text = serde_json::to_string(&session).expect("serialize");
        assert!(text.contains(r#""type":"Dial""#));
        let back: SessionDetail = serde_json::from_str(&text).expect("deserialize");
        assert_eq!(back, session);
    }

    #[test]
    fn service_detail_keeps_required_booleans_present() {
        let service = ServiceDetail {
            links: BTreeMap::new(),
            created_at: datetime!(2024-09-04 10:11:22 UTC),
            id: "svc1".to_string(),
            tags: None,
            updated_at: datetime!(2024-09-04 10:11:22 UTC),
            name: "ssh".to_string(),
            encryption_required: false,
            permissions: vec![DialBind::Dial],
            terminator_strategy: None,
            max_idle_time_millis: None,
        };
        let json = serde_json::to_value(&service).expect("serialize");
        let object = json.as_object().expect("object");
        assert_eq!(object.get("encryptionRequired"), Some(&serde_json::json!(false)));
        assert_eq!(object.get("permissions"), Some(&serde_json::json!(["Dial"])));
    }
}
