use crate::schema::{FieldType, Schema};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// A single HAL-style link as returned under `_links`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    pub href: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
}

impl Link {
    pub fn new(href: impl Into<String>) -> Self {
        Link {
            href: href.into(),
            comment: None,
            method: None,
        }
    }

    /// Generic schema for this shape, for use with the wire codecs.
    pub fn schema() -> Arc<Schema> {
        Schema::builder("link")
            .required("href", FieldType::String)
            .optional("comment", FieldType::String)
            .optional("method", FieldType::String)
            .build()
    }
}

/// Free-form tags attached to an entity. Values are JSON scalars
/// (string, boolean, number, or null).
///
/// The generic schemas model tags as string-valued maps; payloads using
/// boolean or numeric tags go through this typed struct instead.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tags(pub BTreeMap<String, serde_json::Value>);

impl Tags {
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) {
        self.0.insert(key.into(), value.into());
    }
}

/// A reference to another resource: its id and name plus navigation links.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityRef {
    #[serde(rename = "_links", default)]
    pub links: BTreeMap<String, Link>,
    pub entity: String,
    pub id: String,
    pub name: String,
}

impl EntityRef {
    pub fn new(entity: impl Into<String>, id: impl Into<String>, name: impl Into<String>) -> Self {
        EntityRef {
            links: BTreeMap::new(),
            entity: entity.into(),
            id: id.into(),
            name: name.into(),
        }
    }

    pub fn schema() -> Arc<Schema> {
        Schema::builder("entityRef")
            .required_wire(
                "links",
                "_links",
                FieldType::Map(Box::new(FieldType::Object(Link::schema()))),
            )
            .required("entity", FieldType::String)
            .required("id", FieldType::String)
            .required("name", FieldType::String)
            .build()
    }
}
