#![forbid(unsafe_code)]

//! Value model and wire codecs for the OpenZiti Edge Client API.
//!
//! Resource shapes are described by a [`Schema`] (ordered fields with wire
//! names and required/optional status) and instantiated as [`Resource`]
//! values. Two codecs map a resource to and from its wire forms: a JSON
//! body codec ([`to_json`]/[`from_json`]) and a URL query-string codec
//! ([`to_query_string`]/[`to_query_string_with_prefix`], form and
//! deepObject styles). Typed structs for common Edge API shapes, such as
//! [`AuthenticatorDetail`] and [`SessionDetail`], sit alongside the
//! generic layer and expose matching schemas.
//!
//! HTTP transport, TLS, and retry policy are deliberately out of scope;
//! pair this crate with an HTTP client that moves the bytes.

mod error;
mod json;
mod models;
mod options;
mod query;
mod resource;
mod schema;
mod value;

pub use error::Error;
pub use json::{from_json, from_json_str, to_json, to_json_string, MissingFieldPolicy, ParseOptions};
pub use models::{
    ApiSessionDetail, ApiVersion, AuthenticatorDetail, DialBind, EdgeRouterDetail, EntityRef,
    IdentityExtendValidateEnrollmentRequest, Link, ServiceDetail, SessionDetail, SessionEdgeRouter,
    Tags, Version,
};
pub use options::ListOptions;
pub use query::{to_query_string, to_query_string_with_prefix};
pub use resource::Resource;
pub use schema::{Field, FieldType, Schema, SchemaBuilder};
pub use value::Value;
