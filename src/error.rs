use thiserror::Error;

/// Errors surfaced by the value model and wire codecs.
///
/// Every variant names the resource shape (and where possible the field)
/// that produced it, so a failed encode or decode can be traced back to
/// the offending payload without replaying the request.
#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot encode field `{field}` of `{shape}`: {reason}")]
    Encoding {
        shape: String,
        field: String,
        reason: String,
    },
    #[error("payload for `{shape}` is missing required field `{field}`")]
    MissingRequiredField { shape: String, field: String },
    #[error("malformed payload for `{shape}`: {reason}")]
    MalformedPayload { shape: String, reason: String },
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn encoding(
        shape: impl Into<String>,
        field: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Error::Encoding {
            shape: shape.into(),
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn malformed(shape: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::MalformedPayload {
            shape: shape.into(),
            reason: reason.into(),
        }
    }
}
