//! Firestore REST payloads.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::entities::{SpiceFields, SpiceId};
use crate::domain::errors::StoreError;
use crate::domain::ports::Document;

/// A typed Firestore value. Only the kinds a spice uses are mapped; other
/// kinds deserialize to an empty value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FirestoreValue {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub string_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boolean_value: Option<bool>,
}

impl FirestoreValue {
    fn from_json(value: serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::String(s) => Some(Self {
                string_value: Some(s),
                ..Self::default()
            }),
            serde_json::Value::Bool(b) => Some(Self {
                boolean_value: Some(b),
                ..Self::default()
            }),
            _ => None,
        }
    }

    fn into_json(self) -> Option<serde_json::Value> {
        self.string_value
            .map(serde_json::Value::String)
            .or_else(|| self.boolean_value.map(serde_json::Value::Bool))
    }
}

/// Document body as sent on create and replace.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WriteBody {
    pub fields: BTreeMap<String, FirestoreValue>,
}

impl WriteBody {
    /// Encodes every spice field; nothing is omitted, so a replace
    /// overwrites the whole document.
    ///
    /// # Errors
    /// Returns `StoreError` if the fields cannot be encoded.
    pub fn from_fields(fields: &SpiceFields) -> Result<Self, StoreError> {
        let serde_json::Value::Object(map) = serde_json::to_value(fields)
            .map_err(|e| StoreError::unexpected(format!("failed to encode fields: {e}")))?
        else {
            return Err(StoreError::unexpected("spice fields did not encode to an object"));
        };

        let fields = map
            .into_iter()
            .filter_map(|(key, value)| FirestoreValue::from_json(value).map(|v| (key, v)))
            .collect();

        Ok(Self { fields })
    }
}

/// Document as returned by the REST API.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FirestoreDocument {
    /// Full resource name, ending in `/{collection}/{id}`.
    pub name: String,
    #[serde(default)]
    pub fields: BTreeMap<String, FirestoreValue>,
}

impl FirestoreDocument {
    /// Last path segment of the resource name.
    #[must_use]
    pub fn id(&self) -> Option<SpiceId> {
        self.name.rsplit('/').next().and_then(SpiceId::new)
    }

    /// Decodes into a snapshot document. Missing fields take their defaults.
    ///
    /// # Errors
    /// Returns `StoreError` if the name has no id or a field has the wrong type.
    pub fn into_document(self) -> Result<Document, StoreError> {
        let id = self
            .id()
            .ok_or_else(|| StoreError::malformed(format!("document without id: {}", self.name)))?;

        let map: serde_json::Map<String, serde_json::Value> = self
            .fields
            .into_iter()
            .filter_map(|(key, value)| value.into_json().map(|v| (key, v)))
            .collect();

        let fields: SpiceFields = serde_json::from_value(serde_json::Value::Object(map))
            .map_err(|e| StoreError::malformed(format!("document {id}: {e}")))?;

        Ok(Document::new(id, fields))
    }
}

/// One page of a collection listing.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListDocumentsResponse {
    #[serde(default)]
    pub documents: Vec<FirestoreDocument>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

/// Error envelope returned on non-2xx responses.
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: String,
}
