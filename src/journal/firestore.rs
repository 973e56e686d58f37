//! Cloud Firestore document store
//!
//! Talks to the Firestore REST API (v1). Works against both the hosted
//! service (with an OAuth access token) and the local emulator (no token).
//!
//! Documents are plain JSON objects on our side and Firestore typed values
//! on the wire, see [`encode_value`] and [`decode_value`].

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde_json::{json, Map, Number, Value};

use super::store::{Document, DocumentStore, QueryOptions, SortDirection, StoreError, StoreResult};

/// Configuration for the Firestore client
#[derive(Debug, Clone)]
pub struct FirestoreConfig {
    /// API root (e.g., "https://firestore.googleapis.com" or "http://localhost:8080")
    pub base_url: String,
    /// Google Cloud project id
    pub project_id: String,
    /// Database id within the project
    pub database: String,
    /// OAuth bearer token; not needed for the emulator
    pub access_token: Option<String>,
    /// Request timeout in milliseconds
    pub request_timeout_ms: u64,
}

impl Default for FirestoreConfig {
    fn default() -> Self {
        Self {
            base_url: "https://firestore.googleapis.com".to_string(),
            project_id: String::new(),
            database: "(default)".to_string(),
            access_token: None,
            request_timeout_ms: 10_000,
        }
    }
}

/// Firestore REST client implementing [`DocumentStore`]
pub struct FirestoreStore {
    client: Client,
    config: FirestoreConfig,
}

impl FirestoreStore {
    /// Create a new Firestore store with the given configuration
    pub fn new(config: FirestoreConfig) -> StoreResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_millis(config.request_timeout_ms))
            .build()?;

        Ok(Self { client, config })
    }

    /// Get the current configuration
    pub fn config(&self) -> &FirestoreConfig {
        &self.config
    }

    /// Root of the documents tree for this project/database
    fn documents_url(&self) -> String {
        format!(
            "{}/v1/projects/{}/databases/{}/documents",
            self.config.base_url.trim_end_matches('/'),
            self.config.project_id,
            self.config.database
        )
    }

    fn document_url(&self, collection: &str, id: &str) -> String {
        format!("{}/{}/{}", self.documents_url(), collection, id)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.config.access_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

#[async_trait]
impl DocumentStore for FirestoreStore {
    fn name(&self) -> &str {
        "firestore"
    }

    async fn get(&self, collection: &str, id: &str) -> StoreResult<Option<Document>> {
        let url = self.document_url(collection, id);
        let response = self.authorize(self.client.get(&url)).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = ensure_success(response).await?;
        let body: Value = response.json().await?;

        decode_document(&body).map(Some)
    }

    async fn set(&self, collection: &str, id: &str, document: Document) -> StoreResult<()> {
        let url = self.document_url(collection, id);
        let response = self
            .authorize(self.client.patch(&url))
            .json(&encode_document(&document))
            .send()
            .await?;

        ensure_success(response).await?;
        Ok(())
    }

    async fn update(&self, collection: &str, id: &str, document: Document) -> StoreResult<()> {
        let url = self.document_url(collection, id);

        let mut params: Vec<(&str, &str)> = document
            .keys()
            .map(|field| ("updateMask.fieldPaths", field.as_str()))
            .collect();
        params.push(("currentDocument.exists", "true"));

        let response = self
            .authorize(self.client.patch(&url))
            .query(&params)
            .json(&encode_document(&document))
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(StoreError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            });
        }
        ensure_success(response).await?;
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> StoreResult<()> {
        let url = self.document_url(collection, id);
        let response = self.authorize(self.client.delete(&url)).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(());
        }
        ensure_success(response).await?;
        Ok(())
    }

    async fn query(&self, collection: &str, options: &QueryOptions) -> StoreResult<Vec<Document>> {
        let url = format!("{}:runQuery", self.documents_url());
        let response = self
            .authorize(self.client.post(&url))
            .json(&structured_query(collection, options))
            .send()
            .await?;

        let response = ensure_success(response).await?;
        let body: Value = response.json().await?;

        decode_query_response(&body)
    }
}

/// Turn a non-success response into [`StoreError::Api`]
async fn ensure_success(response: Response) -> StoreResult<Response> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status();
    let message = response.text().await.unwrap_or_default();
    tracing::warn!(status = status.as_u16(), "Firestore request failed");

    Err(StoreError::Api {
        status: status.as_u16(),
        message,
    })
}

// ============================================
// Wire encoding
// ============================================

/// Build a `runQuery` request body
fn structured_query(collection: &str, options: &QueryOptions) -> Value {
    let direction = match options.direction {
        SortDirection::Ascending => "ASCENDING",
        SortDirection::Descending => "DESCENDING",
    };

    json!({
        "structuredQuery": {
            "from": [{ "collectionId": collection }],
            "orderBy": [{
                "field": { "fieldPath": options.order_by },
                "direction": direction,
            }],
            "offset": options.offset,
            "limit": options.limit,
        }
    })
}

/// Encode a JSON document as a Firestore document body
pub fn encode_document(document: &Document) -> Value {
    let fields: Map<String, Value> = document
        .iter()
        .map(|(key, value)| (key.clone(), encode_value(value)))
        .collect();

    json!({ "fields": fields })
}

/// Encode a JSON value as a Firestore typed value
pub fn encode_value(value: &Value) -> Value {
    match value {
        Value::Null => json!({ "nullValue": null }),
        Value::Bool(b) => json!({ "booleanValue": b }),
        Value::Number(n) => match n.as_i64() {
            // Firestore carries 64-bit integers as strings
            Some(i) => json!({ "integerValue": i.to_string() }),
            None => json!({ "doubleValue": n.as_f64().unwrap_or(0.0) }),
        },
        Value::String(s) => json!({ "stringValue": s }),
        Value::Array(items) => {
            let values: Vec<Value> = items.iter().map(encode_value).collect();
            json!({ "arrayValue": { "values": values } })
        }
        Value::Object(map) => {
            let fields: Map<String, Value> = map
                .iter()
                .map(|(key, value)| (key.clone(), encode_value(value)))
                .collect();
            json!({ "mapValue": { "fields": fields } })
        }
    }
}

/// Decode a Firestore document body into a JSON document
pub fn decode_document(body: &Value) -> StoreResult<Document> {
    let Some(fields) = body.get("fields") else {
        return Ok(Document::new());
    };
    decode_fields(fields)
}

fn decode_fields(fields: &Value) -> StoreResult<Document> {
    let fields = fields
        .as_object()
        .ok_or_else(|| StoreError::Decode("fields is not an object".to_string()))?;

    fields
        .iter()
        .map(|(key, value)| -> StoreResult<(String, Value)> {
            Ok((key.clone(), decode_value(value)?))
        })
        .collect()
}

/// Decode a Firestore typed value into JSON
pub fn decode_value(value: &Value) -> StoreResult<Value> {
    let (kind, inner) = value
        .as_object()
        .and_then(|map| map.iter().next())
        .ok_or_else(|| StoreError::Decode(format!("invalid typed value: {}", value)))?;

    match (kind.as_str(), inner) {
        ("nullValue", _) => Ok(Value::Null),
        ("booleanValue", Value::Bool(b)) => Ok(Value::Bool(*b)),
        ("integerValue", Value::String(s)) => s
            .parse::<i64>()
            .map(Value::from)
            .map_err(|e| StoreError::Decode(format!("invalid integerValue {}: {}", s, e))),
        ("integerValue", Value::Number(n)) => Ok(Value::Number(n.clone())),
        ("doubleValue", Value::Number(n)) => Ok(Value::Number(n.clone())),
        ("doubleValue", Value::String(s)) => s
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .ok_or_else(|| StoreError::Decode(format!("invalid doubleValue {}", s))),
        ("stringValue", Value::String(s))
        | ("timestampValue", Value::String(s))
        | ("referenceValue", Value::String(s))
        | ("bytesValue", Value::String(s)) => Ok(Value::String(s.clone())),
        ("geoPointValue", point) => Ok(point.clone()),
        ("arrayValue", array) => {
            let values = match array.get("values") {
                Some(Value::Array(values)) => values
                    .iter()
                    .map(decode_value)
                    .collect::<StoreResult<Vec<_>>>()?,
                _ => Vec::new(),
            };
            Ok(Value::Array(values))
        }
        ("mapValue", map) => match map.get("fields") {
            Some(fields) => decode_fields(fields).map(Value::Object),
            None => Ok(Value::Object(Map::new())),
        },
        (kind, _) => Err(StoreError::Decode(format!("unsupported value type: {}", kind))),
    }
}

/// Decode a `runQuery` response: a JSON array whose items may carry a document
fn decode_query_response(body: &Value) -> StoreResult<Vec<Document>> {
    let items = body
        .as_array()
        .ok_or_else(|| StoreError::Decode("runQuery response is not an array".to_string()))?;

    items
        .iter()
        .filter_map(|item| item.get("document"))
        .map(decode_document)
        .collect()
}
