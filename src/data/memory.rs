use std::cmp::Ordering;
use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use serde_json::{Map, Value};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::base::{ApiError, ApiRequest, ApiResult, Method, Transport};

/// In-memory backend with json-server semantics.
///
/// Collections are addressed as `/{collection}` and `/{collection}/{id}`.
/// POST assigns an id and stamps `createdAt`/`updatedAt`, PATCH merges and
/// PUT replaces (both refresh `updatedAt`), unknown ids answer 404 and
/// `_sort`/`_order` are honored on collection reads.
#[derive(Debug, Default)]
pub struct MemoryTransport {
    collections: Mutex<HashMap<String, Vec<Value>>>,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a collection verbatim, without id assignment or timestamps
    pub fn with_collection(self, name: &str, records: Vec<Value>) -> Self {
        let mut collections = self.collections.into_inner();
        collections.insert(name.to_string(), records);
        Self {
            collections: Mutex::new(collections),
        }
    }

    /// Current contents of a collection
    pub async fn records(&self, name: &str) -> Vec<Value> {
        self.collections
            .lock()
            .await
            .get(name)
            .cloned()
            .unwrap_or_default()
    }

    async fn handle(&self, request: ApiRequest) -> ApiResult<Value> {
        let segments: Vec<&str> = request
            .path
            .split('/')
            .filter(|segment| !segment.is_empty())
            .collect();

        let mut collections = self.collections.lock().await;
        match (request.method, segments.as_slice()) {
            (Method::Get, [name]) => {
                let mut records = collections.get(*name).cloned().unwrap_or_default();
                sort_records(&mut records, &request.query);
                Ok(Value::Array(records))
            }
            (Method::Get, [name, id]) => collections
                .get(*name)
                .and_then(|records| records.iter().find(|record| has_id(record, id)))
                .cloned()
                .ok_or_else(|| ApiError::NotFound(request.path.clone())),
            (Method::Post, [name]) => {
                let mut record = object_body(request.body)?;
                let now = timestamp();
                record
                    .entry("id")
                    .or_insert_with(|| Value::String(Uuid::new_v4().to_string()));
                record.insert("createdAt".to_string(), Value::String(now.clone()));
                record.insert("updatedAt".to_string(), Value::String(now));

                let record = Value::Object(record);
                collections
                    .entry(name.to_string())
                    .or_default()
                    .push(record.clone());
                Ok(record)
            }
            (Method::Patch | Method::Put, [name, id]) => {
                let changes = object_body(request.body)?;
                let record = collections
                    .get_mut(*name)
                    .and_then(|records| records.iter_mut().find(|record| has_id(record, id)))
                    .ok_or_else(|| ApiError::NotFound(request.path.clone()))?;

                let Value::Object(fields) = &mut *record else {
                    return Err(ApiError::Remote(format!("record {} is not an object", request.path)));
                };
                let original_id = fields.get("id").cloned();
                let created_at = fields.get("createdAt").cloned();
                if request.method == Method::Put {
                    fields.clear();
                    if let Some(created_at) = created_at {
                        fields.insert("createdAt".to_string(), created_at);
                    }
                }
                fields.extend(changes);
                if let Some(original_id) = original_id {
                    fields.insert("id".to_string(), original_id);
                }
                fields.insert("updatedAt".to_string(), Value::String(timestamp()));
                Ok(record.clone())
            }
            (Method::Delete, [name, id]) => {
                let records = collections
                    .get_mut(*name)
                    .ok_or_else(|| ApiError::NotFound(request.path.clone()))?;
                let before = records.len();
                records.retain(|record| !has_id(record, id));
                if records.len() == before {
                    return Err(ApiError::NotFound(request.path.clone()));
                }
                Ok(Value::Object(Map::new()))
            }
            _ => Err(ApiError::Status {
                status: 405,
                message: format!("{} {} is not supported", request.method, request.path),
            }),
        }
    }
}

#[async_trait]
impl Transport for MemoryTransport {
    async fn send(&self, request: ApiRequest) -> ApiResult<Value> {
        log::debug!("memory {} {}", request.method, request.path);
        self.handle(request).await
    }
}

fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn object_body(body: Option<Value>) -> ApiResult<Map<String, Value>> {
    match body {
        Some(Value::Object(map)) => Ok(map),
        other => Err(ApiError::Status {
            status: 400,
            message: format!("expected a JSON object body, got {:?}", other),
        }),
    }
}

/// Ids may be stored as strings or numbers
fn has_id(record: &Value, id: &str) -> bool {
    match record.get("id") {
        Some(Value::String(s)) => s == id,
        Some(Value::Number(n)) => n.to_string() == id,
        _ => false,
    }
}

fn sort_records(records: &mut [Value], query: &[(String, String)]) {
    let lookup = |key: &str| query.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str());
    let Some(field) = lookup("_sort") else {
        return;
    };
    let descending = lookup("_order").is_some_and(|order| order.eq_ignore_ascii_case("desc"));

    records.sort_by(|a, b| {
        let ordering = compare_values(a.get(field), b.get(field));
        if descending {
            ordering.reverse()
        } else {
            ordering
        }
    });
}

fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        _ => Ordering::Equal,
    }
}
