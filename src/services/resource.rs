use std::fmt::Display;
use std::marker::PhantomData;
use std::sync::Arc;

use log::warn;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::base::{ApiRequest, ApiResult, Method, Transport};

/// Typed access to one REST collection such as `/articles`.
///
/// Every method issues exactly one request through the transport.
pub struct ResourceClient<T> {
    transport: Arc<dyn Transport>,
    collection: &'static str,
    _record: PhantomData<fn() -> T>,
}

impl<T> Clone for ResourceClient<T> {
    fn clone(&self) -> Self {
        Self {
            transport: self.transport.clone(),
            collection: self.collection,
            _record: PhantomData,
        }
    }
}

impl<T: DeserializeOwned> ResourceClient<T> {
    pub fn new(transport: Arc<dyn Transport>, collection: &'static str) -> Self {
        Self {
            transport,
            collection,
            _record: PhantomData,
        }
    }

    pub fn collection_path(&self) -> String {
        format!("/{}", self.collection)
    }

    pub fn item_path(&self, id: impl Display) -> String {
        format!("/{}/{}", self.collection, id)
    }

    /// `GET /{collection}` with optional query pairs passed through verbatim.
    ///
    /// Records that do not decode are skipped with a warning instead of
    /// failing the whole list.
    pub async fn list(&self, query: &[(&str, &str)]) -> ApiResult<Vec<T>> {
        let request = query
            .iter()
            .fold(ApiRequest::get(self.collection_path()), |request, (key, value)| {
                request.with_query(*key, *value)
            });
        let records: Vec<Value> = serde_json::from_value(self.transport.send(request).await?)?;
        let total = records.len();

        let decoded: Vec<T> = records
            .into_iter()
            .filter_map(|record| match serde_json::from_value(record) {
                Ok(item) => Some(item),
                Err(err) => {
                    warn!("Skipping malformed record in /{}: {}", self.collection, err);
                    None
                }
            })
            .collect();

        if decoded.len() < total {
            warn!("/{}: {} of {} records skipped", self.collection, total - decoded.len(), total);
        }
        Ok(decoded)
    }

    pub async fn get(&self, id: impl Display) -> ApiResult<T> {
        let value = self.transport.send(ApiRequest::get(self.item_path(id))).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// `POST /{collection}`; returns the record as stored by the server
    pub async fn create<B: Serialize + ?Sized>(&self, body: &B) -> ApiResult<T> {
        let request = ApiRequest::new(Method::Post, self.collection_path())
            .with_body(serde_json::to_value(body)?);
        let value = self.transport.send(request).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// `PATCH /{collection}/{id}`; the echo is decoded as `R`, typically a
    /// partial record
    pub async fn update<B, R>(&self, id: impl Display, body: &B) -> ApiResult<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.send_with_body(Method::Patch, id, body).await
    }

    /// `PUT /{collection}/{id}`, replacing the whole record
    pub async fn replace<B: Serialize + ?Sized>(&self, id: impl Display, body: &B) -> ApiResult<T> {
        self.send_with_body(Method::Put, id, body).await
    }

    pub async fn delete(&self, id: impl Display) -> ApiResult<()> {
        self.transport.send(ApiRequest::delete(self.item_path(id))).await?;
        Ok(())
    }

    async fn send_with_body<B, R>(&self, method: Method, id: impl Display, body: &B) -> ApiResult<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let request = ApiRequest::new(method, self.item_path(id)).with_body(serde_json::to_value(body)?);
        let value: Value = self.transport.send(request).await?;
        Ok(serde_json::from_value(value)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::ApiError;
    use crate::data::MemoryTransport;
    use crate::models::{Tag, TagPatch};
    use serde_json::json;

    fn client() -> ResourceClient<Tag> {
        let transport = MemoryTransport::new().with_collection(
            "tags",
            vec![
                json!({ "id": "1", "name": "rust", "color": "#f00" }),
                json!({ "id": "2", "name": "go", "color": "#0f0" }),
            ],
        );
        ResourceClient::new(Arc::new(transport), "tags")
    }

    #[tokio::test]
    async fn test_list_and_get() {
        let client = client();
        assert_eq!(client.list(&[]).await.unwrap().len(), 2);
        assert_eq!(client.get("2").await.unwrap().name, "go");
    }

    #[tokio::test]
    async fn test_create_update_delete() {
        let client = client();

        let created = client.create(&json!({ "name": "zig", "color": "#00f" })).await.unwrap();
        assert!(!created.id.0.is_empty());

        let echo: TagPatch = client.update(&created.id, &TagPatch::default().name("Zig")).await.unwrap();
        assert_eq!(echo.name.as_deref(), Some("Zig"));

        client.delete(&created.id).await.unwrap();
        assert!(matches!(client.get(&created.id).await, Err(ApiError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_replace() {
        let client = client();
        let replaced = client.replace("1", &json!({ "name": "Rust", "color": "#fff" })).await.unwrap();
        assert_eq!(replaced.id.0, "1");
        assert_eq!(replaced.color, "#fff");
    }

    #[tokio::test]
    async fn test_list_skips_undecodable_records() {
        let transport = MemoryTransport::new().with_collection(
            "tags",
            vec![
                json!({ "id": 3, "name": "rust", "color": null }),
                json!({ "id": ["broken"], "name": "go" }),
                json!({ "id": "4", "name": "zig", "color": "#00f" }),
            ],
        );
        let client: ResourceClient<Tag> = ResourceClient::new(Arc::new(transport), "tags");

        let tags = client.list(&[]).await.unwrap();
        assert_eq!(tags.len(), 2);
        assert_eq!(tags[0].id.0, "3");
        assert_eq!(tags[0].color, "");
        assert_eq!(tags[1].name, "zig");
    }

    #[test]
    fn test_paths() {
        let client = client();
        assert_eq!(client.collection_path(), "/tags");
        assert_eq!(client.item_path("abc"), "/tags/abc");
    }
}
