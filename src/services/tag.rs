use std::sync::Arc;

use futures::future::try_join_all;

use crate::base::{ApiResponse, Transport};
use crate::models::{Tag, TagForm, TagId, TagPatch};
use crate::services::resource::ResourceClient;

#[derive(Clone)]
pub struct TagService {
    tags: ResourceClient<Tag>,
}

impl TagService {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            tags: ResourceClient::new(transport, "tags"),
        }
    }

    pub async fn get_tags(&self) -> ApiResponse<Vec<Tag>> {
        let result = self.tags.list(&[]).await;
        ApiResponse::from_result(result, "tags loaded", "Failed to load tags")
    }

    pub async fn create_tag(&self, form: &TagForm) -> ApiResponse<Tag> {
        let result = self.tags.create(form).await;
        ApiResponse::from_result_with_code(201, result, "tag created", "Failed to create tag")
    }

    pub async fn update_tag(&self, id: &TagId, patch: &TagPatch) -> ApiResponse<TagPatch> {
        let result = self.tags.update(id, patch).await;
        ApiResponse::from_result(result, "tag updated", &format!("Failed to update tag {}", id))
    }

    pub async fn delete_tag(&self, id: &TagId) -> ApiResponse<()> {
        let result = self.tags.delete(id).await;
        ApiResponse::from_result(result, "tag deleted", &format!("Failed to delete tag {}", id))
    }

    pub async fn batch_delete_tags(&self, ids: &[TagId]) -> ApiResponse<()> {
        let result = try_join_all(ids.iter().map(|id| self.tags.delete(id)))
            .await
            .map(|_| ());
        ApiResponse::from_result(result, &format!("deleted {} tags", ids.len()), "Failed to batch delete tags")
    }
}
