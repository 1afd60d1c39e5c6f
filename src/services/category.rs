use std::sync::Arc;

use futures::future::try_join_all;

use crate::base::{ApiResponse, Transport};
use crate::models::category::NewCategory;
use crate::models::{Category, CategoryForm, CategoryId, CategoryPatch};
use crate::services::resource::ResourceClient;

#[derive(Clone)]
pub struct CategoryService {
    categories: ResourceClient<Category>,
}

impl CategoryService {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            categories: ResourceClient::new(transport, "categories"),
        }
    }

    pub async fn get_categories(&self) -> ApiResponse<Vec<Category>> {
        let result = self.categories.list(&[]).await;
        ApiResponse::from_result(result, "categories loaded", "Failed to load categories")
    }

    pub async fn get_category_by_id(&self, id: &CategoryId) -> ApiResponse<Category> {
        let result = self.categories.get(id).await;
        ApiResponse::from_result(result, "category loaded", &format!("Failed to load category {}", id))
    }

    /// New categories start with an article count of zero
    pub async fn create_category(&self, form: &CategoryForm) -> ApiResponse<Category> {
        let result = self.categories.create(&NewCategory { form, count: 0 }).await;
        ApiResponse::from_result_with_code(201, result, "category created", "Failed to create category")
    }

    pub async fn update_category(&self, id: &CategoryId, patch: &CategoryPatch) -> ApiResponse<CategoryPatch> {
        let result = self.categories.update(id, patch).await;
        ApiResponse::from_result(result, "category updated", &format!("Failed to update category {}", id))
    }

    pub async fn delete_category(&self, id: &CategoryId) -> ApiResponse<()> {
        let result = self.categories.delete(id).await;
        ApiResponse::from_result(result, "category deleted", &format!("Failed to delete category {}", id))
    }

    /// Deletes every id concurrently; the first failure fails the batch, but
    /// deletions that already went through are not rolled back
    pub async fn batch_delete_categories(&self, ids: &[CategoryId]) -> ApiResponse<()> {
        let result = try_join_all(ids.iter().map(|id| self.categories.delete(id)))
            .await
            .map(|_| ());
        ApiResponse::from_result(
            result,
            &format!("deleted {} categories", ids.len()),
            "Failed to batch delete categories",
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::MemoryTransport;
    use serde_json::json;

    fn setup() -> (Arc<MemoryTransport>, CategoryService) {
        let transport = Arc::new(MemoryTransport::new().with_collection(
            "categories",
            vec![
                json!({ "id": "1", "name": "Tech", "color": "#409EFF", "count": 4 }),
                json!({ "id": "2", "name": "Life", "color": "#67C23A", "count": 1 }),
                json!({ "id": "3", "name": "Notes", "color": "#E6A23C", "count": 0 }),
            ],
        ));
        let service = CategoryService::new(transport.clone());
        (transport, service)
    }

    #[tokio::test]
    async fn test_create_category() {
        let (_, service) = setup();
        let response = service.create_category(&CategoryForm::new("Travel", "#F56C6C")).await;

        assert_eq!(response.code, 201);
        let category = response.data.unwrap();
        assert_eq!(category.name, "Travel");
        assert_eq!(category.count, 0);
    }

    #[tokio::test]
    async fn test_get_and_update_category() {
        let (_, service) = setup();
        let id = CategoryId::from("2");

        assert_eq!(service.get_category_by_id(&id).await.data.unwrap().name, "Life");

        let echo = service
            .update_category(&id, &CategoryPatch::default().color("#000000"))
            .await
            .data
            .unwrap();
        assert_eq!(echo.color.as_deref(), Some("#000000"));
        assert_eq!(echo.name.as_deref(), Some("Life"));
    }

    #[tokio::test]
    async fn test_batch_delete() {
        let (transport, service) = setup();
        let ids = vec![CategoryId::from("1"), CategoryId::from("3")];

        let response = service.batch_delete_categories(&ids).await;
        assert!(response.success);
        assert_eq!(response.message, "deleted 2 categories");
        assert_eq!(transport.records("categories").await.len(), 1);
    }

    #[tokio::test]
    async fn test_batch_delete_reports_missing_ids() {
        let (_, service) = setup();
        let ids = vec![CategoryId::from("1"), CategoryId::from("missing")];

        let response = service.batch_delete_categories(&ids).await;
        assert!(!response.success);
        assert_eq!(response.code, 500);
    }
}
