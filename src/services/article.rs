use std::sync::Arc;

use log::{debug, info};

use crate::base::{ApiError, ApiResponse, ApiResult, Transport};
use crate::models::article::NewArticle;
use crate::models::{Article, ArticleDraft, ArticleId, ArticlePatch, ArticleQuery, Page};
use crate::services::query::{keyword_filter, query_articles};
use crate::services::resource::ResourceClient;

/// Article operations against `/articles`.
///
/// The backend's own search is too coarse, so listing and searching fetch
/// the whole collection and filter client-side.
#[derive(Clone)]
pub struct ArticleService {
    articles: ResourceClient<Article>,
}

impl ArticleService {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            articles: ResourceClient::new(transport, "articles"),
        }
    }

    /// Filtered, paginated article list
    pub async fn get_articles(&self, query: &ArticleQuery) -> ApiResponse<Page<Article>> {
        let result = async {
            let all = self.articles.list(&[]).await?;
            debug!("Fetched {} articles for query {:?}", all.len(), query);
            Ok::<_, ApiError>(query_articles(&all, query))
        }
        .await;
        ApiResponse::from_result(result, "success", "Failed to load article list")
    }

    pub async fn get_article_by_id(&self, id: &ArticleId) -> ApiResponse<Article> {
        let result = self.articles.get(id).await;
        ApiResponse::from_result(result, "success", &format!("Failed to load article {}", id))
    }

    /// Creates an article; id and timestamps are assigned by the server and
    /// counters start at zero
    pub async fn create_article(&self, draft: &ArticleDraft) -> ApiResponse<Article> {
        let result = self.articles.create(&NewArticle::from(draft)).await;
        if let Ok(article) = &result {
            info!("Created article {} ({})", article.id, article.title);
        }
        ApiResponse::from_result(result, "success", "Failed to create article")
    }

    /// Partial update via PATCH; the echo may not carry every field
    pub async fn update_article(&self, id: &ArticleId, patch: &ArticlePatch) -> ApiResponse<ArticlePatch> {
        let result = self.articles.update(id, patch).await;
        ApiResponse::from_result(result, "success", &format!("Failed to update article {}", id))
    }

    /// Full replacement via PUT. The editable fields come from `draft`; the
    /// current view and like counters are read first and carried over.
    pub async fn replace_article(&self, id: &ArticleId, draft: &ArticleDraft) -> ApiResponse<Article> {
        let result = async {
            let current = self.articles.get(id).await?;
            self.articles.replace(id, &NewArticle::keeping_counters(draft, &current)).await
        }
        .await;
        ApiResponse::from_result(result, "success", &format!("Failed to replace article {}", id))
    }

    pub async fn delete_article(&self, id: &ArticleId) -> ApiResponse<()> {
        let result = self.articles.delete(id).await;
        ApiResponse::from_result(result, "success", &format!("Failed to delete article {}", id))
    }

    /// Keyword-only search over the full collection, unpaginated
    pub async fn search_articles(&self, keyword: &str) -> ApiResponse<Vec<Article>> {
        let result = async {
            let all = self.articles.list(&[]).await?;
            let found: Vec<Article> = keyword_filter(&all, Some(keyword)).into_iter().cloned().collect();
            debug!("Search {:?} found {} articles", keyword, found.len());
            Ok::<_, ApiError>(found)
        }
        .await;
        ApiResponse::from_result(result, "success", &format!("Failed to search articles for {:?}", keyword))
    }

    pub async fn increment_view_count(&self, id: &ArticleId) -> ApiResponse<ArticlePatch> {
        let result = self
            .adjust_counters(id, |article| ArticlePatch::default().views(article.views.saturating_add(1)))
            .await;
        ApiResponse::from_result(result, "view count updated", "Failed to update view count")
    }

    pub async fn like_article(&self, id: &ArticleId) -> ApiResponse<ArticlePatch> {
        let result = self
            .adjust_counters(id, |article| ArticlePatch::default().likes(article.likes.saturating_add(1)))
            .await;
        ApiResponse::from_result(result, "liked", "Failed to like article")
    }

    /// Removes a like; the counter never drops below zero
    pub async fn unlike_article(&self, id: &ArticleId) -> ApiResponse<ArticlePatch> {
        let result = self
            .adjust_counters(id, |article| ArticlePatch::default().likes(article.likes.saturating_sub(1)))
            .await;
        ApiResponse::from_result(result, "like removed", "Failed to unlike article")
    }

    /// Read-modify-write of the counters. Not atomic: concurrent adjustments
    /// of the same article may lose increments.
    async fn adjust_counters<F>(&self, id: &ArticleId, change: F) -> ApiResult<ArticlePatch>
    where
        F: FnOnce(&Article) -> ArticlePatch,
    {
        let current = self.articles.get(id).await?;
        let patch = change(&current);
        self.articles.update(id, &patch).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::MemoryTransport;
    use crate::models::{ArticleFilter, ArticleStatus};
    use serde_json::json;

    fn service() -> ArticleService {
        let transport = MemoryTransport::new().with_collection(
            "articles",
            (1..=15)
                .map(|i| {
                    json!({
                        "id": i.to_string(),
                        "title": format!("Post {}", i),
                        "content": if i == 3 { "foo BAR" } else { "lorem" },
                        "tags": [],
                        "category": if i % 2 == 0 { "tech" } else { "life" },
                        "status": "published",
                        "views": i,
                        "likes": if i == 1 { 0 } else { 2 }
                    })
                })
                .collect(),
        );
        ArticleService::new(Arc::new(transport))
    }

    #[tokio::test]
    async fn test_get_articles_paginates() {
        let response = service().get_articles(&ArticleQuery::new(2, 10)).await;

        assert!(response.success);
        assert_eq!(response.code, 200);
        let page = response.data.unwrap();
        assert_eq!(page.total, 15);
        assert_eq!(page.list.len(), 5);
    }

    #[tokio::test]
    async fn test_get_articles_filters() {
        let query = ArticleQuery::new(1, 10).with_filter(ArticleFilter::default().keyword("bar"));
        let page = service().get_articles(&query).await.data.unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.list[0].id.0, "3");
    }

    #[tokio::test]
    async fn test_search_articles() {
        let found = service().search_articles("POST 1").await.data.unwrap();
        // "Post 1" and "Post 10" through "Post 15"
        assert_eq!(found.len(), 7);
    }

    #[tokio::test]
    async fn test_create_article_starts_counters_at_zero() {
        let service = service();
        let draft = ArticleDraft::new("Fresh", "Body", "tech").with_status(ArticleStatus::Draft);

        let response = service.create_article(&draft).await;
        let article = response.data.unwrap();
        assert_eq!(article.views, 0);
        assert_eq!(article.likes, 0);
        assert!(article.created_at.is_some());

        let page = service.get_articles(&ArticleQuery::new(1, 100)).await.data.unwrap();
        assert_eq!(page.total, 16);
    }

    #[tokio::test]
    async fn test_update_and_replace() {
        let service = service();
        let id = ArticleId::from("2");

        let echo = service
            .update_article(&id, &ArticlePatch::default().title("Renamed"))
            .await
            .data
            .unwrap();
        assert_eq!(echo.title.as_deref(), Some("Renamed"));
        assert!(echo.updated_at.is_some());

        let replaced = service
            .replace_article(&id, &ArticleDraft::new("Replaced", "New body", "life"))
            .await
            .data
            .unwrap();
        assert_eq!(replaced.title, "Replaced");
        assert_eq!(replaced.category, "life");
        assert_eq!((replaced.views, replaced.likes), (2, 2));
    }

    #[tokio::test]
    async fn test_replace_missing_article_fails() {
        let response = service()
            .replace_article(&ArticleId::from("99"), &ArticleDraft::new("Ghost", "", "life"))
            .await;
        assert!(!response.success);
        assert!(response.data.is_none());
    }

    #[tokio::test]
    async fn test_dirty_records_are_skipped() {
        let transport = MemoryTransport::new().with_collection(
            "articles",
            vec![
                json!({ "id": 7, "title": "numeric id", "status": "published", "views": null, "likes": 3 }),
                json!({ "id": "8", "title": "odd status", "status": "pending" }),
                json!({ "id": "9", "title": "clean", "status": "draft", "views": 4 }),
            ],
        );
        let service = ArticleService::new(Arc::new(transport));

        let page = service.get_articles(&ArticleQuery::default()).await.data.unwrap();
        assert_eq!(page.total, 2);
        assert_eq!(page.list[0].id, ArticleId::from("7"));
        assert_eq!(page.list[0].views, 0);
        assert_eq!(page.list[1].title, "clean");

        let found = service.search_articles("numeric").await.data.unwrap();
        assert_eq!(found.len(), 1);
    }

    #[tokio::test]
    async fn test_counters() {
        let service = service();
        let id = ArticleId::from("1");

        let viewed = service.increment_view_count(&id).await.data.unwrap();
        assert_eq!(viewed.views, Some(2));

        assert_eq!(service.like_article(&id).await.data.unwrap().likes, Some(1));
        assert_eq!(service.unlike_article(&id).await.data.unwrap().likes, Some(0));
        assert_eq!(service.unlike_article(&id).await.data.unwrap().likes, Some(0));
    }

    #[tokio::test]
    async fn test_missing_article_is_enveloped() {
        let service = service();
        let response = service.get_article_by_id(&ArticleId::from("404")).await;
        assert!(!response.success);
        assert_eq!(response.code, 500);
        assert!(response.data.is_none());

        let response = service.like_article(&ArticleId::from("404")).await;
        assert!(!response.success);

        let response = service.delete_article(&ArticleId::from("404")).await;
        assert!(response.message.contains("not found"));
    }
}
