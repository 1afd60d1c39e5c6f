use log::info;
use tokio::sync::watch;

use super::{Loadable, StateCell};
use crate::models::page::{total_pages, DEFAULT_PAGE_SIZE};
use crate::models::{Article, ArticleDraft, ArticleFilter, ArticleId, ArticlePatch, ArticleQuery, ArticleStatus};
use crate::services::ArticleService;

/// Pagination cursor of the article list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: usize,
    pub page_size: usize,
    pub total: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            total: 0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArticleState {
    /// Articles of the current page (or of the last search)
    pub articles: Vec<Article>,
    /// Article opened for viewing or editing
    pub current_article: Option<Article>,
    pub loading: bool,
    pub error: Option<String>,
    pub pagination: Pagination,
    /// Filters of the last successful list request
    pub filter: ArticleFilter,
}

impl ArticleState {
    pub fn published_articles(&self) -> Vec<&Article> {
        self.with_status(ArticleStatus::Published)
    }

    pub fn draft_articles(&self) -> Vec<&Article> {
        self.with_status(ArticleStatus::Draft)
    }

    fn with_status(&self, status: ArticleStatus) -> Vec<&Article> {
        self.articles.iter().filter(|a| a.status == status).collect()
    }

    pub fn total_pages(&self) -> usize {
        total_pages(self.pagination.total, self.pagination.page_size)
    }
}

impl Loadable for ArticleState {
    fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    fn set_error(&mut self, error: Option<String>) {
        self.error = error;
    }
}

/// Article list, detail and pagination state
pub struct ArticleStore {
    service: ArticleService,
    state: StateCell<ArticleState>,
}

impl ArticleStore {
    pub fn new(service: ArticleService) -> Self {
        Self {
            service,
            state: StateCell::new(ArticleState::default()),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<ArticleState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> ArticleState {
        self.state.snapshot()
    }

    /// Loads one page of articles. Without a query the current page and page
    /// size are reused and no filters apply.
    pub async fn fetch_articles(&self, query: Option<ArticleQuery>) {
        let query = query.unwrap_or_else(|| {
            let pagination = self.state.snapshot().pagination;
            ArticleQuery::new(pagination.page, pagination.page_size)
        });
        self.load_page(query).await;
    }

    /// Moves to another page keeping the last filters and page size
    pub async fn go_to_page(&self, page: usize) {
        let current = self.state.snapshot();
        let query = ArticleQuery::new(page, current.pagination.page_size).with_filter(current.filter);
        self.load_page(query).await;
    }

    async fn load_page(&self, query: ArticleQuery) {
        self.state.begin();
        let result = self
            .service
            .get_articles(&query)
            .await
            .into_result("failed to load article list");

        self.state.settle(result, "Failed to load article list", |state, page| {
            info!("Loaded {} articles (page {}, total {})", page.list.len(), page.page, page.total);
            state.pagination = Pagination {
                page: page.page,
                page_size: page.page_size,
                total: page.total,
            };
            state.articles = page.list;
            state.filter = query.filter;
        });
    }

    pub async fn fetch_article_by_id(&self, id: &ArticleId) {
        self.state.begin();
        let result = self
            .service
            .get_article_by_id(id)
            .await
            .into_result("failed to load article");

        self.state.settle(result, &format!("Failed to load article {}", id), |state, article| {
            state.current_article = Some(article);
        });
    }

    /// Creates an article and prepends it to the list. Returns the stored
    /// record, or `None` on failure.
    pub async fn create_article(&self, draft: &ArticleDraft) -> Option<Article> {
        self.state.begin();
        let result = self
            .service
            .create_article(draft)
            .await
            .into_result("failed to create article");

        self.state.settle(result, "Failed to create article", |state, article| {
            state.articles.insert(0, article.clone());
            article
        })
    }

    /// Updates an article and merges the server echo into the local copies.
    /// An article that is not in the local list is left out of it.
    pub async fn update_article(&self, id: &ArticleId, patch: &ArticlePatch) {
        self.state.begin();
        let result = self
            .service
            .update_article(id, patch)
            .await
            .into_result("failed to update article");

        self.state.settle(result, &format!("Failed to update article {}", id), |state, echo| {
            if let Some(article) = state.articles.iter_mut().find(|a| &a.id == id) {
                article.apply(echo.clone());
            }
            if let Some(current) = state.current_article.as_mut().filter(|a| &a.id == id) {
                current.apply(echo);
            }
        });
    }

    pub async fn delete_article(&self, id: &ArticleId) {
        self.state.begin();
        let result = self
            .service
            .delete_article(id)
            .await
            .into_result("failed to delete article");

        self.state.settle(result, &format!("Failed to delete article {}", id), |state, ()| {
            state.articles.retain(|a| &a.id != id);
        });
    }

    /// Keyword search over all articles. A blank keyword falls back to a
    /// plain unfiltered fetch.
    pub async fn search_articles(&self, keyword: &str) {
        if keyword.trim().is_empty() {
            self.fetch_articles(None).await;
            return;
        }

        self.state.begin();
        let result = self
            .service
            .search_articles(keyword)
            .await
            .into_result("failed to search articles");

        self.state.settle(result, &format!("Failed to search articles for {:?}", keyword), |state, found| {
            state.pagination.total = found.len();
            state.pagination.page = 1;
            state.articles = found;
            state.filter = ArticleFilter::default().keyword(keyword);
        });
    }

    pub fn clear_error(&self) {
        self.state.modify(|state| state.error = None);
    }

    pub fn clear_current_article(&self) {
        self.state.modify(|state| state.current_article = None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::testing::{FlakyTransport, SparseEchoTransport};
    use crate::data::MemoryTransport;
    use serde_json::json;
    use std::sync::Arc;

    fn backend(n: usize) -> MemoryTransport {
        MemoryTransport::new().with_collection(
            "articles",
            (1..=n)
                .map(|i| {
                    json!({
                        "id": i.to_string(),
                        "title": format!("Post {}", i),
                        "content": "body",
                        "tags": ["rust"],
                        "category": if i % 2 == 0 { "tech" } else { "life" },
                        "status": if i % 3 == 0 { "draft" } else { "published" },
                        "views": 1,
                        "likes": 1
                    })
                })
                .collect(),
        )
    }

    fn store_with(transport: impl crate::base::Transport + 'static) -> ArticleStore {
        ArticleStore::new(ArticleService::new(Arc::new(transport)))
    }

    fn ids(state: &ArticleState) -> Vec<String> {
        state.articles.iter().map(|a| a.id.0.clone()).collect()
    }

    #[tokio::test]
    async fn test_fetch_articles_updates_pagination() {
        let store = store_with(backend(15));
        store.fetch_articles(Some(ArticleQuery::new(2, 10))).await;

        let state = store.state();
        assert!(!state.loading);
        assert!(state.error.is_none());
        assert_eq!(state.articles.len(), 5);
        assert_eq!(state.pagination, Pagination { page: 2, page_size: 10, total: 15 });
        assert_eq!(state.total_pages(), 2);
    }

    #[tokio::test]
    async fn test_go_to_page_keeps_filters() {
        let store = store_with(backend(30));
        let query = ArticleQuery::new(1, 5).with_filter(ArticleFilter::default().category("tech"));
        store.fetch_articles(Some(query)).await;
        assert_eq!(store.state().pagination.total, 15);

        store.go_to_page(3).await;
        let state = store.state();
        assert_eq!(ids(&state), vec!["22", "24", "26", "28", "30"]);
        assert_eq!(state.pagination.page, 3);
    }

    #[tokio::test]
    async fn test_status_getters() {
        let store = store_with(backend(6));
        store.fetch_articles(None).await;

        let state = store.state();
        assert_eq!(state.published_articles().len(), 4);
        assert_eq!(state.draft_articles().len(), 2);
    }

    #[tokio::test]
    async fn test_fetch_skips_dirty_records() {
        let transport = MemoryTransport::new().with_collection(
            "articles",
            vec![
                json!({ "id": 1, "title": "numeric", "status": "published", "likes": null }),
                json!({ "id": "2", "title": "unknown status", "status": "pending" }),
                json!({ "id": "3", "title": "clean", "status": "draft" }),
            ],
        );
        let store = store_with(transport);

        store.fetch_articles(None).await;
        let state = store.state();
        assert!(state.error.is_none());
        assert_eq!(ids(&state), vec!["1", "3"]);
        assert_eq!(state.pagination.total, 2);

        store.search_articles("numeric").await;
        assert_eq!(ids(&store.state()), vec!["1"]);
    }

    #[tokio::test]
    async fn test_failed_fetch_keeps_previous_data() {
        let transport = Arc::new(FlakyTransport::new(backend(3)));
        let store = ArticleStore::new(ArticleService::new(transport.clone()));

        store.fetch_articles(None).await;
        assert_eq!(store.state().articles.len(), 3);

        transport.set_failing(true);
        store.fetch_articles(None).await;

        let state = store.state();
        assert!(!state.loading);
        assert_eq!(state.articles.len(), 3);
        assert!(state.error.as_deref().unwrap().contains("connection refused"));

        transport.set_failing(false);
        store.fetch_articles(None).await;
        assert!(store.state().error.is_none());
    }

    #[tokio::test]
    async fn test_create_prepends() {
        let store = store_with(backend(3));
        store.fetch_articles(None).await;

        let created = store
            .create_article(&ArticleDraft::new("Newest", "text", "tech"))
            .await
            .unwrap();

        let state = store.state();
        assert_eq!(state.articles.len(), 4);
        assert_eq!(state.articles[0].id, created.id);
        assert_eq!(state.articles[0].title, "Newest");
    }

    #[tokio::test]
    async fn test_create_with_sparse_server_echo() {
        let store = store_with(SparseEchoTransport {
            inner: backend(1),
            id: "99",
        });

        let created = store
            .create_article(&ArticleDraft::new("Draft", "text", "tech").with_summary("short"))
            .await
            .unwrap();

        assert_eq!(created.id.0, "99");
        assert_eq!(created.title, "");
        assert!(created.summary.is_none());
        assert!(created.created_at.is_none());
        assert!(store.state().error.is_none());
    }

    #[tokio::test]
    async fn test_update_merges_into_list_and_current() {
        let store = store_with(backend(3));
        let id = ArticleId::from("2");
        store.fetch_articles(None).await;
        store.fetch_article_by_id(&id).await;

        store
            .update_article(&id, &ArticlePatch::default().title("Edited").status(ArticleStatus::Archived))
            .await;

        let state = store.state();
        let listed = state.articles.iter().find(|a| a.id == id).unwrap();
        assert_eq!(listed.title, "Edited");
        assert_eq!(listed.status, ArticleStatus::Archived);
        assert_eq!(listed.tags, vec!["rust".to_string()]);
        assert_eq!(state.current_article.as_ref().unwrap().title, "Edited");
    }

    #[tokio::test]
    async fn test_update_of_unlisted_article_is_dropped_locally() {
        let store = store_with(backend(15));
        store.fetch_articles(Some(ArticleQuery::new(1, 5))).await;

        store.update_article(&ArticleId::from("12"), &ArticlePatch::default().title("Hidden")).await;

        let state = store.state();
        assert!(state.error.is_none());
        assert_eq!(ids(&state), vec!["1", "2", "3", "4", "5"]);
    }

    #[tokio::test]
    async fn test_delete() {
        let store = store_with(backend(3));
        store.fetch_articles(None).await;

        store.delete_article(&ArticleId::from("2")).await;
        assert_eq!(ids(&store.state()), vec!["1", "3"]);
    }

    #[tokio::test]
    async fn test_delete_of_unlisted_article_leaves_list_unchanged() {
        let store = store_with(backend(15));
        store.fetch_articles(Some(ArticleQuery::new(1, 5))).await;
        let before = ids(&store.state());

        // "12" exists on the server but not in the local page
        store.delete_article(&ArticleId::from("12")).await;

        let state = store.state();
        assert!(state.error.is_none());
        assert_eq!(ids(&state), before);
    }

    #[tokio::test]
    async fn test_search_and_blank_fallback() {
        let store = store_with(backend(12));
        store.fetch_articles(Some(ArticleQuery::new(1, 5))).await;

        store.search_articles("post 1").await;
        let state = store.state();
        assert_eq!(ids(&state), vec!["1", "10", "11", "12"]);
        assert_eq!(state.pagination.total, 4);
        assert_eq!(state.pagination.page, 1);

        store.search_articles("   ").await;
        let state = store.state();
        assert_eq!(state.pagination.total, 12);
        assert_eq!(state.articles.len(), 5);
    }

    #[tokio::test]
    async fn test_subscribers_are_notified() {
        let store = store_with(backend(2));
        let mut rx = store.subscribe();
        rx.borrow_and_update();

        store.fetch_articles(None).await;
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().articles.len(), 2);
    }

    #[tokio::test]
    async fn test_clear_helpers() {
        let transport = Arc::new(FlakyTransport::new(backend(1)));
        let store = ArticleStore::new(ArticleService::new(transport.clone()));
        store.fetch_article_by_id(&ArticleId::from("1")).await;
        assert!(store.state().current_article.is_some());

        transport.set_failing(true);
        store.fetch_article_by_id(&ArticleId::from("1")).await;
        assert!(store.state().error.is_some());
        assert!(store.state().current_article.is_some());

        store.clear_error();
        store.clear_current_article();
        let state = store.state();
        assert!(state.error.is_none());
        assert!(state.current_article.is_none());
    }
}
