use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone};
use log::{debug, info};

use crate::base::{ApiError, ApiResponse, Transport};
use crate::models::{Article, Category, DashboardStats, RecentArticle, Tag, TrendPoint};
use crate::services::resource::ResourceClient;
use crate::services::stats::{compute_stats, compute_trends, recent_articles};

/// Aggregated data for the dashboard, computed from the raw collections
#[derive(Clone)]
pub struct DashboardService {
    articles: ResourceClient<Article>,
    categories: ResourceClient<Category>,
    tags: ResourceClient<Tag>,
}

impl DashboardService {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            articles: ResourceClient::new(transport.clone(), "articles"),
            categories: ResourceClient::new(transport.clone(), "categories"),
            tags: ResourceClient::new(transport, "tags"),
        }
    }

    /// Fetches the three collections concurrently; any failure fails the
    /// whole call
    pub async fn get_dashboard_stats(&self) -> ApiResponse<DashboardStats> {
        let result = tokio::try_join!(
            self.articles.list(&[]),
            self.categories.list(&[]),
            self.tags.list(&[]),
        )
        .map(|(articles, categories, tags)| compute_stats(&articles, &categories, &tags));

        if let Ok(stats) = &result {
            info!("Dashboard stats computed: {:?}", stats);
        }
        ApiResponse::from_result(result, "dashboard stats loaded", "Failed to load dashboard stats")
    }

    /// Most recently updated articles. The backend is asked to sort, and the
    /// result is sorted again locally in case it ignored the hint.
    pub async fn get_recent_articles(&self, limit: usize) -> ApiResponse<Vec<RecentArticle>> {
        let result = self
            .articles
            .list(&[("_sort", "updatedAt"), ("_order", "desc")])
            .await
            .map(|articles| recent_articles(&articles, limit));

        if let Ok(recent) = &result {
            debug!("Loaded {} recent articles", recent.len());
        }
        ApiResponse::from_result(result, "recent articles loaded", "Failed to load recent articles")
    }

    /// Writing trend for the 7 days ending today in the local timezone
    pub async fn get_writing_trends(&self) -> ApiResponse<Vec<TrendPoint>> {
        self.get_writing_trends_at(&Local::now()).await
    }

    pub async fn get_writing_trends_at<Tz>(&self, today: &DateTime<Tz>) -> ApiResponse<Vec<TrendPoint>>
    where
        Tz: TimeZone,
    {
        let result: Result<_, ApiError> = self
            .articles
            .list(&[])
            .await
            .map(|articles| compute_trends(&articles, today));
        ApiResponse::from_result(result, "writing trends loaded", "Failed to load writing trends")
    }
}
