use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::article::{Article, ArticleId, ArticleStatus};
use crate::utils::lenient_timestamp;

/// Summary numbers shown on the dashboard. Always derived, never persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_articles: usize,
    pub total_categories: usize,
    pub total_tags: usize,
    pub published_articles: usize,
    pub draft_articles: usize,
    pub total_views: u64,
    pub total_likes: u64,
}

impl DashboardStats {
    /// Share of published articles in percent, rounded
    pub fn completion_rate(&self) -> u64 {
        rounded_ratio(self.published_articles as u64 * 100, self.total_articles)
    }

    pub fn average_views(&self) -> u64 {
        rounded_ratio(self.total_views, self.total_articles)
    }

    pub fn average_likes(&self) -> u64 {
        rounded_ratio(self.total_likes, self.total_articles)
    }
}

fn rounded_ratio(numerator: u64, denominator: usize) -> u64 {
    if denominator == 0 {
        return 0;
    }
    (numerator as f64 / denominator as f64).round() as u64
}

/// Articles created on one calendar day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendPoint {
    /// `MM-DD` label
    pub date: String,
    pub count: usize,
}

/// Compact projection of an article for the "recently updated" list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentArticle {
    pub id: ArticleId,
    pub title: String,
    pub category: String,
    pub status: ArticleStatus,
    #[serde(default, with = "lenient_timestamp", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    pub views: u64,
    pub likes: u64,
}

impl From<&Article> for RecentArticle {
    fn from(article: &Article) -> Self {
        Self {
            id: article.id.clone(),
            title: article.title.clone(),
            category: article.category.clone(),
            status: article.status,
            updated_at: article.updated_at,
            views: article.views,
            likes: article.likes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derived_ratios() {
        let stats = DashboardStats {
            total_articles: 3,
            published_articles: 2,
            total_views: 100,
            total_likes: 5,
            ..Default::default()
        };

        assert_eq!(stats.completion_rate(), 67);
        assert_eq!(stats.average_views(), 33);
        assert_eq!(stats.average_likes(), 2);
    }

    #[test]
    fn test_ratios_without_articles() {
        let stats = DashboardStats::default();
        assert_eq!(stats.completion_rate(), 0);
        assert_eq!(stats.average_views(), 0);
        assert_eq!(stats.average_likes(), 0);
    }

    #[test]
    fn test_stats_wire_format() {
        let json = serde_json::to_value(DashboardStats::default()).unwrap();
        assert_eq!(json["totalArticles"], 0);
        assert_eq!(json["draftArticles"], 0);
        assert_eq!(json["totalLikes"], 0);
    }
}
