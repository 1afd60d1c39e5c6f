//! Dashboard aggregation: summary counters, the 7-day writing trend and the
//! recently updated list.

use std::cmp::Reverse;
use std::collections::HashMap;

use chrono::{DateTime, Days, NaiveDate, TimeZone};

use crate::models::{Article, ArticleStatus, Category, DashboardStats, RecentArticle, Tag, TrendPoint};
use crate::utils::day_label;

/// Number of calendar days covered by the writing trend
pub const TREND_DAYS: u64 = 7;

pub const DEFAULT_RECENT_LIMIT: usize = 5;

pub fn compute_stats(articles: &[Article], categories: &[Category], tags: &[Tag]) -> DashboardStats {
    let mut stats = DashboardStats {
        total_articles: articles.len(),
        total_categories: categories.len(),
        total_tags: tags.len(),
        ..Default::default()
    };

    for article in articles {
        match article.status {
            ArticleStatus::Published => stats.published_articles += 1,
            ArticleStatus::Draft => stats.draft_articles += 1,
            ArticleStatus::Archived => {}
        }
        stats.total_views = stats.total_views.saturating_add(article.views);
        stats.total_likes = stats.total_likes.saturating_add(article.likes);
    }

    stats
}

/// Counts article creations for each of the 7 calendar days ending at
/// `today` (inclusive), oldest first.
///
/// Creation instants are converted into `today`'s timezone before being
/// truncated to a date. Articles without a usable `createdAt` or created
/// outside the window are skipped.
pub fn compute_trends<Tz: TimeZone>(articles: &[Article], today: &DateTime<Tz>) -> Vec<TrendPoint> {
    let tz = today.timezone();
    let last_day = today.date_naive();

    let mut per_day: HashMap<NaiveDate, usize> = HashMap::new();
    let mut skipped = 0usize;
    for article in articles {
        match article.created_at {
            Some(created_at) => {
                *per_day.entry(created_at.with_timezone(&tz).date_naive()).or_default() += 1;
            }
            None => skipped += 1,
        }
    }
    if skipped > 0 {
        log::warn!("Skipped {} articles without a valid creation time", skipped);
    }

    (0..TREND_DAYS)
        .rev()
        .filter_map(|offset| last_day.checked_sub_days(Days::new(offset)))
        .map(|day| TrendPoint {
            date: day_label(day),
            count: per_day.get(&day).copied().unwrap_or(0),
        })
        .collect()
}

/// Most recently updated articles first; articles never updated go last.
pub fn recent_articles(articles: &[Article], limit: usize) -> Vec<RecentArticle> {
    let mut sorted: Vec<&Article> = articles.iter().collect();
    sorted.sort_by_key(|article| Reverse(article.updated_at));
    sorted.into_iter().take(limit).map(RecentArticle::from).collect()
}
