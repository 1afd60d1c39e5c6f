use log::info;
use tokio::sync::watch;

use super::{Loadable, StateCell};
use crate::models::{DashboardStats, RecentArticle, TrendPoint};
use crate::services::stats::DEFAULT_RECENT_LIMIT;
use crate::services::DashboardService;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardState {
    pub stats: DashboardStats,
    pub recent_articles: Vec<RecentArticle>,
    pub writing_trends: Vec<TrendPoint>,
    pub loading: bool,
    pub error: Option<String>,
}

impl DashboardState {
    /// Published share of all articles, in percent
    pub fn article_completion_rate(&self) -> u64 {
        self.stats.completion_rate()
    }

    pub fn average_views(&self) -> u64 {
        self.stats.average_views()
    }

    pub fn average_likes(&self) -> u64 {
        self.stats.average_likes()
    }
}

impl Loadable for DashboardState {
    fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    fn set_error(&mut self, error: Option<String>) {
        self.error = error;
    }
}

pub struct DashboardStore {
    service: DashboardService,
    state: StateCell<DashboardState>,
}

impl DashboardStore {
    pub fn new(service: DashboardService) -> Self {
        Self {
            service,
            state: StateCell::new(DashboardState::default()),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<DashboardState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> DashboardState {
        self.state.snapshot()
    }

    /// Loads stats, recent articles and trends concurrently. The new data is
    /// applied only if all three requests succeed.
    pub async fn fetch_dashboard_data(&self) {
        self.state.begin();
        let (stats, recent, trends) = tokio::join!(
            self.service.get_dashboard_stats(),
            self.service.get_recent_articles(DEFAULT_RECENT_LIMIT),
            self.service.get_writing_trends(),
        );

        let result = match (
            stats.into_result("failed to load dashboard stats"),
            recent.into_result("failed to load recent articles"),
            trends.into_result("failed to load writing trends"),
        ) {
            (Ok(stats), Ok(recent), Ok(trends)) => Ok((stats, recent, trends)),
            (Err(err), _, _) | (_, Err(err), _) | (_, _, Err(err)) => Err(err),
        };

        self.state.settle(result, "Failed to load dashboard", |state, (stats, recent, trends)| {
            info!(
                "Dashboard loaded: {} articles, {} recent, {} trend points",
                stats.total_articles,
                recent.len(),
                trends.len()
            );
            state.stats = stats;
            state.recent_articles = recent;
            state.writing_trends = trends;
        });
    }

    pub async fn refresh_data(&self) {
        info!("Refreshing dashboard data");
        self.fetch_dashboard_data().await;
    }

    pub fn clear_error(&self) {
        self.state.modify(|state| state.error = None);
    }
}
