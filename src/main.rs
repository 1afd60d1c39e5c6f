use std::sync::Arc;

use anyhow::{Context, Result};
use log::{info, warn};
use serde_json::json;

use inkstand::config::{parse_flag, ENV_DEV_MODE};
use inkstand::{
    AppConfig, ArticleQuery, ArticleService, ArticleStore, DashboardService, DashboardStore,
    HttpTransport, MemoryTransport, Transport,
};

/// Runs against a seeded in-memory backend instead of the configured URL
const ENV_OFFLINE: &str = "INKSTAND_OFFLINE";

#[tokio::main]
async fn main() -> Result<()> {
    // Set up logging first so configuration fallbacks are reported; dev mode
    // defaults to debug output
    let dev_mode = std::env::var(ENV_DEV_MODE)
        .map(|v| parse_flag(&v))
        .unwrap_or(cfg!(debug_assertions));
    let default_filter = if dev_mode { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();

    let config = AppConfig::from_env()?;

    info!("Starting {} v{}", config.title, config.version);
    info!("API base URL: {}", config.api_base_url);
    info!("Environment: {}", if config.dev_mode { "development" } else { "production" });

    let offline = std::env::var(ENV_OFFLINE).map(|v| parse_flag(&v)).unwrap_or(false);
    let transport: Arc<dyn Transport> = if offline {
        warn!("{} is set, using the in-memory backend", ENV_OFFLINE);
        Arc::new(demo_backend())
    } else {
        Arc::new(HttpTransport::new(&config.api_base_url).context("Failed to build HTTP client")?)
    };

    let dashboard = DashboardStore::new(DashboardService::new(transport.clone()));
    let articles = ArticleStore::new(ArticleService::new(transport));

    info!("Loading dashboard...");
    dashboard.fetch_dashboard_data().await;
    let state = dashboard.state();
    if let Some(error) = &state.error {
        warn!("Dashboard unavailable: {}", error);
    } else {
        let stats = state.stats;
        println!(
            "articles: {} ({} published, {} drafts)  categories: {}  tags: {}  views: {}  likes: {}",
            stats.total_articles,
            stats.published_articles,
            stats.draft_articles,
            stats.total_categories,
            stats.total_tags,
            stats.total_views,
            stats.total_likes,
        );
        let trend: Vec<String> = state
            .writing_trends
            .iter()
            .map(|point| format!("{}:{}", point.date, point.count))
            .collect();
        println!("last 7 days: {}", trend.join(" "));
    }

    articles.fetch_articles(Some(ArticleQuery::default())).await;
    let state = articles.state();
    if let Some(error) = &state.error {
        warn!("Article list unavailable: {}", error);
        return Ok(());
    }

    println!(
        "page {}/{} ({} articles)",
        state.pagination.page,
        state.total_pages(),
        state.pagination.total
    );
    for article in &state.articles {
        println!("  [{}] {} ({})", article.status, article.title, article.category);
    }

    Ok(())
}

fn demo_backend() -> MemoryTransport {
    MemoryTransport::new()
        .with_collection(
            "articles",
            vec![
                json!({ "id": "1", "title": "Getting started", "content": "Welcome to the admin panel.",
                        "tags": ["guide"], "category": "General", "status": "published", "views": 12, "likes": 3,
                        "createdAt": chrono::Utc::now().to_rfc3339(), "updatedAt": chrono::Utc::now().to_rfc3339() }),
                json!({ "id": "2", "title": "Draft notes", "content": "Work in progress.",
                        "tags": [], "category": "General", "status": "draft", "views": 0, "likes": 0,
                        "createdAt": chrono::Utc::now().to_rfc3339(), "updatedAt": chrono::Utc::now().to_rfc3339() }),
            ],
        )
        .with_collection(
            "categories",
            vec![json!({ "id": "1", "name": "General", "color": "#409EFF", "count": 2 })],
        )
        .with_collection("tags", vec![json!({ "id": "1", "name": "guide", "color": "#67C23A" })])
}
