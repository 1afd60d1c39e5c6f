pub mod base;
pub mod config;
pub mod data;
pub mod models;
pub mod services;
pub mod stores;
pub mod utils;

pub use base::{ApiError, ApiRequest, ApiResponse, ApiResult, Method, Transport};
pub use config::AppConfig;
pub use data::{HttpTransport, MemoryTransport};

// Re-export models
pub use models::{
    article::{Article, ArticleDraft, ArticleId, ArticlePatch, ArticleStatus},
    category::{Category, CategoryForm, CategoryId, CategoryPatch},
    dashboard::{DashboardStats, RecentArticle, TrendPoint},
    page::{ArticleFilter, ArticleQuery, Page},
    tag::{Tag, TagForm, TagId, TagPatch},
};

pub use services::{
    query::{keyword_filter, query_articles},
    stats::{compute_stats, compute_trends, recent_articles},
    ArticleService, CategoryService, DashboardService, TagService,
};
pub use stores::{ArticleStore, CategoryStore, DashboardStore, TagStore};
