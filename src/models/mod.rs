pub mod article;
pub mod category;
pub mod dashboard;
pub mod page;
pub mod tag;

use serde::{Deserialize, Serialize};

pub use article::{Article, ArticleDraft, ArticleId, ArticlePatch, ArticleStatus};
pub use category::{Category, CategoryForm, CategoryId, CategoryPatch};
pub use dashboard::{DashboardStats, RecentArticle, TrendPoint};
pub use page::{ArticleFilter, ArticleQuery, Page};
pub use tag::{Tag, TagForm, TagId, TagPatch};

/// Entry of a category or tag picker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub label: String,
    pub value: String,
    pub color: String,
}
