use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

use super::article::ArticleStatus;

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// One page of a filtered collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub list: Vec<T>,
    /// Number of matching items before pagination
    pub total: usize,
    pub page: usize,
    pub page_size: usize,
}

impl<T> Page<T> {
    pub fn total_pages(&self) -> usize {
        total_pages(self.total, self.page_size)
    }
}

pub fn total_pages(total: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    total.div_ceil(page_size)
}

/// Conjunctive article filters; `None` or blank values are ignored
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleFilter {
    pub keyword: Option<String>,
    /// Accepts a blank string on the wire as "no status filter"
    #[serde(default, deserialize_with = "status_filter")]
    pub status: Option<ArticleStatus>,
    pub category: Option<String>,
}

impl ArticleFilter {
    pub fn keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keyword = Some(keyword.into());
        self
    }

    pub fn status(mut self, status: ArticleStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        is_blank(&self.keyword) && self.status.is_none() && is_blank(&self.category)
    }
}

fn status_filter<'de, D>(deserializer: D) -> Result<Option<ArticleStatus>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    ArticleStatus::parse_filter(raw.as_deref()).map_err(D::Error::custom)
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |v| v.trim().is_empty())
}

/// Page request over the article collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleQuery {
    /// 1-based page number
    pub page: usize,
    pub page_size: usize,
    #[serde(flatten)]
    pub filter: ArticleFilter,
}

impl Default for ArticleQuery {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            filter: ArticleFilter::default(),
        }
    }
}

impl ArticleQuery {
    pub fn new(page: usize, page_size: usize) -> Self {
        Self {
            page,
            page_size,
            filter: ArticleFilter::default(),
        }
    }

    pub fn with_filter(mut self, filter: ArticleFilter) -> Self {
        self.filter = filter;
        self
    }
}
