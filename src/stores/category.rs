use log::info;
use tokio::sync::watch;

use super::{Loadable, StateCell};
use crate::models::{Category, CategoryForm, CategoryId, CategoryPatch, SelectOption};
use crate::services::CategoryService;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryState {
    pub categories: Vec<Category>,
    pub loading: bool,
    pub error: Option<String>,
}

impl CategoryState {
    /// Categories ordered by name, ignoring case
    pub fn sorted_categories(&self) -> Vec<&Category> {
        let mut sorted: Vec<&Category> = self.categories.iter().collect();
        sorted.sort_by_cached_key(|c| c.name.to_lowercase());
        sorted
    }

    pub fn category_options(&self) -> Vec<SelectOption> {
        self.categories.iter().map(Category::to_option).collect()
    }
}

impl Loadable for CategoryState {
    fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    fn set_error(&mut self, error: Option<String>) {
        self.error = error;
    }
}

pub struct CategoryStore {
    service: CategoryService,
    state: StateCell<CategoryState>,
}

impl CategoryStore {
    pub fn new(service: CategoryService) -> Self {
        Self {
            service,
            state: StateCell::new(CategoryState::default()),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<CategoryState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> CategoryState {
        self.state.snapshot()
    }

    pub async fn fetch_categories(&self) {
        self.state.begin();
        let result = self
            .service
            .get_categories()
            .await
            .into_result("failed to load categories");

        self.state.settle(result, "Failed to load categories", |state, categories| {
            info!("Loaded {} categories", categories.len());
            state.categories = categories;
        });
    }

    pub async fn create_category(&self, form: &CategoryForm) -> Option<Category> {
        self.state.begin();
        let result = self
            .service
            .create_category(form)
            .await
            .into_result("failed to create category");

        self.state.settle(result, "Failed to create category", |state, category| {
            state.categories.insert(0, category.clone());
            category
        })
    }

    pub async fn update_category(&self, id: &CategoryId, patch: &CategoryPatch) {
        self.state.begin();
        let result = self
            .service
            .update_category(id, patch)
            .await
            .into_result("failed to update category");

        self.state.settle(result, &format!("Failed to update category {}", id), |state, echo| {
            if let Some(category) = state.categories.iter_mut().find(|c| &c.id == id) {
                category.apply(echo);
            }
        });
    }

    pub async fn delete_category(&self, id: &CategoryId) {
        self.state.begin();
        let result = self
            .service
            .delete_category(id)
            .await
            .into_result("failed to delete category");

        self.state.settle(result, &format!("Failed to delete category {}", id), |state, ()| {
            state.categories.retain(|c| &c.id != id);
        });
    }

    pub async fn batch_delete_categories(&self, ids: &[CategoryId]) {
        self.state.begin();
        let result = self
            .service
            .batch_delete_categories(ids)
            .await
            .into_result("failed to batch delete categories");

        self.state.settle(result, "Failed to batch delete categories", |state, ()| {
            state.categories.retain(|c| !ids.contains(&c.id));
        });
    }

    pub fn clear_error(&self) {
        self.state.modify(|state| state.error = None);
    }
}
