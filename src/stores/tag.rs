use log::info;
use tokio::sync::watch;

use super::{Loadable, StateCell};
use crate::models::{SelectOption, Tag, TagForm, TagId, TagPatch};
use crate::services::TagService;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TagState {
    pub tags: Vec<Tag>,
    pub loading: bool,
    pub error: Option<String>,
}

impl TagState {
    pub fn sorted_tags(&self) -> Vec<&Tag> {
        let mut sorted: Vec<&Tag> = self.tags.iter().collect();
        sorted.sort_by_cached_key(|t| t.name.to_lowercase());
        sorted
    }

    pub fn tag_options(&self) -> Vec<SelectOption> {
        self.tags.iter().map(Tag::to_option).collect()
    }
}

impl Loadable for TagState {
    fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    fn set_error(&mut self, error: Option<String>) {
        self.error = error;
    }
}

pub struct TagStore {
    service: TagService,
    state: StateCell<TagState>,
}

impl TagStore {
    pub fn new(service: TagService) -> Self {
        Self {
            service,
            state: StateCell::new(TagState::default()),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<TagState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> TagState {
        self.state.snapshot()
    }

    pub async fn fetch_tags(&self) {
        self.state.begin();
        let result = self.service.get_tags().await.into_result("failed to load tags");

        self.state.settle(result, "Failed to load tags", |state, tags| {
            info!("Loaded {} tags", tags.len());
            state.tags = tags;
        });
    }

    pub async fn create_tag(&self, form: &TagForm) -> Option<Tag> {
        self.state.begin();
        let result = self.service.create_tag(form).await.into_result("failed to create tag");

        self.state.settle(result, "Failed to create tag", |state, tag| {
            state.tags.insert(0, tag.clone());
            tag
        })
    }

    pub async fn update_tag(&self, id: &TagId, patch: &TagPatch) {
        self.state.begin();
        let result = self
            .service
            .update_tag(id, patch)
            .await
            .into_result("failed to update tag");

        self.state.settle(result, &format!("Failed to update tag {}", id), |state, echo| {
            if let Some(tag) = state.tags.iter_mut().find(|t| &t.id == id) {
                tag.apply(echo);
            }
        });
    }

    pub async fn delete_tag(&self, id: &TagId) {
        self.state.begin();
        let result = self.service.delete_tag(id).await.into_result("failed to delete tag");

        self.state.settle(result, &format!("Failed to delete tag {}", id), |state, ()| {
            state.tags.retain(|t| &t.id != id);
        });
    }

    pub async fn batch_delete_tags(&self, ids: &[TagId]) {
        self.state.begin();
        let result = self
            .service
            .batch_delete_tags(ids)
            .await
            .into_result("failed to batch delete tags");

        self.state.settle(result, "Failed to batch delete tags", |state, ()| {
            state.tags.retain(|t| !ids.contains(&t.id));
        });
    }

    pub fn clear_error(&self) {
        self.state.modify(|state| state.error = None);
    }
}
