//! Observable state containers, one per resource.
//!
//! Each store keeps its state in a `tokio::sync::watch` channel: every
//! change is applied in one `send_modify` call and subscribers see the new
//! snapshot. Operations are not serialized against each other; two
//! overlapping calls on the same store both apply their result and the last
//! one to finish wins.

pub mod article;
pub mod category;
pub mod dashboard;
pub mod tag;

use tokio::sync::watch;

use crate::base::ApiResult;

pub use article::{ArticleState, ArticleStore, Pagination};
pub use category::{CategoryState, CategoryStore};
pub use dashboard::{DashboardState, DashboardStore};
pub use tag::{TagState, TagStore};

/// State shapes that carry the shared loading/error flags
pub trait Loadable {
    fn set_loading(&mut self, loading: bool);
    fn set_error(&mut self, error: Option<String>);
}

pub(crate) struct StateCell<S> {
    tx: watch::Sender<S>,
}

impl<S: Loadable + Clone> StateCell<S> {
    pub fn new(initial: S) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx }
    }

    pub fn subscribe(&self) -> watch::Receiver<S> {
        self.tx.subscribe()
    }

    pub fn snapshot(&self) -> S {
        self.tx.borrow().clone()
    }

    pub fn modify(&self, change: impl FnOnce(&mut S)) {
        self.tx.send_modify(change);
    }

    /// Marks an operation as started: loading on, previous error cleared
    pub fn begin(&self) {
        self.modify(|state| {
            state.set_loading(true);
            state.set_error(None);
        });
    }

    /// Applies the outcome of an operation and clears the loading flag.
    ///
    /// On failure the error message is stored and the existing data is left
    /// untouched.
    pub fn settle<T, R>(
        &self,
        result: ApiResult<T>,
        context: &str,
        apply: impl FnOnce(&mut S, T) -> R,
    ) -> Option<R> {
        match result {
            Ok(value) => {
                let mut output = None;
                self.modify(|state| {
                    output = Some(apply(state, value));
                    state.set_loading(false);
                });
                output
            }
            Err(err) => {
                log::error!("{}: {}", context, err);
                self.modify(|state| {
                    state.set_loading(false);
                    state.set_error(Some(err.to_string()));
                });
                None
            }
        }
    }
}
