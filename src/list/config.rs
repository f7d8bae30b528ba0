// src/list/config.rs
//! Construction-time configuration of a list.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use super::pages::Extractor;
use crate::algebras::{FetchError, FnSource, PageSource};
use crate::constants::{PREFETCH_DISTANCE, TRANSITION_CAPACITY};

/// Rendering hook applied to a cell for one item. The controller never calls it.
pub type ItemDecorator<C, I> = Arc<dyn Fn(&mut C, &I) + Send + Sync>;

/// Everything a list needs: where pages come from, how pages become items,
/// and how an item is drawn into a cell of type `C`.
pub struct ListConfig<P, I, C = ()> {
    pub(crate) source: Arc<dyn PageSource<Page = P>>,
    pub(crate) extractor: Extractor<P, I>,
    pub(crate) decorator: ItemDecorator<C, I>,
    pub(crate) prefetch_distance: usize,
    pub(crate) transition_capacity: usize,
}

impl<P, I> ListConfig<P, I, ()>
where
    P: Clone + Send + Sync + 'static,
    I: 'static,
{
    /// Builds a configuration from an initial-fetch closure, a next-fetch
    /// closure and an extractor.
    ///
    /// `next_fetch` receives a copy of the most recent page and resolves to
    /// `Ok(None)` when there is nothing after it.
    pub fn new<F, FFut, N, NFut, X>(init_fetch: F, next_fetch: N, extractor: X) -> Self
    where
        F: Fn() -> FFut + Send + Sync + 'static,
        FFut: Future<Output = Result<P, FetchError>> + Send + 'static,
        N: Fn(P) -> NFut + Send + Sync + 'static,
        NFut: Future<Output = Result<Option<P>, FetchError>> + Send + 'static,
        X: Fn(&[P]) -> Vec<I> + Send + Sync + 'static,
    {
        Self::from_source(FnSource::new(init_fetch, next_fetch), extractor)
    }

    /// Builds a configuration around a [`PageSource`] implementation.
    pub fn from_source<S, X>(source: S, extractor: X) -> Self
    where
        S: PageSource<Page = P> + 'static,
        X: Fn(&[P]) -> Vec<I> + Send + Sync + 'static,
    {
        Self {
            source: Arc::new(source),
            extractor: Arc::new(extractor),
            decorator: Arc::new(|_: &mut (), _: &I| {}),
            prefetch_distance: PREFETCH_DISTANCE,
            transition_capacity: TRANSITION_CAPACITY,
        }
    }
}

impl<P, I, C> ListConfig<P, I, C> {
    /// Attaches the rendering hook, fixing the cell type.
    pub fn with_decorator<D, F>(self, decorator: F) -> ListConfig<P, I, D>
    where
        F: Fn(&mut D, &I) + Send + Sync + 'static,
    {
        ListConfig {
            source: self.source,
            extractor: self.extractor,
            decorator: Arc::new(decorator),
            prefetch_distance: self.prefetch_distance,
            transition_capacity: self.transition_capacity,
        }
    }

    /// How many rows from the end a displayed row may be and still trigger load-more.
    pub fn with_prefetch_distance(mut self, distance: usize) -> Self {
        self.prefetch_distance = distance;
        self
    }

    /// Per-subscriber buffer of the transition stream.
    pub fn with_transition_capacity(mut self, capacity: usize) -> Self {
        self.transition_capacity = capacity.max(1);
        self
    }

    pub fn decorate(&self, cell: &mut C, item: &I) {
        (self.decorator)(cell, item)
    }

    pub fn prefetch_distance(&self) -> usize {
        self.prefetch_distance
    }
}

impl<P, I, C> fmt::Debug for ListConfig<P, I, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListConfig")
            .field("prefetch_distance", &self.prefetch_distance)
            .field("transition_capacity", &self.transition_capacity)
            .finish_non_exhaustive()
    }
}
