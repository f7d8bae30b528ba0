// src/list/pages.rs
//! The page history and the item collection derived from it.

use std::fmt;
use std::sync::Arc;

/// Turns the whole page history into the visible item collection.
///
/// Must be pure and total: the same history always yields the same items,
/// and an empty history is a valid input.
pub type Extractor<P, I> = Arc<dyn Fn(&[P]) -> Vec<I> + Send + Sync>;

/// Ordered history of successfully fetched pages plus the derived items.
///
/// History only changes through [`replace_with`](Self::replace_with) and
/// [`append`](Self::append); both re-run the extractor and return the new
/// item collection. Failures never reach the store, so stale data stays
/// visible when a fetch fails.
pub struct PageStore<P, I> {
    history: Vec<P>,
    extractor: Extractor<P, I>,
    items: Arc<Vec<I>>,
}

impl<P, I> PageStore<P, I> {
    /// Creates an empty store. The initial items are the extractor's view of `[]`.
    pub fn new(extractor: Extractor<P, I>) -> Self {
        let items = Arc::new(extractor(&[]));
        Self {
            history: Vec::new(),
            extractor,
            items,
        }
    }

    /// Resets history to exactly `[page]`.
    pub fn replace_with(&mut self, page: P) -> Arc<Vec<I>> {
        self.history.clear();
        self.history.push(page);
        self.rederive()
    }

    /// Extends history with one page.
    pub fn append(&mut self, page: P) -> Arc<Vec<I>> {
        self.history.push(page);
        self.rederive()
    }

    /// The most recent page, the one a load-more continues from.
    pub fn last_page(&self) -> Option<&P> {
        self.history.last()
    }

    pub fn history(&self) -> &[P] {
        &self.history
    }

    pub fn items(&self) -> &Arc<Vec<I>> {
        &self.items
    }

    pub fn page_count(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    fn rederive(&mut self) -> Arc<Vec<I>> {
        self.items = Arc::new((self.extractor)(&self.history));
        Arc::clone(&self.items)
    }
}

impl<P, I> fmt::Debug for PageStore<P, I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageStore")
            .field("pages", &self.history.len())
            .field("items", &self.items.len())
            .finish()
    }
}
