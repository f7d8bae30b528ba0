//! Page retrieval algebra.
//!
//! This module defines the [`PageSource`] capability trait: the ability to
//! fetch the first page of a collection and the page that follows a given
//! one. The trait says nothing about HTTP, retries or decoding.

use async_trait::async_trait;
use std::future::Future;
use std::marker::PhantomData;

use super::error::FetchError;

/// Paginated retrieval capability.
///
/// # Laws
///
/// All implementations must satisfy these laws:
///
/// - **L1 (Fresh Start)**: `first_page` never depends on earlier calls.
///   ```text
///   page_after(p) ...
///   first_page() == first_page()   // modulo remote changes
///   ```
///
/// - **L2 (Exhaustion Is Data)**: running out of pages is `Ok(None)`, never an error.
///   ```text
///   page_after(last) == Ok(None)   // no more pages
///   page_after(last) == Err(e)     // the fetch itself failed
///   ```
///
/// - **L3 (Page Continuity)**: `page_after(p)` only needs `p` to continue.
///   ```text
///   page_after(p) == page_after(p.clone())
///   ```
///
/// This trait is **object-safe** and can be used as `Arc<dyn PageSource<Page = P>>`.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// One fetched batch plus whatever cursor state the next fetch needs.
    type Page: Send + Sync + 'static;

    /// Fetch the first page from scratch.
    async fn first_page(&self) -> Result<Self::Page, FetchError>;

    /// Fetch the page after `last`, or `None` when the collection is exhausted.
    async fn page_after(&self, last: &Self::Page) -> Result<Option<Self::Page>, FetchError>;
}

/// A [`PageSource`] assembled from two async closures.
///
/// `init` plays the role of `first_page`; `next` receives an owned clone of
/// the last page and plays the role of `page_after`.
pub struct FnSource<P, F, N> {
    init: F,
    next: N,
    _page: PhantomData<fn() -> P>,
}

impl<P, F, FFut, N, NFut> FnSource<P, F, N>
where
    F: Fn() -> FFut,
    FFut: Future<Output = Result<P, FetchError>>,
    N: Fn(P) -> NFut,
    NFut: Future<Output = Result<Option<P>, FetchError>>,
{
    pub fn new(init: F, next: N) -> Self {
        Self {
            init,
            next,
            _page: PhantomData,
        }
    }
}

#[async_trait]
impl<P, F, FFut, N, NFut> PageSource for FnSource<P, F, N>
where
    P: Clone + Send + Sync + 'static,
    F: Fn() -> FFut + Send + Sync,
    FFut: Future<Output = Result<P, FetchError>> + Send + 'static,
    N: Fn(P) -> NFut + Send + Sync,
    NFut: Future<Output = Result<Option<P>, FetchError>> + Send + 'static,
{
    type Page = P;

    async fn first_page(&self) -> Result<P, FetchError> {
        (self.init)().await
    }

    async fn page_after(&self, last: &P) -> Result<Option<P>, FetchError> {
        (self.next)(last.clone()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Counts up from the last page; exhausted after `limit` pages.
    fn counting_source(limit: u32) -> impl PageSource<Page = u32> {
        FnSource::new(
            || async { Ok(1_u32) },
            move |last: u32| async move {
                if last >= limit {
                    Ok(None)
                } else {
                    Ok(Some(last + 1))
                }
            },
        )
    }

    /// L1: Fresh Start - first_page ignores earlier page_after calls
    #[tokio::test]
    async fn law_l1_fresh_start() {
        let source = counting_source(3);
        let first = source.first_page().await.unwrap();
        let second = source.page_after(&first).await.unwrap().unwrap();
        assert_eq!(second, 2);
        assert_eq!(source.first_page().await.unwrap(), first);
    }

    /// L2: Exhaustion Is Data - the end of the collection is Ok(None)
    #[tokio::test]
    async fn law_l2_exhaustion_is_data() {
        let source = counting_source(2);
        assert_eq!(source.page_after(&2).await, Ok(None));

        let failing = FnSource::new(
            || async { Err::<u32, _>(FetchError::other("down")) },
            |_last: u32| async { Err::<Option<u32>, _>(FetchError::other("down")) },
        );
        assert!(failing.page_after(&1).await.is_err());
    }

    /// L3: Page Continuity - the closure sees an owned copy of the last page
    #[tokio::test]
    async fn law_l3_page_continuity() {
        let seen = Arc::new(AtomicUsize::new(0));
        let recorder = Arc::clone(&seen);
        let source = FnSource::new(
            || async { Ok(vec![1_u32, 2]) },
            move |last: Vec<u32>| {
                recorder.store(last.len(), Ordering::SeqCst);
                async { Ok(None) }
            },
        );

        let first = source.first_page().await.unwrap();
        assert_eq!(source.page_after(&first).await, Ok(None));
        assert_eq!(seen.load(Ordering::SeqCst), 2);
        // The caller keeps its page.
        assert_eq!(first, vec![1, 2]);
    }

    #[tokio::test]
    async fn test_usable_as_trait_object() {
        let source: Arc<dyn PageSource<Page = u32>> = Arc::new(counting_source(5));
        assert_eq!(source.page_after(&4).await, Ok(Some(5)));
    }
}
