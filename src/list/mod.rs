// src/list/mod.rs
//! The infinite list controller.
//!
//! An [`InfiniteList`] turns four triggers (init, reload, refresh and
//! load-more) into calls to a [`PageSource`](crate::PageSource), keeps the
//! fetched page history, and publishes the derived items together with
//! four status flags. All state lives in one background task; the handle
//! only sends triggers and hands out receivers.
//!
//! ```no_run
//! use infinite_list::{InfiniteList, ListConfig};
//!
//! # async fn demo() -> infinite_list::Result<()> {
//! let config = ListConfig::new(
//!     || async { Ok(vec![1_u32, 2, 3]) },
//!     |last: Vec<u32>| async move { Ok((last[0] < 9).then(|| last.iter().map(|n| n + 3).collect())) },
//!     |pages: &[Vec<u32>]| pages.concat(),
//! );
//! let list = InfiniteList::spawn(config);
//! list.init()?;
//! let mut items = list.items();
//! items.changed().await.ok();
//! println!("{:?}", *items.borrow());
//! list.shutdown().await
//! # }
//! ```

mod config;
mod driver;
mod orchestrator;
mod outputs;
mod pages;
mod presentation;
mod status;

use std::fmt;
use std::sync::Arc;

use log::debug;
use tokio::sync::{broadcast, mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::error::{AppError, Result};
use orchestrator::Orchestrator;
use outputs::Outputs;

pub use config::{ItemDecorator, ListConfig};
pub use driver::{DriverKind, FetchDriver, FetchOutcome, OutcomeKind, Phase, Ticket, Trigger};
pub use outputs::{Change, Signals, Transition};
pub use pages::{Extractor, PageStore};
pub use presentation::{refresh_ended, should_prefetch, Presentation};
pub use status::{FlagChange, StatusAggregator, StatusFlag, StatusFlags, StatusSignal};

/// Handle to a running list controller.
///
/// Dropping the handle stops the controller; [`shutdown`](Self::shutdown)
/// does the same and waits for it.
pub struct InfiniteList<I, C = ()> {
    triggers: mpsc::UnboundedSender<Trigger>,
    signals: Signals<I>,
    decorator: ItemDecorator<C, I>,
    prefetch_distance: usize,
    task: JoinHandle<()>,
}

impl<I, C> InfiniteList<I, C>
where
    I: Send + Sync + 'static,
{
    /// Starts the controller on the current tokio runtime.
    ///
    /// Nothing is fetched until the first trigger arrives.
    pub fn spawn<P>(config: ListConfig<P, I, C>) -> Self
    where
        P: Clone + Send + Sync + 'static,
    {
        let ListConfig {
            source,
            extractor,
            decorator,
            prefetch_distance,
            transition_capacity,
        } = config;

        let store = PageStore::new(extractor);
        let (outputs, signals) = Outputs::channel(
            Instant::now(),
            Arc::clone(store.items()),
            transition_capacity,
        );
        let (triggers, inbox) = mpsc::unbounded_channel();
        let task = tokio::spawn(Orchestrator::new(source, store, outputs).run(inbox));
        debug!("List controller started");

        Self {
            triggers,
            signals,
            decorator,
            prefetch_distance,
            task,
        }
    }

    pub fn fire(&self, trigger: Trigger) -> Result<()> {
        self.triggers
            .send(trigger)
            .map_err(|_| AppError::ControllerClosed)
    }

    /// The list is about to appear for the first time.
    pub fn init(&self) -> Result<()> {
        self.fire(Trigger::Init)
    }

    /// Start over from the first page, e.g. from the error placeholder.
    pub fn reload(&self) -> Result<()> {
        self.fire(Trigger::Reload)
    }

    /// Pull-to-refresh.
    pub fn refresh(&self) -> Result<()> {
        self.fire(Trigger::Refresh)
    }

    /// Ask for the page after the last one. Ignored while one is loading
    /// or before anything has loaded.
    pub fn load_more(&self) -> Result<()> {
        self.fire(Trigger::LoadMore)
    }

    /// Reports that the row at `index` is about to be displayed and fires
    /// load-more when it is close enough to the end. Returns whether a
    /// trigger was sent.
    pub fn item_displayed(&self, index: usize) -> Result<bool> {
        let item_count = self.signals.current_items().len();
        if !should_prefetch(index, item_count, self.prefetch_distance) {
            return Ok(false);
        }
        self.load_more()?;
        Ok(true)
    }

    pub fn items(&self) -> watch::Receiver<Arc<Vec<I>>> {
        self.signals.items()
    }

    pub fn reloading(&self) -> watch::Receiver<bool> {
        self.signals.flag(StatusFlag::Reloading)
    }

    pub fn refreshing(&self) -> watch::Receiver<bool> {
        self.signals.flag(StatusFlag::Refreshing)
    }

    pub fn loading_more(&self) -> watch::Receiver<bool> {
        self.signals.flag(StatusFlag::LoadingMore)
    }

    pub fn erroring(&self) -> watch::Receiver<bool> {
        self.signals.flag(StatusFlag::Erroring)
    }

    pub fn status(&self) -> StatusFlags {
        self.signals.status()
    }

    pub fn current_items(&self) -> Arc<Vec<I>> {
        self.signals.current_items()
    }

    /// Every change published from now on, in order.
    pub fn transitions(&self) -> broadcast::Receiver<Transition<I>> {
        self.signals.transitions()
    }

    pub fn signals(&self) -> Signals<I> {
        self.signals.clone()
    }

    pub fn presentation(&self) -> Presentation {
        Presentation::derive(self.status(), self.signals.current_items().len())
    }

    /// Draws `item` into `cell` with the configured decorator.
    pub fn decorate(&self, cell: &mut C, item: &I) {
        (self.decorator)(cell, item)
    }

    /// Stops the controller and waits for its task to finish.
    /// Fetches still in flight are dropped.
    pub async fn shutdown(self) -> Result<()> {
        let Self { triggers, task, .. } = self;
        drop(triggers);
        task.await?;
        debug!("List controller shut down");
        Ok(())
    }
}

impl<I, C> fmt::Debug for InfiniteList<I, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InfiniteList")
            .field("signals", &self.signals)
            .field("prefetch_distance", &self.prefetch_distance)
            .field("closed", &self.triggers.is_closed())
            .finish_non_exhaustive()
    }
}
