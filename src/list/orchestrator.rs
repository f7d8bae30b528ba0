// src/list/orchestrator.rs
//! The single event loop behind an [`InfiniteList`](super::InfiniteList).
//!
//! One task owns the page store, the three drivers and the status
//! aggregator, so every state change happens in one place and in one
//! order. The loop waits on two things at once:
//!
//! - the trigger inbox, polled first so that a trigger and a result that
//!   become ready together are handled trigger-first;
//! - the set of in-flight fetches, each tagged with the [`Ticket`] it was
//!   issued under.
//!
//! Superseded fetches are not aborted. They run to completion and their
//! result is dropped when its ticket is no longer current.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::future::BoxFuture;
use futures::stream::FuturesUnordered;
use futures::{FutureExt, StreamExt};
use log::{debug, info, trace, warn};
use tokio::sync::mpsc;

use super::driver::{DriverKind, FetchDriver, FetchOutcome, Ticket, Trigger};
use super::outputs::Outputs;
use super::pages::PageStore;
use super::status::{StatusAggregator, StatusSignal};
use crate::algebras::{FetchError, PageSource};
use crate::constants::TRIGGER_BURST_LIMIT;

type InFlight<P> = BoxFuture<'static, (Ticket, FetchOutcome<P>)>;

pub(crate) struct Orchestrator<P, I> {
    source: Arc<dyn PageSource<Page = P>>,
    store: PageStore<P, I>,
    reload: FetchDriver,
    refresh: FetchDriver,
    load_more: FetchDriver,
    status: StatusAggregator,
    outputs: Outputs<I>,
}

impl<P, I> Orchestrator<P, I>
where
    P: Clone + Send + Sync + 'static,
    I: Send + Sync + 'static,
{
    pub(crate) fn new(
        source: Arc<dyn PageSource<Page = P>>,
        store: PageStore<P, I>,
        outputs: Outputs<I>,
    ) -> Self {
        Self {
            source,
            store,
            reload: FetchDriver::reload(),
            refresh: FetchDriver::refresh(),
            load_more: FetchDriver::load_more(),
            status: StatusAggregator::new(),
            outputs,
        }
    }

    /// Runs until every trigger sender is gone. Pending fetches are dropped on exit.
    pub(crate) async fn run(mut self, mut inbox: mpsc::UnboundedReceiver<Trigger>) {
        let mut in_flight: FuturesUnordered<InFlight<P>> = FuturesUnordered::new();
        let mut burst = 0;

        loop {
            if burst >= TRIGGER_BURST_LIMIT {
                burst = 0;
                self.settle_ready(&mut in_flight);
            }

            tokio::select! {
                biased;

                trigger = inbox.recv() => match trigger {
                    Some(trigger) => {
                        burst += 1;
                        if let Some(fetch) = self.on_trigger(trigger) {
                            in_flight.push(fetch);
                        }
                    }
                    None => break,
                },
                Some((ticket, outcome)) = in_flight.next(), if !in_flight.is_empty() => {
                    burst = 0;
                    self.on_settled(ticket, outcome);
                }
            }
        }

        debug!(
            "List controller stopped with {} fetch(es) still in flight",
            in_flight.len()
        );
    }

    /// Settles every fetch that has already finished, without waiting.
    fn settle_ready(&mut self, in_flight: &mut FuturesUnordered<InFlight<P>>) {
        while let Some(Some((ticket, outcome))) = in_flight.next().now_or_never() {
            self.on_settled(ticket, outcome);
        }
    }

    /// Admits or drops a trigger. An admitted trigger raises its flag and
    /// yields the fetch to run.
    fn on_trigger(&mut self, trigger: Trigger) -> Option<InFlight<P>> {
        trace!("Received {} trigger", trigger);

        let (ticket, fetch) = match trigger {
            Trigger::Init | Trigger::Reload => {
                let ticket = self.reload.begin()?;
                (ticket, self.fetch_first())
            }
            Trigger::Refresh => {
                let ticket = self.refresh.begin()?;
                (ticket, self.fetch_first())
            }
            Trigger::LoadMore => {
                if self.load_more.is_fetching() {
                    debug!("Dropping load-more: a load-more is already in flight");
                    return None;
                }
                let Some(last) = self.store.last_page().cloned() else {
                    debug!("Dropping load-more: nothing has been loaded yet");
                    return None;
                };
                let ticket = self.load_more.begin()?;
                (ticket, self.fetch_next(last))
            }
        };

        debug!(
            "Accepted {} trigger as {} fetch #{}",
            trigger, ticket.kind, ticket.generation
        );
        let changes = self.status.apply(StatusSignal::Accepted(trigger));
        self.outputs.publish_flags(self.status.flags(), &changes);

        Some(guarded(ticket, fetch))
    }

    /// Applies the outcome of a fetch if its ticket is still current.
    fn on_settled(&mut self, ticket: Ticket, outcome: FetchOutcome<P>) {
        if !self.driver_mut(ticket.kind).settle(ticket) {
            debug!(
                "Discarding stale {} result #{} ({:?})",
                ticket.kind,
                ticket.generation,
                outcome.kind()
            );
            return;
        }

        let kind = outcome.kind();
        match outcome {
            FetchOutcome::Success(page) => {
                let items = match ticket.kind {
                    DriverKind::LoadMore => self.store.append(page),
                    DriverKind::Reload | DriverKind::Refresh => self.store.replace_with(page),
                };
                info!(
                    "{} loaded page {} ({} items)",
                    ticket.kind,
                    self.store.page_count(),
                    items.len()
                );
                self.outputs.publish_items(items);
            }
            FetchOutcome::Failure(error) if ticket.kind == DriverKind::LoadMore => {
                warn!("Load-more failed, keeping current items: {}", error);
            }
            FetchOutcome::Failure(error) => {
                warn!("{} failed: {}", ticket.kind, error);
            }
            FetchOutcome::Empty => {
                debug!("No page after the last one, list is exhausted");
            }
        }

        let changes = self.status.apply(StatusSignal::Settled(ticket.kind, kind));
        self.outputs.publish_flags(self.status.flags(), &changes);
    }

    fn driver_mut(&mut self, kind: DriverKind) -> &mut FetchDriver {
        match kind {
            DriverKind::Reload => &mut self.reload,
            DriverKind::Refresh => &mut self.refresh,
            DriverKind::LoadMore => &mut self.load_more,
        }
    }

    fn fetch_first(&self) -> BoxFuture<'static, FetchOutcome<P>> {
        let source = Arc::clone(&self.source);
        async move {
            match source.first_page().await {
                Ok(page) => FetchOutcome::Success(page),
                Err(error) => FetchOutcome::Failure(error),
            }
        }
        .boxed()
    }

    fn fetch_next(&self, last: P) -> BoxFuture<'static, FetchOutcome<P>> {
        let source = Arc::clone(&self.source);
        async move {
            match source.page_after(&last).await {
                Ok(Some(page)) => FetchOutcome::Success(page),
                Ok(None) => FetchOutcome::Empty,
                Err(error) => FetchOutcome::Failure(error),
            }
        }
        .boxed()
    }
}

/// Tags a fetch with its ticket and turns a panic inside it into a failure.
fn guarded<P>(ticket: Ticket, fetch: BoxFuture<'static, FetchOutcome<P>>) -> InFlight<P>
where
    P: Send + 'static,
{
    async move {
        let outcome = match AssertUnwindSafe(fetch).catch_unwind().await {
            Ok(outcome) => outcome,
            Err(panic) => FetchOutcome::Failure(FetchError::from_panic(panic)),
        };
        (ticket, outcome)
    }
    .boxed()
}
