// src/list/outputs.rs
//! The externally observed outputs of a list.
//!
//! Every output exists twice. A `watch` channel holds the current value
//! (items start as the extractor's view of an empty history, flags start
//! `false`), which is what a renderer polls. A `broadcast` channel carries
//! each individual [`Transition`] in order, stamped with the time elapsed
//! since the list was spawned, for consumers that must see every edge.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, watch};
use tokio::time::Instant;

use super::status::{FlagChange, StatusFlag, StatusFlags};

/// One observable change.
#[derive(Debug, PartialEq)]
pub enum Change<I> {
    Items(Arc<Vec<I>>),
    Flag(StatusFlag, bool),
}

impl<I> Clone for Change<I> {
    fn clone(&self) -> Self {
        match self {
            Change::Items(items) => Change::Items(Arc::clone(items)),
            Change::Flag(flag, value) => Change::Flag(*flag, *value),
        }
    }
}

/// A [`Change`] together with the moment it was published.
#[derive(Debug, PartialEq)]
pub struct Transition<I> {
    /// Time since the list was spawned.
    pub at: Duration,
    pub change: Change<I>,
}

impl<I> Clone for Transition<I> {
    fn clone(&self) -> Self {
        Self {
            at: self.at,
            change: self.change.clone(),
        }
    }
}

/// Publishing side, owned by the orchestrator.
pub(crate) struct Outputs<I> {
    origin: Instant,
    items: watch::Sender<Arc<Vec<I>>>,
    reloading: watch::Sender<bool>,
    refreshing: watch::Sender<bool>,
    loading_more: watch::Sender<bool>,
    erroring: watch::Sender<bool>,
    status: watch::Sender<StatusFlags>,
    transitions: broadcast::Sender<Transition<I>>,
}

/// Receiving side, handed out by [`InfiniteList`](super::InfiniteList).
pub struct Signals<I> {
    items: watch::Receiver<Arc<Vec<I>>>,
    reloading: watch::Receiver<bool>,
    refreshing: watch::Receiver<bool>,
    loading_more: watch::Receiver<bool>,
    erroring: watch::Receiver<bool>,
    status: watch::Receiver<StatusFlags>,
    /// Only ever resubscribed, so the channel closes with `Outputs`.
    transitions: broadcast::Receiver<Transition<I>>,
}

impl<I> Outputs<I> {
    pub(crate) fn channel(
        origin: Instant,
        initial_items: Arc<Vec<I>>,
        capacity: usize,
    ) -> (Outputs<I>, Signals<I>) {
        let (items, items_rx) = watch::channel(initial_items);
        let (reloading, reloading_rx) = watch::channel(false);
        let (refreshing, refreshing_rx) = watch::channel(false);
        let (loading_more, loading_more_rx) = watch::channel(false);
        let (erroring, erroring_rx) = watch::channel(false);
        let (status, status_rx) = watch::channel(StatusFlags::default());
        let (transitions, transitions_rx) = broadcast::channel(capacity.max(1));

        let signals = Signals {
            items: items_rx,
            reloading: reloading_rx,
            refreshing: refreshing_rx,
            loading_more: loading_more_rx,
            erroring: erroring_rx,
            status: status_rx,
            transitions: transitions_rx,
        };
        let outputs = Outputs {
            origin,
            items,
            reloading,
            refreshing,
            loading_more,
            erroring,
            status,
            transitions,
        };
        (outputs, signals)
    }

    pub(crate) fn publish_items(&self, items: Arc<Vec<I>>) {
        self.items.send_replace(Arc::clone(&items));
        self.broadcast(Change::Items(items));
    }

    /// Publishes the transitions of one aggregator step. `flags` is the state after the step.
    pub(crate) fn publish_flags(&self, flags: StatusFlags, changes: &[FlagChange]) {
        if changes.is_empty() {
            return;
        }
        self.status.send_replace(flags);
        for &(flag, value) in changes {
            self.flag(flag).send_replace(value);
            self.broadcast(Change::Flag(flag, value));
        }
    }

    fn flag(&self, flag: StatusFlag) -> &watch::Sender<bool> {
        match flag {
            StatusFlag::Reloading => &self.reloading,
            StatusFlag::Refreshing => &self.refreshing,
            StatusFlag::LoadingMore => &self.loading_more,
            StatusFlag::Erroring => &self.erroring,
        }
    }

    fn broadcast(&self, change: Change<I>) {
        let transition = Transition {
            at: self.origin.elapsed(),
            change,
        };
        // No subscriber is not an error.
        let _ = self.transitions.send(transition);
    }
}

impl<I> Signals<I> {
    pub fn items(&self) -> watch::Receiver<Arc<Vec<I>>> {
        self.items.clone()
    }

    pub fn flag(&self, flag: StatusFlag) -> watch::Receiver<bool> {
        match flag {
            StatusFlag::Reloading => self.reloading.clone(),
            StatusFlag::Refreshing => self.refreshing.clone(),
            StatusFlag::LoadingMore => self.loading_more.clone(),
            StatusFlag::Erroring => self.erroring.clone(),
        }
    }

    pub fn status(&self) -> StatusFlags {
        *self.status.borrow()
    }

    pub fn current_items(&self) -> Arc<Vec<I>> {
        Arc::clone(&self.items.borrow())
    }

    /// A receiver that sees every transition published from now on.
    ///
    /// It reports `Closed` once the controller has stopped.
    pub fn transitions(&self) -> broadcast::Receiver<Transition<I>> {
        self.transitions.resubscribe()
    }
}

impl<I> Clone for Signals<I> {
    fn clone(&self) -> Self {
        Self {
            items: self.items.clone(),
            reloading: self.reloading.clone(),
            refreshing: self.refreshing.clone(),
            loading_more: self.loading_more.clone(),
            erroring: self.erroring.clone(),
            status: self.status.clone(),
            transitions: self.transitions.resubscribe(),
        }
    }
}

impl<I> fmt::Debug for Signals<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signals")
            .field("items", &self.items.borrow().len())
            .field("status", &self.status())
            .finish()
    }
}
