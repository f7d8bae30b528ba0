// src/list/status.rs
//! The four status flags and the rules that raise and lower them.
//!
//! | flag           | rises on                 | falls on                                   |
//! |----------------|--------------------------|--------------------------------------------|
//! | `reloading`    | init, reload             | reload outcome (any)                       |
//! | `refreshing`   | refresh                  | refresh outcome (any)                      |
//! | `loading_more` | accepted load-more       | load-more outcome (any)                    |
//! | `erroring`     | reload/refresh failure   | reload or refresh trigger, their successes |
//!
//! Only real transitions are reported; setting a flag to the value it
//! already holds produces nothing.

use std::fmt;

use super::driver::{DriverKind, OutcomeKind, Trigger};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusFlag {
    Reloading,
    Refreshing,
    LoadingMore,
    Erroring,
}

impl StatusFlag {
    pub const ALL: [StatusFlag; 4] = [
        StatusFlag::Reloading,
        StatusFlag::Refreshing,
        StatusFlag::LoadingMore,
        StatusFlag::Erroring,
    ];
}

impl fmt::Display for StatusFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusFlag::Reloading => write!(f, "reloading"),
            StatusFlag::Refreshing => write!(f, "refreshing"),
            StatusFlag::LoadingMore => write!(f, "loading_more"),
            StatusFlag::Erroring => write!(f, "erroring"),
        }
    }
}

/// Snapshot of all four flags. No combined "loading" flag is derived here.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusFlags {
    pub reloading: bool,
    pub refreshing: bool,
    pub loading_more: bool,
    pub erroring: bool,
}

impl StatusFlags {
    pub fn get(&self, flag: StatusFlag) -> bool {
        match flag {
            StatusFlag::Reloading => self.reloading,
            StatusFlag::Refreshing => self.refreshing,
            StatusFlag::LoadingMore => self.loading_more,
            StatusFlag::Erroring => self.erroring,
        }
    }

    fn slot(&mut self, flag: StatusFlag) -> &mut bool {
        match flag {
            StatusFlag::Reloading => &mut self.reloading,
            StatusFlag::Refreshing => &mut self.refreshing,
            StatusFlag::LoadingMore => &mut self.loading_more,
            StatusFlag::Erroring => &mut self.erroring,
        }
    }
}

/// A driver lifecycle event as seen by the aggregator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusSignal {
    /// A trigger was admitted by its driver and a fetch started.
    Accepted(Trigger),
    /// The current fetch of a driver resolved.
    Settled(DriverKind, OutcomeKind),
}

/// A single flag transition.
pub type FlagChange = (StatusFlag, bool);

#[derive(Debug, Clone, Default)]
pub struct StatusAggregator {
    flags: StatusFlags,
}

impl StatusAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn flags(&self) -> StatusFlags {
        self.flags
    }

    /// Folds one signal into the flags and returns the transitions it caused,
    /// in [`StatusFlag::ALL`] order.
    pub fn apply(&mut self, signal: StatusSignal) -> Vec<FlagChange> {
        let mut next = self.flags;
        match signal {
            StatusSignal::Accepted(Trigger::Init) => {
                next.reloading = true;
            }
            StatusSignal::Accepted(Trigger::Reload) => {
                next.reloading = true;
                next.erroring = false;
            }
            StatusSignal::Accepted(Trigger::Refresh) => {
                next.refreshing = true;
                next.erroring = false;
            }
            StatusSignal::Accepted(Trigger::LoadMore) => {
                next.loading_more = true;
            }
            StatusSignal::Settled(DriverKind::Reload, outcome) => {
                next.reloading = false;
                apply_error_edge(&mut next, outcome);
            }
            StatusSignal::Settled(DriverKind::Refresh, outcome) => {
                next.refreshing = false;
                apply_error_edge(&mut next, outcome);
            }
            StatusSignal::Settled(DriverKind::LoadMore, _) => {
                next.loading_more = false;
            }
        }
        self.transition_to(next)
    }

    fn transition_to(&mut self, next: StatusFlags) -> Vec<FlagChange> {
        let mut changes = Vec::new();
        for flag in StatusFlag::ALL {
            let value = next.get(flag);
            let slot = self.flags.slot(flag);
            if *slot != value {
                *slot = value;
                changes.push((flag, value));
            }
        }
        changes
    }
}

fn apply_error_edge(flags: &mut StatusFlags, outcome: OutcomeKind) {
    match outcome {
        OutcomeKind::Success => flags.erroring = false,
        OutcomeKind::Failure => flags.erroring = true,
        OutcomeKind::Empty => {}
    }
}
