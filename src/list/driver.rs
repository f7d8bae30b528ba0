// src/list/driver.rs
//! Per-category fetch state machines.
//!
//! A [`FetchDriver`] is `Idle` or `Fetching` one generation. Reload and
//! refresh drivers admit every trigger and supersede the fetch in flight
//! (switch-to-latest); the load-more driver refuses triggers while busy.
//! Results come back tagged with the [`Ticket`] they were issued under and
//! only the current generation is allowed to settle the driver.

use std::fmt;

use crate::algebras::FetchError;

/// External events that drive the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trigger {
    /// First appearance of the list.
    Init,
    /// Explicit retry, e.g. from an error or empty placeholder.
    Reload,
    /// Pull-to-refresh.
    Refresh,
    /// The end of the list came into view.
    LoadMore,
}

impl Trigger {
    /// The driver that serves this trigger. `Init` shares the reload driver.
    pub fn driver(self) -> DriverKind {
        match self {
            Trigger::Init | Trigger::Reload => DriverKind::Reload,
            Trigger::Refresh => DriverKind::Refresh,
            Trigger::LoadMore => DriverKind::LoadMore,
        }
    }
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trigger::Init => write!(f, "init"),
            Trigger::Reload => write!(f, "reload"),
            Trigger::Refresh => write!(f, "refresh"),
            Trigger::LoadMore => write!(f, "load-more"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DriverKind {
    Reload,
    Refresh,
    LoadMore,
}

impl fmt::Display for DriverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DriverKind::Reload => write!(f, "reload"),
            DriverKind::Refresh => write!(f, "refresh"),
            DriverKind::LoadMore => write!(f, "load-more"),
        }
    }
}

/// Identifies one fetch invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket {
    pub kind: DriverKind,
    pub generation: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Fetching { generation: u64 },
}

/// What to do with a trigger that arrives while a fetch is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Admission {
    /// Start a new fetch and abandon interest in the old one.
    SwitchToLatest,
    /// Drop the trigger.
    DropWhileBusy,
}

/// Result of one fetch, captured as data.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome<P> {
    Success(P),
    Failure(FetchError),
    /// No further page exists. Only produced by load-more fetches.
    Empty,
}

impl<P> FetchOutcome<P> {
    pub fn kind(&self) -> OutcomeKind {
        match self {
            FetchOutcome::Success(_) => OutcomeKind::Success,
            FetchOutcome::Failure(_) => OutcomeKind::Failure,
            FetchOutcome::Empty => OutcomeKind::Empty,
        }
    }
}

/// The payload-free shape of a [`FetchOutcome`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutcomeKind {
    Success,
    Failure,
    Empty,
}

#[derive(Debug, Clone)]
pub struct FetchDriver {
    kind: DriverKind,
    admission: Admission,
    generation: u64,
    phase: Phase,
}

impl FetchDriver {
    pub fn reload() -> Self {
        Self::new(DriverKind::Reload, Admission::SwitchToLatest)
    }

    pub fn refresh() -> Self {
        Self::new(DriverKind::Refresh, Admission::SwitchToLatest)
    }

    pub fn load_more() -> Self {
        Self::new(DriverKind::LoadMore, Admission::DropWhileBusy)
    }

    fn new(kind: DriverKind, admission: Admission) -> Self {
        Self {
            kind,
            admission,
            generation: 0,
            phase: Phase::Idle,
        }
    }

    /// Moves to `Fetching` under a fresh generation, or refuses.
    ///
    /// Returns `None` only for a drop-while-busy driver that is already fetching.
    pub fn begin(&mut self) -> Option<Ticket> {
        if self.admission == Admission::DropWhileBusy && self.is_fetching() {
            return None;
        }
        self.generation += 1;
        self.phase = Phase::Fetching {
            generation: self.generation,
        };
        Some(Ticket {
            kind: self.kind,
            generation: self.generation,
        })
    }

    /// Returns the driver to `Idle` if `ticket` is the fetch it is waiting for.
    ///
    /// A superseded ticket leaves the driver untouched and returns `false`.
    pub fn settle(&mut self, ticket: Ticket) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.phase = Phase::Idle;
        true
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        ticket.kind == self.kind
            && matches!(self.phase, Phase::Fetching { generation } if generation == ticket.generation)
    }

    pub fn is_fetching(&self) -> bool {
        matches!(self.phase, Phase::Fetching { .. })
    }

    pub fn kind(&self) -> DriverKind {
        self.kind
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}
