// tests/common/mod.rs
//! Shared fixtures for list controller tests.
//!
//! Fetches are scripted: each call takes the next [`Step`] (the last one
//! repeats), sleeps for its delay on the paused tokio clock, then replies.
//! A [`Recorder`] collects every published transition so a test can assert
//! whole timelines in milliseconds since the list was spawned.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use infinite_list::{
    unique_sorted_by, Change, CursorPage, FetchError, InfiniteList, ListConfig, StatusFlag,
    Transition,
};
use tokio::sync::broadcast;
use tokio::time::{sleep, sleep_until, Instant};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Model {
    pub id: u32,
}

pub type Page = CursorPage<Model>;
pub type List = InfiniteList<Model>;

/// Time a scripted fetch takes unless a step says otherwise.
pub const REQ_DURATION: u64 = 100;
/// When the list first appears in the timeline tests.
pub const TIME_TO_INIT: u64 = 10;

pub fn page(ids: std::ops::RangeInclusive<u32>) -> Page {
    let cursor = u64::from(*ids.end());
    CursorPage::new(ids.map(|id| Model { id }).collect(), cursor)
}

pub fn first_page() -> Page {
    page(1..=2)
}

pub fn second_page() -> Page {
    page(3..=4)
}

#[derive(Debug, Clone)]
pub enum Reply {
    Page(Page),
    Fail,
    Exhausted,
    Panic,
}

#[derive(Debug, Clone)]
pub struct Step {
    pub delay_ms: u64,
    pub reply: Reply,
}

impl Step {
    pub fn ok(page: Page) -> Self {
        Self::after(REQ_DURATION, Reply::Page(page))
    }

    pub fn fail() -> Self {
        Self::after(REQ_DURATION, Reply::Fail)
    }

    pub fn exhausted() -> Self {
        Self::after(REQ_DURATION, Reply::Exhausted)
    }

    pub fn after(delay_ms: u64, reply: Reply) -> Self {
        Self { delay_ms, reply }
    }
}

struct ScriptState {
    steps: Mutex<VecDeque<Step>>,
    last: Mutex<Option<Step>>,
    calls: AtomicUsize,
    cursors: Mutex<Vec<u64>>,
}

/// A fetch function's behaviour over successive calls.
#[derive(Clone)]
pub struct Script {
    state: Arc<ScriptState>,
}

impl Script {
    pub fn always(step: Step) -> Self {
        Self::sequence(vec![step])
    }

    pub fn sequence(steps: Vec<Step>) -> Self {
        Self {
            state: Arc::new(ScriptState {
                steps: Mutex::new(steps.into()),
                last: Mutex::new(None),
                calls: AtomicUsize::new(0),
                cursors: Mutex::new(Vec::new()),
            }),
        }
    }

    /// How many times the fetch was invoked.
    pub fn calls(&self) -> usize {
        self.state.calls.load(Ordering::SeqCst)
    }

    /// Cursors of the pages handed to a next-page fetch, in call order.
    pub fn cursors(&self) -> Vec<u64> {
        self.state.cursors.lock().unwrap().clone()
    }

    fn take(&self) -> Step {
        self.state.calls.fetch_add(1, Ordering::SeqCst);
        let mut last = self.state.last.lock().unwrap();
        if let Some(step) = self.state.steps.lock().unwrap().pop_front() {
            *last = Some(step);
        }
        last.clone().expect("script has at least one step")
    }

    async fn first(step: Step) -> Result<Page, FetchError> {
        sleep(Duration::from_millis(step.delay_ms)).await;
        match step.reply {
            Reply::Page(page) => Ok(page),
            Reply::Fail => Err(FetchError::Timeout {
                operation: "scripted first page".to_string(),
            }),
            Reply::Exhausted => Err(FetchError::other("first page cannot be exhausted")),
            Reply::Panic => panic!("scripted panic"),
        }
    }

    async fn next(step: Step) -> Result<Option<Page>, FetchError> {
        sleep(Duration::from_millis(step.delay_ms)).await;
        match step.reply {
            Reply::Page(page) => Ok(Some(page)),
            Reply::Fail => Err(FetchError::Timeout {
                operation: "scripted next page".to_string(),
            }),
            Reply::Exhausted => Ok(None),
            Reply::Panic => panic!("scripted panic"),
        }
    }
}

/// Reference extractor: flatten, deduplicate by id, ascending.
pub fn extract(pages: &[Page]) -> Vec<Model> {
    unique_sorted_by(pages, |model| model.id)
}

pub fn config(init: &Script, next: &Script) -> ListConfig<Page, Model> {
    let init = init.clone();
    let next = next.clone();
    ListConfig::new(
        move || Script::first(init.take()),
        move |last: Page| {
            next.state.cursors.lock().unwrap().push(last.cursor);
            Script::next(next.take())
        },
        extract,
    )
}

/// A freshly spawned list with a recorder attached from time zero.
pub fn spawn(init: &Script, next: &Script) -> (List, Recorder) {
    let list = InfiniteList::spawn(config(init, next));
    let recorder = Recorder::attach(&list);
    (list, recorder)
}

/// Sleeps until `ms` milliseconds after `origin`.
pub async fn at(origin: Instant, ms: u64) {
    sleep_until(origin + Duration::from_millis(ms)).await;
}

/// Every value an output took, with the time it was taken.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Timeline {
    pub items: Vec<(u64, Vec<u32>)>,
    pub reloading: Vec<(u64, bool)>,
    pub refreshing: Vec<(u64, bool)>,
    pub loading_more: Vec<(u64, bool)>,
    pub erroring: Vec<(u64, bool)>,
}

pub struct Recorder {
    origin: Instant,
    transitions: broadcast::Receiver<Transition<Model>>,
    timeline: Timeline,
}

impl Recorder {
    pub fn attach(list: &List) -> Self {
        let status = list.status();
        let items = ids(&list.current_items());
        Self {
            origin: Instant::now(),
            transitions: list.transitions(),
            timeline: Timeline {
                items: vec![(0, items)],
                reloading: vec![(0, status.reloading)],
                refreshing: vec![(0, status.refreshing)],
                loading_more: vec![(0, status.loading_more)],
                erroring: vec![(0, status.erroring)],
            },
        }
    }

    pub fn origin(&self) -> Instant {
        self.origin
    }

    /// Drains everything published so far into the timeline.
    pub fn finish(mut self) -> Timeline {
        while let Ok(Transition { at, change }) = self.transitions.try_recv() {
            let ms = at.as_millis() as u64;
            match change {
                Change::Items(items) => self.timeline.items.push((ms, ids(&items))),
                Change::Flag(flag, value) => {
                    let series = match flag {
                        StatusFlag::Reloading => &mut self.timeline.reloading,
                        StatusFlag::Refreshing => &mut self.timeline.refreshing,
                        StatusFlag::LoadingMore => &mut self.timeline.loading_more,
                        StatusFlag::Erroring => &mut self.timeline.erroring,
                    };
                    series.push((ms, value));
                }
            }
        }
        self.timeline
    }
}

pub fn ids(items: &[Model]) -> Vec<u32> {
    items.iter().map(|model| model.id).collect()
}
