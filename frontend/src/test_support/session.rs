//! In-process stand-ins for the browser collaborators of the session core.

use std::{
    cell::{Cell, RefCell},
    collections::HashSet,
    rc::Rc,
    time::Duration,
};

use chrono::{DateTime, TimeZone, Utc};

use crate::session::{
    clock::Clock,
    context::{SessionConfig, SessionContext},
    guard::Navigator,
    store::{KeyValueStorage, MemoryStorage, SessionStore, StorageError},
    watchdog::{IntervalHandle, IntervalScheduler, SchedulerError},
};

/// Hand-advanced wall clock; clones share the same instant.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Rc<Cell<DateTime<Utc>>>,
}

impl ManualClock {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            now: Rc::new(Cell::new(now)),
        }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.now.get()
    }

    pub fn advance(&self, by: chrono::Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.get()
    }
}

#[derive(Debug, Clone, Default)]
pub struct RecordingNavigator {
    visits: Rc<RefCell<Vec<String>>>,
}

impl RecordingNavigator {
    pub fn visits(&self) -> Vec<String> {
        self.visits.borrow().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, path: &str) {
        self.visits.borrow_mut().push(path.to_string());
    }
}

/// [`MemoryStorage`] with switchable failures.
#[derive(Debug, Clone, Default)]
pub struct FaultyStorage {
    inner: MemoryStorage,
    fail_reads: Rc<Cell<bool>>,
    failing_writes: Rc<RefCell<HashSet<String>>>,
    failing_removals: Rc<RefCell<HashSet<String>>>,
}

impl FaultyStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inner(&self) -> MemoryStorage {
        self.inner.clone()
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.set(fail);
    }

    pub fn fail_writes_to(&self, key: &str) {
        self.failing_writes.borrow_mut().insert(key.to_string());
    }

    pub fn fail_removals_of(&self, key: &str) {
        self.failing_removals.borrow_mut().insert(key.to_string());
    }
}

impl KeyValueStorage for FaultyStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        if self.fail_reads.get() {
            return Err(StorageError::Read { key: key.into() });
        }
        self.inner.get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.failing_writes.borrow().contains(key) {
            return Err(StorageError::Write { key: key.into() });
        }
        self.inner.set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        if self.failing_removals.borrow().contains(key) {
            return Err(StorageError::Remove { key: key.into() });
        }
        self.inner.remove_item(key)
    }
}

struct ScheduledInterval {
    id: usize,
    period: Duration,
    next_due: Duration,
    tick: Rc<dyn Fn()>,
    cancelled: Rc<Cell<bool>>,
}

/// Simulated `setInterval`. [`ManualScheduler::advance`] fires due ticks in
/// order and moves the shared [`ManualClock`] along with simulated time.
pub struct ManualScheduler {
    clock: ManualClock,
    elapsed: Cell<Duration>,
    intervals: RefCell<Vec<ScheduledInterval>>,
    fired: Cell<usize>,
}

impl ManualScheduler {
    pub fn new(clock: ManualClock) -> Self {
        Self {
            clock,
            elapsed: Cell::new(Duration::ZERO),
            intervals: RefCell::new(Vec::new()),
            fired: Cell::new(0),
        }
    }

    pub fn advance(&self, by: Duration) {
        let target = self.elapsed.get() + by;
        loop {
            let next = self
                .intervals
                .borrow()
                .iter()
                .filter(|interval| !interval.cancelled.get())
                .map(|interval| (interval.next_due, interval.id))
                .min();
            let Some((due, id)) = next.filter(|(due, _)| *due <= target) else {
                break;
            };
            self.move_to(due);
            let tick = {
                let mut intervals = self.intervals.borrow_mut();
                let Some(interval) = intervals.iter_mut().find(|interval| interval.id == id) else {
                    break;
                };
                interval.next_due += interval.period;
                interval.tick.clone()
            };
            self.fired.set(self.fired.get() + 1);
            tick();
        }
        self.move_to(target);
    }

    /// Ticks delivered so far, across all intervals.
    pub fn fired(&self) -> usize {
        self.fired.get()
    }

    /// Intervals ever scheduled.
    pub fn scheduled(&self) -> usize {
        self.intervals.borrow().len()
    }

    /// Intervals not yet cancelled.
    pub fn active(&self) -> usize {
        self.intervals
            .borrow()
            .iter()
            .filter(|interval| !interval.cancelled.get())
            .count()
    }

    fn move_to(&self, elapsed: Duration) {
        let delta = elapsed.saturating_sub(self.elapsed.get());
        self.elapsed.set(elapsed);
        self.clock
            .advance(chrono::Duration::from_std(delta).expect("simulated time fits chrono"));
    }
}

impl IntervalScheduler for ManualScheduler {
    fn schedule(
        &self,
        period: Duration,
        tick: Rc<dyn Fn()>,
    ) -> Result<IntervalHandle, SchedulerError> {
        let mut intervals = self.intervals.borrow_mut();
        let id = intervals.len();
        let cancelled = Rc::new(Cell::new(false));
        intervals.push(ScheduledInterval {
            id,
            period,
            next_due: self.elapsed.get() + period,
            tick,
            cancelled: cancelled.clone(),
        });
        Ok(IntervalHandle::new(move || cancelled.set(true)))
    }
}

pub struct TestSession {
    pub session: SessionContext,
    pub memory: MemoryStorage,
    pub navigator: RecordingNavigator,
    pub clock: ManualClock,
}

pub fn test_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap()
}

fn build(backend: Rc<dyn KeyValueStorage>, memory: MemoryStorage, config: SessionConfig) -> TestSession {
    let navigator = RecordingNavigator::default();
    let clock = ManualClock::at(test_now());
    let session = SessionContext::new(
        SessionStore::new(backend, config.keys),
        Rc::new(clock.clone()),
        Rc::new(navigator.clone()),
        config,
    );
    TestSession {
        session,
        memory,
        navigator,
        clock,
    }
}

pub fn test_session() -> TestSession {
    test_session_with(SessionConfig::default())
}

pub fn test_session_with(config: SessionConfig) -> TestSession {
    let memory = MemoryStorage::new();
    build(Rc::new(memory.clone()), memory, config)
}

/// Session over `storage`; `memory` in the result is its backing map.
pub fn test_session_on(storage: &FaultyStorage) -> TestSession {
    build(
        Rc::new(storage.clone()),
        storage.inner(),
        SessionConfig::default(),
    )
}
