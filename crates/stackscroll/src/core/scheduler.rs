use std::{
    cmp::Ordering,
    collections::{BinaryHeap, HashMap},
    fmt::Debug,
    hash::Hash,
    sync::{
        Arc, Mutex, PoisonError,
        atomic::{AtomicBool, Ordering as AtomicOrdering},
        mpsc,
    },
    thread,
    time::{Duration, Instant},
};

use crate::event::Event;

/// A tag with a pending action.
#[derive(Debug)]
struct PendingTag<K> {
    /// Scheduled time for the action.
    time: Instant,
    /// Schedule sequence number, used to discard stale heap entries.
    seq: u64,
    /// Tag the action was scheduled under.
    tag: K,
}

impl<K> PartialEq for PendingTag<K> {
    fn eq(&self, other: &Self) -> bool {
        self.time == other.time && self.seq == other.seq
    }
}

impl<K> Eq for PendingTag<K> {}

/// Reverse order so tags with the closest deadline are at the top.
impl<K> PartialOrd for PendingTag<K> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Reverse order so tags with the closest deadline are at the top.
impl<K> Ord for PendingTag<K> {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .time
            .cmp(&self.time)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// A pending action and its bookkeeping.
#[derive(Debug)]
struct Slot<A> {
    /// Sequence number of the schedule that created this slot.
    seq: u64,
    /// Deadline.
    time: Instant,
    /// The deferred action.
    action: A,
}

/// Coalesces repeated requests per tag into one deferred action.
///
/// While an action is pending for a tag, further `schedule` calls for that
/// tag are ignored: the first action still fires, unchanged, `delay` after
/// the first call. The debouncer only keeps time; the owner collects due
/// actions with [`Debouncer::take_due`] and runs them on its own execution
/// context. Dropping the debouncer drops every pending action unrun.
#[derive(Debug)]
pub struct Debouncer<K, A> {
    /// Settle delay.
    delay: Duration,
    /// Deadline heap. May contain stale entries for cancelled slots.
    heap: BinaryHeap<PendingTag<K>>,
    /// Live pending actions by tag.
    pending: HashMap<K, Slot<A>>,
    /// Next sequence number.
    seq: u64,
}

impl<K, A> Debouncer<K, A>
where
    K: Eq + Hash + Copy + Debug,
{
    /// Construct a debouncer with a fixed settle delay.
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            heap: BinaryHeap::new(),
            pending: HashMap::new(),
            seq: 0,
        }
    }

    /// The settle delay.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedule `action` under `tag`, relative to the current time.
    pub fn schedule(&mut self, tag: K, action: A) -> bool {
        self.schedule_at(Instant::now(), tag, action)
    }

    /// Schedule `action` under `tag` with an explicit time base.
    ///
    /// Returns false, dropping `action`, if an action is already pending for
    /// `tag`.
    pub fn schedule_at(&mut self, now: Instant, tag: K, action: A) -> bool {
        if self.pending.contains_key(&tag) {
            tracing::trace!(?tag, "coalesced");
            return false;
        }
        let time = now + self.delay;
        self.seq += 1;
        let seq = self.seq;
        self.heap.push(PendingTag { time, seq, tag });
        self.pending.insert(tag, Slot { seq, time, action });
        tracing::trace!(?tag, delay = ?self.delay, "scheduled");
        true
    }

    /// True if an action is pending for `tag`.
    pub fn is_pending(&self, tag: K) -> bool {
        self.pending.contains_key(&tag)
    }

    /// Number of pending actions.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// True if nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// The earliest pending deadline.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.values().map(|s| s.time).min()
    }

    /// Time remaining until the earliest deadline, relative to `now`. Zero if
    /// the earliest deadline has passed.
    pub fn current_wait(&self, now: Instant) -> Option<Duration> {
        self.next_deadline()
            .map(|t| t.checked_duration_since(now).unwrap_or(Duration::ZERO))
    }

    /// Remove and return every action due at `now`, earliest first.
    pub fn take_due(&mut self, now: Instant) -> Vec<(K, A)> {
        let mut out = vec![];
        while let Some(top) = self.heap.peek() {
            if top.time > now {
                break;
            }
            let Some(entry) = self.heap.pop() else {
                break;
            };
            let live = self
                .pending
                .get(&entry.tag)
                .is_some_and(|slot| slot.seq == entry.seq);
            if live && let Some(slot) = self.pending.remove(&entry.tag) {
                out.push((entry.tag, slot.action));
            }
        }
        out
    }

    /// Abort the pending action for one tag without running it.
    pub fn cancel_tag(&mut self, tag: K) -> bool {
        let removed = self.pending.remove(&tag).is_some();
        if removed {
            tracing::trace!(?tag, "cancelled");
        }
        removed
    }

    /// Abort every pending action without running it.
    pub fn cancel(&mut self) {
        if !self.pending.is_empty() {
            tracing::debug!(count = self.pending.len(), "cancelling pending actions");
        }
        self.pending.clear();
        self.heap.clear();
    }
}

/// Shared state between a [`SettleTimer`] and its thread.
#[derive(Debug, Default)]
struct TimerState {
    /// Next wakeup.
    deadline: Mutex<Option<Instant>>,
    /// Set when the owner goes away.
    shutdown: AtomicBool,
}

/// Wakes the run loop when the earliest debounced action is due.
///
/// The timer thread only posts [`Event::Settle`]; it never touches view
/// state. Actions are run by whoever handles the event.
#[derive(Debug)]
pub struct SettleTimer {
    /// Handle for the timer thread.
    handle: Option<thread::JoinHandle<()>>,
    /// State shared with the timer thread.
    state: Arc<TimerState>,
    /// Event sender for wakeups.
    event_tx: mpsc::Sender<Event>,
}

impl SettleTimer {
    /// Construct a timer that posts to `event_tx`. No thread is started
    /// until the first deadline is armed.
    pub fn new(event_tx: mpsc::Sender<Event>) -> Self {
        Self {
            handle: None,
            state: Arc::new(TimerState::default()),
            event_tx,
        }
    }

    /// Set the next wakeup, replacing any previous one. `None` disarms.
    pub fn arm(&mut self, deadline: Option<Instant>) {
        *self
            .state
            .deadline
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = deadline;
        if deadline.is_none() {
            return;
        }
        if let Some(h) = self.handle.as_ref() {
            // The thread is running, let's wake it up.
            h.thread().unpark();
        } else {
            let state = self.state.clone();
            let tx = self.event_tx.clone();
            self.handle = Some(thread::spawn(move || timer_loop(&state, &tx)));
        }
    }
}

/// What the timer thread should do next.
enum Wake {
    /// The deadline passed; post a settle event.
    Fire,
    /// Sleep until the deadline.
    Wait(Duration),
    /// Nothing armed; sleep until unparked.
    Idle,
}

/// Body of the timer thread.
fn timer_loop(state: &TimerState, tx: &mpsc::Sender<Event>) {
    while !state.shutdown.load(AtomicOrdering::Acquire) {
        // Caution: the lock must not be held across the park, or `arm`
        // deadlocks.
        let wake = {
            let mut deadline = state
                .deadline
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            let now = Instant::now();
            match *deadline {
                Some(t) if t <= now => {
                    *deadline = None;
                    Wake::Fire
                }
                Some(t) => Wake::Wait(t.saturating_duration_since(now)),
                None => Wake::Idle,
            }
        };
        match wake {
            Wake::Fire => {
                if tx.send(Event::Settle).is_err() {
                    break;
                }
            }
            Wake::Wait(d) => thread::park_timeout(d),
            Wake::Idle => thread::park(),
        }
    }
}

impl Drop for SettleTimer {
    fn drop(&mut self) {
        self.state.shutdown.store(true, AtomicOrdering::Release);
        if let Some(h) = self.handle.take() {
            h.thread().unpark();
            if h.join().is_err() {
                tracing::warn!("settle timer thread panicked");
            }
        }
    }
}
