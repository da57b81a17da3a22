//! Timer contract, a virtual-clock host for tests, and a keyed debouncer.

use std::{cell::RefCell, collections::HashMap, rc::Rc, time::Duration};

/// Host service that runs a task once after a delay.
///
/// Implementations run on the single UI thread; tasks are never invoked re-entrantly from
/// [`TimerHost::schedule`] itself.
pub trait TimerHost {
    /// Opaque handle used to cancel a scheduled task.
    type Handle: 'static;

    /// Schedules `task` to run once after `delay`.
    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) -> Self::Handle;

    /// Cancels a scheduled task. Cancelling a task that already ran is a no-op.
    fn cancel(&self, handle: Self::Handle);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
/// Handle returned by [`ManualTimerHost`].
pub struct ManualTimerId(u64);

struct ManualTask {
    id: ManualTimerId,
    due: Duration,
    task: Box<dyn FnOnce()>,
}

#[derive(Default)]
struct ManualClock {
    now: Duration,
    next_id: u64,
    tasks: Vec<ManualTask>,
}

#[derive(Clone, Default)]
/// Virtual-clock timer host. Tasks only run when [`ManualTimerHost::advance`] moves time past
/// their deadline.
pub struct ManualTimerHost {
    clock: Rc<RefCell<ManualClock>>,
}

impl ManualTimerHost {
    /// Current virtual time since the host was created.
    pub fn now(&self) -> Duration {
        self.clock.borrow().now
    }

    /// Number of scheduled tasks that have not run or been cancelled.
    pub fn pending(&self) -> usize {
        self.clock.borrow().tasks.len()
    }

    /// Moves virtual time forward, running due tasks in deadline order.
    ///
    /// Tasks scheduled by a running task are eligible in the same call if they fall due before
    /// the target time.
    pub fn advance(&self, by: Duration) {
        let target = self.clock.borrow().now + by;
        loop {
            let next = {
                let mut clock = self.clock.borrow_mut();
                let position = clock
                    .tasks
                    .iter()
                    .enumerate()
                    .filter(|(_, task)| task.due <= target)
                    .min_by_key(|(_, task)| (task.due, task.id))
                    .map(|(index, _)| index);
                position.map(|index| {
                    let task = clock.tasks.remove(index);
                    clock.now = clock.now.max(task.due);
                    task
                })
            };
            match next {
                Some(task) => (task.task)(),
                None => break,
            }
        }
        self.clock.borrow_mut().now = target;
    }
}

impl TimerHost for ManualTimerHost {
    type Handle = ManualTimerId;

    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) -> Self::Handle {
        let mut clock = self.clock.borrow_mut();
        clock.next_id += 1;
        let id = ManualTimerId(clock.next_id);
        let due = clock.now + delay;
        clock.tasks.push(ManualTask { id, due, task });
        id
    }

    fn cancel(&self, handle: Self::Handle) {
        self.clock.borrow_mut().tasks.retain(|task| task.id != handle);
    }
}

/// Per-key debouncer: scheduling a key replaces that key's pending task and leaves other keys
/// untouched. All pending tasks are cancelled when the debouncer is dropped.
pub struct Debouncer<H: TimerHost> {
    host: H,
    delay: Duration,
    pending: Rc<RefCell<HashMap<String, H::Handle>>>,
}

impl<H: TimerHost> Debouncer<H> {
    /// Creates a debouncer that delays each task by `delay`.
    pub fn new(host: H, delay: Duration) -> Self {
        Self {
            host,
            delay,
            pending: Rc::new(RefCell::new(HashMap::new())),
        }
    }

    /// Debounce delay.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedules `task` under `key`, cancelling the task previously pending for the same key.
    pub fn schedule(&self, key: &str, task: impl FnOnce() + 'static) {
        self.cancel(key);

        let pending = Rc::clone(&self.pending);
        let fired_key = key.to_string();
        let handle = self.host.schedule(
            self.delay,
            Box::new(move || {
                pending.borrow_mut().remove(&fired_key);
                task();
            }),
        );
        self.pending.borrow_mut().insert(key.to_string(), handle);
    }

    /// Cancels the pending task for `key`, if any. Returns whether a task was cancelled.
    pub fn cancel(&self, key: &str) -> bool {
        let previous = self.pending.borrow_mut().remove(key);
        match previous {
            Some(handle) => {
                self.host.cancel(handle);
                true
            }
            None => false,
        }
    }

    /// Cancels every pending task.
    pub fn cancel_all(&self) {
        let drained: Vec<_> = self.pending.borrow_mut().drain().collect();
        for (_, handle) in drained {
            self.host.cancel(handle);
        }
    }

    /// Whether `key` has a pending task.
    pub fn is_pending(&self, key: &str) -> bool {
        self.pending.borrow().contains_key(key)
    }

    /// Keys with pending tasks, in no particular order.
    pub fn pending_keys(&self) -> Vec<String> {
        self.pending.borrow().keys().cloned().collect()
    }
}

impl<H: TimerHost> Drop for Debouncer<H> {
    fn drop(&mut self) {
        self.cancel_all();
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use pretty_assertions::assert_eq;

    use super::*;

    fn counter() -> (Rc<Cell<u32>>, impl Fn() -> Box<dyn FnOnce()>) {
        let count = Rc::new(Cell::new(0));
        let make = {
            let count = Rc::clone(&count);
            move || {
                let count = Rc::clone(&count);
                Box::new(move || count.set(count.get() + 1)) as Box<dyn FnOnce()>
            }
        };
        (count, make)
    }

    #[test]
    fn manual_host_runs_tasks_only_after_deadline() {
        let host = ManualTimerHost::default();
        let (count, make) = counter();
        host.schedule(Duration::from_millis(300), make());

        host.advance(Duration::from_millis(299));
        assert_eq!(count.get(), 0);
        host.advance(Duration::from_millis(1));
        assert_eq!(count.get(), 1);
        assert_eq!(host.pending(), 0);
        assert_eq!(host.now(), Duration::from_millis(300));
    }

    #[test]
    fn manual_host_cancel_prevents_run() {
        let host = ManualTimerHost::default();
        let (count, make) = counter();
        let handle = host.schedule(Duration::from_millis(10), make());
        host.cancel(handle);
        host.advance(Duration::from_secs(1));
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn debouncer_coalesces_per_key() {
        let host = ManualTimerHost::default();
        let debouncer = Debouncer::new(host.clone(), Duration::from_millis(500));
        let fired = Rc::new(RefCell::new(Vec::<String>::new()));

        for value in ["a", "ab", "abc"] {
            let fired = Rc::clone(&fired);
            let value = value.to_string();
            debouncer.schedule("q", move || fired.borrow_mut().push(value));
            host.advance(Duration::from_millis(100));
        }
        assert!(debouncer.is_pending("q"));

        host.advance(Duration::from_millis(500));
        assert_eq!(*fired.borrow(), vec!["abc".to_string()]);
        assert!(!debouncer.is_pending("q"));
    }

    #[test]
    fn debouncer_keys_have_independent_timers() {
        let host = ManualTimerHost::default();
        let debouncer = Debouncer::new(host.clone(), Duration::from_millis(500));
        let (count, _) = counter();

        let a = Rc::clone(&count);
        debouncer.schedule("a", move || a.set(a.get() + 1));
        host.advance(Duration::from_millis(400));
        let b = Rc::clone(&count);
        debouncer.schedule("b", move || b.set(b.get() + 10));

        host.advance(Duration::from_millis(100));
        assert_eq!(count.get(), 1);
        host.advance(Duration::from_millis(400));
        assert_eq!(count.get(), 11);
    }

    #[test]
    fn dropping_debouncer_cancels_pending_tasks() {
        let host = ManualTimerHost::default();
        let (count, _) = counter();
        {
            let debouncer = Debouncer::new(host.clone(), Duration::from_millis(50));
            let count = Rc::clone(&count);
            debouncer.schedule("x", move || count.set(1));
            assert_eq!(host.pending(), 1);
        }
        assert_eq!(host.pending(), 0);
        host.advance(Duration::from_secs(1));
        assert_eq!(count.get(), 0);
    }
}
