use crate::dom::NodeId;

/// Cancellable reference to a scheduled one-shot timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct TimerHandle(i64);

impl TimerHandle {
    pub(crate) fn id(self) -> i64 {
        self.0
    }
}

#[derive(Debug, Clone)]
pub(crate) struct ScheduledTask<T> {
    pub(crate) id: i64,
    pub(crate) due_at: i64,
    pub(crate) order: i64,
    /// Element whose lifetime bounds the timer; `None` for page-level timers.
    pub(crate) owner: Option<NodeId>,
    pub(crate) payload: T,
}

#[derive(Debug, Clone)]
pub(crate) struct TimerQueue<T> {
    tasks: Vec<ScheduledTask<T>>,
    next_timer_id: i64,
    next_task_order: i64,
}

impl<T> TimerQueue<T> {
    pub(crate) fn new() -> Self {
        Self {
            tasks: Vec::new(),
            next_timer_id: 1,
            next_task_order: 0,
        }
    }

    pub(crate) fn schedule(
        &mut self,
        now_ms: i64,
        delay_ms: i64,
        owner: Option<NodeId>,
        payload: T,
    ) -> TimerHandle {
        let id = self.next_timer_id;
        self.next_timer_id += 1;
        let order = self.next_task_order;
        self.next_task_order += 1;
        self.tasks.push(ScheduledTask {
            id,
            due_at: now_ms.saturating_add(delay_ms.max(0)),
            order,
            owner,
            payload,
        });
        TimerHandle(id)
    }

    pub(crate) fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|task| task.id != handle.0);
        before != self.tasks.len()
    }

    /// Drops every owned timer whose owner fails `alive`.
    pub(crate) fn cancel_orphaned(&mut self, mut alive: impl FnMut(NodeId) -> bool) -> usize {
        let before = self.tasks.len();
        self.tasks
            .retain(|task| task.owner.is_none_or(|owner| alive(owner)));
        before - self.tasks.len()
    }

    pub(crate) fn clear(&mut self) -> usize {
        let cleared = self.tasks.len();
        self.tasks.clear();
        cleared
    }

    fn next_task_index(&self, due_limit: Option<i64>) -> Option<usize> {
        self.tasks
            .iter()
            .enumerate()
            .filter(|(_, task)| due_limit.is_none_or(|limit| task.due_at <= limit))
            .min_by_key(|(_, task)| (task.due_at, task.order))
            .map(|(idx, _)| idx)
    }

    pub(crate) fn pop_next(&mut self, due_limit: Option<i64>) -> Option<ScheduledTask<T>> {
        let idx = self.next_task_index(due_limit)?;
        Some(self.tasks.remove(idx))
    }

    pub(crate) fn peek_next(&self, due_limit: Option<i64>) -> Option<&ScheduledTask<T>> {
        self.next_task_index(due_limit).map(|idx| &self.tasks[idx])
    }

    pub(crate) fn tasks(&self) -> impl Iterator<Item = &ScheduledTask<T>> {
        self.tasks.iter()
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.tasks.len()
    }
}

/// Leading-edge throttle: at most one run per `limit_ms`, calls in between are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Throttle {
    limit_ms: i64,
    reopens_at: Option<i64>,
}

impl Throttle {
    pub fn new(limit_ms: i64) -> Self {
        Self {
            limit_ms: limit_ms.max(0),
            reopens_at: None,
        }
    }

    pub fn limit_ms(&self) -> i64 {
        self.limit_ms
    }

    /// Returns true when the call at `now_ms` should run.
    pub fn try_acquire(&mut self, now_ms: i64) -> bool {
        if self.reopens_at.is_some_and(|at| now_ms < at) {
            return false;
        }
        self.reopens_at = Some(now_ms.saturating_add(self.limit_ms));
        true
    }
}

/// Debounce driven by an external clock.
///
/// `trigger` reports whether a leading-edge call fires right away; `poll`
/// reports whether the trailing call fires once the quiet period has passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Debounce {
    wait_ms: i64,
    immediate: bool,
    deadline: Option<i64>,
}

impl Debounce {
    pub fn new(wait_ms: i64, immediate: bool) -> Self {
        Self {
            wait_ms: wait_ms.max(0),
            immediate,
            deadline: None,
        }
    }

    pub fn trigger(&mut self, now_ms: i64) -> bool {
        let call_now = self.immediate && self.deadline.is_none();
        self.deadline = Some(now_ms.saturating_add(self.wait_ms));
        call_now
    }

    pub fn poll(&mut self, now_ms: i64) -> bool {
        match self.deadline {
            Some(deadline) if now_ms >= deadline => {
                self.deadline = None;
                !self.immediate
            }
            _ => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queue_orders_by_due_time_then_insertion() {
        let mut queue = TimerQueue::new();
        queue.schedule(0, 50, None, "late");
        queue.schedule(0, 10, None, "first");
        queue.schedule(0, 10, None, "second");
        queue.schedule(0, -5, None, "clamped");

        let order = std::iter::from_fn(|| queue.pop_next(None).map(|task| task.payload))
            .collect::<Vec<_>>();
        assert_eq!(order, vec!["clamped", "first", "second", "late"]);
    }

    #[test]
    fn due_limit_holds_back_future_tasks() {
        let mut queue = TimerQueue::new();
        queue.schedule(100, 0, None, 1);
        queue.schedule(100, 1, None, 2);
        assert_eq!(queue.pop_next(Some(100)).map(|task| task.payload), Some(1));
        assert!(queue.pop_next(Some(100)).is_none());
        assert_eq!(queue.peek_next(None).map(|task| task.due_at), Some(101));
    }

    #[test]
    fn cancel_by_handle_and_by_owner_liveness() {
        let mut queue = TimerQueue::new();
        let kept = queue.schedule(0, 1, None, "page");
        let dropped = queue.schedule(0, 1, None, "cancelled");
        queue.schedule(0, 1, Some(NodeId::default()), "owned");

        assert!(queue.cancel(dropped));
        assert!(!queue.cancel(dropped));
        assert_eq!(queue.cancel_orphaned(|_| false), 1);
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.tasks().next().map(|task| task.id), Some(kept.id()));
    }

    #[test]
    fn throttle_drops_calls_inside_the_window() {
        let mut throttle = Throttle::new(16);
        assert!(throttle.try_acquire(0));
        assert!(!throttle.try_acquire(5));
        assert!(!throttle.try_acquire(15));
        assert!(throttle.try_acquire(16));
        assert!(!throttle.try_acquire(31));
        assert!(throttle.try_acquire(100));
    }

    #[test]
    fn trailing_debounce_fires_once_after_quiet_period() {
        let mut debounce = Debounce::new(100, false);
        assert!(!debounce.trigger(0));
        assert!(!debounce.trigger(50));
        assert!(!debounce.poll(120));
        assert!(debounce.poll(150));
        assert!(!debounce.poll(400));
        assert!(!debounce.is_pending());
    }

    #[test]
    fn leading_debounce_fires_on_first_trigger_of_a_burst() {
        let mut debounce = Debounce::new(100, true);
        assert!(debounce.trigger(0));
        assert!(!debounce.trigger(30));
        assert!(!debounce.poll(130));
        assert!(!debounce.is_pending());
        assert!(debounce.trigger(200));
    }
}
