// Delayed one-shot tasks
//
// Tasks are fire-and-forget: once scheduled they run after their delay and
// there is no way to cancel them. The payload is a typed command, so the
// owner decides what "running" a task means.

/// Identifier handed back when a task is scheduled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(u64);

#[derive(Debug, Clone)]
struct ScheduledTask<T> {
    /// Seconds left until the task fires
    remaining: f32,
    payload: T,
}

/// Queue of delayed tasks driven by simulation time
#[derive(Debug)]
pub struct Scheduler<T> {
    pending: Vec<ScheduledTask<T>>,
    next_id: u64,
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self {
            pending: Vec::new(),
            next_id: 0,
        }
    }

    /// Schedule `payload` to fire after `delay` seconds.
    /// Negative or non-finite delays fire on the next `advance`.
    pub fn schedule(&mut self, delay: f32, payload: T) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;

        let remaining = if delay.is_finite() { delay.max(0.0) } else { 0.0 };
        self.pending.push(ScheduledTask {
            remaining,
            payload,
        });
        id
    }

    /// Advance time by `dt` and return every task that came due, in the
    /// order they were scheduled
    pub fn advance(&mut self, dt: f32) -> Vec<T> {
        for task in &mut self.pending {
            task.remaining -= dt;
        }

        let (due, waiting): (Vec<_>, Vec<_>) = self
            .pending
            .drain(..)
            .partition(|task| task.remaining <= 0.0);
        self.pending = waiting;

        due.into_iter().map(|task| task.payload).collect()
    }

    /// Number of tasks still waiting
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_fires_after_delay() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(2.0, "reload");

        assert!(scheduler.advance(1.0).is_empty());
        assert!(scheduler.advance(0.5).is_empty());
        assert_eq!(scheduler.advance(0.5), vec!["reload"]);
        assert_eq!(scheduler.pending_count(), 0);
    }

    #[test]
    fn test_task_fires_once() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(0.1, 7);

        assert_eq!(scheduler.advance(1.0), vec![7]);
        assert!(scheduler.advance(1.0).is_empty());
    }

    #[test]
    fn test_due_tasks_keep_schedule_order() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(0.5, 'a');
        scheduler.schedule(0.2, 'b');
        scheduler.schedule(3.0, 'c');

        assert_eq!(scheduler.advance(1.0), vec!['a', 'b']);
        assert_eq!(scheduler.pending_count(), 1);
    }

    #[test]
    fn test_invalid_delay_fires_immediately() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(f32::NAN, 1);
        scheduler.schedule(-4.0, 2);

        assert_eq!(scheduler.advance(0.0), vec![1, 2]);
    }

    #[test]
    fn test_unique_ids() {
        let mut scheduler = Scheduler::new();
        let a = scheduler.schedule(1.0, ());
        let b = scheduler.schedule(1.0, ());
        assert_ne!(a, b);
    }
}
