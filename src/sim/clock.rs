use crate::host::TimerId;

struct Scheduled {
    id: TimerId,
    due_at: u64,
    order: u64,
    callback: Box<dyn FnOnce()>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingTimer {
    pub id: TimerId,
    pub due_at: u64,
}

/// Virtual time plus the queue of one-shot timers waiting on it.
#[derive(Default)]
pub(crate) struct Clock {
    now_ms: u64,
    next_id: u64,
    next_order: u64,
    queue: Vec<Scheduled>,
}

impl Clock {
    pub(crate) fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub(crate) fn set_now(&mut self, now_ms: u64) {
        self.now_ms = self.now_ms.max(now_ms);
    }

    pub(crate) fn schedule(&mut self, delay_ms: u32, callback: Box<dyn FnOnce()>) -> TimerId {
        self.next_id += 1;
        self.next_order += 1;
        let id = TimerId(self.next_id);
        self.queue.push(Scheduled {
            id,
            due_at: self.now_ms + u64::from(delay_ms),
            order: self.next_order,
            callback,
        });
        id
    }

    pub(crate) fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.queue.len();
        self.queue.retain(|t| t.id != id);
        self.queue.len() != before
    }

    /// Remove and return the earliest timer due at or before `limit`.
    pub(crate) fn pop_due(&mut self, limit: u64) -> Option<(u64, Box<dyn FnOnce()>)> {
        let idx = self
            .queue
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due_at <= limit)
            .min_by_key(|(_, t)| (t.due_at, t.order))
            .map(|(i, _)| i)?;
        let task = self.queue.remove(idx);
        Some((task.due_at, task.callback))
    }

    pub(crate) fn pending(&self) -> Vec<PendingTimer> {
        let mut out: Vec<(u64, PendingTimer)> = self
            .queue
            .iter()
            .map(|t| {
                (
                    t.order,
                    PendingTimer {
                        id: t.id,
                        due_at: t.due_at,
                    },
                )
            })
            .collect();
        out.sort_by_key(|(order, p)| (p.due_at, *order));
        out.into_iter().map(|(_, p)| p).collect()
    }
}
