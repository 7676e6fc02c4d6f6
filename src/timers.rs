//! Cancellable deferred callbacks.
//!
//! A [`TimerToken`] follows one logical delay chain (for alerts: fade, then
//! remove). Each stage is scheduled through the token, so cancelling it clears
//! whichever host timer is pending at that moment and stops later stages from
//! being scheduled at all.

use std::cell::Cell;
use std::rc::Rc;

use crate::host::{TimerId, Timers};

#[derive(Debug, Default)]
struct TokenState {
    cancelled: Cell<bool>,
    pending: Cell<Option<TimerId>>,
}

#[derive(Debug, Clone, Default)]
pub struct TimerToken {
    state: Rc<TokenState>,
}

impl TimerToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_cancelled(&self) -> bool {
        self.state.cancelled.get()
    }

    /// Whether a stage is scheduled and has not fired yet.
    pub fn is_pending(&self) -> bool {
        self.state.pending.get().is_some()
    }

    /// Schedule `f` after `delay_ms` unless the token has been cancelled.
    ///
    /// A token tracks one pending stage; scheduling again replaces the tracked
    /// timer and clears the previous one.
    pub fn schedule<H, F>(&self, host: &Rc<H>, delay_ms: u32, f: F)
    where
        H: Timers,
        F: FnOnce() + 'static,
    {
        if self.is_cancelled() {
            return;
        }
        if let Some(prev) = self.state.pending.take() {
            host.clear_timeout(prev);
        }

        let state = Rc::clone(&self.state);
        let id = host.set_timeout(
            delay_ms,
            Box::new(move || {
                state.pending.set(None);
                if !state.cancelled.get() {
                    f();
                }
            }),
        );
        // Hosts never fire synchronously, so the callback cannot have run yet.
        self.state.pending.set(Some(id));
    }

    /// Returns `true` if a stage was still pending.
    pub fn cancel<H: Timers + ?Sized>(&self, host: &H) -> bool {
        self.state.cancelled.set(true);
        match self.state.pending.take() {
            Some(id) => {
                host.clear_timeout(id);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::MemoryHost;
    use std::cell::RefCell;

    #[test]
    fn stages_run_in_order_and_token_settles() {
        let host = Rc::new(MemoryHost::new());
        let log = Rc::new(RefCell::new(Vec::new()));
        let token = TimerToken::new();

        let (h, l, t) = (Rc::clone(&host), Rc::clone(&log), token.clone());
        token.schedule(&host, 100, move || {
            l.borrow_mut().push(("first", h.now_ms()));
            let l2 = Rc::clone(&l);
            let h2 = Rc::clone(&h);
            t.schedule(&h, 50, move || l2.borrow_mut().push(("second", h2.now_ms())));
        });

        assert!(token.is_pending());
        host.advance(149);
        assert_eq!(*log.borrow(), vec![("first", 100)]);
        assert!(token.is_pending());
        host.advance(1);
        assert_eq!(*log.borrow(), vec![("first", 100), ("second", 150)]);
        assert!(!token.is_pending());
    }

    #[test]
    fn cancel_between_stages_stops_the_chain() {
        let host = Rc::new(MemoryHost::new());
        let fired = Rc::new(Cell::new(0u32));
        let token = TimerToken::new();

        let (h, f, t) = (Rc::clone(&host), Rc::clone(&fired), token.clone());
        token.schedule(&host, 10, move || {
            f.set(f.get() + 1);
            let f2 = Rc::clone(&f);
            t.schedule(&h, 10, move || f2.set(f2.get() + 1));
        });

        host.advance(10);
        assert_eq!(fired.get(), 1);
        assert!(token.cancel(&*host));
        host.advance(100);
        assert_eq!(fired.get(), 1);
        assert!(host.pending_timers().is_empty());
    }

    #[test]
    fn cancelled_token_refuses_new_stages() {
        let host = Rc::new(MemoryHost::new());
        let token = TimerToken::new();
        assert!(!token.cancel(&*host));
        token.schedule(&host, 5, || panic!("must not run"));
        assert!(host.pending_timers().is_empty());
        host.advance(10);
    }

    #[test]
    fn rescheduling_replaces_the_pending_stage() {
        let host = Rc::new(MemoryHost::new());
        let fired = Rc::new(Cell::new(0u32));
        let token = TimerToken::new();

        let f = Rc::clone(&fired);
        token.schedule(&host, 100, move || f.set(f.get() + 1));
        host.advance(60);
        let f = Rc::clone(&fired);
        token.schedule(&host, 100, move || f.set(f.get() + 10));

        host.advance(40);
        assert_eq!(fired.get(), 0);
        host.advance(60);
        assert_eq!(fired.get(), 10);
    }
}
