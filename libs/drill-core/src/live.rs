//! Runs a [`SessionMachine`] against real time.
//!
//! Two background tasks exist per session: a periodic ticker feeding the
//! countdown, and at most one delayed advance out of the checking phase.
//! Both hold only weak references, and both are aborted on restart and
//! close so nothing stale can fire against a fresh session.

use crate::session::{AdvanceTicket, Phase, SessionMachine, SessionState};
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

struct Inner {
    machine: SessionMachine,
    ticker: Option<JoinHandle<()>>,
    advance: Option<(AdvanceTicket, JoinHandle<()>)>,
    closed: bool,
}

impl Inner {
    fn abort_tasks(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
        }
        if let Some((_, task)) = self.advance.take() {
            task.abort();
        }
    }
}

/// A session whose timer and result delay run on the tokio runtime.
pub struct LiveSession {
    inner: Arc<Mutex<Inner>>,
}

impl LiveSession {
    /// Take ownership of `machine` and start its ticker.
    ///
    /// Must be called from within a tokio runtime.
    pub async fn start(machine: SessionMachine) -> Self {
        let inner = Arc::new(Mutex::new(Inner {
            machine,
            ticker: None,
            advance: None,
            closed: false,
        }));
        {
            let mut guard = inner.lock().await;
            spawn_ticker(&inner, &mut guard);
        }
        Self { inner }
    }

    pub async fn state(&self) -> SessionState {
        self.inner.lock().await.machine.state().clone()
    }

    pub async fn current_hint(&self) -> Option<String> {
        self.inner.lock().await.machine.current_hint()
    }

    pub async fn subscribe<F>(&self, callback: F)
    where
        F: Fn(&SessionState) + Send + Sync + 'static,
    {
        self.inner.lock().await.machine.subscribe(callback);
    }

    pub async fn submit(&self, input: &str) -> SessionState {
        let mut guard = self.inner.lock().await;
        guard.machine.submit(input);
        schedule_advance(&self.inner, &mut guard);
        guard.machine.state().clone()
    }

    pub async fn skip(&self) -> SessionState {
        let mut guard = self.inner.lock().await;
        guard.machine.skip();
        schedule_advance(&self.inner, &mut guard);
        guard.machine.state().clone()
    }

    pub async fn request_hint(&self) -> SessionState {
        let mut guard = self.inner.lock().await;
        guard.machine.request_hint().clone()
    }

    /// Treat the current word as timed out right away.
    pub async fn on_timer_expire(&self) -> SessionState {
        let mut guard = self.inner.lock().await;
        guard.machine.on_timer_expire();
        schedule_advance(&self.inner, &mut guard);
        guard.machine.state().clone()
    }

    /// Stop both tasks, reset the machine and start ticking again.
    pub async fn restart(&self) -> SessionState {
        let mut guard = self.inner.lock().await;
        guard.abort_tasks();
        guard.machine.restart();
        guard.closed = false;
        spawn_ticker(&self.inner, &mut guard);
        guard.machine.state().clone()
    }

    /// Stop all background work. Further events still reach the machine
    /// but nothing advances on its own.
    pub async fn close(&self) {
        let mut guard = self.inner.lock().await;
        guard.abort_tasks();
        guard.closed = true;
        tracing::debug!("live session closed");
    }
}

impl Drop for LiveSession {
    fn drop(&mut self) {
        if let Ok(mut guard) = self.inner.try_lock() {
            guard.abort_tasks();
        }
    }
}

/// Start ticking one full period from now, replacing any running ticker.
fn spawn_ticker(shared: &Arc<Mutex<Inner>>, inner: &mut Inner) {
    if let Some(ticker) = inner.ticker.take() {
        ticker.abort();
    }
    if inner.machine.config().time_limit_secs.is_none() || inner.machine.phase() == Phase::Completed
    {
        return;
    }
    let period = Duration::from_millis(inner.machine.config().tick_ms);
    let weak = Arc::downgrade(shared);
    inner.ticker = Some(tokio::spawn(tick_loop(weak, period)));
}

async fn tick_loop(weak: Weak<Mutex<Inner>>, period: Duration) {
    let mut interval = interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        interval.tick().await;
        let Some(shared) = weak.upgrade() else {
            break;
        };
        let mut guard = shared.lock().await;
        guard.machine.tick();
        schedule_advance(&shared, &mut guard);
        if guard.machine.phase() == Phase::Completed {
            guard.ticker = None;
            break;
        }
    }
}

/// Spawn the delayed advance for the machine's pending ticket, once.
fn schedule_advance(shared: &Arc<Mutex<Inner>>, inner: &mut Inner) {
    if inner.closed {
        return;
    }
    let Some(ticket) = inner.machine.pending_advance() else {
        return;
    };
    if matches!(&inner.advance, Some((scheduled, _)) if *scheduled == ticket) {
        return;
    }
    if let Some((_, stale)) = inner.advance.take() {
        stale.abort();
    }

    let delay = inner.machine.result_display_delay();
    let weak = Arc::downgrade(shared);
    let task = tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        let Some(shared) = weak.upgrade() else {
            return;
        };
        let mut guard = shared.lock().await;
        if matches!(&guard.advance, Some((scheduled, _)) if *scheduled == ticket) {
            guard.advance = None;
        }
        guard.machine.advance(ticket);
        // each word's countdown starts on a fresh tick boundary
        if guard.machine.phase() == Phase::Active {
            spawn_ticker(&shared, &mut guard);
        }
    });
    inner.advance = Some((ticket, task));
}
