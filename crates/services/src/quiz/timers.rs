use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

/// Period of the elapsed-time counter.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Events posted by the session timers.
///
/// Each carries the generation it was scheduled under; anything older than
/// [`SessionTimers::generation`] was cancelled and must be ignored. A deferred
/// advance also carries its own token, so cancelling or rescheduling it
/// invalidates an event that was already queued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    Tick { generation: u64 },
    AdvanceDue { generation: u64, token: u64 },
}

impl TimerEvent {
    #[must_use]
    pub fn generation(&self) -> u64 {
        match self {
            TimerEvent::Tick { generation } | TimerEvent::AdvanceDue { generation, .. } => {
                *generation
            }
        }
    }
}

/// The per-session periodic ticker and one-shot deferred advance.
///
/// Both run as spawned tokio tasks that post into a channel owned here, so
/// every state mutation still happens on the controller that drains it.
/// Requires a tokio runtime for `start_ticker` and `schedule_advance`.
#[derive(Debug)]
pub struct SessionTimers {
    tx: mpsc::UnboundedSender<TimerEvent>,
    rx: mpsc::UnboundedReceiver<TimerEvent>,
    ticker: Option<JoinHandle<()>>,
    pending_advance: Option<JoinHandle<()>>,
    generation: u64,
    advance_token: u64,
    tick_period: Duration,
}

impl Default for SessionTimers {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionTimers {
    #[must_use]
    pub fn new() -> Self {
        Self::with_tick_period(TICK_PERIOD)
    }

    #[must_use]
    pub fn with_tick_period(tick_period: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            tx,
            rx,
            ticker: None,
            pending_advance: None,
            generation: 0,
            advance_token: 0,
            tick_period,
        }
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// False for events from cancelled timers, including a deferred advance
    /// that was cancelled or replaced after it had already fired.
    #[must_use]
    pub fn is_current(&self, event: TimerEvent) -> bool {
        match event {
            TimerEvent::Tick { generation } => generation == self.generation,
            TimerEvent::AdvanceDue { generation, token } => {
                generation == self.generation
                    && token == self.advance_token
                    && self.pending_advance.is_some()
            }
        }
    }

    #[must_use]
    pub fn is_ticking(&self) -> bool {
        self.ticker.is_some()
    }

    #[must_use]
    pub fn has_pending_advance(&self) -> bool {
        self.pending_advance.is_some()
    }

    /// Start the periodic ticker, replacing any previous one.
    pub fn start_ticker(&mut self) {
        if let Some(handle) = self.ticker.take() {
            handle.abort();
        }
        let tx = self.tx.clone();
        let generation = self.generation;
        let period = self.tick_period;
        self.ticker = Some(tokio::spawn(async move {
            let mut interval = time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if tx.send(TimerEvent::Tick { generation }).is_err() {
                    break;
                }
            }
        }));
    }

    /// Fire `AdvanceDue` once after `delay`, replacing any pending advance.
    pub fn schedule_advance(&mut self, delay: Duration) {
        self.cancel_advance();
        let tx = self.tx.clone();
        let generation = self.generation;
        let token = self.advance_token;
        self.pending_advance = Some(tokio::spawn(async move {
            time::sleep(delay).await;
            let _ = tx.send(TimerEvent::AdvanceDue { generation, token });
        }));
    }

    /// Drop a pending deferred advance without touching the ticker.
    ///
    /// An `AdvanceDue` already sitting in the channel stops being current.
    pub fn cancel_advance(&mut self) {
        if let Some(handle) = self.pending_advance.take() {
            handle.abort();
        }
        self.advance_token = self.advance_token.wrapping_add(1);
    }

    /// Stop both timers and invalidate every event already queued.
    pub fn cancel_all(&mut self) {
        self.cancel_advance();
        if let Some(handle) = self.ticker.take() {
            handle.abort();
        }
        self.generation = self.generation.wrapping_add(1);
        while self.rx.try_recv().is_ok() {}
    }

    /// Mark the one-shot advance as consumed once its event has been handled.
    pub fn advance_fired(&mut self) {
        self.pending_advance = None;
    }

    /// Wait for the next event. Pends forever when no timer is running.
    ///
    /// The channel never closes: `self` keeps a sender alive.
    pub async fn recv(&mut self) -> TimerEvent {
        match self.rx.recv().await {
            Some(event) => event,
            None => std::future::pending().await,
        }
    }
}

impl Drop for SessionTimers {
    fn drop(&mut self) {
        self.cancel_advance();
        if let Some(handle) = self.ticker.take() {
            handle.abort();
        }
    }
}
