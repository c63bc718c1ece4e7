//! Debounced render scheduling.
//!
//! Bursts of configuration changes collapse into one render: each
//! [`RenderScheduler::schedule`] call replaces the pending value and restarts
//! the quiet window, and [`RenderScheduler::poll`] hands the value back only
//! once the window has elapsed without another change. A superseded value is
//! dropped, never partially applied.
//!
//! Time is passed in as milliseconds (`performance.now()` on the web) so the
//! scheduler has no clock of its own.

/// Default quiet window before a scheduled render fires.
pub const DEFAULT_DEBOUNCE_MS: f64 = 300.0;

#[derive(Debug, Clone)]
struct Pending<T> {
    value: T,
    due_ms: f64,
}

/// Last-write-wins debounce over values of type `T`.
#[derive(Debug, Clone)]
pub struct RenderScheduler<T> {
    delay_ms: f64,
    pending: Option<Pending<T>>,
    generation: u64,
}

impl<T> Default for RenderScheduler<T> {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE_MS)
    }
}

impl<T> RenderScheduler<T> {
    /// A scheduler with the given quiet window. Negative or NaN delays
    /// fire on the next poll.
    pub fn new(delay_ms: f64) -> Self {
        let delay_ms = if delay_ms.is_nan() { 0.0 } else { delay_ms.max(0.0) };
        Self {
            delay_ms,
            pending: None,
            generation: 0,
        }
    }

    pub fn delay_ms(&self) -> f64 {
        self.delay_ms
    }

    /// Replace any pending value and restart the window from `now_ms`.
    ///
    /// Returns the generation number of the new request.
    pub fn schedule(&mut self, value: T, now_ms: f64) -> u64 {
        if self.pending.is_some() {
            log::trace!("render superseded (generation {})", self.generation);
        }
        self.generation += 1;
        self.pending = Some(Pending {
            value,
            due_ms: now_ms + self.delay_ms,
        });
        self.generation
    }

    /// Take the pending value if its window has elapsed.
    pub fn poll(&mut self, now_ms: f64) -> Option<T> {
        match &self.pending {
            Some(pending) if now_ms >= pending.due_ms => self.pending.take().map(|p| p.value),
            _ => None,
        }
    }

    /// Take the pending value regardless of the window.
    pub fn flush(&mut self) -> Option<T> {
        self.pending.take().map(|p| p.value)
    }

    /// Drop the pending value, if any.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// When the pending value becomes due, if there is one.
    pub fn due_at(&self) -> Option<f64> {
        self.pending.as_ref().map(|p| p.due_ms)
    }

    /// Number of `schedule` calls so far.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================
