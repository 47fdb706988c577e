/**
 * Wall-clock sources for the playback clock.
 * Native and WASM hosts both read time through `instant::Instant`;
 * offline renderers and tests drive a manual source instead.
 */
use std::cell::Cell;
use std::rc::Rc;

/// Millisecond wall clock read by [`crate::clock::PlaybackClock`].
pub trait TimeSource {
    /// Current wall time in milliseconds. Only differences are meaningful.
    fn now_ms(&self) -> f64;
}

impl<T: TimeSource + ?Sized> TimeSource for Rc<T> {
    #[inline]
    fn now_ms(&self) -> f64 {
        (**self).now_ms()
    }
}

impl<T: TimeSource + ?Sized> TimeSource for &T {
    #[inline]
    fn now_ms(&self) -> f64 {
        (**self).now_ms()
    }
}

/// Monotonic wall clock measured from construction.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicTimeSource {
    origin: instant::Instant,
}

impl MonotonicTimeSource {
    #[inline]
    pub fn new() -> Self {
        Self {
            origin: instant::Instant::now(),
        }
    }
}

impl Default for MonotonicTimeSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for MonotonicTimeSource {
    #[inline]
    fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

/// Manually advanced wall clock; clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualTimeSource {
    now: Rc<Cell<f64>>,
}

impl ManualTimeSource {
    #[inline]
    pub fn new(start_ms: f64) -> Self {
        Self {
            now: Rc::new(Cell::new(start_ms)),
        }
    }

    #[inline]
    pub fn set_ms(&self, now_ms: f64) {
        self.now.set(now_ms);
    }

    #[inline]
    pub fn advance_ms(&self, delta_ms: f64) {
        self.now.set(self.now.get() + delta_ms);
    }

    #[inline]
    pub fn advance_secs(&self, delta_secs: f64) {
        self.advance_ms(delta_secs * 1000.0);
    }
}

impl TimeSource for ManualTimeSource {
    #[inline]
    fn now_ms(&self) -> f64 {
        self.now.get()
    }
}
