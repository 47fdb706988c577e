//! Virtual playback clock over a bounded (or unbounded) logical timeline.
//!
//! Logical time is decoupled from wall time with an anchor-and-offset scheme:
//! - paused: the logical time is stored directly
//! - playing: `current_time = (now - anchor) / 1000`, derived on every read
//!
//! `current_time()` is always clamped to `[0, duration]`. "Ended" is derived
//! (`current_time() >= duration` for a finite duration), never stored.
//!
//! A single end-of-timeline timer is armed on `play`/`seek` while playing and
//! cancelled on `pause`; it is a deadline owned by the clock and fires from
//! [`PlaybackClock::poll`]. Every state-changing call first fires a due timer,
//! so `end` is observed exactly once and ahead of later transitions.

use std::fmt;

use log::debug;

use crate::config::ClockConfig;
use crate::error::ParamFlowError;
use crate::events::ClockEvent;
use crate::ids::{IdAllocator, ListenerId};
use crate::time::{MonotonicTimeSource, TimeSource};
use crate::Result;

type Listener = Box<dyn FnMut(&ClockEvent)>;

/// One-shot end-of-timeline deadline in wall milliseconds.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
struct EndTimer {
    deadline_ms: Option<f64>,
}

impl EndTimer {
    /// Cancel any pending deadline and schedule a new one `delay_secs` from `now_ms`.
    #[inline]
    fn arm(&mut self, now_ms: f64, delay_secs: f64) {
        self.deadline_ms = if delay_secs.is_finite() {
            Some(now_ms + delay_secs.max(0.0) * 1000.0)
        } else {
            None
        };
    }

    #[inline]
    fn cancel(&mut self) {
        self.deadline_ms = None;
    }

    #[inline]
    fn is_due(&self, now_ms: f64) -> bool {
        self.deadline_ms.is_some_and(|d| now_ms >= d)
    }
}

/// Pausable, seekable timeline clock emitting `play`/`pause`/`seek`/`end`.
pub struct PlaybackClock<S: TimeSource = MonotonicTimeSource> {
    source: S,
    duration: f64,
    paused: bool,
    anchor_wall_ms: Option<f64>,
    /// Logical time while paused.
    logical_time: f64,
    end_timer: EndTimer,
    ids: IdAllocator,
    listeners: Vec<(ListenerId, Listener)>,
}

impl<S: TimeSource> fmt::Debug for PlaybackClock<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlaybackClock")
            .field("duration", &self.duration)
            .field("paused", &self.paused)
            .field("anchor_wall_ms", &self.anchor_wall_ms)
            .field("logical_time", &self.logical_time)
            .field("end_timer", &self.end_timer)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl PlaybackClock<MonotonicTimeSource> {
    /// Clock driven by the monotonic wall clock.
    pub fn with_duration(duration: f64) -> Result<Self> {
        Self::new(duration, MonotonicTimeSource::new())
    }
}

impl<S: TimeSource> PlaybackClock<S> {
    /// Paused clock at time 0. `duration` may be `f64::INFINITY`.
    pub fn new(duration: f64, source: S) -> Result<Self> {
        if duration.is_nan() || duration < 0.0 {
            return Err(ParamFlowError::InvalidDuration { duration });
        }
        Ok(Self {
            source,
            duration,
            paused: true,
            anchor_wall_ms: None,
            logical_time: 0.0,
            end_timer: EndTimer::default(),
            ids: IdAllocator::new(),
            listeners: Vec::new(),
        })
    }

    pub fn with_config(cfg: &ClockConfig, source: S) -> Result<Self> {
        Self::new(cfg.duration, source)
    }

    #[inline]
    pub fn duration(&self) -> f64 {
        self.duration
    }

    #[inline]
    pub fn paused(&self) -> bool {
        self.paused
    }

    #[inline]
    pub fn is_playing(&self) -> bool {
        !self.paused
    }

    #[inline]
    pub fn time_source(&self) -> &S {
        &self.source
    }

    /// Logical time in seconds, clamped to `[0, duration]`.
    pub fn current_time(&self) -> f64 {
        let raw = match (self.paused, self.anchor_wall_ms) {
            (false, Some(anchor)) => (self.source.now_ms() - anchor) / 1000.0,
            _ => self.logical_time,
        };
        raw.clamp(0.0, self.duration)
    }

    /// Derived end condition; never true for an unbounded timeline.
    #[inline]
    pub fn is_ended(&self) -> bool {
        self.duration.is_finite() && self.current_time() >= self.duration
    }

    /// Fraction of the timeline elapsed; `0.0` for zero or unbounded durations.
    pub fn progress(&self) -> f64 {
        if self.duration.is_finite() && self.duration > 0.0 {
            self.current_time() / self.duration
        } else {
            0.0
        }
    }

    /// Register a listener for every clock event.
    pub fn subscribe<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&ClockEvent) + 'static,
    {
        let id = self.ids.alloc_listener();
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener; returns whether it was registered.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        self.listeners.len() != before
    }

    fn emit(&mut self, event: ClockEvent) {
        debug!("clock: {}", event.name());
        for (_, listener) in self.listeners.iter_mut() {
            listener(&event);
        }
    }

    fn arm_end_timer(&mut self) {
        let remaining = self.duration - self.current_time();
        let now = self.source.now_ms();
        self.end_timer.arm(now, remaining);
    }

    /// Fire the end-of-timeline timer if it is due.
    ///
    /// Call once per host tick. Returns whether `end` was emitted.
    pub fn poll(&mut self) -> bool {
        if !self.end_timer.is_due(self.source.now_ms()) {
            return false;
        }
        self.end_timer.cancel();
        self.paused = true;
        self.anchor_wall_ms = None;
        self.logical_time = self.duration;
        self.emit(ClockEvent::End);
        true
    }

    /// Start playback from the current logical time.
    ///
    /// No-op when already playing or when the timeline has ended.
    pub fn play(&mut self) {
        self.poll();
        if !self.paused {
            return;
        }
        if self.current_time() >= self.duration {
            debug!("clock: play ignored at end of timeline");
            return;
        }
        let logical = self.current_time();
        self.anchor_wall_ms = Some(self.source.now_ms() - logical * 1000.0);
        self.paused = false;
        self.emit(ClockEvent::Play);
        self.arm_end_timer();
    }

    /// Freeze the logical time. No-op when already paused.
    pub fn pause(&mut self) {
        self.poll();
        if self.paused {
            return;
        }
        self.logical_time = self.current_time();
        self.anchor_wall_ms = None;
        self.paused = true;
        self.emit(ClockEvent::Pause);
        self.end_timer.cancel();
    }

    /// Jump to `time` (clamped to `[0, duration]`), keeping the play state.
    ///
    /// Fails with `InvalidSeekTarget` for NaN or infinite targets, before any
    /// state changes.
    pub fn seek(&mut self, time: f64) -> Result<()> {
        if !time.is_finite() {
            return Err(ParamFlowError::InvalidSeekTarget { time });
        }
        self.poll();
        let target = time.clamp(0.0, self.duration);

        if !self.paused && self.is_ended() {
            self.logical_time = self.duration;
            self.anchor_wall_ms = None;
            self.paused = true;
            self.end_timer.cancel();
        }

        if self.paused {
            self.logical_time = target;
        } else {
            self.anchor_wall_ms = Some(self.source.now_ms() - target * 1000.0);
        }
        self.emit(ClockEvent::Seek { time: target });

        self.end_timer.cancel();
        if !self.paused {
            self.arm_end_timer();
        }
        Ok(())
    }

    /// Play when paused, pause when playing.
    pub fn toggle(&mut self) {
        self.poll();
        if self.paused {
            self.play();
        } else {
            self.pause();
        }
    }

    /// Pause and return to the start of the timeline.
    pub fn rewind(&mut self) {
        self.pause();
        // 0.0 is always a valid target.
        let _ = self.seek(0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timer_rearm_replaces_deadline() {
        let mut timer = EndTimer::default();
        timer.arm(0.0, 2.0);
        timer.arm(500.0, 1.0);
        assert!(!timer.is_due(1499.0));
        assert!(timer.is_due(1500.0));
        timer.cancel();
        assert!(!timer.is_due(1e9));
    }

    #[test]
    fn unbounded_timer_never_arms() {
        let mut timer = EndTimer::default();
        timer.arm(0.0, f64::INFINITY);
        assert_eq!(timer.deadline_ms, None);
    }
}
