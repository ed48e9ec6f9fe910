//! Timers that perform the waits between playback steps
//!
//! [`ChannelTimer`] sleeps for real but wakes as soon as it is cancelled.
//! [`ManualTimer`] only advances a virtual clock, which makes playback
//! deterministic in tests.

use std::time::Duration;

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender, TryRecvError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    Elapsed,
    Cancelled,
}

pub trait Timer {
    /// Wait for `duration` unless cancelled first.
    fn wait(&mut self, duration: Duration) -> WaitOutcome;

    /// Check for a pending cancellation without waiting.
    fn poll_cancelled(&mut self) -> bool {
        false
    }
}

/// Sending side of a [`ChannelTimer`]'s cancellation channel.
///
/// Dropping it cancels the timer too.
#[derive(Debug, Clone)]
pub struct CancelSignal {
    tx: Sender<()>,
}

impl CancelSignal {
    pub fn cancel(&self) {
        // A full buffer means a cancel is already pending
        let _ = self.tx.try_send(());
    }
}

/// Wall-clock timer, interruptible through its [`CancelSignal`]
#[derive(Debug)]
pub struct ChannelTimer {
    rx: Receiver<()>,
}

impl ChannelTimer {
    pub fn with_signal() -> (Self, CancelSignal) {
        let (tx, rx) = bounded(1);
        (Self { rx }, CancelSignal { tx })
    }
}

impl Timer for ChannelTimer {
    fn wait(&mut self, duration: Duration) -> WaitOutcome {
        match self.rx.recv_timeout(duration) {
            Err(RecvTimeoutError::Timeout) => WaitOutcome::Elapsed,
            Ok(()) | Err(RecvTimeoutError::Disconnected) => WaitOutcome::Cancelled,
        }
    }

    fn poll_cancelled(&mut self) -> bool {
        !matches!(self.rx.try_recv(), Err(TryRecvError::Empty))
    }
}

/// Virtual clock for tests
#[derive(Debug, Default, Clone)]
pub struct ManualTimer {
    elapsed: Duration,
    waits: Vec<Duration>,
    cancel_at: Option<Duration>,
}

impl ManualTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel the first wait that would run past `at`; the clock stops at `at`.
    pub fn cancel_at(at: Duration) -> Self {
        Self { cancel_at: Some(at), ..Self::default() }
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Every completed wait, in order.
    pub fn waits(&self) -> &[Duration] {
        &self.waits
    }
}

impl Timer for ManualTimer {
    fn wait(&mut self, duration: Duration) -> WaitOutcome {
        if let Some(at) = self.cancel_at {
            if self.elapsed + duration > at {
                self.elapsed = at;
                return WaitOutcome::Cancelled;
            }
        }
        self.elapsed = self.elapsed.saturating_add(duration);
        self.waits.push(duration);
        WaitOutcome::Elapsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn test_manual_timer_accumulates() {
        let mut timer = ManualTimer::new();
        assert_eq!(timer.wait(Duration::from_millis(200)), WaitOutcome::Elapsed);
        assert_eq!(timer.wait(Duration::from_millis(300)), WaitOutcome::Elapsed);
        assert_eq!(timer.elapsed(), Duration::from_millis(500));
        assert_eq!(timer.waits(), &[Duration::from_millis(200), Duration::from_millis(300)]);
    }

    #[test]
    fn test_manual_timer_cancel_at() {
        let mut timer = ManualTimer::cancel_at(Duration::from_millis(450));
        assert_eq!(timer.wait(Duration::from_millis(400)), WaitOutcome::Elapsed);
        assert_eq!(timer.wait(Duration::from_millis(100)), WaitOutcome::Cancelled);
        assert_eq!(timer.elapsed(), Duration::from_millis(450));
        assert_eq!(timer.waits().len(), 1);
    }

    #[test]
    fn test_channel_timer_elapses() {
        let (mut timer, _signal) = ChannelTimer::with_signal();
        assert_eq!(timer.wait(Duration::from_millis(5)), WaitOutcome::Elapsed);
        assert!(!timer.poll_cancelled());
    }

    #[test]
    fn test_channel_timer_wakes_on_cancel() {
        let (mut timer, signal) = ChannelTimer::with_signal();
        signal.cancel();
        signal.cancel();
        let started = Instant::now();
        assert_eq!(timer.wait(Duration::from_secs(30)), WaitOutcome::Cancelled);
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn test_channel_timer_cancelled_when_signal_dropped() {
        let (mut timer, signal) = ChannelTimer::with_signal();
        drop(signal);
        assert!(timer.poll_cancelled());
        assert_eq!(timer.wait(Duration::from_secs(30)), WaitOutcome::Cancelled);
    }
}
