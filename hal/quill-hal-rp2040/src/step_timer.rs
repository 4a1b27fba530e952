//! Step pulse generator
//!
//! Plays the role of a hardware auto-reload timer: it fires every
//! `period + 1` ticks of a 1 MHz clock and calls back into the step
//! scheduler, which returns the period for the next tick or asks to stop.
//!
//! The generator runs inside the high-priority interrupt executor. Deadlines
//! are absolute (`Timer::at`), so time spent in the callback does not
//! stretch the period.
//!
//! # Sharing
//!
//! One static instance is shared by three parties:
//!
//! - the motion executor programs the first period and starts it,
//! - the step-pulse task runs [`StepTimer::run_until_stopped`],
//! - the kill switch stops it.

use embassy_futures::select::{select, Either};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embassy_time::{Duration, Instant, Timer};
use portable_atomic::{AtomicBool, AtomicU32, Ordering};
use quill_core::traits::PulseTimer;

/// Tick rate that periods are expressed in
pub const TIMER_TICK_HZ: u32 = 1_000_000;

/// Periodic step generator
pub struct StepTimer {
    running: AtomicBool,
    period: AtomicU32,
    wake: Signal<CriticalSectionRawMutex, ()>,
}

impl Default for StepTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl StepTimer {
    pub const fn new() -> Self {
        Self {
            running: AtomicBool::new(false),
            period: AtomicU32::new(0),
            wake: Signal::new(),
        }
    }

    /// Wall time between two ticks for a period value
    ///
    /// A period of `n` spans `n + 1` timer ticks.
    pub fn tick_duration(period: u32) -> Duration {
        let ticks = u64::from(period) + 1;
        Duration::from_micros(ticks * 1_000_000 / u64::from(TIMER_TICK_HZ))
    }

    /// Tick until the callback returns `None` or the generator is stopped
    ///
    /// Waits for [`PulseTimer::start`] first. Returns true if the callback
    /// ended the run, false if [`PulseTimer::stop`] did.
    pub async fn run_until_stopped<F>(&self, mut on_tick: F) -> bool
    where
        F: FnMut() -> Option<u32>,
    {
        while !self.is_running() {
            self.wake.wait().await;
        }

        let mut deadline = Instant::now();
        loop {
            deadline += Self::tick_duration(self.period.load(Ordering::Relaxed));

            // Sleep until the deadline, waking early only to observe a stop
            loop {
                match select(Timer::at(deadline), self.wake.wait()).await {
                    Either::First(()) => break,
                    Either::Second(()) => {
                        if !self.is_running() {
                            return false;
                        }
                    }
                }
            }

            if !self.is_running() {
                return false;
            }

            match on_tick() {
                Some(period) => self.set_period(period),
                None => {
                    self.running.store(false, Ordering::Release);
                    return true;
                }
            }
        }
    }
}

impl PulseTimer for StepTimer {
    fn set_period(&self, period: u32) {
        self.period.store(period, Ordering::Relaxed);
    }

    fn start(&self) {
        self.running.store(true, Ordering::Release);
        self.wake.signal(());
    }

    fn stop(&self) {
        self.running.store(false, Ordering::Release);
        self.wake.signal(());
    }

    fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }
}
