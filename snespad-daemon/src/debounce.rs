//! Per-button debounce logic.
//!
//! Each button runs an independent three-phase machine over the stream of
//! per-frame pressed samples:
//!
//! - `Idle`: counting consecutive pressed frames; firing requires
//!   `press_frames` in a row, so a single glitchy sample resets the count.
//! - `Cooldown`: dead time after a fire; all samples are ignored until the
//!   deadline passes.
//! - `WaitRelease`: counting consecutive released frames; re-arming
//!   requires `release_frames` in a row, so release bounce cannot re-arm
//!   early.
//!
//! Exactly one fire is emitted per Idle→Cooldown transition, which gives
//! at most one fire per physical press-and-release cycle.

use std::time::{Duration, Instant};

use snespad_buttons::ButtonId;

/// Consecutive pressed frames required to fire.
pub const PRESS_FRAMES: u32 = 4;
/// Consecutive released frames required to re-arm.
pub const RELEASE_FRAMES: u32 = 4;
/// Dead time after a fire, in milliseconds.
pub const COOLDOWN_MS: u64 = 400;

/// A debounced button press, emitted at most once per physical press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FiredEvent {
    pub button: ButtonId,
    pub at: Instant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Cooldown { until: Instant },
    WaitRelease,
}

/// Debounce machine for a single button.
#[derive(Debug, Clone, Copy)]
pub struct Debouncer {
    phase: Phase,
    counter: u32,
    press_frames: u32,
    release_frames: u32,
    cooldown: Duration,
}

impl Debouncer {
    pub fn new() -> Self {
        Self::with_thresholds(
            PRESS_FRAMES,
            RELEASE_FRAMES,
            Duration::from_millis(COOLDOWN_MS),
        )
    }

    pub fn with_thresholds(press_frames: u32, release_frames: u32, cooldown: Duration) -> Self {
        Self {
            phase: Phase::Idle,
            counter: 0,
            press_frames,
            release_frames,
            cooldown,
        }
    }

    /// Feed one frame's pressed sample. Returns true when the button
    /// fires on this frame.
    ///
    /// A frame that expires the cooldown only performs the
    /// Cooldown→WaitRelease transition; its pressed sample is not also
    /// counted toward release.
    pub fn update(&mut self, pressed: bool, now: Instant) -> bool {
        match self.phase {
            Phase::Idle => {
                if pressed {
                    self.counter += 1;
                    if self.counter >= self.press_frames {
                        self.counter = 0;
                        self.phase = Phase::Cooldown {
                            until: now + self.cooldown,
                        };
                        return true;
                    }
                } else {
                    self.counter = 0;
                }
            }
            Phase::Cooldown { until } => {
                if now >= until {
                    self.phase = Phase::WaitRelease;
                    self.counter = 0;
                }
            }
            Phase::WaitRelease => {
                if !pressed {
                    self.counter += 1;
                    if self.counter >= self.release_frames {
                        self.phase = Phase::Idle;
                        self.counter = 0;
                    }
                } else {
                    self.counter = 0;
                }
            }
        }
        false
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new()
    }
}
