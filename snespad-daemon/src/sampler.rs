//! Bus sampling: one frame of button samples per controller latch cycle.
//!
//! The console drives latch and clock itself; we only listen. A frame
//! starts with a rising-then-falling latch pulse, after which twelve data
//! bits are shifted out, one per clock pulse. The data line idles high
//! and goes low while a button is held (open-collector with pull-up), so
//! polarity is inverted here and downstream code only sees
//! pressed-booleans.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use snespad_buttons::{ButtonId, NUM_BUTTONS};

use crate::gpio::GpioRegisters;

/// BCM pin numbers of the three controller lines.
#[derive(Debug, Clone, Copy)]
pub struct PinAssignment {
    pub clock: u8,
    pub latch: u8,
    pub data: u8,
}

impl Default for PinAssignment {
    fn default() -> Self {
        Self {
            clock: 17,
            latch: 27,
            data: 22,
        }
    }
}

/// One complete read of all button lines, taken atomically per latch cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    pressed: [bool; NUM_BUTTONS],
    at: Instant,
}

impl Frame {
    /// Build a frame from raw data-line samples, applying the inverted
    /// polarity (line low = pressed).
    pub fn from_raw(raw: [bool; NUM_BUTTONS], at: Instant) -> Self {
        let mut pressed = [false; NUM_BUTTONS];
        for (p, bit) in pressed.iter_mut().zip(raw) {
            *p = !bit;
        }
        Self { pressed, at }
    }

    /// Build a frame directly from pressed-booleans (test sources).
    pub fn from_pressed(pressed: [bool; NUM_BUTTONS], at: Instant) -> Self {
        Self { pressed, at }
    }

    /// Whether the given button was held during this frame.
    pub fn pressed(&self, button: ButtonId) -> bool {
        self.pressed[button.index()]
    }

    /// When this frame finished reading.
    pub fn at(&self) -> Instant {
        self.at
    }
}

/// Anything that can produce frames. The run loop, debouncers, and
/// dispatcher only ever see this, so they can be driven by a scripted
/// source in tests.
pub trait FrameSource {
    /// Block until the next frame is available. `None` means a shutdown
    /// request was observed while waiting; no partial frame is ever
    /// returned.
    fn read_frame(&mut self) -> Option<Frame>;
}

/// The real sampler, spin-polling the GPIO level register.
pub struct BusSampler {
    gpio: GpioRegisters,
    pins: PinAssignment,
    shutdown: Arc<AtomicBool>,
}

impl BusSampler {
    /// Configure the three lines as inputs and build the sampler.
    pub fn new(gpio: GpioRegisters, pins: PinAssignment, shutdown: Arc<AtomicBool>) -> Self {
        gpio.set_input(pins.clock);
        gpio.set_input(pins.latch);
        gpio.set_input(pins.data);
        Self {
            gpio,
            pins,
            shutdown,
        }
    }

    fn shutting_down(&self) -> bool {
        self.shutdown.load(Ordering::Relaxed)
    }
}

impl FrameSource for BusSampler {
    /// Wait for a latch pulse, then clock out all twelve bits.
    ///
    /// Edge selection is load-bearing and deliberately not symmetric:
    /// for each bit we wait while clock reads high, sample data, then
    /// wait while clock reads low. Changing which transition the sample
    /// sits between would reorder bits without any visible failure.
    ///
    /// The shutdown flag is only polled during the latch wait. A clock
    /// line stuck mid-frame blocks indefinitely; that is the accepted
    /// hardware failure mode.
    fn read_frame(&mut self) -> Option<Frame> {
        // Latch pulse: rising edge, then falling edge.
        while !self.shutting_down() && !self.gpio.level(self.pins.latch) {}
        while !self.shutting_down() && self.gpio.level(self.pins.latch) {}
        if self.shutting_down() {
            return None;
        }

        let mut raw = [false; NUM_BUTTONS];
        for bit in raw.iter_mut() {
            while self.gpio.level(self.pins.clock) {}
            *bit = self.gpio.level(self.pins.data);
            while !self.gpio.level(self.pins.clock) {}
        }

        Some(Frame::from_raw(raw, Instant::now()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_inverts_polarity() {
        let mut raw = [true; NUM_BUTTONS];
        raw[ButtonId::B.index()] = false;
        raw[ButtonId::X.index()] = false;

        let frame = Frame::from_raw(raw, Instant::now());

        assert!(frame.pressed(ButtonId::B));
        assert!(frame.pressed(ButtonId::X));
        for button in ButtonId::ALL {
            if button != ButtonId::B && button != ButtonId::X {
                assert!(!frame.pressed(button), "{} should be released", button.label());
            }
        }
    }

    #[test]
    fn test_frame_preserves_bit_order() {
        // Press exactly one button per frame and check it lands on the
        // matching identity.
        for (i, button) in ButtonId::ALL.iter().enumerate() {
            let mut raw = [true; NUM_BUTTONS];
            raw[i] = false;
            let frame = Frame::from_raw(raw, Instant::now());
            assert!(frame.pressed(*button));
        }
    }
}
