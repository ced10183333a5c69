//! BCM283x GPIO register access via `/dev/gpiomem`.
//!
//! The controller lines are read by spin-polling the level register, so
//! this goes through the memory-mapped register block rather than the
//! character-device interface: a level read must be a single volatile
//! load with no syscall in the path.

use std::fs::OpenOptions;
use std::ptr;

use anyhow::{Context, Result};
use memmap2::{MmapOptions, MmapRaw};

/// One page covers the whole GPIO register block.
const BLOCK_SIZE: usize = 4096;

/// GPLEV0 offset, in 32-bit registers.
const GPLEV0: usize = 13;

/// Memory-mapped GPIO register block.
pub struct GpioRegisters {
    map: MmapRaw,
}

impl GpioRegisters {
    /// Map the register block. Fails if `/dev/gpiomem` is absent or the
    /// process lacks permission (gpio group membership on Raspberry Pi OS).
    pub fn open() -> Result<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open("/dev/gpiomem")
            .context("opening /dev/gpiomem (is this a Raspberry Pi, and are you in the gpio group?)")?;

        let map = MmapOptions::new()
            .len(BLOCK_SIZE)
            .map_raw(&file)
            .context("mapping GPIO register block")?;

        Ok(Self { map })
    }

    fn base(&self) -> *mut u32 {
        self.map.as_mut_ptr() as *mut u32
    }

    /// Configure a pin as an input by clearing its GPFSEL function field.
    pub fn set_input(&self, pin: u8) {
        let reg = pin as usize / 10;
        let shift = (pin as usize % 10) * 3;
        unsafe {
            let fsel = self.base().add(reg);
            let bits = ptr::read_volatile(fsel);
            ptr::write_volatile(fsel, bits & !(0b111 << shift));
        }
    }

    /// Read the current level of a pin from GPLEV0. True = high.
    #[inline]
    pub fn level(&self, pin: u8) -> bool {
        let bits = unsafe { ptr::read_volatile(self.base().add(GPLEV0)) };
        (bits >> pin) & 1 != 0
    }
}
