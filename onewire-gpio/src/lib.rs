#![no_std]
#![deny(missing_docs)]

/*! # onewire-gpio
 *
 * A bit-banged 1-Wire master driving a single open-drain line.
 *
 * [`GpioOneWire`] generates every time slot itself from a [`LineDriver`] (drive low, release,
 * sample) and a microsecond [`DelayNs`](embedded_hal::delay::DelayNs), and implements the
 * [`OneWire`] trait, so the ROM search and addressing helpers of `onewire-master` work on top
 * of it unchanged.
 *
 * The shortest interval of a slot is 5 µs, less than the interrupt entry overhead of most small
 * microcontrollers. [`InterruptBlocking`] selects whether slots run inside a critical section,
 * provided by the [`critical-section`](critical_section) implementation linked for the target.
 */

pub use onewire_master::{OneWire, OneWireError, OneWireResult};
mod config;
mod onewire;
mod traits;

pub use config::{GpioOneWireBuilder, InterruptBlocking, Timing};
pub use traits::{LineDriver, OpenDrainPin};

/// A bit-banged 1-Wire bus master.
///
/// Takes ownership of the bus line (implementing [`LineDriver`])
/// and a timer object implementing the [`DelayNs`](embedded_hal::delay::DelayNs) trait.
/// Created through [`GpioOneWireBuilder`].
pub struct GpioOneWire<L, D> {
    pub(crate) line: L,
    pub(crate) delay: D,
    pub(crate) timing: Timing,
    pub(crate) blocking: InterruptBlocking,
    pub(crate) pull_up: bool,
}

impl<L, D> GpioOneWire<L, D> {
    /// Slot timing in use.
    pub fn timing(&self) -> &Timing {
        &self.timing
    }

    /// Interrupt blocking granularity in use.
    pub fn interrupt_blocking(&self) -> InterruptBlocking {
        self.blocking
    }

    /// Releases the line driver and delay.
    pub fn free(self) -> (L, D) {
        (self.line, self.delay)
    }
}

impl<L: LineDriver, D> GpioOneWire<L, D> {
    /// Puts the bus into its idle state by releasing the line.
    pub fn init(&mut self) -> Result<(), L::Error> {
        log::debug!("onewire-gpio: releasing line (pull-up: {})", self.pull_up);
        self.release()
    }

    #[inline]
    pub(crate) fn release(&mut self) -> Result<(), L::Error> {
        self.line.release(self.pull_up)
    }

    /// Runs `f` inside a critical section if `level` is the configured granularity.
    #[inline]
    pub(crate) fn guarded<R>(
        &mut self,
        level: InterruptBlocking,
        f: impl FnOnce(&mut Self) -> R,
    ) -> R {
        if self.blocking == level {
            critical_section::with(|_| f(self))
        } else {
            f(self)
        }
    }
}
