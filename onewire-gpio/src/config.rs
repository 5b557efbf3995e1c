use embedded_hal::delay::DelayNs;

use crate::{GpioOneWire, LineDriver};

/// Durations of the 1-Wire time slots, in microseconds.
///
/// A bit slot lasts `short_us + long_us`. Writing a one holds the line low for `short_us`,
/// writing a zero for `long_us`; reading holds it low for `short_us` and samples `sample_us`
/// after release. A reset holds the line low for `reset_us`, samples the presence pulse
/// `long_us` after release and then waits out the rest of `reset_us`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    /// Length of the reset pulse.
    pub reset_us: u32,
    /// Long part of a bit slot.
    pub long_us: u32,
    /// Short part of a bit slot.
    pub short_us: u32,
    /// Delay from release to sampling in a read slot.
    pub sample_us: u32,
}

impl Timing {
    /// Standard speed timing.
    pub const STANDARD: Timing = Timing {
        reset_us: 500,
        long_us: 60,
        short_us: 5,
        sample_us: 5,
    };

    /// Total length of a bit slot.
    pub const fn slot_us(&self) -> u32 {
        self.short_us + self.long_us
    }

    /// Checks that every derived wait is non-negative.
    pub const fn is_valid(&self) -> bool {
        self.short_us > 0
            && self.short_us < self.long_us
            && self.sample_us <= self.long_us
            && self.long_us < self.reset_us
    }
}

impl Default for Timing {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// Where time slots are protected against interrupts.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum InterruptBlocking {
    /// Never enter a critical section.
    #[default]
    None,
    /// Each reset, bit and byte operation runs inside one critical section.
    Operation,
    /// Each bit slot runs inside its own critical section; interrupts are served between
    /// bits and during the low phase and tail of a reset.
    Bit,
}

/// Builder for creating a [`GpioOneWire`] instance with custom configuration.
#[derive(Debug, Default, Clone, Copy)]
pub struct GpioOneWireBuilder {
    pub(crate) timing: Timing,
    pub(crate) blocking: InterruptBlocking,
    pub(crate) pull_up: bool,
}

impl GpioOneWireBuilder {
    /// Sets the slot timing.
    ///
    /// Invalid timings (see [`Timing::is_valid`]) are ignored and the current timing is kept.
    pub fn with_timing(mut self, timing: Timing) -> Self {
        if timing.is_valid() {
            self.timing = timing;
        } else {
            log::warn!("onewire-gpio: ignoring invalid timing {timing:?}");
        }
        self
    }

    /// Sets where time slots are protected against interrupts.
    pub fn with_interrupt_blocking(mut self, blocking: InterruptBlocking) -> Self {
        self.blocking = blocking;
        self
    }

    /// Enables the internal pull-up whenever the line is released.
    pub fn with_pull_up(mut self, pull_up: bool) -> Self {
        self.pull_up = pull_up;
        self
    }

    /// Builds a new `GpioOneWire` instance and releases the line.
    pub fn build<L: LineDriver, D: DelayNs>(
        self,
        line: L,
        delay: D,
    ) -> Result<GpioOneWire<L, D>, L::Error> {
        let mut bus = GpioOneWire {
            line,
            delay,
            timing: self.timing,
            blocking: self.blocking,
            pull_up: self.pull_up,
        };
        bus.init()?;
        Ok(bus)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_timing_is_valid() {
        assert!(Timing::STANDARD.is_valid());
        assert_eq!(Timing::default().slot_us(), 65);
    }

    #[test]
    fn invalid_timing_is_rejected() {
        let bad = Timing {
            short_us: 70,
            ..Timing::STANDARD
        };
        let builder = GpioOneWireBuilder::default().with_timing(bad);
        assert_eq!(builder.timing, Timing::STANDARD);
    }
}
