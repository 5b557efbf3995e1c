use crate::{GpioOneWire, InterruptBlocking, LineDriver};
use embedded_hal::delay::DelayNs;
use onewire_master::{OneWire, OneWireError, OneWireResult};

impl<L: LineDriver, D: DelayNs> GpioOneWire<L, D> {
    /// Reset pulse followed by the presence sample.
    fn reset_pulse(&mut self) -> OneWireResult<bool, L::Error> {
        if !self.line.sample()? {
            log::warn!("onewire-gpio: line held low before reset");
            return Err(OneWireError::ShortCircuit);
        }
        let timing = self.timing;
        self.line.drive_low()?;
        self.delay.delay_us(timing.reset_us);
        let presence = self.guarded(InterruptBlocking::Bit, |bus| -> Result<bool, L::Error> {
            bus.release()?;
            bus.delay.delay_us(timing.long_us);
            Ok(!bus.line.sample()?)
        })?;
        self.delay.delay_us(timing.reset_us - timing.long_us);
        log::trace!("onewire-gpio: reset, presence: {presence}");
        Ok(presence)
    }

    /// One read slot.
    fn read_slot(&mut self) -> Result<bool, L::Error> {
        let timing = self.timing;
        self.guarded(InterruptBlocking::Bit, |bus| -> Result<bool, L::Error> {
            bus.line.drive_low()?;
            bus.delay.delay_us(timing.short_us);
            bus.release()?;
            bus.delay.delay_us(timing.sample_us);
            let bit = bus.line.sample()?;
            bus.delay.delay_us(timing.long_us - timing.sample_us);
            Ok(bit)
        })
    }

    /// One write slot. Only the share of low time differs between a one and a zero.
    fn write_slot(&mut self, bit: bool) -> Result<(), L::Error> {
        let timing = self.timing;
        let (low, high) = if bit {
            (timing.short_us, timing.long_us)
        } else {
            (timing.long_us, timing.short_us)
        };
        self.guarded(InterruptBlocking::Bit, |bus| -> Result<(), L::Error> {
            bus.line.drive_low()?;
            bus.delay.delay_us(low);
            bus.release()?;
            bus.delay.delay_us(high);
            Ok(())
        })
    }
}

impl<L: LineDriver, D: DelayNs> OneWire for GpioOneWire<L, D> {
    type BusError = L::Error;

    fn reset(&mut self) -> OneWireResult<bool, Self::BusError> {
        self.guarded(InterruptBlocking::Operation, Self::reset_pulse)
    }

    fn write_bit(&mut self, bit: bool) -> OneWireResult<(), Self::BusError> {
        self.guarded(InterruptBlocking::Operation, |bus| bus.write_slot(bit))?;
        Ok(())
    }

    fn read_bit(&mut self) -> OneWireResult<bool, Self::BusError> {
        Ok(self.guarded(InterruptBlocking::Operation, Self::read_slot)?)
    }

    fn write_byte(&mut self, byte: u8) -> OneWireResult<(), Self::BusError> {
        self.guarded(InterruptBlocking::Operation, |bus| {
            (0..8).try_for_each(|i| bus.write_slot(byte & (1 << i) != 0))
        })?;
        Ok(())
    }

    fn read_byte(&mut self) -> OneWireResult<u8, Self::BusError> {
        let byte = self.guarded(InterruptBlocking::Operation, |bus| {
            (0..8).try_fold(0u8, |byte, i| {
                Ok::<_, L::Error>(if bus.read_slot()? { byte | (1 << i) } else { byte })
            })
        })?;
        Ok(byte)
    }
}
