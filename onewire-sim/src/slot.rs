use core::convert::Infallible;

use onewire_master::{OneWire, OneWireResult};

use crate::{Population, SimDevice};

/// A 1-Wire bus simulated one time slot at a time.
///
/// Every slot resolves to the wired-AND of the master's bit and the devices pulling the line
/// low, exactly as on the real open-drain line. A read slot is a write-one slot from the
/// devices' point of view.
#[derive(Debug, Clone, Default)]
pub struct SlotBus {
    population: Population,
    resets: usize,
    slots: usize,
}

impl SlotBus {
    /// Creates a bus with `devices` attached.
    pub fn new(devices: impl IntoIterator<Item = SimDevice>) -> Self {
        Self {
            population: Population::new(devices),
            resets: 0,
            slots: 0,
        }
    }

    /// Creates a bus with one regular device per ROM code.
    pub fn with_roms<R: Into<onewire_master::Rom>>(roms: impl IntoIterator<Item = R>) -> Self {
        Self::new(roms.into_iter().map(SimDevice::new))
    }

    /// The attached devices.
    pub fn devices(&self) -> &[SimDevice] {
        self.population.devices()
    }

    /// Number of search slots where participating devices disagreed.
    pub fn conflicts(&self) -> usize {
        self.population.conflicts()
    }

    /// Number of reset pulses issued so far.
    pub fn resets(&self) -> usize {
        self.resets
    }

    /// Number of read and write slots issued so far.
    pub fn slots(&self) -> usize {
        self.slots
    }

    fn slot(&mut self, master: bool) -> bool {
        self.slots += 1;
        let pulled = self.population.begin_slot();
        let level = master && !pulled;
        self.population.end_slot(level);
        level
    }
}

impl OneWire for SlotBus {
    type BusError = Infallible;

    fn reset(&mut self) -> OneWireResult<bool, Self::BusError> {
        self.resets += 1;
        Ok(self.population.reset())
    }

    fn write_bit(&mut self, bit: bool) -> OneWireResult<(), Self::BusError> {
        self.slot(bit);
        Ok(())
    }

    fn read_bit(&mut self) -> OneWireResult<bool, Self::BusError> {
        Ok(self.slot(true))
    }
}
