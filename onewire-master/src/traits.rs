use crate::{ONEWIRE_MATCH_ROM_CMD, ONEWIRE_SKIP_ROM_CMD, OneWireResult, Rom};

/// Trait for 1-Wire communication.
/// This trait defines the basic operations required for 1-Wire communication, such as resetting the bus,
/// writing and reading bytes, and writing and reading bits.
///
/// Bit and byte operations cannot detect an empty bus: with no device pulling the line low,
/// reads simply return ones. Only [reset](OneWire::reset) reports whether devices are present.
pub trait OneWire {
    /// The error type returned by the operations of this trait.
    /// This type is used to indicate errors in the underlying hardware or communication.
    type BusError;

    /// Resets the 1-Wire bus and samples the presence pulse.
    ///
    /// # Returns
    /// `true` if at least one device asserted a presence pulse.
    ///
    /// # Errors
    /// This method returns an error if the reset operation fails.
    fn reset(&mut self) -> OneWireResult<bool, Self::BusError>;

    /// Writes a single bit to the 1-Wire bus.
    /// # Arguments
    ///
    /// * `bit` - The bit to write.
    ///
    /// # Errors
    /// This method returns an error if the write operation fails.
    fn write_bit(&mut self, bit: bool) -> OneWireResult<(), Self::BusError>;

    /// Reads a single bit from the 1-Wire bus.
    /// # Returns
    /// The bit read from the bus.
    /// # Errors
    /// This method returns an error if the read operation fails.
    fn read_bit(&mut self) -> OneWireResult<bool, Self::BusError>;

    /// Writes a byte to the 1-Wire bus, least significant bit first.
    /// # Arguments
    /// * `byte` - The byte to write to the bus.
    ///
    /// # Errors
    /// This method returns an error if the write operation fails.
    fn write_byte(&mut self, byte: u8) -> OneWireResult<(), Self::BusError> {
        for i in 0..8 {
            self.write_bit(byte & (1 << i) != 0)?;
        }
        Ok(())
    }

    /// Reads a byte from the 1-Wire bus, least significant bit first.
    /// # Returns
    /// Byte read from the bus.
    ///
    /// # Errors
    /// This method returns an error if the read operation fails.
    fn read_byte(&mut self) -> OneWireResult<u8, Self::BusError> {
        let mut byte = 0;
        for i in 0..8 {
            if self.read_bit()? {
                byte |= 1 << i;
            }
        }
        Ok(byte)
    }

    /// Addresses a single device by its ROM code.
    ///
    /// Writes the Match ROM command followed by the 8 bytes of `rom`, byte 0 first.
    /// The bus must have been [reset](OneWire::reset) immediately before this call.
    fn match_rom(&mut self, rom: &Rom) -> OneWireResult<(), Self::BusError> {
        self.write_byte(ONEWIRE_MATCH_ROM_CMD)?;
        for &b in rom.as_bytes() {
            self.write_byte(b)?;
        }
        Ok(())
    }

    /// Addresses every device on the bus at once.
    ///
    /// Note: reading after this call returns the wired-AND of all device responses
    /// on a bus with more than one device.
    /// The bus must have been [reset](OneWire::reset) immediately before this call.
    fn skip_rom(&mut self) -> OneWireResult<(), Self::BusError> {
        self.write_byte(ONEWIRE_SKIP_ROM_CMD)
    }
}

impl<T: OneWire + ?Sized> OneWire for &mut T {
    type BusError = T::BusError;

    fn reset(&mut self) -> OneWireResult<bool, Self::BusError> {
        (**self).reset()
    }

    fn write_bit(&mut self, bit: bool) -> OneWireResult<(), Self::BusError> {
        (**self).write_bit(bit)
    }

    fn read_bit(&mut self) -> OneWireResult<bool, Self::BusError> {
        (**self).read_bit()
    }

    fn write_byte(&mut self, byte: u8) -> OneWireResult<(), Self::BusError> {
        (**self).write_byte(byte)
    }

    fn read_byte(&mut self) -> OneWireResult<u8, Self::BusError> {
        (**self).read_byte()
    }
}
