use crate::{OneWire, OneWireError, OneWireResult, RomRegistry};

/// Addresses the device at `index` in `registry` and writes `payload` to it.
///
/// Writes the Match ROM command, the 8 bytes of the stored ROM code in the order they were
/// discovered, then `payload`. The caller must [reset](OneWire::reset) the bus immediately
/// before, as for every other transaction.
///
/// # Errors
/// [`OneWireError::IndexOutOfRange`] if `index` is not below `registry.len()`; nothing is
/// written to the bus in that case.
pub fn select_and_write<T: OneWire, const N: usize>(
    onewire: &mut T,
    registry: &RomRegistry<N>,
    index: usize,
    payload: u8,
) -> OneWireResult<(), T::BusError> {
    let rom = registry.get(index).ok_or(OneWireError::IndexOutOfRange {
        index,
        len: registry.len(),
    })?;
    onewire.match_rom(rom)?;
    onewire.write_byte(payload)
}
