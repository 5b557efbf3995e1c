//! Command constants for 1-Wire communication.

/// Command to match a specific ROM address in 1-Wire communication.
///
/// Followed by the 64-bit ROM code, byte 0 first. Only the device
/// that exactly matches the ROM code responds to the subsequent
/// function command; every other device waits for the next reset pulse.
pub const ONEWIRE_MATCH_ROM_CMD: u8 = 0x55;

/// Command to skip ROM addressing and talk to every device on the bus.
pub const ONEWIRE_SKIP_ROM_CMD: u8 = 0xcc;

/// Command to search for devices on the 1-Wire bus.
pub const ONEWIRE_SEARCH_CMD: u8 = 0xf0;

/// Number of bits in a ROM code, and therefore the depth of the search tree.
pub const ROM_BITS: usize = 64;
