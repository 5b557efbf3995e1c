use core::fmt;

/// 64-bit identifier of a 1-Wire device.
///
/// Stored in wire order: byte 0 is sent first, and within each byte the
/// least significant bit is sent first. The contents are opaque to the master;
/// the family code and CRC byte that real devices carry are not interpreted.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Rom([u8; 8]);

impl Rom {
    /// A ROM code with every bit cleared.
    pub const ZERO: Rom = Rom([0; 8]);

    /// Creates a ROM code from its bytes in wire order.
    pub const fn new(bytes: [u8; 8]) -> Self {
        Self(bytes)
    }

    /// The bytes of the ROM code in wire order.
    pub const fn as_bytes(&self) -> &[u8; 8] {
        &self.0
    }

    /// The ROM code as a little-endian integer (bit 0 is the first bit on the wire).
    pub const fn to_u64(self) -> u64 {
        u64::from_le_bytes(self.0)
    }

    /// Value of the bit at `index` (0..64) in wire order.
    pub const fn bit(&self, index: usize) -> bool {
        self.0[index / 8] & (1 << (index % 8)) != 0
    }

    pub(crate) fn set_bit(&mut self, index: usize, value: bool) {
        let mask = 1 << (index % 8);
        if value {
            self.0[index / 8] |= mask;
        } else {
            self.0[index / 8] &= !mask;
        }
    }
}

impl From<u64> for Rom {
    fn from(value: u64) -> Self {
        Self(value.to_le_bytes())
    }
}

impl From<Rom> for u64 {
    fn from(rom: Rom) -> Self {
        rom.to_u64()
    }
}

impl From<[u8; 8]> for Rom {
    fn from(bytes: [u8; 8]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for Rom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in self.0 {
            write!(f, "{b:02x}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bits_are_little_endian_in_wire_order() {
        let rom = Rom::from(0x1122334455667788u64);
        assert_eq!(rom.as_bytes()[0], 0x88);
        assert!(!rom.bit(0));
        assert!(rom.bit(3));
        assert!(rom.bit(60));
        assert_eq!(u64::from(rom), 0x1122334455667788);
    }

    #[test]
    fn set_bit_toggles_single_bit() {
        let mut rom = Rom::ZERO;
        rom.set_bit(9, true);
        assert_eq!(rom.to_u64(), 1 << 9);
        rom.set_bit(9, false);
        assert_eq!(rom, Rom::ZERO);
    }
}
