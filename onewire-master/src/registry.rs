use crate::Rom;

/// Fixed-capacity collection of discovered ROM codes.
///
/// Owned by the caller and filled by [search_all](crate::search_all). Entries
/// `0..len()` are valid and mutually distinct; nothing beyond `len()` is exposed.
/// The capacity `N` bounds how many devices a single search enumerates.
#[derive(Debug, Clone)]
pub struct RomRegistry<const N: usize> {
    roms: [Rom; N],
    len: usize,
}

impl<const N: usize> Default for RomRegistry<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> RomRegistry<N> {
    /// Creates an empty registry.
    pub const fn new() -> Self {
        Self {
            roms: [Rom::ZERO; N],
            len: 0,
        }
    }

    /// Maximum number of devices the registry can hold.
    #[inline]
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Number of valid entries.
    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if no device has been discovered.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns `true` if the registry has reached its capacity.
    #[inline]
    pub const fn is_full(&self) -> bool {
        self.len == N
    }

    /// ROM code at `index`, or `None` outside `0..len()`.
    pub fn get(&self, index: usize) -> Option<&Rom> {
        self.as_slice().get(index)
    }

    /// Valid entries in discovery order.
    pub fn as_slice(&self) -> &[Rom] {
        &self.roms[..self.len]
    }

    /// Iterates over the valid entries in discovery order.
    pub fn iter(&self) -> core::slice::Iter<'_, Rom> {
        self.as_slice().iter()
    }

    /// Returns `true` if `rom` is among the valid entries.
    pub fn contains(&self, rom: &Rom) -> bool {
        self.as_slice().contains(rom)
    }

    pub(crate) fn clear(&mut self) {
        self.len = 0;
    }

    /// Appends `rom`, handing it back if the registry is full.
    pub(crate) fn push(&mut self, rom: Rom) -> Result<(), Rom> {
        if self.is_full() {
            return Err(rom);
        }
        self.roms[self.len] = rom;
        self.len += 1;
        Ok(())
    }
}

impl<'a, const N: usize> IntoIterator for &'a RomRegistry<N> {
    type Item = &'a Rom;
    type IntoIter = core::slice::Iter<'a, Rom>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_stops_at_capacity() {
        let mut reg = RomRegistry::<2>::new();
        assert!(reg.is_empty());
        assert_eq!(reg.push(Rom::from(1u64)), Ok(()));
        assert_eq!(reg.push(Rom::from(2u64)), Ok(()));
        assert!(reg.is_full());
        assert_eq!(reg.push(Rom::from(3u64)), Err(Rom::from(3u64)));
        assert_eq!(reg.len(), 2);
        assert_eq!(reg.get(1), Some(&Rom::from(2u64)));
        assert_eq!(reg.get(2), None);
    }

    #[test]
    fn clear_hides_stale_entries() {
        let mut reg = RomRegistry::<4>::new();
        reg.push(Rom::from(7u64)).unwrap();
        reg.clear();
        assert_eq!(reg.get(0), None);
        assert!(!reg.contains(&Rom::from(7u64)));
        assert_eq!(reg.iter().count(), 0);
    }

    #[test]
    fn zero_capacity_is_always_full() {
        let mut reg = RomRegistry::<0>::new();
        assert!(reg.is_full());
        assert!(reg.push(Rom::ZERO).is_err());
    }
}
