use crate::{
    ONEWIRE_SEARCH_CMD, OneWire, OneWireResult, ROM_BITS, Rom, RomRegistry, error::OneWireError,
};

/// Backtracking state of the ROM search.
///
/// One marker per branch point along the current search path: marker `d`
/// (1..=64) belongs to the `d`-th conflict met during a pass, and a set
/// marker means the next pass takes the one branch there. Marker 0 is a
/// sentinel that becomes set once every branch has been explored.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DiscriminationStack(u128);

impl DiscriminationStack {
    /// An empty stack: the next pass takes the zero branch at every conflict.
    pub const fn new() -> Self {
        Self(0)
    }

    /// Returns `true` if the marker for branch point `depth` (at most 64) is set.
    pub const fn is_set(&self, depth: usize) -> bool {
        self.0 & (1 << depth) != 0
    }

    /// Returns `true` once the whole identifier tree has been walked.
    pub const fn is_exhausted(&self) -> bool {
        self.is_set(0)
    }

    /// Advances the stack after a pass whose deepest branch point was `depth`
    /// (0 for a pass without conflicts).
    ///
    /// A clear marker at `depth` means the zero branch was just taken there, so
    /// the marker is set. Otherwise both branches below `depth` are done: the run
    /// of set markers ending at `depth` is cleared and the first clear marker
    /// beneath it is set, which is the sentinel when no branch point is left.
    pub fn backtrack(&mut self, depth: usize) {
        debug_assert!(depth <= ROM_BITS);
        let mut pos = depth;
        while pos > 0 && self.is_set(pos) {
            self.0 &= !(1 << pos);
            pos -= 1;
        }
        self.0 |= 1 << pos;
    }
}

/// A structure for searching devices on a 1-Wire bus.
/// This structure implements the search algorithm for discovering devices on the 1-Wire bus.
/// It maintains the state of the search.
///
/// Each call to [next](OneWireSearch::next) performs one complete search pass and yields one
/// ROM code. At every conflict the zero branch is explored before the one branch, so devices
/// come out sorted by their bit-reversed ROM value.
pub struct OneWireSearch<'a, T> {
    onewire: &'a mut T,
    stack: DiscriminationStack,
}

impl<'a, T> OneWireSearch<'a, T> {
    /// Creates a new [`OneWireSearch`] instance.
    ///
    /// # Arguments
    /// * `onewire` - A mutable reference to a type that implements the `OneWire` trait.
    pub fn new(onewire: &'a mut T) -> Self {
        Self {
            onewire,
            stack: DiscriminationStack::new(),
        }
    }

    /// Returns `true` once every device has been reported.
    pub fn is_exhausted(&self) -> bool {
        self.stack.is_exhausted()
    }

    /// Current backtracking state.
    pub fn stack(&self) -> &DiscriminationStack {
        &self.stack
    }
}

impl<T: OneWire> OneWireSearch<'_, T> {
    /// Runs one search pass and returns the ROM code it resolved.
    ///
    /// Returns `Ok(None)` once every device has been reported.
    ///
    /// # Errors
    /// * [`OneWireError::NoDevicePresent`] if the reset pulse got no presence pulse.
    ///   The search command is not sent in that case.
    /// * [`OneWireError::BusFault`] if both the id bit and its complement read high,
    ///   i.e. no device took part in the pass any more.
    ///
    /// After an error the search state is meaningless and the search should be dropped.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> OneWireResult<Option<Rom>, T::BusError> {
        if self.stack.is_exhausted() {
            return Ok(None);
        }
        if !self.onewire.reset()? {
            log::debug!("search: no presence pulse");
            return Err(OneWireError::NoDevicePresent);
        }
        self.onewire.write_byte(ONEWIRE_SEARCH_CMD)?;
        let mut rom = Rom::ZERO;
        let mut depth = 0;
        for index in 0..ROM_BITS {
            let id_bit = self.onewire.read_bit()?;
            let complement_bit = self.onewire.read_bit()?;
            let bit = match (id_bit, complement_bit) {
                (false, false) => {
                    depth += 1;
                    let bit = self.stack.is_set(depth);
                    log::trace!("search: conflict #{depth} at bit {index}, taking {}", bit as u8);
                    bit
                }
                (false, true) => false,
                (true, false) => true,
                (true, true) => {
                    log::warn!("search: no device answered at bit {index}");
                    return Err(OneWireError::BusFault);
                }
            };
            self.onewire.write_bit(bit)?;
            rom.set_bit(index, bit);
        }
        self.stack.backtrack(depth);
        log::debug!("search: found {rom} ({depth} conflicts)");
        Ok(Some(rom))
    }
}

/// Discovers every device on the bus and stores their ROM codes in `registry`.
///
/// The registry is cleared first. The search stops when the identifier tree is exhausted
/// or the registry is full; in the latter case more devices may exist on the bus than were
/// reported.
///
/// # Returns
/// The number of devices stored. `0` means the bus is empty or failed during the search;
/// the registry is left empty in both cases.
///
/// # Errors
/// Only errors of the underlying line driver are returned.
pub fn search_all<T: OneWire, const N: usize>(
    onewire: &mut T,
    registry: &mut RomRegistry<N>,
) -> OneWireResult<usize, T::BusError> {
    registry.clear();
    let mut search = OneWireSearch::new(onewire);
    while !registry.is_full() {
        let rom = match search.next() {
            Ok(Some(rom)) => rom,
            Ok(None) => break,
            Err(OneWireError::NoDevicePresent | OneWireError::BusFault) => {
                registry.clear();
                return Ok(0);
            }
            Err(e) => {
                registry.clear();
                return Err(e);
            }
        };
        if registry.push(rom).is_err() {
            break;
        }
    }
    if registry.is_full() && !search.is_exhausted() {
        log::debug!("search: registry full after {N} devices");
    }
    Ok(registry.len())
}
