use onewire_master::{OneWireError, OneWireSearch, Rom, RomRegistry, search_all};
use onewire_sim::{SimDevice, SlotBus};
use rand::{Rng, SeedableRng, rngs::StdRng};

/// Order in which the search reports devices: zero branch first, LSB first.
fn search_order(roms: &[u64]) -> Vec<Rom> {
    let mut sorted = roms.to_vec();
    sorted.sort_by_key(|rom| rom.reverse_bits());
    sorted.into_iter().map(Rom::from).collect()
}

#[test]
fn finds_all_zero_and_all_one_devices() {
    let mut bus = SlotBus::with_roms([u64::MAX, 0u64]);
    let mut registry = RomRegistry::<4>::new();
    let count = search_all(&mut bus, &mut registry).unwrap();
    assert_eq!(count, 2);
    assert_eq!(registry.as_slice(), &[Rom::from(0u64), Rom::from(u64::MAX)]);
    assert_eq!(bus.conflicts(), 2);
}

#[test]
fn single_device_has_no_conflicts() {
    let mut bus = SlotBus::with_roms([0x1122334455667788u64]);
    let mut registry = RomRegistry::<4>::new();
    assert_eq!(search_all(&mut bus, &mut registry).unwrap(), 1);
    assert_eq!(registry.get(0), Some(&Rom::from(0x1122334455667788u64)));
    assert_eq!(bus.conflicts(), 0);
    assert_eq!(bus.resets(), 1);
}

#[test]
fn single_device_exhausts_after_one_pass() {
    let mut bus = SlotBus::with_roms([0x1122334455667788u64]);
    let mut search = OneWireSearch::new(&mut bus);
    assert_eq!(search.next().unwrap(), Some(Rom::from(0x1122334455667788u64)));
    assert!(search.is_exhausted());
    assert!((1..=64).all(|depth| !search.stack().is_set(depth)));
    assert_eq!(search.next().unwrap(), None);
}

#[test]
fn empty_bus_reports_zero_without_search_command() {
    let mut bus = SlotBus::new([]);
    let mut registry = RomRegistry::<4>::new();
    assert_eq!(search_all(&mut bus, &mut registry).unwrap(), 0);
    assert!(registry.is_empty());
    assert_eq!(bus.resets(), 1);
    assert_eq!(bus.slots(), 0);
}

#[test]
fn stops_at_capacity() {
    let roms: Vec<u64> = (1..=7).map(|i| 0x2800_0000_0000_0000 | i).collect();
    let mut bus = SlotBus::with_roms(roms.iter().copied());
    let mut registry = RomRegistry::<3>::new();
    assert_eq!(search_all(&mut bus, &mut registry).unwrap(), 3);
    assert!(registry.is_full());
    assert_eq!(registry.as_slice(), &search_order(&roms)[..3]);
    assert_eq!(bus.resets(), 3);
}

#[test]
fn exactly_capacity_devices() {
    let roms = [0x10u64, 0x20, 0x30];
    let mut bus = SlotBus::with_roms(roms);
    let mut registry = RomRegistry::<3>::new();
    assert_eq!(search_all(&mut bus, &mut registry).unwrap(), 3);
    assert_eq!(registry.as_slice(), search_order(&roms).as_slice());
}

#[test]
fn impossible_bit_pair_discards_results() {
    let mut bus = SlotBus::new([SimDevice::mute()]);
    let mut registry = RomRegistry::<4>::new();
    assert_eq!(search_all(&mut bus, &mut registry).unwrap(), 0);
    assert!(registry.is_empty());
}

#[test]
fn bus_dying_mid_search_discards_partial_registry() {
    // The zero-branch device is found first, then its sibling stops answering.
    let mut bus = SlotBus::new([SimDevice::new(0u64), SimDevice::failing_after(1u64, 20)]);
    let mut registry = RomRegistry::<4>::new();
    let mut search = OneWireSearch::new(&mut bus);
    assert_eq!(search.next().unwrap(), Some(Rom::from(0u64)));
    assert_eq!(search.next(), Err(OneWireError::BusFault));

    let mut bus = SlotBus::new([SimDevice::new(0u64), SimDevice::failing_after(1u64, 20)]);
    assert_eq!(search_all(&mut bus, &mut registry).unwrap(), 0);
    assert!(registry.is_empty());
    assert_eq!(registry.get(0), None);
}

#[test]
fn missing_presence_is_reported_by_streaming_search() {
    let mut bus = SlotBus::new([]);
    let mut search = OneWireSearch::new(&mut bus);
    assert_eq!(search.next(), Err(OneWireError::NoDevicePresent));
}

#[test]
fn repeated_searches_are_identical() {
    let roms = [0xdead_beef_u64, 0x0123_4567_89ab_cdef, 0x42, 0xfeed_0000_0000_0001];
    let mut bus = SlotBus::with_roms(roms);
    let mut first = RomRegistry::<8>::new();
    let mut second = RomRegistry::<8>::new();
    search_all(&mut bus, &mut first).unwrap();
    search_all(&mut bus, &mut second).unwrap();
    assert_eq!(first.len(), 4);
    assert_eq!(first.as_slice(), second.as_slice());
}

#[test]
fn late_conflicts_are_resolved() {
    // Devices only differ in the last byte, past the 32nd bit.
    let roms = [
        0x0100_0000_0000_0028u64,
        0x0200_0000_0000_0028,
        0x0300_0000_0000_0028,
        0x8000_0000_0000_0028,
        0xff00_0000_0000_0028,
    ];
    let mut bus = SlotBus::with_roms(roms);
    let mut registry = RomRegistry::<8>::new();
    assert_eq!(search_all(&mut bus, &mut registry).unwrap(), roms.len());
    assert_eq!(registry.as_slice(), search_order(&roms).as_slice());
}

#[test]
fn random_populations_are_fully_enumerated() {
    let mut rng = StdRng::seed_from_u64(0x0123_5eed);
    for _ in 0..20 {
        let n = rng.random_range(1..=12);
        let mut roms: Vec<u64> = (0..n).map(|_| rng.random()).collect();
        roms.sort_unstable();
        roms.dedup();
        let mut bus = SlotBus::with_roms(roms.iter().copied());
        let mut registry = RomRegistry::<16>::new();
        assert_eq!(search_all(&mut bus, &mut registry).unwrap(), roms.len());
        assert_eq!(registry.as_slice(), search_order(&roms).as_slice());
    }
}

#[test]
fn registry_is_reused_across_searches() {
    let mut registry = RomRegistry::<4>::new();
    let mut bus = SlotBus::with_roms([1u64, 2, 3]);
    assert_eq!(search_all(&mut bus, &mut registry).unwrap(), 3);
    let mut bus = SlotBus::with_roms([9u64]);
    assert_eq!(search_all(&mut bus, &mut registry).unwrap(), 1);
    assert_eq!(registry.as_slice(), &[Rom::from(9u64)]);
}
