use onewire_gpio::{GpioOneWireBuilder, InterruptBlocking, OneWire};
use onewire_master::{Rom, RomRegistry, search_all, select_and_write};
use onewire_sim::{SimBus, SimDevice};
use rand::{Rng, SeedableRng, rngs::StdRng};

#[test]
fn discovers_devices_over_the_wire() {
    let sim = SimBus::new([SimDevice::new(u64::MAX), SimDevice::new(0u64)]);
    let mut bus = GpioOneWireBuilder::default()
        .with_interrupt_blocking(InterruptBlocking::Bit)
        .build(sim.line(), sim.delay())
        .unwrap();
    let mut registry = RomRegistry::<4>::new();
    assert_eq!(search_all(&mut bus, &mut registry).unwrap(), 2);
    assert_eq!(registry.as_slice(), &[Rom::from(0u64), Rom::from(u64::MAX)]);
}

#[test]
fn single_device_without_conflicts() {
    let sim = SimBus::new([SimDevice::new(0x1122334455667788u64)]);
    let mut bus = GpioOneWireBuilder::default()
        .build(sim.line(), sim.delay())
        .unwrap();
    let mut registry = RomRegistry::<4>::new();
    assert_eq!(search_all(&mut bus, &mut registry).unwrap(), 1);
    assert_eq!(registry.get(0), Some(&Rom::from(0x1122334455667788u64)));
    assert_eq!(sim.conflicts(), 0);
}

#[test]
fn mute_device_fails_the_search() {
    let sim = SimBus::new([SimDevice::mute()]);
    let mut bus = GpioOneWireBuilder::default()
        .build(sim.line(), sim.delay())
        .unwrap();
    let mut registry = RomRegistry::<4>::new();
    assert_eq!(search_all(&mut bus, &mut registry).unwrap(), 0);
    assert!(registry.is_empty());
}

#[test]
fn random_population_and_selection() {
    let mut rng = StdRng::seed_from_u64(0x0123_5eed);
    let roms: Vec<u64> = (0..6).map(|_| rng.random()).collect();
    let sim = SimBus::new(roms.iter().copied().map(SimDevice::new));
    let mut bus = GpioOneWireBuilder::default()
        .with_interrupt_blocking(InterruptBlocking::Operation)
        .build(sim.line(), sim.delay())
        .unwrap();
    let mut registry = RomRegistry::<8>::new();
    assert_eq!(search_all(&mut bus, &mut registry).unwrap(), roms.len());
    assert!(roms.iter().all(|&rom| registry.contains(&Rom::from(rom))));

    let target = *registry.get(3).unwrap();
    assert!(bus.reset().unwrap());
    select_and_write(&mut bus, &registry, 3, 0x44).unwrap();
    sim.settle();
    for dev in sim.devices() {
        let expected: &[u8] = if dev.rom() == Some(target) { &[0x44] } else { &[] };
        assert_eq!(dev.received(), expected);
    }
}
