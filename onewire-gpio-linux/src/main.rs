use std::time::{Duration, Instant};

use clap::{Parser, ValueEnum};
use embedded_hal::delay::DelayNs;
use linux_embedded_hal::{
    CdevPin,
    gpio_cdev::{Chip, LineRequestFlags},
};
use onewire_gpio::{GpioOneWireBuilder, InterruptBlocking, OneWire, OpenDrainPin};
use onewire_master::{RomRegistry, search_all, select_and_write};

/// Maximum number of devices enumerated in one search.
const MAX_DEVICES: usize = 16;

/// Enumerate 1-Wire devices on a bit-banged GPIO line
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the GPIO character device (e.g., /dev/gpiochip0)
    #[arg(short, long, default_value = "/dev/gpiochip0")]
    chip: String,
    /// Line offset of the 1-Wire pin on the chip
    #[arg(short, long)]
    line: u32,
    /// Where time slots run inside a critical section
    #[arg(short, long, value_enum, default_value_t = Blocking::None)]
    blocking: Blocking,
    /// Enable the internal pull-up on release
    #[arg(long)]
    pull_up: bool,
    /// Byte sent to every discovered device after addressing it (e.g., 0x44)
    #[arg(short, long, value_parser = parse_byte)]
    payload: Option<u8>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Blocking {
    None,
    Operation,
    Bit,
}

impl From<Blocking> for InterruptBlocking {
    fn from(value: Blocking) -> Self {
        match value {
            Blocking::None => InterruptBlocking::None,
            Blocking::Operation => InterruptBlocking::Operation,
            Blocking::Bit => InterruptBlocking::Bit,
        }
    }
}

fn parse_byte(s: &str) -> Result<u8, String> {
    let res = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u8::from_str_radix(hex, 16),
        None => s.parse(),
    };
    res.map_err(|e| format!("invalid byte `{s}`: {e}"))
}

/// Busy-waiting delay; sleeping is far too coarse for 5 µs slots.
struct SpinDelay;

impl DelayNs for SpinDelay {
    fn delay_ns(&mut self, ns: u32) {
        let end = Instant::now() + Duration::from_nanos(u64::from(ns));
        while Instant::now() < end {
            std::hint::spin_loop();
        }
    }
}

fn main() {
    // Initialize the logger
    env_logger::init();
    // Parse command line arguments
    let args = Args::parse();
    // Request the 1-Wire line as an open-drain output, released
    let mut chip = Chip::new(&args.chip).expect("Failed to open GPIO chip");
    let handle = chip
        .get_line(args.line)
        .expect("Failed to get GPIO line")
        .request(
            LineRequestFlags::OUTPUT | LineRequestFlags::OPEN_DRAIN,
            1,
            "onewire-gpio",
        )
        .expect("Failed to request GPIO line");
    let pin = CdevPin::new(handle).expect("Failed to create GPIO pin");
    // Create the bus master
    let mut bus = GpioOneWireBuilder::default()
        .with_interrupt_blocking(args.blocking.into())
        .with_pull_up(args.pull_up)
        .build(OpenDrainPin::new(pin), SpinDelay)
        .expect("Failed to initialize 1-Wire bus");
    if !bus.reset().expect("Failed to reset 1-Wire bus") {
        log::warn!("No presence pulse on line {}", args.line);
        return;
    }
    // Enumerate devices on the 1-Wire bus
    let mut registry = RomRegistry::<MAX_DEVICES>::new();
    let devices = search_all(&mut bus, &mut registry).expect("Failed to search devices");
    log::info!("Found {} devices", devices);
    if registry.is_full() {
        log::warn!("Registry full, more than {MAX_DEVICES} devices may be connected");
    }
    for (index, rom) in registry.iter().enumerate() {
        log::info!("{index}: ROM {rom}");
    }
    if let Some(payload) = args.payload {
        for index in 0..registry.len() {
            bus.reset().expect("Failed to reset 1-Wire bus");
            select_and_write(&mut bus, &registry, index, payload)
                .expect("Failed to address device");
            log::info!("Sent {payload:#04x} to device {index}");
        }
    }
}
