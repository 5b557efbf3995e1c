//! # onewire-sim
//! Simulated 1-Wire buses for exercising bus masters without hardware.
//!
//! Two models share the same [SimDevice] behaviour:
//! - [SlotBus] works at time-slot granularity and implements
//!   [OneWire](onewire_master::OneWire) directly. Use it to test anything built on top of the
//!   transport (search, addressing).
//! - [SimBus] models the open-drain line in simulated time. It hands out a [SimLine]
//!   (a [LineDriver](onewire_gpio::LineDriver)) and a [SimDelay]
//!   ([DelayNs](embedded_hal::delay::DelayNs)) sharing one clock, so a bit-banged master can be
//!   run against it and its slot timing checked edge by edge.

mod device;
mod line;
mod slot;

pub use device::{Population, SimDevice};
pub use line::{Edge, SimBus, SimDelay, SimLine};
pub use slot::SlotBus;
