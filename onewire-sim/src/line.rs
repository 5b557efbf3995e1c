use core::convert::Infallible;
use std::{cell::RefCell, rc::Rc};

use embedded_hal::delay::DelayNs;
use onewire_gpio::LineDriver;

use crate::{Population, SimDevice};

/// Minimum low time recognised as a reset pulse.
const RESET_MIN_NS: u64 = 480_000;
/// Delay between the end of the reset pulse and the presence pulse.
const PRESENCE_WAIT_NS: u64 = 20_000;
/// Length of the presence pulse.
const PRESENCE_LEN_NS: u64 = 100_000;
/// Time after the falling edge at which devices sample the line.
const DEVICE_SAMPLE_NS: u64 = 30_000;
/// Time after the falling edge for which a device sending 0 holds the line low.
const DEVICE_HOLD_NS: u64 = 45_000;

/// Line activity recorded by [SimBus].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    /// The master drove the line low.
    Fall {
        /// Simulated time in nanoseconds.
        at: u64,
    },
    /// The master released the line.
    Release {
        /// Simulated time in nanoseconds.
        at: u64,
        /// Whether the internal pull-up was requested.
        pull_up: bool,
    },
    /// The master sampled the line.
    Sample {
        /// Simulated time in nanoseconds.
        at: u64,
        /// Level seen by the master.
        level: bool,
    },
}

impl Edge {
    /// Simulated time of the event in nanoseconds.
    pub fn at(&self) -> u64 {
        match *self {
            Edge::Fall { at } | Edge::Release { at, .. } | Edge::Sample { at, .. } => at,
        }
    }
}

#[derive(Debug, Default)]
struct Wire {
    now: u64,
    master_low: bool,
    fall: u64,
    release: Option<u64>,
    slot_open: bool,
    slot_pulled: bool,
    presence: Option<(u64, u64)>,
    shorted: bool,
    population: Population,
    trace: Vec<Edge>,
}

impl Wire {
    fn drive_low(&mut self) {
        if self.master_low {
            return;
        }
        self.close_slot();
        self.master_low = true;
        self.fall = self.now;
        self.release = None;
        self.slot_open = true;
        self.slot_pulled = self.population.begin_slot();
        self.trace.push(Edge::Fall { at: self.now });
    }

    fn release(&mut self, pull_up: bool) {
        if !self.master_low {
            return;
        }
        self.master_low = false;
        self.release = Some(self.now);
        self.trace.push(Edge::Release {
            at: self.now,
            pull_up,
        });
        if self.now - self.fall >= RESET_MIN_NS {
            self.slot_open = false;
            self.presence = self.population.reset().then(|| {
                let start = self.now + PRESENCE_WAIT_NS;
                (start, start + PRESENCE_LEN_NS)
            });
            log::trace!("sim: reset at {} ns, presence {:?}", self.now, self.presence);
        }
    }

    fn sample(&mut self) -> bool {
        let now = self.now;
        let slot_low = self.slot_open && self.slot_pulled && now < self.fall + DEVICE_HOLD_NS;
        let presence_low = self
            .presence
            .is_some_and(|(start, end)| (start..end).contains(&now));
        let level = !(self.shorted || self.master_low || slot_low || presence_low);
        self.trace.push(Edge::Sample { at: now, level });
        level
    }

    /// Hands the level seen at the device sample point of the last slot to the devices.
    fn close_slot(&mut self) {
        if !self.slot_open {
            return;
        }
        self.slot_open = false;
        let master_low = self
            .release
            .is_none_or(|release| release - self.fall > DEVICE_SAMPLE_NS);
        let level = !(self.shorted || master_low || self.slot_pulled);
        self.population.end_slot(level);
    }
}

/// An open-drain 1-Wire line simulated in nanosecond time.
///
/// Cloning a [SimBus] shares the same line.
#[derive(Debug, Clone, Default)]
pub struct SimBus {
    wire: Rc<RefCell<Wire>>,
}

impl SimBus {
    /// Creates a line with `devices` attached.
    pub fn new(devices: impl IntoIterator<Item = SimDevice>) -> Self {
        let wire = Wire {
            population: Population::new(devices),
            ..Default::default()
        };
        Self {
            wire: Rc::new(RefCell::new(wire)),
        }
    }

    /// The line driver end of the bus.
    pub fn line(&self) -> SimLine {
        SimLine { bus: self.clone() }
    }

    /// A delay that advances the simulated clock of the bus.
    pub fn delay(&self) -> SimDelay {
        SimDelay { bus: self.clone() }
    }

    /// Current simulated time in nanoseconds.
    pub fn now(&self) -> u64 {
        self.wire.borrow().now
    }

    /// Holds the line low (or lets it go) independently of master and devices.
    pub fn set_shorted(&self, shorted: bool) {
        self.wire.borrow_mut().shorted = shorted;
    }

    /// Returns the recorded line activity and clears the record.
    pub fn take_trace(&self) -> Vec<Edge> {
        core::mem::take(&mut self.wire.borrow_mut().trace)
    }

    /// Snapshot of the attached devices.
    ///
    /// The last slot is only delivered to the devices at the next falling edge or reset.
    pub fn devices(&self) -> Vec<SimDevice> {
        self.wire.borrow().population.devices().to_vec()
    }

    /// Number of search slots where participating devices disagreed.
    pub fn conflicts(&self) -> usize {
        self.wire.borrow().population.conflicts()
    }

    /// Delivers a pending slot to the devices.
    pub fn settle(&self) {
        self.wire.borrow_mut().close_slot();
    }
}

/// Master side of a [SimBus].
#[derive(Debug, Clone)]
pub struct SimLine {
    bus: SimBus,
}

impl LineDriver for SimLine {
    type Error = Infallible;

    fn drive_low(&mut self) -> Result<(), Self::Error> {
        self.bus.wire.borrow_mut().drive_low();
        Ok(())
    }

    fn release(&mut self, pull_up: bool) -> Result<(), Self::Error> {
        self.bus.wire.borrow_mut().release(pull_up);
        Ok(())
    }

    fn sample(&mut self) -> Result<bool, Self::Error> {
        Ok(self.bus.wire.borrow_mut().sample())
    }
}

/// Delay advancing the clock of a [SimBus].
#[derive(Debug, Clone)]
pub struct SimDelay {
    bus: SimBus,
}

impl DelayNs for SimDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.bus.wire.borrow_mut().now += u64::from(ns);
    }
}
