use onewire_master::{
    ONEWIRE_MATCH_ROM_CMD, ONEWIRE_SEARCH_CMD, ONEWIRE_SKIP_ROM_CMD, ROM_BITS, Rom,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Behavior {
    /// Regular ROM device.
    Rom(Rom),
    /// ROM device that stops answering after `bits` search bits.
    FailsAfter(Rom, usize),
    /// Answers the reset pulse and nothing else.
    Mute,
    /// Sends back every bit it receives in the following slot.
    EchoBits,
    /// Receives a byte, then sends it back over the next eight slots.
    EchoBytes,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SearchPhase {
    IdBit,
    Complement,
    Direction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Idle,
    Command { byte: u8, count: u8 },
    Search { index: usize, phase: SearchPhase },
    Match { index: usize },
    Selected { byte: u8, count: u8 },
    EchoBit { pending: Option<bool> },
    EchoByte { byte: u8, count: u8, sending: bool },
}

/// A simulated 1-Wire slave.
///
/// Devices follow the bus one time slot at a time: at the start of a slot the bus asks
/// whether the device pulls the line low ([drives_low](SimDevice::drives_low)), at the end
/// the device is told the level it sampled ([end_slot](SimDevice::end_slot)).
#[derive(Debug, Clone)]
pub struct SimDevice {
    behavior: Behavior,
    state: State,
    received: Vec<u8>,
}

impl SimDevice {
    fn with_behavior(behavior: Behavior) -> Self {
        let state = match behavior {
            Behavior::EchoBits => State::EchoBit { pending: None },
            Behavior::EchoBytes => State::EchoByte {
                byte: 0,
                count: 0,
                sending: false,
            },
            _ => State::Idle,
        };
        Self {
            behavior,
            state,
            received: Vec::new(),
        }
    }

    /// A device answering the search, match ROM and skip ROM commands with `rom`.
    pub fn new(rom: impl Into<Rom>) -> Self {
        Self::with_behavior(Behavior::Rom(rom.into()))
    }

    /// A device that drops off the bus after taking part in `bits` search bits.
    pub fn failing_after(rom: impl Into<Rom>, bits: usize) -> Self {
        Self::with_behavior(Behavior::FailsAfter(rom.into(), bits))
    }

    /// A device that answers the reset pulse but never takes part in a search.
    pub fn mute() -> Self {
        Self::with_behavior(Behavior::Mute)
    }

    /// A device echoing every written bit in the next slot.
    pub fn echo_bits() -> Self {
        Self::with_behavior(Behavior::EchoBits)
    }

    /// A device echoing every written byte over the next eight slots.
    pub fn echo_bytes() -> Self {
        Self::with_behavior(Behavior::EchoBytes)
    }

    /// ROM code of the device, if it has one.
    pub fn rom(&self) -> Option<Rom> {
        match self.behavior {
            Behavior::Rom(rom) | Behavior::FailsAfter(rom, _) => Some(rom),
            _ => None,
        }
    }

    /// Bytes received after the device was addressed by match ROM or skip ROM.
    pub fn received(&self) -> &[u8] {
        &self.received
    }

    /// Handles a reset pulse and returns whether the device answers with a presence pulse.
    pub fn reset(&mut self) -> bool {
        self.state = match self.behavior {
            Behavior::Rom(_) | Behavior::FailsAfter(..) => State::Command { byte: 0, count: 0 },
            Behavior::Mute => State::Idle,
            Behavior::EchoBits => State::EchoBit { pending: None },
            Behavior::EchoBytes => State::EchoByte {
                byte: 0,
                count: 0,
                sending: false,
            },
        };
        true
    }

    /// Returns `true` if the device pulls the line low during the current slot.
    pub fn drives_low(&self) -> bool {
        match (self.state, self.rom()) {
            (State::Search { index, phase: SearchPhase::IdBit }, Some(rom)) => !rom.bit(index),
            (
                State::Search {
                    index,
                    phase: SearchPhase::Complement,
                },
                Some(rom),
            ) => rom.bit(index),
            (State::EchoBit { pending }, _) => pending == Some(false),
            (
                State::EchoByte {
                    byte,
                    count,
                    sending: true,
                },
                _,
            ) => byte & (1 << count) == 0,
            _ => false,
        }
    }

    /// The id bit the device sends in the current slot, if it is in a search id-bit slot.
    pub fn search_bit(&self) -> Option<bool> {
        match (self.state, self.rom()) {
            (State::Search { index, phase: SearchPhase::IdBit }, Some(rom)) => Some(rom.bit(index)),
            _ => None,
        }
    }

    /// Feeds the level the device sampled at the end of the current slot.
    pub fn end_slot(&mut self, level: bool) {
        self.state = match self.state {
            State::Idle => State::Idle,
            State::Command { mut byte, count } => {
                if level {
                    byte |= 1 << count;
                }
                if count < 7 {
                    State::Command {
                        byte,
                        count: count + 1,
                    }
                } else {
                    self.command(byte)
                }
            }
            State::Search { index, phase } => self.search_step(index, phase, level),
            State::Match { index } => match self.rom() {
                Some(rom) if rom.bit(index) == level => {
                    if index + 1 == ROM_BITS {
                        State::Selected { byte: 0, count: 0 }
                    } else {
                        State::Match { index: index + 1 }
                    }
                }
                _ => State::Idle,
            },
            State::Selected { mut byte, count } => {
                if level {
                    byte |= 1 << count;
                }
                if count < 7 {
                    State::Selected {
                        byte,
                        count: count + 1,
                    }
                } else {
                    self.received.push(byte);
                    State::Selected { byte: 0, count: 0 }
                }
            }
            State::EchoBit { pending: Some(_) } => State::EchoBit { pending: None },
            State::EchoBit { pending: None } => State::EchoBit {
                pending: Some(level),
            },
            State::EchoByte {
                mut byte,
                count,
                sending,
            } => {
                if !sending && level {
                    byte |= 1 << count;
                }
                match (count, sending) {
                    (7, false) => State::EchoByte {
                        byte,
                        count: 0,
                        sending: true,
                    },
                    (7, true) => State::EchoByte {
                        byte: 0,
                        count: 0,
                        sending: false,
                    },
                    _ => State::EchoByte {
                        byte,
                        count: count + 1,
                        sending,
                    },
                }
            }
        };
    }

    fn command(&self, cmd: u8) -> State {
        match cmd {
            ONEWIRE_SEARCH_CMD => State::Search {
                index: 0,
                phase: SearchPhase::IdBit,
            },
            ONEWIRE_MATCH_ROM_CMD => State::Match { index: 0 },
            ONEWIRE_SKIP_ROM_CMD => State::Selected { byte: 0, count: 0 },
            _ => State::Idle,
        }
    }

    fn search_step(&self, index: usize, phase: SearchPhase, level: bool) -> State {
        let Some(rom) = self.rom() else {
            return State::Idle;
        };
        match phase {
            SearchPhase::IdBit => State::Search {
                index,
                phase: SearchPhase::Complement,
            },
            SearchPhase::Complement => State::Search {
                index,
                phase: SearchPhase::Direction,
            },
            SearchPhase::Direction if level != rom.bit(index) => State::Idle,
            SearchPhase::Direction => {
                let next = index + 1;
                let failed = matches!(self.behavior, Behavior::FailsAfter(_, bits) if next >= bits);
                if next == ROM_BITS || failed {
                    State::Idle
                } else {
                    State::Search {
                        index: next,
                        phase: SearchPhase::IdBit,
                    }
                }
            }
        }
    }
}

/// The devices attached to one simulated bus.
#[derive(Debug, Clone, Default)]
pub struct Population {
    devices: Vec<SimDevice>,
    conflicts: usize,
}

impl Population {
    /// Creates a population from `devices`.
    pub fn new(devices: impl IntoIterator<Item = SimDevice>) -> Self {
        Self {
            devices: devices.into_iter().collect(),
            conflicts: 0,
        }
    }

    /// The attached devices.
    pub fn devices(&self) -> &[SimDevice] {
        &self.devices
    }

    /// Number of search slots in which the participating devices disagreed.
    pub fn conflicts(&self) -> usize {
        self.conflicts
    }

    /// Delivers a reset pulse; returns whether any device answered.
    pub fn reset(&mut self) -> bool {
        self.devices
            .iter_mut()
            .fold(false, |presence, dev| dev.reset() || presence)
    }

    /// Starts a slot and returns whether any device pulls the line low in it.
    pub fn begin_slot(&mut self) -> bool {
        let mut bits = self.devices.iter().filter_map(SimDevice::search_bit);
        if let Some(first) = bits.next()
            && bits.any(|bit| bit != first)
        {
            self.conflicts += 1;
        }
        self.devices.iter().any(SimDevice::drives_low)
    }

    /// Ends a slot with the level every device sampled.
    pub fn end_slot(&mut self, level: bool) {
        for dev in self.devices.iter_mut() {
            dev.end_slot(level);
        }
    }
}
