#![no_std]
#![deny(missing_docs)]
//! # onewire-master
//! A no-std master-side implementation of the 1-Wire protocol.
//!
//! The [OneWire] trait defines the transport primitives a bus master needs: resetting the bus
//! with presence detection, and reading and writing single bits and bytes (LSB first).
//! Anything that can produce 1-Wire time slots (a bit-banged GPIO, a bridge IC, a simulated bus)
//! implements it.
//!
//! On top of the transport, this crate provides
//! - the ROM search that discovers the identifiers of every device on the bus, either as a
//!   stream ([OneWireSearch]) or into a caller-owned [RomRegistry] ([search_all]);
//! - addressing helpers that select a single device by its [Rom] ([select_and_write],
//!   [OneWire::match_rom]) or all devices at once ([OneWire::skip_rom]).
//!
//! Every operation that starts a new transaction expects the caller to issue
//! [OneWire::reset] first, so every sequence reads the same: reset, then command.

mod consts;
mod error;
mod registry;
mod rom;
mod search;
mod select;
mod traits;

pub use consts::*;
pub use error::OneWireError;
pub use registry::RomRegistry;
pub use rom::Rom;
pub use search::{DiscriminationStack, OneWireSearch, search_all};
pub use select::select_and_write;
pub use traits::OneWire;

/// Error type for 1-Wire operations.
pub type OneWireResult<T, E> = Result<T, OneWireError<E>>;
