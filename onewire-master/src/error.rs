use core::fmt;

/// One wire communication error type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OneWireError<E> {
    /// Encapsulates the error type from the underlying hardware.
    Other(E),
    /// Indicates that no device answered the reset pulse of a search pass.
    NoDevicePresent,
    /// Both the id bit and its complement read high during a search pass:
    /// no device is participating any more, the bus is empty or died mid-search.
    BusFault,
    /// Indicates that the line was held low before the reset pulse was issued.
    ShortCircuit,
    /// A registry index outside of the discovered devices was addressed.
    IndexOutOfRange {
        /// The requested index.
        index: usize,
        /// Number of valid entries in the registry.
        len: usize,
    },
}

impl<E> From<E> for OneWireError<E> {
    fn from(other: E) -> Self {
        Self::Other(other)
    }
}

impl<E: fmt::Debug> fmt::Display for OneWireError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Other(e) => write!(f, "line driver error: {e:?}"),
            Self::NoDevicePresent => f.write_str("no presence pulse detected"),
            Self::BusFault => f.write_str("no device answered during ROM search"),
            Self::ShortCircuit => f.write_str("1-Wire line is held low"),
            Self::IndexOutOfRange { index, len } => {
                write!(f, "device index {index} out of range ({len} discovered)")
            }
        }
    }
}
