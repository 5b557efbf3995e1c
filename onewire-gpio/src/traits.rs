use embedded_hal::digital::{ErrorType, InputPin, OutputPin};

/// Electrical access to the 1-Wire line.
///
/// The line is open-drain: the master can only pull it low or let go of it. A released line
/// reads high unless some device holds it low.
pub trait LineDriver {
    /// Error raised by the underlying pin.
    type Error;

    /// Pulls the line low.
    fn drive_low(&mut self) -> Result<(), Self::Error>;

    /// Releases the line, optionally enabling the internal pull-up.
    fn release(&mut self, pull_up: bool) -> Result<(), Self::Error>;

    /// Samples the line; `true` for a high level.
    fn sample(&mut self) -> Result<bool, Self::Error>;
}

impl<T: LineDriver + ?Sized> LineDriver for &mut T {
    type Error = T::Error;

    fn drive_low(&mut self) -> Result<(), Self::Error> {
        (**self).drive_low()
    }

    fn release(&mut self, pull_up: bool) -> Result<(), Self::Error> {
        (**self).release(pull_up)
    }

    fn sample(&mut self) -> Result<bool, Self::Error> {
        (**self).sample()
    }
}

/// [`LineDriver`] over an `embedded-hal` pin configured as open-drain output.
///
/// Setting the pin high releases the line. The pin's bias is fixed when the HAL
/// creates the pin, so the pull-up request of [`LineDriver::release`] is ignored here.
#[derive(Debug)]
pub struct OpenDrainPin<P>(P);

impl<P> OpenDrainPin<P> {
    /// Wraps an open-drain pin.
    pub fn new(pin: P) -> Self {
        Self(pin)
    }

    /// Returns the wrapped pin.
    pub fn into_inner(self) -> P {
        self.0
    }
}

impl<P: OutputPin + InputPin> LineDriver for OpenDrainPin<P> {
    type Error = <P as ErrorType>::Error;

    fn drive_low(&mut self) -> Result<(), Self::Error> {
        self.0.set_low()
    }

    fn release(&mut self, _pull_up: bool) -> Result<(), Self::Error> {
        self.0.set_high()
    }

    fn sample(&mut self) -> Result<bool, Self::Error> {
        self.0.is_high()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal_mock::eh1::digital::{Mock, State, Transaction};

    #[test]
    fn open_drain_maps_to_pin_levels() {
        let expectations = [
            Transaction::set(State::Low),
            Transaction::set(State::High),
            Transaction::get(State::Low),
        ];
        let mut line = OpenDrainPin::new(Mock::new(&expectations));
        line.drive_low().unwrap();
        line.release(true).unwrap();
        assert!(!line.sample().unwrap());
        line.into_inner().done();
    }
}
