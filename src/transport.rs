//! Byte-stream transport abstraction
//!
//! A [`Transport`] moves bytes from the rendering core to a display
//! controller and toggles the handful of control lines every controller
//! family shares (command/data select, chip select, reset). The escape
//! interpreter ([`crate::escape`]) and the page-flush path of
//! [`crate::driver::PagedMono`] are its only consumers.
//!
//! Concrete bit-banged transports (software SPI, I2C, parallel buses) live
//! outside this crate; [`SpiTransport`] is the bundled embedded-hal
//! implementation for hardware SPI plus GPIO control lines.

use core::fmt::Debug;
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiDevice;

/// Coarse bus speed class requested at transport init.
///
/// Transports that cannot retune their clock (e.g. an embedded-hal
/// `SpiDevice` configured elsewhere) may ignore this.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ClockClass {
    /// Fastest supported clock, ~50ns cycle.
    Cycle50Ns,
    /// ~300ns cycle.
    #[default]
    Cycle300Ns,
    /// ~400ns cycle.
    Cycle400Ns,
    /// No preference; transport default.
    CycleNone,
}

/// Command-vs-data address mode of the controller bus.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AddressMode {
    /// Bytes are controller commands.
    Command,
    /// Bytes are display data.
    Data,
}

impl AddressMode {
    /// Decode the escape-script address nibble: zero means command mode,
    /// anything else data mode.
    pub fn from_raw(raw: u8) -> Self {
        if raw == 0 { Self::Command } else { Self::Data }
    }
}

/// Logic level of the reset line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Level {
    /// Driven low.
    Low,
    /// Driven high.
    High,
}

/// The byte-stream capability a display transport must implement.
///
/// All calls may block for a bounded, small amount of time (busy-wait, not a
/// scheduler yield). A failure from any call aborts the operation in
/// progress; the core never retries.
pub trait Transport {
    /// Error type for transport operations.
    type Error: Debug;

    /// Acquire the bus. Called once per session, before anything else.
    fn init(&mut self, clock: ClockClass) -> Result<(), Self::Error>;

    /// Release the bus. Always called on session teardown, even after an
    /// earlier failure.
    fn stop(&mut self) -> Result<(), Self::Error>;

    /// Switch the command/data line.
    fn set_address_mode(&mut self, mode: AddressMode) -> Result<(), Self::Error>;

    /// Select chip `index`; `0` conventionally deselects all chips.
    ///
    /// Indices beyond what the transport wires up are silently ignored.
    fn set_chip_select(&mut self, index: u8) -> Result<(), Self::Error>;

    /// Drive the reset line.
    fn set_reset(&mut self, level: Level) -> Result<(), Self::Error>;

    /// Reserved power-rail hook; transports without one ignore it.
    fn set_power(&mut self, _on: bool) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Send one byte.
    fn write_byte(&mut self, byte: u8) -> Result<(), Self::Error>;

    /// Send a byte sequence. A failure part-way through aborts the rest.
    fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), Self::Error>;
}

/// Errors from [`SpiTransport`], generic over the SPI and GPIO error types.
#[derive(Debug)]
pub enum TransportError<SpiErr, PinErr> {
    /// SPI communication error.
    Spi(SpiErr),
    /// GPIO pin error.
    Pin(PinErr),
}

impl<SpiErr: Debug, PinErr: Debug> core::fmt::Display for TransportError<SpiErr, PinErr> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Spi(e) => write!(f, "SPI error: {e:?}"),
            Self::Pin(e) => write!(f, "Pin error: {e:?}"),
        }
    }
}

impl<SpiErr: Debug, PinErr: Debug> core::error::Error for TransportError<SpiErr, PinErr> {}

/// Hardware SPI transport over embedded-hal v1.0 traits.
///
/// ## Type Parameters
///
/// * `SPI` - SPI device implementing [`SpiDevice`]
/// * `DC` - Command/data select pin (low = command, high = data)
/// * `CS` - Chip select pin (active low)
/// * `RST` - Reset pin
pub struct SpiTransport<SPI, DC, CS, RST> {
    spi: SPI,
    dc: DC,
    cs: CS,
    rst: RST,
}

impl<SPI, DC, CS, RST> SpiTransport<SPI, DC, CS, RST>
where
    SPI: SpiDevice,
    DC: OutputPin,
    CS: OutputPin,
    RST: OutputPin,
{
    /// Create a new SPI transport from a bus handle and control pins.
    pub fn new(spi: SPI, dc: DC, cs: CS, rst: RST) -> Self {
        Self { spi, dc, cs, rst }
    }

    /// Release the bus handle and pins.
    pub fn release(self) -> (SPI, DC, CS, RST) {
        (self.spi, self.dc, self.cs, self.rst)
    }
}

impl<SPI, DC, CS, RST, PinErr> Transport for SpiTransport<SPI, DC, CS, RST>
where
    SPI: SpiDevice,
    SPI::Error: Debug,
    DC: OutputPin<Error = PinErr>,
    CS: OutputPin<Error = PinErr>,
    RST: OutputPin<Error = PinErr>,
    PinErr: Debug,
{
    type Error = TransportError<SPI::Error, PinErr>;

    fn init(&mut self, _clock: ClockClass) -> Result<(), Self::Error> {
        // The SpiDevice owns its clock configuration; bring the control
        // lines to their idle state.
        self.cs.set_high().map_err(TransportError::Pin)?;
        self.rst.set_high().map_err(TransportError::Pin)?;
        Ok(())
    }

    fn stop(&mut self) -> Result<(), Self::Error> {
        self.cs.set_high().map_err(TransportError::Pin)
    }

    fn set_address_mode(&mut self, mode: AddressMode) -> Result<(), Self::Error> {
        match mode {
            AddressMode::Command => self.dc.set_low(),
            AddressMode::Data => self.dc.set_high(),
        }
        .map_err(TransportError::Pin)
    }

    fn set_chip_select(&mut self, index: u8) -> Result<(), Self::Error> {
        // Single chip wired: index 0 deselects, anything else selects.
        match index {
            0 => self.cs.set_high(),
            _ => self.cs.set_low(),
        }
        .map_err(TransportError::Pin)
    }

    fn set_reset(&mut self, level: Level) -> Result<(), Self::Error> {
        match level {
            Level::Low => self.rst.set_low(),
            Level::High => self.rst.set_high(),
        }
        .map_err(TransportError::Pin)
    }

    fn write_byte(&mut self, byte: u8) -> Result<(), Self::Error> {
        self.spi.write(&[byte]).map_err(TransportError::Spi)
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        self.spi.write(bytes).map_err(TransportError::Spi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal::digital::ErrorType;
    use embedded_hal::spi::ErrorType as SpiErrorType;

    #[derive(Debug)]
    struct MockSpi {
        written: alloc::vec::Vec<u8>,
    }

    #[derive(Debug)]
    struct MockPin {
        high: bool,
    }

    #[derive(Debug, Clone, Copy)]
    struct MockError;

    impl embedded_hal::digital::Error for MockError {
        fn kind(&self) -> embedded_hal::digital::ErrorKind {
            embedded_hal::digital::ErrorKind::Other
        }
    }

    impl embedded_hal::spi::Error for MockError {
        fn kind(&self) -> embedded_hal::spi::ErrorKind {
            embedded_hal::spi::ErrorKind::Other
        }
    }

    impl SpiErrorType for MockSpi {
        type Error = MockError;
    }

    impl SpiDevice for MockSpi {
        fn transaction(
            &mut self,
            operations: &mut [embedded_hal::spi::Operation<'_, u8>],
        ) -> Result<(), Self::Error> {
            for op in operations {
                if let embedded_hal::spi::Operation::Write(bytes) = op {
                    self.written.extend_from_slice(bytes);
                }
            }
            Ok(())
        }
    }

    impl ErrorType for MockPin {
        type Error = MockError;
    }

    impl OutputPin for MockPin {
        fn set_low(&mut self) -> Result<(), Self::Error> {
            self.high = false;
            Ok(())
        }
        fn set_high(&mut self) -> Result<(), Self::Error> {
            self.high = true;
            Ok(())
        }
    }

    fn transport() -> SpiTransport<MockSpi, MockPin, MockPin, MockPin> {
        SpiTransport::new(
            MockSpi {
                written: alloc::vec::Vec::new(),
            },
            MockPin { high: false },
            MockPin { high: true },
            MockPin { high: true },
        )
    }

    #[test]
    fn test_address_mode_drives_dc_pin() {
        let mut t = transport();
        t.set_address_mode(AddressMode::Data).ok();
        assert!(t.dc.high);
        t.set_address_mode(AddressMode::Command).ok();
        assert!(!t.dc.high);
    }

    #[test]
    fn test_chip_select_zero_deselects() {
        let mut t = transport();
        t.set_chip_select(1).ok();
        assert!(!t.cs.high);
        t.set_chip_select(0).ok();
        assert!(t.cs.high);
    }

    #[test]
    fn test_write_bytes_reaches_spi() {
        let mut t = transport();
        t.write_byte(0xA5).ok();
        t.write_bytes(&[1, 2, 3]).ok();
        assert_eq!(t.spi.written, &[0xA5, 1, 2, 3]);
    }

    #[test]
    fn test_address_mode_from_raw() {
        assert_eq!(AddressMode::from_raw(0), AddressMode::Command);
        assert_eq!(AddressMode::from_raw(1), AddressMode::Data);
        assert_eq!(AddressMode::from_raw(9), AddressMode::Data);
    }
}
