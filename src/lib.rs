//! Page-buffered rendering core for RAM-constrained displays
//!
//! A hardware-independent rendering pipeline for displays whose full frame
//! does not fit in RAM: one horizontal strip (a *page*) is buffered at a
//! time, the application replays its drawing per page, and each page is
//! flushed to the controller before the next. A 128x64 monochrome panel
//! renders in eight passes over a 128-byte buffer instead of one pass over
//! a kilobyte.
//!
//! ## Features
//!
//! - `no_std` compatible, zero allocation
//! - `embedded-hal` v1.0 transports ([`SpiTransport`]) plus a [`Transport`]
//!   trait for custom buses
//! - `embedded-graphics` integration (with `graphics` feature)
//! - Data-driven controller support: one [`PagedMono`] driver body, escape
//!   -coded per-controller byte tables ([`ControllerScripts`])
//! - Decorator devices, e.g. [`Scale2x`](scale::Scale2x) for driving a
//!   double-resolution panel from half-resolution drawing code
//!
//! ## Usage
//!
//! ```rust
//! use core::convert::Infallible;
//! use embedded_hal::delay::DelayNs;
//! use pagegfx::driver::{ControllerScripts, PagedMono};
//! use pagegfx::session::Session;
//! use pagegfx::transport::{AddressMode, ClockClass, Level, Transport};
//!
//! # struct NullTransport;
//! # impl Transport for NullTransport {
//! #     type Error = Infallible;
//! #     fn init(&mut self, _clock: ClockClass) -> Result<(), Infallible> { Ok(()) }
//! #     fn stop(&mut self) -> Result<(), Infallible> { Ok(()) }
//! #     fn set_address_mode(&mut self, _mode: AddressMode) -> Result<(), Infallible> { Ok(()) }
//! #     fn set_chip_select(&mut self, _index: u8) -> Result<(), Infallible> { Ok(()) }
//! #     fn set_reset(&mut self, _level: Level) -> Result<(), Infallible> { Ok(()) }
//! #     fn write_byte(&mut self, _byte: u8) -> Result<(), Infallible> { Ok(()) }
//! #     fn write_bytes(&mut self, _bytes: &[u8]) -> Result<(), Infallible> { Ok(()) }
//! # }
//! # struct NoDelay;
//! # impl DelayNs for NoDelay { fn delay_ns(&mut self, _ns: u32) {} }
//! fn main() -> Result<(), Box<dyn core::error::Error>> {
//!     let mut buf = [0u8; 128];
//!     let driver = PagedMono::<u16, _, _, _>::new(
//!         NullTransport,
//!         NoDelay,
//!         128,
//!         8,
//!         64,
//!         &mut buf[..],
//!         ControllerScripts::default(),
//!         ClockClass::Cycle300Ns,
//!     );
//!
//!     let mut session = Session::begin(driver)?;
//!     session.first_page()?;
//!     loop {
//!         // replay all drawing for the frame on every page
//!         session.draw_pixel(10, 20)?;
//!         if !session.next_page()? {
//!             break;
//!         }
//!     }
//!     Ok(())
//! }
//! ```

#![no_std]

#[cfg(any(test, feature = "alloc"))]
extern crate alloc;

/// Bounding-box intersection and clipping predicates
pub mod clip;
/// Coordinate width abstraction
pub mod coord;
/// Device dispatch contract and message vocabulary
pub mod device;
/// Data-driven paged monochrome controller driver
pub mod driver;
/// Session error type
pub mod error;
/// Escape-sequence script interpreter
pub mod escape;
/// Surface pixel modes
pub mod mode;
/// Page and page-buffer model
pub mod page;
/// Resolution-scaling decorator devices
pub mod scale;
/// Render session orchestration
pub mod session;
/// Byte-stream transport abstraction
pub mod transport;

/// Graphics support via embedded-graphics (requires `graphics` feature)
#[cfg(feature = "graphics")]
pub mod graphics;

pub use clip::Bbox;
pub use coord::Coord;
pub use device::{ColorEntry, Device, Direction, Message, PixelArg, Reply};
pub use driver::{ControllerScripts, PagedMono};
pub use error::Error;
pub use mode::DisplayMode;
pub use page::{Page, PageBox, PageBuffer};
pub use scale::{Passthrough, Scale2x};
pub use session::Session;
pub use transport::{AddressMode, ClockClass, Level, SpiTransport, Transport, TransportError};
