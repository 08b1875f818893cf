//! Coordinate width abstraction
//!
//! The memory-constrained targets this crate serves disagree on how wide a
//! screen coordinate needs to be: 8 bits is enough for a 128x64 OLED and
//! saves RAM on an AVR, while TFT panels need 16 bits. Instead of fixing one
//! width, every geometric type in this crate is generic over [`Coord`].
//!
//! The trait deliberately exposes *wrapping* arithmetic: the clipping engine
//! relies on unsigned wraparound of `y + h - 1` to keep oversized bounding
//! boxes well-defined as wrapped intervals (see [`crate::clip`]).

/// An unsigned screen coordinate.
///
/// Implemented for `u8`, `u16` and `u32`. Pick the narrowest type that can
/// hold your display's width and height.
pub trait Coord: Copy + Ord + core::fmt::Debug {
    /// The zero coordinate.
    const ZERO: Self;
    /// The unit coordinate.
    const ONE: Self;
    /// The largest representable coordinate.
    const MAX: Self;

    /// Widen a byte value.
    fn from_u8(value: u8) -> Self;
    /// Narrow a `u32`; the caller guarantees the value fits.
    fn from_u32(value: u32) -> Self;
    /// Widen to `u32`.
    fn to_u32(self) -> u32;
    /// Widen to `usize` for buffer indexing.
    fn to_usize(self) -> usize;
    /// Addition with two's-complement wraparound.
    fn wrapping_add(self, rhs: Self) -> Self;
    /// Subtraction with two's-complement wraparound.
    fn wrapping_sub(self, rhs: Self) -> Self;
    /// Addition clamped at [`Coord::MAX`].
    fn saturating_add(self, rhs: Self) -> Self;
    /// Halve, rounding down.
    fn halved(self) -> Self;
    /// Double, wrapping on overflow.
    fn doubled(self) -> Self;
}

macro_rules! impl_coord {
    ($($ty:ty),*) => {
        $(
            impl Coord for $ty {
                const ZERO: Self = 0;
                const ONE: Self = 1;
                const MAX: Self = <$ty>::MAX;

                fn from_u8(value: u8) -> Self {
                    value as $ty
                }

                fn from_u32(value: u32) -> Self {
                    value as $ty
                }

                fn to_u32(self) -> u32 {
                    self as u32
                }

                fn to_usize(self) -> usize {
                    self as usize
                }

                fn wrapping_add(self, rhs: Self) -> Self {
                    <$ty>::wrapping_add(self, rhs)
                }

                fn wrapping_sub(self, rhs: Self) -> Self {
                    <$ty>::wrapping_sub(self, rhs)
                }

                fn saturating_add(self, rhs: Self) -> Self {
                    <$ty>::saturating_add(self, rhs)
                }

                fn halved(self) -> Self {
                    self >> 1
                }

                fn doubled(self) -> Self {
                    self.wrapping_shl(1)
                }
            }
        )*
    };
}

impl_coord!(u8, u16, u32);
