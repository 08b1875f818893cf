//! Surface pixel modes

/// Pixel format of the logical output surface.
///
/// Fixed for the duration of a render session except through explicit
/// mode-changing decorators.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DisplayMode {
    /// Unknown or not reported by the device.
    #[default]
    Unknown,
    /// 1-bit monochrome.
    Bw,
    /// 2-bit grayscale.
    Gray2,
    /// 8-bit R3G3B2.
    Rgb332,
    /// 8-bit palette indexed.
    Indexed,
    /// 16-bit R5G6B5 hi-color.
    HiColor,
}

impl DisplayMode {
    /// Bits of storage per pixel.
    pub fn bits_per_pixel(self) -> u8 {
        match self {
            Self::Unknown => 0,
            Self::Bw => 1,
            Self::Gray2 => 2,
            Self::Rgb332 | Self::Indexed => 8,
            Self::HiColor => 16,
        }
    }

    /// Whether the mode carries color information.
    pub fn is_color(self) -> bool {
        matches!(self, Self::Rgb332 | Self::Indexed | Self::HiColor)
    }

    /// Whether pixel values are palette indices.
    pub fn is_indexed(self) -> bool {
        matches!(self, Self::Indexed)
    }
}

/// Pack 8-bit-per-channel RGB into R5G6B5 hi-color.
pub fn hi_color_from_rgb(r: u8, g: u8, b: u8) -> u16 {
    (u16::from(r & 0xF8) << 8) | (u16::from(g & 0xFC) << 3) | u16::from(b >> 3)
}
