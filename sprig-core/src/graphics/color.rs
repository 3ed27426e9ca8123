//! RGB565 colors
//!
//! The panel takes 16 bits per pixel: 5 bits red, 6 bits green, 5 bits blue,
//! sent high byte first.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How 8-bit channels are packed by [`Color::from_rgb8_with`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Rgb8Policy {
    /// Standard packing: top 5/6/5 bits of red/green/blue
    #[default]
    Corrected,
    /// Bit-compatible with the stock board firmware
    ///
    /// The green field is derived from the *red* input, and each channel is
    /// scaled to its 5/6-bit range before the 8-bit packing masks are
    /// applied. Kept so screens drawn with stock palettes match exactly.
    Compatible,
}

/// A packed RGB565 pixel color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Color(pub u16);

impl Color {
    pub const BLACK: Color = Color(0x0000);
    pub const BLUE: Color = Color(0x001F);
    pub const RED: Color = Color(0xF800);
    pub const GREEN: Color = Color(0x07E0);
    pub const CYAN: Color = Color(0x07FF);
    pub const MAGENTA: Color = Color(0xF81F);
    pub const YELLOW: Color = Color(0xFFE0);
    pub const WHITE: Color = Color(0xFFFF);

    /// Wrap a raw RGB565 value
    pub const fn from_raw(raw: u16) -> Self {
        Self(raw)
    }

    /// Raw RGB565 value
    pub const fn raw(self) -> u16 {
        self.0
    }

    /// Bytes in wire order (high byte first)
    pub const fn to_be_bytes(self) -> [u8; 2] {
        self.0.to_be_bytes()
    }

    /// Convert 8-bit channels with the corrected packing
    pub const fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        let r = (r as u16 & 0xF8) << 8;
        let g = (g as u16 & 0xFC) << 3;
        let b = b as u16 >> 3;
        Self(r | g | b)
    }

    /// Convert 8-bit channels with an explicit packing policy
    pub fn from_rgb8_with(r: u8, g: u8, b: u8, policy: Rgb8Policy) -> Self {
        match policy {
            Rgb8Policy::Corrected => Self::from_rgb8(r, g, b),
            Rgb8Policy::Compatible => {
                let r16 = ((r as f64 / 255.0) * 31.0) as u16;
                // Green intentionally sourced from red
                let g16 = ((r as f64 / 255.0) * 63.0) as u16;
                let b16 = ((b as f64 / 255.0) * 31.0) as u16;
                Self(((r16 & 0b1111_1000) << 8) | ((g16 & 0b1111_1100) << 3) | (b16 >> 3))
            }
        }
    }

    /// Red channel (0-31)
    pub const fn red(self) -> u8 {
        (self.0 >> 11) as u8
    }

    /// Green channel (0-63)
    pub const fn green(self) -> u8 {
        ((self.0 >> 5) & 0x3F) as u8
    }

    /// Blue channel (0-31)
    pub const fn blue(self) -> u8 {
        (self.0 & 0x1F) as u8
    }
}

impl From<u16> for Color {
    fn from(raw: u16) -> Self {
        Self(raw)
    }
}

impl From<Color> for u16 {
    fn from(color: Color) -> Self {
        color.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corrected_magenta() {
        let c = Color::from_rgb8(255, 0, 255);
        assert_eq!(c, Color::MAGENTA);
        assert_eq!(c.green(), 0);
    }

    #[test]
    fn test_corrected_primaries() {
        assert_eq!(Color::from_rgb8(255, 255, 255), Color::WHITE);
        assert_eq!(Color::from_rgb8(0, 0, 0), Color::BLACK);
        assert_eq!(Color::from_rgb8(0, 255, 0), Color::GREEN);
        assert_eq!(Color::from_rgb8(255, 0, 0), Color::RED);
    }

    #[test]
    fn test_compatible_green_follows_red() {
        let c = Color::from_rgb8_with(255, 0, 255, Rgb8Policy::Compatible);
        assert_eq!(c.raw(), 0x19E3);
        // Green field is non-zero even though the green input was zero
        assert_eq!(c.green(), 0x0F);

        // Changing only green has no effect
        let a = Color::from_rgb8_with(200, 0, 40, Rgb8Policy::Compatible);
        let b = Color::from_rgb8_with(200, 255, 40, Rgb8Policy::Compatible);
        assert_eq!(a, b);
    }

    #[test]
    fn test_compatible_black() {
        let c = Color::from_rgb8_with(0, 0, 0, Rgb8Policy::Compatible);
        assert_eq!(c, Color::BLACK);
    }

    #[test]
    fn test_policy_dispatch() {
        assert_eq!(
            Color::from_rgb8_with(12, 34, 56, Rgb8Policy::Corrected),
            Color::from_rgb8(12, 34, 56)
        );
    }

    #[test]
    fn test_wire_order() {
        assert_eq!(Color(0xF81F).to_be_bytes(), [0xF8, 0x1F]);
    }
}
