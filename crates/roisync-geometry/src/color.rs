//! Shape colours and their packed wire form.
//!
//! The server stores a colour as one signed 32-bit integer laid out as
//! `(red << 24) | (green << 16) | (blue << 8) | alpha`.

use serde::{Deserialize, Serialize};

/// An 8-bit-per-channel colour with alpha
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgba {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub alpha: u8,
}

impl Rgba {
    /// Fully transparent black, used as "no fill"
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0);

    pub const fn new(red: u8, green: u8, blue: u8, alpha: u8) -> Self {
        Self { red, green, blue, alpha }
    }

    /// Opaque colour from red, green and blue channels
    pub const fn opaque(red: u8, green: u8, blue: u8) -> Self {
        Self::new(red, green, blue, 255)
    }

    /// Unpack the wire integer
    pub fn from_packed(packed: i32) -> Self {
        let bits = packed as u32;
        Self {
            red: (bits >> 24) as u8,
            green: (bits >> 16) as u8,
            blue: (bits >> 8) as u8,
            alpha: bits as u8,
        }
    }

    /// Pack into the wire integer
    pub fn to_packed(self) -> i32 {
        let bits = ((self.red as u32) << 24)
            | ((self.green as u32) << 16)
            | ((self.blue as u32) << 8)
            | self.alpha as u32;
        bits as i32
    }

    /// Same hue with a quarter of the alpha (used for fills)
    pub fn more_translucent(self) -> Self {
        Self {
            alpha: self.alpha / 4,
            ..self
        }
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Rgba::opaque(255, 0, 0)
    }
}

impl std::fmt::Display for Rgba {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "#{:02x}{:02x}{:02x}{:02x}",
            self.red, self.green, self.blue, self.alpha
        )
    }
}
