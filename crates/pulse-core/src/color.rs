use serde::{Deserialize, Serialize};

/// RGBA color with f32 components in the [0.0, 1.0] range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Parse `#RRGGBB` or `#RRGGBBAA` (the leading `#` is optional).
    pub fn from_hex(hex: &str) -> Result<Self, ColorError> {
        let hex = hex.trim().trim_start_matches('#');
        if !hex.is_ascii() || (hex.len() != 6 && hex.len() != 8) {
            return Err(ColorError::InvalidHex(hex.to_string()));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .map(|v| v as f32 / 255.0)
                .map_err(|_| ColorError::InvalidHex(hex.to_string()))
        };
        let a = if hex.len() == 8 { channel(6)? } else { 1.0 };
        Ok(Self::rgba(channel(0)?, channel(2)?, channel(4)?, a))
    }

    /// Same color with a different alpha.
    pub fn with_alpha(self, a: f32) -> Self {
        Self {
            a: a.clamp(0.0, 1.0),
            ..self
        }
    }

    pub fn to_rgba8(&self) -> [u8; 4] {
        let q = |c: f32| (c * 255.0).round().clamp(0.0, 255.0) as u8;
        [q(self.r), q(self.g), q(self.b), q(self.a)]
    }

    /// CSS `rgb(...)` string for canvas fill styles. Alpha is applied
    /// separately through the context's global alpha.
    pub fn to_css_rgb(&self) -> String {
        let [r, g, b, _] = self.to_rgba8();
        format!("rgb({}, {}, {})", r, g, b)
    }

    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const RED: Color = Color::rgb(1.0, 0.0, 0.0);
    pub const BLUE: Color = Color::rgb(0.0, 0.0, 1.0);
    /// Near-black used for the hero's motion-trail wash.
    pub const TRAIL: Color = Color::rgb(5.0 / 255.0, 5.0 / 255.0, 5.0 / 255.0);
}

impl Default for Color {
    fn default() -> Self {
        Color::BLACK
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ColorError {
    #[error("invalid hex color string: {0:?}")]
    InvalidHex(String),
}
