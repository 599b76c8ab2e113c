use serde::{Deserialize, Serialize};

/// Errors from parsing a `#rrggbb` color string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ColorParseError {
    #[error("color must start with '#': {0:?}")]
    MissingHash(String),
    #[error("color must have exactly 6 hex digits: {0:?}")]
    BadLength(String),
    #[error("invalid hex digits in color: {0:?}")]
    BadDigits(String),
}

/// 24-bit RGB color stored as `0xRRGGBB`.
///
/// Serializes as a `#rrggbb` string so config files read the same way the
/// control panel shows the value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb(pub u32);

impl Rgb {
    pub const WHITE: Rgb = Rgb(0xffffff);
    pub const BLACK: Rgb = Rgb(0x000000);

    /// Build from a raw value, discarding anything above 24 bits.
    pub fn new(value: u32) -> Self {
        Self(value & 0x00ff_ffff)
    }

    pub fn from_rgb8(rgb: [u8; 3]) -> Self {
        Self((rgb[0] as u32) << 16 | (rgb[1] as u32) << 8 | rgb[2] as u32)
    }

    pub fn to_rgb8(self) -> [u8; 3] {
        [
            ((self.0 >> 16) & 0xff) as u8,
            ((self.0 >> 8) & 0xff) as u8,
            (self.0 & 0xff) as u8,
        ]
    }

    /// Channels in `[0, 1]`, gamma-encoded (as picked in the panel).
    pub fn to_srgb_f32(self) -> [f32; 3] {
        let [r, g, b] = self.to_rgb8();
        [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0]
    }

    /// Channels converted to linear space for lighting math.
    pub fn to_linear_f32(self) -> [f32; 3] {
        self.to_srgb_f32().map(srgb_to_linear)
    }

    pub fn to_hex(self) -> String {
        format!("#{:06x}", self.0)
    }
}

fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

impl std::str::FromStr for Rgb {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix('#')
            .ok_or_else(|| ColorParseError::MissingHash(s.to_string()))?;
        if digits.len() != 6 {
            return Err(ColorParseError::BadLength(s.to_string()));
        }
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ColorParseError::BadDigits(s.to_string()));
        }
        u32::from_str_radix(digits, 16)
            .map(Rgb)
            .map_err(|_| ColorParseError::BadDigits(s.to_string()))
    }
}

impl TryFrom<String> for Rgb {
    type Error = ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Rgb> for String {
    fn from(value: Rgb) -> Self {
        value.to_hex()
    }
}

impl std::fmt::Display for Rgb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:06x}", self.0)
    }
}
